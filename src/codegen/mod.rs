//! Dialect code generators
//!
//! Every generator works on the tagged-map form only. A node tree handed to
//! [`generate`] is encoded first, so hand-built maps and node trees take the
//! same path.

pub mod types;
pub mod constants;
pub mod bash;
pub mod xonsh;
pub mod fish;

use tracing::debug;

use crate::ast::types::NodeType;
use crate::codec::encode::encode;
use crate::codec::tagged::{Tagged, TaggedMap};

// Re-exports
pub use types::{Dialect, GenerateError, Generator, Tree};
pub use bash::{to_bash, BashGenerator};
pub use xonsh::{to_xonsh, XonshGenerator};
pub use fish::{to_fish, FishGenerator};

/// Render a node tree or tagged map as source text for `dialect`
pub fn generate<'a>(dialect: Dialect, tree: impl Into<Tree<'a>>) -> Result<String, GenerateError> {
    debug!(%dialect, "generating source");
    let encoded;
    let map = match tree.into() {
        Tree::Node(node) => {
            encoded = encode(node);
            &encoded
        }
        Tree::Map(map) => map,
    };

    let result = match dialect {
        Dialect::Bash => BashGenerator.visit(map),
        Dialect::Xonsh => XonshGenerator.visit(map),
        Dialect::Fish => FishGenerator.visit(map),
    };
    if let Err(err) = &result {
        debug!(%dialect, error = %err, "generation failed");
    }
    result
}

/// Split a map into its node type and attribute view, rejecting tags the
/// node grammar does not know.
pub(crate) fn dispatch(dialect: Dialect, map: &TaggedMap) -> Result<(NodeType, Tagged<'_>), GenerateError> {
    let tagged = Tagged::parse(map)?;
    match tagged.node_type() {
        Some(node_type) => Ok((node_type, tagged)),
        None => Err(GenerateError::UnsupportedConstruct {
            dialect,
            tag: tagged.tag.to_string(),
        }),
    }
}

/// Prefix every line of `text` with `unit`, blank lines included
pub(crate) fn indent_block(text: &str, unit: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        out.push_str(unit);
        out.push_str(line);
    }
    out
}

/// Redirection target of `attr`, or `None` when omitted or left at the
/// stream sentinel.
pub(crate) fn redirect_target<'a>(
    tagged: &Tagged<'a>,
    attr: &'static str,
    sentinel: &TaggedMap,
) -> Option<&'a TaggedMap> {
    tagged.optional(attr).filter(|target| *target != sentinel)
}

/// Loop variable of a `For` node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopTarget<'a> {
    Var(&'a str),
    EnvVar(&'a str),
}

pub(crate) fn loop_target<'a>(dialect: Dialect, tagged: &Tagged<'a>) -> Result<LoopTarget<'a>, GenerateError> {
    let target = Tagged::parse(tagged.node("target")?)?;
    match target.node_type() {
        Some(NodeType::Var) => Ok(LoopTarget::Var(target.text("name")?)),
        Some(NodeType::EnvVar) => Ok(LoopTarget::EnvVar(target.text("name")?)),
        _ => Err(GenerateError::InvalidLoopTarget {
            dialect,
            tag: target.tag.to_string(),
        }),
    }
}
