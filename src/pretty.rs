//! Pretty printers for node trees and tagged maps
//!
//! Debugging aid only; generators never go through here.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::ast::types::{AttrValue, Node};
use crate::codec::tagged::TaggedMap;
use crate::codegen::types::Tree;

/// Formatting options
#[derive(Debug, Clone)]
pub struct PrettyOptions {
    /// Indentation unit for each nesting level
    pub indent: String,
}

impl Default for PrettyOptions {
    fn default() -> Self {
        Self { indent: " ".to_string() }
    }
}

/// Format a node tree as `Type(attr=value, ...)` with one attribute per line
pub fn pformat_node(node: &Node, indent: &str) -> String {
    let name = node.node_type().name();
    let attrs = node.attributes();
    if attrs.is_empty() {
        return format!("{}()", name);
    }

    let nl_indent = format!("\n{}", indent);
    let lines: Vec<String> = attrs
        .into_iter()
        .map(|(attr, value)| format!("{}={}", attr, format_value(value, indent)).replace('\n', &nl_indent))
        .collect();
    format!("{}(\n{}{}\n)", name, indent, lines.join(&format!(",{}", nl_indent)))
}

fn format_value(value: AttrValue<'_>, indent: &str) -> String {
    match value {
        AttrValue::Node(node) => pformat_node(node, indent),
        AttrValue::Nodes([]) => "[]".to_string(),
        AttrValue::Nodes(nodes) => {
            let nl_indent = format!("\n{}", indent);
            let elems: Vec<String> = nodes
                .iter()
                .map(|node| pformat_node(node, indent).replace('\n', &nl_indent))
                .collect();
            format!("[\n{}{}\n]", indent, elems.join(&format!(",{}", nl_indent)))
        }
        AttrValue::Text(text) => format!("{:?}", text),
        AttrValue::Bool(flag) => flag.to_string(),
        AttrValue::Scope(scope) => format!("{:?}", scope.as_str()),
    }
}

/// Format a tagged map as JSON indented by `indent`
pub fn pformat_map(map: &TaggedMap, indent: &str) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent.as_bytes()));
    map.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Format a tree of either form
pub fn pformat<'a>(tree: impl Into<Tree<'a>>, options: &PrettyOptions) -> Result<String, serde_json::Error> {
    match tree.into() {
        Tree::Node(node) => Ok(pformat_node(node, &options.indent)),
        Tree::Map(map) => pformat_map(map, &options.indent),
    }
}
