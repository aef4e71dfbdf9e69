//! Tagged map → node tree

use tracing::{debug, trace};

use crate::ast::types::*;
use crate::codec::tagged::{Tagged, TaggedMap};
use crate::codec::types::{DecodeError, ShapeError};

/// Optional position keys accepted beside the declared attributes
const POSITION_KEYS: [&str; 2] = ["lineno", "column"];

/// Decode a tagged map into a node tree.
///
/// The attribute body must hold exactly the attributes the tag declares;
/// `Command`/`CapturedCommand` may omit their stream and background
/// attributes, which then take their defaults.
pub fn decode(map: &TaggedMap) -> Result<Node, DecodeError> {
    decode_node(map).map_err(|err| {
        debug!(error = %err, "decode failed");
        err
    })
}

fn decode_node(map: &TaggedMap) -> Result<Node, DecodeError> {
    let tagged = Tagged::parse(map)?;
    let node_type: NodeType = tagged.tag.parse()?;
    trace!(tag = tagged.tag, "decoding node");
    check_attrs(node_type, &tagged)?;

    let kind = match node_type {
        NodeType::Script => NodeKind::Script(ScriptNode {
            body: decode_all(tagged.nodes("body")?)?,
        }),
        NodeType::Comment => NodeKind::Comment(CommentNode {
            value: tagged.text("value")?.to_string(),
        }),
        NodeType::String => NodeKind::String(StringNode {
            parts: decode_all(tagged.nodes("parts")?)?,
        }),
        NodeType::RawString => NodeKind::RawString(RawStringNode {
            value: tagged.text("value")?.to_string(),
        }),
        NodeType::Var => NodeKind::Var(decode_var(&tagged)?),
        NodeType::EnvVar => NodeKind::EnvVar(decode_var(&tagged)?),
        NodeType::StdIn => NodeKind::StdIn,
        NodeType::StdOut => NodeKind::StdOut,
        NodeType::StdErr => NodeKind::StdErr,
        NodeType::Command => NodeKind::Command(decode_command(node_type, &tagged)?),
        NodeType::CapturedCommand => NodeKind::CapturedCommand(decode_command(node_type, &tagged)?),
        NodeType::And => NodeKind::And(decode_binop(&tagged)?),
        NodeType::Or => NodeKind::Or(decode_binop(&tagged)?),
        NodeType::Not => NodeKind::Not(NotNode {
            node: decode_boxed(tagged.node("node")?)?,
        }),
        NodeType::Statement => NodeKind::Statement(StatementNode {
            node: decode_boxed(tagged.node("node")?)?,
        }),
        NodeType::Assign => NodeKind::Assign(AssignNode {
            name: tagged.text("name")?.to_string(),
            value: decode_boxed(tagged.node("value")?)?,
            scope: decode_scope(&tagged)?,
        }),
        NodeType::EnvAssign => NodeKind::EnvAssign(decode_binding(&tagged)?),
        NodeType::Delete => NodeKind::Delete(decode_unbind(&tagged)?),
        NodeType::EnvDelete => NodeKind::EnvDelete(decode_unbind(&tagged)?),
        NodeType::AliasAssign => NodeKind::AliasAssign(decode_binding(&tagged)?),
        NodeType::AliasDelete => NodeKind::AliasDelete(decode_unbind(&tagged)?),
        NodeType::Pass => NodeKind::Pass,
        NodeType::If => NodeKind::If(IfNode {
            test: decode_boxed(tagged.node("test")?)?,
            body: decode_all(tagged.nodes("body")?)?,
            orelse: decode_all(tagged.nodes("orelse")?)?,
        }),
        NodeType::For => NodeKind::For(ForNode {
            target: decode_boxed(tagged.node("target")?)?,
            iter: decode_boxed(tagged.node("iter")?)?,
            body: decode_all(tagged.nodes("body")?)?,
        }),
        NodeType::Function => NodeKind::Function(FunctionNode {
            name: tagged.text("name")?.to_string(),
            body: decode_all(tagged.nodes("body")?)?,
        }),
    };

    let mut node = Node::new(kind);
    node.position = decode_position(&tagged)?;
    Ok(node)
}

fn check_attrs(node_type: NodeType, tagged: &Tagged<'_>) -> Result<(), DecodeError> {
    if let Some(attr) = node_type.required_attrs().find(|attr| tagged.optional(*attr).is_none()) {
        return Err(ShapeError::MissingAttribute {
            node: tagged.tag.to_string(),
            attr,
        }
        .into());
    }

    let declared = node_type.attrs();
    let mut unknown: Vec<String> = tagged
        .attrs
        .keys()
        .filter(|key| !declared.contains(&key.as_str()) && !POSITION_KEYS.contains(&key.as_str()))
        .cloned()
        .collect();
    if unknown.is_empty() {
        return Ok(());
    }

    unknown.sort();
    Err(DecodeError::UnknownAttributes {
        node: node_type,
        keys: unknown,
    })
}

fn decode_all(maps: &[TaggedMap]) -> Result<Vec<Node>, DecodeError> {
    maps.iter().map(decode_node).collect()
}

fn decode_boxed(map: &TaggedMap) -> Result<Box<Node>, DecodeError> {
    decode_node(map).map(Box::new)
}

fn decode_var(tagged: &Tagged<'_>) -> Result<VarNode, DecodeError> {
    Ok(VarNode {
        name: tagged.text("name")?.to_string(),
    })
}

fn decode_unbind(tagged: &Tagged<'_>) -> Result<UnbindNode, DecodeError> {
    Ok(UnbindNode {
        name: tagged.text("name")?.to_string(),
    })
}

fn decode_binding(tagged: &Tagged<'_>) -> Result<BindingNode, DecodeError> {
    Ok(BindingNode {
        name: tagged.text("name")?.to_string(),
        value: decode_boxed(tagged.node("value")?)?,
    })
}

fn decode_binop(tagged: &Tagged<'_>) -> Result<BinOpNode, DecodeError> {
    Ok(BinOpNode {
        lhs: decode_boxed(tagged.node("lhs")?)?,
        rhs: decode_boxed(tagged.node("rhs")?)?,
    })
}

fn decode_command(node_type: NodeType, tagged: &Tagged<'_>) -> Result<CommandNode, DecodeError> {
    let mut command = CommandNode::new(decode_all(tagged.nodes("args")?)?);
    for &attr in node_type.defaulted_attrs() {
        if tagged.optional(attr).is_none() {
            continue;
        }
        match attr {
            "stdin" => command.stdin = decode_boxed(tagged.node(attr)?)?,
            "stdout" => command.stdout = decode_boxed(tagged.node(attr)?)?,
            "stderr" => command.stderr = decode_boxed(tagged.node(attr)?)?,
            "background" => command.background = tagged.flag(attr, false)?,
            _ => {}
        }
    }
    Ok(command)
}

fn decode_scope(tagged: &Tagged<'_>) -> Result<Scope, DecodeError> {
    Scope::parse(tagged.text("scope")?).ok_or_else(|| {
        DecodeError::Shape(ShapeError::InvalidAttribute {
            node: tagged.tag.to_string(),
            attr: "scope",
            expected: "\"local\" or \"global\"",
        })
    })
}

fn decode_position(tagged: &Tagged<'_>) -> Result<Option<Position>, DecodeError> {
    let line = tagged.optional("lineno");
    let column = tagged.optional("column");
    if line.is_none() && column.is_none() {
        return Ok(None);
    }

    let number = |attr: &'static str, value: Option<&serde_json::Value>| -> Result<usize, DecodeError> {
        match value {
            None => Ok(1),
            Some(value) => value
                .as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .ok_or_else(|| {
                    DecodeError::Shape(ShapeError::InvalidAttribute {
                        node: tagged.tag.to_string(),
                        attr,
                        expected: "a non-negative integer",
                    })
                }),
        }
    };

    Ok(Some(Position {
        line: number("lineno", line)?,
        column: number("column", column)?,
    }))
}
