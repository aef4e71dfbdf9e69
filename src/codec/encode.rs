//! Node tree → tagged map

use serde_json::{Map, Value};

use crate::ast::types::{AttrValue, Node};
use crate::codec::tagged::TaggedMap;

/// Encode a node tree into its tagged-map form.
///
/// The tag is the runtime node type, so shape-sharing types (`And`/`Or`,
/// `Command`/`CapturedCommand`) still get distinct keys. Position metadata
/// is not encoded.
pub fn encode(node: &Node) -> TaggedMap {
    let mut attrs = Map::new();
    for (name, value) in node.attributes() {
        attrs.insert(name.to_string(), encode_attr(value));
    }

    let mut map = Map::new();
    map.insert(node.node_type().name().to_string(), Value::Object(attrs));
    Value::Object(map)
}

fn encode_attr(value: AttrValue<'_>) -> Value {
    match value {
        AttrValue::Node(node) => encode(node),
        AttrValue::Nodes(nodes) => Value::Array(nodes.iter().map(encode).collect()),
        AttrValue::Text(text) => Value::String(text.to_string()),
        AttrValue::Bool(flag) => Value::Bool(flag),
        AttrValue::Scope(scope) => Value::String(scope.as_str().to_string()),
    }
}
