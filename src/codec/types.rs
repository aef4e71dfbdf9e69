//! Codec error types

use thiserror::Error;

use crate::ast::types::NodeType;

/// A tagged map (or one of its attributes) does not have the expected shape
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    #[error("malformed tagged map: {0}")]
    Malformed(String),

    #[error("node {node} is missing attribute '{attr}'")]
    MissingAttribute { node: String, attr: &'static str },

    #[error("attribute '{attr}' of node {node} must be {expected}")]
    InvalidAttribute {
        node: String,
        attr: &'static str,
        expected: &'static str,
    },
}

/// Decoding a tagged map into a node tree failed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("unsupported node: '{tag}'")]
    UnsupportedNode { tag: String },

    #[error("unknown attributes of node {node}: {}", .keys.join(", "))]
    UnknownAttributes { node: NodeType, keys: Vec<String> },

    #[error(transparent)]
    Shape(#[from] ShapeError),
}
