//! Borrowed view over one tagged map
//!
//! Decoding and every dialect generator read maps through [`Tagged`], so a
//! hand-built map is checked the same way wherever it is consumed.

use serde_json::{Map, Value};

use crate::ast::types::NodeType;
use crate::codec::types::ShapeError;

/// Tagged-map form of a node: `{TypeName: {attr: value, ...}}`
pub type TaggedMap = Value;

/// Attribute body of a tagged map
pub type Attrs = Map<String, Value>;

#[derive(Debug, Clone, Copy)]
pub struct Tagged<'a> {
    pub tag: &'a str,
    pub attrs: &'a Attrs,
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

impl<'a> Tagged<'a> {
    /// Split a map into its sole tag and its attribute body
    pub fn parse(map: &'a TaggedMap) -> Result<Self, ShapeError> {
        let object = map.as_object().ok_or_else(|| {
            ShapeError::Malformed(format!("expected a single-key object, found {}", kind_of(map)))
        })?;

        let mut entries = object.iter();
        match (entries.next(), entries.next()) {
            (Some((tag, body)), None) => {
                let attrs = body.as_object().ok_or_else(|| {
                    ShapeError::Malformed(format!(
                        "attributes of '{}' must be an object, found {}",
                        tag,
                        kind_of(body)
                    ))
                })?;
                Ok(Self { tag: tag.as_str(), attrs })
            }
            _ => Err(ShapeError::Malformed(format!(
                "expected exactly one top-level key, found {}",
                object.len()
            ))),
        }
    }

    /// Tag of a map without validating its body
    pub fn tag_of(map: &TaggedMap) -> Option<&str> {
        let object = map.as_object()?;
        if object.len() != 1 {
            return None;
        }
        object.keys().next().map(String::as_str)
    }

    pub fn node_type(&self) -> Option<NodeType> {
        NodeType::lookup(self.tag)
    }

    pub fn optional(&self, attr: &'static str) -> Option<&'a Value> {
        self.attrs.get(attr)
    }

    pub fn get(&self, attr: &'static str) -> Result<&'a Value, ShapeError> {
        self.attrs.get(attr).ok_or_else(|| ShapeError::MissingAttribute {
            node: self.tag.to_string(),
            attr,
        })
    }

    fn invalid(&self, attr: &'static str, expected: &'static str) -> ShapeError {
        ShapeError::InvalidAttribute {
            node: self.tag.to_string(),
            attr,
            expected,
        }
    }

    /// A nested tagged map
    pub fn node(&self, attr: &'static str) -> Result<&'a TaggedMap, ShapeError> {
        let value = self.get(attr)?;
        if value.is_object() {
            Ok(value)
        } else {
            Err(self.invalid(attr, "a tagged map"))
        }
    }

    /// A list of tagged maps
    pub fn nodes(&self, attr: &'static str) -> Result<&'a [TaggedMap], ShapeError> {
        self.get(attr)?
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| self.invalid(attr, "a list of tagged maps"))
    }

    /// A list of tagged maps; an omitted attribute reads as empty
    pub fn optional_nodes(&self, attr: &'static str) -> Result<&'a [TaggedMap], ShapeError> {
        match self.optional(attr) {
            None => Ok(&[]),
            Some(_) => self.nodes(attr),
        }
    }

    pub fn text(&self, attr: &'static str) -> Result<&'a str, ShapeError> {
        self.get(attr)?
            .as_str()
            .ok_or_else(|| self.invalid(attr, "a string"))
    }

    /// A boolean flag; an omitted attribute reads as `default`
    pub fn flag(&self, attr: &'static str, default: bool) -> Result<bool, ShapeError> {
        match self.optional(attr) {
            None => Ok(default),
            Some(value) => value.as_bool().ok_or_else(|| self.invalid(attr, "a boolean")),
        }
    }
}
