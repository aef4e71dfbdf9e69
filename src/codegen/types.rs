//! Code generation types
//!
//! Dialect selection, generator input and the generation error taxonomy.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::ast::types::Node;
use crate::codec::tagged::TaggedMap;
use crate::codec::types::ShapeError;

/// Target shell dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// POSIX-style shell
    Bash,
    /// Python-flavored interactive shell
    Xonsh,
    Fish,
}

impl Dialect {
    pub const ALL: [Dialect; 3] = [Self::Bash, Self::Xonsh, Self::Fish];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Bash => "bash",
            Self::Xonsh => "xonsh",
            Self::Fish => "fish",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bash" => Ok(Self::Bash),
            "xonsh" => Ok(Self::Xonsh),
            "fish" => Ok(Self::Fish),
            _ => Err(GenerateError::UnknownDialect(s.to_string())),
        }
    }
}

/// Generation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerateError {
    #[error("{dialect} does not support node '{tag}'")]
    UnsupportedConstruct { dialect: Dialect, tag: String },

    #[error(
        "{dialect}: for loop must assign to a variable name (Var) or environment variable name (EnvVar), found '{tag}'"
    )]
    InvalidLoopTarget { dialect: Dialect, tag: String },

    #[error("{dialect} does not implement {construct}")]
    NotImplemented { dialect: Dialect, construct: String },

    #[error("unknown dialect '{0}' (expected bash, xonsh or fish)")]
    UnknownDialect(String),

    #[error(transparent)]
    Shape(#[from] ShapeError),
}

/// Generator input: a node tree, or a tagged map built directly
#[derive(Debug, Clone, Copy)]
pub enum Tree<'a> {
    Node(&'a Node),
    Map(&'a TaggedMap),
}

impl<'a> From<&'a Node> for Tree<'a> {
    fn from(node: &'a Node) -> Self {
        Tree::Node(node)
    }
}

impl<'a> From<&'a TaggedMap> for Tree<'a> {
    fn from(map: &'a TaggedMap) -> Self {
        Tree::Map(map)
    }
}

/// Renders tagged maps as source text for one dialect
pub trait Generator {
    fn dialect(&self) -> Dialect;

    /// Render the subtree rooted at `map`
    fn visit(&self, map: &TaggedMap) -> Result<String, GenerateError>;

    fn visit_all(&self, maps: &[TaggedMap]) -> Result<Vec<String>, GenerateError> {
        maps.iter().map(|map| self.visit(map)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_from_str() {
        assert_eq!("bash".parse::<Dialect>().unwrap(), Dialect::Bash);
        assert_eq!("Xonsh".parse::<Dialect>().unwrap(), Dialect::Xonsh);
        assert_eq!("FISH".parse::<Dialect>().unwrap(), Dialect::Fish);
        assert_eq!(
            "zsh".parse::<Dialect>().unwrap_err(),
            GenerateError::UnknownDialect("zsh".to_string())
        );
    }

    #[test]
    fn test_dialect_names_round_trip() {
        for dialect in Dialect::ALL {
            assert_eq!(dialect.to_string().parse::<Dialect>().unwrap(), dialect);
        }
    }

    #[test]
    fn test_error_messages() {
        let err = GenerateError::UnsupportedConstruct {
            dialect: Dialect::Xonsh,
            tag: "Bogus".to_string(),
        };
        assert_eq!(err.to_string(), "xonsh does not support node 'Bogus'");

        let err = GenerateError::InvalidLoopTarget {
            dialect: Dialect::Bash,
            tag: "RawString".to_string(),
        };
        assert!(err.to_string().starts_with("bash: for loop must assign"));
    }
}
