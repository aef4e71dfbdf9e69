//! Abstract Syntax Tree (AST) Types for a generic shell
//!
//! This module defines the dialect-neutral node grammar. Nodes are plain
//! data: code generators never read them directly, they consume the
//! tagged-map encoding produced by [`crate::codec`].
//!
//! Architecture:
//!   Node tree → encode → Tagged map → Dialect generator → Source text

pub mod types;
