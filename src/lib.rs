//! asht - a generic shell abstract syntax tree
//!
//! Build one dialect-neutral tree, encode it to the tagged-map interchange
//! form, and render it as bash, xonsh or fish source.

pub mod ast;
pub mod codec;
pub mod codegen;
pub mod pretty;

pub use ast::types::*;
pub use codec::{decode, encode, DecodeError, ShapeError, Tagged, TaggedMap};
pub use codegen::{generate, to_bash, to_fish, to_xonsh, Dialect, GenerateError, Generator, Tree};
pub use pretty::{pformat, pformat_map, pformat_node, PrettyOptions};
