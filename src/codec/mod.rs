//! Tagged-map codec
//!
//! Converts node trees to and from the single-key `{TypeName: {attrs}}`
//! form that every dialect generator consumes.

pub mod types;
pub mod tagged;
pub mod encode;
pub mod decode;

// Re-exports
pub use types::{DecodeError, ShapeError};
pub use tagged::{Attrs, Tagged, TaggedMap};
pub use encode::encode;
pub use decode::decode;
