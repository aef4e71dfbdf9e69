//! Constants shared by the dialect generators

use serde_json::json;

use crate::ast::types::NodeType;
use crate::codec::tagged::TaggedMap;

lazy_static::lazy_static! {
    /// Encoded stream sentinels. A redirection equal to its sentinel is
    /// the default and is not rendered.
    pub static ref STDIN_MAP: TaggedMap = json!({"StdIn": {}});
    pub static ref STDOUT_MAP: TaggedMap = json!({"StdOut": {}});
    pub static ref STDERR_MAP: TaggedMap = json!({"StdErr": {}});
}

/// Body indentation unit for bash blocks
pub const BASH_INDENT: &str = "  ";

/// Body indentation unit for xonsh blocks
pub const XONSH_INDENT: &str = "    ";

/// Body indentation unit for fish blocks (fish_indent's width)
pub const FISH_INDENT: &str = "    ";

/// Device path a stream sentinel renders as when it is used as a value,
/// e.g. `stderr` redirected to `StdOut`.
pub fn stream_device(node_type: NodeType) -> Option<&'static str> {
    if !node_type.is_stream() {
        return None;
    }
    Some(match node_type {
        NodeType::StdIn => "/dev/stdin",
        NodeType::StdOut => "/dev/stdout",
        _ => "/dev/stderr",
    })
}
