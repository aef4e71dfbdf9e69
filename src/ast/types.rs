//! Abstract Syntax Tree (AST) Types for a generic shell
//!
//! One closed enum of node kinds, one payload struct per shape. Payload
//! structs are built with named fields, so a node can only ever carry the
//! attributes its type declares.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;

use crate::codec::types::DecodeError;

// =============================================================================
// BASE TYPES
// =============================================================================

/// Source position attached to a node. Never part of node equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Default for Position {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

/// Binding scope of a plain variable assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Local,
    Global,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Global => "global",
        }
    }

    /// Parse scope from its wire name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "local" => Some(Self::Local),
            "global" => Some(Self::Global),
            _ => None,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// NODE TYPES (the wire tags)
// =============================================================================

/// Type tag of a node. The name of each variant is its tagged-map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Script,
    Comment,
    String,
    RawString,
    Var,
    EnvVar,
    StdIn,
    StdOut,
    StdErr,
    Command,
    CapturedCommand,
    And,
    Or,
    Not,
    Statement,
    Assign,
    EnvAssign,
    Delete,
    EnvDelete,
    AliasAssign,
    AliasDelete,
    Pass,
    If,
    For,
    Function,
}

lazy_static::lazy_static! {
    /// Every node type keyed by tag, in catalogue order
    static ref NODE_TYPES: IndexMap<&'static str, NodeType> = NodeType::ALL
        .iter()
        .map(|t| (t.name(), *t))
        .collect();
}

impl NodeType {
    pub const ALL: [NodeType; 25] = [
        Self::Script,
        Self::Comment,
        Self::String,
        Self::RawString,
        Self::Var,
        Self::EnvVar,
        Self::StdIn,
        Self::StdOut,
        Self::StdErr,
        Self::Command,
        Self::CapturedCommand,
        Self::And,
        Self::Or,
        Self::Not,
        Self::Statement,
        Self::Assign,
        Self::EnvAssign,
        Self::Delete,
        Self::EnvDelete,
        Self::AliasAssign,
        Self::AliasDelete,
        Self::Pass,
        Self::If,
        Self::For,
        Self::Function,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Script => "Script",
            Self::Comment => "Comment",
            Self::String => "String",
            Self::RawString => "RawString",
            Self::Var => "Var",
            Self::EnvVar => "EnvVar",
            Self::StdIn => "StdIn",
            Self::StdOut => "StdOut",
            Self::StdErr => "StdErr",
            Self::Command => "Command",
            Self::CapturedCommand => "CapturedCommand",
            Self::And => "And",
            Self::Or => "Or",
            Self::Not => "Not",
            Self::Statement => "Statement",
            Self::Assign => "Assign",
            Self::EnvAssign => "EnvAssign",
            Self::Delete => "Delete",
            Self::EnvDelete => "EnvDelete",
            Self::AliasAssign => "AliasAssign",
            Self::AliasDelete => "AliasDelete",
            Self::Pass => "Pass",
            Self::If => "If",
            Self::For => "For",
            Self::Function => "Function",
        }
    }

    /// Look up a node type by its tag
    pub fn lookup(tag: &str) -> Option<Self> {
        NODE_TYPES.get(tag).copied()
    }

    /// Declared attribute names, in declaration order
    pub fn attrs(&self) -> &'static [&'static str] {
        match self {
            Self::Script => &["body"],
            Self::Comment | Self::RawString => &["value"],
            Self::String => &["parts"],
            Self::Var | Self::EnvVar => &["name"],
            Self::StdIn | Self::StdOut | Self::StdErr | Self::Pass => &[],
            Self::Command | Self::CapturedCommand => {
                &["args", "stdin", "stdout", "stderr", "background"]
            }
            Self::And | Self::Or => &["lhs", "rhs"],
            Self::Not | Self::Statement => &["node"],
            Self::Assign => &["name", "value", "scope"],
            Self::EnvAssign | Self::AliasAssign => &["name", "value"],
            Self::Delete | Self::EnvDelete | Self::AliasDelete => &["name"],
            Self::If => &["test", "body", "orelse"],
            Self::For => &["target", "iter", "body"],
            Self::Function => &["name", "body"],
        }
    }

    /// Attributes a tagged map must always carry
    pub fn required_attrs(&self) -> impl Iterator<Item = &'static str> {
        let defaulted = self.defaulted_attrs();
        self.attrs().iter().copied().filter(move |attr| !defaulted.contains(attr))
    }

    /// Attributes that fall back to a default when omitted
    pub fn defaulted_attrs(&self) -> &'static [&'static str] {
        match self {
            Self::Command | Self::CapturedCommand => &["stdin", "stdout", "stderr", "background"],
            _ => &[],
        }
    }

    /// Stream sentinels mark an unredirected stream
    pub fn is_stream(&self) -> bool {
        matches!(self, Self::StdIn | Self::StdOut | Self::StdErr)
    }
}

impl FromStr for NodeType {
    type Err = DecodeError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Self::lookup(tag).ok_or_else(|| DecodeError::UnsupportedNode { tag: tag.to_string() })
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// NODES
// =============================================================================

/// A node of the tree: its kind plus optional source position.
///
/// Equality compares the kind only, so two trees built at different
/// positions are still equal.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub position: Option<Position>,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl From<NodeKind> for Node {
    fn from(kind: NodeKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let options = crate::pretty::PrettyOptions::default();
        f.write_str(&crate::pretty::pformat_node(self, &options.indent))
    }
}

/// Union of all node kinds
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Script(ScriptNode),
    Comment(CommentNode),
    String(StringNode),
    RawString(RawStringNode),
    Var(VarNode),
    EnvVar(VarNode),
    StdIn,
    StdOut,
    StdErr,
    Command(CommandNode),
    CapturedCommand(CommandNode),
    And(BinOpNode),
    Or(BinOpNode),
    Not(NotNode),
    Statement(StatementNode),
    Assign(AssignNode),
    EnvAssign(BindingNode),
    Delete(UnbindNode),
    EnvDelete(UnbindNode),
    AliasAssign(BindingNode),
    AliasDelete(UnbindNode),
    Pass,
    If(IfNode),
    For(ForNode),
    Function(FunctionNode),
}

/// Borrowed view of one attribute value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttrValue<'a> {
    Node(&'a Node),
    Nodes(&'a [Node]),
    Text(&'a str),
    Bool(bool),
    Scope(Scope),
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self { kind, position: None }
    }

    /// Attach a source position
    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.position = Some(Position { line, column });
        self
    }

    pub fn node_type(&self) -> NodeType {
        match &self.kind {
            NodeKind::Script(_) => NodeType::Script,
            NodeKind::Comment(_) => NodeType::Comment,
            NodeKind::String(_) => NodeType::String,
            NodeKind::RawString(_) => NodeType::RawString,
            NodeKind::Var(_) => NodeType::Var,
            NodeKind::EnvVar(_) => NodeType::EnvVar,
            NodeKind::StdIn => NodeType::StdIn,
            NodeKind::StdOut => NodeType::StdOut,
            NodeKind::StdErr => NodeType::StdErr,
            NodeKind::Command(_) => NodeType::Command,
            NodeKind::CapturedCommand(_) => NodeType::CapturedCommand,
            NodeKind::And(_) => NodeType::And,
            NodeKind::Or(_) => NodeType::Or,
            NodeKind::Not(_) => NodeType::Not,
            NodeKind::Statement(_) => NodeType::Statement,
            NodeKind::Assign(_) => NodeType::Assign,
            NodeKind::EnvAssign(_) => NodeType::EnvAssign,
            NodeKind::Delete(_) => NodeType::Delete,
            NodeKind::EnvDelete(_) => NodeType::EnvDelete,
            NodeKind::AliasAssign(_) => NodeType::AliasAssign,
            NodeKind::AliasDelete(_) => NodeType::AliasDelete,
            NodeKind::Pass => NodeType::Pass,
            NodeKind::If(_) => NodeType::If,
            NodeKind::For(_) => NodeType::For,
            NodeKind::Function(_) => NodeType::Function,
        }
    }

    /// Attribute values in the order `NodeType::attrs` declares them
    pub fn attributes(&self) -> Vec<(&'static str, AttrValue<'_>)> {
        match &self.kind {
            NodeKind::Script(n) => vec![("body", AttrValue::Nodes(&n.body))],
            NodeKind::Comment(n) => vec![("value", AttrValue::Text(&n.value))],
            NodeKind::String(n) => vec![("parts", AttrValue::Nodes(&n.parts))],
            NodeKind::RawString(n) => vec![("value", AttrValue::Text(&n.value))],
            NodeKind::Var(n) | NodeKind::EnvVar(n) => vec![("name", AttrValue::Text(&n.name))],
            NodeKind::StdIn | NodeKind::StdOut | NodeKind::StdErr | NodeKind::Pass => vec![],
            NodeKind::Command(n) | NodeKind::CapturedCommand(n) => vec![
                ("args", AttrValue::Nodes(&n.args)),
                ("stdin", AttrValue::Node(&n.stdin)),
                ("stdout", AttrValue::Node(&n.stdout)),
                ("stderr", AttrValue::Node(&n.stderr)),
                ("background", AttrValue::Bool(n.background)),
            ],
            NodeKind::And(n) | NodeKind::Or(n) => vec![
                ("lhs", AttrValue::Node(&n.lhs)),
                ("rhs", AttrValue::Node(&n.rhs)),
            ],
            NodeKind::Not(n) => vec![("node", AttrValue::Node(&n.node))],
            NodeKind::Statement(n) => vec![("node", AttrValue::Node(&n.node))],
            NodeKind::Assign(n) => vec![
                ("name", AttrValue::Text(&n.name)),
                ("value", AttrValue::Node(&n.value)),
                ("scope", AttrValue::Scope(n.scope)),
            ],
            NodeKind::EnvAssign(n) | NodeKind::AliasAssign(n) => vec![
                ("name", AttrValue::Text(&n.name)),
                ("value", AttrValue::Node(&n.value)),
            ],
            NodeKind::Delete(n) | NodeKind::EnvDelete(n) | NodeKind::AliasDelete(n) => {
                vec![("name", AttrValue::Text(&n.name))]
            }
            NodeKind::If(n) => vec![
                ("test", AttrValue::Node(&n.test)),
                ("body", AttrValue::Nodes(&n.body)),
                ("orelse", AttrValue::Nodes(&n.orelse)),
            ],
            NodeKind::For(n) => vec![
                ("target", AttrValue::Node(&n.target)),
                ("iter", AttrValue::Node(&n.iter)),
                ("body", AttrValue::Nodes(&n.body)),
            ],
            NodeKind::Function(n) => vec![
                ("name", AttrValue::Text(&n.name)),
                ("body", AttrValue::Nodes(&n.body)),
            ],
        }
    }
}

// =============================================================================
// EXPRESSIONS
// =============================================================================

/// Root node: a complete script
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptNode {
    pub body: Vec<Node>,
}

/// Unexecuted commentary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentNode {
    pub value: String,
}

/// Interpolated string: the parts concatenate
#[derive(Debug, Clone, PartialEq)]
pub struct StringNode {
    pub parts: Vec<Node>,
}

/// Literal text, no interpolation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawStringNode {
    pub value: String,
}

/// Variable or environment variable reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarNode {
    pub name: String,
}

/// Command invocation, streamed or captured
#[derive(Debug, Clone, PartialEq)]
pub struct CommandNode {
    pub args: Vec<Node>,
    /// Where stdin is read from (StdIn sentinel = unredirected)
    pub stdin: Box<Node>,
    /// Where stdout is written to (StdOut sentinel = unredirected)
    pub stdout: Box<Node>,
    /// Where stderr is written to (StdErr sentinel = unredirected)
    pub stderr: Box<Node>,
    /// Run in background?
    pub background: bool,
}

impl CommandNode {
    pub fn new(args: Vec<Node>) -> Self {
        Self {
            args,
            ..Default::default()
        }
    }
}

impl Default for CommandNode {
    fn default() -> Self {
        Self {
            args: Vec::new(),
            stdin: Box::new(AST::stdin()),
            stdout: Box::new(AST::stdout()),
            stderr: Box::new(AST::stderr()),
            background: false,
        }
    }
}

/// Logical binary operator; `And` and `Or` share this shape
#[derive(Debug, Clone, PartialEq)]
pub struct BinOpNode {
    pub lhs: Box<Node>,
    pub rhs: Box<Node>,
}

/// Logical negation
#[derive(Debug, Clone, PartialEq)]
pub struct NotNode {
    pub node: Box<Node>,
}

// =============================================================================
// STATEMENTS
// =============================================================================

/// An expression evaluated on its own line
#[derive(Debug, Clone, PartialEq)]
pub struct StatementNode {
    pub node: Box<Node>,
}

/// Plain variable assignment
#[derive(Debug, Clone, PartialEq)]
pub struct AssignNode {
    pub name: String,
    pub value: Box<Node>,
    pub scope: Scope,
}

/// Environment or alias binding
#[derive(Debug, Clone, PartialEq)]
pub struct BindingNode {
    pub name: String,
    pub value: Box<Node>,
}

/// Variable, environment variable or alias removal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnbindNode {
    pub name: String,
}

/// if / else-if / else. An `orelse` holding a single `If` is an else-if.
#[derive(Debug, Clone, PartialEq)]
pub struct IfNode {
    pub test: Box<Node>,
    pub body: Vec<Node>,
    pub orelse: Vec<Node>,
}

/// for TARGET in ITER
#[derive(Debug, Clone, PartialEq)]
pub struct ForNode {
    /// Loop variable; generators accept only `Var` or `EnvVar`
    pub target: Box<Node>,
    pub iter: Box<Node>,
    pub body: Vec<Node>,
}

/// Named block
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionNode {
    pub name: String,
    pub body: Vec<Node>,
}

// =============================================================================
// FACTORY FUNCTIONS (AST builders)
// =============================================================================

/// AST factory for building nodes
pub struct AST;

impl AST {
    pub fn script(body: Vec<Node>) -> Node {
        NodeKind::Script(ScriptNode { body }).into()
    }

    pub fn comment(value: impl Into<String>) -> Node {
        NodeKind::Comment(CommentNode { value: value.into() }).into()
    }

    pub fn string(parts: Vec<Node>) -> Node {
        NodeKind::String(StringNode { parts }).into()
    }

    pub fn raw(value: impl Into<String>) -> Node {
        NodeKind::RawString(RawStringNode { value: value.into() }).into()
    }

    pub fn var(name: impl Into<String>) -> Node {
        NodeKind::Var(VarNode { name: name.into() }).into()
    }

    pub fn env_var(name: impl Into<String>) -> Node {
        NodeKind::EnvVar(VarNode { name: name.into() }).into()
    }

    pub fn stdin() -> Node {
        NodeKind::StdIn.into()
    }

    pub fn stdout() -> Node {
        NodeKind::StdOut.into()
    }

    pub fn stderr() -> Node {
        NodeKind::StdErr.into()
    }

    pub fn command(args: Vec<Node>) -> Node {
        NodeKind::Command(CommandNode::new(args)).into()
    }

    pub fn captured_command(args: Vec<Node>) -> Node {
        NodeKind::CapturedCommand(CommandNode::new(args)).into()
    }

    pub fn and(lhs: Node, rhs: Node) -> Node {
        NodeKind::And(BinOpNode {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
        .into()
    }

    pub fn or(lhs: Node, rhs: Node) -> Node {
        NodeKind::Or(BinOpNode {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
        .into()
    }

    pub fn not(node: Node) -> Node {
        NodeKind::Not(NotNode { node: Box::new(node) }).into()
    }

    pub fn statement(node: Node) -> Node {
        NodeKind::Statement(StatementNode { node: Box::new(node) }).into()
    }

    pub fn assign(name: impl Into<String>, value: Node, scope: Scope) -> Node {
        NodeKind::Assign(AssignNode {
            name: name.into(),
            value: Box::new(value),
            scope,
        })
        .into()
    }

    pub fn env_assign(name: impl Into<String>, value: Node) -> Node {
        NodeKind::EnvAssign(BindingNode {
            name: name.into(),
            value: Box::new(value),
        })
        .into()
    }

    pub fn delete(name: impl Into<String>) -> Node {
        NodeKind::Delete(UnbindNode { name: name.into() }).into()
    }

    pub fn env_delete(name: impl Into<String>) -> Node {
        NodeKind::EnvDelete(UnbindNode { name: name.into() }).into()
    }

    pub fn alias_assign(name: impl Into<String>, value: Node) -> Node {
        NodeKind::AliasAssign(BindingNode {
            name: name.into(),
            value: Box::new(value),
        })
        .into()
    }

    pub fn alias_delete(name: impl Into<String>) -> Node {
        NodeKind::AliasDelete(UnbindNode { name: name.into() }).into()
    }

    pub fn pass() -> Node {
        NodeKind::Pass.into()
    }

    pub fn if_node(test: Node, body: Vec<Node>, orelse: Vec<Node>) -> Node {
        NodeKind::If(IfNode {
            test: Box::new(test),
            body,
            orelse,
        })
        .into()
    }

    pub fn for_node(target: Node, iter: Node, body: Vec<Node>) -> Node {
        NodeKind::For(ForNode {
            target: Box::new(target),
            iter: Box::new(iter),
            body,
        })
        .into()
    }

    pub fn function(name: impl Into<String>, body: Vec<Node>) -> Node {
        NodeKind::Function(FunctionNode {
            name: name.into(),
            body,
        })
        .into()
    }
}
