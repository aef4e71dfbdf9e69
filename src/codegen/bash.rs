//! Bash code generation
//!
//! Renders tagged maps as POSIX-style shell source. Blocks use a 2-space
//! indent; `If` chains collapse into `elif`.

use crate::ast::types::NodeType;
use crate::codec::tagged::{Tagged, TaggedMap};
use crate::codegen::constants::{stream_device, BASH_INDENT, STDERR_MAP, STDIN_MAP, STDOUT_MAP};
use crate::codegen::types::{Dialect, GenerateError, Generator, Tree};
use crate::codegen::{dispatch, generate, indent_block, loop_target, redirect_target, LoopTarget};

/// Converts tagged maps to bash code
#[derive(Debug, Clone, Copy, Default)]
pub struct BashGenerator;

/// Converts a tree to bash
pub fn to_bash<'a>(tree: impl Into<Tree<'a>>) -> Result<String, GenerateError> {
    generate(Dialect::Bash, tree)
}

impl Generator for BashGenerator {
    fn dialect(&self) -> Dialect {
        Dialect::Bash
    }

    fn visit(&self, map: &TaggedMap) -> Result<String, GenerateError> {
        let (node_type, tagged) = dispatch(Dialect::Bash, map)?;
        match node_type {
            NodeType::Script => Ok(self.visit_all(tagged.nodes("body")?)?.concat()),
            NodeType::Comment => Ok(format!("# {}\n", tagged.text("value")?)),
            NodeType::String => Ok(format!(
                "\"{}\"",
                self.visit_all(tagged.nodes("parts")?)?.concat()
            )),
            NodeType::RawString => Ok(tagged.text("value")?.to_string()),
            NodeType::Var | NodeType::EnvVar => Ok(format!("${}", tagged.text("name")?)),
            NodeType::StdIn | NodeType::StdOut | NodeType::StdErr => {
                Ok(stream_device(node_type).unwrap_or_default().to_string())
            }
            NodeType::Command => self.command_line(&tagged),
            NodeType::CapturedCommand => Ok(format!("$({})", self.command_line(&tagged)?)),
            NodeType::And => self.binop(&tagged, "&&"),
            NodeType::Or => self.binop(&tagged, "||"),
            NodeType::Not => Ok(format!("! {}", self.visit(tagged.node("node")?)?)),
            NodeType::Statement => Ok(format!("{}\n", self.visit(tagged.node("node")?)?)),
            NodeType::Assign => Ok(format!(
                "{}={}\n",
                tagged.text("name")?,
                self.visit(tagged.node("value")?)?
            )),
            NodeType::EnvAssign => Ok(format!(
                "export {}={}\n",
                tagged.text("name")?,
                self.visit(tagged.node("value")?)?
            )),
            NodeType::Delete | NodeType::EnvDelete => {
                Ok(format!("unset {}\n", tagged.text("name")?))
            }
            NodeType::AliasAssign => Ok(format!(
                "alias {}={}\n",
                tagged.text("name")?,
                self.visit(tagged.node("value")?)?
            )),
            NodeType::AliasDelete => Ok(format!("unalias {}\n", tagged.text("name")?)),
            NodeType::Pass => Ok(":\n".to_string()),
            NodeType::If => self.visit_if(&tagged),
            NodeType::For => self.visit_for(&tagged),
            NodeType::Function => Ok(format!(
                "function {} {{\n{}}}\n",
                tagged.text("name")?,
                self.block(tagged.nodes("body")?)?
            )),
        }
    }
}

impl BashGenerator {
    /// Indented block body; bash needs at least one command in a block
    fn block(&self, maps: &[TaggedMap]) -> Result<String, GenerateError> {
        if maps.is_empty() {
            return Ok(indent_block(":\n", BASH_INDENT));
        }
        Ok(indent_block(&self.visit_all(maps)?.concat(), BASH_INDENT))
    }

    fn binop(&self, tagged: &Tagged<'_>, op: &str) -> Result<String, GenerateError> {
        Ok(format!(
            "{} {} {}",
            self.visit(tagged.node("lhs")?)?,
            op,
            self.visit(tagged.node("rhs")?)?
        ))
    }

    fn command_line(&self, tagged: &Tagged<'_>) -> Result<String, GenerateError> {
        let mut line = self.visit_all(tagged.nodes("args")?)?.join(" ");
        if let Some(target) = redirect_target(tagged, "stderr", &STDERR_MAP) {
            line.push_str(" 2> ");
            line.push_str(&self.visit(target)?);
        }
        if let Some(target) = redirect_target(tagged, "stdout", &STDOUT_MAP) {
            line.push_str(" > ");
            line.push_str(&self.visit(target)?);
        }
        if let Some(target) = redirect_target(tagged, "stdin", &STDIN_MAP) {
            line.push_str(" < ");
            line.push_str(&self.visit(target)?);
        }
        if tagged.flag("background", false)? {
            line.push_str("  &");
        }
        Ok(line)
    }

    fn visit_if(&self, tagged: &Tagged<'_>) -> Result<String, GenerateError> {
        let mut out = format!("if {}; then\n", self.visit(tagged.node("test")?)?);
        out.push_str(&self.block(tagged.nodes("body")?)?);

        let orelse = tagged.optional_nodes("orelse")?;
        match orelse {
            [] => out.push_str("fi\n"),
            [only] if Tagged::tag_of(only) == Some("If") => {
                out.push_str("el");
                out.push_str(&self.visit(only)?);
            }
            _ => {
                out.push_str("else\n");
                out.push_str(&self.block(orelse)?);
                out.push_str("fi\n");
            }
        }
        Ok(out)
    }

    fn visit_for(&self, tagged: &Tagged<'_>) -> Result<String, GenerateError> {
        let target = match loop_target(Dialect::Bash, tagged)? {
            LoopTarget::Var(name) => name.to_string(),
            LoopTarget::EnvVar(name) => format!("${}", name),
        };
        Ok(format!(
            "for {} in {}; do\n{}done\n",
            target,
            self.visit(tagged.node("iter")?)?,
            self.block(tagged.nodes("body")?)?
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::types::{CommandNode, Node, NodeKind, Scope, AST};
    use rstest::rstest;
    use serde_json::json;

    fn v(name: &str) -> Node {
        AST::var(name)
    }

    fn s(text: &str) -> Node {
        AST::string(vec![AST::raw(text)])
    }

    #[rstest]
    #[case::empty_script(AST::script(vec![]), "")]
    #[case::empty_comment(AST::comment(""), "# \n")]
    #[case::empty_string(AST::string(vec![]), "\"\"")]
    #[case::empty_rawstring(AST::raw(""), "")]
    #[case::empty_var(v("_"), "$_")]
    #[case::empty_envvar(AST::env_var("_"), "$_")]
    #[case::empty_command(AST::command(vec![AST::raw("echo")]), "echo")]
    #[case::empty_capturedcommand(AST::captured_command(vec![AST::raw("echo")]), "$(echo)")]
    #[case::empty_and(AST::and(v("_"), v("_")), "$_ && $_")]
    #[case::empty_or(AST::or(v("_"), v("_")), "$_ || $_")]
    #[case::empty_not(AST::not(v("_")), "! $_")]
    #[case::empty_assign(AST::assign("_", AST::string(vec![]), Scope::Global), "_=\"\"\n")]
    #[case::empty_delete(AST::delete("_"), "unset _\n")]
    #[case::empty_envassign(AST::env_assign("_", AST::string(vec![])), "export _=\"\"\n")]
    #[case::empty_envdelete(AST::env_delete("_"), "unset _\n")]
    #[case::empty_aliasassign(AST::alias_assign("_", AST::string(vec![])), "alias _=\"\"\n")]
    #[case::empty_aliasdelete(AST::alias_delete("_"), "unalias _\n")]
    #[case::empty_pass(AST::pass(), ":\n")]
    #[case::empty_if(AST::if_node(v("_"), vec![AST::pass()], vec![]), "if $_; then\n  :\nfi\n")]
    #[case::empty_for(
        AST::for_node(v("_"), AST::string(vec![]), vec![AST::pass()]),
        "for _ in \"\"; do\n  :\ndone\n"
    )]
    #[case::empty_function(AST::function("f", vec![AST::pass()]), "function f {\n  :\n}\n")]
    #[case::minimal_script(AST::script(vec![AST::pass()]), ":\n")]
    #[case::minimal_comment(AST::comment("I am a comment"), "# I am a comment\n")]
    #[case::minimal_string(s("cd"), "\"cd\"")]
    #[case::minimal_command(
        AST::command(vec![AST::raw("echo"), AST::raw("Wow"), AST::raw("Mom")]),
        "echo Wow Mom"
    )]
    #[case::minimal_and(AST::and(v("x"), v("y")), "$x && $y")]
    #[case::minimal_assign(AST::assign("x", s("cd"), Scope::Global), "x=\"cd\"\n")]
    #[case::minimal_local_assign(AST::assign("x", s("cd"), Scope::Local), "x=\"cd\"\n")]
    #[case::minimal_envassign(AST::env_assign("HOME", s("/path/to/home")), "export HOME=\"/path/to/home\"\n")]
    #[case::minimal_aliasassign(AST::alias_assign("gg", s("cd /path/to/home")), "alias gg=\"cd /path/to/home\"\n")]
    #[case::minimal_if(
        AST::if_node(v("x"), vec![AST::pass()], vec![AST::pass()]),
        "if $x; then\n  :\nelse\n  :\nfi\n"
    )]
    #[case::minimal_for(AST::for_node(v("x"), s("cd"), vec![AST::pass()]), "for x in \"cd\"; do\n  :\ndone\n")]
    #[case::minimal_function(
        AST::function("f", vec![AST::statement(v("x"))]),
        "function f {\n  $x\n}\n"
    )]
    #[case::compound_string(AST::string(vec![AST::raw("cd "), AST::env_var("HOME")]), "\"cd $HOME\"")]
    #[case::compound_command(
        AST::command(vec![AST::raw("echo"), AST::string(vec![AST::env_var("HOME")])]),
        "echo \"$HOME\""
    )]
    #[case::compound_capturedcommand(
        AST::captured_command(vec![AST::raw("echo"), AST::string(vec![AST::env_var("HOME")])]),
        "$(echo \"$HOME\")"
    )]
    #[case::compound_for_env_target(
        AST::for_node(AST::env_var("P"), s("a b"), vec![AST::comment("I am a comment")]),
        "for $P in \"a b\"; do\n  # I am a comment\ndone\n"
    )]
    fn test_to_bash(#[case] node: Node, #[case] expected: &str) {
        assert_eq!(to_bash(&node).unwrap(), expected);
    }

    #[test]
    fn test_compound_script() {
        let script = AST::script(vec![
            AST::comment("I am a comment"),
            AST::assign("x", s("cd"), Scope::Global),
            AST::if_node(v("x"), vec![AST::delete("x")], vec![]),
        ]);
        assert_eq!(
            to_bash(&script).unwrap(),
            "# I am a comment\nx=\"cd\"\nif $x; then\n  unset x\nfi\n"
        );
    }

    #[test]
    fn test_elif_chain_is_flat() {
        let node = AST::if_node(
            v("x"),
            vec![AST::delete("x"), AST::assign("x", s("cd"), Scope::Global)],
            vec![AST::if_node(
                v("y"),
                vec![AST::delete("y"), AST::assign("y", s("ls"), Scope::Global)],
                vec![AST::pass()],
            )],
        );
        assert_eq!(
            to_bash(&node).unwrap(),
            "if $x; then\n  unset x\n  x=\"cd\"\nelif $y; then\n  unset y\n  y=\"ls\"\nelse\n  :\nfi\n"
        );
    }

    #[test]
    fn test_orelse_with_if_among_others_is_nested() {
        let node = AST::if_node(
            v("x"),
            vec![AST::pass()],
            vec![
                AST::if_node(v("y"), vec![AST::pass()], vec![]),
                AST::pass(),
            ],
        );
        assert_eq!(
            to_bash(&node).unwrap(),
            "if $x; then\n  :\nelse\n  if $y; then\n    :\n  fi\n  :\nfi\n"
        );
    }

    #[test]
    fn test_indentation_compounds() {
        let node = AST::for_node(
            v("x"),
            AST::string(vec![AST::raw("ls "), AST::env_var("HOME")]),
            vec![AST::if_node(
                v("y"),
                vec![AST::statement(AST::command(vec![AST::raw("echo")]))],
                vec![],
            )],
        );
        assert_eq!(
            to_bash(&node).unwrap(),
            "for x in \"ls $HOME\"; do\n  if $y; then\n    echo\n  fi\ndone\n"
        );
    }

    #[test]
    fn test_blank_body_line_is_indented() {
        let node = AST::for_node(v("x"), AST::raw("a"), vec![AST::statement(AST::raw(""))]);
        assert_eq!(to_bash(&node).unwrap(), "for x in a; do\n  \ndone\n");
    }

    #[test]
    fn test_empty_block_renders_noop() {
        let node = AST::if_node(v("x"), vec![], vec![]);
        assert_eq!(to_bash(&node).unwrap(), "if $x; then\n  :\nfi\n");
        assert_eq!(
            to_bash(&AST::function("f", vec![])).unwrap(),
            "function f {\n  :\n}\n"
        );
    }

    #[test]
    fn test_default_redirections_are_elided() {
        let plain = AST::command(vec![AST::raw("ls")]);
        assert_eq!(to_bash(&plain).unwrap(), "ls");

        let to_file: Node = NodeKind::Command(CommandNode {
            args: vec![AST::raw("ls")],
            stdout: Box::new(AST::raw("out.txt")),
            ..Default::default()
        })
        .into();
        let text = to_bash(&to_file).unwrap();
        assert_eq!(text, "ls > out.txt");
        assert_eq!(text.matches('>').count(), 1);
    }

    #[test]
    fn test_all_redirections_and_background() {
        let node: Node = NodeKind::Command(CommandNode {
            args: vec![AST::raw("sort")],
            stdin: Box::new(AST::raw("in.txt")),
            stdout: Box::new(AST::raw("out.txt")),
            stderr: Box::new(AST::stdout()),
            background: true,
        })
        .into();
        assert_eq!(
            to_bash(&node).unwrap(),
            "sort 2> /dev/stdout > out.txt < in.txt  &"
        );
    }

    #[test]
    fn test_hand_built_command_without_streams() {
        let map = json!({"Command": {"args": [{"RawString": {"value": "ls"}}], "background": true}});
        assert_eq!(to_bash(&map).unwrap(), "ls  &");
    }

    #[test]
    fn test_hand_built_if_without_orelse() {
        let map = json!({"If": {"test": {"Var": {"name": "x"}}, "body": [{"Pass": {}}]}});
        assert_eq!(to_bash(&map).unwrap(), "if $x; then\n  :\nfi\n");
    }

    #[test]
    fn test_minimal_assign_scenario() {
        let map = json!({"Assign": {
            "name": "x",
            "value": {"String": {"parts": [{"RawString": {"value": "cd"}}]}},
            "scope": "global",
        }});
        assert_eq!(BashGenerator.visit(&map).unwrap(), "x=\"cd\"\n");
        assert_eq!(BashGenerator.dialect(), Dialect::Bash);
    }
}
