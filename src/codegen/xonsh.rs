//! Xonsh code generation
//!
//! Renders tagged maps as xonsh source: Python-style blocks with 4-space
//! indentation and colon-terminated headers; commands run in `![...]` and
//! captured commands in `$(...)`.

use crate::ast::types::NodeType;
use crate::codec::tagged::{Tagged, TaggedMap};
use crate::codegen::constants::{stream_device, STDERR_MAP, STDIN_MAP, STDOUT_MAP, XONSH_INDENT};
use crate::codegen::types::{Dialect, GenerateError, Generator, Tree};
use crate::codegen::{dispatch, generate, indent_block, loop_target, redirect_target, LoopTarget};

/// Converts tagged maps to xonsh code
#[derive(Debug, Clone, Copy, Default)]
pub struct XonshGenerator;

/// Converts a tree to xonsh
pub fn to_xonsh<'a>(tree: impl Into<Tree<'a>>) -> Result<String, GenerateError> {
    generate(Dialect::Xonsh, tree)
}

impl Generator for XonshGenerator {
    fn dialect(&self) -> Dialect {
        Dialect::Xonsh
    }

    fn visit(&self, map: &TaggedMap) -> Result<String, GenerateError> {
        let (node_type, tagged) = dispatch(Dialect::Xonsh, map)?;
        match node_type {
            NodeType::Script => Ok(self.visit_all(tagged.nodes("body")?)?.concat()),
            NodeType::Comment => Ok(format!("# {}\n", tagged.text("value")?)),
            NodeType::String => Ok(format!(
                "\"{}\"",
                self.visit_all(tagged.nodes("parts")?)?.concat()
            )),
            NodeType::RawString => Ok(tagged.text("value")?.to_string()),
            NodeType::Var => Ok(tagged.text("name")?.to_string()),
            NodeType::EnvVar => Ok(format!("${}", tagged.text("name")?)),
            NodeType::StdIn | NodeType::StdOut | NodeType::StdErr => {
                Ok(stream_device(node_type).unwrap_or_default().to_string())
            }
            NodeType::Command => Ok(format!("![{}]", self.command_line(&tagged)?)),
            NodeType::CapturedCommand => Ok(format!("$({})", self.command_line(&tagged)?)),
            NodeType::And => self.binop(&tagged, "and"),
            NodeType::Or => self.binop(&tagged, "or"),
            NodeType::Not => Ok(format!("not {}", self.visit(tagged.node("node")?)?)),
            NodeType::Statement => Ok(format!("{}\n", self.visit(tagged.node("node")?)?)),
            NodeType::Assign => Ok(format!(
                "{} = {}\n",
                tagged.text("name")?,
                self.visit(tagged.node("value")?)?
            )),
            NodeType::EnvAssign => Ok(format!(
                "${} = {}\n",
                tagged.text("name")?,
                self.visit(tagged.node("value")?)?
            )),
            NodeType::Delete => Ok(format!("del {}\n", tagged.text("name")?)),
            NodeType::EnvDelete => Ok(format!("del ${}\n", tagged.text("name")?)),
            NodeType::AliasAssign => Ok(format!(
                "aliases[\"{}\"] = {}\n",
                tagged.text("name")?,
                self.visit(tagged.node("value")?)?
            )),
            NodeType::AliasDelete => Ok(format!("del aliases[\"{}\"]\n", tagged.text("name")?)),
            NodeType::Pass => Ok("pass\n".to_string()),
            NodeType::If => self.visit_if(&tagged),
            NodeType::For => self.visit_for(&tagged),
            NodeType::Function => Ok(format!(
                "def {}():\n{}",
                tagged.text("name")?,
                self.block(tagged.nodes("body")?)?
            )),
        }
    }
}

impl XonshGenerator {
    fn block(&self, maps: &[TaggedMap]) -> Result<String, GenerateError> {
        if maps.is_empty() {
            return Ok(indent_block("pass\n", XONSH_INDENT));
        }
        Ok(indent_block(&self.visit_all(maps)?.concat(), XONSH_INDENT))
    }

    fn binop(&self, tagged: &Tagged<'_>, op: &str) -> Result<String, GenerateError> {
        Ok(format!(
            "{} {} {}",
            self.visit(tagged.node("lhs")?)?,
            op,
            self.visit(tagged.node("rhs")?)?
        ))
    }

    /// Command line without its execution bracket
    fn command_line(&self, tagged: &Tagged<'_>) -> Result<String, GenerateError> {
        let mut line = self.visit_all(tagged.nodes("args")?)?.join(" ");
        if let Some(target) = redirect_target(tagged, "stderr", &STDERR_MAP) {
            line.push_str(" e> ");
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
            line.push_str(" &");
        }
        Ok(line)
    }

    fn visit_if(&self, tagged: &Tagged<'_>) -> Result<String, GenerateError> {
        let mut out = format!("if {}:\n", self.visit(tagged.node("test")?)?);
        out.push_str(&self.block(tagged.nodes("body")?)?);

        let orelse = tagged.optional_nodes("orelse")?;
        match orelse {
            [] => {}
            [only] if Tagged::tag_of(only) == Some("If") => {
                out.push_str("el");
                out.push_str(&self.visit(only)?);
            }
            _ => {
                out.push_str("else:\n");
                out.push_str(&self.block(orelse)?);
            }
        }
        Ok(out)
    }

    fn visit_for(&self, tagged: &Tagged<'_>) -> Result<String, GenerateError> {
        let target = match loop_target(Dialect::Xonsh, tagged)? {
            LoopTarget::Var(name) => name.to_string(),
            LoopTarget::EnvVar(name) => format!("${}", name),
        };
        Ok(format!(
            "for {} in {}:\n{}",
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
    #[case::empty_var(v("_"), "_")]
    #[case::empty_envvar(AST::env_var("_"), "$_")]
    #[case::empty_command(AST::command(vec![AST::raw("echo")]), "![echo]")]
    #[case::empty_capturedcommand(AST::captured_command(vec![AST::raw("echo")]), "$(echo)")]
    #[case::empty_and(AST::and(v("_"), v("_")), "_ and _")]
    #[case::empty_or(AST::or(v("_"), v("_")), "_ or _")]
    #[case::empty_not(AST::not(v("_")), "not _")]
    #[case::empty_assign(AST::assign("_", AST::string(vec![]), Scope::Global), "_ = \"\"\n")]
    #[case::empty_delete(AST::delete("_"), "del _\n")]
    #[case::empty_envassign(AST::env_assign("_", AST::string(vec![])), "$_ = \"\"\n")]
    #[case::empty_envdelete(AST::env_delete("_"), "del $_\n")]
    #[case::empty_aliasassign(AST::alias_assign("_", AST::string(vec![])), "aliases[\"_\"] = \"\"\n")]
    #[case::empty_aliasdelete(AST::alias_delete("_"), "del aliases[\"_\"]\n")]
    #[case::empty_pass(AST::pass(), "pass\n")]
    #[case::empty_if(AST::if_node(v("_"), vec![AST::pass()], vec![]), "if _:\n    pass\n")]
    #[case::empty_for(
        AST::for_node(v("_"), AST::string(vec![]), vec![AST::pass()]),
        "for _ in \"\":\n    pass\n"
    )]
    #[case::empty_function(AST::function("f", vec![AST::pass()]), "def f():\n    pass\n")]
    #[case::minimal_script(AST::script(vec![AST::pass()]), "pass\n")]
    #[case::minimal_comment(AST::comment("I am a comment"), "# I am a comment\n")]
    #[case::minimal_string(s("cd"), "\"cd\"")]
    #[case::minimal_rawstring(AST::raw("ls"), "ls")]
    #[case::minimal_var(v("x"), "x")]
    #[case::minimal_envvar(AST::env_var("HOME"), "$HOME")]
    #[case::minimal_command(
        AST::command(vec![AST::raw("echo"), AST::raw("Wow"), AST::raw("Mom")]),
        "![echo Wow Mom]"
    )]
    #[case::minimal_capturedcommand(
        AST::captured_command(vec![AST::raw("echo"), AST::raw("Wow"), AST::raw("Mom")]),
        "$(echo Wow Mom)"
    )]
    #[case::minimal_and(AST::and(v("x"), v("y")), "x and y")]
    #[case::minimal_or(AST::or(v("x"), v("y")), "x or y")]
    #[case::minimal_not(AST::not(v("x")), "not x")]
    #[case::minimal_assign(AST::assign("x", s("cd"), Scope::Global), "x = \"cd\"\n")]
    #[case::minimal_delete(AST::delete("x"), "del x\n")]
    #[case::minimal_envassign(AST::env_assign("HOME", s("/path/to/home")), "$HOME = \"/path/to/home\"\n")]
    #[case::minimal_envdelete(AST::env_delete("HOME"), "del $HOME\n")]
    #[case::minimal_aliasassign(
        AST::alias_assign("gg", s("cd /path/to/home")),
        "aliases[\"gg\"] = \"cd /path/to/home\"\n"
    )]
    #[case::minimal_aliasdelete(AST::alias_delete("gg"), "del aliases[\"gg\"]\n")]
    #[case::minimal_if(
        AST::if_node(v("x"), vec![AST::pass()], vec![AST::pass()]),
        "if x:\n    pass\nelse:\n    pass\n"
    )]
    #[case::minimal_for(AST::for_node(v("x"), s("cd"), vec![AST::pass()]), "for x in \"cd\":\n    pass\n")]
    #[case::minimal_function(AST::function("f", vec![AST::statement(v("x"))]), "def f():\n    x\n")]
    #[case::compound_string(AST::string(vec![AST::raw("cd "), AST::env_var("HOME")]), "\"cd $HOME\"")]
    #[case::compound_command(
        AST::command(vec![AST::raw("echo"), AST::string(vec![AST::env_var("HOME")])]),
        "![echo \"$HOME\"]"
    )]
    #[case::compound_capturedcommand(
        AST::captured_command(vec![AST::raw("echo"), AST::string(vec![AST::env_var("HOME")])]),
        "$(echo \"$HOME\")"
    )]
    #[case::compound_for(
        AST::for_node(
            v("x"),
            AST::string(vec![AST::raw("ls "), AST::env_var("HOME")]),
            vec![AST::comment("I am a comment"), AST::assign("y", s("cd"), Scope::Global)],
        ),
        "for x in \"ls $HOME\":\n    # I am a comment\n    y = \"cd\"\n"
    )]
    #[case::compound_function(
        AST::function("f", vec![AST::comment("I am a comment"), AST::statement(v("x"))]),
        "def f():\n    # I am a comment\n    x\n"
    )]
    fn test_to_xonsh(#[case] node: Node, #[case] expected: &str) {
        assert_eq!(to_xonsh(&node).unwrap(), expected);
    }

    #[test]
    fn test_compound_script() {
        let script = AST::script(vec![
            AST::comment("I am a comment"),
            AST::assign("x", s("cd"), Scope::Global),
            AST::if_node(v("x"), vec![AST::delete("x")], vec![]),
        ]);
        assert_eq!(
            to_xonsh(&script).unwrap(),
            "# I am a comment\nx = \"cd\"\nif x:\n    del x\n"
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
            to_xonsh(&node).unwrap(),
            "if x:\n    del x\n    x = \"cd\"\nelif y:\n    del y\n    y = \"ls\"\nelse:\n    pass\n"
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
            to_xonsh(&node).unwrap(),
            "for x in \"ls $HOME\":\n    if y:\n        ![echo]\n"
        );
    }

    #[test]
    fn test_for_env_target() {
        let node = AST::for_node(AST::env_var("P"), s("a b"), vec![AST::pass()]);
        assert_eq!(to_xonsh(&node).unwrap(), "for $P in \"a b\":\n    pass\n");
    }

    #[test]
    fn test_redirections_inside_bracket() {
        let node: Node = NodeKind::Command(CommandNode {
            args: vec![AST::raw("sort")],
            stdin: Box::new(AST::raw("in.txt")),
            stdout: Box::new(AST::raw("out.txt")),
            stderr: Box::new(AST::raw("err.log")),
            background: true,
        })
        .into();
        assert_eq!(
            to_xonsh(&node).unwrap(),
            "![sort e> err.log > out.txt < in.txt &]"
        );
    }

    #[test]
    fn test_captured_command_with_redirect() {
        let node: Node = NodeKind::CapturedCommand(CommandNode {
            args: vec![AST::raw("ls")],
            stderr: Box::new(AST::stdout()),
            ..Default::default()
        })
        .into();
        assert_eq!(to_xonsh(&node).unwrap(), "$(ls e> /dev/stdout)");
    }

    #[test]
    fn test_captured_command_scenario() {
        let map = json!({"CapturedCommand": {"args": [{"RawString": {"value": "echo"}}]}});
        assert_eq!(XonshGenerator.visit(&map).unwrap(), "$(echo)");
    }
}
