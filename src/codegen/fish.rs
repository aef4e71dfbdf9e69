//! Fish code generation
//!
//! Blocks are keyword-delimited (`if ... end`, `for ... end`,
//! `function ... end`) with a 4-space indent. Variables are always read as
//! `$name` and written with `set`, which is also where assignment scope
//! becomes visible: `set -l` for local and `set -g` for global bindings.

use crate::ast::types::{NodeType, Scope};
use crate::codec::tagged::{Tagged, TaggedMap};
use crate::codec::types::ShapeError;
use crate::codegen::constants::{stream_device, FISH_INDENT, STDERR_MAP, STDIN_MAP, STDOUT_MAP};
use crate::codegen::types::{Dialect, GenerateError, Generator, Tree};
use crate::codegen::{dispatch, generate, indent_block, loop_target, redirect_target, LoopTarget};

/// Converts tagged maps to fish code
#[derive(Debug, Clone, Copy, Default)]
pub struct FishGenerator;

/// Converts a tree to fish
pub fn to_fish<'a>(tree: impl Into<Tree<'a>>) -> Result<String, GenerateError> {
    generate(Dialect::Fish, tree)
}

impl Generator for FishGenerator {
    fn dialect(&self) -> Dialect {
        Dialect::Fish
    }

    fn visit(&self, map: &TaggedMap) -> Result<String, GenerateError> {
        let (node_type, tagged) = dispatch(Dialect::Fish, map)?;
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
            NodeType::CapturedCommand => {
                // fish rejects background jobs inside a command substitution
                if tagged.flag("background", false)? {
                    return Err(GenerateError::NotImplemented {
                        dialect: Dialect::Fish,
                        construct: "backgrounded CapturedCommand".to_string(),
                    });
                }
                Ok(format!("({})", self.command_line(&tagged)?))
            }
            NodeType::And => self.binop(&tagged, "&&"),
            NodeType::Or => self.binop(&tagged, "||"),
            NodeType::Not => Ok(format!("not {}", self.visit(tagged.node("node")?)?)),
            NodeType::Statement => Ok(format!("{}\n", self.visit(tagged.node("node")?)?)),
            NodeType::Assign => {
                let flag = match assign_scope(&tagged)? {
                    Scope::Local => "-l",
                    Scope::Global => "-g",
                };
                Ok(format!(
                    "set {} {} {}\n",
                    flag,
                    tagged.text("name")?,
                    self.visit(tagged.node("value")?)?
                ))
            }
            NodeType::EnvAssign => Ok(format!(
                "set -gx {} {}\n",
                tagged.text("name")?,
                self.visit(tagged.node("value")?)?
            )),
            NodeType::Delete | NodeType::EnvDelete => {
                Ok(format!("set -e {}\n", tagged.text("name")?))
            }
            NodeType::AliasAssign => Ok(format!(
                "alias {} {}\n",
                tagged.text("name")?,
                self.visit(tagged.node("value")?)?
            )),
            NodeType::AliasDelete => Ok(format!("functions -e {}\n", tagged.text("name")?)),
            NodeType::Pass => Ok("true\n".to_string()),
            NodeType::If => self.visit_if(&tagged),
            NodeType::For => self.visit_for(&tagged),
            NodeType::Function => Ok(format!(
                "function {}\n{}end\n",
                tagged.text("name")?,
                self.block(tagged.nodes("body")?)?
            )),
        }
    }
}

fn assign_scope(tagged: &Tagged<'_>) -> Result<Scope, GenerateError> {
    Scope::parse(tagged.text("scope")?).ok_or_else(|| {
        GenerateError::Shape(ShapeError::InvalidAttribute {
            node: tagged.tag.to_string(),
            attr: "scope",
            expected: "\"local\" or \"global\"",
        })
    })
}

impl FishGenerator {
    /// fish accepts empty blocks, so an empty body stays empty
    fn block(&self, maps: &[TaggedMap]) -> Result<String, GenerateError> {
        Ok(indent_block(&self.visit_all(maps)?.concat(), FISH_INDENT))
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
            line.push_str(" &");
        }
        Ok(line)
    }

    fn visit_if(&self, tagged: &Tagged<'_>) -> Result<String, GenerateError> {
        let mut out = format!("if {}\n", self.visit(tagged.node("test")?)?);
        out.push_str(&self.block(tagged.nodes("body")?)?);

        let orelse = tagged.optional_nodes("orelse")?;
        match orelse {
            [] => out.push_str("end\n"),
            [only] if Tagged::tag_of(only) == Some("If") => {
                out.push_str("else ");
                out.push_str(&self.visit(only)?);
            }
            _ => {
                out.push_str("else\n");
                out.push_str(&self.block(orelse)?);
                out.push_str("end\n");
            }
        }
        Ok(out)
    }

    fn visit_for(&self, tagged: &Tagged<'_>) -> Result<String, GenerateError> {
        // fish loop variables are plain names either way
        let target = match loop_target(Dialect::Fish, tagged)? {
            LoopTarget::Var(name) | LoopTarget::EnvVar(name) => name,
        };
        Ok(format!(
            "for {} in {}\n{}end\n",
            target,
            self.visit(tagged.node("iter")?)?,
            self.block(tagged.nodes("body")?)?
        ))
    }
}
