use serde::{Deserialize, Serialize};

use super::Pos;

/// Placeholder style for bound arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindVarStyle {
    /// Inferred from the first marker of a build.
    #[default]
    Auto,
    /// `$1, $2, ...`
    Indexed,
    /// `?, ?, ...`
    Positional,
}

/// A parsed template: an ordered list of expressions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clause {
    pub exprs: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Plain(PlainExpr),
    /// `#name(args...)` or `#nameN`.
    FuncCall(FuncCallExpr),
    /// A bare `#name`, meaningful only inside `join` templates.
    Func(FuncExpr),
    BindVar(BindVarExpr),
}

impl Expr {
    pub fn pos(&self) -> Pos {
        match self {
            Self::Plain(e) => e.pos,
            Self::FuncCall(e) => e.pos,
            Self::Func(e) => e.pos,
            Self::BindVar(e) => e.pos,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlainExpr {
    pub text: String,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncCallExpr {
    pub name: String,
    pub args: Vec<String>,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncExpr {
    pub name: String,
    pub pos: Pos,
}

/// `$N` or `?`; `index` is 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct BindVarExpr {
    pub style: BindVarStyle,
    pub index: usize,
    pub pos: Pos,
}
