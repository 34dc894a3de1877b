//! Lexer and parser for the placeholder language embedded in SQL templates.
//!
//! A template is ordinary SQL text with these additions:
//!
//! - `$N`: an indexed bind-var referencing the N-th declared argument.
//! - `?`: a positional bind-var; occurrences are numbered in textual order.
//! - `#name(arg, ...)`: a function call with literal arguments.
//! - `#nameN`: shorthand for `#name(N)`.
//! - `#name`: a bare marker, substituted with an index by `#join`.
//!
//! `$$` and `??` are literal text, and quoted spans (`'...'`, `"..."`,
//! `` `...` ``) are copied verbatim.
//!
//! # Example
//!
//! ```
//! use sqlseg::syntax::{parse, Expr};
//!
//! let clause = parse("SELECT #c1 FROM #t1 WHERE id = $1").unwrap();
//! assert!(matches!(clause.exprs[1], Expr::FuncCall(_)));
//! assert!(matches!(clause.exprs.last(), Some(Expr::BindVar(_))));
//! ```

mod ast;
mod parser;
mod pos;
mod scanner;
mod token;

pub use ast::{BindVarExpr, BindVarStyle, Clause, Expr, FuncCallExpr, FuncExpr, PlainExpr};
pub use parser::parse;
pub use pos::Pos;
