use super::ast::{BindVarExpr, BindVarStyle, Clause, Expr, FuncCallExpr, FuncExpr, PlainExpr};
use super::scanner::Scanner;
use super::token::{LitKind, Token, TokenKind};
use crate::error::{SegError, SegResult};

/// Parse a template into a [`Clause`].
///
/// The first bind-var marker fixes the style of this parse; `?` markers are
/// numbered 1, 2, 3... in textual order.
pub fn parse(input: &str) -> SegResult<Clause> {
    Parser::new(input).parse()
}

struct Parser<'a> {
    scanner: Scanner<'a>,
    next: Token<'a>,
    first_bind_var: Option<(BindVarStyle, Token<'a>)>,
    positional: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        let mut scanner = Scanner::new(input);
        let next = scanner.next_token();
        Self {
            scanner,
            next,
            first_bind_var: None,
            positional: 0,
        }
    }

    fn bump(&mut self) -> Token<'a> {
        let next = self.scanner.next_token();
        std::mem::replace(&mut self.next, next)
    }

    fn parse(mut self) -> SegResult<Clause> {
        let mut exprs = Vec::new();
        loop {
            let token = self.bump();
            match token.kind {
                TokenKind::Eof => return Ok(Clause { exprs }),
                TokenKind::Plain if token.bad => {
                    return Err(SegError::syntax(token.pos, "unterminated quoted text"));
                }
                TokenKind::Plain => exprs.push(Expr::Plain(PlainExpr {
                    text: token.lit.to_string(),
                    pos: token.pos,
                })),
                TokenKind::Ref => exprs.push(self.bind_var(token)?),
                TokenKind::Hash => exprs.push(self.func(token)?),
                kind => {
                    return Err(SegError::syntax(
                        token.pos,
                        format!("unexpected {kind} '{}'", token.lit),
                    ));
                }
            }
        }
    }

    fn bind_var(&mut self, marker: Token<'a>) -> SegResult<Expr> {
        let style = if marker.lit == "?" {
            BindVarStyle::Positional
        } else {
            BindVarStyle::Indexed
        };
        match self.first_bind_var {
            None => self.first_bind_var = Some((style, marker)),
            Some((first, first_marker)) if first != style => {
                return Err(SegError::MixedBindVarStyle {
                    first: format!("{} at {}", first_marker.lit, first_marker.pos),
                    second: format!("{} at {}", marker.lit, marker.pos),
                });
            }
            Some(_) => {}
        }

        let index = if style == BindVarStyle::Positional {
            self.positional += 1;
            self.positional
        } else {
            if self.next.kind != TokenKind::Literal || self.next.lit_kind != LitKind::Int {
                return Err(SegError::syntax(
                    marker.pos,
                    "'$' must be followed by a positive index",
                ));
            }
            let literal = self.bump();
            literal
                .lit
                .parse::<usize>()
                .map_err(|e| SegError::syntax(literal.pos, format!("bad index '{}': {e}", literal.lit)))?
        };

        Ok(Expr::BindVar(BindVarExpr {
            style,
            index,
            pos: marker.pos,
        }))
    }

    fn func(&mut self, hash: Token<'a>) -> SegResult<Expr> {
        let name = self.bump();
        if name.kind != TokenKind::Name {
            return Err(SegError::syntax(
                name.pos,
                format!("unexpected {} after '#', want function name", name.kind),
            ));
        }

        match self.next.kind {
            TokenKind::LParen => {
                self.bump();
                Ok(Expr::FuncCall(FuncCallExpr {
                    name: name.lit.to_string(),
                    args: self.func_args()?,
                    pos: hash.pos,
                }))
            }
            TokenKind::Literal => {
                let index = self.bump();
                Ok(Expr::FuncCall(FuncCallExpr {
                    name: name.lit.to_string(),
                    args: vec![index.lit.to_string()],
                    pos: hash.pos,
                }))
            }
            _ => Ok(Expr::Func(FuncExpr {
                name: name.lit.to_string(),
                pos: hash.pos,
            })),
        }
    }

    fn func_args(&mut self) -> SegResult<Vec<String>> {
        let mut args = Vec::new();
        if self.next.kind == TokenKind::RParen {
            self.bump();
            return Ok(args);
        }
        loop {
            let arg = self.bump();
            if arg.kind != TokenKind::Literal {
                return Err(SegError::syntax(
                    arg.pos,
                    format!("unexpected {}, want argument", arg.kind),
                ));
            }
            if arg.bad {
                return Err(SegError::syntax(
                    arg.pos,
                    format!("bad argument: {}", arg.lit),
                ));
            }
            args.push(arg.unquoted());

            let sep = self.bump();
            match sep.kind {
                TokenKind::Comma => {}
                TokenKind::RParen => return Ok(args),
                kind => {
                    return Err(SegError::syntax(
                        sep.pos,
                        format!("unexpected {kind}, want ',' or ')'"),
                    ));
                }
            }
        }
    }
}
