use std::fmt;

use super::Pos;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Eof,
    /// Text copied verbatim into the output, quoted spans included.
    Plain,
    /// A bind-var marker, `$` or `?`.
    Ref,
    Hash,
    Name,
    Literal,
    LParen,
    RParen,
    Comma,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Eof => "end of input",
            Self::Plain => "plain text",
            Self::Ref => "bind-var",
            Self::Hash => "'#'",
            Self::Name => "name",
            Self::Literal => "literal",
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::Comma => "','",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LitKind {
    Int,
    Float,
    String,
    Bool,
    Nil,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Token<'a> {
    pub kind: TokenKind,
    pub lit_kind: LitKind,
    pub lit: &'a str,
    /// Unterminated quote or unclassifiable function argument.
    pub bad: bool,
    pub pos: Pos,
}

impl Token<'_> {
    /// The literal text with surrounding quotes removed and doubled quotes collapsed.
    pub fn unquoted(&self) -> String {
        let mut chars = self.lit.chars();
        match (self.lit_kind, chars.next(), chars.next_back()) {
            (LitKind::String, Some(open @ ('\'' | '"')), Some(close)) if open == close => {
                let inner = &self.lit[1..self.lit.len() - 1];
                let quote = open.to_string();
                inner.replace(&quote.repeat(2), &quote)
            }
            _ => self.lit.to_string(),
        }
    }
}
