use std::collections::VecDeque;

use super::Pos;
use super::token::{LitKind, Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Plain,
    Ref,
    Index,
    FuncName,
    FuncArgs,
    Done,
}

/// Splits a template into tokens.
///
/// The scanner never fails: malformed input produces tokens flagged `bad`,
/// which the parser turns into syntax errors.
pub(crate) struct Scanner<'a> {
    input: &'a str,
    pos: usize,
    line: u32,
    col: u32,
    start: usize,
    start_pos: Pos,
    mode: Mode,
    pending: VecDeque<Token<'a>>,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            col: 1,
            start: 0,
            start_pos: Pos::new(0, 1, 1),
            mode: Mode::Plain,
            pending: VecDeque::new(),
        }
    }

    /// Returns the next token, `Eof` forever once the input is exhausted.
    pub fn next_token(&mut self) -> Token<'a> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return token;
            }
            match self.mode {
                Mode::Plain => self.scan_plain(),
                Mode::Ref => self.scan_ref(),
                Mode::Index => self.scan_index(),
                Mode::FuncName => self.scan_func_name(),
                Mode::FuncArgs => self.scan_func_args(),
                Mode::Done => {
                    self.start_token();
                    return self.token(TokenKind::Eof, LitKind::String, false, "");
                }
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn advanced(&self) -> bool {
        self.pos > self.start
    }

    fn start_token(&mut self) {
        self.start = self.pos;
        self.start_pos = Pos::new(self.pos, self.line, self.col);
    }

    fn token(&self, kind: TokenKind, lit_kind: LitKind, bad: bool, lit: &'a str) -> Token<'a> {
        Token {
            kind,
            lit_kind,
            lit,
            bad,
            pos: self.start_pos,
        }
    }

    fn emit(&mut self, kind: TokenKind, lit_kind: LitKind, bad: bool) {
        let lit = &self.input[self.start..self.pos];
        self.emit_lit(kind, lit_kind, bad, lit);
    }

    fn emit_lit(&mut self, kind: TokenKind, lit_kind: LitKind, bad: bool, lit: &'a str) {
        let token = self.token(kind, lit_kind, bad, lit);
        self.pending.push_back(token);
    }

    fn emit_plain(&mut self) {
        if self.advanced() {
            self.emit(TokenKind::Plain, LitKind::String, false);
        }
    }

    /// Consumes a quoted span starting at the opening quote.
    ///
    /// Returns `false` when the input ends before the closing quote.
    fn skip_quoted(&mut self, quote: char) -> bool {
        self.advance();
        while let Some(c) = self.advance() {
            if c == quote {
                if self.peek() == Some(quote) {
                    self.advance();
                    continue;
                }
                return true;
            }
        }
        false
    }

    fn scan_plain(&mut self) {
        self.start_token();
        while let Some(c) = self.peek() {
            match c {
                '$' | '?' => {
                    if self.peek_next() == Some(c) {
                        self.advance();
                        self.advance();
                        continue;
                    }
                    self.emit_plain();
                    self.mode = Mode::Ref;
                    return;
                }
                '#' => {
                    self.emit_plain();
                    self.start_token();
                    self.advance();
                    self.emit(TokenKind::Hash, LitKind::String, false);
                    self.mode = Mode::FuncName;
                    return;
                }
                '\'' | '"' | '`' => {
                    if !self.skip_quoted(c) {
                        self.emit(TokenKind::Plain, LitKind::String, true);
                        self.mode = Mode::Done;
                        return;
                    }
                }
                _ => {
                    self.advance();
                }
            }
        }
        self.emit_plain();
        self.mode = Mode::Done;
    }

    fn scan_ref(&mut self) {
        self.start_token();
        self.advance();
        self.emit(TokenKind::Ref, LitKind::String, false);
        self.mode = Mode::Index;
    }

    fn scan_index(&mut self) {
        if matches!(self.peek(), Some('1'..='9')) {
            self.start_token();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
            self.emit(TokenKind::Literal, LitKind::Int, false);
        }
        self.mode = Mode::Plain;
    }

    fn scan_func_name(&mut self) {
        self.mode = Mode::Plain;
        self.start_token();
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '_' | '$' | '?'))
        {
            self.advance();
        }
        if !self.advanced() {
            return;
        }
        self.emit(TokenKind::Name, LitKind::String, false);

        self.start_token();
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        if self.advanced() {
            self.emit(TokenKind::Literal, LitKind::Int, false);
            return;
        }
        if self.peek() == Some('(') {
            self.advance();
            self.emit(TokenKind::LParen, LitKind::String, false);
            self.mode = Mode::FuncArgs;
        }
    }

    fn scan_func_args(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
        self.start_token();
        match self.peek() {
            None => self.mode = Mode::Done,
            Some(',') => {
                self.advance();
                self.emit(TokenKind::Comma, LitKind::String, false);
            }
            Some(')') => {
                self.advance();
                self.emit(TokenKind::RParen, LitKind::String, false);
                self.mode = Mode::Plain;
            }
            Some(quote @ ('\'' | '"')) => {
                let terminated = self.skip_quoted(quote);
                self.emit(TokenKind::Literal, LitKind::String, !terminated);
                if !terminated {
                    self.mode = Mode::Done;
                }
            }
            Some(_) => {
                while self.peek().is_some_and(|c| c != ',' && c != ')') {
                    self.advance();
                }
                let lit = self.input[self.start..self.pos].trim_end();
                let (lit_kind, bad) = classify(lit);
                self.emit_lit(TokenKind::Literal, lit_kind, bad, lit);
            }
        }
    }
}

/// Classifies an unquoted function argument.
fn classify(lit: &str) -> (LitKind, bool) {
    match lit {
        "true" | "false" => (LitKind::Bool, false),
        "null" | "nil" => (LitKind::Nil, false),
        _ if lit.parse::<i64>().is_ok() => (LitKind::Int, false),
        _ if lit.parse::<f64>().is_ok() => (LitKind::Float, false),
        _ => (LitKind::String, true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(input: &str) -> Vec<(TokenKind, &str)> {
        let mut scanner = Scanner::new(input);
        let mut out = Vec::new();
        loop {
            let token = scanner.next_token();
            if token.kind == TokenKind::Eof {
                return out;
            }
            out.push((token.kind, token.lit));
        }
    }

    #[test]
    fn escaped_markers_stay_in_plain_text() {
        assert_eq!(scan("a $$ b ?? c"), vec![(TokenKind::Plain, "a $$ b ?? c")]);
    }

    #[test]
    fn quoted_spans_are_not_scanned() {
        assert_eq!(
            scan("x = '#c1 $1 ''q''' AND \"?\" = `#`"),
            vec![(TokenKind::Plain, "x = '#c1 $1 ''q''' AND \"?\" = `#`")]
        );
    }

    #[test]
    fn unterminated_quote_is_bad() {
        let mut scanner = Scanner::new("a = 'oops");
        let token = scanner.next_token();
        assert_eq!(token.kind, TokenKind::Plain);
        assert!(token.bad);
        assert_eq!(scanner.next_token().kind, TokenKind::Eof);
    }

    #[test]
    fn bind_vars_and_indexes() {
        assert_eq!(
            scan("id=$12 OR x=?"),
            vec![
                (TokenKind::Plain, "id="),
                (TokenKind::Ref, "$"),
                (TokenKind::Literal, "12"),
                (TokenKind::Plain, " OR x="),
                (TokenKind::Ref, "?"),
            ]
        );
    }

    #[test]
    fn function_forms() {
        assert_eq!(
            scan("#c1 #join('#c', ', ') #t"),
            vec![
                (TokenKind::Hash, "#"),
                (TokenKind::Name, "c"),
                (TokenKind::Literal, "1"),
                (TokenKind::Plain, " "),
                (TokenKind::Hash, "#"),
                (TokenKind::Name, "join"),
                (TokenKind::LParen, "("),
                (TokenKind::Literal, "'#c'"),
                (TokenKind::Comma, ","),
                (TokenKind::Literal, "', '"),
                (TokenKind::RParen, ")"),
                (TokenKind::Plain, " "),
                (TokenKind::Hash, "#"),
                (TokenKind::Name, "t"),
            ]
        );
    }

    #[test]
    fn unquoted_arguments_are_classified() {
        let mut scanner = Scanner::new("#f(1, 2.5, true, nil, what )");
        let mut kinds = Vec::new();
        loop {
            let token = scanner.next_token();
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::Literal => kinds.push((token.lit, token.lit_kind, token.bad)),
                _ => {}
            }
        }
        assert_eq!(
            kinds,
            vec![
                ("1", LitKind::Int, false),
                ("2.5", LitKind::Float, false),
                ("true", LitKind::Bool, false),
                ("nil", LitKind::Nil, false),
                ("what", LitKind::String, true),
            ]
        );
    }

    #[test]
    fn positions_track_lines_and_columns() {
        let mut scanner = Scanner::new("a\n  #c1");
        assert_eq!(scanner.next_token().pos, Pos::new(0, 1, 1));
        let hash = scanner.next_token();
        assert_eq!(hash.kind, TokenKind::Hash);
        assert_eq!(hash.pos, Pos::new(4, 2, 3));
    }
}
