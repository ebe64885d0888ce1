//! The PL/0 lexer.
//!
//! Scanning rules (see module docs in `lib.rs` for the bigger picture):
//! whitespace is skipped; `(* ... *)` comments nest and an unterminated one
//! is a lexical error; identifiers are `[A-Za-z][A-Za-z0-9]*`, matched
//! case-insensitively against the keyword table but interned with their
//! original case; integer literals are maximal digit runs, and an
//! overflowing one is a lexical error; `:=`, `<=`, `>=`, `<>` need one
//! character of lookahead, and a lone `:` is a lexical error.
//!
//! On any lexical error the lexer reports a diagnostic and resynchronizes
//! by skipping the offending character(s), then keeps producing tokens —
//! it never aborts the token stream.

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};
use pl0c_util::{Handler, Interner, Line, Phase};

pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    interner: &'a mut Interner,
    handler: &'a mut Handler,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, interner: &'a mut Interner, handler: &'a mut Handler) -> Self {
        Self {
            cursor: Cursor::new(source),
            interner,
            handler,
        }
    }

    /// Lexes the entire source into a token vector, terminated by `Eof`.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token();
            let is_eof = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        tokens
    }

    fn next_token(&mut self) -> Token {
        loop {
            self.skip_whitespace();
            if !self.skip_comment() {
                break;
            }
        }

        let line = Line::new(self.cursor.line());

        if self.cursor.is_at_end() {
            return Token::new(TokenKind::Eof, line);
        }

        let c = self.cursor.current();
        let kind = match c {
            '.' => {
                self.cursor.advance();
                TokenKind::Dot
            }
            ',' => {
                self.cursor.advance();
                TokenKind::Comma
            }
            ';' => {
                self.cursor.advance();
                TokenKind::Semicolon
            }
            '(' => {
                self.cursor.advance();
                TokenKind::LParen
            }
            ')' => {
                self.cursor.advance();
                TokenKind::RParen
            }
            '+' => {
                self.cursor.advance();
                TokenKind::Plus
            }
            '-' => {
                self.cursor.advance();
                TokenKind::Minus
            }
            '*' => {
                self.cursor.advance();
                TokenKind::Star
            }
            '/' => {
                self.cursor.advance();
                TokenKind::Slash
            }
            '=' => {
                self.cursor.advance();
                TokenKind::Eq
            }
            ':' => {
                self.cursor.advance();
                if self.cursor.current() == '=' {
                    self.cursor.advance();
                    TokenKind::Assign
                } else {
                    self.handler.error(
                        Phase::Lexical,
                        line,
                        "expected '=' after ':' to form ':='",
                    );
                    return self.next_token();
                }
            }
            '<' => {
                self.cursor.advance();
                match self.cursor.current() {
                    '=' => {
                        self.cursor.advance();
                        TokenKind::Le
                    }
                    '>' => {
                        self.cursor.advance();
                        TokenKind::Ne
                    }
                    _ => TokenKind::Lt,
                }
            }
            '>' => {
                self.cursor.advance();
                if self.cursor.current() == '=' {
                    self.cursor.advance();
                    TokenKind::Ge
                } else {
                    TokenKind::Gt
                }
            }
            c if c.is_ascii_digit() => self.lex_number(line),
            c if c.is_ascii_alphabetic() => self.lex_identifier(),
            other => {
                self.handler.error(
                    Phase::Lexical,
                    line,
                    format!("unexpected character '{other}'"),
                );
                self.cursor.advance();
                return self.next_token();
            }
        };

        Token::new(kind, line)
    }

    fn skip_whitespace(&mut self) {
        self.cursor.eat_while(|c| c.is_whitespace());
    }

    /// Consumes one `(* ... *)` comment, including nested ones, if present.
    /// Returns `true` if a comment was consumed (so the caller should loop
    /// to skip any whitespace/comment that follows).
    fn skip_comment(&mut self) -> bool {
        if self.cursor.current() != '(' || self.cursor.peek(1) != '*' {
            return false;
        }
        let start_line = Line::new(self.cursor.line());
        self.cursor.advance();
        self.cursor.advance();
        let mut depth = 1u32;

        while depth > 0 {
            if self.cursor.is_at_end() {
                self.handler.error(
                    Phase::Lexical,
                    start_line,
                    "unterminated comment '(* ... *)'",
                );
                return true;
            }
            if self.cursor.current() == '(' && self.cursor.peek(1) == '*' {
                self.cursor.advance();
                self.cursor.advance();
                depth += 1;
            } else if self.cursor.current() == '*' && self.cursor.peek(1) == ')' {
                self.cursor.advance();
                self.cursor.advance();
                depth -= 1;
            } else {
                self.cursor.advance();
            }
        }
        true
    }

    fn lex_identifier(&mut self) -> TokenKind {
        let text = self
            .cursor
            .eat_while(|c| c.is_ascii_alphanumeric());
        if let Some(kw) = TokenKind::keyword(&text.to_ascii_lowercase()) {
            kw
        } else {
            TokenKind::Ident(self.interner.intern(text))
        }
    }

    fn lex_number(&mut self, line: Line) -> TokenKind {
        let digits = self.cursor.eat_while(|c| c.is_ascii_digit());
        match digits.parse::<i64>() {
            Ok(value) => TokenKind::Int(value),
            Err(_) => {
                self.handler.error(
                    Phase::Lexical,
                    line,
                    format!("integer literal '{digits}' is too large"),
                );
                TokenKind::Int(0)
            }
        }
    }
}
