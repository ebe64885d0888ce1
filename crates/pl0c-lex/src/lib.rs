//! pl0c-lex - Lexical analysis for PL/0.
//!
//! Turns source text into a token stream. A token is a kind (keyword,
//! punctuation, operator, identifier, integer literal, or end-of-input)
//! plus the line it started on. Errors are lexical: an unknown character,
//! a malformed two-character operator, an unterminated comment, or an
//! overlong integer literal. The lexer never stops on an error — it
//! reports it and resynchronizes by skipping the offending character(s).

mod cursor;
mod lexer;
mod token;

pub use lexer::Lexer;
pub use token::{Token, TokenKind};
