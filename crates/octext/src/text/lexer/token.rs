//! Token definitions for tagged message text

use crate::common::Span;
use logos::Logos;
use std::fmt;

/// Token with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Token kinds in tagged text. Carriage returns are dropped before anything
/// else sees them.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"\r")]
pub enum TokenKind {
    /// `<Name>` or `<Name:operand>`, brackets stripped
    #[regex(r"<[^<>\n]*>", |lex| {
        let slice = lex.slice();
        slice[1..slice.len() - 1].to_string()
    })]
    Tag(String),

    #[token("\n")]
    Newline,

    /// Run of literal characters
    #[regex(r"[^<\r\n]+", |lex| lex.slice().to_string())]
    Text(String),

    Eof,
}

impl TokenKind {
    /// Split a tag body into its name and optional operand
    pub fn split_tag(body: &str) -> (&str, Option<&str>) {
        match body.split_once(':') {
            Some((name, operand)) => (name.trim(), Some(operand.trim())),
            None => (body.trim(), None),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Tag(body) => write!(f, "<{body}>"),
            TokenKind::Newline => write!(f, "line break"),
            TokenKind::Text(text) => write!(f, "'{text}'"),
            TokenKind::Eof => write!(f, "end of text"),
        }
    }
}
