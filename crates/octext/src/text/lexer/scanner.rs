//! Lexer implementation using logos

use super::token::{Token, TokenKind};
use crate::common::{Span, TextError, TextResult};
use logos::Logos;

/// Lexer for tagged message text
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
    peeked: Option<Token>,
    at_eof: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given message text
    pub fn new(source: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            peeked: None,
            at_eof: false,
        }
    }

    /// Get the next token. A `<` that never closes on its line is a
    /// `MalformedTag` covering the rest of that line.
    pub fn next_token(&mut self) -> TextResult<Token> {
        if let Some(token) = self.peeked.take() {
            return Ok(token);
        }

        if self.at_eof {
            let len = self.inner.source().len();
            return Ok(Token::new(TokenKind::Eof, Span::point(len)));
        }

        match self.inner.next() {
            Some(Ok(kind)) => {
                let span = self.inner.span();
                Ok(Token::new(kind, Span::new(span.start, span.end)))
            }
            Some(Err(())) => {
                let source = self.inner.source();
                let start = self.inner.span().start;
                let end = source[start..]
                    .find('\n')
                    .map_or(source.len(), |i| start + i);
                Err(TextError::malformed_tag(Span::new(start, end)))
            }
            None => {
                self.at_eof = true;
                let len = self.inner.source().len();
                Ok(Token::new(TokenKind::Eof, Span::point(len)))
            }
        }
    }

    /// Peek at the next token without consuming it
    pub fn peek(&mut self) -> TextResult<&Token> {
        if self.peeked.is_none() {
            self.peeked = Some(self.next_token()?);
        }
        Ok(self.peeked.get_or_insert_with(|| Token::new(TokenKind::Eof, Span::default())))
    }

    /// Consume the next token if it is a line break
    pub fn match_newline(&mut self) -> TextResult<bool> {
        if matches!(self.peek()?.kind, TokenKind::Newline) {
            self.next_token()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Tokenize the entire text and return all tokens
    pub fn tokenize_all(mut self) -> TextResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = matches!(token.kind, TokenKind::Eof);
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }
}
