//! Lexer module for tokenizing tagged message text

mod token;
mod scanner;

pub use token::{Token, TokenKind};
pub use scanner::Lexer;
