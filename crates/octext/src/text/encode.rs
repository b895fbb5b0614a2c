//! Tagged text to string-bank bytes

use super::lexer::{Lexer, TokenKind};
use super::{Encoded, MessageCodec};
use crate::codes::{ControlCode, Operand};
use crate::common::{Span, TextResult, TextWarning};

impl MessageCodec<'_> {
    /// Encode tagged text. The terminator is not included; the string bank
    /// appends it.
    ///
    /// An unclosed `<` fails the whole message with `MalformedTag`. Unknown
    /// tags, bad operands and unencodable characters emit nothing and are
    /// reported as warnings.
    pub fn encode(&self, text: &str) -> TextResult<Encoded> {
        let mut lexer = Lexer::new(text);
        let mut out = Encoded::default();
        // Last byte pushed came from a bare `\n`
        let mut after_newline = false;

        loop {
            let token = lexer.next_token()?;
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::Newline => {
                    out.bytes.push(ControlCode::LineBreak.byte());
                    after_newline = true;
                    continue;
                }
                TokenKind::Text(run) => self.encode_run(&run, token.span.start, &mut out),
                TokenKind::Tag(body) => {
                    let (name, operand) = TokenKind::split_tag(&body);
                    match self.table().code_for(name) {
                        Some(ControlCode::NewBox) => {
                            if after_newline {
                                out.bytes.pop();
                            }
                            out.bytes.push(ControlCode::NewBox.byte());
                            lexer.match_newline()?;
                        }
                        Some(ControlCode::End) => {
                            out.warnings.push(TextWarning::reserved(name, token.span));
                        }
                        Some(code) => self.encode_tag(code, operand, token.span, &mut out),
                        None => out.warnings.push(TextWarning::unknown_tag(&body, token.span)),
                    }
                }
            }
            after_newline = false;
        }

        Ok(out)
    }

    fn encode_run(&self, run: &str, base: usize, out: &mut Encoded) {
        for (i, ch) in run.char_indices() {
            if let Some(code) = self.table().code_for_literal(ch) {
                out.bytes.push(code.byte());
            } else if let Ok(byte) = u8::try_from(ch) {
                out.bytes.push(byte);
            } else {
                let start = base + i;
                out.warnings
                    .push(TextWarning::unencodable(ch, Span::new(start, start + ch.len_utf8())));
            }
        }
    }

    fn encode_tag(&self, code: ControlCode, operand: Option<&str>, span: Span, out: &mut Encoded) {
        let arity = self.table().operand_arity(code);
        match (arity, operand) {
            (Operand::None, None) => out.bytes.push(code.byte()),
            (Operand::None, Some(extra)) => {
                out.warnings.push(TextWarning::invalid_operand(
                    format!("<{}> takes no operand; ignored '{extra}'", code.name()),
                    span,
                ));
                out.bytes.push(code.byte());
            }
            (_, None) => out.warnings.push(TextWarning::invalid_operand(
                format!("<{}> needs a {} operand", code.name(), arity.describe()),
                span,
            )),
            (_, Some(text)) => match arity.parse(text) {
                Ok(value) => {
                    out.bytes.push(code.byte());
                    out.bytes.extend(arity.to_bytes(value));
                }
                Err(reason) => out.warnings.push(TextWarning::invalid_operand(
                    format!("<{}>: {reason}", code.name()),
                    span,
                )),
            },
        }
    }
}
