//! String-bank bytes to tagged text

use super::{Decoded, MessageCodec, NEW_BOX_MARKER, TERMINATOR};
use crate::codes::{ControlCode, Operand};
use crate::common::{Span, TextResult, TextWarning};
use crate::image::ImageReader;

impl MessageCodec<'_> {
    /// Decode one message starting at the reader's position. Stops right
    /// after the terminator; running off the image is `TruncatedInput`.
    pub fn decode(&self, reader: &mut ImageReader<'_>) -> TextResult<Decoded> {
        let start = reader.position();
        let mut out = Decoded::default();

        loop {
            let byte = reader.read_u8()?;
            if byte == TERMINATOR {
                break;
            }

            match ControlCode::from_byte(byte) {
                Some(code) => self.decode_code(code, reader, &mut out.text)?,
                None => {
                    let ch = char::from(byte);
                    if passes_through(ch) {
                        out.text.push(ch);
                    } else {
                        let offset = (reader.position() - 1 - start) as usize;
                        out.warnings.push(TextWarning::unknown_control_code(
                            byte,
                            offset,
                            Span::point(out.text.len()),
                        ));
                    }
                }
            }
        }

        Ok(out)
    }

    fn decode_code(
        &self,
        code: ControlCode,
        reader: &mut ImageReader<'_>,
        text: &mut String,
    ) -> TextResult<()> {
        match code {
            ControlCode::LineBreak => text.push('\n'),
            ControlCode::NewBox => text.push_str(NEW_BOX_MARKER),
            _ => {
                if let Some(ch) = self.table().literal_for(code) {
                    text.push(ch);
                    return Ok(());
                }

                let tag = self.table().tag_for(code);
                let operand = self.table().operand_arity(code);
                if operand == Operand::None {
                    text.push('<');
                    text.push_str(tag);
                    text.push('>');
                } else {
                    let bytes = reader.read_vec(operand.width())?;
                    let value = Operand::from_bytes(&bytes);
                    text.push_str(&format!("<{tag}:{}>", operand.render(value)));
                }
            }
        }
        Ok(())
    }
}

/// Unmapped bytes that survive as literal characters: letters, digits,
/// whitespace, and punctuation other than the tag brackets
fn passes_through(ch: char) -> bool {
    if ch == '<' {
        return false;
    }
    ch.is_alphanumeric()
        || ch.is_whitespace()
        || ch.is_ascii_punctuation()
        || matches!(ch, '¡' | '§' | '«' | '¶' | '·' | '»' | '¿')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::CodeTable;
    use crate::common::{TextError, WarningKind};
    use pretty_assertions::assert_eq;

    fn decode(bytes: &[u8]) -> Decoded {
        let table = CodeTable::new();
        let image = bytes.to_vec();
        MessageCodec::new(&table)
            .decode(&mut ImageReader::new(&image, 0))
            .unwrap()
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(decode(b"Hi\x02").text, "Hi");
    }

    #[test]
    fn test_stops_at_terminator() {
        let table = CodeTable::new();
        let image = b"Ab\x02Cd\x02".to_vec();
        let mut reader = ImageReader::new(&image, 0);
        let codec = MessageCodec::new(&table);
        assert_eq!(codec.decode(&mut reader).unwrap().text, "Ab");
        assert_eq!(reader.position(), 3);
        assert_eq!(codec.decode(&mut reader).unwrap().text, "Cd");
    }

    #[test]
    fn test_line_and_box_breaks() {
        assert_eq!(decode(b"A\x01B\x04C\x02").text, "A\nB\n<New Box>\nC");
    }

    #[test]
    fn test_operands() {
        assert_eq!(decode(b"\x05\x41Red\x05\x40\x02").text, "<Color:Red>Red<Color:White>");
        assert_eq!(decode(b"\x12\x68\x5F\x02").text, "<Sound:Navi Hey>");
        assert_eq!(decode(b"\x07\x01\x00\x02").text, "<Jump:256>");
        assert_eq!(decode(b"\x1E\x02\x02").text, "<High Score:Fish Weight>");
        assert_eq!(decode(b"\x15\x01\x02\x03\x02").text, "<Background:66051>");
    }

    #[test]
    fn test_zero_operand_tags() {
        assert_eq!(decode(b"\x1B\xA7\x7F\x02").text, "<Two Choices><C Left><Dash>");
    }

    #[test]
    fn test_literal_override_decodes_to_character() {
        let table = CodeTable::with_overrides([(ControlCode::AButton, "@")]).unwrap();
        let image = b"Press \x9F\x02".to_vec();
        let decoded = MessageCodec::new(&table)
            .decode(&mut ImageReader::new(&image, 0))
            .unwrap();
        assert_eq!(decoded.text, "Press @");
    }

    #[test]
    fn test_unmapped_bytes() {
        let decoded = decode(b"a\x00b\x03c<d\xE9\x02");
        assert_eq!(decoded.text, "abcd\u{e9}");
        let kinds: Vec<_> = decoded.warnings.iter().map(|w| w.kind).collect();
        assert_eq!(kinds, vec![WarningKind::UnknownControlCode; 3]);
        assert_eq!(decoded.warnings[0].span, Span::point(1));
        assert_eq!(decoded.warnings[2].span, Span::point(3));
    }

    #[test]
    fn test_closing_bracket_is_text() {
        let decoded = decode(b"a>b\x02");
        assert_eq!(decoded.text, "a>b");
        assert!(decoded.warnings.is_empty());
    }

    #[test]
    fn test_missing_terminator_is_truncated() {
        let table = CodeTable::new();
        let image = b"Never ends".to_vec();
        let err = MessageCodec::new(&table)
            .decode(&mut ImageReader::new(&image, 0))
            .unwrap_err();
        assert!(matches!(err, TextError::TruncatedInput { offset: 10, .. }));
    }

    #[test]
    fn test_truncated_operand() {
        let table = CodeTable::new();
        let image = b"\x12\x68".to_vec();
        let err = MessageCodec::new(&table)
            .decode(&mut ImageReader::new(&image, 0))
            .unwrap_err();
        assert!(matches!(err, TextError::TruncatedInput { .. }));
    }
}
