//! Message codec
//!
//! Converts between a message's byte stream in the string bank and its
//! tagged-text form:
//! - `decode`: bytes up to the 0x02 terminator into `<Tag:operand>` text
//! - `encode`: tokenized text back into bytes, collapsing `\n<New Box>\n`
//!   into a single box-break code
//!
//! Findings that do not stop the codec are returned as `TextWarning`s next
//! to the result rather than dropped.

pub mod lexer;
mod decode;
mod encode;

use crate::codes::CodeTable;
use crate::common::TextWarning;

pub use lexer::{Lexer, Token, TokenKind};

/// Byte that ends every message in the string bank
pub const TERMINATOR: u8 = 0x02;

/// Marker text that stands for a box break between two line feeds
pub const NEW_BOX_MARKER: &str = "\n<New Box>\n";

/// Text decoded from the string bank
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Decoded {
    pub text: String,
    pub warnings: Vec<TextWarning>,
}

/// Bytes encoded from tagged text, without the terminator
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Encoded {
    pub bytes: Vec<u8>,
    pub warnings: Vec<TextWarning>,
}

/// Message codec bound to a configured code table
#[derive(Debug, Clone, Copy)]
pub struct MessageCodec<'a> {
    table: &'a CodeTable,
}

impl<'a> MessageCodec<'a> {
    pub fn new(table: &'a CodeTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'a CodeTable {
        self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::ControlCode;
    use crate::image::ImageReader;
    use pretty_assertions::assert_eq;

    fn round_trip(table: &CodeTable, text: &str) -> String {
        let codec = MessageCodec::new(table);
        let mut bytes = codec.encode(text).unwrap().bytes;
        bytes.push(TERMINATOR);
        let decoded = codec.decode(&mut ImageReader::new(&bytes, 0)).unwrap();
        assert!(decoded.warnings.is_empty(), "{:?}", decoded.warnings);
        decoded.text
    }

    #[test]
    fn test_round_trip_plain_and_tags() {
        let table = CodeTable::new();
        for text in [
            "Hi",
            "a>b",
            "Hey! Listen!\nWatch out!",
            "You got the <Color:Red>Kokiri Sword<Color:White>!",
            "<Sound:Navi Hey><Delay:20>Hello\n<New Box>\nAgain",
            "<Jump:1234><Background:65536><High Score:Fish Weight>",
            "<Two Choices>Yes\nNo",
            "<Color:16>odd colour",
            "\n<New Box>\n",
            "Line\n\n<New Box>\n\nGap",
        ] {
            assert_eq!(round_trip(&table, text), text);
        }
    }

    #[test]
    fn test_round_trip_literal_overrides() {
        let table = CodeTable::with_overrides([
            (ControlCode::AButton, "@"),
            (ControlCode::TwoChoices, "^"),
        ])
        .unwrap();
        assert_eq!(round_trip(&table, "Press @ now^Yes\nNo"), "Press @ now^Yes\nNo");
    }

    #[test]
    fn test_operand_fidelity_for_every_enum_value() {
        use crate::codes::{Color, HighScore, SoundType};

        let table = CodeTable::new();
        for color in Color::ALL {
            let text = format!("<Color:{}>", color.name());
            assert_eq!(round_trip(&table, &text), text);
        }
        for sound in SoundType::ALL {
            let text = format!("<Sound:{}>", sound.name());
            assert_eq!(round_trip(&table, &text), text);
        }
        for score in HighScore::ALL {
            let text = format!("<High Score:{}>", score.name());
            assert_eq!(round_trip(&table, &text), text);
        }
    }

    #[test]
    fn test_bytes_survive_decode_then_encode() {
        let table = CodeTable::new();
        let codec = MessageCodec::new(&table);
        let original = vec![
            b'O', b'k', 0x01, 0x05, 0x41, b'x', 0x04, 0x12, 0x12, 0x34, 0x07, 0x00, 0x2A, 0x9F,
            0x15, 0x00, 0x01, 0x12, 0x1E, 0x05, TERMINATOR,
        ];
        let decoded = codec.decode(&mut ImageReader::new(&original, 0)).unwrap();
        let encoded = codec.encode(&decoded.text).unwrap();
        assert!(encoded.warnings.is_empty(), "{:?}", encoded.warnings);
        assert_eq!(encoded.bytes, original[..original.len() - 1].to_vec());
    }
}
