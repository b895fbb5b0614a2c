//! Editable messages and the message file format

use crate::common::{format_message_id, TextError, TextResult, TextWarning};
use crate::table::{BoxPosition, BoxType, TableRecord};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One dialogue entry as the editor sees it
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Message {
    pub id: i16,
    #[serde(default)]
    pub box_type: BoxType,
    #[serde(default)]
    pub box_position: BoxPosition,
    #[serde(default)]
    pub text: String,
}

impl Message {
    pub fn new(id: i16, box_type: BoxType, box_position: BoxPosition, text: impl Into<String>) -> Self {
        Self {
            id,
            box_type,
            box_position,
            text: text.into(),
        }
    }

    /// Empty message, as created by the editor
    pub fn empty(id: i16) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn from_record(record: &TableRecord, text: String) -> Self {
        Self::new(record.message_id, record.box_type, record.box_position, text)
    }

    /// Table record for this message at `offset`
    pub fn record(&self, offset: u32) -> TableRecord {
        TableRecord::new(self.id, self.box_type, self.box_position, offset)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}\nBox Type: {}\nBox Pos: {}\nData:\n{}\n",
            format_message_id(self.id),
            self.box_type,
            self.box_position,
            self.text
        )
    }
}

/// Warnings collected for one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageWarnings {
    pub id: i16,
    pub text: String,
    pub warnings: Vec<TextWarning>,
}

/// TOML document holding a list of messages
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageFile {
    #[serde(default, rename = "message")]
    pub messages: Vec<Message>,
}

impl MessageFile {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    pub fn from_toml(source: &str) -> TextResult<Self> {
        toml::from_str(source).map_err(|e| TextError::config(format!("message file: {e}")))
    }

    pub fn to_toml(&self) -> TextResult<String> {
        toml::to_string(self).map_err(|e| TextError::config(format!("message file: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_message_file_round_trip() {
        let file = MessageFile::new(vec![
            Message::new(-4, BoxType::Black, BoxPosition::Dynamic, "ABC"),
            Message::new(
                0x0001,
                BoxType::Blue,
                BoxPosition::Bottom,
                "You got the <Color:Red>Sword<Color:White>!\n<New Box>\nNeat.",
            ),
            Message::new(0x0002, BoxType::Other(0xB), BoxPosition::Top, ""),
        ]);
        let source = file.to_toml().unwrap();
        let parsed = MessageFile::from_toml(&source).unwrap();
        assert_eq!(parsed.messages, file.messages);
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let parsed = MessageFile::from_toml("[[message]]\nid = 7\n").unwrap();
        assert_eq!(parsed.messages, vec![Message::empty(7)]);
    }

    #[test]
    fn test_bad_box_type_is_config_error() {
        let err = MessageFile::from_toml("[[message]]\nid = 7\nbox_type = \"Plaid\"\n").unwrap_err();
        assert!(matches!(err, TextError::Config { .. }));
    }

    #[test]
    fn test_display_summary() {
        let message = Message::new(0x10, BoxType::Wooden, BoxPosition::Top, "Hi");
        assert_eq!(message.to_string(), "ID: 0x0010\nBox Type: Wooden\nBox Pos: Top\nData:\nHi\n");
    }
}
