//! Error types, codec warnings and diagnostic reporting

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use super::Span;

/// Fatal error raised while importing, encoding or exporting messages
#[derive(Error, Debug)]
pub enum TextError {
    #[error("Malformed tag{} at {span:?}: missing closing '>'", describe_message(.message_id))]
    MalformedTag { message_id: Option<i16>, span: Span },

    #[error("Truncated input at offset {offset:#010X}: needed {needed} more byte(s)")]
    TruncatedInput { offset: u64, needed: usize },

    #[error("Image unavailable: {}: {source}", .path.display())]
    ImageUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("String bank overflow: message{} would start at {offset:#X}, past the 24-bit offset limit", describe_message(.message_id))]
    BankOverflow { message_id: Option<i16>, offset: usize },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid override for '{key}': {message}")]
    InvalidOverride { key: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

fn describe_message(message_id: &Option<i16>) -> String {
    match message_id {
        Some(id) => format!(" in message {}", format_message_id(*id)),
        None => String::new(),
    }
}

/// Message ids are shown the way the game's tables list them
pub fn format_message_id(id: i16) -> String {
    format!("0x{:04X}", id as u16)
}

impl TextError {
    pub fn malformed_tag(span: Span) -> Self {
        Self::MalformedTag {
            message_id: None,
            span,
        }
    }

    pub fn truncated(offset: u64, needed: usize) -> Self {
        Self::TruncatedInput { offset, needed }
    }

    pub fn image_unavailable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::ImageUnavailable {
            path: path.into(),
            source,
        }
    }

    pub fn bank_overflow(offset: usize) -> Self {
        Self::BankOverflow {
            message_id: None,
            offset,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn invalid_override(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOverride {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Attach the id of the message being encoded
    pub fn in_message(self, id: i16) -> Self {
        match self {
            Self::MalformedTag { span, .. } => Self::MalformedTag {
                message_id: Some(id),
                span,
            },
            Self::BankOverflow { offset, .. } => Self::BankOverflow {
                message_id: Some(id),
                offset,
            },
            other => other,
        }
    }
}

pub type TextResult<T> = Result<T, TextError>;

/// Category of a non-fatal codec finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    /// Decode met a byte that is neither a control code nor printable
    UnknownControlCode,
    /// Encode met a tag whose name is not in the code table
    UnknownTagName,
    /// Tag operand missing, superfluous, or out of range
    InvalidOperand,
    /// Character with no single-byte encoding
    Unencodable,
    /// Tag names a code the packer writes itself
    ReservedCode,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningKind::UnknownControlCode => write!(f, "unknown control code"),
            WarningKind::UnknownTagName => write!(f, "unknown tag name"),
            WarningKind::InvalidOperand => write!(f, "invalid operand"),
            WarningKind::Unencodable => write!(f, "unencodable character"),
            WarningKind::ReservedCode => write!(f, "reserved control code"),
        }
    }
}

/// Non-fatal finding attached to one message. The span points into the
/// message's tagged text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextWarning {
    pub kind: WarningKind,
    pub span: Span,
    pub message: String,
}

impl TextWarning {
    pub fn new(kind: WarningKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    pub fn unknown_control_code(byte: u8, offset: usize, span: Span) -> Self {
        Self::new(
            WarningKind::UnknownControlCode,
            span,
            format!("byte {byte:#04X} at offset {offset} dropped"),
        )
    }

    pub fn unknown_tag(name: &str, span: Span) -> Self {
        Self::new(
            WarningKind::UnknownTagName,
            span,
            format!("tag <{name}> produces no bytes"),
        )
    }

    pub fn invalid_operand(message: impl Into<String>, span: Span) -> Self {
        Self::new(WarningKind::InvalidOperand, span, message)
    }

    pub fn reserved(name: &str, span: Span) -> Self {
        Self::new(
            WarningKind::ReservedCode,
            span,
            format!("<{name}> is written by the packer; tag dropped"),
        )
    }

    pub fn unencodable(ch: char, span: Span) -> Self {
        Self::new(
            WarningKind::Unencodable,
            span,
            format!("character '{ch}' (U+{:04X}) has no byte encoding", ch as u32),
        )
    }
}

impl fmt::Display for TextWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {:?}: {}", self.kind, self.span, self.message)
    }
}

/// Diagnostic reporter for pretty warning output against message text
pub struct DiagnosticReporter {
    files: SimpleFiles<String, String>,
    writer: StandardStream,
    config: term::Config,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self {
            files: SimpleFiles::new(),
            writer: StandardStream::stderr(ColorChoice::Auto),
            config: term::Config::default(),
        }
    }

    pub fn add_file(&mut self, name: impl Into<String>, source: impl Into<String>) -> usize {
        self.files.add(name.into(), source.into())
    }

    /// Register a message's text under its id
    pub fn add_message(&mut self, id: i16, text: impl Into<String>) -> usize {
        self.add_file(format!("message {}", format_message_id(id)), text)
    }

    pub fn warning_diagnostic(file_id: usize, warning: &TextWarning) -> Diagnostic<usize> {
        Diagnostic::warning()
            .with_message(warning.kind.to_string())
            .with_labels(vec![
                Label::primary(file_id, warning.span.range()).with_message(&warning.message)
            ])
    }

    pub fn error_diagnostic(file_id: usize, error: &TextError) -> Diagnostic<usize> {
        match error {
            TextError::MalformedTag { span, .. } => Diagnostic::error()
                .with_message("Malformed tag")
                .with_labels(vec![
                    Label::primary(file_id, span.range()).with_message("tag is never closed")
                ]),

            other => Diagnostic::error().with_message(other.to_string()),
        }
    }

    pub fn report_warning(&self, file_id: usize, warning: &TextWarning) {
        let diagnostic = Self::warning_diagnostic(file_id, warning);
        let _ = term::emit(&mut self.writer.lock(), &self.config, &self.files, &diagnostic);
    }

    pub fn report_error(&self, file_id: usize, error: &TextError) {
        let diagnostic = Self::error_diagnostic(file_id, error);
        let _ = term::emit(&mut self.writer.lock(), &self.config, &self.files, &diagnostic);
    }
}

impl Default for DiagnosticReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_tag_names_message() {
        let err = TextError::malformed_tag(Span::new(3, 9)).in_message(0x0123);
        assert_eq!(
            err.to_string(),
            "Malformed tag in message 0x0123 at Span { start: 3, end: 9 }: missing closing '>'"
        );
    }

    #[test]
    fn test_negative_ids_format_as_table_values() {
        assert_eq!(format_message_id(-4), "0xFFFC");
        assert_eq!(format_message_id(0x0042), "0x0042");
    }

    #[test]
    fn test_in_message_leaves_other_errors() {
        let err = TextError::truncated(0x10, 2).in_message(5);
        assert!(matches!(err, TextError::TruncatedInput { offset: 0x10, needed: 2 }));
    }

    #[test]
    fn test_warning_diagnostic_label() {
        let warning = TextWarning::unknown_tag("Bogus", Span::new(0, 7));
        let diagnostic = DiagnosticReporter::warning_diagnostic(0, &warning);
        assert_eq!(diagnostic.labels.len(), 1);
        assert_eq!(diagnostic.labels[0].range, 0..7);
        assert_eq!(diagnostic.message, "unknown tag name");
    }
}
