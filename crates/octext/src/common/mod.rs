//! Common infrastructure shared by the codec, table and patch layers

mod error;
mod span;

pub use error::{
    format_message_id, DiagnosticReporter, TextError, TextResult, TextWarning, WarningKind,
};
pub use span::Span;
