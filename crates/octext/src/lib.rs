//! Ocarina Text - message editor core for the Ocarina of Time N64 ROM
//!
//! Reads the message table and string bank out of a ROM, turns each message
//! into editable tagged text, and packs edited messages back into a ROM, a
//! PPF patch, or flat table/bank files.
//!
//! ## Architecture
//!
//! - **Codes** (`codes/`): control-code set, operand enums, configured overrides
//! - **Text** (`text/`): tokenizer and the decode/encode codec
//! - **Table** (`table/`): 8-byte table records and string bank packing
//! - **Patch** (`patch/`): output strategies and the ROM layout they target
//! - **Image** (`image.rs`): random-access ROM images with all-or-nothing commit
//! - **Driver** (`driver/`): the editing session tying it together
//! - **Common** (`common/`): errors, warnings, spans, diagnostics

pub mod common;
pub mod codes;
pub mod text;
pub mod message;
pub mod table;
pub mod patch;
pub mod image;
pub mod config;
pub mod driver;

// Re-exports for convenience
pub use codes::{CodeTable, ControlCode};
pub use common::{DiagnosticReporter, Span, TextError, TextResult, TextWarning, WarningKind};
pub use config::Config;
pub use driver::Session;
pub use message::{Message, MessageFile, MessageWarnings};
pub use patch::{PatchAssembler, PatchOutput, RomLayout};
pub use text::MessageCodec;
