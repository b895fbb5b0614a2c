//! Control-code table
//!
//! Maps each reserved byte of the message stream to a tag name and an
//! operand layout. `CodeTable` layers user overrides (literal characters or
//! renamed tags) on top of the fixed set.

mod control;
mod operand;
mod table;

pub use control::ControlCode;
pub use operand::{normalize_name, Color, HighScore, Operand, SoundType};
pub use table::{CodeDisplay, CodeTable};
