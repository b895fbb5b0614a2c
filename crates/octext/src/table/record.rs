//! Message table records
//!
//! Each record is 8 bytes, big-endian:
//!
//! | bytes | field |
//! |---|---|
//! | 0-1 | message id (i16) |
//! | 2 | box type (high nibble), box position (low nibble) |
//! | 3 | reserved, always 0 |
//! | 4-7 | segment byte, then 24-bit offset into the string bank |

use crate::codes::normalize_name;
use crate::common::TextResult;
use crate::image::ImageReader;
use std::fmt;
use std::str::FromStr;

pub const RECORD_SIZE: usize = 8;

/// Id of the record that ends the table
pub const TERMINATOR_ID: i16 = -1;

/// Id of the character table entry, always packed first
pub const CHARACTER_TABLE_ID: i16 = -4;

const OFFSET_MASK: u32 = 0x00FF_FFFF;

macro_rules! nibble_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $value:literal => $display:literal,)+ }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        #[derive(serde::Serialize, serde::Deserialize)]
        #[serde(into = "String", try_from = "String")]
        pub enum $name {
            #[default]
            $($variant,)+
            /// Nibble value with no known meaning, kept as read
            Other(u8),
        }

        impl $name {
            pub const KNOWN: &'static [$name] = &[$($name::$variant,)+];

            pub fn from_nibble(nibble: u8) -> Self {
                match nibble & 0x0F {
                    $($value => $name::$variant,)+
                    other => $name::Other(other),
                }
            }

            pub fn nibble(self) -> u8 {
                match self {
                    $($name::$variant => $value,)+
                    $name::Other(n) => n & 0x0F,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $($name::$variant => write!(f, $display),)+
                    $name::Other(n) => write!(f, "{:#X}", n),
                }
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = normalize_name(s);
                if let Some(known) = Self::KNOWN.iter().find(|k| normalize_name(&k.to_string()) == wanted) {
                    return Ok(*known);
                }
                parse_nibble(s)
                    .map(Self::from_nibble)
                    .ok_or_else(|| format!("unknown {} '{s}'", stringify!($name)))
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.to_string()
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

nibble_enum! {
    /// Text box style
    BoxType {
        Black = 0 => "Black",
        Wooden = 1 => "Wooden",
        Blue = 2 => "Blue",
        Ocarina = 3 => "Ocarina",
        NoneWhite = 4 => "None White",
        NoneBlack = 5 => "None Black",
    }
}

nibble_enum! {
    /// Where the box sits on screen
    BoxPosition {
        Dynamic = 0 => "Dynamic",
        Top = 1 => "Top",
        Center = 2 => "Center",
        Bottom = 3 => "Bottom",
    }
}

fn parse_nibble(s: &str) -> Option<u8> {
    let s = s.trim();
    let value = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16).ok()?,
        None => s.parse::<u8>().ok()?,
    };
    (value <= 0x0F).then_some(value)
}

/// One entry of the message table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRecord {
    pub message_id: i16,
    pub box_type: BoxType,
    pub box_position: BoxPosition,
    offset: u32,
}

impl TableRecord {
    pub fn new(message_id: i16, box_type: BoxType, box_position: BoxPosition, offset: u32) -> Self {
        Self {
            message_id,
            box_type,
            box_position,
            offset: offset & OFFSET_MASK,
        }
    }

    pub fn terminator() -> Self {
        Self::new(TERMINATOR_ID, BoxType::Black, BoxPosition::Dynamic, 0)
    }

    pub fn is_terminator(&self) -> bool {
        self.message_id == TERMINATOR_ID
    }

    /// Offset into the string bank (24 bits)
    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn set_offset(&mut self, offset: u32) {
        self.offset = offset & OFFSET_MASK;
    }

    pub fn read(reader: &mut ImageReader<'_>) -> TextResult<Self> {
        let message_id = reader.read_i16()?;
        let type_pos = reader.read_u8()?;
        let _reserved = reader.read_u8()?;
        let pointer = reader.read_u32()?;
        Ok(Self::new(
            message_id,
            BoxType::from_nibble(type_pos >> 4),
            BoxPosition::from_nibble(type_pos & 0x0F),
            pointer,
        ))
    }

    /// Serialize with `segment` in the pointer's top byte. The terminator
    /// is written all-zero after its id.
    pub fn to_bytes(&self, segment: u8) -> [u8; RECORD_SIZE] {
        let mut bytes = [0u8; RECORD_SIZE];
        bytes[0..2].copy_from_slice(&self.message_id.to_be_bytes());
        if self.is_terminator() {
            return bytes;
        }
        bytes[2] = (self.box_type.nibble() << 4) | self.box_position.nibble();
        let pointer = (u32::from(segment) << 24) | self.offset;
        bytes[4..8].copy_from_slice(&pointer.to_be_bytes());
        bytes
    }
}

impl fmt::Display for TableRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:#06X} {} {} @ {:#08X}",
            self.message_id as u16, self.box_type, self.box_position, self.offset
        )
    }
}
