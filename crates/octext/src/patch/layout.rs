//! Fixed ROM layout the patcher targets

use serde::Deserialize;

/// Default ROM address of the message table
pub const TABLE_BASE: u32 = 0x00BC_24C0;

/// Default ROM address of the string bank
pub const BANK_BASE: u32 = 0x008C_6000;

/// Segment byte the game uses for string bank pointers
pub const SEGMENT: u8 = 0x07;

pub const PATCH_DESCRIPTION: &str = "This patch was made by Ocarina Text Editor.";

/// One two-byte code patch at an absolute ROM address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CodeFix {
    pub address: u32,
    pub value: [u8; 2],
}

impl CodeFix {
    pub const fn new(address: u32, value: [u8; 2]) -> Self {
        Self { address, value }
    }
}

/// Where the table and bank live and which code references get redirected
/// when the bank is relocated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RomLayout {
    pub table_base: u32,
    pub bank_base: u32,
    pub segment: u8,
    /// Explicit code fixes; the defaults for `segment` when unset
    pub code_fixes: Option<Vec<CodeFix>>,
    pub patch_description: String,
    /// Write 8-byte addresses in diff patches instead of 4-byte ones
    pub wide_patch_addresses: bool,
}

impl RomLayout {
    pub fn code_fixes(&self) -> Vec<CodeFix> {
        self.code_fixes
            .clone()
            .unwrap_or_else(|| Self::default_code_fixes(self.segment))
    }

    /// Code fixes pointing the title screen, file select and name entry
    /// at the character table, which always sits at offset 0 of the bank.
    pub fn default_code_fixes(segment: u8) -> Vec<CodeFix> {
        vec![
            // title screen: upper and lower halves of the pointer
            CodeFix::new(0x00B5_D98A, [segment, 0x00]),
            CodeFix::new(0x00B5_D99A, [0x00, 0x00]),
            // file select
            CodeFix::new(0x00BA_2C3E, [segment, 0x00]),
            // player name entry
            CodeFix::new(0x00BA_7A8A, [segment, 0x00]),
        ]
    }
}

impl Default for RomLayout {
    fn default() -> Self {
        Self {
            table_base: TABLE_BASE,
            bank_base: BANK_BASE,
            segment: SEGMENT,
            code_fixes: None,
            patch_description: PATCH_DESCRIPTION.to_string(),
            wide_patch_addresses: false,
        }
    }
}
