//! Patch assembly
//!
//! Turns a packed table and string bank into one of four outputs:
//! - `FullRomOverwrite`: both written over the ROM at their fixed addresses
//! - `RelocatedRomWithCodeFix`: the same, plus the layout's code fixes
//! - `DiffPatch`: a PPF 3.0 file carrying the same writes
//! - `DirectoryFiles`: `MessageTable.tbl` and `StringData.bin`
//!
//! Every strategy builds its output in memory first and commits it in one
//! step, so a failed export leaves the target as it was.

mod layout;
mod ppf;

pub use layout::{CodeFix, RomLayout, BANK_BASE, PATCH_DESCRIPTION, SEGMENT, TABLE_BASE};
pub use ppf::{chunk_count, PpfWriter, CHUNK_LEN};

use crate::common::{TextError, TextResult};
use crate::image::{write_atomic, write_atomic_all, RomFile, RomImage};
use std::fmt;
use std::fs;
use std::path::Path;

pub const TABLE_FILE_NAME: &str = "MessageTable.tbl";
pub const BANK_FILE_NAME: &str = "StringData.bin";

/// Persistence strategy for an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchOutput {
    DirectoryFiles,
    FullRomOverwrite,
    RelocatedRomWithCodeFix,
    DiffPatch,
}

impl PatchOutput {
    pub fn patches_rom(self) -> bool {
        matches!(self, Self::FullRomOverwrite | Self::RelocatedRomWithCodeFix)
    }
}

impl fmt::Display for PatchOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchOutput::DirectoryFiles => write!(f, "directory files"),
            PatchOutput::FullRomOverwrite => write!(f, "full ROM overwrite"),
            PatchOutput::RelocatedRomWithCodeFix => write!(f, "relocated ROM with code fix"),
            PatchOutput::DiffPatch => write!(f, "PPF diff patch"),
        }
    }
}

/// One absolute write into the ROM
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchWrite {
    pub address: u32,
    pub bytes: Vec<u8>,
}

/// Ordered list of writes that make up a ROM patch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchPlan {
    pub writes: Vec<PatchWrite>,
}

impl PatchPlan {
    pub fn push(&mut self, address: u32, bytes: impl Into<Vec<u8>>) {
        self.writes.push(PatchWrite {
            address,
            bytes: bytes.into(),
        });
    }

    pub fn apply(&self, image: &mut dyn RomImage) -> TextResult<()> {
        for write in &self.writes {
            log::debug!("write {} bytes at {:#010X}", write.bytes.len(), write.address);
            image.write_at(u64::from(write.address), &write.bytes)?;
        }
        Ok(())
    }
}

/// Builds and commits patch output for a fixed ROM layout
#[derive(Debug, Clone, Default)]
pub struct PatchAssembler {
    layout: RomLayout,
}

impl PatchAssembler {
    pub fn new(layout: RomLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &RomLayout {
        &self.layout
    }

    /// Writes a ROM strategy performs. Bank first, then table, then code
    /// fixes.
    pub fn plan(&self, output: PatchOutput, table: &[u8], bank: &[u8]) -> PatchPlan {
        let mut plan = PatchPlan::default();
        plan.push(self.layout.bank_base, bank);
        plan.push(self.layout.table_base, table);
        if matches!(output, PatchOutput::RelocatedRomWithCodeFix | PatchOutput::DiffPatch) {
            for fix in self.layout.code_fixes() {
                plan.push(fix.address, fix.value);
            }
        }
        plan
    }

    /// PPF file carrying the bank, the table and the code fixes
    pub fn diff_patch(&self, table: &[u8], bank: &[u8]) -> Vec<u8> {
        let mut writer = PpfWriter::new(&self.layout.patch_description, self.layout.wide_patch_addresses);
        writer
            .chunked(self.layout.bank_base, bank)
            .chunked(self.layout.table_base, table);
        for fix in self.layout.code_fixes() {
            writer.code_fix(&fix);
        }
        writer.finish()
    }

    /// Patch an image held by the caller. Only the ROM strategies apply.
    pub fn apply_to(
        &self,
        output: PatchOutput,
        image: &mut dyn RomImage,
        table: &[u8],
        bank: &[u8],
    ) -> TextResult<()> {
        if !output.patches_rom() {
            return Err(TextError::config(format!("{output} cannot be applied to an image")));
        }
        self.plan(output, table, bank).apply(image)
    }

    /// Write `output` to `target`: the ROM to patch in place, the PPF file to
    /// create, or the directory to hold the two flat files.
    pub fn export(&self, output: PatchOutput, target: &Path, table: &[u8], bank: &[u8]) -> TextResult<()> {
        log::info!("exporting {output} to {}", target.display());
        match output {
            PatchOutput::FullRomOverwrite | PatchOutput::RelocatedRomWithCodeFix => {
                let mut rom = RomFile::open_for_update(target)?;
                self.apply_to(output, &mut rom, table, bank)?;
                rom.commit()
            }
            PatchOutput::DiffPatch => write_atomic(target, &self.diff_patch(table, bank)),
            PatchOutput::DirectoryFiles => {
                fs::create_dir_all(target).map_err(|e| TextError::image_unavailable(target, e))?;
                let table_path = target.join(TABLE_FILE_NAME);
                let bank_path = target.join(BANK_FILE_NAME);
                write_atomic_all(&[(table_path.as_path(), table), (bank_path.as_path(), bank)])
            }
        }
    }

    /// Patch a copy of the ROM at `source` and write it to `target`. The
    /// target is only replaced once the patched image is complete.
    pub fn export_copy(
        &self,
        output: PatchOutput,
        source: &Path,
        target: &Path,
        table: &[u8],
        bank: &[u8],
    ) -> TextResult<()> {
        log::info!("exporting {output} from {} to {}", source.display(), target.display());
        let data = fs::read(source).map_err(|e| TextError::image_unavailable(source, e))?;
        let mut rom = RomFile::from_bytes(target, data);
        self.apply_to(output, &mut rom, table, bank)?;
        rom.commit()
    }
}
