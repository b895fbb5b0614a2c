//! Editing session: import, edit, export

use crate::codes::CodeTable;
use crate::common::{format_message_id, TextResult, TextWarning};
use crate::config::Config;
use crate::image::{ImageReader, RomFile, RomImage};
use crate::message::{Message, MessageWarnings};
use crate::patch::{PatchAssembler, PatchOutput, RomLayout};
use crate::table::{pack_messages, read_table, PackedTables};
use crate::text::MessageCodec;
use std::path::Path;

/// Owns the message list between import and export
pub struct Session {
    codes: CodeTable,
    assembler: PatchAssembler,
    messages: Vec<Message>,
    import_warnings: Vec<MessageWarnings>,
}

impl Session {
    pub fn new(codes: CodeTable, layout: RomLayout) -> Self {
        Self {
            codes,
            assembler: PatchAssembler::new(layout),
            messages: Vec::new(),
            import_warnings: Vec::new(),
        }
    }

    pub fn from_config(config: &Config) -> TextResult<Self> {
        Ok(Self::new(config.code_table()?, config.layout.clone()))
    }

    pub fn control_code_table(&self) -> &CodeTable {
        &self.codes
    }

    /// Table for adding or removing literal overrides
    pub fn control_code_table_mut(&mut self) -> &mut CodeTable {
        &mut self.codes
    }

    pub fn layout(&self) -> &RomLayout {
        self.assembler.layout()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn messages_mut(&mut self) -> &mut Vec<Message> {
        &mut self.messages
    }

    pub fn set_messages(&mut self, messages: Vec<Message>) {
        self.messages = messages;
        self.import_warnings.clear();
    }

    /// Decode warnings from the last import
    pub fn import_warnings(&self) -> &[MessageWarnings] {
        &self.import_warnings
    }

    /// Read every message from `source`, replacing the current list.
    /// Truncated input aborts the import and keeps the old list.
    pub fn import_from(&mut self, source: &dyn RomImage) -> TextResult<&[Message]> {
        let layout = self.assembler.layout();
        let records = read_table(source, u64::from(layout.table_base))?;
        let codec = MessageCodec::new(&self.codes);

        let mut messages = Vec::with_capacity(records.len());
        let mut warnings = Vec::new();
        let mut reader = ImageReader::new(source, 0);
        for record in &records {
            reader.seek(u64::from(layout.bank_base) + u64::from(record.offset()));
            let decoded = codec.decode(&mut reader)?;
            if !decoded.warnings.is_empty() {
                log_warnings(record.message_id, &decoded.warnings);
                warnings.push(MessageWarnings {
                    id: record.message_id,
                    text: decoded.text.clone(),
                    warnings: decoded.warnings,
                });
            }
            messages.push(Message::from_record(record, decoded.text));
        }

        log::info!(
            "imported {} messages ({} with warnings)",
            messages.len(),
            warnings.len()
        );
        self.messages = messages;
        self.import_warnings = warnings;
        Ok(&self.messages)
    }

    pub fn import_file(&mut self, path: &Path) -> TextResult<&[Message]> {
        let rom = RomFile::open(path)?;
        self.import_from(&rom)
    }

    /// Encode and pack the current messages with `codes`
    pub fn pack(&self, codes: &CodeTable) -> PackedTables {
        let packed = pack_messages(&self.messages, codes, self.layout().segment);
        for entry in &packed.warnings {
            log_warnings(entry.id, &entry.warnings);
        }
        packed
    }

    /// Encode, pack and write the messages to `target`. A message that fails
    /// to encode stops the export before anything is written.
    pub fn export_to(
        &self,
        target: &Path,
        output: PatchOutput,
        codes: &CodeTable,
    ) -> TextResult<Vec<MessageWarnings>> {
        let packed = self.pack(codes).check()?;
        self.assembler.export(output, target, &packed.table, &packed.bank)?;
        Ok(packed.warnings)
    }

    /// Like `export_to`, into an image held by the caller
    pub fn export_into(
        &self,
        image: &mut dyn RomImage,
        output: PatchOutput,
        codes: &CodeTable,
    ) -> TextResult<Vec<MessageWarnings>> {
        let packed = self.pack(codes).check()?;
        self.assembler.apply_to(output, image, &packed.table, &packed.bank)?;
        Ok(packed.warnings)
    }

    /// Write tables that were already packed
    pub fn export_packed(&self, packed: &PackedTables, target: &Path, output: PatchOutput) -> TextResult<()> {
        self.assembler.export(output, target, &packed.table, &packed.bank)
    }

    /// Write packed tables into a patched copy of `source` at `target`
    pub fn export_packed_copy(
        &self,
        packed: &PackedTables,
        source: &Path,
        target: &Path,
        output: PatchOutput,
    ) -> TextResult<()> {
        self.assembler
            .export_copy(output, source, target, &packed.table, &packed.bank)
    }
}

fn log_warnings(id: i16, warnings: &[TextWarning]) {
    for warning in warnings {
        log::warn!("message {}: {}", format_message_id(id), warning.message);
    }
}
