//! Message table and string bank
//!
//! The table is a run of 8-byte records ending with an id `-1` record. Each
//! record points into the string bank, where messages sit back to back on
//! 4-byte boundaries.

mod bank;
mod record;

pub use bank::{StringBankBuilder, BANK_ALIGNMENT, MAX_BANK_OFFSET};
pub use record::{
    BoxPosition, BoxType, TableRecord, CHARACTER_TABLE_ID, RECORD_SIZE, TERMINATOR_ID,
};

use crate::codes::CodeTable;
use crate::common::{TextError, TextResult};
use crate::image::{ImageReader, RomImage};
use crate::message::{Message, MessageWarnings};
use crate::text::MessageCodec;

/// Read records from `table_base` up to, not including, the terminator
pub fn read_table(image: &dyn RomImage, table_base: u64) -> TextResult<Vec<TableRecord>> {
    let mut reader = ImageReader::new(image, table_base);
    let mut records = Vec::new();
    loop {
        let record = TableRecord::read(&mut reader)?;
        if record.is_terminator() {
            break;
        }
        log::debug!("table record {record}");
        records.push(record);
    }
    Ok(records)
}

/// Serialize `records` followed by exactly one terminator record
pub fn write_table(records: &[TableRecord], segment: u8) -> Vec<u8> {
    let mut bytes = Vec::with_capacity((records.len() + 1) * RECORD_SIZE);
    for record in records.iter().filter(|r| !r.is_terminator()) {
        bytes.extend_from_slice(&record.to_bytes(segment));
    }
    bytes.extend_from_slice(&TableRecord::terminator().to_bytes(segment));
    bytes
}

/// Move the character table entry to the front. Everything else keeps its
/// relative order.
pub fn character_table_first<T>(items: &mut [T], id_of: impl Fn(&T) -> i16) {
    items.sort_by_key(|item| id_of(item) != CHARACTER_TABLE_ID);
}

/// Encoded table and bank, ready for a patch strategy
#[derive(Debug, Default)]
pub struct PackedTables {
    pub records: Vec<TableRecord>,
    pub table: Vec<u8>,
    pub bank: Vec<u8>,
    pub warnings: Vec<MessageWarnings>,
    /// Messages that could not be encoded at all
    pub failures: Vec<TextError>,
}

impl PackedTables {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Fail with the first encode failure. The others are logged.
    pub fn check(mut self) -> TextResult<Self> {
        if self.failures.is_empty() {
            return Ok(self);
        }
        for failure in &self.failures[1..] {
            log::error!("{failure}");
        }
        Err(self.failures.remove(0))
    }
}

/// Encode `messages` in table order and pack them into a fresh bank.
///
/// The character table entry is packed first so its offset is always 0. A
/// message with a malformed tag is recorded in `failures` and left out;
/// packing continues so every failure is reported at once. A bank that
/// outgrows the 24-bit record offset stops packing with a `BankOverflow`.
pub fn pack_messages(messages: &[Message], codes: &CodeTable, segment: u8) -> PackedTables {
    let codec = MessageCodec::new(codes);
    let mut ordered: Vec<&Message> = messages.iter().filter(|m| m.id != TERMINATOR_ID).collect();
    character_table_first(&mut ordered, |m| m.id);

    let mut bank = StringBankBuilder::new();
    let mut packed = PackedTables::default();

    for message in ordered {
        let encoded = match codec.encode(&message.text) {
            Ok(encoded) => encoded,
            Err(err) => {
                packed.failures.push(err.in_message(message.id));
                continue;
            }
        };
        let offset = match bank.append(&encoded.bytes) {
            Ok(offset) => offset,
            Err(err) => {
                packed.failures.push(err.in_message(message.id));
                break;
            }
        };
        log::debug!(
            "packed message {:#06X} at {offset:#X} ({} bytes)",
            message.id as u16,
            encoded.bytes.len()
        );
        packed.records.push(message.record(offset));
        if !encoded.warnings.is_empty() {
            packed.warnings.push(MessageWarnings {
                id: message.id,
                text: message.text.clone(),
                warnings: encoded.warnings,
            });
        }
    }

    packed.table = write_table(&packed.records, segment);
    packed.bank = bank.into_bytes();
    log::info!(
        "packed {} messages: table {} bytes, bank {} bytes",
        packed.records.len(),
        packed.table.len(),
        packed.bank.len()
    );
    packed
}
