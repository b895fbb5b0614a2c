//! PPF 3.0 diff patch writer
//!
//! Layout:
//! - `"PPF30"`, encoding byte `2`
//! - 50-byte description, space padded
//! - 4 reserved zero bytes
//! - records: little-endian address, length byte, data

use super::CodeFix;

pub const MAGIC: &[u8; 5] = b"PPF30";
pub const ENCODING: u8 = 2;
pub const DESCRIPTION_LEN: usize = 50;
pub const HEADER_LEN: usize = MAGIC.len() + 1 + DESCRIPTION_LEN + 4;

/// Data bytes carried by every block record
pub const CHUNK_LEN: usize = 255;

/// Number of records `data_len` bytes are split into. The last record is
/// always zero-padded, so an exact multiple of 255 still gets one more.
pub fn chunk_count(data_len: usize) -> usize {
    data_len / CHUNK_LEN + 1
}

pub struct PpfWriter {
    out: Vec<u8>,
    wide_addresses: bool,
}

impl PpfWriter {
    pub fn new(description: &str, wide_addresses: bool) -> Self {
        let mut out = Vec::with_capacity(HEADER_LEN);
        out.extend_from_slice(MAGIC);
        out.push(ENCODING);

        let mut field = [b' '; DESCRIPTION_LEN];
        let text = description.as_bytes();
        let len = text.len().min(DESCRIPTION_LEN);
        field[..len].copy_from_slice(&text[..len]);
        out.extend_from_slice(&field);

        out.extend_from_slice(&0u32.to_be_bytes());
        Self { out, wide_addresses }
    }

    fn address(&mut self, address: u64) {
        if self.wide_addresses {
            self.out.extend_from_slice(&address.to_le_bytes());
        } else {
            self.out.extend_from_slice(&(address as u32).to_le_bytes());
        }
    }

    /// Write `data` at `base` as a run of 255-byte records
    pub fn chunked(&mut self, base: u32, data: &[u8]) -> &mut Self {
        let mut address = u64::from(base);
        for i in 0..chunk_count(data.len()) {
            let start = (i * CHUNK_LEN).min(data.len());
            let end = (start + CHUNK_LEN).min(data.len());

            self.address(address);
            self.out.push(CHUNK_LEN as u8);
            self.out.extend_from_slice(&data[start..end]);
            self.out.resize(self.out.len() + CHUNK_LEN - (end - start), 0);
            address += CHUNK_LEN as u64;
        }
        self
    }

    /// Write one two-byte code fix record
    pub fn code_fix(&mut self, fix: &CodeFix) -> &mut Self {
        self.address(u64::from(fix.address));
        self.out.push(fix.value.len() as u8);
        self.out.extend_from_slice(&fix.value);
        self
    }

    pub fn finish(self) -> Vec<u8> {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record_len(wide: bool) -> usize {
        if wide { 8 + 1 + CHUNK_LEN } else { 4 + 1 + CHUNK_LEN }
    }

    #[test]
    fn test_header() {
        let patch = PpfWriter::new("Hello", false).finish();
        assert_eq!(patch.len(), HEADER_LEN);
        assert_eq!(&patch[..6], b"PPF30\x02");
        assert_eq!(&patch[6..11], b"Hello");
        assert!(patch[11..56].iter().all(|&b| b == b' '));
        assert_eq!(&patch[56..60], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_long_description_is_cut() {
        let patch = PpfWriter::new(&"x".repeat(80), false).finish();
        assert_eq!(patch.len(), HEADER_LEN);
    }

    #[test]
    fn test_chunk_count() {
        assert_eq!(chunk_count(0), 1);
        assert_eq!(chunk_count(254), 1);
        assert_eq!(chunk_count(255), 2);
        assert_eq!(chunk_count(600), 3);
    }

    #[test]
    fn test_chunks_are_padded_and_addressed() {
        let data: Vec<u8> = (0..300u32).map(|n| (n % 251) as u8 + 1).collect();
        let mut writer = PpfWriter::new("", false);
        writer.chunked(0x008C_6000, &data);
        let patch = writer.finish();
        let body = &patch[HEADER_LEN..];
        assert_eq!(body.len(), 2 * record_len(false));

        assert_eq!(&body[0..5], &[0x00, 0x60, 0x8C, 0x00, 0xFF]);
        assert_eq!(&body[5..260], &data[..255]);

        let second = &body[260..];
        assert_eq!(&second[0..5], &[0xFF, 0x60, 0x8C, 0x00, 0xFF]);
        assert_eq!(&second[5..50], &data[255..]);
        assert!(second[50..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_code_fix_record() {
        let mut writer = PpfWriter::new("", false);
        writer.code_fix(&CodeFix::new(0x00B5_D98A, [0x07, 0x00]));
        assert_eq!(
            &writer.finish()[HEADER_LEN..],
            &[0x8A, 0xD9, 0xB5, 0x00, 0x02, 0x07, 0x00]
        );
    }

    #[test]
    fn test_wide_addresses() {
        let mut writer = PpfWriter::new("", true);
        writer.chunked(0x10, &[1, 2, 3]);
        let patch = writer.finish();
        assert_eq!(patch.len(), HEADER_LEN + record_len(true));
        assert_eq!(&patch[HEADER_LEN..HEADER_LEN + 9], &[0x10, 0, 0, 0, 0, 0, 0, 0, 0xFF]);
    }
}
