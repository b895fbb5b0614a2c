//! String bank packing

use crate::common::{TextError, TextResult};
use crate::text::TERMINATOR;

/// Every entry starts on this boundary
pub const BANK_ALIGNMENT: usize = 4;

/// Largest offset a table record can hold
pub const MAX_BANK_OFFSET: usize = 0x00FF_FFFF;

/// Growing string bank. Each entry is the encoded bytes, the terminator,
/// then zero padding up to the next 4-byte boundary.
#[derive(Debug, Clone, Default)]
pub struct StringBankBuilder {
    bytes: Vec<u8>,
}

impl StringBankBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one message and return the offset it starts at. Fails when
    /// that offset no longer fits a table record.
    pub fn append(&mut self, encoded: &[u8]) -> TextResult<u32> {
        let offset = self.bytes.len();
        if offset > MAX_BANK_OFFSET {
            return Err(TextError::bank_overflow(offset));
        }
        self.bytes.extend_from_slice(encoded);
        self.bytes.push(TERMINATOR);
        self.pad();
        Ok(offset as u32)
    }

    fn pad(&mut self) {
        let aligned = (self.bytes.len() + (BANK_ALIGNMENT - 1)) & !(BANK_ALIGNMENT - 1);
        self.bytes.resize(aligned, 0);
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_append_pads_to_four() {
        let mut bank = StringBankBuilder::new();
        assert_eq!(bank.append(b"Hi").unwrap(), 0);
        assert_eq!(bank.as_bytes(), b"Hi\x02\x00");
        assert_eq!(bank.append(b"abc").unwrap(), 4);
        assert_eq!(bank.len(), 8);
        assert_eq!(bank.append(b"abcd").unwrap(), 8);
        assert_eq!(bank.as_bytes()[8..], *b"abcd\x02\x00\x00\x00");
    }

    #[test]
    fn test_empty_message_takes_one_word() {
        let mut bank = StringBankBuilder::new();
        assert_eq!(bank.append(&[]).unwrap(), 0);
        assert_eq!(bank.into_bytes(), vec![0x02, 0, 0, 0]);
    }

    #[test]
    fn test_length_stays_aligned() {
        let mut bank = StringBankBuilder::new();
        for n in 0..32 {
            let offset = bank.append(&vec![b'x'; n]).unwrap();
            assert_eq!(offset as usize % BANK_ALIGNMENT, 0);
            assert_eq!(bank.len() % BANK_ALIGNMENT, 0);
        }
    }

    #[test]
    fn test_offset_past_24_bits_is_rejected() {
        let mut bank = StringBankBuilder::new();
        assert_eq!(bank.append(&vec![b'x'; MAX_BANK_OFFSET - 4]).unwrap(), 0);
        assert_eq!(bank.len(), MAX_BANK_OFFSET - 3);
        assert_eq!(bank.append(b"ab").unwrap() as usize, MAX_BANK_OFFSET - 3);
        assert_eq!(bank.len(), MAX_BANK_OFFSET + 1);

        let err = bank.append(b"c").unwrap_err();
        assert!(matches!(err, TextError::BankOverflow { offset, .. } if offset == MAX_BANK_OFFSET + 1));
        assert_eq!(bank.len(), MAX_BANK_OFFSET + 1);
    }
}
