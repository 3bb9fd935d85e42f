use crate::bitreader::BitReader;
use crate::error::{Error, Result};

pub const MAX_CODE_LENGTH: usize = 16;
pub(crate) const MAX_SYMBOLS: usize = 256;

#[derive(Debug, PartialEq, Copy, Clone, Hash, Eq)]
pub enum HuffmanClass {
    DC = 0,
    AC = 1,
}

impl HuffmanClass {
    pub(crate) fn from(ht_class: u8) -> Result<Self> {
        match ht_class {
            0 => Ok(HuffmanClass::DC),
            1 => Ok(HuffmanClass::AC),
            _ => Err(Error::MalformedHeader(format!(
                "huffman table class must be 0 or 1, got {ht_class}"
            ))),
        }
    }
}

/// Composite table id, `class * 16 + number`. Always below 32.
pub(crate) fn table_id(class: HuffmanClass, number: u8) -> u8 {
    (class as u8) * 16 + number
}

/// A canonical Huffman code, derived from the number of codes of each length
/// and the symbols listed in order of increasing code length.
#[derive(Debug, Clone)]
pub struct HuffmanTable {
    pub(crate) class: HuffmanClass,
    pub(crate) destination_id: u8,
    /// counts[l - 1] is the number of codes of length l.
    counts: [u8; MAX_CODE_LENGTH],
    /// First code of each length.
    first_code: [u16; MAX_CODE_LENGTH],
    /// Position in `symbols` of the first code of each length.
    first_index: [usize; MAX_CODE_LENGTH],
    symbols: Vec<u8>,
}

impl HuffmanTable {
    pub fn new(
        class: HuffmanClass,
        destination_id: u8,
        counts: [u8; MAX_CODE_LENGTH],
        symbols: Vec<u8>,
    ) -> Result<Self> {
        let total: usize = counts.iter().map(|&c| c as usize).sum();
        if total > MAX_SYMBOLS {
            return Err(Error::MalformedHeader(format!(
                "huffman table declares {total} symbols, at most {MAX_SYMBOLS} allowed"
            )));
        }
        if total != symbols.len() {
            return Err(Error::MalformedHeader(format!(
                "huffman table declares {total} symbols but lists {}",
                symbols.len()
            )));
        }

        let mut first_code = [0u16; MAX_CODE_LENGTH];
        let mut first_index = [0usize; MAX_CODE_LENGTH];

        let mut code = 0u32;
        let mut index = 0usize;
        for (l, &count) in counts.iter().enumerate() {
            let length = l + 1;
            if code + count as u32 > 1 << length {
                return Err(Error::MalformedHeader(format!(
                    "huffman table has too many codes of length {length}"
                )));
            }

            first_code[l] = code as u16;
            first_index[l] = index;

            code = (code + count as u32) << 1;
            index += count as usize;
        }

        Ok(HuffmanTable {
            class,
            destination_id,
            counts,
            first_code,
            first_index,
            symbols,
        })
    }

    pub fn id(&self) -> u8 {
        table_id(self.class, self.destination_id)
    }

    /// Decodes one symbol, pulling one bit at a time from `reader`.
    pub fn decode(&self, reader: &mut BitReader) -> Result<u8> {
        let mut code = 0u16;

        for l in 0..MAX_CODE_LENGTH {
            let bit = reader
                .read_bit()
                .map_err(|_| Error::HuffmanDecodeFailure)?;
            code = (code << 1) | bit as u16;

            let offset = code.wrapping_sub(self.first_code[l]);
            if code >= self.first_code[l] && offset < self.counts[l] as u16 {
                return Ok(self.symbols[self.first_index[l] + offset as usize]);
            }
        }

        Err(Error::HuffmanDecodeFailure)
    }

    /// The `(code, length)` pair assigned to `symbol`, if it is in the table.
    pub fn code_for(&self, symbol: u8) -> Option<(u16, u8)> {
        let position = self.symbols.iter().position(|&s| s == symbol)?;

        (0..MAX_CODE_LENGTH).find_map(|l| {
            let start = self.first_index[l];
            let count = self.counts[l] as usize;
            (position >= start && position < start + count)
                .then(|| (self.first_code[l] + (position - start) as u16, l as u8 + 1))
        })
    }

    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }
}
