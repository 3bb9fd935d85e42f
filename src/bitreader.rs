use crate::error::{Error, Result};

/// Reads bits, most significant first, from a destuffed entropy-coded segment.
pub struct BitReader {
    data: Vec<u8>,
    pub(crate) bit_cur: usize,
    pub(crate) byte_cur: usize,
}

impl BitReader {
    pub fn new(data: Vec<u8>) -> Self {
        BitReader {
            data,
            bit_cur: 0,
            byte_cur: 0,
        }
    }

    pub fn read_bit(&mut self) -> Result<u8> {
        let byte = *self.data.get(self.byte_cur).ok_or(Error::TruncatedStream)?;
        let bit = (byte >> (7 - self.bit_cur)) & 1;

        self.bit_cur += 1;
        if self.bit_cur == 8 {
            self.bit_cur = 0;
            self.byte_cur += 1;
        }

        Ok(bit)
    }

    pub fn read_bits(&mut self, n: u8) -> Result<u32> {
        debug_assert!(n <= 32);

        let mut value = 0u32;
        for _ in 0..n {
            value = (value << 1) | self.read_bit()? as u32;
        }

        Ok(value)
    }

    pub fn total_bits_read(&self) -> usize {
        self.byte_cur * 8 + self.bit_cur
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_read_bit() -> Result<()> {
        let test_cases = vec![
            (4, vec![0, 0, 0, 0, 0, 1, 0, 0]),
            (21, vec![0, 0, 0, 1, 0, 1, 0, 1]),
            (69, vec![0, 1, 0, 0, 0, 1, 0, 1]),
        ];

        for (num, expected) in test_cases {
            let mut bit_reader = BitReader::new(vec![num]);

            let got = (0..8)
                .map(|_| bit_reader.read_bit())
                .collect::<Result<Vec<_>, _>>()?;

            assert_eq!(got, expected)
        }

        Ok(())
    }

    #[test]
    fn test_read_bits_spans_bytes() -> Result<()> {
        let mut bit_reader = BitReader::new(vec![4, 21, 69]);

        assert_eq!(bit_reader.read_bits(5)?, 0b00000);
        assert_eq!(bit_reader.read_bits(6)?, 0b100000);
        assert_eq!(bit_reader.read_bits(13)?, 0b1_0101_0100_0101);
        assert_eq!(bit_reader.total_bits_read(), 24);

        Ok(())
    }

    #[test]
    fn test_read_zero_bits() -> Result<()> {
        let mut bit_reader = BitReader::new(vec![0xFF]);

        assert_eq!(bit_reader.read_bits(0)?, 0);
        assert_eq!(bit_reader.total_bits_read(), 0);

        let mut empty = BitReader::new(vec![]);
        assert_eq!(empty.read_bits(0)?, 0);

        Ok(())
    }

    #[test]
    fn test_read_past_end() -> Result<()> {
        let mut bit_reader = BitReader::new(vec![0xA5]);

        assert_eq!(bit_reader.read_bits(8)?, 0xA5);
        assert_eq!(bit_reader.read_bit(), Err(Error::TruncatedStream));

        let mut bit_reader = BitReader::new(vec![0xA5]);
        assert_eq!(bit_reader.read_bits(9), Err(Error::TruncatedStream));

        Ok(())
    }
}
