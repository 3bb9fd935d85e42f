use crate::error::{Error, Result};

/// Precision of quantization table entries (Pq).
#[derive(Debug, PartialEq, Copy, Clone)]
pub enum SamplePrecision {
    EightBit,
    SixteenBit,
}

impl SamplePrecision {
    /// Decodes the Pq nibble of a quantization table header.
    pub(crate) fn decode(b: u8) -> Result<Self> {
        match b {
            0 => Ok(SamplePrecision::EightBit),
            1 => Ok(SamplePrecision::SixteenBit),
            _ => Err(Error::MalformedHeader(format!(
                "quantization table precision must be 0 or 1, got {b}"
            ))),
        }
    }

    /// Parses the P field of a frame header. Only 8-bit samples are decoded.
    pub(crate) fn parse(number_of_bits: u8) -> Result<Self> {
        match number_of_bits {
            8 => Ok(SamplePrecision::EightBit),
            12 | 16 => Err(Error::UnsupportedFeature(format!(
                "{number_of_bits}-bit sample precision"
            ))),
            _ => Err(Error::MalformedHeader(format!(
                "invalid sample precision {number_of_bits}"
            ))),
        }
    }

    pub(crate) fn bytes_per_element(&self) -> usize {
        match self {
            SamplePrecision::EightBit => 1,
            SamplePrecision::SixteenBit => 2,
        }
    }
}
