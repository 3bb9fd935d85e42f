use crate::sample_precision::SamplePrecision;

pub const QUANTIZATION_TABLE_ELEMENTS: usize = 64;

/// Destinations 0..=3.
pub(crate) const MAX_QUANTIZATION_TABLES: usize = 4;

/// The set of 64 quantization values used to dequantize the DCT coefficients
#[derive(Debug, Clone, PartialEq)]
pub struct QuantizationTable {
    /// Specifies the precision of the Qk values. Value 0 indicates 8-bit Qk values; value 1
    /// indicates 16-bit Qk values.
    pub(crate) precision: SamplePrecision,

    /// Specifies one of four possible destinations at the decoder into which the quantization
    /// table shall be installed.
    pub(crate) table_destination_id: u8,

    /// Specifies the kth element out of 64 elements, where k is the index in the zig-zag ordering
    /// of the DCT coefficients.
    pub(crate) values: [u16; QUANTIZATION_TABLE_ELEMENTS],
}

impl QuantizationTable {
    pub fn new(table_destination_id: u8, values: [u16; QUANTIZATION_TABLE_ELEMENTS]) -> Self {
        let precision = match values.iter().all(|&q| q <= u8::MAX as u16) {
            true => SamplePrecision::EightBit,
            false => SamplePrecision::SixteenBit,
        };

        QuantizationTable {
            precision,
            table_destination_id,
            values,
        }
    }

    pub(crate) fn with_precision(mut self, precision: SamplePrecision) -> Self {
        self.precision = precision;
        self
    }

    pub fn precision(&self) -> SamplePrecision {
        self.precision
    }

    pub fn id(&self) -> u8 {
        self.table_destination_id
    }

    /// Entries in zigzag order.
    pub fn values(&self) -> &[u16; QUANTIZATION_TABLE_ELEMENTS] {
        &self.values
    }
}
