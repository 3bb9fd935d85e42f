use std::fmt;

use thiserror::Error;

use crate::marker::Marker;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Malformed header: {0}")]
    MalformedHeader(String),
    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),
    #[error("No Huffman code matched within 16 bits")]
    HuffmanDecodeFailure,
    #[error("Read past the end of the stream")]
    TruncatedStream,
    #[error("Quantization table {0} was never defined")]
    MissingQuantizationTable(u8),
    #[error("Huffman table {0} (class {}, number {}) was never defined", .0 >> 4, .0 & 0x0F)]
    MissingHuffmanTable(u8),
}

/// An [`Error`] together with where in the byte stream it happened.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{source} at byte offset {offset}{}", MarkerContext(.marker))]
pub struct DecodeError {
    pub source: Error,
    /// Offset of the marker whose segment was being processed.
    pub offset: usize,
    pub marker: Option<Marker>,
}

impl DecodeError {
    pub(crate) fn new(source: Error, offset: usize, marker: Option<Marker>) -> Self {
        DecodeError {
            source,
            offset,
            marker,
        }
    }

    pub fn kind(&self) -> &Error {
        &self.source
    }
}

struct MarkerContext<'a>(&'a Option<Marker>);

impl fmt::Display for MarkerContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(marker) => write!(f, " (in {marker} segment)"),
            None => Ok(()),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
