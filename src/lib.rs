//! Baseline JPEG decoding into 8x8 RGB blocks.
//!
//! ```no_run
//! use baseline_jpeg::decoder::Decoder;
//!
//! # fn main() -> anyhow::Result<()> {
//! let decoder = Decoder::from_file_path("image.jpg")?;
//! for block in decoder.blocks() {
//!     let block = block?;
//!     println!("({}, {}) {:?}", block.column, block.row, block.pixel(0, 0));
//! }
//! # Ok(())
//! # }
//! ```

/// The decoder takes as input compressed image data and table specifications, and by means of a
/// specific set of procedures generates as output `digital reconstructed image data`.
pub mod decoder;

pub mod bitreader;
pub mod coefficient;
pub mod color_spaces;
pub mod error;
pub mod frame_header;
pub mod huffman_table;
pub mod idct;
pub mod image;
pub mod marker;
pub mod parser;
pub mod quantization_table;
pub mod sample_precision;
pub mod scan_header;

#[cfg(test)]
pub(crate) mod test_util;

pub use decoder::{Blocks, Decoder, DecoderOptions, SegmentPolicy};
pub use error::{DecodeError, Error};
pub use image::{Block, Image};
