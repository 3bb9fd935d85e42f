//! Rebuilds one 8x8 block of dequantized coefficients from the entropy-coded stream.

use crate::bitreader::BitReader;
use crate::error::{Error, Result};
use crate::huffman_table::HuffmanTable;
use crate::quantization_table::QuantizationTable;

pub const BLOCK_SIZE: usize = 64;

/// Largest DC difference category for 8-bit samples.
const MAX_DC_SIZE: u8 = 11;

/// Zigzag index of each natural (row-major) position.
pub const NATURAL_TO_ZIGZAG: [usize; BLOCK_SIZE] = [
    0, 1, 5, 6, 14, 15, 27, 28, //
    2, 4, 7, 13, 16, 26, 29, 42, //
    3, 8, 12, 17, 25, 30, 41, 43, //
    9, 11, 18, 24, 31, 40, 44, 53, //
    10, 19, 23, 32, 39, 45, 52, 54, //
    20, 22, 33, 38, 46, 51, 55, 60, //
    21, 34, 37, 47, 50, 56, 59, 61, //
    35, 36, 48, 49, 57, 58, 62, 63, //
];

/// Natural (row-major) position of each zigzag index.
pub const ZIGZAG_TO_NATURAL: [usize; BLOCK_SIZE] = invert(&NATURAL_TO_ZIGZAG);

const fn invert(table: &[usize; BLOCK_SIZE]) -> [usize; BLOCK_SIZE] {
    let mut inverse = [0; BLOCK_SIZE];
    let mut i = 0;
    while i < BLOCK_SIZE {
        inverse[table[i]] = i;
        i += 1;
    }
    inverse
}

/// Recovers a signed value from `size` raw bits: the top bit set means the
/// value is positive, otherwise it lies in the negative range.
pub fn decode_magnitude(size: u8, bits: u32) -> i32 {
    if size == 0 {
        return 0;
    }

    let half = 1i32 << (size - 1);
    let bits = bits as i32;
    if bits >= half {
        bits
    } else {
        bits - (2 * half - 1)
    }
}

/// Reorders a zigzag-indexed block into natural row-major order.
pub fn zigzag_to_natural(zigzag: &[i32; BLOCK_SIZE]) -> [i32; BLOCK_SIZE] {
    let mut natural = [0; BLOCK_SIZE];
    for (position, &index) in NATURAL_TO_ZIGZAG.iter().enumerate() {
        natural[position] = zigzag[index];
    }
    natural
}

pub fn natural_to_zigzag(natural: &[i32; BLOCK_SIZE]) -> [i32; BLOCK_SIZE] {
    let mut zigzag = [0; BLOCK_SIZE];
    for (index, &position) in ZIGZAG_TO_NATURAL.iter().enumerate() {
        zigzag[index] = natural[position];
    }
    zigzag
}

/// The tables one component's blocks are decoded with.
pub(crate) struct BlockTables<'a> {
    pub(crate) dc: &'a HuffmanTable,
    pub(crate) ac: &'a HuffmanTable,
    pub(crate) quant: &'a QuantizationTable,
}

/// Decodes one block. `predictor` is the component's running DC value and is
/// updated in place. The returned block is dequantized and in natural order.
pub(crate) fn assemble_block(
    reader: &mut BitReader,
    tables: &BlockTables,
    predictor: &mut i32,
) -> Result<[i32; BLOCK_SIZE]> {
    let quant = &tables.quant.values;
    let mut coefficients = [0i32; BLOCK_SIZE];

    let size = tables.dc.decode(reader)?;
    if size > MAX_DC_SIZE {
        return Err(Error::MalformedHeader(format!(
            "DC difference of {size} bits is out of range"
        )));
    }
    let bits = reader.read_bits(size)?;
    *predictor = predictor
        .checked_add(decode_magnitude(size, bits))
        .ok_or_else(|| overflow("DC predictor"))?;
    coefficients[0] = dequantize(*predictor, quant[0])?;

    let mut index = 1;
    while index < BLOCK_SIZE {
        let rs = tables.ac.decode(reader)?;
        if rs == 0 {
            break;
        }

        let run = (rs >> 4) as usize;
        let size = rs & 0x0F;

        // a zero size with run 15 is a run of sixteen zeros
        index += run;
        let bits = reader.read_bits(size)?;
        if index < BLOCK_SIZE && size > 0 {
            coefficients[index] = dequantize(decode_magnitude(size, bits), quant[index])?;
        }
        index += 1;
    }

    Ok(zigzag_to_natural(&coefficients))
}

fn dequantize(value: i32, step: u16) -> Result<i32> {
    value
        .checked_mul(step as i32)
        .ok_or_else(|| overflow("dequantized coefficient"))
}

fn overflow(what: &str) -> Error {
    Error::MalformedHeader(format!("{what} overflows 32 bits"))
}
