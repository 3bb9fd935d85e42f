use byteorder::{BigEndian, ByteOrder};
use log::debug;

use crate::error::{Error, Result};
use crate::frame_header::{Component, ComponentType, FrameHeader};
use crate::huffman_table::{HuffmanClass, HuffmanTable, MAX_CODE_LENGTH};
use crate::marker::Marker;
use crate::quantization_table::{
    QuantizationTable, MAX_QUANTIZATION_TABLES, QUANTIZATION_TABLE_ELEMENTS,
};
use crate::sample_precision::SamplePrecision;
use crate::scan_header::{ScanComponentSelector, ScanHeader};

/// Highest table number (Th) a Huffman table may be installed under.
const MAX_HUFFMAN_DESTINATION: u8 = 3;

/// Bounds-checked big-endian field reader over a byte region.
pub(crate) struct SegmentReader<'a> {
    data: &'a [u8],
    cursor: usize,
}

impl<'a> SegmentReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        SegmentReader { data, cursor: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.cursor
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.cursor
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8> {
        let b = *self.data.get(self.cursor).ok_or(Error::TruncatedStream)?;
        self.cursor += 1;
        Ok(b)
    }

    pub(crate) fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.read_bytes(2)?;
        Ok(BigEndian::read_u16(bytes))
    }

    pub(crate) fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(Error::TruncatedStream);
        }

        let bytes = &self.data[self.cursor..self.cursor + n];
        self.cursor += n;
        Ok(bytes)
    }
}

/// Reads one quantization table: Pq/Tq, then 64 entries in zigzag order.
pub(crate) fn parse_quant_table(reader: &mut SegmentReader) -> Result<QuantizationTable> {
    let information = reader.read_u8()?;
    let precision = SamplePrecision::decode(information >> 4)?;
    let id = information & 0x0F;

    if id as usize >= MAX_QUANTIZATION_TABLES {
        return Err(Error::MalformedHeader(format!(
            "quantization table id {id} is out of range"
        )));
    }

    let data = reader.read_bytes(QUANTIZATION_TABLE_ELEMENTS * precision.bytes_per_element())?;

    let mut values = [0u16; QUANTIZATION_TABLE_ELEMENTS];
    match precision {
        SamplePrecision::EightBit => {
            values
                .iter_mut()
                .zip(data.iter())
                .for_each(|(q, &b)| *q = b as u16);
        }
        SamplePrecision::SixteenBit => BigEndian::read_u16_into(data, &mut values),
    }

    debug!("quantization table {id}, {precision:?}");

    Ok(QuantizationTable::new(id, values).with_precision(precision))
}

/// Reads one Huffman table: Tc/Th, the 16-entry length histogram and the symbols.
pub(crate) fn parse_huffman_table(reader: &mut SegmentReader) -> Result<HuffmanTable> {
    let information = reader.read_u8()?;
    let class = HuffmanClass::from(information >> 4)?;
    let number = information & 0x0F;

    if number > MAX_HUFFMAN_DESTINATION {
        return Err(Error::MalformedHeader(format!(
            "huffman table number {number} is out of range"
        )));
    }

    let mut counts = [0u8; MAX_CODE_LENGTH];
    counts.copy_from_slice(reader.read_bytes(MAX_CODE_LENGTH)?);

    let total: usize = counts.iter().map(|&c| c as usize).sum();
    let symbols = reader.read_bytes(total)?.to_vec();

    debug!("huffman table {class:?} {number}, {total} symbols");

    HuffmanTable::new(class, number, counts, symbols)
}

pub(crate) fn parse_start_of_frame(reader: &mut SegmentReader) -> Result<FrameHeader> {
    let precision = SamplePrecision::parse(reader.read_u8()?)?;
    let image_height = reader.read_u16()? as usize;
    let image_width = reader.read_u16()? as usize;

    let num_components = reader.read_u8()?;
    let component_type = ComponentType::from(num_components).ok_or_else(|| {
        Error::UnsupportedFeature(format!("frames with {num_components} components"))
    })?;

    let mut components = Vec::with_capacity(num_components as usize);
    for _ in 0..num_components {
        let component_id = reader.read_u8()?;
        let sampling_factor = reader.read_u8()?;
        let (horizontal_factor, vertical_factor) = (sampling_factor >> 4, sampling_factor & 0x0F);
        let qt_table_id = reader.read_u8()?;

        if qt_table_id as usize >= MAX_QUANTIZATION_TABLES {
            return Err(Error::MalformedHeader(format!(
                "component {component_id} selects quantization table {qt_table_id}"
            )));
        }

        components.push(Component::from(
            component_id,
            horizontal_factor,
            vertical_factor,
            qt_table_id,
        ));
    }

    if image_width == 0 || image_height == 0 {
        return Err(Error::MalformedHeader(format!(
            "image dimensions {image_width}x{image_height}"
        )));
    }

    Ok(FrameHeader {
        precision,
        image_height,
        image_width,
        component_type,
        components,
    })
}

pub(crate) fn parse_start_of_scan(reader: &mut SegmentReader) -> Result<ScanHeader> {
    let num_components = reader.read_u8()?;
    if num_components == 0 || num_components > 4 {
        return Err(Error::MalformedHeader(format!(
            "scan with {num_components} components"
        )));
    }

    let mut scan_component_selectors = Vec::with_capacity(num_components as usize);
    for _ in 0..num_components {
        let component_id = reader.read_u8()?;
        let table_ids = reader.read_u8()?;
        scan_component_selectors.push(ScanComponentSelector::from(
            component_id,
            table_ids >> 4,
            table_ids & 0x0F,
        ));
    }

    let start_of_spectral = reader.read_u8()?;
    let end_of_spectral = reader.read_u8()?;
    let approx_bit_chunk = reader.read_u8()?;

    Ok(ScanHeader {
        scan_component_selectors,
        start_of_spectral,
        end_of_spectral,
        successive_approx_bit_position_high: approx_bit_chunk >> 4,
        point_transform: approx_bit_chunk & 0x0F,
    })
}

pub(crate) fn parse_restart_interval(reader: &mut SegmentReader) -> Result<u16> {
    reader.read_u16()
}

/// Removes byte stuffing from entropy-coded data.
///
/// Every `0xFF 0x00` becomes `0xFF`. Scanning stops at the first `0xFF` followed by
/// any other byte; the returned offset points at that `0xFF`, or at the end of
/// `data` if no marker follows.
pub fn destuff(data: &[u8]) -> (Vec<u8>, usize) {
    let mut result = Vec::with_capacity(data.len());
    let mut i = 0;

    while i < data.len() {
        let b = data[i];
        if b == Marker::GLOBAL {
            match data.get(i + 1) {
                Some(0x00) => {
                    result.push(b);
                    i += 2;
                    continue;
                }
                Some(_) => break,
                None => {}
            }
        }

        result.push(b);
        i += 1;
    }

    (result, i)
}
