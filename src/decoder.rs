use crate::bitreader::BitReader;
use crate::coefficient::{assemble_block, BlockTables, BLOCK_SIZE};
use crate::color_spaces::convert_block;
use crate::error::{DecodeError, Error};
use crate::frame_header::{Component, FrameHeader};
use crate::huffman_table::{table_id, HuffmanClass, HuffmanTable};
use crate::idct::Idct;
use crate::image::{Block, Image};
use crate::marker::{Marker, MarkerType};
use crate::parser::{
    destuff, parse_huffman_table, parse_quant_table, parse_restart_interval,
    parse_start_of_frame, parse_start_of_scan, SegmentReader,
};
use crate::quantization_table::{QuantizationTable, MAX_QUANTIZATION_TABLES};
use log::{debug, info, trace, warn};
use memmap::Mmap;
use std::fs::File;
use std::ops::Deref;

const MAX_HUFFMAN_TABLES: usize = 32;

/// What to do with a DQT or DHT segment that holds more than one table.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum SegmentPolicy {
    /// Install the first table and skip the rest of the segment.
    #[default]
    FirstOnly,
    /// Fail with [`Error::UnsupportedFeature`].
    Reject,
    /// Install every table in the segment.
    ParseAll,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct DecoderOptions {
    pub segment_policy: SegmentPolicy,
}

/// Baseline JPEG decoder over an in-memory or memory-mapped buffer.
pub struct Decoder<B = Vec<u8>> {
    pub(crate) buffer: B,
    pub(crate) options: DecoderOptions,
}

impl Decoder<Mmap> {
    pub fn from_file(file: File) -> anyhow::Result<Self> {
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Decoder::new(mmap))
    }

    pub fn from_file_path(file_path: &str) -> anyhow::Result<Self> {
        let file = File::open(file_path)?;
        Decoder::from_file(file)
    }
}

impl<B: Deref<Target = [u8]>> Decoder<B> {
    pub fn new(buffer: B) -> Self {
        Decoder::with_options(buffer, DecoderOptions::default())
    }

    pub fn with_options(buffer: B, options: DecoderOptions) -> Self {
        Decoder { buffer, options }
    }

    pub fn options(&self) -> DecoderOptions {
        self.options
    }

    /// Decodes lazily, one MCU per item. Every call starts again from the
    /// beginning of the image.
    pub fn blocks(&self) -> Blocks<'_> {
        Blocks::new(&self.buffer, self.options)
    }

    /// Decodes the whole image into an RGB raster.
    pub fn decode_to_rgb(&self) -> Result<Image, DecodeError> {
        let mut blocks = self.blocks();
        let mut image = None;

        while let Some(block) = blocks.next() {
            let block = block?;
            let image = image.get_or_insert_with(|| match blocks.frame_header() {
                Some(header) => Image::new(header.width(), header.height()),
                None => Image::new(0, 0),
            });
            image.put_block(&block);
        }

        match (image, blocks.frame_header()) {
            (Some(image), _) => Ok(image),
            (None, Some(header)) => Ok(Image::new(header.width(), header.height())),
            (None, None) => Err(DecodeError::new(
                Error::MalformedHeader("image has no frame header".to_string()),
                blocks.cursor,
                None,
            )),
        }
    }
}

enum State {
    AwaitStart,
    HeaderParsing,
    ScanActive(Scan),
    Done,
}

/// Per-scan decoding state: the bit cursor and one DC predictor per component.
struct Scan {
    reader: BitReader,
    predictors: [i32; 3],
    next_mcu: usize,
    columns: usize,
    rows: usize,
    /// Where marker parsing picks up once every MCU is decoded.
    resume: usize,
    /// Offset of the SOS marker, reported with errors.
    offset: usize,
}

impl Scan {
    fn finished(&self) -> bool {
        self.next_mcu >= self.columns * self.rows
    }
}

/// Lazy sequence of decoded blocks. Fused after the end of the image or the
/// first error.
pub struct Blocks<'a> {
    data: &'a [u8],
    options: DecoderOptions,
    cursor: usize,
    state: State,
    quant_tables: [Option<QuantizationTable>; MAX_QUANTIZATION_TABLES],
    huffman_tables: [Option<HuffmanTable>; MAX_HUFFMAN_TABLES],
    frame_header: Option<FrameHeader>,
    idct: Idct,
}

impl<'a> Blocks<'a> {
    pub(crate) fn new(data: &'a [u8], options: DecoderOptions) -> Self {
        Blocks {
            data,
            options,
            cursor: 0,
            state: State::AwaitStart,
            quant_tables: std::array::from_fn(|_| None),
            huffman_tables: std::array::from_fn(|_| None),
            frame_header: None,
            idct: Idct::new(),
        }
    }

    /// The frame header, once the SOF0 segment has been parsed.
    pub fn frame_header(&self) -> Option<&FrameHeader> {
        self.frame_header.as_ref()
    }

    fn step(&mut self) -> Result<Option<Block>, DecodeError> {
        loop {
            match std::mem::replace(&mut self.state, State::Done) {
                State::AwaitStart => {
                    self.check_start_of_image()?;
                    self.state = State::HeaderParsing;
                }
                State::HeaderParsing => {
                    self.state = self.parse_segment()?;
                }
                State::ScanActive(mut scan) => {
                    if scan.finished() {
                        debug!(
                            "scan finished after {} bits, resuming at {}",
                            scan.reader.total_bits_read(),
                            scan.resume
                        );
                        self.cursor = scan.resume;
                        self.state = State::HeaderParsing;
                        continue;
                    }

                    let block = self.decode_mcu(&mut scan)?;
                    self.state = State::ScanActive(scan);
                    return Ok(Some(block));
                }
                State::Done => return Ok(None),
            }
        }
    }

    fn check_start_of_image(&mut self) -> Result<(), DecodeError> {
        let mut reader = SegmentReader::new(self.data);
        let err = |e| DecodeError::new(e, 0, None);

        let start = [reader.read_u8().map_err(err)?, reader.read_u8().map_err(err)?];
        if start != [Marker::GLOBAL, Marker::SOI.to_u8()] {
            return Err(DecodeError::new(
                Error::MalformedHeader(format!(
                    "expected SOI, found {:02X}{:02X}",
                    start[0], start[1]
                )),
                0,
                Marker::from_u8(start[1]),
            ));
        }

        self.cursor = Marker::SIZE;
        Ok(())
    }

    /// Reads the marker at the cursor, skipping fill bytes.
    fn read_marker(&mut self) -> Result<Marker, DecodeError> {
        let offset = self.cursor;
        let mut reader = SegmentReader::new(&self.data[self.cursor..]);
        let err = |e| DecodeError::new(e, offset, None);

        let first = reader.read_u8().map_err(err)?;
        if first != Marker::GLOBAL {
            return Err(err(Error::MalformedHeader(format!(
                "expected a marker, found {first:#04X}"
            ))));
        }

        let mut low = reader.read_u8().map_err(err)?;
        while low == Marker::GLOBAL {
            low = reader.read_u8().map_err(err)?;
        }

        let marker = Marker::from_u8(low).ok_or_else(|| {
            err(Error::MalformedHeader(
                "stuffed zero byte where a marker was expected".to_string(),
            ))
        })?;

        self.cursor += reader.position();
        Ok(marker)
    }

    /// Reads a segment's length field and returns its payload, moving the cursor past it.
    fn read_segment(&mut self, offset: usize, marker: Marker) -> Result<&'a [u8], DecodeError> {
        let data = self.data;
        let mut reader = SegmentReader::new(&data[self.cursor..]);
        let err = |e| DecodeError::new(e, offset, Some(marker));

        let length = reader.read_u16().map_err(err)? as usize;
        if length < 2 {
            return Err(err(Error::MalformedHeader(format!("segment length {length}"))));
        }

        let payload = reader.read_bytes(length - 2).map_err(err)?;
        self.cursor += length;
        Ok(payload)
    }

    fn parse_segment(&mut self) -> Result<State, DecodeError> {
        let offset = self.cursor;
        let marker = self.read_marker()?;

        if let MarkerType::StandAlone = marker.is_segment() {
            return match marker {
                Marker::EOI => {
                    debug!("end of image at {offset}");
                    Ok(State::Done)
                }
                Marker::SOI => Err(DecodeError::new(
                    Error::MalformedHeader("repeated start of image".to_string()),
                    offset,
                    Some(marker),
                )),
                _ => {
                    debug!("skipping standalone {marker} at {offset}");
                    Ok(State::HeaderParsing)
                }
            };
        }

        let payload = self.read_segment(offset, marker)?;
        let context = |e: Error| DecodeError::new(short_segment(e), offset, Some(marker));

        match marker {
            Marker::DQT => self.define_quantization_tables(payload).map_err(context)?,
            Marker::DHT => self.define_huffman_tables(payload).map_err(context)?,
            Marker::SOF(0) => {
                if self.frame_header.is_some() {
                    return Err(context(Error::MalformedHeader(
                        "second frame header".to_string(),
                    )));
                }

                let frame_header =
                    parse_start_of_frame(&mut SegmentReader::new(payload)).map_err(context)?;
                info!(
                    "baseline frame {}x{}, {} components",
                    frame_header.width(),
                    frame_header.height(),
                    frame_header.components().len()
                );
                self.frame_header = Some(frame_header);
            }
            Marker::SOF(_) => {
                return Err(context(Error::UnsupportedFeature(format!(
                    "{marker} frames, only baseline DCT is decoded"
                ))));
            }
            Marker::DRI => {
                let interval =
                    parse_restart_interval(&mut SegmentReader::new(payload)).map_err(context)?;
                if interval != 0 {
                    return Err(context(Error::UnsupportedFeature(format!(
                        "restart interval {interval}"
                    ))));
                }
            }
            Marker::SOS => {
                let scan = self.start_scan(payload, offset).map_err(context)?;
                return Ok(State::ScanActive(scan));
            }
            _ => debug!("skipping {marker} at {offset}, {} bytes", payload.len()),
        }

        Ok(State::HeaderParsing)
    }

    fn define_quantization_tables(&mut self, payload: &[u8]) -> Result<(), Error> {
        let quant_tables = &mut self.quant_tables;
        read_tables(
            payload,
            self.options.segment_policy,
            "quantization",
            parse_quant_table,
            |table| {
                let id = table.id() as usize;
                quant_tables[id] = Some(table);
            },
        )
    }

    fn define_huffman_tables(&mut self, payload: &[u8]) -> Result<(), Error> {
        let huffman_tables = &mut self.huffman_tables;
        read_tables(
            payload,
            self.options.segment_policy,
            "huffman",
            parse_huffman_table,
            |table| {
                let id = table.id() as usize;
                huffman_tables[id] = Some(table);
            },
        )
    }

    fn start_scan(&self, payload: &[u8], offset: usize) -> Result<Scan, Error> {
        let frame_header = self.frame_header.as_ref().ok_or_else(|| {
            Error::MalformedHeader("start of scan before the frame header".to_string())
        })?;

        let scan_header = parse_start_of_scan(&mut SegmentReader::new(payload))?;
        let selectors = &scan_header.scan_component_selectors;
        if selectors.len() != frame_header.components.len() {
            return Err(Error::UnsupportedFeature(format!(
                "scan covering {} of {} components",
                selectors.len(),
                frame_header.components.len()
            )));
        }

        if !scan_header.is_sequential() {
            warn!("ignoring spectral selection of a baseline scan: {scan_header:?}");
        }

        for (index, (component, selector)) in
            frame_header.components.iter().zip(selectors).enumerate()
        {
            if selector.component_id != component.component_id {
                return Err(Error::MalformedHeader(format!(
                    "scan component {} where the frame has component {}",
                    selector.component_id, component.component_id
                )));
            }

            let (dc, ac) = huffman_destinations(index);
            if selector.dc_destination_id != dc || selector.ac_destination_id != ac {
                warn!(
                    "component {} selects huffman tables {}/{}, decoding with {dc}/{ac}",
                    component.component_id, selector.dc_destination_id, selector.ac_destination_id
                );
            }

            // fail here rather than partway through the scan
            self.block_tables(index, component)?;
        }

        let (columns, rows) = frame_header.blocks();
        if frame_header.width() % 8 != 0 || frame_header.height() % 8 != 0 {
            warn!(
                "{}x{} is not a multiple of 8, decoding {columns}x{rows} whole blocks",
                frame_header.width(),
                frame_header.height()
            );
        }

        let entropy_start = self.cursor;
        let (entropy_data, boundary) = destuff(&self.data[entropy_start..]);
        debug!(
            "scan of {columns}x{rows} MCUs, {} entropy-coded bytes",
            entropy_data.len()
        );

        Ok(Scan {
            reader: BitReader::new(entropy_data),
            predictors: [0; 3],
            next_mcu: 0,
            columns,
            rows,
            resume: entropy_start + boundary,
            offset,
        })
    }

    fn block_tables(&self, index: usize, component: &Component) -> Result<BlockTables<'_>, Error> {
        let (dc, ac) = huffman_destinations(index);
        let huffman = |class, number| {
            let id = table_id(class, number);
            self.huffman_tables[id as usize]
                .as_ref()
                .ok_or(Error::MissingHuffmanTable(id))
        };

        let qt_id = component.qt_table_id;
        let quant = self.quant_tables[qt_id as usize]
            .as_ref()
            .ok_or(Error::MissingQuantizationTable(qt_id))?;

        Ok(BlockTables {
            dc: huffman(HuffmanClass::DC, dc)?,
            ac: huffman(HuffmanClass::AC, ac)?,
            quant,
        })
    }

    fn decode_mcu(&self, scan: &mut Scan) -> Result<Block, DecodeError> {
        let offset = scan.offset;
        let err = |e| DecodeError::new(e, offset, Some(Marker::SOS));
        let frame_header = self.frame_header.as_ref().ok_or_else(|| {
            err(Error::MalformedHeader(
                "scan without a frame header".to_string(),
            ))
        })?;

        let (column, row) = (scan.next_mcu % scan.columns, scan.next_mcu / scan.columns);
        let mut samples = [[0i32; BLOCK_SIZE]; 3];

        for (index, component) in frame_header.components.iter().enumerate() {
            let tables = self.block_tables(index, component).map_err(err)?;
            let coefficients =
                assemble_block(&mut scan.reader, &tables, &mut scan.predictors[index])
                    .map_err(err)?;
            samples[index] = self.idct.perform_idct(&coefficients);
        }

        trace!(
            "MCU ({column}, {row}), predictors {:?}, {} of {} bytes read",
            scan.predictors,
            scan.reader.total_bits_read() / 8,
            scan.reader.len()
        );

        scan.next_mcu += 1;

        let [ys, cbs, crs] = &samples;
        Ok(Block {
            column,
            row,
            pixels: convert_block(ys, cbs, crs),
        })
    }
}

impl Iterator for Blocks<'_> {
    type Item = Result<Block, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.step() {
            Ok(Some(block)) => Some(Ok(block)),
            Ok(None) => None,
            Err(e) => {
                self.state = State::Done;
                Some(Err(e))
            }
        }
    }
}

impl std::iter::FusedIterator for Blocks<'_> {}

/// DC and AC table numbers by component position. Luma uses tables 0, both
/// chroma components share tables 1, whatever the scan header selects.
fn huffman_destinations(index: usize) -> (u8, u8) {
    match index {
        0 => (0, 0),
        _ => (1, 1),
    }
}

/// Running out of bytes inside a segment means its length field was too short.
fn short_segment(e: Error) -> Error {
    match e {
        Error::TruncatedStream => {
            Error::MalformedHeader("segment is shorter than its contents".to_string())
        }
        e => e,
    }
}

fn read_tables<T>(
    payload: &[u8],
    policy: SegmentPolicy,
    kind: &str,
    parse: impl Fn(&mut SegmentReader) -> Result<T, Error>,
    mut install: impl FnMut(T),
) -> Result<(), Error> {
    let mut reader = SegmentReader::new(payload);

    loop {
        install(parse(&mut reader)?);

        if reader.remaining() == 0 {
            return Ok(());
        }

        match policy {
            SegmentPolicy::FirstOnly => {
                warn!(
                    "ignoring {} trailing bytes of additional {kind} tables",
                    reader.remaining()
                );
                return Ok(());
            }
            SegmentPolicy::Reject => {
                return Err(Error::UnsupportedFeature(format!(
                    "multiple {kind} tables in one segment"
                )));
            }
            SegmentPolicy::ParseAll => {}
        }
    }
}
