//! Helpers for building synthetic JPEG streams in tests.

use crate::huffman_table::MAX_CODE_LENGTH;
use crate::marker::Marker;

pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Packs bits most significant first. The final byte is padded with ones.
pub(crate) struct BitWriter {
    bytes: Vec<u8>,
    current: u8,
    filled: u8,
}

impl BitWriter {
    pub(crate) fn new() -> Self {
        BitWriter {
            bytes: vec![],
            current: 0,
            filled: 0,
        }
    }

    pub(crate) fn write(&mut self, value: u32, length: u8) {
        for i in (0..length).rev() {
            self.current = (self.current << 1) | ((value >> i) & 1) as u8;
            self.filled += 1;

            if self.filled == 8 {
                self.bytes.push(self.current);
                self.current = 0;
                self.filled = 0;
            }
        }
    }

    pub(crate) fn finish(mut self) -> Vec<u8> {
        if self.filled > 0 {
            let pad = 8 - self.filled;
            self.bytes.push((self.current << pad) | ((1 << pad) - 1));
        }
        self.bytes
    }
}

/// Inserts a `0x00` after every `0xFF`.
pub(crate) fn stuff(data: &[u8]) -> Vec<u8> {
    let mut stuffed = Vec::with_capacity(data.len());
    for &b in data {
        stuffed.push(b);
        if b == 0xFF {
            stuffed.push(0x00);
        }
    }
    stuffed
}

pub(crate) struct JpegBuilder {
    bytes: Vec<u8>,
}

impl JpegBuilder {
    pub(crate) fn new() -> Self {
        JpegBuilder {
            bytes: vec![0xFF, Marker::SOI.to_u8()],
        }
    }

    pub(crate) fn segment(mut self, marker: Marker, payload: &[u8]) -> Self {
        self.bytes.extend([0xFF, marker.to_u8()]);
        self.bytes.extend(((payload.len() + 2) as u16).to_be_bytes());
        self.bytes.extend_from_slice(payload);
        self
    }

    pub(crate) fn app0(self) -> Self {
        self.segment(
            Marker::APP(0),
            &[
                b'J', b'F', b'I', b'F', 0x00, 0x01, 0x01, 0x01, 0x00, 0x48, 0x00, 0x48, 0x00, 0x00,
            ],
        )
    }

    pub(crate) fn dqt(self, id: u8, values: &[u8; 64]) -> Self {
        let mut payload = vec![id];
        payload.extend_from_slice(values);
        self.segment(Marker::DQT, &payload)
    }

    pub(crate) fn dht(
        self,
        class: u8,
        number: u8,
        counts: [u8; MAX_CODE_LENGTH],
        symbols: &[u8],
    ) -> Self {
        let mut payload = vec![(class << 4) | number];
        payload.extend_from_slice(&counts);
        payload.extend_from_slice(symbols);
        self.segment(Marker::DHT, &payload)
    }

    /// `components` is a list of `(id, quantization table id)`.
    pub(crate) fn sof0(self, height: u16, width: u16, components: &[(u8, u8)]) -> Self {
        let mut payload = vec![8];
        payload.extend(height.to_be_bytes());
        payload.extend(width.to_be_bytes());
        payload.push(components.len() as u8);
        for &(id, qt) in components {
            payload.extend([id, 0x11, qt]);
        }
        self.segment(Marker::SOF(0), &payload)
    }

    /// `components` is a list of `(id, dc table << 4 | ac table)`. `entropy` is
    /// stuffed before it is appended.
    pub(crate) fn sos(self, components: &[(u8, u8)], entropy: &[u8]) -> Self {
        let mut payload = vec![components.len() as u8];
        for &(id, tables) in components {
            payload.extend([id, tables]);
        }
        payload.extend([0x00, 0x3F, 0x00]);

        let mut builder = self.segment(Marker::SOS, &payload);
        builder.bytes.extend(stuff(entropy));
        builder
    }

    pub(crate) fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    pub(crate) fn eoi(mut self) -> Vec<u8> {
        self.bytes.extend([0xFF, Marker::EOI.to_u8()]);
        self.bytes
    }
}

pub(crate) fn counts(pairs: &[(usize, u8)]) -> [u8; MAX_CODE_LENGTH] {
    let mut counts = [0u8; MAX_CODE_LENGTH];
    for &(length, count) in pairs {
        counts[length - 1] = count;
    }
    counts
}

/// Tables shared by the synthetic images:
/// - DC 0: `0` → size 0, `1` → size 4
/// - DC 1: `0` → size 0
/// - AC 0 and AC 1: `0` → end of block
pub(crate) fn with_tables(builder: JpegBuilder) -> JpegBuilder {
    builder
        .dht(0, 0, counts(&[(1, 2)]), &[0x00, 0x04])
        .dht(1, 0, counts(&[(1, 1)]), &[0x00])
        .dht(0, 1, counts(&[(1, 1)]), &[0x00])
        .dht(1, 1, counts(&[(1, 1)]), &[0x00])
}

/// A quantization table whose DC step is `dc` and every other step is 1.
pub(crate) fn quant_values(dc: u8) -> [u8; 64] {
    let mut values = [1u8; 64];
    values[0] = dc;
    values
}

pub(crate) const COLOR_SCAN: [(u8, u8); 3] = [(1, 0x00), (2, 0x11), (3, 0x11)];
pub(crate) const COLOR_FRAME: [(u8, u8); 3] = [(1, 0), (2, 1), (3, 1)];

/// An image of `width_blocks` MCUs in a single row. The first luma block has a
/// DC delta of `+8`, every later block repeats the predictor, and all chroma is zero.
pub(crate) fn uniform_image(width_blocks: u16) -> Vec<u8> {
    let mut writer = BitWriter::new();
    for block in 0..width_blocks {
        if block == 0 {
            // luma: size 4, value 0b1000, end of block
            writer.write(0b1, 1);
            writer.write(0b1000, 4);
        } else {
            writer.write(0b0, 1);
        }
        writer.write(0b0, 1);
        // two chroma blocks, DC size 0 and end of block each
        writer.write(0b0000, 4);
    }

    with_tables(JpegBuilder::new().app0())
        .dqt(0, &quant_values(8))
        .dqt(1, &quant_values(1))
        .sof0(8, 8 * width_blocks, &COLOR_FRAME)
        .sos(&COLOR_SCAN, &writer.finish())
        .eoi()
}
