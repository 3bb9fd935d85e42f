use std::fmt;

pub(crate) enum MarkerType {
    Segment,
    StandAlone,
}

/// The low byte of a `0xFF xx` marker code.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Start of Frame markers. `SOF(0)` is baseline DCT, everything else is a
    /// process this decoder does not implement. 0xC4, 0xC8 and 0xCC are not frames.
    SOF(u8),

    /// Huffman table specification
    DHT,

    /// Define arithmetic coding conditioning(s)
    DAC,

    /// Restart with modulo 8 count "M"
    RST(u8),

    /// Start of image
    SOI,

    /// End of image
    EOI,

    /// Start of scan
    SOS,

    /// Define quantization table(s)
    DQT,

    /// Define number of lines
    DNL,

    /// Define restart interval
    DRI,

    /// Reserved for application segments
    APP(u8),

    /// Comment
    COM,

    /// For temporary private use in arithmetic coding
    TEM,

    /// JPGn extensions and reserved codes.
    Other(u8),
}

impl Marker {
    pub(crate) const SIZE: usize = 2;
    pub(crate) const GLOBAL: u8 = 0xFF;

    /// Returns `None` for the bytes that can never be a marker's low byte:
    /// `0x00` (stuffing) and `0xFF` (fill).
    pub fn from_u8(b: u8) -> Option<Marker> {
        use self::Marker::*;

        match b {
            0x00 | 0xFF => None,
            0x01 => Some(TEM),
            0xC4 => Some(DHT),
            0xCC => Some(DAC),
            0xC8 => Some(Other(b)),
            0xC0..=0xCF => Some(SOF(b - 0xC0)),
            0xD0..=0xD7 => Some(RST(b - 0xD0)),
            0xD8 => Some(SOI),
            0xD9 => Some(EOI),
            0xDA => Some(SOS),
            0xDB => Some(DQT),
            0xDC => Some(DNL),
            0xDD => Some(DRI),
            0xE0..=0xEF => Some(APP(b - 0xE0)),
            0xFE => Some(COM),
            _ => Some(Other(b)),
        }
    }

    pub fn to_u8(&self) -> u8 {
        use self::Marker::*;

        match *self {
            SOF(n) => 0xC0 + n,
            DHT => 0xC4,
            DAC => 0xCC,
            RST(n) => 0xD0 + n,
            SOI => 0xD8,
            EOI => 0xD9,
            SOS => 0xDA,
            DQT => 0xDB,
            DNL => 0xDC,
            DRI => 0xDD,
            APP(n) => 0xE0 + n,
            COM => 0xFE,
            TEM => 0x01,
            Other(b) => b,
        }
    }

    pub fn to_u16(&self) -> u16 {
        u16::from_be_bytes([Marker::GLOBAL, self.to_u8()])
    }

    /// Some markers stand alone, that is, which is not the start of a marker segment.
    pub(crate) fn is_segment(&self) -> MarkerType {
        match self {
            Marker::RST(_) | Marker::SOI | Marker::EOI | Marker::TEM => MarkerType::StandAlone,
            _ => MarkerType::Segment,
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marker::SOF(n) => write!(f, "SOF{n}")?,
            Marker::RST(n) => write!(f, "RST{n}")?,
            Marker::APP(n) => write!(f, "APP{n}")?,
            Marker::Other(_) => write!(f, "marker")?,
            other => write!(f, "{other:?}")?,
        }
        write!(f, " {:#06X}", self.to_u16())
    }
}
