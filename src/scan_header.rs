#[derive(Debug, Clone, PartialEq)]
pub struct ScanHeader {
    pub(crate) scan_component_selectors: Vec<ScanComponentSelector>,

    /// Ss: first DCT coefficient in each block in zig-zag order coded in the scan. Zero for
    /// sequential DCT.
    pub(crate) start_of_spectral: u8,

    /// Se: last DCT coefficient in each block in zig-zag order coded in the scan. 63 for
    /// sequential DCT.
    pub(crate) end_of_spectral: u8,

    /// Ah: successive approximation bit position high.
    pub(crate) successive_approx_bit_position_high: u8,

    /// Al: point transform.
    pub(crate) point_transform: u8,
}

impl ScanHeader {
    /// Spectral selection and successive approximation values of a sequential scan.
    pub(crate) fn is_sequential(&self) -> bool {
        self.start_of_spectral == 0
            && self.end_of_spectral == 63
            && self.successive_approx_bit_position_high == 0
            && self.point_transform == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanComponentSelector {
    /// Selects which of the components specified in the frame parameters shall be the jth
    /// component in the scan.
    pub(crate) component_id: u8,

    /// Td: DC entropy coding table destination.
    pub(crate) dc_destination_id: u8,

    /// Ta: AC entropy coding table destination.
    pub(crate) ac_destination_id: u8,
}

impl ScanComponentSelector {
    pub(crate) fn from(component_id: u8, dc_destination_id: u8, ac_destination_id: u8) -> Self {
        Self {
            component_id,
            dc_destination_id,
            ac_destination_id,
        }
    }
}
