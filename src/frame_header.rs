use crate::sample_precision::SamplePrecision;

#[derive(Debug, Clone, PartialEq)]
pub struct FrameHeader {
    /// P: Specifies the precision in bits for the samples of the components in the frame.
    /// Always eight bits here, anything else is rejected while parsing.
    pub(crate) precision: SamplePrecision,

    /// Y: Number of lines -- Specifies the maximum number of lines in the source image.
    pub(crate) image_height: usize,

    /// X: Number of samples per line -- Specifies the maximum number of samples per line in the
    /// source image.
    pub(crate) image_width: usize,

    /// Nf: Number of image components in frame.
    pub(crate) component_type: ComponentType,

    /// Frame component specification parameters, in frame order. Index 0 is luma, 1 and 2 are
    /// the chroma components when present.
    pub(crate) components: Vec<Component>,
}

impl FrameHeader {
    pub fn precision(&self) -> SamplePrecision {
        self.precision
    }

    pub fn component_type(&self) -> ComponentType {
        self.component_type
    }

    pub fn width(&self) -> usize {
        self.image_width
    }

    pub fn height(&self) -> usize {
        self.image_height
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Number of whole 8x8 blocks horizontally and vertically.
    pub fn blocks(&self) -> (usize, usize) {
        (self.image_width / 8, self.image_height / 8)
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum ComponentType {
    Grayscale = 1,
    Color = 3,
}

impl ComponentType {
    pub(crate) fn from(b: u8) -> Option<Self> {
        match b {
            1 => Some(ComponentType::Grayscale),
            3 => Some(ComponentType::Color),
            _ => None,
        }
    }
}

/// One of the two-dimensional arrays which comprise an image
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    /// Ci: Assigns a unique label to the ith component in the sequence of frame component
    /// specification parameters.
    pub(crate) component_id: u8,

    /// Hi: Horizontal sampling factor. Recorded but not used, every component contributes
    /// exactly one block per MCU.
    pub(crate) horizontal_scaling_factor: u8,

    /// Vi: Vertical sampling factor. Recorded but not used.
    pub(crate) vertical_scaling_factor: u8,

    /// Tqi: Specifies one of four possible quantization destinations from which the quantization
    /// table to use for dequantization of DCT coefficients of component Ci is retrieved.
    pub(crate) qt_table_id: u8,
}

impl Component {
    pub(crate) fn from(
        component_id: u8,
        horizontal_sf: u8,
        vertical_sf: u8,
        qt_table_id: u8,
    ) -> Self {
        Component {
            component_id,
            horizontal_scaling_factor: horizontal_sf,
            vertical_scaling_factor: vertical_sf,
            qt_table_id,
        }
    }

    pub fn id(&self) -> u8 {
        self.component_id
    }

    /// (Hi, Vi)
    pub fn sampling_factors(&self) -> (u8, u8) {
        (self.horizontal_scaling_factor, self.vertical_scaling_factor)
    }

    pub fn quantization_table_id(&self) -> u8 {
        self.qt_table_id
    }
}
