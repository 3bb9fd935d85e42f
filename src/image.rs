use crate::coefficient::BLOCK_SIZE;

/// One decoded MCU: 8x8 RGB pixels at block position (`column`, `row`).
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub column: usize,
    pub row: usize,
    /// Row-major, `pixels[y * 8 + x]`.
    pub pixels: [[u8; 3]; BLOCK_SIZE],
}

impl Block {
    pub const WIDTH: usize = 8;

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        self.pixels[y * Self::WIDTH + x]
    }
}

/// A row-major RGB raster, three bytes per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) data: Vec<u8>,
}

impl Image {
    pub fn new(width: usize, height: usize) -> Self {
        Image {
            width,
            height,
            data: vec![0; width * height * 3],
        }
    }

    /// Collects decoded blocks into a `width` x `height` raster, stopping at the first error.
    pub fn from_blocks<I, E>(width: usize, height: usize, blocks: I) -> Result<Self, E>
    where
        I: IntoIterator<Item = Result<Block, E>>,
    {
        let mut image = Image::new(width, height);
        for block in blocks {
            image.put_block(&block?);
        }
        Ok(image)
    }

    /// Copies `block` into place. Pixels falling outside the raster are dropped.
    pub fn put_block(&mut self, block: &Block) {
        let left = block.column * Block::WIDTH;
        let top = block.row * Block::WIDTH;

        for y in 0..Block::WIDTH {
            let image_y = top + y;
            if image_y >= self.height {
                break;
            }

            for x in 0..Block::WIDTH {
                let image_x = left + x;
                if image_x >= self.width {
                    break;
                }

                let offset = (image_y * self.width + image_x) * 3;
                self.data[offset..offset + 3].copy_from_slice(&block.pixel(x, y));
            }
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let offset = (y * self.width + x) * 3;
        Some([self.data[offset], self.data[offset + 1], self.data[offset + 2]])
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }
}
