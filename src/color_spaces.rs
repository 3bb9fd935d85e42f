use crate::coefficient::BLOCK_SIZE;

/// Bounds `value` to [0, 255], then truncates toward zero.
pub fn clamp(value: f64) -> u8 {
    value.clamp(0.0, 255.0) as u8
}

/// Converts one level-shifted (Y, Cb, Cr) sample triple to RGB.
///
/// Cb is the first chroma component of the frame and Cr the second. The
/// weights are kept exactly as below, they are not the ITU-R BT.601 matrix.
pub fn ycbcr_to_rgb(y: i32, cb: i32, cr: i32) -> [u8; 3] {
    let (y, cb, cr) = (y as f64, cb as f64, cr as f64);

    let r = cr * (2.0 - 2.0 * 0.299) + y;
    let b = cb * (2.0 - 2.0 * 0.114) + y;
    let g = (y - 0.114 * b - 0.299 * r) / 0.587;

    [clamp(r + 128.0), clamp(g + 128.0), clamp(b + 128.0)]
}

/// Converts three spatial blocks, sample by sample.
pub fn convert_block(
    ys: &[i32; BLOCK_SIZE],
    cbs: &[i32; BLOCK_SIZE],
    crs: &[i32; BLOCK_SIZE],
) -> [[u8; 3]; BLOCK_SIZE] {
    let mut rgbs = [[0u8; 3]; BLOCK_SIZE];

    rgbs.iter_mut()
        .zip(ys.iter().zip(cbs.iter()).zip(crs.iter()))
        .for_each(|(rgb, ((&y, &cb), &cr))| *rgb = ycbcr_to_rgb(y, cb, cr));

    rgbs
}
