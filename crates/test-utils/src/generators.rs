//! Synthetic band generators with predictable values.

use lst_common::RasterBuf;

/// Band filled with a constant digital number.
pub fn constant_band(width: usize, height: usize, value: f64) -> RasterBuf {
    RasterBuf::filled(width, height, value)
}

/// Band where each pixel is `col * 1000 + row`, handy for verifying that
/// data survives a write/read cycle unshuffled.
pub fn ramp_band(width: usize, height: usize) -> RasterBuf {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 1000 + row) as f64);
        }
    }
    RasterBuf::new(data, width, height)
}

/// Band with a diagonal gradient between two digital numbers, similar in
/// shape to a real scene's brightness falloff.
pub fn gradient_band(width: usize, height: usize, lo: f64, hi: f64) -> RasterBuf {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let x = col as f64 / width.max(1) as f64;
            let y = row as f64 / height.max(1) as f64;
            data.push(lo + (hi - lo) * 0.5 * (x + y));
        }
    }
    RasterBuf::new(data, width, height)
}
