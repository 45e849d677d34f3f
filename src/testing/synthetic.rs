//! Synthetic frame generators
//!
//! Frames vary with the sequence index so temporal behavior is
//! exercised; masks are built to hit an exact occupancy ratio.

use crate::types::Frame;

/// A BGR frame with a gradient that changes per sequence index.
pub fn synthetic_frame(sequence: u64, width: u32, height: u32) -> Frame {
    let mut data = vec![0u8; (width * height * 3) as usize];

    let base = (sequence % 256) as u8;
    for y in 0..height {
        for x in 0..width {
            let idx = ((y * width + x) * 3) as usize;
            data[idx] = base.wrapping_add((x % 256) as u8);
            data[idx + 1] = base.wrapping_add((y % 256) as u8);
            data[idx + 2] = base.wrapping_add(((x + y) % 256) as u8);
        }
    }

    Frame::new(data, width, height, 3, sequence)
}

/// A single-channel mask whose occupancy ratio is as close to
/// `ratio_percent` as the pixel grid allows (rounded up, so any
/// non-zero request yields at least one foreground pixel).
pub fn synthetic_mask(sequence: u64, width: u32, height: u32, ratio_percent: f64) -> Frame {
    let total = (width * height) as usize;
    let foreground = ((ratio_percent / 100.0) * total as f64).ceil() as usize;
    let foreground = foreground.min(total);

    let mut data = vec![0u8; total];
    for px in data.iter_mut().take(foreground) {
        *px = 255;
    }

    Frame::new(data, width, height, 1, sequence)
}
