//! Core frame types shared by sources, the signal extractor, and the
//! segment recorder.

use serde::{Deserialize, Serialize};

/// An owned pixel buffer for exactly one pipeline iteration.
///
/// Color frames are interleaved 8-bit BGR (the layout every capture
/// backend here produces); masks are single-channel with 0 for background
/// and non-zero for foreground. The `sequence` index increases
/// monotonically within one source.
///
/// Frames are copied, never aliased, when handed to an output stream: the
/// capture buffer is free to be reused on the next iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub sequence: u64,
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub data: Vec<u8>,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, sequence: u64) -> Self {
        Self {
            sequence,
            width,
            height,
            channels,
            data,
        }
    }

    /// Number of pixels, independent of channel count.
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    pub fn expected_len(&self) -> usize {
        self.pixel_count() * self.channels as usize
    }

    pub fn is_gray(&self) -> bool {
        self.channels == 1
    }

    /// Expand a single-channel mask to 3-channel BGR for color stream
    /// writers. Multi-channel frames are returned unchanged.
    pub fn gray_to_bgr(&self) -> Frame {
        if !self.is_gray() {
            return self.clone();
        }
        let mut data = Vec::with_capacity(self.data.len() * 3);
        for &px in &self.data {
            data.extend_from_slice(&[px, px, px]);
        }
        Frame {
            sequence: self.sequence,
            width: self.width,
            height: self.height,
            channels: 3,
            data,
        }
    }
}

/// Nominal capture parameters, used only to configure output-stream
/// encoding. Image sequences have no inherent rate and report the
/// configured fallback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaptureFormat {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
}

impl CaptureFormat {
    pub fn new(width: u32, height: u32, fps: f64) -> Self {
        Self { width, height, fps }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_expected_len() {
        let frame = Frame::new(vec![0; 6 * 4 * 3], 6, 4, 3, 1);
        assert_eq!(frame.pixel_count(), 24);
        assert_eq!(frame.expected_len(), 72);
        assert_eq!(frame.data.len(), frame.expected_len());
    }

    #[test]
    fn test_gray_to_bgr_expands_channels() {
        let mask = Frame::new(vec![0, 255, 0, 255], 2, 2, 1, 7);
        let bgr = mask.gray_to_bgr();
        assert_eq!(bgr.channels, 3);
        assert_eq!(bgr.data, vec![0, 0, 0, 255, 255, 255, 0, 0, 0, 255, 255, 255]);
        assert_eq!(bgr.sequence, 7);
        assert_eq!((bgr.width, bgr.height), (2, 2));
    }

    #[test]
    fn test_gray_to_bgr_passthrough_for_color() {
        let color = Frame::new(vec![1, 2, 3, 4, 5, 6], 2, 1, 3, 0);
        assert_eq!(color.gray_to_bgr(), color);
    }

    #[test]
    fn test_capture_format_preserves_values() {
        let format = CaptureFormat::new(640, 480, 25.0);
        assert_eq!(format.width, 640);
        assert_eq!(format.height, 480);
        assert!((format.fps - 25.0).abs() < f64::EPSILON);
    }
}
