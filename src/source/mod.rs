//! Frame sources
//!
//! The pipeline reads frames through one seam regardless of where they
//! come from: a video file, a capture device, or a numbered image
//! sequence. Exhaustion is a normal outcome (`Ok(None)`), never an error.

mod sequence;

#[cfg(feature = "opencv")]
mod video;

pub use sequence::{ImageSequenceSource, SequencePattern};

#[cfg(feature = "opencv")]
pub use video::VideoSource;

use crate::errors::MotionError;
use crate::types::{CaptureFormat, Frame};

/// The capture collaborator.
pub trait FrameSource {
    /// Whether the source can still deliver frames.
    fn is_open(&self) -> bool;

    /// Next frame, or `Ok(None)` when the source is exhausted.
    fn read(&mut self) -> Result<Option<Frame>, MotionError>;

    /// Nominal capture parameters, used only to configure output-stream
    /// encoding.
    fn format(&self) -> CaptureFormat;

    /// Release backend resources. Also happens on drop; explicit release
    /// lets the pipeline log failures.
    fn release(&mut self) -> Result<(), MotionError> {
        Ok(())
    }
}
