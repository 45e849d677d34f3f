//! Foreground occupancy signal extraction
//!
//! Turns frames into a per-frame scalar: the percentage of pixels the
//! background-subtraction collaborator classifies as foreground. The mask
//! computation is delegated entirely through [`BackgroundModel`]; the
//! ratio itself is a pure reduction owned by this module.

#[cfg(feature = "opencv")]
mod mog2;

#[cfg(feature = "opencv")]
pub use mog2::Mog2Model;

use crate::errors::MotionError;
use crate::types::Frame;

/// The background-subtraction collaborator.
///
/// The model is long-lived and process-wide: initialized once before the
/// first frame and reused across the whole run. Every call adapts the
/// model to the scene as a documented side effect. There is no recovery
/// path: a frame the model cannot process fails the run.
pub trait BackgroundModel {
    /// Classify `frame` against the learned background, updating the
    /// model in place. Returns a single-channel mask at the frame's
    /// resolution with non-zero foreground pixels.
    fn apply(&mut self, frame: &Frame) -> Result<Frame, MotionError>;
}

/// Fraction of foreground pixels in a mask, in percent.
///
/// Pure reduction over the current mask; shadow pixels (any non-zero
/// value) count as foreground, matching the classifier's convention.
pub fn occupancy_ratio(mask: &Frame) -> f64 {
    if mask.data.is_empty() {
        return 0.0;
    }
    let foreground = mask.data.iter().filter(|&&px| px != 0).count();
    (foreground as f64 / mask.data.len() as f64) * 100.0
}

/// Convenience wrapper pairing a model with the ratio reduction.
pub struct SignalExtractor<M: BackgroundModel> {
    model: M,
}

impl<M: BackgroundModel> SignalExtractor<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    /// One extraction step: mask plus its occupancy ratio.
    pub fn extract(&mut self, frame: &Frame) -> Result<(Frame, f64), MotionError> {
        let mask = self.model.apply(frame)?;
        let ratio = occupancy_ratio(&mask);
        Ok((mask, ratio))
    }
}
