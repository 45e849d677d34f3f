//! MOG2 background model adaptor

use crate::backend::{frame_from_mat, mat_from_frame};
use crate::config::DetectionConfig;
use crate::errors::MotionError;
use crate::signal::BackgroundModel;
use crate::types::Frame;
use opencv::core::{Mat, Ptr};
use opencv::prelude::*;
use opencv::video::{self, BackgroundSubtractorMOG2};

/// Gaussian-mixture background model (MOG2) behind the
/// [`BackgroundModel`] seam.
///
/// The model is created once per run and mutated in place by every
/// `apply`. Learning rate is left to the implementation's automatic
/// schedule.
pub struct Mog2Model {
    inner: Ptr<BackgroundSubtractorMOG2>,
}

impl Mog2Model {
    pub fn new(config: &DetectionConfig) -> Result<Self, MotionError> {
        let inner = video::create_background_subtractor_mog2(
            config.model_history,
            config.model_var_threshold,
            config.detect_shadows,
        )
        .map_err(|e| MotionError::Processing(format!("background model creation failed: {}", e)))?;

        Ok(Self { inner })
    }
}

impl BackgroundModel for Mog2Model {
    fn apply(&mut self, frame: &Frame) -> Result<Frame, MotionError> {
        if frame.data.is_empty() {
            return Err(MotionError::Processing("empty frame".to_string()));
        }

        let input = mat_from_frame(frame)?;
        let mut mask = Mat::default();
        self.inner
            .apply(&input, &mut mask, -1.0)
            .map_err(|e| MotionError::Processing(format!("background subtraction failed: {}", e)))?;

        frame_from_mat(&mask, frame.sequence)
    }
}
