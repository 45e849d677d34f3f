//! Video file / capture device source

use opencv::core::Mat;
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture};

use crate::backend::frame_from_mat;
use crate::errors::MotionError;
use crate::source::FrameSource;
use crate::types::{CaptureFormat, Frame};

/// Frames from a video file or a live capture device.
///
/// A target that parses as a plain integer is treated as a capture
/// device index; anything else is a file path.
pub struct VideoSource {
    capture: VideoCapture,
    format: CaptureFormat,
    next_sequence: u64,
    exhausted: bool,
}

impl VideoSource {
    pub fn open(target: &str, fallback_fps: f64) -> Result<Self, MotionError> {
        let capture = match target.parse::<i32>() {
            Ok(index) => VideoCapture::new(index, videoio::CAP_ANY),
            Err(_) => VideoCapture::from_file(target, videoio::CAP_ANY),
        }
        .map_err(|e| MotionError::SourceUnavailable(format!("{}: {}", target, e)))?;

        let opened = capture
            .is_opened()
            .map_err(|e| MotionError::SourceUnavailable(format!("{}: {}", target, e)))?;
        if !opened {
            return Err(MotionError::SourceUnavailable(format!(
                "unable to open video source: {}",
                target
            )));
        }

        let prop = |prop_id: i32| -> Result<f64, MotionError> {
            capture
                .get(prop_id)
                .map_err(|e| MotionError::SourceUnavailable(format!("{}: {}", target, e)))
        };

        let mut fps = prop(videoio::CAP_PROP_FPS)?;
        if !fps.is_finite() || fps <= 0.0 {
            log::info!("source reports no frame rate, using fallback {}", fallback_fps);
            fps = fallback_fps;
        }
        let width = prop(videoio::CAP_PROP_FRAME_WIDTH)? as u32;
        let height = prop(videoio::CAP_PROP_FRAME_HEIGHT)? as u32;

        log::info!("opened video source {} ({}x{} @ {:.1} fps)", target, width, height, fps);

        Ok(Self {
            capture,
            format: CaptureFormat::new(width, height, fps),
            next_sequence: 1,
            exhausted: false,
        })
    }
}

impl FrameSource for VideoSource {
    fn is_open(&self) -> bool {
        !self.exhausted && self.capture.is_opened().unwrap_or(false)
    }

    fn read(&mut self) -> Result<Option<Frame>, MotionError> {
        if self.exhausted {
            return Ok(None);
        }

        let mut mat = Mat::default();
        let grabbed = self
            .capture
            .read(&mut mat)
            .map_err(|e| MotionError::Processing(format!("frame read failed: {}", e)))?;

        if !grabbed || mat.rows() <= 0 {
            self.exhausted = true;
            return Ok(None);
        }

        let frame = frame_from_mat(&mat, self.next_sequence)?;
        self.next_sequence += 1;
        Ok(Some(frame))
    }

    fn format(&self) -> CaptureFormat {
        self.format
    }

    fn release(&mut self) -> Result<(), MotionError> {
        self.capture
            .release()
            .map_err(|e| MotionError::SourceUnavailable(format!("release failed: {}", e)))
    }
}
