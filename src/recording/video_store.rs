//! OpenCV-backed segment store

use opencv::core::{Size, Vector};
use opencv::imgcodecs;
use opencv::prelude::*;
use opencv::videoio::VideoWriter;

use crate::backend::mat_from_frame;
use crate::config::{EncodingConfig, StorageConfig};
use crate::errors::MotionError;
use crate::recording::naming::SegmentNames;
use crate::recording::store::{OpenSegment, SegmentStore};
use crate::types::{CaptureFormat, Frame};

/// Persists stills with `imwrite` and streams with `VideoWriter` pairs.
pub struct VideoStore {
    fourcc: i32,
    fps: f64,
    frame_size: Size,
    jpeg_quality: u8,
}

impl VideoStore {
    /// Encoding parameters come from the capture collaborator's metadata;
    /// sources that report no rate have already substituted the
    /// configured fallback.
    pub fn new(
        format: CaptureFormat,
        encoding: &EncodingConfig,
        storage: &StorageConfig,
    ) -> Result<Self, MotionError> {
        let mut chars = encoding.fourcc.chars();
        let (c1, c2, c3, c4) = match (chars.next(), chars.next(), chars.next(), chars.next()) {
            (Some(c1), Some(c2), Some(c3), Some(c4)) => (c1, c2, c3, c4),
            _ => {
                return Err(MotionError::Config(format!(
                    "codec fourcc must be 4 characters, got {:?}",
                    encoding.fourcc
                )))
            }
        };
        let fourcc = VideoWriter::fourcc(c1, c2, c3, c4)
            .map_err(|e| MotionError::Config(format!("invalid codec fourcc: {}", e)))?;

        Ok(Self {
            fourcc,
            fps: format.fps,
            frame_size: Size::new(format.width as i32, format.height as i32),
            jpeg_quality: storage.jpeg_quality,
        })
    }

    fn write_still(&self, path: &std::path::Path, frame: &Frame) -> Result<(), MotionError> {
        let mat = mat_from_frame(frame)?;
        let params = Vector::from_iter([
            imgcodecs::IMWRITE_JPEG_QUALITY,
            i32::from(self.jpeg_quality),
        ]);
        let written = imgcodecs::imwrite(&path.to_string_lossy(), &mat, &params)
            .map_err(|e| MotionError::StillWrite(format!("{}: {}", path.display(), e)))?;
        if !written {
            return Err(MotionError::StillWrite(format!(
                "{}: encoder refused the image",
                path.display()
            )));
        }
        Ok(())
    }

    fn open_writer(&self, path: &std::path::Path) -> Result<VideoWriter, MotionError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| MotionError::StreamOpen(format!("{}: {}", path.display(), e)))?;
        }

        let writer = VideoWriter::new(
            &path.to_string_lossy(),
            self.fourcc,
            self.fps,
            self.frame_size,
            true,
        )
        .map_err(|e| MotionError::StreamOpen(format!("{}: {}", path.display(), e)))?;

        let opened = writer
            .is_opened()
            .map_err(|e| MotionError::StreamOpen(format!("{}: {}", path.display(), e)))?;
        if !opened {
            return Err(MotionError::StreamOpen(format!(
                "{}: writer did not open",
                path.display()
            )));
        }
        Ok(writer)
    }
}

impl SegmentStore for VideoStore {
    type Segment = VideoSegment;

    fn open_segment(
        &mut self,
        names: &SegmentNames,
        frame: &Frame,
        mask: &Frame,
    ) -> Result<VideoSegment, MotionError> {
        if let Some(parent) = names.frame_still.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                MotionError::StillWrite(format!("{}: {}", names.frame_still.display(), e))
            })?;
        }

        self.write_still(&names.frame_still, frame)?;
        self.write_still(&names.mask_still, mask)?;

        // Writers release on drop, so a mask-side failure here tears the
        // frame-side writer down with the early return.
        let frame_writer = self.open_writer(&names.frame_stream)?;
        let mask_writer = self.open_writer(&names.mask_stream)?;

        Ok(VideoSegment {
            frame_writer,
            mask_writer,
        })
    }
}

/// One open stream pair. Both writers release on drop, which covers the
/// abandoned-segment error path; `finish` is the orderly flush-and-close.
pub struct VideoSegment {
    frame_writer: VideoWriter,
    mask_writer: VideoWriter,
}

impl OpenSegment for VideoSegment {
    fn write(&mut self, frame: &Frame, mask: &Frame) -> Result<(), MotionError> {
        let frame_mat = mat_from_frame(frame)?;
        self.frame_writer
            .write(&frame_mat)
            .map_err(|e| MotionError::StreamWrite(format!("frame stream: {}", e)))?;

        // The mask stream is opened as a color stream; expand before
        // writing.
        let mask_mat = mat_from_frame(&mask.gray_to_bgr())?;
        self.mask_writer
            .write(&mask_mat)
            .map_err(|e| MotionError::StreamWrite(format!("mask stream: {}", e)))?;

        Ok(())
    }

    fn finish(mut self) -> Result<(), MotionError> {
        self.frame_writer
            .release()
            .map_err(|e| MotionError::StreamWrite(format!("frame stream close: {}", e)))?;
        self.mask_writer
            .release()
            .map_err(|e| MotionError::StreamWrite(format!("mask stream close: {}", e)))?;
        Ok(())
    }
}
