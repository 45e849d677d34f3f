//! OpenCV boundary glue
//!
//! Conversions between the crate's owned [`Frame`] buffers and `Mat`.
//! Every collaborator backed by OpenCV (capture, background model,
//! stream writers) crosses this boundary; nothing outside this module
//! and its callers touches `Mat`.

use crate::errors::MotionError;
use crate::types::Frame;
use opencv::core::Mat;
use opencv::prelude::*;

/// Copy a frame into a continuous `Mat` with the same geometry.
pub fn mat_from_frame(frame: &Frame) -> Result<Mat, MotionError> {
    let flat = Mat::from_slice(&frame.data)
        .map_err(|e| MotionError::Processing(format!("mat allocation failed: {}", e)))?;
    let shaped = flat
        .reshape(i32::from(frame.channels), frame.height as i32)
        .map_err(|e| MotionError::Processing(format!("mat reshape failed: {}", e)))?;
    shaped
        .try_clone()
        .map_err(|e| MotionError::Processing(format!("mat copy failed: {}", e)))
}

/// Copy a `Mat` into an owned frame, carrying the given sequence index.
pub fn frame_from_mat(mat: &Mat, sequence: u64) -> Result<Frame, MotionError> {
    let owned;
    let source = if mat.is_continuous() {
        mat
    } else {
        owned = mat
            .try_clone()
            .map_err(|e| MotionError::Processing(format!("mat copy failed: {}", e)))?;
        &owned
    };

    let data = source
        .data_bytes()
        .map_err(|e| MotionError::Processing(format!("mat data access failed: {}", e)))?
        .to_vec();

    Ok(Frame::new(
        data,
        source.cols() as u32,
        source.rows() as u32,
        source.channels() as u8,
        sequence,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_round_trips_through_mat() {
        let frame = Frame::new((0u8..48).collect(), 4, 4, 3, 9);
        let mat = mat_from_frame(&frame).unwrap();
        assert_eq!(mat.rows(), 4);
        assert_eq!(mat.cols(), 4);
        assert_eq!(mat.channels(), 3);

        let back = frame_from_mat(&mat, frame.sequence).unwrap();
        assert_eq!(back, frame);
    }

    #[test]
    fn test_gray_mask_round_trip() {
        let mask = Frame::new(vec![0, 255, 127, 0, 0, 255], 3, 2, 1, 2);
        let mat = mat_from_frame(&mask).unwrap();
        let back = frame_from_mat(&mat, 2).unwrap();
        assert_eq!(back, mask);
    }
}
