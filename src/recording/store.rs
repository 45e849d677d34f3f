//! Segment store seam
//!
//! The recorder never talks to an encoder or the filesystem directly; it
//! opens segments through [`SegmentStore`] and writes through the
//! [`OpenSegment`] it gets back. Opening a segment is one atomic
//! acquisition: both stills persisted and both streams opened, or an
//! error and nothing retained. An open segment releases its streams when
//! finished, and implementations release best-effort on drop so every
//! exit path, including error paths, closes the pair.

use crate::errors::MotionError;
use crate::recording::naming::SegmentNames;
use crate::types::Frame;

/// An open stream pair belonging to one segment.
pub trait OpenSegment {
    /// Append the frame to the frame stream and the mask, expanded to the
    /// stream's channel layout, to the mask stream.
    fn write(&mut self, frame: &Frame, mask: &Frame) -> Result<(), MotionError>;

    /// Flush and close both streams.
    fn finish(self) -> Result<(), MotionError>
    where
        Self: Sized;
}

/// Collaborator that persists stills and opens stream pairs.
pub trait SegmentStore {
    type Segment: OpenSegment;

    /// Persist the opening still pair and open both streams under the
    /// given names. On any partial failure, whatever was created is torn
    /// down before the error is returned.
    fn open_segment(
        &mut self,
        names: &SegmentNames,
        frame: &Frame,
        mask: &Frame,
    ) -> Result<Self::Segment, MotionError>;
}
