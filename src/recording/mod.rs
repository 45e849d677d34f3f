//! Motion-triggered segment recording
//!
//! This module turns the per-frame occupancy signal into discrete, named
//! output segments:
//! - [`naming`] composes artifact names from a timestamp and the running
//!   saved-frame counter,
//! - [`store`] is the seam to the stream/still collaborators,
//! - [`recorder`] is the two-state machine driving it all.
//!
//! # Example
//! ```rust,ignore
//! use motioncap::recording::{RecorderPolicy, SegmentRecorder};
//!
//! let mut recorder = SegmentRecorder::new(RecorderPolicy::default(), store, images, videos);
//!
//! // In the frame loop:
//! recorder.process(&frame, &mask, ratio, chrono::Local::now())?;
//!
//! // When the source is exhausted:
//! recorder.finish();
//! ```

pub mod naming;
mod recorder;
mod store;

#[cfg(feature = "opencv")]
mod video_store;

pub use naming::SegmentNames;
pub use recorder::{decide, Decision, RecorderPolicy, RecorderState, SegmentRecorder};
pub use store::{OpenSegment, SegmentStore};

#[cfg(feature = "opencv")]
pub use video_store::VideoStore;
