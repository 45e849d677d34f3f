//! motioncap: motion-triggered video segmentation and recording
//!
//! This crate watches a frame stream, measures per-frame foreground
//! occupancy via background subtraction, and records the interesting
//! stretches as discrete, deterministically named segments with event
//! stills at each segment start.
//!
//! # Features
//! - Two-state segment recorder with warm-up suppression and an
//!   auditable, pure transition function
//! - Paired stream lifecycle: raw frames and subtraction masks open and
//!   close together
//! - Collision-free artifact naming from timestamp plus running counter
//! - Video file, capture device, and numbered image-sequence sources
//! - Offline-testable: in-memory store and synthetic frame generators
//!
//! # Usage
//! ```rust,ignore
//! use motioncap::config::MotionConfig;
//! use motioncap::pipeline::MotionPipeline;
//! use motioncap::recording::{SegmentRecorder, VideoStore};
//! use motioncap::signal::Mog2Model;
//! use motioncap::source::{FrameSource, VideoSource};
//!
//! let config = MotionConfig::load_or_default();
//! let source = VideoSource::open("video.avi", config.encoding.fallback_fps)?;
//! let model = Mog2Model::new(&config.detection)?;
//! let store = VideoStore::new(source.format(), &config.encoding, &config.storage)?;
//! let recorder = SegmentRecorder::new(
//!     config.policy(),
//!     store,
//!     &config.storage.images_dir,
//!     &config.storage.videos_dir,
//! );
//! let summary = MotionPipeline::new(source, model, recorder, cancel_flag).run()?;
//! ```

#[cfg(feature = "opencv")]
pub mod backend;
pub mod config;
pub mod controls;
pub mod errors;
pub mod pipeline;
pub mod recording;
pub mod signal;
pub mod source;
pub mod types;

// Testing utilities - synthetic data and in-memory stores for offline tests
pub mod testing;

// Re-exports for convenience
pub use errors::MotionError;
pub use pipeline::{MotionPipeline, PipelineSummary};
pub use recording::{RecorderPolicy, RecorderState, SegmentRecorder};
pub use types::{CaptureFormat, Frame};

/// Initialize logging for the pipeline
pub fn init_logging() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "motioncap=info");
    }
    let _ = env_logger::try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

#[cfg(test)]
mod lib_tests {
    use super::*;

    #[test]
    fn test_crate_metadata() {
        assert_eq!(NAME, "motioncap");
        assert!(!VERSION.is_empty());
        assert!(!DESCRIPTION.is_empty());
    }
}
