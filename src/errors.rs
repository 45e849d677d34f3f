use thiserror::Error;

/// Failure taxonomy for the capture/detect/record pipeline.
///
/// Source exhaustion is deliberately not represented here: a frame source
/// that runs out of frames returns `Ok(None)` from `read` and the run ends
/// normally.
#[derive(Debug, Error)]
pub enum MotionError {
    /// The frame source cannot be opened at all. Fatal at startup.
    #[error("capture source unavailable: {0}")]
    SourceUnavailable(String),

    /// An output stream pair could not be created. Fatal for the segment
    /// attempt; the pipeline keeps consuming frames without recording.
    #[error("stream open failure: {0}")]
    StreamOpen(String),

    /// A write into an open stream pair failed. The segment is abandoned.
    #[error("stream write failure: {0}")]
    StreamWrite(String),

    /// A still image could not be persisted at segment open.
    #[error("still image write failure: {0}")]
    StillWrite(String),

    /// The background-subtraction collaborator rejected a frame. Fatal to
    /// the run: a model fed malformed input can no longer be trusted.
    #[error("frame processing error: {0}")]
    Processing(String),

    /// A control parameter failed validation. Recovered locally by
    /// re-prompting, never fatal.
    #[error("invalid control value: {0}")]
    Control(String),

    /// Configuration could not be loaded or failed validation.
    #[error("configuration error: {0}")]
    Config(String),
}
