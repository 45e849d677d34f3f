//! The capture → extract → record pipeline
//!
//! Single-threaded by design: one frame is fully processed before the
//! next is read. All state lives in the pipeline context — source,
//! background model, recorder, cancellation flag — so there are no
//! process-wide globals. Cancellation is cooperative and polled once per
//! iteration; every exit path closes any open segment and releases the
//! source.

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::errors::MotionError;
use crate::recording::{Decision, SegmentRecorder, SegmentStore};
use crate::signal::{BackgroundModel, SignalExtractor};
use crate::source::FrameSource;

/// Counters reported after a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub frames_processed: u64,
    pub frames_saved: u64,
    pub segments_opened: u64,
}

/// Explicit pipeline context; owns every collaborator for one run.
pub struct MotionPipeline<F, M, S>
where
    F: FrameSource,
    M: BackgroundModel,
    S: SegmentStore,
{
    source: F,
    extractor: SignalExtractor<M>,
    recorder: SegmentRecorder<S>,
    cancel: Arc<AtomicBool>,
}

impl<F, M, S> MotionPipeline<F, M, S>
where
    F: FrameSource,
    M: BackgroundModel,
    S: SegmentStore,
{
    pub fn new(source: F, model: M, recorder: SegmentRecorder<S>, cancel: Arc<AtomicBool>) -> Self {
        Self {
            source,
            extractor: SignalExtractor::new(model),
            recorder,
            cancel,
        }
    }

    /// Run until the source is exhausted, cancellation is requested, or a
    /// fatal error occurs. Open segments are flushed and closed on every
    /// one of those paths.
    pub fn run(mut self) -> Result<PipelineSummary, MotionError> {
        let result = self.run_loop();

        self.recorder.finish();
        if let Err(e) = self.source.release() {
            log::warn!("source release failed: {}", e);
        }

        result.map(|_| PipelineSummary {
            frames_processed: self.recorder.total_frames(),
            frames_saved: self.recorder.saved_frames(),
            segments_opened: self.recorder.segments_opened(),
        })
    }

    fn run_loop(&mut self) -> Result<(), MotionError> {
        loop {
            if self.cancel.load(Ordering::Relaxed) {
                log::info!("stop requested, ending run");
                return Ok(());
            }

            let frame = match self.source.read()? {
                Some(frame) => frame,
                None => {
                    log::info!("frame source exhausted");
                    return Ok(());
                }
            };

            // Extractor failures are fatal: a model fed malformed input
            // can no longer be trusted.
            let (mask, ratio) = self.extractor.extract(&frame)?;

            match self.recorder.process(&frame, &mask, ratio, Local::now()) {
                Ok(decision) => {
                    log::debug!(
                        "frame {}: occupancy {:.1}%, save {}, total saved {}",
                        self.recorder.total_frames(),
                        ratio,
                        if matches!(decision, Decision::Start | Decision::Continue) {
                            "Y"
                        } else {
                            "N"
                        },
                        self.recorder.saved_frames()
                    );
                }
                // Stream failures abandon the segment attempt but the
                // loop keeps consuming frames without recording.
                Err(e) => log::warn!("recording unavailable this frame: {}", e),
            }
        }
    }
}
