//! The segment recorder state machine
//!
//! Two states, one transition function, evaluated once per frame. The
//! decision logic is pure so the warm-up, threshold, and no-hysteresis
//! policy can be audited and tested without any I/O.

use chrono::{DateTime, Local};
use std::path::PathBuf;

use crate::errors::MotionError;
use crate::recording::naming::SegmentNames;
use crate::recording::store::{OpenSegment, SegmentStore};
use crate::types::Frame;

/// Recorder state. `Recording` holds exactly while a stream pair is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Recording,
}

/// Eligibility policy for the transition function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecorderPolicy {
    /// Occupancy percentage a frame must exceed to be eligible
    pub threshold_percent: f64,
    /// Frames to discard while the background model is still learning;
    /// no frame below this index is ever eligible
    pub warmup_frames: u64,
}

impl Default for RecorderPolicy {
    fn default() -> Self {
        Self {
            threshold_percent: 5.0,
            warmup_frames: 100,
        }
    }
}

/// What one step of the state machine does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Idle, frame not eligible: nothing happens
    Remain,
    /// Idle, frame eligible: open a pair, write stills, write the frame
    Start,
    /// Recording, frame eligible: write the frame
    Continue,
    /// Recording, frame not eligible: close the pair, write nothing
    Stop,
}

/// The transition function. Pure: state and counters in, decision out.
///
/// There is deliberately no hysteresis: a ratio fluttering across the
/// threshold every other frame opens and closes a new pair on each
/// crossing.
pub fn decide(
    state: RecorderState,
    ratio: f64,
    total_frames: u64,
    policy: &RecorderPolicy,
) -> Decision {
    let eligible = ratio > policy.threshold_percent && total_frames >= policy.warmup_frames;
    match (state, eligible) {
        (RecorderState::Idle, false) => Decision::Remain,
        (RecorderState::Idle, true) => Decision::Start,
        (RecorderState::Recording, true) => Decision::Continue,
        (RecorderState::Recording, false) => Decision::Stop,
    }
}

/// Drives segment lifecycle against a [`SegmentStore`].
///
/// `total_frames` counts every processed frame; `saved_frames` counts
/// every frame persisted into a segment. Neither is ever reset:
/// `saved_frames` doubles as the filename disambiguator, which is what
/// keeps two segments opened within one wall-clock second apart.
pub struct SegmentRecorder<S: SegmentStore> {
    policy: RecorderPolicy,
    store: S,
    images_dir: PathBuf,
    videos_dir: PathBuf,
    segment: Option<S::Segment>,
    total_frames: u64,
    saved_frames: u64,
    segments_opened: u64,
}

impl<S: SegmentStore> SegmentRecorder<S> {
    pub fn new(
        policy: RecorderPolicy,
        store: S,
        images_dir: impl Into<PathBuf>,
        videos_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            policy,
            store,
            images_dir: images_dir.into(),
            videos_dir: videos_dir.into(),
            segment: None,
            total_frames: 0,
            saved_frames: 0,
            segments_opened: 0,
        }
    }

    /// Recording iff a stream pair is currently open. The state is
    /// derived from the pair itself, so the pairing invariant cannot
    /// drift.
    pub fn state(&self) -> RecorderState {
        if self.segment.is_some() {
            RecorderState::Recording
        } else {
            RecorderState::Idle
        }
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    pub fn saved_frames(&self) -> u64 {
        self.saved_frames
    }

    pub fn segments_opened(&self) -> u64 {
        self.segments_opened
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// One step of the state machine for the current frame.
    ///
    /// `total_frames` advances exactly once per call, on every branch,
    /// including error returns. A failed segment open leaves the recorder
    /// `Idle` with nothing half-open; the caller may keep feeding frames.
    pub fn process(
        &mut self,
        frame: &Frame,
        mask: &Frame,
        ratio: f64,
        now: DateTime<Local>,
    ) -> Result<Decision, MotionError> {
        let decision = decide(self.state(), ratio, self.total_frames, &self.policy);
        let result = self.apply(decision, frame, mask, now);
        self.total_frames += 1;
        result.map(|_| decision)
    }

    fn apply(
        &mut self,
        decision: Decision,
        frame: &Frame,
        mask: &Frame,
        now: DateTime<Local>,
    ) -> Result<(), MotionError> {
        match decision {
            Decision::Remain => Ok(()),
            Decision::Start => {
                let names =
                    SegmentNames::compose(&self.images_dir, &self.videos_dir, now, self.saved_frames);
                let segment = self.store.open_segment(&names, frame, mask)?;
                log::info!("segment opened: {}", names.frame_stream.display());
                self.segment = Some(segment);
                self.segments_opened += 1;
                self.write_current(frame, mask)
            }
            Decision::Continue => self.write_current(frame, mask),
            Decision::Stop => {
                self.close_current();
                Ok(())
            }
        }
    }

    fn write_current(&mut self, frame: &Frame, mask: &Frame) -> Result<(), MotionError> {
        let segment = self
            .segment
            .as_mut()
            .ok_or_else(|| MotionError::StreamWrite("no open segment".to_string()))?;

        if let Err(e) = segment.write(frame, mask) {
            // A failed write abandons the segment; dropping it releases
            // the underlying streams best-effort.
            self.segment = None;
            return Err(e);
        }
        self.saved_frames += 1;
        Ok(())
    }

    fn close_current(&mut self) {
        if let Some(segment) = self.segment.take() {
            if let Err(e) = segment.finish() {
                log::warn!("segment close failed: {}", e);
            } else {
                log::info!("segment closed after {} total saved frames", self.saved_frames);
            }
        }
    }

    /// Flush and close any open pair. Called on every exit path: source
    /// exhaustion, cancellation, and fatal errors.
    pub fn finish(&mut self) {
        self.close_current();
    }
}

impl<S: SegmentStore> Drop for SegmentRecorder<S> {
    fn drop(&mut self) {
        if self.segment.is_some() {
            log::warn!("recorder dropped while recording; closing open segment");
            self.close_current();
        }
    }
}
