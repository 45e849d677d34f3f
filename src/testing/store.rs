//! In-memory segment store
//!
//! Records every open/write/finish interaction so tests can assert the
//! recorder's lifecycle behavior, and can be told to fail opens or
//! writes to exercise the error paths.

use std::cell::RefCell;
use std::rc::Rc;

use crate::errors::MotionError;
use crate::recording::naming::SegmentNames;
use crate::recording::{OpenSegment, SegmentStore};
use crate::types::Frame;

/// One observed store interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    Opened {
        segment: usize,
        names: SegmentNames,
        frame_still: Frame,
        mask_still: Frame,
    },
    Wrote {
        segment: usize,
        frame: Frame,
        mask: Frame,
    },
    Finished {
        segment: usize,
    },
}

impl StoreEvent {
    pub fn is_open(&self) -> bool {
        matches!(self, StoreEvent::Opened { .. })
    }

    pub fn is_write(&self) -> bool {
        matches!(self, StoreEvent::Wrote { .. })
    }

    pub fn is_finish(&self) -> bool {
        matches!(self, StoreEvent::Finished { .. })
    }
}

/// Shared, inspectable event log.
pub type EventLog = Rc<RefCell<Vec<StoreEvent>>>;

#[derive(Default)]
pub struct MemoryStore {
    log: EventLog,
    segments_opened: usize,
    /// When true, every open attempt fails with `StreamOpen`.
    pub fail_opens: bool,
    /// When true, every write fails with `StreamWrite`.
    pub fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone of the log handle; stays valid after the store moves into a
    /// recorder.
    pub fn log(&self) -> EventLog {
        Rc::clone(&self.log)
    }
}

impl SegmentStore for MemoryStore {
    type Segment = MemorySegment;

    fn open_segment(
        &mut self,
        names: &SegmentNames,
        frame: &Frame,
        mask: &Frame,
    ) -> Result<MemorySegment, MotionError> {
        if self.fail_opens {
            return Err(MotionError::StreamOpen(format!(
                "{}: open refused by test store",
                names.frame_stream.display()
            )));
        }

        let segment = self.segments_opened;
        self.segments_opened += 1;

        self.log.borrow_mut().push(StoreEvent::Opened {
            segment,
            names: names.clone(),
            frame_still: frame.clone(),
            mask_still: mask.clone(),
        });

        Ok(MemorySegment {
            id: segment,
            log: Rc::clone(&self.log),
            fail_writes: self.fail_writes,
            finished: false,
        })
    }
}

#[derive(Debug)]
pub struct MemorySegment {
    id: usize,
    log: EventLog,
    fail_writes: bool,
    finished: bool,
}

impl OpenSegment for MemorySegment {
    fn write(&mut self, frame: &Frame, mask: &Frame) -> Result<(), MotionError> {
        if self.fail_writes {
            return Err(MotionError::StreamWrite(
                "write refused by test store".to_string(),
            ));
        }
        self.log.borrow_mut().push(StoreEvent::Wrote {
            segment: self.id,
            frame: frame.clone(),
            mask: mask.clone(),
        });
        Ok(())
    }

    fn finish(mut self) -> Result<(), MotionError> {
        self.finished = true;
        self.log
            .borrow_mut()
            .push(StoreEvent::Finished { segment: self.id });
        Ok(())
    }
}

impl Drop for MemorySegment {
    fn drop(&mut self) {
        // Abandoned segments still record their release so tests can
        // verify the pair never leaks.
        if !self.finished {
            self.log
                .borrow_mut()
                .push(StoreEvent::Finished { segment: self.id });
        }
    }
}
