//! Scenario tests for the segment recorder
//!
//! These walk concrete occupancy sequences through the state machine
//! against the in-memory store and assert the observable lifecycle:
//! when pairs open and close, what gets written, and how artifacts are
//! named.

use chrono::{DateTime, Local, TimeZone};

use motioncap::errors::MotionError;
use motioncap::recording::{RecorderPolicy, RecorderState, SegmentRecorder};
use motioncap::testing::store::{MemoryStore, StoreEvent};
use motioncap::testing::synthetic::{synthetic_frame, synthetic_mask};

fn fixed_now() -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

fn recorder_with_log(
    policy: RecorderPolicy,
) -> (SegmentRecorder<MemoryStore>, motioncap::testing::store::EventLog) {
    let store = MemoryStore::new();
    let log = store.log();
    (SegmentRecorder::new(policy, store, "Images", "Videos"), log)
}

fn step(recorder: &mut SegmentRecorder<MemoryStore>, index: u64, ratio: f64) {
    let frame = synthetic_frame(index, 8, 8);
    let mask = synthetic_mask(index, 8, 8, ratio);
    recorder
        .process(&frame, &mask, ratio, fixed_now())
        .expect("memory store never fails");
}

/// The reference scenario: 100 warm-up frames, a two-frame burst, one
/// closing frame.
#[test]
fn test_warmup_burst_close_scenario() {
    let (mut recorder, log) = recorder_with_log(RecorderPolicy {
        threshold_percent: 5.0,
        warmup_frames: 100,
    });

    // Frames 1-100: ratio 1, inside warm-up anyway -> nothing recorded.
    for i in 1..=100 {
        step(&mut recorder, i, 1.0);
    }
    assert_eq!(recorder.state(), RecorderState::Idle);
    assert_eq!(recorder.saved_frames(), 0);
    assert!(log.borrow().is_empty());

    // Frame 101: ratio 10 -> segment opens and the frame is written.
    step(&mut recorder, 101, 10.0);
    assert_eq!(recorder.state(), RecorderState::Recording);
    assert_eq!(recorder.saved_frames(), 1);

    // Frame 102: still eligible -> second frame into the same segment.
    step(&mut recorder, 102, 10.0);
    assert_eq!(recorder.state(), RecorderState::Recording);
    assert_eq!(recorder.saved_frames(), 2);

    // Frame 103: ratio 1 -> segment closes, nothing written.
    step(&mut recorder, 103, 1.0);
    assert_eq!(recorder.state(), RecorderState::Idle);
    assert_eq!(recorder.saved_frames(), 2);
    assert_eq!(recorder.total_frames(), 103);

    let events = log.borrow();
    let shape: Vec<&str> = events
        .iter()
        .map(|e| match e {
            StoreEvent::Opened { .. } => "open",
            StoreEvent::Wrote { .. } => "write",
            StoreEvent::Finished { .. } => "finish",
        })
        .collect();
    assert_eq!(shape, vec!["open", "write", "write", "finish"]);
}

/// Warm-up suppresses even a fully saturated signal.
#[test]
fn test_warmup_suppresses_saturated_signal() {
    let (mut recorder, log) = recorder_with_log(RecorderPolicy {
        threshold_percent: 5.0,
        warmup_frames: 100,
    });

    for i in 1..=100 {
        step(&mut recorder, i, 100.0);
    }
    assert_eq!(recorder.state(), RecorderState::Idle);
    assert!(log.borrow().is_empty());

    // Frame 101 is the first with 100 frames already behind it.
    step(&mut recorder, 101, 100.0);
    assert_eq!(recorder.state(), RecorderState::Recording);
}

/// No debounce: every crossing opens or closes a fresh pair.
#[test]
fn test_flutter_opens_a_new_pair_per_crossing() {
    let (mut recorder, log) = recorder_with_log(RecorderPolicy {
        threshold_percent: 5.0,
        warmup_frames: 0,
    });

    for (i, &ratio) in [10.0, 1.0, 10.0, 1.0, 10.0].iter().enumerate() {
        step(&mut recorder, i as u64 + 1, ratio);
    }
    recorder.finish();

    let events = log.borrow();
    let opens = events.iter().filter(|e| e.is_open()).count();
    let finishes = events.iter().filter(|e| e.is_finish()).count();
    assert_eq!(opens, 3, "each eligible crossing opens its own segment");
    assert_eq!(finishes, 3);
    assert_eq!(recorder.saved_frames(), 3);
}

/// Nothing is written on the closing step.
#[test]
fn test_no_write_after_close() {
    let (mut recorder, log) = recorder_with_log(RecorderPolicy {
        threshold_percent: 5.0,
        warmup_frames: 0,
    });

    step(&mut recorder, 1, 10.0);
    step(&mut recorder, 2, 1.0);

    let events = log.borrow();
    assert!(events.last().unwrap().is_finish());
    let finish_pos = events.iter().position(|e| e.is_finish()).unwrap();
    assert!(
        events[finish_pos..].iter().all(|e| !e.is_write()),
        "no write may follow the close"
    );
}

/// The still persisted at open and the first streamed frame are the same
/// pixels.
#[test]
fn test_still_matches_first_streamed_frame() {
    let (mut recorder, log) = recorder_with_log(RecorderPolicy {
        threshold_percent: 5.0,
        warmup_frames: 0,
    });

    step(&mut recorder, 1, 42.0);

    let events = log.borrow();
    let (still, still_mask) = match &events[0] {
        StoreEvent::Opened {
            frame_still,
            mask_still,
            ..
        } => (frame_still.clone(), mask_still.clone()),
        other => panic!("expected open first, got {:?}", other),
    };
    let (streamed, streamed_mask) = match &events[1] {
        StoreEvent::Wrote { frame, mask, .. } => (frame.clone(), mask.clone()),
        other => panic!("expected write second, got {:?}", other),
    };

    assert_eq!(still, streamed);
    assert_eq!(still_mask, streamed_mask);
}

/// Two bursts in one run produce distinct names even at the same
/// wall-clock second, because the counter moved on.
#[test]
fn test_two_bursts_never_collide_on_name() {
    let (mut recorder, log) = recorder_with_log(RecorderPolicy {
        threshold_percent: 5.0,
        warmup_frames: 0,
    });

    for (i, &ratio) in [10.0, 10.0, 1.0, 10.0].iter().enumerate() {
        step(&mut recorder, i as u64 + 1, ratio);
    }
    recorder.finish();

    let events = log.borrow();
    let names: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            StoreEvent::Opened { names, .. } => Some(names.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(names.len(), 2);
    assert_ne!(names[0].frame_stream, names[1].frame_stream);
    assert_ne!(names[0].mask_stream, names[1].mask_stream);
    assert_ne!(names[0].frame_still, names[1].frame_still);
    // First burst wrote 2 frames before the second opened.
    assert!(names[1]
        .frame_stream
        .to_string_lossy()
        .contains("N2"));
}

/// A failed open leaves the recorder Idle and surfaces the error; the
/// caller can keep feeding frames.
#[test]
fn test_open_failure_keeps_recorder_idle() {
    let mut store = MemoryStore::new();
    store.fail_opens = true;
    let log = store.log();
    let mut recorder = SegmentRecorder::new(
        RecorderPolicy {
            threshold_percent: 5.0,
            warmup_frames: 0,
        },
        store,
        "Images",
        "Videos",
    );

    for i in 1..=3 {
        let frame = synthetic_frame(i, 8, 8);
        let mask = synthetic_mask(i, 8, 8, 50.0);
        let err = recorder
            .process(&frame, &mask, 50.0, fixed_now())
            .unwrap_err();
        assert!(matches!(err, MotionError::StreamOpen(_)));
        assert_eq!(recorder.state(), RecorderState::Idle);
    }

    // Frames were still counted; nothing was saved or leaked.
    assert_eq!(recorder.total_frames(), 3);
    assert_eq!(recorder.saved_frames(), 0);
    assert!(log.borrow().is_empty());
}

/// A failed write abandons the segment and releases the pair.
#[test]
fn test_write_failure_abandons_segment() {
    let mut store = MemoryStore::new();
    store.fail_writes = true;
    let log = store.log();
    let mut recorder = SegmentRecorder::new(
        RecorderPolicy {
            threshold_percent: 5.0,
            warmup_frames: 0,
        },
        store,
        "Images",
        "Videos",
    );

    let frame = synthetic_frame(1, 8, 8);
    let mask = synthetic_mask(1, 8, 8, 50.0);
    let err = recorder
        .process(&frame, &mask, 50.0, fixed_now())
        .unwrap_err();
    assert!(matches!(err, MotionError::StreamWrite(_)));
    assert_eq!(recorder.state(), RecorderState::Idle);
    assert_eq!(recorder.saved_frames(), 0);

    // The opened pair was released on abandonment.
    let events = log.borrow();
    assert!(events.iter().any(|e| e.is_open()));
    assert!(events.last().unwrap().is_finish());
}
