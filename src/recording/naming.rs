//! Artifact naming
//!
//! Segment artifacts are named from the wall-clock second the segment
//! opens plus the running saved-frame counter. The counter is what keeps
//! two segments opened within the same second from colliding. The
//! composition is a pure function so it can be tested without touching
//! the filesystem, and because downstream tooling matches these names the
//! format is fixed: timestamp components are plain decimal, unpadded.

use chrono::{DateTime, Datelike, Local, Timelike};
use std::path::{Path, PathBuf};

/// Suffix marking the background-subtracted variant of an artifact.
pub const MASK_SUFFIX: &str = "BS";

const STILL_EXT: &str = "jpg";
const STREAM_EXT: &str = "avi";

/// The four artifact paths belonging to one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentNames {
    /// Raw still written at segment open
    pub frame_still: PathBuf,
    /// Mask still written at segment open
    pub mask_still: PathBuf,
    /// Continuous raw frame stream
    pub frame_stream: PathBuf,
    /// Continuous mask stream
    pub mask_stream: PathBuf,
}

impl SegmentNames {
    /// Compose the artifact paths for a segment opening at `ts` with the
    /// given saved-frame counter value.
    pub fn compose(
        images_dir: &Path,
        videos_dir: &Path,
        ts: DateTime<Local>,
        saved_frames: u64,
    ) -> Self {
        let stamp = timestamp_token(ts);
        Self {
            frame_still: images_dir.join(format!("Img{stamp}N{saved_frames}.{STILL_EXT}")),
            mask_still: images_dir.join(format!("Img{stamp}N{saved_frames}{MASK_SUFFIX}.{STILL_EXT}")),
            frame_stream: videos_dir.join(format!("Vid{stamp}N{saved_frames}.{STREAM_EXT}")),
            mask_stream: videos_dir.join(format!("Vid{stamp}N{saved_frames}{MASK_SUFFIX}.{STREAM_EXT}")),
        }
    }
}

/// `<year>-<month>-<day>T<hour>-<minute>-<second>`, unpadded decimal.
fn timestamp_token(ts: DateTime<Local>) -> String {
    format!(
        "{}-{}-{}T{}-{}-{}",
        ts.year(),
        ts.month(),
        ts.day(),
        ts.hour(),
        ts.minute(),
        ts.second()
    )
}
