//! Numbered image-sequence source
//!
//! Frames come from files like `frame007.png`, `frame008.png`, ... The
//! pattern is inferred from a seed filename by isolating the numeric
//! suffix of the stem; each read increments the number and re-derives the
//! next path. The first path that fails to load ends the sequence, which
//! is normal termination, not an error.

use std::path::{Path, PathBuf};

use crate::errors::MotionError;
use crate::source::FrameSource;
use crate::types::{CaptureFormat, Frame};

/// Parsed shape of a numbered filename: `<dir>/<prefix><number>.<ext>`.
///
/// The numeric width of the seed is preserved, so `frame007` advances to
/// `frame008`, not `frame8`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencePattern {
    dir: PathBuf,
    prefix: String,
    start_index: u64,
    digits: usize,
    extension: String,
}

impl SequencePattern {
    pub fn from_seed(seed: &Path) -> Result<Self, MotionError> {
        let stem = seed
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                MotionError::SourceUnavailable(format!("bad sequence seed: {}", seed.display()))
            })?;

        let digit_start = stem
            .char_indices()
            .rev()
            .find(|(_, c)| !c.is_ascii_digit())
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        let digit_run = &stem[digit_start..];
        if digit_run.is_empty() {
            return Err(MotionError::SourceUnavailable(format!(
                "sequence seed has no numeric suffix: {}",
                seed.display()
            )));
        }

        let start_index = digit_run.parse::<u64>().map_err(|e| {
            MotionError::SourceUnavailable(format!(
                "sequence seed number out of range: {}: {}",
                seed.display(),
                e
            ))
        })?;

        Ok(Self {
            dir: seed.parent().map(Path::to_path_buf).unwrap_or_default(),
            prefix: stem[..digit_start].to_string(),
            start_index,
            digits: digit_run.len(),
            extension: seed
                .extension()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string(),
        })
    }

    pub fn start_index(&self) -> u64 {
        self.start_index
    }

    /// Path of the sequence member with the given number.
    pub fn path_at(&self, index: u64) -> PathBuf {
        let mut name = format!("{}{:0width$}", self.prefix, index, width = self.digits);
        if !self.extension.is_empty() {
            name.push('.');
            name.push_str(&self.extension);
        }
        self.dir.join(name)
    }
}

/// Frames decoded from a numbered file sequence.
pub struct ImageSequenceSource {
    pattern: SequencePattern,
    next_index: u64,
    next_sequence: u64,
    format: CaptureFormat,
    pending: Option<Frame>,
    exhausted: bool,
}

impl ImageSequenceSource {
    /// Opens the sequence by loading the seed frame eagerly; an unreadable
    /// seed is fatal, unlike later members.
    pub fn open(seed: &Path, fallback_fps: f64) -> Result<Self, MotionError> {
        let pattern = SequencePattern::from_seed(seed)?;

        let first = load_frame(seed, 1).ok_or_else(|| {
            MotionError::SourceUnavailable(format!(
                "unable to open first image frame: {}",
                seed.display()
            ))
        })?;

        let format = CaptureFormat::new(first.width, first.height, fallback_fps);
        log::info!(
            "opened image sequence {} ({}x{})",
            seed.display(),
            first.width,
            first.height
        );

        Ok(Self {
            next_index: pattern.start_index() + 1,
            pattern,
            next_sequence: 2,
            format,
            pending: Some(first),
            exhausted: false,
        })
    }
}

impl FrameSource for ImageSequenceSource {
    fn is_open(&self) -> bool {
        !self.exhausted
    }

    fn read(&mut self) -> Result<Option<Frame>, MotionError> {
        if let Some(frame) = self.pending.take() {
            return Ok(Some(frame));
        }
        if self.exhausted {
            return Ok(None);
        }

        let path = self.pattern.path_at(self.next_index);
        match load_frame(&path, self.next_sequence) {
            Some(frame) => {
                self.next_index += 1;
                self.next_sequence += 1;
                Ok(Some(frame))
            }
            None => {
                log::info!("unable to open image frame {}, end of sequence", path.display());
                self.exhausted = true;
                Ok(None)
            }
        }
    }

    fn format(&self) -> CaptureFormat {
        self.format
    }
}

/// Decode one sequence member to a BGR frame. Any load or decode failure
/// reads as a missing member.
fn load_frame(path: &Path, sequence: u64) -> Option<Frame> {
    let decoded = image::open(path).ok()?;
    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();
    let mut data = rgb.into_raw();
    for px in data.chunks_exact_mut(3) {
        px.swap(0, 2);
    }
    Some(Frame::new(data, width, height, 3, sequence))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_from_padded_seed() {
        let pattern = SequencePattern::from_seed(Path::new("/data/images/frame007.png")).unwrap();
        assert_eq!(pattern.start_index(), 7);
        assert_eq!(pattern.path_at(8), Path::new("/data/images/frame008.png"));
        assert_eq!(pattern.path_at(1000), Path::new("/data/images/frame1000.png"));
    }

    #[test]
    fn test_pattern_from_bare_number() {
        let pattern = SequencePattern::from_seed(Path::new("/data/images/1.png")).unwrap();
        assert_eq!(pattern.start_index(), 1);
        assert_eq!(pattern.path_at(2), Path::new("/data/images/2.png"));
        assert_eq!(pattern.path_at(10), Path::new("/data/images/10.png"));
    }

    #[test]
    fn test_pattern_without_directory() {
        let pattern = SequencePattern::from_seed(Path::new("img42.jpg")).unwrap();
        assert_eq!(pattern.path_at(43), Path::new("img43.jpg"));
    }

    #[test]
    fn test_pattern_rejects_seed_without_number() {
        assert!(SequencePattern::from_seed(Path::new("frames/background.png")).is_err());
    }

    #[test]
    fn test_pattern_width_preserved() {
        let pattern = SequencePattern::from_seed(Path::new("shot0099.png")).unwrap();
        assert_eq!(pattern.path_at(100), Path::new("shot0100.png"));
    }
}
