//! Configuration management for motioncap
//!
//! Provides configuration loading, saving, and validation for detection
//! thresholds, artifact storage locations, and stream encoding parameters.

use crate::errors::MotionError;
use crate::recording::RecorderPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionConfig {
    pub detection: DetectionConfig,
    pub storage: StorageConfig,
    pub encoding: EncodingConfig,
}

/// Motion detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Foreground occupancy required to trigger recording, in percent
    pub threshold_percent: f64,
    /// Frames discarded while the background model learns the scene;
    /// nothing triggers recording before this many frames have passed
    pub warmup_frames: u64,
    /// Background model history length (frames)
    pub model_history: i32,
    /// Variance threshold for the pixel/model distance test
    pub model_var_threshold: f64,
    /// Whether the model marks shadows (shadow pixels still count as
    /// foreground for the occupancy ratio)
    pub detect_shadows: bool,
}

/// Artifact storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory receiving event still images
    pub images_dir: String,
    /// Directory receiving event stream segments
    pub videos_dir: String,
    /// JPEG quality for event stills (1-100)
    pub jpeg_quality: u8,
}

/// Output stream encoding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodingConfig {
    /// Four-character codec code for the stream writers
    pub fourcc: String,
    /// Frame rate used when the source does not report one
    /// (image sequences, some capture devices)
    pub fallback_fps: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            detection: DetectionConfig {
                threshold_percent: 5.0,
                warmup_frames: 100,
                model_history: 500,
                model_var_threshold: 16.0,
                detect_shadows: true,
            },
            storage: StorageConfig {
                images_dir: "Images".to_string(),
                videos_dir: "Videos".to_string(),
                jpeg_quality: 95,
            },
            encoding: EncodingConfig {
                fourcc: "MJPG".to_string(),
                fallback_fps: 30.0,
            },
        }
    }
}

impl MotionConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, MotionError> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| MotionError::Config(format!("Failed to read config file: {}", e)))?;

        let config: MotionConfig = toml::from_str(&contents)
            .map_err(|e| MotionError::Config(format!("Failed to parse config file: {}", e)))?;

        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), MotionError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                MotionError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| MotionError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)
            .map_err(|e| MotionError::Config(format!("Failed to write config file: {}", e)))?;

        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Get default config file path
    pub fn default_path() -> PathBuf {
        PathBuf::from("motioncap.toml")
    }

    /// Load from default location or create with defaults
    pub fn load_or_default() -> Self {
        Self::load_from_file(Self::default_path()).unwrap_or_else(|e| {
            log::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// The recorder policy derived from the detection section.
    pub fn policy(&self) -> RecorderPolicy {
        RecorderPolicy {
            threshold_percent: self.detection.threshold_percent,
            warmup_frames: self.detection.warmup_frames,
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=100.0).contains(&self.detection.threshold_percent) {
            return Err("Occupancy threshold must be between 0.0 and 100.0 percent".to_string());
        }
        if self.detection.model_history <= 0 {
            return Err("Model history must be positive".to_string());
        }
        if self.detection.model_var_threshold <= 0.0 {
            return Err("Model variance threshold must be positive".to_string());
        }

        if self.storage.images_dir.is_empty() || self.storage.videos_dir.is_empty() {
            return Err("Storage directories must not be empty".to_string());
        }
        if self.storage.jpeg_quality == 0 || self.storage.jpeg_quality > 100 {
            return Err("JPEG quality must be between 1 and 100".to_string());
        }

        if self.encoding.fourcc.chars().count() != 4 {
            return Err("Codec fourcc must be exactly 4 characters".to_string());
        }
        if self.encoding.fallback_fps <= 0.0 || self.encoding.fallback_fps > 240.0 {
            return Err("Fallback FPS must be between 0 and 240".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MotionConfig::default();
        assert!((config.detection.threshold_percent - 5.0).abs() < f64::EPSILON);
        assert_eq!(config.detection.warmup_frames, 100);
        assert_eq!(config.storage.images_dir, "Images");
        assert_eq!(config.encoding.fourcc, "MJPG");
    }

    #[test]
    fn test_config_validation() {
        let config = MotionConfig::default();
        assert!(config.validate().is_ok());

        let mut bad_threshold = config.clone();
        bad_threshold.detection.threshold_percent = 150.0;
        assert!(bad_threshold.validate().is_err());

        let mut bad_fourcc = config.clone();
        bad_fourcc.encoding.fourcc = "MJPEG".to_string();
        assert!(bad_fourcc.validate().is_err());

        let mut bad_quality = config;
        bad_quality.storage.jpeg_quality = 0;
        assert!(bad_quality.validate().is_err());
    }

    #[test]
    fn test_policy_reflects_detection_section() {
        let mut config = MotionConfig::default();
        config.detection.threshold_percent = 12.5;
        config.detection.warmup_frames = 30;

        let policy = config.policy();
        assert!((policy.threshold_percent - 12.5).abs() < f64::EPSILON);
        assert_eq!(policy.warmup_frames, 30);
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = std::env::temp_dir();
        let config_path = temp_dir.join("test_motioncap.toml");

        let _ = fs::remove_file(&config_path);

        let mut config = MotionConfig::default();
        config.detection.warmup_frames = 42;
        assert!(config.save_to_file(&config_path).is_ok());

        let loaded = MotionConfig::load_from_file(&config_path).unwrap();
        assert_eq!(loaded.detection.warmup_frames, 42);
        assert_eq!(loaded.storage.videos_dir, config.storage.videos_dir);

        let _ = fs::remove_file(&config_path);
    }

    #[test]
    fn test_config_toml_format() {
        let config = MotionConfig::default();
        let toml_string = toml::to_string_pretty(&config).unwrap();

        assert!(toml_string.contains("[detection]"));
        assert!(toml_string.contains("[storage]"));
        assert!(toml_string.contains("[encoding]"));
        assert!(toml_string.contains("threshold_percent"));
        assert!(toml_string.contains("warmup_frames"));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = MotionConfig::load_from_file("nonexistent_file.toml");
        assert!(result.is_ok()); // Should return default
        assert_eq!(result.unwrap().detection.warmup_frames, 100);
    }
}
