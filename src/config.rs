//! Configuration management for feature extraction runs
//!
//! This module provides configuration loading from JSON files so block
//! sizes, guard constants, and corpus layout can be adjusted without
//! recompilation. Every field has an explicit default matching the
//! reference analysis setup (1024-sample blocks, 256-sample hop, 44.1 kHz).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::FeatureError;

/// Default analysis block length in samples
pub const DEFAULT_BLOCK_SIZE: usize = 1024;

/// Default hop between block starts in samples
pub const DEFAULT_HOP_SIZE: usize = 256;

/// Sample rate every corpus file is decoded to
pub const TARGET_SAMPLE_RATE: u32 = 44_100;

/// Small constant guarding divisions and logarithms
pub const EPSILON: f32 = 1e-6;

/// Lowest RMS level reported, in dB
pub const SILENCE_FLOOR_DB: f32 = -100.0;

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub features: FeatureConfig,
    #[serde(default)]
    pub corpus: CorpusConfig,
}

/// Framing and extractor parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Block length in samples
    pub block_size: usize,
    /// Sample advance between consecutive blocks
    pub hop_size: usize,
    /// Guard added to centroid denominators and RMS before log10
    pub epsilon: f32,
    /// Clamp for the RMS level in dB
    pub silence_floor_db: f32,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            hop_size: DEFAULT_HOP_SIZE,
            epsilon: EPSILON,
            silence_floor_db: SILENCE_FLOOR_DB,
        }
    }
}

impl FeatureConfig {
    /// Reject non-positive block or hop sizes before any processing.
    pub fn validate(&self) -> Result<(), FeatureError> {
        if self.block_size == 0 {
            return Err(FeatureError::InvalidParameter {
                name: "block_size",
                value: 0,
            });
        }
        if self.hop_size == 0 {
            return Err(FeatureError::InvalidParameter {
                name: "hop_size",
                value: 0,
            });
        }
        Ok(())
    }
}

/// What the corpus builder does when a file cannot be processed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeFailurePolicy {
    /// Stop the build and report the offending file
    #[default]
    Abort,
    /// Log a warning and leave the file out of the matrix
    SkipAndWarn,
}

/// Corpus layout and processing options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Sample rate files are resampled to before analysis
    pub target_sample_rate: u32,
    /// Class folders stacked in this order
    pub folders: Vec<String>,
    /// Process files on the rayon pool
    pub parallel: bool,
    pub on_decode_failure: DecodeFailurePolicy,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            target_sample_rate: TARGET_SAMPLE_RATE,
            folders: vec!["speech_wav".to_string(), "music_wav".to_string()],
            parallel: true,
            on_decode_failure: DecodeFailurePolicy::Abort,
        }
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The parsed configuration. If the file is missing or the JSON is
    /// invalid, a warning is logged and the defaults are returned.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }
}
