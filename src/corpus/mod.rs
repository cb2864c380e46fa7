//! Corpus assembly: class folders of WAV files to a feature matrix.
//!
//! Each file is decoded, framed, analyzed and aggregated independently, so
//! files can be spread over the rayon pool. Results are collected in sorted
//! filename order, which keeps row indices stable across platforms and runs.

pub mod decoder;

pub use decoder::{AudioDecoder, WavDecoder};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::analysis::features::NUM_AGGREGATES;
use crate::analysis::{analyze_signal, normalize_zscore, AggregatedFeatures, FeatureExtractor};
use crate::config::{AppConfig, CorpusConfig, DecodeFailurePolicy, FeatureConfig};
use crate::error::{log_corpus_error, CorpusError};

/// Aggregated features of one file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusEntry {
    pub path: PathBuf,
    /// Class folder the file came from
    pub label: String,
    pub features: AggregatedFeatures,
}

/// Corpus feature matrix: one row per file, ten feature columns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorpusMatrix {
    pub entries: Vec<CorpusEntry>,
}

impl CorpusMatrix {
    /// Number of files (rows)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append another matrix's rows below this one
    pub fn stack(&mut self, other: CorpusMatrix) {
        self.entries.extend(other.entries);
    }

    /// File-major rows: `rows()[file][feature]`
    pub fn rows(&self) -> Vec<[f32; NUM_AGGREGATES]> {
        self.entries.iter().map(|entry| entry.features.0).collect()
    }

    /// Feature-major view: `feature_major()[feature][file]` (10 × M)
    pub fn feature_major(&self) -> Vec<Vec<f32>> {
        (0..NUM_AGGREGATES)
            .map(|column| {
                self.entries
                    .iter()
                    .map(|entry| entry.features.0[column])
                    .collect()
            })
            .collect()
    }

    /// Copy with every feature column z-scored across files
    pub fn normalized(&self) -> CorpusMatrix {
        let features: Vec<AggregatedFeatures> =
            self.entries.iter().map(|entry| entry.features).collect();
        let normalized = normalize_zscore(&features);

        CorpusMatrix {
            entries: self
                .entries
                .iter()
                .zip(normalized)
                .map(|(entry, features)| CorpusEntry {
                    path: entry.path.clone(),
                    label: entry.label.clone(),
                    features,
                })
                .collect(),
        }
    }
}

/// Drives feature extraction over class folders
pub struct CorpusBuilder<D: AudioDecoder = WavDecoder> {
    extractor: FeatureExtractor,
    decoder: D,
    config: CorpusConfig,
}

impl CorpusBuilder<WavDecoder> {
    /// Builder with the default WAV decoder
    pub fn new(config: &AppConfig) -> Result<Self, CorpusError> {
        Self::with_decoder(config.features.clone(), config.corpus.clone(), WavDecoder)
    }
}

impl<D: AudioDecoder> CorpusBuilder<D> {
    pub fn with_decoder(
        features: FeatureConfig,
        config: CorpusConfig,
        decoder: D,
    ) -> Result<Self, CorpusError> {
        if config.target_sample_rate == 0 {
            return Err(CorpusError::InvalidConfig {
                reason: "target_sample_rate must be greater than 0".to_string(),
            });
        }

        Ok(Self {
            extractor: FeatureExtractor::new(features)?,
            decoder,
            config,
        })
    }

    /// Decode, extract and aggregate one file
    pub fn process_file(&self, path: &Path) -> Result<AggregatedFeatures, CorpusError> {
        let sample_rate = self.config.target_sample_rate;
        let samples = self
            .decoder
            .decode(path, sample_rate)
            .map_err(|err| err.for_file(path.to_path_buf()))?;

        analyze_signal(&self.extractor, &samples, sample_rate)
            .map_err(|err| CorpusError::from(err).for_file(path.to_path_buf()))
    }

    /// Build the matrix for one class folder
    ///
    /// Rows follow sorted filename order. Under
    /// [`DecodeFailurePolicy::Abort`] the first failing file (in that order)
    /// stops the build; under `SkipAndWarn` it is logged and left out.
    pub fn build_class(&self, dir: &Path, label: &str) -> Result<CorpusMatrix, CorpusError> {
        let _span = tracing::info_span!("build_class", label, dir = %dir.display()).entered();

        let files = list_audio_files(dir)?;
        tracing::info!("Processing {} files from {}", files.len(), dir.display());

        let results: Vec<(PathBuf, Result<AggregatedFeatures, CorpusError>)> =
            if self.config.parallel {
                files
                    .into_par_iter()
                    .map(|path| {
                        let result = self.process_file(&path);
                        (path, result)
                    })
                    .collect()
            } else {
                files
                    .into_iter()
                    .map(|path| {
                        let result = self.process_file(&path);
                        (path, result)
                    })
                    .collect()
            };

        let mut matrix = CorpusMatrix::default();
        for (path, result) in results {
            match result {
                Ok(features) => matrix.entries.push(CorpusEntry {
                    path,
                    label: label.to_string(),
                    features,
                }),
                Err(err) => match self.config.on_decode_failure {
                    DecodeFailurePolicy::Abort => {
                        log_corpus_error(&err, "build_class");
                        return Err(err);
                    }
                    DecodeFailurePolicy::SkipAndWarn => {
                        tracing::warn!("Skipping {}: {}", path.display(), err);
                    }
                },
            }
        }

        Ok(matrix)
    }

    /// Build every configured class folder under `root` and stack the rows
    ///
    /// Folder order comes from [`CorpusConfig::folders`]; each folder name
    /// doubles as the class label.
    pub fn build_labeled(&self, root: &Path) -> Result<CorpusMatrix, CorpusError> {
        let mut corpus = CorpusMatrix::default();
        for folder in &self.config.folders {
            let class = self.build_class(&root.join(folder), folder)?;
            tracing::info!("Class {}: {} files", folder, class.len());
            corpus.stack(class);
        }
        Ok(corpus)
    }
}

/// List `*.wav` files (case-insensitive) directly inside `dir`, sorted
pub fn list_audio_files(dir: &Path) -> Result<Vec<PathBuf>, CorpusError> {
    let unreadable = |err: std::io::Error| CorpusError::DirectoryUnreadable {
        path: dir.to_path_buf(),
        reason: err.to_string(),
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(unreadable)? {
        let path = entry.map_err(unreadable)?.path();
        let is_wav = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"));
        if is_wav && path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
