// Types module - Data structures for per-block and per-file features
//
// This module defines the feature matrix produced for one signal and the
// fixed-length statistic vector it reduces to.

use serde::{Deserialize, Serialize};

use crate::error::FeatureError;

/// Number of per-block descriptors
pub const NUM_FEATURES: usize = 5;

/// Length of the per-file statistic vector (mean and std per feature)
pub const NUM_AGGREGATES: usize = 2 * NUM_FEATURES;

/// The five per-block descriptors, in stacking order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    /// Spectral centroid in Hz
    Centroid,
    /// RMS level in dB, floored at the silence floor
    Rms,
    /// Zero-crossing rate in [0, 1]
    Zcr,
    /// Spectral crest (peak / sum of magnitudes)
    Crest,
    /// Spectral flux against the previous block
    Flux,
}

impl FeatureKind {
    /// All features in row order
    pub const ALL: [FeatureKind; NUM_FEATURES] = [
        FeatureKind::Centroid,
        FeatureKind::Rms,
        FeatureKind::Zcr,
        FeatureKind::Crest,
        FeatureKind::Flux,
    ];

    /// Row index in a [`FeatureMatrix`]
    pub fn index(self) -> usize {
        match self {
            FeatureKind::Centroid => 0,
            FeatureKind::Rms => 1,
            FeatureKind::Zcr => 2,
            FeatureKind::Crest => 3,
            FeatureKind::Flux => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FeatureKind::Centroid => "spectral_centroid",
            FeatureKind::Rms => "rms",
            FeatureKind::Zcr => "zero_crossing_rate",
            FeatureKind::Crest => "spectral_crest",
            FeatureKind::Flux => "spectral_flux",
        }
    }
}

/// Per-block features of one signal: 5 rows by N blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    pub centroid: Vec<f32>,
    pub rms: Vec<f32>,
    pub zcr: Vec<f32>,
    pub crest: Vec<f32>,
    pub flux: Vec<f32>,
}

impl FeatureMatrix {
    /// Stack five rows, checking they share one block count.
    pub fn from_rows(rows: [Vec<f32>; NUM_FEATURES]) -> Result<Self, FeatureError> {
        let expected = rows[0].len();
        if let Some(row) = rows.iter().find(|row| row.len() != expected) {
            return Err(FeatureError::ShapeMismatch {
                expected,
                found: row.len(),
            });
        }

        let [centroid, rms, zcr, crest, flux] = rows;
        Ok(Self {
            centroid,
            rms,
            zcr,
            crest,
            flux,
        })
    }

    pub fn row(&self, kind: FeatureKind) -> &[f32] {
        match kind {
            FeatureKind::Centroid => &self.centroid,
            FeatureKind::Rms => &self.rms,
            FeatureKind::Zcr => &self.zcr,
            FeatureKind::Crest => &self.crest,
            FeatureKind::Flux => &self.flux,
        }
    }

    /// Rows in stacking order with their feature kind
    pub fn rows(&self) -> impl Iterator<Item = (FeatureKind, &[f32])> {
        FeatureKind::ALL.into_iter().map(move |kind| (kind, self.row(kind)))
    }

    /// Number of blocks (columns)
    pub fn num_blocks(&self) -> usize {
        self.centroid.len()
    }
}

/// Per-file statistics: (mean, std) for each feature, interleaved
///
/// Layout: `[mean_centroid, std_centroid, mean_rms, std_rms, ...]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregatedFeatures(pub [f32; NUM_AGGREGATES]);

impl AggregatedFeatures {
    pub fn mean(&self, kind: FeatureKind) -> f32 {
        self.0[2 * kind.index()]
    }

    pub fn std(&self, kind: FeatureKind) -> f32 {
        self.0[2 * kind.index() + 1]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Column labels matching the interleaved layout
    pub fn labels() -> [String; NUM_AGGREGATES] {
        std::array::from_fn(|i| {
            let kind = FeatureKind::ALL[i / 2];
            let stat = if i % 2 == 0 { "mean" } else { "std" };
            format!("{}_{}", kind.name(), stat)
        })
    }
}
