// Aggregation module - reduce per-block features to per-file statistics
//
// Each feature row is summarized by its mean and population standard
// deviation, interleaved in extractor order.

use crate::analysis::features::{AggregatedFeatures, FeatureMatrix, NUM_AGGREGATES};
use crate::error::FeatureError;

/// Mean and population standard deviation of a row
///
/// Accumulates in f64 so long files do not lose precision.
pub fn mean_std(values: &[f32]) -> (f32, f32) {
    if values.is_empty() {
        return (0.0, 0.0);
    }

    let n = values.len() as f64;
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
    let variance = values
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;

    (mean as f32, variance.sqrt() as f32)
}

/// Aggregate a feature matrix into its 10-element statistic vector
///
/// # Errors
/// * `FeatureError::EmptySignal` if the matrix has no blocks
/// * `FeatureError::NonFinite` if any per-block value is NaN or infinite,
///   naming the feature and block so degenerate input is not averaged away
pub fn aggregate(features: &FeatureMatrix) -> Result<AggregatedFeatures, FeatureError> {
    if features.num_blocks() == 0 {
        return Err(FeatureError::EmptySignal);
    }

    let mut stats = [0.0f32; NUM_AGGREGATES];
    for (kind, row) in features.rows() {
        if let Some(block) = row.iter().position(|v| !v.is_finite()) {
            return Err(FeatureError::NonFinite {
                feature: kind.name(),
                block,
            });
        }

        let (mean, std) = mean_std(row);
        stats[2 * kind.index()] = mean;
        stats[2 * kind.index() + 1] = std;
    }

    Ok(AggregatedFeatures(stats))
}
