// Normalization module - z-score standardization across files
//
// Each of the ten aggregate columns is shifted to zero mean and scaled to
// unit population standard deviation over all files. A column whose
// variance is zero (or not finite) carries no information and is set to
// 0.0 rather than divided into NaN.

use crate::analysis::aggregate::mean_std;
use crate::analysis::features::{AggregatedFeatures, NUM_AGGREGATES};

/// Z-score each feature column across the given rows (one row per file)
pub fn normalize_zscore(rows: &[AggregatedFeatures]) -> Vec<AggregatedFeatures> {
    if rows.is_empty() {
        return Vec::new();
    }

    let mut normalized = rows.to_vec();
    let labels = AggregatedFeatures::labels();

    for column in 0..NUM_AGGREGATES {
        let values: Vec<f32> = rows.iter().map(|row| row.0[column]).collect();
        let (mean, std) = mean_std(&values);

        if std > 0.0 && std.is_finite() {
            for row in normalized.iter_mut() {
                row.0[column] = (row.0[column] - mean) / std;
            }
        } else {
            log::warn!(
                "[Normalize] Column {} has zero variance across {} files; writing 0.0",
                labels[column],
                rows.len()
            );
            for row in normalized.iter_mut() {
                row.0[column] = 0.0;
            }
        }
    }

    normalized
}
