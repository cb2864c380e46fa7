// Analysis module - numerical pipeline from samples to file statistics
//
// Pipeline: framing → features (5 × N) → aggregate (10) → normalize (corpus)
//
// Every stage is a pure function of its input; the corpus module drives it
// once per file.

pub mod aggregate;
pub mod features;
pub mod framing;
pub mod normalize;

pub use aggregate::aggregate;
pub use features::{extract_features, AggregatedFeatures, FeatureExtractor, FeatureMatrix};
pub use framing::{block_audio, BlockMatrix};
pub use normalize::normalize_zscore;

use crate::error::{log_feature_error, FeatureError};

/// Extract and aggregate one signal in a single call
///
/// Failures are logged with their error code before being returned.
pub fn analyze_signal(
    extractor: &FeatureExtractor,
    signal: &[f32],
    sample_rate: u32,
) -> Result<AggregatedFeatures, FeatureError> {
    extractor
        .extract(signal, sample_rate)
        .and_then(|features| aggregate(&features))
        .inspect_err(|err| log_feature_error(err, "analyze_signal"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::features::FeatureKind;
    use crate::config::FeatureConfig;

    #[test]
    fn test_analyze_signal_empty_is_error() {
        let extractor = FeatureExtractor::new(FeatureConfig::default()).unwrap();
        let err = analyze_signal(&extractor, &[], 44_100).unwrap_err();
        assert_eq!(err, FeatureError::EmptySignal);
    }

    #[test]
    fn test_analyze_signal_zero_rate_is_error() {
        let extractor = FeatureExtractor::new(FeatureConfig::default()).unwrap();
        let err = analyze_signal(&extractor, &[0.1; 2048], 0).unwrap_err();
        assert!(matches!(err, FeatureError::InvalidParameter { .. }));
    }

    #[test]
    fn test_analyze_signal_matches_two_step_pipeline() {
        let extractor = FeatureExtractor::new(FeatureConfig::default()).unwrap();
        let signal: Vec<f32> = (0..8192)
            .map(|i| (2.0 * std::f32::consts::PI * 500.0 * i as f32 / 44_100.0).sin())
            .collect();

        let combined = analyze_signal(&extractor, &signal, 44_100).unwrap();
        let two_step = aggregate(&extractor.extract(&signal, 44_100).unwrap()).unwrap();
        assert_eq!(combined, two_step);
        assert!(combined.mean(FeatureKind::Centroid) > 0.0);
    }
}
