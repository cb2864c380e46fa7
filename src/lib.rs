// Speech/Music Features - low-level audio descriptors for classification
// Block framing, windowed FFT spectra, five per-block features, per-file
// statistics and corpus-wide z-score normalization

// Module declarations
pub mod analysis;
pub mod config;
pub mod corpus;
pub mod error;

// Re-exports for convenience
pub use analysis::{
    aggregate, analyze_signal, block_audio, extract_features, normalize_zscore,
    AggregatedFeatures, BlockMatrix, FeatureExtractor, FeatureMatrix,
};
pub use config::AppConfig;
pub use corpus::{CorpusBuilder, CorpusEntry, CorpusMatrix};
pub use error::{CorpusError, ErrorCode, FeatureError};
