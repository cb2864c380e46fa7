// Error types for the feature extraction pipeline
//
// This module defines custom error types for feature extraction and corpus
// assembly, providing structured error handling with stable numeric codes.

mod corpus;
mod feature;

pub use corpus::{log_corpus_error, CorpusError, CorpusErrorCodes};
pub use feature::{log_feature_error, FeatureError, FeatureErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, so callers (and the CLI) can report failures
/// consistently.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
