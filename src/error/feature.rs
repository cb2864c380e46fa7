// Feature extraction error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Feature error code constants
///
/// Error code range: 3001-3004
pub struct FeatureErrorCodes {}

impl FeatureErrorCodes {
    /// A framing or analysis parameter is out of range
    pub const INVALID_PARAMETER: i32 = 3001;

    /// Signal produced no blocks to aggregate
    pub const EMPTY_SIGNAL: i32 = 3002;

    /// A per-block feature value is NaN or infinite
    pub const NON_FINITE: i32 = 3003;

    /// Feature rows disagree on block count
    pub const SHAPE_MISMATCH: i32 = 3004;
}

/// Log a feature error with structured context
///
/// Logs the numeric code, the component, and the message so a failing
/// extraction can be traced back to the call site.
pub fn log_feature_error(err: &FeatureError, context: &str) {
    error!(
        "Feature error in {}: code={}, component=FeatureExtractor, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Feature extraction errors
///
/// These errors cover framing preconditions and numerical degeneracy
/// detected while reducing per-block features.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureError {
    /// Parameter must be strictly positive
    InvalidParameter { name: &'static str, value: i64 },

    /// No blocks were produced (empty input signal)
    EmptySignal,

    /// Non-finite value found in a feature row
    NonFinite { feature: &'static str, block: usize },

    /// Feature rows have inconsistent lengths
    ShapeMismatch { expected: usize, found: usize },
}

impl ErrorCode for FeatureError {
    fn code(&self) -> i32 {
        match self {
            FeatureError::InvalidParameter { .. } => FeatureErrorCodes::INVALID_PARAMETER,
            FeatureError::EmptySignal => FeatureErrorCodes::EMPTY_SIGNAL,
            FeatureError::NonFinite { .. } => FeatureErrorCodes::NON_FINITE,
            FeatureError::ShapeMismatch { .. } => FeatureErrorCodes::SHAPE_MISMATCH,
        }
    }

    fn message(&self) -> String {
        match self {
            FeatureError::InvalidParameter { name, value } => {
                format!("{} must be greater than 0 (got {})", name, value)
            }
            FeatureError::EmptySignal => "Signal is empty; no blocks to analyze".to_string(),
            FeatureError::NonFinite { feature, block } => {
                format!("Non-finite {} value at block {}", feature, block)
            }
            FeatureError::ShapeMismatch { expected, found } => {
                format!("Feature row has {} blocks, expected {}", found, expected)
            }
        }
    }
}

impl fmt::Display for FeatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FeatureError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for FeatureError {}
