// Corpus assembly error types and constants

use crate::error::{ErrorCode, FeatureError};
use log::error;
use std::fmt;
use std::path::PathBuf;

/// Corpus error code constants
///
/// Error code range: 4001-4005
pub struct CorpusErrorCodes {}

impl CorpusErrorCodes {
    /// Class directory could not be listed
    pub const DIRECTORY_UNREADABLE: i32 = 4001;

    /// A single file failed to decode or analyze
    pub const FILE_FAILED: i32 = 4002;

    /// Decoder rejected the audio data
    pub const DECODE: i32 = 4003;

    /// Feature extraction failed outside a file context
    pub const FEATURE: i32 = 4004;

    /// Corpus configuration is unusable
    pub const INVALID_CONFIG: i32 = 4005;
}

/// Log a corpus error with structured context
pub fn log_corpus_error(err: &CorpusError, context: &str) {
    error!(
        "Corpus error in {}: code={}, component=CorpusBuilder, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Corpus assembly errors
///
/// The corpus builder is the boundary that turns per-file failures into
/// either a hard stop (naming the file) or a skipped row.
#[derive(Debug, Clone, PartialEq)]
pub enum CorpusError {
    /// Directory listing failed
    DirectoryUnreadable { path: PathBuf, reason: String },

    /// Processing of one file failed
    FileFailed { path: PathBuf, reason: String },

    /// Audio data could not be decoded
    Decode { reason: String },

    /// Feature extraction failed
    Feature(FeatureError),

    /// Configuration rejected before processing
    InvalidConfig { reason: String },
}

impl CorpusError {
    /// Attach the offending file to a decode or feature failure.
    pub fn for_file(self, path: PathBuf) -> Self {
        match self {
            CorpusError::FileFailed { .. } | CorpusError::DirectoryUnreadable { .. } => self,
            other => CorpusError::FileFailed {
                path,
                reason: other.message(),
            },
        }
    }
}

impl ErrorCode for CorpusError {
    fn code(&self) -> i32 {
        match self {
            CorpusError::DirectoryUnreadable { .. } => CorpusErrorCodes::DIRECTORY_UNREADABLE,
            CorpusError::FileFailed { .. } => CorpusErrorCodes::FILE_FAILED,
            CorpusError::Decode { .. } => CorpusErrorCodes::DECODE,
            CorpusError::Feature(_) => CorpusErrorCodes::FEATURE,
            CorpusError::InvalidConfig { .. } => CorpusErrorCodes::INVALID_CONFIG,
        }
    }

    fn message(&self) -> String {
        match self {
            CorpusError::DirectoryUnreadable { path, reason } => {
                format!("Cannot read directory {}: {}", path.display(), reason)
            }
            CorpusError::FileFailed { path, reason } => {
                format!("Failed to process {}: {}", path.display(), reason)
            }
            CorpusError::Decode { reason } => format!("Decode failed: {}", reason),
            CorpusError::Feature(err) => err.message(),
            CorpusError::InvalidConfig { reason } => {
                format!("Invalid corpus configuration: {}", reason)
            }
        }
    }
}

impl fmt::Display for CorpusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CorpusError (code {}): {}", self.code(), self.message())
    }
}

impl std::error::Error for CorpusError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CorpusError::Feature(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FeatureError> for CorpusError {
    fn from(err: FeatureError) -> Self {
        CorpusError::Feature(err)
    }
}

impl From<hound::Error> for CorpusError {
    fn from(err: hound::Error) -> Self {
        CorpusError::Decode {
            reason: err.to_string(),
        }
    }
}
