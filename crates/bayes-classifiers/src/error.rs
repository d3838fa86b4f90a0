//! Error types for the classifier core.
//!
//! Failures are grouped into three families so callers can tell a bad dataset
//! apart from a bad model or a failed disk operation. See [`ErrorKind`].
use thiserror::Error;

/// Result alias used by the core operations.
pub type Result<T> = std::result::Result<T, ClassifierError>;

/// Coarse classification of a [`ClassifierError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller handed in data that violates a structural invariant.
    MalformedInput,
    /// The fitted parameters cannot produce a valid likelihood.
    ModelQuality,
    /// Reading or writing a persisted model failed.
    Persistence,
}

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Column '{column}' has {actual} rows, expected {expected}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Column not found: {0}")]
    MissingColumn(String),

    #[error("Label column '{column}' contains {value} at row {row}; only 0 and 1 are allowed")]
    NonBinaryLabel {
        column: String,
        row: usize,
        value: i64,
    },

    #[error("Feature '{0}' has no fitted statistics")]
    UnknownFeature(String),

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Zero variance for feature '{feature}' in class {class}")]
    ZeroVariance { feature: String, class: i64 },

    #[error("Statistics for feature '{feature}' in class {class} are undefined (no training rows)")]
    UndefinedStatistics { feature: String, class: i64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClassifierError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClassifierError::ColumnLengthMismatch { .. }
            | ClassifierError::MissingColumn(_)
            | ClassifierError::NonBinaryLabel { .. }
            | ClassifierError::UnknownFeature(_)
            | ClassifierError::InvalidParameter { .. } => ErrorKind::MalformedInput,
            ClassifierError::ZeroVariance { .. } | ClassifierError::UndefinedStatistics { .. } => {
                ErrorKind::ModelQuality
            }
            ClassifierError::Io(_) | ClassifierError::Serialization(_) => ErrorKind::Persistence,
        }
    }
}
