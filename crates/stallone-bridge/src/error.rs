use thiserror::Error;

use crate::dtype::ElementKind;

/// Failure reported by the foreign runtime while building or reading an
/// external array (a Java exception surfaced through the binding layer).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("external runtime error: {message}")]
pub struct RuntimeError {
    message: String,
}

impl RuntimeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Conversion failures between host arrays and external arrays.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    #[error("stallone not available: {reason}")]
    Unavailable { reason: String },

    #[error("unsupported element kind: {found}")]
    UnsupportedElementKind { found: String },

    #[error("unsupported shape: {shape:?}")]
    UnsupportedShape { shape: Vec<usize> },

    #[error("unsupported external array order {order}")]
    UnsupportedLayout { order: usize },

    #[error("value {value} does not fit the external integer representation")]
    ElementOutOfRange { value: i64 },

    #[error("cannot reshape array of length {len} into shape ({rows}, {columns})")]
    ReshapeMismatch {
        len: usize,
        rows: usize,
        columns: usize,
    },

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl ConvertError {
    pub(crate) fn element_kind(kind: ElementKind) -> Self {
        ConvertError::UnsupportedElementKind {
            found: kind.name().to_string(),
        }
    }
}

/// Reasons the external library runtime could not be brought up.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The binding for the external library is not installed.
    #[error("stallone could not be found: {0}")]
    LibraryNotFound(String),

    /// The JVM rejected (or we rejected) the start-up parameters.
    #[error("java vm initialization for stallone went wrong: {0}")]
    InvalidVmOptions(String),

    #[error("unknown exception occurred: {0}")]
    Other(#[from] anyhow::Error),
}
