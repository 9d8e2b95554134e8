//! Error types for entail

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntailError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("label set exhausted")]
    LabelsExhausted,

    #[error("step limit exceeded")]
    StepLimitExceeded,

    #[error("operation cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, EntailError>;
