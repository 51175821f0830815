//! Scoring error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoringError {
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Corrupted snapshot data: {0}")]
    CorruptedData(String),
}

pub type ScoringResult<T> = Result<T, ScoringError>;
