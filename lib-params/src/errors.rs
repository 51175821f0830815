//! Parameter Errors

use thiserror::Error;

use crate::fields::ParamField;

/// Error during parameter reads and governance updates
#[derive(Error, Debug, Clone)]
pub enum ParamError {
    #[error("Field not governable: {0:?}")]
    FieldNotGovernable(ParamField),

    #[error("Invalid value for {field:?}: {reason}")]
    InvalidValue { field: ParamField, reason: String },

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),
}

/// Result type for parameter operations
pub type ParamResult<T> = Result<T, ParamError>;
