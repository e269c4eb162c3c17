//! Contract-level error types

use thiserror::Error;

/// Errors raised when a payload does not satisfy the API contract
#[derive(Debug, Error)]
pub enum ApiContractError {
    #[error("validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("inconsistent payload: {0}")]
    Inconsistent(String),
}

/// Result type alias for contract checks
pub type ApiContractResult<T> = Result<T, ApiContractError>;
