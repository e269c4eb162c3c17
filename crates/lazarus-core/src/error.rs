//! Core error types for the session engine.

/// Core error type for all session operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Repository locator cannot be empty")]
    InvalidLocator,

    #[error("Artifact error: {message}")]
    Artifact { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new artifact-related error.
    pub fn artifact<S: Into<String>>(message: S) -> Self {
        Self::Artifact {
            message: message.into(),
        }
    }
}
