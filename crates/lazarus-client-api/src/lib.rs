//! Client API trait for the Lazarus session core
//!
//! Every remote operation is a single request and a single response. Any
//! failure surfaces as one [`ClientApiError`], whatever transport produced it.

use async_trait::async_trait;
use lazarus_api_contract::*;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientApiError {
    /// Connection refused, reset or timed out
    #[error("transport error: {0}")]
    Transport(String),
    /// Response did not match the expected shape
    #[error("protocol error: {0}")]
    Protocol(String),
    /// Engine answered with a non-success status
    #[error("server returned {status}: {detail}")]
    Server { status: u16, detail: String },
    #[error("unexpected: {0}")]
    Unexpected(String),
}

impl ClientApiError {
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientApiError::Transport(_))
    }
}

pub type ClientApiResult<T> = Result<T, ClientApiError>;

#[async_trait]
pub trait ClientApi: Send + Sync {
    /// Clone and analyze the repository behind `url`
    async fn scan(&self, url: &str) -> ClientApiResult<ScanReport>;

    /// Run the remediation passes on a previously scanned working copy
    ///
    /// `details` is the scan report's details list, sent back untouched.
    async fn resurrect(
        &self,
        local_path: &str,
        details: &[serde_json::Value],
    ) -> ClientApiResult<ResurrectionResult>;

    /// Fetch the packaged working copy as opaque bytes
    async fn download(&self, project_name: &str, local_path: &str) -> ClientApiResult<Artifact>;
}
