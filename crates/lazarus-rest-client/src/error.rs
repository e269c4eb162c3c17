//! Error types for the REST API client

use lazarus_client_api::ClientApiError;
use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when using the REST API client
#[derive(Debug, Error)]
pub enum RestClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    #[error("API contract error: {0}")]
    ApiContract(#[from] lazarus_api_contract::ApiContractError),

    #[error("Base URL cannot carry path segments: {0}")]
    BaseUrl(String),

    #[error("Server returned error status {status}: {detail}")]
    ServerError { status: StatusCode, detail: String },

    #[error("Connection timeout")]
    Timeout,
}

/// Result type alias for REST client operations
pub type RestClientResult<T> = Result<T, RestClientError>;

impl From<RestClientError> for ClientApiError {
    fn from(err: RestClientError) -> Self {
        match err {
            RestClientError::Http(ref e) if e.is_decode() => {
                ClientApiError::Protocol(err.to_string())
            }
            RestClientError::Http(_) | RestClientError::Timeout => {
                ClientApiError::Transport(err.to_string())
            }
            RestClientError::Json(_) | RestClientError::ApiContract(_) => {
                ClientApiError::Protocol(err.to_string())
            }
            RestClientError::ServerError { status, detail } => ClientApiError::Server {
                status: status.as_u16(),
                detail,
            },
            RestClientError::Url(_) | RestClientError::BaseUrl(_) => {
                ClientApiError::Unexpected(err.to_string())
            }
        }
    }
}
