//! REST API client for the Lazarus resurrection engine
//!
//! This crate provides the HTTP implementation of [`ClientApi`]: JSON
//! request/response handling for scan and resurrect, a binary-safe download,
//! and conversion of every failure into the uniform client error.

pub mod client;
pub mod error;

pub use client::*;
pub use error::*;

use async_trait::async_trait;
use lazarus_api_contract::*;
use lazarus_client_api::{ClientApi, ClientApiResult};

#[async_trait]
impl ClientApi for client::RestClient {
    async fn scan(&self, url: &str) -> ClientApiResult<ScanReport> {
        self.scan(url).await.map_err(Into::into)
    }

    async fn resurrect(
        &self,
        local_path: &str,
        details: &[serde_json::Value],
    ) -> ClientApiResult<ResurrectionResult> {
        self.resurrect(local_path, details).await.map_err(Into::into)
    }

    async fn download(&self, project_name: &str, local_path: &str) -> ClientApiResult<Artifact> {
        self.download(project_name, local_path)
            .await
            .map_err(Into::into)
    }
}
