//! Main REST API client implementation

use lazarus_api_contract::*;
use reqwest::{header, Client as HttpClient, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use crate::error::{RestClientError, RestClientResult};

/// Address the engine listens on when started locally
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Connection settings for [`RestClient`]
#[derive(Debug, Clone)]
pub struct RestClientConfig {
    pub base_url: Url,
    /// Per-request timeout; `None` waits for the engine indefinitely
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for RestClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            timeout: None,
            user_agent: format!("lazarus/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl RestClientConfig {
    /// Create a config pointing at `base_url`
    pub fn from_url(base_url: &str) -> RestClientResult<Self> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            ..Self::default()
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// REST API client for the resurrection engine
#[derive(Debug, Clone)]
pub struct RestClient {
    http_client: HttpClient,
    base_url: Url,
}

impl RestClient {
    /// Create a new REST client
    pub fn new(config: RestClientConfig) -> RestClientResult<Self> {
        let mut builder = HttpClient::builder().user_agent(config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        // Endpoints are joined relative to the base, which needs a trailing slash
        // to keep any path prefix.
        let mut base_url = config.base_url;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// Create a client from a base URL string with default settings
    pub fn from_url(base_url: &str) -> RestClientResult<Self> {
        Self::new(RestClientConfig::from_url(base_url)?)
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Check that the engine is up
    pub async fn health(&self) -> RestClientResult<HealthStatus> {
        let url = self.endpoint("")?;
        self.send_json(self.http_client.request(Method::GET, url))
            .await
    }

    /// Clone and analyze a repository
    pub async fn scan(&self, url: &str) -> RestClientResult<ScanReport> {
        let request = ScanRequest {
            url: url.to_string(),
        };
        validate_scan_request(&request)?;

        tracing::debug!(target_url = %url, "dispatching scan");
        let report: ScanReport = self.post("scan", &request).await?;
        validate_scan_report(&report)?;
        Ok(report)
    }

    /// Run the remediation passes on a scanned working copy
    pub async fn resurrect(
        &self,
        local_path: &str,
        details: &[serde_json::Value],
    ) -> RestClientResult<ResurrectionResult> {
        let request = ResurrectRequest {
            local_path: local_path.to_string(),
            details: details.to_vec(),
        };

        tracing::debug!(local_path, details = details.len(), "dispatching resurrect");
        let response: ResurrectResponse = self.post("resurrect", &request).await?;
        validate_resurrection_result(&response.results)?;
        Ok(response.results)
    }

    /// Download the packaged working copy
    ///
    /// The body is kept as raw bytes; it is never decoded.
    pub async fn download(
        &self,
        project_name: &str,
        local_path: &str,
    ) -> RestClientResult<Artifact> {
        let mut url = self.endpoint("download")?;
        url.path_segments_mut()
            .map_err(|_| RestClientError::BaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(project_name);
        url.query_pairs_mut().append_pair("local_path", local_path);

        tracing::debug!(project = project_name, local_path, "dispatching download");
        let response = self.send(self.http_client.request(Method::GET, url)).await?;
        let response = Self::ensure_success(response).await?;

        let file_name = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_attachment_file_name)
            .unwrap_or_else(|| Artifact::default_file_name(project_name));
        let bytes = response.bytes().await?.to_vec();

        Ok(Artifact { file_name, bytes })
    }

    // Private helper methods

    fn endpoint(&self, path: &str) -> RestClientResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> RestClientResult<T> {
        let url = self.endpoint(path)?;
        self.send_json(self.http_client.request(Method::POST, url).json(body))
            .await
    }

    async fn send(&self, request: RequestBuilder) -> RestClientResult<Response> {
        request.send().await.map_err(|e| {
            if e.is_timeout() {
                RestClientError::Timeout
            } else {
                RestClientError::Http(e)
            }
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> RestClientResult<T> {
        let response = self.send(request).await?;
        let response = Self::ensure_success(response).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(RestClientError::from)
    }

    async fn ensure_success(response: Response) -> RestClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await?;
        let detail = match serde_json::from_str::<ErrorDetail>(&text) {
            Ok(problem) => problem.message(),
            Err(_) => text,
        };
        tracing::warn!(%status, %detail, "engine returned an error status");
        Err(RestClientError::ServerError { status, detail })
    }
}

/// Extract `filename` from a `Content-Disposition` header value
fn parse_attachment_file_name(value: &str) -> Option<String> {
    value
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = RestClient::from_url("http://localhost:8000").unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8000/");
    }

    #[test]
    fn test_base_path_prefix_is_kept() {
        let client = RestClient::from_url("http://localhost:8000/engine").unwrap();
        assert_eq!(
            client.endpoint("scan").unwrap().as_str(),
            "http://localhost:8000/engine/scan"
        );
    }

    #[test]
    fn test_content_disposition_parsing() {
        assert_eq!(
            parse_attachment_file_name(r#"attachment; filename="lazarus_repo.zip""#),
            Some("lazarus_repo.zip".to_string())
        );
        assert_eq!(
            parse_attachment_file_name("attachment; filename=plain.zip"),
            Some("plain.zip".to_string())
        );
        assert_eq!(parse_attachment_file_name("inline"), None);
        assert_eq!(parse_attachment_file_name(r#"attachment; filename="""#), None);
    }

    #[test]
    fn test_config_builders() {
        let config = RestClientConfig::from_url("http://engine:9000")
            .unwrap()
            .with_timeout(Duration::from_secs(30))
            .with_user_agent("lazarus-test");
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.user_agent, "lazarus-test");
    }
}
