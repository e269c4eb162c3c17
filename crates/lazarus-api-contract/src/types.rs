//! API contract types for the Lazarus resurrection engine

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Upper bound of the resurrection score scale
pub const MAX_SCORE: u32 = 100;

/// Health state of a single dependency as judged by the scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DependencyStatus {
    Current,
    Outdated,
}

/// Typed view of one entry of `dependency_health.details`
///
/// The engine hands the details list back verbatim on `/resurrect`, so the
/// report keeps it as raw JSON. This view is only for display and is built
/// leniently: entries that do not fit it are skipped.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DependencyDetail {
    pub name: String,
    #[serde(default)]
    pub current: String,
    #[serde(default)]
    pub latest: Option<String>,
    pub status: DependencyStatus,
}

impl DependencyDetail {
    /// Project a raw details entry, `None` when it does not fit
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        Self::deserialize(value).ok()
    }

    pub fn is_outdated(&self) -> bool {
        self.status == DependencyStatus::Outdated
    }
}

/// Dependency summary of a scan report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct DependencyHealth {
    pub total: u32,
    #[serde(default)]
    pub outdated: u32,
    /// Opaque per-dependency entries, forwarded untouched to `/resurrect`
    #[serde(default)]
    pub details: Vec<serde_json::Value>,
}

impl DependencyHealth {
    /// Entries recognizably flagged as outdated, in report order
    pub fn outdated_details(&self) -> impl Iterator<Item = DependencyDetail> + '_ {
        self.details
            .iter()
            .filter_map(DependencyDetail::from_value)
            .filter(DependencyDetail::is_outdated)
    }
}

/// Request body for `POST /scan`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ScanRequest {
    #[validate(length(min = 1, message = "Repository locator cannot be empty"))]
    pub url: String,
}

/// Diagnostic report returned by `POST /scan`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ScanReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
    #[validate(length(min = 1, message = "Working copy handle cannot be empty"))]
    pub local_path: String,
    pub project_name: String,
    #[validate(range(max = 100, message = "Resurrection score must lie in [0, 100]"))]
    pub resurrection_score: u32,
    #[validate(nested)]
    pub dependency_health: DependencyHealth,
}

impl ScanReport {
    /// Decay level shown to the user, `100 - resurrection_score`
    pub fn decay_level(&self) -> u32 {
        MAX_SCORE.saturating_sub(self.resurrection_score)
    }
}

/// Request body for `POST /resurrect`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResurrectRequest {
    pub local_path: String,
    pub details: Vec<serde_json::Value>,
}

/// Outcome of the dependency upgrade pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyOutcome {
    #[serde(default)]
    pub success: Vec<String>,
    #[serde(default)]
    pub failed: Vec<String>,
}

/// Outcome of the security patch pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityOutcome {
    pub fixed: u32,
    #[serde(default)]
    pub remaining: u32,
}

/// Outcome of the code modernization pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModernizationOutcome {
    pub files_changed: u32,
    #[serde(default)]
    pub file_names: Vec<String>,
    #[serde(default)]
    pub replacements: u32,
}

/// Combined result of a resurrection run
///
/// A non-empty `dependencies.failed` is a partial success, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResurrectionResult {
    pub dependencies: DependencyOutcome,
    pub security: SecurityOutcome,
    pub modernization: ModernizationOutcome,
}

/// Envelope returned by `POST /resurrect`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResurrectResponse {
    #[serde(default)]
    pub status: String,
    pub results: ResurrectionResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_path: Option<String>,
}

/// Packaged working copy returned by the download endpoint
#[derive(Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Artifact {
    /// Archive name the server uses for a project: `lazarus_<safe name>.zip`
    pub fn default_file_name(project_name: &str) -> String {
        let safe: String = project_name
            .chars()
            .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
            .collect();
        format!("lazarus_{}.zip", safe.trim())
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for Artifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artifact")
            .field("file_name", &self.file_name)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Response of the health root `GET /`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// Error body produced by the engine for non-success statuses
///
/// `detail` is a plain string for engine failures and a list of objects for
/// request validation failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: serde_json::Value,
}

impl ErrorDetail {
    pub fn message(&self) -> String {
        match &self.detail {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}
