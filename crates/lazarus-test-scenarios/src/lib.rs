//! Scenario model and loader for session workflow tests
//!
//! A scenario scripts what the engine answers and which intents the user
//! fires, interleaved with assertions on the resulting session.

use lazarus_api_contract::*;
use serde::{Deserialize, Serialize};

/// Canned engine answer for one remote call
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Reply {
    ScanOk { report: ScanReport },
    ResurrectOk { result: ResurrectionResult },
    DownloadOk {
        file_name: String,
        #[serde(default)]
        bytes: Vec<u8>,
    },
    /// Connection-level failure
    TransportError { message: String },
    /// Malformed response
    ProtocolError { message: String },
    /// Non-success status
    ServerError { status: u16, detail: String },
}

/// Scripted answers, consumed front to back per operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioReplies {
    #[serde(default)]
    pub scan: Vec<Reply>,
    #[serde(default)]
    pub resurrect: Vec<Reply>,
    #[serde(default)]
    pub download: Vec<Reply>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Step {
    Scan {
        url: String,
    },
    Resurrect,
    Download,
    AssertPhase {
        phase: String,
    },
    AssertReport {
        present: bool,
        #[serde(default)]
        decay: Option<u32>,
    },
    AssertResult {
        present: bool,
        #[serde(default)]
        failed_dependencies: Option<usize>,
    },
    AssertLogCount {
        count: usize,
    },
    AssertLastLog {
        contains: String,
    },
    AssertAlerts {
        count: usize,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub replies: ScenarioReplies,
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn from_str(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_parsing() {
        let json = r#"{
            "name": "scan_then_fail",
            "replies": {
                "scan": [{"kind": "transportError", "message": "connection refused"}]
            },
            "steps": [
                {"type": "scan", "url": "example/repo"},
                {"type": "assertPhase", "phase": "Idle"},
                {"type": "assertReport", "present": false},
                {"type": "resurrect"}
            ]
        }"#;

        let scenario = Scenario::from_str(json).unwrap();
        assert_eq!(scenario.steps.len(), 4);
        assert!(matches!(scenario.replies.scan[0], Reply::TransportError { .. }));
        assert!(scenario.replies.resurrect.is_empty());
        assert!(matches!(scenario.steps[3], Step::Resurrect));
    }
}
