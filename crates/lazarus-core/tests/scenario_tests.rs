//! Scripted end-to-end workflows replayed against the session controller

use lazarus_core::{DirectorySink, Outcome, Phase, SessionController, SessionObserver};
use lazarus_rest_client_mock::MockClient;
use lazarus_test_scenarios::{Scenario, Step};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct AlertCounter(AtomicUsize);

impl SessionObserver for AlertCounter {
    fn alert(&self, _message: &str) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

async fn run_scenario(json: &str) -> anyhow::Result<()> {
    let scenario = Scenario::from_str(json)?;
    let downloads = tempfile::TempDir::new()?;
    let client = Arc::new(MockClient::from_scenario(&scenario));
    let controller = SessionController::new(client, Arc::new(DirectorySink::new(downloads.path())));
    let alerts = Arc::new(AlertCounter::default());
    controller.subscribe(alerts.clone()).await;

    for (index, step) in scenario.steps.iter().enumerate() {
        let at = format!("{} step {index} ({step:?})", scenario.name);
        match step {
            Step::Scan { url } => {
                let outcome = controller.scan(url).await?;
                anyhow::ensure!(!matches!(outcome, Outcome::Cancelled), "{at}: cancelled");
            }
            Step::Resurrect => {
                controller.resurrect().await;
            }
            Step::Download => {
                controller.download().await;
            }
            Step::AssertPhase { phase } => {
                let expected: Phase = phase.parse().map_err(anyhow::Error::msg)?;
                anyhow::ensure!(controller.phase().await == expected, "{at}: phase mismatch");
            }
            Step::AssertReport { present, decay } => {
                let snapshot = controller.snapshot().await;
                anyhow::ensure!(snapshot.report.is_some() == *present, "{at}: report presence");
                if let Some(decay) = decay {
                    anyhow::ensure!(snapshot.decay_level() == Some(*decay), "{at}: decay level");
                }
            }
            Step::AssertResult {
                present,
                failed_dependencies,
            } => {
                let result = controller.result().await;
                anyhow::ensure!(result.is_some() == *present, "{at}: result presence");
                if let (Some(expected), Some(result)) = (failed_dependencies, result) {
                    anyhow::ensure!(
                        result.dependencies.failed.len() == *expected,
                        "{at}: failed dependencies"
                    );
                }
            }
            Step::AssertLogCount { count } => {
                let actual = controller.logs().await.len();
                anyhow::ensure!(actual == *count, "{at}: expected {count} log entries, got {actual}");
            }
            Step::AssertLastLog { contains } => {
                let logs = controller.logs().await;
                let last = logs.last().map(|entry| entry.message.as_str()).unwrap_or_default();
                anyhow::ensure!(last.contains(contains.as_str()), "{at}: last log was {last:?}");
            }
            Step::AssertAlerts { count } => {
                let actual = alerts.0.load(Ordering::SeqCst);
                anyhow::ensure!(actual == *count, "{at}: expected {count} alerts, got {actual}");
            }
        }
        controller.snapshot().await.check_invariants()?;
    }
    Ok(())
}

const REPORT: &str = r#"{
    "local_path": "/tmp/x",
    "project_name": "repo",
    "resurrection_score": 80,
    "dependency_health": {
        "total": 12,
        "outdated": 1,
        "details": [{"name": "a", "current": "1.0.0", "latest": "2.0.0", "status": "Outdated"}]
    }
}"#;

const RESULT: &str = r#"{
    "dependencies": {"success": ["a", "b"], "failed": ["c"]},
    "security": {"fixed": 3},
    "modernization": {"files_changed": 5}
}"#;

fn with_fixtures(template: &str) -> String {
    template.replace("$REPORT", REPORT).replace("$RESULT", RESULT)
}

#[tokio::test]
async fn test_full_resurrection_walkthrough() -> anyhow::Result<()> {
    run_scenario(&with_fixtures(
        r#"{
        "name": "full_walkthrough",
        "replies": {
            "scan": [{"kind": "scanOk", "report": $REPORT}],
            "resurrect": [{"kind": "resurrectOk", "result": $RESULT}],
            "download": [{"kind": "downloadOk", "file_name": "lazarus_repo.zip", "bytes": [80, 75, 3, 4]}]
        },
        "steps": [
            {"type": "assertPhase", "phase": "Idle"},
            {"type": "scan", "url": "example/repo"},
            {"type": "assertPhase", "phase": "Ready"},
            {"type": "assertReport", "present": true, "decay": 20},
            {"type": "assertLastLog", "contains": "DECAY LEVEL: 20%"},
            {"type": "resurrect"},
            {"type": "assertPhase", "phase": "Complete"},
            {"type": "assertResult", "present": true, "failed_dependencies": 1},
            {"type": "assertLogCount", "count": 8},
            {"type": "download"},
            {"type": "assertPhase", "phase": "Complete"},
            {"type": "assertLastLog", "contains": "ARTIFACT SAVED"},
            {"type": "assertAlerts", "count": 0}
        ]
    }"#,
    ))
    .await
}

#[tokio::test]
async fn test_unreachable_engine_leaves_session_idle() -> anyhow::Result<()> {
    run_scenario(
        r#"{
        "name": "engine_down",
        "replies": {
            "scan": [{"kind": "transportError", "message": "connection refused"}]
        },
        "steps": [
            {"type": "scan", "url": "example/repo"},
            {"type": "assertPhase", "phase": "Idle"},
            {"type": "assertReport", "present": false},
            {"type": "assertLogCount", "count": 3},
            {"type": "assertLastLog", "contains": "SCAN FAILED"},
            {"type": "resurrect"},
            {"type": "assertLogCount", "count": 3}
        ]
    }"#,
    )
    .await
}

#[tokio::test]
async fn test_failed_resurrection_can_be_retried() -> anyhow::Result<()> {
    run_scenario(&with_fixtures(
        r#"{
        "name": "retry_resurrection",
        "replies": {
            "scan": [{"kind": "scanOk", "report": $REPORT}],
            "resurrect": [
                {"kind": "serverError", "status": 500, "detail": "npm install failed"},
                {"kind": "resurrectOk", "result": $RESULT}
            ]
        },
        "steps": [
            {"type": "scan", "url": "example/repo"},
            {"type": "resurrect"},
            {"type": "assertPhase", "phase": "Ready"},
            {"type": "assertReport", "present": true, "decay": 20},
            {"type": "assertResult", "present": false},
            {"type": "assertLastLog", "contains": "npm install failed"},
            {"type": "resurrect"},
            {"type": "assertPhase", "phase": "Complete"},
            {"type": "assertResult", "present": true, "failed_dependencies": 1}
        ]
    }"#,
    ))
    .await
}

#[tokio::test]
async fn test_rescan_after_completion_starts_over() -> anyhow::Result<()> {
    run_scenario(&with_fixtures(
        r#"{
        "name": "rescan",
        "replies": {
            "scan": [
                {"kind": "scanOk", "report": $REPORT},
                {"kind": "protocolError", "message": "unexpected body"}
            ],
            "resurrect": [{"kind": "resurrectOk", "result": $RESULT}]
        },
        "steps": [
            {"type": "scan", "url": "example/repo"},
            {"type": "resurrect"},
            {"type": "assertPhase", "phase": "Complete"},
            {"type": "scan", "url": "example/other"},
            {"type": "assertPhase", "phase": "Idle"},
            {"type": "assertReport", "present": false},
            {"type": "assertResult", "present": false},
            {"type": "assertLogCount", "count": 11}
        ]
    }"#,
    ))
    .await
}

#[tokio::test]
async fn test_failed_export_raises_alert() -> anyhow::Result<()> {
    run_scenario(&with_fixtures(
        r#"{
        "name": "export_failure",
        "replies": {
            "scan": [{"kind": "scanOk", "report": $REPORT}],
            "resurrect": [{"kind": "resurrectOk", "result": $RESULT}],
            "download": [{"kind": "serverError", "status": 404, "detail": "Project not found"}]
        },
        "steps": [
            {"type": "scan", "url": "example/repo"},
            {"type": "resurrect"},
            {"type": "download"},
            {"type": "assertPhase", "phase": "Complete"},
            {"type": "assertResult", "present": true, "failed_dependencies": 1},
            {"type": "assertLastLog", "contains": "EXPORT FAILED"},
            {"type": "assertAlerts", "count": 1}
        ]
    }"#,
    ))
    .await
}
