//! Plain-text presentation of a session

use chrono::Local;
use lazarus_api_contract::{ResurrectionResult, ScanReport, MAX_SCORE};
use lazarus_core::{LogEntry, SessionObserver};
use std::fmt::Write;

/// Echoes the session log to stdout and alerts to stderr
#[derive(Debug, Default)]
pub struct ConsoleObserver;

impl SessionObserver for ConsoleObserver {
    fn log_appended(&self, entry: &LogEntry) {
        println!("{}", format_entry(entry));
    }

    fn alert(&self, message: &str) {
        eprintln!("error: {message}");
    }
}

/// `[HH:MM:SS] > message`, in local time
pub fn format_entry(entry: &LogEntry) -> String {
    format!(
        "[{}] > {}",
        entry.timestamp.with_timezone(&Local).format("%H:%M:%S"),
        entry.message
    )
}

/// The project death report
pub fn render_report(report: &ScanReport) -> String {
    let health = &report.dependency_health;
    let mut out = String::new();
    let _ = writeln!(out, "Project Death Report");
    let _ = writeln!(out, "  Project Name:          {}", report.project_name);
    let _ = writeln!(
        out,
        "  Resurrection Score:    {}/{MAX_SCORE}",
        report.resurrection_score
    );
    let _ = writeln!(out, "  Total Dependencies:    {}", health.total);
    let _ = writeln!(out, "  Outdated Dependencies: {}", health.outdated);

    let mut outdated = health.outdated_details().peekable();
    if outdated.peek().is_some() {
        let _ = writeln!(out, "\nCritical Decay Detected:");
        for dep in outdated {
            let latest = dep.latest.as_deref().unwrap_or("?");
            let _ = writeln!(out, "  - {}: {} -> {}", dep.name, dep.current, latest);
        }
    }
    out
}

/// Final tally after a successful resurrection
pub fn render_summary(result: &ResurrectionResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Resurrection Complete!");
    let _ = writeln!(
        out,
        "  Dependencies Updated:   {}",
        result.dependencies.success.len()
    );
    if !result.dependencies.failed.is_empty() {
        let _ = writeln!(
            out,
            "  Dependencies Failed:    {} ({})",
            result.dependencies.failed.len(),
            result.dependencies.failed.join(", ")
        );
    }
    let _ = writeln!(out, "  Security Holes Patched: {}", result.security.fixed);
    let _ = writeln!(
        out,
        "  Files Modernized:       {} ({} patterns)",
        result.modernization.files_changed, result.modernization.replacements
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn report(outdated: bool) -> ScanReport {
        let details = if outdated {
            json!([
                {"name": "express", "current": "^3.0.0", "latest": "4.19.2", "status": "Outdated"},
                {"name": "lodash", "current": "4.17.21", "latest": "4.17.21", "status": "Current"}
            ])
        } else {
            json!([])
        };
        serde_json::from_value(json!({
            "local_path": "/tmp/x",
            "project_name": "repo",
            "resurrection_score": 80,
            "dependency_health": {"total": 12, "outdated": if outdated { 1 } else { 0 }, "details": details}
        }))
        .unwrap()
    }

    #[test]
    fn test_report_lists_only_outdated() {
        let text = render_report(&report(true));
        assert!(text.contains("Resurrection Score:    80/100"));
        assert!(text.contains("express: ^3.0.0 -> 4.19.2"));
        assert!(!text.contains("lodash"));
    }

    #[test]
    fn test_healthy_report_has_no_decay_section() {
        let text = render_report(&report(false));
        assert!(!text.contains("Critical Decay"));
    }

    #[test]
    fn test_summary_mentions_failures() {
        let result: ResurrectionResult = serde_json::from_value(json!({
            "dependencies": {"success": ["a", "b"], "failed": ["c"]},
            "security": {"fixed": 3},
            "modernization": {"files_changed": 5, "replacements": 11}
        }))
        .unwrap();
        let text = render_summary(&result);
        assert!(text.contains("Dependencies Updated:   2"));
        assert!(text.contains("Dependencies Failed:    1 (c)"));
        assert!(text.contains("Files Modernized:       5 (11 patterns)"));
    }

    #[test]
    fn test_entry_format() {
        let entry = LogEntry {
            timestamp: chrono::Utc::now(),
            message: "PROCESS COMPLETE.".into(),
        };
        let line = format_entry(&entry);
        assert!(line.ends_with("] > PROCESS COMPLETE."));
        assert_eq!(line.find(']'), Some(9));
    }
}
