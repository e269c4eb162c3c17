//! Session data and the transitions that keep it consistent.

use lazarus_api_contract::{ResurrectionResult, ScanReport};
use serde::{Deserialize, Serialize};

use crate::phase::Phase;

/// Retained data violates the phase/report/result rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("session invariant violated in {phase}: {message}")]
pub struct InvariantViolation {
    pub phase: Phase,
    pub message: String,
}

fn check(
    phase: Phase,
    report: Option<&ScanReport>,
    result: Option<&ResurrectionResult>,
) -> Result<(), InvariantViolation> {
    let violation = |message: &str| InvariantViolation {
        phase,
        message: message.to_string(),
    };

    if result.is_some() && (report.is_none() || phase != Phase::Complete) {
        return Err(violation("result retained outside Complete or without a report"));
    }
    match phase {
        Phase::Idle | Phase::Scanning if report.is_some() => {
            Err(violation("report retained before a scan succeeded"))
        }
        Phase::Ready | Phase::Resurrecting | Phase::Complete if report.is_none() => {
            Err(violation("report missing after a successful scan"))
        }
        _ => Ok(()),
    }
}

/// The single per-workflow state holder.
///
/// Only the transition methods below mutate it; each one leaves the
/// invariants intact.
#[derive(Debug, Clone, Default)]
pub struct Session {
    phase: Phase,
    report: Option<ScanReport>,
    result: Option<ResurrectionResult>,
}

impl Session {
    /// Fresh session: `Idle`, nothing retained.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn report(&self) -> Option<&ScanReport> {
        self.report.as_ref()
    }

    pub fn result(&self) -> Option<&ResurrectionResult> {
        self.result.as_ref()
    }

    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        check(self.phase, self.report.as_ref(), self.result.as_ref())
    }

    /// Enter `Scanning`, dropping everything retained from earlier runs.
    pub(crate) fn begin_scan(&mut self) {
        self.report = None;
        self.result = None;
        self.phase = Phase::Scanning;
    }

    pub(crate) fn finish_scan(&mut self, report: ScanReport) {
        self.report = Some(report);
        self.phase = Phase::Ready;
    }

    /// Failed or cancelled scan: back to `Idle` with nothing retained.
    pub(crate) fn abort_scan(&mut self) {
        self.report = None;
        self.result = None;
        self.phase = Phase::Idle;
    }

    pub(crate) fn begin_resurrect(&mut self) {
        self.phase = Phase::Resurrecting;
    }

    pub(crate) fn finish_resurrect(&mut self, result: ResurrectionResult) {
        self.result = Some(result);
        self.phase = Phase::Complete;
    }

    /// Failed or cancelled resurrection: back to `Ready`, report untouched.
    pub(crate) fn abort_resurrect(&mut self) {
        self.result = None;
        self.phase = Phase::Ready;
    }

    pub(crate) fn snapshot(&self, log_len: usize) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            report: self.report.clone(),
            result: self.result.clone(),
            log_len,
        }
    }
}

/// Read-only projection handed to presentation layers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub report: Option<ScanReport>,
    pub result: Option<ResurrectionResult>,
    /// Number of log entries at the time the snapshot was taken.
    pub log_len: usize,
}

impl SessionSnapshot {
    /// Decay level of the retained report, if any.
    pub fn decay_level(&self) -> Option<u32> {
        self.report.as_ref().map(ScanReport::decay_level)
    }

    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        check(self.phase, self.report.as_ref(), self.result.as_ref())
    }
}
