//! Workflow phases of a session.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Position of a session in the resurrection workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// No scan report; waiting for a locator.
    #[default]
    Idle,
    /// A scan request is outstanding.
    Scanning,
    /// A scan report is available; resurrection may start.
    Ready,
    /// A resurrection request is outstanding.
    Resurrecting,
    /// Resurrection finished; the artifact may be downloaded.
    Complete,
}

impl Phase {
    /// Whether a remote call driven by the state machine is outstanding.
    pub fn is_busy(self) -> bool {
        matches!(self, Phase::Scanning | Phase::Resurrecting)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Idle => "IDLE",
            Phase::Scanning => "SCANNING",
            Phase::Ready => "READY",
            Phase::Resurrecting => "RESURRECTING",
            Phase::Complete => "COMPLETE",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "IDLE" => Ok(Phase::Idle),
            "SCANNING" => Ok(Phase::Scanning),
            "READY" => Ok(Phase::Ready),
            "RESURRECTING" => Ok(Phase::Resurrecting),
            "COMPLETE" => Ok(Phase::Complete),
            other => Err(format!("unknown phase: {other}")),
        }
    }
}
