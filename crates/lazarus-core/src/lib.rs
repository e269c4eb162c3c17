//! Session orchestration engine for the Lazarus resurrection workflow.
//!
//! This crate owns the workflow state machine (`Idle → Scanning → Ready →
//! Resurrecting → Complete`), the append-only progress log shown to the
//! user, and the rules for which data survives each transition. Remote work
//! is delegated to a [`lazarus_client_api::ClientApi`] implementation;
//! presentation layers subscribe through [`SessionObserver`] or a watch
//! channel.

pub mod artifact;
pub mod controller;
pub mod error;
pub mod log;
pub mod observer;
pub mod phase;
pub mod session;

/// Core result type used throughout the session engine.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for rejected intents and artifact persistence.
pub use error::Error;

/// Intent handlers and their outcomes.
pub use controller::{Outcome, SessionController};

/// Workflow phases.
pub use phase::Phase;

/// Session data and read-only projections.
pub use session::{InvariantViolation, Session, SessionSnapshot};

/// User-facing progress log.
pub use log::{LogBuffer, LogEntry};

/// Presentation subscription seam.
pub use observer::SessionObserver;

/// Persistence of downloaded artifacts.
pub use artifact::{ArtifactSink, DirectorySink};

pub use tokio_util::sync::CancellationToken;
