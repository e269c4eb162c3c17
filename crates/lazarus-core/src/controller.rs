//! Intent handlers driving the session state machine.

use lazarus_api_contract::ScanReport;
use lazarus_client_api::ClientApi;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;

use crate::artifact::ArtifactSink;
use crate::log::{LogBuffer, LogEntry};
use crate::observer::SessionObserver;
use crate::phase::Phase;
use crate::session::{Session, SessionSnapshot};

const SCAN_STARTED: &str = "INITIALIZING LAZARUS PROTOCOL...";
const SCAN_CONNECTING: &str = "CONNECTING TO TARGET...";
const SCAN_CANCELLED: &str = "SCAN CANCELLED.";
const RESURRECT_STEPS: [&str; 3] = [
    "INJECTING ADRENALINE (Dependencies)...",
    "CAUTERIZING WOUNDS (Security)...",
    "MUTATING DNA (Code Refactoring)...",
];
const RESURRECT_DONE: &str = "PROCESS COMPLETE.";
const RESURRECT_CANCELLED: &str = "RESURRECTION CANCELLED.";
const DOWNLOAD_CANCELLED: &str = "EXPORT CANCELLED.";

/// How an intent settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The remote call succeeded and the session moved on.
    Completed,
    /// The remote call failed; the session rolled back.
    Failed { reason: String },
    /// The caller cancelled the call; the session rolled back.
    Cancelled,
    /// The phase guard rejected the intent; nothing happened.
    Ignored { phase: Phase },
}

struct Inner {
    session: Session,
    log: LogBuffer,
    observers: Vec<Arc<dyn SessionObserver>>,
}

impl Inner {
    fn push_log(&mut self, message: impl Into<String>) {
        let entry = self.log.append(message);
        for observer in &self.observers {
            observer.log_appended(entry);
        }
    }

    fn transition(&mut self, apply: impl FnOnce(&mut Session)) {
        let from = self.session.phase();
        apply(&mut self.session);
        let to = self.session.phase();
        debug_assert!(
            self.session.check_invariants().is_ok(),
            "{:?}",
            self.session.check_invariants()
        );

        tracing::debug!(%from, %to, "session transition");
        if from != to {
            for observer in &self.observers {
                observer.phase_changed(from, to);
            }
        }
    }

    fn alert(&self, message: &str) {
        for observer in &self.observers {
            observer.alert(message);
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot(self.log.len())
    }
}

/// Owns one [`Session`] and exposes the three workflow intents.
///
/// The controller is meant to be shared (`Arc<SessionController<_>>`).
/// Intents may race; the phase guard, evaluated under the session lock,
/// decides which one is dispatched. The lock is never held across a remote
/// call.
pub struct SessionController<C: ClientApi> {
    client: Arc<C>,
    sink: Arc<dyn ArtifactSink>,
    inner: Mutex<Inner>,
    snapshots: watch::Sender<SessionSnapshot>,
}

impl<C: ClientApi> SessionController<C> {
    /// Create a controller with a fresh `Idle` session.
    pub fn new(client: Arc<C>, sink: Arc<dyn ArtifactSink>) -> Self {
        let (snapshots, _) = watch::channel(SessionSnapshot::default());
        Self {
            client,
            sink,
            inner: Mutex::new(Inner {
                session: Session::new(),
                log: LogBuffer::new(),
                observers: Vec::new(),
            }),
            snapshots,
        }
    }

    /// Register an observer for phase changes, log appends and alerts.
    pub async fn subscribe(&self, observer: Arc<dyn SessionObserver>) {
        self.inner.lock().await.observers.push(observer);
    }

    /// Latest snapshot, updated after every state change.
    pub fn watch(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.subscribe()
    }

    pub async fn phase(&self) -> Phase {
        self.inner.lock().await.session.phase()
    }

    pub async fn report(&self) -> Option<ScanReport> {
        self.inner.lock().await.session.report().cloned()
    }

    pub async fn result(&self) -> Option<lazarus_api_contract::ResurrectionResult> {
        self.inner.lock().await.session.result().cloned()
    }

    /// Every log entry so far, in insertion order.
    pub async fn logs(&self) -> Vec<LogEntry> {
        self.inner.lock().await.log.entries().to_vec()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.inner.lock().await.snapshot()
    }

    /// Start (or restart) the workflow by scanning `url`.
    pub async fn scan(&self, url: &str) -> crate::Result<Outcome> {
        self.scan_with(url, CancellationToken::new()).await
    }

    /// [`Self::scan`] with a cancellation handle.
    ///
    /// Ignored while a scan or resurrection is outstanding. Any report or
    /// result from an earlier run is dropped before the request is sent.
    pub async fn scan_with(&self, url: &str, cancel: CancellationToken) -> crate::Result<Outcome> {
        let url = url.trim();
        if url.is_empty() {
            return Err(crate::Error::InvalidLocator);
        }

        {
            let mut inner = self.inner.lock().await;
            let phase = inner.session.phase();
            if phase.is_busy() {
                tracing::debug!(%phase, "scan ignored while a request is outstanding");
                return Ok(Outcome::Ignored { phase });
            }
            inner.transition(Session::begin_scan);
            inner.push_log(SCAN_STARTED);
            inner.push_log(SCAN_CONNECTING);
            self.publish(&inner);
        }

        tracing::info!(target_url = url, "scan dispatched");
        let settled = settle(&cancel, self.client.scan(url)).await;

        let mut inner = self.inner.lock().await;
        let outcome = match settled {
            Some(Ok(report)) => {
                tracing::info!(
                    project = %report.project_name,
                    score = report.resurrection_score,
                    "scan succeeded"
                );
                inner.push_log(format!("TARGET ACQUIRED: {}", report.project_name));
                inner.push_log(format!("DECAY LEVEL: {}%", report.decay_level()));
                inner.transition(|s| s.finish_scan(report));
                Outcome::Completed
            }
            Some(Err(err)) => {
                tracing::warn!(target_url = url, error = %err, "scan failed");
                inner.push_log(format!("SCAN FAILED: {err}"));
                inner.transition(Session::abort_scan);
                Outcome::Failed {
                    reason: err.to_string(),
                }
            }
            None => {
                tracing::info!(target_url = url, "scan cancelled");
                inner.push_log(SCAN_CANCELLED);
                inner.transition(Session::abort_scan);
                Outcome::Cancelled
            }
        };
        self.publish(&inner);
        Ok(outcome)
    }

    /// Run the remediation passes on the scanned working copy.
    pub async fn resurrect(&self) -> Outcome {
        self.resurrect_with(CancellationToken::new()).await
    }

    /// [`Self::resurrect`] with a cancellation handle.
    ///
    /// Only dispatched from `Ready`. On failure the session returns to
    /// `Ready` with the report untouched so the user can retry.
    pub async fn resurrect_with(&self, cancel: CancellationToken) -> Outcome {
        let (local_path, details): (String, Vec<serde_json::Value>) = {
            let mut inner = self.inner.lock().await;
            let phase = inner.session.phase();
            let target = match (phase, inner.session.report()) {
                (Phase::Ready, Some(report)) => (
                    report.local_path.clone(),
                    report.dependency_health.details.clone(),
                ),
                _ => {
                    tracing::debug!(%phase, "resurrect ignored outside Ready");
                    return Outcome::Ignored { phase };
                }
            };
            inner.transition(Session::begin_resurrect);
            for step in RESURRECT_STEPS {
                inner.push_log(step);
            }
            self.publish(&inner);
            target
        };

        tracing::info!(local_path = %local_path, details = details.len(), "resurrect dispatched");
        let settled = settle(&cancel, self.client.resurrect(&local_path, &details)).await;

        let mut inner = self.inner.lock().await;
        let outcome = match settled {
            Some(Ok(result)) => {
                tracing::info!(
                    upgraded = result.dependencies.success.len(),
                    failed = result.dependencies.failed.len(),
                    fixed = result.security.fixed,
                    files_changed = result.modernization.files_changed,
                    "resurrect succeeded"
                );
                inner.push_log(RESURRECT_DONE);
                inner.transition(|s| s.finish_resurrect(result));
                Outcome::Completed
            }
            Some(Err(err)) => {
                tracing::warn!(local_path = %local_path, error = %err, "resurrect failed");
                inner.push_log(format!("RESURRECTION FAILED: {err}"));
                inner.transition(Session::abort_resurrect);
                Outcome::Failed {
                    reason: err.to_string(),
                }
            }
            None => {
                tracing::info!(local_path = %local_path, "resurrect cancelled");
                inner.push_log(RESURRECT_CANCELLED);
                inner.transition(Session::abort_resurrect);
                Outcome::Cancelled
            }
        };
        self.publish(&inner);
        outcome
    }

    /// Fetch the packaged working copy and hand it to the artifact sink.
    pub async fn download(&self) -> Outcome {
        self.download_with(CancellationToken::new()).await
    }

    /// [`Self::download`] with a cancellation handle.
    ///
    /// A side action available in `Complete`: it never changes the phase or
    /// the retained data. Failures are logged and also raised as an alert.
    pub async fn download_with(&self, cancel: CancellationToken) -> Outcome {
        let (project_name, local_path) = {
            let inner = self.inner.lock().await;
            let phase = inner.session.phase();
            match (phase, inner.session.report()) {
                (Phase::Complete, Some(report)) => {
                    (report.project_name.clone(), report.local_path.clone())
                }
                _ => {
                    tracing::debug!(%phase, "download ignored outside Complete");
                    return Outcome::Ignored { phase };
                }
            }
        };

        tracing::info!(project = %project_name, "download dispatched");
        // Once the bytes are in hand the save runs to completion, so a
        // cancelled export never leaves a partial file behind.
        let settled = match settle(&cancel, self.client.download(&project_name, &local_path)).await
        {
            Some(Ok(artifact)) => Some(self.sink.save(&artifact).await.map_err(|e| e.to_string())),
            Some(Err(err)) => Some(Err(err.to_string())),
            None => None,
        };

        let mut inner = self.inner.lock().await;
        let outcome = match settled {
            Some(Ok(location)) => {
                inner.push_log(format!("ARTIFACT SAVED: {location}"));
                Outcome::Completed
            }
            Some(Err(reason)) => {
                tracing::warn!(project = %project_name, error = %reason, "download failed");
                inner.push_log(format!("EXPORT FAILED: {reason}"));
                inner.alert(&format!("Export failed: {reason}"));
                Outcome::Failed { reason }
            }
            None => {
                inner.push_log(DOWNLOAD_CANCELLED);
                Outcome::Cancelled
            }
        };
        self.publish(&inner);
        outcome
    }

    fn publish(&self, inner: &Inner) {
        self.snapshots.send_replace(inner.snapshot());
    }
}

/// Race `call` against `cancel`; `None` means the caller gave up first.
async fn settle<T, F>(cancel: &CancellationToken, call: F) -> Option<T>
where
    F: Future<Output = T>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        settled = call => Some(settled),
    }
}
