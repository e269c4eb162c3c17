//! Subscription seam for presentation layers.

use crate::log::LogEntry;
use crate::phase::Phase;

/// Receives state changes from a [`crate::SessionController`].
///
/// Callbacks run synchronously, in emission order, while the session is
/// locked; implementations must not call back into the controller.
pub trait SessionObserver: Send + Sync {
    fn phase_changed(&self, _from: Phase, _to: Phase) {}

    fn log_appended(&self, _entry: &LogEntry) {}

    /// High-salience notification for failures that leave the phase unchanged.
    fn alert(&self, _message: &str) {}
}
