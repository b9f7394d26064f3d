//! Forced navigation hook used when the session expires.

use std::sync::Mutex;

/// Performs a full navigation to an application path.
///
/// The session-expiry middleware calls this with the login path; the
/// implementation decides what "navigate" means for the host (reset the UI,
/// print a hint and stop, record the call in tests).
pub trait Navigator: Send + Sync {
    fn redirect(&self, path: &str);
}

/// Navigator for headless hosts: logs the redirect and nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn redirect(&self, path: &str) {
        tracing::info!(path, "Session ended, sign in again");
    }
}

/// Navigator that records every redirect instead of performing it.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every path redirected to so far, oldest first.
    #[must_use]
    pub fn visits(&self) -> Vec<String> {
        self.visits
            .lock()
            .map(|visits| visits.clone())
            .unwrap_or_default()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, path: &str) {
        if let Ok(mut visits) = self.visits.lock() {
            visits.push(path.to_string());
        }
    }
}
