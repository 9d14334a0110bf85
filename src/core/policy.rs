use super::error::{KeySyncError, Result};
use std::sync::Mutex;
use tracing::{debug, error, warn};

/// Decides what happens to a recoverable lookup failure: log it and carry
/// on, or, when warnings are treated as errors, abort the run.
#[derive(Debug, Default)]
pub struct WarningPolicy {
    treat_as_errors: bool,
    emitted: Mutex<Vec<String>>,
}

impl WarningPolicy {
    pub fn new(treat_as_errors: bool) -> Self {
        Self {
            treat_as_errors,
            emitted: Mutex::new(Vec::new()),
        }
    }

    /// Report a recoverable failure.
    ///
    /// Returns `Err(KeySyncError::Escalated)` in strict mode so callers can
    /// stop with `?`.
    pub fn warn(&self, cause: Option<&KeySyncError>, message: impl Into<String>) -> Result<()> {
        let message = message.into();

        if let Some(cause) = cause {
            debug!("{}", cause);
        }

        if self.treat_as_errors {
            error!("{}", message);
            return Err(KeySyncError::Escalated(match cause {
                Some(cause) => format!("{} ({})", message, cause),
                None => message,
            }));
        }

        match cause {
            Some(cause) => warn!("{} ({})", message, cause),
            None => warn!("{}", message),
        }

        if let Ok(mut emitted) = self.emitted.lock() {
            emitted.push(message);
        }
        Ok(())
    }

    /// Warnings emitted so far, oldest first
    pub fn warnings(&self) -> Vec<String> {
        self.emitted
            .lock()
            .map(|emitted| emitted.clone())
            .unwrap_or_default()
    }
}
