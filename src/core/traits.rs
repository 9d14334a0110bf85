use async_trait::async_trait;

use super::error::Result;
use crate::utils::HttpResponse;

/// Outcome of validating a source's configuration before any network call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCheck {
    Valid,
    /// Printed, but the run continues
    Warning(String),
    /// Escalated to a fatal usage error by the aggregator
    Error(String),
}

/// A configured provider of SSH public keys
#[async_trait]
pub trait Source: Send + Sync {
    /// Stable label used as the key of the per-source output mapping
    fn name(&self) -> &str;

    /// Domain-level validation of the source configuration
    fn check_input_errors(&self) -> InputCheck;

    /// Fetch, deduplicate and filter the annotated keys of this source.
    ///
    /// Lookup failures are reported through the [`WarningPolicy`] and yield
    /// partial results. The only error returned is
    /// [`KeySyncError::Escalated`], when warnings are treated as errors.
    ///
    /// [`WarningPolicy`]: crate::core::WarningPolicy
    /// [`KeySyncError::Escalated`]: crate::core::KeySyncError::Escalated
    async fn get_keys(&self) -> Result<Vec<String>>;
}

/// Blocking HTTP GET used by the remote adapters
#[cfg_attr(test, mockall::automock)]
pub trait Transport: Send + Sync {
    fn get(&self, url: &str, headers: &[(String, String)]) -> Result<HttpResponse>;
}
