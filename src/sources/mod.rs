pub mod github;
pub mod gitlab;
pub mod local;

pub use github::GitHubSource;
pub use gitlab::GitLabSource;
pub use local::LocalSource;

use crate::core::config::Config;
use crate::core::policy::WarningPolicy;
use crate::core::traits::{Source, Transport};
use std::sync::Arc;

/// Instantiate every source the configuration mentions, in output order
pub fn build_sources(
    config: &Config,
    transport: Arc<dyn Transport>,
    policy: Arc<WarningPolicy>,
) -> Vec<Box<dyn Source>> {
    let mut sources: Vec<Box<dyn Source>> = Vec::new();

    if config.github.is_configured() {
        sources.push(Box::new(GitHubSource::new(
            &config.github,
            Arc::clone(&transport),
            Arc::clone(&policy),
        )));
    }
    if config.gitlab.is_configured() {
        sources.push(Box::new(GitLabSource::new(
            &config.gitlab,
            Arc::clone(&transport),
            Arc::clone(&policy),
        )));
    }
    if let Some(path) = &config.local.path {
        sources.push(Box::new(LocalSource::new(path.clone(), policy)));
    }

    sources
}

/// Trimmed value, `None` when blank
pub(crate) fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub(crate) fn is_http_url(value: &str) -> bool {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    matches!(rest, Some(host) if !host.is_empty())
}
