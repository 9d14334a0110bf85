use crate::core::error::{KeySyncError, Result};
use crate::core::results::SyncResults;
use crate::core::traits::{InputCheck, Source};
use tracing::info;

/// Runs every configured source in turn and groups their keys by source name.
///
/// Keys are not deduplicated across sources; each source dedups and filters
/// its own output.
pub struct Aggregator {
    sources: Vec<Box<dyn Source>>,
}

impl Aggregator {
    pub fn new(sources: Vec<Box<dyn Source>>) -> Self {
        Self { sources }
    }

    pub fn sources(&self) -> &[Box<dyn Source>] {
        &self.sources
    }

    /// Validate every source before any network call.
    ///
    /// Returns the non-fatal warnings; the first hard error aborts with
    /// [`KeySyncError::Usage`].
    pub fn check_inputs(&self) -> Result<Vec<String>> {
        if self.sources.is_empty() {
            return Err(KeySyncError::Usage(
                "at least one of the Github, Gitlab or local sources must be configured."
                    .to_string(),
            ));
        }

        let mut warnings = Vec::new();
        for source in &self.sources {
            match source.check_input_errors() {
                InputCheck::Valid => {}
                InputCheck::Warning(message) => warnings.push(message),
                InputCheck::Error(message) => return Err(KeySyncError::Usage(message)),
            }
        }
        Ok(warnings)
    }

    /// Fetch a single source, recording its keys under its name
    pub async fn collect_source(&self, source: &dyn Source, results: &mut SyncResults) -> Result<()> {
        let keys = source.get_keys().await?;
        info!("{}: {} keys", source.name(), keys.len());
        results.insert(source.name(), keys);
        Ok(())
    }

    /// Fetch all sources sequentially
    pub async fn collect(&self) -> Result<SyncResults> {
        let mut results = SyncResults::new();
        for source in &self.sources {
            self.collect_source(source.as_ref(), &mut results).await?;
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct StaticSource {
        name: &'static str,
        check: InputCheck,
        keys: Vec<&'static str>,
    }

    #[async_trait]
    impl Source for StaticSource {
        fn name(&self) -> &str {
            self.name
        }

        fn check_input_errors(&self) -> InputCheck {
            self.check.clone()
        }

        async fn get_keys(&self) -> Result<Vec<String>> {
            Ok(self.keys.iter().map(|k| k.to_string()).collect())
        }
    }

    fn static_source(name: &'static str, check: InputCheck, keys: Vec<&'static str>) -> Box<dyn Source> {
        Box::new(StaticSource { name, check, keys })
    }

    #[test]
    fn test_no_sources_is_a_usage_error() {
        let aggregator = Aggregator::new(Vec::new());
        assert!(matches!(aggregator.check_inputs(), Err(KeySyncError::Usage(_))));
    }

    #[test]
    fn test_warnings_are_collected_errors_abort() {
        let aggregator = Aggregator::new(vec![
            static_source("Github", InputCheck::Warning("public members only".to_string()), vec![]),
            static_source("Local", InputCheck::Valid, vec![]),
        ]);
        assert_eq!(aggregator.check_inputs().unwrap(), vec!["public members only"]);

        let aggregator = Aggregator::new(vec![
            static_source("Github", InputCheck::Valid, vec![]),
            static_source("Gitlab", InputCheck::Error("--gitlab-token is missing.".to_string()), vec![]),
        ]);
        match aggregator.check_inputs() {
            Err(KeySyncError::Usage(message)) => assert_eq!(message, "--gitlab-token is missing."),
            other => panic!("expected usage error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_identical_keys_kept_per_source() {
        let aggregator = Aggregator::new(vec![
            static_source("Github", InputCheck::Valid, vec!["ssh-ed25519 AAA"]),
            static_source("Local", InputCheck::Valid, vec!["ssh-ed25519 AAA"]),
        ]);

        let results = aggregator.collect().await.unwrap();
        assert_eq!(results.total_keys(), 2);
        let names: Vec<&String> = results.sources.keys().collect();
        assert_eq!(names, vec!["Github", "Local"]);
    }
}
