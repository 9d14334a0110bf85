use crate::core::error::{KeySyncError, Result};
use crate::core::policy::WarningPolicy;
use crate::core::traits::{InputCheck, Source};
use async_trait::async_trait;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

/// Keys read verbatim from a local file, one per line
pub struct LocalSource {
    path: PathBuf,
    policy: Arc<WarningPolicy>,
}

impl LocalSource {
    pub fn new(path: impl Into<PathBuf>, policy: Arc<WarningPolicy>) -> Self {
        Self {
            path: path.into(),
            policy,
        }
    }
}

#[async_trait]
impl Source for LocalSource {
    fn name(&self) -> &str {
        "Local"
    }

    fn check_input_errors(&self) -> InputCheck {
        if !self.path.exists() {
            return InputCheck::Error(format!("File does not exist: {}", self.path.display()));
        }
        InputCheck::Valid
    }

    async fn get_keys(&self) -> Result<Vec<String>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                self.policy.warn(
                    Some(&KeySyncError::from(e)),
                    format!("Failed to read file: {}", self.path.display()),
                )?;
                return Ok(Vec::new());
            }
        };

        Ok(contents
            .split('\n')
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}
