use super::error::{KeySyncError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Files probed when no `--config` is given, first match wins
pub const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "sync-ssh-keys.toml",
    ".sync_ssh_keys.toml",
    "config/default.toml",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub github: GitHubConfig,
    pub gitlab: GitLabConfig,
    pub local: LocalConfig,
    pub http: HttpConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Load `path`, or the first existing default path. No file means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            if !path.exists() {
                return Err(KeySyncError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            return Self::from_file(path);
        }

        for candidate in DEFAULT_CONFIG_PATHS {
            let candidate = Path::new(candidate);
            if candidate.exists() {
                return Self::from_file(candidate);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// GitHub Enterprise endpoint; `None` means api.github.com
    pub endpoint: Option<String>,
    pub token: Option<String>,
    pub org: Option<String>,
    pub teams: Vec<String>,
    pub usernames: Vec<String>,
    pub exclude: Vec<String>,
}

impl GitHubConfig {
    pub fn is_configured(&self) -> bool {
        self.org.is_some()
            || !self.teams.is_empty()
            || !self.usernames.is_empty()
            || !self.exclude.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitLabConfig {
    /// Self-hosted endpoint; `None` means gitlab.com
    pub endpoint: Option<String>,
    pub token: Option<String>,
    pub groups: Vec<String>,
    pub usernames: Vec<String>,
    pub exclude: Vec<String>,
    /// Pause before each per-user key request
    pub request_delay_ms: u64,
}

impl Default for GitLabConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            token: None,
            groups: Vec::new(),
            usernames: Vec::new(),
            exclude: Vec::new(),
            request_delay_ms: 100,
        }
    }
}

impl GitLabConfig {
    pub fn is_configured(&self) -> bool {
        !self.groups.is_empty() || !self.usernames.is_empty() || !self.exclude.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// `authorized_keys` or `json`
    pub format: String,
    /// `None` writes to stdout
    pub path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "authorized_keys".to_string(),
            path: None,
        }
    }
}
