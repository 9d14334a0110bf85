use thiserror::Error;

#[derive(Error, Debug)]
pub enum KeySyncError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Curl error: {0}")]
    Curl(#[from] curl::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Usage(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("{0}")]
    Escalated(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl KeySyncError {
    /// Process exit status the binary uses for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            KeySyncError::Usage(_) => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, KeySyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_errors_exit_with_two() {
        assert_eq!(KeySyncError::Usage("bad flags".to_string()).exit_code(), 2);
        assert_eq!(KeySyncError::Escalated("boom".to_string()).exit_code(), 1);
    }
}
