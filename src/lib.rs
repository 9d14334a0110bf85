//! # sync-ssh-keys
//!
//! Aggregates SSH public keys from several identity sources into one
//! `authorized_keys` file.
//!
//! ## Sources
//!
//! - **GitHub**: organization members, team members and explicit usernames
//! - **GitLab**: group members (subgroups included) and explicit usernames
//! - **Local**: a file of keys, one per line
//!
//! Each source deduplicates its own keys and applies its exclusion list.
//! Lookup failures are warnings unless `--Werror` is set.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sync_ssh_keys::aggregator::Aggregator;
//! use sync_ssh_keys::core::{Config, WarningPolicy};
//! use sync_ssh_keys::sources::build_sources;
//! use sync_ssh_keys::utils::HttpClient;
//!
//! # async fn run() -> sync_ssh_keys::Result<()> {
//! let mut config = Config::default();
//! config.github.org = Some("acme".to_string());
//!
//! let policy = Arc::new(WarningPolicy::new(false));
//! let aggregator = Aggregator::new(build_sources(&config, Arc::new(HttpClient::new()), policy));
//! aggregator.check_inputs()?;
//!
//! let results = aggregator.collect().await?;
//! println!("Found {} keys", results.total_keys());
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod cli;
pub mod core;
pub mod sources;
pub mod utils;

// Re-export commonly used types
pub use aggregator::Aggregator;
pub use self::core::{
    Config, InputCheck, KeySyncError, Result, Source, SyncResults, Transport, WarningPolicy,
};
pub use sources::{build_sources, GitHubSource, GitLabSource, LocalSource};
