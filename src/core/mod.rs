pub mod config;
pub mod error;
pub mod policy;
pub mod results;
pub mod traits;

pub use config::{Config, GitHubConfig, GitLabConfig, LocalConfig};
pub use error::{KeySyncError, Result};
pub use policy::WarningPolicy;
pub use results::{annotate_key, SyncResults};
pub use traits::{InputCheck, Source, Transport};
