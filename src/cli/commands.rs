use crate::core::config::Config;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sync-ssh-keys")]
#[command(version, about = "Aggregate SSH public keys from GitHub, GitLab and local files", long_about = None)]
pub struct Cli {
    /// GitHub Enterprise endpoint (default: api.github.com)
    #[arg(long)]
    pub github_endpoint: Option<String>,

    /// GitHub token (can also use GITHUB_TOKEN env var)
    #[arg(long)]
    pub github_token: Option<String>,

    /// GitHub organization name
    #[arg(long)]
    pub github_org: Option<String>,

    /// GitHub team slug allowed to access the server (repeatable)
    #[arg(long = "github-team")]
    pub github_teams: Vec<String>,

    /// GitHub username allowed to access the server (repeatable)
    #[arg(long = "github-username")]
    pub github_usernames: Vec<String>,

    /// GitHub username to explicitly exclude (repeatable)
    #[arg(long = "exclude-github-username")]
    pub exclude_github_usernames: Vec<String>,

    /// GitLab endpoint (default: gitlab.com)
    #[arg(long)]
    pub gitlab_endpoint: Option<String>,

    /// GitLab token (can also use GITLAB_TOKEN env var)
    #[arg(long)]
    pub gitlab_token: Option<String>,

    /// GitLab group or subgroup path (repeatable)
    #[arg(long = "gitlab-group")]
    pub gitlab_groups: Vec<String>,

    /// GitLab username allowed to access the server (repeatable)
    #[arg(long = "gitlab-username")]
    pub gitlab_usernames: Vec<String>,

    /// GitLab username to explicitly exclude (repeatable)
    #[arg(long = "exclude-gitlab-username")]
    pub exclude_gitlab_usernames: Vec<String>,

    /// Local file of public keys, one per line
    #[arg(long)]
    pub local_path: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (authorized_keys, json)
    #[arg(short, long)]
    pub format: Option<String>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Treat warnings as errors: fail if an organization, team, group or user does not exist
    #[arg(long = "Werror")]
    pub werror: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Overlay command-line values on a loaded configuration.
    ///
    /// Scalars given on the command line win; non-empty lists replace the
    /// file's lists. Tokens fall back to `GITHUB_TOKEN` / `GITLAB_TOKEN`.
    pub fn apply_to(&self, config: &mut Config) {
        override_value(&mut config.github.endpoint, &self.github_endpoint);
        override_value(&mut config.github.org, &self.github_org);
        override_list(&mut config.github.teams, &self.github_teams);
        override_list(&mut config.github.usernames, &self.github_usernames);
        override_list(&mut config.github.exclude, &self.exclude_github_usernames);
        let file_token = config.github.token.take();
        config.github.token = self
            .github_token
            .clone()
            .or_else(|| std::env::var("GITHUB_TOKEN").ok())
            .or(file_token);

        override_value(&mut config.gitlab.endpoint, &self.gitlab_endpoint);
        override_list(&mut config.gitlab.groups, &self.gitlab_groups);
        override_list(&mut config.gitlab.usernames, &self.gitlab_usernames);
        override_list(&mut config.gitlab.exclude, &self.exclude_gitlab_usernames);
        let file_token = config.gitlab.token.take();
        config.gitlab.token = self
            .gitlab_token
            .clone()
            .or_else(|| std::env::var("GITLAB_TOKEN").ok())
            .or(file_token);

        override_value(&mut config.local.path, &self.local_path);
        override_value(&mut config.output.path, &self.output);
        override_value(&mut config.output.format, &self.format);
    }
}

fn override_value<T>(target: &mut T, value: &Option<impl Into<T> + Clone>) {
    if let Some(value) = value {
        *target = value.clone().into();
    }
}

fn override_list(target: &mut Vec<String>, values: &[String]) {
    if !values.is_empty() {
        *target = values.to_vec();
    }
}
