use super::{is_http_url, non_empty};
use crate::core::config::GitHubConfig;
use crate::core::error::Result;
use crate::core::policy::WarningPolicy;
use crate::core::results::annotate_key;
use crate::core::traits::{InputCheck, Source, Transport};
use crate::utils::http::urlencoding;
use crate::utils::{ApiClient, IdentitySet, OrderedSet};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

pub const GITHUB_API_URL: &str = "https://api.github.com";

#[derive(Debug, Deserialize)]
struct GitHubUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct GitHubTeam {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct GitHubKey {
    key: String,
}

/// Keys of GitHub organization members, team members and explicit users
pub struct GitHubSource {
    api: ApiClient,
    endpoint: Option<String>,
    token: Option<String>,
    org: Option<String>,
    teams: Vec<String>,
    usernames: Vec<String>,
    exclude: Vec<String>,
    policy: Arc<WarningPolicy>,
}

impl GitHubSource {
    pub fn new(
        config: &GitHubConfig,
        transport: Arc<dyn Transport>,
        policy: Arc<WarningPolicy>,
    ) -> Self {
        let endpoint = non_empty(config.endpoint.as_deref());
        let token = non_empty(config.token.as_deref());

        let mut api = ApiClient::new(transport, api_base_url(endpoint.as_deref()))
            .with_header("Accept", "application/vnd.github+json");
        if let Some(token) = &token {
            api = api.with_header("Authorization", format!("token {}", token));
        }

        Self {
            api,
            endpoint,
            token,
            org: non_empty(config.org.as_deref()),
            teams: config.teams.clone(),
            usernames: config.usernames.clone(),
            exclude: config.exclude.clone(),
            policy,
        }
    }

    async fn org_members(&self, org: &str) -> Result<Vec<String>> {
        let path = format!("/orgs/{}/members", urlencoding::encode(org));
        let paged = self.api.get_all::<GitHubUser>(&path).await;

        if let Some(e) = &paged.error {
            self.policy
                .warn(Some(e), format!("Github Organisation \"{}\" not found", org))?;
        }
        Ok(paged.items.into_iter().map(|user| user.login).collect())
    }

    async fn team_members(&self, org: &str, slug: &str) -> Result<Vec<String>> {
        let team_path = format!(
            "/orgs/{}/teams/{}",
            urlencoding::encode(org),
            urlencoding::encode(slug)
        );
        let team = match self.api.get_json::<GitHubTeam>(&team_path).await {
            Ok(team) => team,
            Err(e) => {
                self.policy
                    .warn(Some(&e), format!("Github Team \"{}\" not found", slug))?;
                return Ok(Vec::new());
            }
        };
        debug!("Github team {} resolved to id {}", slug, team.id);

        let paged = self
            .api
            .get_all::<GitHubUser>(&format!("/teams/{}/members", team.id))
            .await;
        if let Some(e) = &paged.error {
            self.policy
                .warn(Some(e), format!("Github Team \"{}\" not found", slug))?;
        }
        Ok(paged.items.into_iter().map(|user| user.login).collect())
    }

    async fn user_keys(&self, username: &str) -> Result<Vec<String>> {
        let path = format!("/users/{}/keys", urlencoding::encode(username));
        let paged = self.api.get_all::<GitHubKey>(&path).await;

        if let Some(e) = &paged.error {
            self.policy
                .warn(Some(e), format!("Github User \"{}\" not found", username))?;
        }
        Ok(paged
            .items
            .iter()
            .map(|key| annotate_key(&key.key, username, "github"))
            .collect())
    }

    /// Team or org members plus explicit usernames, minus exclusions
    async fn resolve_usernames(&self) -> Result<IdentitySet<String>> {
        let mut usernames = IdentitySet::new();

        if let Some(org) = &self.org {
            let members = if self.teams.is_empty() {
                self.org_members(org).await?
            } else {
                let mut members = Vec::new();
                for team in &self.teams {
                    members.extend(self.team_members(org, team).await?);
                }
                members
            };

            for login in members {
                usernames.add(login.clone(), login);
            }
        }

        for username in &self.usernames {
            usernames.add(username.clone(), username.clone());
        }

        for excluded in &self.exclude {
            if usernames.remove(excluded).is_some() {
                debug!("Excluded Github user {}", excluded);
            }
        }

        Ok(usernames)
    }
}

#[async_trait]
impl Source for GitHubSource {
    fn name(&self) -> &str {
        "Github"
    }

    fn check_input_errors(&self) -> InputCheck {
        if let Some(endpoint) = &self.endpoint {
            if !is_http_url(endpoint) {
                return InputCheck::Error(format!("--github-endpoint is invalid: {}", endpoint));
            }
        }
        if self.org.is_none() && self.teams.is_empty() && self.usernames.is_empty() {
            return InputCheck::Error(
                "--github-org, --github-team or --github-username must be provided.".to_string(),
            );
        }
        if !self.teams.is_empty() && self.org.is_none() {
            return InputCheck::Error(
                "--github-team cannot be provided without --github-org.".to_string(),
            );
        }
        if !self.teams.is_empty() && self.token.is_none() {
            return InputCheck::Error(
                "--github-team cannot be provided without --github-token.".to_string(),
            );
        }

        if self.org.is_some() && self.token.is_none() {
            return InputCheck::Warning(
                "You provided --github-org without --github-token: organization private members won't be fetched."
                    .to_string(),
            );
        }
        InputCheck::Valid
    }

    async fn get_keys(&self) -> Result<Vec<String>> {
        let usernames = self.resolve_usernames().await?;
        info!("Fetching Github keys of {} users", usernames.len());

        let mut keys = OrderedSet::new();
        for (username, _) in usernames.to_ordered_list() {
            keys.extend(self.user_keys(&username).await?);
        }
        Ok(keys.to_ordered_list())
    }
}

/// GitHub Enterprise serves its REST API under `/api/v3`
fn api_base_url(endpoint: Option<&str>) -> String {
    match endpoint {
        None => GITHUB_API_URL.to_string(),
        Some(endpoint) => {
            let endpoint = endpoint.trim_end_matches('/');
            if endpoint.ends_with("/api/v3") {
                endpoint.to_string()
            } else {
                format!("{}/api/v3", endpoint)
            }
        }
    }
}
