use super::{is_http_url, non_empty};
use crate::core::config::GitLabConfig;
use crate::core::error::{KeySyncError, Result};
use crate::core::policy::WarningPolicy;
use crate::core::results::annotate_key;
use crate::core::traits::{InputCheck, Source, Transport};
use crate::utils::http::urlencoding;
use crate::utils::{ApiClient, IdentitySet, OrderedSet, RateLimiter};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub const GITLAB_API_URL: &str = "https://gitlab.com/api/v4";

/// gitlab.com allows 600 requests per minute per IP
const REQUESTS_PER_MINUTE: u32 = 600;

#[derive(Debug, Deserialize)]
struct GitLabUser {
    id: u64,
    username: String,
}

#[derive(Debug, Deserialize)]
struct GitLabKey {
    key: String,
}

/// Keys of GitLab group members and explicit users.
///
/// GitLab keys users by numeric ID, so usernames and exclusions are resolved
/// to IDs first and every input kind is merged in one [`IdentitySet`] before
/// any key is requested.
pub struct GitLabSource {
    api: ApiClient,
    endpoint: Option<String>,
    token: Option<String>,
    groups: Vec<String>,
    usernames: Vec<String>,
    exclude: Vec<String>,
    rate_limiter: RateLimiter,
    policy: Arc<WarningPolicy>,
}

impl GitLabSource {
    pub fn new(
        config: &GitLabConfig,
        transport: Arc<dyn Transport>,
        policy: Arc<WarningPolicy>,
    ) -> Self {
        let endpoint = non_empty(config.endpoint.as_deref());
        let token = non_empty(config.token.as_deref());

        let mut api = ApiClient::new(transport, api_base_url(endpoint.as_deref()));
        if let Some(token) = &token {
            api = api.with_header("PRIVATE-TOKEN", token.as_str());
        }

        Self {
            api,
            endpoint,
            token,
            groups: config.groups.clone(),
            usernames: config.usernames.clone(),
            exclude: config.exclude.clone(),
            rate_limiter: RateLimiter::with_delay(Duration::from_millis(config.request_delay_ms))
                .with_quota_per_minute(REQUESTS_PER_MINUTE),
            policy,
        }
    }

    /// Exact-match lookup; zero or several matches both count as not found
    async fn find_user(&self, username: &str) -> Result<GitLabUser> {
        let path = format!("/users?username={}", urlencoding::encode(username));
        let mut users: Vec<GitLabUser> = self.api.get_json(&path).await?;

        if users.len() != 1 {
            return Err(KeySyncError::NotFound(format!(
                "Gitlab user not found: {}",
                username
            )));
        }
        Ok(users.remove(0))
    }

    /// Direct and inherited members of a group or subgroup
    async fn group_members(&self, group: &str) -> Result<IdentitySet<u64>> {
        let path = format!("/groups/{}/members/all", urlencoding::encode(group));
        let paged = self.api.get_all::<GitLabUser>(&path).await;

        if let Some(e) = &paged.error {
            self.policy.warn(
                Some(e),
                format!("Gitlab Group or Subgroup \"{}\" not found", group),
            )?;
        }
        Ok(paged
            .items
            .into_iter()
            .map(|member| (member.id, member.username))
            .collect())
    }

    async fn user_keys(&self, user_id: u64, username: &str) -> Result<Vec<String>> {
        let paged = self
            .api
            .get_all::<GitLabKey>(&format!("/users/{}/keys", user_id))
            .await;

        if let Some(e) = &paged.error {
            self.policy
                .warn(Some(e), format!("Gitlab User \"{}\" not found", username))?;
        }
        Ok(paged
            .items
            .iter()
            .map(|key| annotate_key(&key.key, username, "gitlab"))
            .collect())
    }

    async fn resolve_identities(&self) -> Result<IdentitySet<u64>> {
        let mut identities = IdentitySet::new();

        for group in &self.groups {
            identities.merge(self.group_members(group).await?);
        }

        for username in &self.usernames {
            match self.find_user(username).await {
                Ok(user) => identities.add(user.id, user.username),
                Err(e) => self
                    .policy
                    .warn(Some(&e), format!("Gitlab user \"{}\" not found", username))?,
            }
        }

        // An exclusion that cannot be resolved has nothing to exclude
        for excluded in &self.exclude {
            match self.find_user(excluded).await {
                Ok(user) => {
                    if identities.remove(&user.id).is_some() {
                        debug!("Excluded Gitlab user {} ({})", excluded, user.id);
                    }
                }
                Err(e) => self
                    .policy
                    .warn(Some(&e), format!("Gitlab user \"{}\" not found", excluded))?,
            }
        }

        Ok(identities)
    }
}

#[async_trait]
impl Source for GitLabSource {
    fn name(&self) -> &str {
        "Gitlab"
    }

    fn check_input_errors(&self) -> InputCheck {
        if let Some(endpoint) = &self.endpoint {
            if !is_http_url(endpoint) {
                return InputCheck::Error(format!("--gitlab-endpoint is invalid: {}", endpoint));
            }
        }
        if self.token.is_none() {
            return InputCheck::Error("--gitlab-token is missing.".to_string());
        }
        if self.groups.is_empty() && self.usernames.is_empty() {
            return InputCheck::Error(
                "--gitlab-group or --gitlab-username must be provided.".to_string(),
            );
        }
        InputCheck::Valid
    }

    async fn get_keys(&self) -> Result<Vec<String>> {
        let identities = self.resolve_identities().await?;
        info!("Fetching Gitlab keys of {} users", identities.len());

        let mut keys = OrderedSet::new();
        for (user_id, username) in identities.to_ordered_list() {
            self.rate_limiter.wait().await;
            keys.extend(self.user_keys(user_id, &username).await?);
        }
        Ok(keys.to_ordered_list())
    }
}

/// Self-hosted instances serve the REST API under `/api/v4`
fn api_base_url(endpoint: Option<&str>) -> String {
    match endpoint {
        None => GITLAB_API_URL.to_string(),
        Some(endpoint) => {
            let endpoint = endpoint.trim_end_matches('/');
            if endpoint.ends_with("/api/v4") {
                endpoint.to_string()
            } else {
                format!("{}/api/v4", endpoint)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::MockTransport;
    use crate::utils::HttpResponse;

    fn source(config: GitLabConfig, transport: MockTransport) -> GitLabSource {
        GitLabSource::new(
            &config,
            Arc::new(transport),
            Arc::new(WarningPolicy::new(false)),
        )
    }

    #[test]
    fn test_self_hosted_base_url() {
        assert_eq!(api_base_url(None), GITLAB_API_URL);
        assert_eq!(
            api_base_url(Some("https://git.acme.corp")),
            "https://git.acme.corp/api/v4"
        );
        assert_eq!(
            api_base_url(Some("https://git.acme.corp/api/v4/")),
            "https://git.acme.corp/api/v4"
        );
    }

    #[test]
    fn test_token_is_required() {
        let gitlab = source(
            GitLabConfig {
                groups: vec!["infra".to_string()],
                ..Default::default()
            },
            MockTransport::new(),
        );
        assert!(matches!(
            gitlab.check_input_errors(),
            InputCheck::Error(msg) if msg.contains("--gitlab-token")
        ));
    }

    #[test]
    fn test_groups_or_usernames_required() {
        let gitlab = source(
            GitLabConfig {
                token: Some("glpat".to_string()),
                exclude: vec!["mallory".to_string()],
                ..Default::default()
            },
            MockTransport::new(),
        );
        assert!(matches!(gitlab.check_input_errors(), InputCheck::Error(_)));
    }

    #[tokio::test]
    async fn test_ambiguous_username_is_not_found() {
        let mut transport = MockTransport::new();
        transport.expect_get().times(1).returning(|_, _| {
            Ok(HttpResponse::new(
                200,
                r#"[{"id": 1, "username": "sam"}, {"id": 2, "username": "sam"}]"#,
            ))
        });

        let gitlab = source(
            GitLabConfig {
                token: Some("glpat".to_string()),
                usernames: vec!["sam".to_string()],
                ..Default::default()
            },
            transport,
        );
        assert!(matches!(
            gitlab.find_user("sam").await,
            Err(KeySyncError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_private_token_header() {
        let mut transport = MockTransport::new();
        transport
            .expect_get()
            .withf(|url, headers| {
                url.starts_with("https://gitlab.com/api/v4/users?username=alice")
                    && headers.iter().any(|(k, v)| k == "PRIVATE-TOKEN" && v == "glpat")
            })
            .times(1)
            .returning(|_, _| Ok(HttpResponse::new(200, r#"[{"id": 5, "username": "alice"}]"#)));

        let gitlab = source(
            GitLabConfig {
                token: Some("glpat".to_string()),
                usernames: vec!["alice".to_string()],
                ..Default::default()
            },
            transport,
        );
        assert_eq!(gitlab.find_user("alice").await.unwrap().id, 5);
    }
}
