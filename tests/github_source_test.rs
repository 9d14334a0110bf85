mod common;

use common::{lenient, strict, strings, FakeTransport};
use sync_ssh_keys::core::{GitHubConfig, KeySyncError, Source};
use sync_ssh_keys::sources::GitHubSource;

const API: &str = "https://api.github.com";

fn url(path: &str) -> String {
    format!("{}{}", API, path)
}

fn acme_org() -> FakeTransport {
    FakeTransport::new()
        .ok(&url("/orgs/acme/members"), r#"[{"login": "a"}, {"login": "b"}]"#)
        .ok(&url("/users/a/keys"), r#"[{"id": 1, "key": "ssh-ed25519 AAAA"}]"#)
        .ok(
            &url("/users/b/keys"),
            r#"[{"id": 2, "key": "ssh-ed25519 BBBB"}, {"id": 3, "key": "ssh-rsa CCCC"}]"#,
        )
}

#[tokio::test]
async fn test_org_members_minus_exclusions() {
    let transport = acme_org().into_arc();
    let github = GitHubSource::new(
        &GitHubConfig {
            org: Some("acme".to_string()),
            token: Some("ghp_test".to_string()),
            exclude: strings(&["b"]),
            ..Default::default()
        },
        transport.clone(),
        lenient(),
    );

    let keys = github.get_keys().await.unwrap();

    assert_eq!(keys, vec!["ssh-ed25519 AAAA a@github"]);
    assert_eq!(transport.count(&url("/users/b/keys")), 0);
}

#[tokio::test]
async fn test_explicit_usernames_add_to_org_and_dedup() {
    let transport = acme_org().into_arc();
    let policy = lenient();
    let github = GitHubSource::new(
        &GitHubConfig {
            org: Some("acme".to_string()),
            usernames: strings(&["b", "a"]),
            ..Default::default()
        },
        transport.clone(),
        policy.clone(),
    );

    let keys = github.get_keys().await.unwrap();

    assert_eq!(
        keys,
        vec![
            "ssh-ed25519 AAAA a@github",
            "ssh-ed25519 BBBB b@github",
            "ssh-rsa CCCC b@github",
        ]
    );
    assert_eq!(transport.count(&url("/users/a/keys")), 1);
    assert_eq!(transport.count(&url("/users/b/keys")), 1);
    assert!(policy.warnings().is_empty());
}

#[tokio::test]
async fn test_team_slug_resolved_to_id() {
    let transport = FakeTransport::new()
        .ok(&url("/orgs/acme/teams/ops"), r#"{"id": 42, "slug": "ops"}"#)
        .ok(&url("/teams/42/members"), r#"[{"login": "carol"}]"#)
        .ok(&url("/users/carol/keys"), r#"[{"id": 9, "key": "ssh-ed25519 CAROL"}]"#)
        .into_arc();

    let github = GitHubSource::new(
        &GitHubConfig {
            org: Some("acme".to_string()),
            teams: strings(&["ops"]),
            token: Some("ghp_test".to_string()),
            ..Default::default()
        },
        transport.clone(),
        lenient(),
    );

    assert_eq!(
        github.get_keys().await.unwrap(),
        vec!["ssh-ed25519 CAROL carol@github"]
    );
    // Team mode never lists the whole organization
    assert_eq!(transport.count(&url("/orgs/acme/members")), 0);
}

#[tokio::test]
async fn test_unknown_team_warns_once_and_returns_empty() {
    let transport = FakeTransport::new().into_arc();
    let policy = lenient();
    let github = GitHubSource::new(
        &GitHubConfig {
            org: Some("acme".to_string()),
            teams: strings(&["ghosts"]),
            token: Some("ghp_test".to_string()),
            ..Default::default()
        },
        transport.clone(),
        policy.clone(),
    );

    let keys = github.get_keys().await.unwrap();

    assert!(keys.is_empty());
    assert_eq!(policy.warnings(), vec!["Github Team \"ghosts\" not found"]);
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_every_call_failing_still_returns_a_list() {
    let transport = FakeTransport::new()
        .route(&url("/orgs/acme/members"), 502, "bad gateway")
        .route(&url("/users/dave/keys"), 500, "oops")
        .into_arc();
    let policy = lenient();
    let github = GitHubSource::new(
        &GitHubConfig {
            org: Some("acme".to_string()),
            usernames: strings(&["dave"]),
            ..Default::default()
        },
        transport,
        policy.clone(),
    );

    assert_eq!(github.get_keys().await.unwrap(), Vec::<String>::new());
    assert_eq!(policy.warnings().len(), 2);
}

#[tokio::test]
async fn test_werror_escalates_missing_user() {
    let transport = FakeTransport::new().into_arc();
    let github = GitHubSource::new(
        &GitHubConfig {
            usernames: strings(&["nobody"]),
            ..Default::default()
        },
        transport,
        strict(),
    );

    match github.get_keys().await {
        Err(KeySyncError::Escalated(message)) => {
            assert!(message.contains("Github User \"nobody\" not found"))
        }
        other => panic!("expected escalation, got {:?}", other),
    }
}

#[tokio::test]
async fn test_enterprise_endpoint_is_used() {
    let transport = FakeTransport::new()
        .ok(
            "https://github.acme.corp/api/v3/users/erin/keys",
            r#"[{"id": 1, "key": "ssh-ed25519 ERIN"}]"#,
        )
        .into_arc();
    let github = GitHubSource::new(
        &GitHubConfig {
            endpoint: Some("https://github.acme.corp".to_string()),
            usernames: strings(&["erin"]),
            ..Default::default()
        },
        transport,
        lenient(),
    );

    assert_eq!(
        github.get_keys().await.unwrap(),
        vec!["ssh-ed25519 ERIN erin@github"]
    );
}
