use snow_bridge::adapters::github::ConfiguredInstallations;
use snow_bridge::domain::models::{GitHubConfig, InstallationConfig};
use snow_bridge::domain::ports::IssueUpdate;
use snow_bridge::{DomainError, InstallationResolver};
use wiremock::matchers::{bearer_token, body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn installations(server: &MockServer) -> ConfiguredInstallations {
    ConfiguredInstallations::from_config(&GitHubConfig {
        api_base_url: server.uri(),
        user_agent: "snow-bridge-test".to_string(),
        installations: vec![
            InstallationConfig {
                owner: "acme".to_string(),
                repo: None,
                token: "ghs_org".to_string(),
            },
            InstallationConfig {
                owner: "acme".to_string(),
                repo: Some("printers".to_string()),
                token: "ghs_printers".to_string(),
            },
        ],
    })
}

#[tokio::test]
async fn test_update_issue_uses_repo_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/repos/acme/printers/issues/3"))
        .and(bearer_token("ghs_printers"))
        .and(header("accept", "application/vnd.github+json"))
        .and(header("user-agent", "snow-bridge-test"))
        .and(body_json(serde_json::json!({ "body": "linked body" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "number": 3 })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let tracker = installations(&mock_server)
        .resolve("acme", "printers")
        .await
        .unwrap();
    tracker
        .update_issue(3, &IssueUpdate::body("linked body"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_update_issue_with_title() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/repos/acme/scanners/issues/9"))
        .and(bearer_token("ghs_org"))
        .and(body_json(serde_json::json!({ "title": "Scanner jammed", "body": "text" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "number": 9 })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let tracker = installations(&mock_server)
        .resolve("acme", "scanners")
        .await
        .unwrap();
    tracker
        .update_issue(9, &IssueUpdate::title_and_body("Scanner jammed", "text"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_issue_returns_number() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/repos/acme/printers/issues"))
        .and(body_json(serde_json::json!({ "title": "Printer broken", "body": "From ServiceNow" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": 1001,
            "number": 42,
            "html_url": "https://github.com/acme/printers/issues/42",
            "title": "Printer broken"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let tracker = installations(&mock_server)
        .resolve("acme", "printers")
        .await
        .unwrap();
    let created = tracker
        .create_issue("Printer broken", "From ServiceNow")
        .await
        .unwrap();

    assert_eq!(created.number, 42);
    assert_eq!(created.html_url, "https://github.com/acme/printers/issues/42");
}

#[tokio::test]
async fn test_comment_calls() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/repos/acme/printers/issues/42/comments"))
        .and(body_json(serde_json::json!({ "body": "work note" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({ "id": 5 })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/repos/acme/printers/issues/comments/77"))
        .and(body_json(serde_json::json!({ "body": "marked" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": 77 })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let tracker = installations(&mock_server)
        .resolve("acme", "printers")
        .await
        .unwrap();
    tracker.create_comment(42, "work note").await.unwrap();
    tracker.update_comment(77, "marked").await.unwrap();
}

#[tokio::test]
async fn test_github_error_maps_to_remote_api() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/repos/acme/printers/issues/3"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "message": "Not Found"
        })))
        .mount(&mock_server)
        .await;

    let tracker = installations(&mock_server)
        .resolve("acme", "printers")
        .await
        .unwrap();
    let err = tracker
        .update_issue(3, &IssueUpdate::body("x"))
        .await
        .unwrap_err();

    match err {
        DomainError::RemoteApi { status, message, .. } => {
            assert_eq!(status, Some(404));
            assert!(message.contains("Not Found"));
        }
        other => panic!("Expected RemoteApi, got: {other:?}"),
    }
}
