//! Wire-level tests for the REST tracker adapter.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;

use chrono::NaiveDate;
use serde_json::json;
use tally_core::{EntryDraft, Grouping, SummaryQuery, TrackerApi};
use tally_domain::{GroupKey, TallyError};
use tally_infra::{HttpClient, RestTrackerClient};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// base64("secret:api_token"), as basic auth encodes it.
const EXPECTED_AUTH: &str = "Basic c2VjcmV0OmFwaV90b2tlbg==";

fn client_for(server: &MockServer) -> RestTrackerClient {
    let http = HttpClient::builder()
        .max_attempts(1)
        .base_backoff(Duration::from_millis(1))
        .build()
        .expect("http client");
    RestTrackerClient::with_http(http, &server.uri(), "secret").expect("client")
}

fn entry_json() -> serde_json::Value {
    json!({
        "id": 900,
        "description": "docs",
        "workspace_id": 1,
        "project_id": 100,
        "billable": false,
        "duration": -1,
        "start": "2024-06-05T12:00:00Z",
        "stop": null,
        "tags": []
    })
}

#[tokio::test]
async fn profile_request_authenticates_with_the_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .and(query_param("with_related_data", "true"))
        .and(header("Authorization", EXPECTED_AUTH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 2,
            "default_workspace_id": 1,
            "api_token": "secret",
            "clients": [{ "id": 50, "name": "Acme" }],
            "projects": [{
                "id": 100,
                "name": "Website",
                "workspace_id": 1,
                "client_id": 50,
                "active": true,
                "actual_hours": 10.0,
                "color": null
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let profile = client_for(&server).fetch_profile().await.expect("profile");

    assert_eq!(profile.id, 2);
    assert_eq!(profile.project(100).map(|p| p.name.as_str()), Some("Website"));
    assert_eq!(profile.client(50).map(|c| c.name.as_str()), Some("Acme"));
}

#[tokio::test]
async fn null_body_means_nothing_is_running() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me/time_entries/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(null)))
        .mount(&server)
        .await;

    let running = client_for(&server).fetch_running_entry().await.expect("running");
    assert!(running.is_none());
}

#[tokio::test]
async fn rejected_token_maps_to_an_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client_for(&server).fetch_profile().await;
    assert!(matches!(result, Err(TallyError::Auth(_))));
}

#[tokio::test]
async fn remote_failure_maps_to_an_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database on fire"))
        .mount(&server)
        .await;

    let result = client_for(&server).fetch_time_entries().await;
    match result {
        Err(TallyError::Api(message)) => assert!(message.contains("500")),
        other => panic!("expected an API error, got {other:?}"),
    }
}

#[tokio::test]
async fn create_posts_into_the_workspace_collection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/workspaces/1/time_entries"))
        .and(body_partial_json(json!({
            "description": "docs",
            "project_id": 100,
            "workspace_id": 1,
            "duration": -1
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(entry_json()))
        .expect(1)
        .mount(&server)
        .await;

    let draft = EntryDraft {
        workspace_id: 1,
        description: "docs".to_string(),
        project_id: Some(100),
        start: "2024-06-05T12:00:00Z".parse().unwrap(),
        billable: false,
        tags: Vec::new(),
    };
    let entry = client_for(&server).create_entry(draft).await.expect("entry");

    assert_eq!(entry.id, 900);
    assert!(entry.is_running());
}

#[tokio::test]
async fn summary_pagination_follows_the_cursor_until_exhausted() {
    let server = MockServer::start().await;

    let page = |seconds: i64| {
        json!({
            "groups": [{
                "id": 100,
                "sub_groups": [{ "id": null, "title": "docs", "seconds": seconds }]
            }]
        })
    };

    // Second page: the cursor from the first response comes back as a query
    // parameter, and no further cursor is handed out.
    Mock::given(method("GET"))
        .and(path("/workspaces/1/summary"))
        .and(query_param("cursor", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(400)))
        .expect(1)
        .mount(&server)
        .await;

    // First page: no cursor parameter, next cursor in the response header.
    Mock::given(method("GET"))
        .and(path("/workspaces/1/summary"))
        .and(query_param("since", "2024-06-03"))
        .and(query_param("until", "2024-06-09"))
        .and(query_param("grouping", "projects"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-next-cursor", "page-2")
                .set_body_json(page(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let query = SummaryQuery {
        workspace_id: 1,
        user_id: 2,
        grouping: Grouping::Projects,
        since: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
        until: NaiveDate::from_ymd_opt(2024, 6, 9).unwrap(),
    };
    let summary = client_for(&server).fetch_summary(&query).await.expect("summary");

    // Both pages landed in the same bucket.
    assert_eq!(summary.seconds(), 600);
    assert_eq!(summary.group(&GroupKey::Id(100)).map(|g| g.seconds()), Some(600));
}
