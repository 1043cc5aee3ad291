//! HTTP surface tests: health check, GraphQL over POST and bearer authentication

mod common;

use std::sync::Arc;

use anyhow::Result;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use harusmile::database::connect_and_migrate;
use harusmile::server::app::create_app;
use harusmile::services::{AuthService, MemoryMailer};
use serde_json::{json, Value};

async fn setup_test_server() -> Result<(TestServer, AuthService, tempfile::TempDir)> {
    let media = tempfile::tempdir()?;
    let config = common::test_config(&media);
    let db = connect_and_migrate(":memory:").await?;
    let auth = AuthService::new(db.clone(), &config.auth);

    let app = create_app(db, config, Arc::new(MemoryMailer::new())).await?;
    let server = TestServer::new(app)?;

    Ok((server, auth, media))
}

#[tokio::test]
async fn test_health_endpoint() -> Result<()> {
    let (server, _, _media) = setup_test_server().await?;

    let response = server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["service"], "harusmile-api");
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());

    Ok(())
}

#[tokio::test]
async fn test_graphql_anonymous_request() -> Result<()> {
    let (server, _, _media) = setup_test_server().await?;

    let response = server
        .post("/graphql")
        .json(&json!({ "query": "{ allGenders { totalCount } }" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["data"]["allGenders"]["totalCount"], 0);

    let response = server
        .post("/graphql")
        .json(&json!({ "query": "{ loginUser { email } }" }))
        .await;
    let body: Value = response.json();
    assert_eq!(body["errors"][0]["extensions"]["code"], "UNAUTHORIZED");

    Ok(())
}

#[tokio::test]
async fn test_graphql_bearer_token_identifies_caller() -> Result<()> {
    let (server, auth, _media) = setup_test_server().await?;
    let user = auth
        .create_superuser("admin@example.com", common::PASSWORD)
        .await?;
    let issued = auth.tokens().issue_access(user.id, &user.email)?;

    let response = server
        .post("/graphql")
        .add_header(
            HeaderName::from_static("authorization"),
            HeaderValue::from_str(&format!("Bearer {}", issued.token))?,
        )
        .json(&json!({ "query": "{ loginUser { email isStaff } }" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["data"]["loginUser"]["email"], "admin@example.com");
    assert_eq!(body["data"]["loginUser"]["isStaff"], true);

    // A malformed token leaves the caller anonymous
    let response = server
        .post("/graphql")
        .add_header(
            HeaderName::from_static("authorization"),
            HeaderValue::from_static("Bearer not.a.token"),
        )
        .json(&json!({ "query": "{ loginUser { email } }" }))
        .await;
    let body: Value = response.json();
    assert_eq!(body["errors"][0]["extensions"]["code"], "UNAUTHORIZED");

    Ok(())
}

#[tokio::test]
async fn test_graphql_playground_is_served() -> Result<()> {
    let (server, _, _media) = setup_test_server().await?;

    let response = server.get("/graphql").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("GraphQL Playground"));

    Ok(())
}
