//! Integration tests for request-scoped load deduplication.
//!
//! These tests verify that equal loads issued concurrently within one
//! request reach the backend once, while distinct keys, later loads and
//! separate requests each get their own backend call.

use std::sync::Arc;
use std::time::Duration;

use commerce_bridge::queries::Operation;
use commerce_bridge::{
    ActionParameters, ApiHost, CredentialProvider, ProjectKey, Protocol, RequestContext,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_context(server: &MockServer) -> RequestContext {
    let params = ActionParameters::builder()
        .protocol(Protocol::Http)
        .api_host(ApiHost::new(server.uri().trim_start_matches("http://")).unwrap())
        .project_key(ProjectKey::new("demo").unwrap())
        .bearer("test-token")
        .build()
        .unwrap();
    RequestContext::new(params, Arc::new(CredentialProvider::new()))
}

fn version_response(cart_id: &str, version: u64) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_json(json!({"data": {"cart": {"id": cart_id, "version": version}}}))
        .set_delay(Duration::from_millis(50))
}

#[tokio::test]
async fn test_concurrent_equal_loads_share_one_backend_call() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/demo/graphql"))
        .and(body_string_contains("query CartVersion"))
        .respond_with(version_response("c1", 16))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = create_test_context(&server);
    let (first, second, third) =
        futures::join!(ctx.version("c1"), ctx.version("c1"), ctx.version("c1"));

    assert_eq!(first.unwrap(), 16);
    assert_eq!(second.unwrap(), 16);
    assert_eq!(third.unwrap(), 16);
}

#[tokio::test]
async fn test_distinct_keys_are_loaded_separately() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/demo/graphql"))
        .and(body_partial_json(json!({"variables": {"uid": "c1"}})))
        .respond_with(version_response("c1", 3))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/demo/graphql"))
        .and(body_partial_json(json!({"variables": {"uid": "c2"}})))
        .respond_with(version_response("c2", 9))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = create_test_context(&server);
    let (first, second) = futures::join!(ctx.version("c1"), ctx.version("c2"));

    assert_eq!(first.unwrap(), 3);
    assert_eq!(second.unwrap(), 9);
}

#[tokio::test]
async fn test_completed_load_is_not_reused() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/demo/graphql"))
        .and(body_string_contains("query CartVersion"))
        .respond_with(version_response("c1", 16))
        .expect(2)
        .mount(&server)
        .await;

    let ctx = create_test_context(&server);
    assert_eq!(ctx.version("c1").await.unwrap(), 16);
    assert_eq!(ctx.version("c1").await.unwrap(), 16);
}

#[tokio::test]
async fn test_separate_requests_do_not_share_loads() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/demo/graphql"))
        .and(body_string_contains("query CartVersion"))
        .respond_with(version_response("c1", 16))
        .expect(2)
        .mount(&server)
        .await;

    let first_request = create_test_context(&server);
    let second_request = create_test_context(&server);
    let (first, second) = futures::join!(
        first_request.version("c1"),
        second_request.version("c1")
    );

    assert_eq!(first.unwrap(), 16);
    assert_eq!(second.unwrap(), 16);
}

#[tokio::test]
async fn test_null_result_is_shared_by_waiting_callers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/demo/graphql"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": {"cart": null}}))
                .set_delay(Duration::from_millis(50)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let ctx = create_test_context(&server);
    let variables = json!({"uid": "ghost", "locale": "en"});
    let (first, second) = futures::join!(
        ctx.load(Operation::Cart, variables.clone()),
        ctx.load(Operation::Cart, variables.clone())
    );

    assert!(first.unwrap().is_null());
    assert!(second.unwrap().is_null());
}
