use crate::e2e::helpers;

use helpers::TestContext;
use hyper::StatusCode;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_ok_for_health_check(ctx: &TestContext) {
    let response = ctx.client.get("/health").await.unwrap();

    response.assert_status(StatusCode::OK);

    // Health endpoint returns plain text
    let body = String::from_utf8(response.body_bytes.clone()).unwrap();
    assert_eq!(body, "OK");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_ready_status_with_backend(ctx: &TestContext) {
    let response = ctx.client.get("/health/ready").await.unwrap();

    response.assert_status(StatusCode::OK);

    let body = response.body.as_ref().unwrap();
    assert_eq!(body.get("status").and_then(|v| v.as_str()), Some("ready"));
    assert_eq!(body.get("tts_backend").and_then(|v| v.as_str()), Some("espeak"));
    assert_eq!(body.get("active_jobs").and_then(|v| v.as_u64()), Some(0));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_count_active_jobs(ctx: &TestContext) {
    ctx.submit("This is read slowly.").await;

    let response = ctx.client.get("/health/ready").await.unwrap();

    let body = response.body.as_ref().unwrap();
    assert_eq!(body.get("active_jobs").and_then(|v| v.as_u64()), Some(1));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_include_request_id_in_responses(ctx: &TestContext) {
    let response = ctx.client.get("/health").await.unwrap();
    response.assert_header_exists("x-request-id");

    let response = ctx.client.get("/status/unknown").await.unwrap();
    response.assert_header_exists("x-request-id");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_echo_incoming_request_id(ctx: &TestContext) {
    let response = ctx
        .client
        .get_with_headers("/health", &[("x-request-id", "trace-me-123")])
        .await
        .unwrap();

    response.assert_header("x-request-id", "trace-me-123");
}
