use crate::e2e::helpers;

use helpers::assertions::{assert_non_decreasing, assert_status_response};
use helpers::TestContext;
use hyper::StatusCode;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_not_found_for_unknown_job(ctx: &TestContext) {
    let response = ctx.client.get("/status/does-not-exist").await.unwrap();

    response
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error_message("Job not found");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_processing_right_after_submission(ctx: &TestContext) {
    let job_id = ctx.submit("This is read slowly.").await;

    let response = ctx.client.get(&format!("/status/{}", job_id)).await.unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_status_response(body, &job_id, "processing");
    assert!(body.get("progress").and_then(|v| v.as_u64()).unwrap() < 100);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_complete_single_chunk_job_at_full_progress(ctx: &TestContext) {
    let job_id = ctx.submit("Hello there.").await;

    let (body, observed) = ctx.wait_for_terminal(&job_id).await;

    assert_status_response(&body, &job_id, "completed");
    assert_eq!(body.get("progress").and_then(|v| v.as_u64()), Some(100));
    assert_non_decreasing(&observed);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_monotonic_progress_for_multi_chunk_job(ctx: &TestContext) {
    let job_id = ctx
        .submit("First part here. Second part here. Third part here. Fourth part here.")
        .await;

    let (body, observed) = ctx.wait_for_terminal(&job_id).await;

    assert_status_response(&body, &job_id, "completed");
    assert_non_decreasing(&observed);
    assert_eq!(observed.last(), Some(&100));
    // 100 is only ever reported once the job is completed
    assert_eq!(observed.iter().filter(|p| **p == 100).count(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_fail_job_when_second_of_three_chunks_fails(ctx: &TestContext) {
    let job_id = ctx.submit("First sentence. explode now. Third one.").await;

    let (body, observed) = ctx.wait_for_terminal(&job_id).await;

    assert_status_response(&body, &job_id, "failed");
    let error = body.get("error").and_then(|v| v.as_str()).unwrap();
    assert!(error.contains("chunk 2 of 3"), "unexpected error: {}", error);
    assert!(error.contains("scripted engine failure"));
    assert!(body.get("progress").and_then(|v| v.as_u64()).unwrap() < 100);
    assert_non_decreasing(&observed);

    // Neither scratch nor output survive a failure
    assert_eq!(std::fs::read_dir(ctx.storage.temp_dir()).unwrap().count(), 0);
    assert_eq!(std::fs::read_dir(ctx.storage.result_dir()).unwrap().count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_fail_job_without_sentences(ctx: &TestContext) {
    let job_id = ctx.submit(". . .").await;

    let (body, _) = ctx.wait_for_terminal(&job_id).await;

    assert_status_response(&body, &job_id, "failed");
    assert_eq!(
        body.get("error").and_then(|v| v.as_str()),
        Some("No audio chunks to merge")
    );
}
