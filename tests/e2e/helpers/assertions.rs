use serde_json::Value;

pub fn assert_status_response(body: &Value, expected_id: &str, expected_status: &str) {
    assert_eq!(body.get("job_id").and_then(|v| v.as_str()), Some(expected_id));
    assert_eq!(body.get("status").and_then(|v| v.as_str()), Some(expected_status));
    assert!(body.get("progress").and_then(|v| v.as_u64()).is_some(), "Missing progress");

    let created_at = body
        .get("created_at")
        .and_then(|v| v.as_str())
        .expect("Missing created_at");
    assert!(
        chrono::DateTime::parse_from_rfc3339(created_at).is_ok(),
        "created_at is not RFC 3339: {}",
        created_at
    );

    if expected_status == "failed" {
        assert!(body.get("error").and_then(|v| v.as_str()).is_some(), "Missing error");
    } else {
        assert!(body.get("error").is_none(), "Unexpected error field: {:?}", body);
    }
}

pub fn assert_non_decreasing(progress: &[u64]) {
    assert!(
        progress.windows(2).all(|w| w[0] <= w[1]),
        "Progress went backwards: {:?}",
        progress
    );
}

/// Samples of a WAV payload, one per synthesized chunk with the test backend
pub fn wav_samples(bytes: &[u8]) -> Vec<i16> {
    let mut reader = hound::WavReader::new(std::io::Cursor::new(bytes)).expect("Body is not a WAV file");
    reader.samples::<i16>().map(|s| s.unwrap()).collect()
}
