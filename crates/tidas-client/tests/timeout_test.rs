//! Deadline behavior for TidasClient calls.
//!
//! The configured timeout is the absolute per-call deadline. These tests
//! pin three properties: an over-deadline remote surfaces `Timeout` (not a
//! generic transport error), the error arrives within the deadline plus
//! bounded overhead, and the connection pool survives repeated timeouts so
//! a later call against a healthy remote still succeeds.

use std::time::{Duration, Instant};

use serde_json::json;
use tidas_client::{TidasClient, TidasConfig, TidasError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Client with a 1-second deadline pointed at a wiremock server.
fn one_second_client(mock_server: &MockServer) -> TidasClient {
    let mut config = TidasConfig::local_mock(&mock_server.uri(), "test-key").unwrap();
    config.timeout_secs = 1;
    TidasClient::new(config).unwrap()
}

#[tokio::test]
async fn call_times_out_at_deadline_with_bounded_overhead() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let client = one_second_client(&mock_server);
    let started = Instant::now();
    let result = client.ping().await;
    let elapsed = started.elapsed();

    match result.unwrap_err() {
        TidasError::Timeout {
            endpoint,
            timeout_secs,
        } => {
            assert_eq!(endpoint, "GET /ping");
            assert_eq!(timeout_secs, 1);
        }
        other => panic!("expected Timeout, got: {other:?}"),
    }

    assert!(
        elapsed >= Duration::from_millis(900),
        "timed out before the deadline: {elapsed:?}"
    );
    assert!(
        elapsed < Duration::from_secs(3),
        "timeout took too long to surface: {elapsed:?}"
    );
}

#[tokio::test]
async fn timed_out_call_sends_exactly_one_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/enroll"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let client = one_second_client(&mock_server);
    let result = client
        .enroll(&json!({"name": "alice"}), &Default::default())
        .await;
    assert!(matches!(result, Err(TidasError::Timeout { .. })));

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1, "a timed-out call must not be retried");
}

#[tokio::test]
async fn pool_survives_repeated_timeouts() {
    let mock_server = MockServer::start().await;

    // First three calls hit the delayed mock and time out; once it expires,
    // the fast mock underneath answers immediately.
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true}))
                .set_delay(Duration::from_secs(5)),
        )
        .up_to_n_times(3)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"message": "pong"}
        })))
        .mount(&mock_server)
        .await;

    let client = one_second_client(&mock_server);

    for _ in 0..3 {
        let result = client.ping().await;
        assert!(matches!(result, Err(TidasError::Timeout { .. })));
    }

    // Timed-out connections were released, not leaked: the next call works.
    let result = client.ping().await.unwrap();
    assert!(result.success);
    assert_eq!(result.payload["message"], "pong");
}
