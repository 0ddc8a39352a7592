// ABOUTME: Integration tests for the asset Inspector against a mock HTTP server and fake probers.
// ABOUTME: Covers hash priority, typed failures, timeouts, skipped sub-steps, and ordered fan-out.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use httpmock::prelude::*;
use httpmock::Method::HEAD;
use podgen_assets::{Inspector, MediaProbe, MediaProber, ProbeError};

/// Returns a fixed probe result, optionally after a delay keyed on the URL.
struct FakeProber {
    result: Result<MediaProbe, String>,
    delay: Duration,
    calls: AtomicUsize,
}

impl FakeProber {
    fn ok(duration: u64, mime: &str) -> Self {
        Self {
            result: Ok(MediaProbe {
                duration_seconds: Some(duration),
                mime_type: Some(mime.to_string()),
            }),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::ok(10, "audio/mpeg")
        }
    }
}

#[async_trait]
impl MediaProber for FakeProber {
    async fn probe_media(&self, _url: &str) -> Result<MediaProbe, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.result.clone().map_err(|message| ProbeError::Failed {
            code: Some(1),
            message,
        })
    }
}

/// Sleeps longer for URLs that come earlier so completion order is reversed.
struct ReversingProber;

#[async_trait]
impl MediaProber for ReversingProber {
    async fn probe_media(&self, url: &str) -> Result<MediaProbe, ProbeError> {
        let n: u64 = url
            .rsplit('/')
            .next()
            .and_then(|f| f.trim_end_matches(".mp3").parse().ok())
            .unwrap_or(0);
        tokio::time::sleep(Duration::from_millis(60 - n * 20)).await;
        Ok(MediaProbe {
            duration_seconds: Some(n),
            mime_type: Some("audio/mpeg".to_string()),
        })
    }
}

#[tokio::test]
async fn checksum_header_beats_etag() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(HEAD).path("/ep1.mp3");
        then.status(200)
            .header("content-type", "audio/mpeg")
            .header("content-length", "12345678")
            .header("x-amz-checksum-sha256", "test-sha256-hash")
            .header("etag", "\"any-etag\"");
    });

    let inspector = Inspector::builder()
        .media_prober(Arc::new(FakeProber::ok(3541, "audio/mpeg")))
        .build()
        .unwrap();

    let info = inspector.inspect(&server.url("/ep1.mp3")).await.unwrap();
    mock.assert();

    assert_eq!(info.content_hash().unwrap().to_string(), "sha256:test-sha256-hash");
    assert_eq!(info.hash_candidates.len(), 2);
    assert_eq!(info.mime_type.as_deref(), Some("audio/mpeg"));
    assert_eq!(info.duration_seconds, Some(3541));
}

#[tokio::test]
async fn missing_asset_is_unreachable() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(HEAD).path("/gone.mp3");
        then.status(404);
    });

    let prober = Arc::new(FakeProber::ok(1, "audio/mpeg"));
    let inspector = Inspector::builder()
        .media_prober(prober.clone())
        .build()
        .unwrap();

    let err = inspector.inspect(&server.url("/gone.mp3")).await.unwrap_err();
    assert!(err.is_unreachable(), "got {}", err);
    assert!(err.to_string().contains("404"));
    assert_eq!(prober.calls.load(Ordering::SeqCst), 0, "probe must not run");
}

#[tokio::test]
async fn html_content_type_is_unsupported() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(HEAD).path("/ep1.mp3");
        then.status(200).header("content-type", "text/html; charset=utf-8");
    });

    let inspector = Inspector::builder()
        .media_prober(Arc::new(FakeProber::ok(1, "audio/mpeg")))
        .build()
        .unwrap();

    let err = inspector.inspect(&server.url("/ep1.mp3")).await.unwrap_err();
    assert!(err.is_unsupported_media_type(), "got {}", err);
}

#[tokio::test]
async fn generic_binary_content_type_falls_through() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(HEAD).path("/ep1.m4a");
        then.status(200)
            .header("content-type", "binary/octet-stream")
            .header("content-length", "2048");
    });
    server.mock(|when, then| {
        when.method(HEAD).path("/ep2.mp3");
        then.status(200).header("content-type", "application/octet-stream");
    });

    let probed = Inspector::builder()
        .media_prober(Arc::new(FakeProber::ok(60, "audio/mp4")))
        .build()
        .unwrap();
    let info = probed.inspect(&server.url("/ep1.m4a")).await.unwrap();
    assert_eq!(info.mime_type.as_deref(), Some("audio/mp4"));
    assert_eq!(info.byte_length, Some(2048));

    let unprobed = Inspector::builder().probe_media(false).build().unwrap();
    let info = unprobed.inspect(&server.url("/ep2.mp3")).await.unwrap();
    assert_eq!(info.mime_type.as_deref(), Some("audio/mpeg"));
}

#[tokio::test]
async fn probe_failure_is_typed() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(HEAD).path("/ep1.mp3");
        then.status(200).header("content-type", "audio/mpeg");
    });

    let inspector = Inspector::builder()
        .media_prober(Arc::new(FakeProber::failing("Invalid data found")))
        .build()
        .unwrap();

    let err = inspector.inspect(&server.url("/ep1.mp3")).await.unwrap_err();
    assert!(err.is_probe(), "got {}", err);
    assert!(err.to_string().contains("Invalid data found"));
}

#[tokio::test]
async fn slow_probe_times_out() {
    let inspector = Inspector::builder()
        .check_existence(false)
        .timeout(Duration::from_millis(50))
        .media_prober(Arc::new(FakeProber::slow(Duration::from_secs(5))))
        .build()
        .unwrap();

    let err = inspector
        .inspect("https://cdn.example.com/ep1.mp3")
        .await
        .unwrap_err();
    assert!(err.is_timeout(), "got {}", err);
}

#[tokio::test]
async fn existence_skipped_uses_probe_type() {
    let inspector = Inspector::builder()
        .check_existence(false)
        .media_prober(Arc::new(FakeProber::ok(90, "video/mp4")))
        .build()
        .unwrap();

    let info = inspector
        .inspect("https://cdn.example.com/download?id=7")
        .await
        .unwrap();
    assert_eq!(info.mime_type.as_deref(), Some("video/mp4"));
    assert_eq!(info.duration_seconds, Some(90));
    assert!(info.hash_candidates.is_empty());
    assert_eq!(info.byte_length, None);
}

#[tokio::test]
async fn both_steps_skipped_falls_back_to_extension() {
    let inspector = Inspector::builder()
        .check_existence(false)
        .probe_media(false)
        .build()
        .unwrap();

    let info = inspector
        .inspect("https://cdn.example.com/ep1.m4a")
        .await
        .unwrap();
    assert_eq!(info.mime_type.as_deref(), Some("audio/mp4"));
    assert_eq!(info.duration_seconds, None);

    let err = inspector
        .inspect("https://cdn.example.com/ep1")
        .await
        .unwrap_err();
    assert!(err.is_unsupported_media_type());
}

#[tokio::test]
async fn non_http_scheme_rejected() {
    let inspector = Inspector::builder()
        .check_existence(false)
        .probe_media(false)
        .build()
        .unwrap();
    let err = inspector
        .inspect("ftp://files.example.com/ep1.mp3")
        .await
        .unwrap_err();
    assert!(err.is_invalid_url());
}

#[tokio::test]
async fn inspect_all_preserves_input_order() {
    let inspector = Inspector::builder()
        .check_existence(false)
        .media_prober(Arc::new(ReversingProber))
        .build()
        .unwrap();

    let urls: Vec<String> = (0..3)
        .map(|n| format!("https://cdn.example.com/{}.mp3", n))
        .collect();
    let results = inspector.inspect_all(&urls, 3).await;

    let durations: Vec<Option<u64>> = results
        .into_iter()
        .map(|r| r.unwrap().duration_seconds)
        .collect();
    assert_eq!(durations, vec![Some(0), Some(1), Some(2)]);
}
