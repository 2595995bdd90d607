//! End-to-end tests for request capture.
//!
//! These tests validate the full flow through the real stack:
//! any-method /{bin_id} → BinRegistry entity → GET /history/{bin_id} page.
//!
//! Everything runs in-process; the only thing not exercised is the real
//! network listener.

use axum_test::TestServer;
use integration_tests::{fixtures, setup::TestContext};

use bin_core::RequestBinOptions;

/// Full roundtrip: capture a request, then see it on the history page.
#[tokio::test]
async fn test_capture_then_history_roundtrip() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");
    let bin = fixtures::unique_bin_id();

    let response = server
        .post(&format!("/{bin}?tag=roundtrip"))
        .content_type("application/json")
        .add_header("X-Custom-Tag", "roundtrip-header")
        .bytes(fixtures::json_body("roundtrip-payload").into())
        .await;

    // Capture acknowledges with a bare 200.
    response.assert_status_ok();
    assert_eq!(response.text(), "");

    let page = server.get(&format!("/history/{bin}")).await;
    page.assert_status_ok();
    let html = page.text();

    assert!(html.contains("POST"), "page should show the method");
    // Autoescape rewrites slashes, so match on the slash-free parts.
    assert!(
        html.contains(&format!("{bin}?tag=roundtrip")),
        "page should show the captured path with its query string"
    );
    assert!(
        html.contains("roundtrip-header"),
        "page should list the custom header"
    );
    assert!(
        html.contains("roundtrip-payload"),
        "page should include the captured body"
    );
}

/// Every HTTP method lands in the bin, not just POST.
#[tokio::test]
async fn test_all_methods_captured() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");
    let bin = fixtures::unique_bin_id();

    server.get(&format!("/{bin}")).await.assert_status_ok();
    server.put(&format!("/{bin}")).await.assert_status_ok();
    server.delete(&format!("/{bin}")).await.assert_status_ok();
    server.patch(&format!("/{bin}")).await.assert_status_ok();

    let snapshot = ctx.read_bin(&bin).await;
    let methods: Vec<_> = snapshot.records.iter().map(|r| r.method.as_str()).collect();
    assert_eq!(methods, ["GET", "PUT", "DELETE", "PATCH"]);
}

/// Capacity is enforced end to end: only the newest requests survive.
#[tokio::test]
async fn test_eviction_keeps_newest_requests() {
    let options = RequestBinOptions {
        max_size: 3,
        ..Default::default()
    };
    let ctx = TestContext::with_options(options);
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");
    let bin = fixtures::unique_bin_id();

    for i in 0..5 {
        server
            .post(&format!("/{bin}?seq={i}"))
            .await
            .assert_status_ok();
    }

    let snapshot = ctx.read_bin(&bin).await;
    let seqs: Vec<_> = snapshot
        .records
        .iter()
        .map(|r| r.query_params[0].1.as_str())
        .collect();
    assert_eq!(seqs, ["2", "3", "4"], "only the last 3 requests remain");
    assert_eq!(snapshot.max_size, 3);
}

/// DELETE /history/{bin_id} empties the bin; the page shows the hint again.
#[tokio::test]
async fn test_clear_empties_bin() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");
    let bin = fixtures::unique_bin_id();

    server.post(&format!("/{bin}")).await.assert_status_ok();
    server.post(&format!("/{bin}")).await.assert_status_ok();
    assert_eq!(ctx.read_bin(&bin).await.len(), 2);

    let response = server.delete(&format!("/history/{bin}")).await;
    response.assert_status_ok();

    assert!(ctx.read_bin(&bin).await.is_empty());
    let html = server.get(&format!("/history/{bin}")).await.text();
    assert!(
        html.contains(&format!("&#x27;{bin}&#x27; is empty")),
        "cleared bin should render the empty hint"
    );

    // Clearing again is a no-op, not an error.
    server
        .delete(&format!("/history/{bin}"))
        .await
        .assert_status_ok();
}

/// Headers on the exclusion list never reach the stored record.
#[tokio::test]
async fn test_excluded_headers_are_dropped() {
    let options = RequestBinOptions {
        excluded_headers: vec!["X-Secret-Token".into()],
        ..Default::default()
    };
    let ctx = TestContext::with_options(options);
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");
    let bin = fixtures::unique_bin_id();

    server
        .post(&format!("/{bin}"))
        .add_header("X-Secret-Token", "hunter2")
        .add_header("X-Kept-Header", "visible")
        .await
        .assert_status_ok();

    let snapshot = ctx.read_bin(&bin).await;
    let names: Vec<_> = snapshot.records[0]
        .headers
        .iter()
        .map(|(name, _)| name.as_str())
        .collect();
    assert!(!names.contains(&"x-secret-token"));
    assert!(names.contains(&"x-kept-header"));

    let html = server.get(&format!("/history/{bin}")).await.text();
    assert!(!html.contains("hunter2"), "excluded value must not render");
    assert!(html.contains("visible"));
}

/// Bodies over the budget are cut; the page never shows the tail.
#[tokio::test]
async fn test_body_truncation_end_to_end() {
    let options = RequestBinOptions {
        max_body_length: 5,
        ..Default::default()
    };
    let ctx = TestContext::with_options(options);
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");
    let bin = fixtures::unique_bin_id();

    server
        .post(&format!("/{bin}"))
        .text("hello world")
        .await
        .assert_status_ok();

    let snapshot = ctx.read_bin(&bin).await;
    assert_eq!(snapshot.records[0].body, "hello");

    let html = server.get(&format!("/history/{bin}")).await.text();
    assert!(html.contains("hello"));
    assert!(!html.contains("world"), "truncated tail must not render");
}

/// The stored source ip honors X-Forwarded-For ahead of the socket address.
#[tokio::test]
async fn test_source_ip_from_forwarding_headers() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");
    let bin = fixtures::unique_bin_id();

    server
        .post(&format!("/{bin}"))
        .add_header("X-Forwarded-For", "198.51.100.7, 10.0.0.1")
        .await
        .assert_status_ok();

    let snapshot = ctx.read_bin(&bin).await;
    assert_eq!(snapshot.records[0].source_ip, "198.51.100.7");

    let html = server.get(&format!("/history/{bin}")).await.text();
    assert!(html.contains("198.51.100.7"));
}
