//! Tests for the rendered history page.
//!
//! These go through the real router and renderer; assertions work on the
//! escaped HTML the browser would receive. Autoescape rewrites slashes and
//! quotes, so matches avoid them or spell out the escaped form.

use std::time::Duration;

use axum::http::StatusCode;
use axum_test::TestServer;
use integration_tests::{
    fixtures,
    setup::{MockContext, TestContext},
};

use bin_core::RequestBinOptions;

/// A bin nobody has written to renders the usage hint.
#[tokio::test]
async fn test_empty_bin_shows_hint() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");
    let bin = fixtures::unique_bin_id();

    let response = server.get(&format!("/history/{bin}")).await;
    response.assert_status_ok();

    let html = response.text();
    assert!(
        html.contains(&format!("Request Bin with Id &#x27;{bin}&#x27; is empty")),
        "empty page should name the bin"
    );
    assert!(html.contains("Send your requests to"));
}

/// The advertised bin url is built from the Host and proto headers.
#[tokio::test]
async fn test_bin_url_honors_forwarding_headers() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");
    let bin = fixtures::unique_bin_id();

    let html = server
        .get(&format!("/history/{bin}"))
        .add_header("Host", "bins.example.com")
        .add_header("X-Forwarded-Proto", "https")
        .await
        .text();

    assert!(
        html.contains("https:&#x2F;&#x2F;bins.example.com"),
        "bin url should come from the forwarded proto and host"
    );
    assert!(
        !html.contains(&format!("bins.example.com&#x2F;history&#x2F;{bin}")),
        "the /history prefix must be stripped from the bin url"
    );
}

/// Invalid bin ids get a rendered 400 page, not a blank error.
#[tokio::test]
async fn test_invalid_bin_id_renders_error_page() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    // Path decodes to "bad id"; the space is not an allowed character.
    let response = server.get("/history/bad%20id").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response
        .text()
        .contains("Bin Id can only contain Numbers, Letters"));
}

/// The reserved id keeps its dedicated message.
#[tokio::test]
async fn test_reserved_bin_id_renders_error_page() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.get("/history/bin").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response
        .text()
        .contains("Bin Id cannot be &#x27;bin&#x27;."));
}

/// Ids over the length cap are rejected with the exact message.
#[tokio::test]
async fn test_too_long_bin_id_renders_error_page() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let long_id = "a".repeat(37);
    let response = server.get(&format!("/history/{long_id}")).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response
        .text()
        .contains("Bin Id cannot be longer than 36 chars."));
}

/// Captured markup is escaped, never reflected as live HTML.
#[tokio::test]
async fn test_captured_markup_is_escaped() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");
    let bin = fixtures::unique_bin_id();

    server
        .post(&format!("/{bin}"))
        .text("<script>alert(1)</script>")
        .await
        .assert_status_ok();

    let html = server.get(&format!("/history/{bin}")).await.text();
    assert!(
        !html.contains("<script>alert"),
        "captured markup must not survive as live HTML"
    );
    assert!(html.contains("&lt;script&gt;alert(1)"));
}

/// The page lists requests newest first.
#[tokio::test]
async fn test_requests_render_newest_first() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");
    let bin = fixtures::unique_bin_id();

    for seq in 0..3 {
        server
            .post(&format!("/{bin}?seq={seq}"))
            .await
            .assert_status_ok();
        // Distinct timestamps make the ordering deterministic.
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let html = server.get(&format!("/history/{bin}")).await.text();
    let pos = |needle: &str| html.find(needle).unwrap_or_else(|| panic!("missing {needle}"));
    assert!(pos("seq=2") < pos("seq=1"));
    assert!(pos("seq=1") < pos("seq=0"));
}

/// The footer reflects the configured limits.
#[tokio::test]
async fn test_settings_footer_reflects_options() {
    let options = RequestBinOptions {
        max_size: 7,
        max_body_length: 4096,
        ..Default::default()
    };
    let ctx = TestContext::with_options(options);
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");
    let bin = fixtures::unique_bin_id();

    let html = server.get(&format!("/history/{bin}")).await.text();
    assert!(html.contains("Max requests: 7"));
    assert!(html.contains("Max body length: 4096"));
}

/// The light template is selectable through options.
#[tokio::test]
async fn test_light_template_renders() {
    let options = RequestBinOptions {
        renderer_template: "light.html".into(),
        ..Default::default()
    };
    let ctx = TestContext::with_options(options);
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");
    let bin = fixtures::unique_bin_id();

    server.post(&format!("/{bin}")).await.assert_status_ok();

    let response = server.get(&format!("/history/{bin}")).await;
    response.assert_status_ok();
    assert!(response.text().contains("light.html"));
}

/// The page renders whatever snapshot the store serves, oldest or newest.
#[tokio::test]
async fn test_page_renders_store_snapshot() {
    let ctx = MockContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");
    ctx.store
        .set_snapshot(fixtures::snapshot_of(&["/alpha", "/beta"], 20));

    let response = server.get("/history/orders").await;
    response.assert_status_ok();

    let html = response.text();
    assert!(html.contains("alpha"));
    assert!(html.contains("beta"));
}

/// GET /history with no bin id is itself a capture into the "history" bin.
#[tokio::test]
async fn test_bare_history_path_is_a_capture() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    server.get("/history").await.assert_status_ok();

    let snapshot = ctx.read_bin("history").await;
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.records[0].method, "GET");
}
