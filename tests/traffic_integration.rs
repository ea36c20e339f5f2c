mod common;

use attackwall::startup::serve;
use axum::body::{Body, to_bytes};
use axum::http::{Method, StatusCode};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tower::ServiceExt;

use common::{build_app, request};

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    String::from_utf8(bytes.to_vec()).expect("body should be UTF-8")
}

#[tokio::test]
async fn integration_dashboard_counts_its_own_request() {
    let (app, _state) = build_app();

    let response = app
        .oneshot(request("/", Method::GET, Body::empty()))
        .await
        .expect("request should succeed");

    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("<title>Attack Wall Test</title>"));
    assert!(page.contains(r#"content="2""#));
    assert!(page.contains("<b>Total Requests:</b> 1</p>"));
    assert!(page.contains("<b>Requests per Second:</b> 1</p>"));
    assert!(page.contains("<b>CPU Load:</b> N/A</p>"));
}

#[tokio::test]
async fn integration_health_check() {
    let (app, state) = build_app();

    let response = app
        .oneshot(request("/health", Method::GET, Body::empty()))
        .await
        .expect("request should succeed");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "OK");
    assert_eq!(state.traffic.snapshot().total_requests, 1);
}

/// Unrouted requests are still counted together with their body size.
#[tokio::test]
async fn integration_unknown_path_counts_bytes() {
    let (app, state) = build_app();

    let response = app
        .clone()
        .oneshot(request("/ingest", Method::POST, "0123456789"))
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(request("/", Method::POST, "abc"))
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let snapshot = state.traffic.snapshot();
    assert_eq!(snapshot.total_requests, 2);
    assert_eq!(snapshot.total_bytes, 13);
    assert_eq!(snapshot.requests_this_minute, 2);
}

/// An oversized body is rejected but still shows up in the counters.
#[tokio::test]
async fn integration_oversized_body_rejected_and_counted() {
    let (app, state) = build_app();

    let response = app
        .oneshot(request("/", Method::POST, vec![b'x'; 65]))
        .await
        .expect("request should complete");

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body_text(response).await.contains("\"error\""));
    let snapshot = state.traffic.snapshot();
    assert_eq!(snapshot.total_requests, 1);
    assert_eq!(snapshot.requests_this_second, 1);
    assert_eq!(snapshot.requests_this_minute, 1);
    assert_eq!(snapshot.total_bytes, 64);
}

/// A body exactly at the limit is accepted.
#[tokio::test]
async fn integration_body_at_limit_is_counted() {
    let (app, state) = build_app();

    let response = app
        .oneshot(request("/ingest", Method::POST, vec![b'x'; 64]))
        .await
        .expect("request should complete");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(state.traffic.snapshot().total_bytes, 64);
}

#[tokio::test]
async fn integration_metrics_endpoint() {
    let (app, _state) = build_app();

    app.clone()
        .oneshot(request("/ingest", Method::POST, "12345"))
        .await
        .expect("request should complete");

    let response = app
        .oneshot(request("/metrics", Method::GET, Body::empty()))
        .await
        .expect("request should succeed");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "text/plain; version=0.0.4; charset=utf-8"
    );
    let text = body_text(response).await;
    assert!(text.contains("attackwall_requests_total 2"));
    assert!(text.contains("attackwall_received_bytes_total 5"));
    assert!(text.contains("attackwall_requests_current_minute 2"));
    assert!(!text.contains("attackwall_cpu_load_percent"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn integration_concurrent_requests_lose_no_updates() {
    let (app, state) = build_app();

    let handles: Vec<_> = (0..1000)
        .map(|_| {
            let app = app.clone();
            tokio::spawn(async move {
                app.oneshot(request("/health", Method::POST, "x"))
                    .await
                    .expect("request should complete")
                    .status()
            })
        })
        .collect();
    for handle in handles {
        handle.await.expect("task should not panic");
    }

    let snapshot = state.traffic.snapshot();
    assert_eq!(snapshot.total_requests, 1000);
    assert_eq!(snapshot.total_bytes, 1000);
}

/// Full server over TCP, stopped through its shutdown future.
#[tokio::test]
async fn integration_serve_and_shutdown() {
    let (_app, state) = build_app();
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind should succeed");
    let addr = listener.local_addr().expect("listener has an address");
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let server = tokio::spawn(serve(listener, state.clone(), async move {
        let _ = shutdown_rx.await;
    }));

    let mut stream = TcpStream::connect(addr).await.expect("connect should succeed");
    stream
        .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .expect("write should succeed");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read should succeed");

    assert!(response.starts_with("HTTP/1.1 200 OK"));
    assert!(response.ends_with("OK"));
    assert_eq!(state.traffic.snapshot().total_requests, 1);

    shutdown_tx.send(()).expect("server should be running");
    server
        .await
        .expect("server task should not panic")
        .expect("server should stop cleanly");
}
