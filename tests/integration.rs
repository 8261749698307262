//! Integration tests: the HTTP contract through `create_app`, and the listener lifecycle.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use cast_receiver::{create_app, AppError, AppState, CastServer, SignalBus, StateStore, SurfaceSignal};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_test::{assert_err, assert_ok};
use tower::util::ServiceExt;

fn test_state() -> (AppState, SignalBus) {
    let signals = SignalBus::new();
    (AppState::new(StateStore::new(), signals.clone()), signals)
}

fn request(method: &str, uri: &str, body: Option<&str>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &axum::Router, req: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let headers = res.headers().clone();
    let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (status, headers, body.to_vec())
}

async fn send_json(app: &axum::Router, req: Request<Body>) -> (StatusCode, Value) {
    let (status, _, body) = send(app, req).await;
    (status, serde_json::from_slice(&body).unwrap())
}

fn assert_cors(headers: &axum::http::HeaderMap) {
    assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
    assert_eq!(
        headers.get("access-control-allow-methods").unwrap(),
        "GET, POST, OPTIONS"
    );
    assert_eq!(headers.get("access-control-allow-headers").unwrap(), "Content-Type");
}

const CAST_A: &str = r#"{"streamUrl":"http://x/a.m3u8","title":"A","subtitle":"s"}"#;

#[tokio::test]
async fn cast_status_stop_scenario() {
    let (state, signals) = test_state();
    let mut rx = signals.subscribe();
    let app = create_app(state);

    let (status, json) = send_json(&app, request("GET", "/status", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "status": "idle" }));

    let (status, json) = send_json(&app, request("POST", "/cast", Some(CAST_A))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "success": true, "message": "Playback started" }));
    assert!(matches!(rx.recv().await.unwrap(), SurfaceSignal::Launch(r) if r.stream_url == "http://x/a.m3u8"));

    let (status, json) = send_json(&app, request("GET", "/status", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({ "status": "playing", "streamUrl": "http://x/a.m3u8", "title": "A", "subtitle": "s" })
    );

    let (status, json) = send_json(&app, request("POST", "/stop", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "success": true, "message": "Playback stopped" }));
    assert_eq!(rx.recv().await.unwrap(), SurfaceSignal::Cancel);

    let (_, json) = send_json(&app, request("GET", "/status", None)).await;
    assert_eq!(json, json!({ "status": "stopped" }));
}

#[tokio::test]
async fn stop_is_idempotent_from_any_state() {
    let (state, signals) = test_state();
    let mut rx = signals.subscribe();
    let app = create_app(state);

    for _ in 0..3 {
        let (status, json) = send_json(&app, request("POST", "/stop", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        let (_, json) = send_json(&app, request("GET", "/status", None)).await;
        assert_eq!(json, json!({ "status": "stopped" }));
        assert_eq!(rx.recv().await.unwrap(), SurfaceSignal::Cancel);
    }
}

#[tokio::test]
async fn repeated_identical_cast_relaunches_each_time() {
    let (state, signals) = test_state();
    let mut rx = signals.subscribe();
    let app = create_app(state);

    for _ in 0..2 {
        let (status, _) = send_json(&app, request("POST", "/cast", Some(CAST_A))).await;
        assert_eq!(status, StatusCode::OK);
    }
    assert!(matches!(rx.recv().await.unwrap(), SurfaceSignal::Launch(_)));
    assert!(matches!(rx.recv().await.unwrap(), SurfaceSignal::Launch(_)));
}

#[tokio::test]
async fn unknown_path_is_404() {
    let (state, _) = test_state();
    let app = create_app(state);

    let (status, headers, body) = send(&app, request("GET", "/nope", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_cors(&headers);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json, json!({ "success": false, "message": "Endpoint not found" }));
}

#[tokio::test]
async fn wrong_method_is_405() {
    let (state, signals) = test_state();
    let mut rx = signals.subscribe();
    let app = create_app(state);

    for uri in ["/cast", "/stop"] {
        let (status, headers, body) = send(&app, request("GET", uri, None)).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_cors(&headers);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
    }
    let (_, json) = send_json(&app, request("GET", "/status", None)).await;
    assert_eq!(json, json!({ "status": "idle" }));
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn status_answers_any_method() {
    let (state, _) = test_state();
    let app = create_app(state);

    let (status, json) = send_json(&app, request("POST", "/status", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "status": "idle" }));
}

#[tokio::test]
async fn options_is_bare_preflight() {
    let (state, signals) = test_state();
    let mut rx = signals.subscribe();
    let app = create_app(state);

    for uri in ["/cast", "/stop", "/status", "/anything"] {
        let (status, headers, body) = send(&app, request("OPTIONS", uri, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
        assert_cors(&headers);
    }
    let (_, json) = send_json(&app, request("GET", "/status", None)).await;
    assert_eq!(json, json!({ "status": "idle" }));
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn every_response_carries_cors_headers() {
    let (state, _) = test_state();
    let app = create_app(state);

    for req in [
        request("GET", "/status", None),
        request("POST", "/cast", Some(CAST_A)),
        request("POST", "/cast", Some("{not json")),
        request("POST", "/stop", None),
    ] {
        let (_, headers, _) = send(&app, req).await;
        assert_cors(&headers);
    }
}

#[tokio::test]
async fn malformed_cast_is_500_and_leaves_state() {
    let (state, signals) = test_state();
    let mut rx = signals.subscribe();
    let app = create_app(state);

    send_json(&app, request("POST", "/cast", Some(CAST_A))).await;
    let _ = rx.recv().await.unwrap();

    for bad in ["{not json", r#"{"title":"B"}"#, r#"{"streamUrl":""}"#, ""] {
        let (status, json) = send_json(&app, request("POST", "/cast", Some(bad))).await;
        assert!(status.is_server_error(), "{bad:?} gave {status}");
        assert_eq!(json["success"], false);
        assert!(!json["message"].as_str().unwrap_or("").is_empty());
    }

    let (_, json) = send_json(&app, request("GET", "/status", None)).await;
    assert_eq!(json["streamUrl"], "http://x/a.m3u8");
    assert!(rx.try_recv().is_err());

    // Still serving after failures.
    let (status, _) = send_json(&app, request("POST", "/stop", None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn oversized_cast_body_is_500_api_response() {
    let (state, signals) = test_state();
    let mut rx = signals.subscribe();
    let app = create_app(state);

    let huge = format!(r#"{{"streamUrl":"http://x/{}.m3u8"}}"#, "a".repeat(3 * 1024 * 1024));
    let (status, headers, body) = send(&app, request("POST", "/cast", Some(&huge))).await;
    assert!(status.is_server_error(), "got {status}");
    assert_cors(&headers);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["success"], false);
    assert!(!json["message"].as_str().unwrap_or("").is_empty());

    let (_, json) = send_json(&app, request("GET", "/status", None)).await;
    assert_eq!(json, json!({ "status": "idle" }));
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn concurrent_casts_never_merge() {
    let (state, _) = test_state();
    let app = create_app(state);

    let a = json!({ "streamUrl": "http://x/a.m3u8", "title": "A", "subtitle": "a-sub" });
    let b = json!({ "streamUrl": "http://y/b.m3u8", "title": "B", "subtitle": "b-sub" });

    for _ in 0..20 {
        let reqs = [&a, &b].map(|body| {
            let app = app.clone();
            let req = request("POST", "/cast", Some(&body.to_string()));
            async move { app.oneshot(req).await.unwrap().status() }
        });
        for status in futures::future::join_all(reqs).await {
            assert_eq!(status, StatusCode::OK);
        }

        let (_, json) = send_json(&app, request("GET", "/status", None)).await;
        let mut fields = json.as_object().unwrap().clone();
        assert_eq!(fields.remove("status"), Some(json!("playing")));
        let got = Value::Object(fields);
        assert!(got == a || got == b, "merged record: {got}");
    }
}

async fn raw_get(addr: std::net::SocketAddr, path: &str) -> String {
    let mut stream = TcpStream::connect(("127.0.0.1", addr.port())).await.unwrap();
    let req = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    stream.write_all(req.as_bytes()).await.unwrap();
    let mut out = String::new();
    stream.read_to_string(&mut out).await.unwrap();
    out
}

#[tokio::test]
async fn server_start_serve_stop() {
    let (state, _) = test_state();
    let server = assert_ok!(CastServer::start(0, state).await);
    let addr = server.local_addr();
    assert_ne!(addr.port(), 0);

    let res = raw_get(addr, "/status").await;
    assert!(res.starts_with("HTTP/1.1 200"), "{res}");
    assert!(res.contains(r#"{"status":"idle"}"#), "{res}");

    assert_ok!(server.stop().await);
    assert!(TcpStream::connect(("127.0.0.1", addr.port())).await.is_err());
}

#[tokio::test]
async fn bind_failure_is_reported() {
    let (state, _) = test_state();
    let first = CastServer::start(0, state.clone()).await.unwrap();
    let port = first.local_addr().port();

    let err = assert_err!(CastServer::start(port, state).await);
    assert!(matches!(err, AppError::Bind { port: p, .. } if p == port));

    first.stop().await.unwrap();
}
