//! Heartbeat proxy tests against a fake upstream on a local port.

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use axum::{
    Json, Router,
    body::to_bytes,
    extract::{Path, RawQuery, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use folio_core::HeartbeatSettings;
use folio_heartbeat::{
    CACHE_CONTROL, HEARTBEAT_ROUTE, HeartbeatClient, HeartbeatConfig, github_heartbeat, router,
};
use serde_json::{Value, json};

#[derive(Debug, Clone)]
struct SeenRequest {
    user: String,
    query: Option<String>,
    authorization: Option<String>,
    user_agent: Option<String>,
}

struct FakeUpstream {
    status: StatusCode,
    body: Value,
    seen: Mutex<Vec<SeenRequest>>,
}

async fn fake_events(
    State(fake): State<Arc<FakeUpstream>>,
    Path(user): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    };
    fake.seen.lock().expect("lock").push(SeenRequest {
        user,
        query,
        authorization: header_value(header::AUTHORIZATION),
        user_agent: header_value(header::USER_AGENT),
    });
    (fake.status, Json(fake.body.clone())).into_response()
}

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    addr
}

async fn spawn_upstream(status: StatusCode, body: Value) -> (SocketAddr, Arc<FakeUpstream>) {
    let fake = Arc::new(FakeUpstream {
        status,
        body,
        seen: Mutex::new(Vec::new()),
    });
    let app = Router::new()
        .route("/users/{user}/events/public", get(fake_events))
        .with_state(fake.clone());
    (serve(app).await, fake)
}

fn client_for(base: String, token: Option<&str>) -> Arc<HeartbeatClient> {
    let mut settings = HeartbeatSettings::for_user("octocat");
    settings.api_base = base;
    settings.per_page = 7;
    settings.token = token.map(String::from);
    Arc::new(HeartbeatClient::new(HeartbeatConfig::from_settings(&settings)).expect("client"))
}

async fn call(client: Arc<HeartbeatClient>) -> (StatusCode, HeaderMap, Value) {
    let response = github_heartbeat(State(client)).await;
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body = serde_json::from_slice(&bytes).expect("json body");
    (status, headers, body)
}

#[tokio::test]
async fn success_passes_body_through_with_cache_headers() {
    let events = json!([
        {"id": "1", "type": "PushEvent", "repo": {"name": "octocat/hello"}},
        {"id": "2", "type": "WatchEvent", "payload": {"action": "started"}}
    ]);
    let (addr, _fake) = spawn_upstream(StatusCode::OK, events.clone()).await;

    let (status, headers, body) = call(client_for(format!("http://{addr}"), None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, events);
    assert_eq!(
        headers.get(header::CACHE_CONTROL).and_then(|v| v.to_str().ok()),
        Some(CACHE_CONTROL)
    );
    assert_eq!(
        CACHE_CONTROL,
        "public, s-maxage=300, stale-while-revalidate=600"
    );
}

#[tokio::test]
async fn rate_limit_maps_to_429() {
    let (addr, _fake) =
        spawn_upstream(StatusCode::TOO_MANY_REQUESTS, json!({"message": "slow down"})).await;

    let (status, headers, body) = call(client_for(format!("http://{addr}"), None)).await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body, json!({"error": "Rate limited"}));
    assert!(headers.get(header::CACHE_CONTROL).is_none());
}

#[tokio::test]
async fn upstream_500_maps_to_502_without_leaking_status() {
    let (addr, _fake) = spawn_upstream(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"message": "boom 500"}),
    )
    .await;

    let (status, _headers, body) = call(client_for(format!("http://{addr}"), None)).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, json!({"error": "GitHub API unavailable"}));
    assert!(!body.to_string().contains("500"));
}

#[tokio::test]
async fn other_failures_map_to_502() {
    for upstream in [StatusCode::NOT_FOUND, StatusCode::FORBIDDEN, StatusCode::SERVICE_UNAVAILABLE] {
        let (addr, _fake) = spawn_upstream(upstream, json!({})).await;

        let (status, _headers, body) = call(client_for(format!("http://{addr}"), None)).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY, "upstream {upstream}");
        assert_eq!(body, json!({"error": "GitHub API unavailable"}));
    }
}

#[tokio::test]
async fn transport_failure_maps_to_500() {
    let closed = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = closed.local_addr().expect("local addr");
    drop(closed);

    let (status, _headers, body) = call(client_for(format!("http://{addr}"), None)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to fetch GitHub events"}));
}

#[tokio::test]
async fn non_json_success_maps_to_500() {
    let app = Router::new().route(
        "/users/{user}/events/public",
        get(|| async { "<html>not json</html>" }),
    );
    let addr = serve(app).await;

    let (status, _headers, body) = call(client_for(format!("http://{addr}"), None)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to fetch GitHub events"}));
}

#[tokio::test]
async fn token_is_sent_only_when_configured() {
    let (addr, fake) = spawn_upstream(StatusCode::OK, json!([])).await;
    let base = format!("http://{addr}");

    call(client_for(base.clone(), Some("ghp_test"))).await;
    call(client_for(base, None)).await;

    let seen = fake.seen.lock().expect("lock").clone();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].authorization.as_deref(), Some("Bearer ghp_test"));
    assert_eq!(seen[1].authorization, None);
    for request in &seen {
        assert_eq!(request.user, "octocat");
        assert_eq!(request.query.as_deref(), Some("per_page=7"));
        assert_eq!(request.user_agent.as_deref(), Some("folio-heartbeat"));
    }
}

#[tokio::test]
async fn token_never_appears_in_error_bodies() {
    let (addr, _fake) = spawn_upstream(StatusCode::UNAUTHORIZED, json!({})).await;

    let (_status, headers, body) =
        call(client_for(format!("http://{addr}"), Some("ghp_secret"))).await;

    assert!(!body.to_string().contains("ghp_secret"));
    assert!(
        headers
            .values()
            .all(|v| !v.to_str().unwrap_or_default().contains("ghp_secret"))
    );
}

#[tokio::test]
async fn route_is_mounted() {
    let (upstream, _fake) = spawn_upstream(StatusCode::OK, json!([{"id": "9"}])).await;
    let proxy = serve(router(client_for(format!("http://{upstream}"), None))).await;

    let response = reqwest::get(format!("http://{proxy}{HEARTBEAT_ROUTE}"))
        .await
        .expect("request");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CACHE_CONTROL)
            .and_then(|v| v.to_str().ok()),
        Some(CACHE_CONTROL)
    );
    let body: Value = response.json().await.expect("json");
    assert_eq!(body, json!([{"id": "9"}]));
}
