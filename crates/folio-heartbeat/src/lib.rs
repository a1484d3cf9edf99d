//! GitHub heartbeat proxy
//!
//! Serves `GET /api/github-heartbeat` by forwarding to GitHub's public events
//! endpoint for one configured account. Upstream failures collapse into a
//! small set of stable JSON error bodies; the upstream status is logged but
//! never returned.

pub mod client;
pub mod error;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::{debug, warn};

pub use client::{HeartbeatClient, HeartbeatConfig};
pub use error::HeartbeatError;

/// Route the proxy is mounted at.
pub const HEARTBEAT_ROUTE: &str = "/api/github-heartbeat";

/// Shared cache freshness window, in seconds.
pub const REVALIDATE_SECS: u64 = 300;

/// Window during which a stale response may be served while revalidating.
pub const STALE_WHILE_REVALIDATE_SECS: u64 = 600;

/// `Cache-Control` value attached to successful responses.
pub const CACHE_CONTROL: &str = "public, s-maxage=300, stale-while-revalidate=600";

/// Router exposing the heartbeat endpoint.
pub fn router(client: Arc<HeartbeatClient>) -> Router {
    Router::new()
        .route(HEARTBEAT_ROUTE, get(github_heartbeat))
        .with_state(client)
}

/// Handler for [`HEARTBEAT_ROUTE`]. Always produces a JSON response.
pub async fn github_heartbeat(State(client): State<Arc<HeartbeatClient>>) -> Response {
    match client.fetch_events().await {
        Ok(events) => {
            debug!("github heartbeat served");
            ([(header::CACHE_CONTROL, CACHE_CONTROL)], Json(events)).into_response()
        }
        Err(e) => {
            warn!(error = %e, "github heartbeat failed");
            e.into_response()
        }
    }
}
