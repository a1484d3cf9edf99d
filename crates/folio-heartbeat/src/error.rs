//! Proxy error taxonomy and its HTTP mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Failures of one heartbeat request.
#[derive(Debug, Error)]
pub enum HeartbeatError {
    /// Upstream answered 429.
    #[error("upstream rate limited the request")]
    RateLimited,

    /// Upstream answered with any other non-success status.
    #[error("upstream returned status {status}")]
    Unavailable { status: u16 },

    /// The outbound call failed before a response arrived.
    #[error("request to upstream failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Upstream answered 2xx with a body that is not JSON.
    #[error("upstream body is not valid JSON: {0}")]
    Decode(#[source] reqwest::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
}

impl HeartbeatError {
    /// Status code returned to the proxy's caller.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::Unavailable { .. } => StatusCode::BAD_GATEWAY,
            Self::Transport(_) | Self::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message returned to the proxy's caller.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::RateLimited => "Rate limited",
            Self::Unavailable { .. } => "GitHub API unavailable",
            Self::Transport(_) | Self::Decode(_) => "Failed to fetch GitHub events",
        }
    }
}

impl IntoResponse for HeartbeatError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.public_message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
