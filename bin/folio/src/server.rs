//! HTTP server: heartbeat proxy, live sitemap and static files

use std::{path::Path, sync::Arc};

use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use folio_core::Config;
use folio_generator::{ContentIndex, SitemapGenerator};
use folio_heartbeat::HeartbeatClient;
use tower_http::{services::ServeDir, trace::TraceLayer};

/// Shared state for the site routes.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Site configuration.
    pub config: Arc<Config>,
    /// Content index backing the sitemap.
    pub index: Arc<ContentIndex>,
}

/// Create the server router.
///
/// Routes are matched first; anything else falls through to `static_dir`.
pub fn create_router(
    config: Config,
    index: ContentIndex,
    heartbeat: Arc<HeartbeatClient>,
    static_dir: &Path,
) -> Router {
    let state = AppState {
        config: Arc::new(config),
        index: Arc::new(index),
    };

    Router::new()
        .route("/sitemap.xml", get(sitemap_handler))
        .with_state(state)
        .merge(folio_heartbeat::router(heartbeat))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
}

/// Sitemap generated from the current content on every request.
async fn sitemap_handler(State(state): State<AppState>) -> Response {
    let result = tokio::task::spawn_blocking(move || {
        let listing = state.index.list_posts_meta()?;
        let projects = state.index.list_project_slugs();
        let generator = SitemapGenerator::new((*state.config).clone());
        Ok::<_, folio_generator::ContentError>(generator.generate(
            &listing.posts,
            &projects,
            Utc::now(),
        ))
    })
    .await;

    match result {
        Ok(Ok(xml)) => ([(header::CONTENT_TYPE, "application/xml")], xml).into_response(),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "sitemap generation failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "sitemap task panicked");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
