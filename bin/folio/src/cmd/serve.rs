//! Serve command - runs the HTTP server

use std::{net::SocketAddr, path::Path, sync::Arc};

use color_eyre::eyre::{Result, WrapErr};
use folio_generator::ContentIndex;
use folio_heartbeat::{HEARTBEAT_ROUTE, HeartbeatClient, HeartbeatConfig};

use crate::server::create_router;

/// Run the serve command.
pub async fn run(config_path: &Path, port: u16, static_dir: &Path) -> Result<()> {
    tracing::info!(?config_path, port, ?static_dir, "Starting server");

    let config = crate::load_config(config_path)?;

    let heartbeat_config = HeartbeatConfig::from_settings(&config.heartbeat);
    tracing::info!(
        username = %heartbeat_config.username,
        authenticated = heartbeat_config.token.is_some(),
        "Heartbeat proxy configured"
    );
    let heartbeat =
        Arc::new(HeartbeatClient::new(heartbeat_config).wrap_err("Failed to create HTTP client")?);

    let index = ContentIndex::from_config(&config);
    if !index.posts_dir().is_dir() {
        tracing::warn!(path = %index.posts_dir().display(), "Posts directory does not exist");
    }

    let app = create_router(config, index, heartbeat, static_dir);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .wrap_err_with(|| format!("Failed to bind to {addr}"))?;

    println!();
    println!("  Server running at http://{addr}");
    println!("  Heartbeat:  http://{addr}{HEARTBEAT_ROUTE}");
    println!("  Sitemap:    http://{addr}/sitemap.xml");
    println!();
    println!("  Press Ctrl+C to stop");
    println!();

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    wait_for_signal(tokio::signal::ctrl_c()).await;
}

/// Resolves when `signal` fires. A listener error never resolves.
async fn wait_for_signal<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C, graceful shutdown disabled");
        std::future::pending::<()>().await;
    }
}
