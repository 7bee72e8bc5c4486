use knowledge_hub::{AppState, build_router, load_config, workers::session_cleanup_worker};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("knowledge_hub=info,tower_http=info")),
        )
        .init();

    let config = load_config()?;
    tracing::info!("Loaded configuration:\n{}", config);

    // Catalog and credentials are checked here; either failing stops startup
    let state = match AppState::from_config(&config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, code = e.code(), "Startup failed");
            return Err(e.into());
        }
    };

    let (shutdown_tx, _) = tokio::sync::broadcast::channel::<()>(1);
    let cleanup_handle = tokio::spawn(session_cleanup_worker(
        Arc::clone(&state.history),
        config.sessions.clone(),
        shutdown_tx.subscribe(),
    ));

    let app = build_router(state);

    let address = config.server.bind_address();
    let listener = TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Knowledge hub listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Receivers may already be gone; nothing to do then
    let _ = shutdown_tx.send(());
    if let Err(e) = cleanup_handle.await {
        tracing::warn!(error = %e, "Session cleanup worker did not stop cleanly");
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
