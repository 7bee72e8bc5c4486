use crate::config::SessionsConfig;
use crate::services::history::SessionHistory;
use chrono::TimeDelta;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::info;

/// Background worker that ends sessions nobody has touched within the idle TTL
///
/// Clients that never call `DELETE /sessions/{id}` would otherwise keep their
/// history in memory for the life of the process.
pub async fn session_cleanup_worker(
    history: Arc<SessionHistory>,
    settings: SessionsConfig,
    mut shutdown_rx: tokio::sync::broadcast::Receiver<()>,
) {
    let idle_ttl = i64::try_from(settings.idle_ttl_seconds)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .unwrap_or(TimeDelta::MAX);
    // interval() panics on a zero period
    let mut cleanup_interval = interval(Duration::from_secs(settings.cleanup_interval_seconds.max(1)));
    info!(
        idle_ttl_seconds = settings.idle_ttl_seconds,
        interval_seconds = settings.cleanup_interval_seconds.max(1),
        "Session cleanup worker started"
    );

    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => {
                info!("Session cleanup worker shutting down");
                break;
            }
            _ = cleanup_interval.tick() => {
                let evicted = history.evict_idle(idle_ttl).await;
                if evicted > 0 {
                    info!(
                        evicted,
                        remaining = history.session_count(),
                        "Ended idle sessions"
                    );
                }
            }
        }
    }

    info!("Session cleanup worker stopped");
}
