// Server loop
// Accepts connections until a shutdown signal arrives, then drains

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::SignalHandler;
use crate::config;
use crate::logger;

/// How long shutdown waits for in-flight connections before giving up
const DRAIN_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

/// Run the accept loop until shutdown is signalled.
///
/// Accepted connections are served in their own tasks; the loop itself only
/// accepts, checks limits, and reacts to the shutdown signal. The
/// `shutdown_requested` flag is checked on every iteration so a signal that
/// fires before the loop first awaits the `Notify` is not lost.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<config::AppState>,
    active_connections: Arc<AtomicUsize>,
    signals: Arc<SignalHandler>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        if signals.shutdown_requested.load(Ordering::SeqCst) {
            break;
        }

        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = signals.shutdown.notified() => {
                break;
            }
        }
    }

    // Stop accepting immediately; in-flight requests finish in their tasks
    logger::log_shutdown_started();
    drop(listener);
    drain_connections(&active_connections).await;
    logger::log_shutdown_complete();

    Ok(())
}

/// Wait for the active connection count to reach zero, bounded by
/// `DRAIN_TIMEOUT`.
async fn drain_connections(active_connections: &Arc<AtomicUsize>) {
    let deadline = tokio::time::Instant::now() + DRAIN_TIMEOUT;

    loop {
        let remaining = active_connections.load(Ordering::SeqCst);
        if remaining == 0 {
            return;
        }
        if tokio::time::Instant::now() >= deadline {
            logger::log_warning(&format!(
                "Shutdown drain timed out with {remaining} connection(s) still active"
            ));
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }
}
