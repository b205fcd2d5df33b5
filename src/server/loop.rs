// Server loop module
// Accepts connections until the shutdown signal fires

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// Accept connections on `listener` and hand each one to its own task.
///
/// Once `shutdown` is notified the loop stops accepting, tells live
/// connections to wind down, and returns after they have closed or after
/// `performance.connection_timeout` (no bound when 0).
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: Arc<Notify>,
) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &state),
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = shutdown.notified() => {
                let remaining = drain_connections(&state).await;
                logger::log_server_stop(remaining, state.store.len());
                return;
            }
        }
    }
}

/// Poll interval while waiting for connections to close
const DRAIN_POLL: Duration = Duration::from_millis(10);

/// Signal draining and wait for every connection task to finish.
///
/// Returns the number of connections still open when the wait ended.
async fn drain_connections(state: &AppState) -> usize {
    state.draining.send_replace(true);

    let open = || state.active_connections.load(Ordering::SeqCst);
    let wait = async {
        while open() > 0 {
            tokio::time::sleep(DRAIN_POLL).await;
        }
    };

    match state.config.performance.connection_timeout {
        0 => wait.await,
        secs => {
            let _ = tokio::time::timeout(Duration::from_secs(secs), wait).await;
        }
    }
    open()
}
