// Connection handling module
// Accepts a TCP connection and serves it with hyper on its own task

use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::header::{HeaderValue, SERVER};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::{TokioIo, TokioTimer};

use crate::api;
use crate::config::AppState;
use crate::logger::{self, AccessLogEntry};

/// Accept a connection, enforcing `max_connections`, and spawn its task.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address
/// * `state` - Shared application state
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
) {
    let counter = &state.active_connections;

    // Increment counter first, then check limit
    let prev_count = counter.fetch_add(1, Ordering::SeqCst);
    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection from {peer_addr} rejected."
            ));
            drop(stream);
            return;
        }
    }

    logger::log_connection_accepted(&peer_addr);
    handle_connection(stream, peer_addr, Arc::clone(state));
}

/// Serve a single connection in a spawned task.
///
/// The task serves HTTP/1.1 requests until the peer closes, the connection
/// errors, or `performance.connection_timeout` elapses, then releases its
/// slot in the connection counter. Once `AppState::draining` is set, the
/// request in flight completes and the connection closes.
fn handle_connection(stream: tokio::net::TcpStream, peer_addr: SocketAddr, state: Arc<AppState>) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);
        let timeout_secs = state.config.performance.connection_timeout;

        let mut builder = http1::Builder::new();
        builder
            .timer(TokioTimer::new())
            .keep_alive(state.config.performance.keep_alive);

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| serve_request(req, peer_addr, Arc::clone(&service_state))),
        );

        let mut draining = state.draining.subscribe();
        let serve = async move {
            tokio::pin!(conn);
            tokio::select! {
                result = conn.as_mut() => result,
                () = async {
                    let _ = draining.wait_for(|stop| *stop).await;
                } => {
                    conn.as_mut().graceful_shutdown();
                    conn.await
                }
            }
        };

        if timeout_secs == 0 {
            if let Err(err) = serve.await {
                logger::log_connection_error(&err);
            }
        } else {
            match tokio::time::timeout(Duration::from_secs(timeout_secs), serve).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => logger::log_connection_error(&err),
                Err(_) => logger::log_warning(&format!(
                    "Connection from {peer_addr} timed out after {timeout_secs} seconds"
                )),
            }
        }

        state.active_connections.fetch_sub(1, Ordering::SeqCst);
    });
}

/// Run one request through the API and write its access log line
async fn serve_request(
    req: Request<Incoming>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, std::convert::Infallible> {
    let started = Instant::now();
    let access_log = state.config.logging.access_log;

    let (parts, body) = req.into_parts();
    let entry = access_log.then(|| AccessLogEntry::from_request(&peer_addr, &parts));

    let mut response = api::handle_request(Request::from_parts(parts, body), Arc::clone(&state))
        .await?;

    if let Ok(server_name) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server_name);
    }

    if let Some(mut entry) = entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = usize::try_from(
            hyper::body::Body::size_hint(response.body())
                .exact()
                .unwrap_or_default(),
        )
        .unwrap_or(usize::MAX);
        entry.request_time_us =
            u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}
