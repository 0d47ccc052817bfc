// Connection handling module
// Accepts a single TCP connection and serves it with hyper

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use hyper_util::server::graceful::GracefulShutdown;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Accept a connection, enforcing the optional connection limit.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address
/// * `state` - Shared application state
/// * `conn_counter` - Active connection counter
/// * `graceful` - Shutdown watcher the connection registers with
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<AtomicUsize>,
    graceful: &GracefulShutdown,
) {
    // Increment counter first, then check limit (prevents race condition)
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection from {peer_addr} rejected."
            ));
            drop(stream);
            return;
        }
    }

    if state.config.logging.access_log {
        logger::log_connection_accepted(&peer_addr);
    }

    handle_connection(
        stream,
        peer_addr,
        Arc::clone(state),
        Arc::clone(conn_counter),
        graceful,
    );
}

/// Serve a single connection in a spawned task.
///
/// Each request on the connection runs `handler::handle_request`; a request
/// that sleeps only parks its own task. The counter is decremented when the
/// connection ends.
fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
    conn_counter: Arc<AtomicUsize>,
    graceful: &GracefulShutdown,
) {
    let io = TokioIo::new(stream);

    let mut builder = http1::Builder::new();
    builder
        .timer(TokioTimer::new())
        .keep_alive(state.config.performance.keep_alive);

    let connection_timeout = state.config.performance.connection_timeout;
    let conn = builder.serve_connection(
        io,
        service_fn(move |req| handler::handle_request(req, peer_addr, Arc::clone(&state))),
    );
    let conn = graceful.watch(conn);

    tokio::spawn(async move {
        if connection_timeout == 0 {
            if let Err(err) = conn.await {
                logger::log_connection_error(&err);
            }
        } else {
            match tokio::time::timeout(Duration::from_secs(connection_timeout), conn).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => logger::log_connection_error(&err),
                Err(_) => logger::log_warning(&format!(
                    "Connection from {peer_addr} timed out after {connection_timeout} seconds"
                )),
            }
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}
