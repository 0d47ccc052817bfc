// Server loop module
// Accepts connections until shutdown is requested, then drains in-flight requests

use hyper_util::server::graceful::GracefulShutdown;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::SignalHandler;
use crate::config::AppState;
use crate::logger;

/// Accept loop shared by the binary and the loopback tests
///
/// Returns after shutdown was requested and either every connection finished
/// or `performance.shutdown_grace` seconds passed.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    signals: Arc<SignalHandler>,
) {
    let graceful = GracefulShutdown::new();
    let active_connections = Arc::new(AtomicUsize::new(0));

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(
                            stream,
                            peer_addr,
                            &state,
                            &active_connections,
                            &graceful,
                        );
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

    // Stop accepting before draining
    drop(listener);

    let in_flight = active_connections.load(Ordering::SeqCst);
    let grace = Duration::from_secs(state.config.performance.shutdown_grace);
    logger::log_info(&format!(
        "Shutting down, waiting up to {}s for {in_flight} open connection(s)",
        grace.as_secs()
    ));

    tokio::select! {
        () = graceful.shutdown() => {
            logger::log_info("All connections closed");
        }
        () = tokio::time::sleep(grace) => {
            logger::log_warning(&format!(
                "Shutdown grace period elapsed with {} connection(s) still open",
                active_connections.load(Ordering::SeqCst)
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::server::create_reusable_listener;
    use std::net::SocketAddr;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::task::JoinHandle;

    struct TestServer {
        addr: SocketAddr,
        signals: Arc<SignalHandler>,
        handle: JoinHandle<()>,
    }

    impl TestServer {
        async fn start() -> Self {
            let mut cfg = Config::for_tests();
            cfg.logging.access_log = false;
            cfg.performance.shutdown_grace = 1;

            let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
            let addr = listener.local_addr().unwrap();
            let state = Arc::new(AppState::new(&cfg));
            let signals = Arc::new(SignalHandler::new());
            let handle = tokio::spawn(start_server_loop(
                listener,
                state,
                Arc::clone(&signals),
            ));

            Self {
                addr,
                signals,
                handle,
            }
        }

        async fn stop(self) {
            self.signals.request_shutdown();
            tokio::time::timeout(Duration::from_secs(5), self.handle)
                .await
                .expect("server loop should stop")
                .unwrap();
        }
    }

    /// Send one request with `Connection: close` and return the raw response
    async fn raw_get(addr: SocketAddr, path: &str, extra_headers: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request = format!(
            "GET {path} HTTP/1.1\r\nHost: {addr}\r\n{extra_headers}Connection: close\r\n\r\n"
        );
        stream.write_all(request.as_bytes()).await.unwrap();

        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    fn status_line(response: &str) -> &str {
        response.lines().next().unwrap_or("")
    }

    fn body(response: &str) -> &str {
        response.split("\r\n\r\n").nth(1).unwrap_or("")
    }

    #[tokio::test]
    async fn test_serves_canned_endpoints_over_tcp() {
        let server = TestServer::start().await;

        let resp = raw_get(server.addr, "/", "").await;
        assert_eq!(status_line(&resp), "HTTP/1.1 200 OK");
        assert!(resp.to_ascii_lowercase().contains("content-type: application/json"));
        assert_eq!(body(&resp), r#"{"message":"OK"}"#);

        let resp = raw_get(server.addr, "/error403", "").await;
        assert_eq!(status_line(&resp), "HTTP/1.1 403 Forbidden");
        assert_eq!(body(&resp), r#"{"message":"Forbidden"}"#);

        let resp = raw_get(server.addr, "/error500", "").await;
        assert_eq!(status_line(&resp), "HTTP/1.1 500 Internal Server Error");
        assert_eq!(body(&resp), r#"{"message":"Internal Server Error"}"#);

        let resp = raw_get(server.addr, "/redirect", "").await;
        assert_eq!(status_line(&resp), "HTTP/1.1 303 See Other");
        assert!(!resp.to_ascii_lowercase().contains("\r\nlocation:"));

        let resp = raw_get(
            server.addr,
            "/redirecttwo",
            "Referer: http://localhost:9999/redirect\r\n",
        )
        .await;
        assert_eq!(
            body(&resp),
            r#"{"message":"Redirected from http://localhost:9999/redirect"}"#
        );

        let resp = raw_get(server.addr, "/nonexistent", "").await;
        assert_eq!(status_line(&resp), "HTTP/1.1 404 Not Found");

        let resp = raw_get(server.addr, "/timeout/abc", "").await;
        assert_eq!(status_line(&resp), "HTTP/1.1 400 Bad Request");
        assert_eq!(
            body(&resp),
            r#"{"message":"Invalid timeout value. Must be a number."}"#
        );

        let resp = raw_get(server.addr, "/swagger/openapi.json", "").await;
        assert_eq!(status_line(&resp), "HTTP/1.1 200 OK");
        let doc: serde_json::Value = serde_json::from_str(body(&resp)).unwrap();
        assert!(doc["paths"]["/redirecttwo"].is_object());

        server.stop().await;
    }

    #[tokio::test]
    async fn test_short_timeout_finishes_before_long_one() {
        let server = TestServer::start().await;
        let addr = server.addr;
        let started = tokio::time::Instant::now();

        let long = tokio::spawn(async move {
            let resp = raw_get(addr, "/timeout/3", "").await;
            (tokio::time::Instant::now(), resp)
        });
        // Make sure the long request is submitted first
        tokio::time::sleep(Duration::from_millis(100)).await;
        let short = tokio::spawn(async move {
            let resp = raw_get(addr, "/timeout/1", "").await;
            (tokio::time::Instant::now(), resp)
        });

        let (short_done, short_resp) = short.await.unwrap();
        let (long_done, long_resp) = long.await.unwrap();

        assert!(short_done < long_done);
        assert!(short_done - started >= Duration::from_secs(1));
        assert!(long_done - started >= Duration::from_secs(3));
        assert_eq!(
            body(&short_resp),
            r#"{"message":"Request completed after 1 seconds"}"#
        );
        assert_eq!(
            body(&long_resp),
            r#"{"message":"Request completed after 3 seconds"}"#
        );

        server.stop().await;
    }

    #[tokio::test]
    async fn test_shutdown_stops_accepting() {
        let server = TestServer::start().await;
        let addr = server.addr;
        server.stop().await;

        // The listener is gone once the loop returned
        assert!(TcpStream::connect(addr).await.is_err());
    }
}
