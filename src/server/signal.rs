// Signal handling module
//
// Supported signals:
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

use crate::logger;

/// Shutdown coordination between the signal task and the server loop
pub struct SignalHandler {
    /// Woken once when shutdown is requested
    pub shutdown: Notify,
    /// Whether shutdown has been requested
    pub shutdown_requested: AtomicBool,
}

impl SignalHandler {
    pub fn new() -> Self {
        Self {
            shutdown: Notify::new(),
            shutdown_requested: AtomicBool::new(false),
        }
    }

    /// Ask the server loop to stop accepting and drain
    ///
    /// `notify_one` keeps a permit, so a request made before the loop
    /// starts waiting is not lost.
    pub fn request_shutdown(&self) {
        if !self.shutdown_requested.swap(true, Ordering::SeqCst) {
            self.shutdown.notify_one();
        }
    }
}

impl Default for SignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Start signal handlers (Unix)
///
/// | Signal  | Action         |
/// |---------|----------------|
/// | SIGTERM | Graceful stop  |
/// | SIGINT  | Graceful stop  |
#[cfg(unix)]
pub fn start_signal_handler(handler: Arc<SignalHandler>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(term), Ok(int)) => (term, int),
                (Err(e), _) | (_, Err(e)) => {
                    logger::log_error(&format!("Failed to register signal handlers: {e}"));
                    return;
                }
            };

        logger::log_info(&format!(
            "Signal handlers registered (SIGTERM, SIGINT), pid {}",
            std::process::id()
        ));

        tokio::select! {
            _ = sigterm.recv() => logger::log_info("SIGTERM received, shutting down"),
            _ = sigint.recv() => logger::log_info("SIGINT received, shutting down"),
        }
        handler.request_shutdown();
    });
}

/// Non-unix fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(handler: Arc<SignalHandler>) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                logger::log_info("Ctrl+C received, shutting down");
                handler.request_shutdown();
            }
            Err(e) => logger::log_error(&format!("Failed to listen for Ctrl+C: {e}")),
        }
    });
}
