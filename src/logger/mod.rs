//! Logger module
//!
//! Server lifecycle messages, warnings and errors, and one access log line
//! per request. Output goes to stdout/stderr or to the configured files.

mod format;
pub mod writer;

pub use format::AccessLogEntry;
pub use writer::LogLevel;

use crate::config::Config;
use crate::routing::{PathRule, Router};
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    let level = config.logging.level.parse().unwrap_or_else(|e| {
        eprintln!("[WARN] {e}, falling back to info");
        LogLevel::Info
    });
    writer::init(
        level,
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_info(message),
        None => println!("{message}"),
    }
}

fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

fn write_warning(message: &str) {
    match writer::get() {
        Some(w) if w.level() > LogLevel::Warn => {}
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

fn write_access(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config, router: &Router) {
    write_info("======================================");
    write_info("Canned HTTP server started");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Log level: {}", config.logging.level));
    match config.server.workers {
        Some(workers) => write_info(&format!("Worker threads: {workers}")),
        None => write_info("Worker threads: default (CPU cores)"),
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info(&format!("Root policy: {:?}", config.routes.root_policy));
    write_info("Routes:");
    for route in router.routes() {
        let pattern = match route.rule {
            PathRule::Exact(p) => p.to_string(),
            PathRule::Prefix(p) => format!("{p}*"),
        };
        write_info(&format!("  - GET {pattern:<16} ({})", route.name));
    }
    write_info(&format!(
        "OpenAPI documentation available at http://{addr}/swagger/ (document: {})",
        crate::handler::docs::OPENAPI_PATH
    ));
    write_info("======================================\n");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write_info(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_warning(&format!("[WARN] {message}"));
}

pub fn log_info(message: &str) {
    write_info(&format!("[INFO] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_access(&entry.format(format));
}
