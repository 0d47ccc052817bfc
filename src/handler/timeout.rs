//! Timeout handler
//!
//! Simulates a slow backend: waits the requested number of seconds before answering.

use std::time::Duration;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use thiserror::Error;

use crate::http::envelope_response;

/// Smallest accepted delay in seconds
pub const MIN_SECONDS: i64 = 1;
/// Largest accepted delay in seconds
pub const MAX_SECONDS: i64 = 299;

/// Rejected timeout path segment, displayed verbatim to the client
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeoutError {
    #[error("Invalid timeout value. Must be a number.")]
    NotANumber,
    #[error("Timeout value must be between 1 and 299 seconds.")]
    OutOfRange(i64),
}

/// Parse and bounds-check the seconds segment of `/timeout/{seconds}`
pub fn parse_seconds(segment: &str) -> Result<u64, TimeoutError> {
    let seconds: i64 = segment.parse().map_err(|_| TimeoutError::NotANumber)?;

    if !(MIN_SECONDS..=MAX_SECONDS).contains(&seconds) {
        return Err(TimeoutError::OutOfRange(seconds));
    }

    u64::try_from(seconds).map_err(|_| TimeoutError::OutOfRange(seconds))
}

/// Handle `/timeout/{seconds}`
///
/// Only this request's task is suspended; the timer wakes it when the delay elapses.
pub async fn handle(segment: &str) -> Response<Full<Bytes>> {
    let seconds = match parse_seconds(segment) {
        Ok(s) => s,
        Err(e) => return envelope_response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    tokio::time::sleep(Duration::from_secs(seconds)).await;

    envelope_response(
        StatusCode::OK,
        format!("Request completed after {seconds} seconds"),
    )
}
