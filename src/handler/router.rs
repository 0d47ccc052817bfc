//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for method validation, route resolution,
//! dispatching to the canned endpoints and access logging.

use crate::config::AppState;
use crate::handler::{docs, endpoints, timeout};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::routing::{Endpoint, Resolution};
use http_body_util::Full;
use hyper::body::{Body as _, Bytes};
use hyper::header::{REFERER, USER_AGENT};
use hyper::http::request::Parts;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
///
/// The request body is never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let (parts, _) = req.into_parts();
    let is_head = parts.method == Method::HEAD;

    let mut response = match check_http_method(&parts.method) {
        Some(resp) => resp,
        None => dispatch(&parts, &state).await,
    };

    let body_bytes = response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);

    if is_head {
        response = http::strip_body_for_head(response, body_bytes);
    }

    if state.config.logging.access_log {
        let entry = access_entry(&parts, peer_addr, &response, body_bytes, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Return a response for methods the canned endpoints do not serve
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Resolve the path against the route table and run the matched endpoint
///
/// Matching runs on the percent-decoded path, so `/timeout/%31` is `/timeout/1`.
async fn dispatch(parts: &Parts, state: &AppState) -> Response<Full<Bytes>> {
    let raw_path = parts.uri.path();
    let decoded = urlencoding::decode_binary(raw_path.as_bytes());
    let path = String::from_utf8_lossy(&decoded);

    match state.router.resolve(&path) {
        Resolution::Matched { route, remainder } => match route.endpoint {
            Endpoint::Ok => endpoints::ok(),
            Endpoint::Forbidden => endpoints::forbidden(),
            Endpoint::InternalServerError => endpoints::internal_server_error(),
            Endpoint::Redirect => endpoints::redirect(),
            Endpoint::RedirectTarget => endpoints::redirect_target(&parts.headers),
            Endpoint::Timeout => timeout::handle(remainder).await,
            Endpoint::Docs => docs::handle(&path),
        },
        Resolution::AddTrailingSlash => {
            http::build_trailing_slash_redirect(raw_path, parts.uri.query())
        }
        Resolution::NotFound => http::build_404_response(),
    }
}

fn access_entry(
    parts: &Parts,
    peer_addr: SocketAddr,
    response: &Response<Full<Bytes>>,
    body_bytes: usize,
    started: Instant,
) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        parts.method.to_string(),
        parts.uri.path().to_string(),
    );
    entry.query = parts.uri.query().map(ToString::to_string);
    entry.http_version = http_version(parts.version).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = body_bytes;
    entry.referer = parts
        .headers
        .get(REFERER)
        .map(|_| endpoints::referer_of(&parts.headers).into_owned());
    entry.user_agent = parts
        .headers
        .get(USER_AGENT)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

const fn http_version(version: hyper::Version) -> &'static str {
    match version {
        hyper::Version::HTTP_10 => "1.0",
        _ => "1.1",
    }
}
