//! Fixed-response handlers
//!
//! Canned status/message pairs. None of them look at the request beyond
//! what the router already matched, except the redirect target which echoes `Referer`.

use std::borrow::Cow;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::REFERER;
use hyper::{HeaderMap, Response, StatusCode};

use crate::http::envelope_response;

pub fn ok() -> Response<Full<Bytes>> {
    envelope_response(StatusCode::OK, "OK")
}

pub fn forbidden() -> Response<Full<Bytes>> {
    envelope_response(StatusCode::FORBIDDEN, "Forbidden")
}

pub fn internal_server_error() -> Response<Full<Bytes>> {
    envelope_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}

/// 303 with a body only, no `Location` header is sent
pub fn redirect() -> Response<Full<Bytes>> {
    envelope_response(StatusCode::SEE_OTHER, "Redirecting to /redirect-two")
}

/// Target of the redirect chain, reports where the client came from
pub fn redirect_target(headers: &HeaderMap) -> Response<Full<Bytes>> {
    let referer = referer_of(headers);
    envelope_response(StatusCode::OK, format!("Redirected from {referer}"))
}

/// `Referer` header value, empty when absent
///
/// Non-UTF-8 bytes are replaced rather than dropping the whole value.
pub fn referer_of(headers: &HeaderMap) -> Cow<'_, str> {
    headers
        .get(REFERER)
        .map_or(Cow::Borrowed(""), |v| String::from_utf8_lossy(v.as_bytes()))
}
