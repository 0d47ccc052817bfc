//! HTTP response building module
//!
//! Builders for the protocol-level responses that are not part of the canned endpoint set.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, ALLOW, CONTENT_LENGTH, LOCATION};
use hyper::{Response, StatusCode};

use super::envelope::envelope_response;

/// Methods every route answers
pub const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    envelope_response(StatusCode::NOT_FOUND, "Not Found")
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    let mut resp = envelope_response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
    resp.headers_mut()
        .insert(ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
    resp
}

/// Build OPTIONS response
pub fn build_options_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(ALLOW, ALLOWED_METHODS)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 301 redirect to the slash-terminated form of a subtree path
pub fn build_trailing_slash_redirect(path: &str, query: Option<&str>) -> Response<Full<Bytes>> {
    let target = match query {
        Some(q) => format!("{path}/?{q}"),
        None => format!("{path}/"),
    };

    let mut resp = envelope_response(StatusCode::MOVED_PERMANENTLY, "Moved Permanently");
    match HeaderValue::from_str(&target) {
        Ok(location) => {
            resp.headers_mut().insert(LOCATION, location);
        }
        Err(e) => log_build_error("301", &e),
    }
    resp
}

/// Build HTML response from a static page
pub fn build_html_response(content: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "text/html; charset=utf-8")
        .body(Full::new(Bytes::from_static(content.as_bytes())))
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(Full::new(Bytes::from_static(content.as_bytes())))
        })
}

/// Build JSON response from a static document
pub fn build_json_document_response(document: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from_static(document.as_bytes())))
        .unwrap_or_else(|e| {
            log_build_error("JSON", &e);
            Response::new(Full::new(Bytes::from_static(document.as_bytes())))
        })
}

/// Replace the body of a response to a HEAD request, keeping its length header
pub fn strip_body_for_head(resp: Response<Full<Bytes>>, body_len: usize) -> Response<Full<Bytes>> {
    let (mut parts, _) = resp.into_parts();
    parts
        .headers
        .insert(CONTENT_LENGTH, body_len.into());
    Response::from_parts(parts, Full::new(Bytes::new()))
}

/// Log response build error
fn log_build_error(status: &str, error: &impl std::fmt::Display) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn test_405_has_allow_header() {
        let resp = build_405_response();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers().get("allow").unwrap(), ALLOWED_METHODS);
    }

    #[test]
    fn test_trailing_slash_redirect() {
        let resp = build_trailing_slash_redirect("/swagger", None);
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(resp.headers().get("location").unwrap(), "/swagger/");

        let resp = build_trailing_slash_redirect("/timeout", Some("a=1"));
        assert_eq!(resp.headers().get("location").unwrap(), "/timeout/?a=1");
    }

    #[tokio::test]
    async fn test_strip_body_for_head() {
        let resp = strip_body_for_head(build_404_response(), 23);
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.headers().get("content-length").unwrap(), "23");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }
}
