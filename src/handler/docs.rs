//! API documentation handler
//!
//! Serves the OpenAPI description and the Swagger UI page under `/swagger/`.
//! Both are embedded at build time.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::http;

/// OpenAPI 3 description of the canned endpoints
pub const OPENAPI_DOCUMENT: &str = include_str!("assets/openapi.json");

/// Swagger UI page, loads its bundle from a CDN and points it at `OPENAPI_PATH`
pub const SWAGGER_PAGE: &str = include_str!("assets/swagger.html");

/// Where the viewer page expects the description document
pub const OPENAPI_PATH: &str = "/swagger/openapi.json";

/// Handle any path under `/swagger/`
pub fn handle(path: &str) -> Response<Full<Bytes>> {
    if path.ends_with("/openapi.json") {
        return http::build_json_document_response(OPENAPI_DOCUMENT);
    }
    http::build_html_response(SWAGGER_PAGE)
}
