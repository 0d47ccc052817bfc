//! Response envelope module
//!
//! Every functional endpoint answers with the same JSON shape: `{"message": "<text>"}`.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::{Deserialize, Serialize};

/// The `{"message": ...}` body shared by all JSON endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub message: String,
}

impl Envelope {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Compact JSON encoding of the envelope
    pub fn to_json(&self) -> String {
        // A single string field always serializes
        serde_json::to_string(self).unwrap_or_else(|e| {
            crate::logger::log_error(&format!("Failed to serialize envelope: {e}"));
            String::from(r#"{"message":""}"#)
        })
    }
}

/// Build a JSON envelope response with the given status and message
pub fn envelope_response(status: StatusCode, message: impl Into<String>) -> Response<Full<Bytes>> {
    let body = Envelope::new(message).to_json();

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body.clone())))
        .unwrap_or_else(|e| {
            crate::logger::log_error(&format!("Failed to build {status} response: {e}"));
            let mut resp = Response::new(Full::new(Bytes::from(body)));
            *resp.status_mut() = status;
            resp
        })
}
