//! HTTP protocol layer module
//!
//! Provides the JSON response envelope and the protocol-level response builders
//! shared by all handlers.

pub mod envelope;
pub mod response;

// Re-export commonly used types
pub use envelope::{envelope_response, Envelope};
pub use response::{
    build_404_response, build_405_response, build_html_response, build_json_document_response,
    build_options_response, build_trailing_slash_redirect, strip_body_for_head,
};
