//! Request handler module
//!
//! Responsible for request dispatch and the canned endpoint behaviors:
//! fixed responses, the delayed timeout response and the API documentation.

pub mod docs;
pub mod endpoints;
pub mod router;
pub mod timeout;

// Re-export main entry point
pub use router::handle_request;
