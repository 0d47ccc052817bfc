//! Routing module
//!
//! Explicit route table for the canned endpoints:
//! - Exact and prefix path rules
//! - Configurable handling of unmatched paths (strict 404 or catch-all root)

mod matcher;
mod table;

pub use matcher::PathRule;
pub use table::{Endpoint, Resolution, Router};
