// Application state module
// Holds the loaded configuration and the route table shared by every connection

use super::types::Config;
use crate::routing::Router;

/// Application state, built once at startup and shared via `Arc`
pub struct AppState {
    pub config: Config,
    pub router: Router,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            router: Router::new(config.routes.root_policy),
        }
    }
}
