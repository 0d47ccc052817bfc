// Configuration module entry point
// Loads application configuration and builds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, RootPolicy};

/// Default config file name (without extension)
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration using the first command line argument as the
    /// config file path, falling back to "config.toml"
    pub fn load() -> Result<Self, config::ConfigError> {
        let path = std::env::args()
            .nth(1)
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// Load configuration from specified file path (without extension)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = Self::defaults()?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("MOCK")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }

    fn defaults(
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
        config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 9999)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.connection_timeout", 0)?
            .set_default("performance.shutdown_grace", 5)?
            .set_default("routes.root_policy", "strict")
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
impl Config {
    /// Configuration with all defaults applied and no file or environment input
    pub fn for_tests() -> Self {
        Self::defaults()
            .and_then(|builder| builder.build())
            .and_then(|settings| settings.try_deserialize())
            .expect("default configuration must deserialize")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::for_tests();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 9999);
        assert!(cfg.server.workers.is_none());
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert!(cfg.performance.keep_alive);
        assert_eq!(cfg.performance.connection_timeout, 0);
        assert_eq!(cfg.performance.shutdown_grace, 5);
        assert_eq!(cfg.routes.root_policy, RootPolicy::Strict);
    }

    #[test]
    fn test_load_from_file() {
        let dir = std::env::temp_dir().join(format!("canned-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("server.toml");
        std::fs::write(
            &path,
            "[server]\nport = 8081\n\n[routes]\nroot_policy = \"catch_all\"\n",
        )
        .unwrap();

        let stem = dir.join("server");
        let cfg = Config::load_from(stem.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 8081);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.routes.root_policy, RootPolicy::CatchAll);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_socket_addr() {
        let mut cfg = Config::for_tests();
        cfg.server.host = "127.0.0.1".to_string();
        cfg.server.port = 9999;
        assert_eq!(
            cfg.get_socket_addr().unwrap(),
            "127.0.0.1:9999".parse::<SocketAddr>().unwrap()
        );

        cfg.server.host = "not a host".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }
}
