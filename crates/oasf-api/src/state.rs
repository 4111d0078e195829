//! # Application State & Server Configuration
//!
//! [`AppState`] is handed to every route handler through the `State`
//! extractor. It owns the validation engine (and through it the immutable
//! schema registry) plus the Prometheus handle when a recorder is installed.
//! Nothing in it is mutated after startup.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusHandle;
use oasf_schema::{
    HttpSchemaFetcher, RemoteSchemaError, SchemaLoadError, SchemaRegistry, ValidationEngine,
    DEFAULT_FETCH_TIMEOUT,
};

/// Default bind address for the HTTP listener.
pub const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0:31235";

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    pub listen_address: SocketAddr,
    /// Timeout for fetching a schema from an explicit schema URL.
    pub schema_fetch_timeout: Duration,
    /// Directory of `<version>.json` schemas replacing the bundled set.
    pub schema_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: SocketAddr::from(([0, 0, 0, 0], 31235)),
            schema_fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            schema_dir: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `LISTEN_ADDRESS` (default: `0.0.0.0:31235`)
    /// - `SCHEMA_FETCH_TIMEOUT_SECS` (default: 30)
    /// - `SCHEMA_DIR` (default: unset, use the bundled schemas)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_addr = lookup("LISTEN_ADDRESS").unwrap_or_else(|| DEFAULT_LISTEN_ADDRESS.to_string());
        let listen_address = raw_addr
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidListenAddress(raw_addr.clone(), e.to_string()))?;

        let schema_fetch_timeout = match lookup("SCHEMA_FETCH_TIMEOUT_SECS") {
            None => DEFAULT_FETCH_TIMEOUT,
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
        };

        let schema_dir = lookup("SCHEMA_DIR")
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            listen_address,
            schema_fetch_timeout,
            schema_dir,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid LISTEN_ADDRESS '{0}': {1}")]
    InvalidListenAddress(String, String),
    #[error("invalid SCHEMA_FETCH_TIMEOUT_SECS '{0}': expected a positive number of seconds")]
    InvalidTimeout(String),
}

/// Failure building the application state at startup.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to load schema registry: {0}")]
    Registry(#[from] SchemaLoadError),
    #[error("failed to build schema fetcher: {0}")]
    Fetcher(#[from] RemoteSchemaError),
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub engine: ValidationEngine,
    pub metrics: Option<PrometheusHandle>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("engine", &self.engine)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

impl AppState {
    /// State around an existing engine, without a metrics recorder.
    pub fn new(engine: ValidationEngine) -> Self {
        Self {
            engine,
            metrics: None,
        }
    }

    /// Build the registry and fetcher described by `config`.
    ///
    /// # Errors
    ///
    /// Fails when the schema set cannot be loaded or is empty. The server
    /// must not start in that case.
    pub fn from_config(config: &ServerConfig) -> Result<Self, StateError> {
        let registry = match &config.schema_dir {
            Some(dir) => SchemaRegistry::from_dir(dir)?,
            None => SchemaRegistry::bundled()?,
        };
        let fetcher = HttpSchemaFetcher::new(config.schema_fetch_timeout)?;
        Ok(Self::new(ValidationEngine::new(
            Arc::new(registry),
            Arc::new(fetcher),
        )))
    }

    /// Attach the handle used to render `/metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.listen_address.to_string(), DEFAULT_LISTEN_ADDRESS);
    }

    #[test]
    fn reads_every_variable() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("LISTEN_ADDRESS", "127.0.0.1:9000"),
            ("SCHEMA_FETCH_TIMEOUT_SECS", "5"),
            ("SCHEMA_DIR", "/etc/oasf/schemas"),
        ]))
        .unwrap();
        assert_eq!(config.listen_address.port(), 9000);
        assert_eq!(config.schema_fetch_timeout, Duration::from_secs(5));
        assert_eq!(config.schema_dir, Some(PathBuf::from("/etc/oasf/schemas")));
    }

    #[test]
    fn rejects_bad_address() {
        let err = ServerConfig::from_lookup(lookup(&[("LISTEN_ADDRESS", "localhost")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidListenAddress(..)));
    }

    #[test]
    fn rejects_zero_and_garbage_timeouts() {
        for raw in ["0", "-1", "soon"] {
            let err = ServerConfig::from_lookup(lookup(&[("SCHEMA_FETCH_TIMEOUT_SECS", raw)]))
                .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidTimeout(_)), "accepted {raw}");
        }
    }

    #[test]
    fn bundled_state_builds() {
        let state = AppState::from_config(&ServerConfig::default()).unwrap();
        assert!(state.engine.registry().contains("0.6.0"));
        assert!(state.metrics.is_none());
    }

    #[test]
    fn empty_schema_dir_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            schema_dir: Some(dir.path().to_path_buf()),
            ..ServerConfig::default()
        };
        let err = AppState::from_config(&config).unwrap_err();
        assert!(matches!(err, StateError::Registry(SchemaLoadError::Empty { .. })));
    }
}
