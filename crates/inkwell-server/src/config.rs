//! Server configuration for Inkwell.
//!
//! Loads configuration from environment variables with sensible defaults.
//! All settings can be overridden via `INKWELL_*` environment variables.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Default listening port.
const DEFAULT_PORT: u16 = 4567;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,
    /// Runtime environment; selects the default document and credential paths.
    pub environment: Environment,
    /// Storage backend type.
    pub storage_backend: StorageBackendType,
    /// Path to the YAML credential file.
    pub credentials_path: PathBuf,
    /// Secret the session cookie signing key is derived from.
    pub session_secret: Option<String>,
    /// Log level filter (e.g., `info`, `debug`, `warn`).
    pub log_level: String,
}

/// Runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Normal operation: `<root>/data` and `<root>/users.yml`.
    Production,
    /// Test runs: `<root>/test/data` and `<root>/test/users.yml`.
    Test,
}

impl Environment {
    /// Parse an environment name. Anything other than `test` is production.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("test") {
            Self::Test
        } else {
            Self::Production
        }
    }

    /// Default document root under the project root.
    #[must_use]
    pub fn data_dir(self, root: &Path) -> PathBuf {
        match self {
            Self::Production => root.join("data"),
            Self::Test => root.join("test").join("data"),
        }
    }

    /// Default credential file under the project root.
    #[must_use]
    pub fn credentials_path(self, root: &Path) -> PathBuf {
        match self {
            Self::Production => root.join("users.yml"),
            Self::Test => root.join("test").join("users.yml"),
        }
    }
}

/// Supported storage backend types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackendType {
    /// In-memory (development only, data lost on restart).
    Memory,
    /// One file per document under a directory.
    Filesystem { path: PathBuf },
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PORT`: port to bind on (binds to `0.0.0.0`)
    /// - `INKWELL_BIND_ADDR`: full bind address (overrides `PORT`, default: `127.0.0.1:4567`)
    /// - `INKWELL_ENV`: `test` or anything else for production (default: production)
    /// - `INKWELL_ROOT`: project root the default paths hang off (default: `.`)
    /// - `INKWELL_DATA_DIR`: document root (overrides the environment default)
    /// - `INKWELL_CREDENTIALS`: credential file (overrides the environment default)
    /// - `INKWELL_STORAGE`: `filesystem` or `memory` (default: `filesystem`)
    /// - `INKWELL_SESSION_SECRET`: cookie signing secret (default: random per process)
    /// - `INKWELL_LOG_LEVEL`: log filter (default: `info`)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default_addr = SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT));

        // Priority: INKWELL_BIND_ADDR > PORT > default 127.0.0.1:4567
        let bind_addr = if let Some(addr) = lookup("INKWELL_BIND_ADDR") {
            addr.parse().unwrap_or(default_addr)
        } else if let Some(port) = lookup("PORT") {
            SocketAddr::from(([0, 0, 0, 0], port.parse().unwrap_or(DEFAULT_PORT)))
        } else {
            default_addr
        };

        let environment = lookup("INKWELL_ENV")
            .map_or(Environment::Production, |v| Environment::parse(&v));

        let root = PathBuf::from(lookup("INKWELL_ROOT").unwrap_or_else(|| ".".to_owned()));

        let data_dir = lookup("INKWELL_DATA_DIR")
            .map_or_else(|| environment.data_dir(&root), PathBuf::from);

        let credentials_path = lookup("INKWELL_CREDENTIALS")
            .map_or_else(|| environment.credentials_path(&root), PathBuf::from);

        let storage_backend = match lookup("INKWELL_STORAGE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "memory" => StorageBackendType::Memory,
            _ => StorageBackendType::Filesystem { path: data_dir },
        };

        let session_secret = lookup("INKWELL_SESSION_SECRET").filter(|s| !s.is_empty());

        let log_level = lookup("INKWELL_LOG_LEVEL").unwrap_or_else(|| "info".to_owned());

        Self {
            bind_addr,
            environment,
            storage_backend,
            credentials_path,
            session_secret,
            log_level,
        }
    }
}
