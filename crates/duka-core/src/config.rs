//! Application configuration
//!
//! Layered: built-in defaults, then an optional TOML file, then environment
//! variables. The CLI applies its own flags last.

use crate::error::ConfigError;
use duka_directory::StubLatency;
use duka_inventory::GeneratorConfig;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Full configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DukaConfig {
    pub server: ServerConfig,
    pub generator: GeneratorConfig,
    pub latency: LatencyConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
    /// Seconds a session may sit unused before it is dropped
    pub session_idle_secs: u64,
    /// Upper bound on live sessions
    pub max_sessions: u64,
}

impl ServerConfig {
    #[inline]
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    #[inline]
    #[must_use]
    pub fn session_idle(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
            session_idle_secs: 30 * 60,
            max_sessions: 10_000,
        }
    }
}

/// Simulated delay of the stub sources, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatencyConfig {
    pub buildings_ms: u64,
    pub stores_ms: u64,
}

impl LatencyConfig {
    #[inline]
    #[must_use]
    pub fn stub_latency(&self) -> StubLatency {
        StubLatency::from_millis(self.buildings_ms, self.stores_ms)
    }
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            buildings_ms: 800,
            stores_ms: 600,
        }
    }
}

impl DukaConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With listen port
    #[inline]
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.server.port = port;
        self
    }

    /// With stub latency
    #[inline]
    #[must_use]
    pub fn with_latency(mut self, buildings_ms: u64, stores_ms: u64) -> Self {
        self.latency = LatencyConfig {
            buildings_ms,
            stores_ms,
        };
        self
    }

    /// With generator settings
    #[inline]
    #[must_use]
    pub fn with_generator(mut self, generator: GeneratorConfig) -> Self {
        self.generator = generator;
        self
    }

    /// Defaults, overlaid by `path` if given, overlaid by the process environment
    ///
    /// # Errors
    /// The file cannot be read or parsed, or an environment value is malformed
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;

        if config.generator.api_key.is_none() {
            tracing::warn!("no API key configured, every catalogue will be the fallback");
        }
        Ok(config)
    }

    /// Parse a TOML file; missing sections keep their defaults
    ///
    /// # Errors
    /// [`ConfigError::Read`] or [`ConfigError::Parse`]
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overlay values from an environment lookup
    ///
    /// `GEMINI_API_KEY` wins over `API_KEY`. Empty values are ignored.
    ///
    /// # Errors
    /// [`ConfigError::Invalid`] when a numeric or address value does not parse
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(bind) = parse_var(&get, "DUKA_BIND")? {
            self.server.bind = bind;
        }
        if let Some(port) = parse_var(&get, "DUKA_PORT")? {
            self.server.port = port;
        }
        if let Some(secs) = parse_var(&get, "DUKA_SESSION_IDLE_SECS")? {
            self.server.session_idle_secs = secs;
        }
        if let Some(max) = parse_var(&get, "DUKA_MAX_SESSIONS")? {
            self.server.max_sessions = max;
        }
        if let Some(model) = get("DUKA_MODEL") {
            self.generator.model = model;
        }
        if let Some(url) = get("DUKA_BASE_URL") {
            self.generator.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(key) = get("GEMINI_API_KEY").or_else(|| get("API_KEY")) {
            self.generator.api_key = Some(key);
        }
        if let Some(timeout) = parse_var(&get, "DUKA_TIMEOUT_MS")? {
            self.generator.timeout_ms = timeout;
        }
        if let Some(ms) = parse_var(&get, "DUKA_BUILDINGS_LATENCY_MS")? {
            self.latency.buildings_ms = ms;
        }
        if let Some(ms) = parse_var(&get, "DUKA_STORES_LATENCY_MS")? {
            self.latency.stores_ms = ms;
        }
        Ok(())
    }
}

fn parse_var<T, G>(get: &G, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    G: Fn(&str) -> Option<String>,
{
    let Some(value) = get(key) else {
        return Ok(None);
    };

    value.trim().parse().map(Some).map_err(|e| {
        tracing::warn!("Invalid {key} value: {e}");
        ConfigError::Invalid { key, value }
    })
}
