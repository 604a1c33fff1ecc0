//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `arthur.toml` in the working directory. Every field has a
//! default so the file is optional; out of the box the daemon runs on the
//! virtual model and store. Environment variables take precedence over file
//! values.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use arthur_adapter_firebase::FirebaseConfig;
use arthur_adapter_gemini::GeminiConfig;
use arthur_domain::device::DeviceKind;
use arthur_domain::state::StateLayout;
use arthur_domain::time::{self, millis};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Language-model backend.
    pub model: ModelConfig,
    /// Device-state store backend.
    pub state_store: StateStoreConfig,
    /// Per-device cool-downs.
    pub debounce: DebounceConfig,
    /// Write timeout and store layout.
    pub dispatch: DispatchConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelBackendKind {
    Gemini,
    #[default]
    Virtual,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub backend: ModelBackendKind,
    pub gemini: GeminiConfig,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackendKind {
    Firebase,
    Sqlite,
    #[default]
    Virtual,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StateStoreConfig {
    pub backend: StoreBackendKind,
    pub firebase: FirebaseConfig,
    pub sqlite: SqliteConfig,
}

/// Local `SQLite` store configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SqliteConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Longest accepted cool-down: one day.
pub const MAX_COOLDOWN_MS: u64 = 86_400_000;

/// Cool-down per device in milliseconds. `0` disables the cool-down.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DebounceConfig {
    pub lock_ms: u64,
    pub switch_ms: u64,
    pub blinds_ms: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Upper bound on a single store write.
    pub timeout_ms: u64,
    /// First path segment of every state path.
    pub root: String,
    /// Node renames, e.g. `lock = "front-door"`.
    pub nodes: BTreeMap<DeviceKind, String>,
}

impl Config {
    /// Load configuration from `arthur.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("arthur.toml")?;
        config.apply_env_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("ARTHUR_HOST") {
            self.server.host = val;
        }
        if let Some(port) = var("ARTHUR_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = var("ARTHUR_BIND")
            && let Some((host, port)) = val.rsplit_once(':')
        {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("ARTHUR_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("ARTHUR_GEMINI_API_KEY").or_else(|| var("GEMINI_API_KEY")) {
            self.model.gemini.api_key = val;
        }
        if let Some(val) = var("ARTHUR_FIREBASE_URL") {
            self.state_store.firebase.database_url = val;
        }
        if let Some(val) = var("ARTHUR_FIREBASE_AUTH") {
            self.state_store.firebase.auth = Some(val);
        }
        if let Some(val) = var("ARTHUR_DATABASE_URL") {
            self.state_store.sqlite.url = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.model.backend == ModelBackendKind::Gemini
            && self.model.gemini.api_key.trim().is_empty()
        {
            return Err(ConfigError::Validation(
                "gemini backend requires an api key".to_string(),
            ));
        }
        if self.state_store.backend == StoreBackendKind::Firebase
            && self.state_store.firebase.database_url.trim().is_empty()
        {
            return Err(ConfigError::Validation(
                "firebase backend requires a database url".to_string(),
            ));
        }
        if let Some(device) = DeviceKind::ALL
            .into_iter()
            .find(|device| self.debounce.ms_for(*device) > MAX_COOLDOWN_MS)
        {
            return Err(ConfigError::Validation(format!(
                "{device} cool-down exceeds {MAX_COOLDOWN_MS} ms"
            )));
        }
        if self.dispatch.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "dispatch timeout must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl DebounceConfig {
    /// Configured cool-down for `device`; `None` when disabled.
    #[must_use]
    pub fn cooldown(&self, device: DeviceKind) -> Option<time::Duration> {
        let ms = self.ms_for(device);
        (ms > 0).then(|| millis(ms))
    }

    fn ms_for(&self, device: DeviceKind) -> u64 {
        match device {
            DeviceKind::Lock => self.lock_ms,
            DeviceKind::Switch => self.switch_ms,
            DeviceKind::Blinds => self.blinds_ms,
        }
    }
}

impl DispatchConfig {
    #[must_use]
    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    #[must_use]
    pub fn layout(&self) -> StateLayout {
        StateLayout {
            root: self.root.clone(),
            nodes: self.nodes.clone(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "arthurd=info,arthur=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:arthur.db?mode=rwc".to_string(),
        }
    }
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            lock_ms: 3000,
            switch_ms: 0,
            blinds_ms: 0,
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        let layout = StateLayout::default();
        Self {
            timeout_ms: 10_000,
            root: layout.root,
            nodes: layout.nodes,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
