use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::{ConsoleError, Result};

/// Main configuration structure for the inventory console
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Inventory service location
    #[serde(default)]
    pub server: ServerConfig,
    /// External metrics graphing tool
    #[serde(default)]
    pub graph: GraphConfig,
    /// Console behaviour
    #[serde(default)]
    pub console: ConsoleConfig,
}

/// Inventory service connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// URL scheme ("http" or "https")
    #[serde(default = "default_protocol")]
    pub protocol: String,
    /// Host name or address of the inventory service
    #[serde(default = "default_host")]
    pub host: String,
    /// Port of the inventory service
    #[serde(default = "default_port")]
    pub port: u16,
    /// Path prefix under which the inventory REST API is mounted
    #[serde(default = "default_base_path")]
    pub base_path: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            protocol: default_protocol(),
            host: default_host(),
            port: default_port(),
            base_path: default_base_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Port a development front-end listens on; the service itself is on 8080
const DEV_FRONTEND_PORT: u16 = 8003;

fn default_protocol() -> String {
    "http".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_base_path() -> String {
    "/hawkular/inventory".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl ServerConfig {
    /// Host actually contacted. A wildcard bind address is reached through
    /// loopback.
    pub fn effective_host(&self) -> &str {
        if self.host == "0.0.0.0" {
            "127.0.0.1"
        } else {
            &self.host
        }
    }

    /// Port actually contacted.
    pub fn effective_port(&self) -> u16 {
        if self.port == DEV_FRONTEND_PORT {
            default_port()
        } else {
            self.port
        }
    }

    /// Base URL of the inventory REST API, without a trailing slash
    pub fn base_url(&self) -> String {
        let path = self.base_path.trim_end_matches('/');
        let path = if path.is_empty() || path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };
        format!(
            "{}://{}:{}{}",
            self.protocol,
            self.effective_host(),
            self.effective_port(),
            path
        )
    }

    /// Build a server configuration from a full base URL such as
    /// `http://inventory.local:8080/hawkular/inventory`.
    pub fn from_url(raw: &str) -> Result<Self> {
        let url = Url::parse(raw)
            .map_err(|e| ConsoleError::Config(format!("Invalid server URL {raw}: {e}")))?;
        let host = url
            .host_str()
            .ok_or_else(|| ConsoleError::Config(format!("Server URL {raw} has no host")))?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| ConsoleError::Config(format!("Server URL {raw} has no port")))?;

        Ok(Self {
            protocol: url.scheme().to_string(),
            host: host.to_string(),
            port,
            base_path: url.path().trim_end_matches('/').to_string(),
            timeout_secs: default_timeout_secs(),
        })
    }
}

/// Metrics graphing tool configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GraphConfig {
    /// Base URL of the graphing tool (e.g., a Prometheus server)
    #[serde(default = "default_graph_base_url")]
    pub base_url: String,
    /// Time range shown when a graph is opened
    #[serde(default = "default_range_input")]
    pub range_input: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            base_url: default_graph_base_url(),
            range_input: default_range_input(),
        }
    }
}

fn default_graph_base_url() -> String {
    "http://localhost:9090".to_string()
}

fn default_range_input() -> String {
    "1h".to_string()
}

/// Console behaviour configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleConfig {
    /// Ask for confirmation before deleting
    #[serde(default = "default_confirm_deletes")]
    pub confirm_deletes: bool,
    /// Seconds an error notification stays visible in the TUI
    #[serde(default = "default_notification_secs")]
    pub notification_secs: u64,
    /// Directory for console data (log files)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            confirm_deletes: default_confirm_deletes(),
            notification_secs: default_notification_secs(),
            data_dir: default_data_dir(),
        }
    }
}

fn default_confirm_deletes() -> bool {
    true
}

fn default_notification_secs() -> u64 {
    10
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".inventory-console"))
        .unwrap_or_else(|| PathBuf::from(".inventory-console"))
}

impl Config {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| ConsoleError::Config(format!("Failed to parse config: {e}")))
    }

    /// Read and parse a configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConsoleError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Locations searched when no explicit config path is given
    pub fn default_paths() -> Vec<PathBuf> {
        [
            dirs::home_dir().map(|h| h.join(".inventory-console").join("config.toml")),
            dirs::config_dir().map(|c| c.join("inventory-console").join("config.toml")),
            Some(PathBuf::from("config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Load the configuration from an explicit path, the first existing
    /// default location, or fall back to defaults.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = config_path {
            tracing::info!("Loading config from: {}", path.display());
            return Self::from_file(path);
        }

        for path in Self::default_paths() {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(&path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }
}
