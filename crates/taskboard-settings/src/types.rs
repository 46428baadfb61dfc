//! Settings types.
//!
//! Every struct uses `#[serde(default)]` so a settings file only needs the
//! keys it overrides.

use std::fmt;

use serde::{Deserialize, Serialize};
use taskboard_core::logging::LogFormat;

/// Root settings object.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskboardSettings {
    /// HTTP listener.
    pub server: ServerSettings,
    /// Store connection and bootstrap.
    pub database: DatabaseSettings,
    /// Log output.
    pub logging: LoggingSettings,
    /// Presentation client.
    pub client: ClientSettings,
}

/// HTTP listener settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// Store settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatabaseSettings {
    /// Directory hosting the database files.
    pub host: String,
    /// Account name. Recorded only; the embedded store has no accounts.
    pub user: String,
    /// Account password. Recorded only, never logged.
    pub password: String,
    /// Database name (file stem under `host`).
    pub name: String,
    /// Maximum pooled connections.
    pub pool_size: u32,
    /// How long a request waits for a pooled connection, in seconds.
    pub pool_timeout_secs: u64,
    /// Fixed delay between schema initialization attempts, in milliseconds.
    pub init_retry_ms: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            host: "mysql".to_string(),
            user: "root".to_string(),
            password: "password".to_string(),
            name: "tasksdb".to_string(),
            pool_size: 10,
            pool_timeout_secs: 30,
            init_retry_ms: 5000,
        }
    }
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("pool_size", &self.pool_size)
            .field("pool_timeout_secs", &self.pool_timeout_secs)
            .field("init_retry_ms", &self.init_retry_ms)
            .finish()
    }
}

/// Log output settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

/// Presentation client settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientSettings {
    /// Base URL of the API, including the `/api` prefix.
    pub api_url: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000/api".to_string(),
        }
    }
}
