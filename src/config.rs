//! Configuration module
//!
//! Settings are read from a TOML file (default
//! `~/.config/user-admin/config.toml`). Every section and key is optional;
//! missing values fall back to the defaults below.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [database]
//! url = "sqlite://./users.db?mode=rwc"
//!
//! [logging]
//! level = "info"
//! format = "json"
//!
//! [admin]
//! name = "admin"
//! email = "admin@example.com"
//! password = "admin"
//!
//! [security]
//! bcrypt_cost = 12
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::infrastructure::crypto::password::{DEFAULT_COST, MIN_COST};
use crate::infrastructure::DatabaseConfig;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "USER_ADMIN_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub logging: LoggingConfig,
    pub admin: AdminConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout: 30,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        let db = DatabaseConfig::default();
        Self {
            url: db.url,
            max_connections: db.max_connections,
        }
    }
}

impl DatabaseSection {
    pub fn connection_url(&self) -> &str {
        &self.url
    }
}

impl From<&DatabaseSection> for DatabaseConfig {
    fn from(section: &DatabaseSection) -> Self {
        DatabaseConfig {
            url: section.url.clone(),
            max_connections: section.max_connections,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace, debug, info, warn, error (or any EnvFilter directive)
    pub level: String,
    /// "text" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

/// Account created on first start when the users table is empty
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            name: "admin".to_string(),
            email: "admin@example.com".to_string(),
            password: "admin".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub bcrypt_cost: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: DEFAULT_COST,
        }
    }
}

impl AppConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_COST..=31).contains(&self.security.bcrypt_cost) {
            return Err(ConfigError::Invalid(format!(
                "security.bcrypt_cost must be between {} and 31, got {}",
                MIN_COST, self.security.bcrypt_cost
            )));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        if self.admin.name.is_empty() || self.admin.password.is_empty() {
            return Err(ConfigError::Invalid(
                "admin.name and admin.password must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Config path from `USER_ADMIN_CONFIG`, else `~/.config/user-admin/config.toml`.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("user-admin")
        .join("config.toml")
}
