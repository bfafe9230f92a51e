//! CLI configuration file
//!
//! ```toml
//! [logging]
//! filter = "info,tablewright_table_designer=debug"
//! json = true
//!
//! [designer]
//! alter_strategy = "minimal"
//!
//! [[connections]]
//! name = "local"
//! host = "127.0.0.1"
//! user = "root"
//! password_env = "LOCAL_MYSQL_PASSWORD"
//! database = "shop"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tablewright_driver_mysql::MySqlConnectOptions;
use tablewright_table_designer::AlterStrategy;

use crate::logging::LoggingConfig;

/// Default location of the configuration file
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tablewright").join("config.toml"))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingSection,
    pub designer: DesignerSection,
    pub connections: Vec<ConnectionProfile>,
}

/// `[logging]`; unset fields fall back to the build's preset
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub filter: Option<String>,
    pub json: Option<bool>,
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DesignerSection {
    pub alter_strategy: AlterStrategy,
}

/// A named server to connect to
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionProfile {
    pub name: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    /// Environment variable holding the password
    pub password_env: Option<String>,
    pub database: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3306
}

impl Default for ConnectionProfile {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            host: default_host(),
            port: default_port(),
            user: None,
            password: None,
            password_env: None,
            database: None,
        }
    }
}

impl ConnectionProfile {
    /// Connect options, with `password_override` taking precedence over the profile
    pub fn connect_options(&self, password_override: Option<&str>) -> MySqlConnectOptions {
        let password = password_override
            .map(str::to_string)
            .or_else(|| {
                self.password_env
                    .as_deref()
                    .and_then(|var| std::env::var(var).ok())
            })
            .or_else(|| self.password.clone());

        MySqlConnectOptions {
            host: self.host.clone(),
            port: self.port,
            user: self.user.clone(),
            password,
            database: self.database.clone(),
        }
    }
}

impl Config {
    /// Load from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// The named profile, or the first one when no name is given
    pub fn connection(&self, name: Option<&str>) -> Result<ConnectionProfile> {
        match name {
            Some(name) => self
                .connections
                .iter()
                .find(|c| c.name == name)
                .cloned()
                .with_context(|| format!("No connection named '{}' in the config file", name)),
            None => Ok(self.connections.first().cloned().unwrap_or_default()),
        }
    }

    /// Logging settings: the build preset with the file's overrides applied
    pub fn logging_config(&self) -> LoggingConfig {
        let mut config = if cfg!(debug_assertions) {
            LoggingConfig::development()
        } else {
            LoggingConfig::production()
        };
        if let Some(filter) = &self.logging.filter {
            config.default_filter = filter.clone();
        }
        if let Some(json) = self.logging.json {
            config.enable_json_logs = json;
        }
        if let Some(log_dir) = &self.logging.log_dir {
            config.log_dir = log_dir.clone();
        }
        config
    }
}
