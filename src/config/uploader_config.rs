use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Serialize, Deserialize};

use crate::config::env_vars::{env_override, parse_unix_env_vars};
use crate::constants::{
    DEFAULT_CONNECTION_TIMEOUT_SECS, DEFAULT_SERVER_URL, ENV_PARENT_DIR, ENV_SERVER_URL,
    ERROR_NOTIFICATION_TIMEOUT_MS, LOCAL_ENTRY_BATCH_SIZE, SUCCESS_NOTIFICATION_TIMEOUT_MS,
};
use crate::notifications::NotificationTimeouts;
use crate::upload::capabilities::StaticCapabilities;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UploaderConfig {
    #[serde(default = "default_server_url")]
    pub server_url: String,
    /// Destination under the input directory when none is given; empty means the root
    #[serde(default)]
    pub default_parent_dir: String,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_batch_size")]
    pub local_batch_size: usize,
    #[serde(default = "default_success_timeout")]
    pub success_timeout_ms: u64,
    #[serde(default = "default_error_timeout")]
    pub error_timeout_ms: u64,
    #[serde(default)]
    pub capabilities: StaticCapabilities,
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_connect_timeout() -> u64 {
    DEFAULT_CONNECTION_TIMEOUT_SECS
}

fn default_batch_size() -> usize {
    LOCAL_ENTRY_BATCH_SIZE
}

fn default_success_timeout() -> u64 {
    SUCCESS_NOTIFICATION_TIMEOUT_MS
}

fn default_error_timeout() -> u64 {
    ERROR_NOTIFICATION_TIMEOUT_MS
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            default_parent_dir: String::new(),
            connect_timeout_secs: default_connect_timeout(),
            local_batch_size: default_batch_size(),
            success_timeout_ms: default_success_timeout(),
            error_timeout_ms: default_error_timeout(),
            capabilities: StaticCapabilities::default(),
        }
    }
}

impl UploaderConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: UploaderConfig = serde_yaml::from_str(&content)
            .context("Failed to parse YAML config")?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save_to_yaml_file(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self)
            .context("Failed to serialize config to YAML")?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .context(format!("Failed to create config directory {}", parent.display()))?;
        }

        fs::write(path, yaml)
            .context(format!("Failed to write config to {}", path.display()))?;

        info!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Create a default configuration YAML file
    pub fn create_default_config_file(path: &Path) -> Result<()> {
        UploaderConfig::default().save_to_yaml_file(path)
    }

    /// Apply `COMFY_UPLOAD_*` overrides and expand variables in the server URL
    pub fn process_environment_variables(&mut self) {
        if let Some(server) = env_override(ENV_SERVER_URL) {
            debug!("Server URL overridden by {}", ENV_SERVER_URL);
            self.server_url = server;
        }
        if let Some(parent) = env_override(ENV_PARENT_DIR) {
            debug!("Default parent directory overridden by {}", ENV_PARENT_DIR);
            self.default_parent_dir = parent;
        }
        if self.server_url.contains('$') {
            self.server_url = parse_unix_env_vars(&self.server_url);
        }
        self.server_url = self.server_url.trim_end_matches('/').to_string();
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn notification_timeouts(&self) -> NotificationTimeouts {
        NotificationTimeouts {
            success: Duration::from_millis(self.success_timeout_ms),
            error: Duration::from_millis(self.error_timeout_ms),
        }
    }
}

/// Load the configuration at `config_path`, writing a default file there if
/// none exists. Without a path the built-in defaults are used. Environment
/// overrides are applied in both cases.
pub fn load_or_create_config(config_path: Option<&Path>) -> Result<UploaderConfig> {
    let mut config = match config_path {
        Some(path) if path.exists() => UploaderConfig::from_yaml_file(path)?,
        Some(path) => {
            info!("Creating default config at {}", path.display());
            let default_config = UploaderConfig::default();
            default_config.save_to_yaml_file(path)?;
            default_config
        }
        None => {
            info!("No config path provided, using default configuration");
            UploaderConfig::default()
        }
    };

    config.process_environment_variables();
    Ok(config)
}
