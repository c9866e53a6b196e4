//! Configuration management for Corrente.
//!
//! Loads configuration from ${CORRENTE_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable overriding the API base URL.
pub const API_URL_ENV: &str = "CORRENTE_API_URL";
/// Environment variable overriding the CEP lookup base URL.
pub const CEP_URL_ENV: &str = "CORRENTE_CEP_URL";

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for Corrente configuration and data directories.
    //!
    //! CORRENTE_HOME resolution order:
    //! 1. CORRENTE_HOME environment variable (if set)
    //! 2. ~/.config/corrente (default)

    use std::path::PathBuf;

    /// Returns the Corrente home directory.
    pub fn corrente_home() -> PathBuf {
        if let Ok(home) = std::env::var("CORRENTE_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".corrente"),
            |h| h.join(".config").join("corrente"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        corrente_home().join("config.toml")
    }

    /// Returns the path of the persisted session (token + user).
    pub fn session_path() -> PathBuf {
        corrente_home().join("session.json")
    }

    /// Returns the directory for rolling log files.
    pub fn logs_dir() -> PathBuf {
        corrente_home().join("logs")
    }
}

/// Session bootstrap policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Clear stored credentials when the startup profile check fails.
    pub logout_on_failed_revalidation: bool,
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API base URL (env `CORRENTE_API_URL` wins).
    pub api_url: Option<String>,

    /// CEP lookup base URL (env `CORRENTE_CEP_URL` wins).
    pub cep_lookup_url: Option<String>,

    /// Rows per page in list screens.
    pub page_size: usize,

    /// Request timeout in seconds (0 disables)
    pub request_timeout_secs: u32,

    #[serde(default)]
    pub session: SessionConfig,
}

impl Config {
    pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";
    pub const DEFAULT_CEP_LOOKUP_URL: &str = "https://viacep.com.br/ws";
    pub const DEFAULT_PAGE_SIZE: usize = 10;

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        if self.request_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(u64::from(self.request_timeout_secs)))
        }
    }

    /// Page size used by list screens; never zero.
    pub fn effective_page_size(&self) -> usize {
        self.page_size.max(1)
    }

    /// Resolves the API base URL with precedence: env > config > default.
    pub fn resolve_api_url(&self) -> Result<String> {
        resolve_base_url(
            self.api_url.as_deref(),
            API_URL_ENV,
            Self::DEFAULT_API_URL,
            "API",
        )
    }

    /// Resolves the CEP lookup URL with precedence: env > config > default.
    pub fn resolve_cep_lookup_url(&self) -> Result<String> {
        resolve_base_url(
            self.cep_lookup_url.as_deref(),
            CEP_URL_ENV,
            Self::DEFAULT_CEP_LOOKUP_URL,
            "CEP lookup",
        )
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            cep_lookup_url: None,
            page_size: Self::DEFAULT_PAGE_SIZE,
            request_timeout_secs: 0,
            session: SessionConfig::default(),
        }
    }
}

/// Resolves a base URL with precedence: env > config > default.
///
/// Trailing slashes are stripped so paths can be appended verbatim.
///
/// # Errors
/// Returns an error if the env or config value is not a valid URL.
pub fn resolve_base_url(
    config_base_url: Option<&str>,
    env_var: &str,
    default_url: &str,
    label: &str,
) -> Result<String> {
    let env_value = std::env::var(env_var).ok();
    let candidates = [env_value.as_deref(), config_base_url];

    for candidate in candidates.into_iter().flatten() {
        let trimmed = candidate.trim();
        if !trimmed.is_empty() {
            url::Url::parse(trimmed)
                .with_context(|| format!("Invalid {label} base URL: {trimmed}"))?;
            return Ok(trimmed.trim_end_matches('/').to_string());
        }
    }

    Ok(default_url.to_string())
}
