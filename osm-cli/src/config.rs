use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use osm_core::{OptFn, with_locale, with_user_agent};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

/// Persistent defaults stored on disk.
///
/// Example TOML:
/// ```toml
/// locale = "de"
/// user_agent = "my-app/1.0 (me@example.org)"
/// base_url = "http://localhost:8080/"
/// timeout_secs = 10
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Default `Accept-Language` for every request.
    pub locale: Option<String>,

    /// Default `User-Agent` for every request.
    pub user_agent: Option<String>,

    /// Nominatim deployment; the public instance when absent.
    pub base_url: Option<String>,

    /// Per-call timeout in seconds; no timeout when absent.
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("org", "openstreetmap", "osm-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Option mutations for the stored defaults. Callers append their own
    /// afterwards so that later values win.
    pub fn opts(&self) -> Vec<OptFn> {
        let mut opts = Vec::new();
        if let Some(locale) = &self.locale {
            opts.push(with_locale(locale.clone()));
        }
        if let Some(user_agent) = &self.user_agent {
            opts.push(with_user_agent(user_agent.clone()));
        }
        opts
    }
}
