use std::time::Duration;
use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::providers::nbp;

pub const DEFAULT_MAX_RANGE_DAYS: i64 = 93;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NbpProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub nbp: Option<NbpProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            nbp: Some(NbpProviderConfig {
                base_url: nbp::DEFAULT_BASE_URL.to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Longest allowed request window; the upstream rejects longer spans.
    #[serde(default = "default_max_range_days")]
    pub max_range_days: i64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Rate cache location, defaults to the platform data directory.
    #[serde(default)]
    pub data_path: Option<String>,
    /// Default chart output path when the command line gives none.
    #[serde(default)]
    pub chart_path: Option<String>,
}

fn default_max_range_days() -> i64 {
    DEFAULT_MAX_RANGE_DAYS
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            providers: ProvidersConfig::default(),
            max_range_days: DEFAULT_MAX_RANGE_DAYS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            data_path: None,
            chart_path: None,
        }
    }
}

impl AppConfig {
    /// Loads the default config file, falling back to built-in defaults when
    /// none exists. Every option has a usable default, so a missing file is
    /// not an error.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config file at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        Ok(project_dirs()?.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn nbp_base_url(&self) -> &str {
        self.providers
            .nbp
            .as_ref()
            .map_or(nbp::DEFAULT_BASE_URL, |p| &p.base_url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("io", "ratescope", "ratescope")
        .context("Could not determine project directories")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_gets_all_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").expect("Failed to deserialize");
        assert_eq!(config.max_range_days, 93);
        assert_eq!(config.request_timeout_secs, 60);
        assert_eq!(config.nbp_base_url(), "https://api.nbp.pl");
        assert!(config.data_path.is_none());
        assert!(config.chart_path.is_none());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let yaml_str = r#"
providers:
  nbp:
    base_url: "http://localhost:9000"
max_range_days: 31
request_timeout_secs: 5
data_path: "/tmp/rates"
chart_path: "out.svg"
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.nbp_base_url(), "http://localhost:9000");
        assert_eq!(config.max_range_days, 31);
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.data_path.as_deref(), Some("/tmp/rates"));
        assert_eq!(config.chart_path.as_deref(), Some("out.svg"));
    }

    #[test]
    fn trailing_base_url_slash_is_tolerated_by_default() {
        let config = AppConfig::default();
        assert!(!config.nbp_base_url().ends_with('/'));
    }
}
