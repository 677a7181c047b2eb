//! Unified configuration for xplan front-ends.
//!
//! The [`XplanConfig`] has sections for the results backend, view defaults and
//! export defaults. It is stored in `~/.xplan/config.toml`; partial files are
//! fine, unspecified values use defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use xplan_core::CalculationBasis;

use crate::error::{Error, Result};
use crate::pagination::{DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};

/// Backend base URL used when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Main configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct XplanConfig {
    /// Results backend connection.
    pub api: ApiConfig,

    /// Results view defaults.
    pub view: ViewConfig,

    /// Clipboard export defaults.
    pub export: ExportConfig,
}

/// Results backend connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Retry once on transport errors and 5xx responses.
    pub retry_transient: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            retry_transient: true,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Results view defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub default_page_size: usize,
    pub default_basis: CalculationBasis,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            default_basis: CalculationBasis::Yearly,
        }
    }
}

/// Clipboard text format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Tab-separated values.
    #[default]
    Tsv,
    /// Pretty JSON.
    Json,
}

/// Clipboard export defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub default_format: ExportFormat,
}

impl XplanConfig {
    /// Get the default config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".xplan"))
    }

    /// Get the default config file path.
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Load configuration from the default location.
    ///
    /// Returns default config if file doesn't exist.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()
            .ok_or_else(|| Error::Config("could not determine config directory".to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        self.save_to(&path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Reject values the services cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(Error::Config("api.base_url is empty".to_string()));
        }
        if self.api.timeout_secs == 0 {
            return Err(Error::Config("api.timeout_secs must be positive".to_string()));
        }
        if !PAGE_SIZE_OPTIONS.contains(&self.view.default_page_size) {
            return Err(Error::Config(format!(
                "view.default_page_size must be one of {PAGE_SIZE_OPTIONS:?}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = XplanConfig::default();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
        assert!(config.api.retry_transient);
        assert_eq!(config.view.default_page_size, 25);
        assert_eq!(config.export.default_format, ExportFormat::Tsv);
    }

    #[test]
    fn test_partial_config_parsing() {
        let toml = r#"
            [api]
            base_url = "http://planner:8080/api"

            [view]
            default_basis = "NPV"
        "#;

        let config: XplanConfig = toml::from_str(toml).unwrap();

        assert_eq!(config.api.base_url, "http://planner:8080/api");
        assert_eq!(config.view.default_basis, CalculationBasis::Npv);

        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.view.default_page_size, 25);
    }

    #[test]
    fn test_save_and_load() {
        let file = NamedTempFile::new().unwrap();

        let mut config = XplanConfig::default();
        config.view.default_page_size = 50;
        config.export.default_format = ExportFormat::Json;
        config.save_to(file.path()).unwrap();

        let loaded = XplanConfig::load_from(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_page_size_rejected_on_load() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "[view]\ndefault_page_size = 30\n").unwrap();

        assert!(matches!(
            XplanConfig::load_from(file.path()),
            Err(Error::Config(_))
        ));
    }
}
