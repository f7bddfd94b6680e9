use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "http://api.exchangeratesapi.io";
pub const DEFAULT_BASE: &str = "EUR";
pub const DEFAULT_CURRENCIES: [&str; 5] = ["RUB", "BYN", "USD", "CNY", "TRY"];

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub access_key: String,
    #[serde(default)]
    pub retries: usize,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            base_url: default_base_url(),
            access_key: String::new(),
            retries: 0,
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default = "default_base")]
    pub base: String,
    #[serde(default = "default_currencies")]
    pub currencies: Vec<String>,
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    #[serde(default = "default_highlight_ms")]
    pub highlight_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            provider: ProviderConfig::default(),
            base: default_base(),
            currencies: default_currencies(),
            refresh_interval_secs: default_refresh_interval_secs(),
            highlight_ms: default_highlight_ms(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_base() -> String {
    DEFAULT_BASE.to_string()
}

fn default_currencies() -> Vec<String> {
    DEFAULT_CURRENCIES.iter().map(|c| c.to_string()).collect()
}

fn default_refresh_interval_secs() -> u64 {
    600
}

fn default_highlight_ms() -> u64 {
    1000
}

impl AppConfig {
    /// Loads the config from the default location, falling back to built-in
    /// defaults when no file has been created yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using built-in defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "fxboard", "fxboard")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config.validate()?;
        debug!("Successfully loaded config");
        Ok(config.normalized())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn highlight_delay(&self) -> Duration {
        Duration::from_millis(self.highlight_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.refresh_interval_secs == 0 {
            anyhow::bail!("refresh_interval_secs must be greater than zero");
        }
        if self.currencies.is_empty() {
            anyhow::bail!("At least one currency must be configured");
        }
        if self.base.trim().is_empty() {
            anyhow::bail!("Base currency must not be empty");
        }
        Ok(())
    }

    fn normalized(mut self) -> Self {
        self.base = self.base.trim().to_uppercase();
        self.currencies = self
            .currencies
            .iter()
            .map(|c| c.trim().to_uppercase())
            .collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
provider:
  base_url: "http://example.com/rates"
  access_key: "secret"
  retries: 2
base: "eur"
currencies: ["usd", "RUB"]
refresh_interval_secs: 60
"#;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(yaml_str.as_bytes()).unwrap();

        let config = AppConfig::load_from_path(file.path()).expect("Failed to load");
        assert_eq!(config.provider.base_url, "http://example.com/rates");
        assert_eq!(config.provider.access_key, "secret");
        assert_eq!(config.provider.retries, 2);
        assert_eq!(config.provider.retry_delay_ms, 1000);
        assert_eq!(config.base, "EUR");
        assert_eq!(config.currencies, vec!["USD", "RUB"]);
        assert_eq!(config.refresh_interval(), Duration::from_secs(60));
        assert_eq!(config.highlight_delay(), Duration::from_millis(1000));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.currencies, DEFAULT_CURRENCIES);
        assert_eq!(config.refresh_interval(), Duration::from_secs(600));
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"refresh_interval_secs: 0\n").unwrap();

        let err = AppConfig::load_from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("refresh_interval_secs"));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = AppConfig::load_from_path("/nonexistent/fxboard.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
