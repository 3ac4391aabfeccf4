use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.exchangerate-api.com/v4/latest";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    /// Sent as a bearer token when present.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Request timeout. The HTTP client default applies when unset.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DefaultsConfig {
    pub from: String,
    pub to: String,
    pub amount: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        DefaultsConfig {
            from: "USD".to_string(),
            to: "EUR".to_string(),
            amount: "1".to_string(),
        }
    }
}

fn default_currencies() -> Vec<String> {
    [
        "USD", "EUR", "GBP", "JPY", "INR", "AUD", "CAD", "CHF", "CNY", "SGD",
    ]
    .iter()
    .map(|c| c.to_string())
    .collect()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default = "default_currencies")]
    pub currencies: Vec<String>,
    /// Delay before an amount edit triggers a conversion; 0 converts on every keystroke.
    #[serde(default)]
    pub debounce_ms: u64,
    pub data_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            provider: ProviderConfig::default(),
            defaults: DefaultsConfig::default(),
            currencies: default_currencies(),
            debounce_ms: 0,
            data_path: None,
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, falling back to built-in
    /// defaults when no config file has been created yet.
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
        let proj_dirs = ProjectDirs::from("in", "codito", "fxconv")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("in", "codito", "fxconv")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
provider:
  base_url: "http://example.com/latest"
  api_key: "secret"
defaults:
  from: "GBP"
  to: "INR"
  amount: "25"
currencies: ["GBP", "INR", "USD"]
debounce_ms: 250
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.provider.base_url, "http://example.com/latest");
        assert_eq!(config.provider.api_key.as_deref(), Some("secret"));
        assert!(config.provider.timeout_secs.is_none());
        assert_eq!(config.defaults.from, "GBP");
        assert_eq!(config.defaults.to, "INR");
        assert_eq!(config.defaults.amount, "25");
        assert_eq!(config.currencies, vec!["GBP", "INR", "USD"]);
        assert_eq!(config.debounce_ms, 250);
        assert!(config.data_path.is_none());
    }

    #[test]
    fn test_config_defaults_for_missing_sections() {
        let config: AppConfig = serde_yaml::from_str("data_path: /tmp/fx").unwrap();
        assert_eq!(config.provider.base_url, DEFAULT_BASE_URL);
        assert!(config.provider.api_key.is_none());
        assert_eq!(config.defaults.from, "USD");
        assert_eq!(config.defaults.to, "EUR");
        assert_eq!(config.defaults.amount, "1");
        assert!(config.currencies.contains(&"USD".to_string()));
        assert_eq!(config.debounce_ms, 0);
        assert_eq!(
            config.default_data_path().unwrap(),
            PathBuf::from("/tmp/fx")
        );
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::load_from_path(dir.path().join("missing.yaml"));
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }
}
