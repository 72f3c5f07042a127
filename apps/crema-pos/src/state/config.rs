//! # Configuration State
//!
//! Stores application configuration loaded at startup.
//!
//! ## Configuration Sources (Later Wins)
//! 1. Defaults (this file)
//! 2. Config file: `--config <path>`, or `config.toml` in the platform
//!    config directory
//! 3. Environment variables (`CREMA_*`)
//!
//! The merged result is validated before anything else starts.
//!
//! ## Config File
//! ```toml
//! store_name = "Crema on Fifth"
//! tax_rate_bps = 1000
//! fixtures_dir = "/srv/crema/fixtures"
//! ```
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crema_core::validation::validate_tax_rate_bps;
use crema_core::{TaxRate, DEFAULT_TAX_RATE_BPS};
use crema_store::StoreConfig;

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid config value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

impl ConfigError {
    fn invalid(key: &str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Application configuration.
///
/// TOML keys are snake_case; the `get_config` command returns camelCase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all(serialize = "camelCase", deserialize = "snake_case"))]
pub struct ConfigState {
    /// Store name (shown on receipts)
    pub store_name: String,

    /// Store address lines (for receipts)
    pub store_address: Vec<String>,

    /// Currency code (ISO 4217)
    pub currency_code: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Number of decimal places for currency
    pub currency_decimals: u8,

    /// Tax rate in basis points, e.g. 800 = 8%
    pub tax_rate_bps: u32,

    /// Directory of JSON fixtures. None seeds the embedded demo data.
    pub fixtures_dir: Option<PathBuf>,

    /// Result cap for product search.
    pub product_search_limit: usize,
}

impl Default for ConfigState {
    /// ## Default Values
    /// - Store: "Crema Coffee"
    /// - Currency: USD ($)
    /// - Tax: 8%
    /// - Fixtures: embedded
    fn default() -> Self {
        ConfigState {
            store_name: "Crema Coffee".to_string(),
            store_address: vec!["12 Roastery Lane".to_string()],
            currency_code: "USD".to_string(),
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
            tax_rate_bps: DEFAULT_TAX_RATE_BPS,
            fixtures_dir: None,
            product_search_limit: 20,
        }
    }
}

impl ConfigState {
    /// Loads configuration from every source and validates the result.
    ///
    /// An explicit path must exist. The platform default path is optional.
    pub async fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path).await?,
            None => match Self::default_path() {
                Some(path) => Self::from_file_if_present(&path).await?,
                None => ConfigState::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;

        info!(
            store = %config.store_name,
            tax_rate_bps = config.tax_rate_bps,
            fixtures_dir = ?config.fixtures_dir,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// `config.toml` in the platform config directory.
    ///
    /// - **macOS**: `~/Library/Application Support/com.crema.pos/config.toml`
    /// - **Windows**: `%APPDATA%\crema\pos\config\config.toml`
    /// - **Linux**: `~/.config/pos/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "crema", "pos").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Parses TOML over the defaults. Missing keys keep their default.
    pub fn from_toml_str(text: &str, path: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    async fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_toml_str(&text, &path.display().to_string())
    }

    async fn from_file_if_present(path: &Path) -> Result<Self, ConfigError> {
        match tokio::fs::metadata(path).await {
            Ok(_) => Self::from_file(path).await,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                Ok(ConfigState::default())
            }
            Err(source) => Err(ConfigError::Read {
                path: path.display().to_string(),
                source,
            }),
        }
    }

    /// Applies `CREMA_*` overrides.
    ///
    /// ## Environment Variables
    /// - `CREMA_STORE_NAME`: store name
    /// - `CREMA_TAX_RATE`: tax rate as a percentage (e.g., "8.25")
    /// - `CREMA_TAX_RATE_BPS`: tax rate in basis points (wins over `CREMA_TAX_RATE`)
    /// - `CREMA_CURRENCY_SYMBOL`: display symbol
    /// - `CREMA_FIXTURES_DIR`: fixtures directory
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup("CREMA_STORE_NAME") {
            self.store_name = name;
        }

        if let Some(pct) = lookup("CREMA_TAX_RATE") {
            let rate: f64 = pct
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid("CREMA_TAX_RATE", format!("'{}' is not a number", pct)))?;
            if !(0.0..=100.0).contains(&rate) {
                return Err(ConfigError::invalid("CREMA_TAX_RATE", "must be between 0 and 100"));
            }
            self.tax_rate_bps = TaxRate::from_percentage(rate).bps();
        }

        if let Some(bps) = lookup("CREMA_TAX_RATE_BPS") {
            self.tax_rate_bps = bps
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid("CREMA_TAX_RATE_BPS", format!("'{}' is not a whole number", bps)))?;
        }

        if let Some(symbol) = lookup("CREMA_CURRENCY_SYMBOL") {
            self.currency_symbol = symbol;
        }

        if let Some(dir) = lookup("CREMA_FIXTURES_DIR") {
            self.fixtures_dir = Some(PathBuf::from(dir)).filter(|p| !p.as_os_str().is_empty());
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_tax_rate_bps(self.tax_rate_bps)
            .map_err(|e| ConfigError::invalid("tax_rate_bps", e.to_string()))?;
        if self.store_name.trim().is_empty() {
            return Err(ConfigError::invalid("store_name", "must not be empty"));
        }
        if self.currency_decimals > 4 {
            return Err(ConfigError::invalid("currency_decimals", "at most 4"));
        }
        if self.product_search_limit == 0 {
            return Err(ConfigError::invalid("product_search_limit", "must be at least 1"));
        }
        Ok(())
    }

    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }

    /// How the store should be seeded.
    pub fn store_config(&self) -> StoreConfig {
        match &self.fixtures_dir {
            Some(dir) => StoreConfig::from_dir(dir),
            None => StoreConfig::new(),
        }
    }

    /// Formats a cent amount as a currency string.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(1296), "$12.96");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        let sign = if cents < 0 { "-" } else { "" };
        let magnitude = cents.unsigned_abs();

        if self.currency_decimals == 0 {
            return format!("{}{}{}", sign, self.currency_symbol, magnitude);
        }

        let scale = 10_u64.pow(u32::from(self.currency_decimals));
        format!(
            "{}{}{}.{:0width$}",
            sign,
            self.currency_symbol,
            magnitude / scale,
            magnitude % scale,
            width = usize::from(self.currency_decimals)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = ConfigState::default();
        config.validate().unwrap();
        assert_eq!(config.tax_rate().bps(), 800);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ConfigState::from_toml_str(
            "store_name = \"Crema on Fifth\"\ntax_rate_bps = 1000\n",
            "test.toml",
        )
        .unwrap();
        assert_eq!(config.store_name, "Crema on Fifth");
        assert_eq!(config.tax_rate_bps, 1000);
        assert_eq!(config.currency_symbol, "$");
        assert!(config.fixtures_dir.is_none());
    }

    #[test]
    fn test_bad_toml() {
        let err = ConfigState::from_toml_str("tax_rate_bps = \"lots\"", "bad.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ConfigState::default();
        config
            .apply_env(env(&[
                ("CREMA_STORE_NAME", "Night Owl"),
                ("CREMA_TAX_RATE", "8.25"),
                ("CREMA_FIXTURES_DIR", "/tmp/fixtures"),
            ]))
            .unwrap();
        assert_eq!(config.store_name, "Night Owl");
        assert_eq!(config.tax_rate_bps, 825);
        assert_eq!(config.fixtures_dir, Some(PathBuf::from("/tmp/fixtures")));

        config
            .apply_env(env(&[("CREMA_TAX_RATE_BPS", "1000")]))
            .unwrap();
        assert_eq!(config.tax_rate_bps, 1000);
    }

    #[test]
    fn test_env_rejects_garbage() {
        let mut config = ConfigState::default();
        assert!(config.apply_env(env(&[("CREMA_TAX_RATE", "eight")])).is_err());
        assert!(config.apply_env(env(&[("CREMA_TAX_RATE", "120")])).is_err());
    }

    #[test]
    fn test_validate_tax_ceiling() {
        let config = ConfigState {
            tax_rate_bps: 10_001,
            ..ConfigState::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(ConfigState::default()).unwrap();
        assert_eq!(json["taxRateBps"], 800);
        assert_eq!(json["storeName"], "Crema Coffee");
    }

    #[test]
    fn test_format_currency() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(1296), "$12.96");
        assert_eq!(config.format_currency(5), "$0.05");
        assert_eq!(config.format_currency(0), "$0.00");
        assert_eq!(config.format_currency(-2000), "-$20.00");

        let yen = ConfigState {
            currency_symbol: "¥".to_string(),
            currency_decimals: 0,
            ..ConfigState::default()
        };
        assert_eq!(yen.format_currency(450), "¥450");
    }

    #[tokio::test]
    async fn test_load_explicit_file() {
        let path = std::env::temp_dir().join(format!("crema-config-{}.toml", std::process::id()));
        tokio::fs::write(&path, "store_name = \"From File\"\n")
            .await
            .unwrap();

        let config = ConfigState::from_file(&path).await.unwrap();
        assert_eq!(config.store_name, "From File");

        tokio::fs::remove_file(&path).await.unwrap();
        assert!(matches!(
            ConfigState::load(Some(&path)).await,
            Err(ConfigError::Read { .. })
        ));
    }
}
