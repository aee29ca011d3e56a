//! CLI configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use market_cart::{CartStoreConfig, DEFAULT_STORAGE_KEY};
use serde::{Deserialize, Serialize};

/// Config file names searched for, in order, walking up from the cwd.
pub const CONFIG_NAMES: [&str; 3] = ["cart.toml", ".cart.toml", "cart.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Where the cart is persisted.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Settings for the cart store itself.
    pub fn store_config(&self) -> CartStoreConfig {
        CartStoreConfig::default().with_storage_key(self.storage.key.clone())
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "json")
}

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the cart file (default: the user data directory).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// Key the cart is stored under.
    #[serde(default = "default_key")]
    pub key: String,
}

fn default_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: None,
            key: default_key(),
        }
    }
}

/// Default storage directory: `<data dir>/market-cart`.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("market-cart")
}

/// Generate a default cart.toml config file.
pub fn generate_default_config() -> String {
    format!(
        r#"# Market cart configuration

[storage]
# dir = "{dir}"
key = "{key}"
"#,
        dir = default_data_dir().display(),
        key = DEFAULT_STORAGE_KEY,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: CliConfig = toml::from_str("").unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.storage.key, "cart.products");
        assert_eq!(config.storage.dir, None);
    }

    #[test]
    fn test_generated_config_parses() {
        let config: CliConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.storage.key, DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn test_load_toml_and_json() {
        let tmp = tempfile::tempdir().unwrap();

        let toml_path = tmp.path().join("cart.toml");
        std::fs::write(&toml_path, "[storage]\ndir = \"/data/cart\"\nkey = \"k1\"\n").unwrap();
        let config = CliConfig::load(&toml_path).unwrap();
        assert_eq!(config.storage.dir, Some(PathBuf::from("/data/cart")));
        assert_eq!(config.store_config().storage_key, "k1");

        let json_path = tmp.path().join("cart.json");
        std::fs::write(&json_path, r#"{"storage":{"key":"k2"}}"#).unwrap();
        let config = CliConfig::load(&json_path).unwrap();
        assert_eq!(config.storage.key, "k2");
    }

    #[test]
    fn test_load_reports_bad_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("cart.toml");
        std::fs::write(&path, "[storage\n").unwrap();
        let err = CliConfig::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse TOML config"));
    }
}
