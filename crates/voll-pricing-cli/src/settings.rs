//! CLI settings.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use voll_pricing_core::Currency;

/// Settings for the `voll` binary.
///
/// Loaded in this order (later sources override earlier):
/// 1. `voll.toml` in the working directory, or the file passed with `--config`
/// 2. Environment variables prefixed with `VOLL_` (e.g. `VOLL_OWNER_ID`)
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// JSON file backing saved calculations
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,
    /// Owner id snapshots are saved under
    #[serde(default = "default_owner_id")]
    pub owner_id: String,
    /// Default tracing filter when `VOLL_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Currency code shown next to amounts in table output
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
            owner_id: default_owner_id(),
            log_level: default_log_level(),
            currency: default_currency(),
        }
    }
}

impl Settings {
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) => File::with_name(p).required(true),
            None => File::with_name("voll").required(false),
        };

        let config = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("VOLL"))
            .build()?;

        config.try_deserialize()
    }

    pub fn currency(&self) -> Currency {
        self.currency.parse().unwrap_or_default()
    }
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("voll-snapshots.json")
}

fn default_owner_id() -> String {
    "local".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_currency() -> String {
    "BRL".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.owner_id, "local");
        assert_eq!(s.currency(), Currency::BRL);
        assert_eq!(s.snapshot_path, PathBuf::from("voll-snapshots.json"));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("voll-{}.toml", uuid::Uuid::new_v4()));
        fs::write(&path, "owner_id = \"studio-42\"\ncurrency = \"usd\"\n").unwrap();
        let s = Settings::load(path.to_str()).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(s.owner_id, "studio-42");
        assert_eq!(s.currency(), Currency::USD);
        assert_eq!(s.log_level, "warn");
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        assert!(Settings::load(Some("/no/such/voll-settings.toml")).is_err());
    }
}
