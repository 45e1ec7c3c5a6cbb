use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::aggregate::Granularity;
use crate::error::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Sales file used when `--file` is not given.
    #[serde(default)]
    pub data_file: Option<String>,
    #[serde(default = "default_granularity")]
    pub default_granularity: String,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_granularity() -> String {
    Granularity::Monthly.key().to_string()
}

fn default_top_n() -> usize {
    10
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: None,
            default_granularity: default_granularity(),
            top_n: default_top_n(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

impl Settings {
    /// Configured granularity, falling back to monthly if the file holds junk.
    pub fn granularity(&self) -> Granularity {
        self.default_granularity.parse().unwrap_or(Granularity::Monthly)
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("shopscope")
}

pub fn settings_path() -> PathBuf {
    std::env::var_os("SHOPSCOPE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|| config_dir().join("settings.json"))
}

pub fn load_settings_from(path: &Path) -> Settings {
    if path.exists() {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

pub fn save_settings_to(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| AppError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    save_settings_to(settings, &settings_path())
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            data_file: Some("/tmp/sales.csv".to_string()),
            default_granularity: "weekly".to_string(),
            top_n: 5,
            currency_symbol: "€".to_string(),
        };
        save_settings_to(&settings, &path).unwrap();
        let loaded = load_settings_from(&path);
        assert_eq!(loaded, settings);
        assert_eq!(loaded.granularity(), Granularity::Weekly);
    }

    #[test]
    fn test_load_returns_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let s = load_settings_from(&dir.path().join("nope.json"));
        assert!(s.data_file.is_none());
        assert_eq!(s.top_n, 10);
        assert_eq!(s.currency_symbol, "$");
        assert_eq!(s.granularity(), Granularity::Monthly);
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"data_file": "/tmp/sales.csv"}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.data_file.as_deref(), Some("/tmp/sales.csv"));
        assert_eq!(s.default_granularity, "monthly");
        assert_eq!(s.top_n, 10);
    }

    #[test]
    fn test_bad_granularity_falls_back() {
        let s = Settings {
            default_granularity: "fortnightly".to_string(),
            ..Settings::default()
        };
        assert_eq!(s.granularity(), Granularity::Monthly);
    }

    #[test]
    fn test_save_creates_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep").join("nested").join("settings.json");
        save_settings_to(&Settings::default(), &path).unwrap();
        assert!(path.exists());
    }
}
