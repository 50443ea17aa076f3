//! Runtime settings: MapQuest API key and language preference.
//!
//! Loaded once at startup and handed to the resolver at construction; there
//! is no global state. A missing file or key is a valid configuration — the
//! provider just reports itself unavailable.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::fs;

/// Environment variable consulted before the config file.
pub const API_KEY_ENV: &str = "MAPQUEST_API_KEY";

#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub api_key: Option<String>,
    /// Ask the provider for English place names (Accept-Language header).
    pub prefer_english: bool,
}

#[derive(Deserialize, Default)]
struct SettingsFile {
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default)]
    prefer_english: bool,
}

impl Settings {
    /// Load from the environment and ~/.geostash/config.json.
    pub fn load() -> Self {
        Self::load_from(&Self::default_path())
    }

    /// Load from the environment and a specific config file. Missing or
    /// malformed files leave the defaults in place.
    pub fn load_from(path: &Path) -> Self {
        let file: SettingsFile = fs::read_to_string(path)
            .ok()
            .and_then(|data| serde_json::from_str(&data).ok())
            .unwrap_or_default();

        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty())
            .or(file.api_key);

        Settings {
            api_key,
            prefer_english: file.prefer_english,
        }
    }

    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".geostash")
            .join("config.json")
    }
}
