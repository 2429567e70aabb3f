//! Application settings.
//!
//! Settings are stored as TOML with kebab-case keys:
//!
//! ```toml
//! [api]
//! base-url = "https://quality.example.com"
//!
//! [logging]
//! enabled = true
//! level = "info"
//! max-files = 3
//! directory = "logs"
//! ```
//!
//! The API token is read from the file but never written back; saving a
//! settings struct leaves the token line out entirely.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::helpers::{load_toml, save_toml};
use anyhow::Error;

pub const SETTINGS_PATH: &str = "Settings.toml";

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Settings {
    pub api: ApiSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Settings, Error> {
        load_toml(path)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        save_toml(self, path)
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ApiSettings {
    /// Base URL of the dashboard server.
    pub base_url: String,
    /// Bearer token for authenticated servers. Read-only: deliberately
    /// skipped on serialization so it never lands in a freshly saved file.
    #[serde(skip_serializing)]
    pub token: Option<SecretString>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: "http://localhost:9000".to_string(),
            token: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LoggingSettings {
    pub enabled: bool,
    pub level: String,
    pub max_files: usize,
    pub directory: PathBuf,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            enabled: true,
            level: "info".to_string(),
            max_files: 3,
            directory: PathBuf::from("logs"),
        }
    }
}
