use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use toml;

const DEFAULT_API_ROOT: &str = "https://api.nasa.gov/EPIC/api";
const DEFAULT_ARCHIVE_ROOT: &str = "https://epic.gsfc.nasa.gov/archive";
const DEFAULT_API_KEY: &str = "DEMO_KEY";
const API_KEY_ENV: &str = "NASA_API_KEY";

/// Endpoints and credentials for the EPIC services. Everything has a working
/// default; the `NASA_API_KEY` environment variable beats the file's key.
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct Config {
    #[serde(default = "default_api_root")]
    pub api_root: String,
    #[serde(default = "default_archive_root")]
    pub archive_root: String,
    #[serde(default = "default_api_key")]
    pub api_key: String,
}

fn default_api_root() -> String {
    DEFAULT_API_ROOT.to_string()
}

fn default_archive_root() -> String {
    DEFAULT_ARCHIVE_ROOT.to_string()
}

fn default_api_key() -> String {
    DEFAULT_API_KEY.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_root: default_api_root(),
            archive_root: default_archive_root(),
            api_key: default_api_key(),
        }
    }
}

impl Config {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        if let Ok(key) = env::var(API_KEY_ENV) {
            config.api_key = key;
        }
        Ok(config)
    }

    /// The defaults, with the environment override applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(key) = env::var(API_KEY_ENV) {
            config.api_key = key;
        }
        config
    }

    pub fn write<P: AsRef<Path>>(self: &Self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
