use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub key: String,
    #[serde(default = "default_api_host")]
    pub host: String,
}

fn default_api_host() -> String {
    "anime-db.p.rapidapi.com".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_accent_color")]
    pub accent_color: String,
}

fn default_accent_color() -> String {
    "magenta".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            key: String::new(),
            host: default_api_host(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            accent_color: default_accent_color(),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "anisearch")
}

pub fn config_dir() -> Result<PathBuf> {
    Ok(project_dirs()
        .ok_or(Error::NoConfigDir)?
        .config_dir()
        .to_path_buf())
}

pub fn data_dir() -> Result<PathBuf> {
    Ok(project_dirs()
        .ok_or(Error::NoDataDir)?
        .data_dir()
        .to_path_buf())
}

pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

pub fn favorites_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("favorites.json"))
}

pub fn theme_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("theme"))
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = config_path()?;

        if !path.exists() {
            let config = Config::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = config_path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Resolved RapidAPI credentials. Environment variables win over the
    /// config file so CI and one-off runs need not touch the file.
    pub fn api_credentials(&self) -> Result<(String, String)> {
        let key = std::env::var("ANISEARCH_API_KEY")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| self.api.key.clone());
        let host = std::env::var("ANISEARCH_API_HOST")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| self.api.host.clone());

        if key.is_empty() || host.is_empty() {
            return Err(Error::MissingCredentials);
        }

        Ok((key, host))
    }
}
