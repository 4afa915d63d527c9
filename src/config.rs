use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // HTTP
    pub host: String,
    pub port: u16,
    /// Shared secret for mutating calls; empty disables the check (dev)
    pub api_token: String,

    // Data
    pub data_dir: String,

    // Remote mirror (empty = local JSON file store)
    pub remote_base: String,
    pub remote_token: String,

    // Meta
    pub ui_language: String,
    pub suggest_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            api_token: String::new(),
            data_dir: "data".to_string(),
            remote_base: String::new(),
            remote_token: String::new(),
            ui_language: "ar".to_string(),
            suggest_limit: 5,
        }
    }
}

impl Config {
    /// Load config from file, or create the default one
    pub fn load() -> Result<Self> {
        let config_path = config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            match serde_json::from_str(&content) {
                Ok(config) => Ok(config),
                Err(e) => {
                    // Graceful degradation: keep the corrupt file for debugging
                    tracing::warn!("⚠️ Config file corrupted or invalid, using defaults: {}", e);
                    let backup_path = config_path.with_extension("json.corrupt");
                    let _ = std::fs::rename(&config_path, &backup_path);
                    Ok(Self::default())
                }
            }
        } else {
            let config = Self::default();
            if config.save().is_ok() {
                tracing::info!("📝 Wrote default config to {:?}", config_path);
            }
            Ok(config)
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let config_path = config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tasnif")
        .join("config.json")
}
