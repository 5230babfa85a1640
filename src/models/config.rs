use crate::models::config_validator::validate_config;
use crate::models::error::{BackupError, Result};
use crate::models::hash_algorithm::HashAlgorithm;
use log::info;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_BACKUP_DIR: &str = "backups";
pub const DEFAULT_NAME_PREFIX: &str = "keepass";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_backup_dir")]
    pub backup_dir: String,
    #[serde(default = "default_name_prefix")]
    pub name_prefix: String,
    #[serde(default)]
    pub hash_algorithm: HashAlgorithm,
    pub sources: Vec<String>,
}

fn default_backup_dir() -> String {
    DEFAULT_BACKUP_DIR.to_string()
}
fn default_name_prefix() -> String {
    DEFAULT_NAME_PREFIX.to_string()
}

impl Config {
    /// Replaces the configured backup directory, e.g. from `BACKUP_DIR`.
    pub fn with_backup_dir_override(mut self, backup_dir: Option<String>) -> Self {
        if let Some(dir) = backup_dir {
            self.backup_dir = dir;
        }
        self
    }
}

pub fn setup_config(config_file: String) -> Result<Config> {
    let config_path = PathBuf::from(config_file);
    info!("Loading config from: {}", config_path.display());

    let config_str = fs::read_to_string(&config_path).map_err(|cause| {
        BackupError::ConfigRead {
            path: config_path.clone(),
            cause,
        }
    })?;

    let config: Config = serde_json::from_str(&config_str).map_err(|cause| {
        BackupError::ConfigParse {
            path: config_path,
            cause,
        }
    })?;

    validate_config(&config)?;

    Ok(config)
}
