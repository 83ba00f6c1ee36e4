//! JSON Configuration Management
//!
//! Handles reading and writing the sync configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::models::settings::{SyncConfig, SyncConfigUpdate};
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::{config_path, ensure_dir};

/// Configuration service for managing sync settings
#[derive(Debug)]
pub struct ConfigService {
    config_path: PathBuf,
    config: SyncConfig,
}

impl ConfigService {
    /// Load `~/.memory-bank/config.json`, falling back to defaults when absent
    pub fn new() -> AppResult<Self> {
        Self::from_path(config_path()?)
    }

    /// Load configuration from an explicit path. A missing file yields defaults
    /// and is only created on the first `save()`.
    pub fn from_path(path: impl Into<PathBuf>) -> AppResult<Self> {
        let config_path = path.into();
        let config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            debug!("no config at {}, using defaults", config_path.display());
            SyncConfig::default()
        };

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Load configuration from a file
    fn load_from_file(path: &Path) -> AppResult<SyncConfig> {
        let content = fs::read_to_string(path)?;
        let config: SyncConfig = serde_json::from_str(&content)?;
        config.validate().map_err(AppError::validation)?;
        Ok(config)
    }

    /// Save configuration to a file with pretty formatting
    fn save_to_file(path: &Path, config: &SyncConfig) -> AppResult<()> {
        config.validate().map_err(AppError::validation)?;
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        let content = serde_json::to_string_pretty(config)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the current configuration
    pub fn get_config(&self) -> &SyncConfig {
        &self.config
    }

    /// Get a clone of the current configuration
    pub fn get_config_clone(&self) -> SyncConfig {
        self.config.clone()
    }

    /// Path the configuration is read from and saved to
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Update the configuration with a partial update
    pub fn update_config(&mut self, update: SyncConfigUpdate) -> AppResult<SyncConfig> {
        let mut next = self.config.clone();
        next.apply_update(update);
        next.validate().map_err(AppError::validation)?;
        self.config = next;
        self.save()?;
        Ok(self.config.clone())
    }

    /// Save the current configuration to disk
    pub fn save(&self) -> AppResult<()> {
        Self::save_to_file(&self.config_path, &self.config)
    }

    /// Reset configuration to defaults
    pub fn reset(&mut self) -> AppResult<()> {
        self.config = SyncConfig::default();
        self.save()?;
        Ok(())
    }
}
