//! Configuration for settlement engine

use crate::types::ClearMode;
use serde::{Deserialize, Serialize};

/// Settlement engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// Netting configuration
    pub netting: NettingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "iou-settlement".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            netting: NettingConfig::default(),
        }
    }
}

/// Netting configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NettingConfig {
    /// What a debt flip or exact cancellation clears
    /// Default: `whole_ledger`, every counterparty of both users
    pub clear_mode: ClearMode,
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse from TOML text
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(mode) = std::env::var("IOU_CLEAR_MODE") {
            config.netting.clear_mode = ClearMode::parse(&mode).ok_or_else(|| {
                crate::Error::Config(format!("Unknown IOU_CLEAR_MODE: {}", mode))
            })?;
        }

        Ok(config)
    }
}
