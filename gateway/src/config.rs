//! Configuration for the gateway

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Gateway configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Settlement engine configuration
    pub settlement: iou_settlement::Config,

    /// JSON `{"users": [...]}` file loaded at startup
    pub seed_path: Option<PathBuf>,

    /// `tracing` filter directive
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settlement: iou_settlement::Config::default(),
            seed_path: None,
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> iou_settlement::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            iou_settlement::Error::Config(format!("Failed to parse config: {}", e))
        })?;
        Ok(config)
    }

    /// Load from environment variables
    ///
    /// `IOU_CONFIG` names a TOML file to start from; the remaining
    /// variables override individual fields.
    pub fn from_env() -> iou_settlement::Result<Self> {
        let mut config = match std::env::var("IOU_CONFIG") {
            Ok(path) => Config::from_file(path)?,
            Err(_) => Config {
                settlement: iou_settlement::Config::from_env()?,
                ..Config::default()
            },
        };

        if let Ok(path) = std::env::var("IOU_SEED_PATH") {
            config.seed_path = Some(PathBuf::from(path));
        }

        if let Ok(filter) = std::env::var("IOU_LOG") {
            config.log_filter = filter;
        }

        Ok(config)
    }
}
