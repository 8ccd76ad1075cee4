//! opskit.toml configuration parser.
//!
//! Every field is optional. Command-line flags take precedence over the file,
//! and the file takes precedence over the built-in defaults below.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "opskit.toml";

pub const DEFAULT_WINDOW_SIZE: usize = 10;
pub const DEFAULT_UPPER_THRESHOLD: f64 = 75.0;
pub const DEFAULT_LOWER_THRESHOLD: f64 = 25.0;
pub const DEFAULT_SCALING_INPUT: &str = "cpu_utilisation.json";
pub const DEFAULT_LOG_PATH: &str = "server.log";
pub const DEFAULT_DATABASE_PATH: &str = "server.redb";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpskitConfig {
    pub scaling: Option<ScalingConfig>,
    pub logs: Option<LogsConfig>,
    pub storage: Option<StorageConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScalingConfig {
    pub window_size: Option<usize>,
    pub upper_threshold: Option<f64>,
    pub lower_threshold: Option<f64>,
    /// JSON file with one utilization record per group.
    pub input: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogsConfig {
    pub path: Option<PathBuf>,
    pub database: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one sub-directory per bucket.
    pub root: Option<PathBuf>,
}

impl OpskitConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: OpskitConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load an explicit config file, or `opskit.toml` from the working
    /// directory if present, or fall back to defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let local = Path::new(CONFIG_FILE);
                if local.is_file() {
                    Self::from_file(local)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Scaffold an opskit.toml with every default spelled out.
    pub fn scaffold() -> Self {
        OpskitConfig {
            scaling: Some(ScalingConfig {
                window_size: Some(DEFAULT_WINDOW_SIZE),
                upper_threshold: Some(DEFAULT_UPPER_THRESHOLD),
                lower_threshold: Some(DEFAULT_LOWER_THRESHOLD),
                input: Some(PathBuf::from(DEFAULT_SCALING_INPUT)),
            }),
            logs: Some(LogsConfig {
                path: Some(PathBuf::from(DEFAULT_LOG_PATH)),
                database: Some(PathBuf::from(DEFAULT_DATABASE_PATH)),
            }),
            storage: Some(StorageConfig {
                root: Some(PathBuf::from(".")),
            }),
        }
    }

    pub fn scaling(&self) -> ScalingConfig {
        self.scaling.clone().unwrap_or_default()
    }

    pub fn scaling_input(&self) -> PathBuf {
        self.scaling
            .as_ref()
            .and_then(|s| s.input.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCALING_INPUT))
    }

    pub fn log_path(&self) -> PathBuf {
        self.logs
            .as_ref()
            .and_then(|l| l.path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_PATH))
    }

    pub fn database_path(&self) -> PathBuf {
        self.logs
            .as_ref()
            .and_then(|l| l.database.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH))
    }

    pub fn storage_root(&self) -> PathBuf {
        self.storage
            .as_ref()
            .and_then(|s| s.root.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

impl ScalingConfig {
    pub fn window_size(&self) -> usize {
        self.window_size.unwrap_or(DEFAULT_WINDOW_SIZE)
    }

    pub fn upper_threshold(&self) -> f64 {
        self.upper_threshold.unwrap_or(DEFAULT_UPPER_THRESHOLD)
    }

    pub fn lower_threshold(&self) -> f64 {
        self.lower_threshold.unwrap_or(DEFAULT_LOWER_THRESHOLD)
    }
}
