pub mod config;

pub use config::{LogsConfig, OpskitConfig, ScalingConfig, StorageConfig};
