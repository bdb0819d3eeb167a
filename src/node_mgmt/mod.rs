pub mod config;

pub use config::{device_path_from_env, AgentConfig, ConfigError};
