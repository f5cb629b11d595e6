//! Configuration Module
//!
//! Engine settings loaded from TOML: how composite input is split, which
//! literal means "no value", whether top-level input is trimmed, and the
//! log level used by the binary.

pub mod builder;
pub mod loader;
pub mod types;
pub mod validation;

pub use loader::{load_config, load_config_from_string};
pub use types::{EngineConfig, LoggingConfig, SplittingConfig, ValuesConfig};
pub use validation::validate_config;

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration syntax: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid split pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
