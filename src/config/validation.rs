use super::types::EngineConfig;
use super::ConfigError;

use regex::Regex;
use std::str::FromStr;

pub fn validate_config(config: &EngineConfig) -> Result<(), ConfigError> {
    let splitting = &config.splitting;

    if splitting.delimiter.is_some() && splitting.pattern.is_some() {
        return Err(ConfigError::Invalid(
            "splitting.delimiter and splitting.pattern are mutually exclusive".into(),
        ));
    }

    if splitting.delimiter.as_deref() == Some("") {
        return Err(ConfigError::Invalid("splitting.delimiter must not be empty".into()));
    }

    if let Some(pattern) = &splitting.pattern {
        Regex::new(pattern)?;
    }

    if splitting.key_value_delimiter.is_empty() {
        return Err(ConfigError::Invalid(
            "splitting.key_value_delimiter must not be empty".into(),
        ));
    }

    if config.values.null_marker.trim().is_empty() {
        return Err(ConfigError::Invalid("values.null_marker must not be blank".into()));
    }

    if tracing::Level::from_str(&config.logging.level).is_err() {
        return Err(ConfigError::Invalid(format!(
            "logging.level \"{}\" is not one of trace, debug, info, warn, error",
            config.logging.level
        )));
    }

    Ok(())
}
