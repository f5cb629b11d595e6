//! Configuration Type Definitions
//!
//! These types are deserialised from TOML and applied to an
//! [`EngineBuilder`](crate::core::EngineBuilder). Every section and field is
//! optional; an empty file yields the engine defaults.
//!
//! ```toml
//! [splitting]
//! delimiter = ";"
//! key_value_delimiter = ":"
//!
//! [values]
//! null_marker = "none"
//! trim_input = true
//!
//! [logging]
//! level = "debug"
//! ```

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize, Default, PartialEq, Eq)]
pub struct EngineConfig {
    #[serde(default)]
    pub splitting: SplittingConfig,

    #[serde(default)]
    pub values: ValuesConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How composite input is broken into elements and key/value pairs.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct SplittingConfig {
    /// Fixed element delimiter; `,` when neither this nor `pattern` is set.
    pub delimiter: Option<String>,

    /// Regular expression separating elements.
    pub pattern: Option<String>,

    /// Separator between a map key and its value, split on first occurrence.
    #[serde(default = "default_key_value_delimiter")]
    pub key_value_delimiter: String,
}

impl Default for SplittingConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            pattern: None,
            key_value_delimiter: default_key_value_delimiter(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ValuesConfig {
    /// Literal that denotes "no value", matched ignoring ASCII case.
    #[serde(default = "default_null_marker")]
    pub null_marker: String,

    /// Trim the top-level input before conversion.
    #[serde(default)]
    pub trim_input: bool,
}

impl Default for ValuesConfig {
    fn default() -> Self {
        Self {
            null_marker: default_null_marker(),
            trim_input: false,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_key_value_delimiter() -> String {
    "=".to_string()
}

fn default_null_marker() -> String {
    "null".to_string()
}

fn default_level() -> String {
    "info".to_string()
}
