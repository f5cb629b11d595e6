use super::types::EngineConfig;
use super::validation::validate_config;
use super::ConfigError;
use crate::core::{DelimiterSplitter, EngineBuilder, FirstDelimiter, NullLiteral, RegexSplitter, Trim};

impl EngineBuilder {
    /// A default builder with the text policies `config` selects.
    pub fn from_config(config: &EngineConfig) -> Result<Self, ConfigError> {
        validate_config(config)?;

        let mut builder = EngineBuilder::new()
            .key_value_splitter(FirstDelimiter::new(config.splitting.key_value_delimiter.as_str()))
            .null_marker(NullLiteral::new(config.values.null_marker.trim()));

        match (&config.splitting.pattern, &config.splitting.delimiter) {
            (Some(pattern), _) => builder = builder.splitter(RegexSplitter::new(pattern)?),
            (None, Some(delimiter)) => builder = builder.splitter(DelimiterSplitter::new(delimiter.as_str())),
            (None, None) => {}
        }

        if config.values.trim_input {
            builder = builder.preprocessor(Trim);
        }

        tracing::debug!(
            delimiter = ?config.splitting.delimiter,
            pattern = ?config.splitting.pattern,
            null_marker = %config.values.null_marker,
            trim_input = config.values.trim_input,
            "applied engine configuration"
        );
        Ok(builder)
    }
}
