//! Pluggable text policies: splitting, null detection and preprocessing.
//!
//! All policies must be free of shared mutable state; a built engine calls
//! them concurrently from any thread.

use super::error::BoxError;

use regex::Regex;

/// Breaks composite input into element substrings.
pub trait Splitter: Send + Sync {
    fn split(&self, input: &str) -> Result<Vec<String>, BoxError>;
}

/// Breaks one map element into a key and a value.
pub trait KeyValueSplitter: Send + Sync {
    fn split_pair(&self, element: &str) -> Result<(String, String), BoxError>;
}

/// Decides whether trimmed input denotes "no value".
pub trait NullMarker: Send + Sync {
    fn is_null(&self, trimmed: &str) -> bool;
}

/// Rewrites the raw input once per top-level conversion.
pub trait Preprocessor: Send + Sync {
    fn preprocess(&self, input: &str) -> Result<String, BoxError>;
}

impl<F> Splitter for F
where
    F: Fn(&str) -> Result<Vec<String>, BoxError> + Send + Sync,
{
    fn split(&self, input: &str) -> Result<Vec<String>, BoxError> {
        self(input)
    }
}

impl<F> KeyValueSplitter for F
where
    F: Fn(&str) -> Result<(String, String), BoxError> + Send + Sync,
{
    fn split_pair(&self, element: &str) -> Result<(String, String), BoxError> {
        self(element)
    }
}

impl<F> NullMarker for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_null(&self, trimmed: &str) -> bool {
        self(trimmed)
    }
}

impl<F> Preprocessor for F
where
    F: Fn(&str) -> Result<String, BoxError> + Send + Sync,
{
    fn preprocess(&self, input: &str) -> Result<String, BoxError> {
        self(input)
    }
}

/// Splits on every occurrence of a fixed delimiter (`,` by default).
#[derive(Clone, Debug)]
pub struct DelimiterSplitter {
    delimiter: String,
}

impl DelimiterSplitter {
    pub fn new(delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
        }
    }
}

impl Default for DelimiterSplitter {
    fn default() -> Self {
        Self::new(",")
    }
}

impl Splitter for DelimiterSplitter {
    fn split(&self, input: &str) -> Result<Vec<String>, BoxError> {
        Ok(input.split(self.delimiter.as_str()).map(str::to_string).collect())
    }
}

/// Splits on every match of a regular expression.
#[derive(Clone, Debug)]
pub struct RegexSplitter {
    pattern: Regex,
}

impl RegexSplitter {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }
}

impl Splitter for RegexSplitter {
    fn split(&self, input: &str) -> Result<Vec<String>, BoxError> {
        Ok(self.pattern.split(input).map(str::to_string).collect())
    }
}

/// Splits a map element on the first occurrence of a delimiter (`=` by default).
#[derive(Clone, Debug)]
pub struct FirstDelimiter {
    delimiter: String,
}

impl FirstDelimiter {
    pub fn new(delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
        }
    }
}

impl Default for FirstDelimiter {
    fn default() -> Self {
        Self::new("=")
    }
}

impl KeyValueSplitter for FirstDelimiter {
    fn split_pair(&self, element: &str) -> Result<(String, String), BoxError> {
        element
            .split_once(self.delimiter.as_str())
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .ok_or_else(|| {
                format!(
                    "\"{element}\" is not a key-value pair; expected key{}value",
                    self.delimiter
                )
                .into()
            })
    }
}

/// Matches a literal marker, ignoring ASCII case (`null` by default).
#[derive(Clone, Debug)]
pub struct NullLiteral {
    literal: String,
}

impl NullLiteral {
    pub fn new(literal: impl Into<String>) -> Self {
        Self {
            literal: literal.into(),
        }
    }
}

impl Default for NullLiteral {
    fn default() -> Self {
        Self::new("null")
    }
}

impl NullMarker for NullLiteral {
    fn is_null(&self, trimmed: &str) -> bool {
        trimmed.eq_ignore_ascii_case(&self.literal)
    }
}

/// Passes input through untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct Identity;

impl Preprocessor for Identity {
    fn preprocess(&self, input: &str) -> Result<String, BoxError> {
        Ok(input.to_string())
    }
}

/// Trims surrounding whitespace.
#[derive(Clone, Copy, Debug, Default)]
pub struct Trim;

impl Preprocessor for Trim {
    fn preprocess(&self, input: &str) -> Result<String, BoxError> {
        Ok(input.trim().to_string())
    }
}
