//! Conversion errors.
//!
//! Every failure, at any recursion depth, surfaces as one [`ConversionError`].
//! The innermost call records its frame (inputs and type) once; the
//! top-level entry point adds a second, outer frame that renders the
//! `cannot parse ... because:` prefix. Nothing in between re-wraps.

use super::descriptor::TypeDescriptor;

use std::error::Error;
use std::fmt;

pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// No exact, assignable or fallback strategy accepted the type.
    NoStrategyFound,
    /// A selected strategy ran and failed.
    ConversionFailed,
    /// The null marker matched but the target cannot be absent.
    NullOnPrimitive,
    /// The input preprocessor failed.
    PreprocessingFailed,
    /// A splitter failed to break up composite input.
    SplitFailed,
    /// Argument resolution of an entry point looped back on itself.
    CyclicTypeArgument,
}

/// Inputs and target type of one conversion call.
#[derive(Clone, Debug)]
pub struct Frame {
    input: String,
    original_input: String,
    preprocessed_input: Option<String>,
    descriptor: TypeDescriptor,
}

impl Frame {
    pub(crate) fn new(
        input: &str,
        original_input: &str,
        preprocessed_input: Option<&str>,
        descriptor: &TypeDescriptor,
    ) -> Self {
        Self {
            input: input.to_string(),
            original_input: original_input.to_string(),
            preprocessed_input: preprocessed_input.map(str::to_string),
            descriptor: descriptor.clone(),
        }
    }

    /// Input of this call; an element substring for nested calls.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn original_input(&self) -> &str {
        &self.original_input
    }

    /// `None` when the failure happened before preprocessing completed.
    pub fn preprocessed_input(&self) -> Option<&str> {
        self.preprocessed_input.as_deref()
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }
}

pub struct ConversionError {
    kind: ErrorKind,
    message: String,
    frame: Option<Frame>,
    report: Option<Frame>,
    source: Option<BoxError>,
}

impl ConversionError {
    pub(crate) fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            frame: None,
            report: None,
            source: None,
        }
    }

    /// Wraps a collaborator or converter failure, keeping it as the source.
    pub(crate) fn caused_by(kind: ErrorKind, cause: BoxError) -> Self {
        Self {
            kind,
            message: cause.to_string(),
            frame: None,
            report: None,
            source: Some(cause),
        }
    }

    pub(crate) fn no_strategy(descriptor: &TypeDescriptor) -> Self {
        let mut message = format!(
            "no conversion strategy found for type {} ({} descriptor)",
            descriptor.name(),
            descriptor.shape_name()
        );
        if descriptor.entry_points().is_empty() && !descriptor.is_container() {
            message.push_str(&format!(
                "; register a converter or declare an entry point such as {0}::value_of(String) or {0}::new(String)",
                descriptor.name()
            ));
        }
        Self::new(ErrorKind::NoStrategyFound, message)
    }

    pub(crate) fn null_on_primitive(descriptor: &TypeDescriptor) -> Self {
        Self::new(
            ErrorKind::NullOnPrimitive,
            format!("primitive {} cannot be set to null", descriptor.name()),
        )
    }

    pub(crate) fn too_deep(name: &str, limit: usize) -> Self {
        Self::new(
            ErrorKind::CyclicTypeArgument,
            format!("cyclic type argument: resolving {name} exceeded {limit} nested conversions"),
        )
    }

    pub(crate) fn cyclic(signature: &str) -> Self {
        Self::new(
            ErrorKind::CyclicTypeArgument,
            format!("cyclic type argument: resolving the argument of {signature} requires {signature} itself"),
        )
    }

    pub(crate) fn invocation(signature: &str, input: &str, cause: BoxError) -> Self {
        let message = format!("{signature} failed for input \"{input}\": {cause}");
        Self {
            message,
            ..Self::caused_by(ErrorKind::ConversionFailed, cause)
        }
    }

    /// Records the innermost frame; later calls keep the first one.
    pub(crate) fn in_frame(mut self, frame: impl FnOnce() -> Frame) -> Self {
        if self.frame.is_none() {
            self.frame = Some(frame());
        }
        self
    }

    /// Attaches the top-level frame that renders the report prefix.
    pub(crate) fn reported(mut self, frame: Frame) -> Self {
        if self.report.is_none() {
            self.report = Some(frame);
        }
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The innermost failure description, without the report prefix.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Frame of the call that failed.
    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    /// Frame of the top-level call.
    pub fn report(&self) -> Option<&Frame> {
        self.report.as_ref()
    }

    pub fn original_input(&self) -> Option<&str> {
        self.report
            .as_ref()
            .or(self.frame.as_ref())
            .map(Frame::original_input)
    }

    pub fn preprocessed_input(&self) -> Option<&str> {
        self.report
            .as_ref()
            .or(self.frame.as_ref())
            .and_then(Frame::preprocessed_input)
    }

    /// Type of the innermost failing call.
    pub fn descriptor(&self) -> Option<&TypeDescriptor> {
        self.frame.as_ref().map(Frame::descriptor)
    }
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.report {
            Some(report) => write!(
                f,
                "cannot parse \"{}\" to type {} because: {}",
                report.original_input,
                report.descriptor.name(),
                self.message
            ),
            None => f.write_str(&self.message),
        }
    }
}

impl fmt::Debug for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionError")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .field("frame", &self.frame)
            .field("report", &self.report)
            .field("source", &self.source)
            .finish()
    }
}

impl Error for ConversionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_deref().map(|source| source as &(dyn Error + 'static))
    }
}

/// Misuse of a [`TypeDescriptor`] accessor.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DescriptorError {
    #[error("{type_name} is not a parameterized type")]
    NotParameterized { type_name: String },

    #[error("{type_name} is not an array type")]
    NotAnArray { type_name: String },

    #[error("type argument {argument} of {type_name} is itself parameterized; only simple type arguments are supported")]
    NestedParameterization { type_name: String, argument: String },
}

impl From<DescriptorError> for ConversionError {
    fn from(error: DescriptorError) -> Self {
        ConversionError::caused_by(ErrorKind::ConversionFailed, Box::new(error))
    }
}

/// Rejected builder configuration, reported by `EngineBuilder::build`.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("cannot register a converter for array type {type_name}; arrays are converted through their component type")]
    ArrayRegistration { type_name: String },
}
