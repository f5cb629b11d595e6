use super::descriptor::TypeDescriptor;
use super::engine::ConversionEngine;
use super::entry::EntryPoint;
use super::error::{ConversionError, ErrorKind, Frame};
use super::value::Value;

use std::any::TypeId;
use std::cell::{Cell, RefCell};

/// Nested conversions allowed below one top-level call.
pub const MAX_DEPTH: usize = 64;

/// Recursion bookkeeping of one top-level call.
///
/// Tracks nesting depth and every entry point whose argument is currently
/// being resolved, so a type that needs itself to be built is reported
/// instead of recursing until the stack runs out.
#[derive(Default)]
pub(crate) struct Trace {
    depth: Cell<usize>,
    active: RefCell<Vec<(TypeId, String)>>,
}

pub(crate) struct DepthGuard<'a>(&'a Trace);

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.0.depth.set(self.0.depth.get().saturating_sub(1));
    }
}

pub(crate) struct EntryGuard<'a>(&'a Trace);

impl Drop for EntryGuard<'_> {
    fn drop(&mut self) {
        self.0.active.borrow_mut().pop();
    }
}

impl Trace {
    pub(crate) fn descend(&self, descriptor: &TypeDescriptor) -> Result<DepthGuard<'_>, ConversionError> {
        let depth = self.depth.get() + 1;
        if depth > MAX_DEPTH {
            let culprit = self
                .active
                .borrow()
                .last()
                .map(|(_, signature)| signature.clone())
                .unwrap_or_else(|| descriptor.name().to_string());
            return Err(ConversionError::too_deep(&culprit, MAX_DEPTH));
        }
        self.depth.set(depth);
        Ok(DepthGuard(self))
    }

    /// Marks `entry` of `descriptor` as being resolved.
    pub(crate) fn enter(
        &self,
        descriptor: &TypeDescriptor,
        entry: &EntryPoint,
    ) -> Result<EntryGuard<'_>, ConversionError> {
        let key = (descriptor.id(), entry.signature());
        if self.active.borrow().contains(&key) {
            return Err(ConversionError::cyclic(&key.1));
        }
        self.active.borrow_mut().push(key);
        Ok(EntryGuard(self))
    }
}

/// Inputs shared by every nested call of one top-level conversion.
pub(crate) struct Session<'a> {
    pub(crate) original: &'a str,
    pub(crate) preprocessed: &'a str,
    pub(crate) trace: Trace,
}

impl<'a> Session<'a> {
    pub(crate) fn new(original: &'a str, preprocessed: &'a str) -> Self {
        Self {
            original,
            preprocessed,
            trace: Trace::default(),
        }
    }
}

/// Everything a converter or strategy needs for one call: the target type,
/// the input, and callbacks into the engine for nested values.
pub struct ConversionContext<'a> {
    engine: &'a ConversionEngine,
    descriptor: &'a TypeDescriptor,
    input: &'a str,
    null: bool,
    session: &'a Session<'a>,
}

impl<'a> ConversionContext<'a> {
    pub(crate) fn new(
        engine: &'a ConversionEngine,
        descriptor: &'a TypeDescriptor,
        input: &'a str,
        null: bool,
        session: &'a Session<'a>,
    ) -> Self {
        Self {
            engine,
            descriptor,
            input,
            null,
            session,
        }
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        self.descriptor
    }

    /// Input of this call; an element substring for nested calls.
    pub fn input(&self) -> &str {
        self.input
    }

    pub fn original_input(&self) -> &str {
        self.session.original
    }

    pub fn preprocessed_input(&self) -> &str {
        self.session.preprocessed
    }

    /// Whether the null marker matched this call's input.
    pub fn is_null(&self) -> bool {
        self.null
    }

    pub fn engine(&self) -> &ConversionEngine {
        self.engine
    }

    /// Converts a nested value. The preprocessor does not run again.
    pub fn convert(
        &self,
        input: &str,
        descriptor: &TypeDescriptor,
    ) -> Result<Option<Value>, ConversionError> {
        self.engine.dispatch(input, descriptor, self.session)
    }

    /// Converts the element at `index` of this container; absence is an error.
    pub fn convert_element(
        &self,
        index: usize,
        input: &str,
        descriptor: &TypeDescriptor,
    ) -> Result<Value, ConversionError> {
        tracing::trace!(container = %self.descriptor, index, input, "converting element");
        self.convert(input, descriptor)?
            .ok_or_else(|| self.absent_element(index, input))
    }

    pub(crate) fn absent_element(&self, index: usize, input: &str) -> ConversionError {
        ConversionError::new(
            ErrorKind::ConversionFailed,
            format!(
                "element {index} (\"{input}\") of {} is null, which the container cannot hold",
                self.descriptor
            ),
        )
    }

    /// Whether the null marker matches a nested input.
    pub(crate) fn marks_null(&self, input: &str) -> bool {
        self.engine.registry().null_marker.is_null(input.trim())
    }

    /// Splits composite input; blank input yields no elements.
    pub fn split(&self, input: &str) -> Result<Vec<String>, ConversionError> {
        if input.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.engine
            .registry()
            .splitter
            .split(input)
            .map_err(|cause| ConversionError::caused_by(ErrorKind::SplitFailed, cause))
    }

    pub fn split_key_value(&self, element: &str) -> Result<(String, String), ConversionError> {
        self.engine
            .registry()
            .key_value_splitter
            .split_pair(element)
            .map_err(|cause| ConversionError::caused_by(ErrorKind::SplitFailed, cause))
    }

    /// Dry-run view sharing this call's recursion trace.
    pub fn probe(&self) -> Probe<'_> {
        Probe {
            engine: self.engine,
            trace: &self.session.trace,
        }
    }

    pub(crate) fn trace(&self) -> &Trace {
        &self.session.trace
    }

    pub(crate) fn frame(&self) -> Frame {
        self.frame_for(self.input, self.descriptor)
    }

    /// Frame of a nested call this context makes without dispatching.
    pub(crate) fn frame_for(&self, input: &str, descriptor: &TypeDescriptor) -> Frame {
        Frame::new(
            input,
            self.session.original,
            Some(self.session.preprocessed),
            descriptor,
        )
    }
}

/// Answers "is this type convertible?" without converting anything.
pub struct Probe<'a> {
    engine: &'a ConversionEngine,
    trace: &'a Trace,
}

impl<'a> Probe<'a> {
    pub(crate) fn new(engine: &'a ConversionEngine, trace: &'a Trace) -> Self {
        Self { engine, trace }
    }

    pub fn is_convertible(&self, descriptor: &TypeDescriptor) -> Result<bool, ConversionError> {
        self.engine.resolves(descriptor, self)
    }

    pub(crate) fn trace(&self) -> &Trace {
        self.trace
    }
}
