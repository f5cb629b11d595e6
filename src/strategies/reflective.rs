//! Factory and constructor fallbacks.
//!
//! Candidates come from the entry points a type declares on its descriptor,
//! tried in declaration order. A text argument is taken as is; any other
//! argument type must itself be convertible, which is checked recursively
//! with the call's trace so self-referential declarations surface as
//! `CyclicTypeArgument` instead of recursing forever.

use super::{DynamicStrategy, Outcome};
use crate::core::{
    Argument, ConversionContext, ConversionError, EntryKind, EntryPoint, Probe, TypeDescriptor, Value,
};

pub struct EntryPointStrategy {
    kind: EntryKind,
    name: &'static str,
}

impl EntryPointStrategy {
    /// Tries associated functions such as `T::value_of(String)`.
    pub fn static_factory() -> Self {
        Self {
            kind: EntryKind::StaticFactory,
            name: "static-factory-method",
        }
    }

    /// Tries `new`-style constructors.
    pub fn constructor() -> Self {
        Self {
            kind: EntryKind::Constructor,
            name: "single-argument-constructor",
        }
    }

    /// First declared entry point of this strategy's kind whose argument is usable.
    fn select(&self, descriptor: &TypeDescriptor, probe: &Probe<'_>) -> Result<Option<EntryPoint>, ConversionError> {
        let candidates = descriptor
            .entry_points()
            .into_iter()
            .filter(|entry| entry.kind() == self.kind && entry.builds(descriptor));

        for entry in candidates {
            match entry.argument().clone() {
                Argument::Text => return Ok(Some(entry)),
                Argument::Typed(argument) => {
                    let _active = probe.trace().enter(descriptor, &entry)?;
                    if probe.is_convertible(&argument())? {
                        return Ok(Some(entry));
                    }
                }
            }
        }
        Ok(None)
    }

    fn invoke(&self, entry: &EntryPoint, context: &ConversionContext<'_>) -> Result<Option<Value>, ConversionError> {
        let descriptor = context.descriptor();
        let argument = match entry.argument() {
            Argument::Text => {
                let input = if descriptor.is_enum() {
                    context.input().trim()
                } else {
                    context.input()
                };
                Value::new(input.to_string())
            }
            Argument::Typed(argument) => {
                let _active = context.trace().enter(descriptor, entry)?;
                match context.convert(context.input(), &argument())? {
                    Some(value) => value,
                    None => return Ok(None),
                }
            }
        };

        tracing::debug!(target_type = %descriptor, entry_point = %entry.signature(), "invoking entry point");
        entry
            .invoke(argument)
            .map(Some)
            .map_err(|cause| ConversionError::invocation(&entry.signature(), context.original_input(), cause))
    }
}

impl DynamicStrategy for EntryPointStrategy {
    fn name(&self) -> &str {
        self.name
    }

    fn applies_to(&self, descriptor: &TypeDescriptor, probe: &Probe<'_>) -> Result<bool, ConversionError> {
        Ok(self.select(descriptor, probe)?.is_some())
    }

    fn convert(&self, context: &ConversionContext<'_>) -> Result<Option<Value>, ConversionError> {
        match self.select(context.descriptor(), &context.probe())? {
            Some(entry) => self.invoke(&entry, context),
            None => Err(ConversionError::no_strategy(context.descriptor())),
        }
    }

    fn try_convert(&self, context: &ConversionContext<'_>) -> Outcome {
        match self.select(context.descriptor(), &context.probe()) {
            Ok(None) => Outcome::Declined,
            Ok(Some(entry)) => match self.invoke(&entry, context) {
                Ok(value) => Outcome::Accepted(value),
                Err(error) => Outcome::Failed(error),
            },
            Err(error) => Outcome::Failed(error),
        }
    }
}
