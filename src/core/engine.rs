//! Dispatch Engine
//!
//! Selects exactly one conversion strategy for a descriptor and runs it.
//! Resolution order for every call, top-level or nested:
//!
//! 1. preprocess the input (top-level only),
//! 2. apply the null marker,
//! 3. exact-type converter,
//! 4. assignable-type converter, first match in registration order,
//! 5. dynamic strategies in order, client strategies first,
//! 6. otherwise fail with `NoStrategyFound`.

use super::context::{ConversionContext, Probe, Session, Trace};
use super::descriptor::{short_type_name, TypeDescriptor};
use super::error::{ConversionError, ErrorKind, Frame};
use super::registry::{catalog_key, EngineBuilder, Registry};
use super::value::Value;
use super::Convertible;
use crate::strategies::Outcome;

use std::sync::Arc;

/// A frozen, shareable conversion engine.
///
/// Cloning is cheap; clones share the same registry.
#[derive(Clone)]
pub struct ConversionEngine {
    registry: Arc<Registry>,
}

impl Default for ConversionEngine {
    fn default() -> Self {
        EngineBuilder::new().freeze()
    }
}

impl ConversionEngine {
    pub(crate) fn from_registry(registry: Registry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub(crate) fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Converts `input` to `T`. `Ok(None)` means the input denoted absence.
    pub fn convert<T: Convertible>(&self, input: &str) -> Result<Option<T>, ConversionError> {
        self.convert_as(input, &T::descriptor())
    }

    /// Like [`convert`](Self::convert) but treats `T` as nullable, so the null
    /// marker yields `Ok(None)` even for primitives.
    pub fn convert_nullable<T: Convertible>(&self, input: &str) -> Result<Option<T>, ConversionError> {
        self.convert_as(input, &T::descriptor().boxed())
    }

    fn convert_as<T: Convertible>(
        &self,
        input: &str,
        descriptor: &TypeDescriptor,
    ) -> Result<Option<T>, ConversionError> {
        let (value, preprocessed) = self.convert_top(input, descriptor)?;
        let Some(value) = value else {
            return Ok(None);
        };
        let produced = value.type_name();
        value.downcast::<T>().map(Some).ok_or_else(|| {
            let frame = Frame::new(&preprocessed, input, Some(&preprocessed), descriptor);
            ConversionError::new(
                ErrorKind::ConversionFailed,
                format!(
                    "conversion produced a {} where {} was requested",
                    short_type_name(produced),
                    descriptor
                ),
            )
            .in_frame(|| frame.clone())
            .reported(frame)
        })
    }

    /// Converts `input` to the type `descriptor` describes.
    pub fn convert_type(
        &self,
        input: &str,
        descriptor: &TypeDescriptor,
    ) -> Result<Option<Value>, ConversionError> {
        self.convert_top(input, descriptor).map(|(value, _)| value)
    }

    /// Top-level call; also hands back the preprocessed input.
    fn convert_top(
        &self,
        input: &str,
        descriptor: &TypeDescriptor,
    ) -> Result<(Option<Value>, String), ConversionError> {
        let preprocessed = self.registry.preprocessor.preprocess(input).map_err(|cause| {
            let frame = Frame::new(input, input, None, descriptor);
            ConversionError::caused_by(ErrorKind::PreprocessingFailed, cause)
                .in_frame(|| frame.clone())
                .reported(frame)
        })?;

        let session = Session::new(input, &preprocessed);
        let value = self
            .dispatch(&preprocessed, descriptor, &session)
            .map_err(|error| {
                tracing::debug!(target_type = %descriptor, "conversion failed: {}", error.message());
                error.reported(Frame::new(&preprocessed, input, Some(&preprocessed), descriptor))
            })?;
        Ok((value, preprocessed))
    }

    /// Whether some strategy would accept `T`.
    pub fn is_convertible<T: Convertible>(&self) -> bool {
        self.is_type_convertible(&T::descriptor())
    }

    /// Dry run of the resolution steps; nothing is converted.
    ///
    /// Types whose entry points need themselves are reported as not
    /// convertible.
    pub fn is_type_convertible(&self, descriptor: &TypeDescriptor) -> bool {
        let trace = Trace::default();
        match Probe::new(self, &trace).is_convertible(descriptor) {
            Ok(convertible) => convertible,
            Err(error) => {
                tracing::debug!(target_type = %descriptor, "type is not convertible: {}", error.message());
                false
            }
        }
    }

    /// Looks up a known type by its short name, e.g. `Vec<i64>`.
    pub fn type_named(&self, name: &str) -> Option<&TypeDescriptor> {
        self.registry.catalog.get(&catalog_key(name))
    }

    /// Every named type the engine knows, in registration order.
    pub fn known_types(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.registry.catalog.values()
    }

    pub(crate) fn dispatch(
        &self,
        input: &str,
        descriptor: &TypeDescriptor,
        session: &Session<'_>,
    ) -> Result<Option<Value>, ConversionError> {
        let null = self.registry.null_marker.is_null(input.trim());
        let context = ConversionContext::new(self, descriptor, input, null, session);
        let _depth = session
            .trace
            .descend(descriptor)
            .map_err(|error| error.in_frame(|| context.frame()))?;

        self.run(&context)
            .map_err(|error| error.in_frame(|| context.frame()))
    }

    fn run(&self, context: &ConversionContext<'_>) -> Result<Option<Value>, ConversionError> {
        let descriptor = context.descriptor();
        let exact = self.registry.exact(descriptor);
        let assignable = match exact {
            Some(_) => None,
            None => self.registry.assignable(descriptor),
        };

        if context.is_null() {
            if descriptor.is_primitive() {
                return Err(ConversionError::null_on_primitive(descriptor));
            }
            if exact.is_some() || assignable.is_some() || !descriptor.is_container() {
                return Ok(None);
            }
        }

        if let Some(converter) = exact {
            tracing::debug!(target_type = %descriptor, "using exact converter");
            return converter(context.input(), context)
                .map(Some)
                .map_err(|cause| ConversionError::caused_by(ErrorKind::ConversionFailed, cause));
        }

        if let Some((supertype, converter)) = assignable {
            tracing::debug!(target_type = %descriptor, supertype = %supertype.name(), "using assignable converter");
            return converter(context.input(), context)
                .map(Some)
                .map_err(|cause| ConversionError::caused_by(ErrorKind::ConversionFailed, cause));
        }

        for strategy in &self.registry.strategies {
            match strategy.try_convert(context) {
                Outcome::Accepted(value) => {
                    tracing::debug!(target_type = %descriptor, strategy = strategy.name(), "strategy accepted");
                    return Ok(value);
                }
                Outcome::Declined => continue,
                Outcome::Failed(error) => return Err(error),
            }
        }

        Err(ConversionError::no_strategy(descriptor))
    }

    /// Steps 3 to 5 of the resolution order, without converting.
    pub(crate) fn resolves(
        &self,
        descriptor: &TypeDescriptor,
        probe: &Probe<'_>,
    ) -> Result<bool, ConversionError> {
        let _depth = probe.trace().descend(descriptor)?;

        if self.registry.exact(descriptor).is_some() || self.registry.assignable(descriptor).is_some() {
            return Ok(true);
        }
        for strategy in &self.registry.strategies {
            if strategy.applies_to(descriptor, probe)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
