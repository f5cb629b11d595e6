//! Resolution Registry
//!
//! [`EngineBuilder`] collects converters, strategies and text policies,
//! starting from the default converter table. [`EngineBuilder::build`]
//! freezes everything into an immutable [`Registry`] owned by the engine.

use super::context::ConversionContext;
use super::descriptor::{RawType, TypeDescriptor};
use super::engine::ConversionEngine;
use super::error::{BoxError, BuildError};
use super::policy::{
    DelimiterSplitter, FirstDelimiter, Identity, KeyValueSplitter, NullLiteral, NullMarker,
    Preprocessor, Splitter,
};
use super::value::Value;
use super::Convertible;
use crate::converters;
use crate::strategies::{self, DynamicStrategy, PropertyEditors};

use indexmap::IndexMap;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

/// A registered converter. Exact converters may not decline.
pub type ConverterFn =
    dyn Fn(&str, &ConversionContext<'_>) -> Result<Value, BoxError> + Send + Sync;

/// The frozen set of strategies known to one engine.
pub(crate) struct Registry {
    exact: HashMap<TypeId, Arc<ConverterFn>>,
    assignable: IndexMap<RawType, Arc<ConverterFn>>,
    pub(crate) strategies: Vec<Arc<dyn DynamicStrategy>>,
    pub(crate) catalog: IndexMap<String, TypeDescriptor>,
    pub(crate) splitter: Arc<dyn Splitter>,
    pub(crate) key_value_splitter: Arc<dyn KeyValueSplitter>,
    pub(crate) null_marker: Arc<dyn NullMarker>,
    pub(crate) preprocessor: Arc<dyn Preprocessor>,
}

impl Registry {
    /// Converter for the full type, falling back to its raw type.
    pub(crate) fn exact(&self, descriptor: &TypeDescriptor) -> Option<&Arc<ConverterFn>> {
        self.exact
            .get(&descriptor.id())
            .or_else(|| self.exact.get(&descriptor.raw_type().id()))
    }

    /// First registered supertype converter the descriptor is assignable to.
    pub(crate) fn assignable(
        &self,
        descriptor: &TypeDescriptor,
    ) -> Option<(&RawType, &Arc<ConverterFn>)> {
        self.assignable
            .iter()
            .find(|(supertype, _)| descriptor.is_assignable_to(supertype))
    }
}

/// Catalog names compare without whitespace.
pub(crate) fn catalog_key(name: &str) -> String {
    name.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Single-threaded construction phase of a [`ConversionEngine`].
pub struct EngineBuilder {
    exact: IndexMap<TypeId, (TypeDescriptor, Arc<ConverterFn>)>,
    assignable: IndexMap<RawType, Arc<ConverterFn>>,
    strategies: Vec<Arc<dyn DynamicStrategy>>,
    catalog: Vec<TypeDescriptor>,
    splitter: Arc<dyn Splitter>,
    key_value_splitter: Arc<dyn KeyValueSplitter>,
    null_marker: Arc<dyn NullMarker>,
    preprocessor: Arc<dyn Preprocessor>,
    property_editors: Option<Arc<dyn PropertyEditors>>,
    errors: Vec<BuildError>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineBuilder {
    /// A builder holding the default converters and text policies.
    pub fn new() -> Self {
        let exact = converters::default_converters()
            .into_iter()
            .map(|(descriptor, converter)| (descriptor.id(), (descriptor, converter)))
            .collect();

        Self {
            exact,
            assignable: IndexMap::new(),
            strategies: Vec::new(),
            catalog: converters::default_catalog(),
            splitter: Arc::new(DelimiterSplitter::default()),
            key_value_splitter: Arc::new(FirstDelimiter::default()),
            null_marker: Arc::new(NullLiteral::default()),
            preprocessor: Arc::new(Identity),
            property_editors: None,
            errors: Vec::new(),
        }
    }

    /// Registers an exact-type converter for `T`, replacing any earlier one.
    ///
    /// # Arguments
    /// * `parser` - Parses the (preprocessed) input into a `T`.
    ///
    /// Array types are rejected when the engine is built.
    pub fn register<T, E, F>(self, parser: F) -> Self
    where
        T: Convertible,
        E: Into<BoxError>,
        F: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
    {
        self.register_with_context::<T, _>(move |input, _| parser(input).map_err(Into::into))
    }

    /// Registers an exact-type converter that can call back into the engine.
    pub fn register_with_context<T, F>(mut self, converter: F) -> Self
    where
        T: Convertible,
        F: Fn(&str, &ConversionContext<'_>) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        let descriptor = T::descriptor();
        if descriptor.component_type().is_ok() {
            self.errors.push(BuildError::ArrayRegistration {
                type_name: descriptor.name().to_string(),
            });
            return self;
        }
        let converter: Arc<ConverterFn> = Arc::new(
            move |input: &str, context: &ConversionContext<'_>| -> Result<Value, BoxError> {
                converter(input, context).map(Value::new)
            },
        );
        self.exact.insert(descriptor.id(), (descriptor, converter));
        self
    }

    pub fn unregister<T: Convertible>(mut self) -> Self {
        self.exact.shift_remove(&TypeId::of::<T>());
        self
    }

    /// Registers a converter for every type assignable to `S`.
    ///
    /// `S` is usually a marker from [`kinds`](super::descriptor::kinds) or a
    /// `dyn Trait` that descriptors declare through
    /// [`TypeDescriptor::implements`]. The converter must produce a value of
    /// the requested type, which it can read from the context.
    pub fn register_assignable<S, F>(mut self, converter: F) -> Self
    where
        S: ?Sized + 'static,
        F: Fn(&str, &ConversionContext<'_>) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        self.assignable.insert(RawType::of::<S>(), Arc::new(converter));
        self
    }

    pub fn unregister_assignable<S: ?Sized + 'static>(mut self) -> Self {
        self.assignable.shift_remove(&RawType::of::<S>());
        self
    }

    /// Appends a client strategy; client strategies run before the built-in ones.
    pub fn register_strategy(mut self, strategy: impl DynamicStrategy + 'static) -> Self {
        self.strategies.push(Arc::new(strategy));
        self
    }

    /// Makes `T` resolvable by name.
    pub fn register_type<T: Convertible>(mut self) -> Self {
        self.catalog.push(T::descriptor());
        self
    }

    pub fn splitter(mut self, splitter: impl Splitter + 'static) -> Self {
        self.splitter = Arc::new(splitter);
        self
    }

    pub fn key_value_splitter(mut self, splitter: impl KeyValueSplitter + 'static) -> Self {
        self.key_value_splitter = Arc::new(splitter);
        self
    }

    pub fn null_marker(mut self, marker: impl NullMarker + 'static) -> Self {
        self.null_marker = Arc::new(marker);
        self
    }

    pub fn preprocessor(mut self, preprocessor: impl Preprocessor + 'static) -> Self {
        self.preprocessor = Arc::new(preprocessor);
        self
    }

    /// Enables the property-editor fallback as the lowest-priority strategy.
    pub fn enable_property_editors(mut self, editors: impl PropertyEditors + 'static) -> Self {
        self.property_editors = Some(Arc::new(editors));
        self
    }

    /// Freezes the builder into an engine.
    pub fn build(mut self) -> Result<ConversionEngine, BuildError> {
        if !self.errors.is_empty() {
            return Err(self.errors.remove(0));
        }
        Ok(self.freeze())
    }

    pub(crate) fn freeze(self) -> ConversionEngine {
        let mut catalog = IndexMap::new();
        for descriptor in self.exact.values().map(|(descriptor, _)| descriptor).chain(&self.catalog) {
            catalog.insert(catalog_key(descriptor.name()), descriptor.clone());
        }

        let mut strategies = self.strategies;
        let client_strategies = strategies.len();
        strategies.extend(strategies::builtin(self.property_editors));

        tracing::info!(
            exact = self.exact.len(),
            assignable = self.assignable.len(),
            client_strategies,
            strategies = strategies.len(),
            known_types = catalog.len(),
            "conversion engine built"
        );

        ConversionEngine::from_registry(Registry {
            exact: self
                .exact
                .into_iter()
                .map(|(id, (_, converter))| (id, converter))
                .collect(),
            assignable: self.assignable,
            strategies,
            catalog,
            splitter: self.splitter,
            key_value_splitter: self.key_value_splitter,
            null_marker: self.null_marker,
            preprocessor: self.preprocessor,
        })
    }
}
