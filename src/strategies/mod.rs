//! Dynamic Strategies
//!
//! Fallback strategies the engine tries, in order, when no exact or
//! assignable converter is registered for a type. Each strategy either
//! declines the type or takes it and converts (possibly failing).
//!
//! Built-in order:
//!
//! array → enum set → collection → map → enum → type literal →
//! static factory → constructor → property editor (opt-in)
//!
//! Client strategies registered on the builder run before all of these.

pub mod array;
pub mod collection;
pub mod enum_set;
pub mod enumeration;
pub mod map;
pub mod property_editor;
pub mod reflective;
pub mod type_literal;

pub use array::ArrayStrategy;
pub use collection::CollectionStrategy;
pub use enum_set::EnumSetStrategy;
pub use enumeration::EnumStrategy;
pub use map::MapStrategy;
pub use property_editor::{PropertyEditor, PropertyEditorStrategy, PropertyEditors};
pub use reflective::EntryPointStrategy;
pub use type_literal::TypeLiteralStrategy;

use crate::core::{ConversionContext, ConversionError, Probe, TypeDescriptor, Value};

use std::sync::Arc;

/// Result of offering a type to a strategy.
#[derive(Debug)]
pub enum Outcome {
    /// The strategy converted the input; `None` is a valid absent value.
    Accepted(Option<Value>),
    /// The strategy does not handle this type; try the next one.
    Declined,
    /// The strategy took the type and failed.
    Failed(ConversionError),
}

/// A fallback conversion strategy that may decline a type.
pub trait DynamicStrategy: Send + Sync {
    fn name(&self) -> &str;

    /// Whether this strategy takes `descriptor`. Must not convert anything.
    fn applies_to(&self, descriptor: &TypeDescriptor, probe: &Probe<'_>) -> Result<bool, ConversionError>;

    /// Converts the context's input. Only called after `applies_to` said yes.
    fn convert(&self, context: &ConversionContext<'_>) -> Result<Option<Value>, ConversionError>;

    fn try_convert(&self, context: &ConversionContext<'_>) -> Outcome {
        match self.applies_to(context.descriptor(), &context.probe()) {
            Ok(false) => Outcome::Declined,
            Ok(true) => match self.convert(context) {
                Ok(value) => Outcome::Accepted(value),
                Err(error) => Outcome::Failed(error),
            },
            Err(error) => Outcome::Failed(error),
        }
    }
}

/// The built-in strategy chain.
///
/// # Arguments
/// * `property_editors` - When present, appends the property-editor fallback.
pub fn builtin(property_editors: Option<Arc<dyn PropertyEditors>>) -> Vec<Arc<dyn DynamicStrategy>> {
    let mut strategies: Vec<Arc<dyn DynamicStrategy>> = vec![
        Arc::new(ArrayStrategy),
        Arc::new(EnumSetStrategy),
        Arc::new(CollectionStrategy),
        Arc::new(MapStrategy),
        Arc::new(EnumStrategy),
        Arc::new(TypeLiteralStrategy),
        Arc::new(EntryPointStrategy::static_factory()),
        Arc::new(EntryPointStrategy::constructor()),
    ];

    if let Some(editors) = property_editors {
        strategies.push(Arc::new(PropertyEditorStrategy::new(editors)));
    }

    strategies
}
