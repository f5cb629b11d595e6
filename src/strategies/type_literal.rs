use super::DynamicStrategy;
use crate::core::{ConversionContext, ConversionError, ErrorKind, Probe, Shape, TypeDescriptor, Value};

/// Resolves a type name to its [`TypeDescriptor`] through the engine's catalog.
pub struct TypeLiteralStrategy;

impl DynamicStrategy for TypeLiteralStrategy {
    fn name(&self) -> &str {
        "type-literal"
    }

    fn applies_to(&self, descriptor: &TypeDescriptor, _probe: &Probe<'_>) -> Result<bool, ConversionError> {
        Ok(matches!(descriptor.shape(), Shape::TypeLiteral))
    }

    fn convert(&self, context: &ConversionContext<'_>) -> Result<Option<Value>, ConversionError> {
        let name = context.input().trim();
        match context.engine().type_named(name) {
            Some(descriptor) => Ok(Some(Value::new(descriptor.clone()))),
            None => Err(ConversionError::new(
                ErrorKind::ConversionFailed,
                format!("\"{name}\" does not name a known type"),
            )),
        }
    }
}
