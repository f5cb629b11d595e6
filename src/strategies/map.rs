use super::DynamicStrategy;
use crate::core::{ConversionContext, ConversionError, ErrorKind, Probe, Shape, TypeDescriptor, Value};

/// Builds maps from `key=value` elements. Later duplicates overwrite
/// earlier ones.
pub struct MapStrategy;

impl DynamicStrategy for MapStrategy {
    fn name(&self) -> &str {
        "map"
    }

    fn applies_to(&self, descriptor: &TypeDescriptor, probe: &Probe<'_>) -> Result<bool, ConversionError> {
        match descriptor.shape() {
            Shape::Map(shape) => Ok(probe.is_convertible(&shape.key)? && probe.is_convertible(&shape.value)?),
            _ => Ok(false),
        }
    }

    fn convert(&self, context: &ConversionContext<'_>) -> Result<Option<Value>, ConversionError> {
        let descriptor = context.descriptor();
        let Shape::Map(shape) = descriptor.shape() else {
            return Err(ConversionError::no_strategy(descriptor));
        };
        let Some(assemble) = shape.assemble else {
            return Err(ConversionError::new(
                ErrorKind::ConversionFailed,
                format!("{descriptor} has no default construction path; register a converter for it"),
            ));
        };

        let elements = if context.is_null() {
            Vec::new()
        } else {
            context.split(context.input())?
        };

        let mut pairs = Vec::with_capacity(elements.len());
        for (index, element) in elements.iter().enumerate() {
            let (key, value) = context.split_key_value(element)?;
            let key = context.convert_element(index, &key, &shape.key)?;
            let value = context.convert_element(index, &value, &shape.value)?;
            pairs.push((key, value));
        }

        assemble(pairs)
            .map(Some)
            .map_err(|cause| ConversionError::caused_by(ErrorKind::ConversionFailed, cause))
    }
}
