use super::enumeration::parse_variant;
use super::DynamicStrategy;
use crate::core::{
    CollectionKind, ConversionContext, ConversionError, ErrorKind, Probe, Shape, TypeDescriptor, Value,
};

/// Sets of enum variants. Runs before [`CollectionStrategy`](super::CollectionStrategy)
/// because every enum set is also a collection.
pub struct EnumSetStrategy;

impl DynamicStrategy for EnumSetStrategy {
    fn name(&self) -> &str {
        "enum-set"
    }

    fn applies_to(&self, descriptor: &TypeDescriptor, _probe: &Probe<'_>) -> Result<bool, ConversionError> {
        Ok(match descriptor.shape() {
            Shape::Collection(shape) => {
                matches!(shape.kind, CollectionKind::Set | CollectionKind::SortedSet)
                    && shape.element.is_enum()
            }
            _ => false,
        })
    }

    fn convert(&self, context: &ConversionContext<'_>) -> Result<Option<Value>, ConversionError> {
        let descriptor = context.descriptor();
        let Shape::Collection(shape) = descriptor.shape() else {
            return Err(ConversionError::no_strategy(descriptor));
        };
        let Shape::Enum(variants) = shape.element.shape() else {
            return Err(ConversionError::no_strategy(descriptor));
        };
        descriptor.raw_type_arguments()?;
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

        let values = elements
            .iter()
            .enumerate()
            .map(|(index, element)| {
                if context.marks_null(element) {
                    return Err(context.absent_element(index, element));
                }
                parse_variant(variants, &shape.element, element)
                    .map_err(|error| error.in_frame(|| context.frame_for(element, &shape.element)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        assemble(values)
            .map(Some)
            .map_err(|cause| ConversionError::caused_by(ErrorKind::ConversionFailed, cause))
    }
}
