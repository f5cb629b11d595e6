use super::DynamicStrategy;
use crate::core::descriptor::EnumShape;
use crate::core::{ConversionContext, ConversionError, ErrorKind, Probe, Shape, TypeDescriptor, Value};

/// Parses fieldless enums by variant name.
pub struct EnumStrategy;

impl DynamicStrategy for EnumStrategy {
    fn name(&self) -> &str {
        "enum"
    }

    fn applies_to(&self, descriptor: &TypeDescriptor, _probe: &Probe<'_>) -> Result<bool, ConversionError> {
        Ok(descriptor.is_enum())
    }

    fn convert(&self, context: &ConversionContext<'_>) -> Result<Option<Value>, ConversionError> {
        let descriptor = context.descriptor();
        let Shape::Enum(shape) = descriptor.shape() else {
            return Err(ConversionError::no_strategy(descriptor));
        };
        parse_variant(shape, descriptor, context.input()).map(Some)
    }
}

/// Parses one trimmed variant name of `descriptor`.
pub(crate) fn parse_variant(
    shape: &EnumShape,
    descriptor: &TypeDescriptor,
    input: &str,
) -> Result<Value, ConversionError> {
    let name = input.trim();
    (shape.parse)(name).ok_or_else(|| {
        ConversionError::new(
            ErrorKind::ConversionFailed,
            format!(
                "\"{name}\" is not a variant of {descriptor}; expected one of [{}]",
                shape.variants.join(", ")
            ),
        )
    })
}

#[cfg(test)]
mod tests {
    use crate::core::{ConversionEngine, Convertible, ErrorKind, TypeDescriptor};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString, strum::VariantNames)]
    enum Color {
        Red,
        Green,
    }

    impl Convertible for Color {
        fn descriptor() -> TypeDescriptor {
            TypeDescriptor::enumeration::<Color>()
        }
    }

    #[test]
    fn test_variant_is_trimmed() {
        let engine = ConversionEngine::default();
        assert_eq!(engine.convert::<Color>(" Green ").unwrap(), Some(Color::Green));
    }

    #[test]
    fn test_unknown_variant_lists_choices() {
        let engine = ConversionEngine::default();
        let error = engine.convert::<Color>("Blue").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::ConversionFailed);
        assert_eq!(
            error.message(),
            "\"Blue\" is not a variant of Color; expected one of [Red, Green]"
        );
    }

    #[test]
    fn test_null_is_absent() {
        let engine = ConversionEngine::default();
        assert_eq!(engine.convert::<Color>("null").unwrap(), None);
    }
}
