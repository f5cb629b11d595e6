use super::DynamicStrategy;
use crate::core::{ConversionContext, ConversionError, ErrorKind, Probe, Shape, TypeDescriptor, Value};

/// Builds `Box<[T]>` and `[T; N]` element by element.
pub struct ArrayStrategy;

impl DynamicStrategy for ArrayStrategy {
    fn name(&self) -> &str {
        "array"
    }

    fn applies_to(&self, descriptor: &TypeDescriptor, probe: &Probe<'_>) -> Result<bool, ConversionError> {
        match descriptor.shape() {
            Shape::Array(shape) => probe.is_convertible(&shape.component),
            _ => Ok(false),
        }
    }

    fn convert(&self, context: &ConversionContext<'_>) -> Result<Option<Value>, ConversionError> {
        let Shape::Array(shape) = context.descriptor().shape() else {
            return Err(ConversionError::no_strategy(context.descriptor()));
        };

        let elements = if context.is_null() {
            Vec::new()
        } else {
            context.split(context.input())?
        };

        let values = elements
            .iter()
            .enumerate()
            .map(|(index, element)| context.convert_element(index, element, &shape.component))
            .collect::<Result<Vec<_>, _>>()?;

        (shape.assemble)(values)
            .map(Some)
            .map_err(|cause| ConversionError::caused_by(ErrorKind::ConversionFailed, cause))
    }
}

#[cfg(test)]
mod tests {
    use crate::core::{ConversionEngine, ErrorKind};

    #[test]
    fn test_boxed_slice() {
        let engine = ConversionEngine::default();
        let values = engine.convert::<Box<[u8]>>("1, 2,3").unwrap().unwrap();
        assert_eq!(&*values, &[1, 2, 3]);
    }

    #[test]
    fn test_fixed_array_length_is_checked() {
        let engine = ConversionEngine::default();
        assert_eq!(engine.convert::<[i64; 2]>("7,8").unwrap(), Some([7, 8]));

        let error = engine.convert::<[i64; 2]>("7,8,9").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::ConversionFailed);
        assert!(error.message().contains("expected exactly 2 elements but found 3"));
    }

    #[test]
    fn test_element_failure_aborts() {
        let engine = ConversionEngine::default();
        let error = engine.convert::<Box<[i32]>>("1,x,3").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::ConversionFailed);
        let frame = error.frame().unwrap();
        assert_eq!(frame.input(), "x");
        assert_eq!(frame.descriptor().name(), "i32");
        assert_eq!(
            error.to_string(),
            "cannot parse \"1,x,3\" to type Box<[i32]> because: \"x\" is not a valid i32 number."
        );
    }

    #[test]
    fn test_null_gives_empty_array() {
        let engine = ConversionEngine::default();
        let values = engine.convert::<Box<[String]>>("null").unwrap().unwrap();
        assert!(values.is_empty());
    }
}
