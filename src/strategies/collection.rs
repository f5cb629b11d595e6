use super::DynamicStrategy;
use crate::core::{ConversionContext, ConversionError, ErrorKind, Probe, Shape, TypeDescriptor, Value};

/// Builds lists, sets and queues by splitting the input and converting
/// every element to the collection's element type.
pub struct CollectionStrategy;

impl DynamicStrategy for CollectionStrategy {
    fn name(&self) -> &str {
        "collection"
    }

    fn applies_to(&self, descriptor: &TypeDescriptor, probe: &Probe<'_>) -> Result<bool, ConversionError> {
        match descriptor.shape() {
            Shape::Collection(shape) => probe.is_convertible(&shape.element),
            _ => Ok(false),
        }
    }

    fn convert(&self, context: &ConversionContext<'_>) -> Result<Option<Value>, ConversionError> {
        let descriptor = context.descriptor();
        let Shape::Collection(shape) = descriptor.shape() else {
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

        let values = elements
            .iter()
            .enumerate()
            .map(|(index, element)| context.convert_element(index, element, &shape.element))
            .collect::<Result<Vec<_>, _>>()?;

        assemble(values)
            .map(Some)
            .map_err(|cause| ConversionError::caused_by(ErrorKind::ConversionFailed, cause))
    }
}

#[cfg(test)]
mod tests {
    use crate::core::{CollectionKind, ConversionEngine, ErrorKind, TypeDescriptor};
    use indexmap::IndexSet;
    use std::collections::{BTreeSet, LinkedList, VecDeque};

    #[test]
    fn test_list_of_integers() {
        let engine = ConversionEngine::default();
        assert_eq!(engine.convert::<Vec<i32>>("1, 2, 3").unwrap(), Some(vec![1, 2, 3]));
        assert_eq!(
            engine.convert::<LinkedList<u64>>("4,5").unwrap(),
            Some(LinkedList::from([4, 5]))
        );
    }

    #[test]
    fn test_blank_input_gives_empty_collection() {
        let engine = ConversionEngine::default();
        assert_eq!(engine.convert::<Vec<i32>>("   ").unwrap(), Some(Vec::new()));
    }

    #[test]
    fn test_sets_deduplicate() {
        let engine = ConversionEngine::default();
        let set = engine.convert::<BTreeSet<i32>>("3,1,3,2").unwrap().unwrap();
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_raw_kind_requests_use_text_elements() {
        let engine = ConversionEngine::default();

        let value = engine
            .convert_type("b,a,b", &TypeDescriptor::raw_collection(CollectionKind::Set))
            .unwrap()
            .unwrap();
        let set = value.downcast::<IndexSet<String>>().unwrap();
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec!["b", "a"]);

        let value = engine
            .convert_type("x,y", &TypeDescriptor::raw_collection(CollectionKind::Queue))
            .unwrap()
            .unwrap();
        assert_eq!(
            value.downcast::<VecDeque<String>>().unwrap(),
            VecDeque::from(["x".to_string(), "y".to_string()])
        );
    }

    #[test]
    fn test_declared_collection_without_construction_path() {
        #[derive(Debug)]
        struct Ring;

        let engine = ConversionEngine::default();
        let descriptor = TypeDescriptor::declared_collection::<Ring>(
            CollectionKind::List,
            TypeDescriptor::of::<i32>(),
        );
        let error = engine.convert_type("1,2", &descriptor).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::ConversionFailed);
        assert!(error.message().contains("Ring has no default construction path"));
    }
}
