//! Default Converters
//!
//! The exact-type converter table every builder starts from, and the
//! container types that are resolvable by name out of the box. Both are
//! plain values produced on demand, so every engine gets its own copy.

pub mod numeric;
pub mod values;

use crate::core::{
    BoxError, CollectionKind, ConversionContext, ConverterFn, Convertible, MapKind, TypeDescriptor, Value,
};

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Arc;

/// Failure of a built-in scalar converter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    #[error("\"{input}\" is not a valid {type_name} number.")]
    InvalidNumber { input: String, type_name: String },

    #[error("\"{input}\" is out of range for {type_name}.")]
    OutOfRange { input: String, type_name: String },

    #[error("\"{input}\" is not parsable to a Boolean.")]
    InvalidBoolean { input: String },

    #[error("\"{input}\" must only contain a single character.")]
    InvalidCharacter { input: String },
}

fn converter<T, E>(parse: fn(&str) -> Result<T, E>) -> (TypeDescriptor, Arc<ConverterFn>)
where
    T: Convertible,
    E: Into<BoxError> + 'static,
{
    let converter: Arc<ConverterFn> = Arc::new(
        move |input: &str, _context: &ConversionContext<'_>| -> Result<Value, BoxError> {
            parse(input).map(Value::new).map_err(Into::into)
        },
    );
    (T::descriptor(), converter)
}

/// Exact-type converters for the built-in scalar types.
pub fn default_converters() -> Vec<(TypeDescriptor, Arc<ConverterFn>)> {
    use numeric::{parse_float, parse_integer, parse_number};
    use values::{parse_bool, parse_char, parse_path, parse_string, parse_url, parse_uuid};

    vec![
        converter(parse_bool),
        converter(parse_char),
        converter(parse_integer::<i8>),
        converter(parse_integer::<i16>),
        converter(parse_integer::<i32>),
        converter(parse_integer::<i64>),
        converter(parse_integer::<isize>),
        converter(parse_integer::<u8>),
        converter(parse_integer::<u16>),
        converter(parse_integer::<u32>),
        converter(parse_integer::<u64>),
        converter(parse_integer::<usize>),
        converter(parse_integer::<i128>),
        converter(parse_integer::<u128>),
        converter(parse_float::<f32>),
        converter(parse_float::<f64>),
        converter(parse_number),
        converter(parse_string),
        converter(parse_path),
        converter(parse_url),
        converter(parse_uuid),
    ]
}

/// Container types known by name without any registration.
pub fn default_catalog() -> Vec<TypeDescriptor> {
    vec![
        TypeDescriptor::of::<TypeDescriptor>(),
        TypeDescriptor::of::<Vec<String>>(),
        TypeDescriptor::of::<Vec<i64>>(),
        TypeDescriptor::of::<Vec<f64>>(),
        TypeDescriptor::of::<Vec<bool>>(),
        TypeDescriptor::of::<HashMap<String, String>>(),
        TypeDescriptor::of::<HashMap<String, i64>>(),
        TypeDescriptor::of::<BTreeMap<String, String>>(),
        TypeDescriptor::raw_collection(CollectionKind::List),
        TypeDescriptor::raw_collection(CollectionKind::Set),
        TypeDescriptor::raw_collection(CollectionKind::SortedSet),
        TypeDescriptor::raw_collection(CollectionKind::Queue),
        TypeDescriptor::raw_collection(CollectionKind::Deque),
        TypeDescriptor::raw_map(MapKind::Unsorted),
        TypeDescriptor::raw_map(MapKind::Sorted),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConversionEngine;

    #[test]
    fn test_default_table_is_fresh_per_call() {
        let first = default_converters();
        let second = default_converters();
        assert_eq!(first.len(), second.len());
        assert!(!Arc::ptr_eq(&first[0].1, &second[0].1));
    }

    #[test]
    fn test_default_names_resolve() {
        let engine = ConversionEngine::default();
        for name in ["bool", "i64", "String", "Url", "Uuid", "Number", "PathBuf", "Vec<String>", "SortedMapping"] {
            assert!(engine.type_named(name).is_some(), "{name} should be known");
        }
        assert_eq!(
            engine.type_named("HashMap<String,i64>"),
            Some(&TypeDescriptor::of::<HashMap<String, i64>>())
        );
    }
}
