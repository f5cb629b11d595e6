pub mod context;
pub mod convertible;
pub mod descriptor;
pub mod engine;
pub mod entry;
pub mod error;
pub mod policy;
pub mod registry;
pub mod value;

pub use context::{ConversionContext, Probe, MAX_DEPTH};
pub use convertible::Convertible;
pub use descriptor::{kinds, CollectionKind, MapKind, RawType, Shape, TypeDescriptor};
pub use engine::ConversionEngine;
pub use entry::{Argument, EntryKind, EntryPoint};
pub use error::{BoxError, BuildError, ConversionError, DescriptorError, ErrorKind, Frame};
pub use policy::{
    DelimiterSplitter, FirstDelimiter, Identity, KeyValueSplitter, NullLiteral, NullMarker, Preprocessor,
    RegexSplitter, Splitter, Trim,
};
pub use registry::{ConverterFn, EngineBuilder};
pub use value::Value;
