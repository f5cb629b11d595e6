//! Textcast - type-directed conversion of text into typed values
//!
//! A [`ConversionEngine`] answers two questions for any requested type:
//! whether it is convertible at all, and if so, how a string becomes a value
//! of it. Types are described by a [`TypeDescriptor`]; resolution walks
//! exact converters, assignable converters and a chain of fallback
//! strategies (containers, enums, type names, declared factories and
//! constructors), recursing into element types as needed.
//!
//! ```ignore
//! use textcast::ConversionEngine;
//!
//! let engine = ConversionEngine::default();
//! let ports = engine.convert::<Vec<u16>>("80, 443")?;
//! assert_eq!(ports, Some(vec![80, 443]));
//! ```

pub mod config;
pub mod converters;
pub mod core;
pub mod logging;
pub mod strategies;

pub use crate::core::{
    BuildError, CollectionKind, ConversionContext, ConversionEngine, ConversionError, Convertible,
    EngineBuilder, EntryPoint, ErrorKind, MapKind, TypeDescriptor, Value,
};
pub use crate::strategies::{DynamicStrategy, Outcome};
