//! Single-argument entry points of user types.
//!
//! The reflective fallback strategies never inspect a type themselves; they
//! ask its descriptor for the list of entry points it declares and try them
//! in declaration order.

use super::descriptor::{short_type_name, TypeDescriptor};
use super::error::BoxError;
use super::value::Value;
use super::Convertible;

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

type Invoker = Arc<dyn Fn(Value) -> Result<Value, BoxError> + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    /// An associated function such as `value_of` or `parse`.
    StaticFactory,
    /// A `new`-style constructor.
    Constructor,
}

/// Type of the single argument an entry point accepts.
#[derive(Clone)]
pub enum Argument {
    /// Plain text; the input is handed over without recursive conversion.
    Text,
    /// Any other convertible type, resolved lazily.
    Typed(fn() -> TypeDescriptor),
}

#[derive(Clone)]
pub struct EntryPoint {
    kind: EntryKind,
    name: &'static str,
    owner: TypeId,
    owner_name: &'static str,
    argument: Argument,
    argument_name: &'static str,
    invoke: Invoker,
}

impl EntryPoint {
    /// Declares a static factory `T::name(A) -> Result<T, E>`.
    pub fn factory<T, A, E, F>(name: &'static str, function: F) -> Self
    where
        T: Convertible,
        A: Convertible,
        E: Into<BoxError>,
        F: Fn(A) -> Result<T, E> + Send + Sync + 'static,
    {
        Self::declare(EntryKind::StaticFactory, name, function)
    }

    /// Declares a constructor `T::name(A) -> Result<T, E>`.
    pub fn constructor<T, A, E, F>(name: &'static str, function: F) -> Self
    where
        T: Convertible,
        A: Convertible,
        E: Into<BoxError>,
        F: Fn(A) -> Result<T, E> + Send + Sync + 'static,
    {
        Self::declare(EntryKind::Constructor, name, function)
    }

    fn declare<T, A, E, F>(kind: EntryKind, name: &'static str, function: F) -> Self
    where
        T: Convertible,
        A: Convertible,
        E: Into<BoxError>,
        F: Fn(A) -> Result<T, E> + Send + Sync + 'static,
    {
        let argument = if TypeId::of::<A>() == TypeId::of::<String>() {
            Argument::Text
        } else {
            Argument::Typed(A::descriptor)
        };
        let invoke: Invoker = Arc::new(move |value: Value| -> Result<Value, BoxError> {
            let found = value.type_name();
            let argument = value.downcast::<A>().ok_or_else(|| {
                format!(
                    "argument of type {} cannot be passed as {}",
                    short_type_name(found),
                    short_type_name(std::any::type_name::<A>())
                )
            })?;
            function(argument).map(Value::new).map_err(Into::into)
        });

        Self {
            kind,
            name,
            owner: TypeId::of::<T>(),
            owner_name: std::any::type_name::<T>(),
            argument,
            argument_name: std::any::type_name::<A>(),
            invoke,
        }
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn argument(&self) -> &Argument {
        &self.argument
    }

    /// Whether the entry point produces a value of `descriptor`'s type.
    pub fn builds(&self, descriptor: &TypeDescriptor) -> bool {
        self.owner == descriptor.id()
    }

    /// Human readable signature, e.g. `Point::new(String)`.
    pub fn signature(&self) -> String {
        format!(
            "{}::{}({})",
            short_type_name(self.owner_name),
            self.name,
            short_type_name(self.argument_name)
        )
    }

    pub(crate) fn invoke(&self, argument: Value) -> Result<Value, BoxError> {
        (self.invoke)(argument)
    }
}

impl fmt::Debug for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryPoint")
            .field("kind", &self.kind)
            .field("signature", &self.signature())
            .finish()
    }
}
