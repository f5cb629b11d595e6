use std::any::{Any, TypeId};
use std::fmt;

/// Object-safe view of a converted value.
trait ErasedValue: Any + Send {
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send>;
    fn debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl<T: Any + fmt::Debug + Send> ErasedValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }

    fn debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A type-erased conversion result.
///
/// Strategies hand values around as `Value` so that containers can be
/// assembled from elements whose concrete type is only known to the
/// descriptor. Callers get their typed value back with [`Value::downcast`].
pub struct Value {
    inner: Box<dyn ErasedValue>,
    type_name: &'static str,
}

impl Value {
    pub fn new<T: Any + fmt::Debug + Send>(value: T) -> Self {
        Self {
            inner: Box::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Fully qualified name of the held type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn type_id(&self) -> TypeId {
        self.inner.as_any().type_id()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.inner.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.as_any().downcast_ref::<T>()
    }

    /// Takes the held value out, or returns `None` if it is not a `T`.
    pub fn downcast<T: Any>(self) -> Option<T> {
        self.inner.into_any().downcast::<T>().ok().map(|boxed| *boxed)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.debug(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downcast_round_trip() {
        let value = Value::new(vec![1_i32, 2, 3]);
        assert!(value.is::<Vec<i32>>());
        assert_eq!(value.downcast_ref::<Vec<i32>>(), Some(&vec![1, 2, 3]));
        assert_eq!(value.downcast::<Vec<i32>>(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_downcast_wrong_type() {
        let value = Value::new(String::from("x"));
        assert_eq!(value.type_name(), "alloc::string::String");
        assert_eq!(value.downcast::<i32>(), None);
    }

    #[test]
    fn test_debug_delegates() {
        let value = Value::new(Some(4_u8));
        assert_eq!(format!("{value:?}"), "Some(4)");
    }
}
