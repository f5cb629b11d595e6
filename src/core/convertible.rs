use super::descriptor::{CollectionKind, Erased, MapKind, RawType, TypeDescriptor};

use indexmap::{IndexMap, IndexSet};
use std::any::Any;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap, HashMap, HashSet, LinkedList, VecDeque};
use std::fmt::Debug;
use std::hash::Hash;
use std::path::PathBuf;

/// A type the engine can be asked for.
///
/// Implementations only describe the type; how a value is actually produced
/// is decided by the engine from the registry and the descriptor's shape.
///
/// ```ignore
/// impl Convertible for Point {
///     fn descriptor() -> TypeDescriptor {
///         TypeDescriptor::scalar::<Point>()
///             .with_entry_points(|| vec![EntryPoint::constructor("new", Point::new)])
///     }
/// }
/// ```
pub trait Convertible: Any + Debug + Send + Sized {
    fn descriptor() -> TypeDescriptor;
}

macro_rules! primitive {
    ($($ty:ty),* $(,)?) => {
        $(impl Convertible for $ty {
            fn descriptor() -> TypeDescriptor {
                TypeDescriptor::primitive::<$ty>()
            }
        })*
    };
}

macro_rules! scalar {
    ($($ty:ty),* $(,)?) => {
        $(impl Convertible for $ty {
            fn descriptor() -> TypeDescriptor {
                TypeDescriptor::scalar::<$ty>()
            }
        })*
    };
}

primitive!(bool, char, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

// i128/u128 play the role of the big integer types and may be absent.
scalar!(i128, u128, String, PathBuf, url::Url, uuid::Uuid, serde_json::Number);

impl Convertible for TypeDescriptor {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::type_literal()
    }
}

impl<T: Convertible> Convertible for Vec<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::collection::<Self, T>(RawType::named::<Vec<Erased>>("Vec"), CollectionKind::List)
    }
}

impl<T: Convertible> Convertible for LinkedList<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::collection::<Self, T>(
            RawType::named::<LinkedList<Erased>>("LinkedList"),
            CollectionKind::List,
        )
    }
}

impl<T: Convertible> Convertible for VecDeque<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::collection::<Self, T>(
            RawType::named::<VecDeque<Erased>>("VecDeque"),
            CollectionKind::Deque,
        )
    }
}

impl<T: Convertible + Ord> Convertible for BinaryHeap<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::collection::<Self, T>(
            RawType::named::<BinaryHeap<Erased>>("BinaryHeap"),
            CollectionKind::Queue,
        )
    }
}

impl<T: Convertible + Eq + Hash> Convertible for HashSet<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::collection::<Self, T>(RawType::named::<HashSet<Erased>>("HashSet"), CollectionKind::Set)
    }
}

impl<T: Convertible + Eq + Hash> Convertible for IndexSet<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::collection::<Self, T>(RawType::named::<IndexSet<Erased>>("IndexSet"), CollectionKind::Set)
    }
}

impl<T: Convertible + Ord> Convertible for BTreeSet<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::collection::<Self, T>(
            RawType::named::<BTreeSet<Erased>>("BTreeSet"),
            CollectionKind::SortedSet,
        )
    }
}

impl<K: Convertible + Eq + Hash, V: Convertible> Convertible for HashMap<K, V> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::map::<Self, K, V>(RawType::named::<HashMap<Erased, Erased>>("HashMap"), MapKind::Unsorted)
    }
}

impl<K: Convertible + Eq + Hash, V: Convertible> Convertible for IndexMap<K, V> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::map::<Self, K, V>(RawType::named::<IndexMap<Erased, Erased>>("IndexMap"), MapKind::Unsorted)
    }
}

impl<K: Convertible + Ord, V: Convertible> Convertible for BTreeMap<K, V> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::map::<Self, K, V>(RawType::named::<BTreeMap<Erased, Erased>>("BTreeMap"), MapKind::Sorted)
    }
}

impl<T: Convertible> Convertible for Box<[T]> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::boxed_slice::<T>()
    }
}

impl<T: Convertible, const N: usize> Convertible for [T; N] {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::array::<T, N>()
    }
}
