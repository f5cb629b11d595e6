//! Type Descriptors
//!
//! A [`TypeDescriptor`] is the normalized form of a requested conversion
//! target. Plain values, enums, arrays, collections and maps all share the
//! same descriptor type; the [`Shape`] tells the engine which strategy family
//! can build the value, and carries the monomorphized functions that
//! assemble typed containers from type-erased elements.
//!
//! Descriptors are cheap to clone (`Arc` shared) and immutable. Derived
//! fields (short display name, raw type arguments) are computed on first
//! access and cached for the lifetime of the descriptor.

use super::entry::EntryPoint;
use super::error::{BoxError, DescriptorError};
use super::value::Value;
use super::Convertible;

use indexmap::IndexSet;
use regex::Regex;
use std::any::{Any, TypeId};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::{Arc, LazyLock, OnceLock};

static PATH_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z_][A-Za-z0-9_]*::").expect("static pattern"));

/// Strips module paths from a `std::any::type_name` rendering.
///
/// `alloc::vec::Vec<alloc::string::String>` becomes `Vec<String>`.
pub fn short_type_name(full: &str) -> String {
    PATH_PREFIX.replace_all(full, "").into_owned()
}

/// Placeholder argument used to key the erasure of generic families.
#[derive(Debug)]
pub struct Erased;

/// Marker types standing in for abstract container "interfaces".
///
/// They are never instantiated; they only serve as assignable-type keys and
/// as the identity of raw (unparameterized) container requests.
pub mod kinds {
    pub enum Collection {}
    pub enum List {}
    pub enum Set {}
    pub enum SortedSet {}
    pub enum Queue {}
    pub enum Deque {}
    pub enum Mapping {}
    pub enum SortedMapping {}
}

/// Erasure key of a type: the type without its arguments.
#[derive(Clone, Copy)]
pub struct RawType {
    id: TypeId,
    name: &'static str,
}

impl RawType {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Raw type keyed by `T` but displayed under `name`.
    pub fn named<T: ?Sized + 'static>(name: &'static str) -> Self {
        Self {
            id: TypeId::of::<T>(),
            name,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> String {
        short_type_name(self.name)
    }
}

impl PartialEq for RawType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for RawType {}

impl Hash for RawType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for RawType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RawType({})", self.name())
    }
}

/// Abstract collection family a collection descriptor belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollectionKind {
    List,
    Set,
    SortedSet,
    Queue,
    Deque,
}

impl CollectionKind {
    pub fn supertypes(self) -> Vec<RawType> {
        let mut supertypes = vec![RawType::named::<kinds::Collection>("Collection")];
        match self {
            CollectionKind::List => supertypes.push(RawType::named::<kinds::List>("List")),
            CollectionKind::Set => supertypes.push(RawType::named::<kinds::Set>("Set")),
            CollectionKind::SortedSet => {
                supertypes.push(RawType::named::<kinds::Set>("Set"));
                supertypes.push(RawType::named::<kinds::SortedSet>("SortedSet"));
            }
            CollectionKind::Queue => supertypes.push(RawType::named::<kinds::Queue>("Queue")),
            CollectionKind::Deque => {
                supertypes.push(RawType::named::<kinds::Queue>("Queue"));
                supertypes.push(RawType::named::<kinds::Deque>("Deque"));
            }
        }
        supertypes
    }

    fn marker(self) -> RawType {
        match self {
            CollectionKind::List => RawType::named::<kinds::List>("List"),
            CollectionKind::Set => RawType::named::<kinds::Set>("Set"),
            CollectionKind::SortedSet => RawType::named::<kinds::SortedSet>("SortedSet"),
            CollectionKind::Queue => RawType::named::<kinds::Queue>("Queue"),
            CollectionKind::Deque => RawType::named::<kinds::Deque>("Deque"),
        }
    }

    /// Container used when the request names only the kind.
    fn default_assembler(self) -> Assembler {
        match self {
            CollectionKind::List => assemble_collection::<Vec<String>, String>,
            CollectionKind::Set => assemble_collection::<IndexSet<String>, String>,
            CollectionKind::SortedSet => assemble_collection::<BTreeSet<String>, String>,
            CollectionKind::Queue | CollectionKind::Deque => {
                assemble_collection::<VecDeque<String>, String>
            }
        }
    }
}

/// Abstract map family a map descriptor belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapKind {
    Unsorted,
    Sorted,
}

impl MapKind {
    pub fn supertypes(self) -> Vec<RawType> {
        let mut supertypes = vec![RawType::named::<kinds::Mapping>("Mapping")];
        if self == MapKind::Sorted {
            supertypes.push(RawType::named::<kinds::SortedMapping>("SortedMapping"));
        }
        supertypes
    }

    fn marker(self) -> RawType {
        match self {
            MapKind::Unsorted => RawType::named::<kinds::Mapping>("Mapping"),
            MapKind::Sorted => RawType::named::<kinds::SortedMapping>("SortedMapping"),
        }
    }

    fn default_assembler(self) -> MapAssembler {
        match self {
            MapKind::Unsorted => assemble_map::<indexmap::IndexMap<String, String>, String, String>,
            MapKind::Sorted => assemble_map::<BTreeMap<String, String>, String, String>,
        }
    }
}

/// Builds a container value from converted elements.
pub type Assembler = fn(Vec<Value>) -> Result<Value, BoxError>;

/// Builds a map value from converted key/value pairs.
pub type MapAssembler = fn(Vec<(Value, Value)>) -> Result<Value, BoxError>;

#[derive(Clone)]
pub struct EnumShape {
    pub variants: &'static [&'static str],
    pub(crate) parse: fn(&str) -> Option<Value>,
}

#[derive(Clone)]
pub struct ArrayShape {
    pub component: TypeDescriptor,
    /// Fixed length for `[T; N]`, `None` for boxed slices.
    pub length: Option<usize>,
    pub(crate) assemble: Assembler,
}

#[derive(Clone)]
pub struct CollectionShape {
    pub kind: CollectionKind,
    pub element: TypeDescriptor,
    pub(crate) assemble: Option<Assembler>,
}

#[derive(Clone)]
pub struct MapShape {
    pub kind: MapKind,
    pub key: TypeDescriptor,
    pub value: TypeDescriptor,
    pub(crate) assemble: Option<MapAssembler>,
}

/// Structural family of a descriptor.
#[derive(Clone)]
pub enum Shape {
    Scalar,
    Enum(EnumShape),
    /// A [`TypeDescriptor`] requested as a value, resolved by name.
    TypeLiteral,
    Array(ArrayShape),
    Collection(CollectionShape),
    Map(MapShape),
}

impl Shape {
    pub fn name(&self) -> &'static str {
        match self {
            Shape::Scalar => "scalar",
            Shape::Enum(_) => "enum",
            Shape::TypeLiteral => "type literal",
            Shape::Array(_) => "array",
            Shape::Collection(_) => "collection",
            Shape::Map(_) => "map",
        }
    }
}

#[derive(Clone)]
struct Parts {
    id: TypeId,
    full_name: &'static str,
    raw: RawType,
    primitive: bool,
    parameterized: bool,
    shape: Shape,
    supertypes: Vec<RawType>,
    entry_points: Option<fn() -> Vec<EntryPoint>>,
}

struct Inner {
    parts: Parts,
    name: OnceLock<String>,
    raw_arguments: OnceLock<Result<Vec<RawType>, DescriptorError>>,
}

/// Normalized description of a conversion target.
#[derive(Clone)]
pub struct TypeDescriptor(Arc<Inner>);

impl TypeDescriptor {
    fn from_parts(parts: Parts) -> Self {
        Self(Arc::new(Inner {
            parts,
            name: OnceLock::new(),
            raw_arguments: OnceLock::new(),
        }))
    }

    fn rebuild(self, adjust: impl FnOnce(&mut Parts)) -> Self {
        let mut parts = self.0.parts.clone();
        adjust(&mut parts);
        Self::from_parts(parts)
    }

    /// Descriptor of any [`Convertible`] type.
    pub fn of<T: Convertible>() -> Self {
        T::descriptor()
    }

    /// A plain, non-primitive value type.
    pub fn scalar<T: Any + fmt::Debug + Send>() -> Self {
        Self::from_parts(Parts {
            id: TypeId::of::<T>(),
            full_name: std::any::type_name::<T>(),
            raw: RawType::of::<T>(),
            primitive: false,
            parameterized: false,
            shape: Shape::Scalar,
            supertypes: Vec::new(),
            entry_points: None,
        })
    }

    /// A scalar that cannot represent absence.
    pub fn primitive<T: Any + fmt::Debug + Send>() -> Self {
        Self::scalar::<T>().rebuild(|parts| parts.primitive = true)
    }

    /// A fieldless enum parsed by variant name.
    pub fn enumeration<E>() -> Self
    where
        E: FromStr + strum::VariantNames + Any + fmt::Debug + Send,
    {
        Self::scalar::<E>().rebuild(|parts| {
            parts.shape = Shape::Enum(EnumShape {
                variants: E::VARIANTS,
                parse: parse_variant::<E>,
            })
        })
    }

    pub(crate) fn type_literal() -> Self {
        Self::scalar::<TypeDescriptor>().rebuild(|parts| parts.shape = Shape::TypeLiteral)
    }

    /// A collection `C` of `E`, built through `FromIterator`.
    pub fn collection<C, E>(raw: RawType, kind: CollectionKind) -> Self
    where
        C: FromIterator<E> + Any + fmt::Debug + Send,
        E: Convertible,
    {
        Self::from_parts(Parts {
            id: TypeId::of::<C>(),
            full_name: std::any::type_name::<C>(),
            raw,
            primitive: false,
            parameterized: true,
            shape: Shape::Collection(CollectionShape {
                kind,
                element: E::descriptor(),
                assemble: Some(assemble_collection::<C, E>),
            }),
            supertypes: kind.supertypes(),
            entry_points: None,
        })
    }

    /// A collection type the engine knows the shape of but cannot build.
    pub fn declared_collection<C: Any>(kind: CollectionKind, element: TypeDescriptor) -> Self {
        Self::from_parts(Parts {
            id: TypeId::of::<C>(),
            full_name: std::any::type_name::<C>(),
            raw: RawType::of::<C>(),
            primitive: false,
            parameterized: true,
            shape: Shape::Collection(CollectionShape {
                kind,
                element,
                assemble: None,
            }),
            supertypes: kind.supertypes(),
            entry_points: None,
        })
    }

    /// A map `M` from `K` to `V`, built through `FromIterator`.
    pub fn map<M, K, V>(raw: RawType, kind: MapKind) -> Self
    where
        M: FromIterator<(K, V)> + Any + fmt::Debug + Send,
        K: Convertible,
        V: Convertible,
    {
        Self::from_parts(Parts {
            id: TypeId::of::<M>(),
            full_name: std::any::type_name::<M>(),
            raw,
            primitive: false,
            parameterized: true,
            shape: Shape::Map(MapShape {
                kind,
                key: K::descriptor(),
                value: V::descriptor(),
                assemble: Some(assemble_map::<M, K, V>),
            }),
            supertypes: kind.supertypes(),
            entry_points: None,
        })
    }

    /// An unparameterized collection request; elements are plain text.
    pub fn raw_collection(kind: CollectionKind) -> Self {
        let marker = kind.marker();
        Self::from_parts(Parts {
            id: marker.id(),
            full_name: marker.name,
            raw: marker,
            primitive: false,
            parameterized: false,
            shape: Shape::Collection(CollectionShape {
                kind,
                element: String::descriptor(),
                assemble: Some(kind.default_assembler()),
            }),
            supertypes: kind.supertypes(),
            entry_points: None,
        })
    }

    /// An unparameterized map request; keys and values are plain text.
    pub fn raw_map(kind: MapKind) -> Self {
        let marker = kind.marker();
        Self::from_parts(Parts {
            id: marker.id(),
            full_name: marker.name,
            raw: marker,
            primitive: false,
            parameterized: false,
            shape: Shape::Map(MapShape {
                kind,
                key: String::descriptor(),
                value: String::descriptor(),
                assemble: Some(kind.default_assembler()),
            }),
            supertypes: kind.supertypes(),
            entry_points: None,
        })
    }

    /// `Box<[T]>`, any number of elements.
    pub fn boxed_slice<T: Convertible>() -> Self {
        Self::from_parts(Parts {
            id: TypeId::of::<Box<[T]>>(),
            full_name: std::any::type_name::<Box<[T]>>(),
            raw: RawType::named::<Box<[Erased]>>("Box<[_]>"),
            primitive: false,
            parameterized: false,
            shape: Shape::Array(ArrayShape {
                component: T::descriptor(),
                length: None,
                assemble: assemble_boxed_slice::<T>,
            }),
            supertypes: Vec::new(),
            entry_points: None,
        })
    }

    /// `[T; N]`, exactly `N` elements.
    pub fn array<T: Convertible, const N: usize>() -> Self {
        Self::from_parts(Parts {
            id: TypeId::of::<[T; N]>(),
            full_name: std::any::type_name::<[T; N]>(),
            raw: RawType::named::<[Erased; N]>("[_; N]"),
            primitive: false,
            parameterized: false,
            shape: Shape::Array(ArrayShape {
                component: T::descriptor(),
                length: Some(N),
                assemble: assemble_array::<T, N>,
            }),
            supertypes: Vec::new(),
            entry_points: None,
        })
    }

    /// The nullable form of this descriptor; absence becomes a valid result.
    pub fn boxed(self) -> Self {
        self.rebuild(|parts| parts.primitive = false)
    }

    /// Declares `S` as a supertype for assignable-type lookup.
    pub fn implements<S: ?Sized + 'static>(self) -> Self {
        self.rebuild(|parts| parts.supertypes.push(RawType::of::<S>()))
    }

    /// Declares the single-argument factories and constructors of this type.
    pub fn with_entry_points(self, entry_points: fn() -> Vec<EntryPoint>) -> Self {
        self.rebuild(|parts| parts.entry_points = Some(entry_points))
    }

    pub fn id(&self) -> TypeId {
        self.0.parts.id
    }

    /// Short display name, e.g. `HashMap<String, i32>`.
    pub fn name(&self) -> &str {
        self.0.name.get_or_init(|| short_type_name(self.0.parts.full_name))
    }

    pub fn full_name(&self) -> &'static str {
        self.0.parts.full_name
    }

    pub fn raw_type(&self) -> RawType {
        self.0.parts.raw
    }

    pub fn is_primitive(&self) -> bool {
        self.0.parts.primitive
    }

    pub fn is_parameterized(&self) -> bool {
        self.0.parts.parameterized
    }

    pub fn shape(&self) -> &Shape {
        &self.0.parts.shape
    }

    /// The runtime descriptor family, used in diagnostics.
    pub fn shape_name(&self) -> &'static str {
        self.shape().name()
    }

    pub fn supertypes(&self) -> &[RawType] {
        &self.0.parts.supertypes
    }

    pub fn is_container(&self) -> bool {
        matches!(
            self.shape(),
            Shape::Array(_) | Shape::Collection(_) | Shape::Map(_)
        )
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.shape(), Shape::Enum(_))
    }

    /// Whether a value of this type can be used where `target` is expected.
    pub fn is_assignable_to(&self, target: &RawType) -> bool {
        self.id() == target.id()
            || self.raw_type() == *target
            || self.supertypes().contains(target)
    }

    /// Declared entry points, in declaration order.
    pub fn entry_points(&self) -> Vec<EntryPoint> {
        self.0.parts.entry_points.map(|list| list()).unwrap_or_default()
    }

    /// Full descriptors of the type arguments.
    pub fn type_arguments(&self) -> Result<Vec<TypeDescriptor>, DescriptorError> {
        if !self.is_parameterized() {
            return Err(DescriptorError::NotParameterized {
                type_name: self.name().to_string(),
            });
        }
        match self.shape() {
            Shape::Collection(shape) => Ok(vec![shape.element.clone()]),
            Shape::Map(shape) => Ok(vec![shape.key.clone(), shape.value.clone()]),
            _ => Err(DescriptorError::NotParameterized {
                type_name: self.name().to_string(),
            }),
        }
    }

    /// Erased type arguments.
    ///
    /// Only simple arguments are allowed here; a nested parameterized
    /// argument is rejected unless it is a type literal.
    pub fn raw_type_arguments(&self) -> Result<&[RawType], DescriptorError> {
        self.0
            .raw_arguments
            .get_or_init(|| {
                self.type_arguments()?
                    .into_iter()
                    .map(|argument| {
                        let simple = !argument.is_parameterized()
                            && !matches!(argument.shape(), Shape::Array(_));
                        if simple || matches!(argument.shape(), Shape::TypeLiteral) {
                            Ok(argument.raw_type())
                        } else {
                            Err(DescriptorError::NestedParameterization {
                                type_name: self.name().to_string(),
                                argument: argument.name().to_string(),
                            })
                        }
                    })
                    .collect()
            })
            .as_ref()
            .map(Vec::as_slice)
            .map_err(|error| error.clone())
    }

    pub fn component_type(&self) -> Result<&TypeDescriptor, DescriptorError> {
        match self.shape() {
            Shape::Array(shape) => Ok(&shape.component),
            _ => Err(DescriptorError::NotAnArray {
                type_name: self.name().to_string(),
            }),
        }
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeDescriptor({})", self.name())
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn parse_variant<E: FromStr + Any + fmt::Debug + Send>(input: &str) -> Option<Value> {
    E::from_str(input).ok().map(Value::new)
}

fn downcast_element<T: Any>(value: Value) -> Result<T, BoxError> {
    let found = value.type_name();
    value.downcast::<T>().ok_or_else(|| {
        format!(
            "expected a {} element but got {}",
            short_type_name(std::any::type_name::<T>()),
            short_type_name(found)
        )
        .into()
    })
}

fn downcast_all<T: Any>(values: Vec<Value>) -> Result<Vec<T>, BoxError> {
    values.into_iter().map(downcast_element::<T>).collect()
}

fn assemble_collection<C, E>(values: Vec<Value>) -> Result<Value, BoxError>
where
    C: FromIterator<E> + Any + fmt::Debug + Send,
    E: Any,
{
    Ok(Value::new(downcast_all::<E>(values)?.into_iter().collect::<C>()))
}

fn assemble_map<M, K, V>(pairs: Vec<(Value, Value)>) -> Result<Value, BoxError>
where
    M: FromIterator<(K, V)> + Any + fmt::Debug + Send,
    K: Any,
    V: Any,
{
    let entries = pairs
        .into_iter()
        .map(|(key, value)| Ok((downcast_element::<K>(key)?, downcast_element::<V>(value)?)))
        .collect::<Result<Vec<_>, BoxError>>()?;
    Ok(Value::new(entries.into_iter().collect::<M>()))
}

fn assemble_boxed_slice<T: Convertible>(values: Vec<Value>) -> Result<Value, BoxError> {
    Ok(Value::new(downcast_all::<T>(values)?.into_boxed_slice()))
}

fn assemble_array<T: Convertible, const N: usize>(values: Vec<Value>) -> Result<Value, BoxError> {
    let items = downcast_all::<T>(values)?;
    let found = items.len();
    let array: [T; N] = items
        .try_into()
        .map_err(|_| format!("expected exactly {N} elements but found {found}"))?;
    Ok(Value::new(array))
}
