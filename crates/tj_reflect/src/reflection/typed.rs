use alloc::boxed::Box;
use alloc::string::String;
use core::any::TypeId;
use core::fmt;
use core::hash::{Hash, Hasher};

use crate::registry::UpcastTable;

// -----------------------------------------------------------------------------
// TypeRef

/// A reference to a Rust type: its [`TypeId`] plus its full type name.
///
/// Equality and hashing only consider the id.
///
/// # Examples
///
/// ```
/// use tj_reflect::TypeRef;
///
/// let ty = TypeRef::of::<Vec<String>>();
/// assert_eq!(ty, TypeRef::of::<Vec<String>>());
/// assert_eq!(ty.short_name(), "Vec<String>");
/// ```
#[derive(Clone, Copy)]
pub struct TypeRef {
    id: TypeId,
    name: &'static str,
}

impl TypeRef {
    /// Returns the `TypeRef` of `T`, which may be unsized (e.g. `dyn Trait`).
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: core::any::type_name::<T>(),
        }
    }

    /// Returns the [`TypeId`].
    #[inline(always)]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Returns the full type name, as [`core::any::type_name`].
    #[inline(always)]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the type name without module paths or `dyn `.
    ///
    /// This is the default class name of a registered type.
    #[inline]
    pub fn short_name(&self) -> String {
        tj_utils::short_type_name(self.name)
    }

    /// Returns `true` if this refers to `T`.
    #[inline]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeRef {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_name())
    }
}

// -----------------------------------------------------------------------------
// DeclaredType

/// The statically declared type of a member, element or root value.
///
/// `Any` accepts every JSON value and is how untyped containers and
/// `Box<dyn Reflect>` slots are described.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeclaredType {
    /// Any JSON value. The value's own kind decides how it is read.
    Any,
    /// A JSON number.
    Number,
    /// A JSON string.
    String,
    /// A JSON boolean.
    Boolean,
    /// A JSON array, described further by an element descriptor.
    Array,
    /// An ISO-8601 date string.
    Date,
    /// A registered (or registrable) type, possibly abstract.
    Type(TypeRef),
}

impl DeclaredType {
    /// Returns the declared type of `T` as an object type.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::Type(TypeRef::of::<T>())
    }

    /// Returns `true` for `Number`, `String` and `Boolean`.
    #[inline]
    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::Number | Self::String | Self::Boolean)
    }

    /// The lower-cased name used in type mismatch messages.
    pub fn display_name(&self) -> String {
        match self {
            Self::Any => String::from("object"),
            Self::Number => String::from("number"),
            Self::String => String::from("string"),
            Self::Boolean => String::from("boolean"),
            Self::Array => String::from("array"),
            Self::Date => String::from("date"),
            Self::Type(ty) => ty.short_name(),
        }
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

// -----------------------------------------------------------------------------
// TypeShape

/// A declared type together with the shapes of its elements.
///
/// `Vec<Vec<String>>` is `Array` of `Array` of `String`.
///
/// # Examples
///
/// ```
/// use tj_reflect::{DeclaredType, Typed};
///
/// let shape = <Vec<Vec<String>> as Typed>::type_shape();
/// assert_eq!(shape.ty, DeclaredType::Array);
///
/// let inner = shape.elements.as_deref().unwrap();
/// assert_eq!(inner.ty, DeclaredType::Array);
/// assert_eq!(inner.elements.as_deref().unwrap().ty, DeclaredType::String);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeShape {
    pub ty: DeclaredType,
    pub elements: Option<Box<TypeShape>>,
}

impl TypeShape {
    /// A shape without elements.
    #[inline]
    pub const fn new(ty: DeclaredType) -> Self {
        Self { ty, elements: None }
    }

    /// An `Array` shape with the given element shape.
    #[inline]
    pub fn array(elements: TypeShape) -> Self {
        Self {
            ty: DeclaredType::Array,
            elements: Some(Box::new(elements)),
        }
    }
}

// -----------------------------------------------------------------------------
// Typed

/// Static declared type of a Rust type.
///
/// Implemented for the built-in reflected types and by `#[derive(Reflect)]`.
pub trait Typed {
    /// Returns the declared shape of `Self`.
    fn type_shape() -> TypeShape;
}

// -----------------------------------------------------------------------------
// Introspect

/// Static member introspection, implemented by `#[derive(Reflect)]`.
///
/// The registry uses it to infer a member's declared type when none was
/// given, and to collect the trait-object casts a type supports.
pub trait Introspect {
    /// Returns the declared shape of the field named `key`.
    fn field_shape(key: &str) -> Option<TypeShape>;

    /// Registers the `Box<dyn Trait>` casts this type supports.
    fn register_upcasts(table: &mut UpcastTable) {
        let _ = table;
    }
}
