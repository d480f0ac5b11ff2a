use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;

use tj_utils::TypeIdMap;

use crate::ops::Object;
use crate::registry::metadata::{Constructor, Inheritance, IntrospectFn};
use crate::registry::{
    KnownTypeScope, KnownTypeTable, Marking, MemberOptions, ObjectOptions, TypeMetadata,
    UpcastTable, build_descriptor,
};
use crate::{Error, Introspect, Reflect, TypeRef};

// -----------------------------------------------------------------------------
// TypeRegistry

/// The metadata store driving the [`Writer`](crate::serde::Writer) and
/// [`Reader`](crate::serde::Reader).
///
/// A type takes part in typed serialization once it is [registered]. Members
/// are added afterwards, either directly with [`add_member`] or through the
/// returned [`Registration`].
///
/// # Example
///
/// ```
/// use tj_reflect::derive::Reflect;
/// use tj_reflect::registry::{MemberOptions, ObjectOptions, TypeRegistry};
///
/// #[derive(Reflect, Default)]
/// struct Point {
///     x: f64,
///     y: f64,
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry
///     .register::<Point>(ObjectOptions::new().name("pt"))
///     .member("x", MemberOptions::new()).unwrap()
///     .member("y", MemberOptions::new().order(0)).unwrap();
///
/// let meta = registry.get_metadata(core::any::TypeId::of::<Point>()).unwrap();
/// assert_eq!(meta.class_name(), "pt");
///
/// let order: Vec<_> = meta.sorted_members().iter().map(|m| m.name.as_str()).collect();
/// assert_eq!(order, ["y", "x"]);
/// ```
///
/// [registered]: TypeRegistry::register
/// [`add_member`]: TypeRegistry::add_member
pub struct TypeRegistry {
    type_meta_table: TypeIdMap<TypeMetadata>,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Creates an empty [`TypeRegistry`].
    #[inline]
    pub const fn new() -> Self {
        Self {
            type_meta_table: TypeIdMap::new(),
        }
    }

    /// Registers `T` as a serializable object type.
    ///
    /// Registering again is allowed: options given later are applied on top,
    /// members are kept.
    ///
    /// Failures that do not prevent the registration, such as unregistered
    /// known types, are logged and collected in [`Registration::reported`].
    pub fn register<T: Object + Default + Introspect>(
        &mut self,
        options: ObjectOptions,
    ) -> Registration<'_> {
        let mut upcasts = UpcastTable::new();
        upcasts.insert::<T>(|value| value.downcast::<T>());
        T::register_upcasts(&mut upcasts);

        let behavior = Behavior {
            constructor: Some(construct::<T>),
            introspect: Some(T::field_shape),
            upcasts: Some(upcasts),
        };
        self.register_internal(TypeRef::of::<T>(), behavior, options)
    }

    /// Registers a type that is never constructed by the reader, typically a
    /// trait object such as `dyn Shape`.
    ///
    /// Values declared with an abstract type need a type hint, or an
    /// [`initializer`](ObjectOptions::initializer).
    ///
    /// # Example
    ///
    /// ```
    /// use tj_reflect::Reflect;
    /// use tj_reflect::registry::{ObjectOptions, TypeRegistry};
    ///
    /// trait Shape: Reflect {}
    ///
    /// let mut registry = TypeRegistry::new();
    /// registry.register_abstract::<dyn Shape>(ObjectOptions::new());
    ///
    /// let meta = registry.get_metadata(core::any::TypeId::of::<dyn Shape>()).unwrap();
    /// assert!(meta.is_abstract());
    /// assert_eq!(meta.class_name(), "Shape");
    /// ```
    pub fn register_abstract<T: ?Sized + 'static>(
        &mut self,
        options: ObjectOptions,
    ) -> Registration<'_> {
        let behavior = Behavior {
            constructor: None,
            introspect: None,
            upcasts: None,
        };
        self.register_internal(TypeRef::of::<T>(), behavior, options)
    }

    fn register_internal(
        &mut self,
        ty: TypeRef,
        behavior: Behavior,
        options: ObjectOptions,
    ) -> Registration<'_> {
        let mut reported = Vec::new();
        let class = options.name.clone().unwrap_or_else(|| ty.short_name());

        let inheritance = match options.parent {
            Some(parent) if parent == ty => {
                reported.push(Error::Configuration(format!(
                    "'{class}' cannot extend itself."
                )));
                None
            }
            Some(parent) => match self.record(parent.id()) {
                Some(meta) => Some(meta.inheritance()),
                None => {
                    reported.push(Error::Configuration(format!(
                        "Parent type '{}' is not registered (on '{class}').",
                        parent.short_name()
                    )));
                    Some(Inheritance {
                        ty: parent,
                        class_name: parent.short_name(),
                        members: Vec::new(),
                        known_types: Vec::new(),
                        ancestors: Vec::new(),
                    })
                }
            },
            None => None,
        };

        let meta = self
            .type_meta_table
            .get_or_insert(ty.id(), || TypeMetadata::new(ty));

        meta.marking = Marking::Explicit;
        if let Some(constructor) = behavior.constructor {
            meta.constructor = Some(constructor);
        }
        if let Some(introspect) = behavior.introspect {
            meta.introspect = Some(introspect);
        }
        if let Some(upcasts) = behavior.upcasts {
            meta.upcasts = upcasts;
        }
        if let Some(inheritance) = inheritance {
            meta.inherit(inheritance);
        }
        if let Some(name) = options.name {
            meta.class_name = name;
        }
        for known in options.known_types {
            meta.add_known_type(known);
        }
        if let Some(initializer) = options.initializer {
            meta.initializer = Some(initializer);
        }
        if let Some(serializer) = options.serializer {
            meta.serializer = Some(serializer);
        }
        meta.add_known_type(ty);

        for err in &reported {
            log::error!("{err}");
        }

        self.invalidate_known_types();
        Registration {
            registry: self,
            ty,
            reported,
        }
    }

    /// Adds a serializable member to `T`.
    ///
    /// Creates an implicit record if `T` has none yet, so members may be
    /// added before the type itself is registered.
    ///
    /// # Errors
    ///
    /// - [`Error::Configuration`] for a reserved name, a missing type or an
    ///   array member without element type.
    /// - [`Error::DuplicateMember`] if another member already uses the name.
    #[inline]
    pub fn add_member<T: ?Sized + 'static>(
        &mut self,
        key: &str,
        options: MemberOptions,
    ) -> Result<(), Error> {
        self.add_member_to(TypeRef::of::<T>(), key, options)
    }

    /// Adds a serializable member to the type `ty`.
    ///
    /// See [`add_member`](Self::add_member).
    pub fn add_member_to(
        &mut self,
        ty: TypeRef,
        key: &str,
        options: MemberOptions,
    ) -> Result<(), Error> {
        let meta = self
            .type_meta_table
            .get_or_insert(ty.id(), || TypeMetadata::new(ty));

        let inferred = meta.field_shape(key);
        let descriptor = build_descriptor(&meta.class_name, key, options, inferred.as_ref())?;
        meta.insert_member(descriptor)?;

        self.invalidate_known_types();
        Ok(())
    }

    fn invalidate_known_types(&mut self) {
        for meta in self.type_meta_table.values_mut() {
            meta.known_type_cache.take();
        }
    }

    /// Returns `true` if the type has a record, explicit or implicit.
    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.type_meta_table.contains(&type_id)
    }

    /// Returns the metadata of a registered type.
    ///
    /// Implicit records, created only by adding members, are ignored.
    #[inline]
    pub fn get_metadata(&self, type_id: TypeId) -> Option<&TypeMetadata> {
        self.record(type_id).filter(|meta| meta.is_explicit())
    }

    /// Returns the record of a type, explicit or implicit.
    #[inline]
    pub fn record(&self, type_id: TypeId) -> Option<&TypeMetadata> {
        self.type_meta_table.get(&type_id)
    }

    /// Returns an iterator over every record.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TypeMetadata> {
        self.type_meta_table.values()
    }

    /// The name written into type hints for `ty`.
    ///
    /// This is the registered class name, or the short type name for types
    /// without explicit metadata.
    pub fn known_type_name(&self, ty: TypeRef) -> String {
        match self.get_metadata(ty.id()) {
            Some(meta) => String::from(meta.class_name()),
            None => ty.short_name(),
        }
    }

    /// Returns the hint-name table of a registered type, building it on first
    /// use.
    ///
    /// Known types without explicit metadata are left out.
    pub fn known_types_of(&self, type_id: TypeId) -> Option<&KnownTypeTable> {
        let meta = self.get_metadata(type_id)?;
        Some(meta.known_type_cache.get_or_init(|| {
            let mut table = KnownTypeTable::new();
            for known in meta.known_types() {
                if self.get_metadata(known.id()).is_none() {
                    continue;
                }
                let name = self.known_type_name(*known);
                if let Some(previous) = table.insert(name, *known) {
                    if previous != *known {
                        log::debug!(
                            "Known type '{}' of '{}' shadows '{}'.",
                            known.name(),
                            meta.class_name(),
                            previous.name(),
                        );
                    }
                }
            }
            table
        }))
    }

    /// Resolves a type hint in `scope`.
    #[inline]
    pub fn resolve_known_type(&self, scope: &KnownTypeScope<'_>, hint: &str) -> Option<TypeRef> {
        let resolved = scope.resolve(hint);
        log::trace!("type hint '{hint}' resolved to {resolved:?}");
        resolved
    }

    /// Returns `true` if `child` is `ancestor`, extends it, or can be
    /// upcast into it.
    ///
    /// # Example
    ///
    /// ```
    /// use tj_reflect::TypeRef;
    /// use tj_reflect::derive::Reflect;
    /// use tj_reflect::registry::{ObjectOptions, TypeRegistry};
    ///
    /// #[derive(Reflect, Default)]
    /// struct Animal {
    ///     name: String,
    /// }
    ///
    /// #[derive(Reflect, Default)]
    /// struct Dog {
    ///     name: String,
    ///     good: bool,
    /// }
    ///
    /// let mut registry = TypeRegistry::new();
    /// registry.register::<Animal>(ObjectOptions::new());
    /// registry.register::<Dog>(ObjectOptions::new().extends::<Animal>());
    ///
    /// let (animal, dog) = (TypeRef::of::<Animal>(), TypeRef::of::<Dog>());
    /// assert!(registry.is_subtype(dog, animal));
    /// assert!(!registry.is_subtype(animal, dog));
    /// ```
    pub fn is_subtype(&self, child: TypeRef, ancestor: TypeRef) -> bool {
        if child == ancestor {
            return true;
        }
        match self.record(child.id()) {
            Some(meta) => {
                meta.ancestors().contains(&ancestor) || meta.upcasts().contains_id(ancestor.id())
            }
            None => false,
        }
    }

    /// Converts a boxed value into `Box<U>` with the casts registered for its
    /// concrete type.
    ///
    /// Returns the value unchanged if its type is not registered or has no
    /// cast into `U`.
    pub fn upcast<U: ?Sized + 'static>(
        &self,
        value: Box<dyn Reflect>,
    ) -> Result<Box<U>, Box<dyn Reflect>> {
        match self.record((*value).ty_id()) {
            Some(meta) => meta.upcasts().cast::<U>(value),
            None => Err(value),
        }
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.type_meta_table.values().map(TypeMetadata::class_name))
            .finish()
    }
}

// Per-type behavior known only to the generic `register` functions.
struct Behavior {
    constructor: Option<Constructor>,
    introspect: Option<IntrospectFn>,
    upcasts: Option<UpcastTable>,
}

fn construct<T: Object + Default>() -> Box<dyn Reflect> {
    Box::new(T::default())
}

// -----------------------------------------------------------------------------
// Registration

/// A just registered type, used to add its members.
///
/// Returned by [`TypeRegistry::register`] and
/// [`TypeRegistry::register_abstract`].
pub struct Registration<'a> {
    registry: &'a mut TypeRegistry,
    ty: TypeRef,
    reported: Vec<Error>,
}

impl<'a> Registration<'a> {
    /// The registered type.
    #[inline]
    pub fn ty(&self) -> TypeRef {
        self.ty
    }

    /// Adds a member, see [`TypeRegistry::add_member`].
    #[inline]
    pub fn member(self, key: &str, options: MemberOptions) -> Result<Self, Error> {
        self.registry.add_member_to(self.ty, key, options)?;
        Ok(self)
    }

    /// The non-fatal failures of the registration.
    #[inline]
    pub fn reported(&self) -> &[Error] {
        &self.reported
    }

    #[inline]
    pub fn into_reported(self) -> Vec<Error> {
        self.reported
    }
}

impl fmt::Debug for Registration<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("ty", &self.ty)
            .field("reported", &self.reported)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// TypeRegistryArc

use std::sync::{Arc, PoisonError};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A synchronized wrapper around a [`TypeRegistry`].
#[derive(Clone, Default)]
pub struct TypeRegistryArc {
    /// The wrapped [`TypeRegistry`].
    pub internal: Arc<RwLock<TypeRegistry>>,
}

impl TypeRegistryArc {
    /// Takes a read lock on the underlying [`TypeRegistry`].
    pub fn read(&self) -> RwLockReadGuard<'_, TypeRegistry> {
        self.internal.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock on the underlying [`TypeRegistry`].
    pub fn write(&self) -> RwLockWriteGuard<'_, TypeRegistry> {
        self.internal
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for TypeRegistryArc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.read().fmt(f)
    }
}

// -----------------------------------------------------------------------------
// Tests
