use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use std::sync::OnceLock;

use tj_utils::hash::HashMap;

use crate::registry::{
    Initializer, KnownTypeTable, MemberDescriptor, Serializer, UpcastTable, compare_members,
};
use crate::{Error, Reflect, TypeRef, TypeShape};

/// Creates a default instance of a registered type.
pub type Constructor = fn() -> Box<dyn Reflect>;

/// Returns the declared shape of one field, see [`Introspect`](crate::Introspect).
pub type IntrospectFn = fn(&str) -> Option<TypeShape>;

// -----------------------------------------------------------------------------
// Marking

/// How a [`TypeMetadata`] record came to exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Marking {
    /// Created as a side effect of adding a member. Not used for
    /// serialization on its own.
    Implicit,
    /// Registered through [`TypeRegistry::register`](crate::registry::TypeRegistry::register)
    /// or `register_abstract`.
    Explicit,
}

// -----------------------------------------------------------------------------
// TypeMetadata

/// Everything the registry knows about one type.
pub struct TypeMetadata {
    pub(crate) ty: TypeRef,
    pub(crate) class_name: String,
    pub(crate) marking: Marking,
    pub(crate) data_members: HashMap<String, MemberDescriptor>,
    pub(crate) known_types: Vec<TypeRef>,
    pub(crate) known_type_cache: OnceLock<KnownTypeTable>,
    pub(crate) parent: Option<TypeRef>,
    pub(crate) ancestors: Vec<TypeRef>,
    pub(crate) constructor: Option<Constructor>,
    pub(crate) introspect: Option<IntrospectFn>,
    pub(crate) initializer: Option<Initializer>,
    pub(crate) serializer: Option<Serializer>,
    pub(crate) upcasts: UpcastTable,
}

impl TypeMetadata {
    /// An implicit record without members.
    pub(crate) fn new(ty: TypeRef) -> Self {
        Self {
            ty,
            class_name: ty.short_name(),
            marking: Marking::Implicit,
            data_members: HashMap::default(),
            known_types: Vec::new(),
            known_type_cache: OnceLock::new(),
            parent: None,
            ancestors: Vec::new(),
            constructor: None,
            introspect: None,
            initializer: None,
            serializer: None,
            upcasts: UpcastTable::new(),
        }
    }

    /// The described type.
    #[inline]
    pub fn ty(&self) -> TypeRef {
        self.ty
    }

    /// The name written into type hints.
    #[inline]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    #[inline]
    pub fn marking(&self) -> Marking {
        self.marking
    }

    /// Returns `true` for records created by `register` or `register_abstract`.
    #[inline]
    pub fn is_explicit(&self) -> bool {
        self.marking == Marking::Explicit
    }

    /// Returns `true` if the type cannot be default constructed.
    #[inline]
    pub fn is_abstract(&self) -> bool {
        self.constructor.is_none()
    }

    /// The direct parent declared with `ObjectOptions::extends`.
    #[inline]
    pub fn parent(&self) -> Option<TypeRef> {
        self.parent
    }

    /// Every ancestor, nearest first.
    #[inline]
    pub fn ancestors(&self) -> &[TypeRef] {
        &self.ancestors
    }

    /// The declared known types, the type itself and its member types.
    #[inline]
    pub fn known_types(&self) -> &[TypeRef] {
        &self.known_types
    }

    #[inline]
    pub fn initializer(&self) -> Option<&Initializer> {
        self.initializer.as_ref()
    }

    #[inline]
    pub fn serializer(&self) -> Option<&Serializer> {
        self.serializer.as_ref()
    }

    #[inline]
    pub fn upcasts(&self) -> &UpcastTable {
        &self.upcasts
    }

    /// Creates a default instance, or `None` for abstract types.
    #[inline]
    pub fn construct(&self) -> Option<Box<dyn Reflect>> {
        self.constructor.map(|constructor| constructor())
    }

    /// Returns the declared shape of the field `key`, if the type supports
    /// introspection.
    #[inline]
    pub fn field_shape(&self, key: &str) -> Option<TypeShape> {
        self.introspect.and_then(|introspect| introspect(key))
    }

    /// Returns the descriptor of the member `key`.
    #[inline]
    pub fn member(&self, key: &str) -> Option<&MemberDescriptor> {
        self.data_members.get(key)
    }

    /// Returns the number of members.
    #[inline]
    pub fn member_len(&self) -> usize {
        self.data_members.len()
    }

    /// Returns the members in serialization order.
    ///
    /// See [`compare_members`] for the ordering.
    pub fn sorted_members(&self) -> Vec<&MemberDescriptor> {
        let mut members: Vec<_> = self.data_members.values().collect();
        members.sort_by(|a, b| compare_members(a, b));
        members
    }

    /// Adds `ty` to the known types unless already present.
    pub(crate) fn add_known_type(&mut self, ty: TypeRef) {
        if !self.known_types.contains(&ty) {
            self.known_types.push(ty);
        }
    }

    /// Inserts or replaces the member `descriptor.key`.
    ///
    /// Types referenced by the member become known types.
    pub(crate) fn insert_member(&mut self, descriptor: MemberDescriptor) -> Result<(), Error> {
        let collides = self
            .data_members
            .values()
            .any(|other| other.name == descriptor.name && other.key != descriptor.key);
        if collides {
            return Err(Error::DuplicateMember {
                class: self.class_name.clone(),
                name: descriptor.name,
            });
        }

        for ty in descriptor.referenced_types() {
            self.add_known_type(ty);
        }
        self.data_members.insert(descriptor.key.clone(), descriptor);
        Ok(())
    }

    /// Snapshot of what a subtype inherits from this record.
    pub(crate) fn inheritance(&self) -> Inheritance {
        Inheritance {
            ty: self.ty,
            class_name: self.class_name.clone(),
            members: self.data_members.values().cloned().collect(),
            known_types: self.known_types.clone(),
            ancestors: self.ancestors.clone(),
        }
    }

    /// Copies the inherited members and known types that are not yet present,
    /// and records the ancestor chain.
    pub(crate) fn inherit(&mut self, parent: Inheritance) {
        for descriptor in parent.members {
            if self.data_members.contains_key(&descriptor.key) {
                continue;
            }
            if let Err(err) = self.insert_member(descriptor) {
                log::warn!("{err} Inherited from '{}'.", parent.class_name);
            }
        }
        for ty in parent.known_types {
            self.add_known_type(ty);
        }

        self.parent = Some(parent.ty);
        self.ancestors.clear();
        self.ancestors.push(parent.ty);
        self.ancestors.extend(parent.ancestors);
    }
}

/// The parts of a [`TypeMetadata`] copied into its subtypes.
pub(crate) struct Inheritance {
    pub ty: TypeRef,
    pub class_name: String,
    pub members: Vec<MemberDescriptor>,
    pub known_types: Vec<TypeRef>,
    pub ancestors: Vec<TypeRef>,
}

impl fmt::Debug for TypeMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeMetadata")
            .field("ty", &self.ty)
            .field("class_name", &self.class_name)
            .field("marking", &self.marking)
            .field("data_members", &self.sorted_members())
            .field("known_types", &self.known_types)
            .field("ancestors", &self.ancestors)
            .field("abstract", &self.is_abstract())
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Marking, TypeMetadata};
    use crate::registry::MemberDescriptor;
    use crate::{DeclaredType, Error, TypeRef};

    struct Shape;
    struct Point;

    #[test]
    fn members_register_their_types() {
        let mut meta = TypeMetadata::new(TypeRef::of::<Shape>());
        assert_eq!(meta.marking(), Marking::Implicit);
        assert_eq!(meta.class_name(), "Shape");

        let mut points = MemberDescriptor::new("points", DeclaredType::Array);
        points.elements = Some(alloc::boxed::Box::new(MemberDescriptor::new(
            "points[]",
            DeclaredType::of::<Point>(),
        )));
        meta.insert_member(points).unwrap();

        assert_eq!(meta.known_types(), [TypeRef::of::<Point>()]);
    }

    #[test]
    fn same_key_overwrites() {
        let mut meta = TypeMetadata::new(TypeRef::of::<Shape>());
        meta.insert_member(MemberDescriptor::new("x", DeclaredType::Number))
            .unwrap();
        meta.insert_member(MemberDescriptor::new("x", DeclaredType::String))
            .unwrap();

        assert_eq!(meta.member_len(), 1);
        assert_eq!(meta.member("x").unwrap().ty, DeclaredType::String);
    }

    #[test]
    fn same_name_different_key_collides() {
        let mut meta = TypeMetadata::new(TypeRef::of::<Shape>());
        meta.insert_member(MemberDescriptor::new("x", DeclaredType::Number))
            .unwrap();

        let mut other = MemberDescriptor::new("left", DeclaredType::Number);
        other.name = "x".into();
        let err = meta.insert_member(other).unwrap_err();
        assert!(matches!(err, Error::DuplicateMember { name, .. } if name == "x"));
    }

    #[test]
    fn inherit_keeps_own_members() {
        let mut parent = TypeMetadata::new(TypeRef::of::<Shape>());
        parent
            .insert_member(MemberDescriptor::new("name", DeclaredType::String))
            .unwrap();
        parent
            .insert_member(MemberDescriptor::new("area", DeclaredType::Number))
            .unwrap();

        let mut child = TypeMetadata::new(TypeRef::of::<Point>());
        child
            .insert_member(MemberDescriptor::new("name", DeclaredType::Date))
            .unwrap();
        child.inherit(parent.inheritance());

        assert_eq!(child.member_len(), 2);
        assert_eq!(child.member("name").unwrap().ty, DeclaredType::Date);
        assert_eq!(child.member("area").unwrap().ty, DeclaredType::Number);
        assert_eq!(child.parent(), Some(TypeRef::of::<Shape>()));
        assert_eq!(child.ancestors(), [TypeRef::of::<Shape>()]);
    }
}
