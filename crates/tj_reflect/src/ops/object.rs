use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::iter::FusedIterator;

use tj_utils::hash::HashMap;

use crate::ops::{ReflectMut, ReflectRef};
use crate::registry::TypeRegistry;
use crate::{DeclaredType, FromReflect, Reflect, TypeShape, Typed};

// -----------------------------------------------------------------------------
// Object

/// A reflected value with keyed members.
///
/// Keys are the Rust field names. The public JSON names live in the
/// registry's member descriptors.
///
/// # Examples
///
/// ```
/// use tj_reflect::Reflect;
/// use tj_reflect::ops::{Object, PlainObject};
/// use tj_reflect::registry::TypeRegistry;
///
/// let registry = TypeRegistry::new();
/// let mut object = PlainObject::new();
///
/// object.set_member("x", 1.5_f64.into_boxed_reflect(), &registry).unwrap();
/// assert_eq!(object.member_len(), 1);
/// assert_eq!(object.key_at(0), Some("x"));
/// ```
pub trait Object: Reflect {
    /// Returns the member stored under `key`.
    fn member(&self, key: &str) -> Option<&dyn Reflect>;

    /// Assigns a member from a reflected value.
    ///
    /// Returns the value back if `key` is unknown or the value cannot be
    /// converted into the member's type.
    fn set_member(
        &mut self,
        key: &str,
        value: Box<dyn Reflect>,
        registry: &TypeRegistry,
    ) -> Result<(), Box<dyn Reflect>>;

    /// Returns the number of members.
    fn member_len(&self) -> usize;

    /// Returns the key of the member at `index`, in declaration order.
    fn key_at(&self, index: usize) -> Option<&str>;
}

impl dyn Object {
    /// Returns an iterator over member keys in declaration order.
    #[inline]
    pub fn keys(&self) -> Keys<'_> {
        Keys {
            object: self,
            index: 0,
        }
    }
}

/// An iterator over the keys of an [`Object`].
pub struct Keys<'a> {
    object: &'a dyn Object,
    index: usize,
}

impl<'a> Iterator for Keys<'a> {
    type Item = &'a str;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let key = self.object.key_at(self.index)?;
        self.index += 1;
        Some(key)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.object.member_len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Keys<'_> {}
impl FusedIterator for Keys<'_> {}

// -----------------------------------------------------------------------------
// PlainObject

/// An insertion-ordered map of reflected values.
///
/// This is what the reader builds for JSON objects of no registered type.
#[derive(Default)]
pub struct PlainObject {
    entries: Vec<(String, Box<dyn Reflect>)>,
    indices: HashMap<String, usize>,
}

impl PlainObject {
    /// Creates an empty `PlainObject`.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, returning the previous value of `key`.
    ///
    /// An existing key keeps its position.
    ///
    /// # Examples
    ///
    /// ```
    /// use tj_reflect::Reflect;
    /// use tj_reflect::ops::PlainObject;
    ///
    /// let mut object = PlainObject::new();
    /// assert!(object.insert("a", 1.into_boxed_reflect()).is_none());
    /// assert!(object.insert("a", 2.into_boxed_reflect()).is_some());
    /// assert_eq!(object.get_as::<i32>("a"), Some(&2));
    /// ```
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: Box<dyn Reflect>,
    ) -> Option<Box<dyn Reflect>> {
        let key = key.into();
        match self.indices.get(&key) {
            Some(&index) => Some(core::mem::replace(&mut self.entries[index].1, value)),
            None => {
                self.indices.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Returns the value stored under `key`.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&dyn Reflect> {
        let index = *self.indices.get(key)?;
        Some(&*self.entries[index].1)
    }

    /// Returns the value stored under `key` if it is a `T`.
    #[inline]
    pub fn get_as<T: Reflect>(&self, key: &str) -> Option<&T> {
        self.get(key)?.downcast_ref::<T>()
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &dyn Reflect)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), &**value))
    }
}

impl fmt::Debug for PlainObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl Reflect for PlainObject {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Object(self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Object(self)
    }
}

impl Object for PlainObject {
    #[inline]
    fn member(&self, key: &str) -> Option<&dyn Reflect> {
        self.get(key)
    }

    fn set_member(
        &mut self,
        key: &str,
        value: Box<dyn Reflect>,
        _registry: &TypeRegistry,
    ) -> Result<(), Box<dyn Reflect>> {
        self.insert(key, value);
        Ok(())
    }

    #[inline]
    fn member_len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    fn key_at(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|(key, _)| key.as_str())
    }
}

impl Typed for PlainObject {
    #[inline]
    fn type_shape() -> TypeShape {
        TypeShape::new(DeclaredType::Any)
    }
}

impl FromReflect for PlainObject {
    #[inline]
    fn from_reflect(
        value: Box<dyn Reflect>,
        _registry: &TypeRegistry,
    ) -> Result<Self, Box<dyn Reflect>> {
        value.take::<PlainObject>()
    }
}

// -----------------------------------------------------------------------------
// Tests
