use chrono::{DateTime, Utc};
use serde_json::Number;

use crate::Reflect;
use crate::ops::{List, Object};

/// An immutable view of a reflected value by kind.
///
/// The variants mirror the JSON data model, plus `Date`.
pub enum ReflectRef<'a> {
    /// No value. Produced by `None` and [`Null`](crate::ops::Null).
    Null,
    Bool(bool),
    Number(Number),
    String(&'a str),
    Date(&'a DateTime<Utc>),
    List(&'a dyn List),
    Object(&'a dyn Object),
}

impl<'a> ReflectRef<'a> {
    /// Returns the object view, if this is an object.
    #[inline]
    pub fn as_object(&self) -> Option<&'a dyn Object> {
        match self {
            Self::Object(object) => Some(*object),
            _ => None,
        }
    }

    /// Returns the list view, if this is a list.
    #[inline]
    pub fn as_list(&self) -> Option<&'a dyn List> {
        match self {
            Self::List(list) => Some(*list),
            _ => None,
        }
    }

    /// Returns `true` for [`ReflectRef::Null`].
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// A mutable view of a reflected value by kind.
pub enum ReflectMut<'a> {
    Object(&'a mut dyn Object),
    /// Any value without mutable members.
    Opaque(&'a mut dyn Reflect),
}

impl<'a> ReflectMut<'a> {
    /// Returns the object view, if this is an object.
    #[inline]
    pub fn into_object(self) -> Option<&'a mut dyn Object> {
        match self {
            Self::Object(object) => Some(object),
            Self::Opaque(_) => None,
        }
    }
}
