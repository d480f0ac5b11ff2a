use alloc::boxed::Box;

use chrono::{DateTime, Utc};

use crate::ops::{ReflectMut, ReflectRef};
use crate::registry::TypeRegistry;
use crate::{DeclaredType, FromReflect, Reflect, TypeShape, Typed};

impl Reflect for DateTime<Utc> {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Date(self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Opaque(self)
    }
}

impl Typed for DateTime<Utc> {
    #[inline]
    fn type_shape() -> TypeShape {
        TypeShape::new(DeclaredType::Date)
    }
}

impl FromReflect for DateTime<Utc> {
    #[inline]
    fn from_reflect(
        value: Box<dyn Reflect>,
        _registry: &TypeRegistry,
    ) -> Result<Self, Box<dyn Reflect>> {
        value.take::<DateTime<Utc>>()
    }
}
