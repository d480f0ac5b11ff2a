use alloc::boxed::Box;

use crate::ops::{ReflectMut, ReflectRef};
use crate::registry::TypeRegistry;
use crate::{DeclaredType, FromReflect, Reflect, TypeShape, Typed};

/// The JSON `null`.
///
/// The reader returns it for `null` and absent values. Object members that
/// read as `Null` are left unset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Null;

impl Reflect for Null {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Null
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Opaque(self)
    }
}

impl Typed for Null {
    #[inline]
    fn type_shape() -> TypeShape {
        TypeShape::new(DeclaredType::Any)
    }
}

impl FromReflect for Null {
    #[inline]
    fn from_reflect(
        value: Box<dyn Reflect>,
        _registry: &TypeRegistry,
    ) -> Result<Self, Box<dyn Reflect>> {
        value.take::<Null>()
    }
}
