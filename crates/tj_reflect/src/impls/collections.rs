use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::{Any, TypeId};

use crate::ops::{List, Null, ReflectMut, ReflectRef};
use crate::registry::TypeRegistry;
use crate::{DeclaredType, FromReflect, Reflect, TypeShape, Typed};

// -----------------------------------------------------------------------------
// Vec

impl<T: Reflect> Reflect for Vec<T> {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::List(self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Opaque(self)
    }
}

impl<T: Reflect> List for Vec<T> {
    #[inline]
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        self.as_slice().get(index).map(|item| item as &dyn Reflect)
    }
}

impl<T: Typed> Typed for Vec<T> {
    #[inline]
    fn type_shape() -> TypeShape {
        TypeShape::array(T::type_shape())
    }
}

/// Accepts the reader's `Vec<Box<dyn Reflect>>` and converts every element.
impl<T: FromReflect + 'static> FromReflect for Vec<T> {
    fn from_reflect(
        value: Box<dyn Reflect>,
        registry: &TypeRegistry,
    ) -> Result<Self, Box<dyn Reflect>> {
        let value = match value.take::<Vec<T>>() {
            Ok(exact) => return Ok(exact),
            Err(value) => value,
        };
        value
            .take::<Vec<Box<dyn Reflect>>>()?
            .into_iter()
            .map(|item| T::from_reflect(item, registry))
            .collect()
    }
}

// -----------------------------------------------------------------------------
// Option

/// `None` reflects as [`ReflectRef::Null`], `Some` is transparent for reading.
impl<T: Reflect> Reflect for Option<T> {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        match self {
            Some(value) => value.reflect_ref(),
            None => ReflectRef::Null,
        }
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Opaque(self)
    }
}

impl<T: Typed> Typed for Option<T> {
    #[inline]
    fn type_shape() -> TypeShape {
        T::type_shape()
    }
}

impl<T: FromReflect> FromReflect for Option<T> {
    fn from_reflect(
        value: Box<dyn Reflect>,
        registry: &TypeRegistry,
    ) -> Result<Self, Box<dyn Reflect>> {
        if value.is::<Null>() {
            return Ok(None);
        }
        T::from_reflect(value, registry).map(Some)
    }
}

// -----------------------------------------------------------------------------
// Box

/// Views are transparent, identity is the box's own.
impl<T: ?Sized + Reflect> Reflect for Box<T> {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        (**self).reflect_ref()
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        (**self).reflect_mut()
    }
}

/// `Box<dyn Reflect>` is [`DeclaredType::Any`], any other box declares its
/// pointee, typically a trait object registered as an abstract type.
impl<T: ?Sized + 'static> Typed for Box<T> {
    #[inline]
    fn type_shape() -> TypeShape {
        if TypeId::of::<T>() == TypeId::of::<dyn Reflect>() {
            TypeShape::new(DeclaredType::Any)
        } else {
            TypeShape::new(DeclaredType::of::<T>())
        }
    }
}

/// Converts through the registry's upcast table.
///
/// `Box<dyn Reflect>` accepts every value unchanged.
impl<T: ?Sized + 'static> FromReflect for Box<T> {
    fn from_reflect(
        value: Box<dyn Reflect>,
        registry: &TypeRegistry,
    ) -> Result<Self, Box<dyn Reflect>> {
        if TypeId::of::<T>() == TypeId::of::<dyn Reflect>() {
            let erased: Box<dyn Any> = Box::new(value);
            return erased
                .downcast::<Box<T>>()
                .map(|boxed| *boxed)
                .map_err(|_| unreachable!("`T` is `dyn Reflect`"));
        }
        registry.upcast::<T>(value)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use crate::ops::{Null, ReflectRef};
    use crate::registry::TypeRegistry;
    use crate::{DeclaredType, FromReflect, Reflect, Typed};

    #[test]
    fn vec_from_dynamic_list() {
        let registry = TypeRegistry::new();
        let list: Vec<Box<dyn Reflect>> = vec![
            String::from("a").into_boxed_reflect(),
            String::from("b").into_boxed_reflect(),
        ];

        let strings = Vec::<String>::from_reflect(list.into_boxed_reflect(), &registry).unwrap();
        assert_eq!(strings, ["a", "b"]);
    }

    #[test]
    fn option_reads_null_as_none() {
        let registry = TypeRegistry::new();
        let none = Option::<String>::from_reflect(Null.into_boxed_reflect(), &registry).unwrap();
        assert!(none.is_none());

        let value: Option<String> = None;
        assert!(matches!(value.reflect_ref(), ReflectRef::Null));
    }

    #[test]
    fn boxed_reflect_is_any() {
        assert_eq!(
            <Box<dyn Reflect> as Typed>::type_shape().ty,
            DeclaredType::Any
        );

        let registry = TypeRegistry::new();
        let boxed = Box::<dyn Reflect>::from_reflect(7_u8.into_boxed_reflect(), &registry).unwrap();
        assert!(boxed.is::<u8>());
    }
}
