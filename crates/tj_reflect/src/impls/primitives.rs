use alloc::boxed::Box;
use alloc::string::String;

use serde_json::Number;

use crate::ops::{ReflectMut, ReflectRef};
use crate::registry::TypeRegistry;
use crate::{DeclaredType, FromReflect, Reflect, TypeShape, Typed};

macro_rules! impl_opaque_common {
    ($ty:ty, $declared:ident) => {
        impl Typed for $ty {
            #[inline]
            fn type_shape() -> TypeShape {
                TypeShape::new(DeclaredType::$declared)
            }
        }
    };
}

// -----------------------------------------------------------------------------
// Integers

macro_rules! impl_integer {
    ($($ty:ty),* $(,)?) => {$(
        impl Reflect for $ty {
            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                ReflectRef::Number(Number::from(*self))
            }

            #[inline]
            fn reflect_mut(&mut self) -> ReflectMut<'_> {
                ReflectMut::Opaque(self)
            }
        }

        impl_opaque_common!($ty, Number);

        impl FromReflect for $ty {
            fn from_reflect(
                value: Box<dyn Reflect>,
                _registry: &TypeRegistry,
            ) -> Result<Self, Box<dyn Reflect>> {
                let value = match value.take::<$ty>() {
                    Ok(exact) => return Ok(exact),
                    Err(value) => value,
                };
                let number = value.take::<Number>()?;
                let converted = number
                    .as_i64()
                    .and_then(|n| <$ty>::try_from(n).ok())
                    .or_else(|| number.as_u64().and_then(|n| <$ty>::try_from(n).ok()));
                converted.ok_or_else(|| Box::new(number) as Box<dyn Reflect>)
            }
        }
    )*};
}

impl_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

// -----------------------------------------------------------------------------
// Floats

macro_rules! impl_float {
    ($($ty:ty),* $(,)?) => {$(
        impl Reflect for $ty {
            /// NaN and infinities have no JSON form and read as `Null`.
            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                match Number::from_f64(f64::from(*self)) {
                    Some(number) => ReflectRef::Number(number),
                    None => ReflectRef::Null,
                }
            }

            #[inline]
            fn reflect_mut(&mut self) -> ReflectMut<'_> {
                ReflectMut::Opaque(self)
            }
        }

        impl_opaque_common!($ty, Number);

        impl FromReflect for $ty {
            fn from_reflect(
                value: Box<dyn Reflect>,
                _registry: &TypeRegistry,
            ) -> Result<Self, Box<dyn Reflect>> {
                let value = match value.take::<$ty>() {
                    Ok(exact) => return Ok(exact),
                    Err(value) => value,
                };
                let number = value.take::<Number>()?;
                match number.as_f64() {
                    Some(float) => Ok(float as $ty),
                    None => Err(Box::new(number)),
                }
            }
        }
    )*};
}

impl_float!(f32, f64);

// -----------------------------------------------------------------------------
// Number

impl Reflect for Number {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Number(self.clone())
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Opaque(self)
    }
}

impl_opaque_common!(Number, Number);

impl FromReflect for Number {
    #[inline]
    fn from_reflect(
        value: Box<dyn Reflect>,
        _registry: &TypeRegistry,
    ) -> Result<Self, Box<dyn Reflect>> {
        value.take::<Number>()
    }
}

// -----------------------------------------------------------------------------
// bool

impl Reflect for bool {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Bool(*self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Opaque(self)
    }
}

impl_opaque_common!(bool, Boolean);

impl FromReflect for bool {
    #[inline]
    fn from_reflect(
        value: Box<dyn Reflect>,
        _registry: &TypeRegistry,
    ) -> Result<Self, Box<dyn Reflect>> {
        value.take::<bool>()
    }
}

// -----------------------------------------------------------------------------
// String

impl Reflect for String {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::String(self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Opaque(self)
    }
}

impl_opaque_common!(String, String);

impl FromReflect for String {
    #[inline]
    fn from_reflect(
        value: Box<dyn Reflect>,
        _registry: &TypeRegistry,
    ) -> Result<Self, Box<dyn Reflect>> {
        value.take::<String>()
    }
}

// -----------------------------------------------------------------------------
// Tests
