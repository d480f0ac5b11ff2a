use alloc::boxed::Box;
use core::any::{Any, TypeId};

use crate::TypeRef;
use crate::ops::{ReflectMut, ReflectRef};

// -----------------------------------------------------------------------------
// Reflect

/// The foundational trait for runtime reflection in [`tj_reflect`](crate).
///
/// The writer walks values through [`reflect_ref`], the reader fills freshly
/// constructed instances through [`reflect_mut`]. Everything else is type
/// identity.
///
/// It's strongly recommended to use [the derive macro](crate::derive::Reflect)
/// for structs. Primitive types, `String`, `Vec<T>`, `Option<T>`, `Box<T>` and
/// `chrono::DateTime<Utc>` are implemented by this crate.
///
/// # Type Identification
///
/// `Box<T>` implements `Reflect` with its own identity, so both
/// [`Any::type_id`] and [`Reflect::ty_id`] on a `Box<dyn Reflect>` describe
/// the box. Call [`Reflect::ty_id`] on the pointee instead:
///
/// ```rust
/// # use tj_reflect::Reflect;
/// # use core::any::{Any, TypeId};
/// let x: Box<dyn Reflect> = Box::new(32_i32);
///
/// assert!(x.type_id() != TypeId::of::<i32>());
/// assert!((*x).ty_id() == TypeId::of::<i32>());
/// assert!(x.is::<i32>());
/// ```
///
/// [`reflect_ref`]: Reflect::reflect_ref
/// [`reflect_mut`]: Reflect::reflect_mut
pub trait Reflect: Send + Sync + Any {
    /// Casts this type to a fully-reflected value.
    #[inline(always)]
    fn as_reflect(&self) -> &dyn Reflect
    where
        Self: Sized,
    {
        self
    }

    /// Casts this type to a boxed, fully-reflected value.
    ///
    /// # Example
    ///
    /// ```
    /// use tj_reflect::Reflect;
    ///
    /// let r = 32.into_boxed_reflect();
    /// assert!(r.is::<i32>());
    /// ```
    #[inline(always)]
    fn into_boxed_reflect(self) -> Box<dyn Reflect>
    where
        Self: Sized,
    {
        Box::new(self)
    }

    /// Return the [`TypeId`] of underlying type.
    #[inline]
    fn ty_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    /// Return the [`TypeRef`] of underlying type.
    ///
    /// # Example
    ///
    /// ```
    /// use tj_reflect::Reflect;
    ///
    /// let name = String::from("John");
    /// assert_eq!(name.type_ref().short_name(), "String");
    /// ```
    #[inline]
    fn type_ref(&self) -> TypeRef {
        TypeRef::of::<Self>()
    }

    /// Returns an immutable view of the value by kind.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tj_reflect::{Reflect, ops::ReflectRef};
    /// let value = vec![1, 2, 3];
    ///
    /// let ReflectRef::List(list) = value.reflect_ref() else { unreachable!() };
    /// assert_eq!(list.len(), 3);
    /// ```
    fn reflect_ref(&self) -> ReflectRef<'_>;

    /// Returns a mutable view of the value by kind.
    fn reflect_mut(&mut self) -> ReflectMut<'_>;
}

impl dyn Reflect {
    /// Returns `true` if the underlying value is of type `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tj_reflect::Reflect;
    /// let x: Box<dyn Reflect> = 10.into_boxed_reflect();
    ///
    /// assert!(x.is::<i32>());
    /// ```
    #[inline(always)]
    pub fn is<T: Any>(&self) -> bool {
        self.ty_id() == TypeId::of::<T>()
    }

    /// Downcasts the value to type `T` by reference.
    ///
    /// If the underlying value is not of type `T`, returns `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tj_reflect::Reflect;
    /// let x: Box<dyn Reflect> = 10.into_boxed_reflect();
    ///
    /// assert_eq!(x.downcast_ref::<i32>(), Some(&10));
    /// assert_eq!(x.downcast_ref::<u32>(), None);
    /// ```
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        <dyn Any>::downcast_ref(self)
    }

    /// Downcasts the value to type `T` by mutable reference.
    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        <dyn Any>::downcast_mut(self)
    }

    /// Downcasts the value to type `T`, consuming the trait object.
    ///
    /// If the underlying value is not of type `T`, returns `Err(self)`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tj_reflect::Reflect;
    /// let x: Box<dyn Reflect> = 10.into_boxed_reflect();
    ///
    /// let x: Box<i32> = x.downcast::<i32>().unwrap();
    /// assert_eq!(*x, 10);
    /// ```
    #[inline]
    pub fn downcast<T: Any>(self: Box<dyn Reflect>) -> Result<Box<T>, Box<dyn Reflect>> {
        if self.is::<T>() {
            #[expect(unsafe_code, reason = "type is already checked")]
            Ok(unsafe { <Box<dyn Any>>::downcast::<T>(self).unwrap_unchecked() })
        } else {
            Err(self)
        }
    }

    /// Downcasts the value to type `T`, unboxing and consuming the trait object.
    ///
    /// If the underlying value is not of type `T`, returns `Err(self)`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tj_reflect::Reflect;
    /// let x: Box<dyn Reflect> = String::from("Doe").into_boxed_reflect();
    ///
    /// assert_eq!(x.take::<String>().unwrap(), "Doe");
    /// ```
    #[inline]
    pub fn take<T: Any>(self: Box<dyn Reflect>) -> Result<T, Box<dyn Reflect>> {
        self.downcast::<T>().map(|value| *value)
    }
}

impl core::fmt::Debug for dyn Reflect {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "dyn Reflect({})", self.type_ref().short_name())
    }
}
