use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use serde_json::Value;

use crate::{Reflect, TypeRef};

/// Builds an instance from raw JSON, replacing member-by-member reading.
///
/// Returning `None` reads as `null`.
pub type Initializer = Arc<dyn Fn(&Value) -> Option<Box<dyn Reflect>> + Send + Sync>;

/// Produces the JSON of an instance, replacing member-by-member writing.
pub type Serializer = Arc<dyn Fn(&dyn Reflect) -> Value + Send + Sync>;

// -----------------------------------------------------------------------------
// ObjectOptions

/// Options of a registered type, consumed by
/// [`TypeRegistry::register`](crate::registry::TypeRegistry::register).
///
/// # Examples
///
/// ```
/// use tj_reflect::registry::ObjectOptions;
/// use serde_json::{Value, json};
///
/// struct Color(u8, u8, u8);
/// # impl tj_reflect::Reflect for Color {
/// #     fn reflect_ref(&self) -> tj_reflect::ops::ReflectRef<'_> { tj_reflect::ops::ReflectRef::Null }
/// #     fn reflect_mut(&mut self) -> tj_reflect::ops::ReflectMut<'_> { tj_reflect::ops::ReflectMut::Opaque(self) }
/// # }
///
/// let options = ObjectOptions::new()
///     .name("rgb")
///     .serializer_typed(|c: &Color| json!([c.0, c.1, c.2]))
///     .initializer_typed(|json: &Value| {
///         let rgb = json.as_array()?;
///         let channel = |i: usize| -> Option<u8> { rgb.get(i)?.as_u64()?.try_into().ok() };
///         Some(Color(channel(0)?, channel(1)?, channel(2)?))
///     });
/// # let _ = options;
/// ```
#[derive(Clone, Default)]
pub struct ObjectOptions {
    pub(crate) name: Option<String>,
    pub(crate) known_types: Vec<TypeRef>,
    pub(crate) parent: Option<TypeRef>,
    pub(crate) initializer: Option<Initializer>,
    pub(crate) serializer: Option<Serializer>,
}

impl ObjectOptions {
    /// Options with every value left to its default.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// The name written into type hints. Defaults to the short type name.
    #[inline]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adds `T` to the types a hint may resolve to inside this type.
    #[inline]
    pub fn known_type<T: ?Sized + 'static>(mut self) -> Self {
        self.known_types.push(TypeRef::of::<T>());
        self
    }

    /// Adds several known types.
    #[inline]
    pub fn known_types(mut self, types: impl IntoIterator<Item = TypeRef>) -> Self {
        self.known_types.extend(types);
        self
    }

    /// Declares `P` as the parent type.
    ///
    /// The parent's members and known types are copied at registration and
    /// the type becomes a subtype of `P` for strict hint checks.
    #[inline]
    pub fn extends<P: ?Sized + 'static>(mut self) -> Self {
        self.parent = Some(TypeRef::of::<P>());
        self
    }

    /// Sets the [`Initializer`] hook.
    pub fn initializer(
        mut self,
        func: impl Fn(&Value) -> Option<Box<dyn Reflect>> + Send + Sync + 'static,
    ) -> Self {
        self.initializer = Some(Arc::new(func));
        self
    }

    /// Sets an [`Initializer`] producing a concrete `T`.
    pub fn initializer_typed<T: Reflect>(
        self,
        func: impl Fn(&Value) -> Option<T> + Send + Sync + 'static,
    ) -> Self {
        self.initializer(move |json| func(json).map(Reflect::into_boxed_reflect))
    }

    /// Sets the [`Serializer`] hook.
    pub fn serializer(mut self, func: impl Fn(&dyn Reflect) -> Value + Send + Sync + 'static) -> Self {
        self.serializer = Some(Arc::new(func));
        self
    }

    /// Sets a [`Serializer`] for values of type `T`.
    ///
    /// Values of any other type are written as `null`.
    pub fn serializer_typed<T: Reflect>(
        self,
        func: impl Fn(&T) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.serializer(move |value| match value.downcast_ref::<T>() {
            Some(value) => func(value),
            None => Value::Null,
        })
    }
}

impl fmt::Debug for ObjectOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectOptions")
            .field("name", &self.name)
            .field("known_types", &self.known_types)
            .field("parent", &self.parent)
            .field("initializer", &self.initializer.is_some())
            .field("serializer", &self.serializer.is_some())
            .finish()
    }
}
