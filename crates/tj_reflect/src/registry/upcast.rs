use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt;

use tj_utils::TypeIdMap;

use crate::Reflect;

/// Converts a boxed concrete value into `Box<U>`, typically `Box<dyn Trait>`.
pub type UpcastFn<U> = fn(Box<dyn Reflect>) -> Result<Box<U>, Box<dyn Reflect>>;

/// The `Box<dyn Trait>` conversions supported by one concrete type.
///
/// Filled by [`Introspect::register_upcasts`](crate::Introspect::register_upcasts)
/// when the type is registered, used by `FromReflect for Box<T>`.
///
/// # Examples
///
/// ```
/// use tj_reflect::Reflect;
/// use tj_reflect::registry::UpcastTable;
///
/// trait Named: Reflect {
///     fn name(&self) -> &str;
/// }
///
/// impl Named for String {
///     fn name(&self) -> &str { self }
/// }
///
/// let mut table = UpcastTable::new();
/// table.insert::<dyn Named>(|value| value.downcast::<String>().map(|s| s as Box<dyn Named>));
///
/// let named = table.cast::<dyn Named>(String::from("Ada").into_boxed_reflect()).unwrap();
/// assert_eq!(named.name(), "Ada");
/// ```
#[derive(Default)]
pub struct UpcastTable {
    casts: TypeIdMap<Box<dyn Any + Send + Sync>>,
}

impl UpcastTable {
    /// Creates an empty table.
    #[inline]
    pub const fn new() -> Self {
        Self {
            casts: TypeIdMap::new(),
        }
    }

    /// Registers the conversion into `Box<U>`, replacing any previous one.
    #[inline]
    pub fn insert<U: ?Sized + 'static>(&mut self, cast: UpcastFn<U>) {
        self.casts.insert_type::<U>(Box::new(cast));
    }

    /// Returns `true` if values can be converted into `Box<U>`.
    #[inline]
    pub fn contains<U: ?Sized + 'static>(&self) -> bool {
        self.casts.contains_type::<U>()
    }

    /// Returns `true` if a conversion into the type `target` exists.
    #[inline]
    pub fn contains_id(&self, target: TypeId) -> bool {
        self.casts.contains(&target)
    }

    /// Converts `value` into `Box<U>`, or returns it unchanged.
    pub fn cast<U: ?Sized + 'static>(
        &self,
        value: Box<dyn Reflect>,
    ) -> Result<Box<U>, Box<dyn Reflect>> {
        let cast = self
            .casts
            .get_type::<U>()
            .and_then(|cast| (**cast).downcast_ref::<UpcastFn<U>>());
        match cast {
            Some(cast) => cast(value),
            None => Err(value),
        }
    }

    /// Returns the number of conversions.
    #[inline]
    pub fn len(&self) -> usize {
        self.casts.len()
    }
}

impl fmt::Debug for UpcastTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpcastTable")
            .field("len", &self.casts.len())
            .finish()
    }
}
