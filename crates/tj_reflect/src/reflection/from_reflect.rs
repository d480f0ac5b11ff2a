use alloc::boxed::Box;

use crate::Reflect;
use crate::registry::TypeRegistry;

/// Builds a concrete value from the reader's output.
///
/// The reader produces boxed concrete instances for registered types and
/// dynamic values otherwise (`serde_json::Number`, `String`, `bool`,
/// `Vec<Box<dyn Reflect>>`, [`PlainObject`], [`Null`]). `from_reflect`
/// converts them into the field type, using the registry for trait-object
/// slots such as `Box<dyn Shape>`.
///
/// On failure the rejected value is handed back.
///
/// # Examples
///
/// ```
/// use tj_reflect::{FromReflect, Reflect};
/// use tj_reflect::registry::TypeRegistry;
///
/// let registry = TypeRegistry::new();
///
/// let number = serde_json::Number::from(7).into_boxed_reflect();
/// assert_eq!(u8::from_reflect(number, &registry).unwrap(), 7);
///
/// let text = String::from("seven").into_boxed_reflect();
/// assert!(u8::from_reflect(text, &registry).is_err());
/// ```
///
/// [`PlainObject`]: crate::ops::PlainObject
/// [`Null`]: crate::ops::Null
pub trait FromReflect: Sized {
    /// Converts `value` into `Self`, or returns it unchanged.
    fn from_reflect(
        value: Box<dyn Reflect>,
        registry: &TypeRegistry,
    ) -> Result<Self, Box<dyn Reflect>>;
}
