//! Kind views and the dynamic value types.
//!
//! - [`ReflectRef`] / [`ReflectMut`]: what a value is, for the writer and reader.
//! - [`Object`]: keyed members, implemented by `#[derive(Reflect)]` and [`PlainObject`].
//! - [`List`]: ordered elements, implemented by `Vec<T>`.
//! - [`Null`]: the JSON `null` produced by the reader.

// -----------------------------------------------------------------------------
// Modules

mod kind;
mod list;
mod null;
mod object;

// -----------------------------------------------------------------------------
// Exports

pub use kind::{ReflectMut, ReflectRef};
pub use list::{List, ListIter};
pub use null::Null;
pub use object::{Keys, Object, PlainObject};
