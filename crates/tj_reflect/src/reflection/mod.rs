// -----------------------------------------------------------------------------
// Modules

mod from_reflect;
mod reflect;
mod typed;

// -----------------------------------------------------------------------------
// Exports

pub use from_reflect::FromReflect;
pub use reflect::Reflect;
pub use typed::{DeclaredType, Introspect, TypeRef, TypeShape, Typed};
