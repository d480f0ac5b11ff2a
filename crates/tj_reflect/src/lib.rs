#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// Generated code names this crate by its absolute path, which must also
// resolve inside the crate itself.
extern crate self as tj_reflect;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod impls;
mod reflection;

pub mod ops;
pub mod registry;
pub mod serde;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use error::{Error, Result};
pub use reflection::{DeclaredType, TypeRef, TypeShape};
pub use reflection::{FromReflect, Introspect, Reflect, Typed};

#[cfg(feature = "derive")]
pub use tj_reflect_derive as derive;
