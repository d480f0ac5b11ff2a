//! Per-type metadata for typed JSON.
//!
//! ## Menu
//!
//! - [`TypeRegistry`]: the store of [`TypeMetadata`] records, keyed by `TypeId`.
//! - [`ObjectOptions`] / [`MemberOptions`]: registration input.
//! - [`MemberDescriptor`]: one serializable member, with nested element
//!   descriptors for arrays.
//! - [`KnownTypeTable`] / [`KnownTypeScope`]: type-hint name resolution.
//! - [`UpcastTable`]: `Box<dyn Trait>` conversions of a concrete type.
//! - [`TypeRegistryArc`]: a shared, lockable registry.
//!
//! ## Records
//!
//! A record is *explicit* once its type was registered, and *implicit* if
//! it only exists because members were added to the type. Only explicit
//! records drive serialization and take part in type hints.
//!
//! Registering a type with [`ObjectOptions::extends`] copies the parent's
//! members and known types into it, keeping the members it already has.

// -----------------------------------------------------------------------------
// Modules

mod known_types;
mod member;
mod metadata;
mod options;
mod type_registry;
mod upcast;

// -----------------------------------------------------------------------------
// Exports

pub use known_types::{KnownTypeScope, KnownTypeTable};
pub use member::{MemberDescriptor, MemberOptions, compare_members};
pub use metadata::{Constructor, IntrospectFn, Marking, TypeMetadata};
pub use options::{Initializer, ObjectOptions, Serializer};
pub use type_registry::{Registration, TypeRegistry, TypeRegistryArc};
pub use upcast::{UpcastFn, UpcastTable};

pub(crate) use member::build_descriptor;

/// The default type-hint key. No member may use it as its JSON name.
///
/// Registration only knows this default. A member named after a custom
/// [`type_hint_key`](crate::serde::Settings::type_hint_key) is accepted, and
/// the writer drops it from objects that carry a hint.
pub const RESERVED_MEMBER_NAME: &str = "__type";
