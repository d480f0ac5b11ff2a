//! Typed JSON reading and writing.
//!
//! # Overview
//!
//! - [`Writer`]: converts a reflected value into a [`serde_json::Value`] tree.
//!   Polymorphic members get a type hint, a reserved property naming their
//!   concrete type.
//! - [`Reader`]: converts a value tree back into reflected values, resolving
//!   type hints against the known types in scope.
//! - [`Serializable`]: a [`serde_core::Serialize`] adapter over the writer.
//! - [`Settings`] / [`SettingsPatch`]: shared configuration, including the
//!   replacer and reviver hooks.
//!
//! Both engines only read the [`TypeRegistry`](crate::registry::TypeRegistry).
//!
//! ```
//! use serde_json::json;
//! use tj_reflect::Reflect;
//! use tj_reflect::derive::Reflect;
//! use tj_reflect::registry::{MemberOptions, ObjectOptions, TypeRegistry};
//! use tj_reflect::serde::{Reader, Settings, Writer};
//!
//! trait Pet: Reflect {
//!     fn sound(&self) -> &'static str;
//! }
//!
//! #[derive(Reflect, Default)]
//! #[reflect(upcast(dyn Pet))]
//! struct Dog {
//!     name: String,
//! }
//!
//! impl Pet for Dog {
//!     fn sound(&self) -> &'static str { "woof" }
//! }
//!
//! #[derive(Reflect, Default)]
//! struct Owner {
//!     pets: Vec<Box<dyn Pet>>,
//! }
//!
//! let mut registry = TypeRegistry::new();
//! registry.register_abstract::<dyn Pet>(ObjectOptions::new());
//! registry
//!     .register::<Dog>(ObjectOptions::new())
//!     .member("name", MemberOptions::new()).unwrap();
//! registry
//!     .register::<Owner>(ObjectOptions::new().known_type::<Dog>())
//!     .member("pets", MemberOptions::new()).unwrap();
//!
//! let settings = Settings::default();
//! let owner = Owner { pets: vec![Box::new(Dog { name: "Rex".into() })] };
//!
//! let json = Writer::new(&registry, &settings).write(&owner);
//! assert_eq!(json, json!({ "pets": [{ "__type": "Dog", "name": "Rex" }] }));
//!
//! let back: Owner = Reader::new(&registry, &settings).read_as(&json).unwrap();
//! assert_eq!(back.pets[0].sound(), "woof");
//! ```

// -----------------------------------------------------------------------------
// Modules

mod budget;
mod path;
mod reader;
mod settings;
mod writer;

// -----------------------------------------------------------------------------
// Exports

pub(crate) use path::PropertyPath;

pub use budget::count_leaves;
pub use reader::Reader;
pub use settings::{Settings, SettingsPatch, ValueHook, apply_replacer, apply_reviver};
pub use writer::{Serializable, Writer};
