#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use tj_reflect as reflect;
pub use tj_utils as utils;

// -----------------------------------------------------------------------------
// Modules

mod facade;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use facade::{TypedJson, configure, deserialize, parse, register, serialize};

pub use tj_reflect::registry::{MemberOptions, ObjectOptions};
pub use tj_reflect::serde::{Settings, SettingsPatch};
pub use tj_reflect::{DeclaredType, Error, FromReflect, Reflect, Result, Typed};

#[cfg(feature = "derive")]
pub use tj_reflect::derive::Reflect;
