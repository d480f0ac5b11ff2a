//! Provides `#[derive(Reflect)]` for `tj_reflect`.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static REFLECT_ATTRIBUTE_NAME: &str = "reflect";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # Reflection Derivation
///
/// `#[derive(Reflect)]` implements the following traits for a struct with
/// named fields:
///
/// - `Reflect`
/// - `Object`, keyed by field name
/// - `FromReflect`
/// - `Typed`
/// - `Introspect`
///
/// Every field type must itself implement `Reflect`, `FromReflect` and
/// `Typed`. Tuple structs, unit structs and enums are rejected.
///
/// Deriving does not register anything. Members still have to be added
/// through the registry, which infers their declared types from
/// `Introspect`.
///
/// ## Skipping fields
///
/// A field marked `#[reflect(skip)]` is invisible to reflection. It is
/// never written, and the reader leaves it at its `Default` value.
///
/// ```rust, ignore
/// #[derive(Reflect, Default)]
/// struct Session {
///     user: String,
///     #[reflect(skip)]
///     cache: Vec<u8>,
/// }
/// ```
///
/// ## Trait objects
///
/// Members declared as `Box<dyn Trait>` are filled through the registry,
/// which can only produce the box if the concrete type announced the cast.
/// List every trait object the type may be stored as:
///
/// ```rust, ignore
/// trait Shape: Reflect {}
///
/// #[derive(Reflect, Default)]
/// #[reflect(upcast(dyn Shape))]
/// struct Square {
///     side: f64,
/// }
///
/// impl Shape for Square {}
/// ```
#[proc_macro_derive(Reflect, attributes(reflect))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    impls::match_reflect_impls(ast)
}
