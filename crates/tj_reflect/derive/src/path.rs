//! Paths used by the generated code.
//!
//! Keeping them in one place limits the changes needed when
//! `tj_reflect` moves things around.

use proc_macro2::TokenStream;
use quote::quote;

// -----------------------------------------------------------------------------
// Crate Path

/// Get the access path to the `tj_reflect` crate.
///
/// 1. For crates that depend on `tj_reflect`, `::tj_reflect` is returned.
/// 2. For crates that depend on `typed_json`, `::typed_json::reflect` is returned.
/// 3. Otherwise `::tj_reflect` is returned, which may be incorrect.
///
/// This reads the caller's manifest, so the path is computed once per
/// derive and passed around.
pub(crate) fn tj_reflect() -> syn::Path {
    tj_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("tj_reflect"))
}

// -----------------------------------------------------------------------------
// Traits

#[inline(always)]
pub(crate) fn reflect_(tj_reflect_path: &syn::Path) -> TokenStream {
    quote! { #tj_reflect_path::Reflect }
}

#[inline(always)]
pub(crate) fn from_reflect_(tj_reflect_path: &syn::Path) -> TokenStream {
    quote! { #tj_reflect_path::FromReflect }
}

#[inline(always)]
pub(crate) fn typed_(tj_reflect_path: &syn::Path) -> TokenStream {
    quote! { #tj_reflect_path::Typed }
}

#[inline(always)]
pub(crate) fn introspect_(tj_reflect_path: &syn::Path) -> TokenStream {
    quote! { #tj_reflect_path::Introspect }
}

#[inline(always)]
pub(crate) fn object_(tj_reflect_path: &syn::Path) -> TokenStream {
    quote! { #tj_reflect_path::ops::Object }
}

// -----------------------------------------------------------------------------
// Types

#[inline(always)]
pub(crate) fn reflect_ref_(tj_reflect_path: &syn::Path) -> TokenStream {
    quote! { #tj_reflect_path::ops::ReflectRef }
}

#[inline(always)]
pub(crate) fn reflect_mut_(tj_reflect_path: &syn::Path) -> TokenStream {
    quote! { #tj_reflect_path::ops::ReflectMut }
}

#[inline(always)]
pub(crate) fn type_shape_(tj_reflect_path: &syn::Path) -> TokenStream {
    quote! { #tj_reflect_path::TypeShape }
}

#[inline(always)]
pub(crate) fn declared_type_(tj_reflect_path: &syn::Path) -> TokenStream {
    quote! { #tj_reflect_path::DeclaredType }
}

#[inline(always)]
pub(crate) fn type_registry_(tj_reflect_path: &syn::Path) -> TokenStream {
    quote! { #tj_reflect_path::registry::TypeRegistry }
}

#[inline(always)]
pub(crate) fn upcast_table_(tj_reflect_path: &syn::Path) -> TokenStream {
    quote! { #tj_reflect_path::registry::UpcastTable }
}

// -----------------------------------------------------------------------------
// Fully qualified std paths

pub(crate) mod fp {
    use proc_macro2::TokenStream;
    use quote::{ToTokens, quote};

    pub(crate) struct OptionFP;
    pub(crate) struct ResultFP;
    pub(crate) struct BoxFP;
    pub(crate) struct SendFP;
    pub(crate) struct SyncFP;

    impl ToTokens for OptionFP {
        fn to_tokens(&self, tokens: &mut TokenStream) {
            tokens.extend(quote! { ::core::option::Option });
        }
    }

    impl ToTokens for ResultFP {
        fn to_tokens(&self, tokens: &mut TokenStream) {
            tokens.extend(quote! { ::core::result::Result });
        }
    }

    impl ToTokens for BoxFP {
        fn to_tokens(&self, tokens: &mut TokenStream) {
            tokens.extend(quote! { ::std::boxed::Box });
        }
    }

    impl ToTokens for SendFP {
        fn to_tokens(&self, tokens: &mut TokenStream) {
            tokens.extend(quote! { ::core::marker::Send });
        }
    }

    impl ToTokens for SyncFP {
        fn to_tokens(&self, tokens: &mut TokenStream) {
            tokens.extend(quote! { ::core::marker::Sync });
        }
    }
}
