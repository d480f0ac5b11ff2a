//! `#[reflect(...)]` attribute parsing.

use proc_macro2::Span;
use syn::parse::Parse;
use syn::punctuated::Punctuated;
use syn::{Attribute, Token, Type};

use crate::REFLECT_ATTRIBUTE_NAME;

// -----------------------------------------------------------------------------
// TypeAttributes

/// Type-level attributes.
///
/// - `#[reflect(upcast(dyn A, dyn B))]`
#[derive(Default)]
pub(crate) struct TypeAttributes {
    /// Trait objects the type can be boxed as.
    pub upcasts: Vec<Type>,
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();

        for attr in attrs {
            if !attr.path().is_ident(REFLECT_ATTRIBUTE_NAME) {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("upcast") {
                    let content;
                    syn::parenthesized!(content in meta.input);
                    let types: Punctuated<Type, Token![,]> =
                        content.parse_terminated(Type::parse, Token![,])?;
                    this.upcasts.extend(types);
                    Ok(())
                } else if meta.path.is_ident("skip") {
                    Err(meta.error("`skip` can only be applied to fields"))
                } else {
                    Err(meta.error("unknown reflect attribute, expected `upcast(..)`"))
                }
            })?;
        }

        Ok(this)
    }
}

// -----------------------------------------------------------------------------
// FieldAttributes

/// Field-level attributes.
///
/// - `#[reflect(skip)]`
#[derive(Default)]
pub(crate) struct FieldAttributes {
    pub skip: Option<Span>,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();

        for attr in attrs {
            if !attr.path().is_ident(REFLECT_ATTRIBUTE_NAME) {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    if this.skip.is_some() {
                        return Err(meta.error("duplicate `skip` attribute"));
                    }
                    this.skip = Some(meta.input.span());
                    Ok(())
                } else if meta.path.is_ident("upcast") {
                    Err(meta.error("`upcast` can only be applied to types"))
                } else {
                    Err(meta.error("unknown reflect attribute, expected `skip`"))
                }
            })?;
        }

        Ok(this)
    }
}
