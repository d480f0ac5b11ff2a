use proc_macro2::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, Generics, Ident, LitStr, Type};

use crate::derive_data::{FieldAttributes, TypeAttributes};

// -----------------------------------------------------------------------------
// StructField

/// A named field of the derived struct.
pub(crate) struct StructField<'a> {
    pub ident: &'a Ident,
    pub ty: &'a Type,
    pub attrs: FieldAttributes,
}

impl StructField<'_> {
    /// The member key, which is the field name without a raw prefix.
    pub fn key(&self) -> LitStr {
        let name = self.ident.to_string();
        let name = name.strip_prefix("r#").unwrap_or(&name);
        LitStr::new(name, self.ident.span())
    }
}

// -----------------------------------------------------------------------------
// ReflectStruct

/// Everything needed to generate the impls of a struct with named fields.
pub(crate) struct ReflectStruct<'a> {
    ident: &'a Ident,
    generics: &'a Generics,
    attrs: TypeAttributes,
    fields: Vec<StructField<'a>>,
    tj_reflect_path: syn::Path,
}

impl<'a> ReflectStruct<'a> {
    pub fn from_input(input: &'a DeriveInput) -> syn::Result<Self> {
        let named = match &input.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(named) => named,
                Fields::Unnamed(_) => {
                    return Err(syn::Error::new(
                        input.ident.span(),
                        "`Reflect` cannot be derived for tuple structs, use named fields",
                    ));
                }
                Fields::Unit => {
                    return Err(syn::Error::new(
                        input.ident.span(),
                        "`Reflect` cannot be derived for unit structs",
                    ));
                }
            },
            Data::Enum(data) => {
                return Err(syn::Error::new(
                    data.enum_token.span(),
                    "`Reflect` cannot be derived for enums",
                ));
            }
            Data::Union(data) => {
                return Err(syn::Error::new(
                    data.union_token.span(),
                    "`Reflect` cannot be derived for unions",
                ));
            }
        };

        let mut fields = Vec::with_capacity(named.named.len());
        for field in &named.named {
            let Some(ident) = field.ident.as_ref() else {
                return Err(syn::Error::new(field.span(), "expected a named field"));
            };
            fields.push(StructField {
                ident,
                ty: &field.ty,
                attrs: FieldAttributes::parse_attrs(&field.attrs)?,
            });
        }

        Ok(Self {
            ident: &input.ident,
            generics: &input.generics,
            attrs: TypeAttributes::parse_attrs(&input.attrs)?,
            fields,
            tj_reflect_path: crate::path::tj_reflect(),
        })
    }

    #[inline]
    pub fn ident(&self) -> &Ident {
        self.ident
    }

    #[inline]
    pub fn attrs(&self) -> &TypeAttributes {
        &self.attrs
    }

    #[inline]
    pub fn tj_reflect_path(&self) -> &syn::Path {
        &self.tj_reflect_path
    }

    /// Fields visible to reflection.
    pub fn active_fields(&self) -> impl Iterator<Item = &StructField<'a>> {
        self.fields.iter().filter(|field| field.attrs.skip.is_none())
    }

    /// `impl<..> Trait for Ident<..> where ..` pieces, with the bounds every
    /// reflected impl needs.
    ///
    /// Type parameters must be `Send + Sync + 'static`. For generic structs
    /// each active field type must also implement the reflection traits.
    pub fn split_generics(&self) -> (TokenStream, TokenStream, TokenStream) {
        use crate::path::fp::{SendFP, SyncFP};

        let (impl_generics, ty_generics, where_clause) = self.generics.split_for_impl();

        let mut predicates: Vec<TokenStream> = where_clause
            .map(|clause| clause.predicates.iter().map(|p| quote!(#p)).collect())
            .unwrap_or_default();

        if self.generics.type_params().next().is_some() {
            let tj_reflect_path = self.tj_reflect_path();
            let reflect_ = crate::path::reflect_(tj_reflect_path);
            let from_reflect_ = crate::path::from_reflect_(tj_reflect_path);
            let typed_ = crate::path::typed_(tj_reflect_path);

            for param in self.generics.type_params() {
                let ident = &param.ident;
                predicates.push(quote!(#ident: #SendFP + #SyncFP + 'static));
            }
            for field in self.active_fields() {
                let ty = field.ty;
                predicates.push(quote!(#ty: #reflect_ + #from_reflect_ + #typed_));
            }
        }

        let where_tokens = if predicates.is_empty() {
            TokenStream::new()
        } else {
            quote!(where #(#predicates,)*)
        };

        (quote!(#impl_generics), quote!(#ty_generics), where_tokens)
    }
}
