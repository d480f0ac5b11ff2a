use proc_macro::TokenStream;
use quote::quote;
use syn::DeriveInput;

use crate::derive_data::ReflectStruct;

/// Provided for `#[derive(Reflect)]`.
pub(crate) fn match_reflect_impls(ast: DeriveInput) -> TokenStream {
    let info = match ReflectStruct::from_input(&ast) {
        Ok(val) => val,
        Err(err) => return err.into_compile_error().into(),
    };

    let reflect_impl = super::impl_trait_reflect(&info);
    let object_impl = super::impl_trait_object(&info);
    let from_reflect_impl = super::impl_trait_from_reflect(&info);
    let typed_impl = super::impl_trait_typed(&info);
    let introspect_impl = super::impl_trait_introspect(&info);

    TokenStream::from(quote! {
        const _: () = {
            #reflect_impl
            #object_impl
            #from_reflect_impl
            #typed_impl
            #introspect_impl
        };
    })
}
