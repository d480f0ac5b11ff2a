use quote::quote;

use crate::derive_data::ReflectStruct;
use crate::path::fp::{BoxFP, ResultFP};

/// Generate `FromReflect` impl.
///
/// The reader builds registered types directly, so the value only has to be
/// unboxed.
pub(crate) fn impl_trait_from_reflect(info: &ReflectStruct) -> proc_macro2::TokenStream {
    let tj_reflect_path = info.tj_reflect_path();
    let reflect_ = crate::path::reflect_(tj_reflect_path);
    let from_reflect_ = crate::path::from_reflect_(tj_reflect_path);
    let type_registry_ = crate::path::type_registry_(tj_reflect_path);

    let ident = info.ident();
    let (impl_generics, ty_generics, where_clause) = info.split_generics();

    quote! {
        impl #impl_generics #from_reflect_ for #ident #ty_generics #where_clause {
            #[inline]
            fn from_reflect(
                __value: #BoxFP<dyn #reflect_>,
                _registry: &#type_registry_,
            ) -> #ResultFP<Self, #BoxFP<dyn #reflect_>> {
                <dyn #reflect_>::take::<Self>(__value)
            }
        }
    }
}
