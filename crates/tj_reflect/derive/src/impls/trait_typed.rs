use quote::quote;

use crate::derive_data::ReflectStruct;

/// Generate `Typed` impl. A derived struct declares itself.
pub(crate) fn impl_trait_typed(info: &ReflectStruct) -> proc_macro2::TokenStream {
    let tj_reflect_path = info.tj_reflect_path();
    let typed_ = crate::path::typed_(tj_reflect_path);
    let type_shape_ = crate::path::type_shape_(tj_reflect_path);
    let declared_type_ = crate::path::declared_type_(tj_reflect_path);

    let ident = info.ident();
    let (impl_generics, ty_generics, where_clause) = info.split_generics();

    quote! {
        impl #impl_generics #typed_ for #ident #ty_generics #where_clause {
            #[inline]
            fn type_shape() -> #type_shape_ {
                #type_shape_::new(#declared_type_::of::<Self>())
            }
        }
    }
}
