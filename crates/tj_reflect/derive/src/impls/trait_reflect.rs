use quote::quote;

use crate::derive_data::ReflectStruct;

/// Generate `Reflect` impl. Derived structs always view as objects.
pub(crate) fn impl_trait_reflect(info: &ReflectStruct) -> proc_macro2::TokenStream {
    let tj_reflect_path = info.tj_reflect_path();
    let reflect_ = crate::path::reflect_(tj_reflect_path);
    let reflect_ref_ = crate::path::reflect_ref_(tj_reflect_path);
    let reflect_mut_ = crate::path::reflect_mut_(tj_reflect_path);

    let ident = info.ident();
    let (impl_generics, ty_generics, where_clause) = info.split_generics();

    quote! {
        impl #impl_generics #reflect_ for #ident #ty_generics #where_clause {
            #[inline]
            fn reflect_ref(&self) -> #reflect_ref_<'_> {
                #reflect_ref_::Object(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> #reflect_mut_<'_> {
                #reflect_mut_::Object(self)
            }
        }
    }
}
