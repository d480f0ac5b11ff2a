use quote::{ToTokens, quote};

use crate::derive_data::ReflectStruct;
use crate::path::fp::{BoxFP, OptionFP};

/// Generate `Introspect` impl: the declared shape of every active field and
/// the casts listed in `#[reflect(upcast(..))]`.
pub(crate) fn impl_trait_introspect(info: &ReflectStruct) -> proc_macro2::TokenStream {
    let tj_reflect_path = info.tj_reflect_path();
    let reflect_ = crate::path::reflect_(tj_reflect_path);
    let typed_ = crate::path::typed_(tj_reflect_path);
    let introspect_ = crate::path::introspect_(tj_reflect_path);
    let type_shape_ = crate::path::type_shape_(tj_reflect_path);
    let upcast_table_ = crate::path::upcast_table_(tj_reflect_path);
    let option_ = OptionFP.to_token_stream();
    let box_ = BoxFP.to_token_stream();

    let ident = info.ident();
    let (impl_generics, ty_generics, where_clause) = info.split_generics();

    let (keys, types): (Vec<_>, Vec<_>) = info
        .active_fields()
        .map(|field| (field.key(), field.ty))
        .unzip();

    let register_upcasts = if info.attrs().upcasts.is_empty() {
        proc_macro2::TokenStream::new()
    } else {
        let targets = &info.attrs().upcasts;
        quote! {
            fn register_upcasts(__table: &mut #upcast_table_) {
                #(
                    __table.insert::<#targets>(|__value| {
                        <dyn #reflect_>::downcast::<Self>(__value)
                            .map(|__boxed| __boxed as #box_<#targets>)
                    });
                )*
            }
        }
    };

    quote! {
        impl #impl_generics #introspect_ for #ident #ty_generics #where_clause {
            fn field_shape(__key: &str) -> #option_<#type_shape_> {
                match __key {
                    #( #keys => #option_::Some(<#types as #typed_>::type_shape()), )*
                    _ => #option_::None,
                }
            }

            #register_upcasts
        }
    }
}
