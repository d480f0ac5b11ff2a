use quote::{ToTokens, quote};

use crate::derive_data::{ReflectStruct, StructField};
use crate::path::fp::{BoxFP, OptionFP, ResultFP};

/// Generate `Object` impl, one member per active field.
pub(crate) fn impl_trait_object(info: &ReflectStruct) -> proc_macro2::TokenStream {
    let tj_reflect_path = info.tj_reflect_path();
    let reflect_ = crate::path::reflect_(tj_reflect_path);
    let from_reflect_ = crate::path::from_reflect_(tj_reflect_path);
    let object_ = crate::path::object_(tj_reflect_path);
    let type_registry_ = crate::path::type_registry_(tj_reflect_path);
    let option_ = OptionFP.to_token_stream();
    let result_ = ResultFP.to_token_stream();
    let box_ = BoxFP.to_token_stream();

    let ident = info.ident();
    let (impl_generics, ty_generics, where_clause) = info.split_generics();

    let fields: Vec<&StructField> = info.active_fields().collect();
    let field_len = fields.len();
    let keys: Vec<_> = fields.iter().map(|field| field.key()).collect();
    let members: Vec<_> = fields.iter().map(|field| field.ident).collect();
    let types: Vec<_> = fields.iter().map(|field| field.ty).collect();
    let indices = 0..field_len;

    quote! {
        impl #impl_generics #object_ for #ident #ty_generics #where_clause {
            fn member(&self, __key: &str) -> #option_<&dyn #reflect_> {
                match __key {
                    #( #keys => #option_::Some(#reflect_::as_reflect(&self.#members)), )*
                    _ => #option_::None,
                }
            }

            #[allow(unused_variables, reason = "structs without fields")]
            fn set_member(
                &mut self,
                __key: &str,
                __value: #box_<dyn #reflect_>,
                __registry: &#type_registry_,
            ) -> #result_<(), #box_<dyn #reflect_>> {
                match __key {
                    #(
                        #keys => {
                            self.#members = <#types as #from_reflect_>::from_reflect(__value, __registry)?;
                            #result_::Ok(())
                        }
                    )*
                    _ => #result_::Err(__value),
                }
            }

            #[inline]
            fn member_len(&self) -> usize {
                #field_len
            }

            fn key_at(&self, __index: usize) -> #option_<&str> {
                match __index {
                    #( #indices => #option_::Some(#keys), )*
                    _ => #option_::None,
                }
            }
        }
    }
}
