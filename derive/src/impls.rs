use proc_macro2::{Literal, TokenStream};
use quote::quote;

use crate::derive_data::{FilterableRecord, RecordField};

// -----------------------------------------------------------------------------
// Codegen

/// Generates the `Value` and `Filterable` implementations plus the `static`
/// descriptor table for a parsed record.
pub(crate) fn impl_filterable(record: &FilterableRecord) -> TokenStream {
    let ident = record.ident;
    let type_name = ident.to_string();

    let field_infos = record.fields.iter().map(field_info_tokens);
    let field_idents = record.fields.iter().map(|field| field.ident);
    let field_indices = (0..record.fields.len()).map(Literal::usize_unsuffixed);

    quote! {
        impl patchmap::Value for #ident {
            #[inline]
            fn kind(&self) -> patchmap::ValueKind {
                patchmap::ValueKind::Record
            }

            #[inline]
            fn as_filterable(&self) -> ::core::option::Option<&dyn patchmap::Filterable> {
                ::core::option::Option::Some(self)
            }

            #[inline]
            fn clone_value(&self) -> ::std::boxed::Box<dyn patchmap::Value> {
                ::std::boxed::Box::new(::core::clone::Clone::clone(self))
            }
        }

        impl patchmap::Filterable for #ident {
            fn record_info(&self) -> &'static patchmap::info::RecordInfo {
                static FIELDS: &[patchmap::info::FieldInfo] = &[#(#field_infos),*];
                static INFO: patchmap::info::RecordInfo =
                    patchmap::info::RecordInfo::new(#type_name, FIELDS);
                &INFO
            }

            fn field_at(&self, index: usize) -> ::core::option::Option<&dyn patchmap::Value> {
                match index {
                    #(#field_indices => ::core::option::Option::Some(&self.#field_idents),)*
                    _ => ::core::option::Option::None,
                }
            }

            #[inline]
            fn iter_fields(&self) -> patchmap::record::FieldIter<'_> {
                patchmap::record::FieldIter::new(self)
            }
        }
    }
}

/// Generates one `FieldInfo` constructor expression.
fn field_info_tokens(field: &RecordField) -> TokenStream {
    let name = field.ident.to_string();
    let tags = field.tags.iter().map(|(namespace, value)| {
        quote!((#namespace, #value))
    });

    let info = quote! {
        patchmap::info::FieldInfo::new(#name, &[#(#tags),*])
    };

    if field.embedded {
        quote!(#info.embedded())
    } else {
        info
    }
}
