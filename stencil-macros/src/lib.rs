mod decode_column;
mod decode_table;

use decode_table::decode_table;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{ItemStruct, parse_macro_input};

/// Implement `stencil::Entity` for a struct with named fields.
///
/// Every field not marked `#[stencil(ignore)]` becomes a column and must implement
/// `stencil::AsValue` and `Clone`.
#[proc_macro_derive(Entity, attributes(stencil))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let item: ItemStruct = parse_macro_input!(input as ItemStruct);
    if !item.generics.params.is_empty() {
        panic!("Entity cannot be derived for generic types");
    }
    let name = &item.ident;
    let table = decode_table(&item);
    let table_name = table.full_name();
    let column_defs = table.columns.iter().map(|c| {
        let column = &c.name;
        let mut def: TokenStream2 = quote!(::stencil::ColumnDef::new(#column));
        if c.primary_key {
            def.extend(quote!(.primary_key()));
        }
        if c.auto_increment {
            def.extend(quote!(.auto_increment()));
        }
        if c.returning_insert {
            def.extend(quote!(.returning_insert()));
        }
        if c.returning_update {
            def.extend(quote!(.returning_update()));
        }
        if c.refuse_update {
            def.extend(quote!(.refuse_update()));
        }
        def
    });
    let read = table.columns.iter().map(|c| {
        let (column, field) = (&c.name, &c.ident);
        quote! {
            #column => Some(::stencil::AsValue::as_value(::std::clone::Clone::clone(&self.#field))),
        }
    });
    let write = table.columns.iter().map(|c| {
        let (column, field) = (&c.name, &c.ident);
        quote! {
            #column => {
                self.#field = ::stencil::Context::with_context(
                    ::stencil::AsValue::try_from_value(value),
                    || format!("cannot assign column `{}`", #column),
                )?;
            }
        }
    });
    quote! {
        impl ::stencil::Entity for #name {
            fn metadata() -> &'static ::stencil::Metadata {
                static METADATA: ::std::sync::LazyLock<::stencil::Metadata> =
                    ::std::sync::LazyLock::new(|| {
                        ::stencil::Metadata::new::<#name>(#table_name, vec![#(#column_defs),*])
                    });
                &METADATA
            }

            fn value(&self, column: &str) -> Option<::stencil::Value> {
                match column {
                    #(#read)*
                    _ => None,
                }
            }

            fn set_value(&mut self, column: &str, value: ::stencil::Value) -> ::stencil::Result<()> {
                match column {
                    #(#write)*
                    _ => return Err(::stencil::missing_column::<Self>(column)),
                }
                Ok(())
            }
        }
    }
    .into()
}
