use quote::ToTokens;
use syn::{Field, Ident, LitStr, parse::ParseBuffer};

pub(crate) struct ColumnMetadata {
    pub(crate) ident: Ident,
    pub(crate) name: String,
    pub(crate) primary_key: bool,
    pub(crate) auto_increment: bool,
    pub(crate) returning_insert: bool,
    pub(crate) returning_update: bool,
    pub(crate) refuse_update: bool,
    pub(crate) ignore: bool,
}

fn flag(arg: &syn::meta::ParseNestedMeta, name: &str) {
    // value() is Err for Meta::Path
    let Err(..) = arg.value() else {
        panic!("Error while parsing `{name}`, use it like: `#[stencil({name})]`");
    };
}

pub fn decode_column(field: &Field) -> ColumnMetadata {
    let ident = field
        .ident
        .clone()
        .expect("Entity fields are expected to have a name");
    let mut name = ident.to_string();
    if name.starts_with('_') {
        name.remove(0);
    }
    let mut metadata = ColumnMetadata {
        ident,
        name,
        primary_key: false,
        auto_increment: false,
        returning_insert: false,
        returning_update: false,
        refuse_update: false,
        ignore: false,
    };
    for attr in &field.attrs {
        let meta = &attr.meta;
        if !meta.path().is_ident("stencil") {
            continue;
        }
        let Ok(list) = meta.require_list() else {
            panic!(
                "Error while parsing `stencil`, use it like: `#[stencil(attribute = value, ...)]`"
            );
        };
        let _ = list.parse_nested_meta(|arg| {
            if arg.path.is_ident("name") {
                let Ok(v) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                    panic!(
                        "Error while parsing `name`, use it like: `#[stencil(name = \"my_column\")]`"
                    );
                };
                metadata.name = v.value();
            } else if arg.path.is_ident("primary_key") {
                flag(&arg, "primary_key");
                metadata.primary_key = true;
                metadata.refuse_update = true;
            } else if arg.path.is_ident("auto_increment") {
                flag(&arg, "auto_increment");
                metadata.auto_increment = true;
            } else if arg.path.is_ident("returning_insert") {
                flag(&arg, "returning_insert");
                metadata.returning_insert = true;
            } else if arg.path.is_ident("returning_update") {
                flag(&arg, "returning_update");
                metadata.returning_update = true;
            } else if arg.path.is_ident("refuse_update") {
                flag(&arg, "refuse_update");
                metadata.refuse_update = true;
            } else if arg.path.is_ident("ignore") {
                flag(&arg, "ignore");
                metadata.ignore = true;
            } else {
                panic!(
                    "Unknown attribute `{}` inside stencil macro",
                    arg.path.to_token_stream()
                );
            }
            Ok(())
        });
    }
    if metadata.name.is_empty() {
        panic!("Column `{}` cannot have an empty name", metadata.ident);
    }
    metadata
}
