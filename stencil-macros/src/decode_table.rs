use crate::decode_column::{ColumnMetadata, decode_column};
use convert_case::{Case, Casing};
use quote::ToTokens;
use syn::{ItemStruct, LitStr, parse::ParseBuffer};

pub(crate) struct TableMetadata {
    pub(crate) columns: Vec<ColumnMetadata>,
    pub(crate) name: String,
    pub(crate) schema: String,
}

impl TableMetadata {
    /// `schema.table`, or just `table` without a schema.
    pub(crate) fn full_name(&self) -> String {
        if self.schema.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.schema, self.name)
        }
    }
}

pub fn decode_table(item: &ItemStruct) -> TableMetadata {
    let columns: Vec<_> = item
        .fields
        .iter()
        .map(decode_column)
        .filter(|c| !c.ignore)
        .collect();
    let mut name = item.ident.to_string().to_case(Case::Snake);
    let mut schema = String::new();
    if name.starts_with('_') {
        name.remove(0);
    }
    for attr in &item.attrs {
        let meta = &attr.meta;
        if !meta.path().is_ident("stencil") {
            continue;
        }
        let Ok(list) = meta.require_list() else {
            panic!(
                "Error while parsing `stencil`, use it like: `#[stencil(attribute = value, ..)]`"
            );
        };
        let _ = list.parse_nested_meta(|arg| {
            if arg.path.is_ident("name") {
                let Ok(value) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                    panic!(
                        "Error while parsing `name`, use it like: `#[stencil(name = \"my_table\")]`"
                    );
                };
                name = value.value();
            } else if arg.path.is_ident("schema") {
                let Ok(value) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                    panic!(
                        "Error while parsing `schema`, use it like: `#[stencil(schema = \"my_schema\")]`"
                    );
                };
                schema = value.value();
            } else {
                panic!(
                    "Unknown attribute `{}` inside stencil macro",
                    arg.path.to_token_stream()
                );
            }
            Ok(())
        });
    }
    for (i, column) in columns.iter().enumerate() {
        if columns[..i].iter().any(|c| c.name == column.name) {
            panic!("Column `{}` is declared more than once", column.name);
        }
    }
    TableMetadata {
        columns,
        name,
        schema,
    }
}
