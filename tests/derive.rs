#[cfg(test)]
mod tests {
    use std::{any::TypeId, borrow::Cow};
    use stencil::{ColumnDef, Entity, RowLabeled, Value, get_metadata};
    use uuid::Uuid;

    #[derive(Entity, Debug, Default, PartialEq)]
    #[stencil(schema = "billing")]
    struct InvoiceItem {
        #[stencil(primary_key, name = "invoice")]
        invoice_id: Uuid,
        #[stencil(primary_key)]
        line: u16,
        description: Cow<'static, str>,
        #[stencil(refuse_update)]
        _amount: Option<rust_decimal::Decimal>,
        #[stencil(returning_update)]
        touched: Option<i64>,
        #[stencil(ignore)]
        scratch: Vec<String>,
    }

    #[derive(Entity)]
    struct Tally {
        #[stencil(primary_key, auto_increment, returning_insert)]
        id: i64,
        hits: u32,
    }

    #[test]
    fn derived_metadata() {
        let metadata = get_metadata::<InvoiceItem>().unwrap();
        assert_eq!(metadata.entity(), TypeId::of::<InvoiceItem>());
        assert_eq!(metadata.table(), "billing.invoice_item");
        assert_eq!(
            metadata.columns(),
            [
                ColumnDef::new("invoice").primary_key(),
                ColumnDef::new("line").primary_key(),
                ColumnDef::new("description"),
                ColumnDef::new("amount").refuse_update(),
                ColumnDef::new("touched").returning_update(),
            ]
        );
        assert!(metadata.primary_keys().all(|c| c.refuse_update));
        assert!(!metadata.has_returning_insert());
        assert!(metadata.has_returning_update());

        let metadata = get_metadata::<Tally>().unwrap();
        assert_eq!(metadata.table(), "tally");
        assert!(metadata.has_returning_insert());
        assert_eq!(metadata.primary_keys().len(), 1);
    }

    #[test]
    fn read_and_write_columns() {
        let id = Uuid::parse_str("0b5c3f5e-7a43-4c0e-9a53-1b2f7d7f0c11").unwrap();
        let mut item = InvoiceItem {
            invoice_id: id,
            line: 3,
            description: "Paper".into(),
            _amount: None,
            touched: Some(1),
            scratch: vec!["not a column".into()],
        };
        assert_eq!(item.value("invoice"), Some(Value::Uuid(id)));
        assert_eq!(item.value("line"), Some(Value::Int64(3)));
        assert_eq!(item.value("amount"), Some(Value::Null));
        assert_eq!(item.value("invoice_id"), None);
        assert_eq!(item.value("scratch"), None);

        let row = item.row();
        assert_eq!(
            row.names(),
            ["invoice", "line", "description", "amount", "touched"]
        );

        item.scan(RowLabeled::from_iter([
            ("description", Value::Varchar("Ink".into())),
            ("amount", Value::Varchar("12.50".into())),
            ("touched", Value::Null),
        ]))
        .unwrap();
        assert_eq!(item.description, "Ink");
        assert_eq!(item._amount, Some(rust_decimal::Decimal::new(1250, 2)));
        assert_eq!(item.touched, None);
        assert_eq!(item.line, 3);
        assert_eq!(item.scratch, ["not a column"]);

        let error = item
            .set_value("line", Value::Int64(70_000))
            .unwrap_err();
        assert!(format!("{error:#}").contains("cannot assign column `line`"));
        assert!(item.set_value("scratch", Value::Null).is_err());

        let mut tally = Tally { id: 0, hits: 0 };
        tally.set_value("id", Value::Int64(9)).unwrap();
        tally.set_value("hits", Value::Int64(2)).unwrap();
        assert_eq!((tally.id, tally.hits), (9, 2));
    }
}
