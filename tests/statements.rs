#[cfg(test)]
mod tests {
    use indoc::indoc;
    use stencil::{
        Dialect, Entity, Statement, StatementKind, Value, build_delete, build_insert,
        build_select, build_update, get_metadata, is_metadata_error,
    };
    use time::PrimitiveDateTime;

    #[derive(Entity, Default)]
    struct Account {
        #[stencil(primary_key, auto_increment)]
        id: i64,
        email: String,
        #[stencil(returning_insert, refuse_update)]
        created_at: Option<PrimitiveDateTime>,
    }

    #[derive(Entity, Default)]
    #[stencil(schema = "shop", name = "order_line")]
    struct OrderLine {
        #[stencil(primary_key)]
        order_id: i64,
        #[stencil(primary_key)]
        position: i32,
        product: String,
        quantity: u32,
        #[stencil(returning_update)]
        revision: i64,
    }

    #[derive(Entity, Default)]
    struct Event {
        #[stencil(name = "event id")]
        id: i64,
        payload: String,
    }

    #[test]
    fn account_postgres() {
        let metadata = get_metadata::<Account>().unwrap();
        assert_eq!(
            build_insert(metadata, Dialect::Postgres).unwrap(),
            r#"INSERT INTO "account" ("email") VALUES (:email) RETURNING "created_at""#
        );
        assert_eq!(
            build_update(metadata, Dialect::Postgres).unwrap(),
            r#"UPDATE "account" SET "email" = :email WHERE "id" = :id"#
        );
        assert_eq!(
            build_select(metadata, Dialect::Postgres).unwrap(),
            r#"SELECT "id", "email", "created_at" FROM "account" WHERE "id" = :id LIMIT 1"#
        );
        assert_eq!(
            build_delete(metadata, Dialect::Postgres).unwrap(),
            r#"DELETE FROM "account" WHERE "id" = :id"#
        );
    }

    #[test]
    fn account_mysql() {
        let metadata = get_metadata::<Account>().unwrap();
        assert_eq!(
            build_insert(metadata, Dialect::MySql).unwrap(),
            "INSERT INTO `account` (`email`) VALUES (:email) RETURNING `created_at`"
        );
        assert_eq!(
            build_select(metadata, Dialect::MySql).unwrap(),
            "SELECT `id`, `email`, `created_at` FROM `account` WHERE `id` = :id LIMIT 1"
        );
    }

    #[test]
    fn composite_key() {
        let metadata = get_metadata::<OrderLine>().unwrap();
        let select = build_select(metadata, Dialect::Sqlite).unwrap();
        assert_eq!(
            select,
            indoc! {r#"
                SELECT "order_id", "position", "product", "quantity", "revision" FROM "shop"."order_line" WHERE "order_id" = :order_id AND "position" = :position LIMIT 1
            "#}
            .trim_end()
        );
        let predicates = select
            .split(" WHERE ")
            .nth(1)
            .unwrap()
            .trim_end_matches(" LIMIT 1")
            .split(" AND ")
            .collect::<Vec<_>>();
        assert_eq!(
            predicates,
            [r#""order_id" = :order_id"#, r#""position" = :position"#]
        );
        assert_eq!(
            build_insert(metadata, Dialect::Sqlite).unwrap(),
            indoc! {r#"
                INSERT INTO "shop"."order_line" ("order_id", "position", "product", "quantity", "revision") VALUES (:order_id, :position, :product, :quantity, :revision)
            "#}
            .trim_end()
        );
        assert_eq!(
            build_update(metadata, Dialect::Sqlite).unwrap(),
            indoc! {r#"
                UPDATE "shop"."order_line" SET "product" = :product, "quantity" = :quantity WHERE "order_id" = :order_id AND "position" = :position RETURNING "revision"
            "#}
            .trim_end()
        );
        assert_eq!(
            build_delete(metadata, Dialect::MySql).unwrap(),
            "DELETE FROM `shop`.`order_line` WHERE `order_id` = :order_id AND `position` = :position"
        );
    }

    #[test]
    fn compiled_statements() {
        let metadata = get_metadata::<OrderLine>().unwrap();
        let update = Statement::build(StatementKind::Update, metadata, Dialect::Postgres).unwrap();
        assert_eq!(
            update.sql(),
            indoc! {r#"
                UPDATE "shop"."order_line" SET "product" = $1, "quantity" = $2 WHERE "order_id" = $3 AND "position" = $4 RETURNING "revision"
            "#}
            .trim_end()
        );
        assert_eq!(update.names(), ["product", "quantity", "order_id", "position"]);
        let line = OrderLine {
            order_id: 10,
            position: 2,
            product: "bolt".into(),
            quantity: 40,
            revision: 3,
        };
        let query = update.bind(&line).unwrap();
        assert_eq!(
            query.params,
            [
                Value::from("bolt"),
                40u32.into(),
                10i64.into(),
                2i32.into()
            ]
        );

        let insert = Statement::build(StatementKind::Insert, metadata, Dialect::MySql).unwrap();
        assert_eq!(
            insert.sql(),
            "INSERT INTO `shop`.`order_line` (`order_id`, `position`, `product`, `quantity`, `revision`) VALUES (?, ?, ?, ?, ?)"
        );
        assert_eq!(insert.text(), build_insert(metadata, Dialect::MySql).unwrap());
    }

    #[test]
    fn names_with_spaces() {
        let metadata = get_metadata::<Event>().unwrap();
        assert!(is_metadata_error(
            &build_select(metadata, Dialect::Sqlite).unwrap_err()
        ));
        assert_eq!(
            build_insert(metadata, Dialect::Sqlite).unwrap(),
            r#"INSERT INTO "event" ("event id", "payload") VALUES (:event id, :payload)"#
        );
        let insert = Statement::build(StatementKind::Insert, metadata, Dialect::Sqlite).unwrap();
        assert_eq!(insert.names(), ["event", "payload"]);
        let error = insert.bind(&Event::default()).unwrap_err();
        assert!(
            error
                .to_string()
                .contains("could not find name `event` in entity"),
            "{error}"
        );
    }

    #[test]
    fn insert_excludes_generated_columns() {
        for dialect in [
            Dialect::Generic,
            Dialect::Postgres,
            Dialect::MySql,
            Dialect::Sqlite,
        ] {
            let insert = build_insert(get_metadata::<Account>().unwrap(), dialect).unwrap();
            let (values, returning) = insert.split_once(" RETURNING ").unwrap();
            assert!(!values.contains("id"), "{insert}");
            assert!(!values.contains("created_at"), "{insert}");
            assert!(returning.contains("created_at"), "{insert}");
        }
    }

    #[test]
    fn deterministic_text() {
        let metadata = get_metadata::<OrderLine>().unwrap();
        for kind in StatementKind::ALL {
            let a = Statement::build(kind, metadata, Dialect::Postgres).unwrap();
            let b = Statement::build(kind, metadata, Dialect::Postgres).unwrap();
            assert_eq!(a, b);
        }
    }
}
