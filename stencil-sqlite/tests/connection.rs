#[cfg(test)]
mod tests {
    use std::{path::Path, sync::Mutex};
    use stencil_core::{Connection, Executor, Query};
    use stencil_sqlite::SqliteConnection;
    use stencil_tests::{init_logs, silent_logs};
    use tokio::fs;

    static MUTEX: Mutex<()> = Mutex::new(());

    #[tokio::test]
    async fn create_database() {
        init_logs();
        const DB_PATH: &str = "../target/debug/creation.sqlite";
        let _guard = MUTEX.lock().unwrap();
        if Path::new(DB_PATH).exists() {
            fs::remove_file(DB_PATH)
                .await
                .unwrap_or_else(|_| panic!("Failed to remove test database file {}", DB_PATH));
        }
        assert!(
            !Path::new(DB_PATH).exists(),
            "Database file should not exist before test"
        );
        let connection = SqliteConnection::connect(&format!("sqlite://{}?mode=rwc", DB_PATH))
            .await
            .expect("Could not open the database");
        assert!(
            Path::new(DB_PATH).exists(),
            "Database file should be created after connection"
        );
        connection.close().await;
        let connection = SqliteConnection::connect(&format!("sqlite://{}?mode=ro", DB_PATH))
            .await
            .expect("Could not open the database");
        connection.close().await;
        fs::remove_file(DB_PATH)
            .await
            .unwrap_or_else(|_| panic!("Failed to remove test database file {}", DB_PATH));
        silent_logs! {
            assert!(
                SqliteConnection::connect(&format!("sqlite://{}?mode=ro", DB_PATH))
                    .await
                    .is_err(),
                "Should not be able to open in read only unexisting database"
            );
        }
    }

    #[tokio::test]
    async fn wrong_url() {
        silent_logs! {
            assert!(SqliteConnection::connect("duckdb://some_value").await.is_err());
        };
    }

    #[tokio::test]
    async fn raw_queries() {
        init_logs();
        let mut connection = SqliteConnection::connect("sqlite::memory:")
            .await
            .expect("Could not open the database");
        assert_eq!(connection.driver_name(), "sqlite3");
        connection
            .execute(Query::raw("CREATE TABLE t (a INTEGER, b TEXT, c REAL, d BLOB)"))
            .await
            .expect("Failed to create the table");
        let affected = connection
            .execute(
                Query::raw("INSERT INTO t (a, b, c, d) VALUES (?, ?, ?, ?)")
                    .bind(7)
                    .bind("seven")
                    .bind(7.5)
                    .bind(vec![7u8]),
            )
            .await
            .expect("Failed to insert");
        assert_eq!(affected.rows_affected, 1);
        assert_eq!(affected.last_affected_id, Some(1));
        let row = connection
            .fetch_one(Query::raw("SELECT a, b, c, d, NULL AS e FROM t"))
            .await
            .expect("Failed to select")
            .expect("A row was expected");
        assert_eq!(row.names(), ["a", "b", "c", "d", "e"]);
        assert_eq!(
            row.values(),
            [
                7i64.into(),
                "seven".into(),
                7.5f64.into(),
                vec![7u8].into(),
                stencil_core::Value::Null,
            ]
        );
        silent_logs! {
            let error = connection
                .execute(Query::raw("INSERT INTO missing VALUES (1)"))
                .await
                .expect_err("The table does not exist");
            assert!(format!("{:#}", error).contains("no such table"));
        }
    }
}
