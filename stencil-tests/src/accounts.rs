use std::sync::LazyLock;
use stencil::{
    Entity, ExecContext, Executor, StatementCache, delete, insert, is_cancelled, is_conflict,
    is_not_found, load, update,
};
use time::{PrimitiveDateTime, macros::datetime};
use tokio::sync::Mutex;

static MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

#[derive(Entity, Debug, Default, Clone, PartialEq)]
pub struct Account {
    #[stencil(primary_key, auto_increment)]
    pub id: i64,
    pub email: String,
    #[stencil(refuse_update)]
    pub created_at: Option<PrimitiveDateTime>,
}

/// Same table as [`Account`], the generated columns are read back on insert.
#[derive(Entity, Debug, Default, Clone, PartialEq)]
#[stencil(name = "account")]
pub struct StampedAccount {
    #[stencil(primary_key, auto_increment, returning_insert)]
    pub id: i64,
    pub email: String,
    #[stencil(returning_insert, refuse_update)]
    pub created_at: Option<PrimitiveDateTime>,
}

pub async fn accounts<X: Executor>(cache: &StatementCache, executor: &mut X) {
    let _lock = MUTEX.lock().await;
    let context = ExecContext::new();

    // Insert
    let mut account = Account {
        id: 0,
        email: "a@x.com".into(),
        created_at: Some(datetime!(2025-01-02 03:04:05)),
    };
    let id = insert(cache, executor, &context, &mut account)
        .await
        .expect("Failed to insert the account");
    if executor.dialect().has_last_insert_id() {
        account.id = id.expect("The driver should report the generated id");
        assert!(account.id > 0);
    } else {
        assert_eq!(id, None);
        return;
    }

    // Load
    let mut loaded = Account {
        id: account.id,
        ..Default::default()
    };
    load(cache, executor, &context, &mut loaded)
        .await
        .expect("Failed to load the account");
    assert_eq!(loaded, account);

    // Update, created_at is never written
    account.email = "b@x.com".into();
    account.created_at = Some(datetime!(1999-12-31 23:59:59));
    update(cache, executor, &context, &mut account)
        .await
        .expect("Failed to update the account");
    let mut loaded = Account {
        id: account.id,
        ..Default::default()
    };
    load(cache, executor, &context, &mut loaded)
        .await
        .expect("Failed to load the updated account");
    assert_eq!(loaded.email, "b@x.com");
    assert_eq!(loaded.created_at, Some(datetime!(2025-01-02 03:04:05)));

    // Unique violation
    let mut duplicate = Account {
        id: 0,
        email: "b@x.com".into(),
        created_at: None,
    };
    let error = insert(cache, executor, &context, &mut duplicate)
        .await
        .expect_err("Inserting a duplicate email should fail");
    assert!(
        is_conflict(executor.dialect(), &error),
        "Not a conflict: {error:#}"
    );
    assert!(!is_not_found(&error));

    // Missing row
    let mut missing = Account {
        id: account.id + 1000,
        email: "c@x.com".into(),
        created_at: None,
    };
    let error = update(cache, executor, &context, &mut missing)
        .await
        .expect_err("Updating a missing account should fail");
    assert!(is_not_found(&error), "Unexpected error: {error:#}");
    let error = load(cache, executor, &context, &mut missing)
        .await
        .expect_err("Loading a missing account should fail");
    assert!(is_not_found(&error), "Unexpected error: {error:#}");

    // Delete
    let affected = delete(cache, executor, &context, &account)
        .await
        .expect("Failed to delete the account");
    assert_eq!(affected.rows_affected, 1);
    let affected = delete(cache, executor, &context, &account)
        .await
        .expect("Deleting a missing account should succeed");
    assert_eq!(affected.rows_affected, 0);
    let error = load(cache, executor, &context, &mut account)
        .await
        .expect_err("The account should be gone");
    assert!(is_not_found(&error));
}

pub async fn stamped_accounts<X: Executor>(cache: &StatementCache, executor: &mut X) {
    let _lock = MUTEX.lock().await;
    let context = ExecContext::new();

    // Cancelled before reaching the database
    let mut account = StampedAccount {
        email: "stamped@x.com".into(),
        ..Default::default()
    };
    let cancelled = ExecContext::new();
    cancelled.cancel();
    let error = insert(cache, executor, &cancelled, &mut account)
        .await
        .expect_err("A cancelled insert should fail");
    assert!(is_cancelled(&error));
    assert_eq!(account.id, 0);

    // Generated columns are scanned back
    let id = insert(cache, executor, &context, &mut account)
        .await
        .expect("Failed to insert the stamped account");
    assert_eq!(id, None);
    assert!(account.id > 0);
    let created_at = account
        .created_at
        .expect("created_at should be returned by the insert");

    let mut loaded = StampedAccount {
        id: account.id,
        ..Default::default()
    };
    load(cache, executor, &context, &mut loaded)
        .await
        .expect("Failed to load the stamped account");
    assert_eq!(loaded.email, "stamped@x.com");
    assert_eq!(loaded.created_at, Some(created_at));

    account.email = "restamped@x.com".into();
    update(cache, executor, &context, &mut account)
        .await
        .expect("Failed to update the stamped account");
    load(cache, executor, &context, &mut loaded)
        .await
        .expect("Failed to reload the stamped account");
    assert_eq!(loaded, account);
}
