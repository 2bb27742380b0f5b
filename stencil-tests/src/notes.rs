use std::sync::LazyLock;
use stencil::{
    Entity, ExecContext, Executor, StatementCache, delete, insert, is_not_found, load, update,
};
use time::{PrimitiveDateTime, macros::datetime};
use tokio::sync::Mutex;

static MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

#[derive(Entity, Debug, Default, Clone, PartialEq)]
pub struct Note {
    #[stencil(primary_key)]
    pub author: String,
    #[stencil(primary_key)]
    pub number: i32,
    pub body: String,
    pub pinned: bool,
    #[stencil(returning_update)]
    pub updated_at: Option<PrimitiveDateTime>,
}

pub async fn notes<X: Executor>(cache: &StatementCache, executor: &mut X) {
    let _lock = MUTEX.lock().await;
    let context = ExecContext::new();

    let mut notes = [
        Note {
            author: "ada".into(),
            number: 1,
            body: "first".into(),
            pinned: false,
            updated_at: Some(datetime!(2024-02-29 12:00:00)),
        },
        Note {
            author: "ada".into(),
            number: 2,
            body: "second".into(),
            pinned: true,
            updated_at: None,
        },
    ];
    for note in &mut notes {
        insert(cache, executor, &context, note)
            .await
            .expect("Failed to insert the note");
    }

    // Columns returned by the update overwrite the local values
    let [first, second] = &mut notes;
    first.body = "first, edited".into();
    first.updated_at = None;
    update(cache, executor, &context, first)
        .await
        .expect("Failed to update the note");
    assert_eq!(first.updated_at, Some(datetime!(2024-02-29 12:00:00)));

    // The composite key addresses a single row
    let mut loaded = Note {
        author: "ada".into(),
        number: 2,
        ..Default::default()
    };
    load(cache, executor, &context, &mut loaded)
        .await
        .expect("Failed to load the note");
    assert_eq!(&loaded, second);
    let mut loaded = Note {
        author: "ada".into(),
        number: 1,
        ..Default::default()
    };
    load(cache, executor, &context, &mut loaded)
        .await
        .expect("Failed to load the edited note");
    assert_eq!(&loaded, first);

    // An update returning nothing reports a missing row
    let mut missing = Note {
        author: "grace".into(),
        number: 1,
        ..Default::default()
    };
    let error = update(cache, executor, &context, &mut missing)
        .await
        .expect_err("Updating a missing note should fail");
    assert!(is_not_found(&error), "Unexpected error: {error:#}");

    for note in &notes {
        let affected = delete(cache, executor, &context, note)
            .await
            .expect("Failed to delete the note");
        assert_eq!(affected.rows_affected, 1);
    }
}
