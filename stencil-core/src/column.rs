use std::borrow::Cow;

/// Structural description of one table column, as seen by the statement builder.
///
/// Flags are combined with the `const` builder methods:
/// ```rust
/// use stencil_core::ColumnDef;
/// let id = ColumnDef::new("id").primary_key().auto_increment();
/// assert!(id.primary_key && id.auto_increment && id.refuse_update);
/// ```
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    /// Physical column name, also used as the named placeholder.
    pub name: Cow<'static, str>,
    /// Member of the primary key, used to address the row in SELECT/UPDATE/DELETE.
    pub primary_key: bool,
    /// Generated by the database, left out of INSERT column and value lists.
    pub auto_increment: bool,
    /// Read back through `INSERT ... RETURNING`, never bound as an insert value.
    pub returning_insert: bool,
    /// Read back through `UPDATE ... RETURNING`, never part of the SET list.
    pub returning_update: bool,
    /// Left out of the UPDATE SET list.
    pub refuse_update: bool,
}

impl ColumnDef {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            primary_key: false,
            auto_increment: false,
            returning_insert: false,
            returning_update: false,
            refuse_update: false,
        }
    }

    /// Primary key columns address the row and are never updated.
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.refuse_update = true;
        self
    }

    pub const fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    pub const fn returning_insert(mut self) -> Self {
        self.returning_insert = true;
        self
    }

    pub const fn returning_update(mut self) -> Self {
        self.returning_update = true;
        self
    }

    pub const fn refuse_update(mut self) -> Self {
        self.refuse_update = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
