use crate::{ColumnDef, Dialect, Metadata, separated_by};

/// Dialect printer converting entity metadata into named-placeholder SQL templates.
///
/// Only the quoting primitives are dialect specific, every statement shape is shared. Templates
/// reference parameters as `:<column name>`, see [`Statement`](crate::Statement) for the
/// positional rebinding.
pub trait SqlWriter: Send + Sync {
    /// Character wrapping identifiers.
    fn quote_symbol(&self) -> char {
        '"'
    }

    /// Escape occurrences of `search` char with `replace` while copying into buffer.
    fn write_escaped(&self, out: &mut String, value: &str, search: char, replace: &str) {
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == search {
                out.push_str(&value[position..i]);
                out.push_str(replace);
                position = i + c.len_utf8();
            }
        }
        out.push_str(&value[position..]);
    }

    /// Quote a bare column name, doubling any embedded quote symbol.
    fn write_column_quoted(&self, out: &mut String, name: &str) {
        let symbol = self.quote_symbol();
        let doubled: String = [symbol, symbol].iter().collect();
        out.push(symbol);
        self.write_escaped(out, name, symbol, &doubled);
        out.push(symbol);
    }

    /// Quote a possibly dot qualified identifier.
    ///
    /// Existing quote symbols are stripped first so that quoting is idempotent, a `*` segment is
    /// left as is.
    fn write_identifier_quoted(&self, out: &mut String, name: &str) {
        let symbol = self.quote_symbol();
        let stripped = name.replace(symbol, "");
        separated_by(
            out,
            stripped.split('.'),
            |out, segment| {
                if segment == "*" {
                    out.push('*');
                } else {
                    out.push(symbol);
                    out.push_str(segment);
                    out.push(symbol);
                }
            },
            ".",
        );
    }

    /// Render `<pk1> = :<pk1> AND <pk2> = :<pk2> ...`.
    fn write_primary_key_condition(&self, out: &mut String, metadata: &Metadata) {
        let mut first = true;
        for column in metadata.primary_keys() {
            if !first {
                out.push_str(" AND ");
            }
            first = false;
            self.write_assignment(out, column);
        }
    }

    /// Render `<column> = :<column>`.
    fn write_assignment(&self, out: &mut String, column: &ColumnDef) {
        self.write_column_quoted(out, column.name());
        out.push_str(" = :");
        out.push_str(column.name());
    }

    fn write_returning(&self, out: &mut String, columns: &[&ColumnDef]) {
        if columns.is_empty() {
            return;
        }
        out.push_str(" RETURNING ");
        separated_by(
            out,
            columns,
            |out, column| self.write_column_quoted(out, column.name()),
            ", ",
        );
    }

    /// Emit `SELECT ... FROM ... WHERE <primary key> LIMIT 1`.
    fn write_select(&self, out: &mut String, metadata: &Metadata) {
        out.reserve(64 + metadata.columns().len() * 24);
        out.push_str("SELECT ");
        separated_by(
            out,
            metadata.columns(),
            |out, column| self.write_column_quoted(out, column.name()),
            ", ",
        );
        out.push_str(" FROM ");
        self.write_identifier_quoted(out, metadata.table());
        out.push_str(" WHERE ");
        self.write_primary_key_condition(out, metadata);
        out.push_str(" LIMIT 1");
    }

    /// Emit `INSERT INTO ... (...) VALUES (...)`, plus `RETURNING` for returning insert columns.
    fn write_insert(&self, out: &mut String, metadata: &Metadata) {
        let (returning, values): (Vec<&ColumnDef>, Vec<&ColumnDef>) = metadata
            .columns()
            .iter()
            .filter(|c| c.returning_insert || !c.auto_increment)
            .partition(|c| c.returning_insert);
        out.reserve(64 + metadata.columns().len() * 32);
        out.push_str("INSERT INTO ");
        self.write_identifier_quoted(out, metadata.table());
        out.push_str(" (");
        separated_by(
            out,
            &values,
            |out, column| self.write_column_quoted(out, column.name()),
            ", ",
        );
        out.push_str(") VALUES (");
        separated_by(
            out,
            &values,
            |out, column| {
                out.push(':');
                out.push_str(column.name());
            },
            ", ",
        );
        out.push(')');
        self.write_returning(out, &returning);
    }

    /// Emit `UPDATE ... SET ... WHERE <primary key>`, plus `RETURNING` for returning columns.
    fn write_update(&self, out: &mut String, metadata: &Metadata) {
        let (returning, set): (Vec<&ColumnDef>, Vec<&ColumnDef>) = metadata
            .columns()
            .iter()
            .filter(|c| c.returning_update || !c.refuse_update)
            .partition(|c| c.returning_update);
        out.reserve(64 + metadata.columns().len() * 32);
        out.push_str("UPDATE ");
        self.write_identifier_quoted(out, metadata.table());
        out.push_str(" SET ");
        separated_by(
            out,
            set,
            |out, column| self.write_assignment(out, column),
            ", ",
        );
        out.push_str(" WHERE ");
        self.write_primary_key_condition(out, metadata);
        self.write_returning(out, &returning);
    }

    /// Emit `DELETE FROM ... WHERE <primary key>`.
    fn write_delete(&self, out: &mut String, metadata: &Metadata) {
        out.reserve(64);
        out.push_str("DELETE FROM ");
        self.write_identifier_quoted(out, metadata.table());
        out.push_str(" WHERE ");
        self.write_primary_key_condition(out, metadata);
    }
}

/// Fallback writer for unknown drivers (double quoted identifiers).
#[derive(Default, Debug)]
pub struct GenericSqlWriter;
impl GenericSqlWriter {
    pub const fn new() -> Self {
        Self {}
    }
}
impl SqlWriter for GenericSqlWriter {}

#[derive(Default, Debug)]
pub struct PostgresSqlWriter;
impl PostgresSqlWriter {
    pub const fn new() -> Self {
        Self {}
    }
}
impl SqlWriter for PostgresSqlWriter {}

#[derive(Default, Debug)]
pub struct MySqlSqlWriter;
impl MySqlSqlWriter {
    pub const fn new() -> Self {
        Self {}
    }
}
impl SqlWriter for MySqlSqlWriter {
    fn quote_symbol(&self) -> char {
        '`'
    }
}

#[derive(Default, Debug)]
pub struct SqliteSqlWriter;
impl SqliteSqlWriter {
    pub const fn new() -> Self {
        Self {}
    }
}
impl SqlWriter for SqliteSqlWriter {}

/// Wrap a bare column name in the dialect quote symbol.
pub fn quote_column(name: &str, dialect: Dialect) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    dialect.sql_writer().write_column_quoted(&mut out, name);
    out
}

/// Quote every segment of a dot qualified name, see [`SqlWriter::write_identifier_quoted`].
pub fn quote_identifier(name: &str, dialect: Dialect) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    dialect.sql_writer().write_identifier_quoted(&mut out, name);
    out
}
