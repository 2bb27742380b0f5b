use crate::{GenericSqlWriter, MySqlSqlWriter, PostgresSqlWriter, SqlWriter, SqliteSqlWriter};
use std::fmt::{self, Display};

pub const DRIVER_MYSQL: &str = "mysql";
pub const DRIVER_POSTGRES: &str = "postgres";
pub const DRIVER_SQLITE3: &str = "sqlite3";

/// Driver names that speak the wire protocol of another canonical driver.
static DRIVER_ALIASES: &[(&str, &str)] = &[
    ("pgx", DRIVER_POSTGRES),
    ("postgresql", DRIVER_POSTGRES),
    ("mariadb", DRIVER_MYSQL),
    ("sqlite", DRIVER_SQLITE3),
];

/// Map a raw driver name to its canonical name. Unknown names are returned unchanged.
pub fn canonical_driver_name(raw: &str) -> &str {
    DRIVER_ALIASES
        .iter()
        .find_map(|(alias, canonical)| (*alias == raw).then_some(*canonical))
        .unwrap_or(raw)
}

/// SQL engine profile: identifier quoting and the feature set the engine layer cares about.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// Unknown driver, no special casing.
    #[default]
    Generic,
    Postgres,
    MySql,
    Sqlite,
}

impl Dialect {
    /// Resolve a dialect from the name reported by a database handle. Never fails.
    pub fn resolve(driver_name: &str) -> Self {
        match canonical_driver_name(driver_name) {
            DRIVER_POSTGRES => Dialect::Postgres,
            DRIVER_MYSQL => Dialect::MySql,
            DRIVER_SQLITE3 => Dialect::Sqlite,
            _ => Dialect::Generic,
        }
    }

    /// Canonical driver name, empty for the generic dialect.
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Generic => "",
            Dialect::Postgres => DRIVER_POSTGRES,
            Dialect::MySql => DRIVER_MYSQL,
            Dialect::Sqlite => DRIVER_SQLITE3,
        }
    }

    pub fn quote_symbol(&self) -> char {
        self.sql_writer().quote_symbol()
    }

    /// Whether the engine accepts `RETURNING` on INSERT and UPDATE.
    ///
    /// Informational only: statements carry `RETURNING` whenever the metadata asks for it and an
    /// engine without support rejects them at execution time.
    pub fn supports_returning(&self) -> bool {
        matches!(self, Dialect::Postgres | Dialect::Sqlite)
    }

    /// Whether the driver can report the id generated by the last insert.
    pub fn has_last_insert_id(&self) -> bool {
        !matches!(self, Dialect::Postgres)
    }

    /// Error message fragment the engine uses for unique constraint violations.
    pub fn unique_violation_marker(&self) -> Option<&'static str> {
        match self {
            Dialect::Postgres => Some("duplicate key value violates unique constraint"),
            Dialect::MySql => Some("Duplicate entry"),
            Dialect::Sqlite => Some("UNIQUE constraint failed"),
            Dialect::Generic => None,
        }
    }

    /// Append the positional placeholder for the parameter at `index` (from 0).
    pub fn write_placeholder(&self, out: &mut String, index: usize) {
        match self {
            Dialect::Postgres => {
                out.push('$');
                out.push_str(&(index + 1).to_string());
            }
            _ => out.push('?'),
        }
    }

    pub fn sql_writer(&self) -> &'static dyn SqlWriter {
        static GENERIC: GenericSqlWriter = GenericSqlWriter::new();
        static POSTGRES: PostgresSqlWriter = PostgresSqlWriter::new();
        static MYSQL: MySqlSqlWriter = MySqlSqlWriter::new();
        static SQLITE: SqliteSqlWriter = SqliteSqlWriter::new();
        match self {
            Dialect::Generic => &GENERIC,
            Dialect::Postgres => &POSTGRES,
            Dialect::MySql => &MYSQL,
            Dialect::Sqlite => &SQLITE,
        }
    }
}

impl Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Generic => f.write_str("generic"),
            _ => f.write_str(self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_resolve_to_canonical_names() {
        assert_eq!(canonical_driver_name("pgx"), "postgres");
        assert_eq!(canonical_driver_name("postgresql"), "postgres");
        assert_eq!(canonical_driver_name("mariadb"), "mysql");
        assert_eq!(canonical_driver_name("sqlite"), "sqlite3");
        assert_eq!(canonical_driver_name("postgres"), "postgres");
        assert_eq!(canonical_driver_name("oracle"), "oracle");
        assert_eq!(canonical_driver_name(""), "");
    }

    #[test]
    fn resolve_dialect() {
        assert_eq!(Dialect::resolve("pgx"), Dialect::Postgres);
        assert_eq!(Dialect::resolve("postgres"), Dialect::Postgres);
        assert_eq!(Dialect::resolve("mysql"), Dialect::MySql);
        assert_eq!(Dialect::resolve("sqlite3"), Dialect::Sqlite);
        assert_eq!(Dialect::resolve("mssql"), Dialect::Generic);
        assert_eq!(Dialect::resolve("Postgres"), Dialect::Generic);
    }

    #[test]
    fn behavior_table() {
        assert_eq!(Dialect::MySql.quote_symbol(), '`');
        assert_eq!(Dialect::Postgres.quote_symbol(), '"');
        assert_eq!(Dialect::Sqlite.quote_symbol(), '"');
        assert_eq!(Dialect::Generic.quote_symbol(), '"');
        assert!(!Dialect::Postgres.has_last_insert_id());
        assert!(Dialect::MySql.has_last_insert_id());
        assert!(Dialect::Generic.has_last_insert_id());
        assert!(Dialect::Postgres.supports_returning());
        assert!(!Dialect::MySql.supports_returning());
        assert_eq!(Dialect::Generic.unique_violation_marker(), None);
    }

    #[test]
    fn placeholders() {
        let mut out = String::new();
        Dialect::Postgres.write_placeholder(&mut out, 0);
        out.push(',');
        Dialect::Postgres.write_placeholder(&mut out, 11);
        assert_eq!(out, "$1,$12");
        let mut out = String::new();
        Dialect::MySql.write_placeholder(&mut out, 3);
        Dialect::Generic.write_placeholder(&mut out, 4);
        assert_eq!(out, "??");
    }
}
