use crate::{Dialect, Entity, Error, Metadata, Query, Result};
use std::{
    any,
    fmt::{self, Display},
    iter::Peekable,
    str::CharIndices,
    sync::Arc,
};

/// The four single-row operations a statement can be built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    pub const ALL: [StatementKind; 4] = [
        StatementKind::Select,
        StatementKind::Insert,
        StatementKind::Update,
        StatementKind::Delete,
    ];
}

impl Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StatementKind::Select => "select",
            StatementKind::Insert => "insert",
            StatementKind::Update => "update",
            StatementKind::Delete => "delete",
        })
    }
}

/// `SELECT <columns> FROM <table> WHERE <primary key> LIMIT 1`.
pub fn build_select(metadata: &Metadata, dialect: Dialect) -> Result<String> {
    metadata.require_primary_key()?;
    let mut out = String::new();
    dialect.sql_writer().write_select(&mut out, metadata);
    Ok(out)
}

/// `INSERT INTO <table> (<columns>) VALUES (<placeholders>) [RETURNING <columns>]`.
pub fn build_insert(metadata: &Metadata, dialect: Dialect) -> Result<String> {
    let mut out = String::new();
    dialect.sql_writer().write_insert(&mut out, metadata);
    Ok(out)
}

/// `UPDATE <table> SET <assignments> WHERE <primary key> [RETURNING <columns>]`.
pub fn build_update(metadata: &Metadata, dialect: Dialect) -> Result<String> {
    metadata.require_primary_key()?;
    if !metadata
        .columns()
        .iter()
        .any(|c| !c.returning_update && !c.refuse_update)
    {
        return Err(metadata.error("no updatable columns are declared"));
    }
    let mut out = String::new();
    dialect.sql_writer().write_update(&mut out, metadata);
    Ok(out)
}

/// `DELETE FROM <table> WHERE <primary key>`.
pub fn build_delete(metadata: &Metadata, dialect: Dialect) -> Result<String> {
    metadata.require_primary_key()?;
    let mut out = String::new();
    dialect.sql_writer().write_delete(&mut out, metadata);
    Ok(out)
}

/// A generated statement: the named template and its positional form for one dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    kind: StatementKind,
    dialect: Dialect,
    text: String,
    sql: Arc<str>,
    names: Vec<String>,
}

impl Statement {
    /// Build the statement of `kind` for the entity described by `metadata`.
    pub fn build(kind: StatementKind, metadata: &Metadata, dialect: Dialect) -> Result<Self> {
        let text = match kind {
            StatementKind::Select => build_select(metadata, dialect)?,
            StatementKind::Insert => build_insert(metadata, dialect)?,
            StatementKind::Update => build_update(metadata, dialect)?,
            StatementKind::Delete => build_delete(metadata, dialect)?,
        };
        if !dialect.supports_returning()
            && matches!(kind, StatementKind::Insert | StatementKind::Update)
            && text.contains(" RETURNING ")
        {
            log::warn!(
                "The {} statement of `{}` uses RETURNING which the {} dialect may reject",
                kind,
                metadata.entity_name(),
                dialect
            );
        }
        Ok(Self::compile(kind, dialect, text))
    }

    /// Rewrite `:name` placeholders of `text` into the positional placeholders of `dialect`.
    ///
    /// Quoted strings and identifiers are copied verbatim, `::` casts are not placeholders.
    pub fn compile(kind: StatementKind, dialect: Dialect, text: String) -> Self {
        let mut sql = String::with_capacity(text.len());
        let mut names = Vec::new();
        let mut chars = text.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            match c {
                '\'' | '"' | '`' => {
                    sql.push(c);
                    for (_, inner) in chars.by_ref() {
                        sql.push(inner);
                        if inner == c {
                            break;
                        }
                    }
                }
                ':' if chars.peek().is_some_and(|(_, next)| *next == ':') => {
                    sql.push_str("::");
                    chars.next();
                }
                ':' if chars.peek().is_some_and(|(_, next)| is_name_char(*next)) => {
                    let name = take_name(&text, i + 1, &mut chars);
                    dialect.write_placeholder(&mut sql, names.len());
                    names.push(name.to_owned());
                }
                _ => sql.push(c),
            }
        }
        Self {
            kind,
            dialect,
            text,
            sql: sql.into(),
            names,
        }
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Named template, stable byte for byte for a given entity type and dialect.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Positional SQL sent to the database handle.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Parameter names in positional order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Read the parameters from the entity fields.
    pub fn bind<E: Entity>(&self, entity: &E) -> Result<Query> {
        let params = self
            .names
            .iter()
            .map(|name| {
                entity.value(name).ok_or_else(|| {
                    Error::msg(format!(
                        "could not find name `{}` in entity `{}`",
                        name,
                        any::type_name::<E>()
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Query {
            sql: self.sql.clone(),
            params,
        })
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn take_name<'s>(text: &'s str, start: usize, chars: &mut Peekable<CharIndices<'s>>) -> &'s str {
    let mut end = start;
    while let Some((i, c)) = chars.peek().copied() {
        if !is_name_char(c) {
            break;
        }
        end = i + c.len_utf8();
        chars.next();
    }
    &text[start..end]
}
