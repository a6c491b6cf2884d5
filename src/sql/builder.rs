//! Builds parameterized SELECT, INSERT, UPDATE, DELETE from a table descriptor.

use super::params::PgBindValue;
use crate::models::{MatchMode, NameFilter};

/// One column of an entity table.
#[derive(Clone, Copy, Debug)]
pub struct Column {
    pub name: &'static str,
    /// PostgreSQL type used to cast bound parameters (e.g. `$2::int4`).
    pub pg_type: &'static str,
    /// Cast applied when reading, so a pre-existing column of a narrower or
    /// wider type still decodes into the row field.
    pub read_as: Option<&'static str>,
}

impl Column {
    pub const fn new(name: &'static str, pg_type: &'static str) -> Self {
        Column { name, pg_type, read_as: None }
    }

    pub const fn read_as(self, pg_type: &'static str) -> Self {
        Column { read_as: Some(pg_type), ..self }
    }
}

/// Static description of an entity table. The id column is store-assigned and
/// never written; `columns` are written in order on insert and update.
#[derive(Clone, Copy, Debug)]
pub struct Table {
    pub name: &'static str,
    pub id: Column,
    /// Column the `nome` query filter applies to.
    pub name_column: &'static str,
    pub columns: &'static [Column],
}

/// Quote identifier for PostgreSQL (safe: only from descriptors).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: PgBindValue) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

/// SELECT list: id first, then data columns, each cast to its decoded type when needed.
fn select_column_list(table: &Table) -> String {
    std::iter::once(&table.id)
        .chain(table.columns.iter())
        .map(|c| {
            let q = quoted(c.name);
            match c.read_as {
                Some(t) => format!("{}::{} AS {}", q, t, q),
                None => q,
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// SELECT all rows ordered by id, optionally narrowed by a case-insensitive name filter.
pub fn select_list(table: &Table, filter: Option<&NameFilter>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_clause = match filter {
        Some(f) => {
            let n = q.push_param(PgBindValue::Text(f.like_pattern()));
            let op = match f.mode {
                MatchMode::Contains => "ILIKE",
                MatchMode::Excludes => "NOT ILIKE",
            };
            format!(" WHERE {} {} ${}::text", quoted(table.name_column), op, n)
        }
        None => String::new(),
    };
    q.sql = format!(
        "SELECT {} FROM {}{} ORDER BY {}",
        select_column_list(table),
        quoted(table.name),
        where_clause,
        quoted(table.id.name)
    );
    q
}

/// SELECT by id. Yields zero or one row.
pub fn select_by_id(table: &Table, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(PgBindValue::I64(id));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ${}::{}",
        select_column_list(table),
        quoted(table.name),
        quoted(table.id.name),
        n,
        table.id.pg_type
    );
    q
}

/// INSERT every data column and return the generated id.
/// `values` line up with `table.columns`.
pub fn insert(table: &Table, values: Vec<PgBindValue>) -> QueryBuf {
    debug_assert_eq!(values.len(), table.columns.len());
    let mut q = QueryBuf::new();
    let mut cols = Vec::with_capacity(table.columns.len());
    let mut placeholders = Vec::with_capacity(table.columns.len());
    for (c, v) in table.columns.iter().zip(values) {
        let n = q.push_param(v);
        cols.push(quoted(c.name));
        placeholders.push(format!("${}::{}", n, c.pg_type));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}::int8",
        quoted(table.name),
        cols.join(", "),
        placeholders.join(", "),
        quoted(table.id.name)
    );
    q
}

/// UPDATE every data column by id (full replace).
pub fn update(table: &Table, id: i64, values: Vec<PgBindValue>) -> QueryBuf {
    debug_assert_eq!(values.len(), table.columns.len());
    let mut q = QueryBuf::new();
    let mut sets = Vec::with_capacity(table.columns.len());
    for (c, v) in table.columns.iter().zip(values) {
        let n = q.push_param(v);
        sets.push(format!("{} = ${}::{}", quoted(c.name), n, c.pg_type));
    }
    let id_param = q.push_param(PgBindValue::I64(id));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ${}::{}",
        quoted(table.name),
        sets.join(", "),
        quoted(table.id.name),
        id_param,
        table.id.pg_type
    );
    q
}

/// DELETE by id.
pub fn delete(table: &Table, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(PgBindValue::I64(id));
    q.sql = format!(
        "DELETE FROM {} WHERE {} = ${}::{}",
        quoted(table.name),
        quoted(table.id.name),
        n,
        table.id.pg_type
    );
    q
}
