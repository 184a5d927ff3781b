//! SQLite repository implementation
//!
//! Executes query sets against the tables described by a [`Schema`].

use crate::errors::{from_rusqlite, Result};
use crate::schema::{EntityDef, RelationDef, RelationKind, Schema};
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{Connection, OptionalExtension, Row};
use serde_json::Value;
use std::cell::Cell;
use vista_core::errors::VistaError;
use vista_core::query::{QuerySet, Slice};
use vista_core::record::{Record, Related};
use vista_core::repository::Repository;

/// Read-only repository over one connection.
///
/// Counts the statements it executes so callers can verify that eager
/// loading actually avoids per-row lookups.
pub struct SqliteRepo<'a> {
    conn: &'a Connection,
    schema: &'a Schema,
    queries: Cell<usize>,
}

impl<'a> SqliteRepo<'a> {
    pub fn new(conn: &'a Connection, schema: &'a Schema) -> Self {
        Self {
            conn,
            schema,
            queries: Cell::new(0),
        }
    }

    pub fn schema(&self) -> &Schema {
        self.schema
    }

    /// Statements executed so far.
    pub fn query_count(&self) -> usize {
        self.queries.get()
    }

    /// Rows of `def` whose `column` is one of `keys`, ordered by primary key.
    pub(crate) fn fetch_where_in(
        &self,
        def: &EntityDef,
        column: &str,
        keys: &[Value],
    ) -> Result<Vec<Record>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = vec!["?"; keys.len()].join(", ");
        let sql = format!(
            "{} WHERE {} IN ({}) ORDER BY {} ASC",
            select_clause(def),
            quote(column),
            placeholders,
            quote(&def.primary_key)
        );
        let params: Vec<SqlValue> = keys.iter().map(to_sql_value).collect();
        self.query_records(def, &sql, &params)
    }

    fn query_records(&self, def: &EntityDef, sql: &str, params: &[SqlValue]) -> Result<Vec<Record>> {
        tracing::trace!(sql, "query");
        self.queries.set(self.queries.get() + 1);

        let mut stmt = self.conn.prepare(sql).map_err(from_rusqlite)?;
        let records = stmt
            .query_map(rusqlite::params_from_iter(params.iter()), |row| {
                row_to_record(def, row)
            })
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(records)
    }

    /// WHERE clause and bound values for the query set's filters.
    fn where_clause(def: &EntityDef, qs: &QuerySet) -> Result<(String, Vec<SqlValue>)> {
        let mut predicates = Vec::new();
        let mut params = Vec::new();
        for (column, value) in qs.filters() {
            let column = def.check_filter(column)?;
            predicates.push(format!("{} = ?", quote(column)));
            params.push(SqlValue::Text(value.clone()));
        }
        let clause = if predicates.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", predicates.join(" AND "))
        };
        Ok((clause, params))
    }

    /// Requested ordering with the primary key as final tie-breaker.
    fn order_clause(def: &EntityDef, qs: &QuerySet) -> Result<String> {
        let mut terms = Vec::new();
        let mut has_pk = false;
        for key in qs.ordering() {
            let column = def.check_sort(&key.field)?;
            has_pk |= column == def.primary_key;
            terms.push(format!(
                "{} {}",
                quote(column),
                if key.descending { "DESC" } else { "ASC" }
            ));
        }
        if !has_pk {
            terms.push(format!("{} ASC", quote(&def.primary_key)));
        }
        Ok(format!(" ORDER BY {}", terms.join(", ")))
    }
}

impl Repository for SqliteRepo<'_> {
    fn count(&self, qs: &QuerySet) -> Result<usize> {
        let def = self.schema.entity(qs.entity())?;
        let (clause, params) = Self::where_clause(def, qs)?;
        let sql = format!("SELECT COUNT(*) FROM {}{}", quote(&def.table), clause);

        tracing::trace!(sql = sql.as_str(), "query");
        self.queries.set(self.queries.get() + 1);
        let count: i64 = self
            .conn
            .query_row(&sql, rusqlite::params_from_iter(params.iter()), |row| {
                row.get(0)
            })
            .map_err(from_rusqlite)?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    fn fetch(&self, qs: &QuerySet, slice: Option<Slice>) -> Result<Vec<Record>> {
        let def = self.schema.entity(qs.entity())?;
        let (clause, mut params) = Self::where_clause(def, qs)?;
        let mut sql = format!(
            "{}{}{}",
            select_clause(def),
            clause,
            Self::order_clause(def, qs)?
        );
        if let Some(slice) = slice {
            sql.push_str(" LIMIT ? OFFSET ?");
            params.push(SqlValue::Integer(to_i64(slice.limit)));
            params.push(SqlValue::Integer(to_i64(slice.offset)));
        }

        let mut records = self.query_records(def, &sql, &params)?;
        self.prefetch(def, &mut records, qs.prefetch())?;
        Ok(records)
    }

    fn get(&self, qs: &QuerySet, pk: &str) -> Result<Record> {
        let def = self.schema.entity(qs.entity())?;
        let (clause, mut params) = Self::where_clause(def, qs)?;
        let connector = if clause.is_empty() { " WHERE" } else { " AND" };
        let sql = format!(
            "{}{}{} {} = ? LIMIT 1",
            select_clause(def),
            clause,
            connector,
            quote(&def.primary_key)
        );
        params.push(SqlValue::Text(pk.to_string()));

        tracing::trace!(sql = sql.as_str(), "query");
        self.queries.set(self.queries.get() + 1);
        let record = self
            .conn
            .query_row(&sql, rusqlite::params_from_iter(params.iter()), |row| {
                row_to_record(def, row)
            })
            .optional()
            .map_err(from_rusqlite)?
            .ok_or_else(|| VistaError::NotFound {
                entity: def.label.clone(),
                pk: pk.to_string(),
            })?;

        let mut records = vec![record];
        self.prefetch(def, &mut records, qs.prefetch())?;
        Ok(records.remove(0))
    }

    fn load_relation(&self, record: &Record, relation: &str) -> Result<Related> {
        let (relation, target) = self.schema.related(record.entity(), relation)?;
        tracing::debug!(
            entity = record.entity(),
            relation = relation.name.as_str(),
            "relation loaded lazily"
        );
        let def = self.schema.entity(record.entity())?;
        let key = join_key(def, relation, record);
        if key.is_null() {
            return Ok(empty_related(relation));
        }

        let records = self.fetch_where_in(target, join_target_column(target, relation), &[key])?;
        Ok(match relation.kind {
            RelationKind::ForeignKey { .. } => {
                Related::One(records.into_iter().next().map(Box::new))
            }
            RelationKind::Reverse { .. } => Related::Many(records),
        })
    }
}

/// Value on `record` that identifies related rows.
pub(crate) fn join_key(def: &EntityDef, relation: &RelationDef, record: &Record) -> Value {
    let column = match &relation.kind {
        RelationKind::ForeignKey { column } => column.as_str(),
        RelationKind::Reverse { .. } => def.primary_key.as_str(),
    };
    record.column(column).cloned().unwrap_or(Value::Null)
}

/// Column on the target table that `join_key` values are matched against.
pub(crate) fn join_target_column<'d>(target: &'d EntityDef, relation: &'d RelationDef) -> &'d str {
    match &relation.kind {
        RelationKind::ForeignKey { .. } => target.primary_key.as_str(),
        RelationKind::Reverse { column } => column.as_str(),
    }
}

pub(crate) fn empty_related(relation: &RelationDef) -> Related {
    match relation.kind {
        RelationKind::ForeignKey { .. } => Related::One(None),
        RelationKind::Reverse { .. } => Related::Many(Vec::new()),
    }
}

fn select_clause(def: &EntityDef) -> String {
    let columns: Vec<String> = def.columns.iter().map(|c| quote(c)).collect();
    format!("SELECT {} FROM {}", columns.join(", "), quote(&def.table))
}

fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

fn to_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn row_to_record(def: &EntityDef, row: &Row) -> rusqlite::Result<Record> {
    let mut record = Record::new(def.name.clone());
    for (idx, column) in def.columns.iter().enumerate() {
        record.set_column(column.clone(), to_json(row.get_ref(idx)?));
    }
    Ok(record)
}

fn to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::String(hex::encode(bytes)),
    }
}

pub(crate) fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => SqlValue::Real(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_escapes_embedded_quotes() {
        assert_eq!(quote("name"), "\"name\"");
        assert_eq!(quote("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn test_sql_value_conversion() {
        assert_eq!(to_sql_value(&Value::from(7)), SqlValue::Integer(7));
        assert_eq!(to_sql_value(&Value::from("x")), SqlValue::Text("x".into()));
        assert_eq!(to_sql_value(&Value::Null), SqlValue::Null);
    }

    #[test]
    fn test_json_conversion() {
        assert_eq!(to_json(ValueRef::Integer(3)), Value::from(3));
        assert_eq!(to_json(ValueRef::Text(b"abc")), Value::from("abc"));
        assert_eq!(to_json(ValueRef::Blob(&[0xab, 0x01])), Value::from("ab01"));
    }
}
