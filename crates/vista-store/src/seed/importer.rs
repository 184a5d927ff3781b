//! Fixture importer orchestration
//!
//! Inserts validated fixture rows in schema declaration order inside one
//! transaction. Foreign keys are checked at commit, so rows may reference
//! rows that appear later (including in the same table).

use crate::errors::{from_rusqlite, Result};
use crate::repo::to_sql_value;
use crate::schema::Schema;
use crate::seed::parser::{validate_fixture, Fixture};
use rusqlite::Connection;
use std::collections::BTreeMap;
use vista_core::{log_op_end, log_op_error, log_op_start};

/// Rows inserted per table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub counts: BTreeMap<String, usize>,
}

impl ImportSummary {
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

/// Import a fixture into the database
///
/// Either every row is inserted or none is.
///
/// # Errors
/// Validation failures, constraint violations (duplicate keys, dangling
/// foreign keys) and storage failures.
pub fn import_fixture(conn: &mut Connection, schema: &Schema, fixture: &Fixture) -> Result<ImportSummary> {
    let start = std::time::Instant::now();
    log_op_start!("seed_import", rows = fixture.total_rows());

    let result = import_inner(conn, schema, fixture);
    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(summary) => {
            log_op_end!("seed_import", duration_ms = duration_ms, rows = summary.total());
        }
        Err(err) => {
            log_op_error!("seed_import", err.clone(), duration_ms = duration_ms);
        }
    }
    result
}

fn import_inner(conn: &mut Connection, schema: &Schema, fixture: &Fixture) -> Result<ImportSummary> {
    validate_fixture(fixture, schema)?;

    let tx = conn.transaction().map_err(from_rusqlite)?;
    tx.execute("PRAGMA defer_foreign_keys = ON", [])
        .map_err(from_rusqlite)?;

    let mut summary = ImportSummary::default();
    for def in schema.entities() {
        let rows = fixture.rows(&def.table);
        if rows.is_empty() {
            continue;
        }

        for row in rows {
            let columns: Vec<String> = row.keys().map(|c| format!("\"{}\"", c)).collect();
            let placeholders = vec!["?"; columns.len()].join(", ");
            let sql = format!(
                "INSERT INTO \"{}\" ({}) VALUES ({})",
                def.table,
                columns.join(", "),
                placeholders
            );
            let params: Vec<_> = row.values().map(to_sql_value).collect();
            tx.execute(&sql, rusqlite::params_from_iter(params.iter()))
                .map_err(from_rusqlite)?;
        }

        tracing::debug!(table = def.table.as_str(), rows = rows.len(), "table seeded");
        summary.counts.insert(def.table.clone(), rows.len());
    }

    tx.commit().map_err(from_rusqlite)?;
    Ok(summary)
}
