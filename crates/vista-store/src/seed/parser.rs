//! Fixture parser with validation
//!
//! Parses YAML or JSON and validates table and column names against a schema

use crate::errors::{decode_error, io_error, seed_validation, Result};
use crate::schema::Schema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// One row: column name → scalar value
pub type Row = BTreeMap<String, Value>;

/// Table name → rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fixture {
    pub tables: BTreeMap<String, Vec<Row>>,
}

impl Fixture {
    pub fn rows(&self, table: &str) -> &[Row] {
        self.tables.get(table).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn total_rows(&self) -> usize {
        self.tables.values().map(Vec::len).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureFormat {
    Yaml,
    Json,
}

impl FixtureFormat {
    /// `.json` is JSON; anything else is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => FixtureFormat::Json,
            _ => FixtureFormat::Yaml,
        }
    }
}

/// Parse a fixture file, picking the format from its extension
///
/// # Errors
/// Unreadable file or malformed content.
pub fn parse_fixture(path: &Path) -> Result<Fixture> {
    let content = fs::read_to_string(path).map_err(|e| io_error("seed_read", e))?;
    parse_fixture_str(&content, FixtureFormat::from_path(path))
}

/// Parse fixture content
///
/// # Errors
/// Malformed content.
pub fn parse_fixture_str(content: &str, format: FixtureFormat) -> Result<Fixture> {
    match format {
        FixtureFormat::Yaml => serde_yaml::from_str(content).map_err(|e| decode_error("YAML", e)),
        FixtureFormat::Json => serde_json::from_str(content).map_err(|e| decode_error("JSON", e)),
    }
}

/// Check every table, column and value against `schema`
///
/// # Errors
/// `InvalidInput` naming the first unknown table or column, or a non-scalar value.
pub fn validate_fixture(fixture: &Fixture, schema: &Schema) -> Result<()> {
    for (table, rows) in &fixture.tables {
        let def = schema
            .entities()
            .find(|e| &e.table == table)
            .ok_or_else(|| seed_validation(format!("Unknown table: {}", table)))?;

        for (idx, row) in rows.iter().enumerate() {
            for (column, value) in row {
                if !def.has_column(column) {
                    return Err(seed_validation(format!(
                        "Unknown column {} in {} row {}",
                        column, table, idx
                    )));
                }
                if value.is_array() || value.is_object() {
                    return Err(seed_validation(format!(
                        "Column {} in {} row {} must be a scalar",
                        column, table, idx
                    )));
                }
            }
        }
    }
    Ok(())
}
