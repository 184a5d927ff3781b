//! Fixture seeding
//!
//! Provides:
//! - Fixture format (table name → list of rows) in YAML or JSON
//! - Parser with schema validation
//! - Transactional importer

pub mod importer;
pub mod parser;

pub use importer::{import_fixture, ImportSummary};
pub use parser::{parse_fixture, parse_fixture_str, validate_fixture, Fixture, FixtureFormat, Row};
