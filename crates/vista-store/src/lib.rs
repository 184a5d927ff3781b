//! Vista Store - SQLite data access, migrations and fixture seeding
//!
//! Provides:
//! - Connection helpers and an embedded, checksummed migrations framework
//! - The entity/relation schema registry (and the built-in civic dataset)
//! - `SqliteRepo`, the `Repository` implementation used by the pipelines
//! - YAML/JSON fixture parsing and transactional import

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;
pub mod schema;
pub mod seed;

// Re-export key types
pub use errors::Result;
pub use repo::SqliteRepo;
pub use schema::{civic_schema, EntityDef, RelationDef, RelationKind, Schema};
