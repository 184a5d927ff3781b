//! Repository layer executing query sets against SQLite
//!
//! Provides the `Repository` implementation the pipelines run against,
//! including batched eager loading of relation paths

mod prefetch;
mod sqlite_repo;

pub use sqlite_repo::SqliteRepo;
pub(crate) use sqlite_repo::to_sql_value;
