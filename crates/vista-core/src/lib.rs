//! Vista Core - field projection and read-only query building blocks
//!
//! This crate provides the pure, I/O-free parts of vista:
//! - Spec trees describing which fields and relations an entity exposes
//! - The field projector (requested dotted paths → prefetch set + pruned spec)
//! - Control-parameter parsing, sort keys, pagination arithmetic and query sets
//! - The `Repository` and `Serializer` seams the pipelines run against
//! - Error and logging facilities shared by every vista crate

pub mod errors;
pub mod logging_facility;
pub mod query;
pub mod record;
pub mod repository;
pub mod serialize;
pub mod spec;

// Lets the logging macros resolve schema constants from any caller.
#[doc(hidden)]
pub use vista_core_types;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, FieldKeyError, Result, VistaError};
pub use query::{ControlParams, Paginator, QueryParams, QuerySet, SortKey};
pub use record::{Record, Related};
pub use repository::Repository;
pub use serialize::{RecordSerializer, Serializer};
pub use spec::{project, Projection, PrunedSpec, SpecTree};
