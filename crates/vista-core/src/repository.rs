//! The data-access seam the pipelines consume.

use crate::errors::ExError;
use crate::query::{QuerySet, Slice};
use crate::record::{Record, Related};

/// Executes [`QuerySet`]s against some storage.
///
/// Implementations apply `filters`, `ordering` and `prefetch` from the query
/// set; prefetched relations must be present on the returned records so the
/// serializer never has to call [`Repository::load_relation`] for them.
pub trait Repository {
    /// Number of rows matching the query set's filters.
    ///
    /// # Errors
    /// Unknown filter columns, storage failures.
    fn count(&self, qs: &QuerySet) -> Result<usize, ExError>;

    /// Matching rows in order, optionally restricted to a window.
    ///
    /// # Errors
    /// Unknown filter/sort columns or prefetch relations, storage failures.
    fn fetch(&self, qs: &QuerySet, slice: Option<Slice>) -> Result<Vec<Record>, ExError>;

    /// Single row by primary key.
    ///
    /// # Errors
    /// `NotFound` when no row matches, plus the same failures as `fetch`.
    fn get(&self, qs: &QuerySet, pk: &str) -> Result<Record, ExError>;

    /// Load one relation of one record on demand.
    ///
    /// # Errors
    /// `InvalidRelation` when `relation` is not declared on the record's entity.
    fn load_relation(&self, record: &Record, relation: &str) -> Result<Related, ExError>;
}
