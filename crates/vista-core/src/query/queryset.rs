use super::sort::SortKey;
use std::collections::{BTreeMap, BTreeSet};

/// Offset/limit window requested from a data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
    pub offset: usize,
    pub limit: usize,
}

/// Declarative description of a read against one entity.
///
/// Built up by the pipelines and executed by a
/// [`Repository`](crate::repository::Repository). Nothing here touches storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySet {
    entity: String,
    filters: BTreeMap<String, String>,
    ordering: Vec<SortKey>,
    prefetch: BTreeSet<String>,
}

impl QuerySet {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            filters: BTreeMap::new(),
            ordering: Vec::new(),
            prefetch: BTreeSet::new(),
        }
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Column → value equality predicates, all of which must hold.
    pub fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    pub fn ordering(&self) -> &[SortKey] {
        &self.ordering
    }

    /// Relation paths to eager-load, `__`-joined for nested relations.
    pub fn prefetch(&self) -> &BTreeSet<String> {
        &self.prefetch
    }

    /// Add equality predicates. A repeated column keeps the latest value.
    pub fn filter<I, K, V>(mut self, predicates: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.filters
            .extend(predicates.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Replace the ordering.
    pub fn order_by(mut self, keys: impl IntoIterator<Item = SortKey>) -> Self {
        self.ordering = keys.into_iter().collect();
        self
    }

    pub fn prefetch_related<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prefetch.extend(paths.into_iter().map(Into::into));
        self
    }
}
