use super::sort::{parse_sort_by, SortKey};
use crate::errors::{Result, VistaError};
use std::collections::BTreeMap;

/// Reserved key front-end widgets append to defeat HTTP caches.
pub const CACHE_BUSTER_PARAM: &str = "_";
pub const PAGE_PARAM: &str = "page";
pub const SORT_BY_PARAM: &str = "sort_by";
pub const FIELDS_PARAM: &str = "fields";

/// Query string parameters of one request. A repeated key keeps its last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Remove the cache-buster parameter, returning its value if it was present.
pub fn strip_cache_buster(params: &mut QueryParams) -> Option<String> {
    params.remove(CACHE_BUSTER_PARAM)
}

/// Pagination, ordering and field selection pulled out of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlParams {
    /// 1-based; range is checked by the paginator
    pub page: i64,
    pub sort_by: Vec<SortKey>,
    pub fields: Vec<String>,
}

impl ControlParams {
    /// Remove `page`, `sort_by` and `fields` from `params`, leaving only
    /// filter parameters behind.
    ///
    /// # Errors
    /// `InvalidPage` if `page` is not an integer.
    pub fn extract(params: &mut QueryParams, default_fields: &[String]) -> Result<Self> {
        let page = match params.remove(PAGE_PARAM) {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .map_err(|_| VistaError::InvalidPage { raw })?,
            None => 1,
        };

        let sort_by = params
            .remove(SORT_BY_PARAM)
            .map(|raw| parse_sort_by(&raw))
            .unwrap_or_default();

        let fields = Self::extract_fields(params, default_fields);

        Ok(Self {
            page,
            sort_by,
            fields,
        })
    }

    /// Remove `fields` from `params`; fall back to `default_fields` when absent.
    pub fn extract_fields(params: &mut QueryParams, default_fields: &[String]) -> Vec<String> {
        match params.remove(FIELDS_PARAM) {
            Some(raw) => raw.split(',').map(str::to_string).collect(),
            None => default_fields.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_defaults_when_absent() {
        let mut p = params(&[("status", "active")]);
        let defaults = vec!["id".to_string()];
        let control = ControlParams::extract(&mut p, &defaults).unwrap();

        assert_eq!(control.page, 1);
        assert!(control.sort_by.is_empty());
        assert_eq!(control.fields, defaults);
        assert_eq!(p, params(&[("status", "active")]));
    }

    #[test]
    fn test_control_keys_are_removed() {
        let mut p = params(&[
            ("page", "3"),
            ("sort_by", "-created_at,name"),
            ("fields", "id,memberships.role"),
            ("status", "active"),
        ]);
        let control = ControlParams::extract(&mut p, &[]).unwrap();

        assert_eq!(control.page, 3);
        assert_eq!(
            control.sort_by,
            vec![SortKey::desc("created_at"), SortKey::asc("name")]
        );
        assert_eq!(control.fields, vec!["id", "memberships.role"]);
        assert_eq!(p.len(), 1);
        assert_eq!(p.get("status"), Some("active"));
    }

    #[test]
    fn test_non_integer_page() {
        let mut p = params(&[("page", "two")]);
        let err = ControlParams::extract(&mut p, &[]).unwrap_err();
        assert_eq!(
            err,
            VistaError::InvalidPage {
                raw: "two".to_string()
            }
        );
    }

    #[test]
    fn test_cache_buster_is_stripped() {
        let mut p = params(&[("_", "12345"), ("status", "active")]);
        assert_eq!(strip_cache_buster(&mut p), Some("12345".to_string()));
        assert_eq!(p, params(&[("status", "active")]));
        assert_eq!(strip_cache_buster(&mut p), None);
    }

    #[test]
    fn test_empty_fields_segment_is_kept() {
        let mut p = params(&[("fields", "id,")]);
        assert_eq!(ControlParams::extract_fields(&mut p, &[]), vec!["id", ""]);
    }
}
