//! Rendering records through a pruned spec.

use crate::errors::ExError;
use crate::record::{Record, Related};
use crate::repository::Repository;
use crate::spec::PrunedSpec;
use serde_json::{Map, Value};
use std::borrow::Cow;

/// Turns one record plus a pruned spec into a plain JSON structure.
pub trait Serializer {
    /// # Errors
    /// Relation lookups that fail, or a spec naming something the record lacks.
    fn serialize(&self, record: &Record, spec: &PrunedSpec) -> Result<Value, ExError>;
}

/// Serializer backed by a repository for relations that were not prefetched.
///
/// - `Leaf` renders the record's own columns
/// - `Fields` renders exactly the selected names: columns as-is, relations
///   as an object (many-to-one, `null` when unset) or an array (one-to-many)
pub struct RecordSerializer<'a, R: Repository + ?Sized> {
    repo: &'a R,
}

impl<'a, R: Repository + ?Sized> RecordSerializer<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    fn render_related(&self, related: &Related, spec: &PrunedSpec) -> Result<Value, ExError> {
        match related {
            Related::One(None) => Ok(Value::Null),
            Related::One(Some(record)) => self.serialize(record, spec),
            Related::Many(records) => records
                .iter()
                .map(|record| self.serialize(record, spec))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
        }
    }
}

impl<R: Repository + ?Sized> Serializer for RecordSerializer<'_, R> {
    fn serialize(&self, record: &Record, spec: &PrunedSpec) -> Result<Value, ExError> {
        let fields = match spec {
            PrunedSpec::Leaf => {
                return Ok(Value::Object(
                    record
                        .columns()
                        .iter()
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect(),
                ))
            }
            PrunedSpec::Fields(fields) => fields,
        };

        let mut out = Map::new();
        for (name, sub) in fields {
            let value = match record.column(name) {
                Some(value) => value.clone(),
                None => {
                    let related = match record.relation(name) {
                        Some(related) => Cow::Borrowed(related),
                        None => Cow::Owned(self.repo.load_relation(record, name)?),
                    };
                    self.render_related(&related, sub)?
                }
            };
            out.insert(name.clone(), value);
        }
        Ok(Value::Object(out))
    }
}
