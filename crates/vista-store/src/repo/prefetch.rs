//! Eager loading of `__`-joined relation paths.
//!
//! Each path is resolved one level at a time: the records reached by the
//! parent path are batched into a single `IN (...)` query per relation.

use super::sqlite_repo::{empty_related, join_key, join_target_column, SqliteRepo};
use crate::errors::Result;
use crate::schema::{EntityDef, RelationKind};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use vista_core::record::{Record, Related};
use vista_core::spec::RELATION_SEPARATOR;

impl SqliteRepo<'_> {
    /// Load every relation named in `paths` onto `records`.
    ///
    /// Missing intermediate paths are loaded too, so `a__b` alone still
    /// batches `a` first.
    ///
    /// # Errors
    /// `InvalidRelation` for a path segment not declared on its entity.
    pub(crate) fn prefetch(
        &self,
        def: &EntityDef,
        records: &mut [Record],
        paths: &BTreeSet<String>,
    ) -> Result<()> {
        if records.is_empty() || paths.is_empty() {
            return Ok(());
        }

        // A prefix sorts before its extensions, so parents load first.
        let mut levels: BTreeSet<Vec<&str>> = BTreeSet::new();
        for path in paths {
            let segments: Vec<&str> = path.split(RELATION_SEPARATOR).collect();
            for depth in 1..=segments.len() {
                levels.insert(segments[..depth].to_vec());
            }
        }

        for path in &levels {
            let Some((relation, parents)) = path.split_last() else {
                continue;
            };

            let mut owner = def;
            for segment in parents {
                owner = self.schema().related(&owner.name, segment)?.1;
            }

            let mut targets: Vec<&mut Record> = records.iter_mut().collect();
            for segment in parents {
                targets = targets
                    .into_iter()
                    .flat_map(|record| record.related_records_mut(segment))
                    .collect();
            }

            self.load_batch(owner, relation, targets)?;
        }

        tracing::debug!(
            entity = def.name.as_str(),
            paths = levels.len(),
            "prefetch complete"
        );
        Ok(())
    }

    fn load_batch(&self, owner: &EntityDef, name: &str, targets: Vec<&mut Record>) -> Result<()> {
        let (relation, target) = self.schema().related(&owner.name, name)?;
        if targets.is_empty() {
            return Ok(());
        }

        let mut keys: BTreeMap<String, Value> = BTreeMap::new();
        for record in &targets {
            let key = join_key(owner, relation, record);
            if !key.is_null() {
                keys.insert(key.to_string(), key);
            }
        }

        let column = join_target_column(target, relation);
        let keys: Vec<Value> = keys.into_values().collect();
        let mut grouped: BTreeMap<String, Vec<Record>> = BTreeMap::new();
        for row in self.fetch_where_in(target, column, &keys)? {
            let key = row.column(column).cloned().unwrap_or(Value::Null).to_string();
            grouped.entry(key).or_default().push(row);
        }

        for record in targets {
            let key = join_key(owner, relation, record).to_string();
            let related = match (&relation.kind, grouped.get(&key)) {
                (_, None) => empty_related(relation),
                (RelationKind::ForeignKey { .. }, Some(rows)) => {
                    Related::One(rows.first().cloned().map(Box::new))
                }
                (RelationKind::Reverse { .. }, Some(rows)) => Related::Many(rows.clone()),
            };
            record.set_relation(name, related);
        }
        Ok(())
    }
}
