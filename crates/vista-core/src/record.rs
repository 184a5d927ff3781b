//! Entity rows as handed from a repository to the serializer.

use serde_json::Value;
use std::collections::BTreeMap;

/// One entity row plus whichever relations have been loaded onto it.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    entity: String,
    columns: BTreeMap<String, Value>,
    relations: BTreeMap<String, Related>,
}

/// A loaded relation.
#[derive(Debug, Clone, PartialEq)]
pub enum Related {
    /// Many-to-one; `None` when the foreign key is null or dangling
    One(Option<Box<Record>>),
    /// One-to-many
    Many(Vec<Record>),
}

impl Record {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            columns: BTreeMap::new(),
            relations: BTreeMap::new(),
        }
    }

    pub fn with_column(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.columns.insert(name.into(), value.into());
        self
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn columns(&self) -> &BTreeMap<String, Value> {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Value> {
        self.columns.get(name)
    }

    pub fn set_column(&mut self, name: impl Into<String>, value: Value) {
        self.columns.insert(name.into(), value);
    }

    /// `None` means the relation has not been loaded (not that it is empty).
    pub fn relation(&self, name: &str) -> Option<&Related> {
        self.relations.get(name)
    }

    pub fn set_relation(&mut self, name: impl Into<String>, related: Related) {
        self.relations.insert(name.into(), related);
    }

    /// Mutable access to the records loaded under `name`, for nested prefetch.
    pub fn related_records_mut(&mut self, name: &str) -> Vec<&mut Record> {
        match self.relations.get_mut(name) {
            Some(related) => related.records_mut(),
            None => Vec::new(),
        }
    }
}

impl Related {
    pub fn records(&self) -> Vec<&Record> {
        match self {
            Related::One(one) => one.iter().map(|r| &**r).collect(),
            Related::Many(many) => many.iter().collect(),
        }
    }

    pub fn records_mut(&mut self) -> Vec<&mut Record> {
        match self {
            Related::One(one) => one.iter_mut().map(|r| &mut **r).collect(),
            Related::Many(many) => many.iter_mut().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unloaded_relation_is_none() {
        let record = Record::new("people").with_column("id", 1);
        assert!(record.relation("memberships").is_none());
        assert_eq!(record.column("id"), Some(&json!(1)));
    }

    #[test]
    fn test_related_records_mut_reaches_nested() {
        let mut person = Record::new("people");
        person.set_relation(
            "memberships",
            Related::Many(vec![Record::new("memberships"), Record::new("memberships")]),
        );
        for m in person.related_records_mut("memberships") {
            m.set_column("role", json!("member"));
        }
        let roles: Vec<_> = person
            .relation("memberships")
            .unwrap()
            .records()
            .iter()
            .map(|r| r.column("role").cloned())
            .collect();
        assert_eq!(roles, vec![Some(json!("member")), Some(json!("member"))]);
    }

    #[test]
    fn test_null_one_has_no_records() {
        assert!(Related::One(None).records().is_empty());
    }
}
