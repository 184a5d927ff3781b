//! Entity and relation registry
//!
//! Every SQL identifier the repository emits comes from here; client-supplied
//! names are only ever checked against it, never interpolated.

use crate::errors::Result;
use vista_core::errors::{ExError, VistaError};

/// How a relation is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationKind {
    /// Many-to-one: `self.column` holds the target's primary key
    ForeignKey { column: String },
    /// One-to-many: `target.column` holds this entity's primary key
    Reverse { column: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationDef {
    pub name: String,
    /// Target entity name
    pub target: String,
    pub kind: RelationKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDef {
    pub name: String,
    /// Singular, human-facing name used in not-found messages
    pub label: String,
    pub table: String,
    pub primary_key: String,
    pub columns: Vec<String>,
    pub relations: Vec<RelationDef>,
}

impl EntityDef {
    /// Entity stored in a table of the same name.
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            table: name.clone(),
            name,
            label: label.into(),
            primary_key: "id".to_string(),
            columns: vec!["id".to_string()],
            relations: Vec::new(),
        }
    }

    pub fn with_columns(mut self, columns: &[&str]) -> Self {
        self.columns.extend(columns.iter().map(|c| c.to_string()));
        self
    }

    pub fn with_foreign_key(mut self, name: &str, target: &str, column: &str) -> Self {
        self.relations.push(RelationDef {
            name: name.to_string(),
            target: target.to_string(),
            kind: RelationKind::ForeignKey {
                column: column.to_string(),
            },
        });
        self
    }

    pub fn with_reverse(mut self, name: &str, target: &str, column: &str) -> Self {
        self.relations.push(RelationDef {
            name: name.to_string(),
            target: target.to_string(),
            kind: RelationKind::Reverse {
                column: column.to_string(),
            },
        });
        self
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// # Errors
    /// `InvalidFilter` if `column` is not a column of this entity.
    pub fn check_filter(&self, column: &str) -> Result<&str> {
        self.column(column).ok_or_else(|| {
            ExError::from(VistaError::UnknownFilter {
                entity: self.name.clone(),
                column: column.to_string(),
            })
        })
    }

    /// # Errors
    /// `InvalidSort` if `column` is not a column of this entity.
    pub fn check_sort(&self, column: &str) -> Result<&str> {
        self.column(column).ok_or_else(|| {
            ExError::from(VistaError::UnknownSort {
                entity: self.name.clone(),
                column: column.to_string(),
            })
        })
    }

    /// # Errors
    /// `InvalidRelation` if no relation is declared under `name`.
    pub fn relation(&self, name: &str) -> Result<&RelationDef> {
        self.relations
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| {
                VistaError::UnknownRelation {
                    entity: self.name.clone(),
                    relation: name.to_string(),
                }
                .into()
            })
    }

    /// Registered spelling of `column`, if it exists.
    fn column(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.as_str() == column)
            .map(String::as_str)
    }
}

/// Ordered set of entity definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    entities: Vec<EntityDef>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entity(mut self, entity: EntityDef) -> Self {
        self.entities.push(entity);
        self
    }

    /// Entities in declaration order.
    pub fn entities(&self) -> impl Iterator<Item = &EntityDef> {
        self.entities.iter()
    }

    /// # Errors
    /// `Internal` if the entity is not registered.
    pub fn entity(&self, name: &str) -> Result<&EntityDef> {
        self.entities
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| {
                VistaError::UnknownEntity {
                    entity: name.to_string(),
                }
                .into()
            })
    }

    /// Target entity of `relation` on `entity`.
    ///
    /// # Errors
    /// Unknown entity or relation.
    pub fn related(&self, entity: &str, relation: &str) -> Result<(&RelationDef, &EntityDef)> {
        let relation = self.entity(entity)?.relation(relation)?;
        Ok((relation, self.entity(&relation.target)?))
    }

    /// Every column and relation name of `entity`, minus `without`.
    ///
    /// # Errors
    /// `Internal` if the entity is not registered.
    pub fn field_list(&self, entity: &str, without: &[&str]) -> Result<Vec<String>> {
        let def = self.entity(entity)?;
        Ok(def
            .columns
            .iter()
            .chain(def.relations.iter().map(|r| &r.name))
            .filter(|name| !without.contains(&name.as_str()))
            .cloned()
            .collect())
    }
}

/// Organizations, people and memberships.
pub fn civic_schema() -> Schema {
    Schema::new()
        .with_entity(
            EntityDef::new("organizations", "organization")
                .with_columns(&["name", "classification", "founding_date", "parent_id"])
                .with_foreign_key("parent", "organizations", "parent_id")
                .with_reverse("children", "organizations", "parent_id")
                .with_reverse("memberships", "memberships", "organization_id"),
        )
        .with_entity(
            EntityDef::new("people", "person")
                .with_columns(&["name", "sort_name", "gender", "created_at"])
                .with_reverse("memberships", "memberships", "person_id"),
        )
        .with_entity(
            EntityDef::new("memberships", "membership")
                .with_columns(&["person_id", "organization_id", "role", "start_date"])
                .with_foreign_key("person", "people", "person_id")
                .with_foreign_key("organization", "organizations", "organization_id"),
        )
}
