//! Built-in endpoints over the civic dataset
//!
//! People, organizations and memberships, with the organization spec
//! referencing itself through `parent` and `children`.

use crate::endpoints::{DetailEndpoint, ListEndpoint};
use vista_core::errors::Result;
use vista_core::spec::{NodeId, SpecTree};

/// Spec tree shared by every civic endpoint, plus the node of each entity.
#[derive(Debug, Clone)]
pub struct CivicSpecs {
    pub tree: SpecTree,
    pub person: NodeId,
    pub organization: NodeId,
    pub membership: NodeId,
}

impl CivicSpecs {
    /// # Errors
    /// Only if the tree construction itself is inconsistent.
    pub fn build() -> Result<Self> {
        let mut tree = SpecTree::new();
        let person = tree.root();
        let organization = tree.add_relation();
        let membership = tree.add_relation();

        tree.insert_leaves(
            organization,
            &["id", "name", "classification", "founding_date"],
        )?;
        tree.insert(organization, "parent", organization)?;
        tree.insert(organization, "children", organization)?;
        tree.insert(organization, "memberships", membership)?;

        tree.insert_leaves(person, &["id", "name", "sort_name", "gender", "created_at"])?;
        tree.insert(person, "memberships", membership)?;

        tree.insert_leaves(membership, &["id", "role", "start_date"])?;
        tree.insert(membership, "person", person)?;
        tree.insert(membership, "organization", organization)?;

        Ok(Self {
            tree,
            person,
            organization,
            membership,
        })
    }

    /// The shared tree re-rooted at `node`.
    ///
    /// # Errors
    /// `node` does not belong to the tree.
    pub fn rooted_at(&self, node: NodeId) -> Result<SpecTree> {
        let mut tree = self.tree.clone();
        tree.set_root(node)?;
        Ok(tree)
    }
}

fn fields(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

macro_rules! civic_endpoint {
    ($(#[$doc:meta])* $ty:ident, $node:ident, [$($field:literal),*]) => {
        $(#[$doc])*
        pub struct $ty {
            spec: SpecTree,
            default_fields: Vec<String>,
        }

        impl $ty {
            /// # Errors
            /// Only if the civic spec tree is inconsistent.
            pub fn new(specs: &CivicSpecs) -> Result<Self> {
                Ok(Self {
                    spec: specs.rooted_at(specs.$node)?,
                    default_fields: fields(&[$($field),*]),
                })
            }
        }
    };
}

civic_endpoint!(
    /// `GET /people/`
    PeopleList, person, ["id", "name", "sort_name"]
);
civic_endpoint!(
    /// `GET /people/:id/`
    PersonDetail, person, []
);
civic_endpoint!(
    /// `GET /organizations/`
    OrganizationList, organization, ["id", "name", "classification"]
);
civic_endpoint!(
    /// `GET /organizations/:id/`
    OrganizationDetail, organization, []
);
civic_endpoint!(
    /// `GET /memberships/`
    MembershipList, membership, ["id", "role", "person.name", "organization.name"]
);
civic_endpoint!(
    /// `GET /memberships/:id/`
    MembershipDetail, membership, []
);

macro_rules! impl_endpoint {
    ($trait:ident for $ty:ident, $name:literal, $entity:literal) => {
        impl $trait for $ty {
            fn name(&self) -> &str {
                $name
            }

            fn entity(&self) -> &str {
                $entity
            }

            fn spec(&self) -> &SpecTree {
                &self.spec
            }

            fn default_fields(&self) -> &[String] {
                &self.default_fields
            }
        }
    };
}

impl_endpoint!(ListEndpoint for PeopleList, "people", "people");
impl_endpoint!(DetailEndpoint for PersonDetail, "people", "people");
impl_endpoint!(ListEndpoint for OrganizationList, "organizations", "organizations");
impl_endpoint!(DetailEndpoint for OrganizationDetail, "organizations", "organizations");
impl_endpoint!(DetailEndpoint for MembershipDetail, "memberships", "memberships");

/// Memberships additionally accept `person` and `organization` as filter
/// aliases for the underlying id columns.
impl ListEndpoint for MembershipList {
    fn name(&self) -> &str {
        "memberships"
    }

    fn entity(&self) -> &str {
        "memberships"
    }

    fn spec(&self) -> &SpecTree {
        &self.spec
    }

    fn default_fields(&self) -> &[String] {
        &self.default_fields
    }

    fn adjust_filters(
        &self,
        mut filters: vista_core::query::QueryParams,
    ) -> std::result::Result<vista_core::query::QueryParams, vista_core::errors::ExError> {
        for (alias, column) in [("person", "person_id"), ("organization", "organization_id")] {
            if let Some(value) = filters.remove(alias) {
                filters.insert(column, value);
            }
        }
        Ok(filters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vista_core::query::QueryParams;
    use vista_core::spec::project;

    #[test]
    fn test_organization_spec_is_self_referential() {
        let specs = CivicSpecs::build().unwrap();
        let children = specs.tree.children(specs.organization).unwrap().unwrap();
        assert_eq!(children.get("parent"), Some(&specs.organization));
        assert_eq!(children.get("children"), Some(&specs.organization));
    }

    #[test]
    fn test_default_fields_resolve() {
        let specs = CivicSpecs::build().unwrap();
        let list = MembershipList::new(&specs).unwrap();
        let projection = project(list.spec(), list.default_fields()).unwrap();
        assert_eq!(projection.prefetch.len(), 2);
        assert!(projection.prefetch.contains("person"));
        assert!(projection.prefetch.contains("organization"));
    }

    #[test]
    fn test_membership_filter_aliases() {
        let specs = CivicSpecs::build().unwrap();
        let list = MembershipList::new(&specs).unwrap();
        let params: QueryParams = [("person", "3"), ("role", "member")].into_iter().collect();

        let adjusted = list.adjust_filters(params).unwrap();
        assert_eq!(adjusted.get("person_id"), Some("3"));
        assert_eq!(adjusted.get("role"), Some("member"));
        assert!(!adjusted.contains("person"));
    }
}
