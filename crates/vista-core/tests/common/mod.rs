use vista_core::spec::SpecTree;

/// person { id, name, sort_name, memberships }
/// membership { role, start_date, organization, person -> person }
/// organization { name, classification, parent -> organization,
///                children -> organization, memberships -> membership }
#[allow(dead_code)]
pub fn civic_tree() -> SpecTree {
    let mut tree = SpecTree::new();
    let person = tree.root();
    let membership = tree.add_relation();
    let org = tree.add_relation();

    tree.insert_leaves(person, &["id", "name", "sort_name"]).unwrap();
    tree.insert(person, "memberships", membership).unwrap();

    tree.insert_leaves(membership, &["role", "start_date"]).unwrap();
    tree.insert(membership, "organization", org).unwrap();
    tree.insert(membership, "person", person).unwrap();

    tree.insert_leaves(org, &["name", "classification"]).unwrap();
    tree.insert(org, "parent", org).unwrap();
    tree.insert(org, "children", org).unwrap();
    tree.insert(org, "memberships", membership).unwrap();
    tree
}

/// Paths that resolve against [`civic_tree`].
#[allow(dead_code)]
pub const VALID_PATHS: &[&str] = &[
    "id",
    "name",
    "sort_name",
    "memberships",
    "memberships.role",
    "memberships.start_date",
    "memberships.organization",
    "memberships.organization.name",
    "memberships.organization.parent",
    "memberships.organization.parent.name",
    "memberships.organization.children.classification",
    "memberships.organization.memberships.role",
    "memberships.person.name",
];

/// Paths in [`VALID_PATHS`] that end at a relation.
#[allow(dead_code)]
pub const RELATION_PATHS: &[&str] = &[
    "memberships",
    "memberships.organization",
    "memberships.organization.parent",
    "memberships.person",
];
