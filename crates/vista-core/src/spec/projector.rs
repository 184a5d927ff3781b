//! Field projection over a spec tree.
//!
//! `project(tree, ["name", "memberships.organization.name"])` yields the
//! relation paths to eager-load (`memberships`, `memberships__organization`)
//! and a pruned spec containing only the requested fields.

use super::pruned::PrunedSpec;
use super::tree::{NodeId, SpecNode, SpecTree};
use crate::errors::{FieldKeyError, Result, VistaError};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Separator joining relation names in a prefetch path.
pub const RELATION_SEPARATOR: &str = "__";

/// Output of [`project`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    /// Relation paths (`a`, `a__b`) that must be loaded before serialization.
    pub prefetch: BTreeSet<String>,
    /// The spec restricted to the requested fields.
    pub spec: PrunedSpec,
}

/// Project `fields` against the tree root.
///
/// # Errors
/// - `FieldKey` with the fully-qualified dotted path of the first unknown field
/// - `KeyLookup` if the tree references a node it does not contain
pub fn project<S: AsRef<str>>(tree: &SpecTree, fields: &[S]) -> Result<Projection> {
    project_from(tree, tree.root(), fields)
}

/// Project `fields` against an arbitrary node of the tree.
///
/// If every requested field resolves to nothing selectable, the spec is an
/// empty field list rather than an unrestricted leaf.
///
/// # Errors
/// Same as [`project`].
pub fn project_from<S: AsRef<str>>(
    tree: &SpecTree,
    node: NodeId,
    fields: &[S],
) -> Result<Projection> {
    let (prefetch, spec) = project_node(tree, node, fields)?;
    Ok(Projection {
        prefetch,
        spec: spec.unwrap_or_else(|| PrunedSpec::Fields(BTreeMap::new())),
    })
}

fn project_node<S: AsRef<str>>(
    tree: &SpecTree,
    node: NodeId,
    fields: &[S],
) -> Result<(BTreeSet<String>, Option<PrunedSpec>)> {
    let mut concrete = Vec::new();
    let mut groups: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for field in fields {
        let field = field.as_ref();
        match field.split_once('.') {
            Some((prefix, rest)) => groups.entry(prefix).or_default().push(rest),
            None => concrete.push(field),
        }
    }

    let mut merged: BTreeMap<String, Option<PrunedSpec>> = BTreeMap::new();
    for name in concrete {
        let child = lookup(tree, node, name)?;
        merged.insert(name.to_string(), wrap(tree, child, &mut Visited::default())?);
    }

    let mut prefetch = BTreeSet::new();
    for (prefix, rest) in groups {
        let child = lookup(tree, node, prefix)?;
        let (nested, spec) = project_node(tree, child, &rest).map_err(|err| match err {
            VistaError::FieldKey(missing) => VistaError::FieldKey(missing.qualify(prefix)),
            other => other,
        })?;

        prefetch.insert(prefix.to_string());
        prefetch.extend(
            nested
                .into_iter()
                .map(|path| format!("{}{}{}", prefix, RELATION_SEPARATOR, path)),
        );
        merged.insert(prefix.to_string(), spec);
    }

    Ok((prefetch, merge(merged)))
}

fn lookup(tree: &SpecTree, node: NodeId, name: &str) -> Result<NodeId> {
    tree.children(node)?
        .and_then(|children| children.get(name))
        .copied()
        .ok_or_else(|| FieldKeyError::new(name).into())
}

/// Drop absent entries. An empty selection stays unrestricted; a selection
/// whose entries all resolved to nothing is itself absent.
fn merge(merged: BTreeMap<String, Option<PrunedSpec>>) -> Option<PrunedSpec> {
    if merged.is_empty() {
        return Some(PrunedSpec::Leaf);
    }
    let fields: BTreeMap<String, PrunedSpec> = merged
        .into_iter()
        .filter_map(|(name, spec)| spec.map(|spec| (name, spec)))
        .collect();
    if fields.is_empty() {
        None
    } else {
        Some(PrunedSpec::Fields(fields))
    }
}

/// Relation nodes already expanded during one normalization.
#[derive(Default)]
struct Visited(HashSet<NodeId>);

/// Normalize a raw spec node into pruned form.
///
/// Leaves and empty relations pass through as `Leaf`. A relation expands to
/// its normalized children the first time it is reached; reaching it again
/// anywhere in the same normalization contributes nothing. Each relation is
/// expanded at most once, so reflexive definitions terminate in linear time.
fn wrap(tree: &SpecTree, node: NodeId, visited: &mut Visited) -> Result<Option<PrunedSpec>> {
    let children = match tree.node(node)? {
        SpecNode::Leaf => return Ok(Some(PrunedSpec::Leaf)),
        SpecNode::Relation(children) if children.is_empty() => {
            return Ok(Some(PrunedSpec::Leaf))
        }
        SpecNode::Relation(children) => children,
    };

    if !visited.0.insert(node) {
        return Ok(None);
    }

    let mut fields = BTreeMap::new();
    for (name, child) in children {
        if let Some(spec) = wrap(tree, *child, visited)? {
            fields.insert(name.clone(), spec);
        }
    }

    Ok(if fields.is_empty() {
        None
    } else {
        Some(PrunedSpec::Fields(fields))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// person { id, name, memberships { role, organization { name, parent -> organization } } }
    fn civic_tree() -> SpecTree {
        let mut tree = SpecTree::new();
        let person = tree.root();
        tree.insert_leaves(person, &["id", "name"]).unwrap();

        let membership = tree.add_relation();
        tree.insert_leaf(membership, "role").unwrap();
        tree.insert(person, "memberships", membership).unwrap();

        let org = tree.add_relation();
        tree.insert_leaf(org, "name").unwrap();
        tree.insert(org, "parent", org).unwrap();
        tree.insert(membership, "organization", org).unwrap();
        tree
    }

    fn leaf_fields(names: &[&str]) -> PrunedSpec {
        PrunedSpec::Fields(
            names
                .iter()
                .map(|n| (n.to_string(), PrunedSpec::Leaf))
                .collect(),
        )
    }

    #[test]
    fn test_concrete_fields_only() {
        let tree = civic_tree();
        let p = project(&tree, &["id", "name"]).unwrap();
        assert!(p.prefetch.is_empty());
        assert_eq!(p.spec, leaf_fields(&["id", "name"]));
    }

    #[test]
    fn test_zero_fields_is_unrestricted() {
        let tree = civic_tree();
        let p = project::<&str>(&tree, &[]).unwrap();
        assert!(p.prefetch.is_empty());
        assert_eq!(p.spec, PrunedSpec::Leaf);
    }

    #[test]
    fn test_compound_field_prefetches_each_level() {
        let tree = civic_tree();
        let p = project(&tree, &["memberships.organization.name"]).unwrap();

        let expected: BTreeSet<String> = ["memberships", "memberships__organization"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(p.prefetch, expected);

        let org = leaf_fields(&["name"]);
        let mut membership = BTreeMap::new();
        membership.insert("organization".to_string(), org);
        let mut root = BTreeMap::new();
        root.insert(
            "memberships".to_string(),
            PrunedSpec::Fields(membership),
        );
        assert_eq!(p.spec, PrunedSpec::Fields(root));
    }

    #[test]
    fn test_unknown_top_level_field() {
        let tree = civic_tree();
        let err = project(&tree, &["bogus"]).unwrap_err();
        assert_eq!(err, VistaError::FieldKey(FieldKeyError::new("bogus")));
    }

    #[test]
    fn test_unknown_nested_field_is_fully_qualified() {
        let tree = civic_tree();
        let err = project(&tree, &["memberships.bogus"]).unwrap_err();
        assert_eq!(
            err,
            VistaError::FieldKey(FieldKeyError::new("memberships.bogus"))
        );

        let err = project(&tree, &["memberships.organization.nope"]).unwrap_err();
        assert_eq!(
            err,
            VistaError::FieldKey(FieldKeyError::new("memberships.organization.nope"))
        );
    }

    #[test]
    fn test_unknown_prefix() {
        let tree = civic_tree();
        let err = project(&tree, &["bogus.name"]).unwrap_err();
        assert_eq!(err, VistaError::FieldKey(FieldKeyError::new("bogus")));
    }

    #[test]
    fn test_descending_into_leaf_is_field_key_error() {
        let tree = civic_tree();
        let err = project(&tree, &["name.first"]).unwrap_err();
        assert_eq!(err, VistaError::FieldKey(FieldKeyError::new("name.first")));
    }

    #[test]
    fn test_self_reference_terminates() {
        let tree = civic_tree();
        let p = project(&tree, &["memberships.organization"]).unwrap();

        // parent points back at organization and contributes nothing
        let org = leaf_fields(&["name"]);
        assert_eq!(
            p.spec.get("memberships").and_then(|m| m.get("organization")),
            Some(&org)
        );
    }

    #[test]
    fn test_relation_with_only_cyclic_content_is_dropped() {
        let mut tree = SpecTree::new();
        let node = tree.add_relation();
        tree.insert(node, "parent", node).unwrap();
        tree.insert_leaf(tree.root(), "id").unwrap();
        let root = tree.root();
        tree.insert(root, "loop", node).unwrap();

        let p = project(&tree, &["id", "loop"]).unwrap();
        assert_eq!(p.spec, leaf_fields(&["id"]));

        let p = project(&tree, &["loop"]).unwrap();
        assert_eq!(p.spec, PrunedSpec::Fields(BTreeMap::new()));
    }

    #[test]
    fn test_shared_definition_expands_at_each_position() {
        let mut tree = SpecTree::new();
        let org = tree.add_relation();
        tree.insert_leaf(org, "name").unwrap();
        let root = tree.root();
        tree.insert(root, "employer", org).unwrap();
        tree.insert(root, "school", org).unwrap();

        let p = project(&tree, &["employer", "school"]).unwrap();
        assert_eq!(p.spec.get("employer"), Some(&leaf_fields(&["name"])));
        assert_eq!(p.spec.get("school"), Some(&leaf_fields(&["name"])));
    }

    #[test]
    fn test_shared_node_expands_once_within_a_relation() {
        let mut tree = SpecTree::new();
        let org = tree.add_relation();
        tree.insert_leaf(org, "name").unwrap();
        let holder = tree.add_relation();
        tree.insert(holder, "employer", org).unwrap();
        tree.insert(holder, "school", org).unwrap();
        let root = tree.root();
        tree.insert(root, "holder", holder).unwrap();

        let p = project(&tree, &["holder"]).unwrap();
        let holder = p.spec.get("holder").unwrap();
        assert_eq!(holder.field_names(), vec!["employer"]);
        assert_eq!(holder.get("employer"), Some(&leaf_fields(&["name"])));
    }

    fn relation_count(spec: &PrunedSpec) -> usize {
        match spec {
            PrunedSpec::Leaf => 0,
            PrunedSpec::Fields(fields) => 1 + fields.values().map(relation_count).sum::<usize>(),
        }
    }

    #[test]
    fn test_densely_connected_tree_expands_each_node_once() {
        const NODES: usize = 12;
        let mut tree = SpecTree::new();
        let nodes: Vec<NodeId> = (0..NODES).map(|_| tree.add_relation()).collect();
        for &from in &nodes {
            tree.insert_leaf(from, "id").unwrap();
            for (j, &to) in nodes.iter().enumerate() {
                tree.insert(from, format!("n{:02}", j), to).unwrap();
            }
        }
        let root = tree.root();
        tree.insert(root, "x", nodes[0]).unwrap();

        let start = std::time::Instant::now();
        let p = project(&tree, &["x"]).unwrap();
        assert!(start.elapsed() < std::time::Duration::from_secs(1));

        // the root selection plus every relation node exactly once
        assert_eq!(relation_count(&p.spec), NODES + 1);
    }

    #[test]
    fn test_duplicate_and_reordered_paths_agree() {
        let tree = civic_tree();
        let a = project(&tree, &["memberships.role", "memberships.organization"]).unwrap();
        let b = project(&tree, &["memberships.organization", "memberships.role"]).unwrap();
        let c = project(
            &tree,
            &["memberships.role", "memberships.role", "memberships.organization"],
        )
        .unwrap();

        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(a.prefetch.len(), 2);
        assert!(a.prefetch.contains("memberships"));
    }

    #[test]
    fn test_compound_overrides_concrete_for_same_key() {
        let tree = civic_tree();
        let p = project(&tree, &["memberships", "memberships.role"]).unwrap();
        assert_eq!(p.spec.get("memberships"), Some(&leaf_fields(&["role"])));
    }

    #[test]
    fn test_concrete_relation_expands_fully_without_prefetch() {
        let tree = civic_tree();
        let p = project(&tree, &["memberships"]).unwrap();
        assert!(p.prefetch.is_empty());

        let m = p.spec.get("memberships").unwrap();
        assert_eq!(m.field_names(), vec!["organization", "role"]);
        assert_eq!(m.get("organization"), Some(&leaf_fields(&["name"])));
    }

    #[test]
    fn test_empty_segment_is_reported() {
        let tree = civic_tree();
        let err = project(&tree, &["memberships."]).unwrap_err();
        assert_eq!(err, VistaError::FieldKey(FieldKeyError::new("memberships.")));
    }
}
