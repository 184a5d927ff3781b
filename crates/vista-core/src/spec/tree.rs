use crate::errors::{Result, VistaError};
use std::collections::BTreeMap;

/// Handle to a node in a [`SpecTree`] arena.
///
/// Identity is the index, so the same sub-entity definition can be referenced
/// from several places (including from inside itself).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node #{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecNode {
    /// Directly serializable value
    Leaf,
    /// Field name → sub-tree
    Relation(BTreeMap<String, NodeId>),
}

/// Arena of spec nodes with a designated root.
///
/// Built once when an endpoint is defined and only read afterwards.
///
/// ```
/// use vista_core::spec::SpecTree;
///
/// let mut tree = SpecTree::new();
/// let root = tree.root();
/// tree.insert_leaves(root, &["id", "name"]).unwrap();
/// let parent = tree.root();
/// tree.insert(root, "parent", parent).unwrap();
/// assert_eq!(tree.children(root).unwrap().map(|c| c.len()), Some(3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecTree {
    nodes: Vec<SpecNode>,
    root: NodeId,
}

impl SpecTree {
    /// Create a tree whose root is an empty relation node.
    pub fn new() -> Self {
        Self {
            nodes: vec![SpecNode::Relation(BTreeMap::new())],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// # Errors
    /// `KeyLookup` if `id` is not a node of this tree.
    pub fn set_root(&mut self, id: NodeId) -> Result<()> {
        self.node(id)?;
        self.root = id;
        Ok(())
    }

    pub fn add_leaf(&mut self) -> NodeId {
        self.push(SpecNode::Leaf)
    }

    /// Add an empty relation node. Fill it with [`SpecTree::insert`]; this
    /// two-step form is what allows reflexive definitions.
    pub fn add_relation(&mut self) -> NodeId {
        self.push(SpecNode::Relation(BTreeMap::new()))
    }

    /// Attach `child` under `parent` as field `name`, replacing any previous entry.
    ///
    /// # Errors
    /// - `KeyLookup` if either id is not a node of this tree
    /// - `Internal` if `parent` is a leaf
    pub fn insert(&mut self, parent: NodeId, name: impl Into<String>, child: NodeId) -> Result<()> {
        self.node(child)?;
        match self.node_mut(parent)? {
            SpecNode::Relation(children) => {
                children.insert(name.into(), child);
                Ok(())
            }
            SpecNode::Leaf => Err(VistaError::Internal {
                message: format!("cannot attach a field to leaf {}", parent),
            }),
        }
    }

    /// Attach a fresh leaf under `parent`.
    ///
    /// # Errors
    /// Same as [`SpecTree::insert`].
    pub fn insert_leaf(&mut self, parent: NodeId, name: impl Into<String>) -> Result<NodeId> {
        let leaf = self.add_leaf();
        self.insert(parent, name, leaf)?;
        Ok(leaf)
    }

    /// # Errors
    /// Same as [`SpecTree::insert`].
    pub fn insert_leaves(&mut self, parent: NodeId, names: &[&str]) -> Result<()> {
        for name in names {
            self.insert_leaf(parent, *name)?;
        }
        Ok(())
    }

    /// # Errors
    /// `KeyLookup` if `id` is not a node of this tree.
    pub fn node(&self, id: NodeId) -> Result<&SpecNode> {
        self.nodes.get(id.0).ok_or_else(|| VistaError::KeyLookup {
            key: id.to_string(),
        })
    }

    /// Children of a relation node; a leaf has none.
    ///
    /// # Errors
    /// `KeyLookup` if `id` is not a node of this tree.
    pub fn children(&self, id: NodeId) -> Result<Option<&BTreeMap<String, NodeId>>> {
        Ok(match self.node(id)? {
            SpecNode::Relation(children) => Some(children),
            SpecNode::Leaf => None,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, node: SpecNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut SpecNode> {
        self.nodes.get_mut(id.0).ok_or_else(|| VistaError::KeyLookup {
            key: id.to_string(),
        })
    }
}

impl Default for SpecTree {
    fn default() -> Self {
        Self::new()
    }
}
