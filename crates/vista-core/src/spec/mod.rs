//! Spec trees and the field projector
//!
//! A spec tree is the static, per-endpoint description of which fields and
//! relations an entity exposes. The projector restricts it to the fields a
//! client asked for and derives the relation paths to eager-load.

mod projector;
mod pruned;
mod tree;

pub use projector::{project, project_from, Projection, RELATION_SEPARATOR};
pub use pruned::PrunedSpec;
pub use tree::{NodeId, SpecNode, SpecTree};
