//! The structural column tree.
//!
//! [`TreeBuilder`] turns a definition list into a [`ColumnTree`]: a list of
//! root nodes in which every root-to-leaf path has the same length. The
//! [`walker`] functions are the traversal primitives used throughout the
//! crate, and [`auto_group`] wraps generated grouping columns so they line up
//! with the real tree.

pub mod auto_group;
mod builder;
pub mod walker;

use std::sync::Arc;

pub use builder::{BuildOutcome, TreeBuilder};

use crate::column::Column;
use crate::error::{Error, Result};
use crate::group::StructuralGroup;
use crate::node::StructuralNode;

/// A balanced structural tree and its depth.
///
/// `depth` is the number of nodes on every root-to-leaf path; a flat list of
/// columns has depth 1 and an empty tree depth 0.
#[derive(Debug, Clone, Default)]
pub struct ColumnTree {
    pub tree: Vec<StructuralNode>,
    pub depth: usize,
}

impl ColumnTree {
    pub fn new(tree: Vec<StructuralNode>, depth: usize) -> Self {
        Self { tree, depth }
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// All leaf columns in tree order.
    pub fn leaf_columns(&self) -> Vec<Arc<Column>> {
        let mut leaves = Vec::new();
        walker::walk_structural(&self.tree, |node, _| {
            if let StructuralNode::Column(column) = node {
                leaves.push(column.clone());
            }
        });
        leaves
    }

    /// All structural groups, children before parents.
    pub fn groups(&self) -> Vec<Arc<StructuralGroup>> {
        let mut groups = Vec::new();
        walker::walk_structural(&self.tree, |node, _| {
            if let StructuralNode::Group(group) = node {
                groups.push(group.clone());
            }
        });
        groups
    }

    pub fn find_column(&self, id: &str) -> Option<Arc<Column>> {
        self.leaf_columns().into_iter().find(|c| c.id() == id)
    }

    pub fn find_group(&self, group_id: &str) -> Option<Arc<StructuralGroup>> {
        self.groups().into_iter().find(|g| g.group_id() == group_id)
    }

    /// Groups from the root down to the column's parent, or `None` if the
    /// column is not in this tree.
    pub fn path_to_column(&self, column: &Arc<Column>) -> Option<Vec<Arc<StructuralGroup>>> {
        // Children are visited before parents, so each ancestor is reached
        // after the node it contains.
        let mut path = Vec::new();
        let mut target: Option<StructuralNode> = None;
        let mut found = false;
        walker::walk_structural(&self.tree, |node, parent| {
            let on_path = match (&target, node) {
                (None, StructuralNode::Column(c)) => !found && Arc::ptr_eq(c, column),
                (Some(target), _) => target.ptr_eq(node),
                (None, StructuralNode::Group(_)) => false,
            };
            if !on_path {
                return;
            }
            found = true;
            target = parent.map(|group| StructuralNode::Group(group.clone()));
            if let Some(group) = parent {
                path.push(group.clone());
            }
        });

        found.then(|| {
            path.reverse();
            path
        })
    }

    /// Check that every leaf sits exactly `depth` nodes below the roots.
    pub fn check_balanced(&self) -> Result<()> {
        let mut first_error = None;
        walker::walk_structural_depth(&self.tree, |node, depth| {
            let found = depth + 1;
            if let StructuralNode::Column(column) = node {
                if found != self.depth && first_error.is_none() {
                    first_error = Some(Error::UnbalancedTree {
                        column: column.id().to_string(),
                        expected: self.depth,
                        found,
                    });
                }
            }
        });
        first_error.map_or(Ok(()), Err)
    }

    /// Stop every group from listening to its leaf columns.
    pub fn detach(&self) {
        for group in self.groups() {
            group.detach();
        }
    }
}

/// Number of groups along the first path from the roots.
pub fn group_depth(tree: &[StructuralNode]) -> usize {
    let mut depth = 0;
    let mut current = tree.first().cloned();
    while let Some(StructuralNode::Group(group)) = current {
        depth += 1;
        current = group.children().first().cloned();
    }
    depth
}
