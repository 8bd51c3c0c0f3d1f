//! Depth-first traversal over structural and display trees.
//!
//! All walkers visit children before invoking the callback on their parent,
//! so a callback can rely on everything below a node having been visited
//! already.

use std::sync::Arc;

use crate::group::StructuralGroup;
use crate::node::{DisplayNode, StructuralNode};

/// Walk a structural tree. The callback receives each node and its parent.
pub fn walk_structural<F>(nodes: &[StructuralNode], mut callback: F)
where
    F: FnMut(&StructuralNode, Option<&Arc<StructuralGroup>>),
{
    fn walk<F>(nodes: &[StructuralNode], parent: Option<&Arc<StructuralGroup>>, callback: &mut F)
    where
        F: FnMut(&StructuralNode, Option<&Arc<StructuralGroup>>),
    {
        for node in nodes {
            if let StructuralNode::Group(group) = node {
                walk(&group.children(), Some(group), callback);
            }
            callback(node, parent);
        }
    }

    walk(nodes, None, &mut callback);
}

/// Walk a structural tree, passing each node's depth (roots are at depth 0).
pub fn walk_structural_depth<F>(nodes: &[StructuralNode], mut callback: F)
where
    F: FnMut(&StructuralNode, usize),
{
    fn walk<F>(nodes: &[StructuralNode], depth: usize, callback: &mut F)
    where
        F: FnMut(&StructuralNode, usize),
    {
        for node in nodes {
            if let StructuralNode::Group(group) = node {
                walk(&group.children(), depth + 1, callback);
            }
            callback(node, depth);
        }
    }

    walk(nodes, 0, &mut callback);
}

/// Visit the nodes of `nodes` that are not padding, looking through padding
/// groups to what they wrap. Real groups are visited but not descended into.
pub fn walk_through_padding<F>(nodes: &[StructuralNode], mut callback: F)
where
    F: FnMut(&StructuralNode),
{
    fn walk<F: FnMut(&StructuralNode)>(nodes: &[StructuralNode], callback: &mut F) {
        for node in nodes {
            match node {
                StructuralNode::Group(group) if group.is_padding() => {
                    walk(&group.children(), callback)
                }
                other => callback(other),
            }
        }
    }

    walk(nodes, &mut callback);
}

/// Walk every node placed in a display tree.
pub fn walk_display<F>(nodes: &[DisplayNode], mut callback: F)
where
    F: FnMut(&DisplayNode),
{
    fn walk<F: FnMut(&DisplayNode)>(nodes: &[DisplayNode], callback: &mut F) {
        for node in nodes {
            if let DisplayNode::Group(group) = node {
                walk(&group.children(), callback);
            }
            callback(node);
        }
    }

    walk(nodes, &mut callback);
}

/// Walk only the currently displayed part of a display tree.
pub fn walk_displayed<F>(nodes: &[DisplayNode], mut callback: F)
where
    F: FnMut(&DisplayNode),
{
    fn walk<F: FnMut(&DisplayNode)>(nodes: &[DisplayNode], callback: &mut F) {
        for node in nodes {
            if let DisplayNode::Group(group) = node {
                walk(&group.displayed_children(), callback);
            }
            callback(node);
        }
    }

    walk(nodes, &mut callback);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;
    use crate::definition::{ColDef, ColGroupDef};
    use crate::options::GridOptions;

    fn column(id: &str) -> StructuralNode {
        Column::new(id, ColDef::with_id(id), None, true, &GridOptions::default()).into()
    }

    fn group(id: &str, children: Vec<StructuralNode>) -> StructuralNode {
        StructuralGroup::new(id, 0, false, ColGroupDef::default(), None, children).into()
    }

    #[test]
    fn test_children_before_parent() {
        let tree = vec![group("g", vec![column("a"), group("h", vec![column("b")])]), column("c")];

        let mut order = Vec::new();
        walk_structural(&tree, |node, parent| {
            order.push(format!(
                "{}<{}",
                node.id(),
                parent.map(|p| p.group_id()).unwrap_or("root")
            ));
        });
        assert_eq!(order, vec!["a<g", "b<h", "h<g", "g<root", "c<root"]);
    }

    fn padding(id: &str, children: Vec<StructuralNode>) -> StructuralNode {
        StructuralGroup::new(id, 0, true, ColGroupDef::default(), None, children).into()
    }

    #[test]
    fn test_depths() {
        let tree = vec![group("g", vec![column("a"), group("h", vec![column("b")])]), column("c")];

        let mut depths = Vec::new();
        walk_structural_depth(&tree, |node, depth| depths.push((node.id().to_string(), depth)));
        let depths: Vec<_> = depths.iter().map(|(id, d)| (id.as_str(), *d)).collect();
        assert_eq!(depths, vec![("a", 1), ("b", 2), ("h", 1), ("g", 0), ("c", 0)]);
    }

    #[test]
    fn test_through_padding_stops_at_real_groups() {
        let tree = vec![
            padding("p0", vec![padding("p1", vec![column("a")])]),
            group("g", vec![column("b")]),
            column("c"),
        ];

        let mut visited = Vec::new();
        walk_through_padding(&tree, |node| visited.push(node.id().to_string()));
        assert_eq!(visited, vec!["a", "g", "c"]);
    }

    #[test]
    fn test_empty_tree() {
        let mut visited = 0;
        walk_structural(&[], |_, _| visited += 1);
        walk_display(&[], |_| visited += 1);
        walk_displayed(&[], |_| visited += 1);
        walk_structural_depth(&[], |_, _| visited += 1);
        walk_through_padding(&[], |_| visited += 1);
        assert_eq!(visited, 0);
    }
}
