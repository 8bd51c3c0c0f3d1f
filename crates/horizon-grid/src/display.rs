//! Building the per-section display trees.

use std::collections::HashMap;
use std::sync::Arc;

use horizon_grid_core::logging::targets;

use crate::column::Column;
use crate::definition::Pinned;
use crate::group::{create_unique_id, DisplayGroup, StructuralGroup};
use crate::node::DisplayNode;
use crate::tree::walker::walk_display;

/// Hands out instance numbers per group id.
///
/// One counter is shared by all three pinned sections of a layout pass, so a
/// structural group split across sections gets a distinct display group id
/// in each.
#[derive(Debug, Default, Clone)]
pub struct GroupInstanceIds {
    next: HashMap<String, u32>,
}

impl GroupInstanceIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `0` for the first request for `group_id`, then `1`, `2`, ...
    pub fn instance_id_for(&mut self, group_id: &str) -> u32 {
        let next = self.next.entry(group_id.to_string()).or_insert(0);
        let id = *next;
        *next += 1;
        id
    }
}

/// Build a display tree over `columns`, which must be the visible columns of
/// one section in display order.
///
/// Consecutive nodes sharing a structural parent are grouped into one display
/// group, level by level, until only roots remain. A display group from
/// `old_tree` is reused (after [`reset`](DisplayGroup::reset)) when its
/// composite id, structural group and section all match, so listeners on it
/// survive layout passes.
pub fn create_display_tree(
    columns: &[Arc<Column>],
    pinned: Pinned,
    instance_ids: &mut GroupInstanceIds,
    old_tree: &[DisplayNode],
) -> Vec<DisplayNode> {
    let mut old_groups: HashMap<String, Arc<DisplayGroup>> = HashMap::new();
    walk_display(old_tree, |node| {
        if let DisplayNode::Group(group) = node {
            old_groups.insert(group.unique_id().to_string(), group.clone());
        }
    });

    let mut roots = Vec::new();
    let mut current: Vec<DisplayNode> = columns.iter().cloned().map(DisplayNode::Column).collect();

    while !current.is_empty() {
        let mut next_level = Vec::new();
        let mut start = 0;
        for end in 1..=current.len() {
            let parent = current[start].original_parent();
            let same_run = end < current.len() && same_group(&current[end].original_parent(), &parent);
            if same_run {
                continue;
            }

            let run = &current[start..end];
            start = end;
            match parent {
                None => roots.extend(run.iter().cloned()),
                Some(parent) => {
                    let group = take_or_create(&parent, pinned, instance_ids, &mut old_groups);
                    for node in run {
                        group.add_child(node.clone());
                    }
                    next_level.push(DisplayNode::Group(group));
                }
            }
        }
        current = next_level;
    }

    link_parents(&roots);
    tracing::trace!(target: targets::DISPLAY, ?pinned, roots = roots.len(), "created display tree");
    roots
}

fn same_group(a: &Option<Arc<StructuralGroup>>, b: &Option<Arc<StructuralGroup>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

fn take_or_create(
    provided: &Arc<StructuralGroup>,
    pinned: Pinned,
    instance_ids: &mut GroupInstanceIds,
    old_groups: &mut HashMap<String, Arc<DisplayGroup>>,
) -> Arc<DisplayGroup> {
    let instance_id = instance_ids.instance_id_for(provided.group_id());
    let unique_id = create_unique_id(provided.group_id(), instance_id);

    match old_groups.remove(&unique_id) {
        Some(old) if Arc::ptr_eq(old.provided_group(), provided) && old.pinned() == pinned => {
            old.reset();
            old
        }
        _ => DisplayGroup::new(provided.clone(), instance_id, pinned),
    }
}

fn link_parents(roots: &[DisplayNode]) {
    walk_display(roots, |node| {
        if let DisplayNode::Group(group) = node {
            for child in group.children() {
                child.set_display_parent(Some(group));
            }
        }
    });
    for root in roots {
        root.set_display_parent(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{ColDef, ColGroupDef, ColumnDefinition};
    use crate::events::EventSource;
    use crate::options::GridOptions;
    use crate::tree::{ColumnTree, TreeBuilder};

    fn build(defs: &[ColumnDefinition]) -> ColumnTree {
        TreeBuilder::new(&GridOptions::default())
            .unwrap()
            .build(defs, true, None, &EventSource::Api)
            .unwrap()
            .tree
    }

    #[test]
    fn test_instance_ids() {
        let mut ids = GroupInstanceIds::new();
        assert_eq!(ids.instance_id_for("g"), 0);
        assert_eq!(ids.instance_id_for("g"), 1);
        assert_eq!(ids.instance_id_for("h"), 0);
    }

    #[test]
    fn test_groups_follow_structure() {
        let tree = build(&[
            ColGroupDef::new("G", vec![ColDef::for_field("a").into(), ColDef::for_field("b").into()]).into(),
            ColDef::for_field("c").into(),
        ]);
        let columns = tree.leaf_columns();
        let roots = create_display_tree(&columns, Pinned::None, &mut GroupInstanceIds::new(), &[]);

        assert_eq!(roots.len(), 2);
        let g = roots[0].as_group().unwrap();
        assert_eq!(g.unique_id(), "G_0");
        assert_eq!(g.children().len(), 2);
        assert!(roots[1].as_group().unwrap().is_padding());
        assert_eq!(columns[0].display_parent().unwrap().unique_id(), "G_0");
        assert!(g.display_parent().is_none());
    }

    #[test]
    fn test_split_group_gets_two_instances() {
        let tree = build(&[
            ColGroupDef::new(
                "G",
                vec![ColDef::for_field("a").into(), ColDef::for_field("b").into()],
            )
            .into(),
            ColDef::for_field("c").into(),
        ]);
        let [a, b, c] = <[Arc<Column>; 3]>::try_from(tree.leaf_columns()).unwrap();

        // `c` sits between `a` and `b`, splitting G into two runs.
        let roots = create_display_tree(
            &[a, c, b],
            Pinned::None,
            &mut GroupInstanceIds::new(),
            &[],
        );
        let ids: Vec<_> = roots.iter().map(|n| n.unique_id().to_string()).collect();
        assert_eq!(ids[0], "G_0");
        assert_eq!(ids[2], "G_1");
    }

    #[test]
    fn test_old_groups_are_reused() {
        let tree = build(&[
            ColGroupDef::new("G", vec![ColDef::for_field("a").into()]).into(),
        ]);
        let columns = tree.leaf_columns();
        let first = create_display_tree(&columns, Pinned::Left, &mut GroupInstanceIds::new(), &[]);
        let second = create_display_tree(&columns, Pinned::Left, &mut GroupInstanceIds::new(), &first);
        assert!(first[0].ptr_eq(&second[0]));
        assert_eq!(second[0].as_group().unwrap().children().len(), 1);

        let other_section = create_display_tree(&columns, Pinned::Right, &mut GroupInstanceIds::new(), &second);
        assert!(!second[0].ptr_eq(&other_section[0]));
    }

    #[test]
    fn test_empty_section() {
        let roots = create_display_tree(&[], Pinned::Right, &mut GroupInstanceIds::new(), &[]);
        assert!(roots.is_empty());
    }
}
