//! Structural ("original") column groups.

use std::fmt;
use std::sync::{Arc, Weak};

use horizon_grid_core::logging::targets;
use horizon_grid_core::{ConnectionId, Property, Signal};
use parking_lot::{Mutex, RwLock};

use crate::column::Column;
use crate::definition::{ColGroupDef, ColumnGroupShow};
use crate::events::{EventSource, GroupEvent};
use crate::node::StructuralNode;
use crate::tree::walker::{walk_structural, walk_through_padding};

/// A node of the canonical column tree.
///
/// A structural group is either declared by the user or inserted as padding to
/// balance branch depth. Groups are rebuilt from scratch on every tree build;
/// only the `expanded` flag carries over from a previous group with the same
/// declared id.
///
/// The group listens to `visible_changed` on each of its leaf columns so that
/// [`is_expandable`](Self::is_expandable) stays current. The listeners are
/// removed when the group is dropped or [`detach`](Self::detach)ed.
pub struct StructuralGroup {
    group_id: String,
    level: usize,
    padding: bool,
    definition: Arc<ColGroupDef>,
    user_definition: Option<Arc<ColGroupDef>>,
    this: Weak<StructuralGroup>,

    children: RwLock<Vec<StructuralNode>>,
    parent: RwLock<Weak<StructuralGroup>>,

    expanded: Property<bool>,
    expandable: Property<bool>,
    leaf_listeners: Mutex<Vec<(Weak<Column>, ConnectionId)>>,

    /// Emitted when the group is opened or closed.
    pub expanded_changed: Signal<GroupEvent>,
    /// Emitted when toggling the group starts or stops having an effect.
    pub expandable_changed: Signal<GroupEvent>,
}

impl StructuralGroup {
    /// Create a group. `definition` is the merged definition; `user_definition`
    /// is what the user supplied and is `None` for padding groups.
    pub fn new(
        group_id: impl Into<String>,
        level: usize,
        padding: bool,
        definition: ColGroupDef,
        user_definition: Option<Arc<ColGroupDef>>,
        children: Vec<StructuralNode>,
    ) -> Arc<Self> {
        let expanded = definition.open_by_default.unwrap_or(false);
        Arc::new_cyclic(|this| Self {
            group_id: group_id.into(),
            level,
            padding,
            definition: Arc::new(definition),
            user_definition,
            this: this.clone(),
            children: RwLock::new(children),
            parent: RwLock::new(Weak::new()),
            expanded: Property::new(expanded),
            expandable: Property::new(false),
            leaf_listeners: Mutex::new(Vec::new()),
            expanded_changed: Signal::new(),
            expandable_changed: Signal::new(),
        })
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    /// Nesting level; roots are at level 0.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Returns `true` for synthetic groups inserted to balance depth.
    pub fn is_padding(&self) -> bool {
        self.padding
    }

    /// The merged group definition.
    pub fn definition(&self) -> Arc<ColGroupDef> {
        self.definition.clone()
    }

    /// The group definition as supplied by the user.
    pub fn user_definition(&self) -> Option<Arc<ColGroupDef>> {
        self.user_definition.clone()
    }

    pub fn header_name(&self) -> Option<String> {
        self.definition.header_name.clone()
    }

    /// Show policy inside the parent group.
    ///
    /// A padding group takes the policy of the node it wraps.
    pub fn column_group_show(&self) -> Option<ColumnGroupShow> {
        if !self.padding {
            return self.definition.column_group_show;
        }
        let mut first = self.children.read().first().cloned();
        loop {
            match first {
                Some(StructuralNode::Group(group)) if group.is_padding() => {
                    first = group.children().first().cloned();
                }
                other => return other.and_then(|node| node.column_group_show()),
            }
        }
    }

    pub fn is_marry_children(&self) -> bool {
        self.definition.marry_children.unwrap_or(false)
    }

    pub fn children(&self) -> Vec<StructuralNode> {
        self.children.read().clone()
    }

    pub(crate) fn set_children(&self, children: Vec<StructuralNode>) {
        *self.children.write() = children;
    }

    /// Every leaf column below this group, in order.
    pub fn leaf_columns(&self) -> Vec<Arc<Column>> {
        let mut leaves = Vec::new();
        walk_structural(&self.children(), |node, _| {
            if let StructuralNode::Column(column) = node {
                leaves.push(column.clone());
            }
        });
        leaves
    }

    /// A group is visible while any of its leaf columns is.
    pub fn is_visible(&self) -> bool {
        self.leaf_columns().iter().any(|column| column.is_visible())
    }

    pub fn original_parent(&self) -> Option<Arc<StructuralGroup>> {
        self.parent.read().upgrade()
    }

    pub(crate) fn set_original_parent(&self, parent: Option<&Arc<StructuralGroup>>) {
        *self.parent.write() = parent.map(Arc::downgrade).unwrap_or_default();
    }

    // -------------------------------------------------------------------------
    // Expand state
    // -------------------------------------------------------------------------

    pub fn is_expanded(&self) -> bool {
        self.expanded.get()
    }

    pub fn set_expanded(&self, expanded: bool, source: &EventSource) {
        if self.expanded.set(expanded) {
            tracing::debug!(target: targets::GROUP, group = %self.group_id, expanded, "group expanded state changed");
            self.emit(&self.expanded_changed, source);
        }
    }

    /// Returns `true` if opening or closing the group changes which columns show.
    pub fn is_expandable(&self) -> bool {
        self.expandable.get()
    }

    /// Compute expandability and start tracking leaf visibility.
    ///
    /// Called once per group after the tree is balanced.
    pub(crate) fn setup_expandable(&self) {
        self.expandable.set_silent(self.compute_expandable());
        if self.padding {
            return;
        }

        let mut listeners = self.leaf_listeners.lock();
        for column in self.leaf_columns() {
            let group = self.this.clone();
            let id = column.visible_changed.connect(move |event| {
                if let Some(group) = group.upgrade() {
                    group.refresh_expandable(&event.source);
                }
            });
            listeners.push((Arc::downgrade(&column), id));
        }
    }

    /// Recompute expandability, emitting `expandable_changed` if it flipped.
    pub fn refresh_expandable(&self, source: &EventSource) {
        if self.expandable.set(self.compute_expandable()) {
            tracing::debug!(
                target: targets::GROUP,
                group = %self.group_id,
                expandable = self.is_expandable(),
                "group expandable state changed"
            );
            self.emit(&self.expandable_changed, source);
        }
    }

    fn compute_expandable(&self) -> bool {
        if self.padding {
            return false;
        }

        let mut open = false;
        let mut closed = false;
        for child in self.real_children() {
            if !child.is_visible() {
                continue;
            }
            match child.column_group_show() {
                Some(ColumnGroupShow::Open) => open = true,
                Some(ColumnGroupShow::Closed) => closed = true,
                None => {}
            }
        }
        open && closed
    }

    /// Children with padding groups replaced by what they wrap.
    fn real_children(&self) -> Vec<StructuralNode> {
        let mut real = Vec::new();
        walk_through_padding(&self.children(), |node| real.push(node.clone()));
        real
    }

    /// Stop listening to leaf columns.
    pub fn detach(&self) {
        for (column, id) in self.leaf_listeners.lock().drain(..) {
            if let Some(column) = column.upgrade() {
                column.visible_changed.disconnect(id);
            }
        }
    }

    fn emit(&self, signal: &Signal<GroupEvent>, source: &EventSource) {
        if let Some(group) = self.this.upgrade() {
            signal.emit(GroupEvent {
                group,
                source: source.clone(),
            });
        }
    }
}

impl Drop for StructuralGroup {
    fn drop(&mut self) {
        self.detach();
    }
}

impl fmt::Debug for StructuralGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructuralGroup")
            .field("group_id", &self.group_id)
            .field("level", &self.level)
            .field("padding", &self.padding)
            .field("expanded", &self.is_expanded())
            .field("expandable", &self.is_expandable())
            .field("children", &self.children.read().len())
            .finish()
    }
}

static_assertions::assert_impl_all!(StructuralGroup: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::ColDef;
    use crate::options::GridOptions;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn column(id: &str, show: Option<ColumnGroupShow>) -> Arc<Column> {
        let def = ColDef {
            column_group_show: show,
            ..ColDef::with_id(id)
        };
        Column::new(id, def, None, true, &GridOptions::default())
    }

    fn group(id: &str, children: Vec<StructuralNode>) -> Arc<StructuralGroup> {
        let group = StructuralGroup::new(
            id,
            0,
            false,
            ColGroupDef::new(id, vec![]),
            None,
            children,
        );
        group.setup_expandable();
        group
    }

    #[test]
    fn test_always_children_are_not_expandable() {
        let g = group(
            "g",
            vec![column("a", None).into(), column("b", None).into()],
        );
        assert!(!g.is_expandable());
    }

    #[test]
    fn test_open_and_closed_children_are_expandable() {
        let g = group(
            "g",
            vec![
                column("a", Some(ColumnGroupShow::Open)).into(),
                column("b", Some(ColumnGroupShow::Closed)).into(),
            ],
        );
        assert!(g.is_expandable());
    }

    #[test]
    fn test_one_conditional_category_is_not_expandable() {
        let g = group(
            "g",
            vec![
                column("a", Some(ColumnGroupShow::Open)).into(),
                column("b", None).into(),
            ],
        );
        assert!(!g.is_expandable());
    }

    #[test]
    fn test_hiding_a_category_flips_expandable() {
        let a = column("a", Some(ColumnGroupShow::Open));
        let b = column("b", Some(ColumnGroupShow::Closed));
        let g = group("g", vec![a.clone().into(), b.clone().into()]);

        let flips = Arc::new(AtomicUsize::new(0));
        let flips_clone = flips.clone();
        g.expandable_changed.connect(move |_| {
            flips_clone.fetch_add(1, Ordering::SeqCst);
        });

        b.set_visible(false, &EventSource::Api);
        assert!(!g.is_expandable());
        a.set_visible(false, &EventSource::Api);
        assert!(!g.is_expandable());
        assert_eq!(flips.load(Ordering::SeqCst), 1);

        b.set_visible(true, &EventSource::Api);
        a.set_visible(true, &EventSource::Api);
        assert!(g.is_expandable());
        assert_eq!(flips.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_padding_children_are_flattened() {
        let closed = column("b", Some(ColumnGroupShow::Closed));
        let pad = StructuralGroup::new(
            "pad",
            1,
            true,
            ColGroupDef::default(),
            None,
            vec![closed.into()],
        );
        pad.setup_expandable();
        assert!(!pad.is_expandable());
        assert_eq!(pad.column_group_show(), Some(ColumnGroupShow::Closed));

        let g = group(
            "g",
            vec![column("a", Some(ColumnGroupShow::Open)).into(), pad.into()],
        );
        assert!(g.is_expandable());
    }

    #[test]
    fn test_expanded_defaults_to_open_by_default() {
        let open = StructuralGroup::new(
            "g",
            0,
            false,
            ColGroupDef::new("g", vec![]).open_by_default(true),
            None,
            vec![],
        );
        assert!(open.is_expanded());

        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        open.expanded_changed.connect(move |event| {
            assert_eq!(event.group.group_id(), "g");
            count_clone.fetch_add(1, Ordering::SeqCst);
        });
        open.set_expanded(true, &EventSource::Api);
        open.set_expanded(false, &EventSource::Api);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_removes_leaf_listeners() {
        let a = column("a", Some(ColumnGroupShow::Open));
        let g = group("g", vec![a.clone().into()]);
        assert_eq!(a.visible_changed.connection_count(), 1);
        drop(g);
        assert_eq!(a.visible_changed.connection_count(), 0);
    }
}
