//! Display column groups.

use std::fmt;
use std::sync::{Arc, Weak};

use horizon_grid_core::logging::targets;
use horizon_grid_core::{ConnectionId, Property, Signal};
use parking_lot::{Mutex, RwLock};

use crate::column::Column;
use crate::definition::{ColumnGroupShow, Pinned};
use crate::events::{DisplayGroupEvent, EventSource};
use crate::group::StructuralGroup;
use crate::node::DisplayNode;
use crate::tree::walker::{walk_display, walk_displayed};

/// A structural group as it appears in one pinned section.
///
/// The same structural group may be split across sections, or across
/// non-adjacent runs within one section, so each appearance gets its own
/// display group with the composite id `{group_id}_{instance}`.
///
/// `children` holds every node placed under the group; `displayed_children`
/// is the subset currently shown given the expand state. A display group
/// follows its structural group's `expanded_changed` and `expandable_changed`
/// signals and recomputes its own subtree when they fire.
pub struct DisplayGroup {
    group_id: String,
    instance_id: u32,
    unique_id: String,
    pinned: Pinned,
    provided_group: Arc<StructuralGroup>,
    this: Weak<DisplayGroup>,

    children: RwLock<Vec<DisplayNode>>,
    displayed_children: RwLock<Vec<DisplayNode>>,
    parent: RwLock<Weak<DisplayGroup>>,

    left: Property<Option<f32>>,
    old_left: Property<Option<f32>>,
    group_listeners: Mutex<Vec<ConnectionId>>,

    /// Emitted when the left position changes.
    pub left_changed: Signal<DisplayGroupEvent>,
    /// Emitted after every recomputation of the displayed children.
    pub displayed_children_changed: Signal<DisplayGroupEvent>,
}

/// Builds the composite id of a display group.
pub fn create_unique_id(group_id: &str, instance_id: u32) -> String {
    format!("{group_id}_{instance_id}")
}

impl DisplayGroup {
    pub fn new(provided_group: Arc<StructuralGroup>, instance_id: u32, pinned: Pinned) -> Arc<Self> {
        let group_id = provided_group.group_id().to_string();
        let unique_id = create_unique_id(&group_id, instance_id);

        let group = Arc::new_cyclic(|this: &Weak<DisplayGroup>| Self {
            group_id,
            instance_id,
            unique_id,
            pinned,
            provided_group,
            this: this.clone(),
            children: RwLock::new(Vec::new()),
            displayed_children: RwLock::new(Vec::new()),
            parent: RwLock::new(Weak::new()),
            left: Property::new(None),
            old_left: Property::new(None),
            group_listeners: Mutex::new(Vec::new()),
            left_changed: Signal::new(),
            displayed_children_changed: Signal::new(),
        });
        group.listen_to_provided_group();
        group
    }

    fn listen_to_provided_group(&self) {
        let mut listeners = self.group_listeners.lock();
        for signal in [
            &self.provided_group.expanded_changed,
            &self.provided_group.expandable_changed,
        ] {
            let this = self.this.clone();
            listeners.push(signal.connect(move |event| {
                if let Some(group) = this.upgrade() {
                    group.on_expand_state_changed(&event.source);
                }
            }));
        }
    }

    fn on_expand_state_changed(&self, source: &EventSource) {
        tracing::trace!(target: targets::DISPLAY, group = %self.unique_id, "expand state changed, recomputing");
        self.refresh_subtree(source);

        // Emptiness of this group may have changed, which affects ancestors.
        let mut parent = self.display_parent();
        while let Some(group) = parent {
            group.calculate_displayed_children(source);
            parent = group.display_parent();
        }
    }

    /// Recompute displayed children of every group below and including this one.
    fn refresh_subtree(&self, source: &EventSource) {
        walk_display(&self.children(), |node| {
            if let DisplayNode::Group(group) = node {
                group.calculate_displayed_children(source);
            }
        });
        self.calculate_displayed_children(source);
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn instance_id(&self) -> u32 {
        self.instance_id
    }

    /// The composite id `{group_id}_{instance}`.
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn pinned(&self) -> Pinned {
        self.pinned
    }

    /// The structural group this display group shows.
    pub fn provided_group(&self) -> &Arc<StructuralGroup> {
        &self.provided_group
    }

    pub fn is_padding(&self) -> bool {
        self.provided_group.is_padding()
    }

    pub fn is_expandable(&self) -> bool {
        self.provided_group.is_expandable()
    }

    pub fn is_expanded(&self) -> bool {
        self.provided_group.is_expanded()
    }

    pub fn set_expanded(&self, expanded: bool, source: &EventSource) {
        self.provided_group.set_expanded(expanded, source);
    }

    /// Show policy inside the parent group.
    pub fn column_group_show(&self) -> Option<ColumnGroupShow> {
        self.provided_group.column_group_show()
    }

    // -------------------------------------------------------------------------
    // Children
    // -------------------------------------------------------------------------

    pub fn children(&self) -> Vec<DisplayNode> {
        self.children.read().clone()
    }

    pub fn displayed_children(&self) -> Vec<DisplayNode> {
        self.displayed_children.read().clone()
    }

    pub(crate) fn add_child(&self, child: DisplayNode) {
        self.children.write().push(child);
    }

    /// Forget children and parent before the group is refilled.
    pub(crate) fn reset(&self) {
        self.children.write().clear();
        self.displayed_children.write().clear();
        self.set_display_parent(None);
    }

    /// Every leaf column placed under this group.
    pub fn leaf_columns(&self) -> Vec<Arc<Column>> {
        let mut leaves = Vec::new();
        walk_display(&self.children(), |node| {
            if let DisplayNode::Column(column) = node {
                leaves.push(column.clone());
            }
        });
        leaves
    }

    /// Leaf columns currently shown under this group.
    pub fn displayed_leaf_columns(&self) -> Vec<Arc<Column>> {
        let mut leaves = Vec::new();
        walk_displayed(&self.displayed_children(), |node| {
            if let DisplayNode::Column(column) = node {
                leaves.push(column.clone());
            }
        });
        leaves
    }

    /// Recompute which children are shown.
    ///
    /// The expand state comes from the nearest non-padding ancestor. Nested
    /// groups with nothing displayed are never shown. Child groups must be
    /// recomputed before their parent.
    pub fn calculate_displayed_children(&self, source: &EventSource) {
        let mut current = self.this.upgrade();
        let mut expansion: Option<Arc<DisplayGroup>> = None;
        while let Some(group) = current {
            if !group.is_padding() {
                expansion = Some(group);
                break;
            }
            current = group.display_parent();
        }

        let displayed: Vec<DisplayNode> = match expansion.filter(|g| g.is_expandable()) {
            None => self
                .children()
                .into_iter()
                .filter(|child| !child.is_empty_group())
                .collect(),
            Some(group) => {
                let expanded = group.is_expanded();
                self.children()
                    .into_iter()
                    .filter(|child| !child.is_empty_group())
                    .filter(|child| match child.column_group_show() {
                        Some(ColumnGroupShow::Open) => expanded,
                        Some(ColumnGroupShow::Closed) => !expanded,
                        None => true,
                    })
                    .collect()
            }
        };

        *self.displayed_children.write() = displayed;
        self.emit(&self.displayed_children_changed, source);
    }

    // -------------------------------------------------------------------------
    // Geometry
    // -------------------------------------------------------------------------

    /// Sum of the displayed children's widths.
    pub fn actual_width(&self) -> f32 {
        self.displayed_children
            .read()
            .iter()
            .map(DisplayNode::actual_width)
            .sum()
    }

    /// Sum of the displayed leaf columns' minimum widths.
    pub fn min_width(&self) -> f32 {
        self.displayed_leaf_columns()
            .iter()
            .map(|column| column.min_width())
            .sum()
    }

    pub fn left(&self) -> Option<f32> {
        self.left.get()
    }

    pub fn old_left(&self) -> Option<f32> {
        self.old_left.get()
    }

    pub fn set_left(&self, left: Option<f32>, source: &EventSource) {
        self.old_left.set(self.left());
        if self.left.set(left) {
            self.emit(&self.left_changed, source);
        }
    }

    /// Take the left position of the first displayed child (last in RTL).
    pub fn check_left(&self, rtl: bool, source: &EventSource) {
        let displayed = self.displayed_children.read().clone();
        let edge = if rtl { displayed.last() } else { displayed.first() };
        self.set_left(edge.and_then(DisplayNode::left), source);
    }

    // -------------------------------------------------------------------------
    // Tree links
    // -------------------------------------------------------------------------

    pub fn display_parent(&self) -> Option<Arc<DisplayGroup>> {
        self.parent.read().upgrade()
    }

    pub(crate) fn set_display_parent(&self, parent: Option<&Arc<DisplayGroup>>) {
        *self.parent.write() = parent.map(Arc::downgrade).unwrap_or_default();
    }

    fn emit(&self, signal: &Signal<DisplayGroupEvent>, source: &EventSource) {
        if let Some(group) = self.this.upgrade() {
            signal.emit(DisplayGroupEvent {
                group,
                source: source.clone(),
            });
        }
    }
}

impl Drop for DisplayGroup {
    fn drop(&mut self) {
        let listeners = std::mem::take(&mut *self.group_listeners.lock());
        let mut ids = listeners.into_iter();
        if let Some(id) = ids.next() {
            self.provided_group.expanded_changed.disconnect(id);
        }
        if let Some(id) = ids.next() {
            self.provided_group.expandable_changed.disconnect(id);
        }
    }
}

impl fmt::Debug for DisplayGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisplayGroup")
            .field("unique_id", &self.unique_id)
            .field("pinned", &self.pinned)
            .field("children", &self.children.read().len())
            .field("displayed_children", &self.displayed_children.read().len())
            .finish()
    }
}

static_assertions::assert_impl_all!(DisplayGroup: Send, Sync);
