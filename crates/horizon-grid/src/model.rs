//! The column model: owner of the structural and display trees.
//!
//! [`ColumnModel`] is what a grid holds on to. It keeps the current
//! definitions, rebuilds the structural tree when they change, maintains the
//! auto-generated grouping columns, and lays out the three pinned sections.
//!
//! # Example
//!
//! ```
//! use horizon_grid::{ColDef, ColGroupDef, ColumnModel, EventSource, GridOptions, Pinned};
//!
//! let mut model = ColumnModel::new(GridOptions::default());
//! model
//!     .set_column_defs(
//!         vec![
//!             ColGroupDef::new("G", vec![ColDef::for_field("a").into(), ColDef::for_field("b").into()]).into(),
//!             ColDef::for_field("c").width(120.0).into(),
//!         ],
//!         &EventSource::GridInitializing,
//!     )
//!     .unwrap();
//!
//! assert_eq!(model.depth(), 2);
//! assert_eq!(model.displayed_columns(Pinned::None).len(), 3);
//! assert_eq!(model.column("c").unwrap().left(), Some(400.0));
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use horizon_grid_core::logging::targets;
use horizon_grid_core::{ConnectionId, PerfSpan, Signal};
use parking_lot::{Mutex, RwLock};

use crate::column::Column;
use crate::definition::{ColumnDefinition, Pinned, SortDirection};
use crate::display::{GroupInstanceIds, create_display_tree};
use crate::error::{Error, Result};
use crate::events::{ColumnEvent, EventSource};
use crate::group::StructuralGroup;
use crate::node::DisplayNode;
use crate::options::GridOptions;
use crate::tree::auto_group::{balance_tree_for_auto_columns, create_auto_group_columns};
use crate::tree::walker::{walk_display, walk_displayed};
use crate::tree::{ColumnTree, TreeBuilder};

/// Display tree and displayed columns of one pinned section.
#[derive(Debug, Default, Clone)]
struct Section {
    tree: Vec<DisplayNode>,
    columns: Vec<Arc<Column>>,
}

#[derive(Debug, Default, Clone)]
struct Sections {
    left: Section,
    center: Section,
    right: Section,
}

impl Sections {
    fn get(&self, pinned: Pinned) -> &Section {
        match pinned {
            Pinned::Left => &self.left,
            Pinned::None => &self.center,
            Pinned::Right => &self.right,
        }
    }

    fn get_mut(&mut self, pinned: Pinned) -> &mut Section {
        match pinned {
            Pinned::Left => &mut self.left,
            Pinned::None => &mut self.center,
            Pinned::Right => &mut self.right,
        }
    }

    fn iter(&self) -> impl Iterator<Item = &Section> {
        [&self.left, &self.center, &self.right].into_iter()
    }
}

/// Connections the model holds on the entities of its current tree.
#[derive(Debug)]
enum Watch {
    /// `visible_changed`, `pinned_changed` and `width_changed`, in that order.
    Column(Arc<Column>, [ConnectionId; 3]),
    /// `expanded_changed`.
    Group(Arc<StructuralGroup>, ConnectionId),
}

impl Watch {
    fn disconnect(self) {
        match self {
            Self::Column(column, [visible, pinned, width]) => {
                column.visible_changed.disconnect(visible);
                column.pinned_changed.disconnect(pinned);
                column.width_changed.disconnect(width);
            }
            Self::Group(group, expanded) => {
                group.expanded_changed.disconnect(expanded);
            }
        }
    }
}

/// Set when an entity changed behind the model's back; holds the source of
/// the latest such change.
type Stale = Arc<Mutex<Option<EventSource>>>;

fn mark_stale(stale: &Stale, source: &EventSource) {
    *stale.lock() = Some(source.clone());
}

/// Owns the column trees of one grid.
///
/// Changes made directly on a column or group (`Column::set_visible`,
/// `StructuralGroup::set_expanded`, ...) are picked up as well: the model
/// marks its sections stale and lays them out again on the next query.
#[derive(Debug)]
pub struct ColumnModel {
    options: GridOptions,
    column_defs: Vec<ColumnDefinition>,

    primary_tree: ColumnTree,
    tree: ColumnTree,
    columns: Vec<Arc<Column>>,
    auto_group_columns: Vec<Arc<Column>>,

    sections: RwLock<Sections>,
    stale: Stale,
    watches: Vec<Watch>,
}

impl ColumnModel {
    pub fn new(options: GridOptions) -> Self {
        Self {
            options,
            column_defs: Vec::new(),
            primary_tree: ColumnTree::default(),
            tree: ColumnTree::default(),
            columns: Vec::new(),
            auto_group_columns: Vec::new(),
            sections: RwLock::new(Sections::default()),
            stale: Arc::new(Mutex::new(None)),
            watches: Vec::new(),
        }
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    /// The definitions last passed to [`set_column_defs`](Self::set_column_defs).
    pub fn column_defs(&self) -> &[ColumnDefinition] {
        &self.column_defs
    }

    // -------------------------------------------------------------------------
    // Rebuilds
    // -------------------------------------------------------------------------

    /// Replace the column definitions.
    ///
    /// Columns that reconcile with a new definition keep their identity and
    /// runtime state; the rest are destroyed.
    pub fn set_column_defs(
        &mut self,
        defs: Vec<ColumnDefinition>,
        source: &EventSource,
    ) -> Result<()> {
        let _span = PerfSpan::new("set_column_defs");

        let outcome = TreeBuilder::new(&self.options)?.build(&defs, true, Some(&self.primary_tree), source)?;

        for column in &outcome.unmatched {
            column.destroy();
        }
        self.primary_tree.detach();

        tracing::debug!(
            target: targets::MODEL,
            created = outcome.created,
            reused = outcome.reused,
            destroyed = outcome.unmatched.len(),
            "column definitions applied"
        );

        self.column_defs = defs;
        self.primary_tree = outcome.tree;
        self.rebuild_auto_group_columns(source)?;
        self.refresh_displayed(source);
        Ok(())
    }

    /// Group rows by the given primary columns, in order.
    ///
    /// Every other primary column stops grouping. Grouping columns are then
    /// generated and placed in front of the tree.
    pub fn set_row_group_columns(&mut self, ids: &[&str], source: &EventSource) -> Result<()> {
        let grouped = ids
            .iter()
            .map(|id| self.primary_column(id).ok_or_else(|| Error::UnknownColumn(id.to_string())))
            .collect::<Result<Vec<_>>>()?;

        for column in self.primary_tree.leaf_columns() {
            let active = grouped.iter().any(|g| Arc::ptr_eq(g, &column));
            column.set_row_group_active(active, source);
        }

        self.rebuild_auto_group_columns_for(&grouped, source)?;
        self.refresh_displayed(source);
        Ok(())
    }

    fn rebuild_auto_group_columns(&mut self, source: &EventSource) -> Result<()> {
        let grouped: Vec<_> = self
            .primary_tree
            .leaf_columns()
            .into_iter()
            .filter(|c| c.is_row_group_active())
            .collect();
        self.rebuild_auto_group_columns_for(&grouped, source)
    }

    fn rebuild_auto_group_columns_for(
        &mut self,
        grouped: &[Arc<Column>],
        source: &EventSource,
    ) -> Result<()> {
        let auto_columns =
            create_auto_group_columns(grouped, &self.auto_group_columns, &self.options, source);
        for old in &self.auto_group_columns {
            if !auto_columns.iter().any(|c| Arc::ptr_eq(c, old)) {
                old.destroy();
            }
        }

        let mut roots = balance_tree_for_auto_columns(&auto_columns, &self.primary_tree)?;
        roots.extend(self.primary_tree.tree.iter().cloned());
        let depth = if self.primary_tree.is_empty() && !roots.is_empty() {
            1
        } else {
            self.primary_tree.depth
        };

        self.tree = ColumnTree::new(roots, depth);
        self.columns = self.tree.leaf_columns();
        self.auto_group_columns = auto_columns;
        self.watch_entities();
        Ok(())
    }

    /// Follow the changes of the current tree's entities that affect layout.
    fn watch_entities(&mut self) {
        for watch in self.watches.drain(..) {
            watch.disconnect();
        }

        for column in &self.columns {
            let connect = |signal: &Signal<ColumnEvent>| {
                let stale = self.stale.clone();
                signal.connect(move |event| mark_stale(&stale, &event.source))
            };
            let ids = [
                connect(&column.visible_changed),
                connect(&column.pinned_changed),
                connect(&column.width_changed),
            ];
            self.watches.push(Watch::Column(column.clone(), ids));
        }

        for group in self.tree.groups() {
            let stale = self.stale.clone();
            let id = group
                .expanded_changed
                .connect(move |event| mark_stale(&stale, &event.source));
            self.watches.push(Watch::Group(group, id));
        }
    }

    /// Lay out again if an entity changed since the last layout.
    fn ensure_fresh(&self) {
        let pending = self.stale.lock().take();
        if let Some(source) = pending {
            tracing::trace!(target: targets::MODEL, %source, "entities changed directly, refreshing");
            self.refresh_displayed(&source);
        }
    }

    /// Recreate the display trees of all three sections and lay them out.
    ///
    /// Display groups from the previous pass are reused where possible.
    /// Displayed children are computed bottom-up, then left positions are
    /// assigned to columns and propagated to groups.
    pub fn refresh_displayed(&self, source: &EventSource) {
        self.stale.lock().take();

        let old = self.sections.read().clone();
        let mut sections = Sections::default();
        let mut instance_ids = GroupInstanceIds::new();

        // Left, right, then center, so instance numbers are stable per section.
        for pinned in [Pinned::Left, Pinned::Right, Pinned::None] {
            let visible: Vec<_> = self
                .columns
                .iter()
                .filter(|c| c.is_visible() && c.pinned() == pinned)
                .cloned()
                .collect();

            let tree = create_display_tree(&visible, pinned, &mut instance_ids, &old.get(pinned).tree);

            walk_display(&tree, |node| {
                if let DisplayNode::Group(group) = node {
                    group.calculate_displayed_children(source);
                }
            });

            let mut columns = Vec::new();
            for node in &tree {
                if !node.is_empty_group() {
                    node.collect_displayed_leaf_columns(&mut columns);
                }
            }

            *sections.get_mut(pinned) = Section { tree, columns };
        }

        *self.sections.write() = sections.clone();
        self.update_left_positions(&sections, source);

        tracing::trace!(
            target: targets::MODEL,
            left = sections.left.columns.len(),
            center = sections.center.columns.len(),
            right = sections.right.columns.len(),
            "display trees refreshed"
        );
    }

    fn update_left_positions(&self, sections: &Sections, source: &EventSource) {
        let rtl = self.options.rtl;
        for section in sections.iter() {
            let total: f32 = section.columns.iter().map(|c| c.actual_width()).sum();
            let mut left = if rtl { total } else { 0.0 };
            for column in &section.columns {
                if rtl {
                    left -= column.actual_width();
                    column.set_left(Some(left), source);
                } else {
                    column.set_left(Some(left), source);
                    left += column.actual_width();
                }
            }

            walk_displayed(&section.tree, |node| {
                if let DisplayNode::Group(group) = node {
                    group.check_left(rtl, source);
                }
            });
        }

        let displayed: HashSet<&str> = sections
            .iter()
            .flat_map(|section| section.columns.iter().map(|c| c.id()))
            .collect();
        for column in &self.columns {
            if !displayed.contains(column.id()) {
                column.set_left(None, source);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    fn require_column(&self, id: &str) -> Result<Arc<Column>> {
        self.column(id).ok_or_else(|| Error::UnknownColumn(id.to_string()))
    }

    pub fn set_column_visible(&mut self, id: &str, visible: bool, source: &EventSource) -> Result<()> {
        self.require_column(id)?.set_visible(visible, source);
        self.refresh_displayed(source);
        Ok(())
    }

    pub fn set_column_width(&mut self, id: &str, width: f32, source: &EventSource) -> Result<()> {
        self.require_column(id)?.set_actual_width(width, source);
        // Only positions move; the display trees stay as they are.
        self.stale.lock().take();
        let sections = self.sections.read().clone();
        self.update_left_positions(&sections, source);
        Ok(())
    }

    pub fn set_column_pinned(&mut self, id: &str, pinned: Pinned, source: &EventSource) -> Result<()> {
        self.require_column(id)?.set_pinned(pinned, source);
        self.refresh_displayed(source);
        Ok(())
    }

    pub fn set_column_sort(
        &mut self,
        id: &str,
        sort: Option<SortDirection>,
        source: &EventSource,
    ) -> Result<()> {
        self.require_column(id)?.set_sort(sort, source);
        Ok(())
    }

    /// Open or close a structural group and lay out again.
    pub fn set_group_expanded(&mut self, group_id: &str, expanded: bool, source: &EventSource) -> Result<()> {
        let group = self
            .group(group_id)
            .ok_or_else(|| Error::UnknownGroup(group_id.to_string()))?;
        group.set_expanded(expanded, source);
        self.refresh_displayed(source);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Any column, primary or generated, by id.
    pub fn column(&self, id: &str) -> Option<Arc<Column>> {
        self.ensure_fresh();
        self.columns.iter().find(|c| c.id() == id).cloned()
    }

    fn primary_column(&self, id: &str) -> Option<Arc<Column>> {
        self.primary_tree.find_column(id)
    }

    /// Every leaf column in tree order, grouping columns first.
    pub fn columns(&self) -> &[Arc<Column>] {
        &self.columns
    }

    pub fn primary_columns(&self) -> Vec<Arc<Column>> {
        self.primary_tree.leaf_columns()
    }

    pub fn auto_group_columns(&self) -> &[Arc<Column>] {
        &self.auto_group_columns
    }

    /// The full structural tree, grouping columns included.
    pub fn tree(&self) -> &ColumnTree {
        &self.tree
    }

    pub fn depth(&self) -> usize {
        self.tree.depth
    }

    pub fn group(&self, group_id: &str) -> Option<Arc<StructuralGroup>> {
        self.tree.find_group(group_id)
    }

    pub fn display_tree(&self, pinned: Pinned) -> Vec<DisplayNode> {
        self.ensure_fresh();
        self.sections.read().get(pinned).tree.clone()
    }

    pub fn displayed_columns(&self, pinned: Pinned) -> Vec<Arc<Column>> {
        self.ensure_fresh();
        self.sections.read().get(pinned).columns.clone()
    }

    /// Displayed columns of all sections: left, center, right.
    pub fn all_displayed_columns(&self) -> Vec<Arc<Column>> {
        self.ensure_fresh();
        let sections = self.sections.read();
        Pinned::SECTIONS
            .iter()
            .flat_map(|&pinned| sections.get(pinned).columns.iter().cloned())
            .collect()
    }

    /// Structural groups from the root down to the column's parent.
    ///
    /// `None` if the column is not part of the current tree.
    pub fn structural_path(&self, column: &Arc<Column>) -> Option<Vec<Arc<StructuralGroup>>> {
        self.tree.path_to_column(column)
    }
}

impl Drop for ColumnModel {
    fn drop(&mut self) {
        for watch in self.watches.drain(..) {
            watch.disconnect();
        }
        self.tree.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{ColDef, ColGroupDef, ColumnGroupShow, definitions_from_json};
    use crate::options::{GroupDisplayType, ValidationMode};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ids(columns: &[Arc<Column>]) -> Vec<String> {
        columns.iter().map(|c| c.id().to_string()).collect()
    }

    fn model(defs: Vec<ColumnDefinition>) -> ColumnModel {
        let mut model = ColumnModel::new(GridOptions::default());
        model.set_column_defs(defs, &EventSource::GridInitializing).unwrap();
        model
    }

    #[test]
    fn test_sections_and_lefts() {
        let mut model = model(vec![
            ColDef::for_field("a").width(100.0).into(),
            ColDef::for_field("b").width(50.0).into(),
            ColDef::for_field("c").width(70.0).into(),
        ]);
        model.set_column_pinned("b", Pinned::Left, &EventSource::Api).unwrap();

        assert_eq!(ids(&model.displayed_columns(Pinned::Left)), vec!["b"]);
        assert_eq!(ids(&model.displayed_columns(Pinned::None)), vec!["a", "c"]);
        assert_eq!(ids(&model.all_displayed_columns()), vec!["b", "a", "c"]);
        assert_eq!(model.column("b").unwrap().left(), Some(0.0));
        assert_eq!(model.column("c").unwrap().left(), Some(100.0));
    }

    #[test]
    fn test_rtl_lefts() {
        let mut model = ColumnModel::new(GridOptions::new().rtl(true));
        model
            .set_column_defs(
                vec![ColDef::for_field("a").width(100.0).into(), ColDef::for_field("b").width(50.0).into()],
                &EventSource::Api,
            )
            .unwrap();
        assert_eq!(model.column("a").unwrap().left(), Some(50.0));
        assert_eq!(model.column("b").unwrap().left(), Some(0.0));
    }

    #[test]
    fn test_hidden_column_leaves_layout() {
        let mut model = model(vec![
            ColDef::for_field("a").width(100.0).into(),
            ColDef::for_field("b").into(),
        ]);
        model.set_column_visible("a", false, &EventSource::Api).unwrap();
        assert_eq!(ids(&model.displayed_columns(Pinned::None)), vec!["b"]);
        assert_eq!(model.column("a").unwrap().left(), None);
        assert_eq!(model.column("b").unwrap().left(), Some(0.0));
    }

    #[test]
    fn test_width_change_moves_following_columns() {
        let mut model = model(vec![
            ColDef::for_field("a").width(100.0).into(),
            ColDef::for_field("b").into(),
        ]);
        model.set_column_width("a", 10.0, &EventSource::UiColumnResized).unwrap();
        // Clamped to the default minimum of 20.
        assert_eq!(model.column("b").unwrap().left(), Some(20.0));
    }

    #[test]
    fn test_group_expansion_changes_displayed_columns() {
        let mut model = model(vec![
            ColGroupDef::new(
                "G",
                vec![
                    ColDef::for_field("colA").column_group_show(ColumnGroupShow::Open).into(),
                    ColDef::for_field("colB").column_group_show(ColumnGroupShow::Closed).into(),
                ],
            )
            .into(),
        ]);
        assert_eq!(ids(&model.displayed_columns(Pinned::None)), vec!["colB"]);

        model.set_group_expanded("G", true, &EventSource::Api).unwrap();
        assert_eq!(ids(&model.displayed_columns(Pinned::None)), vec!["colA"]);
        assert_eq!(model.column("colA").unwrap().left(), Some(0.0));
        assert_eq!(model.column("colB").unwrap().left(), None);
    }

    #[test]
    fn test_unknown_ids_are_errors() {
        let mut model = model(vec![ColDef::for_field("a").into()]);
        assert!(matches!(
            model.set_column_visible("nope", false, &EventSource::Api),
            Err(Error::UnknownColumn(id)) if id == "nope"
        ));
        assert!(matches!(
            model.set_group_expanded("nope", true, &EventSource::Api),
            Err(Error::UnknownGroup(_))
        ));
        assert!(model.set_row_group_columns(&["nope"], &EventSource::Api).is_err());
    }

    #[test]
    fn test_rebuild_destroys_dropped_columns() {
        let mut model = model(vec![ColDef::for_field("a").into(), ColDef::for_field("b").into()]);
        let a = model.column("a").unwrap();
        let b = model.column("b").unwrap();

        model
            .set_column_defs(vec![ColDef::for_field("a").into()], &EventSource::ColumnDefsChanged)
            .unwrap();
        assert!(Arc::ptr_eq(&a, &model.column("a").unwrap()));
        assert!(!a.is_destroyed());
        assert!(b.is_destroyed());
        assert!(model.column("b").is_none());
    }

    #[test]
    fn test_row_grouping_adds_auto_columns() {
        let mut model = ColumnModel::new(
            GridOptions::new().group_display_type(GroupDisplayType::MultipleColumns),
        );
        model
            .set_column_defs(
                vec![
                    ColGroupDef::new("G", vec![ColDef::for_field("country").into()]).into(),
                    ColDef::for_field("year").into(),
                ],
                &EventSource::Api,
            )
            .unwrap();

        model.set_row_group_columns(&["country", "year"], &EventSource::Api).unwrap();
        assert_eq!(
            ids(model.auto_group_columns()),
            vec!["auto-group-column-country", "auto-group-column-year"]
        );
        assert_eq!(model.columns()[0].id(), "auto-group-column-country");
        model.tree().check_balanced().unwrap();
        assert_eq!(model.depth(), 2);

        let auto = model.column("auto-group-column-year").unwrap();
        model.set_row_group_columns(&["country"], &EventSource::Api).unwrap();
        assert!(auto.is_destroyed());
        assert!(!model.column("year").unwrap().is_row_group_active());
        assert_eq!(model.auto_group_columns().len(), 1);
    }

    #[test]
    fn test_row_group_state_from_definitions() {
        let model = model(vec![
            ColDef {
                row_group: true.into(),
                ..ColDef::for_field("country")
            }
            .into(),
            ColDef::for_field("gold").into(),
        ]);
        assert_eq!(ids(model.auto_group_columns()), vec!["auto-group-column"]);
        assert_eq!(model.displayed_columns(Pinned::None)[0].id(), "auto-group-column");
    }

    #[test]
    fn test_structural_path() {
        let model = model(vec![
            ColGroupDef::new(
                "G",
                vec![ColGroupDef::new("H", vec![ColDef::for_field("a").into()]).into()],
            )
            .into(),
        ]);
        let a = model.column("a").unwrap();
        let path: Vec<_> = model
            .structural_path(&a)
            .unwrap()
            .iter()
            .map(|g| g.group_id().to_string())
            .collect();
        assert_eq!(path, vec!["G", "H"]);

        let stranger = Column::new("x", ColDef::new(), None, true, &GridOptions::default());
        assert!(model.structural_path(&stranger).is_none());
    }

    #[test]
    fn test_display_groups_reused_across_passes() {
        let mut model = model(vec![
            ColGroupDef::new("G", vec![ColDef::for_field("a").into(), ColDef::for_field("b").into()]).into(),
        ]);
        let before = model.display_tree(Pinned::None)[0].clone();
        model.set_column_visible("b", false, &EventSource::Api).unwrap();
        let after = model.display_tree(Pinned::None)[0].clone();
        assert!(before.ptr_eq(&after));
        assert_eq!(after.as_group().unwrap().displayed_children().len(), 1);
    }

    #[test]
    fn test_rejected_rebuild_leaves_columns_untouched() {
        let mut model = ColumnModel::new(GridOptions::new().validation(ValidationMode::Strict));
        model
            .set_column_defs(vec![ColDef::for_field("x").width(100.0).into()], &EventSource::Api)
            .unwrap();
        let x = model.column("x").unwrap();
        let width_events = Arc::new(AtomicUsize::new(0));
        let counter = width_events.clone();
        x.width_changed.connect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let result = model.set_column_defs(
            vec![
                ColDef::for_field("x").width(300.0).hide(true).into(),
                ColDef::with_id("dup").into(),
                ColDef::with_id("dup").into(),
            ],
            &EventSource::ColumnDefsChanged,
        );
        assert!(matches!(result, Err(Error::DuplicateColumnId(id)) if id == "dup"));

        assert_eq!(x.actual_width(), 100.0);
        assert!(x.is_visible());
        assert_eq!(x.definition().width, Some(100.0));
        assert_eq!(width_events.load(Ordering::SeqCst), 0);
        assert_eq!(ids(&model.displayed_columns(Pinned::None)), vec!["x"]);
        assert_eq!(model.column_defs().len(), 1);
    }

    #[test]
    fn test_direct_entity_changes_refresh_sections() {
        let model = model(vec![
            ColDef::for_field("a").width(100.0).into(),
            ColDef::for_field("b").into(),
            ColGroupDef::new(
                "G",
                vec![
                    ColDef::for_field("open").column_group_show(ColumnGroupShow::Open).into(),
                    ColDef::for_field("closed").column_group_show(ColumnGroupShow::Closed).into(),
                ],
            )
            .into(),
        ]);
        let a = model.column("a").unwrap();

        a.set_visible(false, &EventSource::ToolPanel);
        assert_eq!(ids(&model.displayed_columns(Pinned::None)), vec!["b", "closed"]);
        assert_eq!(a.left(), None);
        assert_eq!(model.column("b").unwrap().left(), Some(0.0));

        model.group("G").unwrap().set_expanded(true, &EventSource::Api);
        assert_eq!(ids(&model.displayed_columns(Pinned::None)), vec!["b", "open"]);

        model.column("b").unwrap().set_pinned(Pinned::Right, &EventSource::UiColumnDragged);
        assert_eq!(ids(&model.displayed_columns(Pinned::Right)), vec!["b"]);
        assert_eq!(ids(&model.all_displayed_columns()), vec!["open", "b"]);

        model.column("open").unwrap().set_actual_width(50.0, &EventSource::UiColumnResized);
        a.set_visible(true, &EventSource::Api);
        assert_eq!(ids(&model.displayed_columns(Pinned::None)), vec!["a", "open"]);
        assert_eq!(model.column("open").unwrap().left(), Some(100.0));
    }

    #[test]
    fn test_replaced_columns_no_longer_refresh_model() {
        let mut model = model(vec![ColDef::for_field("a").into(), ColDef::for_field("b").into()]);
        let b = model.column("b").unwrap();
        assert_eq!(b.visible_changed.connection_count(), 1);

        model
            .set_column_defs(vec![ColDef::for_field("a").into()], &EventSource::ColumnDefsChanged)
            .unwrap();
        assert_eq!(b.visible_changed.connection_count(), 0);
        assert_eq!(model.column("a").unwrap().visible_changed.connection_count(), 1);
    }

    #[test]
    fn test_malformed_type_depends_on_validation_mode() {
        let defs = || definitions_from_json(r#"[{ "field": "a", "type": 5 }]"#).unwrap();

        let lenient = model(defs());
        assert_eq!(lenient.column("a").unwrap().actual_width(), 200.0);

        let mut strict = ColumnModel::new(GridOptions::new().validation(ValidationMode::Strict));
        assert!(matches!(
            strict.set_column_defs(defs(), &EventSource::Api),
            Err(Error::InvalidColumnType { column, value }) if column == "a" && value == "5"
        ));
    }
}
