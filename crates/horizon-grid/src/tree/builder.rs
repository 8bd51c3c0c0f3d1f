//! Building balanced structural trees from definitions.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use horizon_grid_core::PerfSpan;
use horizon_grid_core::logging::targets;

use crate::column::Column;
use crate::definition::{ColDef, ColGroupDef, ColumnDefinition, ColumnType};
use crate::error::{Error, Result};
use crate::events::EventSource;
use crate::group::StructuralGroup;
use crate::id_allocator::IdAllocator;
use crate::node::StructuralNode;
use crate::options::GridOptions;

use super::ColumnTree;
use super::walker::{walk_structural, walk_structural_depth};

/// Result of a build: the new tree plus the previous tree's columns that no
/// definition claimed.
#[derive(Debug, Default)]
pub struct BuildOutcome {
    pub tree: ColumnTree,
    pub unmatched: Vec<Arc<Column>>,
    pub created: usize,
    pub reused: usize,
}

/// A reused column and the definitions it takes on once the build succeeds.
struct PendingUpdate {
    column: Arc<Column>,
    merged: ColDef,
    user_def: Arc<ColDef>,
}

/// Builds a balanced [`ColumnTree`] from a definition list.
///
/// The build runs in phases:
///
/// 1. collect columns and groups of the previous tree for reconciliation
/// 2. build the unbalanced tree, reusing matched columns
/// 3. find the deepest leaf
/// 4. insert padding groups so every leaf reaches that depth
/// 5. compute expandability and link parents
///
/// Parents are linked only in the last phase because balancing inserts new
/// ancestors. Reused columns are left untouched until phase 2 has finished
/// without error, so a rejected build changes nothing observable.
///
/// # Example
///
/// ```
/// use horizon_grid::{ColDef, ColGroupDef, ColumnDefinition, EventSource, GridOptions, TreeBuilder};
///
/// let options = GridOptions::default();
/// let defs: Vec<ColumnDefinition> = vec![
///     ColGroupDef::new("G", vec![ColDef::for_field("a").into(), ColDef::for_field("b").into()]).into(),
///     ColDef::for_field("c").into(),
/// ];
///
/// let outcome = TreeBuilder::new(&options)
///     .unwrap()
///     .build(&defs, true, None, &EventSource::GridInitializing)
///     .unwrap();
/// assert_eq!(outcome.tree.depth, 2);
/// ```
pub struct TreeBuilder<'a> {
    options: &'a GridOptions,
    column_types: BTreeMap<String, ColDef>,
    default_group_def: ColGroupDef,
    allocator: IdAllocator,
    existing_columns: Vec<Arc<Column>>,
    existing_groups: Vec<Arc<StructuralGroup>>,
    declared_column_ids: HashSet<String>,
    declared_group_ids: HashSet<String>,
    pending: Vec<PendingUpdate>,
    created: usize,
    reused: usize,
}

impl<'a> TreeBuilder<'a> {
    /// Create a builder, resolving the column type table up front.
    pub fn new(options: &'a GridOptions) -> Result<Self> {
        Ok(Self {
            options,
            column_types: options.resolved_column_types()?,
            default_group_def: options.default_col_group_def.merged_with(&ColGroupDef::default()),
            allocator: IdAllocator::new(),
            existing_columns: Vec::new(),
            existing_groups: Vec::new(),
            declared_column_ids: HashSet::new(),
            declared_group_ids: HashSet::new(),
            pending: Vec::new(),
            created: 0,
            reused: 0,
        })
    }

    /// Build a tree, reconciling against `existing` when given.
    pub fn build(
        mut self,
        defs: &[ColumnDefinition],
        primary: bool,
        existing: Option<&ColumnTree>,
        source: &EventSource,
    ) -> Result<BuildOutcome> {
        let _span = PerfSpan::new("build_column_tree");

        if let Some(existing) = existing {
            self.extract_existing(existing);
        }

        let unbalanced = self.create_nodes(defs, 0, primary, source)?;
        self.apply_pending(source);

        let max_level = find_max_level(&unbalanced);
        let tree = self.balance(unbalanced, 0, max_level);
        finalize(&tree);

        let depth = if tree.is_empty() { 0 } else { max_level + 1 };
        let tree = ColumnTree::new(tree, depth);

        tracing::debug!(
            target: targets::TREE,
            columns = tree.leaf_columns().len(),
            depth,
            created = self.created,
            reused = self.reused,
            unmatched = self.existing_columns.len(),
            "built column tree"
        );

        Ok(BuildOutcome {
            tree,
            unmatched: self.existing_columns,
            created: self.created,
            reused: self.reused,
        })
    }

    fn apply_pending(&mut self, source: &EventSource) {
        for update in self.pending.drain(..) {
            let PendingUpdate { column, merged, user_def } = update;
            column.set_definition(merged.clone(), Some(user_def), self.options, source);
            column.apply_definition_state(&merged, source);
        }
    }

    fn extract_existing(&mut self, existing: &ColumnTree) {
        self.existing_groups = existing.groups();
        self.existing_columns = existing.leaf_columns();
        self.allocator
            .reserve(self.existing_columns.iter().map(|c| c.id().to_string()));
    }

    fn create_nodes(
        &mut self,
        defs: &[ColumnDefinition],
        level: usize,
        primary: bool,
        source: &EventSource,
    ) -> Result<Vec<StructuralNode>> {
        let mut nodes = Vec::with_capacity(defs.len());
        for def in defs {
            let node = match def {
                ColumnDefinition::Group(group_def) => {
                    StructuralNode::Group(self.create_group(group_def, level, primary, source)?)
                }
                ColumnDefinition::Column(col_def) => {
                    StructuralNode::Column(self.create_column(col_def, primary)?)
                }
            };
            nodes.push(node);
        }
        Ok(nodes)
    }

    fn create_group(
        &mut self,
        user_def: &Arc<ColGroupDef>,
        level: usize,
        primary: bool,
        source: &EventSource,
    ) -> Result<Arc<StructuralGroup>> {
        let merged = self.options.default_col_group_def.merged_with(user_def);

        if let Some(declared) = user_def.group_id.as_deref() {
            if !self.declared_group_ids.insert(declared.to_string()) {
                self.options
                    .validation
                    .report(Error::DuplicateGroupId(declared.to_string()))?;
            }
        }

        let group_id = self.allocator.issue(merged.group_id.as_deref(), None);
        let previous = self.take_existing_group(user_def);
        let children = self.create_nodes(&user_def.children, level + 1, primary, source)?;

        let group = StructuralGroup::new(
            group_id,
            level,
            false,
            merged,
            Some(user_def.clone()),
            children,
        );
        if let Some(previous) = previous {
            group.set_expanded(previous.is_expanded(), source);
        }
        Ok(group)
    }

    fn take_existing_group(&mut self, user_def: &ColGroupDef) -> Option<Arc<StructuralGroup>> {
        let group_id = user_def.group_id.as_deref()?;
        let index = self.existing_groups.iter().position(|group| {
            group
                .user_definition()
                .is_some_and(|def| def.group_id.as_deref() == Some(group_id))
        })?;
        Some(self.existing_groups.remove(index))
    }

    fn create_column(&mut self, user_def: &Arc<ColDef>, primary: bool) -> Result<Arc<Column>> {
        let merged = self.merged_col_def(user_def)?;

        if let Some(declared) = user_def.col_id.as_deref() {
            if !self.declared_column_ids.insert(declared.to_string()) {
                self.options
                    .validation
                    .report(Error::DuplicateColumnId(declared.to_string()))?;
            }
        }

        if let Some(existing) = self.take_existing_column(user_def) {
            tracing::trace!(target: targets::TREE, column = %existing.id(), "reusing column");
            self.check_width_bounds(existing.id(), &merged)?;
            self.pending.push(PendingUpdate {
                column: existing.clone(),
                merged,
                user_def: user_def.clone(),
            });
            self.reused += 1;
            return Ok(existing);
        }

        let id = self
            .allocator
            .issue(merged.col_id.as_deref(), merged.field.as_deref());
        self.check_width_bounds(&id, &merged)?;
        tracing::trace!(target: targets::TREE, column = %id, "creating column");
        self.created += 1;
        Ok(Column::new(id, merged, Some(user_def.clone()), primary, self.options))
    }

    /// Find a previous column for a definition: by explicit id, else by the
    /// user-supplied field, else by definition identity.
    fn take_existing_column(&mut self, user_def: &Arc<ColDef>) -> Option<Arc<Column>> {
        let index = self.existing_columns.iter().position(|column| {
            let Some(existing_def) = column.user_definition() else {
                return false;
            };
            if let Some(col_id) = user_def.col_id.as_deref() {
                return column.id() == col_id;
            }
            if let Some(field) = user_def.field.as_deref() {
                return existing_def.field.as_deref() == Some(field);
            }
            Arc::ptr_eq(&existing_def, user_def)
        })?;
        Some(self.existing_columns.remove(index))
    }

    /// Merge defaults, then type presets, then the user definition.
    fn merged_col_def(&self, user_def: &ColDef) -> Result<ColDef> {
        let defaults = &self.options.default_col_def;
        let mut merged = defaults.clone();

        let col_type = user_def.col_type.as_ref().or(defaults.col_type.as_ref());
        if let Some(col_type) = col_type {
            let column = user_def
                .col_id
                .as_deref()
                .or(user_def.field.as_deref())
                .unwrap_or("<anonymous>");
            if let ColumnType::Invalid(value) = col_type {
                self.options.validation.report(Error::InvalidColumnType {
                    column: column.to_string(),
                    value: value.to_string(),
                })?;
            }
            for name in col_type.names() {
                if name.is_empty() {
                    self.options.validation.report(Error::InvalidColumnType {
                        column: column.to_string(),
                        value: format!("{col_type:?}"),
                    })?;
                    continue;
                }
                match self.column_types.get(&name) {
                    Some(preset) => merged = merged.merged_with(preset),
                    None => self
                        .options
                        .validation
                        .report(Error::unknown_column_type(column, name))?,
                }
            }
        }

        Ok(merged.merged_with(user_def))
    }

    fn check_width_bounds(&self, column: &str, merged: &ColDef) -> Result<()> {
        let min = merged.min_width.unwrap_or(self.options.min_col_width);
        let max = merged.max_width.unwrap_or(self.options.max_col_width);
        if min > max {
            self.options
                .validation
                .report(Error::invalid_width_bounds(column, min, max))?;
        }
        Ok(())
    }

    /// Pad shallow columns down to `max_level`.
    ///
    /// Among sibling groups each shallow column gets its own padding chain;
    /// a list of only columns is wrapped by a single chain.
    fn balance(
        &mut self,
        nodes: Vec<StructuralNode>,
        level: usize,
        max_level: usize,
    ) -> Vec<StructuralNode> {
        let has_groups = nodes.iter().any(StructuralNode::is_group);
        let mut result = Vec::with_capacity(nodes.len());

        for (index, node) in nodes.iter().enumerate() {
            match node {
                StructuralNode::Group(group) => {
                    let children = self.balance(group.children(), level + 1, max_level);
                    group.set_children(children);
                    result.push(node.clone());
                }
                StructuralNode::Column(_) if level < max_level => {
                    let wrapped = if has_groups {
                        vec![node.clone()]
                    } else {
                        nodes[index..].to_vec()
                    };
                    result.push(self.padding_chain(wrapped, level, max_level));
                    if !has_groups {
                        break;
                    }
                }
                StructuralNode::Column(_) => result.push(node.clone()),
            }
        }
        result
    }

    /// Padding groups at levels `level..max_level`, innermost holding `children`.
    fn padding_chain(
        &mut self,
        children: Vec<StructuralNode>,
        level: usize,
        max_level: usize,
    ) -> StructuralNode {
        // Issue ids outermost first.
        let ids: Vec<String> = (level..max_level)
            .map(|_| self.allocator.issue(None, None))
            .collect();

        let mut inner = children;
        for (pad_level, id) in (level..max_level).zip(ids).rev() {
            let group = StructuralGroup::new(
                id,
                pad_level,
                true,
                self.default_group_def.clone(),
                None,
                inner,
            );
            inner = vec![StructuralNode::Group(group)];
        }
        // The chain is non-empty because level < max_level.
        inner.swap_remove(0)
    }
}

/// Deepest level reached by any node; a group at depth `d` reaches at least `d + 1`.
fn find_max_level(nodes: &[StructuralNode]) -> usize {
    let mut max_level = 0;
    walk_structural_depth(nodes, |node, depth| {
        let reached = if node.is_group() { depth + 1 } else { depth };
        max_level = max_level.max(reached);
    });
    max_level
}

/// Compute expandability and link every node to its parent.
fn finalize(tree: &[StructuralNode]) {
    walk_structural(tree, |node, parent| {
        if let StructuralNode::Group(group) = node {
            group.setup_expandable();
        }
        node.set_original_parent(parent);
    });
}
