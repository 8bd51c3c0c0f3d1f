//! Auto-generated grouping columns.
//!
//! When rows are grouped, the grid shows the group hierarchy in generated
//! columns. Those columns are not part of the user's definitions, so to sit
//! in a balanced tree they are wrapped in padding groups matching the depth
//! of the real tree.

use std::sync::Arc;

use horizon_grid_core::logging::targets;

use crate::column::Column;
use crate::definition::{ColDef, ColGroupDef};
use crate::error::Result;
use crate::events::EventSource;
use crate::group::StructuralGroup;
use crate::node::StructuralNode;
use crate::options::{GridOptions, GroupDisplayType};

use super::{ColumnTree, group_depth};

/// Id of the single grouping column.
pub const AUTO_GROUP_COLUMN_ID: &str = "auto-group-column";

/// Id of the grouping column for one row-grouped column.
pub fn auto_group_column_id(row_group_column: Option<&Column>) -> String {
    match row_group_column {
        Some(column) => format!("{AUTO_GROUP_COLUMN_ID}-{}", column.id()),
        None => AUTO_GROUP_COLUMN_ID.to_string(),
    }
}

/// Create the grouping columns for `row_group_columns`.
///
/// With [`GroupDisplayType::SingleColumn`] one column covers every grouping
/// level; with [`GroupDisplayType::MultipleColumns`] each row-grouped column
/// gets its own. Columns in `existing` with a matching id are reused. No
/// columns are created when nothing is grouped.
pub fn create_auto_group_columns(
    row_group_columns: &[Arc<Column>],
    existing: &[Arc<Column>],
    options: &GridOptions,
    source: &EventSource,
) -> Vec<Arc<Column>> {
    if row_group_columns.is_empty() {
        return Vec::new();
    }

    match options.group_display_type {
        GroupDisplayType::SingleColumn => {
            vec![create_one(None, existing, options, source)]
        }
        GroupDisplayType::MultipleColumns => row_group_columns
            .iter()
            .map(|column| create_one(Some(column), existing, options, source))
            .collect(),
    }
}

fn create_one(
    row_group_column: Option<&Arc<Column>>,
    existing: &[Arc<Column>],
    options: &GridOptions,
    source: &EventSource,
) -> Arc<Column> {
    let id = auto_group_column_id(row_group_column.map(Arc::as_ref));

    let mut base = ColDef::with_id(id.clone()).header_name("Group");
    if let Some(column) = row_group_column {
        base.header_name = Some(column.header_name());
    }
    let user = options.auto_group_col_def.clone().unwrap_or_default();
    let mut definition = options
        .default_col_def
        .merged_with(&base)
        .merged_with(&user);
    // The generated id always wins over anything inherited.
    definition.col_id = Some(id.clone());

    if let Some(column) = existing.iter().find(|c| c.id() == id) {
        column.set_definition(definition.clone(), None, options, source);
        column.apply_definition_state(&definition, source);
        return column.clone();
    }

    tracing::debug!(target: targets::TREE, column = %id, "creating auto group column");
    Column::new(id, definition, None, false, options)
}

/// Wrap each grouping column in padding groups matching `tree`'s group depth.
///
/// Returns one root node per column. Fails if `tree` is not balanced.
pub fn balance_tree_for_auto_columns(
    auto_columns: &[Arc<Column>],
    tree: &ColumnTree,
) -> Result<Vec<StructuralNode>> {
    tree.check_balanced()?;
    let depth = group_depth(&tree.tree);

    let roots = auto_columns
        .iter()
        .map(|column| {
            let mut node = StructuralNode::Column(column.clone());
            column.set_original_parent(None);
            for level in (0..depth).rev() {
                let group = StructuralGroup::new(
                    format!("auto-group-path_{}_{level}", column.id()),
                    level,
                    true,
                    ColGroupDef::default(),
                    None,
                    vec![node.clone()],
                );
                node.set_original_parent(Some(&group));
                node = StructuralNode::Group(group);
            }
            node
        })
        .collect();
    Ok(roots)
}
