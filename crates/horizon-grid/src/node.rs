//! Tree node variants.
//!
//! The structural tree and the display trees are both heterogeneous: a node is
//! either a leaf [`Column`] or a group. Each tree gets its own closed enum so
//! traversal is a single exhaustive `match`.

use std::sync::Arc;

use crate::column::Column;
use crate::definition::ColumnGroupShow;
use crate::group::{DisplayGroup, StructuralGroup};
use crate::tree::walker::{walk_displayed, walk_structural};

/// A node of the structural tree.
#[derive(Debug, Clone)]
pub enum StructuralNode {
    Column(Arc<Column>),
    Group(Arc<StructuralGroup>),
}

impl StructuralNode {
    /// Column id or group id.
    pub fn id(&self) -> &str {
        match self {
            Self::Column(column) => column.id(),
            Self::Group(group) => group.group_id(),
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }

    pub fn as_column(&self) -> Option<&Arc<Column>> {
        match self {
            Self::Column(column) => Some(column),
            Self::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&Arc<StructuralGroup>> {
        match self {
            Self::Group(group) => Some(group),
            Self::Column(_) => None,
        }
    }

    /// Returns `true` for padding groups.
    pub fn is_padding(&self) -> bool {
        matches!(self, Self::Group(group) if group.is_padding())
    }

    /// A column is visible if it is shown; a group if any of its leaves is.
    pub fn is_visible(&self) -> bool {
        match self {
            Self::Column(column) => column.is_visible(),
            Self::Group(group) => group.is_visible(),
        }
    }

    pub fn column_group_show(&self) -> Option<ColumnGroupShow> {
        match self {
            Self::Column(column) => column.column_group_show(),
            Self::Group(group) => group.column_group_show(),
        }
    }

    pub fn original_parent(&self) -> Option<Arc<StructuralGroup>> {
        match self {
            Self::Column(column) => column.original_parent(),
            Self::Group(group) => group.original_parent(),
        }
    }

    pub(crate) fn set_original_parent(&self, parent: Option<&Arc<StructuralGroup>>) {
        match self {
            Self::Column(column) => column.set_original_parent(parent),
            Self::Group(group) => group.set_original_parent(parent),
        }
    }

    /// Append every leaf column under this node, in order.
    pub fn collect_leaf_columns(&self, out: &mut Vec<Arc<Column>>) {
        walk_structural(std::slice::from_ref(self), |node, _| {
            if let Self::Column(column) = node {
                out.push(column.clone());
            }
        });
    }

    /// Returns `true` if both values refer to the same node.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Column(a), Self::Column(b)) => Arc::ptr_eq(a, b),
            (Self::Group(a), Self::Group(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<Arc<Column>> for StructuralNode {
    fn from(column: Arc<Column>) -> Self {
        Self::Column(column)
    }
}

impl From<Arc<StructuralGroup>> for StructuralNode {
    fn from(group: Arc<StructuralGroup>) -> Self {
        Self::Group(group)
    }
}

/// A node of a display tree.
#[derive(Debug, Clone)]
pub enum DisplayNode {
    Column(Arc<Column>),
    Group(Arc<DisplayGroup>),
}

impl DisplayNode {
    /// Column id or the display group's composite id.
    pub fn unique_id(&self) -> &str {
        match self {
            Self::Column(column) => column.id(),
            Self::Group(group) => group.unique_id(),
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }

    pub fn as_column(&self) -> Option<&Arc<Column>> {
        match self {
            Self::Column(column) => Some(column),
            Self::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&Arc<DisplayGroup>> {
        match self {
            Self::Group(group) => Some(group),
            Self::Column(_) => None,
        }
    }

    /// Show policy of the underlying column or structural group.
    pub fn column_group_show(&self) -> Option<ColumnGroupShow> {
        match self {
            Self::Column(column) => column.column_group_show(),
            Self::Group(group) => group.provided_group().column_group_show(),
        }
    }

    /// Column width, or the sum of a group's displayed children.
    pub fn actual_width(&self) -> f32 {
        match self {
            Self::Column(column) => column.actual_width(),
            Self::Group(group) => group.actual_width(),
        }
    }

    pub fn left(&self) -> Option<f32> {
        match self {
            Self::Column(column) => column.left(),
            Self::Group(group) => group.left(),
        }
    }

    pub fn display_parent(&self) -> Option<Arc<DisplayGroup>> {
        match self {
            Self::Column(column) => column.display_parent(),
            Self::Group(group) => group.display_parent(),
        }
    }

    pub(crate) fn set_display_parent(&self, parent: Option<&Arc<DisplayGroup>>) {
        match self {
            Self::Column(column) => column.set_display_parent(parent),
            Self::Group(group) => group.set_display_parent(parent),
        }
    }

    /// The structural parent this node is grouped under.
    pub fn original_parent(&self) -> Option<Arc<StructuralGroup>> {
        match self {
            Self::Column(column) => column.original_parent(),
            Self::Group(group) => group.provided_group().original_parent(),
        }
    }

    /// Returns `true` for a group with nothing displayed.
    pub fn is_empty_group(&self) -> bool {
        matches!(self, Self::Group(group) if group.displayed_children().is_empty())
    }

    /// Append every displayed leaf column under this node, in order.
    pub fn collect_displayed_leaf_columns(&self, out: &mut Vec<Arc<Column>>) {
        walk_displayed(std::slice::from_ref(self), |node| {
            if let Self::Column(column) = node {
                out.push(column.clone());
            }
        });
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Column(a), Self::Column(b)) => Arc::ptr_eq(a, b),
            (Self::Group(a), Self::Group(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<Arc<Column>> for DisplayNode {
    fn from(column: Arc<Column>) -> Self {
        Self::Column(column)
    }
}

impl From<Arc<DisplayGroup>> for DisplayNode {
    fn from(group: Arc<DisplayGroup>) -> Self {
        Self::Group(group)
    }
}
