//! Text rendering of column trees for debugging.

use std::fmt::Write;

use horizon_grid_core::TreeFormatOptions;

use crate::node::{DisplayNode, StructuralNode};
use crate::tree::ColumnTree;

/// Debug utility for visualizing structural and display trees.
///
/// # Example
///
/// ```
/// use horizon_grid::{ColDef, ColGroupDef, ColumnDefinition, ColumnTreeDebug, EventSource, GridOptions, TreeBuilder};
///
/// let options = GridOptions::default();
/// let defs: Vec<ColumnDefinition> = vec![ColGroupDef::new("G", vec![ColDef::for_field("a").into()]).into()];
/// let tree = TreeBuilder::new(&options)
///     .unwrap()
///     .build(&defs, true, None, &EventSource::Api)
///     .unwrap()
///     .tree;
///
/// let text = ColumnTreeDebug::new().format_tree(&tree);
/// assert!(text.contains("G"));
/// assert!(text.contains("A"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ColumnTreeDebug {
    options: TreeFormatOptions,
}

impl ColumnTreeDebug {
    /// Create a visualizer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a visualizer with custom options.
    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Format a structural tree, headed by its depth.
    pub fn format_tree(&self, tree: &ColumnTree) -> String {
        let mut output = format!("Column Tree (depth {}):\n", tree.depth);
        if tree.is_empty() {
            output.push_str("  (empty)\n");
        }
        self.format_structural_nodes(&tree.tree, 0, &mut output);
        output
    }

    /// Format structural nodes without a header.
    pub fn format_structural(&self, nodes: &[StructuralNode]) -> String {
        let mut output = String::new();
        self.format_structural_nodes(nodes, 0, &mut output);
        output
    }

    /// Format a display tree, showing only displayed children.
    pub fn format_display(&self, nodes: &[DisplayNode]) -> String {
        let mut output = String::new();
        self.format_display_nodes(nodes, 0, &mut output);
        output
    }

    fn too_deep(&self, depth: usize) -> bool {
        self.options.max_depth.is_some_and(|max| depth > max)
    }

    fn format_structural_nodes(&self, nodes: &[StructuralNode], depth: usize, output: &mut String) {
        if self.too_deep(depth) {
            return;
        }

        let count = nodes.len();
        for (i, node) in nodes.iter().enumerate() {
            let is_last = i + 1 == count;
            match node {
                StructuralNode::Column(column) => {
                    let mut line = column.header_name();
                    if self.options.show_ids {
                        let _ = write!(line, " [{}]", column.id());
                    }
                    if !column.is_visible() {
                        line.push_str(" (hidden)");
                    }
                    self.push_line(depth, is_last, &line, output);
                }
                StructuralNode::Group(group) if group.is_padding() && !self.options.show_padding => {
                    self.format_structural_nodes(&group.children(), depth, output);
                }
                StructuralNode::Group(group) => {
                    let mut line = if group.is_padding() {
                        "(padding)".to_string()
                    } else {
                        group.header_name().unwrap_or_else(|| group.group_id().to_string())
                    };
                    if self.options.show_ids {
                        let _ = write!(line, " [{}]", group.group_id());
                    }
                    if self.options.show_levels {
                        let _ = write!(line, " level={}", group.level());
                    }
                    if group.is_expandable() {
                        line.push_str(if group.is_expanded() { " (open)" } else { " (closed)" });
                    }
                    self.push_line(depth, is_last, &line, output);
                    self.format_structural_nodes(&group.children(), depth + 1, output);
                }
            }
        }
    }

    fn format_display_nodes(&self, nodes: &[DisplayNode], depth: usize, output: &mut String) {
        if self.too_deep(depth) {
            return;
        }

        let count = nodes.len();
        for (i, node) in nodes.iter().enumerate() {
            let is_last = i + 1 == count;
            match node {
                DisplayNode::Column(column) => {
                    let mut line = column.header_name();
                    if self.options.show_ids {
                        let _ = write!(line, " [{}]", column.id());
                    }
                    if let Some(left) = column.left() {
                        let _ = write!(line, " @{left}");
                    }
                    self.push_line(depth, is_last, &line, output);
                }
                DisplayNode::Group(group) if group.is_padding() && !self.options.show_padding => {
                    self.format_display_nodes(&group.displayed_children(), depth, output);
                }
                DisplayNode::Group(group) => {
                    let provided = group.provided_group();
                    let mut line = if group.is_padding() {
                        "(padding)".to_string()
                    } else {
                        provided.header_name().unwrap_or_else(|| group.group_id().to_string())
                    };
                    if self.options.show_ids {
                        let _ = write!(line, " [{}]", group.unique_id());
                    }
                    if self.options.show_levels {
                        let _ = write!(line, " level={}", provided.level());
                    }
                    self.push_line(depth, is_last, &line, output);
                    self.format_display_nodes(&group.displayed_children(), depth + 1, output);
                }
            }
        }
    }

    fn push_line(&self, depth: usize, is_last: bool, text: &str, output: &mut String) {
        output.push_str(&self.options.prefix(depth, is_last));
        output.push_str(text);
        output.push('\n');
    }
}
