//! Logging and debugging facilities for Horizon Grid.
//!
//! This module provides:
//! - Target names for filtering the `tracing` output of each subsystem
//! - Performance tracing hooks for profiling tree rebuilds
//! - Shared formatting options for text renderings of column trees
//!
//! # Tracing Integration
//!
//! Horizon Grid uses the `tracing` crate for instrumentation. Configuration
//! warnings (unknown column types, duplicate ids, ...) are reported as `warn`
//! events, so they only become visible once a subscriber is installed:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("horizon_grid=debug")
//!         .init();
//! }
//! ```

/// `tracing` targets, one per subsystem.
///
/// Filter with e.g. `RUST_LOG=horizon_grid::tree=debug`.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_grid_core::signal";
    /// Tree builder, balancing and reconciliation.
    pub const TREE: &str = "horizon_grid::tree";
    /// Column entity target.
    pub const COLUMN: &str = "horizon_grid::column";
    /// Structural group target.
    pub const GROUP: &str = "horizon_grid::group";
    /// Display tree target.
    pub const DISPLAY: &str = "horizon_grid::display";
    /// Column model facade target.
    pub const MODEL: &str = "horizon_grid::model";
    /// Performance spans.
    pub const PERF: &str = "horizon_grid::perf";
}

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Compact single-line representation.
    Compact,
}

/// Configuration for tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// Branch characters.
    pub style: TreeStyle,
    /// Whether to show node ids next to display names.
    pub show_ids: bool,
    /// Whether to show nesting levels.
    pub show_levels: bool,
    /// Whether to show padding groups (their children are shown either way).
    pub show_padding: bool,
    /// Nodes deeper than this are not printed.
    pub max_depth: Option<usize>,
    /// Spaces after each branch character.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: true,
            show_levels: false,
            show_padding: true,
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Ids and levels.
    pub fn detailed() -> Self {
        Self {
            show_levels: true,
            ..Default::default()
        }
    }

    /// Header names only, padding flattened.
    pub fn minimal() -> Self {
        Self {
            show_ids: false,
            show_levels: false,
            show_padding: false,
            ..Default::default()
        }
    }

    /// Build the prefix string for a tree node at `depth`.
    pub fn prefix(&self, depth: usize, is_last: bool) -> String {
        if depth == 0 {
            return String::new();
        }

        let (branch, corner, last) = match self.style {
            TreeStyle::Ascii => ("|", "+-- ", "`-- "),
            TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500} ", "\u{2514}\u{2500}\u{2500} "),
            TreeStyle::Compact => ("", "- ", "- "),
        };

        let mut prefix = String::new();
        for _ in 0..(depth - 1) {
            prefix.push_str(branch);
            for _ in 0..self.indent_size {
                prefix.push(' ');
            }
        }
        prefix.push_str(if is_last { last } else { corner });
        prefix
    }
}

/// A guard that keeps a tracing span entered until dropped.
///
/// This is useful for tracking the duration of operations such as a full
/// column tree rebuild.
#[derive(Debug)]
pub struct PerfSpan {
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Metadata of the underlying span, if it is enabled.
    pub fn metadata(&self) -> Option<&'static tracing::Metadata<'static>> {
        self.span.metadata()
    }

    /// Enter a span named after `name` on the perf target.
    ///
    /// It stays entered until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: targets::PERF, "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_root_is_empty() {
        let options = TreeFormatOptions::default();
        assert_eq!(options.prefix(0, true), "");
    }

    #[test]
    fn test_prefix_ascii() {
        let options = TreeFormatOptions {
            style: TreeStyle::Ascii,
            ..Default::default()
        };
        assert_eq!(options.prefix(1, false), "+-- ");
        assert_eq!(options.prefix(1, true), "`-- ");
        assert_eq!(options.prefix(2, true), "|  `-- ");
    }

    #[test]
    fn test_minimal_hides_ids() {
        let options = TreeFormatOptions::minimal();
        assert!(!options.show_ids);
        assert!(!options.show_padding);
    }

    #[test]
    fn test_perf_span_uses_perf_target() {
        let subscriber = tracing_subscriber::fmt().with_test_writer().finish();
        tracing::subscriber::with_default(subscriber, || {
            let span = PerfSpan::new("build_column_tree");
            let target = span.metadata().map(|meta| meta.target());
            assert_eq!(target, Some(targets::PERF));
        });
    }
}
