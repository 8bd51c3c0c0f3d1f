//! Event payloads emitted by columns and groups.
//!
//! Every payload carries the affected node and an [`EventSource`] naming what
//! triggered the change, so listeners can tell an API call from a drag or the
//! initial build.

use std::fmt;
use std::sync::Arc;

use crate::column::Column;
use crate::group::{DisplayGroup, StructuralGroup};

/// What triggered a change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum EventSource {
    /// A public API call.
    #[default]
    Api,
    /// Initial construction of the grid.
    GridInitializing,
    /// New column definitions were supplied.
    ColumnDefsChanged,
    /// Flex layout distributed space.
    Flex,
    /// The user resized a column header.
    UiColumnResized,
    /// The user dragged a column header.
    UiColumnDragged,
    /// The user moved a column.
    UiColumnMoved,
    /// The columns tool panel.
    ToolPanel,
    /// The column menu.
    ColumnMenu,
    /// The context menu.
    ContextMenu,
    /// Any other origin.
    Custom(String),
}

impl EventSource {
    /// Returns the tag string for this source.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Api => "api",
            Self::GridInitializing => "gridInitializing",
            Self::ColumnDefsChanged => "columnDefsChanged",
            Self::Flex => "flex",
            Self::UiColumnResized => "uiColumnResized",
            Self::UiColumnDragged => "uiColumnDragged",
            Self::UiColumnMoved => "uiColumnMoved",
            Self::ToolPanel => "toolPanelUi",
            Self::ColumnMenu => "columnMenu",
            Self::ContextMenu => "contextMenu",
            Self::Custom(tag) => tag,
        }
    }

    /// Width changes from these sources keep flex active.
    pub(crate) fn keeps_flex(&self) -> bool {
        matches!(self, Self::Flex | Self::GridInitializing)
    }
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for EventSource {
    fn from(tag: &str) -> Self {
        Self::Custom(tag.to_string())
    }
}

/// Payload of every column signal.
#[derive(Debug, Clone)]
pub struct ColumnEvent {
    pub column: Arc<Column>,
    pub source: EventSource,
}

/// Payload of structural group signals.
#[derive(Debug, Clone)]
pub struct GroupEvent {
    pub group: Arc<StructuralGroup>,
    pub source: EventSource,
}

/// Payload of display group signals.
#[derive(Debug, Clone)]
pub struct DisplayGroupEvent {
    pub group: Arc<DisplayGroup>,
    pub source: EventSource,
}
