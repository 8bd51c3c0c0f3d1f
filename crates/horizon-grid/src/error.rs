//! Error types for the column tree model.

use horizon_grid_core::logging::targets;

/// Result type alias for column tree operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or mutating a column tree.
///
/// The configuration variants are only returned under
/// [`ValidationMode::Strict`](crate::ValidationMode::Strict); in lenient mode
/// they are logged as warnings and the build continues with a fallback.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A column references a preset that is not defined.
    #[error("column type '{type_name}' used by column '{column}' does not correspond to a defined column type")]
    UnknownColumnType { column: String, type_name: String },

    /// A column type reference is empty or otherwise unusable.
    #[error("column '{column}' has an invalid column type reference '{value}'")]
    InvalidColumnType { column: String, value: String },

    /// A user preset tries to replace a built-in column type.
    #[error("column type '{0}' is a built-in column type and cannot be overridden")]
    ColumnTypeOverridesBuiltin(String),

    /// A preset refers to another preset.
    #[error("column type '{0}' has a 'type' attribute; column types cannot refer to other column types")]
    NestedColumnType(String),

    /// The same explicit column id appears more than once in one definition list.
    #[error("column id '{0}' is declared more than once")]
    DuplicateColumnId(String),

    /// The same explicit group id appears more than once in one definition list.
    #[error("group id '{0}' is declared more than once")]
    DuplicateGroupId(String),

    /// Minimum width exceeds maximum width.
    #[error("column '{column}' has min width {min} greater than max width {max}")]
    InvalidWidthBounds { column: String, min: f32, max: f32 },

    /// No column with the given id exists in the model.
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    /// No structural group with the given id exists in the model.
    #[error("unknown column group '{0}'")]
    UnknownGroup(String),

    /// A tree expected to be balanced has leaves at differing depths.
    #[error("column tree is not balanced: leaf '{column}' sits at depth {found}, expected {expected}")]
    UnbalancedTree {
        column: String,
        expected: usize,
        found: usize,
    },

    /// Column definitions could not be parsed.
    #[error("invalid column definition JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an unknown column type error.
    pub fn unknown_column_type(column: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::UnknownColumnType {
            column: column.into(),
            type_name: type_name.into(),
        }
    }

    /// Create an invalid width bounds error.
    pub fn invalid_width_bounds(column: impl Into<String>, min: f32, max: f32) -> Self {
        Self::InvalidWidthBounds {
            column: column.into(),
            min,
            max,
        }
    }

    /// Log a configuration problem as a `warn` event with its identifying fields.
    pub(crate) fn warn(&self) {
        match self {
            Self::UnknownColumnType { column, type_name } => {
                tracing::warn!(target: targets::TREE, %column, %type_name, "{}", self);
            }
            Self::InvalidColumnType { column, value } => {
                tracing::warn!(target: targets::TREE, %column, type_name = %value, "{}", self);
            }
            Self::ColumnTypeOverridesBuiltin(type_name) | Self::NestedColumnType(type_name) => {
                tracing::warn!(target: targets::TREE, %type_name, "{}", self);
            }
            Self::DuplicateColumnId(column) => {
                tracing::warn!(target: targets::TREE, %column, "{}", self);
            }
            Self::DuplicateGroupId(group) => {
                tracing::warn!(target: targets::TREE, %group, "{}", self);
            }
            Self::InvalidWidthBounds { column, min, max } => {
                tracing::warn!(target: targets::TREE, %column, min, max, "{}", self);
            }
            other => tracing::warn!(target: targets::TREE, "{}", other),
        }
    }

    /// Returns `true` for configuration problems that lenient validation
    /// downgrades to warnings.
    pub fn is_configuration_warning(&self) -> bool {
        matches!(
            self,
            Self::UnknownColumnType { .. }
                | Self::InvalidColumnType { .. }
                | Self::ColumnTypeOverridesBuiltin(_)
                | Self::NestedColumnType(_)
                | Self::DuplicateColumnId(_)
                | Self::DuplicateGroupId(_)
                | Self::InvalidWidthBounds { .. }
        )
    }
}
