//! Grid-wide options consumed by the column tree model.
//!
//! [`GridOptions`] carries everything the tree builder reads besides the
//! definition list itself: default definitions, named column presets, width
//! fallbacks and the validation policy for configuration problems.
//!
//! # Example
//!
//! ```
//! use horizon_grid::{ColDef, GridOptions, ValidationMode};
//!
//! let options = GridOptions::new()
//!     .default_col_def(ColDef::new().min_width(40.0))
//!     .column_type("currency", ColDef::new().width(110.0))
//!     .validation(ValidationMode::Strict);
//!
//! assert_eq!(options.default_col_width, 200.0);
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::definition::{Alignment, ColDef, ColGroupDef};
use crate::error::{Error, Result};

/// Fallback minimum column width.
pub const DEFAULT_MIN_COL_WIDTH: f32 = 20.0;
/// Fallback column width when a definition specifies none.
pub const DEFAULT_COL_WIDTH: f32 = 200.0;

/// Built-in column type that right-aligns header and cells.
pub const NUMERIC_COLUMN_TYPE: &str = "numericColumn";
/// Built-in column type that right-aligns header and cells.
pub const RIGHT_ALIGNED_COLUMN_TYPE: &str = "rightAligned";

/// How configuration problems are handled while building a tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Log a warning and continue with the nearest fallback.
    #[default]
    Lenient,
    /// Abort the build with the corresponding [`Error`].
    Strict,
}

impl ValidationMode {
    /// Apply this policy to a configuration problem.
    pub fn report(self, err: Error) -> Result<()> {
        match self {
            Self::Strict => Err(err),
            Self::Lenient => {
                err.warn();
                Ok(())
            }
        }
    }
}

/// How auto-generated grouping columns are laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupDisplayType {
    /// One grouping column for all row-group levels.
    #[default]
    SingleColumn,
    /// One grouping column per row-grouped column.
    MultipleColumns,
}

/// Grid-wide options read by the column tree model.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridOptions {
    /// Definition merged under every column.
    pub default_col_def: ColDef,
    /// Definition merged under every group, padding groups included.
    pub default_col_group_def: ColGroupDef,
    /// Named presets referenced by `ColDef::col_type`.
    pub column_types: BTreeMap<String, ColDef>,
    /// Minimum width used when a column does not declare one.
    pub min_col_width: f32,
    /// Maximum width used when a column does not declare one.
    pub max_col_width: f32,
    /// Width used when a column declares neither `width` nor `initial_width`.
    pub default_col_width: f32,
    /// Policy for configuration problems.
    pub validation: ValidationMode,
    /// Definition merged over auto-generated grouping columns.
    pub auto_group_col_def: Option<ColDef>,
    /// Layout of auto-generated grouping columns.
    pub group_display_type: GroupDisplayType,
    /// Lay out left positions right-to-left.
    pub rtl: bool,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            default_col_def: ColDef::default(),
            default_col_group_def: ColGroupDef::default(),
            column_types: BTreeMap::new(),
            min_col_width: DEFAULT_MIN_COL_WIDTH,
            max_col_width: f32::MAX,
            default_col_width: DEFAULT_COL_WIDTH,
            validation: ValidationMode::default(),
            auto_group_col_def: None,
            group_display_type: GroupDisplayType::default(),
            rtl: false,
        }
    }
}

impl GridOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from JSON; absent keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the default column definition.
    pub fn default_col_def(mut self, def: ColDef) -> Self {
        self.default_col_def = def;
        self
    }

    /// Set the default group definition.
    pub fn default_col_group_def(mut self, def: ColGroupDef) -> Self {
        self.default_col_group_def = def;
        self
    }

    /// Register a named column preset.
    pub fn column_type(mut self, name: impl Into<String>, def: ColDef) -> Self {
        self.column_types.insert(name.into(), def);
        self
    }

    /// Set the fallback minimum width.
    pub fn min_col_width(mut self, width: f32) -> Self {
        self.min_col_width = width;
        self
    }

    /// Set the fallback maximum width.
    pub fn max_col_width(mut self, width: f32) -> Self {
        self.max_col_width = width;
        self
    }

    /// Set the fallback column width.
    pub fn default_col_width(mut self, width: f32) -> Self {
        self.default_col_width = width;
        self
    }

    /// Set the validation policy.
    pub fn validation(mut self, mode: ValidationMode) -> Self {
        self.validation = mode;
        self
    }

    /// Set the definition merged over auto-generated grouping columns.
    pub fn auto_group_col_def(mut self, def: ColDef) -> Self {
        self.auto_group_col_def = Some(def);
        self
    }

    /// Set the layout of auto-generated grouping columns.
    pub fn group_display_type(mut self, display_type: GroupDisplayType) -> Self {
        self.group_display_type = display_type;
        self
    }

    /// Lay out left positions right-to-left.
    pub fn rtl(mut self, rtl: bool) -> Self {
        self.rtl = rtl;
        self
    }

    /// Resolve the preset table: built-ins first, then user presets.
    ///
    /// User presets that shadow a built-in, or that themselves reference other
    /// presets, are reported through the validation policy.
    pub(crate) fn resolved_column_types(&self) -> Result<BTreeMap<String, ColDef>> {
        let right_aligned = ColDef {
            cell_align: Some(Alignment::Right),
            header_align: Some(Alignment::Right),
            ..Default::default()
        };
        let mut types = BTreeMap::new();
        types.insert(NUMERIC_COLUMN_TYPE.to_string(), right_aligned.clone());
        types.insert(RIGHT_ALIGNED_COLUMN_TYPE.to_string(), right_aligned);

        for (name, def) in &self.column_types {
            if types.contains_key(name) {
                self.validation
                    .report(Error::ColumnTypeOverridesBuiltin(name.clone()))?;
                continue;
            }
            let mut def = def.clone();
            if def.col_type.take().is_some() {
                self.validation.report(Error::NestedColumnType(name.clone()))?;
            }
            types.insert(name.clone(), def);
        }
        Ok(types)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_defaults() {
        let options = GridOptions::default();
        assert_eq!(options.min_col_width, DEFAULT_MIN_COL_WIDTH);
        assert_eq!(options.max_col_width, f32::MAX);
        assert_eq!(options.validation, ValidationMode::Lenient);
        assert!(!options.rtl);
    }

    #[test]
    fn test_from_json_keeps_missing_defaults() {
        let options = GridOptions::from_json(
            r#"{ "minColWidth": 30, "columnTypes": { "wide": { "width": 400 } }, "validation": "strict" }"#,
        )
        .unwrap();
        assert_eq!(options.min_col_width, 30.0);
        assert_eq!(options.default_col_width, DEFAULT_COL_WIDTH);
        assert_eq!(options.validation, ValidationMode::Strict);
        assert_eq!(options.column_types["wide"].width, Some(400.0));
    }

    #[test]
    fn test_builtin_types_cannot_be_overridden() {
        let lenient = GridOptions::new().column_type(NUMERIC_COLUMN_TYPE, ColDef::new().width(1.0));
        let types = lenient.resolved_column_types().unwrap();
        assert_eq!(types[NUMERIC_COLUMN_TYPE].width, None);
        assert_eq!(types[NUMERIC_COLUMN_TYPE].cell_align, Some(Alignment::Right));

        let strict = lenient.validation(ValidationMode::Strict);
        assert!(matches!(
            strict.resolved_column_types(),
            Err(Error::ColumnTypeOverridesBuiltin(name)) if name == NUMERIC_COLUMN_TYPE
        ));
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_lenient_warning_carries_fields() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            ValidationMode::Lenient
                .report(Error::unknown_column_type("price", "currency"))
                .unwrap();
            ValidationMode::Lenient
                .report(Error::DuplicateGroupId("athlete".into()))
                .unwrap();
        });

        let output = String::from_utf8(captured.0.lock().clone()).unwrap();
        assert!(output.contains("WARN"));
        assert!(output.contains("column=price"));
        assert!(output.contains("type_name=currency"));
        assert!(output.contains("group=athlete"));
    }

    #[test]
    fn test_nested_type_reference_is_dropped() {
        let options = GridOptions::new().column_type("a", ColDef::new().col_type("b").width(10.0));
        let types = options.resolved_column_types().unwrap();
        assert_eq!(types["a"].col_type, None);
        assert_eq!(types["a"].width, Some(10.0));
    }
}
