//! User-supplied column and group definitions.
//!
//! A definition list is an ordered sequence of [`ColumnDefinition`]s, each
//! either a leaf [`ColDef`] or a [`ColGroupDef`] carrying children. Definitions
//! are plain data: the tree builder merges them with grid defaults and presets
//! but never mutates the originals, which are kept behind `Arc` so that
//! reconciliation can fall back to pointer identity.
//!
//! # Tri-state attributes
//!
//! Stateful attributes (`hide`, `sort`, `pinned`, `flex`, ...) use
//! [`Override`], which distinguishes "not mentioned" from "explicitly cleared":
//!
//! | JSON             | Rust                   | Effect on a reused column |
//! |------------------|------------------------|---------------------------|
//! | key absent       | `Override::Inherit`    | left as-is                |
//! | `null`           | `Override::Clear`      | reset to the empty state  |
//! | value            | `Override::Set(value)` | value applied             |
//!
//! # Example
//!
//! ```
//! use horizon_grid::definition::{definitions_from_json, ColumnDefinition};
//!
//! let defs = definitions_from_json(r#"[
//!     { "groupId": "athlete", "children": [{ "field": "name" }, { "field": "age" }] },
//!     { "field": "country", "width": 150 }
//! ]"#).unwrap();
//!
//! assert!(matches!(defs[0], ColumnDefinition::Group(_)));
//! assert!(matches!(defs[1], ColumnDefinition::Column(_)));
//! ```

use std::sync::Arc;

use serde::{Deserialize, Deserializer};

use crate::error::Result;

/// An attribute that may be left alone, cleared, or set.
#[derive(Debug, Clone, PartialEq)]
pub enum Override<T> {
    /// Not specified; keep whatever is already there.
    Inherit,
    /// Explicitly cleared (`null`).
    Clear,
    /// Explicit value.
    Set(T),
}

impl<T> Override<T> {
    /// Returns `true` if the attribute was not specified.
    pub fn is_inherit(&self) -> bool {
        matches!(self, Self::Inherit)
    }

    /// Returns the explicit value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Set(value) => Some(value),
            _ => None,
        }
    }

    /// Returns `self` unless it is `Inherit`, in which case `fallback` is used.
    pub fn or(self, fallback: Override<T>) -> Override<T> {
        match self {
            Self::Inherit => fallback,
            other => other,
        }
    }
}

impl<T> Default for Override<T> {
    fn default() -> Self {
        Self::Inherit
    }
}

impl<T> From<T> for Override<T> {
    fn from(value: T) -> Self {
        Self::Set(value)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Override<T> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Self::Set(value),
            None => Self::Clear,
        })
    }
}

/// Which pinned section a column lives in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pinned {
    /// Not pinned; the column scrolls with the center section.
    #[default]
    None,
    Left,
    Right,
}

impl Pinned {
    /// All three sections, in display order.
    pub const SECTIONS: [Pinned; 3] = [Pinned::Left, Pinned::None, Pinned::Right];

    /// Returns `true` for the left or right section.
    pub fn is_pinned(self) -> bool {
        self != Self::None
    }
}

/// Sort direction of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

/// When a child of a group is shown, relative to the group's expanded state.
///
/// A child without a policy is always shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnGroupShow {
    /// Shown only while the group is expanded.
    Open,
    /// Shown only while the group is collapsed.
    Closed,
}

/// Horizontal alignment hint carried by the built-in column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Right,
}

/// A reference to one or more named column presets.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ColumnType {
    /// One name, or several separated by commas.
    Single(String),
    /// A list of names.
    Multiple(Vec<String>),
    /// Anything else; reported when the definition is merged.
    Invalid(serde_json::Value),
}

impl ColumnType {
    /// Returns the referenced preset names, trimmed, in application order.
    ///
    /// Empty entries are kept as empty strings so callers can report them.
    /// An invalid reference names nothing.
    pub fn names(&self) -> Vec<String> {
        match self {
            Self::Single(names) => names.split(',').map(|n| n.trim().to_string()).collect(),
            Self::Multiple(names) => names.iter().map(|n| n.trim().to_string()).collect(),
            Self::Invalid(_) => Vec::new(),
        }
    }

    /// Returns `true` if the reference is neither a string nor a list of strings.
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }
}

impl From<&str> for ColumnType {
    fn from(name: &str) -> Self {
        Self::Single(name.to_string())
    }
}

impl From<Vec<&str>> for ColumnType {
    fn from(names: Vec<&str>) -> Self {
        Self::Multiple(names.into_iter().map(String::from).collect())
    }
}

/// Definition of a leaf column.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColDef {
    /// Explicit column id; takes precedence over `field` for identity.
    pub col_id: Option<String>,
    /// Field of the row data this column shows.
    pub field: Option<String>,
    /// Header text.
    pub header_name: Option<String>,
    /// Preset name(s) merged under this definition.
    #[serde(rename = "type")]
    pub col_type: Option<ColumnType>,

    pub width: Option<f32>,
    pub initial_width: Option<f32>,
    pub min_width: Option<f32>,
    pub max_width: Option<f32>,
    pub flex: Override<f32>,
    pub initial_flex: Option<f32>,

    pub hide: Override<bool>,
    pub initial_hide: Option<bool>,
    pub pinned: Override<Pinned>,
    pub initial_pinned: Option<Pinned>,
    pub sort: Override<SortDirection>,
    pub initial_sort: Option<SortDirection>,
    pub sort_index: Override<u32>,
    pub initial_sort_index: Option<u32>,

    /// Show policy inside the parent group.
    pub column_group_show: Option<ColumnGroupShow>,

    pub resizable: Option<bool>,
    pub lock_position: Option<bool>,
    pub lock_visible: Option<bool>,
    pub cell_align: Option<Alignment>,
    pub header_align: Option<Alignment>,

    pub row_group: Override<bool>,
    pub initial_row_group: Option<bool>,
    pub pivot: Override<bool>,
    pub initial_pivot: Option<bool>,
    pub agg_func: Override<String>,
    pub initial_agg_func: Option<String>,
}

macro_rules! merge_fields {
    ($base:expr, $top:expr, { $($field:ident),* $(,)? }) => {
        ColDef {
            $($field: $top.$field.clone().or($base.$field.clone()),)*
        }
    };
}

impl ColDef {
    /// Create an empty definition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a definition bound to a row data field.
    pub fn for_field(field: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            ..Default::default()
        }
    }

    /// Create a definition with an explicit column id.
    pub fn with_id(col_id: impl Into<String>) -> Self {
        Self {
            col_id: Some(col_id.into()),
            ..Default::default()
        }
    }

    /// Set the row data field.
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Set the header text.
    pub fn header_name(mut self, name: impl Into<String>) -> Self {
        self.header_name = Some(name.into());
        self
    }

    /// Reference one or more column presets.
    pub fn col_type(mut self, col_type: impl Into<ColumnType>) -> Self {
        self.col_type = Some(col_type.into());
        self
    }

    /// Set the width.
    pub fn width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the width used only when the column is first created.
    pub fn initial_width(mut self, width: f32) -> Self {
        self.initial_width = Some(width);
        self
    }

    /// Set the minimum width.
    pub fn min_width(mut self, width: f32) -> Self {
        self.min_width = Some(width);
        self
    }

    /// Set the maximum width.
    pub fn max_width(mut self, width: f32) -> Self {
        self.max_width = Some(width);
        self
    }

    /// Set the flex weight.
    pub fn flex(mut self, flex: f32) -> Self {
        self.flex = Override::Set(flex);
        self
    }

    /// Hide or show the column.
    pub fn hide(mut self, hide: bool) -> Self {
        self.hide = Override::Set(hide);
        self
    }

    /// Pin the column.
    pub fn pinned(mut self, pinned: Pinned) -> Self {
        self.pinned = Override::Set(pinned);
        self
    }

    /// Sort the column.
    pub fn sort(mut self, sort: SortDirection) -> Self {
        self.sort = Override::Set(sort);
        self
    }

    /// Set the sort priority.
    pub fn sort_index(mut self, index: u32) -> Self {
        self.sort_index = Override::Set(index);
        self
    }

    /// Set the show policy inside the parent group.
    pub fn column_group_show(mut self, show: ColumnGroupShow) -> Self {
        self.column_group_show = Some(show);
        self
    }

    /// Overlay `top` on this definition; every attribute `top` specifies wins.
    pub fn merged_with(&self, top: &ColDef) -> ColDef {
        merge_fields!(self, top, {
            col_id, field, header_name, col_type,
            width, initial_width, min_width, max_width, flex, initial_flex,
            hide, initial_hide, pinned, initial_pinned,
            sort, initial_sort, sort_index, initial_sort_index,
            column_group_show, resizable, lock_position, lock_visible,
            cell_align, header_align,
            row_group, initial_row_group, pivot, initial_pivot,
            agg_func, initial_agg_func,
        })
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<ColumnDefinition>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<ColumnDefinition>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Definition of a column group.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColGroupDef {
    /// Explicit group id.
    pub group_id: Option<String>,
    /// Header text.
    pub header_name: Option<String>,
    /// Child columns and groups, in display order.
    #[serde(deserialize_with = "null_as_empty")]
    pub children: Vec<ColumnDefinition>,
    /// Whether the group starts expanded.
    pub open_by_default: Option<bool>,
    /// Show policy inside the parent group.
    pub column_group_show: Option<ColumnGroupShow>,
    /// Keep the group's children adjacent when columns move.
    pub marry_children: Option<bool>,
}

impl ColGroupDef {
    /// Create a group definition with an explicit id.
    pub fn new(group_id: impl Into<String>, children: Vec<ColumnDefinition>) -> Self {
        Self {
            group_id: Some(group_id.into()),
            children,
            ..Default::default()
        }
    }

    /// Create a group definition without an id.
    pub fn anonymous(children: Vec<ColumnDefinition>) -> Self {
        Self {
            children,
            ..Default::default()
        }
    }

    /// Set the header text.
    pub fn header_name(mut self, name: impl Into<String>) -> Self {
        self.header_name = Some(name.into());
        self
    }

    /// Start the group expanded.
    pub fn open_by_default(mut self, open: bool) -> Self {
        self.open_by_default = Some(open);
        self
    }

    /// Set the show policy inside the parent group.
    pub fn column_group_show(mut self, show: ColumnGroupShow) -> Self {
        self.column_group_show = Some(show);
        self
    }

    /// Overlay `top` on this definition, keeping `top`'s children.
    pub fn merged_with(&self, top: &ColGroupDef) -> ColGroupDef {
        ColGroupDef {
            group_id: top.group_id.clone().or(self.group_id.clone()),
            header_name: top.header_name.clone().or(self.header_name.clone()),
            children: top.children.clone(),
            open_by_default: top.open_by_default.or(self.open_by_default),
            column_group_show: top.column_group_show.or(self.column_group_show),
            marry_children: top.marry_children.or(self.marry_children),
        }
    }
}

/// One entry of a definition list: a leaf column or a group.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnDefinition {
    Column(Arc<ColDef>),
    Group(Arc<ColGroupDef>),
}

impl ColumnDefinition {
    /// Returns `true` if this entry is a group.
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }
}

impl From<ColDef> for ColumnDefinition {
    fn from(def: ColDef) -> Self {
        Self::Column(Arc::new(def))
    }
}

impl From<ColGroupDef> for ColumnDefinition {
    fn from(def: ColGroupDef) -> Self {
        Self::Group(Arc::new(def))
    }
}

impl From<Arc<ColDef>> for ColumnDefinition {
    fn from(def: Arc<ColDef>) -> Self {
        Self::Column(def)
    }
}

impl<'de> Deserialize<'de> for ColumnDefinition {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Any object carrying a "children" key is a group, even if it is null.
        let value = serde_json::Value::deserialize(deserializer)?;
        let is_group = value.get("children").is_some();
        if is_group {
            ColGroupDef::deserialize(value)
                .map(|def| Self::Group(Arc::new(def)))
                .map_err(serde::de::Error::custom)
        } else {
            ColDef::deserialize(value)
                .map(|def| Self::Column(Arc::new(def)))
                .map_err(serde::de::Error::custom)
        }
    }
}

/// Parse a definition list from JSON.
pub fn definitions_from_json(json: &str) -> Result<Vec<ColumnDefinition>> {
    Ok(serde_json::from_str(json)?)
}
