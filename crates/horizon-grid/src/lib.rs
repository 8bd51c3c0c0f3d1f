//! Horizon Grid - the column tree model of a data grid.
//!
//! This crate turns a user-supplied, possibly nested list of column
//! definitions into:
//!
//! - a canonical structural tree of groups and leaf [`Column`]s in which
//!   every branch has the same depth (shallow branches are padded with
//!   synthetic groups),
//! - one display tree per pinned section, filtered by each group's
//!   open/closed state,
//! - stable column identities that survive rebuilds, so width, sort,
//!   visibility and subscribers are kept when definitions change.
//!
//! Everything is synchronous. Columns and groups notify changes through
//! [`Signal`]s, emitted in-line from the setter that caused them.
//!
//! # Example
//!
//! ```
//! use horizon_grid::prelude::*;
//!
//! let mut model = ColumnModel::new(GridOptions::default());
//! model
//!     .set_column_defs(
//!         definitions_from_json(r#"[
//!             { "groupId": "athlete", "children": [
//!                 { "field": "name" },
//!                 { "field": "age", "columnGroupShow": "open" },
//!                 { "field": "summary", "columnGroupShow": "closed" }
//!             ]},
//!             { "field": "country" }
//!         ]"#)
//!         .unwrap(),
//!         &EventSource::GridInitializing,
//!     )
//!     .unwrap();
//!
//! let ids: Vec<_> = model.displayed_columns(Pinned::None).iter().map(|c| c.id().to_string()).collect();
//! assert_eq!(ids, ["name", "summary", "country"]);
//!
//! model.set_group_expanded("athlete", true, &EventSource::Api).unwrap();
//! let ids: Vec<_> = model.displayed_columns(Pinned::None).iter().map(|c| c.id().to_string()).collect();
//! assert_eq!(ids, ["name", "age", "country"]);
//! ```

pub mod column;
pub mod debug;
pub mod definition;
pub mod display;
pub mod error;
pub mod events;
pub mod group;
pub mod id_allocator;
pub mod model;
pub mod node;
pub mod options;
pub mod prelude;
pub mod tree;

pub use horizon_grid_core::{ConnectionId, PerfSpan, Property, Signal, TreeFormatOptions, TreeStyle};

pub use column::Column;
pub use debug::ColumnTreeDebug;
pub use definition::{
    ColDef, ColGroupDef, ColumnDefinition, ColumnGroupShow, ColumnType, Override, Pinned,
    SortDirection, definitions_from_json,
};
pub use display::{GroupInstanceIds, create_display_tree};
pub use error::{Error, Result};
pub use events::{ColumnEvent, DisplayGroupEvent, EventSource, GroupEvent};
pub use group::{DisplayGroup, StructuralGroup};
pub use id_allocator::IdAllocator;
pub use model::ColumnModel;
pub use node::{DisplayNode, StructuralNode};
pub use options::{GridOptions, GroupDisplayType, ValidationMode};
pub use tree::{BuildOutcome, ColumnTree, TreeBuilder};
