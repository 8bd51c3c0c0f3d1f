//! Prelude module for Horizon Grid.
//!
//! This module re-exports the most commonly used types for convenient importing:
//!
//! ```
//! use horizon_grid::prelude::*;
//! ```
//!
//! This provides access to:
//! - The owning model (`ColumnModel`, `GridOptions`)
//! - Definitions (`ColDef`, `ColGroupDef`, `ColumnDefinition`)
//! - Tree entities (`Column`, `StructuralGroup`, `DisplayGroup`)
//! - Signals and events (`Signal`, `ColumnEvent`, `EventSource`)

// ============================================================================
// Model
// ============================================================================

pub use crate::model::ColumnModel;
pub use crate::options::{GridOptions, GroupDisplayType, ValidationMode};

// ============================================================================
// Definitions
// ============================================================================

pub use crate::definition::{
    ColDef, ColGroupDef, ColumnDefinition, ColumnGroupShow, Override, Pinned, SortDirection,
    definitions_from_json,
};

// ============================================================================
// Tree Entities
// ============================================================================

pub use crate::column::Column;
pub use crate::group::{DisplayGroup, StructuralGroup};
pub use crate::node::{DisplayNode, StructuralNode};
pub use crate::tree::{ColumnTree, TreeBuilder};

// ============================================================================
// Signals and Events
// ============================================================================

pub use crate::events::{ColumnEvent, DisplayGroupEvent, EventSource, GroupEvent};
pub use horizon_grid_core::{ConnectionId, Signal};

// ============================================================================
// Errors
// ============================================================================

pub use crate::error::Error;
