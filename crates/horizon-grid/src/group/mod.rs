//! Column groups.
//!
//! - [`StructuralGroup`]: a node of the canonical, depth-balanced tree built
//!   from definitions. Owns the expand state.
//! - [`DisplayGroup`]: one appearance of a structural group inside a pinned
//!   section, holding the children currently shown.

mod display;
mod structural;

pub use display::{create_unique_id, DisplayGroup};
pub use structural::StructuralGroup;
