//! Core reactive primitives for Horizon Grid.
//!
//! This crate provides the building blocks the column tree model is made of:
//!
//! - **Signal/Slot System**: Synchronous, reentrancy-safe change notification
//! - **Property System**: Change-detecting cells backing every mutable attribute
//! - **Logging**: Tracing targets, perf spans and tree formatting options
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_grid_core::Signal;
//!
//! // Create a signal that notifies when a width changes
//! let width_changed = Signal::<f32>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = width_changed.connect(|width| {
//!     println!("Width changed to: {}", width);
//! });
//!
//! // Emit the signal
//! width_changed.emit(120.0);
//!
//! // Disconnect when done
//! width_changed.disconnect(conn_id);
//! ```
//!
//! # Property Example
//!
//! ```
//! use horizon_grid_core::{Property, Signal};
//!
//! // A column-like entity with change notification
//! struct Header {
//!     visible: Property<bool>,
//!     visible_changed: Signal<bool>,
//! }
//!
//! impl Header {
//!     fn new() -> Self {
//!         Self {
//!             visible: Property::new(true),
//!             visible_changed: Signal::new(),
//!         }
//!     }
//!
//!     fn set_visible(&self, visible: bool) {
//!         if self.visible.set(visible) {
//!             self.visible_changed.emit(visible);
//!         }
//!     }
//! }
//! ```

pub mod logging;
pub mod property;
pub mod signal;

pub use logging::{PerfSpan, TreeFormatOptions, TreeStyle};
pub use property::Property;
pub use signal::{ConnectionId, Signal};
