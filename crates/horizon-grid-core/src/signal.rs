//! Change notification for columns and groups.
//!
//! Every entity of the column tree exposes its notifications as public
//! [`Signal`] fields (`width_changed`, `expanded_changed`, ...). Observers
//! [`connect`](Signal::connect) a closure and keep the returned
//! [`ConnectionId`] to detach later.
//!
//! # Delivery
//!
//! Emission is always synchronous: every slot runs on the emitting call stack
//! before [`Signal::emit`] returns. The connection table is snapshotted before
//! the first slot runs and no lock is held while slots execute, so a slot may
//! connect, disconnect or emit on the very signal that invoked it. Slots
//! disconnected mid-emission still receive the emission in flight.
//!
//! # Example
//!
//! ```
//! use horizon_grid_core::Signal;
//!
//! let visible_changed = Signal::<String>::new();
//! let id = visible_changed.connect(|column| {
//!     println!("visibility of {column} changed");
//! });
//!
//! visible_changed.emit("athlete".to_string());
//! assert!(visible_changed.disconnect(id));
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;

new_key_type! {
    /// Handle of one connected slot, returned by [`Signal::connect`].
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// A list of slots invoked, in connection order, each time the signal is
/// emitted.
///
/// Slots receive `Args` by reference. Entities use small event structs
/// (see `horizon_grid::events`) as `Args`.
pub struct Signal<Args> {
    connections: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
    blocked: AtomicBool,
}

impl<Args: Clone + Send + 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: Clone + Send + 'static> Signal<Args> {
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Attach `slot`; it runs on every later emission until disconnected.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connections.lock().insert(Arc::new(slot))
    }

    /// Detach one slot. Returns `false` if `id` was already gone.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Detach every slot, e.g. when the owning column is destroyed.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// While blocked, [`emit`](Self::emit) drops emissions.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Invoke every connected slot with `args`.
    #[tracing::instrument(skip_all, target = "horizon_grid_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "blocked, emission dropped");
            return;
        }

        let slots: Vec<Slot<Args>> = self.connections.lock().values().cloned().collect();
        tracing::trace!(target: targets::SIGNAL, slots = slots.len(), "emit");

        for slot in slots {
            slot(&args);
        }
    }
}

impl<Args> fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.connections.lock().len())
            .field("blocked", &self.blocked.load(Ordering::SeqCst))
            .finish()
    }
}

static_assertions::assert_impl_all!(Signal<()>: Send, Sync);
