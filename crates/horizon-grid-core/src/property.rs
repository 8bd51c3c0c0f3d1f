//! Property cells for Horizon Grid.
//!
//! Every mutable attribute of a column or group lives in a [`Property`]. A
//! property only stores the value and reports whether a write changed it; the
//! owner decides which signal to emit. The internal lock is always released
//! before `set` returns, so owners can emit without holding it.
//!
//! # Example
//!
//! ```
//! use horizon_grid_core::property::Property;
//! use horizon_grid_core::signal::Signal;
//!
//! struct Column {
//!     width: Property<f32>,
//!     width_changed: Signal<f32>,
//! }
//!
//! impl Column {
//!     fn set_width(&self, width: f32) {
//!         if self.width.set(width) {
//!             self.width_changed.emit(width);
//!         }
//!     }
//! }
//! ```

use std::fmt;

use parking_lot::RwLock;

/// A value cell with change detection.
///
/// ```
/// use horizon_grid_core::Property;
///
/// let pinned = Property::new(None::<&str>);
/// assert!(!pinned.set(None));
/// assert!(pinned.set(Some("left")));
/// assert_eq!(pinned.get(), Some("left"));
/// ```
pub struct Property<T> {
    value: RwLock<T>,
}

impl<T: Clone> Property<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// A clone of the current value. Use [`with`](Self::with) to borrow.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.value.read())
    }

    /// Overwrite without comparing; used when no notification may follow.
    pub fn set_silent(&self, value: T) {
        *self.value.write() = value;
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Store `value`. Returns `true` if it differs from the previous value.
    pub fn set(&self, value: T) -> bool {
        let mut current = self.value.write();
        if *current == value {
            return false;
        }
        *current = value;
        true
    }

    /// Like [`set`](Self::set), but hands back the previous value on change.
    pub fn replace(&self, value: T) -> Option<T> {
        let mut current = self.value.write();
        (*current != value).then(|| std::mem::replace(&mut *current, value))
    }
}

impl<T: Clone> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self::new(self.get())
    }
}

impl<T: Clone + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with(|value| f.debug_tuple("Property").field(value).finish())
    }
}

static_assertions::assert_impl_all!(Property<Option<f32>>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_set_reports_changes_only() {
        let width = Property::new(200.0_f32);
        assert!(!width.set(200.0));
        assert!(width.set(150.0));
        assert_eq!(width.get(), 150.0);
    }

    #[test]
    fn test_set_silent_overwrites() {
        let visible = Property::new(true);
        visible.set_silent(false);
        assert!(!visible.get());
        assert!(!visible.set(false));
    }

    #[test]
    fn test_replace_returns_previous_value() {
        let sort = Property::new(Some("asc".to_string()));
        assert!(sort.replace(Some("asc".to_string())).is_none());

        let old = sort.replace(None);
        assert_eq!(old, Some(Some("asc".to_string())));
        assert_eq!(sort.get(), None);
    }

    #[test]
    fn test_with_borrows() {
        let widths = Property::new(vec![100.0_f32, 50.0, 25.5]);
        let total: f32 = widths.with(|w| w.iter().sum());
        assert_eq!(total, 175.5);
    }

    #[test]
    fn test_concurrent_writers() {
        let index = Arc::new(Property::new(0_u32));
        let handles: Vec<_> = (1..=4)
            .map(|i| {
                let index = index.clone();
                std::thread::spawn(move || index.set(i))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert!((1..=4).contains(&index.get()));
    }

    #[test]
    fn test_default_and_debug() {
        let left: Property<Option<f32>> = Property::default();
        assert_eq!(left.get(), None);
        assert_eq!(format!("{left:?}"), "Property(None)");
    }
}
