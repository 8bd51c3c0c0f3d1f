//! The leaf column entity.
//!
//! A [`Column`] is created once by the tree builder and then reused across
//! rebuilds for as long as some definition reconciles with it. It owns all
//! runtime state of one data column (width, pin side, sort, visibility, ...)
//! and one [`Signal`] per concern. Every setter compares before writing and
//! only emits when the value actually changed.
//!
//! Parent links are weak: a column never keeps its groups alive.

use std::fmt;
use std::sync::{Arc, Weak};

use horizon_grid_core::logging::targets;
use horizon_grid_core::{Property, Signal};
use parking_lot::RwLock;

use crate::definition::{ColDef, ColumnGroupShow, Override, Pinned, SortDirection};
use crate::events::{ColumnEvent, EventSource};
use crate::group::{DisplayGroup, StructuralGroup};
use crate::options::{DEFAULT_COL_WIDTH, DEFAULT_MIN_COL_WIDTH, GridOptions};

/// A leaf column of the grid.
pub struct Column {
    id: String,
    primary: bool,
    this: Weak<Column>,

    definition: Property<Arc<ColDef>>,
    user_definition: Property<Option<Arc<ColDef>>>,

    actual_width: Property<f32>,
    min_width: Property<f32>,
    max_width: Property<f32>,
    flex: Property<Option<f32>>,

    visible: Property<bool>,
    pinned: Property<Pinned>,
    sort: Property<Option<SortDirection>>,
    sort_index: Property<Option<u32>>,
    menu_visible: Property<bool>,
    filter_active: Property<bool>,
    moving: Property<bool>,
    row_group_active: Property<bool>,
    pivot_active: Property<bool>,
    value_active: Property<bool>,
    agg_func: Property<Option<String>>,

    left: Property<Option<f32>>,
    old_left: Property<Option<f32>>,
    destroyed: Property<bool>,

    original_parent: RwLock<Weak<StructuralGroup>>,
    display_parent: RwLock<Weak<DisplayGroup>>,

    /// Emitted when the actual width changes.
    pub width_changed: Signal<ColumnEvent>,
    /// Emitted when the column is shown or hidden.
    pub visible_changed: Signal<ColumnEvent>,
    /// Emitted when the column moves between pinned sections.
    pub pinned_changed: Signal<ColumnEvent>,
    /// Emitted when a header drag starts or stops.
    pub moving_changed: Signal<ColumnEvent>,
    /// Emitted when the sort direction changes.
    pub sort_changed: Signal<ColumnEvent>,
    /// Emitted when the sort priority changes.
    pub sort_index_changed: Signal<ColumnEvent>,
    /// Emitted when a filter becomes active or inactive.
    pub filter_active_changed: Signal<ColumnEvent>,
    /// Emitted when the column menu opens or closes.
    pub menu_visible_changed: Signal<ColumnEvent>,
    /// Emitted when the column starts or stops grouping rows.
    pub row_group_changed: Signal<ColumnEvent>,
    /// Emitted when the column starts or stops pivoting.
    pub pivot_changed: Signal<ColumnEvent>,
    /// Emitted when the column starts or stops aggregating values.
    pub value_changed: Signal<ColumnEvent>,
    /// Emitted when the left position changes.
    pub left_changed: Signal<ColumnEvent>,
    /// Emitted when a rebuild hands the column a new definition.
    pub definition_changed: Signal<ColumnEvent>,
}

/// Resolve `[min, max]` for a merged definition; an inverted range collapses to `min`.
///
/// NaN bounds fall back to the grid options, then to the built-in defaults.
pub(crate) fn width_bounds(definition: &ColDef, options: &GridOptions) -> (f32, f32) {
    let min = [definition.min_width, Some(options.min_col_width)]
        .into_iter()
        .flatten()
        .find(|w| !w.is_nan())
        .unwrap_or(DEFAULT_MIN_COL_WIDTH);
    let max = [definition.max_width, Some(options.max_col_width)]
        .into_iter()
        .flatten()
        .find(|w| !w.is_nan())
        .unwrap_or(f32::MAX);
    (min, max.max(min))
}

fn resolve<T: Clone>(value: &Override<T>, initial: Option<T>) -> Option<T> {
    match value {
        Override::Set(v) => Some(v.clone()),
        Override::Clear => None,
        Override::Inherit => initial,
    }
}

impl Column {
    /// Create a column from a merged definition.
    ///
    /// `user_definition` is the definition exactly as supplied, kept for
    /// reconciliation; synthetic columns have none.
    pub fn new(
        id: impl Into<String>,
        definition: ColDef,
        user_definition: Option<Arc<ColDef>>,
        primary: bool,
        options: &GridOptions,
    ) -> Arc<Self> {
        let (min_width, max_width) = width_bounds(&definition, options);
        let width = [definition.width, definition.initial_width, Some(options.default_col_width)]
            .into_iter()
            .flatten()
            .find(|w| !w.is_nan())
            .unwrap_or(DEFAULT_COL_WIDTH)
            .clamp(min_width, max_width);

        let hide = resolve(&definition.hide, definition.initial_hide).unwrap_or(false);
        let agg_func = resolve(&definition.agg_func, definition.initial_agg_func.clone());

        Arc::new_cyclic(|this| Self {
            id: id.into(),
            primary,
            this: this.clone(),
            actual_width: Property::new(width),
            min_width: Property::new(min_width),
            max_width: Property::new(max_width),
            flex: Property::new(resolve(&definition.flex, definition.initial_flex)),
            visible: Property::new(!hide),
            pinned: Property::new(
                resolve(&definition.pinned, definition.initial_pinned).unwrap_or_default(),
            ),
            sort: Property::new(resolve(&definition.sort, definition.initial_sort)),
            sort_index: Property::new(resolve(
                &definition.sort_index,
                definition.initial_sort_index,
            )),
            menu_visible: Property::new(false),
            filter_active: Property::new(false),
            moving: Property::new(false),
            row_group_active: Property::new(
                resolve(&definition.row_group, definition.initial_row_group).unwrap_or(false),
            ),
            pivot_active: Property::new(
                resolve(&definition.pivot, definition.initial_pivot).unwrap_or(false),
            ),
            value_active: Property::new(agg_func.is_some()),
            agg_func: Property::new(agg_func),
            left: Property::new(None),
            old_left: Property::new(None),
            destroyed: Property::new(false),
            original_parent: RwLock::new(Weak::new()),
            display_parent: RwLock::new(Weak::new()),
            definition: Property::new(Arc::new(definition)),
            user_definition: Property::new(user_definition),
            width_changed: Signal::new(),
            visible_changed: Signal::new(),
            pinned_changed: Signal::new(),
            moving_changed: Signal::new(),
            sort_changed: Signal::new(),
            sort_index_changed: Signal::new(),
            filter_active_changed: Signal::new(),
            menu_visible_changed: Signal::new(),
            row_group_changed: Signal::new(),
            pivot_changed: Signal::new(),
            value_changed: Signal::new(),
            left_changed: Signal::new(),
            definition_changed: Signal::new(),
        })
    }

    fn emit(&self, signal: &Signal<ColumnEvent>, source: &EventSource) {
        if let Some(column) = self.this.upgrade() {
            signal.emit(ColumnEvent {
                column,
                source: source.clone(),
            });
        }
    }

    // -------------------------------------------------------------------------
    // Identity and definitions
    // -------------------------------------------------------------------------

    /// The column id; unique within a tree and never reassigned.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// `true` for real data columns, `false` for synthetic ones.
    pub fn is_primary(&self) -> bool {
        self.primary
    }

    /// The effective definition (defaults, presets and user values merged).
    pub fn definition(&self) -> Arc<ColDef> {
        self.definition.get()
    }

    /// The definition exactly as the user supplied it.
    pub fn user_definition(&self) -> Option<Arc<ColDef>> {
        self.user_definition.get()
    }

    /// The row data field, if any.
    pub fn field(&self) -> Option<String> {
        self.definition.with(|d| d.field.clone())
    }

    /// Header text: explicit name, else the humanised field, else the id.
    pub fn header_name(&self) -> String {
        self.definition.with(|d| {
            d.header_name
                .clone()
                .or_else(|| d.field.as_deref().map(humanise))
                .unwrap_or_else(|| self.id.clone())
        })
    }

    /// Show policy inside the parent group.
    pub fn column_group_show(&self) -> Option<ColumnGroupShow> {
        self.definition.with(|d| d.column_group_show)
    }

    pub fn is_resizable(&self) -> bool {
        self.definition.with(|d| d.resizable.unwrap_or(true))
    }

    pub fn is_lock_position(&self) -> bool {
        self.definition.with(|d| d.lock_position.unwrap_or(false))
    }

    pub fn is_lock_visible(&self) -> bool {
        self.definition.with(|d| d.lock_visible.unwrap_or(false))
    }

    /// Replace the definitions after reconciliation and refresh width bounds.
    ///
    /// The actual width is re-clamped silently against the new bounds.
    pub(crate) fn set_definition(
        &self,
        definition: ColDef,
        user_definition: Option<Arc<ColDef>>,
        options: &GridOptions,
        source: &EventSource,
    ) {
        let (min_width, max_width) = width_bounds(&definition, options);
        self.min_width.set(min_width);
        self.max_width.set(max_width);
        self.actual_width
            .set(self.actual_width.get().clamp(min_width, max_width));
        self.definition.set_silent(Arc::new(definition));
        self.user_definition.set_silent(user_definition);
        self.emit(&self.definition_changed, source);
    }

    /// Re-apply the stateful attributes of a definition to a reused column.
    ///
    /// `Inherit` leaves the current state alone, `Clear` resets it and `Set`
    /// applies the value. `initial_*` attributes are ignored here; they only
    /// matter when a column is first created.
    pub(crate) fn apply_definition_state(&self, definition: &ColDef, source: &EventSource) {
        match &definition.flex {
            Override::Set(flex) => self.set_flex(Some(*flex)),
            Override::Clear => self.set_flex(None),
            Override::Inherit => {}
        }

        match definition.width {
            Some(width) if !self.is_flex() => self.set_actual_width(width, source),
            _ => self.set_actual_width(self.actual_width(), source),
        }

        match &definition.sort {
            Override::Set(sort) => self.set_sort(Some(*sort), source),
            Override::Clear => self.set_sort(None, source),
            Override::Inherit => {}
        }

        match &definition.sort_index {
            Override::Set(index) => self.set_sort_index(Some(*index), source),
            Override::Clear => self.set_sort_index(None, source),
            Override::Inherit => {}
        }

        match &definition.hide {
            Override::Set(hide) => self.set_visible(!hide, source),
            Override::Clear => self.set_visible(true, source),
            Override::Inherit => {}
        }

        match &definition.pinned {
            Override::Set(pinned) => self.set_pinned(*pinned, source),
            Override::Clear => self.set_pinned(Pinned::None, source),
            Override::Inherit => {}
        }

        match &definition.row_group {
            Override::Set(active) => self.set_row_group_active(*active, source),
            Override::Clear => self.set_row_group_active(false, source),
            Override::Inherit => {}
        }

        match &definition.pivot {
            Override::Set(active) => self.set_pivot_active(*active, source),
            Override::Clear => self.set_pivot_active(false, source),
            Override::Inherit => {}
        }

        match &definition.agg_func {
            Override::Set(func) => self.set_agg_func(Some(func.clone()), source),
            Override::Clear => self.set_agg_func(None, source),
            Override::Inherit => {}
        }
    }

    // -------------------------------------------------------------------------
    // Width
    // -------------------------------------------------------------------------

    pub fn actual_width(&self) -> f32 {
        self.actual_width.get()
    }

    pub fn min_width(&self) -> f32 {
        self.min_width.get()
    }

    pub fn max_width(&self) -> f32 {
        self.max_width.get()
    }

    /// Set the width, clamped to `[min_width, max_width]`.
    ///
    /// A change from any source other than flex layout or grid
    /// initialisation switches flex off for this column.
    pub fn set_actual_width(&self, width: f32, source: &EventSource) {
        if width.is_nan() {
            tracing::debug!(target: targets::COLUMN, column = %self.id, "ignoring NaN width");
            return;
        }
        let width = width.clamp(self.min_width(), self.max_width());
        if self.actual_width.set(width) {
            if !source.keeps_flex() && self.flex.set(None) {
                tracing::trace!(target: targets::COLUMN, column = %self.id, "explicit width disables flex");
            }
            self.emit(&self.width_changed, source);
        }
    }

    /// Shrink the column to its minimum width.
    pub fn set_minimum_width(&self, source: &EventSource) {
        self.set_actual_width(self.min_width(), source);
    }

    /// Returns `true` if `width` exceeds the maximum width.
    pub fn is_greater_than_max(&self, width: f32) -> bool {
        width > self.max_width()
    }

    /// Flex weight, `0.0` when flex is off.
    pub fn flex(&self) -> f32 {
        self.flex.get().unwrap_or(0.0)
    }

    /// Returns `true` while flex drives this column's width.
    pub fn is_flex(&self) -> bool {
        self.flex() > 0.0
    }

    pub fn set_flex(&self, flex: Option<f32>) {
        self.flex.set(flex);
    }

    // -------------------------------------------------------------------------
    // Visibility and pinning
    // -------------------------------------------------------------------------

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    pub fn set_visible(&self, visible: bool, source: &EventSource) {
        if self.visible.set(visible) {
            self.emit(&self.visible_changed, source);
        }
    }

    pub fn pinned(&self) -> Pinned {
        self.pinned.get()
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned().is_pinned()
    }

    pub fn is_pinned_left(&self) -> bool {
        self.pinned() == Pinned::Left
    }

    pub fn is_pinned_right(&self) -> bool {
        self.pinned() == Pinned::Right
    }

    pub fn set_pinned(&self, pinned: Pinned, source: &EventSource) {
        if self.pinned.set(pinned) {
            self.emit(&self.pinned_changed, source);
        }
    }

    // -------------------------------------------------------------------------
    // Sorting
    // -------------------------------------------------------------------------

    pub fn sort(&self) -> Option<SortDirection> {
        self.sort.get()
    }

    pub fn is_sorting(&self) -> bool {
        self.sort().is_some()
    }

    pub fn set_sort(&self, sort: Option<SortDirection>, source: &EventSource) {
        if self.sort.set(sort) {
            self.emit(&self.sort_changed, source);
        }
    }

    pub fn sort_index(&self) -> Option<u32> {
        self.sort_index.get()
    }

    pub fn set_sort_index(&self, index: Option<u32>, source: &EventSource) {
        if self.sort_index.set(index) {
            self.emit(&self.sort_index_changed, source);
        }
    }

    // -------------------------------------------------------------------------
    // Transient UI state
    // -------------------------------------------------------------------------

    pub fn is_menu_visible(&self) -> bool {
        self.menu_visible.get()
    }

    pub fn set_menu_visible(&self, visible: bool, source: &EventSource) {
        if self.menu_visible.set(visible) {
            self.emit(&self.menu_visible_changed, source);
        }
    }

    pub fn is_filter_active(&self) -> bool {
        self.filter_active.get()
    }

    pub fn set_filter_active(&self, active: bool, source: &EventSource) {
        if self.filter_active.set(active) {
            self.emit(&self.filter_active_changed, source);
        }
    }

    pub fn is_moving(&self) -> bool {
        self.moving.get()
    }

    pub fn set_moving(&self, moving: bool, source: &EventSource) {
        if self.moving.set(moving) {
            self.emit(&self.moving_changed, source);
        }
    }

    // -------------------------------------------------------------------------
    // Row grouping, pivoting, aggregation
    // -------------------------------------------------------------------------

    pub fn is_row_group_active(&self) -> bool {
        self.row_group_active.get()
    }

    pub fn set_row_group_active(&self, active: bool, source: &EventSource) {
        if self.row_group_active.set(active) {
            self.emit(&self.row_group_changed, source);
        }
    }

    pub fn is_pivot_active(&self) -> bool {
        self.pivot_active.get()
    }

    pub fn set_pivot_active(&self, active: bool, source: &EventSource) {
        if self.pivot_active.set(active) {
            self.emit(&self.pivot_changed, source);
        }
    }

    pub fn is_value_active(&self) -> bool {
        self.value_active.get()
    }

    pub fn set_value_active(&self, active: bool, source: &EventSource) {
        if self.value_active.set(active) {
            self.emit(&self.value_changed, source);
        }
    }

    pub fn agg_func(&self) -> Option<String> {
        self.agg_func.get()
    }

    /// Set the aggregation function; a column aggregates while one is set.
    pub fn set_agg_func(&self, agg_func: Option<String>, source: &EventSource) {
        let active = agg_func.is_some();
        self.agg_func.set(agg_func);
        self.set_value_active(active, source);
    }

    // -------------------------------------------------------------------------
    // Layout position
    // -------------------------------------------------------------------------

    /// Left offset inside the column's pinned section, once laid out.
    pub fn left(&self) -> Option<f32> {
        self.left.get()
    }

    /// Left offset before the most recent layout pass.
    pub fn old_left(&self) -> Option<f32> {
        self.old_left.get()
    }

    /// Right edge (`left + width`), once laid out.
    pub fn right(&self) -> Option<f32> {
        self.left().map(|left| left + self.actual_width())
    }

    pub fn set_left(&self, left: Option<f32>, source: &EventSource) {
        self.old_left.set(self.left());
        if self.left.set(left) {
            self.emit(&self.left_changed, source);
        }
    }

    // -------------------------------------------------------------------------
    // Tree links
    // -------------------------------------------------------------------------

    /// The structural group holding this column, if any.
    pub fn original_parent(&self) -> Option<Arc<StructuralGroup>> {
        self.original_parent.read().upgrade()
    }

    pub(crate) fn set_original_parent(&self, parent: Option<&Arc<StructuralGroup>>) {
        *self.original_parent.write() = parent.map(Arc::downgrade).unwrap_or_default();
    }

    /// The display group currently holding this column, if any.
    pub fn display_parent(&self) -> Option<Arc<DisplayGroup>> {
        self.display_parent.read().upgrade()
    }

    pub(crate) fn set_display_parent(&self, parent: Option<&Arc<DisplayGroup>>) {
        *self.display_parent.write() = parent.map(Arc::downgrade).unwrap_or_default();
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Detach the column: drop every subscriber and both parent links.
    ///
    /// Called when a rebuild finds no definition for the column any more.
    pub fn destroy(&self) {
        if !self.destroyed.set(true) {
            return;
        }
        tracing::debug!(target: targets::COLUMN, column = %self.id, "destroying column");
        for signal in [
            &self.width_changed,
            &self.visible_changed,
            &self.pinned_changed,
            &self.moving_changed,
            &self.sort_changed,
            &self.sort_index_changed,
            &self.filter_active_changed,
            &self.menu_visible_changed,
            &self.row_group_changed,
            &self.pivot_changed,
            &self.value_changed,
            &self.left_changed,
            &self.definition_changed,
        ] {
            signal.disconnect_all();
        }
        self.set_original_parent(None);
        self.set_display_parent(None);
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("primary", &self.primary)
            .field("visible", &self.is_visible())
            .field("pinned", &self.pinned())
            .field("actual_width", &self.actual_width())
            .finish()
    }
}

static_assertions::assert_impl_all!(Column: Send, Sync);

/// Turn a field path like `address.zipCode` into `Address Zip Code`.
fn humanise(field: &str) -> String {
    let chars: Vec<char> = field.chars().collect();
    let mut spaced = String::with_capacity(field.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c == '.' || c == '_' {
            spaced.push(' ');
            continue;
        }
        if i > 0 && c.is_uppercase() {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || (prev.is_uppercase() && next_lower) {
                spaced.push(' ');
            }
        }
        spaced.push(c);
    }

    spaced
        .split(' ')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
