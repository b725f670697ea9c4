//! List geometry and the injected layout/measurement configuration.
//!
//! Every list is allocated fixed-height slots (`item_height`); rows draw their
//! widgets `entry_height` tall, which may be less than a slot but never more,
//! except for widgets that deliberately spill into a following spacer slot.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

/// Measures rendered text width in layout units
pub trait TextMeasure: Send + Sync {
    fn width(&self, text: &str) -> i32;
}

/// Terminal-cell measurement: one unit per display column
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeMeasure;

impl TextMeasure for UnicodeMeasure {
    fn width(&self, text: &str) -> i32 {
        i32::try_from(UnicodeWidthStr::width(text)).unwrap_or(i32::MAX)
    }
}

/// Shared handle to a measurement service
pub type Measure = Arc<dyn TextMeasure>;

/// Sizing constants for rows and widgets.
///
/// Defaults are in pixels; terminal hosts override them with cell counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Height of one list slot
    pub item_height: i32,
    /// Width of standard (centred) rows
    pub entry_width: i32,
    /// Height of widgets within a row
    pub entry_height: i32,
    /// Horizontal gap between widgets in a row
    pub spacing: i32,
    /// Extra clickable width either side of the widest row
    pub row_width_margin: i32,
    /// Lower bound for square-ish buttons (drag handle, delete, cycle index)
    pub min_small_button: i32,
    /// Padding added to measured text for fields and short buttons
    pub field_margin: i32,
    /// Max characters in a delay field
    pub delay_max_len: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            item_height: 25,
            entry_width: 320,
            entry_height: 20,
            spacing: 4,
            row_width_margin: 20,
            min_small_button: 16,
            field_margin: 8,
            delay_max_len: 8,
        }
    }
}

/// Host-supplied viewport dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListDims {
    pub width: i32,
    pub height: i32,
    /// Y of the first slot's top edge
    pub top: i32,
}

/// Slot geometry the row list needs for hit-testing and scrolling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListGeometry {
    pub width: i32,
    pub height: i32,
    pub top: i32,
    pub item_height: i32,
    pub row_width: i32,
}

impl ListGeometry {
    pub fn row_left(&self) -> i32 {
        self.width / 2 - self.row_width / 2
    }

    pub fn row_right(&self) -> i32 {
        self.row_left() + self.row_width
    }

    pub fn bottom(&self) -> i32 {
        self.top + self.height
    }

    /// Scrollbar column, just right of the clickable row area
    pub fn scrollbar_x(&self) -> i32 {
        self.width / 2 + self.row_width / 2
    }
}

/// Positions derived from the viewport and [`LayoutConfig`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListLayout {
    pub dims: ListDims,
    pub item_height: i32,
    pub entry_width: i32,
    pub entry_height: i32,
    /// Width of rows that grow with the viewport (message rows)
    pub dyn_entry_width: i32,
    pub entry_x: i32,
    pub dyn_entry_x: i32,
    pub row_width: i32,
    pub small_button_width: i32,
    pub spacing: i32,
    pub field_margin: i32,
    pub delay_max_len: usize,
}

impl ListLayout {
    pub fn new(dims: ListDims, config: &LayoutConfig) -> Self {
        let entry_width = config.entry_width;
        let dyn_entry_width = entry_width.max(dims.width * 4 / 5);
        Self {
            dims,
            item_height: config.item_height.max(1),
            entry_width,
            entry_height: config.entry_height,
            dyn_entry_width,
            entry_x: dims.width / 2 - entry_width / 2,
            dyn_entry_x: dims.width / 2 - dyn_entry_width / 2,
            row_width: entry_width.max(dyn_entry_width) + config.row_width_margin,
            small_button_width: config.min_small_button.max(config.entry_height),
            spacing: config.spacing,
            field_margin: config.field_margin,
            delay_max_len: config.delay_max_len,
        }
    }

    pub fn geometry(&self) -> ListGeometry {
        ListGeometry {
            width: self.dims.width,
            height: self.dims.height,
            top: self.dims.top,
            item_height: self.item_height,
            row_width: self.row_width,
        }
    }

    /// Width of each half when a row is split into two buttons
    pub fn half_width(&self, width: i32) -> i32 {
        (width - self.spacing) / 2
    }
}
