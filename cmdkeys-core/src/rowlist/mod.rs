//! Scrollable list of fixed-height slots holding heterogeneous rows.
//!
//! A [`RowList`] never edits domain data. Widgets are tagged with a control
//! value `C`, and input that changes a widget comes back out as a
//! [`Dispatch::Changed`] for the owner of the data to apply. After applying it
//! the owner composes a fresh list; rows are never patched in place.
//!
//! A row that needs to be taller than one slot is followed by a
//! [`Slot::Spacer`], which draws nothing and forwards every query to it.

pub mod list;
pub mod row;
pub mod widget;

pub use list::{Dispatch, DragState, RowList};
pub use row::{KeyInput, Row, RowHit, RowKind, Slot};
pub use widget::{Change, ControlEvent, FieldKind, FieldStatus, TextField, Widget, WidgetKind};
