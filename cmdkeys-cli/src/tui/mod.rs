//! Terminal host for the macro editor
//!
//! Owns the terminal and turns crossterm input into editor calls:
//! - Mouse press, drag and release for widgets and message reordering
//! - Keyboard focus traversal and field editing
//! - Key capture for the binding buttons
//! - Save on demand, macro switching, simulated repeat tasks

pub mod app;
pub mod event;
pub mod terminal;
pub mod ui;

pub use terminal::run;
