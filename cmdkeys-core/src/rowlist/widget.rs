//! Interactive sub-widgets placed within a row.
//!
//! Widgets carry a control tag `C` naming what they edit. Activating or editing
//! one yields a [`ControlEvent`]; the widget never touches domain data itself.

use tracing::trace;

use crate::field::parse_ticks;

/// What happened to a control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Pressed,
    Toggled(bool),
    /// Index into the cycle button's options
    Selected(usize),
    Text(String),
    /// A delay field now holds a valid tick count
    Ticks(u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlEvent<C> {
    pub control: C,
    pub change: Change,
}

/// Content rule for a text field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Non-negative integer; resizes to fit its text
    Ticks,
    Text,
    /// Wrapped text that may span into the following spacer slot
    MultiLine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldStatus {
    #[default]
    Neutral,
    Error,
}

/// Editable text with a char-indexed cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextField {
    pub text: String,
    pub cursor: usize,
    pub max_len: usize,
    pub kind: FieldKind,
    pub status: FieldStatus,
    /// Floor for the fitted width of a Ticks field
    pub min_width: i32,
    /// Extra text measured when fitting (room for the cursor)
    pub pad: String,
    pub margin: i32,
    /// Sibling widget that absorbs width changes when this field resizes
    pub grow_partner: Option<usize>,
}

impl TextField {
    pub fn new(kind: FieldKind, text: impl Into<String>, max_len: usize) -> Self {
        Self {
            text: text.into(),
            cursor: 0,
            max_len,
            kind,
            status: FieldStatus::Neutral,
            min_width: 0,
            pad: String::new(),
            margin: 0,
            grow_partner: None,
        }
    }

    pub fn fitted(mut self, min_width: i32, pad: impl Into<String>, margin: i32) -> Self {
        self.min_width = min_width;
        self.pad = pad.into();
        self.margin = margin;
        self
    }

    pub fn partner(mut self, index: usize) -> Self {
        self.grow_partner = Some(index);
        self
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, cursor: usize) -> usize {
        self.text
            .char_indices()
            .nth(cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    pub fn move_to_end(&mut self) {
        self.cursor = self.char_count();
    }

    pub fn insert(&mut self, c: char) -> bool {
        if c.is_control() || self.char_count() >= self.max_len {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
        true
    }

    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
        true
    }

    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.char_count() {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
        true
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_count());
    }

    /// Re-check the current text, updating `status`.
    ///
    /// Ticks fields only report a change when the text parses; otherwise they
    /// turn to the error colour and the bound value is left alone.
    pub fn validate(&mut self) -> Option<Change> {
        match self.kind {
            FieldKind::Ticks => match parse_ticks(&self.text) {
                Ok(ticks) => {
                    self.status = FieldStatus::Neutral;
                    Some(Change::Ticks(ticks))
                }
                Err(err) => {
                    trace!(%err, "rejected delay input");
                    self.status = FieldStatus::Error;
                    None
                }
            },
            FieldKind::Text | FieldKind::MultiLine => Some(Change::Text(self.text.clone())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetKind<C> {
    Label {
        text: String,
    },
    Button {
        label: String,
        control: C,
    },
    /// Pressing starts a drag of the owning row
    DragHandle {
        label: String,
    },
    Toggle {
        caption: String,
        value: bool,
        on: String,
        off: String,
        control: C,
    },
    /// Cycles through `options`; with no caption only the value is shown
    Cycle {
        caption: Option<String>,
        options: Vec<String>,
        selected: usize,
        control: C,
    },
    Field {
        field: TextField,
        control: C,
    },
}

/// A positioned widget. `y` comes from the row at render/hit-test time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Widget<C> {
    pub x: i32,
    pub width: i32,
    pub height: i32,
    pub tooltip: Option<String>,
    /// Inactive widgets render greyed and ignore input
    pub active: bool,
    pub kind: WidgetKind<C>,
}

impl<C: Clone> Widget<C> {
    pub fn new(x: i32, width: i32, height: i32, kind: WidgetKind<C>) -> Self {
        Self {
            x,
            width,
            height,
            tooltip: None,
            active: true,
            kind,
        }
    }

    pub fn tooltip(mut self, tooltip: impl Into<String>) -> Self {
        let tooltip = tooltip.into();
        self.tooltip = (!tooltip.is_empty()).then_some(tooltip);
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn contains(&self, row_y: i32, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.width && y >= row_y && y < row_y + self.height
    }

    /// Whether the widget can take focus
    pub fn is_interactive(&self) -> bool {
        self.active && !matches!(self.kind, WidgetKind::Label { .. })
    }

    pub fn control(&self) -> Option<&C> {
        match &self.kind {
            WidgetKind::Button { control, .. }
            | WidgetKind::Toggle { control, .. }
            | WidgetKind::Cycle { control, .. }
            | WidgetKind::Field { control, .. } => Some(control),
            WidgetKind::Label { .. } | WidgetKind::DragHandle { .. } => None,
        }
    }

    pub fn field(&self) -> Option<&TextField> {
        match &self.kind {
            WidgetKind::Field { field, .. } => Some(field),
            _ => None,
        }
    }

    pub fn field_mut(&mut self) -> Option<&mut TextField> {
        match &mut self.kind {
            WidgetKind::Field { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Press the widget. Buttons report a press, toggles flip, cycles advance.
    pub fn activate(&mut self) -> Option<ControlEvent<C>> {
        if !self.active {
            return None;
        }
        match &mut self.kind {
            WidgetKind::Button { control, .. } => Some(ControlEvent {
                control: control.clone(),
                change: Change::Pressed,
            }),
            WidgetKind::Toggle { value, control, .. } => {
                *value = !*value;
                Some(ControlEvent {
                    control: control.clone(),
                    change: Change::Toggled(*value),
                })
            }
            WidgetKind::Cycle {
                options,
                selected,
                control,
                ..
            } => {
                if options.is_empty() {
                    return None;
                }
                *selected = (*selected + 1) % options.len();
                Some(ControlEvent {
                    control: control.clone(),
                    change: Change::Selected(*selected),
                })
            }
            WidgetKind::Label { .. } | WidgetKind::DragHandle { .. } | WidgetKind::Field { .. } => None,
        }
    }

    /// Text a renderer shows for this widget
    pub fn display(&self) -> String {
        match &self.kind {
            WidgetKind::Label { text } => text.clone(),
            WidgetKind::Button { label, .. } | WidgetKind::DragHandle { label } => label.clone(),
            WidgetKind::Toggle {
                caption,
                value,
                on,
                off,
                ..
            } => format!("{}: {}", caption, if *value { on } else { off }),
            WidgetKind::Cycle {
                caption,
                options,
                selected,
                ..
            } => {
                let value = options.get(*selected).map(String::as_str).unwrap_or("");
                match caption {
                    Some(caption) => format!("{}: {}", caption, value),
                    None => value.to_string(),
                }
            }
            WidgetKind::Field { field, .. } => field.text.clone(),
        }
    }
}
