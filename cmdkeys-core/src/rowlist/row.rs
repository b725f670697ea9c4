//! Rows and the slots that hold them.

use super::widget::{ControlEvent, FieldKind, Widget, WidgetKind};
use crate::field::fitted_width;
use crate::layout::TextMeasure;

/// Host-neutral key input delivered to the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Char(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    Enter,
    Tab,
    BackTab,
    Up,
    Down,
    PageUp,
    PageDown,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Binding,
    HudHistory,
    StrategyMode,
    Text,
    /// Edits the message at `index` in the macro's sequence
    Message { index: usize },
    Action,
}

/// Result of delivering input to a single row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowHit<C> {
    /// Nothing at that point, or the input did not apply
    Miss,
    /// Focus moved or a field was edited without producing a value
    Consumed,
    /// The row's drag handle was pressed
    DragStart,
    Event(ControlEvent<C>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<C> {
    pub kind: RowKind,
    pub widgets: Vec<Widget<C>>,
    pub focused: Option<usize>,
    pub dragging: bool,
}

impl<C: Clone> Row<C> {
    pub fn new(kind: RowKind, widgets: Vec<Widget<C>>) -> Self {
        Self {
            kind,
            widgets,
            focused: None,
            dragging: false,
        }
    }

    pub fn is_message(&self) -> bool {
        matches!(self.kind, RowKind::Message { .. })
    }

    pub fn widget_at(&self, row_y: i32, x: i32, y: i32) -> Option<usize> {
        self.widgets.iter().position(|w| w.contains(row_y, x, y))
    }

    /// Tallest widget, at least one slot
    pub fn extent(&self, item_height: i32) -> i32 {
        self.widgets
            .iter()
            .map(|w| w.height)
            .max()
            .unwrap_or(0)
            .max(item_height)
    }

    pub fn interactive(&self) -> impl Iterator<Item = usize> + '_ {
        self.widgets
            .iter()
            .enumerate()
            .filter(|(_, w)| w.is_interactive())
            .map(|(i, _)| i)
    }

    pub fn focused_widget(&self) -> Option<&Widget<C>> {
        self.focused.and_then(|i| self.widgets.get(i))
    }

    pub fn pointer_down(&mut self, row_y: i32, x: i32, y: i32) -> RowHit<C> {
        let Some(index) = self.widget_at(row_y, x, y) else {
            self.focused = None;
            return RowHit::Miss;
        };
        let widget = &mut self.widgets[index];
        if !widget.active {
            return RowHit::Consumed;
        }
        match widget.kind {
            WidgetKind::DragHandle { .. } => {
                self.focused = None;
                RowHit::DragStart
            }
            WidgetKind::Label { .. } => RowHit::Miss,
            WidgetKind::Field { ref mut field, .. } => {
                field.move_to_end();
                self.focused = Some(index);
                RowHit::Consumed
            }
            _ => {
                self.focused = Some(index);
                widget.activate().map_or(RowHit::Consumed, RowHit::Event)
            }
        }
    }

    /// Deliver a key to the focused widget
    pub fn key(&mut self, input: KeyInput, measure: &dyn TextMeasure) -> RowHit<C> {
        let Some(index) = self.focused else {
            return RowHit::Miss;
        };
        let Some(widget) = self.widgets.get_mut(index) else {
            self.focused = None;
            return RowHit::Miss;
        };
        let control = match widget.control() {
            Some(control) => control.clone(),
            None => return RowHit::Miss,
        };
        if widget.field().is_none() {
            return match input {
                KeyInput::Enter | KeyInput::Char(' ') => {
                    widget.activate().map_or(RowHit::Consumed, RowHit::Event)
                }
                _ => RowHit::Miss,
            };
        }
        let Some(field) = widget.field_mut() else {
            return RowHit::Miss;
        };

        let edited = match input {
            KeyInput::Char(c) => field.insert(c),
            KeyInput::Backspace => field.backspace(),
            KeyInput::Delete => field.delete(),
            KeyInput::Left => {
                field.left();
                return RowHit::Consumed;
            }
            KeyInput::Right => {
                field.right();
                return RowHit::Consumed;
            }
            KeyInput::Home => {
                field.cursor = 0;
                return RowHit::Consumed;
            }
            KeyInput::End => {
                field.move_to_end();
                return RowHit::Consumed;
            }
            _ => return RowHit::Miss,
        };
        if !edited {
            return RowHit::Consumed;
        }

        let change = field.validate();
        self.refit_field(index, measure);
        match change {
            Some(change) => RowHit::Event(ControlEvent { control, change }),
            None => RowHit::Consumed,
        }
    }

    /// Resize a Ticks field to its text, keeping its right edge fixed.
    ///
    /// The width the field gains or loses is taken from or given back to its
    /// grow partner, so the row's total width never changes.
    pub fn refit_field(&mut self, index: usize, measure: &dyn TextMeasure) {
        let Some(widget) = self.widgets.get(index) else {
            return;
        };
        let Some(field) = widget.field() else {
            return;
        };
        if field.kind != FieldKind::Ticks {
            return;
        }
        let new_width = fitted_width(&field.text, &field.pad, field.min_width, field.margin, measure);
        let delta = widget.width - new_width;
        if delta == 0 {
            return;
        }
        let partner = field.grow_partner;

        let widget = &mut self.widgets[index];
        widget.width = new_width;
        widget.x += delta;
        if let Some(p) = partner.and_then(|p| self.widgets.get_mut(p)) {
            p.width += delta;
        }
    }

    /// Move focus to the next (or previous) interactive widget.
    ///
    /// Returns false when focus runs off the end of the row.
    pub fn step_focus(&mut self, forward: bool) -> bool {
        let candidates: Vec<usize> = self.interactive().collect();
        let next = match (self.focused, forward) {
            (None, true) => candidates.first().copied(),
            (None, false) => candidates.last().copied(),
            (Some(cur), true) => candidates.iter().copied().find(|&i| i > cur),
            (Some(cur), false) => candidates.iter().rev().copied().find(|&i| i < cur),
        };
        self.focused = next;
        if let Some(field) = next.and_then(|i| self.widgets[i].field_mut()) {
            field.move_to_end();
        }
        next.is_some()
    }
}

/// One fixed-height position in the list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot<C> {
    Row(Row<C>),
    /// Renders nothing and forwards everything to the row at `owner`
    Spacer { owner: usize },
}

impl<C> Slot<C> {
    pub fn as_row(&self) -> Option<&Row<C>> {
        match self {
            Slot::Row(row) => Some(row),
            Slot::Spacer { .. } => None,
        }
    }

    pub fn as_row_mut(&mut self) -> Option<&mut Row<C>> {
        match self {
            Slot::Row(row) => Some(row),
            Slot::Spacer { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::UnicodeMeasure;
    use crate::rowlist::widget::{Change, TextField};

    fn delay_row() -> Row<&'static str> {
        let button = Widget::new(
            0,
            16,
            1,
            WidgetKind::Cycle {
                caption: Some("Mode".into()),
                options: vec!["Send".into(), "Type".into()],
                selected: 0,
                control: "mode",
            },
        );
        let field = TextField::new(FieldKind::Ticks, "0", 8).fitted(4, "__", 1).partner(0);
        let field = Widget::new(16, 4, 1, WidgetKind::Field { field, control: "ticks" });
        Row::new(RowKind::StrategyMode, vec![button, field])
    }

    #[test]
    fn test_pointer_down_activates_and_focuses() {
        let mut row = delay_row();
        match row.pointer_down(3, 2, 3) {
            RowHit::Event(ev) => {
                assert_eq!(ev.control, "mode");
                assert_eq!(ev.change, Change::Selected(1));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(row.focused, Some(0));
        assert_eq!(row.pointer_down(3, 2, 9), RowHit::Miss);
        assert_eq!(row.focused, None);
    }

    #[test]
    fn test_field_growth_shifts_left_and_shrinks_partner() {
        let mut row = delay_row();
        let m = UnicodeMeasure;
        row.pointer_down(0, 17, 0);
        assert_eq!(row.focused, Some(1));

        let hit = row.key(KeyInput::Char('1'), &m);
        assert_eq!(
            hit,
            RowHit::Event(ControlEvent {
                control: "ticks",
                change: Change::Ticks(1)
            })
        );
        for c in "234".chars() {
            row.key(KeyInput::Char(c), &m);
        }
        // "01234" + "__" + margin 1
        assert_eq!(row.widgets[1].width, 8);
        assert_eq!(row.widgets[1].x, 12);
        assert_eq!(row.widgets[0].width, 12);
        assert_eq!(row.widgets[1].x + row.widgets[1].width, 20);
    }

    #[test]
    fn test_invalid_ticks_consumed_without_event() {
        let mut row = delay_row();
        let m = UnicodeMeasure;
        row.pointer_down(0, 17, 0);
        assert_eq!(row.key(KeyInput::Char('x'), &m), RowHit::Consumed);
        assert_eq!(
            row.key(KeyInput::Backspace, &m),
            RowHit::Event(ControlEvent {
                control: "ticks",
                change: Change::Ticks(0)
            })
        );
    }

    #[test]
    fn test_step_focus_runs_off_end() {
        let mut row = delay_row();
        assert!(row.step_focus(true));
        assert_eq!(row.focused, Some(0));
        assert!(row.step_focus(true));
        assert_eq!(row.focused, Some(1));
        assert!(!row.step_focus(true));
        assert!(row.step_focus(false));
        assert_eq!(row.focused, Some(1));
    }
}
