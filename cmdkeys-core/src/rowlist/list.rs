//! The scrollable slot container.

use tracing::{debug, trace};

use super::row::{KeyInput, Row, RowHit, Slot};
use super::widget::{ControlEvent, Widget};
use crate::error::RowListError;
use crate::layout::{ListGeometry, Measure};
use crate::reorder::SlotKind;

/// An in-progress drag of a message row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragState {
    /// Slot of the row being dragged
    pub source: usize,
    /// Last pointer position
    pub pointer: (i32, i32),
}

/// Outcome of delivering one input event to the list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch<C> {
    Nothing,
    /// Handled inside the list (focus, cursor, scroll, drag motion)
    Consumed,
    Changed(ControlEvent<C>),
    /// A drag ended. `hovered` is the slot under the pointer, if any.
    Dropped { source: usize, hovered: Option<usize> },
}

pub struct RowList<C> {
    slots: Vec<Slot<C>>,
    geometry: ListGeometry,
    scroll: i32,
    focus: Option<usize>,
    drag: Option<DragState>,
    measure: Measure,
}

impl<C: Clone + PartialEq> RowList<C> {
    pub fn new(geometry: ListGeometry, measure: Measure) -> Self {
        Self {
            slots: Vec::new(),
            geometry,
            scroll: 0,
            focus: None,
            drag: None,
            measure,
        }
    }

    /// Build from a finished slot sequence, checking spacer adjacency
    pub fn from_slots(
        slots: Vec<Slot<C>>,
        geometry: ListGeometry,
        measure: Measure,
    ) -> Result<Self, RowListError> {
        let list = Self {
            slots,
            ..Self::new(geometry, measure)
        };
        list.validate()?;
        Ok(list)
    }

    pub fn push_row(&mut self, row: Row<C>) -> usize {
        self.slots.push(Slot::Row(row));
        self.slots.len() - 1
    }

    /// Append a spacer owned by the row just pushed
    pub fn push_spacer(&mut self) -> Result<usize, RowListError> {
        let len = self.slots.len();
        match self.slots.last() {
            None => Err(RowListError::SlotOutOfRange { slot: 0, len }),
            Some(Slot::Spacer { .. }) => Err(RowListError::NestedSpacer { slot: len }),
            Some(Slot::Row(_)) => {
                self.slots.push(Slot::Spacer { owner: len - 1 });
                Ok(len)
            }
        }
    }

    /// Every spacer must directly follow the row it extends
    pub fn validate(&self) -> Result<(), RowListError> {
        for (slot, entry) in self.slots.iter().enumerate() {
            let Slot::Spacer { owner } = entry else {
                continue;
            };
            let expected = slot.saturating_sub(1);
            if slot == 0 || *owner != expected {
                return Err(RowListError::OrphanSpacer {
                    slot,
                    owner: *owner,
                    expected,
                });
            }
            if matches!(self.slots[expected], Slot::Spacer { .. }) {
                return Err(RowListError::NestedSpacer { slot });
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[Slot<C>] {
        &self.slots
    }

    pub fn geometry(&self) -> &ListGeometry {
        &self.geometry
    }

    pub fn measure(&self) -> &Measure {
        &self.measure
    }

    /// Slot holding the row that `slot` stands for
    pub fn resolve(&self, slot: usize) -> Option<usize> {
        match self.slots.get(slot)? {
            Slot::Row(_) => Some(slot),
            Slot::Spacer { owner } => Some(*owner),
        }
    }

    pub fn row(&self, slot: usize) -> Option<&Row<C>> {
        let owner = self.resolve(slot)?;
        self.slots.get(owner)?.as_row()
    }

    pub fn row_mut(&mut self, slot: usize) -> Option<&mut Row<C>> {
        let owner = self.resolve(slot)?;
        self.slots.get_mut(owner)?.as_row_mut()
    }

    pub fn is_dragging(&self, slot: usize) -> bool {
        self.row(slot).is_some_and(|r| r.dragging)
    }

    pub fn set_dragging(&mut self, slot: usize, dragging: bool) {
        if let Some(row) = self.row_mut(slot) {
            row.dragging = dragging;
        }
    }

    /// Focused widget of the row at (or owning) `slot`
    pub fn focused(&self, slot: usize) -> Option<usize> {
        self.row(slot).and_then(|r| r.focused)
    }

    pub fn set_focused(&mut self, slot: usize, widget: Option<usize>) {
        let Some(owner) = self.resolve(slot) else {
            return;
        };
        if let Some(prev) = self.focus.filter(|&f| f != owner) {
            if let Some(row) = self.row_mut(prev) {
                row.focused = None;
            }
        }
        if let Some(row) = self.row_mut(owner) {
            row.focused = widget;
        }
        self.focus = widget.map(|_| owner);
    }

    /// `(owner slot, widget index)` of the focused widget reached through `slot`
    pub fn focus_path_at(&self, slot: usize) -> Option<(usize, usize)> {
        let owner = self.resolve(slot)?;
        self.focused(owner).map(|w| (owner, w))
    }

    /// Row slot currently holding keyboard focus
    pub fn focus(&self) -> Option<usize> {
        self.focus
    }

    pub fn focused_widget(&self) -> Option<&Widget<C>> {
        self.focus
            .and_then(|slot| self.row(slot))
            .and_then(|row| row.focused_widget())
    }

    pub fn drag(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    pub fn scroll(&self) -> i32 {
        self.scroll
    }

    pub fn max_scroll(&self) -> i32 {
        let total = i32::try_from(self.slots.len()).unwrap_or(i32::MAX) * self.geometry.item_height;
        (total - self.geometry.height).max(0)
    }

    pub fn set_scroll(&mut self, scroll: i32) {
        self.scroll = scroll.clamp(0, self.max_scroll());
    }

    pub fn scroll_by(&mut self, delta: i32) -> Dispatch<C> {
        let before = self.scroll;
        self.set_scroll(self.scroll + delta);
        if self.scroll == before {
            Dispatch::Nothing
        } else {
            Dispatch::Consumed
        }
    }

    /// Screen y of the top edge of `slot`
    pub fn slot_top(&self, slot: usize) -> i32 {
        let slot = i32::try_from(slot).unwrap_or(i32::MAX);
        self.geometry.top + slot * self.geometry.item_height - self.scroll
    }

    pub fn hit_test(&self, x: i32, y: i32) -> Option<usize> {
        let geo = &self.geometry;
        if x < geo.row_left() || x >= geo.row_right() || y < geo.top || y >= geo.bottom() {
            return None;
        }
        let slot = usize::try_from((y - geo.top + self.scroll) / geo.item_height).ok()?;
        (slot < self.slots.len()).then_some(slot)
    }

    pub fn pointer_down(&mut self, x: i32, y: i32) -> Dispatch<C> {
        let Some(slot) = self.hit_test(x, y) else {
            self.clear_focus();
            return Dispatch::Nothing;
        };
        let Some(owner) = self.resolve(slot) else {
            return Dispatch::Nothing;
        };
        let row_y = self.slot_top(owner);
        if let Some(prev) = self.focus.filter(|&f| f != owner) {
            if let Some(row) = self.row_mut(prev) {
                row.focused = None;
            }
            self.focus = None;
        }
        let Some(row) = self.row_mut(owner) else {
            return Dispatch::Nothing;
        };
        let hit = row.pointer_down(row_y, x, y);
        let has_focus = row.focused.is_some();
        self.focus = has_focus.then_some(owner);

        match hit {
            RowHit::Miss => Dispatch::Nothing,
            RowHit::Consumed => Dispatch::Consumed,
            RowHit::DragStart => {
                self.set_dragging(owner, true);
                self.drag = Some(DragState {
                    source: owner,
                    pointer: (x, y),
                });
                debug!(slot = owner, "drag started");
                Dispatch::Consumed
            }
            RowHit::Event(event) => Dispatch::Changed(event),
        }
    }

    pub fn pointer_drag(&mut self, x: i32, y: i32) -> Dispatch<C> {
        match self.drag.as_mut() {
            Some(drag) => {
                drag.pointer = (x, y);
                Dispatch::Consumed
            }
            None => Dispatch::Nothing,
        }
    }

    /// End a drag. The drag state is cleared whatever the drop turns out to mean.
    pub fn pointer_up(&mut self, x: i32, y: i32) -> Dispatch<C> {
        let Some(drag) = self.drag.take() else {
            return Dispatch::Nothing;
        };
        self.set_dragging(drag.source, false);
        let hovered = self.hit_test(x, y);
        debug!(source = drag.source, ?hovered, "drag released");
        Dispatch::Dropped {
            source: drag.source,
            hovered,
        }
    }

    pub fn cancel_drag(&mut self) -> bool {
        match self.drag.take() {
            Some(drag) => {
                self.set_dragging(drag.source, false);
                true
            }
            None => false,
        }
    }

    pub fn key(&mut self, input: KeyInput) -> Dispatch<C> {
        let page = (self.geometry.height - self.geometry.item_height).max(self.geometry.item_height);
        match input {
            KeyInput::Escape if self.cancel_drag() => Dispatch::Consumed,
            KeyInput::Escape if self.focus.is_some() => {
                self.clear_focus();
                Dispatch::Consumed
            }
            KeyInput::Tab => self.step_focus(true),
            KeyInput::BackTab => self.step_focus(false),
            KeyInput::Up => self.scroll_by(-self.geometry.item_height),
            KeyInput::Down => self.scroll_by(self.geometry.item_height),
            KeyInput::PageUp => self.scroll_by(-page),
            KeyInput::PageDown => self.scroll_by(page),
            _ => {
                let Some(slot) = self.focus else {
                    return Dispatch::Nothing;
                };
                let measure = self.measure.clone();
                let Some(row) = self.row_mut(slot) else {
                    return Dispatch::Nothing;
                };
                match row.key(input, measure.as_ref()) {
                    RowHit::Miss => Dispatch::Nothing,
                    RowHit::Consumed | RowHit::DragStart => Dispatch::Consumed,
                    RowHit::Event(event) => Dispatch::Changed(event),
                }
            }
        }
    }

    fn clear_focus(&mut self) {
        if let Some(slot) = self.focus.take() {
            if let Some(row) = self.row_mut(slot) {
                row.focused = None;
            }
        }
    }

    /// Walk focus across rows in slot order, never landing on a spacer
    fn step_focus(&mut self, forward: bool) -> Dispatch<C> {
        let rows: Vec<usize> = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.as_row().is_some_and(|r| r.interactive().next().is_some()))
            .map(|(i, _)| i)
            .collect();
        if rows.is_empty() {
            return Dispatch::Nothing;
        }

        if let Some(current) = self.focus {
            if let Some(row) = self.row_mut(current) {
                if row.step_focus(forward) {
                    self.ensure_visible(current);
                    return Dispatch::Consumed;
                }
            }
        }

        let pos = self.focus.and_then(|f| rows.iter().position(|&r| r == f));
        let next = match (pos, forward) {
            (None, true) => rows[0],
            (None, false) => rows[rows.len() - 1],
            (Some(p), true) => rows[(p + 1) % rows.len()],
            (Some(p), false) => rows[(p + rows.len() - 1) % rows.len()],
        };
        self.clear_focus();
        if let Some(row) = self.row_mut(next) {
            row.focused = None;
            row.step_focus(forward);
        }
        self.focus = Some(next);
        self.ensure_visible(next);
        trace!(slot = next, "focus moved");
        Dispatch::Consumed
    }

    fn ensure_visible(&mut self, slot: usize) {
        let ih = self.geometry.item_height;
        let top = i32::try_from(slot).unwrap_or(i32::MAX) * ih;
        if top < self.scroll {
            self.set_scroll(top);
        } else if top + ih > self.scroll + self.geometry.height {
            self.set_scroll(top + ih - self.geometry.height);
        }
    }

    pub fn find_widget_mut(&mut self, control: &C) -> Option<(usize, usize, &mut Widget<C>)> {
        self.slots.iter_mut().enumerate().find_map(|(slot, s)| {
            let row = s.as_row_mut()?;
            let index = row
                .widgets
                .iter()
                .position(|w| w.control() == Some(control))?;
            Some((slot, index, &mut row.widgets[index]))
        })
    }

    /// Focus the widget tagged `control`, cursor at end of text.
    ///
    /// Hosts call this after a rebuild that must keep the user's place.
    pub fn focus_control(&mut self, control: &C) -> bool {
        let Some((slot, index, widget)) = self.find_widget_mut(control) else {
            return false;
        };
        if let Some(field) = widget.field_mut() {
            field.move_to_end();
        }
        self.set_focused(slot, Some(index));
        self.ensure_visible(slot);
        debug!(slot, widget = index, "focus restored");
        true
    }

    /// Rows to draw with their screen y, skipping the one being dragged
    pub fn visible(&self) -> impl Iterator<Item = (usize, i32, &Row<C>)> + '_ {
        let ih = self.geometry.item_height;
        let (top, bottom) = (self.geometry.top, self.geometry.bottom());
        self.slots.iter().enumerate().filter_map(move |(slot, s)| {
            let row = s.as_row()?;
            let y = self.slot_top(slot);
            let visible = y + row.extent(ih) > top && y < bottom;
            (visible && !row.dragging).then_some((slot, y, row))
        })
    }

    /// The dragged row, positioned to follow the pointer
    pub fn drag_overlay(&self) -> Option<(i32, &Row<C>)> {
        let drag = self.drag.as_ref()?;
        let row = self.row(drag.source)?;
        Some((drag.pointer.1 - self.geometry.item_height / 2, row))
    }

    /// Tooltip of the widget under the pointer
    pub fn tooltip_at(&self, x: i32, y: i32) -> Option<&str> {
        let owner = self.resolve(self.hit_test(x, y)?)?;
        let row = self.row(owner)?;
        let index = row.widget_at(self.slot_top(owner), x, y)?;
        row.widgets[index].tooltip.as_deref()
    }

    pub fn slot_kinds(&self) -> Vec<SlotKind> {
        self.slots
            .iter()
            .map(|s| match s {
                Slot::Row(row) if row.is_message() => SlotKind::Message,
                Slot::Row(_) => SlotKind::Other,
                Slot::Spacer { owner } => SlotKind::Spacer { owner: *owner },
            })
            .collect()
    }
}

impl<C> std::fmt::Debug for RowList<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowList")
            .field("slots", &self.slots.len())
            .field("geometry", &self.geometry)
            .field("scroll", &self.scroll)
            .field("focus", &self.focus)
            .field("drag", &self.drag)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::layout::UnicodeMeasure;
    use crate::rowlist::row::RowKind;
    use crate::rowlist::widget::{Change, FieldKind, TextField, WidgetKind};

    type Ctl = &'static str;

    fn geometry(height: i32) -> ListGeometry {
        ListGeometry {
            width: 40,
            height,
            top: 2,
            item_height: 1,
            row_width: 40,
        }
    }

    fn button(x: i32, control: Ctl) -> Widget<Ctl> {
        Widget::new(
            x,
            5,
            1,
            WidgetKind::Button {
                label: control.into(),
                control,
            },
        )
    }

    fn message_row(index: usize) -> Row<Ctl> {
        let handle = Widget::new(0, 2, 1, WidgetKind::DragHandle { label: "::".into() });
        let text = Widget::new(
            3,
            20,
            2,
            WidgetKind::Field {
                field: TextField::new(FieldKind::MultiLine, "hi", 256),
                control: "text",
            },
        );
        Row::new(RowKind::Message { index }, vec![handle, text])
    }

    /// header, two messages with spacers, add button
    fn sample(height: i32) -> RowList<Ctl> {
        let mut list = RowList::new(geometry(height), Arc::new(UnicodeMeasure));
        list.push_row(Row::new(
            RowKind::Text,
            vec![Widget::new(0, 8, 1, WidgetKind::Label { text: "Messages".into() })],
        ));
        for i in 0..2 {
            list.push_row(message_row(i));
            list.push_spacer().unwrap();
        }
        list.push_row(Row::new(RowKind::Action, vec![button(0, "add")]));
        list
    }

    #[test]
    fn test_spacer_forwards_dragging_and_focus() {
        let mut list = sample(10);
        list.set_dragging(1, true);
        assert!(list.is_dragging(2));
        list.set_dragging(2, false);
        assert!(!list.is_dragging(1));

        list.set_focused(2, Some(1));
        assert_eq!(list.focused(1), Some(1));
        assert_eq!(list.focus_path_at(2), Some((1, 1)));
    }

    #[test]
    fn test_hit_test_honours_scroll_and_bounds() {
        let mut list = sample(3);
        assert_eq!(list.hit_test(5, 2), Some(0));
        assert_eq!(list.hit_test(5, 4), Some(2));
        assert_eq!(list.hit_test(5, 5), None);
        assert_eq!(list.hit_test(5, 1), None);
        list.set_scroll(2);
        assert_eq!(list.hit_test(5, 2), Some(2));
    }

    #[test]
    fn test_scroll_clamps() {
        let mut list = sample(3);
        assert_eq!(list.max_scroll(), 3);
        list.set_scroll(99);
        assert_eq!(list.scroll(), 3);
        assert_eq!(list.scroll_by(-10), Dispatch::Consumed);
        assert_eq!(list.scroll(), 0);
        assert_eq!(list.scroll_by(-1), Dispatch::Nothing);
    }

    #[test]
    fn test_click_in_spacer_reaches_owner_field() {
        let mut list = sample(10);
        // slot 2 is the spacer of the first message; its field is two tall
        assert_eq!(list.pointer_down(5, 4), Dispatch::Consumed);
        assert_eq!(list.focus(), Some(1));
        assert_eq!(list.focused(2), Some(1));
    }

    #[test]
    fn test_drag_lifecycle() {
        let mut list = sample(10);
        assert_eq!(list.pointer_down(0, 5), Dispatch::Consumed);
        assert!(list.is_dragging(3));
        assert_eq!(list.visible().filter(|(s, _, _)| *s == 3).count(), 0);

        list.pointer_drag(0, 3);
        let (y, row) = list.drag_overlay().unwrap();
        assert_eq!(y, 3);
        assert_eq!(row.kind, RowKind::Message { index: 1 });

        assert_eq!(
            list.pointer_up(0, 3),
            Dispatch::Dropped {
                source: 3,
                hovered: Some(1)
            }
        );
        assert!(list.drag().is_none());
        assert!(!list.is_dragging(3));
        assert_eq!(list.pointer_up(0, 3), Dispatch::Nothing);
    }

    #[test]
    fn test_escape_cancels_drag() {
        let mut list = sample(10);
        list.pointer_down(0, 3);
        assert_eq!(list.key(KeyInput::Escape), Dispatch::Consumed);
        assert!(list.drag().is_none());
        assert!(!list.is_dragging(1));
    }

    #[test]
    fn test_tab_skips_spacers_and_labels() {
        let mut list = sample(10);
        let mut visited = Vec::new();
        for _ in 0..5 {
            list.key(KeyInput::Tab);
            visited.push(list.focus_path_at(list.focus().unwrap()).unwrap());
        }
        // drag handles are interactive; the header label is not
        assert_eq!(visited, vec![(1, 0), (1, 1), (3, 0), (3, 1), (5, 0)]);
        list.key(KeyInput::Tab);
        assert_eq!(list.focus(), Some(1));
        list.key(KeyInput::BackTab);
        assert_eq!(list.focus_path_at(5), Some((5, 0)));
    }

    #[test]
    fn test_typing_into_focused_field() {
        let mut list = sample(10);
        list.pointer_down(5, 3);
        match list.key(KeyInput::Char('!')) {
            Dispatch::Changed(ev) => assert_eq!(ev.change, Change::Text("hi!".into())),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_focus_control_scrolls_into_view() {
        let mut list = sample(2);
        assert!(list.focus_control(&"add"));
        assert_eq!(list.focus(), Some(5));
        assert_eq!(list.scroll(), 4);
        assert!(!list.focus_control(&"missing"));
    }

    #[test]
    fn test_validate_rejects_orphan_spacer() {
        let slots: Vec<Slot<Ctl>> = vec![
            Slot::Row(message_row(0)),
            Slot::Row(message_row(1)),
            Slot::Spacer { owner: 0 },
        ];
        let err = RowList::from_slots(slots, geometry(5), Arc::new(UnicodeMeasure)).unwrap_err();
        assert_eq!(
            err,
            RowListError::OrphanSpacer {
                slot: 2,
                owner: 0,
                expected: 1
            }
        );

        let mut list: RowList<Ctl> = RowList::new(geometry(5), Arc::new(UnicodeMeasure));
        assert!(list.push_spacer().is_err());
        list.push_row(message_row(0));
        list.push_spacer().unwrap();
        assert_eq!(list.push_spacer(), Err(RowListError::NestedSpacer { slot: 2 }));
    }

    #[test]
    fn test_slot_kinds() {
        let list = sample(10);
        assert_eq!(
            list.slot_kinds(),
            vec![
                SlotKind::Other,
                SlotKind::Message,
                SlotKind::Spacer { owner: 1 },
                SlotKind::Message,
                SlotKind::Spacer { owner: 3 },
                SlotKind::Other,
            ]
        );
    }
}
