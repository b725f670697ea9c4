//! UI rendering using ratatui

use cmdkeys_core::rowlist::{FieldKind, FieldStatus, TextField};
use cmdkeys_core::{MacroControl, Row, Widget, WidgetKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Tabs},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use super::app::App;

/// Primary accent color
const ACCENT: Color = Color::Cyan;
/// Secondary color for less important elements
const SECONDARY: Color = Color::DarkGray;
/// Highlight color for focused widgets
const HIGHLIGHT: Color = Color::Yellow;
/// Success color
const SUCCESS: Color = Color::Green;
/// Dim text color
const DIM: Color = Color::Rgb(100, 100, 100);
/// Invalid field contents
const ERROR: Color = Color::Red;
/// Field background
const FIELD_BG: Color = Color::Rgb(40, 40, 40);

/// Screen regions
pub struct Screen {
    pub tabs: Rect,
    pub list_block: Rect,
    pub list: Rect,
    pub tooltip: Rect,
    pub status: Rect,
}

pub fn screen(area: Rect) -> Screen {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Macro tabs
            Constraint::Min(3),    // Row list
            Constraint::Length(1), // Tooltip
            Constraint::Length(1), // Status bar
        ])
        .split(area);
    let list_block = chunks[1];
    Screen {
        tabs: chunks[0],
        list_block,
        list: list_frame().inner(list_block),
        tooltip: chunks[2],
        status: chunks[3],
    }
}

fn list_frame() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(SECONDARY))
}

/// Render the entire UI
pub fn render(frame: &mut Frame, app: &App) {
    let screen = screen(frame.area());

    render_tabs(frame, app, screen.tabs);
    render_list(frame, app, &screen);
    render_tooltip(frame, app, screen.tooltip);
    render_status_bar(frame, app, screen.status);
}

/// One tab per macro, labelled with its key
fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let profile = app.editor.profile();
    let titles: Vec<String> = profile
        .macros
        .iter()
        .enumerate()
        .map(|(i, m)| format!("{}:{}", i + 1, m.keybind))
        .collect();

    let dirty = if app.is_dirty() { " [+]" } else { "" };
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .title(format!(" cmdkeys :: {}{} ", profile.name, dirty))
                .title_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(SECONDARY)),
        )
        .select(app.editor.macro_index())
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD));

    frame.render_widget(tabs, area);
}

fn render_list(frame: &mut Frame, app: &App, screen: &Screen) {
    let list = app.editor.list();
    let inner = screen.list;

    let mode = app
        .editor
        .current()
        .map(|m| m.mode.label())
        .unwrap_or_default();
    let block = list_frame()
        .title(format!(" Macro {} :: {} ", app.editor.macro_index() + 1, mode))
        .title_style(Style::default().fg(ACCENT));
    frame.render_widget(block, screen.list_block);

    for (_, y, row) in list.visible() {
        render_row(frame, inner, y, row, false);
    }

    if let Some((y, row)) = list.drag_overlay() {
        render_row(frame, inner, y, row, true);
    }

    if list.max_scroll() > 0 {
        let mut state = ScrollbarState::new(list.max_scroll() as usize)
            .position(list.scroll() as usize)
            .viewport_content_length(inner.height as usize);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            screen.list_block,
            &mut state,
        );
    }

    if let Some(position) = cursor_position(app, inner) {
        frame.set_cursor_position(position);
    }
}

fn render_row(frame: &mut Frame, inner: Rect, y: i32, row: &Row<MacroControl>, overlay: bool) {
    for (index, widget) in row.widgets.iter().enumerate() {
        let Some((rect, skip)) = clip(inner, widget.x, y, widget.width, widget.height) else {
            continue;
        };
        if overlay {
            frame.render_widget(Clear, rect);
        }
        let focused = row.focused == Some(index);
        let mut style = widget_style(widget, focused);
        if overlay {
            style = style.fg(HIGHLIGHT).add_modifier(Modifier::BOLD);
        }

        let lines: Vec<Line> = match widget.field() {
            Some(field) => field_lines(field, widget.width, widget.height)
                .0
                .into_iter()
                .map(Line::from)
                .collect(),
            None => vec![Line::from(widget_text(widget))],
        };
        let paragraph = Paragraph::new(lines).style(style).scroll(skip);
        frame.render_widget(paragraph, rect);
    }
}

fn widget_text(widget: &Widget<MacroControl>) -> String {
    let text = widget.display();
    match &widget.kind {
        WidgetKind::Label { .. } => text,
        _ => center(&text, widget.width),
    }
}

fn widget_style(widget: &Widget<MacroControl>, focused: bool) -> Style {
    let base = match &widget.kind {
        WidgetKind::Label { .. } => Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        WidgetKind::Button { .. } => Style::default().fg(Color::White).bg(SECONDARY),
        WidgetKind::DragHandle { .. } => Style::default().fg(ACCENT),
        WidgetKind::Toggle { value: true, .. } => Style::default().fg(SUCCESS).bg(SECONDARY),
        WidgetKind::Toggle { .. } | WidgetKind::Cycle { .. } => {
            Style::default().fg(ACCENT).bg(SECONDARY)
        }
        WidgetKind::Field { field, .. } => {
            let fg = match field.status {
                FieldStatus::Neutral => Color::White,
                FieldStatus::Error => ERROR,
            };
            Style::default().fg(fg).bg(FIELD_BG)
        }
    };

    if !widget.active {
        Style::default().fg(DIM).bg(base.bg.unwrap_or(Color::Reset))
    } else if focused && widget.field().is_none() {
        Style::default()
            .fg(Color::Black)
            .bg(HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    } else if focused {
        base.add_modifier(Modifier::UNDERLINED)
    } else {
        base
    }
}

/// Intersect a widget box in list coordinates with the list area.
///
/// Returns the screen rect and the `(rows, columns)` cut off at the top
/// and left, for `Paragraph::scroll`.
fn clip(inner: Rect, x: i32, y: i32, width: i32, height: i32) -> Option<(Rect, (u16, u16))> {
    let left = x.max(0);
    let top = y.max(0);
    let right = (x + width).min(i32::from(inner.width));
    let bottom = (y + height).min(i32::from(inner.height));
    if left >= right || top >= bottom {
        return None;
    }
    let rect = Rect::new(
        inner.x + u16::try_from(left).ok()?,
        inner.y + u16::try_from(top).ok()?,
        u16::try_from(right - left).ok()?,
        u16::try_from(bottom - top).ok()?,
    );
    let skip = (
        u16::try_from(top - y).ok()?,
        u16::try_from(left - x).ok()?,
    );
    Some((rect, skip))
}

fn center(text: &str, width: i32) -> String {
    let used: i32 = text
        .chars()
        .map(|c| c.width().unwrap_or(0) as i32)
        .sum();
    let pad = ((width - used) / 2).max(0) as usize;
    format!("{}{}", " ".repeat(pad), text)
}

/// Lay out field text in a `width` x `height` box.
///
/// Single-line fields scroll horizontally to keep the cursor in view;
/// multi-line fields wrap and scroll vertically. Returns the visible lines
/// and the cursor's `(column, row)` within the box.
pub fn field_lines(field: &TextField, width: i32, height: i32) -> (Vec<String>, (i32, i32)) {
    let width = width.max(1);
    let height = height.max(1);

    if field.kind != FieldKind::MultiLine {
        let before: i32 = field
            .text
            .chars()
            .take(field.cursor)
            .map(|c| c.width().unwrap_or(0) as i32)
            .sum();
        let offset = (before - (width - 1)).max(0);
        let mut col = 0;
        let visible: String = field
            .text
            .chars()
            .filter(|c| {
                let start = col;
                col += c.width().unwrap_or(0) as i32;
                start >= offset
            })
            .collect();
        return (vec![visible], (before - offset, 0));
    }

    let mut lines = vec![String::new()];
    let mut col = 0;
    let mut cursor = (0, 0);
    for (i, c) in field.text.chars().enumerate() {
        let w = c.width().unwrap_or(0) as i32;
        if col + w > width {
            lines.push(String::new());
            col = 0;
        }
        if i == field.cursor {
            cursor = (col, lines.len() as i32 - 1);
        }
        if let Some(line) = lines.last_mut() {
            line.push(c);
        }
        col += w;
    }
    if field.cursor >= field.text.chars().count() {
        if col >= width {
            lines.push(String::new());
            col = 0;
        }
        cursor = (col, lines.len() as i32 - 1);
    }

    let first = (cursor.1 - (height - 1)).max(0);
    let visible = lines
        .into_iter()
        .skip(first as usize)
        .take(height as usize)
        .collect();
    (visible, (cursor.0, cursor.1 - first))
}

/// Terminal cursor for the focused text field, if it is on screen
fn cursor_position(app: &App, inner: Rect) -> Option<Position> {
    if app.editor.list().drag().is_some() {
        return None;
    }
    let list = app.editor.list();
    let slot = list.focus()?;
    let widget = list.focused_widget()?;
    let field = widget.field()?;
    let (col, row) = field_lines(field, widget.width, widget.height).1;
    let x = widget.x + col.min(widget.width - 1);
    let y = list.slot_top(slot) + row;
    if x < 0 || y < 0 || x >= i32::from(inner.width) || y >= i32::from(inner.height) {
        return None;
    }
    Some(Position::new(
        inner.x + u16::try_from(x).ok()?,
        inner.y + u16::try_from(y).ok()?,
    ))
}

/// Tooltip under the pointer, else the focused widget's
fn render_tooltip(frame: &mut Frame, app: &App, area: Rect) {
    let list = app.editor.list();
    let hovered = app.pointer.and_then(|(x, y)| list.tooltip_at(x, y));
    let text = hovered
        .or_else(|| list.focused_widget().and_then(|w| w.tooltip.as_deref()))
        .unwrap_or("");

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            text.to_string(),
            Style::default().fg(SECONDARY),
        ))),
        area,
    );
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let (mode_indicator, help_text) = if app.editor.capture().is_some() {
        (
            Span::styled(" CAPTURE ", Style::default().bg(HIGHLIGHT).fg(Color::Black)),
            "Press a key to bind  Esc:unbind",
        )
    } else if app.editor.list().drag().is_some() {
        (
            Span::styled(" DRAG ", Style::default().bg(Color::Magenta).fg(Color::Black)),
            "Release over a message to move  Esc:cancel",
        )
    } else if app
        .editor
        .list()
        .focused_widget()
        .is_some_and(|w| w.field().is_some())
    {
        (
            Span::styled(" EDIT ", Style::default().bg(SUCCESS).fg(Color::Black)),
            "Tab:next  Esc:leave field  ^S:save  ^Q:save+quit",
        )
    } else {
        (
            Span::styled(" NORMAL ", Style::default().bg(ACCENT).fg(Color::Black)),
            "Tab:focus  Enter:press  ^N/^P:macro  ^A:add  ^R:repeat  ^S:save  ^Q:save+quit  ^C:quit",
        )
    };

    let status = app.status_message.as_deref().unwrap_or("");

    let line = Line::from(vec![
        mode_indicator,
        Span::raw(" "),
        Span::styled(help_text, Style::default().fg(DIM)),
        Span::raw(" "),
        Span::styled(status, Style::default().fg(HIGHLIGHT)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_inside() {
        let inner = Rect::new(1, 4, 80, 20);
        let (rect, skip) = clip(inner, 10, 2, 5, 1).unwrap();
        assert_eq!(rect, Rect::new(11, 6, 5, 1));
        assert_eq!(skip, (0, 0));
    }

    #[test]
    fn test_clip_cuts_top_rows() {
        let inner = Rect::new(0, 0, 80, 20);
        let (rect, skip) = clip(inner, 0, -1, 10, 2).unwrap();
        assert_eq!(rect, Rect::new(0, 0, 10, 1));
        assert_eq!(skip, (1, 0));
        assert!(clip(inner, 0, 20, 10, 1).is_none());
        assert!(clip(inner, 90, 0, 10, 1).is_none());
    }

    #[test]
    fn test_single_line_scrolls_to_cursor() {
        let mut field = TextField::new(FieldKind::Ticks, "123456789", 16);
        field.move_to_end();
        let (lines, cursor) = field_lines(&field, 4, 1);
        assert_eq!(lines, vec!["789".to_string()]);
        assert_eq!(cursor, (3, 0));

        field.cursor = 0;
        let (lines, cursor) = field_lines(&field, 4, 1);
        assert_eq!(lines[0], "123456789");
        assert_eq!(cursor, (0, 0));
    }

    #[test]
    fn test_multiline_wraps_and_follows_cursor() {
        let mut field = TextField::new(FieldKind::MultiLine, "abcdefghij", 256);
        field.move_to_end();
        let (lines, cursor) = field_lines(&field, 4, 2);
        assert_eq!(lines, vec!["efgh".to_string(), "ij".to_string()]);
        assert_eq!(cursor, (2, 1));

        field.cursor = 1;
        let (lines, cursor) = field_lines(&field, 4, 2);
        assert_eq!(lines, vec!["abcd".to_string(), "efgh".to_string()]);
        assert_eq!(cursor, (1, 0));
    }

    #[test]
    fn test_multiline_wide_chars() {
        let mut field = TextField::new(FieldKind::MultiLine, "日本語", 256);
        field.move_to_end();
        let (lines, cursor) = field_lines(&field, 4, 2);
        assert_eq!(lines, vec!["日本".to_string(), "語".to_string()]);
        assert_eq!(cursor, (2, 1));
    }

    #[test]
    fn test_center() {
        assert_eq!(center("ab", 6), "  ab");
        assert_eq!(center("toolong", 3), "toolong");
    }
}
