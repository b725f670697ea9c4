//! Event handling for the TUI

use std::time::Duration;

use cmdkeys_core::{Keybind, KeyInput};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};

use super::app::App;

/// Rows moved per mouse wheel notch
const WHEEL_ROWS: i32 = 3;

/// Poll for events with timeout
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Result of handling a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleResult {
    /// Continue running
    Continue,
    /// Quit without saving
    Quit,
    /// Save, then quit
    SaveAndQuit,
}

/// Handle a key event
pub fn handle_key(app: &mut App, key: KeyEvent) -> HandleResult {
    if key.kind != KeyEventKind::Press {
        return HandleResult::Continue;
    }

    // Host shortcuts all use Ctrl so plain letters reach the fields
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => return HandleResult::Quit,
            KeyCode::Char('q') => return HandleResult::SaveAndQuit,
            KeyCode::Char('s') => app.save(),
            KeyCode::Char('n') => app.next_macro(),
            KeyCode::Char('p') => app.prev_macro(),
            KeyCode::Char('a') => app.add_macro(),
            KeyCode::Char('r') => app.toggle_repeat(),
            _ => {}
        }
        return HandleResult::Continue;
    }

    // Keys with no KeyInput form can still be bound while capturing
    if app.editor.capture().is_some() {
        if let KeyCode::F(n) = key.code {
            let result = app.editor.capture_key(Keybind::key(format!("F{}", n)));
            app.report(result);
            return HandleResult::Continue;
        }
    }

    if let Some(input) = key_input(key.code) {
        app.clear_status();
        let result = app.editor.key(input);
        app.report(result);
    }
    HandleResult::Continue
}

/// Map a crossterm key to the editor's input vocabulary
pub fn key_input(code: KeyCode) -> Option<KeyInput> {
    let input = match code {
        KeyCode::Char(c) => KeyInput::Char(c),
        KeyCode::Backspace => KeyInput::Backspace,
        KeyCode::Delete => KeyInput::Delete,
        KeyCode::Left => KeyInput::Left,
        KeyCode::Right => KeyInput::Right,
        KeyCode::Home => KeyInput::Home,
        KeyCode::End => KeyInput::End,
        KeyCode::Enter => KeyInput::Enter,
        KeyCode::Tab => KeyInput::Tab,
        KeyCode::BackTab => KeyInput::BackTab,
        KeyCode::Up => KeyInput::Up,
        KeyCode::Down => KeyInput::Down,
        KeyCode::PageUp => KeyInput::PageUp,
        KeyCode::PageDown => KeyInput::PageDown,
        KeyCode::Esc => KeyInput::Escape,
        _ => return None,
    };
    Some(input)
}

/// Handle a mouse event
pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let (x, y) = app.to_list(mouse.column, mouse.row);
    app.pointer = Some((x, y));

    let result = match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            app.clear_status();
            app.editor.pointer_down(x, y)
        }
        MouseEventKind::Drag(MouseButton::Left) => app.editor.pointer_drag(x, y),
        MouseEventKind::Up(MouseButton::Left) => app.editor.pointer_up(x, y),
        MouseEventKind::ScrollDown => {
            let step = app.editor.list().geometry().item_height * WHEEL_ROWS;
            app.editor.scroll_by(step)
        }
        MouseEventKind::ScrollUp => {
            let step = app.editor.list().geometry().item_height * WHEEL_ROWS;
            app.editor.scroll_by(-step)
        }
        _ => return,
    };
    app.report(result);
}
