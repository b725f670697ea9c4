//! Editor session state for the terminal host

use std::sync::Arc;

use anyhow::{Context, Result};
use cmdkeys_core::{
    EditorConfig, Effect, ListDims, Macro, MacroEditor, Profile, ProfileKeybinds, ProfileStore, SendMode,
    UnicodeMeasure,
};
use ratatui::layout::Rect;
use tracing::{error, info};

use crate::config::CliConfig;
use crate::store::TomlProfileStore;

/// Main application state
#[derive(Debug)]
pub struct App {
    pub editor: MacroEditor,
    store: TomlProfileStore,
    /// Profile as last loaded or saved
    saved: Profile,
    /// Screen rect the row list is drawn into
    pub list_area: Rect,
    /// Last pointer position, in list coordinates
    pub pointer: Option<(i32, i32)>,
    /// Status message (shown in status bar)
    pub status_message: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        store: TomlProfileStore,
        profile: Profile,
        macro_index: usize,
        config: &CliConfig,
    ) -> Result<Self> {
        let saved = profile.clone();
        let editor = MacroEditor::new(
            profile,
            macro_index,
            Box::new(ProfileKeybinds::new()),
            EditorConfig {
                layout: config.layout(),
                labels: config.labels.clone(),
            },
            Arc::new(UnicodeMeasure),
            ListDims::default(),
        )
        .context("Failed to build editor")?;

        Ok(Self {
            editor,
            store,
            saved,
            list_area: Rect::default(),
            pointer: None,
            status_message: None,
            should_quit: false,
        })
    }

    /// Whether the profile differs from the saved one, ignoring repeat tasks
    pub fn is_dirty(&self) -> bool {
        let (a, b) = (self.editor.profile(), &self.saved);
        let settings = |m: &Macro| Macro {
            repeating: None,
            ..m.clone()
        };
        a.name != b.name
            || a.show_hud_message != b.show_hud_message
            || a.add_to_history != b.add_to_history
            || a.macros.len() != b.macros.len()
            || a.macros
                .iter()
                .zip(&b.macros)
                .any(|(x, y)| settings(x) != settings(y))
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Keep the editor sized to `area`
    pub fn fit(&mut self, area: Rect) {
        if area == self.list_area {
            return;
        }
        self.list_area = area;
        let result = self
            .editor
            .resize(i32::from(area.width), i32::from(area.height));
        self.report(result.map(|_| Effect::Rebuild));
    }

    /// Screen cell to list coordinates
    pub fn to_list(&self, column: u16, row: u16) -> (i32, i32) {
        (
            i32::from(column) - i32::from(self.list_area.x),
            i32::from(row) - i32::from(self.list_area.y),
        )
    }

    /// Surface editor failures in the status bar instead of tearing down the
    /// terminal
    pub fn report(&mut self, result: cmdkeys_core::Result<Effect>) {
        if let Err(err) = result {
            error!(%err, "editor error");
            self.set_status(format!("Error: {}", err));
        }
    }

    pub fn save(&mut self) {
        match self.store.save(self.editor.profile()) {
            Ok(()) => {
                self.saved = self.editor.profile().clone();
                self.set_status(format!("Saved {}", self.store.path().display()));
            }
            Err(err) => {
                error!(%err, "save failed");
                self.set_status(format!("Save failed: {}", err));
            }
        }
    }

    pub fn next_macro(&mut self) {
        self.step_macro(1);
    }

    pub fn prev_macro(&mut self) {
        self.step_macro(-1);
    }

    fn step_macro(&mut self, delta: isize) {
        let len = self.editor.profile().macros.len();
        if len < 2 {
            return;
        }
        let current = self.editor.macro_index() as isize;
        let next = (current + delta).rem_euclid(len as isize) as usize;
        self.select_macro(next);
    }

    fn select_macro(&mut self, index: usize) {
        match self.editor.select_macro(index) {
            Ok(()) => {
                let len = self.editor.profile().macros.len();
                self.set_status(format!("Macro {}/{}", index + 1, len));
            }
            Err(err) => self.report(Err(err)),
        }
    }

    pub fn add_macro(&mut self) {
        match self.editor.add_macro() {
            Ok(index) => {
                info!(index, "macro added");
                self.set_status(format!("Added macro {}", index + 1));
            }
            Err(err) => self.report(Err(err)),
        }
    }

    /// Start or stop the current macro's repeat task.
    ///
    /// Nothing is sent from the editor; this only tracks the task handle the
    /// way a game client would.
    pub fn toggle_repeat(&mut self) {
        let (mode, repeating) = match self.editor.current() {
            Ok(m) => (m.mode, m.has_repeating()),
            Err(err) => return self.report(Err(err)),
        };
        if repeating {
            match self.editor.stop_repeat() {
                Ok(_) => self.set_status("Repeat stopped"),
                Err(err) => self.report(Err(err)),
            }
        } else if mode == SendMode::Repeat {
            match self.editor.start_repeat() {
                Ok(handle) => self.set_status(format!("Repeating (task {})", handle.id)),
                Err(err) => self.report(Err(err)),
            }
        } else {
            self.set_status("Only repeat-mode macros can be started");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdkeys_core::MacroControl;
    use tempfile::TempDir;

    fn app_with(macros: Vec<Macro>) -> (TempDir, App) {
        let dir = tempfile::tempdir().unwrap();
        let store = TomlProfileStore::new(dir.path().join("profile.toml"));
        let profile = Profile {
            macros,
            ..Profile::default()
        };
        let mut app = App::new(store, profile, 0, &CliConfig::default()).unwrap();
        app.fit(Rect::new(1, 2, 80, 30));
        (dir, app)
    }

    #[test]
    fn test_fit_sizes_editor_and_offsets_pointer() {
        let (_dir, app) = app_with(vec![Macro::with_messages(["a"])]);
        assert_eq!(app.editor.list().geometry().width, 80);
        assert_eq!(app.to_list(1, 2), (0, 0));
        assert_eq!(app.to_list(11, 7), (10, 5));
    }

    #[test]
    fn test_dirty_until_saved() {
        let (dir, mut app) = app_with(vec![Macro::with_messages(["a"])]);
        assert!(!app.is_dirty());

        assert!(app.editor.focus(&MacroControl::AddMessage));
        app.editor.key(cmdkeys_core::KeyInput::Enter).unwrap();
        assert!(app.is_dirty());

        app.save();
        assert!(!app.is_dirty());
        let text = std::fs::read_to_string(dir.path().join("profile.toml")).unwrap();
        assert_eq!(Profile::from_toml(&text).unwrap().macros[0].messages.len(), 2);
    }

    #[test]
    fn test_macro_switching_wraps() {
        let (_dir, mut app) = app_with(vec![Macro::default(), Macro::default(), Macro::default()]);
        app.prev_macro();
        assert_eq!(app.editor.macro_index(), 2);
        app.next_macro();
        assert_eq!(app.editor.macro_index(), 0);
        app.add_macro();
        assert_eq!(app.editor.macro_index(), 3);
    }

    #[test]
    fn test_failed_switch_keeps_error_status() {
        let (_dir, mut app) = app_with(vec![Macro::default(), Macro::default()]);
        app.select_macro(5);
        assert_eq!(app.editor.macro_index(), 0);
        let status = app.status_message.clone().unwrap();
        assert!(status.starts_with("Error:"), "{status}");

        app.next_macro();
        assert_eq!(app.status_message.as_deref(), Some("Macro 2/2"));
    }

    #[test]
    fn test_repeat_needs_repeat_mode() {
        let (_dir, mut app) = app_with(vec![Macro::with_messages(["a"])]);
        app.toggle_repeat();
        assert!(!app.editor.current().unwrap().has_repeating());

        let mut m = Macro::with_messages(["a"]);
        m.mode = SendMode::Repeat;
        let (_dir, mut app) = app_with(vec![m]);
        app.toggle_repeat();
        assert!(app.editor.current().unwrap().has_repeating());
        assert!(!app.is_dirty());
        app.toggle_repeat();
        assert!(!app.editor.current().unwrap().has_repeating());
    }
}
