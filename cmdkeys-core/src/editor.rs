//! Owns a profile and the row list editing one of its macros.
//!
//! Input goes to the list; whatever the list reports as changed is applied to
//! the profile here. Structural changes rebuild the list before the call
//! returns, so a host never draws rows that refer to stale message indices.

use tracing::{debug, info, warn};

use crate::compose::{compose, ComposeEnv, KeyCapture, MacroControl};
use crate::error::{CoreError, Result};
use crate::keybind::KeybindCatalog;
use crate::labels::Labels;
use crate::layout::{LayoutConfig, ListDims, ListLayout, Measure};
use crate::model::{ConflictStrategy, Keybind, Macro, Message, Profile, RepeatHandle, SendMode};
use crate::policy::crosses_zero_boundary;
use crate::reorder::{resolve_drop, DropOutcome};
use crate::rowlist::{Change, ControlEvent, Dispatch, KeyInput, RowList};

/// What applying one change required
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    Rebuild,
    /// Rebuild, then put focus back on this control with the cursor at the end
    RebuildAndFocus(MacroControl),
}

/// Injected configuration for an editor
#[derive(Debug, Clone, Default)]
pub struct EditorConfig {
    pub layout: LayoutConfig,
    pub labels: Labels,
}

pub struct MacroEditor {
    profile: Profile,
    macro_index: usize,
    keybinds: Box<dyn KeybindCatalog>,
    config: EditorConfig,
    measure: Measure,
    dims: ListDims,
    list: RowList<MacroControl>,
    capture: Option<KeyCapture>,
    next_repeat_id: u64,
}

impl MacroEditor {
    pub fn new(
        mut profile: Profile,
        macro_index: usize,
        keybinds: Box<dyn KeybindCatalog>,
        config: EditorConfig,
        measure: Measure,
        dims: ListDims,
    ) -> Result<Self> {
        let list = Self::compose_list(
            &mut profile,
            macro_index,
            keybinds.as_ref(),
            &config,
            &measure,
            dims,
            None,
        )?;
        info!(
            profile = %profile.name,
            macro_index,
            macros = profile.macros.len(),
            "editor opened"
        );
        Ok(Self {
            profile,
            macro_index,
            keybinds,
            config,
            measure,
            dims,
            list,
            capture: None,
            next_repeat_id: 1,
        })
    }

    fn compose_list(
        profile: &mut Profile,
        macro_index: usize,
        keybinds: &dyn KeybindCatalog,
        config: &EditorConfig,
        measure: &Measure,
        dims: ListDims,
        capture: Option<KeyCapture>,
    ) -> Result<RowList<MacroControl>> {
        let layout = ListLayout::new(dims, &config.layout);
        let env = ComposeEnv {
            keybinds,
            layout: &layout,
            labels: &config.labels,
            measure,
            capture,
        };
        compose(profile, macro_index, &env)
    }

    /// Re-compose from the current profile, carrying the scroll offset over
    pub fn rebuild(&mut self) -> Result<()> {
        let scroll = self.list.scroll();
        let mut list = Self::compose_list(
            &mut self.profile,
            self.macro_index,
            self.keybinds.as_ref(),
            &self.config,
            &self.measure,
            self.dims,
            self.capture,
        )?;
        list.set_scroll(scroll);
        debug!(scroll = list.scroll(), slots = list.len(), "rebuilt");
        self.list = list;
        Ok(())
    }

    /// Host viewport changed
    pub fn resize(&mut self, width: i32, height: i32) -> Result<()> {
        self.dims.width = width;
        self.dims.height = height;
        let focused = self.focused_control();
        self.rebuild()?;
        if let Some(control) = focused {
            self.list.focus_control(&control);
        }
        Ok(())
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn into_profile(self) -> Profile {
        self.profile
    }

    pub fn macro_index(&self) -> usize {
        self.macro_index
    }

    pub fn current(&self) -> Result<&Macro> {
        self.profile.macro_ref(self.macro_index)
    }

    fn current_mut(&mut self) -> Result<&mut Macro> {
        self.profile.macro_mut(self.macro_index)
    }

    pub fn list(&self) -> &RowList<MacroControl> {
        &self.list
    }

    pub fn capture(&self) -> Option<KeyCapture> {
        self.capture
    }

    pub fn labels(&self) -> &Labels {
        &self.config.labels
    }

    /// Switch to another macro of the profile
    pub fn select_macro(&mut self, macro_index: usize) -> Result<()> {
        self.profile.macro_ref(macro_index)?;
        self.macro_index = macro_index;
        self.capture = None;
        self.list.set_scroll(0);
        self.rebuild()
    }

    /// Append a new empty macro and switch to it
    pub fn add_macro(&mut self) -> Result<usize> {
        self.profile.macros.push(Macro::default());
        let index = self.profile.macros.len() - 1;
        self.select_macro(index)?;
        Ok(index)
    }

    pub fn focus(&mut self, control: &MacroControl) -> bool {
        self.list.focus_control(control)
    }

    fn focused_control(&self) -> Option<MacroControl> {
        self.list.focused_widget().and_then(|w| w.control().copied())
    }

    pub fn pointer_down(&mut self, x: i32, y: i32) -> Result<Effect> {
        let dispatch = self.list.pointer_down(x, y);
        self.handle(dispatch)
    }

    pub fn pointer_drag(&mut self, x: i32, y: i32) -> Result<Effect> {
        let dispatch = self.list.pointer_drag(x, y);
        self.handle(dispatch)
    }

    pub fn pointer_up(&mut self, x: i32, y: i32) -> Result<Effect> {
        let dispatch = self.list.pointer_up(x, y);
        self.handle(dispatch)
    }

    pub fn scroll_by(&mut self, delta: i32) -> Result<Effect> {
        let dispatch = self.list.scroll_by(delta);
        self.handle(dispatch)
    }

    /// Keys go to an active key capture first, then to the list
    pub fn key(&mut self, input: KeyInput) -> Result<Effect> {
        if self.capture.is_some() {
            return match input {
                KeyInput::Escape => self.capture_key(Keybind::Unbound),
                KeyInput::Char(c) if !c.is_whitespace() => {
                    self.capture_key(Keybind::key(c.to_uppercase().to_string()))
                }
                _ => Ok(Effect::None),
            };
        }
        let dispatch = self.list.key(input);
        self.handle(dispatch)
    }

    /// Finish a key capture: bind `key` to the waiting button.
    ///
    /// Hosts call this directly for keys that have no [`KeyInput`] form.
    pub fn capture_key(&mut self, key: Keybind) -> Result<Effect> {
        let Some(which) = self.capture.take() else {
            return Ok(Effect::None);
        };
        let m = self.current_mut()?;
        let control = match which {
            KeyCapture::Primary => {
                m.keybind = key;
                MacroControl::PrimaryKey
            }
            KeyCapture::Alt => {
                m.alt_keybind = key;
                MacroControl::AltKey
            }
        };
        debug!(?which, "key captured");
        self.finish(Effect::RebuildAndFocus(control))
    }

    /// Record that the host started this macro's repeat task
    pub fn start_repeat(&mut self) -> Result<RepeatHandle> {
        let handle = RepeatHandle {
            id: self.next_repeat_id,
        };
        self.next_repeat_id += 1;
        self.current_mut()?.start_repeating(handle);
        self.finish(Effect::Rebuild)?;
        Ok(handle)
    }

    pub fn stop_repeat(&mut self) -> Result<Option<RepeatHandle>> {
        let handle = self.current_mut()?.stop_repeating();
        self.finish(Effect::Rebuild)?;
        Ok(handle)
    }

    /// Apply one dispatch result, rebuilding and restoring focus as needed
    pub fn handle(&mut self, dispatch: Dispatch<MacroControl>) -> Result<Effect> {
        let effect = match dispatch {
            Dispatch::Nothing | Dispatch::Consumed => Effect::None,
            Dispatch::Changed(event) => self.apply(event)?,
            Dispatch::Dropped { source, hovered } => self.drop_message(source, hovered)?,
        };
        self.finish(effect)
    }

    fn finish(&mut self, effect: Effect) -> Result<Effect> {
        match effect {
            Effect::None => {}
            Effect::Rebuild => {
                let focused = self.focused_control();
                self.rebuild()?;
                if let Some(control) = focused {
                    self.list.focus_control(&control);
                }
            }
            Effect::RebuildAndFocus(control) => {
                self.rebuild()?;
                self.list.focus_control(&control);
            }
        }
        Ok(effect)
    }

    /// Write normalized text back into the field that produced it
    fn sync_field(&mut self, control: &MacroControl, typed: &str, stored: String) {
        let stripped = typed.chars().count() - typed.trim_start().chars().count();
        if let Some((_, _, widget)) = self.list.find_widget_mut(control) {
            if let Some(field) = widget.field_mut() {
                let len = stored.chars().count();
                field.cursor = field.cursor.saturating_sub(stripped).min(len);
                field.text = stored;
                debug!(?control, "field text normalized");
            }
        }
    }

    fn drop_message(&mut self, source: usize, hovered: Option<usize>) -> Result<Effect> {
        let outcome = resolve_drop(&self.list.slot_kinds(), source, hovered)?;
        debug!(source, ?hovered, ?outcome, "drop resolved");
        match outcome {
            DropOutcome::Move { from, to } => {
                self.current_mut()?.move_message(from, to)?;
                Ok(Effect::Rebuild)
            }
            DropOutcome::Cancelled | DropOutcome::NoOp => Ok(Effect::None),
        }
    }

    /// Write one control change into the profile.
    ///
    /// Does not rebuild; the returned effect says whether a rebuild is due.
    pub fn apply(&mut self, event: ControlEvent<MacroControl>) -> Result<Effect> {
        let index = self.macro_index;
        let ControlEvent { control, change } = event;
        let effect = match (control, change) {
            (MacroControl::PrimaryKey, Change::Pressed) => {
                self.capture = Some(KeyCapture::Primary);
                Effect::RebuildAndFocus(control)
            }
            (MacroControl::AltKey, Change::Pressed) => {
                self.capture = Some(KeyCapture::Alt);
                Effect::RebuildAndFocus(control)
            }
            (MacroControl::IgnoreRatelimit, Change::Toggled(value)) => {
                self.current_mut()?.ignore_ratelimit = value;
                Effect::None
            }
            (MacroControl::HudMessage, Change::Toggled(value)) => {
                self.profile.set_show_hud_message(index, value)?;
                Effect::None
            }
            (MacroControl::History, Change::Toggled(value)) => {
                self.profile.set_add_to_history(index, value)?;
                Effect::None
            }
            (MacroControl::Strategy, Change::Selected(i)) => {
                let strategy = ConflictStrategy::ALL
                    .get(i)
                    .copied()
                    .unwrap_or_default();
                self.profile.set_conflict_strategy(index, strategy)?;
                Effect::Rebuild
            }
            (MacroControl::Mode, Change::Selected(i)) => {
                let mode = SendMode::ALL.get(i).copied().unwrap_or_default();
                self.profile.set_send_mode(index, mode)?;
                Effect::Rebuild
            }
            (MacroControl::SpaceTicks, Change::Ticks(ticks)) => {
                let m = self.current_mut()?;
                let old = m.space_ticks;
                m.space_ticks = ticks;
                if crosses_zero_boundary(m.mode, old, ticks) {
                    Effect::RebuildAndFocus(control)
                } else {
                    Effect::None
                }
            }
            (MacroControl::StopRepeat, Change::Pressed) => {
                self.current_mut()?.stop_repeating();
                Effect::Rebuild
            }
            (MacroControl::CycleIndex, Change::Selected(i)) => {
                self.current_mut()?.cycle_index = i;
                Effect::None
            }
            (MacroControl::MessageText(i), Change::Text(text)) => {
                let stored = {
                    let msg = self.message_mut(i)?;
                    msg.set_text(&text);
                    msg.text.clone()
                };
                if stored != text {
                    self.sync_field(&control, &text, stored);
                }
                Effect::None
            }
            (MacroControl::MessageDelay(i), Change::Ticks(ticks)) => {
                self.message_mut(i)?.delay_ticks = ticks;
                Effect::None
            }
            (MacroControl::RemoveMessage(i), Change::Pressed) => {
                self.current_mut()?.remove_message(i)?;
                Effect::Rebuild
            }
            (MacroControl::AddMessage, Change::Pressed) => {
                self.current_mut()?.add_message(Message::default());
                Effect::Rebuild
            }
            (control, change) => {
                warn!(?control, ?change, "ignored change for control");
                Effect::None
            }
        };
        Ok(effect)
    }

    fn message_mut(&mut self, index: usize) -> Result<&mut Message> {
        let m = self.current_mut()?;
        let len = m.messages.len();
        m.messages
            .get_mut(index)
            .ok_or_else(|| CoreError::message_out_of_range(index, len))
    }
}

impl std::fmt::Debug for MacroEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MacroEditor")
            .field("profile", &self.profile.name)
            .field("macro_index", &self.macro_index)
            .field("dims", &self.dims)
            .field("list", &self.list)
            .field("capture", &self.capture)
            .finish()
    }
}
