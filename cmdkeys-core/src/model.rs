//! Macro, message and profile records.
//!
//! These are the only persistent types in the crate. Row lists read them on
//! every rebuild and the editor mutates them in response to control events.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, Result};

/// Maximum number of characters a message may hold
pub const MESSAGE_CHAR_LIMIT: usize = 256;

/// How a macro dispatches its messages when triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SendMode {
    /// Send every message in order
    #[default]
    Send,
    /// Put the first message into the chat box without sending
    Type,
    /// Send one message picked at random
    Random,
    /// Send the next message in sequence on each trigger
    Cycle,
    /// Keep sending on a timer until stopped
    Repeat,
}

impl SendMode {
    pub const ALL: [SendMode; 5] = [
        SendMode::Send,
        SendMode::Type,
        SendMode::Random,
        SendMode::Cycle,
        SendMode::Repeat,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SendMode::Send => "Send",
            SendMode::Type => "Type",
            SendMode::Random => "Random",
            SendMode::Cycle => "Cycle",
            SendMode::Repeat => "Repeat",
        }
    }

    pub fn tooltip(&self) -> &'static str {
        match self {
            SendMode::Send => "Sends all messages, in order",
            SendMode::Type => "Types the first message into the chat box",
            SendMode::Random => "Sends one message, chosen at random",
            SendMode::Cycle => "Sends the next message each time the key is pressed",
            SendMode::Repeat => "Sends all messages repeatedly until stopped",
        }
    }

    /// Position in [`SendMode::ALL`]
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|m| m == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }
}

/// What to do when a macro's key is also bound to something else
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictStrategy {
    /// Run the macro and let the other binding fire too
    #[default]
    Submit,
    /// Only run the macro if no conflicting binding is held
    Avoid,
    /// Run the macro and suppress the other binding
    Veto,
}

impl ConflictStrategy {
    pub const ALL: [ConflictStrategy; 3] = [
        ConflictStrategy::Submit,
        ConflictStrategy::Avoid,
        ConflictStrategy::Veto,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ConflictStrategy::Submit => "Submit",
            ConflictStrategy::Avoid => "Avoid",
            ConflictStrategy::Veto => "Veto",
        }
    }

    pub fn tooltip(&self) -> &'static str {
        match self {
            ConflictStrategy::Submit => "Run the macro and any conflicting bindings",
            ConflictStrategy::Avoid => "Only run the macro when no conflicting binding is pressed",
            ConflictStrategy::Veto => "Run the macro and block conflicting bindings",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }
}

/// Profile-wide switch that either forces a behaviour or defers to each macro
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Control {
    On,
    Off,
    #[default]
    Defer,
}

/// A key a macro is bound to.
///
/// Persisted as the bare key name, with an empty string for unbound.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Keybind {
    #[default]
    Unbound,
    Key(String),
}

impl Keybind {
    pub fn key(name: impl Into<String>) -> Self {
        Keybind::Key(name.into())
    }

    pub fn is_bound(&self) -> bool {
        matches!(self, Keybind::Key(_))
    }
}

impl From<String> for Keybind {
    fn from(name: String) -> Self {
        if name.trim().is_empty() {
            Keybind::Unbound
        } else {
            Keybind::Key(name)
        }
    }
}

impl From<Keybind> for String {
    fn from(key: Keybind) -> Self {
        match key {
            Keybind::Unbound => String::new(),
            Keybind::Key(name) => name,
        }
    }
}

impl fmt::Display for Keybind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Keybind::Unbound => write!(f, "Not Bound"),
            Keybind::Key(name) => write!(f, "{}", name),
        }
    }
}

/// Handle to a running repeat task.
///
/// Runtime-only: it is never persisted and a freshly loaded macro never has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatHandle {
    pub id: u64,
}

/// One literal text payload within a macro
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Message {
    pub text: String,
    pub delay_ticks: u32,
}

impl Message {
    pub fn new(text: &str) -> Self {
        let mut msg = Message::default();
        msg.set_text(text);
        msg
    }

    /// Store `text` without leading whitespace, truncated to the char limit
    pub fn set_text(&mut self, text: &str) {
        self.text = text
            .trim_start()
            .chars()
            .take(MESSAGE_CHAR_LIMIT)
            .collect();
    }
}

/// A keybind-triggered bundle of messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Macro {
    pub keybind: Keybind,
    pub alt_keybind: Keybind,
    pub mode: SendMode,
    pub strategy: ConflictStrategy,
    pub messages: Vec<Message>,
    /// Delay between messages in Send mode, or the interval in Repeat mode
    pub space_ticks: u32,
    pub cycle_index: usize,
    pub ignore_ratelimit: bool,
    pub show_hud_message: bool,
    pub add_to_history: bool,
    #[serde(skip)]
    pub repeating: Option<RepeatHandle>,
}

impl Default for Macro {
    fn default() -> Self {
        Self {
            keybind: Keybind::Unbound,
            alt_keybind: Keybind::Unbound,
            mode: SendMode::Send,
            strategy: ConflictStrategy::Submit,
            messages: Vec::new(),
            space_ticks: 0,
            cycle_index: 0,
            ignore_ratelimit: false,
            show_hud_message: true,
            add_to_history: false,
            repeating: None,
        }
    }
}

impl Macro {
    pub fn with_messages<'a>(texts: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            messages: texts.into_iter().map(Message::new).collect(),
            ..Self::default()
        }
    }

    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn remove_message(&mut self, index: usize) -> Result<Message> {
        if index >= self.messages.len() {
            return Err(CoreError::message_out_of_range(index, self.messages.len()));
        }
        Ok(self.messages.remove(index))
    }

    /// Remove the message at `from` and reinsert it at `to`.
    ///
    /// `to` is an index into the sequence *after* removal and is clamped to
    /// its length.
    pub fn move_message(&mut self, from: usize, to: usize) -> Result<()> {
        if from >= self.messages.len() {
            return Err(CoreError::message_out_of_range(from, self.messages.len()));
        }
        let msg = self.messages.remove(from);
        let to = to.min(self.messages.len());
        self.messages.insert(to, msg);
        debug!(from, to, "moved message");
        Ok(())
    }

    /// Reset `cycle_index` to 0 if it points past the last message
    pub fn clamp_cycle_index(&mut self) -> bool {
        let last = self.messages.len().saturating_sub(1);
        if self.cycle_index > last {
            debug!(cycle_index = self.cycle_index, last, "cycle index out of range, reset");
            self.cycle_index = 0;
            true
        } else {
            false
        }
    }

    /// Switch send mode, stopping any repeat task when leaving Repeat
    pub fn set_mode(&mut self, mode: SendMode) {
        if self.mode == SendMode::Repeat && mode != SendMode::Repeat {
            self.stop_repeating();
        }
        self.mode = mode;
    }

    pub fn has_repeating(&self) -> bool {
        self.repeating.is_some()
    }

    pub fn start_repeating(&mut self, handle: RepeatHandle) {
        debug!(task = handle.id, "repeat task started");
        self.repeating = Some(handle);
    }

    pub fn stop_repeating(&mut self) -> Option<RepeatHandle> {
        let handle = self.repeating.take();
        if let Some(h) = &handle {
            debug!(task = h.id, "repeat task stopped");
        }
        handle
    }
}

/// A named set of macros plus profile-wide display switches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub show_hud_message: Control,
    pub add_to_history: Control,
    pub macros: Vec<Macro>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            show_hud_message: Control::Defer,
            add_to_history: Control::Defer,
            macros: vec![Macro::default()],
        }
    }
}

impl Profile {
    /// True iff at least one display switch defers to the macro
    pub fn defers_any(&self) -> bool {
        self.show_hud_message == Control::Defer || self.add_to_history == Control::Defer
    }

    pub fn macro_ref(&self, index: usize) -> Result<&Macro> {
        let len = self.macros.len();
        self.macros
            .get(index)
            .ok_or_else(|| CoreError::macro_out_of_range(index, len))
    }

    pub fn macro_mut(&mut self, index: usize) -> Result<&mut Macro> {
        let len = self.macros.len();
        self.macros
            .get_mut(index)
            .ok_or_else(|| CoreError::macro_out_of_range(index, len))
    }

    pub fn set_show_hud_message(&mut self, index: usize, value: bool) -> Result<()> {
        self.macro_mut(index)?.show_hud_message = value;
        Ok(())
    }

    pub fn set_add_to_history(&mut self, index: usize, value: bool) -> Result<()> {
        self.macro_mut(index)?.add_to_history = value;
        Ok(())
    }

    pub fn set_conflict_strategy(&mut self, index: usize, strategy: ConflictStrategy) -> Result<()> {
        self.macro_mut(index)?.strategy = strategy;
        Ok(())
    }

    pub fn set_send_mode(&mut self, index: usize, mode: SendMode) -> Result<()> {
        self.macro_mut(index)?.set_mode(mode);
        Ok(())
    }

    /// Whether the HUD message shows for `m`, resolving Defer to the macro
    pub fn effective_show_hud(&self, m: &Macro) -> bool {
        match self.show_hud_message {
            Control::On => true,
            Control::Off => false,
            Control::Defer => m.show_hud_message,
        }
    }

    /// Whether messages from `m` go to chat history, resolving Defer to the macro
    pub fn effective_add_to_history(&self, m: &Macro) -> bool {
        match self.add_to_history {
            Control::On => true,
            Control::Off => false,
            Control::Defer => m.add_to_history,
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn from_toml(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(m: &Macro) -> Vec<&str> {
        m.messages.iter().map(|msg| msg.text.as_str()).collect()
    }

    #[test]
    fn test_move_message_forward_and_back() {
        let mut m = Macro::with_messages(["A", "B", "C", "D"]);
        m.move_message(0, 2).unwrap();
        assert_eq!(texts(&m), vec!["B", "C", "A", "D"]);
        m.move_message(3, 0).unwrap();
        assert_eq!(texts(&m), vec!["D", "B", "C", "A"]);
    }

    #[test]
    fn test_move_message_clamps_destination() {
        let mut m = Macro::with_messages(["A", "B"]);
        m.move_message(0, 99).unwrap();
        assert_eq!(texts(&m), vec!["B", "A"]);
        assert!(m.move_message(5, 0).is_err());
    }

    #[test]
    fn test_message_text_is_trimmed_and_bounded() {
        let mut msg = Message::default();
        msg.set_text("   /say hi ");
        assert_eq!(msg.text, "/say hi ");

        let long: String = "x".repeat(MESSAGE_CHAR_LIMIT + 10);
        msg.set_text(&long);
        assert_eq!(msg.text.chars().count(), MESSAGE_CHAR_LIMIT);
    }

    #[test]
    fn test_clamp_cycle_index() {
        let mut m = Macro::with_messages(["a", "b", "c"]);
        m.cycle_index = 5;
        assert!(m.clamp_cycle_index());
        assert_eq!(m.cycle_index, 0);

        m.cycle_index = 2;
        assert!(!m.clamp_cycle_index());
        assert_eq!(m.cycle_index, 2);

        let mut empty = Macro::default();
        empty.cycle_index = 1;
        empty.clamp_cycle_index();
        assert_eq!(empty.cycle_index, 0);
    }

    #[test]
    fn test_leaving_repeat_stops_task() {
        let mut m = Macro::default();
        m.set_mode(SendMode::Repeat);
        m.start_repeating(RepeatHandle { id: 7 });
        assert!(m.has_repeating());
        m.set_mode(SendMode::Send);
        assert!(!m.has_repeating());
    }

    #[test]
    fn test_mode_cycles_through_all() {
        let mut mode = SendMode::Send;
        for _ in 0..SendMode::ALL.len() {
            mode = mode.next();
        }
        assert_eq!(mode, SendMode::Send);
        assert_eq!(ConflictStrategy::Veto.next(), ConflictStrategy::Submit);
    }

    #[test]
    fn test_effective_display_switches() {
        let mut profile = Profile::default();
        let mut m = Macro::default();
        m.show_hud_message = false;
        assert!(!profile.effective_show_hud(&m));
        profile.show_hud_message = Control::On;
        assert!(profile.effective_show_hud(&m));
        assert!(profile.defers_any());
        profile.add_to_history = Control::Off;
        assert!(!profile.defers_any());
    }

    #[test]
    fn test_profile_toml_round_trip_drops_repeat_handle() {
        let mut profile = Profile::default();
        let m = profile.macro_mut(0).unwrap();
        m.keybind = Keybind::key("F4");
        m.messages.push(Message::new("/home"));
        m.start_repeating(RepeatHandle { id: 1 });

        let text = profile.to_toml().unwrap();
        let loaded = Profile::from_toml(&text).unwrap();
        assert_eq!(loaded.macros[0].keybind, Keybind::key("F4"));
        assert_eq!(loaded.macros[0].messages[0].text, "/home");
        assert!(!loaded.macros[0].has_repeating());
    }
}
