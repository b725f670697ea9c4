//! UI strings shown by the macro editor.
//!
//! Hosts may override any of these from their config file; missing keys keep
//! the English defaults.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub messages_header: String,
    pub conflict: String,
    pub mode: String,
    pub ignore_ratelimit: String,
    pub ignore_ratelimit_tooltip: String,
    pub hud: String,
    pub hud_tooltip: String,
    pub history: String,
    pub history_tooltip: String,
    pub on: String,
    pub off: String,
    pub stop: String,
    pub stop_tooltip: String,
    pub cycle_index_tooltip: String,
    pub alt_key_tooltip: String,
    pub delay_tooltip: String,
    pub delay_tooltip_repeat: String,
    pub delay_first_tooltip: String,
    pub delay_subsequent_tooltip: String,
    pub drag_handle: String,
    pub delete: String,
    pub add: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            messages_header: "Messages".into(),
            conflict: "Conflict".into(),
            mode: "Mode".into(),
            ignore_ratelimit: "Ignore Ratelimit".into(),
            ignore_ratelimit_tooltip: "Send even when the message ratelimit has been reached".into(),
            hud: "HUD Message".into(),
            hud_tooltip: "Show a HUD notice when the macro runs".into(),
            history: "Add to History".into(),
            history_tooltip: "Add sent messages to the chat history".into(),
            on: "ON".into(),
            off: "OFF".into(),
            stop: "Stop".into(),
            stop_tooltip: "Stop the running repeat".into(),
            cycle_index_tooltip: "Index of the message sent next".into(),
            alt_key_tooltip: "Alternate key, cycles backwards".into(),
            delay_tooltip: "Delay in ticks between messages".into(),
            delay_tooltip_repeat: "Delay in ticks between repeats".into(),
            delay_first_tooltip: "Delay in ticks before the first message".into(),
            delay_subsequent_tooltip: "Delay in ticks after the previous message".into(),
            drag_handle: "↑↓".into(),
            delete: "❌".into(),
            add: "+".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let labels: Labels = toml::from_str("stop = \"Halt\"\nadd = \"Add\"").unwrap();
        assert_eq!(labels.stop, "Halt");
        assert_eq!(labels.add, "Add");
        assert_eq!(labels.messages_header, "Messages");
    }
}
