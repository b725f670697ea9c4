//! Which controls a macro shows, given its mode and conflict strategy.

use crate::model::{ConflictStrategy, SendMode};

/// Control placed after the send-mode button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trailing {
    /// Editable `space_ticks` (inter-message delay, or repeat interval)
    DelayField,
    /// Mode button takes the full half-row
    None,
    /// Small selector over `cycle_index`
    CycleSelector,
    /// Halts the active repeat task
    StopButton,
}

pub fn trailing_control(mode: SendMode, has_repeating: bool) -> Trailing {
    match mode {
        SendMode::Send => Trailing::DelayField,
        SendMode::Type | SendMode::Random => Trailing::None,
        SendMode::Cycle => Trailing::CycleSelector,
        SendMode::Repeat if has_repeating => Trailing::StopButton,
        SendMode::Repeat => Trailing::DelayField,
    }
}

/// Per-message delay fields appear only when the macro-level delay is not
/// already timing every message uniformly.
pub fn shows_message_delay(strategy: ConflictStrategy, mode: SendMode, space_ticks: u32) -> bool {
    strategy == ConflictStrategy::Avoid
        || (mode == SendMode::Send && space_ticks == 0)
        || mode == SendMode::Repeat
}

/// True if changing `space_ticks` from `old` to `new` flips per-message
/// delay visibility, which forces a rebuild.
pub fn crosses_zero_boundary(mode: SendMode, old: u32, new: u32) -> bool {
    mode == SendMode::Send && ((old == 0) != (new == 0))
}

/// The alternate keybind replaces the ratelimit toggle in Cycle mode
pub fn shows_alt_keybind(mode: SendMode) -> bool {
    mode == SendMode::Cycle
}

/// Widths of the controls sharing the mode button's half-row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailingWidths {
    pub min_delay_field: i32,
    pub stop_button: i32,
    pub small_button: i32,
}

impl TrailingWidths {
    pub fn of(&self, trailing: Trailing) -> i32 {
        match trailing {
            Trailing::DelayField => self.min_delay_field,
            Trailing::None => 0,
            Trailing::CycleSelector => self.small_button,
            Trailing::StopButton => self.stop_button,
        }
    }
}

pub fn mode_button_width(trailing: Trailing, half_width: i32, widths: &TrailingWidths) -> i32 {
    half_width - widths.of(trailing)
}

/// Values offered by the cycle-index selector: `0..len`, or just `0` if empty
pub fn cycle_domain(message_count: usize) -> Vec<usize> {
    (0..message_count.max(1)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_table() {
        assert_eq!(trailing_control(SendMode::Send, false), Trailing::DelayField);
        assert_eq!(trailing_control(SendMode::Type, false), Trailing::None);
        assert_eq!(trailing_control(SendMode::Random, true), Trailing::None);
        assert_eq!(trailing_control(SendMode::Cycle, false), Trailing::CycleSelector);
        assert_eq!(trailing_control(SendMode::Repeat, false), Trailing::DelayField);
        assert_eq!(trailing_control(SendMode::Repeat, true), Trailing::StopButton);
    }

    #[test]
    fn test_message_delay_visibility() {
        use ConflictStrategy::*;
        assert!(shows_message_delay(Submit, SendMode::Send, 0));
        assert!(!shows_message_delay(Submit, SendMode::Send, 1));
        assert!(shows_message_delay(Avoid, SendMode::Send, 5));
        assert!(shows_message_delay(Veto, SendMode::Repeat, 5));
        assert!(!shows_message_delay(Veto, SendMode::Cycle, 0));
        assert!(!shows_message_delay(Submit, SendMode::Type, 0));
    }

    #[test]
    fn test_zero_boundary() {
        assert!(crosses_zero_boundary(SendMode::Send, 0, 1));
        assert!(crosses_zero_boundary(SendMode::Send, 20, 0));
        assert!(!crosses_zero_boundary(SendMode::Send, 1, 20));
        assert!(!crosses_zero_boundary(SendMode::Repeat, 0, 1));
    }

    #[test]
    fn test_mode_button_width() {
        let widths = TrailingWidths {
            min_delay_field: 10,
            stop_button: 12,
            small_button: 16,
        };
        assert_eq!(mode_button_width(Trailing::None, 100, &widths), 100);
        assert_eq!(mode_button_width(Trailing::DelayField, 100, &widths), 90);
        assert_eq!(mode_button_width(Trailing::StopButton, 100, &widths), 88);
        assert_eq!(mode_button_width(Trailing::CycleSelector, 100, &widths), 84);
    }

    #[test]
    fn test_cycle_domain() {
        assert_eq!(cycle_domain(0), vec![0]);
        assert_eq!(cycle_domain(3), vec![0, 1, 2]);
    }
}
