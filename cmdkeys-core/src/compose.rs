//! Builds the row list that edits one macro.
//!
//! Row order is fixed: binding, hud/history (only while the profile defers
//! either switch), strategy and mode, the messages header, one row plus spacer
//! per message, then the add button.

use tracing::debug;

use crate::error::Result;
use crate::field::fitted_width;
use crate::keybind::KeybindCatalog;
use crate::labels::Labels;
use crate::layout::{ListLayout, Measure};
use crate::model::{Control, ConflictStrategy, Macro, Profile, SendMode, MESSAGE_CHAR_LIMIT};
use crate::policy::{
    cycle_domain, mode_button_width, shows_alt_keybind, shows_message_delay, trailing_control,
    Trailing, TrailingWidths,
};
use crate::rowlist::{FieldKind, Row, RowKind, RowList, TextField, Widget, WidgetKind};

/// What a widget in the macro editor edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MacroControl {
    PrimaryKey,
    AltKey,
    IgnoreRatelimit,
    HudMessage,
    History,
    Strategy,
    Mode,
    SpaceTicks,
    StopRepeat,
    CycleIndex,
    MessageText(usize),
    MessageDelay(usize),
    RemoveMessage(usize),
    AddMessage,
}

/// Which key button is waiting for a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCapture {
    Primary,
    Alt,
}

/// Everything besides the profile that composition reads
pub struct ComposeEnv<'a> {
    pub keybinds: &'a dyn KeybindCatalog,
    pub layout: &'a ListLayout,
    pub labels: &'a Labels,
    pub measure: &'a Measure,
    pub capture: Option<KeyCapture>,
}

impl ComposeEnv<'_> {
    fn text_width(&self, text: &str) -> i32 {
        self.measure.width(text)
    }

    /// Width of a button sized to its label
    fn short_button(&self, label: &str) -> i32 {
        self.text_width(label) + self.layout.field_margin
    }

    fn delay_field_min(&self, sample: &str) -> i32 {
        fitted_width(sample, "", 0, self.layout.field_margin, self.measure.as_ref())
    }
}

/// Compose the rows for macro `macro_index` of `profile`.
///
/// The only state this touches is `cycle_index`, which is reset if it points
/// past the last message.
pub fn compose(
    profile: &mut Profile,
    macro_index: usize,
    env: &ComposeEnv<'_>,
) -> Result<RowList<MacroControl>> {
    profile.macro_mut(macro_index)?.clamp_cycle_index();
    let profile = &*profile;
    let m = profile.macro_ref(macro_index)?;

    let mut list = RowList::new(env.layout.geometry(), env.measure.clone());
    list.push_row(binding_row(profile, macro_index, m, env));
    if profile.defers_any() {
        list.push_row(hud_history_row(profile, m, env));
    }
    list.push_row(strategy_mode_row(m, env));
    list.push_row(header_row(env));
    for index in 0..m.messages.len() {
        list.push_row(message_row(m, index, env));
        list.push_spacer()?;
    }
    list.push_row(add_row(env));

    list.validate()?;
    debug!(
        macro_index,
        slots = list.len(),
        messages = m.messages.len(),
        mode = m.mode.label(),
        "composed macro rows"
    );
    Ok(list)
}

fn key_button(
    profile: &Profile,
    macro_index: usize,
    m: &Macro,
    which: KeyCapture,
    x: i32,
    width: i32,
    env: &ComposeEnv<'_>,
) -> Widget<MacroControl> {
    let (key, control) = match which {
        KeyCapture::Primary => (&m.keybind, MacroControl::PrimaryKey),
        KeyCapture::Alt => (&m.alt_keybind, MacroControl::AltKey),
    };
    let info = env.keybinds.describe(profile, macro_index, key);
    let label = if env.capture == Some(which) {
        format!("> {} <", info.label)
    } else {
        info.conflict_label
    };
    let tooltip = match which {
        KeyCapture::Alt if info.tooltip.trim().is_empty() => env.labels.alt_key_tooltip.clone(),
        _ => info.tooltip,
    };
    Widget::new(
        x,
        width,
        env.layout.entry_height,
        WidgetKind::Button { label, control },
    )
    .tooltip(tooltip)
}

fn toggle(
    caption: &str,
    value: bool,
    control: MacroControl,
    x: i32,
    width: i32,
    env: &ComposeEnv<'_>,
) -> Widget<MacroControl> {
    Widget::new(
        x,
        width,
        env.layout.entry_height,
        WidgetKind::Toggle {
            caption: caption.to_string(),
            value,
            on: env.labels.on.clone(),
            off: env.labels.off.clone(),
            control,
        },
    )
}

fn binding_row(
    profile: &Profile,
    macro_index: usize,
    m: &Macro,
    env: &ComposeEnv<'_>,
) -> Row<MacroControl> {
    let l = env.layout;
    let half = l.half_width(l.entry_width);
    let right = l.entry_x + l.entry_width - half;

    let primary = key_button(profile, macro_index, m, KeyCapture::Primary, l.entry_x, half, env);
    let second = if shows_alt_keybind(m.mode) {
        key_button(profile, macro_index, m, KeyCapture::Alt, right, half, env)
    } else {
        toggle(
            &env.labels.ignore_ratelimit,
            m.ignore_ratelimit,
            MacroControl::IgnoreRatelimit,
            right,
            half,
            env,
        )
        .tooltip(env.labels.ignore_ratelimit_tooltip.clone())
    };
    Row::new(RowKind::Binding, vec![primary, second])
}

/// Each toggle is live only while the profile defers that switch to the macro
fn hud_history_row(profile: &Profile, m: &Macro, env: &ComposeEnv<'_>) -> Row<MacroControl> {
    let l = env.layout;
    let half = l.half_width(l.entry_width);
    let hud = toggle(
        &env.labels.hud,
        m.show_hud_message,
        MacroControl::HudMessage,
        l.entry_x,
        half,
        env,
    )
    .tooltip(env.labels.hud_tooltip.clone())
    .active(profile.show_hud_message == Control::Defer);
    let history = toggle(
        &env.labels.history,
        m.add_to_history,
        MacroControl::History,
        l.entry_x + l.entry_width - half,
        half,
        env,
    )
    .tooltip(env.labels.history_tooltip.clone())
    .active(profile.add_to_history == Control::Defer);
    Row::new(RowKind::HudHistory, vec![hud, history])
}

fn strategy_mode_row(m: &Macro, env: &ComposeEnv<'_>) -> Row<MacroControl> {
    let l = env.layout;
    let h = l.entry_height;
    let half = l.half_width(l.entry_width);
    let right_edge = l.entry_x + l.entry_width;

    let widths = TrailingWidths {
        min_delay_field: env.delay_field_min("0_"),
        stop_button: env.short_button(&env.labels.stop),
        small_button: l.small_button_width,
    };
    let trailing = trailing_control(m.mode, m.has_repeating());

    let strategy = Widget::new(
        l.entry_x,
        half,
        h,
        WidgetKind::Cycle {
            caption: Some(env.labels.conflict.clone()),
            options: ConflictStrategy::ALL.iter().map(|s| s.label().to_string()).collect(),
            selected: m.strategy.index(),
            control: MacroControl::Strategy,
        },
    )
    .tooltip(m.strategy.tooltip());
    let mode = Widget::new(
        right_edge - half,
        mode_button_width(trailing, half, &widths),
        h,
        WidgetKind::Cycle {
            caption: Some(env.labels.mode.clone()),
            options: SendMode::ALL.iter().map(|s| s.label().to_string()).collect(),
            selected: m.mode.index(),
            control: MacroControl::Mode,
        },
    )
    .tooltip(m.mode.tooltip());

    let mut widgets = vec![strategy, mode];
    const MODE_BUTTON: usize = 1;
    match trailing {
        Trailing::DelayField => {
            let width = widths.min_delay_field;
            let field = TextField::new(FieldKind::Ticks, m.space_ticks.to_string(), l.delay_max_len)
                .fitted(width, "_", l.field_margin)
                .partner(MODE_BUTTON);
            let tooltip = if m.mode == SendMode::Repeat {
                &env.labels.delay_tooltip_repeat
            } else {
                &env.labels.delay_tooltip
            };
            widgets.push(
                Widget::new(
                    right_edge - width,
                    width,
                    h,
                    WidgetKind::Field {
                        field,
                        control: MacroControl::SpaceTicks,
                    },
                )
                .tooltip(tooltip.clone()),
            );
        }
        Trailing::StopButton => {
            let width = widths.stop_button;
            widgets.push(
                Widget::new(
                    right_edge - width,
                    width,
                    h,
                    WidgetKind::Button {
                        label: env.labels.stop.clone(),
                        control: MacroControl::StopRepeat,
                    },
                )
                .tooltip(env.labels.stop_tooltip.clone()),
            );
        }
        Trailing::CycleSelector => {
            let width = widths.small_button;
            widgets.push(
                Widget::new(
                    right_edge - width,
                    width,
                    h,
                    WidgetKind::Cycle {
                        caption: None,
                        options: cycle_domain(m.messages.len())
                            .into_iter()
                            .map(|i| i.to_string())
                            .collect(),
                        selected: m.cycle_index,
                        control: MacroControl::CycleIndex,
                    },
                )
                .tooltip(env.labels.cycle_index_tooltip.clone()),
            );
        }
        Trailing::None => {}
    }

    let mut row = Row::new(RowKind::StrategyMode, widgets);
    if trailing == Trailing::DelayField {
        row.refit_field(2, env.measure.as_ref());
    }
    row
}

fn header_row(env: &ComposeEnv<'_>) -> Row<MacroControl> {
    let l = env.layout;
    Row::new(
        RowKind::Text,
        vec![Widget::new(
            l.entry_x,
            l.entry_width,
            l.entry_height,
            WidgetKind::Label {
                text: env.labels.messages_header.clone(),
            },
        )],
    )
}

/// Drag handle, two-slot text area, optional delay field, delete button
fn message_row(m: &Macro, index: usize, env: &ComposeEnv<'_>) -> Row<MacroControl> {
    let l = env.layout;
    let h = l.entry_height;
    let small = l.small_button_width;
    let x = l.dyn_entry_x;
    let width = l.dyn_entry_width;
    let msg = &m.messages[index];

    let show_delay = shows_message_delay(m.strategy, m.mode, m.space_ticks);
    let delay_width = env.delay_field_min("0__");
    let text_width =
        width - small * 2 - l.spacing * 2 - if show_delay { delay_width + l.spacing } else { 0 };

    let mut widgets = vec![
        Widget::new(
            x,
            small,
            h,
            WidgetKind::DragHandle {
                label: env.labels.drag_handle.clone(),
            },
        ),
        Widget::new(
            x + small + l.spacing,
            text_width,
            h * 2,
            WidgetKind::Field {
                field: TextField::new(FieldKind::MultiLine, msg.text.clone(), MESSAGE_CHAR_LIMIT),
                control: MacroControl::MessageText(index),
            },
        ),
    ];
    const TEXT_AREA: usize = 1;
    if show_delay {
        let field = TextField::new(FieldKind::Ticks, msg.delay_ticks.to_string(), l.delay_max_len)
            .fitted(delay_width, "__", l.field_margin)
            .partner(TEXT_AREA);
        let tooltip = if index == 0 {
            &env.labels.delay_first_tooltip
        } else {
            &env.labels.delay_subsequent_tooltip
        };
        widgets.push(
            Widget::new(
                x + small + text_width + l.spacing * 2,
                delay_width,
                h,
                WidgetKind::Field {
                    field,
                    control: MacroControl::MessageDelay(index),
                },
            )
            .tooltip(tooltip.clone()),
        );
    }
    widgets.push(Widget::new(
        x + width - small,
        small,
        h,
        WidgetKind::Button {
            label: env.labels.delete.clone(),
            control: MacroControl::RemoveMessage(index),
        },
    ));

    let mut row = Row::new(RowKind::Message { index }, widgets);
    if show_delay {
        row.refit_field(2, env.measure.as_ref());
    }
    row
}

fn add_row(env: &ComposeEnv<'_>) -> Row<MacroControl> {
    let l = env.layout;
    Row::new(
        RowKind::Action,
        vec![Widget::new(
            l.entry_x,
            l.entry_width,
            l.entry_height,
            WidgetKind::Button {
                label: env.labels.add.clone(),
                control: MacroControl::AddMessage,
            },
        )],
    )
}
