use std::sync::Arc;

use cmdkeys_core::reorder::{logical_index, message_list_offset};
use cmdkeys_core::{
    parse_ticks, resolve_drop, DropOutcome, EditorConfig, Effect, LayoutConfig, ListDims, Macro,
    MacroEditor, Profile, ProfileKeybinds, SlotKind, UnicodeMeasure,
};
use proptest::prelude::*;

/// `structural` leading rows, then `n` message/spacer pairs, then the add row
fn slot_kinds(structural: usize, n: usize) -> Vec<SlotKind> {
    let mut kinds = vec![SlotKind::Other; structural];
    for _ in 0..n {
        let owner = kinds.len();
        kinds.push(SlotKind::Message);
        kinds.push(SlotKind::Spacer { owner });
    }
    kinds.push(SlotKind::Other);
    kinds
}

fn apply(items: &mut Vec<usize>, outcome: DropOutcome) {
    if let DropOutcome::Move { from, to } = outcome {
        let item = items.remove(from);
        items.insert(to, item);
    }
}

fn cell_editor(n: usize) -> MacroEditor {
    let texts: Vec<String> = (0..n).map(|i| format!("msg {}", i)).collect();
    let profile = Profile {
        macros: vec![Macro::with_messages(texts.iter().map(String::as_str))],
        ..Profile::default()
    };
    let config = EditorConfig {
        layout: LayoutConfig {
            item_height: 1,
            entry_width: 60,
            entry_height: 1,
            spacing: 1,
            row_width_margin: 2,
            min_small_button: 3,
            field_margin: 2,
            delay_max_len: 8,
        },
        ..EditorConfig::default()
    };
    MacroEditor::new(
        profile,
        0,
        Box::new(ProfileKeybinds::new()),
        config,
        Arc::new(UnicodeMeasure),
        ListDims {
            width: 100,
            height: 200,
            top: 0,
        },
    )
    .unwrap()
}

proptest! {
    /// Property: any drop leaves the messages a permutation of the original
    #[test]
    fn prop_drop_is_permutation(
        structural in 2usize..5,
        n in 1usize..12,
        source_pick in any::<prop::sample::Index>(),
        hovered in prop::option::of(0usize..40),
    ) {
        let kinds = slot_kinds(structural, n);
        let source = structural + source_pick.index(n) * 2;
        let outcome = resolve_drop(&kinds, source, hovered).unwrap();

        let mut items: Vec<usize> = (0..n).collect();
        apply(&mut items, outcome);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        prop_assert_eq!(sorted, (0..n).collect::<Vec<_>>());
    }

    /// Property: a move lands the dragged message right before the message
    /// that was under the pointer, or last when dropped after the final one
    #[test]
    fn prop_drop_lands_in_target_gap(
        n in 2usize..10,
        from in 0usize..10,
        gap in 0usize..11,
    ) {
        prop_assume!(from < n && gap <= n);
        let kinds = slot_kinds(4, n);
        let hovered = if gap == n { 4 + (n - 1) * 2 + 1 } else { 4 + gap * 2 };
        let outcome = resolve_drop(&kinds, 4 + from * 2, Some(hovered)).unwrap();

        let mut items: Vec<usize> = (0..n).collect();
        apply(&mut items, outcome);
        let pos = items.iter().position(|&i| i == from).unwrap();
        if gap == n {
            prop_assert_eq!(pos, n - 1);
        } else if gap != from {
            let after = items.get(pos + 1).copied();
            if gap == from + 1 {
                prop_assert_eq!(outcome, DropOutcome::NoOp);
            } else {
                prop_assert_eq!(after, Some(gap));
            }
        }
    }

    /// Property: logical indices are dense and ordered
    #[test]
    fn prop_logical_index_dense(structural in 1usize..6, n in 1usize..20) {
        let kinds = slot_kinds(structural, n);
        prop_assert_eq!(message_list_offset(&kinds).unwrap(), structural);
        let logical: Vec<usize> = kinds
            .iter()
            .enumerate()
            .filter(|(_, k)| **k == SlotKind::Message)
            .map(|(slot, _)| logical_index(&kinds, slot).unwrap())
            .collect();
        prop_assert_eq!(logical, (0..n).collect::<Vec<_>>());
    }

    /// Property: valid tick strings parse to their value; negatives never do
    #[test]
    fn prop_ticks_parse(value in any::<u32>(), pad in "[ \t]{0,3}") {
        let text = format!("{}{}{}", pad, value, pad);
        prop_assert_eq!(parse_ticks(&text), Ok(value));
        let negative = format!("-{}", u64::from(value) + 1);
        prop_assert!(parse_ticks(&negative).is_err());
    }

    /// Property: non-numeric input is always rejected
    #[test]
    fn prop_ticks_reject_garbage(text in "[a-z_.]{1,8}") {
        prop_assert!(parse_ticks(&text).is_err());
    }

    /// Property: dragging through the editor keeps every message exactly once
    #[test]
    fn prop_editor_drag_is_permutation(
        n in 1usize..8,
        source_pick in any::<prop::sample::Index>(),
        target_y in 0i32..30,
    ) {
        let mut editor = cell_editor(n);
        let texts = |e: &MacroEditor| -> Vec<String> {
            e.current().unwrap().messages.iter().map(|m| m.text.clone()).collect()
        };
        let mut before = texts(&editor);

        let slots: Vec<usize> = editor
            .list()
            .slot_kinds()
            .iter()
            .enumerate()
            .filter(|(_, k)| **k == SlotKind::Message)
            .map(|(slot, _)| slot)
            .collect();
        let source = slots[source_pick.index(n)];
        let x = editor.list().row(source).unwrap().widgets[0].x;
        let y = editor.list().slot_top(source);

        editor.pointer_down(x, y).unwrap();
        prop_assert!(editor.list().drag().is_some());
        editor.pointer_drag(x, target_y).unwrap();
        editor.pointer_up(x, target_y).unwrap();
        prop_assert!(editor.list().drag().is_none());

        let mut after = texts(&editor);
        before.sort();
        after.sort();
        prop_assert_eq!(after, before);
    }
}

#[test]
fn test_pointer_up_without_drag_is_nothing() {
    let mut editor = cell_editor(2);
    let geometry = *editor.list().geometry();
    let effect = editor
        .pointer_up(geometry.row_left(), geometry.top)
        .unwrap();
    assert_eq!(effect, Effect::None);
    assert_eq!(editor.current().unwrap().messages.len(), 2);
}
