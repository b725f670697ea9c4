//! Drop-target resolution for dragging message rows.
//!
//! Slot indices count every row in the list, including the structural rows
//! above the messages and the spacer after each message. Logical indices count
//! messages only. Everything here converts between the two.
//!
//! A drop lands in a *gap* between messages. Gap `k` sits before message `k`,
//! so for `n` messages the gaps run `0..=n`:
//!
//! - a message row's own slot is the gap before it
//! - its spacer is the gap after it
//! - the slot just above the first message is gap 0
//!
//! Anything else cancels the drag.

use crate::error::RowListError;

/// The part of a slot the resolver cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Message,
    Spacer { owner: usize },
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Invalid target; nothing changes
    Cancelled,
    /// The message would land where it already is
    NoOp,
    /// Remove the message at `from`, then insert it at `to`
    Move { from: usize, to: usize },
}

/// Slot index of the first message row
pub fn message_list_offset(kinds: &[SlotKind]) -> Result<usize, RowListError> {
    kinds
        .iter()
        .position(|k| *k == SlotKind::Message)
        .ok_or(RowListError::NoMessageRow { len: kinds.len() })
}

/// Number of non-message slots in `kinds[..=slot]`
pub fn non_message_slots_through(kinds: &[SlotKind], slot: usize) -> usize {
    kinds
        .iter()
        .take(slot + 1)
        .filter(|k| **k != SlotKind::Message)
        .count()
}

/// Logical message index of the message row at `slot`
pub fn logical_index(kinds: &[SlotKind], slot: usize) -> Result<usize, RowListError> {
    match kinds.get(slot) {
        Some(SlotKind::Message) => Ok(slot - non_message_slots_through(kinds, slot)),
        Some(_) => Err(RowListError::NotAMessageRow { slot }),
        None => Err(RowListError::SlotOutOfRange {
            slot,
            len: kinds.len(),
        }),
    }
}

/// Gap a drop on `slot` targets, if it is a valid target at all
fn gap_at(kinds: &[SlotKind], slot: usize, first: usize) -> Result<Option<usize>, RowListError> {
    match kinds.get(slot) {
        Some(SlotKind::Message) => logical_index(kinds, slot).map(Some),
        Some(SlotKind::Spacer { owner }) => match kinds.get(*owner) {
            Some(SlotKind::Message) => Ok(Some(logical_index(kinds, *owner)? + 1)),
            _ => Ok(None),
        },
        Some(SlotKind::Other) if slot + 1 == first => Ok(Some(0)),
        _ => Ok(None),
    }
}

/// Decide what releasing a drag of `source` over `hovered` does.
///
/// `hovered` is `None` when the pointer left the list.
pub fn resolve_drop(
    kinds: &[SlotKind],
    source: usize,
    hovered: Option<usize>,
) -> Result<DropOutcome, RowListError> {
    let first = message_list_offset(kinds)?;
    let from = logical_index(kinds, source)?;

    let Some(hovered) = hovered else {
        return Ok(DropOutcome::Cancelled);
    };
    let Some(gap) = gap_at(kinds, hovered, first)? else {
        return Ok(DropOutcome::Cancelled);
    };

    if gap == from || gap == from + 1 {
        return Ok(DropOutcome::NoOp);
    }
    // Removing the source first shifts every later gap up by one
    let to = if gap > from { gap - 1 } else { gap };
    Ok(DropOutcome::Move { from, to })
}
