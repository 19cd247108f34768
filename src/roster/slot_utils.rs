use std::collections::HashSet;

use crate::error::{JuntaError, JuntaResult};
use super::types::{Slot, SlotIndex, ORGANIZER_NUMBER};

/// Checks that a submitted draw number is plain decimal digits that fit a `u32`
pub fn parse_draw_number(raw: &str) -> JuntaResult<u32> {
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(JuntaError::MalformedNumber(raw.to_string()));
    }
    raw.parse()
        .map_err(|_| JuntaError::MalformedNumber(raw.to_string()))
}

/// True when the string is exactly the organizer's reserved number
pub fn is_organizer_number(raw: &str) -> bool {
    raw == ORGANIZER_NUMBER.to_string()
}

/// Finds the member slot whose draw number displays exactly as `number`.
/// The organizer slot never matches.
pub fn find_number(slots: &[Slot], number: &str) -> Option<SlotIndex> {
    slots
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, slot)| {
            slot.occupied
                && slot
                    .draw_number
                    .map(|n| n.to_string() == number)
                    .unwrap_or(false)
        })
        .map(|(i, _)| SlotIndex::new(i))
}

/// Numbers currently held by occupied member slots
pub fn numbers_in_use(slots: &[Slot]) -> HashSet<u32> {
    slots
        .iter()
        .skip(1)
        .filter(|slot| slot.occupied)
        .filter_map(|slot| slot.draw_number)
        .collect()
}

/// Smallest number in `[2, size]` that no member slot holds yet
pub fn first_free_number(slots: &[Slot]) -> Option<u32> {
    let used = numbers_in_use(slots);
    let size = slots.len() as u32;
    (ORGANIZER_NUMBER + 1..=size).find(|n| !used.contains(n))
}

/// Indices of slots that take part in a lottery: occupied, not the organizer
pub fn eligible_indices(slots: &[Slot]) -> Vec<SlotIndex> {
    slots
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, slot)| slot.occupied)
        .map(|(i, _)| SlotIndex::new(i))
        .collect()
}
