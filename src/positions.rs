//! Vertical slot table: maps a slot index to its pitch name and the ledger
//! lines a notehead at that slot needs.
//!
//! Slot 0 is the middle staff line (B4 on a treble staff). Each unit is half
//! a line spacing; negative slots are higher on the staff. The five staff
//! lines sit on the even slots -4..=4, so ledger lines are the even slots
//! beyond ±4 up to the notehead.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VerticalSlot {
    pub name: &'static str,
    pub slot_index: i32,
    pub ledger_lines: &'static [i32],
}

pub const MIN_SLOT: i32 = -8;
pub const MAX_SLOT: i32 = 8;

/// Slot the table falls back to on a miss (the middle line).
pub const FALLBACK_SLOT: i32 = 0;

const fn slot(name: &'static str, slot_index: i32, ledger_lines: &'static [i32]) -> VerticalSlot {
    VerticalSlot { name, slot_index, ledger_lines }
}

/// Ordered top to bottom.
pub static POSITION_TABLE: [VerticalSlot; 17] = [
    slot("C6", -8, &[-6, -8]),
    slot("B5", -7, &[-6]),
    slot("A5", -6, &[-6]),
    slot("G5", -5, &[]),
    slot("F5", -4, &[]),
    slot("E5", -3, &[]),
    slot("D5", -2, &[]),
    slot("C5", -1, &[]),
    slot("B4", 0, &[]),
    slot("A4", 1, &[]),
    slot("G4", 2, &[]),
    slot("F4", 3, &[]),
    slot("E4", 4, &[]),
    slot("D4", 5, &[]),
    slot("C4", 6, &[6]),
    slot("B3", 7, &[6]),
    slot("A3", 8, &[6, 8]),
];

/// Exact lookup; `None` for indices outside the table.
pub fn lookup(slot_index: i32) -> Option<&'static VerticalSlot> {
    if !(MIN_SLOT..=MAX_SLOT).contains(&slot_index) {
        return None;
    }
    POSITION_TABLE.get((slot_index - MIN_SLOT) as usize)
}

/// Lookup that degrades on a miss: the middle-line identity with no ledger
/// lines. Logged as a warning since the host should only send table slots.
pub fn lookup_or_fallback(slot_index: i32) -> (&'static str, Vec<i32>) {
    match lookup(slot_index) {
        Some(s) => (s.name, s.ledger_lines.to_vec()),
        None => {
            log::warn!("slot {slot_index} has no position table entry; using middle line identity");
            let middle = &POSITION_TABLE[(FALLBACK_SLOT - MIN_SLOT) as usize];
            (middle.name, Vec::new())
        }
    }
}
