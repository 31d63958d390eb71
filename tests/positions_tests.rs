//! Position table tests: slot names and ledger line requirements.

use staffgrid::positions::{self, lookup, lookup_or_fallback, POSITION_TABLE};

/// Ledger lines a slot needs: every even slot beyond the outer staff lines
/// (±4) up to and including the notehead, ordered outward.
fn expected_ledger_lines(slot: i32) -> Vec<i32> {
    if slot > 4 {
        (6..=slot).step_by(2).collect()
    } else if slot < -4 {
        (6..=-slot).step_by(2).map(|p| -p).collect()
    } else {
        Vec::new()
    }
}

#[test]
fn table_is_ordered_and_unique() {
    assert_eq!(POSITION_TABLE.len(), 17);
    for pair in POSITION_TABLE.windows(2) {
        assert!(
            pair[0].slot_index < pair[1].slot_index,
            "slots must be strictly increasing: {} then {}",
            pair[0].slot_index,
            pair[1].slot_index
        );
    }
    assert_eq!(POSITION_TABLE.first().unwrap().slot_index, positions::MIN_SLOT);
    assert_eq!(POSITION_TABLE.last().unwrap().slot_index, positions::MAX_SLOT);
}

#[test]
fn ledger_lines_cover_every_skipped_line() {
    for entry in POSITION_TABLE.iter() {
        assert_eq!(
            entry.ledger_lines,
            expected_ledger_lines(entry.slot_index).as_slice(),
            "ledger lines for slot {} ({})",
            entry.slot_index,
            entry.name
        );
        if (-5..=5).contains(&entry.slot_index) {
            assert!(entry.ledger_lines.is_empty(), "slot {} is inside the staff", entry.slot_index);
        }
    }
}

#[test]
fn lookup_resolves_names() {
    assert_eq!(lookup(0).map(|s| s.name), Some("B4"));
    assert_eq!(lookup(-8).map(|s| s.name), Some("C6"));
    assert_eq!(lookup(6).map(|s| s.name), Some("C4"));
    assert_eq!(lookup(8).map(|s| s.ledger_lines), Some(&[6, 8][..]));
}

#[test]
fn lookup_miss_degrades_to_middle_line() {
    assert!(lookup(9).is_none());
    assert!(lookup(-9).is_none());

    let (name, ledger) = lookup_or_fallback(42);
    assert_eq!(name, "B4");
    assert!(ledger.is_empty());
}
