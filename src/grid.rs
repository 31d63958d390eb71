//! Grid operations on staves and pages.
//!
//! Every operation takes a shared reference and returns a new value; staves
//! that do not change are shared with the input through their `Arc`.

use std::sync::Arc;

use serde::Serialize;

use crate::model::*;
use crate::positions;

/// Outcome of a click on a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "id", rename_all = "lowercase")]
pub enum Toggle {
    /// The cell was empty; a new element with this id now occupies it.
    Inserted(ElementId),
    /// The cell was occupied; that element was removed and nothing placed.
    Removed(ElementId),
}

/// Click semantics: an occupied cell is cleared, an empty cell receives a
/// fresh element built from `template`. Two identical clicks cancel.
pub fn place_or_toggle(
    staff: &Staff,
    beat_index: u32,
    slot_index: i32,
    template: &ElementTemplate,
    ids: &mut IdGenerator,
) -> (Staff, Toggle) {
    if let Some(existing) = staff.element_at(beat_index, slot_index) {
        let id = existing.id();
        return (remove(staff, id), Toggle::Removed(id));
    }

    let (name, ledger_lines) = positions::lookup_or_fallback(slot_index);
    let id = ElementId(ids.next_raw());
    let element = template.instantiate(id, beat_index, slot_index, name.to_string(), ledger_lines);

    let mut elements = staff.elements.clone();
    elements.push(element);
    (Staff { id: staff.id, elements }, Toggle::Inserted(id))
}

/// Remove an element by id. Absent ids leave the staff unchanged.
pub fn remove(staff: &Staff, id: ElementId) -> Staff {
    Staff {
        id: staff.id,
        elements: staff.elements.iter().filter(|e| e.id() != id).cloned().collect(),
    }
}

/// Grow or shrink a page to `target` staves.
///
/// Growing appends empty staves numbered from `current + 1`. Shrinking drops
/// trailing staves together with their elements; this is destructive and
/// callers must mean it.
pub fn resize_staff_count(page: &Page, target: usize) -> Page {
    let current = page.staffs.len();
    let mut staffs = page.staffs.clone();

    if current < target {
        staffs.extend((current + 1..=target).map(|i| Arc::new(Staff::new(i as u32))));
    } else if current > target {
        let lost: usize = staffs[target..].iter().map(|s| s.elements.len()).sum();
        if lost > 0 {
            log::warn!(
                "page {}: shrinking {current} -> {target} staves discards {lost} elements",
                page.id.0
            );
        }
        staffs.truncate(target);
    }

    Page { id: page.id, staffs }
}

/// Replace one staff of a page, sharing the others.
pub fn with_staff(page: &Page, staff_index: usize, staff: Staff) -> Page {
    let mut staffs = page.staffs.clone();
    if let Some(slot) = staffs.get_mut(staff_index) {
        *slot = Arc::new(staff);
    }
    Page { id: page.id, staffs }
}
