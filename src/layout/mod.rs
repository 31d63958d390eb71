//! Layout engine: turns the placed elements of a staff into renderer-ready
//! geometry.
//!
//! One pass per staff: beam grouping, beam geometry, horizontal placement,
//! then per-element geometry that knows which notes are beamed. All
//! positions are percentages of the staff band (vertical) or the page
//! width (horizontal); lengths are millimetres.

mod constants;
mod beat_map;
mod beams;
mod notes;
mod staff;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::document::Document;
use crate::error::Result;
use crate::model::*;
use crate::pagination::StaffCapacity;
use crate::settings::{DocumentSettings, PageDimensions};

pub use beat_map::BeatGrid;
pub use beams::{
    beam_level_y, find_beam_groups, layout_beam, resolve_beam, slot_y_percent, BeamGeometry,
    BeamLayout, BeamSegment,
};
pub use notes::{BeamedStem, ElementLayout, Glyph, LedgerLine, NoteGlyph, RestGlyph, Stem};
pub use staff::StaffFurniture;

use notes::layout_element;
use staff::staff_furniture;

// ═══════════════════════════════════════════════════════════════════════
// Staff layout
// ═══════════════════════════════════════════════════════════════════════

/// Inputs shared by every staff of a layout pass.
#[derive(Debug, Clone, Copy)]
pub struct StaffContext<'a> {
    pub settings: &'a DocumentSettings,
    pub page: &'a PageDimensions,
    pub time_signature: TimeSignature,
    /// True only for staff 0 of page 0
    pub shows_time_signature: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaffLayout {
    pub staff_id: u32,
    pub height_mm: f64,
    pub spacing_mm: f64,
    pub grid: BeatGrid,
    pub furniture: StaffFurniture,
    /// Sorted by beat, then slot
    pub elements: Vec<ElementLayout>,
    pub beams: Vec<BeamLayout>,
    /// Beamed notes and their resolved stems; absent ids draw their own flags
    pub beamed: BTreeMap<ElementId, BeamedStem>,
}

impl StaffLayout {
    pub fn element(&self, id: ElementId) -> Option<&ElementLayout> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn is_beamed(&self, id: ElementId) -> bool {
        self.beamed.contains_key(&id)
    }
}

pub fn layout_staff(staff: &Staff, ctx: &StaffContext<'_>) -> StaffLayout {
    let settings = ctx.settings;
    let grid = BeatGrid::new(&ctx.time_signature, ctx.shows_time_signature);
    let note_width_pct = settings.note_width_percent(ctx.page);

    // Elements left beyond the grid by a time signature change stay in the
    // model but take no part in layout.
    let visible: Vec<Element> = staff
        .elements
        .iter()
        .filter(|e| {
            let inside = grid.contains(e.beat_index());
            if !inside {
                log::debug!(
                    "staff {}: element {} at beat {} is outside the {}-beat grid",
                    staff.id,
                    e.id().0,
                    e.beat_index(),
                    grid.total_beats()
                );
            }
            inside
        })
        .cloned()
        .collect();

    let mut beams = Vec::new();
    let mut beamed = BTreeMap::new();
    for group in find_beam_groups(&visible) {
        let Some(geometry) = resolve_beam(&group, settings) else {
            continue;
        };
        for note in &group {
            if let Some(&len) = geometry.stem_lengths.get(&note.id) {
                beamed.insert(
                    note.id,
                    BeamedStem {
                        stem_down: geometry.stem_down,
                        stem_length_mm: len,
                        beam_offset_percent: geometry.beam_offset_percent,
                    },
                );
            }
        }
        if let Some(beam) = layout_beam(&group, geometry, &grid, note_width_pct) {
            beams.push(beam);
        }
    }

    let mut elements: Vec<ElementLayout> = visible
        .iter()
        .map(|e| layout_element(e, &grid, settings, beamed.get(&e.id())))
        .collect();
    elements.sort_by_key(|e| (e.beat_index, e.slot_index));

    let time_signature = ctx.shows_time_signature.then_some(ctx.time_signature);

    StaffLayout {
        staff_id: staff.id,
        height_mm: settings.staff_height,
        spacing_mm: settings.staff_spacing,
        grid,
        furniture: staff_furniture(&grid, settings, time_signature),
        elements,
        beams,
        beamed,
    }
}

/// Hover preview: the geometry `template` would get at `(beat, slot)` if it
/// were placed now. `None` when the cell is taken or outside the grid. The
/// preview is always drawn unbeamed and nothing is committed.
pub fn preview(
    staff: &Staff,
    ctx: &StaffContext<'_>,
    beat_index: u32,
    slot_index: i32,
    template: &ElementTemplate,
) -> Option<ElementLayout> {
    let grid = BeatGrid::new(&ctx.time_signature, ctx.shows_time_signature);
    if !grid.contains(beat_index) || staff.element_at(beat_index, slot_index).is_some() {
        return None;
    }
    let ledger_lines = crate::positions::lookup(slot_index)
        .map(|s| s.ledger_lines.to_vec())
        .unwrap_or_default();
    let ghost = template.instantiate(ElementId(0), beat_index, slot_index, String::new(), ledger_lines);
    Some(layout_element(&ghost, &grid, ctx.settings, None))
}

// ═══════════════════════════════════════════════════════════════════════
// Page / document layout
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageHeader {
    pub title: String,
    pub composer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageLayout {
    pub page_id: PageId,
    pub page_index: usize,
    pub page_count: usize,
    pub width_mm: f64,
    pub height_mm: f64,
    /// Title banner, first page only
    pub header: Option<PageHeader>,
    pub footer: String,
    pub staves: Vec<StaffLayout>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentLayout {
    pub capacity: StaffCapacity,
    pub pages: Vec<PageLayout>,
}

pub fn layout_page(
    document: &Document,
    page_index: usize,
    settings: &DocumentSettings,
    dims: &PageDimensions,
) -> Result<PageLayout> {
    let page = document.page(page_index)?;
    let page_count = document.pages.len();

    let staves = page
        .staffs
        .iter()
        .enumerate()
        .map(|(staff_index, staff)| {
            let ctx = StaffContext {
                settings,
                page: dims,
                time_signature: document.time_signature,
                shows_time_signature: page_index == 0 && staff_index == 0,
            };
            layout_staff(staff, &ctx)
        })
        .collect();

    let header = (page_index == 0).then(|| PageHeader {
        title: document.title.clone(),
        composer: document.composer.clone(),
    });

    Ok(PageLayout {
        page_id: page.id,
        page_index,
        page_count,
        width_mm: dims.width_mm,
        height_mm: dims.height_mm,
        header,
        footer: format!("Page {} / {}", page_index + 1, page_count),
        staves,
    })
}

pub fn layout_document(
    document: &Document,
    settings: &DocumentSettings,
    dims: &PageDimensions,
) -> Result<DocumentLayout> {
    let pages = (0..document.pages.len())
        .map(|i| layout_page(document, i, settings, dims))
        .collect::<Result<Vec<_>>>()?;
    Ok(DocumentLayout {
        capacity: StaffCapacity::compute(settings, dims),
        pages,
    })
}
