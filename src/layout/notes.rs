//! Per-element geometry: noteheads, stems, flags, accidentals, ledger lines
//! and rests.

use serde::Serialize;

use crate::model::*;
use crate::settings::DocumentSettings;
use super::beams::slot_y_percent;
use super::beat_map::BeatGrid;
use super::constants::*;

/// Stem and beam facts for a note that belongs to a beam group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BeamedStem {
    pub stem_down: bool,
    pub stem_length_mm: f64,
    pub beam_offset_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LedgerLine {
    pub slot_index: i32,
    /// Offset from the notehead centre, percent of staff height
    pub offset_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stem {
    pub down: bool,
    pub length_mm: f64,
    pub width_px: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteGlyph {
    pub kind: NoteKind,
    pub color: String,
    pub hollow: bool,
    pub width_mm: f64,
    pub height_mm: f64,
    pub border_px: f64,
    pub accidental: Option<&'static str>,
    pub stem: Option<Stem>,
    pub beamed: bool,
    /// Individual flags; zero whenever a beam replaces them
    pub flag_count: u8,
}

impl NoteGlyph {
    pub fn needs_flag(&self) -> bool {
        self.flag_count > 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestGlyph {
    pub kind: RestKind,
    pub symbol: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Glyph {
    Note(NoteGlyph),
    Rest(RestGlyph),
}

/// Everything a renderer needs to draw one element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementLayout {
    pub id: ElementId,
    pub beat_index: u32,
    pub slot_index: i32,
    /// Left edge of the beat cell
    pub x_percent: f64,
    pub cell_width_percent: f64,
    /// Notehead centre
    pub y_percent: f64,
    pub ledger_lines: Vec<LedgerLine>,
    pub glyph: Glyph,
}

pub(super) fn layout_element(
    element: &Element,
    grid: &BeatGrid,
    settings: &DocumentSettings,
    beamed: Option<&BeamedStem>,
) -> ElementLayout {
    let glyph = match element {
        Element::Note(note) => Glyph::Note(note_glyph(note, settings, beamed)),
        Element::Rest(rest) => Glyph::Rest(RestGlyph {
            kind: rest.kind,
            symbol: rest.kind.symbol(),
        }),
    };

    // Rests sit on the grid but never draw ledger lines.
    let ledger_lines = match element {
        Element::Note(note) => ledger_offsets(note.slot_index, &note.ledger_lines),
        Element::Rest(_) => Vec::new(),
    };

    ElementLayout {
        id: element.id(),
        beat_index: element.beat_index(),
        slot_index: element.slot_index(),
        x_percent: grid.x_percent(element.beat_index()),
        cell_width_percent: grid.cell_width_percent(),
        y_percent: slot_y_percent(element.slot_index()),
        ledger_lines,
        glyph,
    }
}

fn note_glyph(note: &Note, settings: &DocumentSettings, beamed: Option<&BeamedStem>) -> NoteGlyph {
    let stem = note.kind.has_stem().then(|| match beamed {
        Some(b) => Stem {
            down: b.stem_down,
            length_mm: b.stem_length_mm,
            width_px: settings.stem_width,
        },
        None => Stem {
            down: note.slot_index < 0,
            length_mm: settings.stem_length,
            width_px: settings.stem_width,
        },
    });

    let flag_count = if beamed.is_some() { 0 } else { note.kind.beam_count() };

    NoteGlyph {
        kind: note.kind,
        color: note.color.clone(),
        hollow: note.kind.is_hollow(),
        width_mm: settings.note_width,
        height_mm: settings.note_height,
        border_px: settings.note_border_width,
        accidental: note.accidental.symbol(),
        stem,
        beamed: beamed.is_some(),
        flag_count,
    }
}

fn ledger_offsets(slot_index: i32, ledger_lines: &[i32]) -> Vec<LedgerLine> {
    ledger_lines
        .iter()
        .map(|&line| LedgerLine {
            slot_index: line,
            offset_percent: (line - slot_index) as f64 * SLOT_SPACING_PERCENT,
        })
        .collect()
}
