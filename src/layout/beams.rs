//! Beam grouping and beam geometry.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::*;
use crate::settings::DocumentSettings;
use super::beat_map::BeatGrid;
use super::constants::*;

// ── Grouping ────────────────────────────────────────────────────────

/// Partition the beamable notes of a staff into maximal runs on strictly
/// consecutive beats. Runs shorter than two notes are dropped; those notes
/// keep their own flags.
///
/// Rests and non-beamable notes never join a run. They only break one by
/// occupying the beat that would have continued it. Two beamable notes on
/// the same beat also break the run (the second does not follow the first
/// by exactly one beat).
pub fn find_beam_groups(elements: &[Element]) -> Vec<Vec<&Note>> {
    let mut beamable: Vec<&Note> = elements
        .iter()
        .filter_map(Element::as_note)
        .filter(|n| n.kind.is_beamable())
        .collect();
    beamable.sort_by_key(|n| n.beat_index);

    let mut groups: Vec<Vec<&Note>> = Vec::new();
    let mut current: Vec<&Note> = Vec::new();

    for note in beamable {
        let continues = current
            .last()
            .map_or(false, |prev| note.beat_index == prev.beat_index + 1);
        if !continues && !current.is_empty() {
            if current.len() >= 2 {
                groups.push(std::mem::take(&mut current));
            } else {
                current.clear();
            }
        }
        current.push(note);
    }
    if current.len() >= 2 {
        groups.push(current);
    }

    groups
}

// ── Geometry ────────────────────────────────────────────────────────

/// Vertical geometry shared by one beam group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeamGeometry {
    pub stem_down: bool,
    /// Primary beam line, percent of staff height from the top of the band
    pub beam_offset_percent: f64,
    /// Full-width beam lines: the lowest subdivision across the group
    pub beam_line_count: u8,
    /// Stem length (mm) of each note, reaching the primary beam
    pub stem_lengths: BTreeMap<ElementId, f64>,
}

/// Notehead centre as a percent of staff height.
pub fn slot_y_percent(slot_index: i32) -> f64 {
    MIDDLE_LINE_PERCENT + slot_index as f64 * SLOT_SPACING_PERCENT
}

/// Resolve direction, beam height and stem lengths for a group. Fewer than
/// two notes means no beam, not an error.
pub fn resolve_beam(group: &[&Note], settings: &DocumentSettings) -> Option<BeamGeometry> {
    if group.len() < 2 {
        return None;
    }

    let mean_slot =
        group.iter().map(|n| n.slot_index as f64).sum::<f64>() / group.len() as f64;
    let stem_down = mean_slot < 0.0;

    let min_slot = group.iter().map(|n| n.slot_index).min()?;
    let max_slot = group.iter().map(|n| n.slot_index).max()?;
    let stem_pct = settings.stem_length_percent();

    // Down-stems hang below the lowest notehead, up-stems rise above the highest.
    let beam_offset_percent = if stem_down {
        slot_y_percent(max_slot) + stem_pct
    } else {
        slot_y_percent(min_slot) - stem_pct
    };

    let min_stem = settings.stem_length * MIN_STEM_RATIO;
    let stem_lengths = group
        .iter()
        .map(|n| {
            let note_y = slot_y_percent(n.slot_index);
            let span = if stem_down {
                beam_offset_percent - note_y
            } else {
                note_y - beam_offset_percent
            };
            let mm = span / 100.0 * settings.staff_height;
            (n.id, mm.max(min_stem))
        })
        .collect();

    let beam_line_count = group.iter().map(|n| n.kind.beam_count()).min().unwrap_or(1).max(1);

    Some(BeamGeometry {
        stem_down,
        beam_offset_percent,
        beam_line_count,
        stem_lengths,
    })
}

/// Vertical position of the beam line at `level` (1 = primary), stacking
/// away from the noteheads.
pub fn beam_level_y(geometry: &BeamGeometry, level: u8) -> f64 {
    let step = (level.max(1) - 1) as f64 * BEAM_LINE_SPACING_PERCENT;
    if geometry.stem_down {
        geometry.beam_offset_percent + step
    } else {
        geometry.beam_offset_percent - step
    }
}

// ── Horizontal placement ────────────────────────────────────────────

/// One horizontal beam bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeamSegment {
    /// 1 = primary (eighth) beam, 2 = sixteenth beam
    pub level: u8,
    pub x_start_percent: f64,
    pub x_end_percent: f64,
    pub y_percent: f64,
}

impl BeamSegment {
    pub fn width_percent(&self) -> f64 {
        self.x_end_percent - self.x_start_percent
    }
}

/// A beam group fully placed on the staff.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeamLayout {
    pub note_ids: Vec<ElementId>,
    pub geometry: BeamGeometry,
    pub thickness_px: f64,
    /// `beam_line_count` full-width lines
    pub lines: Vec<BeamSegment>,
    /// Partial beams under runs of faster notes in a mixed group
    pub secondary: Vec<BeamSegment>,
}

pub fn layout_beam(
    group: &[&Note],
    geometry: BeamGeometry,
    grid: &BeatGrid,
    note_width_percent: f64,
) -> Option<BeamLayout> {
    let first = group.first()?;
    let last = group.last()?;

    let (x_start, x_end) =
        grid.beam_span(first.beat_index, last.beat_index, geometry.stem_down, note_width_percent);

    let lines = (1..=geometry.beam_line_count)
        .map(|level| BeamSegment {
            level,
            x_start_percent: x_start,
            x_end_percent: x_end,
            y_percent: beam_level_y(&geometry, level),
        })
        .collect();

    let secondary = secondary_segments(group, &geometry, grid, note_width_percent);

    Some(BeamLayout {
        note_ids: group.iter().map(|n| n.id).collect(),
        geometry,
        thickness_px: BEAM_THICKNESS_PX,
        lines,
        secondary,
    })
}

/// For each level above the shared line count, beam every run of notes that
/// needs that level. A single note gets a half-cell stub pointing at its
/// neighbour inside the group.
fn secondary_segments(
    group: &[&Note],
    geometry: &BeamGeometry,
    grid: &BeatGrid,
    note_width_percent: f64,
) -> Vec<BeamSegment> {
    let max_level = group.iter().map(|n| n.kind.beam_count()).max().unwrap_or(0);
    let stem_offset = BeatGrid::stem_offset_percent(geometry.stem_down, note_width_percent);
    let stub = grid.cell_width_percent() * BEAM_STUB_CELL_RATIO;
    let stem_x = |n: &Note| grid.cell_center_percent(n.beat_index) + stem_offset;

    let mut segments = Vec::new();
    for level in (geometry.beam_line_count + 1)..=max_level {
        let y = beam_level_y(geometry, level);
        for (start, end) in runs_where(group, |n| n.kind.beam_count() >= level) {
            let (x_start, x_end) = if end > start {
                (stem_x(group[start]), stem_x(group[end]))
            } else if end + 1 < group.len() {
                let x = stem_x(group[start]);
                (x, x + stub)
            } else {
                let x = stem_x(group[start]);
                (x - stub, x)
            };
            segments.push(BeamSegment {
                level,
                x_start_percent: x_start,
                x_end_percent: x_end,
                y_percent: y,
            });
        }
    }
    segments
}

/// Inclusive index ranges of consecutive group members satisfying `pred`.
fn runs_where(group: &[&Note], pred: impl Fn(&Note) -> bool) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start: Option<usize> = None;
    for (i, note) in group.iter().enumerate() {
        match (pred(*note), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push((s, i - 1));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push((s, group.len() - 1));
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: u64, beat: u32, kind: NoteKind) -> Note {
        Note {
            id: ElementId(id),
            beat_index: beat,
            slot_index: 0,
            name: String::new(),
            ledger_lines: Vec::new(),
            kind,
            color: DEFAULT_NOTE_COLOR.to_string(),
            accidental: Accidental::None,
        }
    }

    #[test]
    fn runs_where_finds_separate_runs() {
        let a = note(1, 0, NoteKind::Sixteenth);
        let b = note(2, 1, NoteKind::Sixteenth);
        let c = note(3, 2, NoteKind::Eighth);
        let d = note(4, 3, NoteKind::Sixteenth);
        let group = vec![&a, &b, &c, &d];
        let runs = runs_where(&group, |n| n.kind == NoteKind::Sixteenth);
        assert_eq!(runs, vec![(0, 1), (3, 3)]);
    }

    #[test]
    fn beam_levels_stack_away_from_noteheads() {
        let geometry = BeamGeometry {
            stem_down: false,
            beam_offset_percent: 10.0,
            beam_line_count: 2,
            stem_lengths: BTreeMap::new(),
        };
        assert_eq!(beam_level_y(&geometry, 1), 10.0);
        assert_eq!(beam_level_y(&geometry, 2), 6.0);

        let down = BeamGeometry { stem_down: true, ..geometry };
        assert_eq!(beam_level_y(&down, 2), 14.0);
    }
}
