//! Layout tests: beat positions, per-element geometry, beam placement and
//! whole-document layout.

use pretty_assertions::assert_eq;
use staffgrid::layout::{BeatGrid, Glyph, NoteGlyph, StaffLayout};
use staffgrid::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn staff_with(placements: &[(u32, i32, ElementTemplate)]) -> Staff {
    let mut ids = model::IdGenerator::new();
    let mut staff = Staff::new(1);
    for (beat, slot, template) in placements {
        staff = place_or_toggle(&staff, *beat, *slot, template, &mut ids).0;
    }
    staff
}

fn lay_out(staff: &Staff, time: TimeSignature, shows_time: bool) -> StaffLayout {
    let settings = DocumentSettings::default();
    let ctx = StaffContext {
        settings: &settings,
        page: &PageDimensions::A4,
        time_signature: time,
        shows_time_signature: shows_time,
    };
    layout_staff(staff, &ctx)
}

fn note_glyph<'a>(layout: &'a StaffLayout, beat: u32, slot: i32) -> &'a NoteGlyph {
    let el = layout
        .elements
        .iter()
        .find(|e| e.beat_index == beat && e.slot_index == slot)
        .expect("element laid out");
    match &el.glyph {
        Glyph::Note(n) => n,
        Glyph::Rest(_) => panic!("expected a note at ({beat}, {slot})"),
    }
}

// ─── Beat grid ──────────────────────────────────────────────────────

#[test]
fn four_four_with_time_signature() {
    let grid = BeatGrid::new(&TimeSignature::new(4, 4), true);
    assert_eq!(grid.total_beats(), 8);
    assert!(approx(grid.clef_area_percent, 12.0));
    assert!(approx(grid.cell_width_percent(), 11.0));
    assert!(approx(grid.x_percent(0), 12.0));
    assert!(approx(grid.x_percent(3), 45.0));
    assert!(approx(grid.x_percent(4), 56.0));
    assert!(approx(grid.x_percent(5), 67.0));
    assert_eq!(grid.barlines(), vec![12.0, 56.0, 100.0]);
}

#[test]
fn three_four_without_time_signature() {
    let grid = BeatGrid::new(&TimeSignature::new(3, 4), false);
    assert_eq!(grid.total_beats(), 6);
    assert!(approx(grid.clef_area_percent, 8.0));
    assert!(approx(grid.x_percent(4), 8.0 + 46.0 + 46.0 / 3.0));
    assert!(!grid.contains(6));
}

#[test]
fn beam_span_follows_stem_side() {
    let grid = BeatGrid::new(&TimeSignature::new(4, 4), true);
    let note_w = 12.0 / 210.0 * 100.0;

    let (up_start, up_end) = grid.beam_span(0, 1, false, note_w);
    assert!(approx(up_start, 17.5 + note_w / 2.0));
    assert!(approx(up_end, 28.5 + note_w / 2.0));

    let (down_start, _) = grid.beam_span(0, 1, true, note_w);
    assert!(approx(down_start, 17.5 - note_w / 2.0));
}

// ─── Staff layout ───────────────────────────────────────────────────

#[test]
fn two_rising_eighths_beam_above() {
    let staff = staff_with(&[
        (0, 1, ElementTemplate::note(NoteKind::Eighth)),
        (1, 2, ElementTemplate::note(NoteKind::Eighth)),
    ]);
    let layout = lay_out(&staff, TimeSignature::new(4, 4), true);

    assert_eq!(layout.grid.total_beats(), 8);
    assert_eq!(layout.beams.len(), 1);
    let beam = &layout.beams[0];
    assert!(!beam.geometry.stem_down);
    assert_eq!(beam.lines.len(), 1);
    assert!(beam.secondary.is_empty());
    // One stem length above the highest notehead (slot 1).
    let stem_pct = 20.0 / 48.0 * 100.0;
    assert!(approx(beam.geometry.beam_offset_percent, 50.0 + 1.0 * 7.5 - stem_pct));
    assert!(approx(beam.geometry.stem_lengths[&ElementId(1)], 20.0));
    assert!(approx(beam.geometry.stem_lengths[&ElementId(2)], 20.0 + 7.5 / 100.0 * 48.0));
    assert!(beam.lines[0].width_percent() > 0.0);

    for el in &layout.elements {
        let g = note_glyph(&layout, el.beat_index, el.slot_index);
        assert!(g.beamed);
        assert!(!g.needs_flag());
        let stem = g.stem.expect("eighths have stems");
        assert!(!stem.down);
        assert!(approx(stem.length_mm, layout.beamed[&el.id].stem_length_mm));
        assert!(layout.is_beamed(el.id));
    }
}

#[test]
fn lone_fast_notes_draw_flags() {
    let staff = staff_with(&[
        (0, 3, ElementTemplate::note(NoteKind::Eighth)),
        (2, -3, ElementTemplate::note(NoteKind::Sixteenth)),
    ]);
    let layout = lay_out(&staff, TimeSignature::new(4, 4), false);

    assert!(layout.beams.is_empty());
    assert!(layout.beamed.is_empty());

    let eighth = note_glyph(&layout, 0, 3);
    assert_eq!(eighth.flag_count, 1);
    let stem = eighth.stem.unwrap();
    assert!(!stem.down);
    assert!(approx(stem.length_mm, 20.0));

    let sixteenth = note_glyph(&layout, 2, -3);
    assert_eq!(sixteenth.flag_count, 2);
    assert!(sixteenth.stem.unwrap().down);
}

#[test]
fn note_glyph_details() {
    let staff = staff_with(&[
        (0, 0, ElementTemplate::note(NoteKind::Whole)),
        (1, 0, ElementTemplate::note(NoteKind::Half)),
        (
            2,
            -8,
            ElementTemplate::Note {
                kind: NoteKind::Quarter,
                color: "#1e88e5".into(),
                accidental: Accidental::Flat,
            },
        ),
    ]);
    let layout = lay_out(&staff, TimeSignature::new(4, 4), true);

    let whole = note_glyph(&layout, 0, 0);
    assert!(whole.hollow);
    assert!(whole.stem.is_none());

    let half = note_glyph(&layout, 1, 0);
    assert!(half.hollow);
    assert!(half.stem.is_some());

    let quarter = note_glyph(&layout, 2, -8);
    assert!(!quarter.hollow);
    assert_eq!(quarter.accidental, Some("b"));
    assert_eq!(quarter.color, "#1e88e5");
    assert_eq!(quarter.flag_count, 0);

    let el = layout.elements.iter().find(|e| e.slot_index == -8).unwrap();
    assert!(approx(el.y_percent, -10.0));
    let offsets: Vec<(i32, f64)> =
        el.ledger_lines.iter().map(|l| (l.slot_index, l.offset_percent)).collect();
    assert_eq!(offsets, vec![(-6, 15.0), (-8, 0.0)]);
}

#[test]
fn rests_have_symbols_and_no_ledger_lines() {
    let staff = staff_with(&[(3, 7, ElementTemplate::rest(RestKind::Eighth))]);
    let layout = lay_out(&staff, TimeSignature::new(4, 4), true);
    let el = &layout.elements[0];
    assert!(el.ledger_lines.is_empty());
    match &el.glyph {
        Glyph::Rest(r) => {
            assert_eq!(r.kind, RestKind::Eighth);
            assert_eq!(r.symbol, RestKind::Eighth.symbol());
        }
        Glyph::Note(_) => panic!("expected a rest"),
    }
}

#[test]
fn mixed_group_draws_secondary_beam_under_sixteenths() {
    let staff = staff_with(&[
        (0, 4, ElementTemplate::note(NoteKind::Eighth)),
        (1, 4, ElementTemplate::note(NoteKind::Sixteenth)),
        (2, 4, ElementTemplate::note(NoteKind::Sixteenth)),
        (3, 4, ElementTemplate::note(NoteKind::Eighth)),
    ]);
    let layout = lay_out(&staff, TimeSignature::new(4, 4), true);
    let beam = &layout.beams[0];

    assert_eq!(beam.geometry.beam_line_count, 1);
    assert_eq!(beam.secondary.len(), 1);
    let seg = &beam.secondary[0];
    assert_eq!(seg.level, 2);
    let note_w = 12.0 / 210.0 * 100.0;
    assert!(approx(seg.x_start_percent, layout.grid.cell_center_percent(1) + note_w / 2.0));
    assert!(approx(seg.x_end_percent, layout.grid.cell_center_percent(2) + note_w / 2.0));
    // Stems up: the second beam stacks above the first, away from the noteheads.
    assert!(!beam.geometry.stem_down);
    assert!(approx(seg.y_percent, beam.geometry.beam_offset_percent - 4.0));
}

#[test]
fn lone_sixteenth_in_mixed_group_gets_a_stub() {
    let staff = staff_with(&[
        (0, -4, ElementTemplate::note(NoteKind::Sixteenth)),
        (1, -4, ElementTemplate::note(NoteKind::Eighth)),
        (2, -4, ElementTemplate::note(NoteKind::Sixteenth)),
    ]);
    let layout = lay_out(&staff, TimeSignature::new(4, 4), true);
    let beam = &layout.beams[0];
    assert!(beam.geometry.stem_down);
    assert_eq!(beam.secondary.len(), 2);

    let half_cell = layout.grid.cell_width_percent() / 2.0;
    let first = &beam.secondary[0];
    assert!(approx(first.width_percent(), half_cell));
    assert!(approx(first.x_start_percent, beam.lines[0].x_start_percent), "points right");
    let last = &beam.secondary[1];
    assert!(approx(last.x_end_percent, beam.lines[0].x_end_percent), "points left");
    assert!(approx(last.y_percent, beam.geometry.beam_offset_percent + 4.0));
}

#[test]
fn staff_furniture_lines_and_time_signature() {
    let layout = lay_out(&Staff::new(1), TimeSignature::new(6, 8), true);
    assert_eq!(layout.furniture.staff_lines, vec![20.0, 35.0, 50.0, 65.0, 80.0]);
    assert_eq!(layout.furniture.time_signature, Some(TimeSignature::new(6, 8)));
    assert_eq!(layout.grid.total_beats(), 12);

    let other = lay_out(&Staff::new(2), TimeSignature::new(6, 8), false);
    assert_eq!(other.furniture.time_signature, None);
    assert!(approx(other.furniture.clef_area_percent, 8.0));
}

#[test]
fn elements_beyond_the_grid_are_skipped() {
    let staff = staff_with(&[
        (6, 0, ElementTemplate::note(NoteKind::Eighth)),
        (7, 0, ElementTemplate::note(NoteKind::Eighth)),
        (1, 0, ElementTemplate::note(NoteKind::Quarter)),
    ]);
    let layout = lay_out(&staff, TimeSignature::new(3, 4), true);
    assert_eq!(layout.elements.len(), 1);
    assert!(layout.beams.is_empty());
}

// ─── Preview ────────────────────────────────────────────────────────

#[test]
fn preview_only_on_empty_cells() {
    let settings = DocumentSettings::default();
    let ctx = StaffContext {
        settings: &settings,
        page: &PageDimensions::A4,
        time_signature: TimeSignature::new(4, 4),
        shows_time_signature: true,
    };
    let staff = staff_with(&[(0, 0, ElementTemplate::note(NoteKind::Eighth))]);
    let template = ElementTemplate::note(NoteKind::Eighth);

    assert!(preview(&staff, &ctx, 0, 0, &template).is_none());
    assert!(preview(&staff, &ctx, 8, 0, &template).is_none());

    let ghost = preview(&staff, &ctx, 1, 7, &template).expect("empty cell previews");
    assert_eq!(ghost.ledger_lines.len(), 1);
    assert!(approx(ghost.ledger_lines[0].offset_percent, -7.5));
    match ghost.glyph {
        Glyph::Note(n) => assert_eq!(n.flag_count, 1, "previews are never beamed"),
        Glyph::Rest(_) => panic!("expected a note preview"),
    }
    // Nothing was committed.
    assert_eq!(staff.elements.len(), 1);
}

// ─── Document layout ────────────────────────────────────────────────

#[test]
fn document_layout_header_footer_and_time_signature() {
    let settings = DocumentSettings::default();
    let dims = PageDimensions::A4;
    let mut doc = Document::new(&settings, &dims);
    doc.title = "Etude".into();
    doc.composer = "Anon".into();
    doc.add_page(&settings, &dims);

    let layout = layout_document(&doc, &settings, &dims).unwrap();
    assert_eq!(layout.pages.len(), 2);

    let first = &layout.pages[0];
    assert_eq!(first.header.as_ref().map(|h| h.title.as_str()), Some("Etude"));
    assert_eq!(first.footer, "Page 1 / 2");
    assert_eq!(first.staves.len(), 4);
    assert!(first.staves[0].furniture.time_signature.is_some());
    assert!(first.staves[1].furniture.time_signature.is_none());

    let second = &layout.pages[1];
    assert!(second.header.is_none());
    assert_eq!(second.footer, "Page 2 / 2");
    assert!(second.staves.iter().all(|s| s.furniture.time_signature.is_none()));
    assert!(approx(second.staves[0].grid.clef_area_percent, 8.0));
}
