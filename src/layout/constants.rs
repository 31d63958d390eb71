//! Shared constants for staff layout (percentages of the staff band unless
//! noted otherwise).

// ── Vertical ────────────────────────────────────────────────────────
pub(super) const MIDDLE_LINE_PERCENT: f64 = 50.0;
/// Distance between adjacent slots. Five lines over the middle 60% of the
/// band give 15% per line spacing, 7.5% per slot.
pub(super) const SLOT_SPACING_PERCENT: f64 = 7.5;
pub(super) const TOP_LINE_PERCENT: f64 = 20.0;
pub(super) const LINE_SPACING_PERCENT: f64 = 15.0;
pub(super) const STAFF_LINE_COUNT: usize = 5;

// ── Horizontal ──────────────────────────────────────────────────────
pub(super) const CLEF_AREA_WITH_TIME_PERCENT: f64 = 12.0;
pub(super) const CLEF_AREA_PERCENT: f64 = 8.0;

// ── Beams & stems ───────────────────────────────────────────────────
/// Gap between stacked beam lines.
pub(super) const BEAM_LINE_SPACING_PERCENT: f64 = 4.0;
/// Beam bar thickness (px).
pub(super) const BEAM_THICKNESS_PX: f64 = 3.0;
/// Shortest stem in a beam group, as a fraction of the default stem length.
pub(super) const MIN_STEM_RATIO: f64 = 0.5;
/// Length of a secondary-beam stub on an isolated fast note, as a fraction
/// of the beat cell width.
pub(super) const BEAM_STUB_CELL_RATIO: f64 = 0.5;
