//! Staff lines, barlines and the clef/time-signature area.

use serde::Serialize;

use crate::model::TimeSignature;
use crate::settings::DocumentSettings;
use super::beat_map::BeatGrid;
use super::constants::*;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaffFurniture {
    /// Staff line positions, percent of staff height, top to bottom
    pub staff_lines: Vec<f64>,
    /// Barline x positions, opening barline first
    pub barlines: Vec<f64>,
    pub line_thickness_px: f64,
    pub clef_area_percent: f64,
    /// Present only on the staff that prints the time signature
    pub time_signature: Option<TimeSignature>,
}

pub(super) fn staff_furniture(
    grid: &BeatGrid,
    settings: &DocumentSettings,
    time_signature: Option<TimeSignature>,
) -> StaffFurniture {
    StaffFurniture {
        staff_lines: (0..STAFF_LINE_COUNT)
            .map(|i| TOP_LINE_PERCENT + i as f64 * LINE_SPACING_PERCENT)
            .collect(),
        barlines: grid.barlines(),
        line_thickness_px: settings.line_thickness,
        clef_area_percent: grid.clef_area_percent,
        time_signature,
    }
}
