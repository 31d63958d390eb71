//! Horizontal positions: beat index → percentage offset within a staff.

use serde::Serialize;

use crate::model::{TimeSignature, MEASURES_PER_STAFF};
use super::constants::*;

/// The beat grid of one staff: clef area on the left, then
/// `MEASURES_PER_STAFF` equal measures of `beats_per_measure` cells.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BeatGrid {
    pub clef_area_percent: f64,
    pub notes_area_percent: f64,
    pub measures_per_staff: u32,
    pub beats_per_measure: u32,
}

impl BeatGrid {
    /// Grid for a staff. Only the staff that shows the time signature
    /// reserves the wider clef area.
    pub fn new(time_signature: &TimeSignature, shows_time_signature: bool) -> Self {
        let clef_area_percent = if shows_time_signature {
            CLEF_AREA_WITH_TIME_PERCENT
        } else {
            CLEF_AREA_PERCENT
        };
        Self {
            clef_area_percent,
            notes_area_percent: 100.0 - clef_area_percent,
            measures_per_staff: MEASURES_PER_STAFF,
            beats_per_measure: time_signature.beats(),
        }
    }

    pub fn total_beats(&self) -> u32 {
        self.measures_per_staff * self.beats_per_measure
    }

    pub fn measure_width_percent(&self) -> f64 {
        self.notes_area_percent / self.measures_per_staff as f64
    }

    pub fn cell_width_percent(&self) -> f64 {
        self.notes_area_percent / self.total_beats() as f64
    }

    /// Left edge of a beat cell.
    pub fn x_percent(&self, beat_index: u32) -> f64 {
        let measure_index = beat_index / self.beats_per_measure;
        let beat_in_measure = beat_index % self.beats_per_measure;
        let measure_w = self.measure_width_percent();
        self.clef_area_percent
            + measure_index as f64 * measure_w
            + beat_in_measure as f64 * (measure_w / self.beats_per_measure as f64)
    }

    pub fn cell_center_percent(&self, beat_index: u32) -> f64 {
        self.x_percent(beat_index) + self.cell_width_percent() / 2.0
    }

    /// Horizontal offset of a stem from its notehead centre: up-stems on
    /// the right, down-stems on the left.
    pub fn stem_offset_percent(stem_down: bool, note_width_percent: f64) -> f64 {
        if stem_down {
            -note_width_percent / 2.0
        } else {
            note_width_percent / 2.0
        }
    }

    /// Start and end x of a beam joining the stems of two beats.
    pub fn beam_span(
        &self,
        first_beat: u32,
        last_beat: u32,
        stem_down: bool,
        note_width_percent: f64,
    ) -> (f64, f64) {
        let offset = Self::stem_offset_percent(stem_down, note_width_percent);
        (
            self.cell_center_percent(first_beat) + offset,
            self.cell_center_percent(last_beat) + offset,
        )
    }

    /// Opening barline followed by one closing barline per measure.
    pub fn barlines(&self) -> Vec<f64> {
        let measure_w = self.measure_width_percent();
        (0..=self.measures_per_staff)
            .map(|i| self.clef_area_percent + i as f64 * measure_w)
            .collect()
    }

    pub fn contains(&self, beat_index: u32) -> bool {
        beat_index < self.total_beats()
    }
}
