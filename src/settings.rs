//! Document settings and page geometry.
//!
//! Settings are an immutable record passed into every pagination and
//! geometry call. Partial JSON from a settings store fills gaps with the
//! defaults; out-of-range values are clamped.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Numeric knobs of the document. Lengths in millimetres unless the field
/// says pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentSettings {
    /// Notehead width (mm)
    pub note_width: f64,
    /// Notehead height (mm)
    pub note_height: f64,
    /// Default stem length (mm)
    pub stem_length: f64,
    /// Stem thickness (px)
    pub stem_width: f64,
    /// Height of one staff band (mm)
    pub staff_height: f64,
    /// Gap below each staff (mm)
    pub staff_spacing: f64,
    /// Staff line and barline thickness (px)
    pub line_thickness: f64,
    /// Notehead outline thickness (px)
    pub note_border_width: f64,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            note_width: 12.0,
            note_height: 7.0,
            stem_length: 20.0,
            stem_width: 2.0,
            staff_height: 48.0,
            staff_spacing: 8.0,
            line_thickness: 2.0,
            note_border_width: 3.0,
        }
    }
}

/// Individually adjustable settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Setting {
    NoteWidth,
    NoteHeight,
    StemLength,
    StemWidth,
    StaffHeight,
    StaffSpacing,
    LineThickness,
    NoteBorderWidth,
}

impl Setting {
    pub const ALL: [Setting; 8] = [
        Setting::NoteWidth,
        Setting::NoteHeight,
        Setting::StemLength,
        Setting::StemWidth,
        Setting::StaffHeight,
        Setting::StaffSpacing,
        Setting::LineThickness,
        Setting::NoteBorderWidth,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Setting::NoteWidth => "note_width",
            Setting::NoteHeight => "note_height",
            Setting::StemLength => "stem_length",
            Setting::StemWidth => "stem_width",
            Setting::StaffHeight => "staff_height",
            Setting::StaffSpacing => "staff_spacing",
            Setting::LineThickness => "line_thickness",
            Setting::NoteBorderWidth => "note_border_width",
        }
    }
}

/// Largest notehead that fits between two staff lines, keeping 5% air.
/// Lines span the middle 60% of the staff band.
pub fn max_note_height(staff_height: f64) -> f64 {
    (staff_height * 0.60 / 4.0 * 0.95).floor()
}

impl DocumentSettings {
    pub fn get(&self, setting: Setting) -> f64 {
        match setting {
            Setting::NoteWidth => self.note_width,
            Setting::NoteHeight => self.note_height,
            Setting::StemLength => self.stem_length,
            Setting::StemWidth => self.stem_width,
            Setting::StaffHeight => self.staff_height,
            Setting::StaffSpacing => self.staff_spacing,
            Setting::LineThickness => self.line_thickness,
            Setting::NoteBorderWidth => self.note_border_width,
        }
    }

    fn slot_mut(&mut self, setting: Setting) -> &mut f64 {
        match setting {
            Setting::NoteWidth => &mut self.note_width,
            Setting::NoteHeight => &mut self.note_height,
            Setting::StemLength => &mut self.stem_length,
            Setting::StemWidth => &mut self.stem_width,
            Setting::StaffHeight => &mut self.staff_height,
            Setting::StaffSpacing => &mut self.staff_spacing,
            Setting::LineThickness => &mut self.line_thickness,
            Setting::NoteBorderWidth => &mut self.note_border_width,
        }
    }

    /// Inclusive accepted range. The note height ceiling follows the
    /// current staff height.
    pub fn range(&self, setting: Setting) -> (f64, f64) {
        match setting {
            Setting::NoteWidth => (8.0, 30.0),
            Setting::NoteHeight => (4.0, (max_note_height(self.staff_height) + 5.0).max(15.0)),
            Setting::StemLength => (10.0, 40.0),
            Setting::StemWidth => (1.0, 6.0),
            Setting::StaffHeight => (30.0, 80.0),
            Setting::StaffSpacing => (2.0, 20.0),
            Setting::LineThickness => (1.0, 5.0),
            Setting::NoteBorderWidth => (1.0, 8.0),
        }
    }

    pub fn max_note_height(&self) -> f64 {
        max_note_height(self.staff_height)
    }

    /// Return a copy with one setting changed (clamped to its range).
    /// Changing the staff height pulls an oversized note height down to the
    /// new maximum.
    pub fn with(&self, setting: Setting, value: f64) -> Self {
        let mut next = *self;
        let clamped = next.clamp_value(setting, value);
        *next.slot_mut(setting) = clamped;

        if setting == Setting::StaffHeight {
            let ceiling = next.max_note_height();
            if next.note_height > ceiling {
                next.note_height = ceiling;
            }
        }
        next
    }

    fn clamp_value(&self, setting: Setting, value: f64) -> f64 {
        let (lo, hi) = self.range(setting);
        if !value.is_finite() {
            let fallback = DocumentSettings::default().get(setting);
            log::warn!("{} is not a finite number; using default {fallback}", setting.name());
            return fallback;
        }
        if value < lo || value > hi {
            let clamped = value.clamp(lo, hi);
            log::warn!("{} = {value} outside {lo}..={hi}; clamped to {clamped}", setting.name());
            return clamped;
        }
        value
    }

    /// Clamp every field into range. Staff height is settled first since the
    /// note height range depends on it.
    pub fn sanitized(&self) -> Self {
        let mut next = *self;
        next.staff_height = next.clamp_value(Setting::StaffHeight, next.staff_height);
        for setting in Setting::ALL {
            if setting == Setting::StaffHeight {
                continue;
            }
            let clamped = next.clamp_value(setting, next.get(setting));
            *next.slot_mut(setting) = clamped;
        }
        next
    }

    /// Parse settings from a settings store. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let parsed: DocumentSettings = serde_json::from_str(json)?;
        Ok(parsed.sanitized())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Stem length as a percentage of the staff band height.
    pub fn stem_length_percent(&self) -> f64 {
        self.stem_length / self.staff_height * 100.0
    }

    /// Notehead width as a percentage of the physical page width.
    pub fn note_width_percent(&self, page: &PageDimensions) -> f64 {
        self.note_width / page.width_mm * 100.0
    }

    /// Vertical footprint of one staff including the gap below it.
    pub fn per_staff_height(&self) -> f64 {
        self.staff_height + self.staff_spacing
    }
}

/// Physical page geometry in millimetres (A4 portrait by default).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageDimensions {
    pub width_mm: f64,
    pub height_mm: f64,
    /// Top plus bottom padding
    pub padding_mm: f64,
    /// Title/composer banner, reserved on the first page only
    pub header_height_mm: f64,
    /// Page number strip
    pub footer_height_mm: f64,
}

impl PageDimensions {
    pub const A4: PageDimensions = PageDimensions {
        width_mm: 210.0,
        height_mm: 297.0,
        padding_mm: 16.0,
        header_height_mm: 20.0,
        footer_height_mm: 8.0,
    };
}

impl Default for PageDimensions {
    fn default() -> Self {
        Self::A4
    }
}
