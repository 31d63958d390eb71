//! Data model for a grid-placed score.
//!
//! A document is a sequence of pages, each a sequence of staves, each holding
//! an unordered set of elements keyed by `(beat_index, slot_index)`. Staves
//! and pages are shared through `Arc` so edits copy only the staff and page
//! that actually change.

use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};

use crate::positions;

/// Fixed number of measures drawn on every staff.
pub const MEASURES_PER_STAFF: u32 = 2;

/// Default notehead fill.
pub const DEFAULT_NOTE_COLOR: &str = "#212121";

/// Palette offered by the note tool: (name, hex value).
pub const NOTE_COLORS: [(&str, &str); 9] = [
    ("Black", "#212121"),
    ("Red", "#e53935"),
    ("Green", "#43a047"),
    ("Blue", "#1e88e5"),
    ("Yellow", "#fdd835"),
    ("Purple", "#8e24aa"),
    ("Pink", "#ec407a"),
    ("Orange", "#ff9800"),
    ("Turquoise", "#00bcd4"),
];

// ═══════════════════════════════════════════════════════════════════════
// Identifiers
// ═══════════════════════════════════════════════════════════════════════

/// Stable identity of a placed element. Unique within a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(pub u64);

/// Monotonic id source. Never reuses a value, independent of clock resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_raw(&mut self) -> u64 {
        let id = self.next.max(1);
        self.next = id + 1;
        id
    }

    /// Ensure future ids stay above `max_seen`.
    pub fn bump_past(&mut self, max_seen: u64) {
        if self.next <= max_seen {
            self.next = max_seen + 1;
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Element kinds
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    Whole,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
}

impl NoteKind {
    /// Duration in quarter-note beats.
    pub fn beats(self) -> f64 {
        match self {
            NoteKind::Whole => 4.0,
            NoteKind::Half => 2.0,
            NoteKind::Quarter => 1.0,
            NoteKind::Eighth => 0.5,
            NoteKind::Sixteenth => 0.25,
        }
    }

    /// Number of beam lines (or flags) this kind carries.
    pub fn beam_count(self) -> u8 {
        match self {
            NoteKind::Eighth => 1,
            NoteKind::Sixteenth => 2,
            _ => 0,
        }
    }

    pub fn is_beamable(self) -> bool {
        self.beam_count() > 0
    }

    pub fn is_hollow(self) -> bool {
        matches!(self, NoteKind::Whole | NoteKind::Half)
    }

    pub fn has_stem(self) -> bool {
        self != NoteKind::Whole
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestKind {
    Whole,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
}

impl RestKind {
    pub fn beats(self) -> f64 {
        match self {
            RestKind::Whole => 4.0,
            RestKind::Half => 2.0,
            RestKind::Quarter => 1.0,
            RestKind::Eighth => 0.5,
            RestKind::Sixteenth => 0.25,
        }
    }

    /// Unicode musical symbol for the rest glyph.
    pub fn symbol(self) -> &'static str {
        match self {
            RestKind::Whole => "\u{1D13B}",
            RestKind::Half => "\u{1D13C}",
            RestKind::Quarter => "\u{1D13D}",
            RestKind::Eighth => "\u{1D13E}",
            RestKind::Sixteenth => "\u{1D13F}",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accidental {
    #[default]
    None,
    Sharp,
    Flat,
    Natural,
}

impl Accidental {
    /// Glyph drawn left of the notehead, `None` when there is nothing to draw.
    pub fn symbol(self) -> Option<&'static str> {
        match self {
            Accidental::None => None,
            Accidental::Sharp => Some("#"),
            Accidental::Flat => Some("b"),
            Accidental::Natural => Some("\u{266E}"),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Elements
// ═══════════════════════════════════════════════════════════════════════

/// A note placed on the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: ElementId,
    pub beat_index: u32,
    /// Vertical slot, 0 = middle staff line, negative = higher on the staff
    pub slot_index: i32,
    /// Pitch name resolved from the position table at placement time
    #[serde(default)]
    pub name: String,
    /// Ledger line slots required by this position
    #[serde(default)]
    pub ledger_lines: Vec<i32>,
    pub kind: NoteKind,
    #[serde(default = "default_note_color")]
    pub color: String,
    #[serde(default)]
    pub accidental: Accidental,
}

/// A rest placed on the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rest {
    pub id: ElementId,
    pub beat_index: u32,
    pub slot_index: i32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ledger_lines: Vec<i32>,
    pub kind: RestKind,
}

fn default_note_color() -> String {
    DEFAULT_NOTE_COLOR.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Note(Note),
    Rest(Rest),
}

impl Element {
    pub fn id(&self) -> ElementId {
        match self {
            Element::Note(n) => n.id,
            Element::Rest(r) => r.id,
        }
    }

    pub fn beat_index(&self) -> u32 {
        match self {
            Element::Note(n) => n.beat_index,
            Element::Rest(r) => r.beat_index,
        }
    }

    pub fn slot_index(&self) -> i32 {
        match self {
            Element::Note(n) => n.slot_index,
            Element::Rest(r) => r.slot_index,
        }
    }

    pub fn ledger_lines(&self) -> &[i32] {
        match self {
            Element::Note(n) => &n.ledger_lines,
            Element::Rest(r) => &r.ledger_lines,
        }
    }

    pub fn as_note(&self) -> Option<&Note> {
        match self {
            Element::Note(n) => Some(n),
            Element::Rest(_) => None,
        }
    }

    /// Re-derive the pitch name and ledger lines from the slot, replacing
    /// whatever the element carried.
    pub fn resolve_position(&mut self) {
        let (name, ledger_lines) = positions::lookup_or_fallback(self.slot_index());
        let (slot_name, slot_ledgers) = match self {
            Element::Note(n) => (&mut n.name, &mut n.ledger_lines),
            Element::Rest(r) => (&mut r.name, &mut r.ledger_lines),
        };
        *slot_name = name.to_string();
        *slot_ledgers = ledger_lines;
    }

    /// Whether this element sits in the grid cell `(beat, slot)`.
    pub fn occupies(&self, beat_index: u32, slot_index: i32) -> bool {
        self.beat_index() == beat_index && self.slot_index() == slot_index
    }
}

/// The currently selected placement tool. Becomes an [`Element`] once
/// the grid assigns it an id and a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementTemplate {
    Note {
        kind: NoteKind,
        #[serde(default = "default_note_color")]
        color: String,
        #[serde(default)]
        accidental: Accidental,
    },
    Rest {
        kind: RestKind,
    },
}

impl ElementTemplate {
    pub fn note(kind: NoteKind) -> Self {
        ElementTemplate::Note {
            kind,
            color: default_note_color(),
            accidental: Accidental::None,
        }
    }

    pub fn rest(kind: RestKind) -> Self {
        ElementTemplate::Rest { kind }
    }

    /// Materialize the template at a grid cell.
    pub fn instantiate(
        &self,
        id: ElementId,
        beat_index: u32,
        slot_index: i32,
        name: String,
        ledger_lines: Vec<i32>,
    ) -> Element {
        match self {
            ElementTemplate::Note { kind, color, accidental } => Element::Note(Note {
                id,
                beat_index,
                slot_index,
                name,
                ledger_lines,
                kind: *kind,
                color: color.clone(),
                accidental: *accidental,
            }),
            ElementTemplate::Rest { kind } => Element::Rest(Rest {
                id,
                beat_index,
                slot_index,
                name,
                ledger_lines,
                kind: *kind,
            }),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Staff / page / time signature
// ═══════════════════════════════════════════════════════════════════════

/// One five-line staff. Element order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Staff {
    /// 1-based position on its page
    pub id: u32,
    #[serde(default, deserialize_with = "lenient_elements")]
    pub elements: Vec<Element>,
}

impl Staff {
    pub fn new(id: u32) -> Self {
        Self { id, elements: Vec::new() }
    }

    pub fn element_at(&self, beat_index: u32, slot_index: i32) -> Option<&Element> {
        self.elements.iter().find(|e| e.occupies(beat_index, slot_index))
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id() == id)
    }
}

/// Decode elements one at a time so a single unknown kind drops only that
/// element instead of the whole document.
fn lenient_elements<'de, D>(deserializer: D) -> Result<Vec<Element>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<serde_json::Value> = Vec::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<Element>(value) {
            Ok(element) => Some(element),
            Err(e) => {
                log::warn!("dropping malformed element: {e}");
                None
            }
        })
        .collect())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub staffs: Vec<Arc<Staff>>,
}

impl Page {
    /// A page of `staff_count` empty staves numbered from 1.
    pub fn new(id: PageId, staff_count: usize) -> Self {
        Self {
            id,
            staffs: (1..=staff_count as u32).map(|i| Arc::new(Staff::new(i))).collect(),
        }
    }

    pub fn element_count(&self) -> usize {
        self.staffs.iter().map(|s| s.elements.len()).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSignature {
    /// Numerator (beat columns per measure)
    pub beats_per_measure: u32,
    /// Denominator (display only)
    pub beat_unit: u32,
}

impl TimeSignature {
    /// Time signatures offered by the editor.
    pub const PRESETS: [TimeSignature; 4] = [
        TimeSignature { beats_per_measure: 4, beat_unit: 4 },
        TimeSignature { beats_per_measure: 3, beat_unit: 4 },
        TimeSignature { beats_per_measure: 2, beat_unit: 4 },
        TimeSignature { beats_per_measure: 6, beat_unit: 8 },
    ];

    pub fn new(beats_per_measure: u32, beat_unit: u32) -> Self {
        Self { beats_per_measure, beat_unit }
    }

    /// Beats per measure, never zero.
    pub fn beats(&self) -> u32 {
        self.beats_per_measure.max(1)
    }

    /// Beat columns on one staff.
    pub fn total_beats(&self) -> u32 {
        MEASURES_PER_STAFF * self.beats()
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::new(4, 4)
    }
}
