//! The editable document: metadata plus pages, and the id sources that
//! keep element and page identities unique.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::grid::{self, Toggle};
use crate::model::*;
use crate::pagination::{self, StaffCapacity};
use crate::settings::{DocumentSettings, PageDimensions};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub composer: String,
    #[serde(default)]
    pub time_signature: TimeSignature,
    pub pages: Vec<Arc<Page>>,
    #[serde(default)]
    element_ids: IdGenerator,
    #[serde(default)]
    page_ids: IdGenerator,
}

impl Document {
    /// A single empty page sized for the first-page role.
    pub fn new(settings: &DocumentSettings, dims: &PageDimensions) -> Self {
        let mut page_ids = IdGenerator::new();
        let cap = StaffCapacity::compute(settings, dims);
        let first = Page::new(PageId(page_ids.next_raw()), cap.first_page);
        Self {
            title: "Untitled".to_string(),
            composer: String::new(),
            time_signature: TimeSignature::default(),
            pages: vec![Arc::new(first)],
            element_ids: IdGenerator::new(),
            page_ids,
        }
    }

    /// Load a document from JSON. Malformed elements are dropped with a
    /// warning, as are elements whose id or grid cell is already taken by an
    /// earlier element. Pitch names and ledger lines are re-derived from each
    /// slot. An empty page list gets one page, and the id generators are
    /// moved past every id already present.
    pub fn from_json(json: &str, settings: &DocumentSettings, dims: &PageDimensions) -> Result<Self> {
        let mut doc: Document = serde_json::from_str(json)?;
        if doc.pages.is_empty() {
            let id = PageId(doc.page_ids.next_raw());
            doc.pages.push(Arc::new(Page::new(id, 0)));
        }
        doc.normalize_elements();
        doc.resync_ids();
        doc.pages = pagination::paginate(&doc.pages, settings, dims);
        Ok(doc)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// First element wins per id (document-wide) and per cell (per staff).
    fn normalize_elements(&mut self) {
        let mut ids = HashSet::new();
        for page in self.pages.iter_mut() {
            let mut staffs = Vec::with_capacity(page.staffs.len());
            for staff in &page.staffs {
                let mut cells = HashSet::new();
                let mut elements = Vec::with_capacity(staff.elements.len());
                for element in &staff.elements {
                    let cell = (element.beat_index(), element.slot_index());
                    if ids.contains(&element.id()) || cells.contains(&cell) {
                        log::warn!(
                            "page {} staff {}: dropping element {} at beat {}, slot {} (duplicate id or occupied cell)",
                            page.id.0,
                            staff.id,
                            element.id().0,
                            cell.0,
                            cell.1
                        );
                        continue;
                    }
                    ids.insert(element.id());
                    cells.insert(cell);

                    let mut element = element.clone();
                    element.resolve_position();
                    elements.push(element);
                }
                staffs.push(Arc::new(Staff { id: staff.id, elements }));
            }
            *page = Arc::new(Page { id: page.id, staffs });
        }
    }

    fn resync_ids(&mut self) {
        let max_page = self.pages.iter().map(|p| p.id.0).max().unwrap_or(0);
        let max_element = self
            .pages
            .iter()
            .flat_map(|p| p.staffs.iter())
            .flat_map(|s| s.elements.iter())
            .map(|e| e.id().0)
            .max()
            .unwrap_or(0);
        self.page_ids.bump_past(max_page);
        self.element_ids.bump_past(max_element);
    }

    pub fn page(&self, index: usize) -> Result<&Arc<Page>> {
        self.pages.get(index).ok_or(EngineError::PageOutOfRange {
            index,
            count: self.pages.len(),
        })
    }

    pub fn staff(&self, page_index: usize, staff_index: usize) -> Result<&Arc<Staff>> {
        let page = self.page(page_index)?;
        page.staffs.get(staff_index).ok_or(EngineError::StaffOutOfRange {
            index: staff_index,
            count: page.staffs.len(),
        })
    }

    /// Append an empty page sized for the later-page role. Returns its index.
    pub fn add_page(&mut self, settings: &DocumentSettings, dims: &PageDimensions) -> usize {
        let index = self.pages.len();
        let target = StaffCapacity::compute(settings, dims).for_page(index);
        let id = PageId(self.page_ids.next_raw());
        self.pages.push(Arc::new(Page::new(id, target)));
        index
    }

    /// Remove a page. The last remaining page is never removed. A page that
    /// moves into index 0 is resized for the first-page role.
    pub fn delete_page(
        &mut self,
        index: usize,
        settings: &DocumentSettings,
        dims: &PageDimensions,
    ) -> bool {
        if self.pages.len() <= 1 || index >= self.pages.len() {
            return false;
        }
        self.pages.remove(index);
        self.repaginate(settings, dims);
        true
    }

    /// Replace a page with a fresh empty one for the same role.
    pub fn clear_page(
        &mut self,
        index: usize,
        settings: &DocumentSettings,
        dims: &PageDimensions,
    ) -> Result<()> {
        self.page(index)?;
        let target = StaffCapacity::compute(settings, dims).for_page(index);
        let id = PageId(self.page_ids.next_raw());
        self.pages[index] = Arc::new(Page::new(id, target));
        Ok(())
    }

    /// Apply a click at `(beat, slot)` on one staff with the given tool.
    pub fn place(
        &mut self,
        page_index: usize,
        staff_index: usize,
        beat_index: u32,
        slot_index: i32,
        template: &ElementTemplate,
    ) -> Result<Toggle> {
        let total_beats = self.time_signature.total_beats();
        if beat_index >= total_beats {
            return Err(EngineError::BeatOutOfRange { beat: beat_index, total_beats });
        }
        let staff = Arc::clone(self.staff(page_index, staff_index)?);
        let (next, toggle) =
            grid::place_or_toggle(&staff, beat_index, slot_index, template, &mut self.element_ids);
        self.replace_staff(page_index, staff_index, next);
        Ok(toggle)
    }

    /// Delete an element by id. Unknown ids are a no-op.
    pub fn delete_element(
        &mut self,
        page_index: usize,
        staff_index: usize,
        id: ElementId,
    ) -> Result<()> {
        let staff = Arc::clone(self.staff(page_index, staff_index)?);
        if staff.element(id).is_none() {
            return Ok(());
        }
        self.replace_staff(page_index, staff_index, grid::remove(&staff, id));
        Ok(())
    }

    fn replace_staff(&mut self, page_index: usize, staff_index: usize, staff: Staff) {
        let page = grid::with_staff(&self.pages[page_index], staff_index, staff);
        self.pages[page_index] = Arc::new(page);
    }

    /// Resize pages after a settings change.
    pub fn apply_settings(
        &mut self,
        old: &DocumentSettings,
        new: &DocumentSettings,
        dims: &PageDimensions,
    ) {
        self.pages = pagination::on_settings_changed(old, new, &self.pages, dims);
    }

    /// Re-run pagination against the current settings.
    pub fn repaginate(&mut self, settings: &DocumentSettings, dims: &PageDimensions) {
        self.pages = pagination::paginate(&self.pages, settings, dims);
    }

    /// Change the time signature. Elements beyond the new grid are kept but
    /// not laid out until the grid grows again.
    pub fn set_time_signature(&mut self, time_signature: TimeSignature) {
        self.time_signature = time_signature;
    }
}
