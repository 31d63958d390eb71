//! Staff-per-page capacity and page resizing on settings changes.

use std::sync::Arc;

use serde::Serialize;

use crate::grid::resize_staff_count;
use crate::model::Page;
use crate::settings::{DocumentSettings, PageDimensions};

/// Number of staves that fit in the vertical space left after padding,
/// header and footer. Never less than one.
pub fn capacity(
    page_height_mm: f64,
    padding_mm: f64,
    header_height_mm: f64,
    footer_height_mm: f64,
    staff_height_mm: f64,
    staff_spacing_mm: f64,
) -> usize {
    let available = page_height_mm - padding_mm - header_height_mm - footer_height_mm;
    let per_staff = staff_height_mm + staff_spacing_mm;

    if !(per_staff > 0.0) || !available.is_finite() {
        return 1;
    }
    let fit = (available / per_staff).floor();
    if fit < 1.0 {
        1
    } else {
        fit as usize
    }
}

/// Capacities for the two page roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StaffCapacity {
    /// Page 0, which reserves the title/composer header
    pub first_page: usize,
    /// Every later page
    pub other_pages: usize,
}

impl StaffCapacity {
    pub fn compute(settings: &DocumentSettings, dims: &PageDimensions) -> Self {
        let for_header = |header: f64| {
            capacity(
                dims.height_mm,
                dims.padding_mm,
                header,
                dims.footer_height_mm,
                settings.staff_height,
                settings.staff_spacing,
            )
        };
        Self {
            first_page: for_header(dims.header_height_mm),
            other_pages: for_header(0.0),
        }
    }

    pub fn for_page(&self, page_index: usize) -> usize {
        if page_index == 0 {
            self.first_page
        } else {
            self.other_pages
        }
    }
}

/// Resize every page to the capacity of its role. Pages already at the
/// right size are shared, not copied.
pub fn paginate(
    pages: &[Arc<Page>],
    settings: &DocumentSettings,
    dims: &PageDimensions,
) -> Vec<Arc<Page>> {
    let cap = StaffCapacity::compute(settings, dims);
    log::debug!(
        "paginating {} pages: {} staves on the first page, {} on later pages",
        pages.len(),
        cap.first_page,
        cap.other_pages
    );

    pages
        .iter()
        .enumerate()
        .map(|(i, page)| {
            let target = cap.for_page(i);
            if page.staffs.len() == target {
                Arc::clone(page)
            } else {
                Arc::new(resize_staff_count(page, target))
            }
        })
        .collect()
}

/// Host hook for a settings change. Only staff height and spacing affect
/// page capacity; any other change returns the pages untouched.
pub fn on_settings_changed(
    old: &DocumentSettings,
    new: &DocumentSettings,
    pages: &[Arc<Page>],
    dims: &PageDimensions,
) -> Vec<Arc<Page>> {
    let layout_changed =
        old.staff_height != new.staff_height || old.staff_spacing != new.staff_spacing;
    if !layout_changed {
        return pages.to_vec();
    }
    paginate(pages, new, dims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_or_negative_footprint_clamps_to_one() {
        assert_eq!(capacity(297.0, 16.0, 20.0, 8.0, 0.0, 0.0), 1);
        assert_eq!(capacity(297.0, 16.0, 20.0, 8.0, -5.0, 1.0), 1);
        assert_eq!(capacity(10.0, 16.0, 20.0, 8.0, 48.0, 8.0), 1);
        assert_eq!(capacity(f64::NAN, 16.0, 20.0, 8.0, 48.0, 8.0), 1);
    }
}
