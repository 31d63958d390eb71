//! Export sequencing.
//!
//! The engine does not rasterize or write files. It lays out each page
//! completely and hands it to a [`PageSink`] strictly in page order, one
//! page at a time; the sink owns drawing and file assembly.

use serde::Serialize;

use crate::document::Document;
use crate::error::Result;
use crate::layout::{layout_page, PageLayout};
use crate::settings::{DocumentSettings, PageDimensions};

/// Physical size of every page in the exported file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhysicalPage {
    pub width_mm: f64,
    pub height_mm: f64,
    pub page_count: usize,
}

/// Receiver of laid-out pages, e.g. a PDF writer.
pub trait PageSink {
    fn begin(&mut self, page: PhysicalPage) -> Result<()>;
    fn page(&mut self, layout: &PageLayout) -> Result<()>;
    fn finish(&mut self) -> Result<()>;
}

/// Lay out and emit every page in order. A sink error stops the export at
/// that page and is returned; `finish` is not called in that case.
pub fn export_document<S: PageSink + ?Sized>(
    document: &Document,
    settings: &DocumentSettings,
    dims: &PageDimensions,
    sink: &mut S,
) -> Result<usize> {
    let page_count = document.pages.len();
    sink.begin(PhysicalPage {
        width_mm: dims.width_mm,
        height_mm: dims.height_mm,
        page_count,
    })?;

    for index in 0..page_count {
        let layout = layout_page(document, index, settings, dims)?;
        if let Err(e) = sink.page(&layout) {
            log::warn!("export aborted at page {}: {e}", index + 1);
            return Err(e);
        }
    }

    sink.finish()?;
    Ok(page_count)
}

/// File name for an exported document.
pub fn export_file_name(title: &str) -> String {
    let title = title.trim();
    if title.is_empty() {
        "score.pdf".to_string()
    } else {
        format!("{title}.pdf")
    }
}
