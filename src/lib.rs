//! staffgrid: notation layout engine for a grid-based staff editor.
//!
//! Notes and rests are placed on a beat × slot grid per staff. The engine
//! resolves beam groups, stem directions and lengths, ledger lines and
//! horizontal beat positions, and keeps the number of staves per page in
//! step with the document settings. Drawing and file export belong to the
//! host; it receives the layout as plain data (or JSON across FFI).
//!
//! # Example
//! ```no_run
//! use staffgrid::*;
//!
//! let settings = DocumentSettings::default();
//! let dims = PageDimensions::A4;
//! let mut doc = Document::new(&settings, &dims);
//! doc.place(0, 0, 0, 1, &ElementTemplate::note(NoteKind::Eighth)).unwrap();
//! doc.place(0, 0, 1, 2, &ElementTemplate::note(NoteKind::Eighth)).unwrap();
//!
//! let layout = layout_document(&doc, &settings, &dims).unwrap();
//! println!("Beams on first staff: {}", layout.pages[0].staves[0].beams.len());
//! ```

pub mod document;
pub mod error;
pub mod export;
pub mod grid;
pub mod layout;
pub mod model;
pub mod pagination;
pub mod positions;
pub mod settings;

#[cfg(target_os = "android")]
pub mod android;

pub use document::Document;
pub use error::{EngineError, Result};
pub use export::{export_document, export_file_name, PageSink, PhysicalPage};
pub use grid::{place_or_toggle, remove, resize_staff_count, Toggle};
pub use layout::{layout_document, layout_page, layout_staff, preview, StaffContext};
pub use model::*;
pub use pagination::{capacity, on_settings_changed, paginate, StaffCapacity};
pub use settings::{DocumentSettings, PageDimensions, Setting};

/// Parse a document from JSON and fit its pages to `settings`.
pub fn document_from_json(json: &str, settings: &DocumentSettings) -> Result<Document> {
    Document::from_json(json, settings, &PageDimensions::A4)
}

/// Convert a document to a JSON string.
pub fn document_to_json(document: &Document) -> Result<String> {
    document.to_json()
}

/// Parse settings JSON; missing fields take defaults.
pub fn settings_from_json(json: &str) -> Result<DocumentSettings> {
    DocumentSettings::from_json(json)
}

pub fn settings_to_json(settings: &DocumentSettings) -> Result<String> {
    settings.to_json()
}

/// Lay out a whole document given as JSON and return the layout as JSON.
/// Convenience function for hosts on the other side of an FFI boundary.
///
/// `settings_json` of `None` uses the default settings.
pub fn layout_document_json(document_json: &str, settings_json: Option<&str>) -> Result<String> {
    let settings = match settings_json {
        Some(json) => settings_from_json(json)?,
        None => DocumentSettings::default(),
    };
    let dims = PageDimensions::A4;
    let document = Document::from_json(document_json, &settings, &dims)?;
    let layout = layout_document(&document, &settings, &dims)?;
    Ok(serde_json::to_string(&layout)?)
}

// ═══════════════════════════════════════════════════════════════════════
// C FFI for iOS (static library) and Android (JNI)
// ═══════════════════════════════════════════════════════════════════════

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

/// Lay out a JSON document and return the layout as a JSON C string.
/// The caller must free the returned string with `staffgrid_free_string`.
/// Returns null on invalid input.
///
/// # Safety
/// `document_json` must be a valid null-terminated UTF-8 C string.
/// `settings_json` may be null (default settings).
#[no_mangle]
pub unsafe extern "C" fn staffgrid_layout_json(
    document_json: *const c_char,
    settings_json: *const c_char,
) -> *mut c_char {
    if document_json.is_null() {
        return std::ptr::null_mut();
    }
    let doc = match unsafe { CStr::from_ptr(document_json) }.to_str() {
        Ok(s) => s,
        Err(_) => return std::ptr::null_mut(),
    };
    let settings = if settings_json.is_null() {
        None
    } else {
        match unsafe { CStr::from_ptr(settings_json) }.to_str() {
            Ok(s) => Some(s),
            Err(_) => return std::ptr::null_mut(),
        }
    };

    match layout_document_json(doc, settings) {
        Ok(json) => CString::new(json).unwrap_or_default().into_raw(),
        Err(e) => {
            log::warn!("staffgrid_layout_json: {e}");
            std::ptr::null_mut()
        }
    }
}

/// Free a string previously returned by staffgrid functions.
///
/// # Safety
/// `ptr` must be a string previously returned by a staffgrid function, or null.
#[no_mangle]
pub unsafe extern "C" fn staffgrid_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe {
            let _ = CString::from_raw(ptr);
        }
    }
}
