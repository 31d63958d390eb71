//! JNI bindings for Android.
//!
//! These functions are called from Kotlin via the JNI bridge.

use jni::objects::{JClass, JString};
use jni::sys::jstring;
use jni::JNIEnv;

use crate::layout_document_json;

/// Lay out a JSON document and return the layout JSON.
///
/// Called from Kotlin as:
///   external fun layoutDocument(documentJson: String, settingsJson: String?): String?
#[no_mangle]
pub extern "system" fn Java_com_staffgrid_app_StaffGrid_layoutDocument(
    mut env: JNIEnv,
    _class: JClass,
    document_json: JString,
    settings_json: JString,
) -> jstring {
    let doc: String = match env.get_string(&document_json) {
        Ok(s) => s.into(),
        Err(_) => return std::ptr::null_mut(),
    };

    let settings: Option<String> = if settings_json.is_null() {
        None
    } else {
        env.get_string(&settings_json).ok().map(|s| s.into())
    };

    match layout_document_json(&doc, settings.as_deref()) {
        Ok(json) => match env.new_string(&json) {
            Ok(js) => js.into_raw(),
            Err(_) => std::ptr::null_mut(),
        },
        Err(e) => {
            log::warn!("layoutDocument: {e}");
            std::ptr::null_mut()
        }
    }
}
