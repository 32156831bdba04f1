//! Object URLによるプレビューハンドル

use track_scout_common::PreviewHandle;
use wasm_bindgen::JsValue;
use web_sys::{File, Url};

pub struct ObjectUrlPreview {
    url: String,
}

impl ObjectUrlPreview {
    /// URL.createObjectURL(file)
    pub fn create(file: &File) -> Result<Self, JsValue> {
        let url = Url::create_object_url_with_blob(file)?;
        Ok(Self { url })
    }
}

impl PreviewHandle for ObjectUrlPreview {
    fn uri(&self) -> String {
        self.url.clone()
    }

    /// URL.revokeObjectURL(url)
    fn release(self) {
        if let Err(e) = Url::revoke_object_url(&self.url) {
            web_sys::console::warn_2(&JsValue::from_str("revokeObjectURL failed"), &e);
        }
    }
}
