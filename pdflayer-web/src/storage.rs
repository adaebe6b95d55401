use anyhow::{anyhow, Result};
use pdflayer_core::PreferenceBackend;
use web_sys::Storage;

use crate::dom::window;
use crate::pdfjs::js_error;

/// Preferences persisted in the origin's `localStorage`.
pub struct LocalStoragePreferences {
    storage: Storage,
}

impl LocalStoragePreferences {
    pub fn open() -> Result<Self> {
        let storage = window()?
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| anyhow!("localStorage is unavailable"))?;
        Ok(Self { storage })
    }
}

impl PreferenceBackend for LocalStoragePreferences {
    fn load(&self, key: &str) -> Result<Option<String>> {
        self.storage.get_item(key).map_err(js_error)
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        self.storage.set_item(key, value).map_err(js_error)
    }
}
