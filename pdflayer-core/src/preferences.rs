use std::collections::HashMap;
use std::rc::Rc;

use anyhow::Result;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::config::PreferenceConfig;
use crate::error::{ViewerError, ViewerResult};

/// Persistent string key-value storage.
pub trait PreferenceBackend {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&self, key: &str, value: &str) -> Result<()>;
}

/// Presentation hooks for the theme: a class on the page body and the glyph on
/// the toggle button.
pub trait ThemeTarget {
    fn set_class(&self, class: &str, enabled: bool) -> Result<()>;
    fn toggle_class(&self, class: &str) -> Result<()>;
    fn has_class(&self, class: &str) -> bool;
    fn set_toggle_glyph(&self, glyph: &str) -> Result<()>;
}

#[derive(Default)]
pub struct MemoryPreferenceBackend {
    inner: Mutex<HashMap<String, String>>,
}

impl MemoryPreferenceBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceBackend for MemoryPreferenceBackend {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.inner.lock().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        self.inner.lock().insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// The dark-mode preference: one boolean mirrored into a body class.
pub struct ThemePreferences {
    backend: Rc<dyn PreferenceBackend>,
    config: PreferenceConfig,
}

impl ThemePreferences {
    pub fn new(backend: Rc<dyn PreferenceBackend>, config: PreferenceConfig) -> Self {
        Self { backend, config }
    }

    /// Reads the stored flag. Missing, unreadable or malformed values count as
    /// light mode.
    pub fn load(&self) -> bool {
        match self.backend.load(&self.config.storage_key) {
            Ok(Some(raw)) => match raw.trim().parse::<bool>() {
                Ok(value) => value,
                Err(_) => {
                    warn!(key = %self.config.storage_key, value = %raw, "ignoring malformed theme preference");
                    false
                }
            },
            Ok(None) => false,
            Err(err) => {
                warn!(?err, key = %self.config.storage_key, "failed to read theme preference");
                false
            }
        }
    }

    pub fn apply_startup(&self, target: &dyn ThemeTarget) -> ViewerResult<bool> {
        let dark = self.load();
        if dark {
            target
                .set_class(&self.config.dark_class, true)
                .map_err(ViewerError::Surface)?;
        }
        target
            .set_toggle_glyph(self.glyph(dark))
            .map_err(ViewerError::Surface)?;
        debug!(dark, "theme applied");
        Ok(dark)
    }

    /// Flips the body class and persists whatever the class now says.
    pub fn toggle(&self, target: &dyn ThemeTarget) -> ViewerResult<bool> {
        target
            .toggle_class(&self.config.dark_class)
            .map_err(ViewerError::Surface)?;
        let dark = target.has_class(&self.config.dark_class);
        target
            .set_toggle_glyph(self.glyph(dark))
            .map_err(ViewerError::Surface)?;
        self.backend
            .save(&self.config.storage_key, if dark { "true" } else { "false" })
            .map_err(ViewerError::Preferences)?;
        debug!(dark, "theme toggled");
        Ok(dark)
    }

    pub fn glyph(&self, dark: bool) -> &str {
        if dark {
            &self.config.dark_glyph
        } else {
            &self.config.light_glyph
        }
    }
}
