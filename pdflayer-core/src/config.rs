use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ViewerError, ViewerResult};
use crate::text::{SubstitutionPreset, SubstitutionTable, TextContentOptions};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub render: RenderConfig,
    pub text: TextConfig,
    pub preferences: PreferenceConfig,
    pub elements: ElementIds,
    pub decor: DecorConfig,
    pub logging: LoggingConfig,
}

impl ViewerConfig {
    pub fn from_toml_str(source: &str) -> ViewerResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|err| ViewerError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(source: &str) -> ViewerResult<Self> {
        let config: Self =
            serde_json::from_str(source).map_err(|err| ViewerError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ViewerResult<()> {
        if !self.render.scale.is_finite() || self.render.scale <= 0.0 {
            return Err(ViewerError::Config(format!(
                "render.scale must be a positive number, got {}",
                self.render.scale
            )));
        }
        if self.preferences.storage_key.trim().is_empty() {
            return Err(ViewerError::Config(
                "preferences.storage_key must not be empty".into(),
            ));
        }
        if self.preferences.dark_class.trim().is_empty() {
            return Err(ViewerError::Config(
                "preferences.dark_class must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub scale: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { scale: 1.5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    pub normalize_whitespace: bool,
    pub disable_combine_text_items: bool,
    pub substitutions: SubstitutionPreset,
    pub overrides: BTreeMap<char, String>,
}

impl Default for TextConfig {
    fn default() -> Self {
        let options = TextContentOptions::default();
        Self {
            normalize_whitespace: options.normalize_whitespace,
            disable_combine_text_items: options.disable_combine_text_items,
            substitutions: SubstitutionPreset::default(),
            overrides: BTreeMap::new(),
        }
    }
}

impl TextConfig {
    pub fn content_options(&self) -> TextContentOptions {
        TextContentOptions {
            normalize_whitespace: self.normalize_whitespace,
            disable_combine_text_items: self.disable_combine_text_items,
        }
    }

    pub fn substitution_table(&self) -> SubstitutionTable {
        let mut table = SubstitutionTable::from_preset(self.substitutions);
        table.extend(&self.overrides);
        table
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferenceConfig {
    pub storage_key: String,
    pub dark_class: String,
    pub dark_glyph: String,
    pub light_glyph: String,
}

impl Default for PreferenceConfig {
    fn default() -> Self {
        Self {
            storage_key: "darkMode".into(),
            dark_class: "dark-mode".into(),
            dark_glyph: "\u{2600}\u{fe0f}".into(),
            light_glyph: "\u{1f319}".into(),
        }
    }
}

/// DOM ids of the pre-existing page elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementIds {
    pub file_input: String,
    pub container: String,
    pub prev_button: String,
    pub next_button: String,
    pub page_info: String,
    pub theme_toggle: String,
    pub particles: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            file_input: "file-input".into(),
            container: "pdf-container".into(),
            prev_button: "prev-page".into(),
            next_button: "next-page".into(),
            page_info: "page-info".into(),
            theme_toggle: "theme-toggle".into(),
            particles: "particles".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorConfig {
    pub particle_count: usize,
}

impl Default for DecorConfig {
    fn default() -> Self {
        Self { particle_count: 30 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".into(),
        }
    }
}
