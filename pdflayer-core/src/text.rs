use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::transform::Transform;

pub const EN_DASH: char = '\u{2013}';
pub const EM_DASH: char = '\u{2014}';
pub const FIGURE_DASH: char = '\u{2012}';

/// One positioned span of extracted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    #[serde(rename = "str")]
    pub text: String,
    pub transform: Transform,
    #[serde(default)]
    pub font_name: Option<String>,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

impl TextRun {
    pub fn new(text: impl Into<String>, transform: Transform) -> Self {
        Self {
            text: text.into(),
            transform,
            font_name: None,
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn with_font(mut self, font_name: impl Into<String>) -> Self {
        self.font_name = Some(font_name.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontStyle {
    #[serde(default)]
    pub font_family: Option<String>,
    #[serde(default)]
    pub ascent: Option<f64>,
    #[serde(default)]
    pub descent: Option<f64>,
    #[serde(default)]
    pub vertical: bool,
}

/// Text layer of one page: runs in content-stream order plus their fonts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub items: Vec<TextRun>,
    #[serde(default)]
    pub styles: HashMap<String, FontStyle>,
}

impl TextContent {
    pub fn style_for(&self, run: &TextRun) -> Option<&FontStyle> {
        run.font_name
            .as_deref()
            .and_then(|name| self.styles.get(name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContentOptions {
    pub normalize_whitespace: bool,
    pub disable_combine_text_items: bool,
}

impl Default for TextContentOptions {
    fn default() -> Self {
        Self {
            normalize_whitespace: true,
            disable_combine_text_items: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubstitutionPreset {
    /// Dash variants become ASCII hyphens.
    #[default]
    Ascii,
    /// UTF-8 dash bytes reinterpreted as Windows-1252, as older builds of the
    /// viewer displayed them.
    LegacyCp1252,
    None,
}

/// Character replacement table applied to every run before display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionTable {
    entries: BTreeMap<char, String>,
}

impl SubstitutionTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn ascii_dashes() -> Self {
        Self::empty()
            .with(EN_DASH, "-")
            .with(EM_DASH, "--")
            .with(FIGURE_DASH, "-")
    }

    pub fn legacy_cp1252() -> Self {
        Self::empty()
            .with(EN_DASH, "\u{e2}\u{20ac}\u{201c}")
            .with(EM_DASH, "\u{e2}\u{20ac}\u{201d}")
            .with(FIGURE_DASH, "\u{e2}\u{20ac}\u{2019}")
    }

    pub fn from_preset(preset: SubstitutionPreset) -> Self {
        match preset {
            SubstitutionPreset::Ascii => Self::ascii_dashes(),
            SubstitutionPreset::LegacyCp1252 => Self::legacy_cp1252(),
            SubstitutionPreset::None => Self::empty(),
        }
    }

    pub fn with(mut self, from: char, to: impl Into<String>) -> Self {
        self.entries.insert(from, to.into());
        self
    }

    pub fn extend(&mut self, overrides: &BTreeMap<char, String>) {
        for (from, to) in overrides {
            self.entries.insert(*from, to.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn apply(&self, text: &str) -> String {
        if self.entries.is_empty() || !text.chars().any(|c| self.entries.contains_key(&c)) {
            return text.to_owned();
        }
        let mut out = String::with_capacity(text.len() + 8);
        for c in text.chars() {
            match self.entries.get(&c) {
                Some(replacement) => out.push_str(replacement),
                None => out.push(c),
            }
        }
        out
    }

    /// Rewrites every run of `content` in place.
    pub fn apply_to(&self, content: &mut TextContent) {
        if self.entries.is_empty() {
            return;
        }
        for run in &mut content.items {
            run.text = self.apply(&run.text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn en_dash_is_replaced_and_other_characters_kept() {
        let table = SubstitutionTable::ascii_dashes();
        assert_eq!(table.apply("pages 3\u{2013}7, caf\u{e9}"), "pages 3-7, caf\u{e9}");
    }

    #[test]
    fn legacy_preset_reproduces_cp1252_sequences() {
        let table = SubstitutionTable::from_preset(SubstitutionPreset::LegacyCp1252);
        assert_eq!(table.apply("a\u{2013}b"), "a\u{e2}\u{20ac}\u{201c}b");
        assert_eq!(table.apply("\u{2014}"), "\u{e2}\u{20ac}\u{201d}");
    }

    #[test]
    fn empty_table_leaves_text_untouched() {
        let table = SubstitutionTable::from_preset(SubstitutionPreset::None);
        assert!(table.is_empty());
        assert_eq!(table.apply("a\u{2013}b"), "a\u{2013}b");
    }

    #[test]
    fn overrides_replace_preset_entries() {
        let mut table = SubstitutionTable::ascii_dashes();
        let mut overrides = BTreeMap::new();
        overrides.insert(EM_DASH, "\u{2015}".to_string());
        overrides.insert('\u{2212}', "-".to_string());
        table.extend(&overrides);

        assert_eq!(table.len(), 4);
        assert_eq!(table.apply("x\u{2014}y\u{2212}z"), "x\u{2015}y-z");
    }

    #[test]
    fn apply_to_rewrites_each_run() {
        let mut content = TextContent {
            items: vec![
                TextRun::new("1\u{2013}2", Transform::IDENTITY),
                TextRun::new("plain", Transform::IDENTITY),
            ],
            styles: HashMap::new(),
        };
        SubstitutionTable::ascii_dashes().apply_to(&mut content);
        assert_eq!(content.items[0].text, "1-2");
        assert_eq!(content.items[1].text, "plain");
    }

    #[test]
    fn text_content_decodes_library_payload() {
        let payload = r#"{
            "items": [
                { "str": "Hello", "transform": [12, 0, 0, 12, 72, 700], "fontName": "g_d0_f1", "width": 30.5, "height": 12 }
            ],
            "styles": {
                "g_d0_f1": { "fontFamily": "serif", "ascent": 0.9, "descent": -0.2, "vertical": false }
            }
        }"#;
        let content: TextContent = serde_json::from_str(payload).unwrap();
        let run = &content.items[0];
        assert_eq!(run.text, "Hello");
        assert_eq!(run.transform.translation(), (72.0, 700.0));
        let style = content.style_for(run).unwrap();
        assert_eq!(style.font_family.as_deref(), Some("serif"));
        assert_eq!(style.ascent, Some(0.9));
    }
}
