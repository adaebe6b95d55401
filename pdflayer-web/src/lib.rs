//! Browser front end: pdf.js for parsing, the DOM for display.

use anyhow::{Context, Result};
use pdflayer_core::ViewerConfig;
use tracing::{info, warn};
use wasm_bindgen::prelude::*;

mod app;
mod dom;
mod logging;
mod pdfjs;
mod storage;

pub use logging::{init_logging, ConsoleMakeWriter};

/// Inline JSON configuration, e.g. `<script type="application/json" id="pdflayer-config">`.
pub const CONFIG_ELEMENT_ID: &str = "pdflayer-config";

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let loaded = page_config();
    let config = loaded.as_ref().ok().cloned().flatten().unwrap_or_default();
    if let Err(err) = init_logging(&config.logging) {
        web_sys::console::warn_1(&JsValue::from_str(&format!("logging disabled: {err}")));
    }
    match &loaded {
        Ok(Some(_)) => info!("using page configuration"),
        Ok(None) => info!("using default configuration"),
        Err(err) => warn!(?err, "ignoring invalid page configuration"),
    }

    app::mount(&config).map_err(|err| JsValue::from_str(&format!("{err:#}")))?;
    Ok(())
}

fn page_config() -> Result<Option<ViewerConfig>> {
    let document = dom::document()?;
    let raw = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|element| element.text_content());
    parse_config(raw.as_deref())
}

fn parse_config(raw: Option<&str>) -> Result<Option<ViewerConfig>> {
    match raw.map(str::trim) {
        Some(raw) if !raw.is_empty() => ViewerConfig::from_json_str(raw)
            .map(Some)
            .context("parsing inline viewer config"),
        _ => Ok(None),
    }
}
