//! pdf.js behind the core document traits.

use std::rc::Rc;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use js_sys::Uint8Array;
use pdflayer_core::{
    document_id_for_bytes, DocumentBackend, DocumentInfo, DocumentProvider, PageBackend,
    TextContent, TextContentOptions, Viewport,
};
use tracing::{debug, trace};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[wasm_bindgen(module = "/js/pdfjs-bridge.js")]
extern "C" {
    #[wasm_bindgen(catch, js_name = openDocument)]
    async fn open_document(data: Uint8Array) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_name = documentPageCount)]
    fn document_page_count(document: &JsValue) -> u32;

    #[wasm_bindgen(catch, js_name = getPage)]
    async fn get_page(document: &JsValue, page_number: u32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_name = getViewport)]
    fn get_viewport(page: &JsValue, scale: f64) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_name = getTextContent)]
    async fn get_text_content(page: &JsValue, options: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_name = destroyDocument)]
    async fn destroy_document(document: &JsValue) -> Result<JsValue, JsValue>;
}

/// Turns a thrown JS value into an error carrying its message.
pub(crate) fn js_error(value: JsValue) -> anyhow::Error {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return anyhow!(String::from(error.message()));
    }
    match value.as_string() {
        Some(message) => anyhow!(message),
        None => anyhow!("{value:?}"),
    }
}

fn decode<T: serde::de::DeserializeOwned>(value: JsValue, what: &str) -> Result<T> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|err| anyhow!(err.to_string()))
        .with_context(|| format!("malformed {what} from pdf.js"))
}

#[derive(Debug, Default)]
pub struct PdfJsProvider;

impl PdfJsProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait(?Send)]
impl DocumentProvider for PdfJsProvider {
    async fn open(&self, bytes: Vec<u8>) -> Result<Rc<dyn DocumentBackend>> {
        let id = document_id_for_bytes(&bytes);
        let byte_len = bytes.len();
        // pdf.js takes ownership of the buffer it is given.
        let data = Uint8Array::from(bytes.as_slice());
        let handle = open_document(data).await.map_err(js_error)?;
        let page_count = document_page_count(&handle) as usize;
        debug!(document = %id, page_count, byte_len, "pdf.js opened document");
        Ok(Rc::new(PdfJsDocument {
            handle,
            info: DocumentInfo { id, page_count },
        }))
    }
}

pub struct PdfJsDocument {
    handle: JsValue,
    info: DocumentInfo,
}

#[async_trait(?Send)]
impl DocumentBackend for PdfJsDocument {
    fn info(&self) -> &DocumentInfo {
        &self.info
    }

    async fn page(&self, page_number: usize) -> Result<Box<dyn PageBackend>> {
        let number = u32::try_from(page_number)
            .with_context(|| format!("page number {page_number} out of range"))?;
        let handle = get_page(&self.handle, number).await.map_err(js_error)?;
        Ok(Box::new(PdfJsPage { handle }))
    }

    async fn close(&self) -> Result<()> {
        trace!(document = %self.info.id, "destroying pdf.js document");
        destroy_document(&self.handle).await.map_err(js_error)?;
        Ok(())
    }
}

pub struct PdfJsPage {
    handle: JsValue,
}

#[async_trait(?Send)]
impl PageBackend for PdfJsPage {
    fn viewport(&self, scale: f64) -> Result<Viewport> {
        let value = get_viewport(&self.handle, scale).map_err(js_error)?;
        decode(value, "viewport")
    }

    async fn text_content(&self, options: TextContentOptions) -> Result<TextContent> {
        let options = serde_wasm_bindgen::to_value(&options)
            .map_err(|err| anyhow!(err.to_string()))?;
        let value = get_text_content(&self.handle, options)
            .await
            .map_err(js_error)?;
        decode(value, "text content")
    }
}
