//! In-memory collaborators for exercising the viewer without a browser.

use std::collections::HashMap;
use std::rc::Rc;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::controls::ControlState;
use crate::layout::PageLayer;
use crate::preferences::ThemeTarget;
use crate::text::{FontStyle, TextContent, TextContentOptions, TextRun};
use crate::transform::{Transform, Viewport};
use crate::{
    document_id_for_bytes, ControlPanel, DocumentBackend, DocumentInfo, DocumentProvider,
    Notifier, PageBackend, RenderSurface,
};

type Hold = Rc<Mutex<Option<(usize, Rc<Notify>)>>>;

pub struct FakeDocument {
    info: DocumentInfo,
    failing_pages: Mutex<Vec<usize>>,
    last_options: Rc<Mutex<Option<TextContentOptions>>>,
    hold: Hold,
    closed: Mutex<bool>,
}

impl FakeDocument {
    pub fn with_pages(page_count: usize) -> Self {
        Self::new(b"%PDF-1.7 fake", page_count, Rc::new(Mutex::new(None)))
    }

    fn new(bytes: &[u8], page_count: usize, hold: Hold) -> Self {
        Self {
            info: DocumentInfo {
                id: document_id_for_bytes(bytes),
                page_count,
            },
            failing_pages: Mutex::new(Vec::new()),
            last_options: Rc::new(Mutex::new(None)),
            hold,
            closed: Mutex::new(false),
        }
    }

    pub fn fail_page(&self, page: usize) {
        self.failing_pages.lock().push(page);
    }

    pub fn last_options(&self) -> Option<TextContentOptions> {
        *self.last_options.lock()
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.lock()
    }
}

#[async_trait(?Send)]
impl DocumentBackend for FakeDocument {
    fn info(&self) -> &DocumentInfo {
        &self.info
    }

    async fn page(&self, page_number: usize) -> Result<Box<dyn PageBackend>> {
        if *self.closed.lock() {
            bail!("document already closed");
        }
        if page_number == 0 || page_number > self.info.page_count {
            bail!("page {page_number} out of range");
        }

        let gate = {
            let mut hold = self.hold.lock();
            let held = matches!(hold.as_ref(), Some((held, _)) if *held == page_number);
            if held {
                hold.take().map(|(_, gate)| gate)
            } else {
                None
            }
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if self.failing_pages.lock().contains(&page_number) {
            return Err(anyhow!("corrupt content stream on page {page_number}"));
        }

        Ok(Box::new(FakePage {
            number: page_number,
            last_options: Rc::clone(&self.last_options),
        }))
    }

    async fn close(&self) -> Result<()> {
        *self.closed.lock() = true;
        Ok(())
    }
}

struct FakePage {
    number: usize,
    last_options: Rc<Mutex<Option<TextContentOptions>>>,
}

#[async_trait(?Send)]
impl PageBackend for FakePage {
    fn viewport(&self, scale: f64) -> Result<Viewport> {
        Ok(Viewport::for_page(612.0, 792.0, scale))
    }

    async fn text_content(&self, options: TextContentOptions) -> Result<TextContent> {
        *self.last_options.lock() = Some(options);
        let mut styles = HashMap::new();
        styles.insert(
            "f1".to_string(),
            FontStyle {
                font_family: Some("serif".into()),
                ascent: None,
                descent: None,
                vertical: false,
            },
        );
        Ok(TextContent {
            items: vec![TextRun::new(
                format!("Page {} \u{2013} draft", self.number),
                Transform::new(12.0, 0.0, 0.0, 12.0, 72.0, 700.0),
            )
            .with_font("f1")],
            styles,
        })
    }
}

/// Accepts anything starting with `%PDF`, like a permissive PDF library.
pub struct FakeProvider {
    page_count: usize,
    hold: Hold,
    opened: Mutex<Vec<Rc<FakeDocument>>>,
}

impl FakeProvider {
    pub fn new(page_count: usize) -> Self {
        Self {
            page_count,
            hold: Rc::new(Mutex::new(None)),
            opened: Mutex::new(Vec::new()),
        }
    }

    /// Makes the next fetch of `page` wait until `gate` is notified.
    pub fn hold_page(&self, page: usize, gate: Rc<Notify>) {
        *self.hold.lock() = Some((page, gate));
    }

    pub fn documents(&self) -> Vec<Rc<FakeDocument>> {
        self.opened.lock().clone()
    }
}

#[async_trait(?Send)]
impl DocumentProvider for FakeProvider {
    async fn open(&self, bytes: Vec<u8>) -> Result<Rc<dyn DocumentBackend>> {
        if !bytes.starts_with(b"%PDF") {
            bail!("Invalid PDF structure");
        }
        let document = Rc::new(FakeDocument::new(
            &bytes,
            self.page_count,
            Rc::clone(&self.hold),
        ));
        self.opened.lock().push(Rc::clone(&document));
        Ok(document)
    }
}

#[derive(Default)]
pub struct RecordingSurface {
    layers: Mutex<Vec<PageLayer>>,
    clears: Mutex<usize>,
}

impl RecordingSurface {
    pub fn last_layer(&self) -> Option<PageLayer> {
        self.layers.lock().last().cloned()
    }

    pub fn clears(&self) -> usize {
        *self.clears.lock()
    }
}

impl RenderSurface for RecordingSurface {
    fn clear(&self) -> Result<()> {
        *self.clears.lock() += 1;
        Ok(())
    }

    fn mount(&self, layer: &PageLayer) -> Result<()> {
        self.layers.lock().push(layer.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingControls {
    states: Mutex<Vec<ControlState>>,
}

impl RecordingControls {
    pub fn last(&self) -> Option<ControlState> {
        self.states.lock().last().cloned()
    }
}

impl ControlPanel for RecordingControls {
    fn apply(&self, state: &ControlState) -> Result<()> {
        self.states.lock().push(state.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.messages.lock().push(message.to_owned());
    }
}

#[derive(Default)]
pub struct FakeTheme {
    classes: Mutex<Vec<String>>,
    glyph: Mutex<String>,
}

impl FakeTheme {
    pub fn glyph(&self) -> String {
        self.glyph.lock().clone()
    }
}

impl ThemeTarget for FakeTheme {
    fn set_class(&self, class: &str, enabled: bool) -> Result<()> {
        let mut classes = self.classes.lock();
        classes.retain(|c| c != class);
        if enabled {
            classes.push(class.to_owned());
        }
        Ok(())
    }

    fn toggle_class(&self, class: &str) -> Result<()> {
        let enabled = !self.has_class(class);
        self.set_class(class, enabled)
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.lock().iter().any(|c| c == class)
    }

    fn set_toggle_glyph(&self, glyph: &str) -> Result<()> {
        *self.glyph.lock() = glyph.to_owned();
        Ok(())
    }
}
