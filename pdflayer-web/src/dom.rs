//! web-sys implementations of the display collaborators.

use anyhow::{anyhow, Context, Result};
use pdflayer_core::{ControlPanel, ControlState, Notifier, ThemeTarget};
use pdflayer_dom::{Element as Node, ElementSink};
use tracing::warn;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement};

use crate::pdfjs::js_error;

pub fn window() -> Result<web_sys::Window> {
    web_sys::window().ok_or_else(|| anyhow!("no global window"))
}

pub fn document() -> Result<Document> {
    window()?
        .document()
        .ok_or_else(|| anyhow!("window has no document"))
}

pub fn element_by_id(document: &Document, id: &str) -> Result<Element> {
    document
        .get_element_by_id(id)
        .with_context(|| format!("missing element #{id}"))
}

pub fn typed_by_id<T: JsCast>(document: &Document, id: &str) -> Result<T> {
    element_by_id(document, id)?
        .dyn_into::<T>()
        .map_err(|_| anyhow!("element #{id} has an unexpected type"))
}

/// Creates the browser element described by `node`, children included.
pub fn materialize(document: &Document, node: &Node) -> Result<Element> {
    let element = document.create_element(node.tag()).map_err(js_error)?;
    if let Some(id) = node.id() {
        element.set_id(id);
    }
    if !node.classes().is_empty() {
        element.set_class_name(&node.class_name());
    }
    if !node.styles().is_empty() {
        element
            .set_attribute("style", &node.style_text())
            .map_err(js_error)?;
    }
    for (name, value) in node.attributes() {
        element.set_attribute(name, value).map_err(js_error)?;
    }
    if let Some(text) = node.text() {
        element.set_text_content(Some(text));
    }
    for child in node.children() {
        let child = materialize(document, child)?;
        element.append_child(&child).map_err(js_error)?;
    }
    Ok(element)
}

/// A live container element.
pub struct DomSink {
    document: Document,
    container: Element,
}

impl DomSink {
    pub fn new(document: Document, container: Element) -> Self {
        Self {
            document,
            container,
        }
    }
}

impl ElementSink for DomSink {
    fn clear(&self) -> Result<()> {
        self.container.set_inner_html("");
        Ok(())
    }

    fn append(&self, element: &Node) -> Result<()> {
        let element = materialize(&self.document, element)?;
        self.container.append_child(&element).map_err(js_error)?;
        Ok(())
    }
}

pub struct DomControls {
    page_info: Element,
    prev: HtmlButtonElement,
    next: HtmlButtonElement,
}

impl DomControls {
    pub fn new(page_info: Element, prev: HtmlButtonElement, next: HtmlButtonElement) -> Self {
        Self {
            page_info,
            prev,
            next,
        }
    }
}

impl ControlPanel for DomControls {
    fn apply(&self, state: &ControlState) -> Result<()> {
        self.page_info.set_text_content(Some(&state.page_info));
        self.prev.set_disabled(state.prev_disabled);
        self.next.set_disabled(state.next_disabled);
        Ok(())
    }
}

/// Dark mode lives as a class on `<body>`; the toggle button shows the glyph.
pub struct BodyTheme {
    body: HtmlElement,
    toggle: Element,
}

impl BodyTheme {
    pub fn new(body: HtmlElement, toggle: Element) -> Self {
        Self { body, toggle }
    }
}

impl ThemeTarget for BodyTheme {
    fn set_class(&self, class: &str, enabled: bool) -> Result<()> {
        self.body
            .class_list()
            .toggle_with_force(class, enabled)
            .map_err(js_error)?;
        Ok(())
    }

    fn toggle_class(&self, class: &str) -> Result<()> {
        self.body.class_list().toggle(class).map_err(js_error)?;
        Ok(())
    }

    fn has_class(&self, class: &str) -> bool {
        self.body.class_list().contains(class)
    }

    fn set_toggle_glyph(&self, glyph: &str) -> Result<()> {
        self.toggle.set_text_content(Some(glyph));
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct AlertNotifier;

impl Notifier for AlertNotifier {
    fn alert(&self, message: &str) {
        let shown = window().and_then(|window| {
            window
                .alert_with_message(message)
                .map_err(js_error)
        });
        if let Err(err) = shown {
            warn!(?err, alert = message, "could not show alert");
        }
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use wasm_bindgen_test::*;

    use super::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn materialize_builds_nested_elements() {
        let document = document().unwrap();
        let node = Node::new("div")
            .with_class("pdf-page")
            .with_style("width", "100px")
            .with_child(Node::new("span").with_class("text-run").with_text("a < b"));

        let element = materialize(&document, &node).unwrap();
        assert_eq!(element.class_name(), "pdf-page");
        assert_eq!(element.get_attribute("style").as_deref(), Some("width: 100px"));
        assert_eq!(element.child_element_count(), 1);
        assert_eq!(element.text_content().as_deref(), Some("a < b"));
    }

    #[wasm_bindgen_test]
    fn sink_clears_container() {
        let document = document().unwrap();
        let container = document.create_element("div").unwrap();
        let sink = DomSink::new(document, container.clone());

        sink.append(&Node::new("p").with_text("one")).unwrap();
        sink.append(&Node::new("p").with_text("two")).unwrap();
        assert_eq!(container.child_element_count(), 2);

        sink.clear().unwrap();
        assert_eq!(container.child_element_count(), 0);
    }

    #[wasm_bindgen_test]
    fn controls_reflect_state() {
        let document = document().unwrap();
        let info = document.create_element("span").unwrap();
        let prev: HtmlButtonElement = document.create_element("button").unwrap().dyn_into().unwrap();
        let next: HtmlButtonElement = document.create_element("button").unwrap().dyn_into().unwrap();
        let controls = DomControls::new(info.clone(), prev.clone(), next.clone());

        controls
            .apply(&ControlState {
                page_info: "Page 1 of 2".into(),
                prev_disabled: true,
                next_disabled: false,
            })
            .unwrap();
        assert_eq!(info.text_content().as_deref(), Some("Page 1 of 2"));
        assert!(prev.disabled());
        assert!(!next.disabled());
    }
}
