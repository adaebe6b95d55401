//! Retained element tree for the display surface.
//!
//! Pages and decorations are described as plain [`Element`] values first and
//! handed to an [`ElementSink`] afterwards, so layout can be inspected without
//! a browser.

use anyhow::Result;
use pdflayer_core::{PageLayer, ParticleField, PositionedSpan, RenderSurface};
use tracing::trace;

pub const PAGE_CLASS: &str = "pdf-page";
pub const TEXT_RUN_CLASS: &str = "text-run";
pub const PARTICLE_CLASS: &str = "particle";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    styles: Vec<(String, String)>,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
        self
    }

    /// Sets a CSS property, replacing an earlier value for the same name.
    pub fn with_style(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.styles.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = value,
            None => self.styles.push((name, value)),
        }
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn class_name(&self) -> String {
        self.classes.join(" ")
    }

    pub fn styles(&self) -> &[(String, String)] {
        &self.styles
    }

    pub fn style(&self, name: &str) -> Option<&str> {
        self.styles
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Inline `style` attribute value.
    pub fn style_text(&self) -> String {
        self.styles
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Concatenated text of this element and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(text) = &self.text {
            out.push_str(text);
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }
}

/// CSS pixel length rounded to three decimals.
pub fn px(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    // avoid "-0px"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded}px")
}

pub fn span_element(span: &PositionedSpan) -> Element {
    let mut element = Element::new("span")
        .with_class(TEXT_RUN_CLASS)
        .with_style("position", "absolute")
        .with_style("left", px(span.left))
        .with_style("top", px(span.top))
        .with_style("font-size", px(span.font_size))
        .with_style("white-space", "pre");
    if let Some(family) = &span.font_family {
        element = element.with_style("font-family", family.as_str());
    }
    if span.angle != 0.0 {
        element = element
            .with_style("transform", format!("rotate({:.6}rad)", span.angle))
            .with_style("transform-origin", "0% 0%");
    }
    element.with_text(span.text.as_str())
}

/// Viewport-sized wrapper holding one positioned span per text run.
pub fn page_element(layer: &PageLayer) -> Element {
    Element::new("div")
        .with_class(PAGE_CLASS)
        .with_attribute("data-page-number", layer.page_number.to_string())
        .with_style("position", "relative")
        .with_style("width", px(layer.width))
        .with_style("height", px(layer.height))
        .with_children(layer.spans.iter().map(span_element))
}

pub fn particle_elements(field: &ParticleField) -> Vec<Element> {
    field
        .particles
        .iter()
        .map(|p| {
            Element::new("div")
                .with_class(PARTICLE_CLASS)
                .with_style("left", format!("{:.2}%", p.left_percent))
                .with_style("top", format!("{:.2}%", p.top_percent))
                .with_style("width", px(p.size_px))
                .with_style("height", px(p.size_px))
                .with_style("opacity", format!("{:.2}", p.opacity))
                .with_style("animation-duration", format!("{:.2}s", p.duration_secs))
                .with_style("animation-delay", format!("{:.2}s", p.delay_secs))
        })
        .collect()
}

/// A container that accepts materialised elements.
pub trait ElementSink {
    fn clear(&self) -> Result<()>;
    fn append(&self, element: &Element) -> Result<()>;
}

/// Render surface that turns page layers into elements for a sink.
pub struct ElementSurface<S> {
    sink: S,
}

impl<S: ElementSink> ElementSurface<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

impl<S: ElementSink> RenderSurface for ElementSurface<S> {
    fn clear(&self) -> Result<()> {
        self.sink.clear()
    }

    fn mount(&self, layer: &PageLayer) -> Result<()> {
        trace!(page = layer.page_number, spans = layer.spans.len(), "mounting page");
        self.sink.append(&page_element(layer))
    }
}
