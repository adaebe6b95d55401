use anyhow::Context;
use tracing::{debug, instrument};

use crate::config::ViewerConfig;
use crate::error::{ViewerError, ViewerResult};
use crate::layout::{layout_page, PageLayer};
use crate::text::{SubstitutionTable, TextContentOptions};
use crate::{DocumentBackend, RenderSurface};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSummary {
    pub page_number: usize,
    pub spans: usize,
}

/// Turns one page of a document into a positioned text layer on a surface.
#[derive(Debug, Clone)]
pub struct PageRenderer {
    scale: f64,
    options: TextContentOptions,
    substitutions: SubstitutionTable,
}

impl PageRenderer {
    pub fn new(scale: f64, options: TextContentOptions, substitutions: SubstitutionTable) -> Self {
        Self {
            scale,
            options,
            substitutions,
        }
    }

    pub fn from_config(config: &ViewerConfig) -> Self {
        Self::new(
            config.render.scale,
            config.text.content_options(),
            config.text.substitution_table(),
        )
    }

    /// Renders `page_number` (1-based) onto `surface`.
    ///
    /// The surface is only cleared once the new layer is complete, so a failed
    /// fetch leaves the previous page on screen.
    #[instrument(skip(self, document, surface), fields(document = %document.info().id))]
    pub async fn render(
        &self,
        document: &dyn DocumentBackend,
        page_number: usize,
        surface: &dyn RenderSurface,
    ) -> ViewerResult<RenderSummary> {
        let layer = self
            .build_layer(document, page_number)
            .await
            .map_err(|source| ViewerError::PageRender {
                page: page_number,
                source,
            })?;

        surface.clear().map_err(ViewerError::Surface)?;
        surface.mount(&layer).map_err(ViewerError::Surface)?;

        Ok(RenderSummary {
            page_number,
            spans: layer.spans.len(),
        })
    }

    async fn build_layer(
        &self,
        document: &dyn DocumentBackend,
        page_number: usize,
    ) -> anyhow::Result<PageLayer> {
        let page = document
            .page(page_number)
            .await
            .with_context(|| format!("failed to fetch page {page_number}"))?;
        let viewport = page
            .viewport(self.scale)
            .with_context(|| format!("failed to compute viewport for page {page_number}"))?;
        let mut content = page
            .text_content(self.options)
            .await
            .with_context(|| format!("failed to extract text for page {page_number}"))?;

        debug!(runs = content.items.len(), "text content received");
        self.substitutions.apply_to(&mut content);
        Ok(layout_page(page_number, &viewport, &content))
    }
}
