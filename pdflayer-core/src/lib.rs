use std::rc::Rc;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

pub mod config;
pub mod controls;
pub mod decor;
pub mod error;
pub mod input;
pub mod layout;
pub mod navigation;
pub mod preferences;
pub mod render;
pub mod text;
pub mod transform;
mod viewer;

#[cfg(test)]
mod testing;

pub use config::ViewerConfig;
pub use controls::{reflect, ControlState, NO_DOCUMENT_LABEL};
pub use decor::{Particle, ParticleField};
pub use error::{ViewerError, ViewerResult};
pub use input::key_command;
pub use layout::{layout_page, PageLayer, PositionedSpan};
pub use navigation::{CoalescingSlot, NavigationController, NavigationSnapshot};
pub use preferences::{MemoryPreferenceBackend, PreferenceBackend, ThemePreferences, ThemeTarget};
pub use render::{PageRenderer, RenderSummary};
pub use text::{
    FontStyle, SubstitutionPreset, SubstitutionTable, TextContent, TextContentOptions, TextRun,
};
pub use transform::{Transform, Viewport};
pub use viewer::{NavigationOutcome, Viewer, ViewerParts};

pub type DocumentId = Uuid;

const DOCUMENT_NAMESPACE: Uuid = Uuid::from_u128(0x6c1e_0a52_93d4_5f0b_a8e7_2b1d_94c3_7e60);

/// Content-derived id: the same file always maps to the same id.
pub fn document_id_for_bytes(bytes: &[u8]) -> DocumentId {
    Uuid::new_v5(&DOCUMENT_NAMESPACE, bytes)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInfo {
    pub id: DocumentId,
    pub page_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,
    GotoPage { page: usize },
    ToggleDarkMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerEvent {
    DocumentOpened { id: DocumentId, page_count: usize },
    DocumentClosed(DocumentId),
    LoadFailed,
    PageRendered { page: usize, spans: usize },
    RenderFailed { page: usize },
}

/// A page handle from the PDF library. Fetched per render, never cached.
#[async_trait(?Send)]
pub trait PageBackend {
    fn viewport(&self, scale: f64) -> Result<Viewport>;
    async fn text_content(&self, options: TextContentOptions) -> Result<TextContent>;
}

/// An opened document held by the PDF library.
#[async_trait(?Send)]
pub trait DocumentBackend {
    fn info(&self) -> &DocumentInfo;
    async fn page(&self, page_number: usize) -> Result<Box<dyn PageBackend>>;
    /// Releases the library's decoder resources for this document.
    async fn close(&self) -> Result<()>;
}

#[async_trait(?Send)]
pub trait DocumentProvider {
    async fn open(&self, bytes: Vec<u8>) -> Result<Rc<dyn DocumentBackend>>;
}

/// The display container that receives rendered pages.
pub trait RenderSurface {
    fn clear(&self) -> Result<()>;
    fn mount(&self, layer: &PageLayer) -> Result<()>;
}

/// Page label and navigation buttons.
pub trait ControlPanel {
    fn apply(&self, state: &ControlState) -> Result<()>;
}

/// Blocking user-facing notification.
pub trait Notifier {
    fn alert(&self, message: &str);
}
