use std::rc::Rc;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error, info, instrument, warn};

use crate::config::ViewerConfig;
use crate::controls::{reflect, ControlState};
use crate::error::{ViewerError, ViewerResult};
use crate::navigation::{NavigationController, NavigationRequest, NavigationSnapshot, RenderTicket};
use crate::preferences::{PreferenceBackend, ThemePreferences, ThemeTarget};
use crate::render::PageRenderer;
use crate::{
    Command, ControlPanel, DocumentBackend, DocumentInfo, DocumentProvider, Notifier,
    RenderSurface, ViewerEvent,
};

/// Platform collaborators a viewer is assembled from.
pub struct ViewerParts {
    pub provider: Rc<dyn DocumentProvider>,
    pub surface: Rc<dyn RenderSurface>,
    pub controls: Rc<dyn ControlPanel>,
    pub notifier: Rc<dyn Notifier>,
    pub theme: Rc<dyn ThemeTarget>,
    pub preferences: Rc<dyn PreferenceBackend>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    Rendered,
    Queued,
    Rejected,
}

/// One document session: the loaded document, navigation state and the
/// collaborators that display it.
pub struct Viewer {
    provider: Rc<dyn DocumentProvider>,
    surface: Rc<dyn RenderSurface>,
    controls: Rc<dyn ControlPanel>,
    notifier: Rc<dyn Notifier>,
    theme_target: Rc<dyn ThemeTarget>,
    theme: ThemePreferences,
    renderer: PageRenderer,
    navigation: NavigationController,
    document: Mutex<Option<Rc<dyn DocumentBackend>>>,
    events: Arc<Mutex<Vec<ViewerEvent>>>,
}

impl Viewer {
    pub fn new(config: &ViewerConfig, parts: ViewerParts) -> Self {
        Self {
            provider: parts.provider,
            surface: parts.surface,
            controls: parts.controls,
            notifier: parts.notifier,
            theme_target: parts.theme,
            theme: ThemePreferences::new(parts.preferences, config.preferences.clone()),
            renderer: PageRenderer::from_config(config),
            navigation: NavigationController::new(),
            document: Mutex::new(None),
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn events(&self) -> Arc<Mutex<Vec<ViewerEvent>>> {
        Arc::clone(&self.events)
    }

    pub fn navigation(&self) -> NavigationSnapshot {
        self.navigation.snapshot()
    }

    pub fn current_page(&self) -> usize {
        self.navigation.current_page()
    }

    pub fn page_count(&self) -> usize {
        self.navigation.total_pages()
    }

    pub fn document_info(&self) -> Option<DocumentInfo> {
        self.document.lock().as_ref().map(|doc| doc.info().clone())
    }

    pub fn control_state(&self) -> ControlState {
        reflect(&self.navigation.snapshot())
    }

    /// Applies the stored theme and paints the initial control state.
    pub fn startup(&self) -> ViewerResult<()> {
        self.theme.apply_startup(self.theme_target.as_ref())?;
        self.refresh_controls();
        Ok(())
    }

    pub fn refresh_controls(&self) {
        let state = self.control_state();
        if let Err(err) = self.controls.apply(&state) {
            warn!(?err, "failed to update navigation controls");
        }
    }

    pub fn toggle_dark_mode(&self) -> ViewerResult<bool> {
        self.theme.toggle(self.theme_target.as_ref())
    }

    pub async fn apply(&self, command: Command) -> ViewerResult<()> {
        match command {
            Command::NextPage => {
                self.next_page().await;
            }
            Command::PrevPage => {
                self.prev_page().await;
            }
            Command::FirstPage => {
                self.first_page().await;
            }
            Command::LastPage => {
                self.last_page().await;
            }
            Command::GotoPage { page } => {
                self.goto_page(page).await;
            }
            Command::ToggleDarkMode => {
                self.toggle_dark_mode()?;
            }
        }
        Ok(())
    }

    /// Opens `bytes` and shows its first page. `None` (no file picked) does
    /// nothing. A rejected file leaves the current document in place and
    /// raises one alert.
    #[instrument(skip(self, bytes), fields(bytes = bytes.as_ref().map(Vec::len)))]
    pub async fn load_document(&self, bytes: Option<Vec<u8>>) -> ViewerResult<()> {
        let Some(bytes) = bytes else {
            debug!("no file selected");
            return Ok(());
        };

        let document = match self.provider.open(bytes).await {
            Ok(document) => document,
            Err(err) => {
                error!(?err, "failed to open document");
                self.notifier.alert(&format!("Error loading PDF: {err}"));
                self.push_event(ViewerEvent::LoadFailed);
                return Err(ViewerError::DocumentOpen(err));
            }
        };

        let info = document.info().clone();
        let previous = self.document.lock().replace(document);
        if let Some(previous) = previous {
            let previous_id = previous.info().id;
            if let Err(err) = previous.close().await {
                warn!(?err, document = %previous_id, "failed to release previous document");
            }
            self.push_event(ViewerEvent::DocumentClosed(previous_id));
        }

        info!(document = %info.id, pages = info.page_count, "document opened");
        self.navigation.reset(info.page_count);
        self.push_event(ViewerEvent::DocumentOpened {
            id: info.id,
            page_count: info.page_count,
        });
        self.refresh_controls();

        self.goto_page(1).await;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn goto_page(&self, page: usize) -> NavigationOutcome {
        let request = self.navigation.request(page);
        self.dispatch(request).await
    }

    pub async fn next_page(&self) -> NavigationOutcome {
        let request = self.navigation.request_next();
        self.dispatch(request).await
    }

    pub async fn prev_page(&self) -> NavigationOutcome {
        let request = self.navigation.request_prev();
        self.dispatch(request).await
    }

    pub async fn first_page(&self) -> NavigationOutcome {
        self.goto_page(1).await
    }

    pub async fn last_page(&self) -> NavigationOutcome {
        let request = self.navigation.request_last();
        self.dispatch(request).await
    }

    async fn dispatch(&self, request: NavigationRequest<'_>) -> NavigationOutcome {
        match request {
            NavigationRequest::Rejected => {
                debug!("navigation target out of range");
                NavigationOutcome::Rejected
            }
            NavigationRequest::Queued { displaced } => {
                debug!(?displaced, "render in progress; target queued");
                self.refresh_controls();
                NavigationOutcome::Queued
            }
            NavigationRequest::Start(ticket) => {
                self.refresh_controls();
                self.drive_renders(ticket).await;
                NavigationOutcome::Rendered
            }
        }
    }

    /// Renders the ticket's page, then whatever was queued meanwhile, until
    /// nothing is pending. The ticket releases the in-progress flag on every
    /// exit path.
    async fn drive_renders(&self, mut ticket: RenderTicket<'_>) {
        let mut page = ticket.page();
        loop {
            let document = self.document.lock().clone();
            let Some(document) = document else {
                warn!(page, "no document to render");
                break;
            };

            match self
                .renderer
                .render(document.as_ref(), page, self.surface.as_ref())
                .await
            {
                Ok(summary) => {
                    info!(page, spans = summary.spans, "page rendered");
                    self.push_event(ViewerEvent::PageRendered {
                        page,
                        spans: summary.spans,
                    });
                }
                Err(err) => {
                    error!(?err, page, "page render failed");
                    self.push_event(ViewerEvent::RenderFailed { page });
                }
            }

            match ticket.advance() {
                Some(next) => {
                    debug!(next, "rendering queued page");
                    page = next;
                }
                None => break,
            }
        }
        drop(ticket);
        self.refresh_controls();
    }

    fn push_event(&self, event: ViewerEvent) {
        self.events.lock().push(event);
    }
}
