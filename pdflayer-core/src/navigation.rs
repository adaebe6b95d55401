use parking_lot::Mutex;
use tracing::warn;

/// Single-slot buffer where a write replaces whatever was waiting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoalescingSlot<T> {
    value: Option<T>,
}

impl<T> CoalescingSlot<T> {
    pub const fn new() -> Self {
        Self { value: None }
    }

    /// Stores `value`, returning the entry it displaced.
    pub fn put(&mut self, value: T) -> Option<T> {
        self.value.replace(value)
    }

    pub fn take(&mut self) -> Option<T> {
        self.value.take()
    }

    pub fn peek(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }
}

impl<T> Default for CoalescingSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationSnapshot {
    pub current_page: usize,
    pub total_pages: usize,
    pub has_document: bool,
    pub rendering: bool,
    pub pending: Option<usize>,
}

#[derive(Debug, Default)]
struct NavigationState {
    current_page: usize,
    total_pages: usize,
    has_document: bool,
    rendering: bool,
    pending: CoalescingSlot<usize>,
}

/// Outcome of a navigation request.
#[derive(Debug)]
pub enum NavigationRequest<'a> {
    /// The controller was idle; the caller now owns the render cycle.
    Start(RenderTicket<'a>),
    /// A render is in flight; the target replaced any earlier pending one.
    Queued { displaced: Option<usize> },
    Rejected,
}

/// Tracks the current page and serialises renders: one in flight, at most one
/// waiting.
#[derive(Debug, Default)]
pub struct NavigationController {
    state: Mutex<NavigationState>,
}

impl NavigationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> NavigationSnapshot {
        let state = self.state.lock();
        NavigationSnapshot {
            current_page: state.current_page,
            total_pages: state.total_pages,
            has_document: state.has_document,
            rendering: state.rendering,
            pending: state.pending.peek().copied(),
        }
    }

    pub fn current_page(&self) -> usize {
        self.state.lock().current_page
    }

    pub fn total_pages(&self) -> usize {
        self.state.lock().total_pages
    }

    pub fn is_rendering(&self) -> bool {
        self.state.lock().rendering
    }

    /// Points navigation at a freshly loaded document. An in-flight render
    /// keeps running; its queued successor is dropped.
    pub fn reset(&self, total_pages: usize) {
        let mut state = self.state.lock();
        state.total_pages = total_pages;
        state.current_page = if total_pages == 0 { 0 } else { 1 };
        state.has_document = true;
        state.pending.take();
    }

    pub fn request(&self, target: usize) -> NavigationRequest<'_> {
        let mut state = self.state.lock();
        if !state.has_document || target == 0 || target > state.total_pages {
            return NavigationRequest::Rejected;
        }

        state.current_page = target;
        if state.rendering {
            let displaced = state.pending.put(target);
            return NavigationRequest::Queued { displaced };
        }

        state.rendering = true;
        NavigationRequest::Start(RenderTicket {
            controller: self,
            page: target,
            released: false,
        })
    }

    pub fn request_next(&self) -> NavigationRequest<'_> {
        let target = self.current_page().saturating_add(1);
        self.request(target)
    }

    pub fn request_prev(&self) -> NavigationRequest<'_> {
        let target = self.current_page().saturating_sub(1);
        self.request(target)
    }

    pub fn request_last(&self) -> NavigationRequest<'_> {
        let target = self.total_pages();
        self.request(target)
    }
}

/// Ownership of the render cycle. Dropping the ticket always clears the
/// in-progress flag.
#[derive(Debug)]
pub struct RenderTicket<'a> {
    controller: &'a NavigationController,
    page: usize,
    released: bool,
}

impl RenderTicket<'_> {
    /// Page the current cycle should draw.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Finishes the current render. Returns the pending target to render next,
    /// or releases the controller back to idle.
    pub fn advance(&mut self) -> Option<usize> {
        let mut state = self.controller.state.lock();
        debug_assert!(state.rendering, "ticket outlived its render cycle");
        match state.pending.take() {
            Some(next) => {
                self.page = next;
                Some(next)
            }
            None => {
                state.rendering = false;
                self.released = true;
                None
            }
        }
    }
}

impl Drop for RenderTicket<'_> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        let mut state = self.controller.state.lock();
        state.rendering = false;
        if let Some(page) = state.pending.take() {
            warn!(page, "render cycle abandoned; dropping queued page");
        }
    }
}
