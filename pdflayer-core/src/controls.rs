use crate::navigation::NavigationSnapshot;

pub const NO_DOCUMENT_LABEL: &str = "No document loaded";

/// What the page label and the two navigation buttons should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlState {
    pub page_info: String,
    pub prev_disabled: bool,
    pub next_disabled: bool,
}

pub fn reflect(snapshot: &NavigationSnapshot) -> ControlState {
    if !snapshot.has_document {
        return ControlState {
            page_info: NO_DOCUMENT_LABEL.to_string(),
            prev_disabled: true,
            next_disabled: true,
        };
    }

    ControlState {
        page_info: format!(
            "Page {} of {}",
            snapshot.current_page, snapshot.total_pages
        ),
        prev_disabled: snapshot.current_page <= 1,
        next_disabled: snapshot.current_page >= snapshot.total_pages,
    }
}
