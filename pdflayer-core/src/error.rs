use thiserror::Error;

/// Failures surfaced by the viewer session.
///
/// Collaborators report plain `anyhow` errors; the session classifies them here
/// so callers can tell a rejected file from a failed render.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("failed to open document")]
    DocumentOpen(#[source] anyhow::Error),

    #[error("failed to render page {page}")]
    PageRender {
        page: usize,
        #[source]
        source: anyhow::Error,
    },

    #[error("display surface rejected the update")]
    Surface(#[source] anyhow::Error),

    #[error("preference storage failed")]
    Preferences(#[source] anyhow::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type ViewerResult<T> = std::result::Result<T, ViewerError>;
