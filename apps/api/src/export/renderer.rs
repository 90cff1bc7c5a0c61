use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}

/// A finished export: the document bytes plus what the HTTP layer needs to
/// serve them as a download.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Bytes,
    pub content_type: &'static str,
    pub filename: &'static str,
}

/// The artifact renderer trait. Implement this to swap document formats
/// without touching the endpoint, handler, or caller code.
///
/// Carried in `AppState` as `Arc<dyn ArtifactRenderer>`. Callers guarantee
/// `artifact_text` is non-empty; availability checks happen at the export
/// boundary, never here.
#[async_trait]
pub trait ArtifactRenderer: Send + Sync {
    async fn render(&self, artifact_text: &str) -> Result<RenderedDocument, RenderError>;
}
