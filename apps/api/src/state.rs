use std::sync::Arc;

use crate::export::renderer::ArtifactRenderer;
use crate::extract::DelimiterPair;
use crate::llm_client::LlmClient;
use crate::session::registry::SessionRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
/// Settings are consumed at startup; only live collaborators travel here.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionRegistry>,
    pub llm: LlmClient,
    /// Pluggable artifact renderer. Default: HtmlDocumentRenderer.
    pub renderer: Arc<dyn ArtifactRenderer>,
    /// Service-wide marker pair stamped onto every new session.
    pub delimiters: DelimiterPair,
}
