//! Axum route handler for artifact export.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::renderer::{ArtifactRenderer, RenderedDocument};
use crate::session::Session;
use crate::state::AppState;

/// POST /api/v1/sessions/:id/export
///
/// Renders the current artifact as a downloadable document. 409 while the
/// session has no exportable artifact.
pub async fn handle_export(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let session = state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;

    let document = export_artifact(&session, state.renderer.as_ref()).await?;

    info!(
        "Exported artifact for session {} ({} bytes)",
        session_id,
        document.bytes.len()
    );

    Ok((
        [
            (header::CONTENT_TYPE, document.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", document.filename),
            ),
        ],
        document.bytes,
    )
        .into_response())
}

/// Renders the session's artifact. The renderer runs only when a non-empty
/// artifact exists; unavailable and empty-block states are refused before
/// any document work starts.
pub(crate) async fn export_artifact(
    session: &Session,
    renderer: &dyn ArtifactRenderer,
) -> Result<RenderedDocument, AppError> {
    let text = session
        .artifact_for_export()
        .await
        .ok_or(AppError::ArtifactUnavailable)?;

    renderer
        .render(&text)
        .await
        .map_err(|e| AppError::Render(e.to_string()))
}
