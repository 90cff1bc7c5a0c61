//! Axum route handlers for session lifecycle and artifact inspection.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::ArtifactState;
use crate::models::message::Message;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct SessionDetailResponse {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub messages: Vec<Message>,
    pub artifact: ArtifactView,
}

/// Client-facing projection of the artifact state. `display_text` is always
/// present (the placeholder while unavailable) so a preview pane can bind to
/// it unconditionally; `artifact` carries the raw block only when one exists.
#[derive(Debug, Serialize)]
pub struct ArtifactView {
    pub status: &'static str,
    pub display_text: String,
    pub artifact: Option<String>,
}

impl ArtifactView {
    pub fn from_state(state: &ArtifactState) -> Self {
        Self {
            status: if state.is_available() {
                "available"
            } else {
                "unavailable"
            },
            display_text: state.display_text().to_string(),
            artifact: state.artifact_text().map(str::to_string),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
///
/// Opens a new interview session with the service-wide delimiter pair.
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<CreateSessionResponse>), AppError> {
    let session = state.sessions.create(state.delimiters.clone()).await;

    Ok((
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id: session.id(),
            created_at: session.created_at(),
        }),
    ))
}

/// GET /api/v1/sessions/:id
///
/// Returns the full transcript plus the current artifact view.
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionDetailResponse>, AppError> {
    let session = state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;

    let messages = session.transcript_snapshot().await;
    let artifact = ArtifactView::from_state(&session.artifact().await);

    Ok(Json(SessionDetailResponse {
        session_id: session.id(),
        created_at: session.created_at(),
        messages,
        artifact,
    }))
}

/// GET /api/v1/sessions/:id/artifact
///
/// Returns just the artifact view, for clients polling the preview pane.
pub async fn handle_get_artifact(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ArtifactView>, AppError> {
    let session = state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;

    Ok(Json(ArtifactView::from_state(&session.artifact().await)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::UNAVAILABLE_PLACEHOLDER;

    #[test]
    fn test_artifact_view_unavailable_has_placeholder() {
        let view = ArtifactView::from_state(&ArtifactState::Unavailable);
        assert_eq!(view.status, "unavailable");
        assert_eq!(view.display_text, UNAVAILABLE_PLACEHOLDER);
        assert_eq!(view.artifact, None);
    }

    #[test]
    fn test_artifact_view_available_carries_block() {
        let view = ArtifactView::from_state(&ArtifactState::Available("Jane Doe".to_string()));
        assert_eq!(view.status, "available");
        assert_eq!(view.display_text, "Jane Doe");
        assert_eq!(view.artifact, Some("Jane Doe".to_string()));
    }

    #[test]
    fn test_artifact_view_serializes_without_artifact_when_unavailable() {
        let view = ArtifactView::from_state(&ArtifactState::Unavailable);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["status"], "unavailable");
        assert!(json["artifact"].is_null());
    }
}
