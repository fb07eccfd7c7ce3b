//! JSON API over the session (`/api/...`).

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use codelens_agent::{Submission, TurnOutcome};
use codelens_core::{ConversationEntry, EntryContent, EntryKind, HistoryEntry, Role};
use codelens_media::MediaPayload;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::warn;
use uuid::Uuid;

use crate::control_ui::data_uri;
use crate::server::GatewayState;

type ApiError = (StatusCode, Json<Value>);

fn bad_request(message: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message.into() })))
}

/// One conversation or history entry as JSON. Images are inlined as data URIs.
#[derive(Debug, Serialize)]
pub struct EntryView {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    pub kind: EntryKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl EntryView {
    fn build(id: Uuid, role: Option<Role>, content: &EntryContent, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            role,
            kind: content.kind(),
            text: content.as_text().map(str::to_string),
            image: content.as_image().map(data_uri),
            created_at,
        }
    }
}

impl From<&ConversationEntry> for EntryView {
    fn from(entry: &ConversationEntry) -> Self {
        Self::build(entry.id, Some(entry.role), &entry.content, entry.created_at)
    }
}

impl From<&HistoryEntry> for EntryView {
    fn from(entry: &HistoryEntry) -> Self {
        Self::build(entry.id, None, &entry.content, entry.created_at)
    }
}

#[derive(Debug, Serialize)]
pub struct TurnResponse {
    pub outcome: TurnOutcome,
    /// Bot entries appended by this turn, in order.
    pub replies: Vec<String>,
}

/// `GET /api/conversation`
pub async fn get_conversation(State(state): State<GatewayState>) -> Json<Value> {
    let session = state.session.lock().await;
    let entries: Vec<EntryView> = session.conversation().iter().map(EntryView::from).collect();
    Json(json!({ "session_id": session.id(), "entries": entries }))
}

/// `GET /api/history`
pub async fn get_history(State(state): State<GatewayState>) -> Json<Value> {
    let session = state.session.lock().await;
    let entries: Vec<EntryView> = session.history().iter().map(EntryView::from).collect();
    Json(json!({ "session_id": session.id(), "entries": entries }))
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// `POST /api/ask`: a typed question.
pub async fn ask(
    State(state): State<GatewayState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<TurnResponse>, ApiError> {
    if request.question.trim().is_empty() {
        return Err(bad_request("question is empty"));
    }
    Ok(Json(run_turn(&state, Submission::text(request.question)).await))
}

#[derive(Debug, Deserialize)]
pub struct ExplainQuery {
    pub filename: String,
}

/// `POST /api/explain?filename=shot.png`: raw image bytes in the body.
pub async fn explain(
    State(state): State<GatewayState>,
    Query(query): Query<ExplainQuery>,
    body: Bytes,
) -> Result<Json<TurnResponse>, ApiError> {
    let payload = MediaPayload::new(query.filename, body);
    if let Err(e) = state.uploads.check(&payload) {
        warn!(error = %e, "Rejected API upload");
        return Err(bad_request(e.to_string()));
    }
    Ok(Json(run_turn(&state, Submission::image(payload.data.to_vec())).await))
}

/// `POST /api/clear-history`: empties the sidebar history only.
pub async fn clear_history(State(state): State<GatewayState>) -> Json<Value> {
    let mut session = state.session.lock().await;
    state.agent.clear_history(&mut session);
    Json(json!({ "status": "cleared", "conversation_len": session.conversation().len() }))
}

/// `POST /api/reset`: empties both the history and the conversation.
pub async fn reset(State(state): State<GatewayState>) -> Json<Value> {
    let mut session = state.session.lock().await;
    state.agent.reset(&mut session);
    Json(json!({ "status": "reset" }))
}

async fn run_turn(state: &GatewayState, submission: Submission) -> TurnResponse {
    let mut session = state.session.lock().await;
    let before = session.conversation().len();
    let outcome = state.agent.submit(&mut session, submission).await;

    let replies = session.conversation()[before..]
        .iter()
        .filter(|entry| entry.role == Role::Bot)
        .filter_map(|entry| entry.content.as_text().map(str::to_string))
        .collect();

    TurnResponse { outcome, replies }
}
