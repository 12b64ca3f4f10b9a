//! Direct-message endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use super::{page_limit, time_bound, ApiResult};
use crate::auth::Viewer;
use crate::errors::AppError;
use crate::models::{Conversation, CreateConversationRequest, Message, SendMessageRequest};
use crate::store::{now_iso, Collection};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct MessagesQuery {
    pub after: Option<String>,
    pub before: Option<String>,
    pub limit: Option<String>,
}

/// Conversation the viewer belongs to. Non-members get the same 404 as a
/// missing conversation.
fn member_conversation(state: &AppState, id: &str, uid: &str) -> Result<Conversation, AppError> {
    state
        .store
        .conversation(id)
        .filter(|c| c.has_member(uid))
        .ok_or_else(|| AppError::NotFound(format!("Conversation {} not found", id)))
}

/// Trimmed, de-duplicated member list that always contains `creator`.
fn normalize_members(requested: Vec<String>, creator: &str) -> Vec<String> {
    let mut members: Vec<String> = Vec::with_capacity(requested.len() + 1);
    for member in requested.iter().map(|m| m.trim()).chain(std::iter::once(creator)) {
        if !member.is_empty() && !members.iter().any(|m| m == member) {
            members.push(member.to_string());
        }
    }
    members
}

/// GET /conversations - The viewer's conversations, most recent first.
pub async fn list_conversations(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
) -> Json<Vec<Conversation>> {
    Json(state.store.list_conversations_for(viewer.id()))
}

/// POST /conversations - Start a conversation including the viewer.
pub async fn create_conversation(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Json(request): Json<CreateConversationRequest>,
) -> (StatusCode, Json<Conversation>) {
    let name = request.name.trim();
    let conversation = state.store.save_conversation(Conversation {
        id: String::new(),
        name: Some(name.to_string()).filter(|n| !n.is_empty()),
        member_ids: normalize_members(request.member_ids, viewer.id()),
        created_at: now_iso(),
        last_message_at: None,
        last_message_preview: String::new(),
    });
    state.store.save(Collection::Conversations);

    (StatusCode::CREATED, Json(conversation))
}

/// GET /conversations/{id}/messages - Oldest first within the optional
/// `after`/`before` window, capped at `limit`.
pub async fn list_messages(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
    Query(query): Query<MessagesQuery>,
) -> ApiResult<Vec<Message>> {
    member_conversation(&state, &id, viewer.id())?;
    Ok(Json(state.store.list_messages(
        &id,
        time_bound(query.after.as_deref()),
        time_bound(query.before.as_deref()),
        page_limit(query.limit.as_deref()),
    )))
}

/// POST /conversations/{id}/messages - Send a message as the viewer.
pub async fn send_message(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
    Json(request): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<Message>), AppError> {
    let uid = viewer.id();
    member_conversation(&state, &id, uid)?;
    if !request.kind.is_known() {
        return Err(AppError::Validation(format!(
            "Unsupported message type: {}",
            request.kind.as_str()
        )));
    }

    let message = state.store.save_message(Message {
        id: String::new(),
        conversation_id: id,
        sender_id: uid.to_string(),
        kind: request.kind,
        text: Some(request.text).filter(|t| !t.is_empty()),
        content_schema: Some(request.content_schema).filter(|s| !s.is_empty()),
        content_json: request.content_json,
        created_at: now_iso(),
        deleted: false,
    });
    state
        .store
        .save_all(&[Collection::Messages, Collection::Conversations]);

    Ok((StatusCode::CREATED, Json(message)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_members_adds_creator_once() {
        let members = normalize_members(
            vec![" bob ".to_string(), "".to_string(), "bob".to_string()],
            "alice",
        );
        assert_eq!(members, vec!["bob", "alice"]);

        let members = normalize_members(vec!["alice".to_string(), "bob".to_string()], "alice");
        assert_eq!(members, vec!["alice", "bob"]);

        assert_eq!(normalize_members(Vec::new(), "alice"), vec!["alice"]);
    }
}
