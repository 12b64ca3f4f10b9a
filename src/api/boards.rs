//! Board endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use super::{page_limit, split_tags, time_bound, ApiResult};
use crate::auth::Viewer;
use crate::errors::AppError;
use crate::models::{Board, CreateBoardRequest, Post, UpdateBoardRequest};
use crate::store::{now_iso, parse_iso, Collection};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct BoardPostsQuery {
    pub tags: Option<String>,
    pub before: Option<String>,
    pub limit: Option<String>,
}

fn board_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Board {} not found", id))
}

/// Board readable by `uid`: 404 when missing or deleted, 403 when private
/// and owned by someone else.
fn readable_board(state: &AppState, id: &str, uid: &str) -> Result<Board, AppError> {
    let board = state
        .store
        .board(id)
        .filter(|b| !b.deleted)
        .ok_or_else(|| board_not_found(id))?;
    if board.is_private && board.owner_id != uid {
        return Err(AppError::Forbidden("Board is private".to_string()));
    }
    Ok(board)
}

/// GET /boards - Boards visible to the viewer.
pub async fn list_boards(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
) -> Json<Vec<Board>> {
    Json(state.store.list_boards_for(viewer.id()))
}

/// POST /boards - Create a board owned by the viewer.
pub async fn create_board(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Json(request): Json<CreateBoardRequest>,
) -> Result<(StatusCode, Json<Board>), AppError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }

    let now = now_iso();
    let board = state.store.save_board(Board {
        id: String::new(),
        name: name.to_string(),
        description: request.description.trim().to_string(),
        owner_id: viewer.0,
        moderator_ids: Vec::new(),
        is_official: false,
        is_private: request.is_private,
        created_at: now.clone(),
        updated_at: now,
        deleted: false,
    });
    state.store.save(Collection::Boards);
    tracing::info!("Board {} created by {}", board.id, board.owner_id);

    Ok((StatusCode::CREATED, Json(board)))
}

/// GET /boards/{id}
pub async fn get_board(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
) -> ApiResult<Board> {
    readable_board(&state, &id, viewer.id()).map(Json)
}

/// PATCH /boards/{id} - Owner-only partial update. Also used for soft
/// deletion via `deleted: true`.
pub async fn update_board(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
    Json(request): Json<UpdateBoardRequest>,
) -> ApiResult<Board> {
    let uid = viewer.id();
    let board = state
        .store
        .update_board(&id, |board| {
            if board.owner_id != uid {
                return Err(AppError::Forbidden("Not the board owner".to_string()));
            }
            if let Some(name) = request.name {
                board.name = name.trim().to_string();
            }
            if let Some(description) = request.description {
                board.description = description.trim().to_string();
            }
            if let Some(is_private) = request.is_private {
                board.is_private = is_private;
            }
            if let Some(deleted) = request.deleted {
                board.deleted = deleted;
            }
            board.updated_at = now_iso();
            Ok(())
        })
        .ok_or_else(|| board_not_found(&id))??;

    state.store.save(Collection::Boards);
    Ok(Json(board))
}

/// GET /boards/{id}/posts - Newest first, optionally only posts created
/// strictly before `before`, capped at `limit`.
pub async fn list_board_posts(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
    Query(query): Query<BoardPostsQuery>,
) -> ApiResult<Vec<Post>> {
    let uid = viewer.id();
    readable_board(&state, &id, uid)?;

    let tags = split_tags(query.tags.as_deref());
    let mut posts = state.store.list_by_board(&id, &tags, uid);
    if let Some(before) = time_bound(query.before.as_deref()) {
        posts.retain(|p| parse_iso(&p.created_at) < before);
    }
    let limit = page_limit(query.limit.as_deref());
    if limit > 0 {
        posts.truncate(limit);
    }
    Ok(Json(posts))
}
