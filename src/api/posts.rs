//! Feed and post endpoints.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use super::{split_tags, Ack, ApiResult};
use crate::auth::Viewer;
use crate::errors::AppError;
use crate::models::{
    Comment, CreateCommentRequest, CreatePostRequest, Post, PostsQueryRequest, UpdatePostRequest,
    UserRef,
};
use crate::store::Collection;
use crate::AppState;

const FRIENDS_TAB: &str = "friends";

#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    pub tab: Option<String>,
    pub tags: Option<String>,
}

fn post_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Post {} not found", id))
}

/// GET /posts - Feed for the viewer, optionally filtered by `tags` (csv).
pub async fn list_posts(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Query(query): Query<FeedQuery>,
) -> Json<Vec<Post>> {
    let tags = split_tags(query.tags.as_deref());
    let tab = query.tab.unwrap_or_default();
    Json(state.store.list(&tab, &tags, viewer.id()))
}

/// POST /posts - Publish a post as the viewer.
pub async fn create_post(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Json(request): Json<CreatePostRequest>,
) -> ApiResult<Post> {
    let uid = viewer.id();

    let board_id = request.board_id.filter(|b| !b.trim().is_empty());
    if let Some(board_id) = &board_id {
        match state.store.board(board_id) {
            Some(board) if board.visible_to(uid) => {}
            _ => return Err(AppError::NotFound(format!("Board {} not found", board_id))),
        }
    }

    let created = state.store.create_post(Post {
        author: UserRef::new(uid, state.store.display_name(uid)),
        text: request.text,
        tags: request.tags,
        image_url: request.image_url,
        board_id,
        ..Default::default()
    });
    state.store.save(Collection::Posts);
    tracing::debug!("Post {} created by {}", created.id, uid);

    Ok(Json(state.store.decorate(&created, uid)))
}

/// POST /posts/query - Friends feed for an explicit list of authors.
pub async fn query_posts(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Json(request): Json<PostsQueryRequest>,
) -> ApiResult<Vec<Post>> {
    if !request.tab.trim().eq_ignore_ascii_case(FRIENDS_TAB) {
        return Err(AppError::Validation(
            "Invalid tab (expected 'friends')".to_string(),
        ));
    }
    Ok(Json(state.store.list_by_authors(
        &request.friend_ids,
        &request.tags,
        viewer.id(),
    )))
}

/// PUT /posts/{id} - Replace text, tags and image. Author only.
pub async fn update_post(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
    Json(request): Json<UpdatePostRequest>,
) -> ApiResult<Post> {
    let uid = viewer.id();
    let updated = state
        .store
        .update_post(&id, |post| {
            if post.author.id != uid {
                return Err(AppError::Forbidden("Only the author can edit".to_string()));
            }
            post.text = request.text;
            post.tags = request.tags;
            post.image_url = request.image_url;
            Ok(())
        })
        .ok_or_else(|| post_not_found(&id))??;
    state.store.save(Collection::Posts);

    Ok(Json(state.store.decorate(&updated, uid)))
}

/// DELETE /posts/{id} - Remove a post and its likes. Author only.
pub async fn delete_post(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
) -> ApiResult<Ack> {
    let uid = viewer.id();
    state
        .store
        .delete_post(&id, |post| {
            if post.author.id == uid {
                Ok(())
            } else {
                Err(AppError::Forbidden("Only the author can delete".to_string()))
            }
        })
        .ok_or_else(|| post_not_found(&id))??;
    state
        .store
        .save_all(&[Collection::Posts, Collection::Likes]);

    Ok(Ack::ok())
}

/// POST /posts/{id}/like - Toggle the viewer's like.
pub async fn like_post(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
) -> ApiResult<Post> {
    let uid = viewer.id();
    let post = state
        .store
        .toggle_like(&id, uid)
        .ok_or_else(|| post_not_found(&id))?;
    state.store.save(Collection::Likes);

    Ok(Json(state.store.decorate(&post, uid)))
}

/// POST /posts/{id}/comments - Append a comment as the viewer.
pub async fn comment_post(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
    Json(request): Json<CreateCommentRequest>,
) -> ApiResult<Post> {
    let uid = viewer.id();
    let comment = Comment {
        id: String::new(),
        author: UserRef::new(uid, state.store.display_name(uid)),
        text: request.text,
        created_at: String::new(),
    };
    let post = state
        .store
        .add_comment(&id, comment)
        .ok_or_else(|| post_not_found(&id))?;
    state.store.save(Collection::Posts);

    Ok(Json(state.store.decorate(&post, uid)))
}
