//! Public user endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use crate::auth::Viewer;
use crate::models::{Post, Profile};
use crate::store::Collection;
use crate::AppState;

/// GET /users/{id} - Profile of any user, placeholder when unknown.
pub async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> Json<Profile> {
    Json(
        state
            .store
            .profile(&id)
            .unwrap_or_else(|| Profile::placeholder(&id)),
    )
}

/// GET /users/{id}/posts
pub async fn get_user_posts(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
) -> Json<Vec<Post>> {
    Json(state.store.user_posts(&id, viewer.id()))
}

/// POST /users/{id}/follow
pub async fn follow_user(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
) -> StatusCode {
    state.store.follow(viewer.id(), &id);
    state.store.save(Collection::Friends);
    StatusCode::NO_CONTENT
}

/// DELETE /users/{id}/follow
pub async fn unfollow_user(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
) -> StatusCode {
    state.store.unfollow(viewer.id(), &id);
    state.store.save(Collection::Friends);
    StatusCode::NO_CONTENT
}
