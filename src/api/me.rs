//! Endpoints about the calling user: profile, tag subscriptions, follows.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::auth::Viewer;
use crate::models::Profile;
use crate::store::Collection;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AddTagRequest {
    #[serde(default)]
    pub tag: String,
}

/// GET /me - The viewer's profile, or a placeholder when none is saved.
pub async fn get_me(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
) -> Json<Profile> {
    let uid = viewer.id();
    Json(
        state
            .store
            .profile(uid)
            .unwrap_or_else(|| Profile::placeholder(uid)),
    )
}

/// PATCH /me - Merge the body into the viewer's profile. The id always
/// comes from the identity, never from the body.
pub async fn patch_me(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Json(mut profile): Json<Profile>,
) -> Json<Profile> {
    profile.id = viewer.0;
    let updated = state.store.upsert_profile(profile);
    state.store.save(Collection::Profiles);
    Json(updated)
}

/// GET /me/tags
pub async fn get_my_tags(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
) -> Json<Vec<String>> {
    Json(state.store.tags(viewer.id()))
}

/// POST /me/tags - Subscribe to `tag`.
pub async fn add_my_tag(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Json(request): Json<AddTagRequest>,
) -> Json<Vec<String>> {
    let tags = state.store.add_tag(viewer.id(), &request.tag);
    state.store.save(Collection::Tags);
    Json(tags)
}

/// DELETE /me/tags/{tag}
pub async fn remove_my_tag(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Path(tag): Path<String>,
) -> Json<Vec<String>> {
    let tags = state.store.remove_tag(viewer.id(), &tag);
    state.store.save(Collection::Tags);
    Json(tags)
}

/// GET /me/friends - Users the viewer follows.
pub async fn get_my_friends(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
) -> Json<Vec<String>> {
    Json(state.store.friends(viewer.id()))
}
