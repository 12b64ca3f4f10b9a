//! Client library backup.

use axum::{extract::State, Extension, Json};

use super::ApiResult;
use crate::auth::Viewer;
use crate::errors::AppError;
use crate::models::Document;
use crate::AppState;

/// POST /api/v1/library/sync - Store the viewer's library payload and echo
/// it back unchanged.
pub async fn sync_library(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Json(payload): Json<Document>,
) -> ApiResult<Document> {
    let uid = viewer.id();
    if uid.is_empty() {
        return Err(AppError::Unauthorized("No identity".to_string()));
    }

    let path = state.store.save_library(uid, &payload)?;
    tracing::info!("Saved library for {} to {}", uid, path.display());

    Ok(Json(payload))
}
