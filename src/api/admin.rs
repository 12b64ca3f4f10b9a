//! Admin endpoints, mounted behind `auth::admin_key_layer`.

use axum::extract::State;

use super::{Ack, ApiResult};
use crate::AppState;

/// POST /admin/reload - Re-read every snapshot from disk.
pub async fn reload(State(state): State<AppState>) -> ApiResult<Ack> {
    state.store.load_all();
    tracing::info!("Snapshots reloaded from {}", state.store.paths().data_dir.display());
    Ok(Ack::ok())
}
