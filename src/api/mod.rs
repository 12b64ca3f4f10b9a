//! REST API module.
//!
//! Handlers resolve the viewer from the `Viewer` extension, call the store,
//! then save the collections they touched.

mod admin;
mod boards;
mod dm;
mod library;
mod me;
mod posts;
mod users;

pub use admin::*;
pub use boards::*;
pub use dm::*;
pub use library::*;
pub use me::*;
pub use posts::*;
pub use users::*;

use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Handler result: a JSON body or an `AppError` response.
pub type ApiResult<T> = Result<Json<T>, AppError>;

/// `{"ok": true}` acknowledgement body.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ack {
    pub ok: bool,
}

impl Ack {
    pub fn ok() -> Json<Self> {
        Json(Self { ok: true })
    }
}

/// Split a comma-separated `tags` query value, dropping blanks.
pub(crate) fn split_tags(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// RFC 3339 query bound. Missing or malformed values mean "unbounded".
pub(crate) fn time_bound(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.filter(|s| !s.is_empty())
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc))
}

/// Positive integer `limit`; anything else means "no limit" (0).
pub(crate) fn page_limit(raw: Option<&str>) -> usize {
    raw.and_then(|s| s.trim().parse::<usize>().ok()).unwrap_or(0)
}
