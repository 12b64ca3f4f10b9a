//! Data models for the social feed.
//!
//! Field names serialize in camelCase to match the mobile client and the
//! snapshot files on disk.

mod board;
mod conversation;
mod post;
mod profile;
mod user;

pub use board::*;
pub use conversation::*;
pub use post::*;
pub use profile::*;
pub use user::*;

/// Opaque JSON object stored and returned verbatim. Key order is preserved.
pub type Document = serde_json::Map<String, serde_json::Value>;
