//! Embedded author reference.

use serde::{Deserialize, Serialize};

/// Author data copied by value into posts and comments.
///
/// The copy goes stale when the profile changes; read paths re-resolve it
/// through decoration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_asset: Option<String>,
}

impl UserRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar_asset: None,
        }
    }
}
