//! User profile model.

use serde::{Deserialize, Serialize};

/// Public profile for a user key.
///
/// Optional fields merge by presence on upsert; the `show_*` flags are always
/// taken from the incoming value because `false` is a deliberate choice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub instagram: Option<String>,
    #[serde(default)]
    pub facebook: Option<String>,
    #[serde(default)]
    pub line_id: Option<String>,
    /// yyyy-MM-dd
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
    #[serde(default)]
    pub show_instagram: bool,
    #[serde(default)]
    pub show_facebook: bool,
    #[serde(default)]
    pub show_line: bool,
}

impl Profile {
    /// Placeholder returned for users that never saved a profile.
    pub fn placeholder(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            ..Default::default()
        }
    }
}
