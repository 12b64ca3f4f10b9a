//! Post and comment models.

use serde::{Deserialize, Serialize};

use super::UserRef;

/// A comment owned by its parent post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub author: UserRef,
    pub text: String,
    /// RFC 3339 timestamp
    pub created_at: String,
}

/// A feed post.
///
/// `like_count` and `liked_by_me` are cached projections of the like set and
/// are recomputed for the viewer on every read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub author: UserRef,
    pub text: String,
    /// RFC 3339 timestamp
    pub created_at: String,
    #[serde(default)]
    pub like_count: usize,
    #[serde(default)]
    pub liked_by_me: bool,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_id: Option<String>,
}

/// Request body for creating a post.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub board_id: Option<String>,
}

/// Request body for editing a post. Replaces text, tags and image.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Request body for adding a comment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCommentRequest {
    #[serde(default)]
    pub text: String,
}

/// Request body for the friends feed query.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostsQueryRequest {
    #[serde(default)]
    pub tab: String,
    #[serde(default)]
    pub friend_ids: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}
