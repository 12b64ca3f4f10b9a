//! Direct-message conversation and message models.

use serde::{Deserialize, Serialize};

use super::Document;

/// A direct-message conversation.
///
/// `last_message_at` and `last_message_preview` are cached projections of
/// the message collection, advanced whenever a message is saved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub member_ids: Vec<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message_at: Option<String>,
    #[serde(default)]
    pub last_message_preview: String,
}

impl Conversation {
    pub fn has_member(&self, user: &str) -> bool {
        self.member_ids.iter().any(|m| m == user)
    }
}

/// Kind of message payload.
///
/// Names this build does not know are kept as `Other` so a snapshot written
/// by a newer client still loads and saves back unchanged. A missing, `null`
/// or blank name means text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum MessageType {
    #[default]
    Text,
    MiniCard,
    Album,
    Other(String),
}

impl MessageType {
    pub fn as_str(&self) -> &str {
        match self {
            MessageType::Text => "text",
            MessageType::MiniCard => "miniCard",
            MessageType::Album => "album",
            MessageType::Other(name) => name,
        }
    }

    /// Whether new messages of this kind may be sent.
    pub fn is_known(&self) -> bool {
        !matches!(self, MessageType::Other(_))
    }

    /// Preview text shown for messages without text.
    pub fn placeholder(&self) -> &'static str {
        match self {
            MessageType::Text | MessageType::Other(_) => "",
            MessageType::MiniCard => "[Mini Card]",
            MessageType::Album => "[Album]",
        }
    }
}

impl From<Option<String>> for MessageType {
    fn from(raw: Option<String>) -> Self {
        let name = raw.unwrap_or_default();
        match name.trim() {
            "" | "text" => MessageType::Text,
            "miniCard" => MessageType::MiniCard,
            "album" => MessageType::Album,
            _ => MessageType::Other(name),
        }
    }
}

impl From<MessageType> for String {
    fn from(kind: MessageType) -> Self {
        match kind {
            MessageType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

/// A message inside a conversation. Deletion is soft via `deleted`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(default)]
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    #[serde(default, rename = "type")]
    pub kind: MessageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_json: Option<Document>,
    pub created_at: String,
    #[serde(default)]
    pub deleted: bool,
}

impl Message {
    /// Preview line for the parent conversation.
    pub fn preview(&self) -> String {
        match self.text.as_deref() {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => self.kind.placeholder().to_string(),
        }
    }
}

/// Request body for creating a conversation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConversationRequest {
    #[serde(default)]
    pub member_ids: Vec<String>,
    #[serde(default)]
    pub name: String,
}

/// Request body for sending a message.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    /// Absent or `""` means text.
    #[serde(default, rename = "type")]
    pub kind: MessageType,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub content_json: Option<Document>,
    #[serde(default)]
    pub content_schema: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_request_kind_parsing() {
        let parse = |body: &str| serde_json::from_str::<SendMessageRequest>(body);
        assert_eq!(parse(r#"{"text":"hi"}"#).unwrap().kind, MessageType::Text);
        assert_eq!(parse(r#"{"type":""}"#).unwrap().kind, MessageType::Text);
        assert_eq!(parse(r#"{"type":null}"#).unwrap().kind, MessageType::Text);
        assert_eq!(parse(r#"{"type":"miniCard"}"#).unwrap().kind, MessageType::MiniCard);

        let sticker = parse(r#"{"type":"sticker"}"#).unwrap().kind;
        assert_eq!(sticker, MessageType::Other("sticker".to_string()));
        assert!(!sticker.is_known());
    }

    #[test]
    fn test_unknown_message_type_survives_round_trip() {
        let raw = r#"{"conversationId":"c1","senderId":"bob","type":"sticker","createdAt":"2024-01-01T00:00:00Z"}"#;
        let m: Message = serde_json::from_str(raw).unwrap();
        assert_eq!(m.kind, MessageType::Other("sticker".to_string()));
        assert_eq!(m.preview(), "");

        let value = serde_json::to_value(&m).unwrap();
        assert_eq!(value["type"], "sticker");
    }

    #[test]
    fn test_preview_falls_back_to_placeholder() {
        let mut m = Message {
            kind: MessageType::Album,
            ..Default::default()
        };
        assert_eq!(m.preview(), "[Album]");
        m.text = Some("look".to_string());
        assert_eq!(m.preview(), "look");
    }

    #[test]
    fn test_message_type_serializes_camel_case() {
        let m = Message {
            kind: MessageType::MiniCard,
            ..Default::default()
        };
        let value = serde_json::to_value(&m).unwrap();
        assert_eq!(value["type"], "miniCard");
        assert!(value.get("text").is_none());
    }
}
