//! Direct-message conversations and messages.

use std::cmp::Reverse;

use chrono::{DateTime, Utc};

use super::{parse_iso, Store};
use crate::models::{Conversation, Message};

/// Last activity used for ordering: `last_message_at` when it parses,
/// otherwise `created_at`.
fn activity_at(conversation: &Conversation) -> DateTime<Utc> {
    let last = conversation
        .last_message_at
        .as_deref()
        .map(parse_iso)
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    if last == DateTime::<Utc>::MIN_UTC {
        parse_iso(&conversation.created_at)
    } else {
        last
    }
}

impl Store {
    /// Conversations `member` belongs to, most recently active first.
    pub fn list_conversations_for(&self, member: &str) -> Vec<Conversation> {
        let mut out: Vec<Conversation> = self
            .data
            .read()
            .conversations
            .values()
            .filter(|c| c.has_member(member))
            .cloned()
            .collect();
        out.sort_by_cached_key(|c| Reverse(activity_at(c)));
        out
    }

    pub fn conversation(&self, id: &str) -> Option<Conversation> {
        self.data.read().conversations.get(id).cloned()
    }

    /// Insert or fully replace a conversation, assigning a `c_` id when
    /// empty. Member normalization is the caller's job.
    pub fn save_conversation(&self, mut conversation: Conversation) -> Conversation {
        if conversation.id.is_empty() {
            conversation.id = self.next_prefixed_id("c");
        }
        self.data
            .write()
            .conversations
            .insert(conversation.id.clone(), conversation.clone());
        conversation
    }

    /// Non-deleted messages of a conversation strictly between `after` and
    /// `before`, oldest first. A non-zero `limit` keeps the oldest `limit`
    /// messages of that range.
    pub fn list_messages(
        &self,
        conversation_id: &str,
        after: Option<DateTime<Utc>>,
        before: Option<DateTime<Utc>>,
        limit: usize,
    ) -> Vec<Message> {
        let mut out: Vec<(DateTime<Utc>, Message)> = self
            .data
            .read()
            .messages
            .values()
            .filter(|m| m.conversation_id == conversation_id && !m.deleted)
            .map(|m| (parse_iso(&m.created_at), m))
            .filter(|(at, _)| after.map_or(true, |a| *at > a))
            .filter(|(at, _)| before.map_or(true, |b| *at < b))
            .map(|(at, m)| (at, m.clone()))
            .collect();
        out.sort_by_key(|(at, _)| *at);
        if limit > 0 {
            out.truncate(limit);
        }
        out.into_iter().map(|(_, m)| m).collect()
    }

    /// Store a message, assigning an `m_` id when empty, and advance the
    /// parent conversation's last-message projection.
    ///
    /// The projection always moves to this message, even when an older
    /// message is inserted after a newer one.
    pub fn save_message(&self, mut message: Message) -> Message {
        if message.id.is_empty() {
            message.id = self.next_prefixed_id("m");
        }
        let mut guard = self.data.write();
        let data = &mut *guard;
        if let Some(conversation) = data.conversations.get_mut(&message.conversation_id) {
            conversation.last_message_at = Some(message.created_at.clone());
            conversation.last_message_preview = message.preview();
        }
        data.messages.insert(message.id.clone(), message.clone());
        message
    }
}
