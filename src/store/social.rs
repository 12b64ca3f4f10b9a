//! Tag subscriptions and the follow graph.
//!
//! Invalid input (empty tag, empty or self-referential follow) is a silent
//! no-op, indistinguishable from "already in that state".

use super::{normalize_tag, Store};

impl Store {
    /// Subscribed tags in insertion order.
    pub fn tags(&self, user: &str) -> Vec<String> {
        self.data.read().tags.get(user).cloned().unwrap_or_default()
    }

    /// Subscribe to a tag and return the resulting list.
    pub fn add_tag(&self, user: &str, tag: &str) -> Vec<String> {
        let tag = normalize_tag(tag);
        if tag.is_empty() {
            return self.tags(user);
        }
        let mut data = self.data.write();
        let current = data.tags.entry(user.to_string()).or_default();
        if !current.contains(&tag) {
            current.push(tag);
        }
        current.clone()
    }

    /// Unsubscribe from a tag and return the resulting list. Removing a tag
    /// that is not subscribed is a no-op.
    pub fn remove_tag(&self, user: &str, tag: &str) -> Vec<String> {
        let tag = normalize_tag(tag);
        let mut data = self.data.write();
        match data.tags.get_mut(user) {
            Some(current) => {
                current.retain(|t| *t != tag);
                current.clone()
            }
            None => Vec::new(),
        }
    }

    /// Followed user ids, sorted.
    pub fn friends(&self, user: &str) -> Vec<String> {
        self.data
            .read()
            .friends
            .get(user)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn follow(&self, user: &str, target: &str) {
        if user.is_empty() || target.is_empty() || user == target {
            return;
        }
        self.data
            .write()
            .friends
            .entry(user.to_string())
            .or_default()
            .insert(target);
    }

    pub fn unfollow(&self, user: &str, target: &str) {
        if user.is_empty() || target.is_empty() {
            return;
        }
        if let Some(set) = self.data.write().friends.get_mut(user) {
            set.remove(target);
        }
    }
}
