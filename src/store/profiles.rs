//! Profiles, display names and read-time decoration of posts.

use super::{Collections, Store};
use crate::models::{Post, Profile, UserRef};

impl Collections {
    pub(super) fn display_name(&self, user: &str) -> String {
        if let Some(profile) = self.profiles.get(user) {
            if let Some(nick) = profile.nickname.as_deref().filter(|n| !n.is_empty()) {
                return nick.to_string();
            }
            if !profile.name.is_empty() {
                return profile.name.clone();
            }
        }
        user.to_string()
    }

    fn resolve_author(&self, author: &mut UserRef) {
        if author.id.is_empty() {
            return;
        }
        author.name = self.display_name(&author.id);
        if let Some(avatar) = self
            .profiles
            .get(&author.id)
            .and_then(|p| p.avatar_url.as_deref())
            .filter(|a| !a.is_empty())
        {
            author.avatar_asset = Some(avatar.to_string());
        }
    }

    /// Copy of `post` with authors resolved from profiles and like fields
    /// recomputed from the like set for `viewer`.
    pub(super) fn decorate(&self, post: &Post, viewer: &str) -> Post {
        let mut out = post.clone();
        self.resolve_author(&mut out.author);
        for comment in &mut out.comments {
            self.resolve_author(&mut comment.author);
        }
        let likes = self.likes.get(&out.id);
        out.like_count = likes.map_or(0, |set| set.len());
        out.liked_by_me = likes.is_some_and(|set| set.contains(viewer));
        out
    }
}

impl Store {
    pub fn profile(&self, user: &str) -> Option<Profile> {
        self.data.read().profiles.get(user).cloned()
    }

    /// Insert or merge a profile.
    ///
    /// A new id is stored as given. For an existing id, `name` is replaced
    /// when non-empty, each optional field when present, and the three
    /// `show_*` flags unconditionally. An empty id is returned untouched and
    /// nothing is stored.
    pub fn upsert_profile(&self, incoming: Profile) -> Profile {
        if incoming.id.is_empty() {
            return incoming;
        }
        let mut guard = self.data.write();
        let data = &mut *guard;
        let Some(existing) = data.profiles.get_mut(&incoming.id) else {
            data.profiles.insert(incoming.id.clone(), incoming.clone());
            return incoming;
        };

        if !incoming.name.is_empty() {
            existing.name = incoming.name;
        }
        merge_present(&mut existing.nickname, incoming.nickname);
        merge_present(&mut existing.avatar_url, incoming.avatar_url);
        merge_present(&mut existing.instagram, incoming.instagram);
        merge_present(&mut existing.facebook, incoming.facebook);
        merge_present(&mut existing.line_id, incoming.line_id);
        merge_present(&mut existing.birthday, incoming.birthday);
        existing.show_instagram = incoming.show_instagram;
        existing.show_facebook = incoming.show_facebook;
        existing.show_line = incoming.show_line;

        existing.clone()
    }

    /// Nickname if set, else name if set, else the raw id.
    pub fn display_name(&self, user: &str) -> String {
        self.data.read().display_name(user)
    }

    pub fn decorate(&self, post: &Post, viewer: &str) -> Post {
        self.data.read().decorate(post, viewer)
    }
}

fn merge_present(slot: &mut Option<String>, incoming: Option<String>) {
    if incoming.is_some() {
        *slot = incoming;
    }
}
