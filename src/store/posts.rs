//! Post listing, CRUD, comments and likes.

use std::cmp::Reverse;
use std::collections::HashSet;

use super::{normalize_tag, normalize_tags, now_iso, parse_iso, Collections, Store};
use crate::models::{Comment, Post};

/// Feed tab sorted by like count first.
pub const TAB_HOT: &str = "hot";

/// Case-insensitive "any tag in common" filter. An empty filter matches
/// every post.
struct TagFilter(HashSet<String>);

impl TagFilter {
    fn new<S: AsRef<str>>(tags: &[S]) -> Self {
        TagFilter(
            tags.iter()
                .map(|t| normalize_tag(t.as_ref()))
                .filter(|t| !t.is_empty())
                .collect(),
        )
    }

    fn matches(&self, post: &Post) -> bool {
        self.0.is_empty() || post.tags.iter().any(|t| self.0.contains(&t.to_lowercase()))
    }
}

fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by_cached_key(|p| Reverse(parse_iso(&p.created_at)));
}

fn sort_hot(posts: &mut [Post]) {
    posts.sort_by_cached_key(|p| Reverse((p.like_count, parse_iso(&p.created_at))));
}

impl Collections {
    fn decorated_where(&self, viewer: &str, keep: impl Fn(&Post) -> bool) -> Vec<Post> {
        self.posts
            .iter()
            .filter(|p| keep(p))
            .map(|p| self.decorate(p, viewer))
            .collect()
    }
}

impl Store {
    /// Feed listing. `tab == "hot"` orders by like count then recency, any
    /// other tab by recency alone.
    pub fn list<S: AsRef<str>>(&self, tab: &str, tags: &[S], viewer: &str) -> Vec<Post> {
        let filter = TagFilter::new(tags);
        let mut out = self
            .data
            .read()
            .decorated_where(viewer, |p| filter.matches(p));
        if tab == TAB_HOT {
            sort_hot(&mut out);
        } else {
            sort_newest_first(&mut out);
        }
        out
    }

    /// Insert a post at the head of the list. Tags are normalized; an empty
    /// id or timestamp is filled in.
    pub fn create_post(&self, mut post: Post) -> Post {
        if post.id.is_empty() {
            post.id = self.next_timestamp_id();
        }
        if post.created_at.is_empty() {
            post.created_at = now_iso();
        }
        post.tags = normalize_tags(&post.tags);
        self.data.write().posts.insert(0, post.clone());
        post
    }

    /// Post and its current index. The index is only meaningful until the
    /// lock is released; prefer `update_post`/`delete_post`.
    pub fn by_id(&self, id: &str) -> Option<(Post, usize)> {
        let data = self.data.read();
        data.posts
            .iter()
            .position(|p| p.id == id)
            .map(|i| (data.posts[i].clone(), i))
    }

    /// Replace the post at `index`. `None` when out of range.
    pub fn update_at(&self, index: usize, post: Post) -> Option<Post> {
        let mut data = self.data.write();
        let slot = data.posts.get_mut(index)?;
        *slot = post.clone();
        Some(post)
    }

    /// Remove the post at `index`, shifting later posts down.
    pub fn delete_at(&self, index: usize) -> Option<Post> {
        let mut guard = self.data.write();
        let data = &mut *guard;
        if index >= data.posts.len() {
            return None;
        }
        let removed = data.posts.remove(index);
        data.likes.remove(&removed.id);
        Some(removed)
    }

    /// Find a post by id and edit it under one exclusive lock.
    ///
    /// `edit` works on a copy; the copy is stored only when `edit` returns
    /// `Ok`. The id cannot be changed and tags are re-normalized. Returns
    /// `None` when no post has this id.
    pub fn update_post<E>(
        &self,
        id: &str,
        edit: impl FnOnce(&mut Post) -> Result<(), E>,
    ) -> Option<Result<Post, E>> {
        let mut data = self.data.write();
        let slot = data.posts.iter_mut().find(|p| p.id == id)?;
        let mut draft = slot.clone();
        if let Err(e) = edit(&mut draft) {
            return Some(Err(e));
        }
        draft.id = slot.id.clone();
        draft.tags = normalize_tags(&draft.tags);
        *slot = draft.clone();
        Some(Ok(draft))
    }

    /// Find a post by id and remove it under one exclusive lock, provided
    /// `check` accepts it. The post's like set is dropped with it.
    pub fn delete_post<E>(
        &self,
        id: &str,
        check: impl FnOnce(&Post) -> Result<(), E>,
    ) -> Option<Result<Post, E>> {
        let mut guard = self.data.write();
        let data = &mut *guard;
        let index = data.posts.iter().position(|p| p.id == id)?;
        if let Err(e) = check(&data.posts[index]) {
            return Some(Err(e));
        }
        let removed = data.posts.remove(index);
        data.likes.remove(id);
        Some(Ok(removed))
    }

    /// Append a comment to a post. An empty comment id or timestamp is
    /// filled in.
    pub fn add_comment(&self, post_id: &str, mut comment: Comment) -> Option<Post> {
        if comment.id.is_empty() {
            comment.id = self.next_timestamp_id();
        }
        if comment.created_at.is_empty() {
            comment.created_at = now_iso();
        }
        let mut data = self.data.write();
        let post = data.posts.iter_mut().find(|p| p.id == post_id)?;
        post.comments.push(comment);
        Some(post.clone())
    }

    /// Posts by one author, newest first.
    pub fn user_posts(&self, author: &str, viewer: &str) -> Vec<Post> {
        let mut out = self
            .data
            .read()
            .decorated_where(viewer, |p| p.author.id == author);
        sort_newest_first(&mut out);
        out
    }

    /// Posts by any of `authors`, optionally sharing a tag with `tags`,
    /// newest first.
    pub fn list_by_authors<A, T>(&self, authors: &[A], tags: &[T], viewer: &str) -> Vec<Post>
    where
        A: AsRef<str>,
        T: AsRef<str>,
    {
        let authors: HashSet<&str> = authors
            .iter()
            .map(|a| a.as_ref().trim())
            .filter(|a| !a.is_empty())
            .collect();
        let filter = TagFilter::new(tags);
        let mut out = self.data.read().decorated_where(viewer, |p| {
            authors.contains(p.author.id.as_str()) && filter.matches(p)
        });
        sort_newest_first(&mut out);
        out
    }

    /// Posts in one board, optionally sharing a tag with `tags`, newest
    /// first. An empty board id matches nothing.
    pub fn list_by_board<S: AsRef<str>>(&self, board_id: &str, tags: &[S], viewer: &str) -> Vec<Post> {
        if board_id.is_empty() {
            return Vec::new();
        }
        let filter = TagFilter::new(tags);
        let mut out = self.data.read().decorated_where(viewer, |p| {
            p.board_id.as_deref() == Some(board_id) && filter.matches(p)
        });
        sort_newest_first(&mut out);
        out
    }

    /// Flip `user`'s like on a post. The stored post's like fields are
    /// refreshed from the like set for `user`. `None` when the post is
    /// missing.
    pub fn toggle_like(&self, post_id: &str, user: &str) -> Option<Post> {
        let mut guard = self.data.write();
        let data = &mut *guard;
        let post = data.posts.iter_mut().find(|p| p.id == post_id)?;
        let set = data.likes.entry(post_id.to_string()).or_default();
        post.liked_by_me = set.toggle(user);
        post.like_count = set.len();
        if set.is_empty() {
            data.likes.remove(post_id);
        }
        Some(post.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{post, store};
    use super::*;
    use crate::models::UserRef;

    const NO_TAGS: &[&str] = &[];

    #[test]
    fn test_created_tags_are_normalized_and_filter_is_case_insensitive() {
        let store = store();
        let mut p = post("", "u1", "", &[]);
        p.text = "hello".to_string();
        p.tags = vec!["Flutter".to_string(), " Design ".to_string()];
        let created = store.create_post(p);

        assert!(!created.id.is_empty());
        assert!(!created.created_at.is_empty());
        assert_eq!(created.tags, vec!["flutter", "design"]);

        let found = store.list("", &["DESIGN"], "viewer");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, created.id);
        assert!(store.list("", &["kpop"], "viewer").is_empty());
    }

    #[test]
    fn test_list_sorts_newest_first() {
        let store = store();
        store.create_post(post("old", "u1", "2024-01-01T00:00:00Z", &[]));
        store.create_post(post("new", "u1", "2024-03-01T00:00:00Z", &[]));
        store.create_post(post("mid", "u1", "2024-02-01T00:00:00Z", &[]));

        let ids: Vec<String> = store.list("", NO_TAGS, "").into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_hot_orders_by_likes_then_recency() {
        let store = store();
        store.create_post(post("a", "u1", "2024-01-01T00:00:00Z", &[]));
        store.create_post(post("b", "u1", "2024-01-02T00:00:00Z", &[]));
        store.create_post(post("c", "u1", "2024-01-03T00:00:00Z", &[]));
        store.create_post(post("d", "u1", "2024-01-04T00:00:00Z", &[]));
        for user in ["x", "y"] {
            store.toggle_like("a", user);
            store.toggle_like("c", user);
        }
        store.toggle_like("b", "x");

        let hot = store.list(TAB_HOT, NO_TAGS, "x");
        let ids: Vec<&str> = hot.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b", "d"]);
        for pair in hot.windows(2) {
            assert!(pair[0].like_count >= pair[1].like_count);
            if pair[0].like_count == pair[1].like_count {
                assert!(parse_iso(&pair[0].created_at) >= parse_iso(&pair[1].created_at));
            }
        }
    }

    #[test]
    fn test_by_id_and_index_operations() {
        let store = store();
        store.create_post(post("p1", "u1", "2024-01-01T00:00:00Z", &[]));
        store.create_post(post("p2", "u1", "2024-01-02T00:00:00Z", &[]));

        assert!(store.by_id("missing").is_none());
        let (mut p1, index) = store.by_id("p1").unwrap();
        assert_eq!(index, 1);

        p1.text = "edited".to_string();
        assert!(store.update_at(index, p1).is_some());
        assert_eq!(store.by_id("p1").unwrap().0.text, "edited");
        assert!(store.update_at(9, post("x", "u1", "", &[])).is_none());

        let removed = store.delete_at(0).unwrap();
        assert_eq!(removed.id, "p2");
        assert_eq!(store.by_id("p1").unwrap().1, 0);
        assert!(store.delete_at(5).is_none());
    }

    #[test]
    fn test_update_post_rejection_leaves_post_untouched() {
        let store = store();
        store.create_post(post("p1", "owner", "2024-01-01T00:00:00Z", &["a"]));

        let rejected: Option<Result<Post, &str>> = store.update_post("p1", |p| {
            p.text = "hijacked".to_string();
            Err("forbidden")
        });
        assert_eq!(rejected, Some(Err("forbidden")));
        assert_eq!(store.by_id("p1").unwrap().0.text, "post p1");

        let updated = store
            .update_post("p1", |p| {
                p.id = "renamed".to_string();
                p.tags = vec!["  NEW ".to_string()];
                Ok::<(), ()>(())
            })
            .unwrap()
            .unwrap();
        assert_eq!(updated.id, "p1");
        assert_eq!(updated.tags, vec!["new"]);

        assert!(store.update_post("missing", |_| Ok::<(), ()>(())).is_none());
    }

    #[test]
    fn test_delete_post_drops_likes() {
        let store = store();
        store.create_post(post("p1", "owner", "2024-01-01T00:00:00Z", &[]));
        store.toggle_like("p1", "fan");

        let denied = store.delete_post("p1", |p| {
            if p.author.id == "stranger" {
                Ok(())
            } else {
                Err("not author")
            }
        });
        assert_eq!(denied.map(|r| r.is_err()), Some(true));
        assert!(store.by_id("p1").is_some());

        let removed = store.delete_post("p1", |_| Ok::<(), ()>(())).unwrap().unwrap();
        assert_eq!(removed.id, "p1");
        assert!(store.by_id("p1").is_none());

        // a new post reusing the id starts without likes
        store.create_post(post("p1", "owner", "2024-01-02T00:00:00Z", &[]));
        assert_eq!(store.list("", NO_TAGS, "fan")[0].like_count, 0);
    }

    #[test]
    fn test_add_comment_appends_in_order() {
        let store = store();
        store.create_post(post("p1", "u1", "2024-01-01T00:00:00Z", &[]));
        for text in ["first", "second"] {
            store.add_comment(
                "p1",
                Comment {
                    id: String::new(),
                    author: UserRef::new("u2", "u2"),
                    text: text.to_string(),
                    created_at: String::new(),
                },
            );
        }
        let (p, _) = store.by_id("p1").unwrap();
        let texts: Vec<&str> = p.comments.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert_ne!(p.comments[0].id, p.comments[1].id);
        assert!(store
            .add_comment("missing", p.comments[0].clone())
            .is_none());
    }

    #[test]
    fn test_toggle_like_twice_restores_state() {
        let store = store();
        store.create_post(post("p1", "u1", "2024-01-01T00:00:00Z", &[]));
        store.toggle_like("p1", "other");

        let before = store.decorate(&store.by_id("p1").unwrap().0, "me");
        let once = store.toggle_like("p1", "me").unwrap();
        assert_eq!(once.like_count, 2);
        assert!(once.liked_by_me);
        let twice = store.toggle_like("p1", "me").unwrap();
        assert_eq!(twice.like_count, before.like_count);
        assert_eq!(twice.liked_by_me, before.liked_by_me);

        assert!(store.toggle_like("missing", "me").is_none());
    }

    #[test]
    fn test_concurrent_likes_are_not_lost() {
        let store = store();
        store.create_post(post("p1", "u1", "2024-01-01T00:00:00Z", &[]));

        std::thread::scope(|s| {
            for i in 0..16 {
                let store = &store;
                s.spawn(move || {
                    store.toggle_like("p1", &format!("user{i}"));
                });
            }
        });

        let decorated = store.list("", NO_TAGS, "user3");
        assert_eq!(decorated[0].like_count, 16);
        assert!(decorated[0].liked_by_me);
    }

    #[test]
    fn test_filtered_listings_return_empty_not_absent() {
        let store = store();
        store.create_post(post("p1", "alice", "2024-01-01T00:00:00Z", &["kpop"]));
        let mut in_board = post("p2", "bob", "2024-01-02T00:00:00Z", &["trade"]);
        in_board.board_id = Some("b1".to_string());
        store.create_post(in_board);

        assert!(store.user_posts("nobody", "").is_empty());
        assert!(store.list_by_authors(NO_TAGS, NO_TAGS, "").is_empty());
        assert!(store.list_by_board("", NO_TAGS, "").is_empty());
        assert!(store.list_by_board("b404", NO_TAGS, "").is_empty());

        assert_eq!(store.user_posts("alice", "")[0].id, "p1");
        let friends = store.list_by_authors(&[" alice ", "bob"], NO_TAGS, "");
        assert_eq!(friends.len(), 2);
        assert_eq!(friends[0].id, "p2");
        let friends_kpop = store.list_by_authors(&["alice", "bob"], &["KPOP"], "");
        assert_eq!(friends_kpop.len(), 1);
        assert_eq!(store.list_by_board("b1", &["trade"], "")[0].id, "p2");
        assert!(store.list_by_board("b1", &["kpop"], "").is_empty());
    }
}
