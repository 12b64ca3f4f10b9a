//! First-run demonstration data.

use chrono::{Duration, SecondsFormat, Utc};

use super::{Collection, Store};
use crate::models::{Post, Profile, UserRef};

/// Gap between consecutive demo posts, so the feed order is p6 down to p1.
const DEMO_POST_SPACING_MINUTES: i64 = 1;

const DEMO_POSTS: [(&str, &str, &str, &[&str]); 6] = [
    (
        "p1",
        "demo_bob",
        "Fixed the rounded corners on the feed cards today. My own photocards look great laid out in them.",
        &["flutter", "design", "devlog"],
    ),
    (
        "p2",
        "demo_alice",
        "Hi! My first post here. I want to keep track of my K-pop photocard collection.",
        &["hello", "kpop", "photocard"],
    ),
    (
        "p3",
        "demo_alice",
        "Entered every card from the new LE SSERAFIM album into the app.\nMy idol room is finally taking shape!",
        &["kpop", "lesserafim", "collection", "idol-room"],
    ),
    (
        "p4",
        "demo_bob",
        "Anyone want to trade? I have a pile of duplicates.\nThinking about a dedicated trading corner so people can match up.",
        &["trade", "photocard", "feature-idea"],
    ),
    (
        "p5",
        "demo_alice",
        "Photographed every album cover on my shelf for the album wall.\nScrolling through it feels like a tiny private exhibition.",
        &["album", "shelf", "collection", "design"],
    ),
    (
        "p6",
        "demo_bob",
        "Idea for an idol space page:\nstage photo in the background, cards, albums and light sticks up front,\nplus your posts, all on one profile.",
        &["idea", "idol-space", "kpop", "ui"],
    ),
];

impl Store {
    /// Insert the demo posts when there are no posts at all, and the two demo
    /// profiles when they are missing. Each touched collection is saved.
    pub fn seed_if_empty(&self) {
        let (empty, has_alice, has_bob) = {
            let data = self.data.read();
            (
                data.posts.is_empty(),
                data.profiles.contains_key("demo_alice"),
                data.profiles.contains_key("demo_bob"),
            )
        };

        if empty {
            let now = Utc::now();
            let count = DEMO_POSTS.len() as i64;
            for (i, (id, author, text, tags)) in DEMO_POSTS.into_iter().enumerate() {
                let age = Duration::minutes((count - 1 - i as i64) * DEMO_POST_SPACING_MINUTES);
                self.create_post(Post {
                    id: id.to_string(),
                    author: UserRef::new(author, ""),
                    text: text.to_string(),
                    created_at: (now - age).to_rfc3339_opts(SecondsFormat::Millis, true),
                    tags: tags.iter().map(|t| t.to_string()).collect(),
                    ..Default::default()
                });
            }
            self.save(Collection::Posts);
            tracing::info!("Seeded {} demo posts", DEMO_POSTS.len());
        }

        if !has_alice {
            self.upsert_profile(Profile {
                id: "demo_alice".to_string(),
                name: "Alice".to_string(),
                nickname: Some("Alice".to_string()),
                ..Default::default()
            });
        }
        if !has_bob {
            self.upsert_profile(Profile {
                id: "demo_bob".to_string(),
                name: "Bob".to_string(),
                nickname: Some("Bob".to_string()),
                instagram: Some("@bob_dev".to_string()),
                show_instagram: true,
                ..Default::default()
            });
        }
        if !has_alice || !has_bob {
            self.save(Collection::Profiles);
        }
    }
}
