//! In-memory repository for the social feed.
//!
//! Every collection lives behind one reader/writer lock so cross-collection
//! reads (post + likes + profiles) always observe a single consistent state.
//! Reads take the shared lock, mutations the exclusive lock. No file I/O
//! happens while the lock is held; snapshots are serialized under a
//! momentary shared lock and written afterwards (see `snapshot`). Snapshot
//! writes are serialized with each other by a separate save guard.

mod boards;
mod dm;
mod id_set;
mod posts;
mod profiles;
mod seed;
mod snapshot;
mod social;

pub use id_set::IdSet;
pub use snapshot::Collection;

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use parking_lot::{Mutex, RwLock};

use crate::config::Paths;
use crate::models::{Board, Conversation, Message, Post, Profile};

/// All collections, guarded jointly by `Store::data`.
#[derive(Debug, Default)]
struct Collections {
    posts: Vec<Post>,
    /// user -> subscribed tags, normalized and unique
    tags: BTreeMap<String, Vec<String>>,
    /// user -> followed users
    friends: BTreeMap<String, IdSet>,
    profiles: BTreeMap<String, Profile>,
    /// post -> users who liked it
    likes: BTreeMap<String, IdSet>,
    boards: BTreeMap<String, Board>,
    conversations: BTreeMap<String, Conversation>,
    messages: BTreeMap<String, Message>,
}

/// The repository. Construct once and share behind an `Arc`.
pub struct Store {
    data: RwLock<Collections>,
    /// Held from serialization until the file is in place, so snapshots
    /// land on disk in the order they were taken.
    save_guard: Mutex<()>,
    paths: Paths,
    ids: IdGenerator,
}

impl Store {
    /// Create an empty store persisting under `paths`. Nothing is read from
    /// disk until `load_all` is called.
    pub fn new(paths: Paths) -> Self {
        Self {
            data: RwLock::new(Collections::default()),
            save_guard: Mutex::new(()),
            paths,
            ids: IdGenerator::default(),
        }
    }

    /// Create a store and load every snapshot found under `paths`.
    pub fn open(paths: Paths) -> Self {
        let store = Self::new(paths);
        store.load_all();
        store
    }

    pub fn paths(&self) -> &Paths {
        &self.paths
    }

    /// Sortable timestamp id used for posts and comments.
    pub fn next_timestamp_id(&self) -> String {
        self.ids.timestamped()
    }

    /// `prefix_<epoch nanos>` id used for boards, conversations and messages.
    pub fn next_prefixed_id(&self, prefix: &str) -> String {
        self.ids.prefixed(prefix)
    }
}

/// Time-derived ids. The nanosecond source never repeats within a process,
/// so two ids minted in the same instant still differ.
#[derive(Debug, Default)]
struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    fn next_nanos(&self) -> i64 {
        let now = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(prev + 1);
            match self
                .last
                .compare_exchange_weak(prev, candidate, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return candidate,
                Err(actual) => prev = actual,
            }
        }
    }

    fn prefixed(&self, prefix: &str) -> String {
        format!("{}_{}", prefix, self.next_nanos())
    }

    fn timestamped(&self) -> String {
        Utc.timestamp_nanos(self.next_nanos())
            .format("%Y%m%dT%H%M%S%.9f")
            .to_string()
    }
}

/// Current time as RFC 3339 with millisecond precision.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an RFC 3339 timestamp. Empty or malformed input yields the zero
/// instant, which sorts before every real timestamp.
pub fn parse_iso(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Tag normalization shared by post tags and subscriptions.
pub fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase()
}

/// Normalize, drop empties and de-duplicate, keeping first occurrence order.
pub fn normalize_tags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let t = normalize_tag(tag.as_ref());
        if !t.is_empty() && !out.contains(&t) {
            out.push(t);
        }
    }
    out
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_prefixed_ids_are_unique() {
        let ids = IdGenerator::default();
        let minted: HashSet<String> = (0..1000).map(|_| ids.prefixed("m")).collect();
        assert_eq!(minted.len(), 1000);
        assert!(minted.iter().all(|id| id.starts_with("m_")));
    }

    #[test]
    fn test_timestamped_id_format() {
        let ids = IdGenerator::default();
        let a = ids.timestamped();
        let b = ids.timestamped();
        // 20240101T120000.123456789
        assert_eq!(a.len(), 25);
        assert_eq!(&a[8..9], "T");
        assert!(a < b);
    }

    #[test]
    fn test_parse_iso_zero_on_garbage() {
        assert_eq!(parse_iso(""), DateTime::<Utc>::MIN_UTC);
        assert_eq!(parse_iso("yesterday"), DateTime::<Utc>::MIN_UTC);
        assert!(parse_iso("2024-05-01T10:00:00Z") > parse_iso("2024-05-01T09:59:59Z"));
        assert_eq!(
            parse_iso("2024-05-01T12:00:00+02:00"),
            parse_iso("2024-05-01T10:00:00Z")
        );
    }

    #[test]
    fn test_normalize_tags_dedupes() {
        assert_eq!(
            normalize_tags(&["Flutter", " Design ", "flutter", "", "  "]),
            vec!["flutter", "design"]
        );
    }
}
