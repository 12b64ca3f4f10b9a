//! Whole-collection JSON snapshots.
//!
//! Each collection is one indented JSON document under the data directory.
//! Saving is an explicit call made after a mutation; its failures are
//! logged and swallowed, so a crash or a disk error can lose the latest
//! changes. Files are replaced by rename, so a reader never sees a partly
//! written snapshot. Loading tolerates missing and malformed files.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{now_iso, Store};
use crate::errors::PersistenceError;
use crate::models::Document;

/// A persisted collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Posts,
    Tags,
    Friends,
    Profiles,
    Likes,
    Boards,
    Conversations,
    Messages,
}

impl Collection {
    pub const ALL: [Collection; 8] = [
        Collection::Posts,
        Collection::Tags,
        Collection::Friends,
        Collection::Profiles,
        Collection::Likes,
        Collection::Boards,
        Collection::Conversations,
        Collection::Messages,
    ];
}

impl Store {
    fn snapshot_path(&self, collection: Collection) -> &Path {
        let paths = &self.paths;
        match collection {
            Collection::Posts => &paths.posts,
            Collection::Tags => &paths.tags,
            Collection::Friends => &paths.friends,
            Collection::Profiles => &paths.profiles,
            Collection::Likes => &paths.likes,
            Collection::Boards => &paths.boards,
            Collection::Conversations => &paths.conversations,
            Collection::Messages => &paths.messages,
        }
    }

    /// Write one collection to disk. Errors are logged, never returned.
    pub fn save(&self, collection: Collection) {
        if let Err(e) = self.try_save(collection) {
            tracing::warn!(
                "Failed to save {:?} snapshot to {}: {}",
                collection,
                self.snapshot_path(collection).display(),
                e
            );
        }
    }

    /// Write several collections, one file each, in order.
    pub fn save_all(&self, collections: &[Collection]) {
        for collection in collections {
            self.save(*collection);
        }
    }

    /// Serialize under a momentary shared lock, then write with the lock
    /// released. The save guard spans both steps.
    pub(crate) fn try_save(&self, collection: Collection) -> Result<(), PersistenceError> {
        let _guard = self.save_guard.lock();
        let bytes = {
            let data = self.data.read();
            match collection {
                Collection::Posts => serde_json::to_vec_pretty(&data.posts)?,
                Collection::Tags => serde_json::to_vec_pretty(&data.tags)?,
                Collection::Friends => serde_json::to_vec_pretty(&data.friends)?,
                Collection::Profiles => serde_json::to_vec_pretty(&data.profiles)?,
                Collection::Likes => serde_json::to_vec_pretty(&data.likes)?,
                Collection::Boards => serde_json::to_vec_pretty(&data.boards)?,
                Collection::Conversations => serde_json::to_vec_pretty(&data.conversations)?,
                Collection::Messages => serde_json::to_vec_pretty(&data.messages)?,
            }
        };
        write_file(self.snapshot_path(collection), &bytes)
    }

    /// Read every snapshot and replace the matching in-memory collection.
    ///
    /// Files are read before the lock is taken. A missing file keeps the
    /// collection as it is; a malformed one is logged and skipped.
    pub fn load_all(&self) {
        let posts = self.read_tolerant(Collection::Posts);
        let tags = self.read_tolerant(Collection::Tags);
        let friends = self.read_tolerant(Collection::Friends);
        let profiles = self.read_tolerant(Collection::Profiles);
        let likes = self.read_tolerant(Collection::Likes);
        let boards = self.read_tolerant(Collection::Boards);
        let conversations = self.read_tolerant(Collection::Conversations);
        let messages = self.read_tolerant(Collection::Messages);

        let mut data = self.data.write();
        if let Some(v) = posts {
            data.posts = v;
        }
        if let Some(v) = tags {
            data.tags = v;
        }
        if let Some(v) = friends {
            data.friends = v;
        }
        if let Some(v) = profiles {
            data.profiles = v;
        }
        if let Some(v) = likes {
            data.likes = v;
        }
        if let Some(v) = boards {
            data.boards = v;
        }
        if let Some(v) = conversations {
            data.conversations = v;
        }
        if let Some(v) = messages {
            data.messages = v;
        }
        tracing::debug!(
            "Loaded snapshots: {} posts, {} profiles, {} boards, {} conversations, {} messages",
            data.posts.len(),
            data.profiles.len(),
            data.boards.len(),
            data.conversations.len(),
            data.messages.len()
        );
    }

    fn read_tolerant<T: DeserializeOwned + Default>(&self, collection: Collection) -> Option<T> {
        let path = self.snapshot_path(collection);
        match read_file(path) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Ignoring unreadable snapshot {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Store a user's library payload as `library_<user>.json`, wrapped with
    /// the user key and a timestamp. Unlike collection snapshots, failures
    /// are returned to the caller.
    pub fn save_library(&self, user: &str, payload: &Document) -> Result<PathBuf, PersistenceError> {
        #[derive(Serialize)]
        struct LibrarySnapshot<'a> {
            user_id: &'a str,
            updated_at: String,
            payload: &'a Document,
        }

        let path = self.paths.library(user);
        let bytes = serde_json::to_vec_pretty(&LibrarySnapshot {
            user_id: user,
            updated_at: now_iso(),
            payload,
        })?;
        let _guard = self.save_guard.lock();
        write_file(&path, &bytes)?;
        Ok(path)
    }
}

/// `Ok(None)` when the file does not exist. A JSON `null` reads as the
/// empty value.
fn read_file<T: DeserializeOwned + Default>(path: &Path) -> Result<Option<T>, PersistenceError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let value: Option<T> = serde_json::from_slice(&bytes)?;
    Ok(Some(value.unwrap_or_default()))
}

/// Write to a sibling `.tmp` file and rename it over `path`. Callers hold
/// the save guard, so the temporary name is never shared.
fn write_file(path: &Path, bytes: &[u8]) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, bytes)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}
