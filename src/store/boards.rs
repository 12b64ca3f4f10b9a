//! Discussion boards.
//!
//! The store does not check ownership. Callers edit through `update_board`
//! and check `Board::owner_id` inside the edit, under the same lock.

use std::cmp::Reverse;

use super::{parse_iso, Store};
use crate::models::Board;

impl Store {
    /// Boards visible to `viewer`: not deleted, and either public or owned
    /// by the viewer. Newest first.
    pub fn list_boards_for(&self, viewer: &str) -> Vec<Board> {
        let mut out: Vec<Board> = self
            .data
            .read()
            .boards
            .values()
            .filter(|b| b.visible_to(viewer))
            .cloned()
            .collect();
        out.sort_by_cached_key(|b| Reverse(parse_iso(&b.created_at)));
        out
    }

    pub fn board(&self, id: &str) -> Option<Board> {
        self.data.read().boards.get(id).cloned()
    }

    /// Insert or fully replace a board, assigning a `b_` id when empty.
    pub fn save_board(&self, mut board: Board) -> Board {
        if board.id.is_empty() {
            board.id = self.next_prefixed_id("b");
        }
        self.data
            .write()
            .boards
            .insert(board.id.clone(), board.clone());
        board
    }

    /// Find a board by id and edit it under one exclusive lock.
    ///
    /// `edit` works on a copy that is stored only when it returns `Ok`. The
    /// id cannot be changed. Returns `None` when no board has this id.
    pub fn update_board<E>(
        &self,
        id: &str,
        edit: impl FnOnce(&mut Board) -> Result<(), E>,
    ) -> Option<Result<Board, E>> {
        let mut data = self.data.write();
        let slot = data.boards.get_mut(id)?;
        let mut draft = slot.clone();
        if let Err(e) = edit(&mut draft) {
            return Some(Err(e));
        }
        draft.id = slot.id.clone();
        *slot = draft.clone();
        Some(Ok(draft))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::store;
    use super::*;

    fn board(id: &str, owner: &str, created_at: &str, private: bool) -> Board {
        Board {
            id: id.to_string(),
            name: format!("board {id}"),
            owner_id: owner.to_string(),
            created_at: created_at.to_string(),
            is_private: private,
            ..Default::default()
        }
    }

    #[test]
    fn test_save_board_assigns_id_and_round_trips() {
        let store = store();
        let saved = store.save_board(Board {
            name: "x".to_string(),
            ..Default::default()
        });
        assert!(saved.id.starts_with("b_"));
        assert_eq!(store.board(&saved.id), Some(saved));
    }

    #[test]
    fn test_save_board_overwrites_whole_record() {
        let store = store();
        let mut b = board("b1", "owner", "2024-01-01T00:00:00Z", false);
        b.description = "first".to_string();
        store.save_board(b);

        let replacement = board("b1", "owner", "2024-01-01T00:00:00Z", true);
        store.save_board(replacement.clone());
        assert_eq!(store.board("b1"), Some(replacement));
    }

    #[test]
    fn test_update_board_keeps_id_and_applies_edit() {
        let store = store();
        store.save_board(board("b1", "alice", "2024-01-01T00:00:00Z", false));

        let updated = store
            .update_board("b1", |b| {
                b.id = "hijacked".to_string();
                b.name = "renamed".to_string();
                Ok::<(), ()>(())
            })
            .unwrap()
            .unwrap();
        assert_eq!(updated.id, "b1");
        assert_eq!(store.board("b1").unwrap().name, "renamed");
        assert!(store.board("hijacked").is_none());
        assert!(store.update_board("missing", |_| Ok::<(), ()>(())).is_none());
    }

    #[test]
    fn test_update_board_rejected_edit_leaves_board_untouched() {
        let store = store();
        let original = board("b1", "alice", "2024-01-01T00:00:00Z", false);
        store.save_board(original.clone());

        let result = store.update_board("b1", |b| {
            b.deleted = true;
            if b.owner_id != "mallory" {
                return Err("not the owner");
            }
            Ok(())
        });
        assert_eq!(result, Some(Err("not the owner")));
        assert_eq!(store.board("b1"), Some(original));
    }

    #[test]
    fn test_list_hides_deleted_and_foreign_private_boards() {
        let store = store();
        store.save_board(board("public", "alice", "2024-01-01T00:00:00Z", false));
        store.save_board(board("mine", "bob", "2024-01-03T00:00:00Z", true));
        store.save_board(board("theirs", "alice", "2024-01-04T00:00:00Z", true));
        let mut gone = board("gone", "bob", "2024-01-05T00:00:00Z", false);
        gone.deleted = true;
        store.save_board(gone);

        let ids: Vec<String> = store
            .list_boards_for("bob")
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec!["mine", "public"]);

        let for_alice: Vec<String> = store
            .list_boards_for("alice")
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(for_alice, vec!["theirs", "public"]);
    }
}
