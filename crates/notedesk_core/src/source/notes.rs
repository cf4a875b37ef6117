//! Note source contract and in-memory implementation.
//!
//! # Responsibility
//! - Provide per-user note reads and id-allocating writes.
//! - Keep the canonical collection behind the source boundary.
//!
//! # Invariants
//! - `create_note` allocates ids from a monotonic counter, never from the
//!   clock.
//! - `update_note` is a full replacement; only `last_modified` comes from
//!   the caller's stamp.

use crate::model::note::{Note, NoteDraft, NoteId, Timestamp};
use crate::model::user::UserId;
use crate::source::{SourceError, SourceResult};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

/// Mutable collection of note records keyed by owning user.
pub trait NoteSource: Send + Sync {
    /// Returns all notes owned by `user_id`, in source order.
    fn notes_for_user(&self, user_id: UserId) -> SourceResult<Vec<Note>>;
    /// Appends a new note from the draft, allocating its id and writing the
    /// provided stamp as `last_modified`.
    fn create_note(&self, draft: &NoteDraft, stamp: Timestamp) -> SourceResult<Note>;
    /// Fully replaces the note with `id` from the draft, writing the
    /// provided stamp as `last_modified`.
    fn update_note(&self, id: NoteId, draft: &NoteDraft, stamp: Timestamp) -> SourceResult<Note>;
}

/// In-process note source over a plain vector.
///
/// This is the mock-data policy of the surrounding app: nothing survives
/// process teardown. Seed records keep their ids; new ids continue above
/// the highest seeded one.
pub struct MemoryNoteSource {
    notes: Mutex<Vec<Note>>,
    next_id: AtomicI64,
}

impl MemoryNoteSource {
    pub fn new(seed: Vec<Note>) -> Self {
        let next_id = seed.iter().map(|note| note.id).max().unwrap_or(0) + 1;
        Self {
            notes: Mutex::new(seed),
            next_id: AtomicI64::new(next_id),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    fn allocate_id(&self) -> NoteId {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn lock(&self) -> SourceResult<std::sync::MutexGuard<'_, Vec<Note>>> {
        self.notes
            .lock()
            .map_err(|_| SourceError::Unavailable("note collection lock poisoned".to_string()))
    }
}

impl NoteSource for MemoryNoteSource {
    fn notes_for_user(&self, user_id: UserId) -> SourceResult<Vec<Note>> {
        let notes = self.lock()?;
        Ok(notes
            .iter()
            .filter(|note| note.user_id == user_id)
            .cloned()
            .collect())
    }

    fn create_note(&self, draft: &NoteDraft, stamp: Timestamp) -> SourceResult<Note> {
        let note = draft.clone().into_note(self.allocate_id(), stamp);
        let mut notes = self.lock()?;
        notes.push(note.clone());
        Ok(note)
    }

    fn update_note(&self, id: NoteId, draft: &NoteDraft, stamp: Timestamp) -> SourceResult<Note> {
        let mut notes = self.lock()?;
        let slot = notes
            .iter_mut()
            .find(|note| note.id == id)
            .ok_or(SourceError::NoteNotFound(id))?;

        *slot = draft.clone().into_note(id, stamp);
        Ok(slot.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryNoteSource, NoteSource};
    use crate::model::note::NoteDraft;

    fn draft(user_id: i64, title: &str) -> NoteDraft {
        NoteDraft {
            id: None,
            user_id,
            title: title.to_string(),
            content: format!("<p>{title}</p>"),
        }
    }

    #[test]
    fn allocated_ids_are_unique_and_increasing() {
        let source = MemoryNoteSource::empty();
        let first = source.create_note(&draft(2, "first"), 10).expect("create");
        let second = source.create_note(&draft(2, "second"), 10).expect("create");
        assert!(second.id > first.id);
    }

    #[test]
    fn ids_continue_above_seeded_records() {
        let seeded = MemoryNoteSource::empty();
        let existing = seeded.create_note(&draft(3, "seed"), 5).expect("create");

        let source = MemoryNoteSource::new(seeded.notes_for_user(3).expect("list"));
        let fresh = source.create_note(&draft(3, "fresh"), 6).expect("create");
        assert!(fresh.id > existing.id);
    }
}
