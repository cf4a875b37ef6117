//! Notes store: per-user note collection with simulated source latency.
//!
//! # Responsibility
//! - Hold the fetched note collection and a loading flag.
//! - Orchestrate fetch/save against the injected note source.
//!
//! # Invariants
//! - Saves are serialized behind an async mutex; overlapping saves never
//!   interleave their read-modify-write.
//! - `last_modified` stamps are strictly increasing per store.
//! - The visible collection always mirrors the last refetch from the
//!   source, never a locally patched copy.

use crate::model::note::{Note, NoteDraft, NoteId, Timestamp};
use crate::model::user::UserId;
use crate::source::{NoteSource, SourceError};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub type NotesResult<T> = Result<T, NotesError>;

/// Notes store action errors.
#[derive(Debug)]
pub enum NotesError {
    /// Save targeted an id the source does not know.
    NoteNotFound(NoteId),
    /// Source-layer failure.
    Source(SourceError),
}

impl Display for NotesError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::Source(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NotesError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Source(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SourceError> for NotesError {
    fn from(value: SourceError) -> Self {
        match value {
            SourceError::NoteNotFound(id) => Self::NoteNotFound(id),
            other => Self::Source(other),
        }
    }
}

/// Simulated source latency for store actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyProfile {
    pub fetch: Duration,
    pub save: Duration,
}

impl LatencyProfile {
    /// Zero latency, for tests and embedded callers.
    pub fn none() -> Self {
        Self {
            fetch: Duration::ZERO,
            save: Duration::ZERO,
        }
    }
}

impl Default for LatencyProfile {
    fn default() -> Self {
        Self {
            fetch: Duration::from_millis(500),
            save: Duration::from_millis(300),
        }
    }
}

#[derive(Debug, Default)]
struct NotesState {
    notes: Vec<Note>,
    loading: bool,
}

/// Per-user notes store over an injected note source.
pub struct NotesStore {
    source: Arc<dyn NoteSource>,
    state: Mutex<NotesState>,
    // Single-writer discipline for save_note's read-modify-write + refetch.
    write_lock: tokio::sync::Mutex<()>,
    last_stamp: AtomicI64,
    latency: LatencyProfile,
}

impl NotesStore {
    pub fn new(source: Arc<dyn NoteSource>, latency: LatencyProfile) -> Self {
        Self {
            source,
            state: Mutex::new(NotesState::default()),
            write_lock: tokio::sync::Mutex::new(()),
            last_stamp: AtomicI64::new(0),
            latency,
        }
    }

    /// Replaces the store collection with exactly the source's notes for
    /// `user_id`, in source order.
    ///
    /// Suspends for the configured fetch latency. The loading flag is
    /// cleared on both success and failure.
    pub async fn fetch_notes(&self, user_id: UserId) -> NotesResult<Vec<Note>> {
        self.set_loading(true);
        tokio::time::sleep(self.latency.fetch).await;

        let result = self.refetch(user_id);
        self.set_loading(false);

        match &result {
            Ok(notes) => info!(
                "event=fetch_notes module=notes status=ok user_id={} count={}",
                user_id,
                notes.len()
            ),
            Err(err) => error!(
                "event=fetch_notes module=notes status=error user_id={} error={}",
                user_id, err
            ),
        }
        result
    }

    /// Creates or fully replaces a note, then refetches the owner's set so
    /// the visible list reflects the canonical source.
    ///
    /// With `draft.id` present the matching record is replaced and
    /// restamped; a missing match is `NoteNotFound`. With `draft.id`
    /// absent the source allocates a fresh id and appends.
    pub async fn save_note(&self, draft: &NoteDraft) -> NotesResult<Note> {
        let _guard = self.write_lock.lock().await;

        self.set_loading(true);
        tokio::time::sleep(self.latency.save).await;

        let result = self.write_and_refetch(draft);
        self.set_loading(false);

        match &result {
            Ok(note) => info!(
                "event=save_note module=notes status=ok note_id={} user_id={}",
                note.id, note.user_id
            ),
            Err(err) => error!(
                "event=save_note module=notes status=error user_id={} error={}",
                draft.user_id, err
            ),
        }
        result
    }

    /// Current collection ordered by `last_modified` descending. Ties keep
    /// source order (stable sort).
    pub fn sorted_notes(&self) -> Vec<Note> {
        let mut notes = self.lock().notes.clone();
        notes.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        notes
    }

    /// Current collection in source order.
    pub fn notes(&self) -> Vec<Note> {
        self.lock().notes.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    fn write_and_refetch(&self, draft: &NoteDraft) -> NotesResult<Note> {
        let stamp = self.next_stamp();
        let saved = match draft.id {
            Some(id) => self.source.update_note(id, draft, stamp)?,
            None => self.source.create_note(draft, stamp)?,
        };

        self.refetch(draft.user_id)?;
        Ok(saved)
    }

    fn refetch(&self, user_id: UserId) -> NotesResult<Vec<Note>> {
        let notes = self.source.notes_for_user(user_id)?;
        self.lock().notes = notes.clone();
        Ok(notes)
    }

    /// Wall-clock milliseconds, bumped to stay strictly increasing across
    /// consecutive stamps.
    fn next_stamp(&self) -> Timestamp {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as i64)
            .unwrap_or(0);

        let mut stamp = now;
        loop {
            let previous = self.last_stamp.load(Ordering::Acquire);
            if stamp <= previous {
                stamp = previous + 1;
            }
            match self.last_stamp.compare_exchange(
                previous,
                stamp,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return stamp,
                Err(_) => continue,
            }
        }
    }

    fn set_loading(&self, loading: bool) {
        self.lock().loading = loading;
    }

    fn lock(&self) -> MutexGuard<'_, NotesState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
