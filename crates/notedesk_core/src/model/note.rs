//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note record and the draft shape used by saves.
//! - Derive sanitized plain-text previews from rich-text content.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - `last_modified` is always stamped by the store on write; draft input
//!   never carries a timestamp.

use crate::model::user::UserId;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Stable identifier for a note record.
pub type NoteId = i64;

/// Unix epoch milliseconds.
pub type Timestamp = i64;

const PREVIEW_MAX_CHARS: usize = 160;

static MARKUP_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Canonical note record owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Stable ID allocated by the note source.
    pub id: NoteId,
    /// Owning user's directory ID.
    pub user_id: UserId,
    /// Short human title.
    pub title: String,
    /// Rich-text markup body.
    pub content: String,
    /// Write stamp in epoch milliseconds, set by the store on every save.
    pub last_modified: Timestamp,
}

impl Note {
    /// Returns a sanitized plain-text excerpt of `content` for list views.
    ///
    /// Markup tags are stripped, whitespace is collapsed and the result is
    /// capped at a fixed character budget. Returns `None` when nothing
    /// textual remains.
    pub fn plain_preview(&self) -> Option<String> {
        derive_plain_preview(&self.content)
    }
}

/// Input shape for `save_note`.
///
/// `id = None` requests creation; `id = Some` requests a full replacement
/// of the matching record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDraft {
    pub id: Option<NoteId>,
    pub user_id: UserId,
    pub title: String,
    pub content: String,
}

impl NoteDraft {
    /// Materializes this draft into a note with the given id and stamp.
    pub fn into_note(self, id: NoteId, last_modified: Timestamp) -> Note {
        Note {
            id,
            user_id: self.user_id,
            title: self.title,
            content: self.content,
            last_modified,
        }
    }
}

/// Derives a sanitized plain-text preview from rich-text markup.
pub fn derive_plain_preview(content: &str) -> Option<String> {
    let stripped = MARKUP_TAG_RE.replace_all(content, " ");
    let collapsed = WHITESPACE_RE.replace_all(stripped.as_ref(), " ");
    let trimmed = collapsed.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut preview: String = trimmed.chars().take(PREVIEW_MAX_CHARS).collect();
    if trimmed.chars().count() > PREVIEW_MAX_CHARS {
        preview.push_str("...");
    }
    Some(preview)
}
