//! Client-side application core for the NoteDesk notes app.
//! This crate is the single source of truth for session, notes and
//! navigation-guard invariants.

pub mod db;
pub mod guard;
pub mod logging;
pub mod model;
pub mod source;
pub mod store;

pub use guard::{admin_guard, global_guard, GuardDecision, ADMIN_HOME_PATH, LOGIN_PATH};
pub use logging::{default_log_level, init_logging};
pub use model::note::{Note, NoteDraft, NoteId, Timestamp};
pub use model::user::{Role, User, UserId};
pub use source::{
    MemoryNoteSource, MemoryUserDirectory, NoteSource, SourceError, SourceResult,
    SqliteNoteSource, UserDirectory,
};
pub use store::notes::{LatencyProfile, NotesError, NotesResult, NotesStore};
pub use store::session::{SessionError, SessionResult, SessionStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
