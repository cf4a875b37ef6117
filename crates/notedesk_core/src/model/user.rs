//! User domain model.
//!
//! # Responsibility
//! - Define the immutable user record shared by session and guard logic.
//! - Define the role taxonomy used for authorization decisions.
//!
//! # Invariants
//! - `id` is stable and never reused for another user.
//! - Authorization always evaluates the *real* user's role, never an
//!   impersonated one (enforced by the session store).

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Stable identifier for a user record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type UserId = i64;

/// Authorization role attached to every user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access, including impersonation of regular users.
    Admin,
    /// Regular account limited to its own content.
    User,
}

impl Role {
    /// Stable string id used in serialized payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable user record sourced from a read-only directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable directory ID, identity of the record.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email, matched exactly by `login`.
    pub email: String,
    /// Authorization role.
    pub role: Role,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
