//! User directory contract and in-memory implementation.
//!
//! # Responsibility
//! - Provide read-only user lookup by email, id and role.
//! - Keep directory contents injected, never baked into the crate.
//!
//! # Invariants
//! - Directory records are immutable for the lifetime of the source.
//! - Email matching is exact, no normalization.

use crate::model::user::{Role, User, UserId};
use crate::source::SourceResult;

/// Read-only directory of known users.
pub trait UserDirectory: Send + Sync {
    /// Finds one user by exact email match.
    fn find_by_email(&self, email: &str) -> SourceResult<Option<User>>;
    /// Finds one user by stable id.
    fn find_by_id(&self, id: UserId) -> SourceResult<Option<User>>;
    /// Lists all users carrying the given role, in directory order.
    fn users_with_role(&self, role: Role) -> SourceResult<Vec<User>>;
}

/// Directory over an injected, fixed list of users.
pub struct MemoryUserDirectory {
    users: Vec<User>,
}

impl MemoryUserDirectory {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }
}

impl UserDirectory for MemoryUserDirectory {
    fn find_by_email(&self, email: &str) -> SourceResult<Option<User>> {
        Ok(self.users.iter().find(|user| user.email == email).cloned())
    }

    fn find_by_id(&self, id: UserId) -> SourceResult<Option<User>> {
        Ok(self.users.iter().find(|user| user.id == id).cloned())
    }

    fn users_with_role(&self, role: Role) -> SourceResult<Vec<User>> {
        Ok(self
            .users
            .iter()
            .filter(|user| user.role == role)
            .cloned()
            .collect())
    }
}
