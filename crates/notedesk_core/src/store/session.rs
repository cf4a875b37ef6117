//! Session store: authentication and impersonation state.
//!
//! # Responsibility
//! - Hold the logged-in user and an optional impersonation overlay.
//! - Expose login/logout/impersonate actions and derived identity flags.
//!
//! # Invariants
//! - The overlay, when present, belongs to a `Role::User` target and was
//!   set while the real user held `Role::Admin`.
//! - Authorization flags (`is_admin`) always reflect the real user, never
//!   the impersonated one.
//! - Failed actions leave state unchanged.

use crate::model::user::{Role, User, UserId};
use crate::source::{SourceError, SourceResult, UserDirectory};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex, MutexGuard};

pub type SessionResult<T> = Result<T, SessionError>;

/// Session action errors.
///
/// `EmailNotFound`/`UserNotFound` are not-found conditions; `NotAdmin` and
/// `AdminTarget` are forbidden conditions.
#[derive(Debug)]
pub enum SessionError {
    /// No directory user carries this email.
    EmailNotFound(String),
    /// No directory user carries this id.
    UserNotFound(UserId),
    /// Acting user is missing or lacks the admin role.
    NotAdmin,
    /// Impersonation target holds the admin role.
    AdminTarget(UserId),
    /// Directory-layer failure.
    Source(SourceError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmailNotFound(email) => write!(f, "no user with email `{email}`"),
            Self::UserNotFound(id) => write!(f, "no user with id {id}"),
            Self::NotAdmin => write!(f, "only admins can impersonate users"),
            Self::AdminTarget(id) => write!(f, "cannot impersonate admin user {id}"),
            Self::Source(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Source(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SourceError> for SessionError {
    fn from(value: SourceError) -> Self {
        Self::Source(value)
    }
}

#[derive(Debug, Default)]
struct SessionState {
    user: Option<User>,
    impersonating: Option<User>,
}

/// Authentication and impersonation store over an injected user directory.
pub struct SessionStore {
    directory: Arc<dyn UserDirectory>,
    state: Mutex<SessionState>,
}

impl SessionStore {
    /// Creates an empty session over the given directory.
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            directory,
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Logs in by exact email match against the directory.
    ///
    /// On success the matched user becomes the session user and any active
    /// impersonation overlay is cleared. On failure state is unchanged.
    ///
    /// # Errors
    /// - `EmailNotFound` when no directory user carries `email`.
    pub async fn login(&self, email: &str) -> SessionResult<User> {
        let found = self.directory.find_by_email(email)?;
        let Some(user) = found else {
            warn!("event=login module=session status=error error_code=email_not_found");
            return Err(SessionError::EmailNotFound(email.to_string()));
        };

        let mut state = self.lock();
        state.user = Some(user.clone());
        state.impersonating = None;
        info!(
            "event=login module=session status=ok user_id={} role={}",
            user.id, user.role
        );
        Ok(user)
    }

    /// Clears both the session user and any impersonation overlay.
    pub fn logout(&self) {
        let mut state = self.lock();
        state.user = None;
        state.impersonating = None;
        info!("event=logout module=session status=ok");
    }

    /// Starts impersonating the regular user with `target_id`.
    ///
    /// # Errors
    /// - `NotAdmin` when the real session user is missing or not an admin.
    /// - `UserNotFound` when `target_id` is not in the directory.
    /// - `AdminTarget` when the target holds the admin role.
    pub fn impersonate(&self, target_id: UserId) -> SessionResult<User> {
        if !self.is_admin() {
            warn!(
                "event=impersonate module=session status=error target_id={} error_code=not_admin",
                target_id
            );
            return Err(SessionError::NotAdmin);
        }

        let found = self.directory.find_by_id(target_id)?;
        let Some(target) = found else {
            warn!(
                "event=impersonate module=session status=error target_id={} error_code=user_not_found",
                target_id
            );
            return Err(SessionError::UserNotFound(target_id));
        };

        if target.role == Role::Admin {
            warn!(
                "event=impersonate module=session status=error target_id={} error_code=admin_target",
                target_id
            );
            return Err(SessionError::AdminTarget(target_id));
        }

        let mut state = self.lock();
        // The session may have changed during the directory lookup; the
        // overlay is only ever written under an admin real user, so the
        // role is re-checked under the same guard that writes it.
        if !state.user.as_ref().is_some_and(|user| user.is_admin()) {
            warn!(
                "event=impersonate module=session status=error target_id={} error_code=not_admin",
                target_id
            );
            return Err(SessionError::NotAdmin);
        }
        state.impersonating = Some(target.clone());
        info!(
            "event=impersonate module=session status=ok target_id={}",
            target_id
        );
        Ok(target)
    }

    /// Clears the impersonation overlay, active or not.
    pub fn stop_impersonating(&self) {
        let mut state = self.lock();
        state.impersonating = None;
        info!("event=stop_impersonating module=session status=ok");
    }

    /// Effective identity: the impersonated user if present, else the
    /// session user.
    pub fn current_user(&self) -> Option<User> {
        let state = self.lock();
        state.impersonating.clone().or_else(|| state.user.clone())
    }

    /// The real session user, ignoring any impersonation overlay.
    pub fn authenticated_user(&self) -> Option<User> {
        self.lock().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().user.is_some()
    }

    /// Whether the *real* session user is an admin. Impersonation never
    /// changes this.
    pub fn is_admin(&self) -> bool {
        self.lock()
            .user
            .as_ref()
            .is_some_and(|user| user.is_admin())
    }

    pub fn is_impersonating(&self) -> bool {
        self.lock().impersonating.is_some()
    }

    /// All directory users with the regular role, independent of session
    /// state. Feeds admin-facing impersonation pickers.
    pub fn regular_users(&self) -> SourceResult<Vec<User>> {
        self.directory.users_with_role(Role::User)
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
