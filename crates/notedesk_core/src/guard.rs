//! Route guards evaluated before a navigation completes.
//!
//! # Responsibility
//! - Decide, per navigation target, whether to allow or redirect.
//! - Read session state synchronously; never suspend, never retry.
//!
//! # Invariants
//! - Redirect targets are derived from the *real* session user, never the
//!   impersonated one.
//! - Guards produce a decision without mutating any state.

use crate::model::user::UserId;
use crate::store::session::SessionStore;
use log::debug;

/// Login page path.
pub const LOGIN_PATH: &str = "/login";
/// Admin section entry path.
pub const ADMIN_HOME_PATH: &str = "/admin";

/// Dashboard path for a regular user.
pub fn user_home_path(id: UserId) -> String {
    format!("/users/{id}")
}

/// Outcome of a guard evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Navigation proceeds to the requested target.
    Allow,
    /// Navigation is short-circuited to the given path.
    Redirect(String),
}

/// Global guard, evaluated for every navigation.
///
/// Unauthenticated sessions may only reach the login page; authenticated
/// sessions are bounced off the login page to their home.
pub fn global_guard(session: &SessionStore, target_path: &str) -> GuardDecision {
    let Some(user) = session.authenticated_user() else {
        if target_path != LOGIN_PATH {
            debug!("event=guard_global module=guard decision=redirect target={target_path} reason=unauthenticated");
            return GuardDecision::Redirect(LOGIN_PATH.to_string());
        }
        return GuardDecision::Allow;
    };

    if target_path == LOGIN_PATH {
        let home = if user.is_admin() {
            ADMIN_HOME_PATH.to_string()
        } else {
            user_home_path(user.id)
        };
        debug!("event=guard_global module=guard decision=redirect target={target_path} reason=already_authenticated");
        return GuardDecision::Redirect(home);
    }

    GuardDecision::Allow
}

/// Admin-section guard, applied only to admin routes.
///
/// The decision depends on the session alone, not on the specific admin
/// path being entered.
pub fn admin_guard(session: &SessionStore) -> GuardDecision {
    let Some(user) = session.authenticated_user() else {
        debug!("event=guard_admin module=guard decision=redirect reason=unauthenticated");
        return GuardDecision::Redirect(LOGIN_PATH.to_string());
    };

    if !user.is_admin() {
        debug!(
            "event=guard_admin module=guard decision=redirect reason=not_admin user_id={}",
            user.id
        );
        return GuardDecision::Redirect(user_home_path(user.id));
    }

    GuardDecision::Allow
}
