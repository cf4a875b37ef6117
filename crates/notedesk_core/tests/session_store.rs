use notedesk_core::{
    MemoryUserDirectory, Role, SessionError, SessionStore, SourceResult, User, UserDirectory,
    UserId,
};
use std::sync::{Arc, Mutex};

fn directory_users() -> Vec<User> {
    vec![
        User {
            id: 1,
            name: "Admin User".to_string(),
            email: "admin@example.com".to_string(),
            role: Role::Admin,
        },
        User {
            id: 2,
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            role: Role::User,
        },
        User {
            id: 3,
            name: "Bob".to_string(),
            email: "bob@example.com".to_string(),
            role: Role::User,
        },
        User {
            id: 5,
            name: "Second Admin".to_string(),
            email: "root@example.com".to_string(),
            role: Role::Admin,
        },
    ]
}

fn store() -> SessionStore {
    SessionStore::new(Arc::new(MemoryUserDirectory::new(directory_users())))
}

#[tokio::test]
async fn login_with_known_email_sets_session_user() {
    let session = store();

    let user = session
        .login("admin@example.com")
        .await
        .expect("admin login succeeds");
    assert_eq!(user.id, 1);
    assert_eq!(user.role, Role::Admin);
    assert!(session.is_authenticated());
    assert!(session.is_admin());
    assert_eq!(session.current_user().map(|u| u.id), Some(1));
}

#[tokio::test]
async fn login_with_unknown_email_fails_and_leaves_state_unchanged() {
    let session = store();

    let err = session
        .login("nobody@x.com")
        .await
        .expect_err("unknown email must fail");
    assert!(matches!(err, SessionError::EmailNotFound(email) if email == "nobody@x.com"));
    assert!(!session.is_authenticated());
    assert!(session.current_user().is_none());
}

#[tokio::test]
async fn logout_clears_user_and_impersonation() {
    let session = store();
    session.login("admin@example.com").await.expect("login");
    session.impersonate(2).expect("impersonation");

    session.logout();

    assert!(!session.is_authenticated());
    assert!(!session.is_impersonating());
    assert!(session.current_user().is_none());
}

#[tokio::test]
async fn admin_impersonates_regular_user() {
    let session = store();
    session.login("admin@example.com").await.expect("login");

    let target = session.impersonate(3).expect("impersonation succeeds");
    assert_eq!(target.id, 3);

    // Effective identity switches; authorization does not.
    assert!(session.is_impersonating());
    assert_eq!(session.current_user().map(|u| u.id), Some(3));
    assert_eq!(session.authenticated_user().map(|u| u.id), Some(1));
    assert!(session.is_admin());
}

#[tokio::test]
async fn regular_user_cannot_impersonate() {
    let session = store();
    session.login("alice@example.com").await.expect("login");

    let err = session.impersonate(3).expect_err("non-admin must be rejected");
    assert!(matches!(err, SessionError::NotAdmin));
    assert!(!session.is_impersonating());
}

#[tokio::test]
async fn unauthenticated_session_cannot_impersonate() {
    let session = store();

    let err = session.impersonate(2).expect_err("empty session must be rejected");
    assert!(matches!(err, SessionError::NotAdmin));
    assert!(!session.is_impersonating());
}

#[tokio::test]
async fn impersonating_an_admin_is_rejected() {
    let session = store();
    session.login("admin@example.com").await.expect("login");

    let err = session.impersonate(5).expect_err("admin target must be rejected");
    assert!(matches!(err, SessionError::AdminTarget(5)));
    assert!(!session.is_impersonating());
}

#[tokio::test]
async fn impersonating_unknown_user_is_rejected() {
    let session = store();
    session.login("admin@example.com").await.expect("login");

    let err = session.impersonate(99).expect_err("unknown target must fail");
    assert!(matches!(err, SessionError::UserNotFound(99)));
    assert!(!session.is_impersonating());
}

#[tokio::test]
async fn stop_impersonating_restores_admin_context_and_is_idempotent() {
    let session = store();
    session.login("admin@example.com").await.expect("login");
    session.impersonate(2).expect("impersonation");

    session.stop_impersonating();
    assert!(!session.is_impersonating());
    assert_eq!(session.current_user().map(|u| u.id), Some(1));

    // No-op when no overlay is active.
    session.stop_impersonating();
    assert!(!session.is_impersonating());
}

#[tokio::test]
async fn login_clears_active_impersonation() {
    let session = store();
    session.login("admin@example.com").await.expect("login");
    session.impersonate(2).expect("impersonation");

    session.login("bob@example.com").await.expect("login");

    assert!(!session.is_impersonating());
    assert_eq!(session.current_user().map(|u| u.id), Some(3));
    assert!(!session.is_admin());
}

/// Directory that logs the session out while a target lookup is in
/// flight, exercising actions racing `impersonate` between its role check
/// and its overlay write.
struct LogoutDuringLookupDirectory {
    inner: MemoryUserDirectory,
    session: Mutex<Option<Arc<SessionStore>>>,
}

impl LogoutDuringLookupDirectory {
    fn new(users: Vec<User>) -> Self {
        Self {
            inner: MemoryUserDirectory::new(users),
            session: Mutex::new(None),
        }
    }

    fn attach(&self, session: Arc<SessionStore>) {
        *self.session.lock().expect("fixture lock") = Some(session);
    }
}

impl UserDirectory for LogoutDuringLookupDirectory {
    fn find_by_email(&self, email: &str) -> SourceResult<Option<User>> {
        self.inner.find_by_email(email)
    }

    fn find_by_id(&self, id: UserId) -> SourceResult<Option<User>> {
        if let Some(session) = self.session.lock().expect("fixture lock").as_ref() {
            session.logout();
        }
        self.inner.find_by_id(id)
    }

    fn users_with_role(&self, role: Role) -> SourceResult<Vec<User>> {
        self.inner.users_with_role(role)
    }
}

#[tokio::test]
async fn logout_during_target_lookup_leaves_no_impersonation_overlay() {
    let directory = Arc::new(LogoutDuringLookupDirectory::new(directory_users()));
    let directory_dyn: Arc<dyn UserDirectory> = directory.clone();
    let session = Arc::new(SessionStore::new(directory_dyn));
    session.login("admin@example.com").await.expect("login");
    directory.attach(Arc::clone(&session));

    let err = session
        .impersonate(2)
        .expect_err("cleared session must not gain an overlay");
    assert!(matches!(err, SessionError::NotAdmin));

    // Logout stays terminal: no user, no overlay.
    assert!(!session.is_authenticated());
    assert!(!session.is_impersonating());
    assert!(session.current_user().is_none());
}

#[tokio::test]
async fn regular_users_lists_only_the_regular_role() {
    let session = store();

    let regulars = session.regular_users().expect("directory listing");
    let ids: Vec<i64> = regulars.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![2, 3]);

    // Independent of session state.
    session.login("alice@example.com").await.expect("login");
    assert_eq!(session.regular_users().expect("directory listing").len(), 2);
}
