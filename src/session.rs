// Explicit session context for authenticated-user state.
//
// The authenticated user is carried in a context object handed to whoever
// needs it, never in ambient global state. The auth gate in the UI observes
// the same watch channel the controllers use, so "logged in" and "fetching as
// whom" cannot drift apart.

use tokio::sync::watch;
use tracing::info;

use crate::models::User;

// ---------------------------------------------------------------------------
// Auth status
// ---------------------------------------------------------------------------

/// Authentication state of the session.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AuthStatus {
    /// Not yet determined (startup, before the first `me` probe resolves).
    #[default]
    Unknown,
    /// A user is logged in.
    Authenticated(User),
    /// Determined to be logged out.
    Anonymous,
}

impl AuthStatus {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthStatus::Authenticated(_))
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Observable session context.
pub struct Session {
    status: watch::Sender<AuthStatus>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(AuthStatus::Unknown);
        Session { status: tx }
    }

    /// Record a successful login or `me` probe.
    pub fn set_authenticated(&self, user: User) {
        info!(username = %user.username, "session authenticated");
        self.status.send_replace(AuthStatus::Authenticated(user));
    }

    /// Record a logout or a rejected `me` probe.
    pub fn clear(&self) {
        info!("session cleared");
        self.status.send_replace(AuthStatus::Anonymous);
    }

    /// Snapshot of the current status.
    pub fn status(&self) -> AuthStatus {
        self.status.borrow().clone()
    }

    /// The logged-in user, when there is one.
    pub fn current_user(&self) -> Option<User> {
        match &*self.status.borrow() {
            AuthStatus::Authenticated(user) => Some(user.clone()),
            _ => None,
        }
    }

    /// Subscribe to status changes.
    pub fn subscribe(&self) -> watch::Receiver<AuthStatus> {
        self.status.subscribe()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User {
            id: 1,
            username: "red".into(),
            email: None,
            role: Some("ADMIN".into()),
            created_at: None,
        }
    }

    #[test]
    fn starts_unknown() {
        let session = Session::new();
        assert_eq!(session.status(), AuthStatus::Unknown);
        assert!(session.current_user().is_none());
    }

    #[test]
    fn login_then_logout() {
        let session = Session::new();
        session.set_authenticated(test_user());
        assert!(session.status().is_authenticated());
        assert_eq!(session.current_user().unwrap().username, "red");

        session.clear();
        assert_eq!(session.status(), AuthStatus::Anonymous);
        assert!(session.current_user().is_none());
    }

    #[tokio::test]
    async fn subscribers_observe_transitions() {
        let session = Session::new();
        let mut rx = session.subscribe();

        session.set_authenticated(test_user());
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_authenticated());

        session.clear();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), AuthStatus::Anonymous);
    }
}
