use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use tracing::{info, warn};

use crate::session::{AuthState, Session};
use crate::storage::{MemorySessionStorage, SessionStorage};
use crate::user::User;

/// Shared handle to the single source of truth for "who is logged in".
///
/// Clones share state. Every mutation is applied under one write lock and
/// persisted before the lock is released, so readers never observe a
/// half-applied change and the stored snapshot follows the same order as
/// the in-memory one.
#[derive(Clone)]
pub struct SessionStore {
    session: Arc<RwLock<Session>>,
    storage: Arc<dyn SessionStorage>,
}

impl SessionStore {
    /// Open a store and rehydrate it from `storage` before returning.
    pub fn open<S>(storage: S) -> Self
    where
        S: SessionStorage + 'static,
    {
        Self::with_storage(Arc::new(storage))
    }

    pub fn with_storage(storage: Arc<dyn SessionStorage>) -> Self {
        let session = match storage.load() {
            Ok(Some(snapshot)) => Session::from_snapshot(&snapshot),
            Ok(None) => Session::default(),
            Err(error) => {
                warn!(%error, "unable to read persisted session, starting anonymous");
                Session::default()
            }
        };

        info!(state = ?session.state(), "session store rehydrated");

        Self {
            session: Arc::new(RwLock::new(session)),
            storage,
        }
    }

    /// Store backed by process memory only.
    pub fn in_memory() -> Self {
        Self::open(MemorySessionStorage::new())
    }

    /// Copy of the current session.
    pub fn snapshot(&self) -> Session {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.read(|session| session.access_token.clone())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read(|session| session.refresh_token.clone())
    }

    pub fn current_user(&self) -> Option<User> {
        self.read(|session| session.current_user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.read(Session::is_authenticated)
    }

    pub fn state(&self) -> AuthState {
        self.read(Session::state)
    }

    pub fn login(
        &self,
        user: User,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) {
        let access_token = access_token.into();
        let refresh_token = refresh_token.into();
        self.mutate("login", move |session| {
            session.current_user = Some(user);
            session.access_token = Some(access_token);
            session.refresh_token = Some(refresh_token);
        });
    }

    /// Replace only the token pair; the current user is left as is.
    pub fn set_tokens(&self, access_token: impl Into<String>, refresh_token: impl Into<String>) {
        let access_token = access_token.into();
        let refresh_token = refresh_token.into();
        self.mutate("set_tokens", move |session| {
            session.access_token = Some(access_token);
            session.refresh_token = Some(refresh_token);
        });
    }

    pub fn set_user(&self, user: User) {
        self.mutate("set_user", move |session| {
            session.current_user = Some(user);
        });
    }

    /// Drop tokens and user. Calling it on an anonymous store is a no-op.
    pub fn logout(&self) {
        let mut session = self.write();
        let previous = session.state();
        *session = Session::default();

        if let Err(error) = self.storage.clear() {
            warn!(%error, "failed to clear persisted session");
        }

        if previous != AuthState::Anonymous {
            info!(from = ?previous, to = ?AuthState::Anonymous, "session state changed");
        }
    }

    fn read<T>(&self, f: impl FnOnce(&Session) -> T) -> T {
        f(&self.session.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.session.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn mutate(&self, operation: &'static str, apply: impl FnOnce(&mut Session)) {
        let mut session = self.write();
        let previous = session.state();
        apply(&mut session);
        let current = session.state();

        if let Err(error) = self.storage.save(&session.to_snapshot()) {
            warn!(operation, %error, "failed to persist session");
        }

        if previous != current {
            info!(operation, from = ?previous, to = ?current, "session state changed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> User {
        User::new("u1", "ada@example.com", "Ada")
    }

    #[test]
    fn set_tokens_alone_does_not_authenticate() {
        let store = SessionStore::in_memory();
        store.set_tokens("A1", "R1");
        assert_eq!(store.state(), AuthState::Anonymous);
        assert_eq!(store.access_token().as_deref(), Some("A1"));
    }

    #[test]
    fn set_user_completes_the_transition() {
        let store = SessionStore::in_memory();
        store.set_tokens("A1", "R1");
        store.set_user(ada());
        assert_eq!(store.state(), AuthState::Authenticated);
    }

    #[test]
    fn set_tokens_keeps_the_user() {
        let store = SessionStore::in_memory();
        store.login(ada(), "A1", "R1");
        store.set_tokens("A2", "R2");
        assert_eq!(store.current_user(), Some(ada()));
        assert_eq!(store.refresh_token().as_deref(), Some("R2"));
    }

    #[test]
    fn clones_share_state() {
        let store = SessionStore::in_memory();
        let handle = store.clone();
        handle.login(ada(), "A1", "R1");
        assert!(store.is_authenticated());
        store.logout();
        assert!(!handle.is_authenticated());
    }
}
