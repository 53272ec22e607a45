use std::fs;
use std::sync::Arc;

use pineapple_auth::{
    AuthState, FileSessionStorage, MemorySessionStorage, SessionStorage, SessionStore, User,
};
use serde_json::json;
use tempfile::TempDir;

type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

fn ada() -> User {
    User::new("u1", "ada@example.com", "Ada Lovelace")
}

#[test]
fn login_then_logout_ends_anonymous_with_everything_cleared() {
    let store = SessionStore::in_memory();

    for round in 0..3 {
        store.login(ada(), format!("A{round}"), format!("R{round}"));
        assert_eq!(store.state(), AuthState::Authenticated);

        store.logout();
        let session = store.snapshot();
        assert_eq!(session.state(), AuthState::Anonymous);
        assert!(session.access_token().is_none());
        assert!(session.refresh_token().is_none());
        assert!(session.current_user().is_none());
    }
}

#[test]
fn logout_is_idempotent() {
    let store = SessionStore::in_memory();
    store.logout();
    store.logout();
    assert_eq!(store.state(), AuthState::Anonymous);
}

#[test]
fn rehydrating_a_full_snapshot_is_authenticated() {
    let storage = MemorySessionStorage::with_snapshot(json!({
        "accessToken": "abc",
        "refreshToken": "def",
        "user": { "id": "u1", "email": "ada@example.com", "name": "Ada Lovelace" }
    }));

    let store = SessionStore::open(storage);

    assert!(store.is_authenticated());
    assert_eq!(store.access_token().as_deref(), Some("abc"));
    assert_eq!(store.refresh_token().as_deref(), Some("def"));
    assert_eq!(store.current_user(), Some(ada()));
}

#[test]
fn rehydrating_an_empty_snapshot_is_anonymous() {
    let store = SessionStore::open(MemorySessionStorage::with_snapshot(json!({})));
    assert!(!store.is_authenticated());
    assert_eq!(store.state(), AuthState::Anonymous);
}

#[test]
fn persisted_authentication_flag_is_not_trusted() {
    let store = SessionStore::open(MemorySessionStorage::with_snapshot(json!({
        "accessToken": "abc",
        "isAuthenticated": true
    })));
    assert!(!store.is_authenticated());
}

#[test]
fn malformed_tokens_require_reauthentication() {
    let store = SessionStore::open(MemorySessionStorage::with_snapshot(json!({
        "accessToken": { "value": "abc" },
        "refreshToken": "",
        "user": { "id": "u1", "email": "ada@example.com", "name": "Ada Lovelace" }
    })));

    assert_eq!(store.state(), AuthState::Anonymous);
    assert!(store.access_token().is_none());
    assert!(store.refresh_token().is_none());
}

#[test]
fn mutations_write_through_to_storage() {
    let storage = Arc::new(MemorySessionStorage::new());
    let store = SessionStore::with_storage(storage.clone());

    store.login(ada(), "A1", "R1");
    let snapshot = storage.snapshot().expect("login should persist");
    assert_eq!(snapshot["accessToken"], "A1");
    assert_eq!(snapshot["refreshToken"], "R1");
    assert_eq!(snapshot["user"]["email"], "ada@example.com");

    store.set_tokens("A2", "R2");
    let snapshot = storage.snapshot().expect("token update should persist");
    assert_eq!(snapshot["accessToken"], "A2");
    assert_eq!(snapshot["user"]["id"], "u1");

    store.logout();
    assert!(storage.snapshot().is_none());
}

#[test]
fn file_backed_session_survives_restart() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join(".pineapple/session.json");

    {
        let store = SessionStore::open(FileSessionStorage::new(&path));
        assert_eq!(store.state(), AuthState::Anonymous);
        store.login(ada().with_avatar("https://cdn.example/ada.png"), "A1", "R1");
    }

    let restarted = SessionStore::open(FileSessionStorage::new(&path));
    assert!(restarted.is_authenticated());
    assert_eq!(restarted.access_token().as_deref(), Some("A1"));
    assert_eq!(
        restarted.current_user().and_then(|user| user.avatar),
        Some("https://cdn.example/ada.png".to_string())
    );

    restarted.logout();
    assert!(!path.exists());

    let after_logout = SessionStore::open(FileSessionStorage::new(&path));
    assert_eq!(after_logout.state(), AuthState::Anonymous);
    Ok(())
}

#[test]
fn unreadable_file_starts_anonymous() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("session.json");
    fs::write(&path, "definitely not json")?;

    let storage = FileSessionStorage::new(&path);
    assert!(storage.load().is_err());

    let store = SessionStore::open(storage);
    assert_eq!(store.state(), AuthState::Anonymous);

    store.login(ada(), "A1", "R1");
    let reopened = SessionStore::open(FileSessionStorage::new(&path));
    assert!(reopened.is_authenticated());
    Ok(())
}
