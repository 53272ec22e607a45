//! The session value and its persisted snapshot form.

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::user::User;

/// Coarse authentication state derived from a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticated,
}

/// Tokens plus the current user.
///
/// Fields are only writable from inside this crate, so the derived
/// authentication flag can never disagree with them.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub(crate) access_token: Option<String>,
    pub(crate) refresh_token: Option<String>,
    pub(crate) current_user: Option<User>,
}

impl Session {
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    /// True iff both tokens and the user are present.
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some() && self.refresh_token.is_some() && self.current_user.is_some()
    }

    pub fn state(&self) -> AuthState {
        if self.is_authenticated() {
            AuthState::Authenticated
        } else {
            AuthState::Anonymous
        }
    }

    pub(crate) fn to_snapshot(&self) -> Value {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Snapshot<'a> {
            access_token: Option<&'a str>,
            refresh_token: Option<&'a str>,
            user: Option<&'a User>,
        }

        let snapshot = Snapshot {
            access_token: self.access_token(),
            refresh_token: self.refresh_token(),
            user: self.current_user(),
        };

        // Serialising borrowed strings and a plain struct cannot fail.
        serde_json::to_value(snapshot).unwrap_or(Value::Null)
    }

    /// Rebuild a session from whatever was persisted.
    ///
    /// Anything malformed is dropped rather than trusted: a token that is not
    /// a usable header value or a user of the wrong shape comes back absent.
    pub(crate) fn from_snapshot(snapshot: &Value) -> Self {
        let Some(fields) = snapshot.as_object() else {
            if !snapshot.is_null() {
                warn!("persisted session is not an object, starting anonymous");
            }
            return Self::default();
        };

        let token = |key: &str| -> Option<String> {
            match fields.get(key) {
                None | Some(Value::Null) => None,
                Some(Value::String(token)) if is_well_formed_token(token) => Some(token.clone()),
                Some(_) => {
                    warn!(field = key, "discarding malformed persisted token");
                    None
                }
            }
        };

        let current_user = match fields.get("user") {
            None | Some(Value::Null) => None,
            Some(raw) => match serde_json::from_value::<User>(raw.clone()) {
                Ok(user) => Some(user),
                Err(error) => {
                    warn!(%error, "discarding malformed persisted user");
                    None
                }
            },
        };

        Self {
            access_token: token("accessToken"),
            refresh_token: token("refreshToken"),
            current_user,
        }
    }
}

// Tokens stay out of logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("current_user", &self.current_user)
            .finish()
    }
}

/// Whether `token` can be sent as a bearer credential as-is.
///
/// Tokens are opaque; the only requirement is a non-empty run of visible
/// ASCII characters.
pub fn is_well_formed_token(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|byte| byte.is_ascii_graphic())
}
