//! # Pineapple Auth
//!
//! Client-side session state: who is logged in, with which token pair, and
//! how that survives a restart.
//!
//! The [`SessionStore`] is an explicit handle. Create one per process (or per
//! test), hand clones of it to whatever issues requests, and mutate it only
//! through its methods.
//!
//! ```
//! use pineapple_auth::{AuthState, SessionStore, User};
//!
//! let store = SessionStore::in_memory();
//! assert_eq!(store.state(), AuthState::Anonymous);
//!
//! let user = User::new("u1", "ada@example.com", "Ada");
//! store.login(user, "A1", "R1");
//! assert!(store.is_authenticated());
//! assert_eq!(store.access_token().as_deref(), Some("A1"));
//!
//! store.logout();
//! assert_eq!(store.state(), AuthState::Anonymous);
//! ```

pub mod error;
pub mod session;
pub mod storage;
pub mod store;
pub mod user;

pub use error::{SessionError, SessionResult};
pub use session::{is_well_formed_token, AuthState, Session};
pub use storage::{FileSessionStorage, MemorySessionStorage, SessionStorage};
pub use store::SessionStore;
pub use user::User;
