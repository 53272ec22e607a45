//! # Pineapple Client
//!
//! Typed, authenticated access to the Pineapple Wallet REST API.
//!
//! Every call goes through one pipeline:
//!
//! 1. [`attach_auth`] reads the current access token from the
//!    [`SessionStore`](pineapple_auth::SessionStore) and attaches it as a
//!    bearer credential.
//! 2. A [`Transport`] sends the request ([`HttpTransport`] in production).
//! 3. On a 401 the pipeline exchanges the refresh token once, updates the
//!    store and replays the request. If the exchange fails the session is
//!    cleared, the [`SessionExpiryHandler`] is told, and the caller gets the
//!    original 401.
//!
//! Concurrent 401s share a single refresh exchange.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use pineapple_auth::SessionStore;
//! use pineapple_client::{LogSessionExpiry, PineappleClient};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = pineapple_config::load()?;
//! let store = SessionStore::in_memory();
//! let client = PineappleClient::from_config(&config, store, Arc::new(LogSessionExpiry))?;
//!
//! client.login("ada@example.com", "correct horse").await?;
//! let net_worth = client.currency().net_worth(Some("EUR")).await?;
//! println!("{} {}", net_worth.total_net_worth, net_worth.currency);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod entities;
pub mod error;
mod flows;
pub mod pipeline;
pub mod refresh;
pub mod request;
pub mod transport;
pub mod types;

pub use client::PineappleClient;
pub use error::{ClientError, ClientResult};
pub use pipeline::{AuthPipeline, LogSessionExpiry, SessionExpiryHandler};
pub use refresh::{RefreshOutcome, TokenRefresher};
pub use request::{attach_auth, ApiRequest, PreparedRequest, RawResponse, RequestContext};
pub use transport::{HttpTransport, Transport};
