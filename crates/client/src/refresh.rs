//! Exchanging the refresh token for a new pair, one exchange at a time.

use pineapple_auth::{is_well_formed_token, SessionStore};
use reqwest::StatusCode;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::entities::TokenPair;
use crate::error::ClientError;
use crate::request::{ApiRequest, PreparedRequest};
use crate::transport::Transport;
use crate::types::RefreshRequest;

pub const REFRESH_PATH: &str = "/auth/refresh";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// This caller exchanged the refresh token.
    Refreshed,
    /// Another caller refreshed while this one waited; the store already
    /// holds a newer access token.
    AlreadyRefreshed,
}

/// Why a refresh did not produce a usable token pair. Never shown to the
/// caller of the original request, which gets its original 401 instead.
#[derive(Debug, Error)]
pub enum RefreshFailure {
    #[error("no refresh token is available")]
    NoRefreshToken,
    #[error("refresh request could not be sent: {0}")]
    Unreachable(#[source] ClientError),
    #[error("refresh rejected with status {0}")]
    Rejected(StatusCode),
    #[error("refresh response is malformed: {0}")]
    Malformed(String),
    /// The session was cleared while this caller waited, typically by a
    /// concurrent refresh that failed. Teardown has already happened.
    #[error("session ended while waiting for a refresh")]
    SessionEnded,
}

impl RefreshFailure {
    /// Whether the caller still has to clear the session and report expiry.
    pub fn needs_teardown(&self) -> bool {
        !matches!(self, RefreshFailure::SessionEnded)
    }
}

/// Serialises refresh attempts so concurrent 401s share one exchange.
#[derive(Debug, Default)]
pub struct TokenRefresher {
    gate: Mutex<()>,
}

impl TokenRefresher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure the store holds an access token newer than `stale`.
    ///
    /// `stale` is the token the failed request was sent with. Once the gate
    /// is held, a store token that differs from it means someone else has
    /// already refreshed and no further call is made. A store emptied since
    /// the request went out reports [`RefreshFailure::SessionEnded`].
    pub async fn refresh(
        &self,
        transport: &dyn Transport,
        store: &SessionStore,
        stale: Option<&str>,
    ) -> Result<RefreshOutcome, RefreshFailure> {
        let _gate = self.gate.lock().await;

        match (store.access_token(), stale) {
            (Some(current), stale) if stale != Some(current.as_str()) => {
                debug!("access token was refreshed by a concurrent request");
                return Ok(RefreshOutcome::AlreadyRefreshed);
            }
            (None, Some(_)) => {
                debug!("session was cleared while waiting to refresh");
                return Err(RefreshFailure::SessionEnded);
            }
            _ => {}
        }

        let refresh_token = store.refresh_token().ok_or(RefreshFailure::NoRefreshToken)?;

        let request = ApiRequest::post(REFRESH_PATH)
            .json(&RefreshRequest { refresh_token })
            .map_err(RefreshFailure::Unreachable)?
            .without_auth_recovery();

        debug!("exchanging refresh token");
        let response = transport
            .send(&PreparedRequest::unauthenticated(request))
            .await
            .map_err(RefreshFailure::Unreachable)?;

        if !response.status().is_success() {
            warn!(status = response.status().as_u16(), "refresh token rejected");
            return Err(RefreshFailure::Rejected(response.status()));
        }

        let pair: TokenPair = response
            .json()
            .map_err(|error| RefreshFailure::Malformed(error.to_string()))?;

        if !is_well_formed_token(&pair.access_token) || !is_well_formed_token(&pair.refresh_token) {
            return Err(RefreshFailure::Malformed(
                "token pair contains an empty or invalid token".to_owned(),
            ));
        }

        store.set_tokens(pair.access_token, pair.refresh_token);
        info!("access token refreshed");
        Ok(RefreshOutcome::Refreshed)
    }
}
