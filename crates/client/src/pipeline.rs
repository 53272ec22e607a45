//! The authenticated request pipeline:
//! `attach_auth -> transport -> handle_auth_failure`.

use std::sync::Arc;

use pineapple_auth::SessionStore;
use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::error::ClientResult;
use crate::refresh::TokenRefresher;
use crate::request::{attach_auth, ApiRequest, PreparedRequest, RawResponse, RequestContext};
use crate::transport::Transport;

/// Called after an unrecoverable credential failure has cleared the session,
/// to send the user back to sign-in.
pub trait SessionExpiryHandler: Send + Sync {
    fn session_expired(&self);
}

impl<F> SessionExpiryHandler for F
where
    F: Fn() + Send + Sync,
{
    fn session_expired(&self) {
        self()
    }
}

/// Default handler: note the expiry in the log and nothing else.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSessionExpiry;

impl SessionExpiryHandler for LogSessionExpiry {
    fn session_expired(&self) {
        warn!("session expired, sign in again");
    }
}

pub struct AuthPipeline {
    transport: Arc<dyn Transport>,
    store: SessionStore,
    refresher: TokenRefresher,
    on_expired: Arc<dyn SessionExpiryHandler>,
}

impl AuthPipeline {
    pub fn new(transport: Arc<dyn Transport>, store: SessionStore) -> Self {
        Self {
            transport,
            store,
            refresher: TokenRefresher::new(),
            on_expired: Arc::new(LogSessionExpiry),
        }
    }

    pub fn with_expiry_handler(mut self, handler: Arc<dyn SessionExpiryHandler>) -> Self {
        self.on_expired = handler;
        self
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Send `request`, recovering once from an expired access token.
    ///
    /// Non-success statuses come back as [`ClientError::Http`](crate::ClientError::Http).
    pub async fn send(&self, request: ApiRequest) -> ClientResult<RawResponse> {
        let context = RequestContext::new(request);
        let prepared = attach_auth(&context, &self.store);
        let response = self.transport.send(&prepared).await?;
        self.handle_auth_failure(&context, &prepared, response).await
    }

    async fn handle_auth_failure(
        &self,
        context: &RequestContext,
        prepared: &PreparedRequest,
        response: RawResponse,
    ) -> ClientResult<RawResponse> {
        if response.status() != StatusCode::UNAUTHORIZED {
            return response.into_result();
        }

        let unauthorized = response.into_error();
        let path = context.request().path();

        if context.retried() || !context.request().recovers_auth() {
            debug!(path, retried = context.retried(), "passing 401 through");
            return Err(unauthorized);
        }

        let replay = context.replay();

        match self
            .refresher
            .refresh(self.transport.as_ref(), &self.store, prepared.bearer())
            .await
        {
            Ok(outcome) => {
                debug!(path, ?outcome, "replaying request with refreshed token");
                let prepared = attach_auth(&replay, &self.store);
                // The replay carries the marker, so a second 401 is final.
                self.transport.send(&prepared).await?.into_result()
            }
            Err(failure) if !failure.needs_teardown() => {
                debug!(path, %failure, "session already ended, passing 401 through");
                Err(unauthorized)
            }
            Err(failure) => {
                warn!(path, %failure, "token refresh failed, ending session");
                self.store.logout();
                self.on_expired.session_expired();
                Err(unauthorized)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BoxError, ClientError};
    use async_trait::async_trait;
    use pineapple_auth::{AuthState, User};
    use std::collections::VecDeque;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    type Reply = Result<(StatusCode, &'static str), &'static str>;

    /// Replays canned answers and records what was sent.
    #[derive(Default)]
    struct ScriptedTransport {
        replies: Mutex<VecDeque<Reply>>,
        sent: Mutex<Vec<(String, Option<String>)>>,
    }

    impl ScriptedTransport {
        fn new(replies: impl IntoIterator<Item = Reply>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into_iter().collect()),
                sent: Mutex::default(),
            })
        }

        fn sent(&self) -> Vec<(String, Option<String>)> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn send(&self, request: &PreparedRequest) -> ClientResult<RawResponse> {
            self.sent.lock().unwrap().push((
                request.request().path().to_owned(),
                request.bearer().map(str::to_owned),
            ));
            match self.replies.lock().unwrap().pop_front() {
                Some(Ok((status, body))) => Ok(RawResponse::new(status, body.as_bytes().to_vec())),
                Some(Err(reason)) => {
                    let error: BoxError = Box::new(io::Error::new(io::ErrorKind::Other, reason));
                    Err(ClientError::Network(error))
                }
                None => panic!("unexpected request to {}", request.request().path()),
            }
        }
    }

    fn logged_in_store() -> SessionStore {
        let store = SessionStore::in_memory();
        store.login(User::new("u1", "ada@example.com", "Ada"), "A1", "R1");
        store
    }

    fn pipeline(
        transport: Arc<ScriptedTransport>,
        store: SessionStore,
    ) -> (AuthPipeline, Arc<AtomicUsize>) {
        let expired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&expired);
        let pipeline = AuthPipeline::new(transport, store).with_expiry_handler(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        (pipeline, expired)
    }

    const TOKENS_A2: &str = r#"{"accessToken":"A2","refreshToken":"R2"}"#;

    #[tokio::test]
    async fn non_auth_errors_pass_straight_through() {
        let transport =
            ScriptedTransport::new([Ok((StatusCode::NOT_FOUND, r#"{"message":"gone"}"#))]);
        let (pipeline, expired) = pipeline(transport.clone(), logged_in_store());

        let error = pipeline.send(ApiRequest::get("/portfolios/p9")).await.unwrap_err();

        assert_eq!(error.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(transport.sent().len(), 1);
        assert_eq!(expired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn refresh_then_replay_returns_the_replayed_response() {
        let transport = ScriptedTransport::new([
            Ok((StatusCode::UNAUTHORIZED, "")),
            Ok((StatusCode::OK, TOKENS_A2)),
            Ok((StatusCode::OK, "[]")),
        ]);
        let store = logged_in_store();
        let (pipeline, _) = pipeline(transport.clone(), store.clone());

        let response = pipeline.send(ApiRequest::get("/portfolios")).await.unwrap();

        assert_eq!(response.body(), b"[]");
        assert_eq!(
            transport.sent(),
            vec![
                ("/portfolios".to_owned(), Some("A1".to_owned())),
                ("/auth/refresh".to_owned(), None),
                ("/portfolios".to_owned(), Some("A2".to_owned())),
            ]
        );
        assert_eq!(store.refresh_token().as_deref(), Some("R2"));
        assert_eq!(store.state(), AuthState::Authenticated);
    }

    #[tokio::test]
    async fn second_401_on_replay_is_final() {
        let transport = ScriptedTransport::new([
            Ok((StatusCode::UNAUTHORIZED, "")),
            Ok((StatusCode::OK, TOKENS_A2)),
            Ok((StatusCode::UNAUTHORIZED, r#"{"message":"still no"}"#)),
        ]);
        let store = logged_in_store();
        let (pipeline, expired) = pipeline(transport.clone(), store.clone());

        let error = pipeline.send(ApiRequest::get("/users/me")).await.unwrap_err();

        assert!(error.is_unauthorized());
        assert!(error.to_string().contains("still no"));
        assert_eq!(transport.sent().len(), 3);
        assert_eq!(store.access_token().as_deref(), Some("A2"));
        assert_eq!(expired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn network_failure_during_refresh_logs_out() {
        let transport = ScriptedTransport::new([
            Ok((StatusCode::UNAUTHORIZED, r#"{"message":"jwt expired"}"#)),
            Err("connection reset"),
        ]);
        let store = logged_in_store();
        let (pipeline, expired) = pipeline(transport.clone(), store.clone());

        let error = pipeline.send(ApiRequest::get("/invitations")).await.unwrap_err();

        assert!(error.to_string().contains("jwt expired"));
        assert_eq!(store.state(), AuthState::Anonymous);
        assert!(store.access_token().is_none());
        assert_eq!(expired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_refresh_token_logs_out_without_calling_refresh() {
        let transport = ScriptedTransport::new([Ok((StatusCode::UNAUTHORIZED, ""))]);
        let store = SessionStore::in_memory();
        let (pipeline, expired) = pipeline(transport.clone(), store.clone());

        let error = pipeline.send(ApiRequest::get("/portfolios")).await.unwrap_err();

        assert!(error.is_unauthorized());
        assert_eq!(transport.sent(), vec![("/portfolios".to_owned(), None)]);
        assert_eq!(expired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_tokens_from_refresh_count_as_failure() {
        let transport = ScriptedTransport::new([
            Ok((StatusCode::UNAUTHORIZED, "")),
            Ok((StatusCode::OK, r#"{"accessToken":"","refreshToken":"R2"}"#)),
        ]);
        let store = logged_in_store();
        let (pipeline, expired) = pipeline(transport, store.clone());

        assert!(pipeline.send(ApiRequest::get("/portfolios")).await.is_err());
        assert_eq!(store.state(), AuthState::Anonymous);
        assert_eq!(expired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn credential_endpoints_do_not_recover() {
        let transport = ScriptedTransport::new([Ok((
            StatusCode::UNAUTHORIZED,
            r#"{"message":"Invalid credentials"}"#,
        ))]);
        let store = logged_in_store();
        let (pipeline, expired) = pipeline(transport.clone(), store.clone());

        let error = pipeline
            .send(ApiRequest::post("/auth/login").without_auth_recovery())
            .await
            .unwrap_err();

        assert!(error.is_unauthorized());
        assert_eq!(transport.sent().len(), 1);
        assert_eq!(store.state(), AuthState::Authenticated);
        assert_eq!(expired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn replay_network_error_is_returned_unchanged() {
        let transport = ScriptedTransport::new([
            Ok((StatusCode::UNAUTHORIZED, "")),
            Ok((StatusCode::OK, TOKENS_A2)),
            Err("timed out"),
        ]);
        let store = logged_in_store();
        let (pipeline, _) = pipeline(transport, store.clone());

        let error = pipeline.send(ApiRequest::get("/portfolios")).await.unwrap_err();

        assert!(matches!(error, ClientError::Network(_)));
        assert_eq!(store.access_token().as_deref(), Some("A2"));
    }

    #[tokio::test]
    async fn stale_401_after_concurrent_refresh_skips_the_exchange() {
        // A request sent with A1 fails after another caller already moved
        // the store to A2: it replays with A2 without touching /auth/refresh.
        let transport = ScriptedTransport::new([Ok((StatusCode::OK, "{}"))]);
        let store = logged_in_store();
        store.set_tokens("A2", "R2");
        let (pipeline, _) = pipeline(transport.clone(), store.clone());

        let context = RequestContext::new(ApiRequest::get("/users/me"));
        let stale = PreparedRequest::with_bearer(context.request().clone(), Some("A1".to_owned()));
        let response = pipeline
            .handle_auth_failure(
                &context,
                &stale,
                RawResponse::new(StatusCode::UNAUTHORIZED, Vec::new()),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            transport.sent(),
            vec![("/users/me".to_owned(), Some("A2".to_owned()))]
        );
    }

    #[tokio::test]
    async fn stale_401_after_concurrent_teardown_is_passed_through() {
        // Another caller's refresh already failed and cleared the session.
        let transport = ScriptedTransport::new(Vec::<Reply>::new());
        let store = SessionStore::in_memory();
        let (pipeline, expired) = pipeline(transport.clone(), store.clone());

        let context = RequestContext::new(ApiRequest::get("/portfolios"));
        let stale = PreparedRequest::with_bearer(context.request().clone(), Some("A1".to_owned()));
        let error = pipeline
            .handle_auth_failure(
                &context,
                &stale,
                RawResponse::new(StatusCode::UNAUTHORIZED, Vec::new()),
            )
            .await
            .unwrap_err();

        assert!(error.is_unauthorized());
        assert!(transport.sent().is_empty());
        assert_eq!(expired.load(Ordering::SeqCst), 0);
    }
}
