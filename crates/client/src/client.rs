use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use pineapple_auth::SessionStore;
use pineapple_config::AppConfig;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::api::{AssetsApi, AuthApi, CurrencyApi, PortfoliosApi, SharingApi, UsersApi};
use crate::error::ClientResult;
use crate::pipeline::{AuthPipeline, SessionExpiryHandler};
use crate::request::{ApiRequest, RawResponse};
use crate::transport::{HttpTransport, Transport};

/// Entry point for talking to the Pineapple Wallet API.
///
/// Cheap to clone; clones share the pipeline and the session store.
#[derive(Clone)]
pub struct PineappleClient {
    pipeline: Arc<AuthPipeline>,
}

impl PineappleClient {
    pub fn new(pipeline: AuthPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }

    pub fn with_transport(transport: Arc<dyn Transport>, store: SessionStore) -> Self {
        Self::new(AuthPipeline::new(transport, store))
    }

    /// Build an HTTP-backed client from loaded configuration.
    pub fn from_config(
        config: &AppConfig,
        store: SessionStore,
        on_expired: Arc<dyn SessionExpiryHandler>,
    ) -> anyhow::Result<Self> {
        let base_url = config.api.resolve_base_url()?;
        let timeout = Duration::from_secs(config.api.request_timeout_seconds);
        let transport = HttpTransport::new(base_url.clone(), timeout)
            .context("failed to build http client")?;

        info!(mode = %config.api.mode, %base_url, "api client ready");

        let pipeline =
            AuthPipeline::new(Arc::new(transport), store).with_expiry_handler(on_expired);
        Ok(Self::new(pipeline))
    }

    pub fn session(&self) -> &SessionStore {
        self.pipeline.store()
    }

    /// Send an arbitrary request through the authenticated pipeline.
    pub async fn send(&self, request: ApiRequest) -> ClientResult<RawResponse> {
        self.pipeline.send(request).await
    }

    pub(crate) async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> ClientResult<T> {
        self.send(request).await?.json()
    }

    /// For endpoints whose success body carries nothing of interest.
    pub(crate) async fn execute(&self, request: ApiRequest) -> ClientResult<()> {
        self.send(request).await.map(drop)
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn users(&self) -> UsersApi<'_> {
        UsersApi::new(self)
    }

    pub fn portfolios(&self) -> PortfoliosApi<'_> {
        PortfoliosApi::new(self)
    }

    pub fn assets(&self) -> AssetsApi<'_> {
        AssetsApi::new(self)
    }

    pub fn sharing(&self) -> SharingApi<'_> {
        SharingApi::new(self)
    }

    pub fn currency(&self) -> CurrencyApi<'_> {
        CurrencyApi::new(self)
    }
}
