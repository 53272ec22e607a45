//! The wire: turns a [`PreparedRequest`] into a [`RawResponse`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Url};
use tracing::debug;

use crate::error::{ClientError, ClientResult};
use crate::request::{PreparedRequest, RawResponse};

/// Sends one request and reports whatever came back.
///
/// Any HTTP status is a successful send; `Err` means no response arrived.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &PreparedRequest) -> ClientResult<RawResponse>;
}

/// Reqwest-backed transport rooted at the API base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append `path` to the base URL, keeping any base path prefix such as `/api`.
    pub fn endpoint(&self, path: &str) -> ClientResult<Url> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|error| ClientError::InvalidUrl(format!("{joined}: {error}")))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, prepared: &PreparedRequest) -> ClientResult<RawResponse> {
        let request = prepared.request();
        let url = self.endpoint(request.path())?;

        let mut builder = self
            .client
            .request(request.method().clone(), url)
            .header(ACCEPT, "application/json");

        if !request.query_pairs().is_empty() {
            builder = builder.query(request.query_pairs());
        }
        if let Some(body) = request.body() {
            builder = builder.header(CONTENT_TYPE, "application/json").json(body);
        }
        if let Some(token) = prepared.bearer() {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        debug!(
            method = %request.method(),
            path = request.path(),
            status = status.as_u16(),
            "api response received"
        );

        Ok(RawResponse::new(status, body.to_vec()))
    }
}
