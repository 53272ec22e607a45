use crate::client::PineappleClient;
use crate::entities::{AuthTokens, TokenPair};
use crate::error::ClientResult;
use crate::refresh::REFRESH_PATH;
use crate::request::ApiRequest;
use crate::types::{LoginRequest, LogoutRequest, RefreshRequest, RegisterRequest};

/// `/auth/*`. These calls do not touch the session store; see the session
/// flows on [`PineappleClient`] for that.
pub struct AuthApi<'a> {
    client: &'a PineappleClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a PineappleClient) -> Self {
        Self { client }
    }

    pub async fn login(&self, request: &LoginRequest) -> ClientResult<AuthTokens> {
        let request = ApiRequest::post("/auth/login")
            .json(request)?
            .without_auth_recovery();
        self.client.fetch(request).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<AuthTokens> {
        let request = ApiRequest::post("/auth/register")
            .json(request)?
            .without_auth_recovery();
        self.client.fetch(request).await
    }

    /// Invalidate `refresh_token` on the server.
    ///
    /// A 401 here is not recovered: refreshing would rotate the very token
    /// this call is revoking.
    pub async fn logout(&self, refresh_token: Option<String>) -> ClientResult<()> {
        let request = ApiRequest::post("/auth/logout")
            .json(&LogoutRequest { refresh_token })?
            .without_auth_recovery();
        self.client.execute(request).await
    }

    /// Explicit token exchange. The pipeline does this on its own when a
    /// request comes back 401.
    pub async fn refresh(&self, refresh_token: impl Into<String>) -> ClientResult<TokenPair> {
        let request = ApiRequest::post(REFRESH_PATH)
            .json(&RefreshRequest {
                refresh_token: refresh_token.into(),
            })?
            .without_auth_recovery();
        self.client.fetch(request).await
    }
}
