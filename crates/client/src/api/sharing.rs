use crate::client::PineappleClient;
use crate::entities::{Invitation, Permission, Portfolio, PortfolioShare};
use crate::error::ClientResult;
use crate::request::ApiRequest;
use crate::types::{RespondToInvitationRequest, SharePortfolioRequest, UpdateShareRequest};

pub struct SharingApi<'a> {
    client: &'a PineappleClient,
}

impl<'a> SharingApi<'a> {
    pub(crate) fn new(client: &'a PineappleClient) -> Self {
        Self { client }
    }

    /// Invite `request.email` to a portfolio. The share starts out pending.
    pub async fn share_portfolio(
        &self,
        portfolio_id: &str,
        request: &SharePortfolioRequest,
    ) -> ClientResult<PortfolioShare> {
        self.client
            .fetch(ApiRequest::post(format!("/portfolios/{portfolio_id}/share")).json(request)?)
            .await
    }

    pub async fn shares(&self, portfolio_id: &str) -> ClientResult<Vec<PortfolioShare>> {
        self.client
            .fetch(ApiRequest::get(format!("/portfolios/{portfolio_id}/shares")))
            .await
    }

    pub async fn invitations(&self) -> ClientResult<Vec<Invitation>> {
        self.client.fetch(ApiRequest::get("/invitations")).await
    }

    pub async fn respond_to_invitation(&self, id: &str, accept: bool) -> ClientResult<()> {
        self.client
            .execute(
                ApiRequest::patch(format!("/invitations/{id}"))
                    .json(&RespondToInvitationRequest { accept })?,
            )
            .await
    }

    pub async fn update_share(
        &self,
        id: &str,
        permission: Permission,
    ) -> ClientResult<PortfolioShare> {
        let request =
            ApiRequest::patch(format!("/shares/{id}")).json(&UpdateShareRequest { permission })?;
        self.client.fetch(request).await
    }

    pub async fn revoke_share(&self, id: &str) -> ClientResult<()> {
        self.client
            .execute(ApiRequest::delete(format!("/shares/{id}")))
            .await
    }

    pub async fn shared_with_me(&self) -> ClientResult<Vec<Portfolio>> {
        self.client.fetch(ApiRequest::get("/shared-with-me")).await
    }
}
