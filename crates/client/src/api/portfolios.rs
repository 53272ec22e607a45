use crate::client::PineappleClient;
use crate::entities::Portfolio;
use crate::error::ClientResult;
use crate::request::ApiRequest;
use crate::types::{CreatePortfolioRequest, UpdatePortfolioRequest};

pub struct PortfoliosApi<'a> {
    client: &'a PineappleClient,
}

impl<'a> PortfoliosApi<'a> {
    pub(crate) fn new(client: &'a PineappleClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> ClientResult<Vec<Portfolio>> {
        self.client.fetch(ApiRequest::get("/portfolios")).await
    }

    pub async fn get(&self, id: &str) -> ClientResult<Portfolio> {
        self.client
            .fetch(ApiRequest::get(format!("/portfolios/{id}")))
            .await
    }

    pub async fn create(&self, request: &CreatePortfolioRequest) -> ClientResult<Portfolio> {
        self.client
            .fetch(ApiRequest::post("/portfolios").json(request)?)
            .await
    }

    pub async fn update(
        &self,
        id: &str,
        request: &UpdatePortfolioRequest,
    ) -> ClientResult<Portfolio> {
        self.client
            .fetch(ApiRequest::patch(format!("/portfolios/{id}")).json(request)?)
            .await
    }

    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.client
            .execute(ApiRequest::delete(format!("/portfolios/{id}")))
            .await
    }
}
