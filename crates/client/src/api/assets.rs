use serde_json::Value;

use crate::client::PineappleClient;
use crate::entities::Asset;
use crate::error::ClientResult;
use crate::request::ApiRequest;
use crate::types::{CreateAssetRequest, UpdateAssetRequest};

pub struct AssetsApi<'a> {
    client: &'a PineappleClient,
}

impl<'a> AssetsApi<'a> {
    pub(crate) fn new(client: &'a PineappleClient) -> Self {
        Self { client }
    }

    pub async fn list_for_portfolio(&self, portfolio_id: &str) -> ClientResult<Vec<Asset>> {
        self.client
            .fetch(ApiRequest::get(format!("/portfolios/{portfolio_id}/assets")))
            .await
    }

    /// Assets grouped by type, as the backend chooses to shape it.
    pub async fn by_type(&self, portfolio_id: &str) -> ClientResult<Value> {
        self.client
            .fetch(ApiRequest::get(format!(
                "/portfolios/{portfolio_id}/assets/by-type"
            )))
            .await
    }

    pub async fn get(&self, id: &str) -> ClientResult<Asset> {
        self.client.fetch(ApiRequest::get(format!("/assets/{id}"))).await
    }

    pub async fn create(
        &self,
        portfolio_id: &str,
        request: &CreateAssetRequest,
    ) -> ClientResult<Asset> {
        self.client
            .fetch(ApiRequest::post(format!("/portfolios/{portfolio_id}/assets")).json(request)?)
            .await
    }

    pub async fn update(&self, id: &str, request: &UpdateAssetRequest) -> ClientResult<Asset> {
        self.client
            .fetch(ApiRequest::patch(format!("/assets/{id}")).json(request)?)
            .await
    }

    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.client
            .execute(ApiRequest::delete(format!("/assets/{id}")))
            .await
    }
}
