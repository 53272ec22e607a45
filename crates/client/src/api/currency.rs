use serde_json::Value;

use crate::client::PineappleClient;
use crate::entities::NetWorth;
use crate::error::ClientResult;
use crate::request::ApiRequest;

pub const DEFAULT_CURRENCY: &str = "USD";

/// Conversion and aggregation endpoints. Rates and conversions are computed
/// server-side; shapes the client does not inspect stay as raw JSON.
pub struct CurrencyApi<'a> {
    client: &'a PineappleClient,
}

impl<'a> CurrencyApi<'a> {
    pub(crate) fn new(client: &'a PineappleClient) -> Self {
        Self { client }
    }

    pub async fn supported(&self) -> ClientResult<Value> {
        self.client.fetch(ApiRequest::get("/currency/supported")).await
    }

    pub async fn rates(&self, base: Option<&str>) -> ClientResult<Value> {
        self.client
            .fetch(
                ApiRequest::get("/currency/rates").query("base", base.unwrap_or(DEFAULT_CURRENCY)),
            )
            .await
    }

    pub async fn convert(&self, amount: f64, from: &str, to: &str) -> ClientResult<Value> {
        self.client
            .fetch(
                ApiRequest::get("/currency/convert")
                    .query("amount", amount)
                    .query("from", from)
                    .query("to", to),
            )
            .await
    }

    pub async fn net_worth(&self, currency: Option<&str>) -> ClientResult<NetWorth> {
        self.client
            .fetch(
                ApiRequest::get("/currency/net-worth")
                    .query("currency", currency.unwrap_or(DEFAULT_CURRENCY)),
            )
            .await
    }

    pub async fn portfolio_summary(
        &self,
        portfolio_id: &str,
        currency: Option<&str>,
    ) -> ClientResult<Value> {
        self.client
            .fetch(
                ApiRequest::get("/currency/portfolio-summary")
                    .query("portfolioId", portfolio_id)
                    .query("currency", currency.unwrap_or(DEFAULT_CURRENCY)),
            )
            .await
    }
}
