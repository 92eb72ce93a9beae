use super::CatalogError;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Endpoint of the public price feed.
pub const PRICES_URL: &str = "https://interview.switcheo.com/prices.json";

/// One entry of the feed, exactly as it arrives on the wire.
///
/// The feed omits `price` for some currencies and occasionally sends `null`,
/// so it stays optional here and is filtered during enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPriceRecord {
    pub currency: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub date: String,
}

/// Anything that can produce the raw price list.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_prices(&self) -> Result<Vec<RawPriceRecord>, CatalogError>;
}

/// Price source backed by a plain HTTP GET against the feed.
#[derive(Debug, Clone)]
pub struct HttpPriceSource {
    client: Client,
    url: Url,
}

impl HttpPriceSource {
    pub fn new(url: Url) -> Self {
        Self {
            client: Client::new(),
            url,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl PriceSource for HttpPriceSource {
    async fn fetch_prices(&self) -> Result<Vec<RawPriceRecord>, CatalogError> {
        debug!(url = %self.url, "fetching price feed");

        let resp = self
            .client
            .get(self.url.clone())
            .header("accept", "application/json")
            .send()
            .await
            .map_err(CatalogError::Request)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status));
        }

        let body = resp.bytes().await.map_err(CatalogError::Request)?;

        // The feed is a bare JSON array at the top level
        let records: Vec<RawPriceRecord> = serde_json::from_slice(&body)?;
        debug!(count = records.len(), bytes = body.len(), "price feed decoded");

        Ok(records)
    }
}
