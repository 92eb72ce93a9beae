//! Price catalog: the priced, enriched list of tradable tokens.
//!
//! The catalog is built once per successful fetch of the price feed and then
//! treated as immutable. [`CatalogLoader`] keeps the last good catalog under a
//! single cache key and replaces it wholesale on refresh.

pub mod enrich;
pub mod price_feed;

use crate::utils::with_optional_timeout;
use chrono::{DateTime, Utc};
use price_feed::{PriceSource, RawPriceRecord};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Cache key of the catalog. There is only ever one catalog.
pub const CATALOG_CACHE_KEY: &str = "tokens";

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("price feed request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("price feed answered with status {0}")]
    Status(reqwest::StatusCode),

    #[error("price feed body is not a price list: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("price feed did not answer within {0:?}")]
    Timeout(Duration),
}

/// A feed entry that passed the price filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub currency: String,
    pub price: f64,
    pub date: String,
}

/// A priced token with its simulated balance and icon reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedToken {
    pub currency: String,
    pub price: f64,
    pub date: String,
    pub balance: f64,
    pub icon: String,
}

impl EnrichedToken {
    /// Timestamp of the price, if the feed sent a parseable one.
    pub fn as_of(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.date)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    tokens: Vec<EnrichedToken>,
}

impl Catalog {
    pub fn new(tokens: Vec<EnrichedToken>) -> Self {
        Self { tokens }
    }

    /// Filters and enriches a raw feed.
    pub fn from_records(records: Vec<RawPriceRecord>) -> Self {
        Self::new(enrich::enrich(records))
    }

    pub fn tokens(&self) -> &[EnrichedToken] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// First entry for `currency` in feed order.
    ///
    /// The feed may list a currency more than once; the earliest entry wins.
    pub fn find(&self, currency: &str) -> Option<&EnrichedToken> {
        self.tokens.iter().find(|t| t.currency == currency)
    }

    /// Distinct currencies in feed order, for pickers.
    pub fn currencies(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::with_capacity(self.tokens.len());
        for token in &self.tokens {
            if !out.contains(&token.currency.as_str()) {
                out.push(&token.currency);
            }
        }
        out
    }
}

/// Outcome of loading the catalog as seen by the form.
#[derive(Debug, Clone)]
pub enum CatalogStatus {
    Ready(Arc<Catalog>),
    Failed(String),
}

impl CatalogStatus {
    pub fn catalog(&self) -> Option<&Arc<Catalog>> {
        match self {
            Self::Ready(catalog) => Some(catalog),
            _ => None,
        }
    }
}

impl From<Result<Arc<Catalog>, CatalogError>> for CatalogStatus {
    fn from(result: Result<Arc<Catalog>, CatalogError>) -> Self {
        match result {
            Ok(catalog) => Self::Ready(catalog),
            Err(err) => Self::Failed(err.to_string()),
        }
    }
}

/// Fetches the feed through a [`PriceSource`] and caches the resulting catalog.
pub struct CatalogLoader<S> {
    source: S,
    timeout: Option<Duration>,
    cache: RwLock<Option<Arc<Catalog>>>,
}

impl<S: PriceSource> CatalogLoader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            timeout: None,
            cache: RwLock::new(None),
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// The last successfully loaded catalog, if any.
    pub fn cached(&self) -> Option<Arc<Catalog>> {
        match self.cache.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Returns the cached catalog, fetching it on first use.
    pub async fn load(&self) -> Result<Arc<Catalog>, CatalogError> {
        if let Some(catalog) = self.cached() {
            debug!(key = CATALOG_CACHE_KEY, "serving catalog from cache");
            return Ok(catalog);
        }
        self.refresh().await
    }

    /// Always refetches. The cached catalog is only replaced on success.
    pub async fn refresh(&self) -> Result<Arc<Catalog>, CatalogError> {
        let records =
            with_optional_timeout(self.source.fetch_prices(), self.timeout, CatalogError::Timeout)
                .await?;

        let catalog = Arc::new(Catalog::from_records(records));
        info!(tokens = catalog.len(), "price catalog loaded");

        match self.cache.write() {
            Ok(mut guard) => *guard = Some(Arc::clone(&catalog)),
            Err(poisoned) => *poisoned.into_inner() = Some(Arc::clone(&catalog)),
        }

        Ok(catalog)
    }

    /// [`Self::load`] folded into a [`CatalogStatus`].
    pub async fn status(&self) -> CatalogStatus {
        self.load().await.into()
    }
}
