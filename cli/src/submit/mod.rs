//! Trade submission.
//!
//! [`SwapSubmitter`] is the seam a real trading backend plugs into. The only
//! implementation shipped here is [`SimulatedSubmitter`], which waits for a
//! fixed delay and accepts every request.

use crate::catalog::Catalog;
use crate::form::{FormState, TradeType};
use crate::quote::{QuoteRequest, QuoteResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Delay of the simulated backend, in milliseconds.
pub const DEFAULT_SUBMIT_DELAY_MS: u64 = 1500;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("form is incomplete")]
    Incomplete,

    #[error("trade rejected: {0}")]
    Rejected(String),

    #[error("submission abandoned because the session was closed")]
    Cancelled,
}

/// Everything the backend gets to see about a trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapRequest {
    pub trade_type: TradeType,
    pub quote_request: QuoteRequest,
    /// Quote shown to the user when they submitted
    pub quote: QuoteResult,
}

impl SwapRequest {
    pub fn from_form(state: &FormState, catalog: &Catalog) -> Self {
        Self {
            trade_type: state.trade_type,
            quote_request: state.quote_request(),
            quote: state.quote(catalog),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub reference: String,
    pub request: SwapRequest,
    pub completed_at: DateTime<Utc>,
}

#[async_trait]
pub trait SwapSubmitter: Send + Sync {
    async fn submit(&self, request: &SwapRequest) -> Result<Receipt, SubmissionError>;
}

#[derive(Builder, Clone, Debug)]
pub struct SubmitConfig {
    /// How long the simulated backend takes to "execute" a trade
    #[builder(default = "Duration::from_millis(DEFAULT_SUBMIT_DELAY_MS)")]
    pub delay: Duration,
}

impl SubmitConfig {
    pub fn builder() -> SubmitConfigBuilder {
        SubmitConfigBuilder::default()
    }
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(DEFAULT_SUBMIT_DELAY_MS),
        }
    }
}

/// Stand-in backend: sleeps, then succeeds.
#[derive(Debug, Clone, Default)]
pub struct SimulatedSubmitter {
    config: SubmitConfig,
}

impl SimulatedSubmitter {
    pub fn new(config: SubmitConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SwapSubmitter for SimulatedSubmitter {
    async fn submit(&self, request: &SwapRequest) -> Result<Receipt, SubmissionError> {
        debug!(delay = ?self.config.delay, trade = %request.trade_type, "simulating trade execution");
        tokio::time::sleep(self.config.delay).await;

        let completed_at = Utc::now();
        Ok(Receipt {
            reference: format!("sim-{}", completed_at.timestamp_millis()),
            request: request.clone(),
            completed_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::OrderType;

    fn request() -> SwapRequest {
        SwapRequest {
            trade_type: TradeType::Swap,
            quote_request: QuoteRequest::market("SWTH", "ETH", "100"),
            quote: QuoteResult {
                rate: Some(90_000.0),
                estimated_output: Some(9_000_000.0),
            },
        }
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_submit_waits_then_succeeds() {
        let submitter = SimulatedSubmitter::new(
            SubmitConfig::builder()
                .delay(Duration::from_millis(1500))
                .build()
                .unwrap(),
        );

        let started = tokio::time::Instant::now();
        let receipt = submitter.submit(&request()).await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(1500));
        assert_eq!(receipt.request, request());
        assert!(receipt.reference.starts_with("sim-"));
    }

    #[test]
    fn default_delay_matches_constant() {
        let config = SubmitConfig::builder().build().unwrap();
        assert_eq!(config.delay, Duration::from_millis(DEFAULT_SUBMIT_DELAY_MS));
        assert_eq!(SubmitConfig::default().delay, config.delay);
    }

    #[test]
    fn request_serializes_with_lowercase_enums() {
        let mut req = request();
        req.quote_request.order_type = OrderType::Limit;
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["trade_type"], "swap");
        assert_eq!(json["quote_request"]["order_type"], "limit");
        assert_eq!(json["quote"]["rate"], 90_000.0);
    }
}
