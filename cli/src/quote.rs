//! Quote calculation: exchange rate and estimated output for a prospective trade.
//!
//! Rates are plain price ratios (`to.price / from.price`). Token decimal
//! precision is not normalised, so the numbers describe the feed's USD prices
//! rather than on-chain unit conversions.

use crate::catalog::Catalog;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OrderType {
    /// Priced from the catalog ratio
    #[default]
    #[strum(to_string = "market", serialize = "mkt")]
    Market,
    /// Priced from a user-supplied rate
    #[strum(to_string = "limit", serialize = "lmt")]
    Limit,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub from_currency: String,
    pub to_currency: String,
    /// Decimal string as typed by the user
    pub amount: String,
    pub order_type: OrderType,
    pub limit_price: Option<String>,
}

impl QuoteRequest {
    pub fn market(from: impl Into<String>, to: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            from_currency: from.into(),
            to_currency: to.into(),
            amount: amount.into(),
            order_type: OrderType::Market,
            limit_price: None,
        }
    }

    pub fn limit(
        from: impl Into<String>,
        to: impl Into<String>,
        amount: impl Into<String>,
        limit_price: impl Into<String>,
    ) -> Self {
        Self {
            from_currency: from.into(),
            to_currency: to.into(),
            amount: amount.into(),
            order_type: OrderType::Limit,
            limit_price: Some(limit_price.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteResult {
    /// Units of `to` per unit of `from`
    pub rate: Option<f64>,
    pub estimated_output: Option<f64>,
}

impl QuoteResult {
    pub const UNAVAILABLE: QuoteResult = QuoteResult {
        rate: None,
        estimated_output: None,
    };

    pub fn is_available(&self) -> bool {
        self.rate.is_some()
    }
}

/// Parses a user-entered decimal. Blank, malformed and non-finite input all
/// yield `None`.
pub fn parse_decimal(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Whether `input` may sit in a numeric field: blank, or a finite decimal.
pub fn is_decimal_input(input: &str) -> bool {
    input.trim().is_empty() || parse_decimal(input).is_some()
}

/// The override rate of a limit order, when it is usable.
fn limit_rate(request: &QuoteRequest) -> Option<f64> {
    if request.order_type != OrderType::Limit {
        return None;
    }
    request
        .limit_price
        .as_deref()
        .and_then(parse_decimal)
        .filter(|p| *p > 0.0)
}

/// Derives the rate and estimated output of `request` against `catalog`.
pub fn compute_quote(catalog: &Catalog, request: &QuoteRequest) -> QuoteResult {
    let (Some(from), Some(to)) = (
        catalog.find(&request.from_currency),
        catalog.find(&request.to_currency),
    ) else {
        return QuoteResult::UNAVAILABLE;
    };

    let market_rate = to.price / from.price;
    let rate = limit_rate(request).unwrap_or(market_rate);

    // Only reachable with zero prices in the catalog
    if !rate.is_finite() {
        return QuoteResult::UNAVAILABLE;
    }

    let estimated_output = parse_decimal(&request.amount)
        .map(|amount| amount * rate)
        .filter(|out| out.is_finite());

    QuoteResult {
        rate: Some(rate),
        estimated_output,
    }
}
