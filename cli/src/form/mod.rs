//! Swap form state.
//!
//! The form is an immutable [`FormState`] value. Every user action goes
//! through [`reduce`], which returns the next state.

pub mod session;

use crate::catalog::Catalog;
use crate::quote::{compute_quote, parse_decimal, OrderType, QuoteRequest, QuoteResult};
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
pub enum TradeType {
    #[default]
    Swap,
    Buy,
    Sell,
}

impl TradeType {
    pub fn from_label(self) -> &'static str {
        match self {
            Self::Buy => "Pay With",
            Self::Sell | Self::Swap => "From",
        }
    }

    pub fn to_label(self) -> &'static str {
        match self {
            Self::Buy => "Buy",
            Self::Sell => "Sell",
            Self::Swap => "To",
        }
    }

    pub fn submit_label(self) -> &'static str {
        match self {
            Self::Buy => "Buy",
            Self::Sell => "Sell",
            Self::Swap => "Swap",
        }
    }

    pub fn pending_label(self) -> &'static str {
        match self {
            Self::Buy => "Buying...",
            Self::Sell => "Selling...",
            Self::Swap => "Swapping...",
        }
    }

    /// Only plain swaps offer the from/to switch.
    pub fn allows_switch(self) -> bool {
        matches!(self, Self::Swap)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    pub trade_type: TradeType,
    pub order_type: OrderType,
    pub from_token: String,
    pub to_token: String,
    pub amount: String,
    pub limit_price: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    SetTradeType(TradeType),
    SetOrderType(OrderType),
    SelectFrom(String),
    SelectTo(String),
    SetAmount(String),
    SetLimitPrice(String),
    SwitchTokens,
    Reset,
}

/// Applies `action` to `state` and returns the resulting state.
pub fn reduce(state: FormState, action: FormAction) -> FormState {
    match action {
        FormAction::SetTradeType(trade_type) => FormState { trade_type, ..state },
        FormAction::SetOrderType(order_type) => FormState { order_type, ..state },
        FormAction::SelectFrom(from_token) => FormState { from_token, ..state },
        FormAction::SelectTo(to_token) => FormState { to_token, ..state },
        FormAction::SetAmount(amount) => FormState { amount, ..state },
        FormAction::SetLimitPrice(limit_price) => FormState {
            limit_price,
            ..state
        },
        FormAction::SwitchTokens if state.trade_type.allows_switch() => FormState {
            from_token: state.to_token,
            to_token: state.from_token,
            ..state
        },
        FormAction::SwitchTokens => state,
        FormAction::Reset => FormState::default(),
    }
}

impl FormState {
    /// Whether every field the trade needs has been filled in. Numeric fields
    /// must hold a number.
    pub fn can_submit(&self) -> bool {
        let filled = |s: &str| !s.trim().is_empty();
        let numeric = |s: &str| parse_decimal(s).is_some();

        filled(&self.from_token)
            && filled(&self.to_token)
            && numeric(&self.amount)
            && (self.order_type != OrderType::Limit || numeric(&self.limit_price))
    }

    pub fn quote_request(&self) -> QuoteRequest {
        let limit_price = match self.order_type {
            OrderType::Limit if !self.limit_price.trim().is_empty() => {
                Some(self.limit_price.clone())
            }
            _ => None,
        };

        QuoteRequest {
            from_currency: self.from_token.clone(),
            to_currency: self.to_token.clone(),
            amount: self.amount.clone(),
            order_type: self.order_type,
            limit_price,
        }
    }

    pub fn quote(&self, catalog: &Catalog) -> QuoteResult {
        compute_quote(catalog, &self.quote_request())
    }

    /// Hint shown in the limit price field.
    pub fn limit_price_placeholder(&self) -> String {
        format!("Price in {}", self.to_token)
    }
}
