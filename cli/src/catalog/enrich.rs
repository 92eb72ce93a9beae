use super::price_feed::RawPriceRecord;
use super::{EnrichedToken, PriceRecord};
use tracing::debug;

/// Simulated wallet balances. Any currency not listed holds zero.
pub const SIMULATED_BALANCES: [(&str, f64); 4] = [
    ("SWTH", 1000.0),
    ("ETH", 5.0),
    ("BTC", 0.5),
    ("USDC", 5000.0),
];

/// Location of the per-currency SVG icons.
pub const ICON_BASE_URL: &str = "https://raw.githubusercontent.com/Switcheo/token-icons/main/tokens";

/// Icon used when a currency cannot be turned into an icon path.
pub const FALLBACK_ICON: &str = "icons/generic-token.svg";

/// Balance lookup against [`SIMULATED_BALANCES`]; case-sensitive like the feed.
pub fn simulated_balance(currency: &str) -> f64 {
    SIMULATED_BALANCES
        .iter()
        .find(|(symbol, _)| *symbol == currency)
        .map(|(_, balance)| *balance)
        .unwrap_or(0.0)
}

/// Icon reference for a currency.
pub fn icon_for(currency: &str) -> String {
    let path_safe = !currency.is_empty()
        && currency
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));

    if path_safe {
        format!("{ICON_BASE_URL}/{currency}.svg")
    } else {
        FALLBACK_ICON.to_string()
    }
}

/// Returns the validated record, or `None` when the entry has no usable price
/// or no currency.
pub fn usable_record(raw: RawPriceRecord) -> Option<PriceRecord> {
    let price = raw.price.filter(|p| p.is_finite() && *p > 0.0)?;
    if raw.currency.trim().is_empty() {
        return None;
    }

    Some(PriceRecord {
        currency: raw.currency,
        price,
        date: raw.date,
    })
}

/// Drops unpriced entries and attaches balance and icon to the rest,
/// preserving feed order.
pub fn enrich(records: Vec<RawPriceRecord>) -> Vec<EnrichedToken> {
    let total = records.len();

    let tokens: Vec<EnrichedToken> = records
        .into_iter()
        .filter_map(usable_record)
        .map(|record| EnrichedToken {
            balance: simulated_balance(&record.currency),
            icon: icon_for(&record.currency),
            currency: record.currency,
            price: record.price,
            date: record.date,
        })
        .collect();

    debug!(
        kept = tokens.len(),
        dropped = total - tokens.len(),
        "enriched price feed"
    );

    tokens
}
