use crate::catalog::{Catalog, CatalogError};
use crate::form::FormState;
use crate::quote::{parse_decimal, OrderType, QuoteResult};
use crate::submit::{Receipt, SubmissionError};
use crate::ui::format::format_number;
use dialoguer::console::style;
use tracing::info;

pub(crate) fn display_catalog(catalog: &Catalog) {
    if catalog.is_empty() {
        info!(target: "plain", "{} The price feed returned no tradable tokens.", style("⚠").yellow());
        return;
    }

    info!(target: "plain",
        "{}",
        style(format!(
            "{:<10} {:>16} {:>16}  {:<20}  {}",
            "Token", "Price (USD)", "Balance", "As of", "Icon"
        ))
        .bold()
    );
    for token in catalog.tokens() {
        let as_of = token
            .as_of()
            .map(|d| d.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| "-".to_string());
        info!(target: "plain",
            "{:<10} {:>16} {:>16}  {:<20}  {}",
            token.currency,
            format_number(token.price),
            format_number(token.balance),
            as_of,
            style(&token.icon).dim(),
        );
    }
    info!(target: "plain", "{}", style(format!("{} tokens", catalog.len())).dim());
}

pub(crate) fn display_quote(state: &FormState, quote: &QuoteResult) {
    if let Some(rate) = quote.rate {
        info!(target: "plain",
            "{} 1 {} = {} {}",
            style("≈").cyan(),
            state.from_token,
            format_number(rate),
            state.to_token,
        );
    }
    if let Some(output) = quote.estimated_output {
        info!(target: "plain",
            "{} {} {}",
            style("You receive about").dim(),
            style(format_number(output)).bold(),
            state.to_token,
        );
    }
}

pub(crate) fn display_form(state: &FormState, catalog: &Catalog) {
    let balance = catalog
        .find(&state.from_token)
        .map(|t| format_number(t.balance))
        .unwrap_or_else(|| "-".to_string());

    info!(target: "plain",
        "\n{} {} / {}",
        style("▸").blue(),
        style(state.trade_type.submit_label()).bold(),
        state.order_type,
    );
    if !state.from_token.is_empty() {
        info!(target: "plain",
            "  {}: {} {}",
            state.trade_type.from_label(),
            state.from_token,
            style(format!("(balance {balance})")).dim(),
        );
    }
    display_quote(state, &state.quote(catalog));
}

pub(crate) fn display_receipt(receipt: &Receipt) {
    let request = &receipt.request.quote_request;
    info!(target: "plain",
        "{} {} {} {} → {} {}",
        style("✔").green(),
        style(receipt.request.trade_type.submit_label()).bold(),
        request.amount,
        request.from_currency,
        receipt
            .request
            .quote
            .estimated_output
            .map(format_number)
            .unwrap_or_else(|| "?".to_string()),
        request.to_currency,
    );
    info!(target: "plain",
        "  {} {} at {}",
        style("reference").dim(),
        receipt.reference,
        receipt.completed_at.format("%H:%M:%S UTC"),
    );
}

pub(crate) fn display_submit_blocked(state: &FormState) {
    let mut missing = Vec::new();
    if state.from_token.trim().is_empty() {
        missing.push(state.trade_type.from_label());
    }
    if state.to_token.trim().is_empty() {
        missing.push(state.trade_type.to_label());
    }
    if parse_decimal(&state.amount).is_none() {
        missing.push("Amount");
    }
    if state.order_type == OrderType::Limit && parse_decimal(&state.limit_price).is_none() {
        missing.push("Limit Price");
    }

    info!(target: "plain",
        "{} Cannot {} yet. Missing or not a number: {}",
        style("✖").red(),
        state.trade_type.submit_label().to_lowercase(),
        missing.join(", "),
    );
}

pub(crate) fn display_catalog_error(err: &CatalogError) {
    info!(target: "plain",
        "{} {}\n{}",
        style("✖").red(),
        style("Could not load token prices").bold(),
        style(err).dim(),
    );
}

pub(crate) fn display_submission_error(err: &SubmissionError) {
    info!(target: "plain", "{} {}", style("✖").red(), err);
}

pub(crate) fn display_session_summary(receipts: &[Receipt]) {
    if receipts.is_empty() {
        info!(target: "plain", "No trades were placed during this session.");
    } else {
        info!(target: "plain",
            "\n{} {}",
            style("✔").green(),
            style(format!("{} trade(s) placed during this session", receipts.len())).bold(),
        );
    }
}
