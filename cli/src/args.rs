use crate::catalog::price_feed::PRICES_URL;
use crate::form::TradeType;
use crate::quote::OrderType;
use crate::submit::DEFAULT_SUBMIT_DELAY_MS;
use clap::ValueHint;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10; // 0 disables the timeout
pub const DEFAULT_ORDER_TYPE: &str = "market"; // parsed by parser
pub const DEFAULT_TRADE_TYPE: &str = "swap"; // parsed by parser

#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(flatten)]
    pub(crate) catalog: CatalogArgs,

    #[command(subcommand)]
    pub(crate) cmd: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Show the current token prices and balances
    Prices,

    /// Quote a single trade without submitting it
    Quote(QuoteArgs),

    /// Open the interactive trade form
    Trade(TradeArgs),
}

#[derive(Args)]
pub(crate) struct CatalogArgs {
    /// Price feed URL
    #[arg(
        long,
        env = "PRICES_URL",
        value_hint = ValueHint::Url,
        default_value = PRICES_URL,
        global = true
    )]
    pub(crate) prices_url: String,

    /// Seconds to wait for the price feed (0 waits forever)
    #[arg(
        long,
        env = "FETCH_TIMEOUT_SECS",
        default_value_t = DEFAULT_FETCH_TIMEOUT_SECS,
        global = true
    )]
    pub(crate) fetch_timeout_secs: u64,
}

#[derive(Args)]
pub(crate) struct QuoteArgs {
    /// Token to pay with
    #[arg(long)]
    pub(crate) from: String,

    /// Token to receive
    #[arg(long)]
    pub(crate) to: String,

    /// Amount of the `from` token
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) amount: String,

    /// Order type (market | limit).
    #[arg(
        long,
        value_parser = OrderType::from_str,
        default_value = DEFAULT_ORDER_TYPE
    )]
    pub(crate) order_type: OrderType,

    /// Rate to use for limit orders, in `to` per `from`
    #[arg(long)]
    pub(crate) limit_price: Option<String>,

    /// Trade type (swap | buy | sell). Only changes the labels.
    #[arg(
        long,
        value_parser = TradeType::from_str,
        default_value = DEFAULT_TRADE_TYPE
    )]
    pub(crate) trade_type: TradeType,

    /// Print the quote as JSON
    #[arg(long, default_value_t = false)]
    pub(crate) json: bool,
}

#[derive(Args)]
pub(crate) struct TradeArgs {
    /// Read commands from a script instead of prompting
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub(crate) script: Option<PathBuf>,

    /// How long the simulated backend takes per trade, in milliseconds
    #[arg(
        long,
        env = "SUBMIT_DELAY_MS",
        default_value_t = DEFAULT_SUBMIT_DELAY_MS
    )]
    pub(crate) submit_delay_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_defaults_to_a_market_swap() {
        let cli = Cli::try_parse_from([
            "swap", "quote", "--from", "SWTH", "--to", "ETH", "--amount", "100",
        ])
        .unwrap();

        let Command::Quote(args) = cli.cmd else {
            panic!("expected the quote command");
        };
        assert_eq!(args.order_type, OrderType::Market);
        assert_eq!(args.trade_type, TradeType::Swap);
        assert_eq!(args.limit_price, None);
        assert!(!args.json);
    }

    #[test]
    fn quote_accepts_limit_orders() {
        let cli = Cli::try_parse_from([
            "swap",
            "quote",
            "--from",
            "SWTH",
            "--to",
            "ETH",
            "--amount",
            "100",
            "--order-type",
            "LIMIT",
            "--limit-price",
            "0.00005",
            "--trade-type",
            "sell",
        ])
        .unwrap();

        let Command::Quote(args) = cli.cmd else {
            panic!("expected the quote command");
        };
        assert_eq!(args.order_type, OrderType::Limit);
        assert_eq!(args.trade_type, TradeType::Sell);
        assert_eq!(args.limit_price.as_deref(), Some("0.00005"));
    }

    #[test]
    fn global_options_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "swap",
            "trade",
            "--prices-url",
            "http://localhost:8080/prices.json",
            "--fetch-timeout-secs",
            "0",
            "--submit-delay-ms",
            "10",
        ])
        .unwrap();

        assert_eq!(cli.catalog.prices_url, "http://localhost:8080/prices.json");
        assert_eq!(cli.catalog.fetch_timeout_secs, 0);
        let Command::Trade(args) = cli.cmd else {
            panic!("expected the trade command");
        };
        assert_eq!(args.submit_delay_ms, 10);
    }

    fn quote_with(flag: &str, value: &str) -> Result<Cli, clap::Error> {
        Cli::try_parse_from([
            "swap", "quote", "--from", "SWTH", "--to", "ETH", "--amount", "1", flag, value,
        ])
    }

    #[test]
    fn enum_options_use_their_string_forms() {
        let cli = quote_with("--order-type", "Mkt").unwrap();
        let Command::Quote(args) = cli.cmd else {
            panic!("expected the quote command");
        };
        assert_eq!(args.order_type, OrderType::Market);

        assert!(quote_with("--order-type", "stop").is_err());
        assert!(quote_with("--trade-type", "hodl").is_err());
    }
}
