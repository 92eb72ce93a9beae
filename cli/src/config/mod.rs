use crate::args::{CatalogArgs, QuoteArgs, TradeArgs};
use crate::catalog::price_feed::HttpPriceSource;
use crate::catalog::CatalogLoader;
use crate::form::{reduce, FormAction, FormState, TradeType};
use crate::quote::{is_decimal_input, OrderType};
use crate::submit::SubmitConfig;
use anyhow::{ensure, Context, Result};
use derive_builder::Builder;
use dialoguer::console::style;
use reqwest::Url;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Builder, Clone, Debug)]
pub struct CatalogConfig {
    /// Where the price feed lives
    pub prices_url: Url,
    /// Upper bound on a single feed fetch; `None` waits forever
    #[builder(default)]
    pub fetch_timeout: Option<Duration>,
}

impl CatalogConfig {
    pub fn builder() -> CatalogConfigBuilder {
        CatalogConfigBuilder::default()
    }

    pub(crate) fn setup(args: &CatalogArgs) -> Result<CatalogConfig> {
        let prices_url = Url::parse(&args.prices_url)
            .with_context(|| format!("Invalid prices URL '{}'", args.prices_url))?;

        let fetch_timeout =
            (args.fetch_timeout_secs > 0).then(|| Duration::from_secs(args.fetch_timeout_secs));

        Self::builder()
            .prices_url(prices_url)
            .fetch_timeout(fetch_timeout)
            .build()
            .context("Failed to build catalog configuration")
    }

    pub fn loader(&self) -> CatalogLoader<HttpPriceSource> {
        CatalogLoader::new(HttpPriceSource::new(self.prices_url.clone()))
            .with_timeout(self.fetch_timeout)
    }
}

#[derive(Builder, Clone, Debug)]
#[builder(pattern = "owned")]
pub struct QuoteConfig {
    pub catalog: CatalogConfig,
    /// The form as if the user had filled it in by hand
    pub form: FormState,
    #[builder(default)]
    pub json: bool,
}

impl QuoteConfig {
    pub fn builder() -> QuoteConfigBuilder {
        QuoteConfigBuilder::default()
    }

    pub(crate) fn setup(catalog: &CatalogArgs, args: QuoteArgs) -> Result<QuoteConfig> {
        ensure!(
            is_decimal_input(&args.amount),
            "Invalid amount '{}': enter a number",
            args.amount
        );
        if let Some(price) = &args.limit_price {
            ensure!(
                is_decimal_input(price),
                "Invalid limit price '{}': enter a number",
                price
            );
        }

        let catalog = CatalogConfig::setup(catalog)?;
        let form = form_from_args(
            args.trade_type,
            args.order_type,
            args.from,
            args.to,
            args.amount,
            args.limit_price,
        );

        Self::builder()
            .catalog(catalog)
            .form(form)
            .json(args.json)
            .build()
            .context("Failed to build quote configuration")
    }
}

/// Replays the command line through the form reducer.
fn form_from_args(
    trade_type: TradeType,
    order_type: OrderType,
    from: String,
    to: String,
    amount: String,
    limit_price: Option<String>,
) -> FormState {
    let mut actions = vec![
        FormAction::SetTradeType(trade_type),
        FormAction::SetOrderType(order_type),
        FormAction::SelectFrom(from),
        FormAction::SelectTo(to),
        FormAction::SetAmount(amount),
    ];
    if let Some(price) = limit_price {
        actions.push(FormAction::SetLimitPrice(price));
    }
    actions.into_iter().fold(FormState::default(), reduce)
}

#[derive(Builder, Clone, Debug)]
#[builder(pattern = "owned")]
pub struct TradeConfig {
    pub catalog: CatalogConfig,
    #[builder(default)]
    pub submit: SubmitConfig,
    /// Command script to run instead of prompting
    #[builder(default)]
    pub script: Option<PathBuf>,
}

impl TradeConfig {
    pub fn builder() -> TradeConfigBuilder {
        TradeConfigBuilder::default()
    }

    pub(crate) fn setup(catalog: &CatalogArgs, args: TradeArgs) -> Result<TradeConfig> {
        let catalog = CatalogConfig::setup(catalog)?;
        let submit = SubmitConfig::builder()
            .delay(Duration::from_millis(args.submit_delay_ms))
            .build()
            .context("Failed to build submit configuration")?;

        let config = Self::builder()
            .catalog(catalog)
            .submit(submit)
            .script(args.script)
            .build()
            .context("Failed to build trade configuration")?;

        config.print_config_summary();

        Ok(config)
    }

    fn print_config_summary(&self) {
        let kv = |k: &str, v: String| {
            format!(
                "{} {} {}",
                style("✔").green().bold(),
                style(k).bold(),
                style(format!("· {}", v)).dim()
            )
        };

        info!(target: "plain", "{}", kv("Price Feed", self.catalog.prices_url.to_string()));
        info!(target: "plain",
            "{}",
            kv(
                "Fetch Timeout",
                self.catalog
                    .fetch_timeout
                    .map(|t| format!("{}s", t.as_secs()))
                    .unwrap_or_else(|| "none".to_string()),
            )
        );
        info!(target: "plain",
            "{}",
            kv("Simulated Execution", format!("{} ms", self.submit.delay.as_millis()))
        );
        if let Some(script) = &self.script {
            info!(target: "plain", "{}", kv("Script", script.display().to_string()));
        }
        info!(target: "plain", "");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_args(timeout: u64) -> CatalogArgs {
        CatalogArgs {
            prices_url: "https://example.com/prices.json".into(),
            fetch_timeout_secs: timeout,
        }
    }

    #[test]
    fn zero_timeout_disables_it() {
        let config = CatalogConfig::setup(&catalog_args(0)).unwrap();
        assert_eq!(config.fetch_timeout, None);

        let config = CatalogConfig::setup(&catalog_args(7)).unwrap();
        assert_eq!(config.fetch_timeout, Some(Duration::from_secs(7)));
    }

    #[test]
    fn bad_prices_url_is_rejected() {
        let args = CatalogArgs {
            prices_url: "not a url".into(),
            fetch_timeout_secs: 0,
        };
        assert!(CatalogConfig::setup(&args).is_err());
    }

    #[test]
    fn quote_form_is_built_from_arguments() {
        let form = form_from_args(
            TradeType::Buy,
            OrderType::Limit,
            "USDC".into(),
            "ETH".into(),
            "10".into(),
            Some("0.0005".into()),
        );

        assert_eq!(form.trade_type, TradeType::Buy);
        assert_eq!(form.from_token, "USDC");
        assert_eq!(form.limit_price, "0.0005");
        assert!(form.can_submit());
    }

    fn quote_args(amount: &str, limit_price: Option<&str>) -> QuoteArgs {
        QuoteArgs {
            from: "SWTH".into(),
            to: "ETH".into(),
            amount: amount.into(),
            order_type: OrderType::Limit,
            limit_price: limit_price.map(Into::into),
            trade_type: TradeType::Swap,
            json: false,
        }
    }

    #[test]
    fn quote_rejects_non_numeric_input() {
        let catalog = catalog_args(0);

        assert!(QuoteConfig::setup(&catalog, quote_args("100", Some("0.00005"))).is_ok());

        let err = QuoteConfig::setup(&catalog, quote_args("ten", None)).unwrap_err();
        assert!(err.to_string().contains("Invalid amount 'ten'"));

        let err = QuoteConfig::setup(&catalog, quote_args("100", Some("cheap"))).unwrap_err();
        assert!(err.to_string().contains("Invalid limit price"));
    }

    #[test]
    fn trade_config_defaults() {
        let config = TradeConfig::builder()
            .catalog(CatalogConfig::setup(&catalog_args(0)).unwrap())
            .build()
            .unwrap();

        assert_eq!(config.submit.delay, SubmitConfig::default().delay);
        assert!(config.script.is_none());
    }
}
