use crate::args::{Cli, Command};
use crate::config::{CatalogConfig, QuoteConfig, TradeConfig};
use crate::form::session::SwapSession;
use crate::submit::SimulatedSubmitter;
use crate::trade::run_trade;
use crate::ui::io_input::{with_input_source, StdinInputSource, VecInputSource};
use crate::ui::spinner::with_spinner;
use crate::ui::user_messages::{display_catalog, display_form, display_session_summary, display_submit_blocked};
use anyhow::{bail, Context};
use clap::Parser;
use serde_json::json;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub enum Application {
    Prices(CatalogConfig),
    Quote(QuoteConfig),
    Trade(TradeConfig),
}

impl Application {
    pub async fn init() -> anyhow::Result<Application> {
        // Preload environment variables from .env file if it exists before parsing CLI args
        dotenvy::dotenv().ok();

        let cli = Cli::parse();

        let application = match cli.cmd {
            Command::Prices => Application::Prices(CatalogConfig::setup(&cli.catalog)?),
            Command::Quote(args) => Application::Quote(QuoteConfig::setup(&cli.catalog, args)?),
            Command::Trade(args) => Application::Trade(TradeConfig::setup(&cli.catalog, args)?),
        };

        Ok(application)
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        match self {
            Self::Prices(config) => run_prices(config).await,
            Self::Quote(config) => run_quote(config).await,
            Self::Trade(config) => run_trade_session(config).await,
        }
    }
}

async fn run_prices(config: &CatalogConfig) -> anyhow::Result<()> {
    let catalog = with_spinner("Loading token prices...", config.loader().load())
        .await
        .context("Failed to load token prices")?;

    display_catalog(&catalog);
    Ok(())
}

async fn run_quote(config: &QuoteConfig) -> anyhow::Result<()> {
    let catalog = with_spinner("Loading token prices...", config.catalog.loader().load())
        .await
        .context("Failed to load token prices")?;

    let form = &config.form;
    let quote = form.quote(&catalog);

    if config.json {
        let out = json!({
            "trade_type": form.trade_type,
            "request": form.quote_request(),
            "quote": quote,
            "submittable": form.can_submit(),
        });
        info!(target: "plain", "{}", serde_json::to_string_pretty(&out)?);
    } else {
        display_form(form, &catalog);
    }

    if !form.can_submit() {
        if !config.json {
            display_submit_blocked(form);
        }
        bail!("The {} form is incomplete", form.trade_type);
    }
    if !quote.is_available() {
        bail!(
            "No quote available for {} -> {}",
            form.from_token,
            form.to_token
        );
    }

    Ok(())
}

async fn run_trade_session(config: &TradeConfig) -> anyhow::Result<()> {
    let loader = config.catalog.loader();

    let teardown = CancellationToken::new();
    let mut session =
        SwapSession::with_teardown(SimulatedSubmitter::new(config.submit.clone()), teardown.clone());

    let scripted = config.script.as_deref().map(load_script).transpose()?;

    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, closing the trade form");
            teardown.cancel();
        }
    });

    let receipts = match scripted {
        Some(source) => with_input_source(source, run_trade(&loader, &mut session)).await,
        None => with_input_source(StdinInputSource, run_trade(&loader, &mut session)).await,
    };

    watcher.abort();

    let receipts = receipts?;
    display_session_summary(&receipts);
    Ok(())
}

fn load_script(path: &Path) -> anyhow::Result<VecInputSource> {
    let script = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    VecInputSource::from_script(&script)
        .with_context(|| format!("Failed to parse script {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreadable_or_invalid_scripts_fail_up_front() {
        let missing = std::env::temp_dir().join("token-swap-no-such-script.txt");
        let err = load_script(&missing).err().unwrap();
        assert!(err.to_string().contains("Failed to read script"));

        let bad = std::env::temp_dir().join(format!("token-swap-bad-script-{}.txt", std::process::id()));
        std::fs::write(&bad, "from SWTH\namount ten\n").unwrap();
        let err = load_script(&bad).err().unwrap();
        std::fs::remove_file(&bad).ok();
        assert!(format!("{err:#}").contains("script line 2"));
    }
}
