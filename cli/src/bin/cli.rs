use anyhow::{Context, Result};
use dialoguer::console::style;
use token_swap::Application;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging().context("initializing logging")?;

    print_welcome();

    Application::init().await?.run().await
}

fn init_logging() -> anyhow::Result<()> {
    // plain layer (only target="plain")
    let plain_fmt = tracing_subscriber::fmt::format()
        .without_time()
        .with_level(false)
        .with_target(false)
        .compact();
    let plain_layer = tracing_subscriber::fmt::layer()
        .event_format(plain_fmt)
        .with_filter(Targets::new().with_target("plain", LevelFilter::TRACE));

    // RUST_LOG wins; otherwise only our own crate logs at info
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,token_swap=info"));

    let rich_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(plain_layer)
        .with(rich_layer)
        .init();

    Ok(())
}

fn print_welcome() {
    let sep = style("◆").blue().bold();
    let title = style("Token Swap").bold();
    let subtitle = style("Quote and place simulated token swaps against live prices.").dim();

    info!(target: "plain", "\n{sep} {title} {sep}\n{subtitle}\n");
}
