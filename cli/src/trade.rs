use crate::catalog::price_feed::PriceSource;
use crate::catalog::{CatalogLoader, CatalogStatus};
use crate::form::session::SwapSession;
use crate::submit::{Receipt, SubmissionError, SwapSubmitter};
use crate::ui::io_input::{next_trade_command, TradeCommand};
use crate::ui::spinner::with_spinner;
use crate::ui::user_messages::{
    display_catalog, display_catalog_error, display_form, display_receipt, display_submission_error,
    display_submit_blocked,
};
use anyhow::bail;
use tracing::{debug, warn};

/// Runs the interactive trade form until the input source is exhausted or the
/// session is torn down. Returns the receipts of every completed trade.
pub async fn run_trade<S, T>(
    loader: &CatalogLoader<S>,
    session: &mut SwapSession<T>,
) -> anyhow::Result<Vec<Receipt>>
where
    S: PriceSource,
    T: SwapSubmitter,
{
    let status: CatalogStatus = with_spinner("Loading token prices...", loader.load())
        .await
        .inspect_err(display_catalog_error)
        .into();

    let mut catalog = match status {
        CatalogStatus::Ready(catalog) => catalog,
        CatalogStatus::Failed(reason) => bail!("Cannot open the trade form: {reason}"),
    };
    display_catalog(&catalog);

    let mut receipts = Vec::new();

    while !session.is_closed() {
        let Some(command) = next_trade_command(session.state(), &catalog)? else {
            debug!("input exhausted, closing the trade form");
            break;
        };

        match command {
            TradeCommand::Form(action) => session.dispatch(action),
            TradeCommand::Submit if !session.submit_enabled() => {
                display_submit_blocked(session.state());
            }
            TradeCommand::Submit => {
                let pending = session.state().trade_type.pending_label();
                match with_spinner(pending, session.submit(&catalog)).await {
                    Ok(receipt) => {
                        display_receipt(&receipt);
                        receipts.push(receipt);
                    }
                    Err(SubmissionError::Cancelled) => break,
                    Err(err) => display_submission_error(&err),
                }
            }
            TradeCommand::RefreshPrices => {
                match with_spinner("Refreshing token prices...", loader.refresh()).await {
                    Ok(fresh) => {
                        catalog = fresh;
                        display_catalog(&catalog);
                    }
                    Err(err) => {
                        warn!("price refresh failed, keeping the previous catalog: {err}");
                        display_catalog_error(&err);
                    }
                }
            }
        }

        display_form(session.state(), &catalog);
    }

    debug!(trades = receipts.len(), "trade form closed");
    Ok(receipts)
}
