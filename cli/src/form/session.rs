use super::{reduce, FormAction, FormState};
use crate::catalog::Catalog;
use crate::quote::QuoteResult;
use crate::submit::{Receipt, SubmissionError, SwapRequest, SwapSubmitter};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// One open swap form plus the backend it submits to.
///
/// The teardown token stands for the form going away. Once it fires, a
/// pending submission is abandoned and the session state is left alone.
pub struct SwapSession<T> {
    state: FormState,
    submitter: T,
    teardown: CancellationToken,
}

impl<T: SwapSubmitter> SwapSession<T> {
    pub fn new(submitter: T) -> Self {
        Self::with_teardown(submitter, CancellationToken::new())
    }

    pub fn with_teardown(submitter: T, teardown: CancellationToken) -> Self {
        Self {
            state: FormState::default(),
            submitter,
            teardown,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn teardown_token(&self) -> CancellationToken {
        self.teardown.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.teardown.is_cancelled()
    }

    pub fn dispatch(&mut self, action: FormAction) {
        debug!(?action, "form action");
        let current = std::mem::take(&mut self.state);
        self.state = reduce(current, action);
    }

    pub fn submit_enabled(&self) -> bool {
        !self.is_closed() && self.state.can_submit()
    }

    pub fn quote(&self, catalog: &Catalog) -> QuoteResult {
        self.state.quote(catalog)
    }

    /// Submits the current form. On success the form is reset.
    pub async fn submit(&mut self, catalog: &Catalog) -> Result<Receipt, SubmissionError> {
        if self.is_closed() {
            return Err(SubmissionError::Cancelled);
        }
        if !self.state.can_submit() {
            return Err(SubmissionError::Incomplete);
        }

        let request = SwapRequest::from_form(&self.state, catalog);
        info!(
            trade = %request.trade_type,
            from = %request.quote_request.from_currency,
            to = %request.quote_request.to_currency,
            amount = %request.quote_request.amount,
            "submitting trade"
        );

        let receipt = tokio::select! {
            biased;
            _ = self.teardown.cancelled() => {
                warn!("session closed while a trade was pending; dropping the result");
                return Err(SubmissionError::Cancelled);
            }
            result = self.submitter.submit(&request) => result?,
        };

        self.state = FormState::default();
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::price_feed::RawPriceRecord;
    use crate::form::TradeType;
    use crate::quote::OrderType;
    use crate::submit::{SimulatedSubmitter, SubmitConfig};
    use async_trait::async_trait;
    use std::time::Duration;

    fn catalog() -> Catalog {
        Catalog::from_records(vec![
            RawPriceRecord {
                currency: "SWTH".into(),
                price: Some(0.02),
                date: String::new(),
            },
            RawPriceRecord {
                currency: "ETH".into(),
                price: Some(1800.0),
                date: String::new(),
            },
        ])
    }

    fn simulated(delay_ms: u64) -> SimulatedSubmitter {
        SimulatedSubmitter::new(SubmitConfig {
            delay: Duration::from_millis(delay_ms),
        })
    }

    fn fill(session: &mut SwapSession<impl SwapSubmitter>) {
        session.dispatch(FormAction::SelectFrom("SWTH".into()));
        session.dispatch(FormAction::SelectTo("ETH".into()));
        session.dispatch(FormAction::SetAmount("100".into()));
    }

    struct RejectingSubmitter;

    #[async_trait]
    impl SwapSubmitter for RejectingSubmitter {
        async fn submit(&self, _request: &SwapRequest) -> Result<Receipt, SubmissionError> {
            Err(SubmissionError::Rejected("venue closed".into()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn successful_submit_resets_the_form() {
        let mut session = SwapSession::new(simulated(1500));
        fill(&mut session);
        session.dispatch(FormAction::SetTradeType(TradeType::Sell));
        assert!(session.submit_enabled());

        let receipt = session.submit(&catalog()).await.unwrap();

        assert_eq!(receipt.request.trade_type, TradeType::Sell);
        assert_eq!(receipt.request.quote_request.amount, "100");
        assert_eq!(receipt.request.quote.estimated_output.map(f64::round), Some(9_000_000.0));
        assert_eq!(session.state(), &FormState::default());
    }

    #[tokio::test]
    async fn incomplete_form_is_not_submitted() {
        let mut session = SwapSession::new(simulated(0));
        session.dispatch(FormAction::SelectFrom("SWTH".into()));
        session.dispatch(FormAction::SetOrderType(OrderType::Limit));

        assert!(!session.submit_enabled());
        let err = session.submit(&catalog()).await.unwrap_err();

        assert_eq!(err, SubmissionError::Incomplete);
        assert_eq!(session.state().from_token, "SWTH");
    }

    #[tokio::test]
    async fn rejected_trade_keeps_the_form() {
        let mut session = SwapSession::new(RejectingSubmitter);
        fill(&mut session);

        let err = session.submit(&catalog()).await.unwrap_err();

        assert!(matches!(err, SubmissionError::Rejected(_)));
        assert!(session.state().can_submit());
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_during_submit_leaves_state_alone() {
        let mut session = SwapSession::new(simulated(1500));
        fill(&mut session);
        let token = session.teardown_token();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            token.cancel();
        });

        let err = session.submit(&catalog()).await.unwrap_err();

        assert_eq!(err, SubmissionError::Cancelled);
        assert!(session.is_closed());
        assert_eq!(session.state().amount, "100");
        assert!(!session.submit_enabled());
    }
}
