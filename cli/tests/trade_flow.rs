use async_trait::async_trait;
use std::time::Duration;
use token_swap::{
    run_trade, with_input_source, CatalogError, CatalogLoader, FormState, OrderType, PriceSource,
    RawPriceRecord, SimulatedSubmitter, SubmitConfig, SwapSession, TradeType, VecInputSource,
};

struct FakeFeed;

#[async_trait]
impl PriceSource for FakeFeed {
    async fn fetch_prices(&self) -> Result<Vec<RawPriceRecord>, CatalogError> {
        let body = r#"[
            {"currency":"SWTH","date":"2023-08-29T07:10:52.000Z","price":0.02},
            {"currency":"ETH","date":"2023-08-29T07:10:52.000Z","price":1800},
            {"currency":"USDC","date":"2023-08-29T07:10:52.000Z","price":1},
            {"currency":"ZIL","date":"2023-08-29T07:10:52.000Z"}
        ]"#;
        Ok(serde_json::from_str(body)?)
    }
}

fn session() -> SwapSession<SimulatedSubmitter> {
    SwapSession::new(SimulatedSubmitter::new(
        SubmitConfig::builder()
            .delay(Duration::from_millis(1500))
            .build()
            .unwrap(),
    ))
}

#[tokio::test(start_paused = true)]
async fn scripted_session_places_each_trade() {
    let loader = CatalogLoader::new(FakeFeed);
    let mut session = session();
    let script = VecInputSource::from_script(
        r#"
        # market swap, then flip the pair
        from SWTH
        to ETH
        amount 100
        switch
        submit

        # a buy without an amount is refused
        trade buy
        from USDC
        to ETH
        submit

        amount 10
        order limit
        limit 0.0005
        submit
        "#,
    )
    .unwrap();

    let receipts = with_input_source(script, run_trade(&loader, &mut session))
        .await
        .unwrap();

    assert_eq!(receipts.len(), 2);

    let swap = &receipts[0].request;
    assert_eq!(swap.trade_type, TradeType::Swap);
    assert_eq!(swap.quote_request.from_currency, "ETH");
    assert_eq!(swap.quote_request.to_currency, "SWTH");
    let rate = swap.quote.rate.unwrap();
    assert!((rate - 1.0 / 90_000.0).abs() < 1e-12);

    let buy = &receipts[1].request;
    assert_eq!(buy.trade_type, TradeType::Buy);
    assert_eq!(buy.quote_request.order_type, OrderType::Limit);
    assert_eq!(buy.quote.rate, Some(0.0005));
    assert_eq!(buy.quote.estimated_output, Some(10.0 * 0.0005));

    assert_eq!(session.state(), &FormState::default());
    assert_eq!(loader.cached().map(|c| c.len()), Some(3));
}

#[tokio::test(start_paused = true)]
async fn closing_the_session_abandons_the_pending_trade() {
    let loader = CatalogLoader::new(FakeFeed);
    let mut session = session();
    let teardown = session.teardown_token();
    let script = VecInputSource::from_script("from USDC\nto ETH\namount 5\nsubmit\n").unwrap();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        teardown.cancel();
    });

    let receipts = with_input_source(script, run_trade(&loader, &mut session))
        .await
        .unwrap();

    assert!(receipts.is_empty());
    assert!(session.is_closed());
    assert_eq!(session.state().amount, "5");
}
