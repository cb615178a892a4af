//! Tests for generating code from an account's latest order.

use axum::http::Method;
use schwab_api::order_codegen::{AccountSelector, latest_order_code};
use schwab_api::{Error, ErrorKind};
use schwab_tests::{MockResponse, MockServer};
use serde_json::{Value, json};

fn equity_order(order_id: i64, symbol: &str, price: f64) -> Value {
    json!({
        "session": "NORMAL",
        "duration": "DAY",
        "orderType": "LIMIT",
        "quantity": 10.0,
        "filledQuantity": 10.0,
        "price": price,
        "orderStrategyType": "SINGLE",
        "orderId": order_id,
        "status": "FILLED",
        "enteredTime": "2024-03-01T15:00:00+0000",
        "orderLegCollection": [{
            "orderLegType": "EQUITY",
            "legId": 1,
            "instrument": {"assetType": "EQUITY", "symbol": symbol, "instrumentId": 1234},
            "instruction": "BUY",
            "positionEffect": "OPENING",
            "quantity": 10.0
        }]
    })
}

#[tokio::test]
async fn test_latest_order_by_account_number() {
    let server = MockServer::start().await;
    server.respond(
        Method::GET,
        "/trader/v1/accounts/accountNumbers",
        MockResponse::json(json!([
            {"accountNumber": "11111111", "hashValue": "HASH0"},
            {"accountNumber": "12345678", "hashValue": "HASH1"}
        ])),
    );
    server.respond(
        Method::GET,
        "/trader/v1/accounts/HASH1/orders",
        MockResponse::json(json!([
            equity_order(1001, "MSFT", 410.5),
            equity_order(1003, "AAPL", 187.35),
            equity_order(1002, "NVDA", 880.0)
        ])),
    );

    let latest = latest_order_code(
        &server.client("t"),
        &AccountSelector::AccountId("12345678".to_string()),
    )
    .await
    .expect("Failed to generate code")
    .expect("No order found");

    assert_eq!(latest.order_id, 1003);
    assert!(latest.code.contains(".set_price(dec!(187.35))?"));
    assert!(
        latest
            .code
            .contains(r#".add_equity_leg(EquityInstruction::Buy, "AAPL", 10)?"#)
    );
    assert!(latest.render().starts_with("# Order ID 1003\n"));
}

#[tokio::test]
async fn test_all_accounts_without_orders() {
    let server = MockServer::start().await;
    server.respond(Method::GET, "/trader/v1/orders", MockResponse::json(json!([])));

    let latest = latest_order_code(&server.client("t"), &AccountSelector::All)
        .await
        .unwrap();

    assert!(latest.is_none());
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn test_unknown_account_number() {
    let server = MockServer::start().await;
    server.respond(
        Method::GET,
        "/trader/v1/accounts/accountNumbers",
        MockResponse::json(json!([{"accountNumber": "11111111", "hashValue": "HASH0"}])),
    );

    let err = latest_order_code(
        &server.client("t"),
        &AccountSelector::AccountId("99999999".to_string()),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, Error::AccountNotFound(ref id) if id == "99999999"));
}

#[tokio::test]
async fn test_latest_order_with_children_is_unsupported() {
    let server = MockServer::start().await;
    let mut oco = equity_order(2000, "AAPL", 190.0);
    oco["orderStrategyType"] = json!("OCO");
    oco["childOrderStrategies"] = json!([
        equity_order(2001, "AAPL", 195.0),
        equity_order(2002, "AAPL", 185.0)
    ]);
    server.respond(
        Method::GET,
        "/trader/v1/accounts/HASH1/orders",
        MockResponse::json(json!([oco])),
    );

    let err = latest_order_code(
        &server.client("t"),
        &AccountSelector::AccountHash("HASH1".to_string()),
    )
    .await
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
}
