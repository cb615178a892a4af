//! Market data endpoint tests.

use axum::http::Method;
use chrono::{TimeZone, Utc};
use schwab_client::{Error, Market, QuoteField};
use schwab_tests::{MockResponse, MockServer};
use serde_json::json;

#[tokio::test]
async fn test_single_quote() {
    let server = MockServer::start().await;
    server.respond(
        Method::GET,
        "/marketdata/v1/AAPL/quotes",
        MockResponse::json(json!({
            "AAPL": {
                "assetMainType": "EQUITY",
                "symbol": "AAPL",
                "realtime": true,
                "quote": {"bidPrice": 187.30, "askPrice": 187.35}
            }
        })),
    );

    let quotes = server
        .client("t")
        .get_quote("AAPL", &[QuoteField::Quote, QuoteField::Fundamental])
        .await
        .expect("Failed to get quote");

    let quote = quotes["AAPL"].quote.as_ref().unwrap();
    assert_eq!(quote.ask_price, Some(187.35));

    let request = &server.requests()[0];
    assert_eq!(request.query_param("fields"), Some("quote,fundamental"));
}

#[tokio::test]
async fn test_multiple_quotes_join_symbols() {
    let server = MockServer::start().await;
    server.respond(
        Method::GET,
        "/marketdata/v1/quotes",
        MockResponse::json(json!({
            "AAPL": {"symbol": "AAPL"},
            "MSFT": {"symbol": "MSFT"}
        })),
    );

    let quotes = server
        .client("t")
        .get_quotes(&["AAPL", "MSFT"], &[], Some(true))
        .await
        .expect("Failed to get quotes");

    assert_eq!(quotes.len(), 2);
    let request = &server.requests()[0];
    assert_eq!(request.query_param("symbols"), Some("AAPL,MSFT"));
    assert_eq!(request.query_param("indicative"), Some("true"));
    assert_eq!(request.query_param("fields"), None);
}

#[tokio::test]
async fn test_option_expiration_chain() {
    let server = MockServer::start().await;
    server.respond(
        Method::GET,
        "/marketdata/v1/expirationchain",
        MockResponse::json(json!({
            "expirationList": [
                {"expirationDate": "2024-03-15", "daysToExpiration": 10, "expirationType": "M"},
                {"expirationDate": "2024-03-22", "daysToExpiration": 17, "expirationType": "W"}
            ]
        })),
    );

    let chain = server
        .client("t")
        .get_option_expiration_chain("AAPL")
        .await
        .expect("Failed to get expiration chain");

    assert_eq!(chain.expiration_list.len(), 2);
    assert_eq!(chain.expiration_list[0].expiration_date, "2024-03-15");
    assert_eq!(server.requests()[0].query_param("symbol"), Some("AAPL"));
}

#[tokio::test]
async fn test_daily_price_history_uses_epoch_millis() {
    let server = MockServer::start().await;
    server.respond(
        Method::GET,
        "/marketdata/v1/pricehistory",
        MockResponse::json(json!({
            "symbol": "AAPL",
            "empty": false,
            "candles": [
                {"open": 1.0, "high": 2.0, "low": 0.5, "close": 1.5, "volume": 100.0,
                 "datetime": 1704153600000_i64}
            ]
        })),
    );
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();

    let history = server
        .client("t")
        .get_price_history_every_day("AAPL", Some(start), Some(end))
        .await
        .expect("Failed to get price history");

    assert_eq!(history.candles.len(), 1);
    let request = &server.requests()[0];
    assert_eq!(request.query_param("symbol"), Some("AAPL"));
    assert_eq!(request.query_param("periodType"), Some("year"));
    assert_eq!(request.query_param("frequencyType"), Some("daily"));
    assert_eq!(request.query_param("startDate"), Some("1704067200000"));
    assert_eq!(request.query_param("endDate"), Some("1706745600000"));
}

#[tokio::test]
async fn test_market_hours_requires_a_market() {
    let server = MockServer::start().await;

    let err = server
        .client("t")
        .get_market_hours(&[], None)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidRequest(_)));
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn test_market_hours_for_date() {
    let server = MockServer::start().await;
    server.respond(
        Method::GET,
        "/marketdata/v1/markets",
        MockResponse::json(json!({})),
    );

    server
        .client("t")
        .get_market_hours(
            &[Market::Equity, Market::Option],
            chrono::NaiveDate::from_ymd_opt(2024, 3, 15),
        )
        .await
        .expect("Failed to get market hours");

    let request = &server.requests()[0];
    assert_eq!(request.query_param("markets"), Some("equity,option"));
    assert_eq!(request.query_param("date"), Some("2024-03-15"));
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let server = MockServer::start().await;
    server.respond(
        Method::GET,
        "/marketdata/v1/AAPL/quotes",
        MockResponse::status(503, "unavailable"),
    );

    let err = server.client("t").get_quote("AAPL", &[]).await.unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert_eq!(server.requests().len(), 1);
}
