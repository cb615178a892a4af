//! Unit tests for types module.

use super::*;
use chrono::TimeZone;
use std::str::FromStr;

// ============================================================================
// Order Enum Tests
// ============================================================================

#[test]
fn test_instruction_wire_names() {
    assert_eq!(Instruction::BuyToOpen.to_string(), "BUY_TO_OPEN");
    assert_eq!(Instruction::SellShort.as_ref(), "SELL_SHORT");
    assert_eq!(
        serde_json::to_string(&Instruction::BuyToCover).unwrap(),
        "\"BUY_TO_COVER\""
    );
}

#[test]
fn test_instruction_from_str() {
    assert_eq!(
        Instruction::from_str("SELL_TO_CLOSE").unwrap(),
        Instruction::SellToClose
    );
    assert!(Instruction::from_str("sideways").is_err());
}

#[test]
fn test_order_type_and_duration_serialization() {
    assert_eq!(
        serde_json::to_string(&OrderType::NetDebit).unwrap(),
        "\"NET_DEBIT\""
    );
    assert_eq!(
        serde_json::to_string(&OrderDuration::GoodTillCancel).unwrap(),
        "\"GOOD_TILL_CANCEL\""
    );
    let strategy: OrderStrategyType = serde_json::from_str("\"OCO\"").unwrap();
    assert_eq!(strategy, OrderStrategyType::Oco);
}

#[test]
fn test_unknown_asset_type_falls_back() {
    let asset: AssetType = serde_json::from_str("\"SOMETHING_NEW\"").unwrap();
    assert_eq!(asset, AssetType::Unknown);
}

#[test]
fn test_unknown_order_status_falls_back() {
    let status: OrderStatus = serde_json::from_str("\"PENDING_SOMETHING\"").unwrap();
    assert_eq!(status, OrderStatus::Unknown);

    let filled: OrderStatus = serde_json::from_str("\"FILLED\"").unwrap();
    assert_eq!(filled, OrderStatus::Filled);
}

// ============================================================================
// Query Enum Tests
// ============================================================================

#[test]
fn test_mover_index_symbols() {
    assert_eq!(MoverIndex::Djia.as_ref(), "$DJI");
    assert_eq!(MoverIndex::Spx.to_string(), "$SPX");
    assert_eq!(MoverIndex::from_str("EQUITY_ALL").unwrap(), MoverIndex::EquityAll);
}

#[test]
fn test_query_enum_casing() {
    assert_eq!(QuoteField::Fundamental.as_ref(), "fundamental");
    assert_eq!(Market::Option.as_ref(), "option");
    assert_eq!(Projection::DescRegex.as_ref(), "desc-regex");
    assert_eq!(TransactionType::ReceiveAndDeliver.as_ref(), "RECEIVE_AND_DELIVER");
    assert_eq!(FrequencyType::Minute.as_ref(), "minute");
}

// ============================================================================
// Query Encoding Tests
// ============================================================================

#[test]
fn test_format_datetime_millis() {
    let dt = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
    assert_eq!(format_datetime(&dt), "2024-05-06T07:08:09.000Z");

    let dt = dt + chrono::Duration::milliseconds(456);
    assert_eq!(format_datetime(&dt), "2024-05-06T07:08:09.000Z");
}

#[test]
fn test_transactions_query_default_is_trades() {
    let query = TransactionsQuery::default();
    assert_eq!(query.types, vec![TransactionType::Trade]);
    assert_eq!(serde_urlencoded::to_string(&query).unwrap(), "types=TRADE");
}

#[test]
fn test_transactions_query_encoding() {
    let query = TransactionsQuery {
        start_date: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
        end_date: None,
        types: vec![TransactionType::Trade, TransactionType::Journal],
        symbol: Some("AAPL".to_string()),
    };

    assert_eq!(
        serde_urlencoded::to_string(&query).unwrap(),
        "startDate=2024-01-01T00%3A00%3A00.000Z&types=TRADE%2CJOURNAL&symbol=AAPL"
    );
}

#[test]
fn test_empty_orders_query_encodes_nothing() {
    assert_eq!(
        serde_urlencoded::to_string(OrdersQuery::default()).unwrap(),
        ""
    );
}

#[test]
fn test_price_history_query_uses_epoch_millis() {
    let query = PriceHistoryQuery {
        end_datetime: Some(Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 1).unwrap()),
        need_previous_close: Some(true),
        ..PriceHistoryQuery::new("SPY")
    };

    assert_eq!(
        serde_urlencoded::to_string(&query).unwrap(),
        "symbol=SPY&endDate=1000&needPreviousClose=true"
    );
}

#[test]
fn test_movers_query_encoding() {
    let query = MoversQuery {
        sort: Some(MoverSort::PercentChangeUp),
        frequency: None,
    };
    assert_eq!(
        serde_urlencoded::to_string(&query).unwrap(),
        "sort=PERCENT_CHANGE_UP"
    );
}

// ============================================================================
// Order Response Tests
// ============================================================================

const FILLED_LIMIT_ORDER: &str = r#"{
    "session": "NORMAL",
    "duration": "DAY",
    "orderType": "LIMIT",
    "complexOrderStrategyType": "NONE",
    "quantity": 10,
    "filledQuantity": 10,
    "remainingQuantity": 0,
    "price": 187.35,
    "orderLegCollection": [{
        "orderLegType": "EQUITY",
        "legId": 1,
        "instrument": {"assetType": "EQUITY", "cusip": "037833100", "symbol": "AAPL", "instrumentId": 1973757747},
        "instruction": "BUY",
        "positionEffect": "OPENING",
        "quantity": 10
    }],
    "orderStrategyType": "SINGLE",
    "orderId": 1000123,
    "cancelable": false,
    "editable": false,
    "status": "FILLED",
    "enteredTime": "2024-03-01T14:30:00+0000",
    "accountNumber": 12345678
}"#;

#[test]
fn test_order_deserialization() {
    let order: Order = serde_json::from_str(FILLED_LIMIT_ORDER).unwrap();

    assert_eq!(order.order_id, Some(1000123));
    assert_eq!(order.order_type, Some(OrderType::Limit));
    assert_eq!(order.price, Some(Decimal::from_str("187.35").unwrap()));
    assert_eq!(order.quantity, Some(Decimal::from(10)));
    assert_eq!(order.status, Some(OrderStatus::Filled));
    assert!(order.child_order_strategies.is_empty());

    let leg = &order.order_leg_collection[0];
    assert_eq!(leg.instruction, Instruction::Buy);
    assert_eq!(leg.instrument.asset_type, AssetType::Equity);
    assert_eq!(leg.instrument.symbol, "AAPL");
    assert_eq!(leg.leg_id, Some(1));
}

#[test]
fn test_order_with_children_deserialization() {
    let json = r#"{
        "orderStrategyType": "OCO",
        "childOrderStrategies": [
            {"orderStrategyType": "SINGLE", "orderType": "LIMIT", "price": 45.97},
            {"orderStrategyType": "SINGLE", "orderType": "STOP", "stopPrice": 37.03}
        ]
    }"#;

    let order: Order = serde_json::from_str(json).unwrap();

    assert_eq!(order.order_strategy_type, Some(OrderStrategyType::Oco));
    assert!(order.order_leg_collection.is_empty());
    assert_eq!(order.child_order_strategies.len(), 2);
    assert_eq!(
        order.child_order_strategies[1].stop_price,
        Some(Decimal::from_str("37.03").unwrap())
    );
}

#[test]
fn test_account_number_deserialization() {
    let accounts: Vec<AccountNumber> =
        serde_json::from_str(r#"[{"accountNumber":"123","hashValue":"H1"}]"#).unwrap();
    assert_eq!(accounts[0].account_number, "123");
    assert_eq!(accounts[0].hash_value, "H1");
}

#[test]
fn test_market_hours_response_shape() {
    let json = r#"{"equity":{"EQ":{"date":"2024-03-15","marketType":"EQUITY","isOpen":true,
        "sessionHours":{"regularMarket":[{"start":"2024-03-15T09:30:00-04:00","end":"2024-03-15T16:00:00-04:00"}]}}}}"#;

    let hours: MarketHoursResponse = serde_json::from_str(json).unwrap();
    let eq = &hours["equity"]["EQ"];

    assert!(eq.is_open);
    assert_eq!(eq.session_hours["regularMarket"].len(), 1);
}
