//! Unit tests for client module.

use super::*;
use chrono::TimeZone;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

const BASE: &str = "https://api.schwabapi.com";

/// Transport that records every request and replays one canned response.
#[derive(Clone, Default)]
struct MockTransport {
    requests: Arc<Mutex<Vec<HttpRequest>>>,
    response: HttpResponse,
}

impl MockTransport {
    fn replying(status: u16, body: &str) -> Self {
        Self {
            requests: Arc::default(),
            response: HttpResponse {
                status,
                headers: HashMap::new(),
                body: body.to_string(),
            },
        }
    }

    fn with_header(mut self, name: &str, value: &str) -> Self {
        self.response
            .headers
            .insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .last()
            .cloned()
            .expect("no request was sent")
    }

    fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

impl Transport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, Error> {
        self.requests.lock().push(request);
        Ok(self.response.clone())
    }
}

fn client(transport: &MockTransport) -> SchwabClient<StaticToken, MockTransport> {
    SchwabClient::with_transport(BASE, StaticToken::new("test-token"), transport.clone())
}

// ============================================================================
// ClientConfig Tests
// ============================================================================

#[test]
fn test_client_config_default() {
    let config = ClientConfig::default();

    assert_eq!(config.base_url, "https://api.schwabapi.com");
    assert_eq!(config.timeout, Duration::from_secs(30));
}

#[test]
fn test_client_config_custom() {
    let config = ClientConfig {
        base_url: "http://127.0.0.1:9000".to_string(),
        timeout: Duration::from_secs(5),
    };

    let client = SchwabClient::new(config, "token");
    assert!(client.is_ok());
}

#[test]
fn test_client_base_url_trimmed() {
    let transport = MockTransport::default();
    let client = SchwabClient::with_transport(
        "https://api.schwabapi.com/",
        StaticToken::new("t"),
        transport,
    );

    assert_eq!(client.base_url(), "https://api.schwabapi.com");
}

// ============================================================================
// Request Building Tests
// ============================================================================

#[tokio::test]
async fn test_get_account_numbers_sends_bearer_token() {
    let transport =
        MockTransport::replying(200, r#"[{"accountNumber":"123","hashValue":"ABC"}]"#);

    let accounts = client(&transport).get_account_numbers().await.unwrap();

    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].hash_value, "ABC");

    let request = transport.last_request();
    assert_eq!(request.method, Method::GET);
    assert_eq!(
        request.url,
        "https://api.schwabapi.com/trader/v1/accounts/accountNumbers"
    );
    assert_eq!(request.header("authorization"), Some("Bearer test-token"));
    assert!(request.body.is_none());
}

#[tokio::test]
async fn test_get_account_with_fields() {
    let transport = MockTransport::replying(
        200,
        r#"{"securitiesAccount":{"type":"MARGIN","accountNumber":"123"}}"#,
    );

    let account = client(&transport)
        .get_account("HASH", &[AccountField::Positions])
        .await
        .unwrap();

    assert_eq!(account.securities_account.account_type, "MARGIN");
    assert!(account.securities_account.positions.is_empty());
    assert_eq!(
        transport.last_request().url,
        "https://api.schwabapi.com/trader/v1/accounts/HASH?fields=positions"
    );
}

#[tokio::test]
async fn test_get_accounts_without_fields_has_no_query() {
    let transport = MockTransport::replying(200, "[]");

    client(&transport).get_accounts(&[]).await.unwrap();

    assert_eq!(
        transport.last_request().url,
        "https://api.schwabapi.com/trader/v1/accounts"
    );
}

#[tokio::test]
async fn test_empty_account_hash_is_rejected_before_sending() {
    let transport = MockTransport::replying(200, "{}");

    let result = client(&transport).get_account("", &[]).await;

    assert!(matches!(result, Err(Error::InvalidRequest(_))));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_get_quotes_joins_symbols_and_fields() {
    let transport = MockTransport::replying(200, "{}");

    client(&transport)
        .get_quotes(
            &["AAPL", "MSFT"],
            &[QuoteField::Quote, QuoteField::Fundamental],
            None,
        )
        .await
        .unwrap();

    assert_eq!(
        transport.last_request().url,
        "https://api.schwabapi.com/marketdata/v1/quotes?symbols=AAPL%2CMSFT&fields=quote%2Cfundamental"
    );
}

#[tokio::test]
async fn test_get_quotes_requires_symbols() {
    let transport = MockTransport::replying(200, "{}");

    let result = client(&transport).get_quotes(&[], &[], Some(true)).await;

    assert!(matches!(result, Err(Error::InvalidRequest(_))));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_get_orders_defaults_time_window() {
    let transport = MockTransport::replying(200, "[]");

    client(&transport)
        .get_orders_for_account("HASH", None)
        .await
        .unwrap();

    let url = transport.last_request().url;
    assert!(url.starts_with("https://api.schwabapi.com/trader/v1/accounts/HASH/orders?"));
    assert!(url.contains("fromEnteredTime="));
    assert!(url.contains("toEnteredTime="));
    assert!(!url.contains("maxResults"));
    assert!(!url.contains("status"));
}

#[tokio::test]
async fn test_get_orders_explicit_query() {
    let transport = MockTransport::replying(200, "[]");
    let query = OrdersQuery {
        max_results: Some(10),
        from_entered_datetime: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
        to_entered_datetime: Some(Utc.with_ymd_and_hms(2024, 2, 1, 12, 30, 0).unwrap()),
        status: Some(OrderStatus::Filled),
    };

    client(&transport)
        .get_orders_for_all_linked_accounts(Some(&query))
        .await
        .unwrap();

    assert_eq!(
        transport.last_request().url,
        "https://api.schwabapi.com/trader/v1/orders?maxResults=10\
         &fromEnteredTime=2024-01-01T00%3A00%3A00.000Z\
         &toEnteredTime=2024-02-01T12%3A30%3A00.000Z&status=FILLED"
    );
}

#[tokio::test]
async fn test_place_order_extracts_order_id() {
    let transport = MockTransport::replying(201, "").with_header(
        "Location",
        "https://api.schwabapi.com/trader/v1/accounts/HASH/orders/1000123",
    );
    let order = serde_json::json!({"orderType": "MARKET"});

    let order_id = client(&transport)
        .place_order("HASH", &order)
        .await
        .unwrap();

    assert_eq!(order_id, Some(1000123));
    let request = transport.last_request();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.body.as_deref(), Some(r#"{"orderType":"MARKET"}"#));
    assert_eq!(request.header("content-type"), Some("application/json"));
}

#[tokio::test]
async fn test_place_order_without_location() {
    let transport = MockTransport::replying(201, "");

    let order_id = client(&transport)
        .place_order("HASH", &serde_json::json!({}))
        .await
        .unwrap();

    assert_eq!(order_id, None);
}

#[tokio::test]
async fn test_cancel_order_uses_delete() {
    let transport = MockTransport::replying(200, "");

    client(&transport).cancel_order("HASH", 42).await.unwrap();

    let request = transport.last_request();
    assert_eq!(request.method, Method::DELETE);
    assert_eq!(
        request.url,
        "https://api.schwabapi.com/trader/v1/accounts/HASH/orders/42"
    );
}

#[tokio::test]
async fn test_get_transactions_requires_types() {
    let transport = MockTransport::replying(200, "[]");
    let query = TransactionsQuery {
        types: vec![],
        ..Default::default()
    };

    let result = client(&transport)
        .get_transactions("HASH", Some(&query))
        .await;

    assert!(matches!(result, Err(Error::InvalidRequest(_))));
}

#[tokio::test]
async fn test_get_transactions_default_query() {
    let transport = MockTransport::replying(200, "[]");

    client(&transport)
        .get_transactions("HASH", None)
        .await
        .unwrap();

    let url = transport.last_request().url;
    assert!(url.contains("startDate="));
    assert!(url.contains("endDate="));
    assert!(url.contains("types=TRADE"));
    assert!(!url.contains("symbol="));
}

#[tokio::test]
async fn test_option_chain_only_sends_defined_params() {
    let transport = MockTransport::replying(200, r#"{"symbol":"AAPL"}"#);
    let query = OptionChainQuery {
        contract_type: Some(ChainContractType::Call),
        strike_count: Some(5),
        from_date: NaiveDate::from_ymd_opt(2024, 3, 1),
        ..OptionChainQuery::new("AAPL")
    };

    let chain = client(&transport).get_option_chain(&query).await.unwrap();

    assert_eq!(chain.symbol, "AAPL");
    assert_eq!(
        transport.last_request().url,
        "https://api.schwabapi.com/marketdata/v1/chains?symbol=AAPL&contractType=CALL\
         &strikeCount=5&fromDate=2024-03-01"
    );
}

#[tokio::test]
async fn test_price_history_every_minute() {
    let transport = MockTransport::replying(200, r#"{"symbol":"AAPL","empty":true}"#);
    let start = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();

    let history = client(&transport)
        .get_price_history_every_minute("AAPL", Some(start), None)
        .await
        .unwrap();

    assert!(history.empty);
    assert_eq!(
        transport.last_request().url,
        "https://api.schwabapi.com/marketdata/v1/pricehistory?symbol=AAPL&periodType=day\
         &frequencyType=minute&frequency=1&startDate=1704153600000"
    );
}

#[tokio::test]
async fn test_get_movers_rejects_unknown_frequency() {
    let transport = MockTransport::replying(200, "{}");
    let query = MoversQuery {
        sort: None,
        frequency: Some(7),
    };

    let result = client(&transport)
        .get_movers(MoverIndex::Spx, Some(&query))
        .await;

    assert!(matches!(result, Err(Error::InvalidRequest(_))));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_get_movers_url() {
    let transport = MockTransport::replying(200, r#"{"screeners":[]}"#);
    let query = MoversQuery {
        sort: Some(MoverSort::Volume),
        frequency: Some(5),
    };

    client(&transport)
        .get_movers(MoverIndex::Spx, Some(&query))
        .await
        .unwrap();

    assert_eq!(
        transport.last_request().url,
        "https://api.schwabapi.com/marketdata/v1/movers/$SPX?sort=VOLUME&frequency=5"
    );
}

#[tokio::test]
async fn test_get_market_hours() {
    let transport = MockTransport::replying(200, "{}");

    client(&transport)
        .get_market_hours(
            &[Market::Equity, Market::Option],
            NaiveDate::from_ymd_opt(2024, 3, 15),
        )
        .await
        .unwrap();

    assert_eq!(
        transport.last_request().url,
        "https://api.schwabapi.com/marketdata/v1/markets?markets=equity%2Coption&date=2024-03-15"
    );
}

#[tokio::test]
async fn test_get_instruments() {
    let transport = MockTransport::replying(200, r#"{"instruments":[]}"#);

    client(&transport)
        .get_instruments(&["AAPL"], Projection::SymbolSearch)
        .await
        .unwrap();

    assert_eq!(
        transport.last_request().url,
        "https://api.schwabapi.com/marketdata/v1/instruments?symbol=AAPL&projection=symbol-search"
    );
}

// ============================================================================
// Response Handling Tests
// ============================================================================

#[tokio::test]
async fn test_non_success_status_keeps_body_verbatim() {
    let body = r#"{"message":"Invalid symbol","errors":["XYZ123"]}"#;
    let transport = MockTransport::replying(400, body);

    let result = client(&transport).get_quote("XYZ123", &[]).await;

    match result {
        Err(Error::Api { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, body);
        }
        other => panic!("expected API error, got {other:?}"),
    }
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn test_empty_access_token_fails_with_auth_error() {
    let transport = MockTransport::replying(200, "{}");
    let client = SchwabClient::with_transport(BASE, StaticToken::new(""), transport.clone());

    let result = client.get_user_preferences().await;

    assert!(matches!(result, Err(Error::Auth { status: None, .. })));
    assert_eq!(transport.request_count(), 0);
}

#[test]
fn test_extract_order_id_ignores_failed_responses() {
    let mut resp = HttpResponse {
        status: 400,
        headers: HashMap::new(),
        body: String::new(),
    };
    resp.headers
        .insert("location".to_string(), "/orders/55".to_string());

    assert_eq!(extract_order_id(&resp), None);

    resp.status = 201;
    assert_eq!(extract_order_id(&resp), Some(55));

    resp.headers
        .insert("location".to_string(), "/orders/not-a-number".to_string());
    assert_eq!(extract_order_id(&resp), None);
}
