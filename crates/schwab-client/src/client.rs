//! HTTP client for the Schwab Trader and Market Data APIs.

use crate::error::Error;
use crate::transport::{
    AccessTokenProvider, HttpRequest, HttpResponse, ReqwestTransport, StaticToken, Transport,
};
use crate::types::*;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

#[cfg(test)]
mod tests;

/// Default API host.
pub const DEFAULT_BASE_URL: &str = "https://api.schwabapi.com";

/// Window used when an order or transaction query leaves its bounds open.
const DEFAULT_LOOKBACK_DAYS: i64 = 60;

/// Movers frequencies accepted by the API.
const MOVER_FREQUENCIES: [u8; 6] = [0, 1, 5, 10, 30, 60];

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API (e.g., "https://api.schwabapi.com").
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP client for the Schwab REST APIs.
///
/// Generic over the token source and the transport so callers can plug in a
/// refreshing token manager or a mock transport.
#[derive(Debug, Clone)]
pub struct SchwabClient<A = StaticToken, T = ReqwestTransport> {
    transport: T,
    tokens: A,
    base_url: String,
}

impl SchwabClient<StaticToken, ReqwestTransport> {
    /// Creates a client that sends a fixed access token over `reqwest`.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: ClientConfig, access_token: &str) -> Result<Self, Error> {
        let transport = ReqwestTransport::new(config.timeout)?;
        Ok(Self::with_transport(
            &config.base_url,
            StaticToken::new(access_token),
            transport,
        ))
    }
}

impl<A: AccessTokenProvider, T: Transport> SchwabClient<A, T> {
    /// Creates a client from explicit parts.
    #[must_use]
    pub fn with_transport(base_url: &str, tokens: A, transport: T) -> Self {
        Self {
            transport,
            tokens,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Returns the configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the access-token provider.
    #[must_use]
    pub fn token_provider(&self) -> &A {
        &self.tokens
    }

    // ========================================================================
    // Accounts
    // ========================================================================

    /// Lists account numbers and the hashes used in account-scoped URLs.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn get_account_numbers(&self) -> Result<Vec<AccountNumber>, Error> {
        let url = self.url(&["trader", "v1", "accounts", "accountNumbers"], None)?;
        let resp = self.send(Method::GET, url, None).await?;
        handle_response(resp)
    }

    /// Gets every linked account.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn get_accounts(&self, fields: &[AccountField]) -> Result<Vec<Account>, Error> {
        let query = encode_query(&FieldsQuery::new(fields))?;
        let url = self.url(&["trader", "v1", "accounts"], query)?;
        let resp = self.send(Method::GET, url, None).await?;
        handle_response(resp)
    }

    /// Gets one account by hash.
    ///
    /// # Errors
    /// Returns error if `account_hash` is empty or the request fails.
    pub async fn get_account(
        &self,
        account_hash: &str,
        fields: &[AccountField],
    ) -> Result<Account, Error> {
        require("account_hash", account_hash)?;
        let query = encode_query(&FieldsQuery::new(fields))?;
        let url = self.url(&["trader", "v1", "accounts", account_hash], query)?;
        let resp = self.send(Method::GET, url, None).await?;
        handle_response(resp)
    }

    // ========================================================================
    // Orders
    // ========================================================================

    /// Gets a specific order.
    ///
    /// # Errors
    /// Returns error if `account_hash` is empty or the request fails.
    pub async fn get_order(&self, account_hash: &str, order_id: i64) -> Result<Order, Error> {
        require("account_hash", account_hash)?;
        let order_id = order_id.to_string();
        let url = self.url(
            &["trader", "v1", "accounts", account_hash, "orders", &order_id],
            None,
        )?;
        let resp = self.send(Method::GET, url, None).await?;
        handle_response(resp)
    }

    /// Cancels an order.
    ///
    /// # Errors
    /// Returns error if `account_hash` is empty or the request fails.
    pub async fn cancel_order(&self, account_hash: &str, order_id: i64) -> Result<(), Error> {
        require("account_hash", account_hash)?;
        let order_id = order_id.to_string();
        let url = self.url(
            &["trader", "v1", "accounts", account_hash, "orders", &order_id],
            None,
        )?;
        let resp = self.send(Method::DELETE, url, None).await?;
        handle_empty_response(resp)
    }

    /// Lists orders for one account.
    ///
    /// Open time bounds default to the last 60 days.
    ///
    /// # Errors
    /// Returns error if `account_hash` is empty or the request fails.
    pub async fn get_orders_for_account(
        &self,
        account_hash: &str,
        query: Option<&OrdersQuery>,
    ) -> Result<Vec<Order>, Error> {
        require("account_hash", account_hash)?;
        let query = encode_query(&orders_query_with_defaults(query, Utc::now()))?;
        let url = self.url(&["trader", "v1", "accounts", account_hash, "orders"], query)?;
        let resp = self.send(Method::GET, url, None).await?;
        handle_response(resp)
    }

    /// Lists orders across every linked account.
    ///
    /// Open time bounds default to the last 60 days.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn get_orders_for_all_linked_accounts(
        &self,
        query: Option<&OrdersQuery>,
    ) -> Result<Vec<Order>, Error> {
        let query = encode_query(&orders_query_with_defaults(query, Utc::now()))?;
        let url = self.url(&["trader", "v1", "orders"], query)?;
        let resp = self.send(Method::GET, url, None).await?;
        handle_response(resp)
    }

    /// Places an order and returns the id assigned by the broker, when the
    /// response carries one in its `Location` header.
    ///
    /// # Errors
    /// Returns error if `account_hash` is empty or the request fails.
    pub async fn place_order<O: Serialize + ?Sized>(
        &self,
        account_hash: &str,
        order: &O,
    ) -> Result<Option<i64>, Error> {
        require("account_hash", account_hash)?;
        let body = serde_json::to_string(order)?;
        let url = self.url(&["trader", "v1", "accounts", account_hash, "orders"], None)?;
        let resp = self.send(Method::POST, url, Some(body)).await?;
        let order_id = extract_order_id(&resp);
        handle_empty_response(resp)?;
        Ok(order_id)
    }

    /// Replaces an existing order and returns the id of the replacement.
    ///
    /// # Errors
    /// Returns error if `account_hash` is empty or the request fails.
    pub async fn replace_order<O: Serialize + ?Sized>(
        &self,
        account_hash: &str,
        order_id: i64,
        order: &O,
    ) -> Result<Option<i64>, Error> {
        require("account_hash", account_hash)?;
        let body = serde_json::to_string(order)?;
        let order_id = order_id.to_string();
        let url = self.url(
            &["trader", "v1", "accounts", account_hash, "orders", &order_id],
            None,
        )?;
        let resp = self.send(Method::PUT, url, Some(body)).await?;
        let new_id = extract_order_id(&resp);
        handle_empty_response(resp)?;
        Ok(new_id)
    }

    /// Previews an order without placing it.
    ///
    /// # Errors
    /// Returns error if `account_hash` is empty or the request fails.
    pub async fn preview_order<O: Serialize + ?Sized>(
        &self,
        account_hash: &str,
        order: &O,
    ) -> Result<PreviewOrderResponse, Error> {
        require("account_hash", account_hash)?;
        let body = serde_json::to_string(order)?;
        let url = self.url(
            &["trader", "v1", "accounts", account_hash, "previewOrder"],
            None,
        )?;
        let resp = self.send(Method::POST, url, Some(body)).await?;
        handle_response(resp)
    }

    // ========================================================================
    // Transactions
    // ========================================================================

    /// Lists transactions for one account.
    ///
    /// Open time bounds default to the last 60 days.
    ///
    /// # Errors
    /// Returns error if `account_hash` is empty, no transaction type is
    /// given, or the request fails.
    pub async fn get_transactions(
        &self,
        account_hash: &str,
        query: Option<&TransactionsQuery>,
    ) -> Result<Vec<Transaction>, Error> {
        require("account_hash", account_hash)?;
        let mut query = query.cloned().unwrap_or_default();
        if query.types.is_empty() {
            return Err(Error::InvalidRequest(
                "at least one transaction type is required".to_string(),
            ));
        }
        let now = Utc::now();
        query
            .start_date
            .get_or_insert(now - chrono::Duration::days(DEFAULT_LOOKBACK_DAYS));
        query.end_date.get_or_insert(now);

        let query = encode_query(&query)?;
        let url = self.url(
            &["trader", "v1", "accounts", account_hash, "transactions"],
            query,
        )?;
        let resp = self.send(Method::GET, url, None).await?;
        handle_response(resp)
    }

    /// Gets one transaction.
    ///
    /// # Errors
    /// Returns error if `account_hash` is empty or the request fails.
    pub async fn get_transaction(
        &self,
        account_hash: &str,
        activity_id: i64,
    ) -> Result<Transaction, Error> {
        require("account_hash", account_hash)?;
        let activity_id = activity_id.to_string();
        let url = self.url(
            &[
                "trader",
                "v1",
                "accounts",
                account_hash,
                "transactions",
                &activity_id,
            ],
            None,
        )?;
        let resp = self.send(Method::GET, url, None).await?;
        handle_response(resp)
    }

    // ========================================================================
    // User Preference
    // ========================================================================

    /// Gets the user's preferences and streamer info.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn get_user_preferences(&self) -> Result<UserPreference, Error> {
        let url = self.url(&["trader", "v1", "userPreference"], None)?;
        let resp = self.send(Method::GET, url, None).await?;
        handle_response(resp)
    }

    // ========================================================================
    // Quotes
    // ========================================================================

    /// Gets the quote for a single symbol.
    ///
    /// # Errors
    /// Returns error if `symbol` is empty or the request fails.
    pub async fn get_quote(
        &self,
        symbol: &str,
        fields: &[QuoteField],
    ) -> Result<QuotesResponse, Error> {
        require("symbol", symbol)?;
        let query = encode_query(&FieldsQuery::new(fields))?;
        let url = self.url(&["marketdata", "v1", symbol, "quotes"], query)?;
        let resp = self.send(Method::GET, url, None).await?;
        handle_response(resp)
    }

    /// Gets quotes for several symbols.
    ///
    /// # Errors
    /// Returns error if `symbols` is empty or the request fails.
    pub async fn get_quotes(
        &self,
        symbols: &[&str],
        fields: &[QuoteField],
        indicative: Option<bool>,
    ) -> Result<QuotesResponse, Error> {
        if symbols.is_empty() {
            return Err(Error::InvalidRequest(
                "at least one symbol is required".to_string(),
            ));
        }
        let query = encode_query(&QuotesQuery {
            symbols: symbols.join(","),
            fields: join_fields(fields),
            indicative,
        })?;
        let url = self.url(&["marketdata", "v1", "quotes"], query)?;
        let resp = self.send(Method::GET, url, None).await?;
        handle_response(resp)
    }

    // ========================================================================
    // Option Chains
    // ========================================================================

    /// Gets an option chain.
    ///
    /// # Errors
    /// Returns error if the query has no symbol or the request fails.
    pub async fn get_option_chain(&self, query: &OptionChainQuery) -> Result<OptionChain, Error> {
        require("symbol", &query.symbol)?;
        let query = encode_query(query)?;
        let url = self.url(&["marketdata", "v1", "chains"], query)?;
        let resp = self.send(Method::GET, url, None).await?;
        handle_response(resp)
    }

    /// Gets the expirations available for an underlying.
    ///
    /// # Errors
    /// Returns error if `symbol` is empty or the request fails.
    pub async fn get_option_expiration_chain(
        &self,
        symbol: &str,
    ) -> Result<ExpirationChain, Error> {
        require("symbol", symbol)?;
        let query = encode_query(&SymbolQuery { symbol })?;
        let url = self.url(&["marketdata", "v1", "expirationchain"], query)?;
        let resp = self.send(Method::GET, url, None).await?;
        handle_response(resp)
    }

    // ========================================================================
    // Price History
    // ========================================================================

    /// Gets price history.
    ///
    /// # Errors
    /// Returns error if the query has no symbol or the request fails.
    pub async fn get_price_history(&self, query: &PriceHistoryQuery) -> Result<PriceHistory, Error> {
        require("symbol", &query.symbol)?;
        let query = encode_query(query)?;
        let url = self.url(&["marketdata", "v1", "pricehistory"], query)?;
        let resp = self.send(Method::GET, url, None).await?;
        handle_response(resp)
    }

    /// Gets one-minute candles.
    ///
    /// # Errors
    /// Returns error if `symbol` is empty or the request fails.
    pub async fn get_price_history_every_minute(
        &self,
        symbol: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<PriceHistory, Error> {
        let query = candle_query(
            symbol,
            PeriodType::Day,
            FrequencyType::Minute,
            1,
            start,
            end,
        );
        self.get_price_history(&query).await
    }

    /// Gets five-minute candles.
    ///
    /// # Errors
    /// Returns error if `symbol` is empty or the request fails.
    pub async fn get_price_history_every_five_minutes(
        &self,
        symbol: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<PriceHistory, Error> {
        let query = candle_query(
            symbol,
            PeriodType::Day,
            FrequencyType::Minute,
            5,
            start,
            end,
        );
        self.get_price_history(&query).await
    }

    /// Gets daily candles.
    ///
    /// # Errors
    /// Returns error if `symbol` is empty or the request fails.
    pub async fn get_price_history_every_day(
        &self,
        symbol: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<PriceHistory, Error> {
        let query = candle_query(
            symbol,
            PeriodType::Year,
            FrequencyType::Daily,
            1,
            start,
            end,
        );
        self.get_price_history(&query).await
    }

    /// Gets weekly candles.
    ///
    /// # Errors
    /// Returns error if `symbol` is empty or the request fails.
    pub async fn get_price_history_every_week(
        &self,
        symbol: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<PriceHistory, Error> {
        let query = candle_query(
            symbol,
            PeriodType::Year,
            FrequencyType::Weekly,
            1,
            start,
            end,
        );
        self.get_price_history(&query).await
    }

    // ========================================================================
    // Movers
    // ========================================================================

    /// Gets the top movers for an index.
    ///
    /// # Errors
    /// Returns error if the frequency is not one the API accepts or the
    /// request fails.
    pub async fn get_movers(
        &self,
        index: MoverIndex,
        query: Option<&MoversQuery>,
    ) -> Result<Movers, Error> {
        let query = match query {
            Some(q) => {
                if let Some(freq) = q.frequency.filter(|f| !MOVER_FREQUENCIES.contains(f)) {
                    return Err(Error::InvalidRequest(format!(
                        "movers frequency must be one of {MOVER_FREQUENCIES:?}, got {freq}"
                    )));
                }
                encode_query(q)?
            }
            None => None,
        };
        let url = self.url(&["marketdata", "v1", "movers", index.as_ref()], query)?;
        let resp = self.send(Method::GET, url, None).await?;
        handle_response(resp)
    }

    // ========================================================================
    // Market Hours
    // ========================================================================

    /// Gets hours for several markets.
    ///
    /// # Errors
    /// Returns error if `markets` is empty or the request fails.
    pub async fn get_market_hours(
        &self,
        markets: &[Market],
        date: Option<NaiveDate>,
    ) -> Result<MarketHoursResponse, Error> {
        if markets.is_empty() {
            return Err(Error::InvalidRequest(
                "at least one market is required".to_string(),
            ));
        }
        let query = encode_query(&MarketHoursQuery {
            markets: join_fields(markets),
            date: date.map(|d| d.format("%Y-%m-%d").to_string()),
        })?;
        let url = self.url(&["marketdata", "v1", "markets"], query)?;
        let resp = self.send(Method::GET, url, None).await?;
        handle_response(resp)
    }

    /// Gets hours for a single market.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn get_market_hours_for(
        &self,
        market: Market,
        date: Option<NaiveDate>,
    ) -> Result<MarketHoursResponse, Error> {
        let query = encode_query(&MarketHoursQuery {
            markets: None,
            date: date.map(|d| d.format("%Y-%m-%d").to_string()),
        })?;
        let url = self.url(&["marketdata", "v1", "markets", market.as_ref()], query)?;
        let resp = self.send(Method::GET, url, None).await?;
        handle_response(resp)
    }

    // ========================================================================
    // Instruments
    // ========================================================================

    /// Searches instruments.
    ///
    /// # Errors
    /// Returns error if `symbols` is empty or the request fails.
    pub async fn get_instruments(
        &self,
        symbols: &[&str],
        projection: Projection,
    ) -> Result<InstrumentsResponse, Error> {
        if symbols.is_empty() {
            return Err(Error::InvalidRequest(
                "at least one symbol is required".to_string(),
            ));
        }
        let query = encode_query(&InstrumentsQuery {
            symbol: symbols.join(","),
            projection,
        })?;
        let url = self.url(&["marketdata", "v1", "instruments"], query)?;
        let resp = self.send(Method::GET, url, None).await?;
        handle_response(resp)
    }

    /// Gets an instrument by CUSIP.
    ///
    /// # Errors
    /// Returns error if `cusip` is empty or the request fails.
    pub async fn get_instrument_by_cusip(&self, cusip: &str) -> Result<InstrumentsResponse, Error> {
        require("cusip", cusip)?;
        let url = self.url(&["marketdata", "v1", "instruments", cusip], None)?;
        let resp = self.send(Method::GET, url, None).await?;
        handle_response(resp)
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    fn url(&self, segments: &[&str], query: Option<String>) -> Result<String, Error> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|()| Error::InvalidRequest(format!("base URL {} has no path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        url.set_query(query.as_deref());
        Ok(url.into())
    }

    async fn send(
        &self,
        method: Method,
        url: String,
        body: Option<String>,
    ) -> Result<HttpResponse, Error> {
        let token = self.tokens.access_token().await?;
        let mut headers = vec![
            ("Authorization".to_string(), format!("Bearer {token}")),
            ("Accept".to_string(), "application/json".to_string()),
        ];
        if body.is_some() {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }

        debug!(%method, %url, "sending request");
        let resp = self
            .transport
            .execute(HttpRequest {
                method,
                url,
                headers,
                body,
            })
            .await?;
        if !resp.is_success() {
            warn!(status = resp.status, "request returned non-success status");
        }
        Ok(resp)
    }
}

// ============================================================================
// Response Handling
// ============================================================================

fn handle_response<R: DeserializeOwned>(resp: HttpResponse) -> Result<R, Error> {
    if resp.is_success() {
        Ok(serde_json::from_str(&resp.body)?)
    } else {
        Err(Error::Api {
            status: resp.status,
            message: resp.body,
        })
    }
}

fn handle_empty_response(resp: HttpResponse) -> Result<(), Error> {
    if resp.is_success() {
        Ok(())
    } else {
        Err(Error::Api {
            status: resp.status,
            message: resp.body,
        })
    }
}

/// Extracts the order id from the `Location` header of a place/replace
/// response (`.../accounts/{hash}/orders/{id}`).
#[must_use]
pub fn extract_order_id(resp: &HttpResponse) -> Option<i64> {
    if !resp.is_success() {
        return None;
    }
    resp.header("location")?
        .trim_end_matches('/')
        .rsplit('/')
        .next()?
        .parse()
        .ok()
}

// ============================================================================
// Query Helpers
// ============================================================================

#[derive(Serialize)]
struct FieldsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<String>,
}

impl FieldsQuery {
    fn new<F: AsRef<str>>(fields: &[F]) -> Self {
        Self {
            fields: join_fields(fields),
        }
    }
}

#[derive(Serialize)]
struct QuotesQuery {
    symbols: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    indicative: Option<bool>,
}

#[derive(Serialize)]
struct SymbolQuery<'a> {
    symbol: &'a str,
}

#[derive(Serialize)]
struct MarketHoursQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    markets: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<String>,
}

#[derive(Serialize)]
struct InstrumentsQuery {
    symbol: String,
    projection: Projection,
}

fn require(name: &str, value: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(Error::InvalidRequest(format!("{name} must not be empty")));
    }
    Ok(())
}

fn join_fields<F: AsRef<str>>(fields: &[F]) -> Option<String> {
    if fields.is_empty() {
        None
    } else {
        Some(
            fields
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<_>>()
                .join(","),
        )
    }
}

fn encode_query<Q: Serialize + ?Sized>(query: &Q) -> Result<Option<String>, Error> {
    let params = serde_urlencoded::to_string(query)?;
    Ok(if params.is_empty() { None } else { Some(params) })
}

fn orders_query_with_defaults(query: Option<&OrdersQuery>, now: DateTime<Utc>) -> OrdersQuery {
    let mut query = query.cloned().unwrap_or_default();
    query
        .from_entered_datetime
        .get_or_insert(now - chrono::Duration::days(DEFAULT_LOOKBACK_DAYS));
    query.to_entered_datetime.get_or_insert(now);
    query
}

fn candle_query(
    symbol: &str,
    period_type: PeriodType,
    frequency_type: FrequencyType,
    frequency: u32,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> PriceHistoryQuery {
    PriceHistoryQuery {
        period_type: Some(period_type),
        frequency_type: Some(frequency_type),
        frequency: Some(frequency),
        start_datetime: start,
        end_datetime: end,
        ..PriceHistoryQuery::new(symbol)
    }
}
