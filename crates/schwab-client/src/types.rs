//! Request and response types for the Schwab Trader and Market Data APIs.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use strum::{AsRefStr, Display, EnumString};

#[cfg(test)]
mod tests;

// ============================================================================
// Order Enums
// ============================================================================

/// Trading session an order is eligible for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Session {
    /// Regular market hours.
    Normal,
    /// Pre-market session.
    Am,
    /// After-market session.
    Pm,
    /// Pre-market through after-market.
    Seamless,
}

/// How long an order stays working.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderDuration {
    /// Cancel at the end of the trading day.
    Day,
    /// Good until canceled (broker limits apply).
    GoodTillCancel,
    /// Fill entirely and immediately or cancel.
    FillOrKill,
    /// Fill what is possible immediately, cancel the rest.
    ImmediateOrCancel,
    /// Cancel at the end of the week.
    EndOfWeek,
    /// Cancel at the end of the month.
    EndOfMonth,
    /// Cancel at the end of next month.
    NextEndOfMonth,
    /// Reported by the broker for legacy orders.
    Unknown,
}

/// Order pricing type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Execute at the best available price.
    Market,
    /// Execute at the limit price or better.
    Limit,
    /// Market order once the stop price trades.
    Stop,
    /// Limit order once the stop price trades.
    StopLimit,
    /// Stop that trails the market.
    TrailingStop,
    /// Cabinet trade (options).
    Cabinet,
    /// Non-marketable order.
    NonMarketable,
    /// Market on close.
    MarketOnClose,
    /// Option exercise.
    Exercise,
    /// Limit order that trails the market.
    TrailingStopLimit,
    /// Multi-leg order paying a net debit.
    NetDebit,
    /// Multi-leg order receiving a net credit.
    NetCredit,
    /// Multi-leg order at even money.
    NetZero,
    /// Limit on close.
    LimitOnClose,
    /// Reported by the broker for legacy orders.
    Unknown,
}

/// Multi-leg strategy classification.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplexOrderStrategyType {
    /// No complex strategy.
    None,
    /// Covered position.
    Covered,
    /// Vertical spread.
    Vertical,
    /// Back ratio spread.
    BackRatio,
    /// Calendar spread.
    Calendar,
    /// Diagonal spread.
    Diagonal,
    /// Straddle.
    Straddle,
    /// Strangle.
    Strangle,
    /// Synthetic collar.
    CollarSynthetic,
    /// Butterfly.
    Butterfly,
    /// Condor.
    Condor,
    /// Iron condor.
    IronCondor,
    /// Vertical roll.
    VerticalRoll,
    /// Collar with stock.
    CollarWithStock,
    /// Double diagonal.
    DoubleDiagonal,
    /// Unbalanced butterfly.
    UnbalancedButterfly,
    /// Unbalanced condor.
    UnbalancedCondor,
    /// Unbalanced iron condor.
    UnbalancedIronCondor,
    /// Unbalanced vertical roll.
    UnbalancedVerticalRoll,
    /// Mutual fund swap.
    MutualFundSwap,
    /// Custom multi-leg.
    Custom,
}

/// Requested routing destination.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Destination {
    /// INET.
    Inet,
    /// ECN ARCA.
    EcnArca,
    /// CBOE.
    Cboe,
    /// AMEX.
    Amex,
    /// PHLX.
    Phlx,
    /// ISE.
    Ise,
    /// BOX.
    Box,
    /// NYSE.
    Nyse,
    /// NASDAQ.
    Nasdaq,
    /// BATS.
    Bats,
    /// C2.
    C2,
    /// Broker's choice.
    Auto,
}

/// Reference price a linked price is computed from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceLinkBasis {
    /// Manually entered.
    Manual,
    /// Base price.
    Base,
    /// Trigger price.
    Trigger,
    /// Last trade.
    Last,
    /// Best bid.
    Bid,
    /// Best ask.
    Ask,
    /// Ask/bid.
    AskBid,
    /// Mark.
    Mark,
    /// Average.
    Average,
}

/// How a linked price offset is expressed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceLinkType {
    /// Absolute value.
    Value,
    /// Percentage.
    Percent,
    /// Ticks.
    Tick,
}

/// Price the stop is triggered against.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StopType {
    /// Standard stop.
    Standard,
    /// Triggered on bid.
    Bid,
    /// Triggered on ask.
    Ask,
    /// Triggered on last trade.
    Last,
    /// Triggered on mark.
    Mark,
}

/// Fill restrictions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpecialInstruction {
    /// Fill the whole quantity or nothing.
    AllOrNone,
    /// Do not reduce on dividends.
    DoNotReduce,
    /// Both of the above.
    AllOrNoneDoNotReduce,
}

/// How an order relates to its child orders.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStrategyType {
    /// Stand-alone order.
    Single,
    /// Cancel.
    Cancel,
    /// Recall.
    Recall,
    /// Pair.
    Pair,
    /// Flatten.
    Flatten,
    /// Two-day swap.
    TwoDaySwap,
    /// Blast all.
    BlastAll,
    /// One cancels other.
    Oco,
    /// Parent order that releases its children on fill.
    Trigger,
}

/// Leg instruction. Equity and option instructions share one wire enum.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Instruction {
    /// Buy shares.
    Buy,
    /// Sell shares.
    Sell,
    /// Buy to cover a short position.
    BuyToCover,
    /// Open a short position.
    SellShort,
    /// Open a long option position.
    BuyToOpen,
    /// Close a short option position.
    BuyToClose,
    /// Open a short option position.
    SellToOpen,
    /// Close a long option position.
    SellToClose,
    /// Exchange.
    Exchange,
    /// Short-sale exempt.
    SellShortExempt,
}

/// Instrument asset type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetType {
    /// Stocks and ETFs.
    Equity,
    /// Listed options.
    Option,
    /// Indexes.
    Index,
    /// Mutual funds.
    MutualFund,
    /// Cash equivalents.
    CashEquivalent,
    /// Fixed income.
    FixedIncome,
    /// Currency.
    Currency,
    /// Collective investment.
    CollectiveInvestment,
    /// Futures.
    Future,
    /// Forex.
    Forex,
    /// Product.
    Product,
    /// Anything the client does not know about.
    #[serde(other)]
    Unknown,
}

/// Order status as reported by the broker.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Awaiting parent order.
    AwaitingParentOrder,
    /// Awaiting condition.
    AwaitingCondition,
    /// Awaiting stop condition.
    AwaitingStopCondition,
    /// Awaiting manual review.
    AwaitingManualReview,
    /// Accepted.
    Accepted,
    /// Awaiting UR out.
    AwaitingUrOut,
    /// Pending activation.
    PendingActivation,
    /// Queued.
    Queued,
    /// Working.
    Working,
    /// Rejected.
    Rejected,
    /// Pending cancel.
    PendingCancel,
    /// Canceled.
    Canceled,
    /// Pending replace.
    PendingReplace,
    /// Replaced.
    Replaced,
    /// Filled.
    Filled,
    /// Expired.
    Expired,
    /// New.
    New,
    /// Awaiting release time.
    AwaitingReleaseTime,
    /// Pending acknowledgement.
    PendingAcknowledgement,
    /// Pending recall.
    PendingRecall,
    /// Anything the client does not know about.
    #[serde(other)]
    Unknown,
}

// ============================================================================
// Query Enums
// ============================================================================

/// Extra account fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum AccountField {
    /// Include positions.
    Positions,
}

/// Transaction type filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Trades.
    Trade,
    /// Receive and deliver.
    ReceiveAndDeliver,
    /// Dividend or interest.
    DividendOrInterest,
    /// ACH receipt.
    AchReceipt,
    /// ACH disbursement.
    AchDisbursement,
    /// Cash receipt.
    CashReceipt,
    /// Cash disbursement.
    CashDisbursement,
    /// Electronic fund.
    ElectronicFund,
    /// Wire out.
    WireOut,
    /// Wire in.
    WireIn,
    /// Journal.
    Journal,
    /// Memorandum.
    Memorandum,
    /// Margin call.
    MarginCall,
    /// Money market.
    MoneyMarket,
    /// SMA adjustment.
    SmaAdjustment,
}

/// Quote field groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum QuoteField {
    /// Quote data.
    Quote,
    /// Fundamentals.
    Fundamental,
    /// Extended-hours data.
    Extended,
    /// Reference data.
    Reference,
    /// Regular-session data.
    Regular,
}

/// Option chain contract filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChainContractType {
    /// Calls only.
    Call,
    /// Puts only.
    Put,
    /// Calls and puts.
    All,
}

/// Option chain strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChainStrategy {
    /// Single contracts.
    Single,
    /// Analytical (theoretical values).
    Analytical,
    /// Covered.
    Covered,
    /// Vertical.
    Vertical,
    /// Calendar.
    Calendar,
    /// Strangle.
    Strangle,
    /// Straddle.
    Straddle,
    /// Butterfly.
    Butterfly,
    /// Condor.
    Condor,
    /// Diagonal.
    Diagonal,
    /// Collar.
    Collar,
    /// Roll.
    Roll,
}

/// Option chain strike range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrikeRange {
    /// In the money.
    Itm,
    /// Near the money.
    Ntm,
    /// Out of the money.
    Otm,
    /// Strikes above market.
    Sak,
    /// Strikes below market.
    Sbk,
    /// Strikes near market.
    Snk,
    /// All strikes.
    All,
}

/// Option chain entitlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Entitlement {
    /// Paying pro.
    Pp,
    /// Non-pro.
    Np,
    /// Non-paying pro.
    Pn,
}

/// Price history period type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    /// Days.
    Day,
    /// Months.
    Month,
    /// Years.
    Year,
    /// Year to date.
    Ytd,
}

/// Price history candle frequency type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FrequencyType {
    /// Minute candles.
    Minute,
    /// Daily candles.
    Daily,
    /// Weekly candles.
    Weekly,
    /// Monthly candles.
    Monthly,
}

/// Index or universe to query movers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
pub enum MoverIndex {
    /// Dow Jones Industrial Average.
    #[strum(serialize = "$DJI")]
    Djia,
    /// NASDAQ Composite.
    #[strum(serialize = "$COMPX")]
    Compx,
    /// S&P 500.
    #[strum(serialize = "$SPX")]
    Spx,
    /// NYSE.
    #[strum(serialize = "NYSE")]
    Nyse,
    /// NASDAQ.
    #[strum(serialize = "NASDAQ")]
    Nasdaq,
    /// OTC bulletin board.
    #[strum(serialize = "OTCBB")]
    Otcbb,
    /// All indexes.
    #[strum(serialize = "INDEX_ALL")]
    IndexAll,
    /// All equities.
    #[strum(serialize = "EQUITY_ALL")]
    EquityAll,
    /// All options.
    #[strum(serialize = "OPTION_ALL")]
    OptionAll,
    /// Puts.
    #[strum(serialize = "OPTION_PUT")]
    OptionPut,
    /// Calls.
    #[strum(serialize = "OPTION_CALL")]
    OptionCall,
}

/// Movers sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MoverSort {
    /// By volume.
    Volume,
    /// By number of trades.
    Trades,
    /// Biggest gainers.
    PercentChangeUp,
    /// Biggest losers.
    PercentChangeDown,
}

/// Market hours market identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Market {
    /// Equities.
    Equity,
    /// Options.
    Option,
    /// Bonds.
    Bond,
    /// Futures.
    Future,
    /// Forex.
    Forex,
}

/// Instrument search projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Projection {
    /// Exact symbol.
    SymbolSearch,
    /// Symbol regex.
    SymbolRegex,
    /// Description search.
    DescSearch,
    /// Description regex.
    DescRegex,
    /// Generic search.
    Search,
    /// Fundamentals for a symbol.
    Fundamental,
}

// ============================================================================
// Query Serialization Helpers
// ============================================================================

fn comma_separated<S, T>(items: &[T], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: AsRef<str>,
{
    let joined = items
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(",");
    serializer.serialize_str(&joined)
}

fn iso_datetime<S: Serializer>(
    value: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(dt) => serializer.serialize_str(&format_datetime(dt)),
        None => serializer.serialize_none(),
    }
}

fn iso_date<S: Serializer>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
        None => serializer.serialize_none(),
    }
}

fn epoch_millis<S: Serializer>(
    value: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(dt) => serializer.serialize_i64(dt.timestamp_millis()),
        None => serializer.serialize_none(),
    }
}

/// Renders a datetime the way the Trader API expects it. Sub-second
/// precision is dropped.
#[must_use]
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S.000Z").to_string()
}

// ============================================================================
// Accounts
// ============================================================================

/// Account number and its opaque hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountNumber {
    /// Plain account number.
    pub account_number: String,
    /// Hash used in every account-scoped URL.
    pub hash_value: String,
}

/// Account wrapper as returned by the accounts endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Securities account details.
    pub securities_account: SecuritiesAccount,
}

/// Securities account details.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecuritiesAccount {
    /// Account type (CASH or MARGIN).
    #[serde(rename = "type")]
    pub account_type: String,
    /// Plain account number.
    pub account_number: String,
    /// Day-trading round trips.
    #[serde(default)]
    pub round_trips: i64,
    /// Pattern day trader flag.
    #[serde(default)]
    pub is_day_trader: bool,
    /// Closing-only restriction flag.
    #[serde(default)]
    pub is_closing_only_restricted: bool,
    /// Positions, only present when requested.
    #[serde(default)]
    pub positions: Vec<Position>,
    /// Balances at the start of the day.
    #[serde(default)]
    pub initial_balances: Option<serde_json::Value>,
    /// Current balances.
    #[serde(default)]
    pub current_balances: Option<serde_json::Value>,
    /// Projected balances.
    #[serde(default)]
    pub projected_balances: Option<serde_json::Value>,
}

/// Account position.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// Short quantity.
    #[serde(default)]
    pub short_quantity: f64,
    /// Long quantity.
    #[serde(default)]
    pub long_quantity: f64,
    /// Average cost.
    #[serde(default)]
    pub average_price: f64,
    /// Market value.
    #[serde(default)]
    pub market_value: f64,
    /// Day P&L.
    #[serde(default)]
    pub current_day_profit_loss: f64,
    /// Positioned instrument.
    pub instrument: OrderInstrument,
}

// ============================================================================
// Orders
// ============================================================================

/// Query parameters for listing orders.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersQuery {
    /// Maximum number of orders returned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    /// Earliest entered time. Defaults to 60 days before the request.
    #[serde(
        rename = "fromEnteredTime",
        serialize_with = "iso_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub from_entered_datetime: Option<DateTime<Utc>>,
    /// Latest entered time. Defaults to the request time.
    #[serde(
        rename = "toEnteredTime",
        serialize_with = "iso_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub to_entered_datetime: Option<DateTime<Utc>>,
    /// Only orders in this status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
}

/// Order as returned by the orders endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Session.
    #[serde(default)]
    pub session: Option<Session>,
    /// Duration.
    #[serde(default)]
    pub duration: Option<OrderDuration>,
    /// Order type.
    #[serde(default)]
    pub order_type: Option<OrderType>,
    /// Complex strategy classification.
    #[serde(default)]
    pub complex_order_strategy_type: Option<ComplexOrderStrategyType>,
    /// Total quantity.
    #[serde(default)]
    pub quantity: Option<Decimal>,
    /// Filled quantity.
    #[serde(default)]
    pub filled_quantity: Option<Decimal>,
    /// Remaining quantity.
    #[serde(default)]
    pub remaining_quantity: Option<Decimal>,
    /// Requested routing destination.
    #[serde(default)]
    pub requested_destination: Option<Destination>,
    /// Stop price.
    #[serde(default)]
    pub stop_price: Option<Decimal>,
    /// Stop price link basis.
    #[serde(default)]
    pub stop_price_link_basis: Option<PriceLinkBasis>,
    /// Stop price link type.
    #[serde(default)]
    pub stop_price_link_type: Option<PriceLinkType>,
    /// Stop price offset.
    #[serde(default)]
    pub stop_price_offset: Option<Decimal>,
    /// Stop type.
    #[serde(default)]
    pub stop_type: Option<StopType>,
    /// Price link basis.
    #[serde(default)]
    pub price_link_basis: Option<PriceLinkBasis>,
    /// Price link type.
    #[serde(default)]
    pub price_link_type: Option<PriceLinkType>,
    /// Limit price.
    #[serde(default)]
    pub price: Option<Decimal>,
    /// Activation price.
    #[serde(default)]
    pub activation_price: Option<Decimal>,
    /// Special instruction.
    #[serde(default)]
    pub special_instruction: Option<SpecialInstruction>,
    /// Strategy type.
    #[serde(default)]
    pub order_strategy_type: Option<OrderStrategyType>,
    /// Order legs.
    #[serde(default)]
    pub order_leg_collection: Vec<OrderLegRecord>,
    /// Nested child orders.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub child_order_strategies: Vec<Order>,
    /// Broker-assigned order id.
    #[serde(default)]
    pub order_id: Option<i64>,
    /// Whether the order can still be canceled.
    #[serde(default)]
    pub cancelable: Option<bool>,
    /// Whether the order can still be replaced.
    #[serde(default)]
    pub editable: Option<bool>,
    /// Current status.
    #[serde(default)]
    pub status: Option<OrderStatus>,
    /// Time the order was entered.
    #[serde(default)]
    pub entered_time: Option<String>,
    /// Time the order was closed.
    #[serde(default)]
    pub close_time: Option<String>,
    /// Owning account number.
    #[serde(default)]
    pub account_number: Option<i64>,
    /// Free-form status description.
    #[serde(default)]
    pub status_description: Option<String>,
}

/// Order leg as returned by the orders endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLegRecord {
    /// Leg asset type.
    #[serde(default)]
    pub order_leg_type: Option<AssetType>,
    /// Leg id.
    #[serde(default)]
    pub leg_id: Option<i64>,
    /// Traded instrument.
    pub instrument: OrderInstrument,
    /// Leg instruction.
    pub instruction: Instruction,
    /// Opening or closing.
    #[serde(default)]
    pub position_effect: Option<String>,
    /// Leg quantity.
    pub quantity: Decimal,
}

/// Instrument reference inside orders and positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderInstrument {
    /// Asset type.
    pub asset_type: AssetType,
    /// Symbol.
    pub symbol: String,
    /// CUSIP.
    #[serde(default)]
    pub cusip: Option<String>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Broker instrument id.
    #[serde(default)]
    pub instrument_id: Option<i64>,
    /// CALL or PUT for options.
    #[serde(default)]
    pub put_call: Option<String>,
    /// Underlying symbol for options.
    #[serde(default)]
    pub underlying_symbol: Option<String>,
}

/// Result of previewing an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewOrderResponse {
    /// Echoed order id, when assigned.
    #[serde(default)]
    pub order_id: Option<i64>,
    /// Broker's view of the order.
    #[serde(default)]
    pub order_strategy: Option<serde_json::Value>,
    /// Validation findings.
    #[serde(default)]
    pub order_validation_result: Option<serde_json::Value>,
    /// Commissions and fees.
    #[serde(default)]
    pub commission_and_fee: Option<serde_json::Value>,
}

// ============================================================================
// Transactions
// ============================================================================

/// Query parameters for listing transactions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsQuery {
    /// Start of the window. Defaults to 60 days before the request.
    #[serde(serialize_with = "iso_datetime", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    /// End of the window. Defaults to the request time.
    #[serde(serialize_with = "iso_datetime", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    /// Transaction types to include. Must not be empty.
    #[serde(serialize_with = "comma_separated")]
    pub types: Vec<TransactionType>,
    /// Only transactions for this symbol.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

impl Default for TransactionsQuery {
    fn default() -> Self {
        Self {
            start_date: None,
            end_date: None,
            types: vec![TransactionType::Trade],
            symbol: None,
        }
    }
}

/// Account transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Activity id.
    pub activity_id: i64,
    /// Transaction time.
    #[serde(default)]
    pub time: Option<String>,
    /// Transaction type.
    #[serde(rename = "type", default)]
    pub transaction_type: Option<String>,
    /// Status.
    #[serde(default)]
    pub status: Option<String>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Net amount.
    #[serde(default)]
    pub net_amount: Option<f64>,
    /// Related order id.
    #[serde(default)]
    pub order_id: Option<i64>,
    /// Items moved by the transaction.
    #[serde(default)]
    pub transfer_items: Vec<serde_json::Value>,
}

// ============================================================================
// User Preference
// ============================================================================

/// User preference response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreference {
    /// Accounts visible to the user.
    #[serde(default)]
    pub accounts: Vec<serde_json::Value>,
    /// Streamer connection info.
    #[serde(default)]
    pub streamer_info: Vec<serde_json::Value>,
    /// Market data entitlements.
    #[serde(default)]
    pub offers: Vec<serde_json::Value>,
}

// ============================================================================
// Quotes
// ============================================================================

/// Quote response keyed by symbol.
pub type QuotesResponse = HashMap<String, QuoteEntry>;

/// Quote entry for one symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteEntry {
    /// Asset main type.
    #[serde(default)]
    pub asset_main_type: Option<String>,
    /// Symbol.
    #[serde(default)]
    pub symbol: Option<String>,
    /// Whether the quote is real-time.
    #[serde(default)]
    pub realtime: Option<bool>,
    /// Quote data.
    #[serde(default)]
    pub quote: Option<QuoteData>,
    /// Fundamental data.
    #[serde(default)]
    pub fundamental: Option<serde_json::Value>,
    /// Reference data.
    #[serde(default)]
    pub reference: Option<serde_json::Value>,
    /// Extended-hours data.
    #[serde(default)]
    pub extended: Option<serde_json::Value>,
    /// Regular-session data.
    #[serde(default)]
    pub regular: Option<serde_json::Value>,
}

/// Core quote values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteData {
    /// Best bid.
    #[serde(default)]
    pub bid_price: Option<f64>,
    /// Bid size.
    #[serde(default)]
    pub bid_size: Option<f64>,
    /// Best ask.
    #[serde(default)]
    pub ask_price: Option<f64>,
    /// Ask size.
    #[serde(default)]
    pub ask_size: Option<f64>,
    /// Last trade.
    #[serde(default)]
    pub last_price: Option<f64>,
    /// Mark.
    #[serde(default)]
    pub mark: Option<f64>,
    /// Net change.
    #[serde(default)]
    pub net_change: Option<f64>,
    /// Day volume.
    #[serde(default)]
    pub total_volume: Option<f64>,
    /// Quote time in epoch milliseconds.
    #[serde(default)]
    pub quote_time: Option<i64>,
}

// ============================================================================
// Option Chains
// ============================================================================

/// Query parameters for option chains. `symbol` is required.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionChainQuery {
    /// Underlying symbol.
    pub symbol: String,
    /// Contract type filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_type: Option<ChainContractType>,
    /// Number of strikes around the money.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strike_count: Option<u32>,
    /// Include the underlying quote.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_underlying_quote: Option<bool>,
    /// Chain strategy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<ChainStrategy>,
    /// Strike interval for spread strategies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<f64>,
    /// Single strike.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strike: Option<f64>,
    /// Strike range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<StrikeRange>,
    /// First expiration date.
    #[serde(serialize_with = "iso_date", skip_serializing_if = "Option::is_none")]
    pub from_date: Option<NaiveDate>,
    /// Last expiration date.
    #[serde(serialize_with = "iso_date", skip_serializing_if = "Option::is_none")]
    pub to_date: Option<NaiveDate>,
    /// Volatility for analytical chains.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volatility: Option<f64>,
    /// Underlying price for analytical chains.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underlying_price: Option<f64>,
    /// Interest rate for analytical chains.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<f64>,
    /// Days to expiration for analytical chains.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_to_expiration: Option<u32>,
    /// Expiration month (e.g. `JAN`, `ALL`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp_month: Option<String>,
    /// Option type (e.g. `S` standard, `NS` non-standard).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option_type: Option<String>,
    /// Entitlement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entitlement: Option<Entitlement>,
}

impl OptionChainQuery {
    /// Creates a query for the given underlying with no filters.
    #[must_use]
    pub fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            ..Default::default()
        }
    }
}

/// Option chain response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionChain {
    /// Underlying symbol.
    pub symbol: String,
    /// Status.
    #[serde(default)]
    pub status: Option<String>,
    /// Strategy.
    #[serde(default)]
    pub strategy: Option<String>,
    /// Interval.
    #[serde(default)]
    pub interval: Option<f64>,
    /// Whether quotes are delayed.
    #[serde(default)]
    pub is_delayed: Option<bool>,
    /// Whether the underlying is an index.
    #[serde(default)]
    pub is_index: Option<bool>,
    /// Interest rate.
    #[serde(default)]
    pub interest_rate: Option<f64>,
    /// Underlying price.
    #[serde(default)]
    pub underlying_price: Option<f64>,
    /// Volatility.
    #[serde(default)]
    pub volatility: Option<f64>,
    /// Number of contracts.
    #[serde(default)]
    pub number_of_contracts: Option<i64>,
    /// Underlying quote, when requested.
    #[serde(default)]
    pub underlying: Option<serde_json::Value>,
    /// Calls keyed by `<date>:<days>` then by strike.
    #[serde(default)]
    pub call_exp_date_map: HashMap<String, HashMap<String, Vec<OptionContract>>>,
    /// Puts keyed by `<date>:<days>` then by strike.
    #[serde(default)]
    pub put_exp_date_map: HashMap<String, HashMap<String, Vec<OptionContract>>>,
}

/// Single option contract inside a chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionContract {
    /// CALL or PUT.
    pub put_call: String,
    /// 21-character option symbol.
    pub symbol: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Bid.
    #[serde(default)]
    pub bid: Option<f64>,
    /// Ask.
    #[serde(default)]
    pub ask: Option<f64>,
    /// Last.
    #[serde(default)]
    pub last: Option<f64>,
    /// Mark.
    #[serde(default)]
    pub mark: Option<f64>,
    /// Day volume.
    #[serde(default)]
    pub total_volume: Option<i64>,
    /// Open interest.
    #[serde(default)]
    pub open_interest: Option<i64>,
    /// Implied volatility.
    #[serde(default)]
    pub volatility: Option<f64>,
    /// Delta.
    #[serde(default)]
    pub delta: Option<f64>,
    /// Gamma.
    #[serde(default)]
    pub gamma: Option<f64>,
    /// Theta.
    #[serde(default)]
    pub theta: Option<f64>,
    /// Vega.
    #[serde(default)]
    pub vega: Option<f64>,
    /// Strike.
    #[serde(default)]
    pub strike_price: Option<f64>,
    /// Days to expiration.
    #[serde(default)]
    pub days_to_expiration: Option<i64>,
    /// In the money.
    #[serde(default)]
    pub in_the_money: Option<bool>,
}

/// Expiration chain response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpirationChain {
    /// Available expirations.
    #[serde(default)]
    pub expiration_list: Vec<Expiration>,
}

/// One available expiration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expiration {
    /// Expiration date (YYYY-MM-DD).
    pub expiration_date: String,
    /// Days to expiration.
    #[serde(default)]
    pub days_to_expiration: i64,
    /// Expiration type (e.g. `W`, `M`, `Q`).
    #[serde(default)]
    pub expiration_type: Option<String>,
    /// Whether the expiration is standard.
    #[serde(default)]
    pub standard: Option<bool>,
}

// ============================================================================
// Price History
// ============================================================================

/// Query parameters for price history. `symbol` is required.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceHistoryQuery {
    /// Symbol.
    pub symbol: String,
    /// Period type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_type: Option<PeriodType>,
    /// Number of periods.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<u32>,
    /// Candle frequency type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_type: Option<FrequencyType>,
    /// Candle frequency.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<u32>,
    /// Window start, sent as epoch milliseconds.
    #[serde(
        rename = "startDate",
        serialize_with = "epoch_millis",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_datetime: Option<DateTime<Utc>>,
    /// Window end, sent as epoch milliseconds.
    #[serde(
        rename = "endDate",
        serialize_with = "epoch_millis",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_datetime: Option<DateTime<Utc>>,
    /// Include extended-hours candles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub need_extended_hours_data: Option<bool>,
    /// Include the previous close.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub need_previous_close: Option<bool>,
}

impl PriceHistoryQuery {
    /// Creates a query for the given symbol with broker defaults.
    #[must_use]
    pub fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            ..Default::default()
        }
    }
}

/// Price history response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceHistory {
    /// Symbol.
    #[serde(default)]
    pub symbol: Option<String>,
    /// True when no candles matched.
    #[serde(default)]
    pub empty: bool,
    /// Previous close.
    #[serde(default)]
    pub previous_close: Option<f64>,
    /// Previous close date in epoch milliseconds.
    #[serde(default)]
    pub previous_close_date: Option<i64>,
    /// Candles, oldest first.
    #[serde(default)]
    pub candles: Vec<Candle>,
}

/// OHLCV candle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Open.
    pub open: f64,
    /// High.
    pub high: f64,
    /// Low.
    pub low: f64,
    /// Close.
    pub close: f64,
    /// Volume.
    pub volume: f64,
    /// Candle start in epoch milliseconds.
    pub datetime: i64,
}

// ============================================================================
// Movers
// ============================================================================

/// Query parameters for movers.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MoversQuery {
    /// Sort order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<MoverSort>,
    /// Minimum percent change (0, 1, 5, 10, 30 or 60).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<u8>,
}

/// Movers response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movers {
    /// Ranked instruments.
    #[serde(default)]
    pub screeners: Vec<Screener>,
}

/// Ranked mover.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Screener {
    /// Symbol.
    pub symbol: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Last price.
    #[serde(default)]
    pub last_price: Option<f64>,
    /// Net change.
    #[serde(default)]
    pub net_change: Option<f64>,
    /// Net percent change.
    #[serde(default)]
    pub net_percent_change: Option<f64>,
    /// Volume.
    #[serde(default)]
    pub volume: Option<i64>,
    /// Trades.
    #[serde(default)]
    pub trades: Option<i64>,
}

// ============================================================================
// Market Hours
// ============================================================================

/// Market hours keyed by market, then by product.
pub type MarketHoursResponse = HashMap<String, HashMap<String, MarketHours>>;

/// Hours for one product on one day.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketHours {
    /// Date (YYYY-MM-DD).
    pub date: String,
    /// Market type.
    #[serde(default)]
    pub market_type: Option<String>,
    /// Product.
    #[serde(default)]
    pub product: Option<String>,
    /// Product name.
    #[serde(default)]
    pub product_name: Option<String>,
    /// Whether the market is open that day.
    pub is_open: bool,
    /// Session intervals keyed by session name.
    #[serde(default)]
    pub session_hours: HashMap<String, Vec<SessionInterval>>,
}

/// Session start and end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInterval {
    /// Start (ISO-8601).
    pub start: String,
    /// End (ISO-8601).
    pub end: String,
}

// ============================================================================
// Instruments
// ============================================================================

/// Instrument search response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentsResponse {
    /// Matches.
    #[serde(default)]
    pub instruments: Vec<InstrumentInfo>,
}

/// Instrument search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentInfo {
    /// CUSIP.
    #[serde(default)]
    pub cusip: Option<String>,
    /// Symbol.
    pub symbol: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Listing exchange.
    #[serde(default)]
    pub exchange: Option<String>,
    /// Asset type.
    #[serde(default)]
    pub asset_type: Option<AssetType>,
    /// Fundamentals, with the `fundamental` projection.
    #[serde(default)]
    pub fundamental: Option<serde_json::Value>,
}
