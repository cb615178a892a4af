//! Single-leg equity order templates.
//!
//! Every template trades in the normal session, lasts for the day and is a
//! SINGLE order. Adjust the returned builder to change any of that.

use super::{EquityInstruction, OrderBuilder, OrderError};
use rust_decimal::Decimal;
use schwab_client::{OrderDuration, OrderStrategyType, OrderType, Session};

fn equity_base(
    instruction: EquityInstruction,
    symbol: &str,
    quantity: u32,
    order_type: OrderType,
) -> Result<OrderBuilder, OrderError> {
    OrderBuilder::new()
        .set_session(Session::Normal)
        .set_duration(OrderDuration::Day)
        .set_order_type(order_type)
        .set_order_strategy_type(OrderStrategyType::Single)?
        .add_equity_leg(instruction, symbol, quantity)
}

fn equity_limit(
    instruction: EquityInstruction,
    symbol: &str,
    quantity: u32,
    price: Decimal,
) -> Result<OrderBuilder, OrderError> {
    equity_base(instruction, symbol, quantity, OrderType::Limit)?.set_price(price)
}

/// Buys shares at market.
///
/// # Errors
/// Returns [`OrderError::InvalidQuantity`] for zero.
pub fn equity_buy_market(symbol: &str, quantity: u32) -> Result<OrderBuilder, OrderError> {
    equity_base(EquityInstruction::Buy, symbol, quantity, OrderType::Market)
}

/// Buys shares at `price` or better.
///
/// # Errors
/// Returns [`OrderError::InvalidQuantity`] or [`OrderError::InvalidPrice`].
pub fn equity_buy_limit(
    symbol: &str,
    quantity: u32,
    price: Decimal,
) -> Result<OrderBuilder, OrderError> {
    equity_limit(EquityInstruction::Buy, symbol, quantity, price)
}

/// Sells shares at market.
///
/// # Errors
/// Returns [`OrderError::InvalidQuantity`] for zero.
pub fn equity_sell_market(symbol: &str, quantity: u32) -> Result<OrderBuilder, OrderError> {
    equity_base(EquityInstruction::Sell, symbol, quantity, OrderType::Market)
}

/// Sells shares at `price` or better.
///
/// # Errors
/// Returns [`OrderError::InvalidQuantity`] or [`OrderError::InvalidPrice`].
pub fn equity_sell_limit(
    symbol: &str,
    quantity: u32,
    price: Decimal,
) -> Result<OrderBuilder, OrderError> {
    equity_limit(EquityInstruction::Sell, symbol, quantity, price)
}

/// Sells short at market.
///
/// # Errors
/// Returns [`OrderError::InvalidQuantity`] for zero.
pub fn equity_sell_short_market(symbol: &str, quantity: u32) -> Result<OrderBuilder, OrderError> {
    equity_base(
        EquityInstruction::SellShort,
        symbol,
        quantity,
        OrderType::Market,
    )
}

/// Sells short at `price` or better.
///
/// # Errors
/// Returns [`OrderError::InvalidQuantity`] or [`OrderError::InvalidPrice`].
pub fn equity_sell_short_limit(
    symbol: &str,
    quantity: u32,
    price: Decimal,
) -> Result<OrderBuilder, OrderError> {
    equity_limit(EquityInstruction::SellShort, symbol, quantity, price)
}

/// Covers a short at market.
///
/// # Errors
/// Returns [`OrderError::InvalidQuantity`] for zero.
pub fn equity_buy_to_cover_market(
    symbol: &str,
    quantity: u32,
) -> Result<OrderBuilder, OrderError> {
    equity_base(
        EquityInstruction::BuyToCover,
        symbol,
        quantity,
        OrderType::Market,
    )
}

/// Covers a short at `price` or better.
///
/// # Errors
/// Returns [`OrderError::InvalidQuantity`] or [`OrderError::InvalidPrice`].
pub fn equity_buy_to_cover_limit(
    symbol: &str,
    quantity: u32,
    price: Decimal,
) -> Result<OrderBuilder, OrderError> {
    equity_limit(EquityInstruction::BuyToCover, symbol, quantity, price)
}
