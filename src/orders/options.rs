//! Option order templates: single legs and vertical spreads.
//!
//! Symbols are 21-character option symbols, see
//! [`OptionSymbol`](super::OptionSymbol). Templates trade in the normal
//! session, last for the day and are SINGLE orders.

use super::{OptionInstruction, OrderBuilder, OrderError};
use rust_decimal::Decimal;
use schwab_client::{
    ComplexOrderStrategyType, OrderDuration, OrderStrategyType, OrderType, Session,
};

// ============================================================================
// Single Options
// ============================================================================

fn option_base(
    instruction: OptionInstruction,
    symbol: &str,
    quantity: u32,
    order_type: OrderType,
) -> Result<OrderBuilder, OrderError> {
    OrderBuilder::new()
        .set_session(Session::Normal)
        .set_duration(OrderDuration::Day)
        .set_order_type(order_type)
        .set_order_strategy_type(OrderStrategyType::Single)?
        .add_option_leg(instruction, symbol, quantity)
}

fn option_limit(
    instruction: OptionInstruction,
    symbol: &str,
    quantity: u32,
    price: Decimal,
) -> Result<OrderBuilder, OrderError> {
    option_base(instruction, symbol, quantity, OrderType::Limit)?.set_price(price)
}

/// Buys to open at market.
///
/// # Errors
/// Returns [`OrderError::InvalidQuantity`] for zero.
pub fn option_buy_to_open_market(symbol: &str, quantity: u32) -> Result<OrderBuilder, OrderError> {
    option_base(
        OptionInstruction::BuyToOpen,
        symbol,
        quantity,
        OrderType::Market,
    )
}

/// Buys to open at `price` or better.
///
/// # Errors
/// Returns [`OrderError::InvalidQuantity`] or [`OrderError::InvalidPrice`].
pub fn option_buy_to_open_limit(
    symbol: &str,
    quantity: u32,
    price: Decimal,
) -> Result<OrderBuilder, OrderError> {
    option_limit(OptionInstruction::BuyToOpen, symbol, quantity, price)
}

/// Sells to open at market.
///
/// # Errors
/// Returns [`OrderError::InvalidQuantity`] for zero.
pub fn option_sell_to_open_market(
    symbol: &str,
    quantity: u32,
) -> Result<OrderBuilder, OrderError> {
    option_base(
        OptionInstruction::SellToOpen,
        symbol,
        quantity,
        OrderType::Market,
    )
}

/// Sells to open at `price` or better.
///
/// # Errors
/// Returns [`OrderError::InvalidQuantity`] or [`OrderError::InvalidPrice`].
pub fn option_sell_to_open_limit(
    symbol: &str,
    quantity: u32,
    price: Decimal,
) -> Result<OrderBuilder, OrderError> {
    option_limit(OptionInstruction::SellToOpen, symbol, quantity, price)
}

/// Buys to close at market.
///
/// # Errors
/// Returns [`OrderError::InvalidQuantity`] for zero.
pub fn option_buy_to_close_market(
    symbol: &str,
    quantity: u32,
) -> Result<OrderBuilder, OrderError> {
    option_base(
        OptionInstruction::BuyToClose,
        symbol,
        quantity,
        OrderType::Market,
    )
}

/// Buys to close at `price` or better.
///
/// # Errors
/// Returns [`OrderError::InvalidQuantity`] or [`OrderError::InvalidPrice`].
pub fn option_buy_to_close_limit(
    symbol: &str,
    quantity: u32,
    price: Decimal,
) -> Result<OrderBuilder, OrderError> {
    option_limit(OptionInstruction::BuyToClose, symbol, quantity, price)
}

/// Sells to close at market.
///
/// # Errors
/// Returns [`OrderError::InvalidQuantity`] for zero.
pub fn option_sell_to_close_market(
    symbol: &str,
    quantity: u32,
) -> Result<OrderBuilder, OrderError> {
    option_base(
        OptionInstruction::SellToClose,
        symbol,
        quantity,
        OrderType::Market,
    )
}

/// Sells to close at `price` or better.
///
/// # Errors
/// Returns [`OrderError::InvalidQuantity`] or [`OrderError::InvalidPrice`].
pub fn option_sell_to_close_limit(
    symbol: &str,
    quantity: u32,
    price: Decimal,
) -> Result<OrderBuilder, OrderError> {
    option_limit(OptionInstruction::SellToClose, symbol, quantity, price)
}

// ============================================================================
// Vertical Spreads
// ============================================================================

/// Whether the spread is entered for a debit or a credit.
#[derive(Clone, Copy)]
enum Net {
    Debit,
    Credit,
}

fn vertical(
    (first_instruction, first_symbol): (OptionInstruction, &str),
    (second_instruction, second_symbol): (OptionInstruction, &str),
    quantity: u32,
    net: Net,
    price: Decimal,
) -> Result<OrderBuilder, OrderError> {
    let order_type = match net {
        Net::Debit => OrderType::NetDebit,
        Net::Credit => OrderType::NetCredit,
    };
    OrderBuilder::new()
        .set_session(Session::Normal)
        .set_duration(OrderDuration::Day)
        .set_order_type(order_type)
        .set_complex_order_strategy_type(ComplexOrderStrategyType::Vertical)
        .set_order_strategy_type(OrderStrategyType::Single)?
        .set_quantity(quantity)?
        .set_price(price)?
        .add_option_leg(first_instruction, first_symbol, quantity)?
        .add_option_leg(second_instruction, second_symbol, quantity)
}

/// Opens a bull call spread: long the lower strike, short the higher.
///
/// # Errors
/// Returns [`OrderError::InvalidQuantity`] or [`OrderError::InvalidPrice`].
pub fn bull_call_vertical_open(
    long_call_symbol: &str,
    short_call_symbol: &str,
    quantity: u32,
    net_debit: Decimal,
) -> Result<OrderBuilder, OrderError> {
    vertical(
        (OptionInstruction::BuyToOpen, long_call_symbol),
        (OptionInstruction::SellToOpen, short_call_symbol),
        quantity,
        Net::Debit,
        net_debit,
    )
}

/// Closes a bull call spread.
///
/// # Errors
/// Returns [`OrderError::InvalidQuantity`] or [`OrderError::InvalidPrice`].
pub fn bull_call_vertical_close(
    long_call_symbol: &str,
    short_call_symbol: &str,
    quantity: u32,
    net_credit: Decimal,
) -> Result<OrderBuilder, OrderError> {
    vertical(
        (OptionInstruction::SellToClose, long_call_symbol),
        (OptionInstruction::BuyToClose, short_call_symbol),
        quantity,
        Net::Credit,
        net_credit,
    )
}

/// Opens a bear call spread: short the lower strike, long the higher.
///
/// # Errors
/// Returns [`OrderError::InvalidQuantity`] or [`OrderError::InvalidPrice`].
pub fn bear_call_vertical_open(
    short_call_symbol: &str,
    long_call_symbol: &str,
    quantity: u32,
    net_credit: Decimal,
) -> Result<OrderBuilder, OrderError> {
    vertical(
        (OptionInstruction::SellToOpen, short_call_symbol),
        (OptionInstruction::BuyToOpen, long_call_symbol),
        quantity,
        Net::Credit,
        net_credit,
    )
}

/// Closes a bear call spread.
///
/// # Errors
/// Returns [`OrderError::InvalidQuantity`] or [`OrderError::InvalidPrice`].
pub fn bear_call_vertical_close(
    short_call_symbol: &str,
    long_call_symbol: &str,
    quantity: u32,
    net_debit: Decimal,
) -> Result<OrderBuilder, OrderError> {
    vertical(
        (OptionInstruction::BuyToClose, short_call_symbol),
        (OptionInstruction::SellToClose, long_call_symbol),
        quantity,
        Net::Debit,
        net_debit,
    )
}

/// Opens a bull put spread: long the lower strike, short the higher.
///
/// # Errors
/// Returns [`OrderError::InvalidQuantity`] or [`OrderError::InvalidPrice`].
pub fn bull_put_vertical_open(
    long_put_symbol: &str,
    short_put_symbol: &str,
    quantity: u32,
    net_credit: Decimal,
) -> Result<OrderBuilder, OrderError> {
    vertical(
        (OptionInstruction::BuyToOpen, long_put_symbol),
        (OptionInstruction::SellToOpen, short_put_symbol),
        quantity,
        Net::Credit,
        net_credit,
    )
}

/// Closes a bull put spread.
///
/// # Errors
/// Returns [`OrderError::InvalidQuantity`] or [`OrderError::InvalidPrice`].
pub fn bull_put_vertical_close(
    long_put_symbol: &str,
    short_put_symbol: &str,
    quantity: u32,
    net_debit: Decimal,
) -> Result<OrderBuilder, OrderError> {
    vertical(
        (OptionInstruction::SellToClose, long_put_symbol),
        (OptionInstruction::BuyToClose, short_put_symbol),
        quantity,
        Net::Debit,
        net_debit,
    )
}

/// Opens a bear put spread: short the lower strike, long the higher.
///
/// # Errors
/// Returns [`OrderError::InvalidQuantity`] or [`OrderError::InvalidPrice`].
pub fn bear_put_vertical_open(
    short_put_symbol: &str,
    long_put_symbol: &str,
    quantity: u32,
    net_debit: Decimal,
) -> Result<OrderBuilder, OrderError> {
    vertical(
        (OptionInstruction::SellToOpen, short_put_symbol),
        (OptionInstruction::BuyToOpen, long_put_symbol),
        quantity,
        Net::Debit,
        net_debit,
    )
}

/// Closes a bear put spread.
///
/// # Errors
/// Returns [`OrderError::InvalidQuantity`] or [`OrderError::InvalidPrice`].
pub fn bear_put_vertical_close(
    short_put_symbol: &str,
    long_put_symbol: &str,
    quantity: u32,
    net_credit: Decimal,
) -> Result<OrderBuilder, OrderError> {
    vertical(
        (OptionInstruction::BuyToClose, short_put_symbol),
        (OptionInstruction::SellToClose, long_put_symbol),
        quantity,
        Net::Credit,
        net_credit,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::{LegInstrument, OptionSymbol};
    use rust_decimal_macros::dec;
    use schwab_client::Instruction;

    const LOW: &str = "SPY   240119C00470000";
    const HIGH: &str = "SPY   240119C00480000";

    fn legs(builder: OrderBuilder) -> Vec<(Instruction, String, u32)> {
        builder
            .build()
            .order_leg_collection
            .into_iter()
            .map(|leg| (leg.instruction, leg.instrument.symbol().to_string(), leg.quantity))
            .collect()
    }

    #[test]
    fn test_option_buy_to_open_limit() {
        let symbol = OptionSymbol::new("AAPL", chrono::NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(), "C", "150")
            .unwrap()
            .build();
        let payload = option_buy_to_open_limit(&symbol, 2, dec!(0.55)).unwrap().build();

        assert_eq!(payload.order_type, Some(OrderType::Limit));
        assert_eq!(payload.price.as_deref(), Some("0.5500"));
        assert!(payload.complex_order_strategy_type.is_none());
        assert_eq!(
            payload.order_leg_collection[0].instrument,
            LegInstrument::Option { symbol }
        );
    }

    #[test]
    fn test_single_option_templates() {
        let cases = [
            (option_buy_to_open_market(LOW, 1), Instruction::BuyToOpen, OrderType::Market),
            (option_sell_to_open_market(LOW, 1), Instruction::SellToOpen, OrderType::Market),
            (option_buy_to_close_market(LOW, 1), Instruction::BuyToClose, OrderType::Market),
            (option_sell_to_close_market(LOW, 1), Instruction::SellToClose, OrderType::Market),
            (option_sell_to_open_limit(LOW, 1, dec!(2)), Instruction::SellToOpen, OrderType::Limit),
            (option_buy_to_close_limit(LOW, 1, dec!(2)), Instruction::BuyToClose, OrderType::Limit),
            (option_sell_to_close_limit(LOW, 1, dec!(2)), Instruction::SellToClose, OrderType::Limit),
        ];

        for (builder, instruction, order_type) in cases {
            let payload = builder.unwrap().build();
            assert_eq!(payload.order_type, Some(order_type));
            assert_eq!(payload.order_strategy_type, Some(OrderStrategyType::Single));
            assert_eq!(payload.order_leg_collection[0].instruction, instruction);
        }
    }

    #[test]
    fn test_bull_call_vertical_open() {
        let builder = bull_call_vertical_open(LOW, HIGH, 3, dec!(4.25)).unwrap();
        let payload = builder.build();

        assert_eq!(payload.order_type, Some(OrderType::NetDebit));
        assert_eq!(
            payload.complex_order_strategy_type,
            Some(ComplexOrderStrategyType::Vertical)
        );
        assert_eq!(payload.quantity, Some(3));
        assert_eq!(payload.price.as_deref(), Some("4.25"));
        assert_eq!(
            legs(builder),
            vec![
                (Instruction::BuyToOpen, LOW.to_string(), 3),
                (Instruction::SellToOpen, HIGH.to_string(), 3),
            ]
        );
    }

    #[test]
    fn test_vertical_net_direction() {
        let cases = [
            (bull_call_vertical_close(LOW, HIGH, 1, dec!(1)), OrderType::NetCredit),
            (bear_call_vertical_open(LOW, HIGH, 1, dec!(1)), OrderType::NetCredit),
            (bear_call_vertical_close(LOW, HIGH, 1, dec!(1)), OrderType::NetDebit),
            (bull_put_vertical_open(LOW, HIGH, 1, dec!(1)), OrderType::NetCredit),
            (bull_put_vertical_close(LOW, HIGH, 1, dec!(1)), OrderType::NetDebit),
            (bear_put_vertical_open(LOW, HIGH, 1, dec!(1)), OrderType::NetDebit),
            (bear_put_vertical_close(LOW, HIGH, 1, dec!(1)), OrderType::NetCredit),
        ];

        for (builder, order_type) in cases {
            assert_eq!(builder.unwrap().build().order_type, Some(order_type));
        }
    }

    #[test]
    fn test_bear_put_vertical_close_legs() {
        let builder = bear_put_vertical_close(LOW, HIGH, 2, dec!(0.8)).unwrap();
        assert_eq!(
            legs(builder),
            vec![
                (Instruction::BuyToClose, LOW.to_string(), 2),
                (Instruction::SellToClose, HIGH.to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_vertical_rejects_zero_quantity() {
        assert!(matches!(
            bull_put_vertical_open(LOW, HIGH, 0, dec!(1)),
            Err(OrderError::InvalidQuantity(_))
        ));
    }
}
