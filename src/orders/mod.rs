//! Order construction: option symbols, the fluent [`OrderBuilder`], equity
//! and option templates, OCO/TRIGGER composition, repeat-order
//! reconstruction and Rust code generation.
//!
//! ```
//! use rust_decimal_macros::dec;
//! use schwab_api::orders::*;
//!
//! # fn main() -> Result<(), OrderError> {
//! let entry = equity_buy_limit("AAPL", 10, dec!(150))?;
//! let take_profit = equity_sell_limit("AAPL", 10, dec!(165))?;
//! let stop_loss = equity_sell_market("AAPL", 10)?
//!     .set_order_type(OrderType::Stop)
//!     .set_stop_price(dec!(140))?;
//!
//! let bracket = one_triggers_oco(entry, take_profit, stop_loss);
//! assert_eq!(bracket.to_payload().child_order_strategies.len(), 1);
//! # Ok(())
//! # }
//! ```

mod builder;
mod codegen;
mod equities;
mod options;
mod repeat;
mod strategies;
mod symbol;

pub use builder::{LegInstrument, OrderBuilder, OrderLeg, OrderPayload, format_price};
pub use codegen::{code_for_builder, code_for_strategy};
pub use equities::*;
pub use options::*;
pub use repeat::construct_repeat_order;
pub use strategies::{
    OrderStrategy, SingleOrder, first_triggers_second, one_cancels_other, one_triggers_oco,
};
pub use symbol::{ContractType, OptionSymbol};

pub use schwab_client::{
    AssetType, ComplexOrderStrategyType, Destination, Instruction, OrderDuration,
    OrderStrategyType, OrderType, PriceLinkBasis, PriceLinkType, Session, SpecialInstruction,
    StopType,
};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while building, parsing or reconstructing orders.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// Right code other than `C`, `CALL`, `P` or `PUT`.
    #[error("invalid contract type {0:?}: expected C, CALL, P or PUT")]
    InvalidContractType(String),

    /// Strike that is not a positive decimal below 100000.
    #[error("invalid strike price: {0}")]
    InvalidStrikePrice(String),

    /// Underlying that cannot fit the six-character symbol prefix.
    #[error("invalid underlying {0:?}: must be 1 to 6 ASCII characters without spaces")]
    InvalidUnderlying(String),

    /// Expiration whose year cannot be written as two digits.
    #[error("invalid expiration {0}: year must be between 2000 and 2099")]
    InvalidExpiration(NaiveDate),

    /// Zero or fractional quantity.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// Negative price.
    #[error("invalid price: {0}")]
    InvalidPrice(Decimal),

    /// String that is not a 21-character option symbol.
    #[error("malformed option symbol {symbol:?}: {reason}")]
    MalformedOptionSymbol {
        /// Input that failed to parse.
        symbol: String,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// OCO or TRIGGER requested on a single order.
    #[error("orderStrategyType {0} needs child orders; compose it with OrderStrategy")]
    CompositeStrategyType(OrderStrategyType),

    /// Historical order without an `orderStrategyType`.
    #[error("order has no orderStrategyType")]
    MissingOrderStrategyType,

    /// Historical leg whose asset type has no leg builder.
    #[error("unknown leg type: {0}")]
    UnknownLegType(AssetType),

    /// Instruction that does not belong to the leg's asset class.
    #[error("instruction {instruction} is not valid for an {asset_class} leg")]
    InvalidLegInstruction {
        /// Offending instruction.
        instruction: Instruction,
        /// Asset class of the leg.
        asset_class: &'static str,
    },

    /// Historical order carrying child strategies.
    #[error("orders with child order strategies cannot be reconstructed")]
    UnsupportedChildStrategy,
}

/// Instructions accepted on equity legs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EquityInstruction {
    /// Open or add to a long position.
    Buy,
    /// Close or reduce a long position.
    Sell,
    /// Open or add to a short position.
    SellShort,
    /// Close or reduce a short position.
    BuyToCover,
}

impl From<EquityInstruction> for Instruction {
    fn from(value: EquityInstruction) -> Self {
        match value {
            EquityInstruction::Buy => Instruction::Buy,
            EquityInstruction::Sell => Instruction::Sell,
            EquityInstruction::SellShort => Instruction::SellShort,
            EquityInstruction::BuyToCover => Instruction::BuyToCover,
        }
    }
}

impl TryFrom<Instruction> for EquityInstruction {
    type Error = OrderError;

    fn try_from(value: Instruction) -> Result<Self, Self::Error> {
        match value {
            Instruction::Buy => Ok(Self::Buy),
            Instruction::Sell => Ok(Self::Sell),
            Instruction::SellShort => Ok(Self::SellShort),
            Instruction::BuyToCover => Ok(Self::BuyToCover),
            other => Err(OrderError::InvalidLegInstruction {
                instruction: other,
                asset_class: "equity",
            }),
        }
    }
}

/// Instructions accepted on option legs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionInstruction {
    /// Open a long position.
    BuyToOpen,
    /// Open a short position.
    SellToOpen,
    /// Close a short position.
    BuyToClose,
    /// Close a long position.
    SellToClose,
}

impl From<OptionInstruction> for Instruction {
    fn from(value: OptionInstruction) -> Self {
        match value {
            OptionInstruction::BuyToOpen => Instruction::BuyToOpen,
            OptionInstruction::SellToOpen => Instruction::SellToOpen,
            OptionInstruction::BuyToClose => Instruction::BuyToClose,
            OptionInstruction::SellToClose => Instruction::SellToClose,
        }
    }
}

impl TryFrom<Instruction> for OptionInstruction {
    type Error = OrderError;

    fn try_from(value: Instruction) -> Result<Self, Self::Error> {
        match value {
            Instruction::BuyToOpen => Ok(Self::BuyToOpen),
            Instruction::SellToOpen => Ok(Self::SellToOpen),
            Instruction::BuyToClose => Ok(Self::BuyToClose),
            Instruction::SellToClose => Ok(Self::SellToClose),
            other => Err(OrderError::InvalidLegInstruction {
                instruction: other,
                asset_class: "option",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equity_instruction_round_trip() {
        for instruction in [
            EquityInstruction::Buy,
            EquityInstruction::Sell,
            EquityInstruction::SellShort,
            EquityInstruction::BuyToCover,
        ] {
            let wire = Instruction::from(instruction);
            assert_eq!(EquityInstruction::try_from(wire), Ok(instruction));
        }
    }

    #[test]
    fn test_option_instruction_rejects_equity_instruction() {
        let err = OptionInstruction::try_from(Instruction::Buy).unwrap_err();
        assert_eq!(
            err,
            OrderError::InvalidLegInstruction {
                instruction: Instruction::Buy,
                asset_class: "option",
            }
        );
        assert_eq!(
            err.to_string(),
            "instruction BUY is not valid for an option leg"
        );
    }

    #[test]
    fn test_equity_instruction_rejects_option_instruction() {
        assert!(EquityInstruction::try_from(Instruction::SellToOpen).is_err());
    }
}
