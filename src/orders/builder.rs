//! Fluent order builder and the JSON payload it produces.

use super::{EquityInstruction, OptionInstruction, OrderError};
use rust_decimal::{Decimal, RoundingStrategy};
use schwab_client::{
    ComplexOrderStrategyType, Destination, Instruction, OrderDuration, OrderStrategyType,
    OrderType, PriceLinkBasis, PriceLinkType, Session, SpecialInstruction, StopType,
};
use serde::{Deserialize, Serialize};


/// Order body accepted by the place, replace and preview endpoints.
///
/// Prices are strings already truncated to the precision the broker accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    /// Session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<Session>,
    /// Duration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<OrderDuration>,
    /// Order type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_type: Option<OrderType>,
    /// Complex strategy classification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complex_order_strategy_type: Option<ComplexOrderStrategyType>,
    /// Order-level quantity, used by spreads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    /// Requested routing destination.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_destination: Option<Destination>,
    /// Stop price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<String>,
    /// Stop price link basis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_price_link_basis: Option<PriceLinkBasis>,
    /// Stop price link type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_price_link_type: Option<PriceLinkType>,
    /// Stop price offset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_price_offset: Option<String>,
    /// Stop type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_type: Option<StopType>,
    /// Price link basis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_link_basis: Option<PriceLinkBasis>,
    /// Price link type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_link_type: Option<PriceLinkType>,
    /// Limit price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    /// Activation price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation_price: Option<String>,
    /// Special instruction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instruction: Option<SpecialInstruction>,
    /// SINGLE, OCO or TRIGGER.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_strategy_type: Option<OrderStrategyType>,
    /// Legs, in the order they were added.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order_leg_collection: Vec<OrderLeg>,
    /// Nested orders for OCO and TRIGGER strategies.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub child_order_strategies: Vec<OrderPayload>,
}

/// One leg of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLeg {
    /// Position of the leg within its builder, starting at 1.
    pub leg_id: u32,
    /// What to do with the instrument.
    pub instruction: Instruction,
    /// Instrument traded.
    pub instrument: LegInstrument,
    /// Number of shares or contracts.
    pub quantity: u32,
}

/// Instrument of a leg, tagged by asset type on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "assetType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LegInstrument {
    /// Stock or ETF.
    Equity {
        /// Ticker.
        symbol: String,
    },
    /// Listed option.
    Option {
        /// 21-character option symbol.
        symbol: String,
    },
}

impl LegInstrument {
    /// Symbol regardless of asset type.
    #[must_use]
    pub fn symbol(&self) -> &str {
        match self {
            Self::Equity { symbol } | Self::Option { symbol } => symbol,
        }
    }
}

/// Accumulates order fields and legs.
///
/// Every setter consumes the builder and hands it back, so calls chain.
/// [`OrderBuilder::build`] can be called any number of times; each call
/// returns an independent snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderBuilder {
    payload: OrderPayload,
    legs_added: u32,
}

impl OrderBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the payload as currently configured.
    #[must_use]
    pub fn build(&self) -> OrderPayload {
        self.payload.clone()
    }

    // ========================================================================
    // Session, duration and type
    // ========================================================================

    /// Sets the trading session.
    #[must_use]
    pub fn set_session(mut self, session: Session) -> Self {
        self.payload.session = Some(session);
        self
    }

    /// Clears the trading session.
    #[must_use]
    pub fn clear_session(mut self) -> Self {
        self.payload.session = None;
        self
    }

    /// Sets the duration.
    #[must_use]
    pub fn set_duration(mut self, duration: OrderDuration) -> Self {
        self.payload.duration = Some(duration);
        self
    }

    /// Clears the duration.
    #[must_use]
    pub fn clear_duration(mut self) -> Self {
        self.payload.duration = None;
        self
    }

    /// Sets the order type.
    #[must_use]
    pub fn set_order_type(mut self, order_type: OrderType) -> Self {
        self.payload.order_type = Some(order_type);
        self
    }

    /// Clears the order type.
    #[must_use]
    pub fn clear_order_type(mut self) -> Self {
        self.payload.order_type = None;
        self
    }

    /// Sets the complex strategy classification.
    #[must_use]
    pub fn set_complex_order_strategy_type(mut self, kind: ComplexOrderStrategyType) -> Self {
        self.payload.complex_order_strategy_type = Some(kind);
        self
    }

    /// Clears the complex strategy classification.
    #[must_use]
    pub fn clear_complex_order_strategy_type(mut self) -> Self {
        self.payload.complex_order_strategy_type = None;
        self
    }

    /// Sets the order strategy type.
    ///
    /// OCO and TRIGGER orders carry children, so they are built with
    /// [`OrderStrategy`](super::OrderStrategy) instead.
    ///
    /// # Errors
    /// Returns [`OrderError::CompositeStrategyType`] for `Oco` or `Trigger`.
    pub fn set_order_strategy_type(mut self, kind: OrderStrategyType) -> Result<Self, OrderError> {
        if matches!(kind, OrderStrategyType::Oco | OrderStrategyType::Trigger) {
            return Err(OrderError::CompositeStrategyType(kind));
        }
        self.payload.order_strategy_type = Some(kind);
        Ok(self)
    }

    /// Clears the order strategy type.
    #[must_use]
    pub fn clear_order_strategy_type(mut self) -> Self {
        self.payload.order_strategy_type = None;
        self
    }

    // ========================================================================
    // Quantity and routing
    // ========================================================================

    /// Sets the order-level quantity.
    ///
    /// # Errors
    /// Returns [`OrderError::InvalidQuantity`] for zero.
    pub fn set_quantity(mut self, quantity: u32) -> Result<Self, OrderError> {
        self.payload.quantity = Some(positive_quantity(quantity)?);
        Ok(self)
    }

    /// Clears the order-level quantity.
    #[must_use]
    pub fn clear_quantity(mut self) -> Self {
        self.payload.quantity = None;
        self
    }

    /// Sets the requested destination.
    #[must_use]
    pub fn set_requested_destination(mut self, destination: Destination) -> Self {
        self.payload.requested_destination = Some(destination);
        self
    }

    /// Clears the requested destination.
    #[must_use]
    pub fn clear_requested_destination(mut self) -> Self {
        self.payload.requested_destination = None;
        self
    }

    /// Sets the special instruction.
    #[must_use]
    pub fn set_special_instruction(mut self, instruction: SpecialInstruction) -> Self {
        self.payload.special_instruction = Some(instruction);
        self
    }

    /// Clears the special instruction.
    #[must_use]
    pub fn clear_special_instruction(mut self) -> Self {
        self.payload.special_instruction = None;
        self
    }

    // ========================================================================
    // Prices
    // ========================================================================

    /// Sets the limit price.
    ///
    /// # Errors
    /// Returns [`OrderError::InvalidPrice`] for a negative price.
    pub fn set_price(mut self, price: Decimal) -> Result<Self, OrderError> {
        self.payload.price = Some(format_price(price)?);
        Ok(self)
    }

    /// Clears the limit price.
    #[must_use]
    pub fn clear_price(mut self) -> Self {
        self.payload.price = None;
        self
    }

    /// Sets the activation price.
    ///
    /// # Errors
    /// Returns [`OrderError::InvalidPrice`] for a negative price.
    pub fn set_activation_price(mut self, price: Decimal) -> Result<Self, OrderError> {
        self.payload.activation_price = Some(format_price(price)?);
        Ok(self)
    }

    /// Clears the activation price.
    #[must_use]
    pub fn clear_activation_price(mut self) -> Self {
        self.payload.activation_price = None;
        self
    }

    /// Sets the price link basis.
    #[must_use]
    pub fn set_price_link_basis(mut self, basis: PriceLinkBasis) -> Self {
        self.payload.price_link_basis = Some(basis);
        self
    }

    /// Clears the price link basis.
    #[must_use]
    pub fn clear_price_link_basis(mut self) -> Self {
        self.payload.price_link_basis = None;
        self
    }

    /// Sets the price link type.
    #[must_use]
    pub fn set_price_link_type(mut self, link_type: PriceLinkType) -> Self {
        self.payload.price_link_type = Some(link_type);
        self
    }

    /// Clears the price link type.
    #[must_use]
    pub fn clear_price_link_type(mut self) -> Self {
        self.payload.price_link_type = None;
        self
    }

    // ========================================================================
    // Stops
    // ========================================================================

    /// Sets the stop price.
    ///
    /// # Errors
    /// Returns [`OrderError::InvalidPrice`] for a negative price.
    pub fn set_stop_price(mut self, price: Decimal) -> Result<Self, OrderError> {
        self.payload.stop_price = Some(format_price(price)?);
        Ok(self)
    }

    /// Clears the stop price.
    #[must_use]
    pub fn clear_stop_price(mut self) -> Self {
        self.payload.stop_price = None;
        self
    }

    /// Sets the stop price link basis.
    #[must_use]
    pub fn set_stop_price_link_basis(mut self, basis: PriceLinkBasis) -> Self {
        self.payload.stop_price_link_basis = Some(basis);
        self
    }

    /// Clears the stop price link basis.
    #[must_use]
    pub fn clear_stop_price_link_basis(mut self) -> Self {
        self.payload.stop_price_link_basis = None;
        self
    }

    /// Sets the stop price link type.
    #[must_use]
    pub fn set_stop_price_link_type(mut self, link_type: PriceLinkType) -> Self {
        self.payload.stop_price_link_type = Some(link_type);
        self
    }

    /// Clears the stop price link type.
    #[must_use]
    pub fn clear_stop_price_link_type(mut self) -> Self {
        self.payload.stop_price_link_type = None;
        self
    }

    /// Sets the stop price offset.
    ///
    /// # Errors
    /// Returns [`OrderError::InvalidPrice`] for a negative offset.
    pub fn set_stop_price_offset(mut self, offset: Decimal) -> Result<Self, OrderError> {
        self.payload.stop_price_offset = Some(format_price(offset)?);
        Ok(self)
    }

    /// Clears the stop price offset.
    #[must_use]
    pub fn clear_stop_price_offset(mut self) -> Self {
        self.payload.stop_price_offset = None;
        self
    }

    /// Sets the stop type.
    #[must_use]
    pub fn set_stop_type(mut self, stop_type: StopType) -> Self {
        self.payload.stop_type = Some(stop_type);
        self
    }

    /// Clears the stop type.
    #[must_use]
    pub fn clear_stop_type(mut self) -> Self {
        self.payload.stop_type = None;
        self
    }

    // ========================================================================
    // Legs
    // ========================================================================

    /// Appends an equity leg.
    ///
    /// # Errors
    /// Returns [`OrderError::InvalidQuantity`] for zero.
    pub fn add_equity_leg(
        self,
        instruction: EquityInstruction,
        symbol: &str,
        quantity: u32,
    ) -> Result<Self, OrderError> {
        self.add_leg(
            instruction.into(),
            LegInstrument::Equity {
                symbol: symbol.to_string(),
            },
            quantity,
        )
    }

    /// Appends an option leg. `symbol` is the 21-character option symbol.
    ///
    /// # Errors
    /// Returns [`OrderError::InvalidQuantity`] for zero.
    pub fn add_option_leg(
        self,
        instruction: OptionInstruction,
        symbol: &str,
        quantity: u32,
    ) -> Result<Self, OrderError> {
        self.add_leg(
            instruction.into(),
            LegInstrument::Option {
                symbol: symbol.to_string(),
            },
            quantity,
        )
    }

    /// Removes every leg. Leg ids keep counting from where they were.
    #[must_use]
    pub fn clear_order_legs(mut self) -> Self {
        self.payload.order_leg_collection.clear();
        self
    }

    fn add_leg(
        mut self,
        instruction: Instruction,
        instrument: LegInstrument,
        quantity: u32,
    ) -> Result<Self, OrderError> {
        let quantity = positive_quantity(quantity)?;
        self.legs_added += 1;
        self.payload.order_leg_collection.push(OrderLeg {
            leg_id: self.legs_added,
            instruction,
            instrument,
            quantity,
        });
        Ok(self)
    }
}

impl From<OrderBuilder> for OrderPayload {
    fn from(builder: OrderBuilder) -> Self {
        builder.payload
    }
}

impl From<&OrderBuilder> for OrderPayload {
    fn from(builder: &OrderBuilder) -> Self {
        builder.build()
    }
}

/// Renders a price the way the broker accepts it.
///
/// Prices strictly between 0 and 1 keep four decimals, everything else two.
/// Extra digits are truncated, never rounded.
///
/// # Errors
/// Returns [`OrderError::InvalidPrice`] for a negative price.
pub fn format_price(price: Decimal) -> Result<String, OrderError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(OrderError::InvalidPrice(price));
    }
    let places = if !price.is_zero() && price < Decimal::ONE {
        4
    } else {
        2
    };
    let truncated = price.round_dp_with_strategy(places, RoundingStrategy::ToZero);
    Ok(format!("{:.*}", places as usize, truncated))
}

fn positive_quantity(quantity: u32) -> Result<u32, OrderError> {
    if quantity == 0 {
        return Err(OrderError::InvalidQuantity(
            "quantity must be positive".to_string(),
        ));
    }
    Ok(quantity)
}
