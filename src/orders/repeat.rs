//! Rebuilding a submittable order from one returned by the orders endpoints.

use super::{EquityInstruction, OptionInstruction, OrderBuilder, OrderError};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use schwab_client::{AssetType, Order};
use tracing::debug;

/// Turns a historical order into a builder that places the same order again.
///
/// Only the fields the broker accepts on submission are copied. Status,
/// fill and identifier fields are dropped.
///
/// # Errors
/// - [`OrderError::UnsupportedChildStrategy`] if the order has children.
/// - [`OrderError::MissingOrderStrategyType`] if `orderStrategyType` is absent.
/// - [`OrderError::CompositeStrategyType`] for a childless OCO or TRIGGER.
/// - [`OrderError::UnknownLegType`] for legs that are neither equity nor option.
/// - [`OrderError::InvalidLegInstruction`] for an instruction that does not
///   match its leg's asset type.
/// - [`OrderError::InvalidQuantity`] / [`OrderError::InvalidPrice`] for values
///   the builder refuses.
pub fn construct_repeat_order(order: &Order) -> Result<OrderBuilder, OrderError> {
    if !order.child_order_strategies.is_empty() {
        return Err(OrderError::UnsupportedChildStrategy);
    }
    let strategy_type = order
        .order_strategy_type
        .ok_or(OrderError::MissingOrderStrategyType)?;

    let mut builder = OrderBuilder::new().set_order_strategy_type(strategy_type)?;

    if let Some(session) = order.session {
        builder = builder.set_session(session);
    }
    if let Some(duration) = order.duration {
        builder = builder.set_duration(duration);
    }
    if let Some(order_type) = order.order_type {
        builder = builder.set_order_type(order_type);
    }
    if let Some(kind) = order.complex_order_strategy_type {
        builder = builder.set_complex_order_strategy_type(kind);
    }
    if let Some(quantity) = order.quantity {
        builder = builder.set_quantity(whole_quantity(quantity)?)?;
    }
    if let Some(destination) = order.requested_destination {
        builder = builder.set_requested_destination(destination);
    }
    if let Some(price) = order.stop_price {
        builder = builder.set_stop_price(price)?;
    }
    if let Some(basis) = order.stop_price_link_basis {
        builder = builder.set_stop_price_link_basis(basis);
    }
    if let Some(link_type) = order.stop_price_link_type {
        builder = builder.set_stop_price_link_type(link_type);
    }
    if let Some(offset) = order.stop_price_offset {
        builder = builder.set_stop_price_offset(offset)?;
    }
    if let Some(stop_type) = order.stop_type {
        builder = builder.set_stop_type(stop_type);
    }
    if let Some(basis) = order.price_link_basis {
        builder = builder.set_price_link_basis(basis);
    }
    if let Some(link_type) = order.price_link_type {
        builder = builder.set_price_link_type(link_type);
    }
    if let Some(price) = order.price {
        builder = builder.set_price(price)?;
    }
    if let Some(price) = order.activation_price {
        builder = builder.set_activation_price(price)?;
    }
    if let Some(instruction) = order.special_instruction {
        builder = builder.set_special_instruction(instruction);
    }

    for leg in &order.order_leg_collection {
        let quantity = whole_quantity(leg.quantity)?;
        let symbol = leg.instrument.symbol.as_str();
        builder = match leg.instrument.asset_type {
            AssetType::Equity => builder.add_equity_leg(
                EquityInstruction::try_from(leg.instruction)?,
                symbol,
                quantity,
            )?,
            AssetType::Option => builder.add_option_leg(
                OptionInstruction::try_from(leg.instruction)?,
                symbol,
                quantity,
            )?,
            other => return Err(OrderError::UnknownLegType(other)),
        };
    }

    debug!(
        order_id = ?order.order_id,
        legs = order.order_leg_collection.len(),
        "reconstructed order"
    );
    Ok(builder)
}

fn whole_quantity(quantity: Decimal) -> Result<u32, OrderError> {
    if !quantity.fract().is_zero() {
        return Err(OrderError::InvalidQuantity(format!(
            "{quantity} is not a whole number"
        )));
    }
    quantity
        .to_u32()
        .filter(|q| *q > 0)
        .ok_or_else(|| OrderError::InvalidQuantity(format!("{quantity} is out of range")))
}
