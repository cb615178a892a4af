//! OCO, TRIGGER and bracket composition.

use super::{OrderBuilder, OrderError, OrderPayload};
use schwab_client::OrderStrategyType;
use serde::{Serialize, Serializer};

/// Order without children, usable as a leaf or as a TRIGGER parent.
///
/// Builders always convert. A raw payload converts only when it has no
/// children and its strategy type is neither OCO nor TRIGGER.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleOrder(OrderPayload);

impl SingleOrder {
    /// Order body.
    #[must_use]
    pub fn payload(&self) -> &OrderPayload {
        &self.0
    }
}

impl From<OrderBuilder> for SingleOrder {
    fn from(builder: OrderBuilder) -> Self {
        Self(builder.into())
    }
}

impl From<&OrderBuilder> for SingleOrder {
    fn from(builder: &OrderBuilder) -> Self {
        Self(builder.build())
    }
}

impl TryFrom<OrderPayload> for SingleOrder {
    type Error = OrderError;

    fn try_from(payload: OrderPayload) -> Result<Self, Self::Error> {
        if !payload.child_order_strategies.is_empty() {
            return Err(OrderError::UnsupportedChildStrategy);
        }
        match payload.order_strategy_type {
            Some(kind @ (OrderStrategyType::Oco | OrderStrategyType::Trigger)) => {
                Err(OrderError::CompositeStrategyType(kind))
            }
            _ => Ok(Self(payload)),
        }
    }
}

/// Tree of orders submitted together.
///
/// A TRIGGER parent is always a [`SingleOrder`]; composite parents cannot be
/// expressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderStrategy {
    /// One standalone order.
    Single(SingleOrder),
    /// Two strategies where a fill of either cancels the other.
    OneCancelsOther(Box<OrderStrategy>, Box<OrderStrategy>),
    /// Order whose fill releases `child`.
    Trigger {
        /// Order placed first.
        parent: SingleOrder,
        /// Strategy released once the parent fills.
        child: Box<OrderStrategy>,
    },
}

impl OrderStrategy {
    /// Flattens the tree into the JSON shape the orders endpoint expects.
    #[must_use]
    pub fn to_payload(&self) -> OrderPayload {
        match self {
            Self::Single(order) => order.payload().clone(),
            Self::OneCancelsOther(first, second) => OrderPayload {
                order_strategy_type: Some(OrderStrategyType::Oco),
                child_order_strategies: vec![first.to_payload(), second.to_payload()],
                ..OrderPayload::default()
            },
            Self::Trigger { parent, child } => OrderPayload {
                order_strategy_type: Some(OrderStrategyType::Trigger),
                child_order_strategies: vec![child.to_payload()],
                ..parent.payload().clone()
            },
        }
    }
}

impl From<SingleOrder> for OrderStrategy {
    fn from(order: SingleOrder) -> Self {
        Self::Single(order)
    }
}

impl From<OrderBuilder> for OrderStrategy {
    fn from(builder: OrderBuilder) -> Self {
        Self::Single(builder.into())
    }
}

impl From<&OrderBuilder> for OrderStrategy {
    fn from(builder: &OrderBuilder) -> Self {
        Self::Single(builder.into())
    }
}

impl TryFrom<OrderPayload> for OrderStrategy {
    type Error = OrderError;

    fn try_from(payload: OrderPayload) -> Result<Self, Self::Error> {
        SingleOrder::try_from(payload).map(Self::Single)
    }
}

impl Serialize for OrderStrategy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_payload().serialize(serializer)
    }
}

/// Pairs two strategies so that a fill of one cancels the other.
///
/// Children keep argument order.
pub fn one_cancels_other(
    first: impl Into<OrderStrategy>,
    second: impl Into<OrderStrategy>,
) -> OrderStrategy {
    OrderStrategy::OneCancelsOther(Box::new(first.into()), Box::new(second.into()))
}

/// Makes `second` wait for `first` to fill.
///
/// The result is `first` itself, with its own fields intact, carrying
/// `second` as its only child.
pub fn first_triggers_second(
    first: impl Into<SingleOrder>,
    second: impl Into<OrderStrategy>,
) -> OrderStrategy {
    OrderStrategy::Trigger {
        parent: first.into(),
        child: Box::new(second.into()),
    }
}

/// Bracket: `entry` fills, then `exit1` and `exit2` work as an OCO pair.
pub fn one_triggers_oco(
    entry: impl Into<SingleOrder>,
    exit1: impl Into<OrderStrategy>,
    exit2: impl Into<OrderStrategy>,
) -> OrderStrategy {
    first_triggers_second(entry, one_cancels_other(exit1, exit2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::{EquityInstruction, OrderType, Session};
    use rust_decimal_macros::dec;

    fn limit(symbol: &str, instruction: EquityInstruction, price: &str) -> OrderBuilder {
        OrderBuilder::new()
            .set_session(Session::Normal)
            .set_order_type(OrderType::Limit)
            .set_order_strategy_type(OrderStrategyType::Single)
            .unwrap()
            .set_price(price.parse().unwrap())
            .unwrap()
            .add_equity_leg(instruction, symbol, 1)
            .unwrap()
    }

    #[test]
    fn test_one_cancels_other_shape() {
        let a = limit("AAPL", EquityInstruction::Sell, "160");
        let b = limit("AAPL", EquityInstruction::Sell, "140");

        let payload = one_cancels_other(&a, &b).to_payload();

        assert_eq!(payload.order_strategy_type, Some(OrderStrategyType::Oco));
        assert_eq!(payload.child_order_strategies, vec![a.build(), b.build()]);
        assert!(payload.order_leg_collection.is_empty());
        assert!(payload.price.is_none());
        assert!(payload.order_type.is_none());
    }

    #[test]
    fn test_first_triggers_second_keeps_parent_fields() {
        let first = limit("MSFT", EquityInstruction::Buy, "400");
        let second = limit("MSFT", EquityInstruction::Sell, "420");

        let payload = first_triggers_second(&first, &second).to_payload();

        assert_eq!(payload.order_strategy_type, Some(OrderStrategyType::Trigger));
        assert_eq!(payload.price.as_deref(), Some("400.00"));
        assert_eq!(payload.order_type, Some(OrderType::Limit));
        assert_eq!(payload.session, Some(Session::Normal));
        assert_eq!(payload.order_leg_collection, first.build().order_leg_collection);
        assert_eq!(payload.child_order_strategies, vec![second.build()]);
    }

    #[test]
    fn test_one_triggers_oco_nesting() {
        let entry = limit("SPY", EquityInstruction::Buy, "500");
        let take_profit = limit("SPY", EquityInstruction::Sell, "520");
        let stop_loss = OrderBuilder::new()
            .set_order_type(OrderType::Stop)
            .set_stop_price(dec!(480))
            .unwrap()
            .add_equity_leg(EquityInstruction::Sell, "SPY", 1)
            .unwrap();

        let payload = one_triggers_oco(&entry, &take_profit, &stop_loss).to_payload();

        assert_eq!(payload.order_strategy_type, Some(OrderStrategyType::Trigger));
        assert_eq!(payload.child_order_strategies.len(), 1);

        let oco = &payload.child_order_strategies[0];
        assert_eq!(oco.order_strategy_type, Some(OrderStrategyType::Oco));
        assert_eq!(
            oco.child_order_strategies,
            vec![take_profit.build(), stop_loss.build()]
        );
    }

    #[test]
    fn test_nested_oco_of_triggers() {
        let a = limit("A", EquityInstruction::Buy, "1");
        let b = limit("B", EquityInstruction::Buy, "2");
        let c = limit("C", EquityInstruction::Buy, "3");

        let strategy = one_cancels_other(first_triggers_second(&a, &b), &c);
        let payload = strategy.to_payload();

        let trigger = &payload.child_order_strategies[0];
        assert_eq!(trigger.order_strategy_type, Some(OrderStrategyType::Trigger));
        assert_eq!(trigger.child_order_strategies, vec![b.build()]);
        assert_eq!(payload.child_order_strategies[1], c.build());
    }

    #[test]
    fn test_strategy_serializes_as_payload() {
        let a = limit("AAPL", EquityInstruction::Sell, "160");
        let b = limit("AAPL", EquityInstruction::Sell, "140");
        let strategy = one_cancels_other(&a, &b);

        let json = serde_json::to_value(&strategy).unwrap();
        assert_eq!(json["orderStrategyType"], "OCO");
        assert_eq!(json["childOrderStrategies"][0]["price"], "160.00");
        assert_eq!(json["childOrderStrategies"][1]["price"], "140.00");
        assert!(json.get("orderLegCollection").is_none());
    }

    #[test]
    fn test_composite_payload_cannot_be_a_trigger_parent() {
        let a = limit("AAPL", EquityInstruction::Sell, "160");
        let b = limit("AAPL", EquityInstruction::Sell, "140");
        let oco = one_cancels_other(&a, &b).to_payload();

        assert_eq!(
            SingleOrder::try_from(oco.clone()),
            Err(OrderError::UnsupportedChildStrategy)
        );
        assert_eq!(
            OrderStrategy::try_from(oco),
            Err(OrderError::UnsupportedChildStrategy)
        );
    }

    #[test]
    fn test_childless_composite_payload_is_rejected() {
        let payload = OrderPayload {
            order_strategy_type: Some(OrderStrategyType::Trigger),
            ..OrderPayload::default()
        };

        assert_eq!(
            SingleOrder::try_from(payload),
            Err(OrderError::CompositeStrategyType(OrderStrategyType::Trigger))
        );
    }

    #[test]
    fn test_single_payload_converts() {
        let payload = limit("X", EquityInstruction::Buy, "1").build();
        let parent = SingleOrder::try_from(payload.clone()).unwrap();
        let child = limit("Y", EquityInstruction::Buy, "2");

        let trigger = first_triggers_second(parent, &child).to_payload();

        assert_eq!(trigger.order_leg_collection, payload.order_leg_collection);
        assert_eq!(trigger.child_order_strategies, vec![child.build()]);
        assert_eq!(OrderStrategy::try_from(payload.clone()).unwrap().to_payload(), payload);
    }
}
