//! Rust source generation for orders.
//!
//! The output is a function that rebuilds the order with [`OrderBuilder`]
//! calls, meant to be pasted into a program and edited.

use super::{LegInstrument, OrderBuilder, OrderPayload, OrderStrategy};

const INDENT: &str = "    ";

/// Generates a function returning an equivalent builder.
#[must_use]
pub fn code_for_builder(builder: &OrderBuilder) -> String {
    let mut body = String::new();
    write_builder(&mut body, &builder.build(), 1);
    wrap("OrderBuilder", &body)
}

/// Generates a function returning an equivalent strategy, using the
/// composition helpers for OCO and TRIGGER nodes.
#[must_use]
pub fn code_for_strategy(strategy: &OrderStrategy) -> String {
    let mut body = String::new();
    write_strategy(&mut body, strategy, 1);
    wrap("OrderStrategy", &body)
}

fn wrap(return_type: &str, body: &str) -> String {
    format!(
        "use rust_decimal_macros::dec;\n\
         use schwab_api::orders::*;\n\
         \n\
         fn build_order() -> Result<{return_type}, OrderError> {{\n\
         {INDENT}Ok({body})\n\
         }}\n"
    )
}

fn write_strategy(out: &mut String, strategy: &OrderStrategy, depth: usize) {
    match strategy {
        OrderStrategy::Single(order) => {
            out.push_str("OrderStrategy::from(");
            write_builder(out, order.payload(), depth);
            out.push(')');
        }
        OrderStrategy::OneCancelsOther(first, second) => {
            out.push_str("one_cancels_other(\n");
            write_argument(out, depth + 1, |out| write_strategy(out, first, depth + 1));
            write_argument(out, depth + 1, |out| write_strategy(out, second, depth + 1));
            push_indent(out, depth);
            out.push(')');
        }
        OrderStrategy::Trigger { parent, child } => {
            out.push_str("first_triggers_second(\n");
            write_argument(out, depth + 1, |out| {
                write_builder(out, parent.payload(), depth + 1);
            });
            write_argument(out, depth + 1, |out| write_strategy(out, child, depth + 1));
            push_indent(out, depth);
            out.push(')');
        }
    }
}

fn write_argument(out: &mut String, depth: usize, write: impl FnOnce(&mut String)) {
    push_indent(out, depth);
    write(out);
    out.push_str(",\n");
}

/// Writes an `OrderBuilder::new()` chain.
fn write_builder(out: &mut String, payload: &OrderPayload, depth: usize) {
    let mut calls: Vec<String> = Vec::new();

    if let Some(v) = payload.session {
        calls.push(format!("set_session(Session::{v:?})"));
    }
    if let Some(v) = payload.duration {
        calls.push(format!("set_duration(OrderDuration::{v:?})"));
    }
    if let Some(v) = payload.order_type {
        calls.push(format!("set_order_type(OrderType::{v:?})"));
    }
    if let Some(v) = payload.complex_order_strategy_type {
        calls.push(format!(
            "set_complex_order_strategy_type(ComplexOrderStrategyType::{v:?})"
        ));
    }
    if let Some(v) = payload.quantity {
        calls.push(format!("set_quantity({v})?"));
    }
    if let Some(v) = payload.requested_destination {
        calls.push(format!("set_requested_destination(Destination::{v:?})"));
    }
    if let Some(v) = &payload.stop_price {
        calls.push(format!("set_stop_price(dec!({v}))?"));
    }
    if let Some(v) = payload.stop_price_link_basis {
        calls.push(format!("set_stop_price_link_basis(PriceLinkBasis::{v:?})"));
    }
    if let Some(v) = payload.stop_price_link_type {
        calls.push(format!("set_stop_price_link_type(PriceLinkType::{v:?})"));
    }
    if let Some(v) = &payload.stop_price_offset {
        calls.push(format!("set_stop_price_offset(dec!({v}))?"));
    }
    if let Some(v) = payload.stop_type {
        calls.push(format!("set_stop_type(StopType::{v:?})"));
    }
    if let Some(v) = payload.price_link_basis {
        calls.push(format!("set_price_link_basis(PriceLinkBasis::{v:?})"));
    }
    if let Some(v) = payload.price_link_type {
        calls.push(format!("set_price_link_type(PriceLinkType::{v:?})"));
    }
    if let Some(v) = &payload.price {
        calls.push(format!("set_price(dec!({v}))?"));
    }
    if let Some(v) = &payload.activation_price {
        calls.push(format!("set_activation_price(dec!({v}))?"));
    }
    if let Some(v) = payload.special_instruction {
        calls.push(format!(
            "set_special_instruction(SpecialInstruction::{v:?})"
        ));
    }
    if let Some(v) = payload.order_strategy_type {
        calls.push(format!("set_order_strategy_type(OrderStrategyType::{v:?})?"));
    }
    for leg in &payload.order_leg_collection {
        let call = match &leg.instrument {
            LegInstrument::Equity { symbol } => format!(
                "add_equity_leg(EquityInstruction::{:?}, {symbol:?}, {})?",
                leg.instruction, leg.quantity
            ),
            LegInstrument::Option { symbol } => format!(
                "add_option_leg(OptionInstruction::{:?}, {symbol:?}, {})?",
                leg.instruction, leg.quantity
            ),
        };
        calls.push(call);
    }

    out.push_str("OrderBuilder::new()");
    for call in calls {
        out.push('\n');
        push_indent(out, depth + 1);
        out.push('.');
        out.push_str(&call);
    }
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::{
        EquityInstruction, OrderType, Session, equity_buy_limit, equity_sell_limit,
        one_triggers_oco,
    };
    use rust_decimal_macros::dec;

    #[test]
    fn test_code_for_builder() {
        let builder = equity_buy_limit("AAPL", 10, dec!(187.35)).unwrap();

        let code = code_for_builder(&builder);

        let expected = r#"use rust_decimal_macros::dec;
use schwab_api::orders::*;

fn build_order() -> Result<OrderBuilder, OrderError> {
    Ok(OrderBuilder::new()
        .set_session(Session::Normal)
        .set_duration(OrderDuration::Day)
        .set_order_type(OrderType::Limit)
        .set_price(dec!(187.35))?
        .set_order_strategy_type(OrderStrategyType::Single)?
        .add_equity_leg(EquityInstruction::Buy, "AAPL", 10)?)
}
"#;
        assert_eq!(code, expected);
    }

    #[test]
    fn test_code_for_option_leg_keeps_symbol_padding() {
        let builder = OrderBuilder::new()
            .add_option_leg(
                crate::orders::OptionInstruction::SellToClose,
                "XYZ   210115C00062500",
                1,
            )
            .unwrap();

        let code = code_for_builder(&builder);

        assert!(code.contains(
            r#".add_option_leg(OptionInstruction::SellToClose, "XYZ   210115C00062500", 1)?"#
        ));
    }

    #[test]
    fn test_code_for_empty_builder() {
        let code = code_for_builder(&OrderBuilder::new());
        assert!(code.contains("    Ok(OrderBuilder::new())\n"));
    }

    #[test]
    fn test_code_for_bracket_strategy() {
        let entry = equity_buy_limit("SPY", 1, dec!(500)).unwrap();
        let take_profit = equity_sell_limit("SPY", 1, dec!(520)).unwrap();
        let stop_loss = OrderBuilder::new()
            .set_session(Session::Normal)
            .set_order_type(OrderType::Stop)
            .set_stop_price(dec!(480))
            .unwrap()
            .add_equity_leg(EquityInstruction::Sell, "SPY", 1)
            .unwrap();

        let code = code_for_strategy(&one_triggers_oco(entry, take_profit, stop_loss));

        assert!(code.contains("fn build_order() -> Result<OrderStrategy, OrderError> {"));
        assert!(code.contains("    Ok(first_triggers_second(\n"));
        assert!(code.contains("        one_cancels_other(\n"));
        assert!(code.contains(".set_stop_price(dec!(480.00))?"));
        assert!(code.contains(".set_price(dec!(500.00))?"));
        assert_eq!(code.matches("OrderStrategyType::Trigger").count(), 0);
        assert_eq!(code.matches("OrderStrategyType::Single)?").count(), 2);
        assert_eq!(code.matches("OrderBuilder::new()").count(), 3);
    }
}
