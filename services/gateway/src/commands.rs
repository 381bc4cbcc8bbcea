//! Wire messages → engine commands
//!
//! Lifts parsed FIX messages into typed commands. Only order-entry
//! message types produce commands; session-level messages (heartbeat,
//! logon, logout, reject) are handled upstream and yield nothing here.

use types::{Order, OrderId, OrderType, Price, Quantity, Side, Symbol, Timestamp};

use crate::error::CodecError;
use crate::fix::{msg_type, tags, FixMessage};

/// A command the engine thread can execute.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    Submit(Order),
    Cancel {
        order_id: OrderId,
    },
    Modify {
        order_id: OrderId,
        price: Price,
        quantity: Quantity,
    },
}

/// Translate a message into a command, stamping new orders with the
/// given ingress timestamp.
///
/// Returns `Ok(None)` for message types that carry no order-entry
/// semantics. Missing or unparseable required tags are reported as
/// values; nothing mutates.
pub fn to_command(
    msg: &FixMessage,
    timestamp: Timestamp,
) -> Result<Option<EngineCommand>, CodecError> {
    match msg.message_type() {
        Some(msg_type::NEW_ORDER) => new_order_command(msg, timestamp).map(Some),
        Some(msg_type::CANCEL) => Ok(Some(EngineCommand::Cancel {
            order_id: order_id_field(msg)?,
        })),
        Some(msg_type::REPLACE) => Ok(Some(EngineCommand::Modify {
            order_id: order_id_field(msg)?,
            price: price_field(msg, tags::PRICE)?,
            quantity: quantity_field(msg, tags::ORDER_QTY)?,
        })),
        _ => Ok(None),
    }
}

fn new_order_command(msg: &FixMessage, timestamp: Timestamp) -> Result<EngineCommand, CodecError> {
    let id = OrderId::new(u64_field(msg, tags::CL_ORD_ID)?);
    let symbol = Symbol::new(required(msg, tags::SYMBOL)?);
    let side = side_field(msg)?;
    let order_type = order_type_field(msg)?;
    let quantity = quantity_field(msg, tags::ORDER_QTY)?;

    let order = match order_type {
        OrderType::Market => Order::market(id, symbol, side, quantity, timestamp),
        _ => {
            let price = price_field(msg, tags::PRICE)?;
            Order::limit(id, symbol, side, price, quantity, timestamp)
        }
    };

    Ok(EngineCommand::Submit(order))
}

/// Cancel/replace targets the original client order id, falling back to
/// the message's own id when tag 41 is absent.
fn order_id_field(msg: &FixMessage) -> Result<OrderId, CodecError> {
    if msg.has(tags::ORIG_CL_ORD_ID) {
        Ok(OrderId::new(u64_field(msg, tags::ORIG_CL_ORD_ID)?))
    } else {
        Ok(OrderId::new(u64_field(msg, tags::CL_ORD_ID)?))
    }
}

fn required(msg: &FixMessage, tag: u32) -> Result<&str, CodecError> {
    msg.get(tag).ok_or(CodecError::MissingTag(tag))
}

fn u64_field(msg: &FixMessage, tag: u32) -> Result<u64, CodecError> {
    let value = required(msg, tag)?;
    value
        .parse()
        .map_err(|_| CodecError::invalid(tag, value))
}

fn quantity_field(msg: &FixMessage, tag: u32) -> Result<Quantity, CodecError> {
    Ok(Quantity::new(u64_field(msg, tag)?))
}

fn price_field(msg: &FixMessage, tag: u32) -> Result<Price, CodecError> {
    let value = required(msg, tag)?;
    let parsed: f64 = value
        .parse()
        .map_err(|_| CodecError::invalid(tag, value))?;
    Ok(Price::from_f64(parsed))
}

fn side_field(msg: &FixMessage) -> Result<Side, CodecError> {
    let value = required(msg, tags::SIDE)?;
    match value {
        "1" => Ok(Side::Buy),
        "2" => Ok(Side::Sell),
        other => Err(CodecError::invalid(tags::SIDE, other)),
    }
}

fn order_type_field(msg: &FixMessage) -> Result<OrderType, CodecError> {
    let value = required(msg, tags::ORD_TYPE)?;
    match value {
        "1" => Ok(OrderType::Market),
        "2" => Ok(OrderType::Limit),
        other => Err(CodecError::invalid(tags::ORD_TYPE, other)),
    }
}
