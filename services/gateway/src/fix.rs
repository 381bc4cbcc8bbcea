//! FIX-style message codec
//!
//! A subset of FIX 4.2 for order entry: tag=value fields delimited by
//! SOH (0x01), a `8=FIX.4.2` header, a body-length field, and a
//! modular-256 additive checksum trailer. The parser is permissive —
//! malformed fields are skipped and a missing checksum is tolerated on
//! ingress — while the serializer always emits a complete, well-formed
//! message.

use std::collections::BTreeMap;
use types::{Order, Price, Quantity, Side};

/// Field delimiter.
pub const SOH: u8 = 0x01;

/// Protocol version emitted in the header.
pub const BEGIN_STRING: &str = "FIX.4.2";

/// Tag numbers used by the gateway.
pub mod tags {
    pub const BEGIN_STRING: u32 = 8;
    pub const BODY_LENGTH: u32 = 9;
    pub const CHECKSUM: u32 = 10;
    pub const CL_ORD_ID: u32 = 11;
    pub const CUM_QTY: u32 = 14;
    pub const EXEC_ID: u32 = 17;
    pub const LAST_PX: u32 = 31;
    pub const LAST_QTY: u32 = 32;
    pub const MSG_SEQ_NUM: u32 = 34;
    pub const MSG_TYPE: u32 = 35;
    pub const ORDER_ID: u32 = 37;
    pub const ORDER_QTY: u32 = 38;
    pub const ORD_TYPE: u32 = 40;
    pub const ORIG_CL_ORD_ID: u32 = 41;
    pub const PRICE: u32 = 44;
    pub const SENDER_COMP_ID: u32 = 49;
    pub const SENDING_TIME: u32 = 52;
    pub const SIDE: u32 = 54;
    pub const SYMBOL: u32 = 55;
    pub const TARGET_COMP_ID: u32 = 56;
    pub const EXEC_TYPE: u32 = 150;
    pub const LEAVES_QTY: u32 = 151;
}

/// Message type values.
pub mod msg_type {
    pub const HEARTBEAT: char = '0';
    pub const REJECT: char = '3';
    pub const LOGOUT: char = '5';
    pub const EXEC_REPORT: char = '8';
    pub const LOGON: char = 'A';
    pub const NEW_ORDER: char = 'D';
    pub const CANCEL: char = 'F';
    pub const REPLACE: char = 'G';
}

/// Execution report types (tag 150).
pub mod exec_type {
    pub const NEW: char = '0';
    pub const PARTIAL_FILL: char = '1';
    pub const FILL: char = '2';
    pub const CANCELED: char = '4';
    pub const REJECTED: char = '8';
}

/// A parsed or under-construction wire message.
///
/// Fields are kept sorted by tag so serialization is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixMessage {
    fields: BTreeMap<u32, String>,
}

impl FixMessage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(message_type: char) -> Self {
        let mut msg = Self::new();
        msg.set_message_type(message_type);
        msg
    }

    /// Parse a raw message.
    ///
    /// Splits on SOH; each field is `tag=value` with a decimal integer
    /// tag. Duplicate tags overwrite, malformed fields are skipped, and
    /// the checksum is not verified — ingress is permissive by design.
    pub fn parse(raw: &[u8]) -> Self {
        let mut msg = Self::new();

        for token in raw.split(|&b| b == SOH) {
            if token.is_empty() {
                continue;
            }
            let Ok(text) = std::str::from_utf8(token) else {
                continue;
            };
            let Some((tag, value)) = text.split_once('=') else {
                continue;
            };
            let Ok(tag) = tag.parse::<u32>() else {
                continue;
            };
            msg.set(tag, value);
        }

        msg
    }

    /// Serialize with recomputed header and trailer.
    ///
    /// Emits the version tag, then the body length computed over the
    /// remaining fields (excluding itself and the checksum), then the
    /// body in ascending tag order, then the checksum over every
    /// preceding byte including trailing SOHs.
    pub fn serialize(&self) -> Vec<u8> {
        let mut body = Vec::new();
        for (tag, value) in &self.fields {
            if matches!(
                *tag,
                tags::BEGIN_STRING | tags::BODY_LENGTH | tags::CHECKSUM
            ) {
                continue;
            }
            push_field(&mut body, *tag, value);
        }

        let mut out = Vec::with_capacity(body.len() + 32);
        push_field(&mut out, tags::BEGIN_STRING, BEGIN_STRING);
        push_field(&mut out, tags::BODY_LENGTH, &body.len().to_string());
        out.extend_from_slice(&body);

        let checksum = Self::checksum(&out);
        push_field(&mut out, tags::CHECKSUM, &checksum.to_string());
        out
    }

    /// Additive checksum: byte sum modulo 256.
    pub fn checksum(bytes: &[u8]) -> u8 {
        bytes.iter().fold(0u8, |sum, &b| sum.wrapping_add(b))
    }

    pub fn set(&mut self, tag: u32, value: impl Into<String>) {
        self.fields.insert(tag, value.into());
    }

    pub fn get(&self, tag: u32) -> Option<&str> {
        self.fields.get(&tag).map(String::as_str)
    }

    pub fn has(&self, tag: u32) -> bool {
        self.fields.contains_key(&tag)
    }

    pub fn message_type(&self) -> Option<char> {
        self.get(tags::MSG_TYPE)?.chars().next()
    }

    pub fn set_message_type(&mut self, message_type: char) {
        self.set(tags::MSG_TYPE, message_type.to_string());
    }

    /// User-level fields: everything except the recomputed header and
    /// trailer.
    pub fn body_fields(&self) -> impl Iterator<Item = (u32, &str)> {
        self.fields
            .iter()
            .filter(|(tag, _)| {
                !matches!(
                    **tag,
                    tags::BEGIN_STRING | tags::BODY_LENGTH | tags::CHECKSUM
                )
            })
            .map(|(tag, value)| (*tag, value.as_str()))
    }

    /// Build a new-order message.
    pub fn new_order(
        cl_ord_id: u64,
        symbol: &str,
        side: Side,
        order_type: types::OrderType,
        quantity: Quantity,
        price: Option<Price>,
    ) -> Self {
        let mut msg = Self::with_type(msg_type::NEW_ORDER);
        msg.set(tags::CL_ORD_ID, cl_ord_id.to_string());
        msg.set(tags::SYMBOL, symbol);
        msg.set(tags::SIDE, side_char(side).to_string());
        let type_char = match order_type {
            types::OrderType::Market => '1',
            _ => '2',
        };
        msg.set(tags::ORD_TYPE, type_char.to_string());
        msg.set(tags::ORDER_QTY, quantity.to_string());
        if let Some(price) = price {
            msg.set(tags::PRICE, price.to_string());
        }
        msg
    }

    /// Build an execution report for the given order state.
    ///
    /// `last_fill` carries the (quantity, price) of the fill being
    /// reported; it is omitted for reports with no fill (new, cancel,
    /// reject).
    pub fn execution_report(
        order: &Order,
        exec_id: &str,
        exec_type: char,
        last_fill: Option<(Quantity, Price)>,
    ) -> Self {
        let mut msg = Self::with_type(msg_type::EXEC_REPORT);

        msg.set(tags::ORDER_ID, order.id().to_string());
        msg.set(tags::CL_ORD_ID, order.id().to_string());
        msg.set(tags::EXEC_ID, exec_id);
        msg.set(tags::EXEC_TYPE, exec_type.to_string());
        msg.set(tags::SYMBOL, order.symbol().as_str());
        msg.set(tags::SIDE, side_char(order.side()).to_string());
        msg.set(tags::ORDER_QTY, order.quantity().to_string());
        msg.set(tags::LEAVES_QTY, order.remaining().to_string());
        msg.set(tags::CUM_QTY, order.filled_quantity().to_string());

        if let Some((last_qty, last_px)) = last_fill {
            msg.set(tags::LAST_QTY, last_qty.to_string());
            msg.set(tags::LAST_PX, last_px.to_string());
        }

        msg
    }
}

fn push_field(out: &mut Vec<u8>, tag: u32, value: &str) {
    out.extend_from_slice(tag.to_string().as_bytes());
    out.push(b'=');
    out.extend_from_slice(value.as_bytes());
    out.push(SOH);
}

fn side_char(side: Side) -> char {
    match side {
        Side::Buy => '1',
        Side::Sell => '2',
    }
}
