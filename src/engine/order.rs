//! Order records, fills, and their wire encodings.

use serde::Serialize;
use std::fmt;

/// Order id. Ids are dense non-negative integers allocated in submission
/// order by the order store.
pub type OrderId = u32;

/// Which side of the book an order wants to trade against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Wire code 1.
    Buy,
    /// Wire code 2.
    Sell,
}

impl Side {
    /// Decode the protocol's direction code. 1 is Buy, 2 is Sell.
    #[must_use]
    pub fn from_wire(code: i64) -> Option<Self> {
        match code {
            1 => Some(Side::Buy),
            2 => Some(Side::Sell),
            _ => None,
        }
    }

    /// The side this order's fills come from.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

/// Order type, controlling placement policy after matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OrderKind {
    /// Wire code 1. Rests on the book if not fully filled.
    #[serde(rename = "limit")]
    Limit,
    /// Wire code 2. Crosses every available level, never rests.
    #[serde(rename = "market")]
    Market,
    /// Wire code 3. Fills completely within the limit price or not at all.
    #[serde(rename = "fill-or-kill")]
    Fok,
    /// Wire code 4. Limit-gated, fills what it can, never rests.
    #[serde(rename = "immediate-or-cancel")]
    Ioc,
}

impl OrderKind {
    /// Decode the protocol's order type code.
    #[must_use]
    pub fn from_wire(code: i64) -> Option<Self> {
        match code {
            1 => Some(OrderKind::Limit),
            2 => Some(OrderKind::Market),
            3 => Some(OrderKind::Fok),
            4 => Some(OrderKind::Ioc),
            _ => None,
        }
    }
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderKind::Limit => write!(f, "limit"),
            OrderKind::Market => write!(f, "market"),
            OrderKind::Fok => write!(f, "fill-or-kill"),
            OrderKind::Ioc => write!(f, "immediate-or-cancel"),
        }
    }
}

/// A single execution record. One cross appends the same fill value to both
/// participating orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fill {
    /// Transaction price (the standing order's price).
    pub price: i64,
    /// Quantity traded in this cross.
    pub qty: i64,
    /// Timestamp of the cross.
    pub ts: String,
}

/// An order record. Identity fields are fixed at creation; `qty`,
/// `total_filled`, `open` and `fills` mutate as the order trades.
///
/// `qty + total_filled == original_qty` holds at every observation point
/// between crosses. Records live for the lifetime of the engine and are
/// reachable by id from the order store.
#[derive(Debug, Clone)]
pub struct Order {
    /// Dense id, allocated in submission order.
    pub id: OrderId,
    /// Index of the owning account in the account store.
    pub account: u32,
    /// Quantity requested at submission.
    pub original_qty: i64,
    /// Remaining unfilled quantity. Never negative.
    pub qty: i64,
    /// Limit price in integer minor units. Rewritten to 0 for market
    /// orders after matching, as a reporting convention.
    pub price: i64,
    pub direction: Side,
    pub kind: OrderKind,
    /// Creation timestamp.
    pub ts: String,
    /// Cumulative filled quantity.
    pub total_filled: i64,
    /// True until the order leaves the book or is exhausted.
    pub open: bool,
    /// Append-only execution history.
    pub fills: Vec<Fill>,
}

impl Order {
    pub(crate) fn new(
        id: OrderId,
        account: u32,
        qty: i64,
        price: i64,
        direction: Side,
        kind: OrderKind,
        ts: String,
    ) -> Self {
        Self {
            id,
            account,
            original_qty: qty,
            qty,
            price,
            direction,
            kind,
            ts,
            total_filled: 0,
            open: true,
            fills: Vec::new(),
        }
    }
}

/// JSON view of an order as reported on the command and event channels.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub ok: bool,
    pub venue: String,
    pub symbol: String,
    pub direction: Side,
    pub original_qty: i64,
    pub qty: i64,
    pub price: i64,
    pub order_type: OrderKind,
    pub id: OrderId,
    /// The owning account's name.
    pub account: String,
    pub ts: String,
    pub total_filled: i64,
    pub open: bool,
    pub fills: Vec<Fill>,
}

impl OrderView {
    pub(crate) fn build(order: &Order, account_name: &str, venue: &str, symbol: &str) -> Self {
        Self {
            ok: true,
            venue: venue.to_string(),
            symbol: symbol.to_string(),
            direction: order.direction,
            original_qty: order.original_qty,
            qty: order.qty,
            price: order.price,
            order_type: order.kind,
            id: order.id,
            account: account_name.to_string(),
            ts: order.ts.clone(),
            total_filled: order.total_filled,
            open: order.open,
            fills: order.fills.clone(),
        }
    }
}
