//! Asynchronous execution and ticker events.
//!
//! The engine produces events; it does not own their delivery. Sinks are
//! listener callbacks and the engine never awaits acknowledgement. It is
//! assumed the listener knows where the event stream goes (stderr in the
//! shipped binary), so transport concerns stay out of the core.

use serde::Serialize;
use std::sync::Arc;

use super::order::{OrderId, OrderView};
use super::quote::QuoteView;

/// One half of a cross, addressed to a single account.
///
/// Every cross emits two of these: one to the standing order's account,
/// then one to the incoming order's account. `order` is the addressee's
/// own order record; the fill fields are shared between the pair.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionEvent {
    pub ok: bool,
    /// The account this message is addressed to.
    pub account: String,
    pub venue: String,
    pub symbol: String,
    /// The addressee's full order record, post-cross.
    pub order: OrderView,
    pub standing_id: OrderId,
    pub incoming_id: OrderId,
    /// Transaction price (the standing order's price).
    pub price: i64,
    /// Quantity traded in this cross.
    pub filled: i64,
    /// Timestamp of the cross.
    pub filled_at: String,
    /// Whether the standing order is done trading (`!open` post-cross).
    pub standing_complete: bool,
    /// Whether the incoming order is done trading.
    pub incoming_complete: bool,
}

/// Book-state change notification carrying the refreshed quote.
#[derive(Debug, Clone, Serialize)]
pub struct TickerEvent {
    pub ok: bool,
    pub quote: QuoteView,
}

/// Sink for execution events.
pub type ExecutionListener = Arc<dyn Fn(&ExecutionEvent) + Send + Sync>;

/// Sink for ticker events.
pub type TickerListener = Arc<dyn Fn(&TickerEvent) + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execution_event_uses_wire_field_names() {
        let event = ExecutionEvent {
            ok: true,
            account: "ALICE".to_string(),
            venue: "TESTEX".to_string(),
            symbol: "FOO".to_string(),
            order: OrderView {
                ok: true,
                venue: "TESTEX".to_string(),
                symbol: "FOO".to_string(),
                direction: crate::engine::order::Side::Buy,
                original_qty: 100,
                qty: 0,
                price: 5000,
                order_type: crate::engine::order::OrderKind::Limit,
                id: 0,
                account: "ALICE".to_string(),
                ts: String::new(),
                total_filled: 100,
                open: false,
                fills: vec![],
            },
            standing_id: 0,
            incoming_id: 1,
            price: 5000,
            filled: 100,
            filled_at: "2026-08-01T00:00:02.000000Z".to_string(),
            standing_complete: true,
            incoming_complete: true,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["standingId"], 0);
        assert_eq!(json["incomingId"], 1);
        assert_eq!(json["filledAt"], "2026-08-01T00:00:02.000000Z");
        assert_eq!(json["standingComplete"], true);
        assert_eq!(json["order"]["originalQty"], 100);
    }
}
