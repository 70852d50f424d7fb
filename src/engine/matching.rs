//! Price-time matching of an incoming order against the opposite book.

use tracing::trace;

use super::core::Engine;
use super::events::ExecutionEvent;
use super::order::{Fill, OrderId, OrderKind, OrderView};

impl Engine {
    /// Cross an incoming order against the opposite side, best level
    /// outward, strict FIFO within each level.
    ///
    /// Limit and immediate-or-cancel orders stop at the first level whose
    /// price crosses their limit; market orders take every level. The book
    /// is not mutated here; closed standing orders are swept by the
    /// caller's cleanup pass afterwards.
    pub(super) fn run_order(&mut self, incoming_id: OrderId) {
        let incoming = self
            .orders
            .get(incoming_id)
            .expect("incoming order was just allocated");
        let limit = (incoming.kind != OrderKind::Market).then_some(incoming.price);
        let direction = incoming.direction;

        for standing_id in self.book.crossable(direction, limit) {
            if !self.orders.get(incoming_id).is_some_and(|order| order.open) {
                return;
            }
            self.cross(standing_id, incoming_id);
        }
    }

    /// One matching event: fill `min(standing.qty, incoming.qty)` at the
    /// standing (maker) price, record the fill on both orders, settle both
    /// accounts, update the quote's last-trade info, and emit the two
    /// execution messages.
    fn cross(&mut self, standing_id: OrderId, incoming_id: OrderId) {
        let ts = self.clock.now();

        let (standing, incoming) = self.orders.pair_mut(standing_id, incoming_id);
        let quantity = standing.qty.min(incoming.qty);
        let price = standing.price;

        standing.qty -= quantity;
        standing.total_filled += quantity;
        incoming.qty -= quantity;
        incoming.total_filled += quantity;

        let fill = Fill {
            price,
            qty: quantity,
            ts: ts.clone(),
        };
        standing.fills.push(fill.clone());
        incoming.fills.push(fill);

        if standing.qty == 0 {
            standing.open = false;
        }
        if incoming.qty == 0 {
            incoming.open = false;
        }

        let standing_account = standing.account;
        let incoming_account = incoming.account;
        let standing_side = standing.direction;
        self.counters.fills_created += 1;

        // Transactions between two orders of the same account name move no
        // shares and no cash; the fill itself still stands.
        if self.accounts.name(standing_account) != self.accounts.name(incoming_account) {
            if let Some(account) = self.accounts.get_mut(standing_account) {
                account.apply_fill(quantity, price, standing_side);
            }
            if let Some(account) = self.accounts.get_mut(incoming_account) {
                account.apply_fill(quantity, price, standing_side.opposite());
            }
        }

        let last_ts = self.clock.now();
        self.quote.set_last(price, quantity, last_ts);

        trace!(
            standing = standing_id,
            incoming = incoming_id,
            price,
            quantity,
            "cross"
        );

        self.emit_executions(standing_id, incoming_id, price, quantity, ts);
    }

    /// Two execution messages per cross, standing account first, each
    /// carrying the addressee's own post-cross order record.
    fn emit_executions(
        &self,
        standing_id: OrderId,
        incoming_id: OrderId,
        price: i64,
        filled: i64,
        filled_at: String,
    ) {
        let Some(listener) = &self.execution_listener else {
            return;
        };

        let standing = self.orders.get(standing_id).expect("standing order stored");
        let incoming = self.orders.get(incoming_id).expect("incoming order stored");
        let standing_complete = !standing.open;
        let incoming_complete = !incoming.open;

        for order in [standing, incoming] {
            let account = self.accounts.name(order.account).to_string();
            let event = ExecutionEvent {
                ok: true,
                account: account.clone(),
                venue: self.venue().to_string(),
                symbol: self.symbol().to_string(),
                order: OrderView::build(order, &account, self.venue(), self.symbol()),
                standing_id,
                incoming_id,
                price,
                filled,
                filled_at: filled_at.clone(),
                standing_complete,
                incoming_complete,
            };
            listener(&event);
        }
    }
}
