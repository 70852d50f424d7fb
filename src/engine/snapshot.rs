//! Read-only snapshots of engine state: the binary book dump and the
//! debug/admin readouts.

use std::fmt::Write as _;

use super::core::Engine;
use super::order::Side;

/// One resting order as exposed by the binary book dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestingOrder {
    pub qty: i64,
    pub price: i64,
}

/// Every resting order in book priority order: bids best-first, asks
/// best-first.
#[derive(Debug, Clone, Default)]
pub struct BookSnapshot {
    pub bids: Vec<RestingOrder>,
    pub asks: Vec<RestingOrder>,
}

impl BookSnapshot {
    /// Encode as big-endian `(qty, price)` u32 pairs: all bids, a zero
    /// pair, all asks, another zero pair. A real order never has qty 0, so
    /// the zero pair is an unambiguous side terminator.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity((self.bids.len() + self.asks.len() + 2) * 8);
        for side in [&self.bids, &self.asks] {
            for order in side {
                buf.extend_from_slice(&(order.qty as u32).to_be_bytes());
                buf.extend_from_slice(&(order.price as u32).to_be_bytes());
            }
            buf.extend_from_slice(&[0u8; 8]);
        }
        buf
    }
}

impl Engine {
    /// Snapshot the resting book in priority order.
    #[must_use]
    pub fn book_snapshot(&self) -> BookSnapshot {
        BookSnapshot {
            bids: self.resting_side(Side::Buy),
            asks: self.resting_side(Side::Sell),
        }
    }

    fn resting_side(&self, side: Side) -> Vec<RestingOrder> {
        self.book
            .levels(side)
            .flat_map(|(_, level)| level.iter())
            .filter_map(|id| self.orders.get(id))
            .map(|order| RestingOrder {
                qty: order.qty,
                price: order.price,
            })
            .collect()
    }

    /// The `__SCORES__` readout: an HTML table of every account's cash,
    /// position, position extremes, and net asset value at the last trade
    /// price. Best-effort debug output, not part of the trading protocol.
    pub fn scores_html(&mut self) -> String {
        let mut html = String::new();
        let _ = write!(
            html,
            "<html><head><title>{venue} {symbol}</title></head><body><pre>{venue} {symbol}\n",
            venue = self.venue(),
            symbol = self.symbol()
        );

        if !self.quote().has_traded() {
            html.push_str("No trading activity yet.</pre></body></html>");
            return html;
        }

        let last = self.quote().last;
        let _ = write!(
            html,
            "Current price: ${}.{:02}\n\n",
            last / 100,
            last % 100
        );
        html.push_str(
            "             Account           USD $          Shares         Pos.min         Pos.max           NAV $\n",
        );

        for (_, account) in self.accounts.iter() {
            // shares, cents, and last are all 32-bit, so the NAV fits an i64.
            let nav = i64::from(account.shares) * last + i64::from(account.cents);
            let _ = writeln!(
                html,
                "{:>20} {:>15} {:>15} {:>15} {:>15} {:>15}",
                account.name,
                account.cents / 100,
                account.shares,
                account.posmin,
                account.posmax,
                nav / 100
            );
        }

        let now = self.timestamp();
        let _ = write!(
            html,
            "\n  Start time: {}\nCurrent time: {}",
            self.start_time(),
            now
        );
        html.push_str("</pre></body></html>");
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::OrderRequest;

    fn order(
        account: &str,
        account_id: i64,
        qty: i64,
        price: i64,
        dir: i64,
        kind: i64,
    ) -> OrderRequest {
        OrderRequest {
            account: account.to_string(),
            account_id,
            qty,
            price,
            direction: dir,
            order_type: kind,
        }
    }

    #[test]
    fn empty_book_encodes_as_two_zero_pairs() {
        let engine = Engine::new("TESTEX", "FOO");
        assert_eq!(engine.book_snapshot().to_bytes(), vec![0u8; 16]);
    }

    #[test]
    fn binary_dump_is_big_endian_in_priority_order() {
        let mut engine = Engine::new("TESTEX", "FOO");
        engine.place_order(&order("A", 0, 100, 5000, 1, 1)).unwrap();
        engine.place_order(&order("A", 0, 50, 5100, 1, 1)).unwrap();
        engine.place_order(&order("B", 1, 25, 5200, 2, 1)).unwrap();

        let bytes = engine.book_snapshot().to_bytes();
        // Best bid first: qty 50 @ 5100, then 100 @ 5000, terminator,
        // ask 25 @ 5200, terminator.
        let mut expected = Vec::new();
        for (qty, price) in [(50u32, 5100u32), (100, 5000)] {
            expected.extend_from_slice(&qty.to_be_bytes());
            expected.extend_from_slice(&price.to_be_bytes());
        }
        expected.extend_from_slice(&[0u8; 8]);
        expected.extend_from_slice(&25u32.to_be_bytes());
        expected.extend_from_slice(&5200u32.to_be_bytes());
        expected.extend_from_slice(&[0u8; 8]);
        assert_eq!(bytes, expected);
    }

    #[test]
    fn scores_are_well_formed_html_before_any_trade() {
        let mut engine = Engine::new("TESTEX", "FOO");
        let html = engine.scores_html();
        assert!(html.contains("No trading activity yet."));
        assert!(html.ends_with("</pre></body></html>"));
    }

    #[test]
    fn scores_list_accounts_after_a_trade() {
        let mut engine = Engine::new("TESTEX", "FOO");
        engine.place_order(&order("ALICE", 0, 10, 5000, 1, 1)).unwrap();
        engine.place_order(&order("BOB", 1, 10, 5000, 2, 1)).unwrap();

        let html = engine.scores_html();
        assert!(html.contains("Current price: $50.00"));
        assert!(html.contains("ALICE"));
        assert!(html.contains("BOB"));
        assert!(html.ends_with("</pre></body></html>"));
    }
}
