//! The two-sided book: sorted price levels, each a FIFO of open orders.

use std::collections::{BTreeMap, VecDeque};

use super::order::{OrderId, Side};
use super::store::OrderStore;

/// One price level: a non-empty FIFO queue of open order ids.
///
/// The level does not own its orders; ids resolve through the
/// [`OrderStore`]. A level exists only while at least one open order rests
/// at its price (the head run of closed orders is tolerated between a
/// match and the following cleanup).
#[derive(Debug, Default)]
pub struct Level {
    orders: VecDeque<OrderId>,
}

impl Level {
    fn new() -> Self {
        Self {
            orders: VecDeque::new(),
        }
    }

    /// Order ids at this price in time priority.
    pub fn iter(&self) -> impl Iterator<Item = OrderId> + '_ {
        self.orders.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Total remaining quantity at this level, summed in 64 bits.
    #[must_use]
    pub fn total_qty(&self, store: &OrderStore) -> i64 {
        self.orders
            .iter()
            .filter_map(|&id| store.get(id))
            .map(|order| order.qty)
            .sum()
    }
}

/// Outcome of a cancel unlink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancelUnlink {
    /// The order was resting at the given price and was removed.
    pub found: bool,
    /// Removing it emptied the level, which was dropped.
    pub level_removed: bool,
}

/// Both sides of the book. Bids match best-first in descending price
/// order, asks in ascending order; the maps themselves stay sorted
/// ascending and iteration direction supplies the priority.
#[derive(Debug, Default)]
pub struct Book {
    bids: BTreeMap<i64, Level>,
    asks: BTreeMap<i64, Level>,
}

impl Book {
    #[must_use]
    pub fn new() -> Self {
        Self {
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
        }
    }

    fn side(&self, side: Side) -> &BTreeMap<i64, Level> {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut BTreeMap<i64, Level> {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    /// Levels of one side in match priority order (bids descending, asks
    /// ascending).
    pub fn levels(&self, side: Side) -> Box<dyn Iterator<Item = (i64, &Level)> + '_> {
        match side {
            Side::Buy => Box::new(self.bids.iter().rev().map(|(price, level)| (*price, level))),
            Side::Sell => Box::new(self.asks.iter().map(|(price, level)| (*price, level))),
        }
    }

    /// Best price on a side: highest bid or lowest ask.
    #[must_use]
    pub fn best(&self, side: Side) -> Option<i64> {
        self.levels(side).next().map(|(price, _)| price)
    }

    #[must_use]
    pub fn level_count(&self, side: Side) -> usize {
        self.side(side).len()
    }

    /// Append an order at the tail of its price level's FIFO, creating the
    /// level if this price has no resting orders yet.
    ///
    /// Returns true when a new level was created.
    pub fn insert_resting(&mut self, side: Side, price: i64, id: OrderId) -> bool {
        let levels = self.side_mut(side);
        let mut created = false;
        levels
            .entry(price)
            .or_insert_with(|| {
                created = true;
                Level::new()
            })
            .orders
            .push_back(id);
        created
    }

    /// All resting order ids an incoming order may cross against, in
    /// strict price-time priority. `limit` of `None` (market) admits every
    /// level; otherwise iteration stops at the first level whose price
    /// crosses the limit.
    #[must_use]
    pub fn crossable(&self, incoming: Side, limit: Option<i64>) -> Vec<OrderId> {
        let mut ids = Vec::new();
        for (price, level) in self.levels(incoming.opposite()) {
            if let Some(limit) = limit {
                let outside = match incoming {
                    Side::Buy => price > limit,
                    Side::Sell => price < limit,
                };
                if outside {
                    break;
                }
            }
            ids.extend(level.iter());
        }
        ids
    }

    /// Whether crossable liquidity within `limit` covers `qty`.
    ///
    /// Accumulates by subtracting resting quantities from the requested
    /// one; additive sums could overflow across a deep book.
    #[must_use]
    pub fn crossable_covers(
        &self,
        store: &OrderStore,
        incoming: Side,
        limit: i64,
        qty: i64,
    ) -> bool {
        let mut remaining = qty;
        for (price, level) in self.levels(incoming.opposite()) {
            let outside = match incoming {
                Side::Buy => price > limit,
                Side::Sell => price < limit,
            };
            if outside {
                break;
            }
            for id in level.iter() {
                if let Some(order) = store.get(id) {
                    remaining -= order.qty;
                    if remaining <= 0 {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Drop closed orders from the head of a side, and any levels emptied
    /// by that, stopping at the first open order. Closed orders deeper in
    /// the queues are left for a later pass; matching only ever closes a
    /// prefix in priority order.
    ///
    /// Returns the number of levels removed.
    pub fn cleanup_exhausted(&mut self, side: Side, store: &OrderStore) -> usize {
        let mut removed = 0;
        loop {
            let best = match side {
                Side::Buy => self.bids.keys().next_back().copied(),
                Side::Sell => self.asks.keys().next().copied(),
            };
            let Some(best) = best else {
                return removed;
            };
            let levels = self.side_mut(side);
            let level = levels.get_mut(&best).expect("best level present");
            while let Some(&front) = level.orders.front() {
                if store.get(front).is_some_and(|order| order.open) {
                    return removed;
                }
                level.orders.pop_front();
            }
            levels.remove(&best);
            removed += 1;
        }
    }

    /// Unlink a resting order from its level; drops the level when it
    /// empties.
    pub fn cancel(&mut self, side: Side, price: i64, id: OrderId) -> CancelUnlink {
        let levels = self.side_mut(side);
        let Some(level) = levels.get_mut(&price) else {
            return CancelUnlink {
                found: false,
                level_removed: false,
            };
        };
        let Some(position) = level.orders.iter().position(|&resting| resting == id) else {
            return CancelUnlink {
                found: false,
                level_removed: false,
            };
        };
        level.orders.remove(position);
        let level_removed = level.orders.is_empty();
        if level_removed {
            levels.remove(&price);
        }
        CancelUnlink {
            found: true,
            level_removed,
        }
    }

    /// Quantity at the best level of a side (0 when empty).
    #[must_use]
    pub fn size_at_best(&self, side: Side, store: &OrderStore) -> i64 {
        self.levels(side)
            .next()
            .map_or(0, |(_, level)| level.total_qty(store))
    }

    /// Total quantity across all levels of a side.
    #[must_use]
    pub fn depth(&self, side: Side, store: &OrderStore) -> i64 {
        self.levels(side)
            .map(|(_, level)| level.total_qty(store))
            .sum()
    }
}
