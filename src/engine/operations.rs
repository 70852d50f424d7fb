//! Order lifecycle: validation, placement policy per order type, and
//! cancellation.

use tracing::trace;

use super::account::AccountStore;
use super::core::Engine;
use super::error::EngineError;
use super::order::{Order, OrderId, OrderKind, OrderView, Side};

/// A raw order request as decoded from the command channel.
///
/// Direction and order type arrive as their wire codes so the engine can
/// apply every validation rule itself before anything is allocated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    /// Account name, fixed on the account's first touch.
    pub account: String,
    /// Caller-supplied account id.
    pub account_id: i64,
    pub qty: i64,
    pub price: i64,
    /// 1 = buy, 2 = sell.
    pub direction: i64,
    /// 1 = limit, 2 = market, 3 = fill-or-kill, 4 = immediate-or-cancel.
    pub order_type: i64,
}

impl Engine {
    /// Accept, match, and (for limit orders) possibly rest an order.
    ///
    /// Validation happens before any id or account storage is consumed:
    /// order id capacity first, then account id range, then value sanity.
    /// Fill-or-kill orders only enter the matcher when the crossable
    /// liquidity inside their limit covers the full quantity.
    ///
    /// A ticker is emitted iff the book changed: the order rested as a
    /// limit or produced at least one fill.
    ///
    /// # Errors
    /// [`EngineError::TooManyOrders`], [`EngineError::TooHighAccount`], or
    /// [`EngineError::SillyValue`]; on error nothing is allocated.
    pub fn place_order(&mut self, request: &OrderRequest) -> Result<OrderId, EngineError> {
        if self.orders.at_capacity() {
            return Err(EngineError::TooManyOrders);
        }
        let account_index = AccountStore::check_id(request.account_id)?;
        if request.price < 0 || request.qty < 1 {
            return Err(EngineError::SillyValue);
        }
        let direction = Side::from_wire(request.direction).ok_or(EngineError::SillyValue)?;
        let kind = OrderKind::from_wire(request.order_type).ok_or(EngineError::SillyValue)?;

        let (account, account_created) = self
            .accounts
            .lookup_or_create(&request.account, account_index);
        if account_created {
            self.counters.accounts_created += 1;
        }

        let ts = self.clock.now();
        let id = self.orders.allocate(|id| {
            Order::new(id, account, request.qty, request.price, direction, kind, ts)
        })?;
        self.counters.orders_created += 1;
        self.accounts.index_order(account, id);

        trace!(id, %direction, %kind, qty = request.qty, price = request.price, "order accepted");

        let feasible = kind != OrderKind::Fok
            || self
                .book
                .crossable_covers(&self.orders, direction, request.price, request.qty);
        if feasible {
            self.run_order(id);
        }

        let freed = self.book.cleanup_exhausted(direction.opposite(), &self.orders);
        self.counters.levels_freed += freed as u64;

        // Market orders report price 0 regardless of the token submitted;
        // the matcher never read the field for them.
        if kind == OrderKind::Market {
            if let Some(order) = self.orders.get_mut(id) {
                order.price = 0;
            }
        }

        let mut rest_at = None;
        if let Some(order) = self.orders.get_mut(id) {
            if order.open {
                if kind == OrderKind::Limit {
                    rest_at = Some(order.price);
                } else {
                    order.open = false;
                    order.qty = 0;
                }
            }
        }
        if let Some(price) = rest_at {
            if self.book.insert_resting(direction, price, id) {
                self.counters.levels_created += 1;
            }
            self.counters.resting_inserts += 1;
        }

        let filled = self.orders.get(id).map_or(0, |order| order.total_filled);
        if filled > 0 || kind == OrderKind::Limit {
            self.refresh_quote_and_emit_ticker();
        }

        Ok(id)
    }

    /// Cancel a resting limit order by id.
    ///
    /// Anything that is not a limit order was auto-cancelled when it ran,
    /// and a limit order that already left the book has nothing to unlink;
    /// both cases are no-ops that still report the order's current state.
    /// A successful unlink closes the order, refreshes the quote, and
    /// emits a ticker.
    ///
    /// # Errors
    /// [`EngineError::NoSuchId`] for an id that was never allocated.
    pub fn cancel_order(&mut self, id: i64) -> Result<OrderId, EngineError> {
        let order = self.orders.resolve(id)?;
        let (order_id, kind, price, direction) =
            (order.id, order.kind, order.price, order.direction);

        if kind == OrderKind::Limit {
            let unlink = self.book.cancel(direction, price, order_id);
            if unlink.found {
                if unlink.level_removed {
                    self.counters.levels_freed += 1;
                }
                if let Some(order) = self.orders.get_mut(order_id) {
                    order.open = false;
                    order.qty = 0;
                }
                trace!(id = order_id, price, "resting order cancelled");
                self.refresh_quote_and_emit_ticker();
            }
        }

        Ok(order_id)
    }

    /// The current record of an order.
    ///
    /// # Errors
    /// [`EngineError::NoSuchId`] for an id that was never allocated.
    pub fn order_status(&self, id: i64) -> Result<OrderView, EngineError> {
        let order = self.orders.resolve(id)?;
        let order_id = order.id;
        Ok(self
            .order_view(order_id)
            .expect("resolved order has a view"))
    }

    /// Every order an account has placed, in submission order.
    ///
    /// # Errors
    /// [`EngineError::AccountUnknown`] when the account id has never
    /// placed an order here.
    pub fn account_orders(&self, account_id: i64) -> Result<Vec<OrderView>, EngineError> {
        let account = self.accounts.resolve(account_id)?;
        Ok(account
            .orders
            .iter()
            .filter_map(|&id| self.order_view(id))
            .collect())
    }
}
