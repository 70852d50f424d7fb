//! The engine instance: all book state behind one owner.
//!
//! The book, order store, account store, quote, and clock counter all live
//! here rather than as process globals, so tests can construct independent
//! instances. The dispatcher is the single writer; every operation runs to
//! completion before the next command is read.

use std::fmt;

use super::account::AccountStore;
use super::book::Book;
use super::clock::Clock;
use super::error::EngineError;
use super::events::{ExecutionListener, TickerEvent, TickerListener};
use super::order::{Order, OrderId, OrderView};
use super::quote::{Quote, QuoteView};
use super::store::OrderStore;

/// Allocation counters for the `__DEBUG_MEMORY__` readout.
///
/// The engine is allocation-heavy and free-light; these track the heavy
/// side plus the two places records are dropped (cleanup and cancel).
#[derive(Debug, Default, Clone, Copy)]
pub struct Counters {
    pub orders_created: u64,
    pub fills_created: u64,
    pub accounts_created: u64,
    pub levels_created: u64,
    pub levels_freed: u64,
    pub resting_inserts: u64,
}

impl fmt::Display for Counters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "orders_created: {},", self.orders_created)?;
        writeln!(f, "fills_created: {},", self.fills_created)?;
        writeln!(f, "accounts_created: {},", self.accounts_created)?;
        writeln!(f, "levels_created: {},", self.levels_created)?;
        writeln!(f, "levels_freed: {},", self.levels_freed)?;
        write!(f, "resting_inserts: {}", self.resting_inserts)
    }
}

/// The matching engine for one (venue, symbol) pair.
pub struct Engine {
    venue: String,
    symbol: String,
    start_time: String,
    pub(super) clock: Clock,
    pub(super) orders: OrderStore,
    pub(super) accounts: AccountStore,
    pub(super) book: Book,
    pub(super) quote: Quote,
    pub(super) counters: Counters,

    /// Sink for execution events, two per cross.
    pub execution_listener: Option<ExecutionListener>,

    /// Sink for ticker events, one per book-state change.
    pub ticker_listener: Option<TickerListener>,
}

impl Engine {
    /// Create an engine with an empty book. Captures the start time and
    /// stamps the initial quote with it.
    #[must_use]
    pub fn new(venue: &str, symbol: &str) -> Self {
        let mut clock = Clock::new();
        let start_time = clock.now();
        Self {
            venue: venue.to_string(),
            symbol: symbol.to_string(),
            start_time: start_time.clone(),
            clock,
            orders: OrderStore::new(),
            accounts: AccountStore::new(),
            book: Book::new(),
            quote: Quote::new(start_time),
            counters: Counters::default(),
            execution_listener: None,
            ticker_listener: None,
        }
    }

    #[must_use]
    pub fn venue(&self) -> &str {
        &self.venue
    }

    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Timestamp captured when the engine was constructed.
    #[must_use]
    pub fn start_time(&self) -> &str {
        &self.start_time
    }

    /// A fresh timestamp. Consumes one clock tick.
    pub fn timestamp(&mut self) -> String {
        self.clock.now()
    }

    #[must_use]
    pub fn orders(&self) -> &OrderStore {
        &self.orders
    }

    #[must_use]
    pub fn accounts(&self) -> &AccountStore {
        &self.accounts
    }

    #[must_use]
    pub fn book(&self) -> &Book {
        &self.book
    }

    #[must_use]
    pub fn quote(&self) -> &Quote {
        &self.quote
    }

    #[must_use]
    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    /// The current quote as reported on the command and event channels.
    #[must_use]
    pub fn quote_view(&self) -> QuoteView {
        self.quote.view(&self.venue, &self.symbol)
    }

    #[must_use]
    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(id)
    }

    /// JSON view of a stored order.
    #[must_use]
    pub fn order_view(&self, id: OrderId) -> Option<OrderView> {
        let order = self.orders.get(id)?;
        Some(OrderView::build(
            order,
            self.accounts.name(order.account),
            &self.venue,
            &self.symbol,
        ))
    }

    /// Name of the account that owns an order, for the frontend's
    /// authentication check.
    ///
    /// # Errors
    /// [`EngineError::NoSuchId`] for an unallocated id.
    pub fn account_name_for(&self, id: i64) -> Result<&str, EngineError> {
        let order = self.orders.resolve(id)?;
        Ok(self.accounts.name(order.account))
    }

    /// Recompute the book-dependent quote fields and notify the ticker
    /// listener. Runs after anything that changed the book.
    pub(super) fn refresh_quote_and_emit_ticker(&mut self) {
        let ts = self.clock.now();
        self.quote
            .refresh_book_dependent(&self.book, &self.orders, ts);
        if let Some(listener) = &self.ticker_listener {
            let event = TickerEvent {
                ok: true,
                quote: self.quote.view(&self.venue, &self.symbol),
            };
            listener(&event);
        }
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("venue", &self.venue)
            .field("symbol", &self.symbol)
            .field("orders", &self.orders.len())
            .field("bid_levels", &self.book.level_count(super::order::Side::Buy))
            .field(
                "ask_levels",
                &self.book.level_count(super::order::Side::Sell),
            )
            .finish_non_exhaustive()
    }
}
