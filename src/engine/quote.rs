//! Top-of-book quote with size and depth aggregates.

use serde::Serialize;

use super::book::Book;
use super::order::Side;
use super::store::OrderStore;

/// Sentinel for "no price" in the internal representation. The JSON view
/// omits the field instead.
pub const NO_PRICE: i64 = -1;

/// The engine's quote. Book-dependent fields are recomputed wholesale by
/// [`Quote::refresh_book_dependent`]; the last-trade fields are written
/// only by the matcher when a cross happens.
#[derive(Debug, Clone)]
pub struct Quote {
    /// Best bid price, or [`NO_PRICE`].
    pub bid: i64,
    /// Best ask price, or [`NO_PRICE`].
    pub ask: i64,
    /// Price of the last trade, or [`NO_PRICE`] before any trade.
    pub last: i64,
    /// Size of the last trade.
    pub last_size: i64,
    /// Total quantity at the best bid level.
    pub bid_size: i64,
    /// Total quantity at the best ask level.
    pub ask_size: i64,
    /// Total quantity across all bid levels.
    pub bid_depth: i64,
    /// Total quantity across all ask levels.
    pub ask_depth: i64,
    /// Timestamp of the latest book mutation.
    pub quote_time: String,
    /// Timestamp of the last trade; empty until one happens.
    pub last_trade: String,
}

impl Quote {
    /// A quote for an empty book, stamped with the engine's start time.
    #[must_use]
    pub fn new(start_time: String) -> Self {
        Self {
            bid: NO_PRICE,
            ask: NO_PRICE,
            last: NO_PRICE,
            last_size: NO_PRICE,
            bid_size: 0,
            ask_size: 0,
            bid_depth: 0,
            ask_depth: 0,
            quote_time: start_time,
            last_trade: String::new(),
        }
    }

    /// Recompute everything the book itself determines: best prices,
    /// sizes at best, and depths. Last-trade fields are left alone; this
    /// runs on every book change, traded or not.
    pub fn refresh_book_dependent(&mut self, book: &Book, store: &OrderStore, ts: String) {
        self.bid = book.best(Side::Buy).unwrap_or(NO_PRICE);
        self.ask = book.best(Side::Sell).unwrap_or(NO_PRICE);
        self.bid_size = book.size_at_best(Side::Buy, store);
        self.ask_size = book.size_at_best(Side::Sell, store);
        self.bid_depth = book.depth(Side::Buy, store);
        self.ask_depth = book.depth(Side::Sell, store);
        self.quote_time = ts;
    }

    /// Record the last trade. Called once per cross by the matcher.
    pub fn set_last(&mut self, price: i64, size: i64, ts: String) {
        self.last = price;
        self.last_size = size;
        self.last_trade = ts;
    }

    /// Whether any trade has happened on this book.
    #[must_use]
    pub fn has_traded(&self) -> bool {
        !self.last_trade.is_empty()
    }

    pub(crate) fn view(&self, venue: &str, symbol: &str) -> QuoteView {
        QuoteView {
            ok: true,
            symbol: symbol.to_string(),
            venue: venue.to_string(),
            bid_size: self.bid_size,
            ask_size: self.ask_size,
            bid_depth: self.bid_depth,
            ask_depth: self.ask_depth,
            quote_time: self.quote_time.clone(),
            bid: (self.bid >= 0).then_some(self.bid),
            ask: (self.ask >= 0).then_some(self.ask),
            last_trade: self.has_traded().then(|| self.last_trade.clone()),
            last_size: self.has_traded().then_some(self.last_size),
            last: self.has_traded().then_some(self.last),
        }
    }
}

/// JSON view of the quote. Absent prices and pre-first-trade fields are
/// omitted rather than serialized as sentinels.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteView {
    pub ok: bool,
    pub symbol: String,
    pub venue: String,
    pub bid_size: i64,
    pub ask_size: i64,
    pub bid_depth: i64,
    pub ask_depth: i64,
    pub quote_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bid: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ask: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_trade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<i64>,
}
