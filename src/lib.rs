//! # Single-Venue Limit Order Book Matching Engine
//!
//! A single-symbol, single-venue limit order book exchange backend written
//! in Rust. One engine instance is responsible for one (venue, symbol)
//! pair: it accepts orders, crosses them against resting liquidity under
//! strict price-time priority, records fills, settles per-account share
//! and cash positions, maintains a top-of-book quote with size and depth
//! aggregates, and emits execution and ticker events as the book changes.
//!
//! ## Key Features
//!
//! - **Strict Price-Time Priority**: orders match best price first, then
//!   earliest arrival at that price. Fills always execute at the standing
//!   (maker) order's price, including for market takers.
//!
//! - **Four Order Types**: limit, market, immediate-or-cancel, and
//!   fill-or-kill, each with its own placement policy. Fill-or-kill
//!   feasibility is decided before the matcher runs, using
//!   subtraction-only accumulation so deep books cannot overflow the
//!   check.
//!
//! - **Saturating Position Ledger**: per-account shares and cents are
//!   32-bit values clamped at ±2_147_483_647; the clamp is a first-class
//!   semantic of the ledger, with running position extremes tracked after
//!   each clamp. Same-name self-crosses leave the ledger untouched.
//!
//! - **Monotonic Timestamps**: UTC timestamps whose microsecond field is a
//!   per-second issue counter, so timestamps compare lexicographically in
//!   program order.
//!
//! - **Event Stream**: two execution messages per cross (one per involved
//!   account) and a ticker message on every book-state change, delivered
//!   through fire-and-forget listener callbacks.
//!
//! ## Design Goals
//!
//! 1. **Determinism**: a single logical writer processes one command to
//!    completion before the next; every operation is atomic from the
//!    caller's perspective.
//! 2. **Correctness**: the book, ledger, and quote invariants hold at
//!    every observable point and are exercised by example-based and
//!    property-based tests.
//! 3. **Bounded arithmetic**: integer minor-unit prices throughout, 64-bit
//!    intermediates wherever 32-bit state could overflow, and no floating
//!    point anywhere in the book.
//!
//! ## Command Protocol
//!
//! The [`protocol`] module implements the line-oriented command channel:
//! `ORDER`, `CANCEL`, `STATUS`, `STATUSALL`, `QUOTE`, `ORDERBOOK_BINARY`,
//! and the `__SCORES__` / `__DEBUG_MEMORY__` / `__TIMESTAMP__` /
//! `__ACC_FROM_ID__` debug commands. Replies are JSON (or raw binary for
//! the book dump), each text reply terminated by an `END` line. Events go
//! to a separate stream with `EXECUTION` / `TICKER` routing headers.
//!
//! ## Example
//!
//! ```
//! use matchbook_rs::{Engine, OrderRequest};
//!
//! let mut engine = Engine::new("TESTEX", "FOO");
//! let bid = engine.place_order(&OrderRequest {
//!     account: "ALICE".to_string(),
//!     account_id: 0,
//!     qty: 100,
//!     price: 5000,
//!     direction: 1, // buy
//!     order_type: 1, // limit
//! }).unwrap();
//!
//! assert!(engine.order(bid).unwrap().open);
//! assert_eq!(engine.quote().bid, 5000);
//! ```

pub mod engine;
pub mod prelude;
pub mod protocol;

pub use engine::{
    Account, AccountStore, Book, BookSnapshot, CancelUnlink, Clock, Counters, Engine, EngineError,
    ExecutionEvent, ExecutionListener, Fill, LEDGER_CLAMP, Level, MAX_ACCOUNTS, MAX_NAME_BYTES,
    MAX_ORDERS, NO_PRICE, Order, OrderId, OrderKind, OrderRequest, OrderStore, OrderView, Quote,
    QuoteView, RestingOrder, Side, TickerEvent, TickerListener,
};
pub use protocol::{Command, serve};
