//! The matching core: book, matcher, accounts, quote, and lifecycle.

mod account;
mod book;
mod clock;
mod core;
mod error;
mod events;
mod matching;
mod operations;
mod order;
mod quote;
mod snapshot;
mod store;

mod tests;

pub use account::{Account, AccountStore, LEDGER_CLAMP, MAX_ACCOUNTS, MAX_NAME_BYTES};
pub use book::{Book, CancelUnlink, Level};
pub use clock::Clock;
pub use core::{Counters, Engine};
pub use error::EngineError;
pub use events::{ExecutionEvent, ExecutionListener, TickerEvent, TickerListener};
pub use operations::OrderRequest;
pub use order::{Fill, Order, OrderId, OrderKind, OrderView, Side};
pub use quote::{NO_PRICE, Quote, QuoteView};
pub use snapshot::{BookSnapshot, RestingOrder};
pub use store::{MAX_ORDERS, OrderStore};
