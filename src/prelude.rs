//! Prelude module that re-exports commonly used types and traits.
//!
//! Instead of importing each type individually, you can use:
//!
//! ```rust
//! use matchbook_rs::prelude::*;
//! ```

// Core engine types
pub use crate::engine::{Engine, EngineError, OrderRequest};

// Order model
pub use crate::engine::{Fill, Order, OrderId, OrderKind, OrderView, Side};

// Quote and snapshot types
pub use crate::engine::{BookSnapshot, Quote, QuoteView, RestingOrder};

// Event types and listener aliases
pub use crate::engine::{ExecutionEvent, ExecutionListener, TickerEvent, TickerListener};

// Capacity and saturation constants
pub use crate::engine::{LEDGER_CLAMP, MAX_ACCOUNTS, MAX_NAME_BYTES, MAX_ORDERS};

// Command channel
pub use crate::protocol::{Command, serve};
