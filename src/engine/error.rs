//! Engine error types

use std::fmt;

/// Errors that can occur while driving the matching engine.
///
/// The first three variants abort an `ORDER` before an id is consumed and
/// map onto the numeric backend error codes of the command protocol via
/// [`EngineError::backend_code`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EngineError {
    /// The order id space is exhausted (2_000_000_000 orders allocated).
    TooManyOrders,

    /// The caller-supplied account id is outside the accepted range.
    TooHighAccount {
        /// The rejected account id.
        account_id: i64,
    },

    /// The order carried a nonsensical value (negative price, quantity
    /// below one, or an unrecognised direction or order type code).
    SillyValue,

    /// No order with this id has ever been allocated.
    NoSuchId {
        /// The id that was looked up.
        id: i64,
    },

    /// The account id has never placed an order on this book.
    AccountUnknown {
        /// The account id that was looked up.
        account_id: i64,
    },
}

impl EngineError {
    /// The numeric code reported on the command channel for order
    /// validation failures. `None` for errors that never reach the
    /// `Backend error N` reply shape.
    #[must_use]
    pub fn backend_code(&self) -> Option<u32> {
        match self {
            EngineError::TooManyOrders => Some(1),
            EngineError::SillyValue => Some(2),
            EngineError::TooHighAccount { .. } => Some(3),
            _ => None,
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::TooManyOrders => write!(f, "too many orders: id space exhausted"),
            EngineError::TooHighAccount { account_id } => {
                write!(f, "account id {account_id} out of range")
            }
            EngineError::SillyValue => write!(f, "silly value in order fields"),
            EngineError::NoSuchId { id } => write!(f, "no such order id: {id}"),
            EngineError::AccountUnknown { account_id } => {
                write!(f, "account {account_id} not known on this book")
            }
        }
    }
}

impl std::error::Error for EngineError {}
