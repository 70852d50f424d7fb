//! Dense id-indexed order storage.

use super::error::EngineError;
use super::order::{Order, OrderId};

/// Hard cap on the id space. Deliberately below `i32::MAX` so derived
/// numbers have headroom.
pub const MAX_ORDERS: u32 = 2_000_000_000;

/// Append-only store of every order ever accepted, indexed by id.
///
/// Orders are never freed. Ids are allocated only once the order is known
/// to be admissible, so the id sequence has no gaps; lookups still treat a
/// missing slot as absent rather than assuming density.
#[derive(Debug, Default)]
pub struct OrderStore {
    orders: Vec<Order>,
}

impl OrderStore {
    #[must_use]
    pub fn new() -> Self {
        Self { orders: Vec::new() }
    }

    /// True when the next allocation would exceed [`MAX_ORDERS`].
    ///
    /// Callers check this before building the order so a rejection has no
    /// side effects.
    #[must_use]
    pub fn at_capacity(&self) -> bool {
        self.orders.len() as u32 >= MAX_ORDERS
    }

    /// Allocate the next id and store the order built for it.
    ///
    /// # Errors
    /// [`EngineError::TooManyOrders`] when the id space is exhausted.
    pub fn allocate(
        &mut self,
        build: impl FnOnce(OrderId) -> Order,
    ) -> Result<OrderId, EngineError> {
        if self.at_capacity() {
            return Err(EngineError::TooManyOrders);
        }
        let id = self.orders.len() as OrderId;
        self.orders.push(build(id));
        Ok(id)
    }

    /// The highest id allocated so far, if any.
    #[must_use]
    pub fn highest_id(&self) -> Option<OrderId> {
        (self.orders.len() as u32).checked_sub(1)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(id as usize)
    }

    pub fn get_mut(&mut self, id: OrderId) -> Option<&mut Order> {
        self.orders.get_mut(id as usize)
    }

    /// Resolve a possibly-negative protocol id to a stored order.
    ///
    /// # Errors
    /// [`EngineError::NoSuchId`] when the id is negative, beyond the
    /// highest allocated id, or (defensively) has no stored order.
    pub fn resolve(&self, id: i64) -> Result<&Order, EngineError> {
        if id < 0 || id > self.highest_id().map_or(-1, i64::from) {
            return Err(EngineError::NoSuchId { id });
        }
        self.get(id as OrderId).ok_or(EngineError::NoSuchId { id })
    }

    /// Mutable access to two distinct orders at once.
    ///
    /// # Panics
    /// Panics if the ids are equal or either is out of range. The matcher
    /// only calls this for a standing/incoming pair, which are distinct by
    /// construction (the incoming order is not yet on the book).
    pub fn pair_mut(&mut self, a: OrderId, b: OrderId) -> (&mut Order, &mut Order) {
        assert_ne!(a, b, "pair_mut requires distinct ids");
        let (a, b) = (a as usize, b as usize);
        if a < b {
            let (low, high) = self.orders.split_at_mut(b);
            (&mut low[a], &mut high[0])
        } else {
            let (low, high) = self.orders.split_at_mut(a);
            (&mut high[0], &mut low[b])
        }
    }
}
