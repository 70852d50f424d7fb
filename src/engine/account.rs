//! Sparse account storage and the position/cash ledger.

use super::error::EngineError;
use super::order::{OrderId, Side};

/// Accounts above this id are rejected before any storage is touched.
pub const MAX_ACCOUNTS: i64 = 5000;

/// Account names are truncated to this many bytes on first touch.
pub const MAX_NAME_BYTES: usize = 63;

/// Shares and cents saturate at this magnitude on both sides. The negative
/// bound is symmetric with the positive one, not `i32::MIN`.
pub const LEDGER_CLAMP: i64 = 2_147_483_647;

/// One trading account: identity, position ledger, and an index of every
/// order it has ever placed (in submission order).
#[derive(Debug, Clone)]
pub struct Account {
    /// Name supplied on first touch; later mismatches are ignored.
    pub name: String,
    /// Net share position, clamped to [`LEDGER_CLAMP`] on both sides.
    pub shares: i32,
    /// Net cash in minor units, clamped like `shares`.
    pub cents: i32,
    /// Running minimum of `shares` over time, observed after the clamp.
    pub posmin: i32,
    /// Running maximum of `shares` over time, observed after the clamp.
    pub posmax: i32,
    /// Ids of every order this account has placed.
    pub orders: Vec<OrderId>,
}

impl Account {
    fn new(name: &str) -> Self {
        Self {
            name: truncate_name(name),
            shares: 0,
            cents: 0,
            posmin: 0,
            posmax: 0,
            orders: Vec::new(),
        }
    }

    /// Apply one side of a cross to the ledger.
    ///
    /// Shares move by `qty` in the direction of the trade; cash moves by
    /// `price * qty` the opposite way. The multiplication happens in i64
    /// and only the final assignment is clamped to the 32-bit ledger.
    /// `posmin`/`posmax` are updated after the clamp.
    pub fn apply_fill(&mut self, qty: i64, price: i64, side: Side) {
        let shares = match side {
            Side::Buy => i64::from(self.shares) + qty,
            Side::Sell => i64::from(self.shares) - qty,
        };
        self.shares = clamp_ledger(shares);

        let notional = price * qty;
        let cents = match side {
            Side::Buy => i64::from(self.cents) - notional,
            Side::Sell => i64::from(self.cents) + notional,
        };
        self.cents = clamp_ledger(cents);

        self.posmin = self.posmin.min(self.shares);
        self.posmax = self.posmax.max(self.shares);
    }
}

fn clamp_ledger(value: i64) -> i32 {
    value.clamp(-LEDGER_CLAMP, LEDGER_CLAMP) as i32
}

/// Truncate to [`MAX_NAME_BYTES`], backing off to a char boundary so the
/// result is still valid UTF-8.
fn truncate_name(name: &str) -> String {
    if name.len() <= MAX_NAME_BYTES {
        return name.to_string();
    }
    let mut end = MAX_NAME_BYTES;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    name[..end].to_string()
}

/// Sparse store of accounts, indexed by the caller-supplied account id.
///
/// Slots are created on demand; ids can have holes (a frontend may number
/// its accounts 0, 1, 7), so every lookup checks for an absent slot.
#[derive(Debug, Default)]
pub struct AccountStore {
    accounts: Vec<Option<Account>>,
}

impl AccountStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            accounts: Vec::new(),
        }
    }

    /// Validate an account id for order placement.
    ///
    /// # Errors
    /// [`EngineError::TooHighAccount`] when the id is negative or at or
    /// above [`MAX_ACCOUNTS`].
    pub fn check_id(account_id: i64) -> Result<u32, EngineError> {
        if !(0..MAX_ACCOUNTS).contains(&account_id) {
            return Err(EngineError::TooHighAccount { account_id });
        }
        Ok(account_id as u32)
    }

    /// Fetch the account at `index`, creating it with `name` on first
    /// touch. A later call with a different name keeps the first name.
    ///
    /// Returns the index and whether the account was created by this call.
    pub fn lookup_or_create(&mut self, name: &str, index: u32) -> (u32, bool) {
        let index = index as usize;
        if index >= self.accounts.len() {
            self.accounts.resize_with(index + 1, || None);
        }
        let created = self.accounts[index].is_none();
        if created {
            self.accounts[index] = Some(Account::new(name));
        }
        (index as u32, created)
    }

    /// Record an order against its owning account.
    pub fn index_order(&mut self, index: u32, order: OrderId) {
        if let Some(Some(account)) = self.accounts.get_mut(index as usize) {
            account.orders.push(order);
        }
    }

    #[must_use]
    pub fn get(&self, index: u32) -> Option<&Account> {
        self.accounts.get(index as usize).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, index: u32) -> Option<&mut Account> {
        self.accounts
            .get_mut(index as usize)
            .and_then(Option::as_mut)
    }

    /// The name of the account at `index`. Empty string for an absent
    /// slot, which placement never produces.
    #[must_use]
    pub fn name(&self, index: u32) -> &str {
        self.get(index).map_or("", |account| account.name.as_str())
    }

    /// Resolve a possibly-negative protocol account id for a status query.
    /// The bounds check short-circuits before any indexing.
    ///
    /// # Errors
    /// [`EngineError::AccountUnknown`] when the id is negative, beyond the
    /// grown storage, or names an untouched slot.
    pub fn resolve(&self, account_id: i64) -> Result<&Account, EngineError> {
        if account_id < 0 || account_id >= self.accounts.len() as i64 {
            return Err(EngineError::AccountUnknown { account_id });
        }
        self.accounts[account_id as usize]
            .as_ref()
            .ok_or(EngineError::AccountUnknown { account_id })
    }

    /// All created accounts in id order, with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Account)> {
        self.accounts
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| slot.as_ref().map(|account| (id as u32, account)))
    }
}
