//! Cross-transaction ledger state.
//!
//! Holds everything whose value depends on earlier transactions in the batch:
//! user balances, which user first used each account, and which transaction
//! ids have already been seen. All three only grow or change through the
//! rule engine, one transaction at a time.

use crate::error::{EngineError, Result};
use crate::money::Money;
use crate::user::User;
use std::collections::{HashMap, HashSet};

/// Mutable state of one batch run.
#[derive(Debug, Default)]
pub struct LedgerState {
    /// Users in input order.
    users: Vec<User>,

    /// User id to position in `users`. The first row wins for repeated ids.
    index: HashMap<String, usize>,

    /// Account string to the id of the user whose approved transaction used it first.
    owners: HashMap<String, String>,

    /// Transaction ids already evaluated, approved or not.
    processed: HashSet<String>,
}

impl LedgerState {
    pub fn new(users: Vec<User>) -> Self {
        let mut index = HashMap::with_capacity(users.len());
        for (pos, user) in users.iter().enumerate() {
            index.entry(user.id.clone()).or_insert(pos);
        }
        LedgerState {
            users,
            index,
            owners: HashMap::new(),
            processed: HashSet::new(),
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Position of the user in load order.
    pub fn position_of(&self, user_id: &str) -> Option<usize> {
        self.index.get(user_id).copied()
    }

    pub fn user(&self, pos: usize) -> &User {
        &self.users[pos]
    }

    pub fn find_user(&self, user_id: &str) -> Option<&User> {
        self.position_of(user_id).map(|pos| self.user(pos))
    }

    pub fn is_duplicate(&self, tx_id: &str) -> bool {
        self.processed.contains(tx_id)
    }

    pub fn mark_processed(&mut self, tx_id: &str) {
        self.processed.insert(tx_id.to_string());
    }

    pub fn owner_of(&self, account: &str) -> Option<&str> {
        self.owners.get(account).map(String::as_str)
    }

    /// Records `user_id` as owner unless the account already has one.
    pub fn record_owner_if_absent(&mut self, account: &str, user_id: &str) {
        if !self.owners.contains_key(account) {
            self.owners.insert(account.to_string(), user_id.to_string());
        }
    }

    /// Adds `delta` to the balance of the user at `pos`.
    ///
    /// A result outside the `Decimal` range is an error and leaves the
    /// balance unchanged.
    pub fn apply_balance(&mut self, pos: usize, delta: Money) -> Result<()> {
        let user = &mut self.users[pos];
        match user.balance.checked_add(delta) {
            Some(balance) => {
                user.balance = balance;
                Ok(())
            }
            None => Err(EngineError::BalanceOverflow {
                user: user.id.clone(),
            }),
        }
    }
}
