//! User model: balance plus per-user deposit and withdrawal policy.

use crate::money::Money;
use serde::Deserialize;

/// Raw users row, read positionally:
/// `id,name,balance,country,frozen,min_deposit,max_deposit,min_withdraw,max_withdraw`.
#[derive(Debug, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub balance: Money,
    pub country: String,
    pub frozen: String,
    pub min_deposit: Money,
    pub max_deposit: Money,
    pub min_withdraw: Money,
    pub max_withdraw: Money,
}

/// A user of the ledger.
///
/// Only `balance` changes during a run, and only through
/// [`LedgerState::apply_balance`](crate::ledger::LedgerState::apply_balance).
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub balance: Money,
    /// ISO 3166-1 alpha-2, upper case.
    pub country: String,
    pub frozen: bool,
    pub min_deposit: Money,
    pub max_deposit: Money,
    pub min_withdraw: Money,
    pub max_withdraw: Money,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        User {
            id: record.id,
            name: record.name,
            balance: record.balance,
            country: record.country.to_uppercase(),
            frozen: record.frozen == "1",
            min_deposit: record.min_deposit,
            max_deposit: record.max_deposit,
            min_withdraw: record.min_withdraw,
            max_withdraw: record.max_withdraw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn record(frozen: &str, country: &str) -> UserRecord {
        let m = |s: &str| Money::from_str(s).unwrap();
        UserRecord {
            id: "1".to_string(),
            name: "Alice".to_string(),
            balance: m("10.5"),
            country: country.to_string(),
            frozen: frozen.to_string(),
            min_deposit: m("1"),
            max_deposit: m("100"),
            min_withdraw: m("1"),
            max_withdraw: m("50"),
        }
    }

    #[test]
    fn test_frozen_only_when_exactly_one() {
        assert!(User::from(record("1", "EE")).frozen);
        assert!(!User::from(record("0", "EE")).frozen);
        assert!(!User::from(record("true", "EE")).frozen);
        assert!(!User::from(record("", "EE")).frozen);
    }

    #[test]
    fn test_country_is_upper_cased() {
        assert_eq!(User::from(record("0", "ee")).country, "EE");
    }
}
