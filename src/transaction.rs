//! Transaction models for CSV parsing and internal representation.

use crate::money::Money;
use serde::Deserialize;
use std::fmt;

/// Raw transaction row, read positionally: `id,user_id,type,amount,method,account`.
#[derive(Debug, Deserialize)]
pub struct TransactionRecord {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub tx_type: String,
    pub amount: Money,
    pub method: String,
    pub account: String,
}

/// Direction of a transaction. Unrecognised values are kept verbatim so the
/// rule engine can decline them by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxType {
    Deposit,
    Withdraw,
    Other(String),
}

impl From<&str> for TxType {
    fn from(s: &str) -> Self {
        match s {
            "DEPOSIT" => TxType::Deposit,
            "WITHDRAW" => TxType::Withdraw,
            other => TxType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxType::Deposit => f.write_str("DEPOSIT"),
            TxType::Withdraw => f.write_str("WITHDRAW"),
            TxType::Other(s) => f.write_str(s),
        }
    }
}

/// How the funds move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentMethod {
    /// Bank transfer; the account is an IBAN.
    Transfer,
    /// Card payment; the account is a card number.
    Card,
    Other(String),
}

impl From<&str> for PaymentMethod {
    fn from(s: &str) -> Self {
        match s {
            "TRANSFER" => PaymentMethod::Transfer,
            "CARD" => PaymentMethod::Card,
            other => PaymentMethod::Other(other.to_string()),
        }
    }
}

/// A transaction ready for validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Expected to be unique within the batch; not guaranteed by the input.
    pub id: String,
    pub user_id: String,
    pub tx_type: TxType,
    /// May be negative in the input; such transactions are declined.
    pub amount: Money,
    pub method: PaymentMethod,
    /// IBAN for transfers, card number for cards.
    pub account: String,
}

impl Transaction {
    /// Balance change this transaction causes if approved.
    pub fn signed_amount(&self) -> Money {
        match self.tx_type {
            TxType::Deposit => self.amount,
            _ => -self.amount,
        }
    }
}

impl From<TransactionRecord> for Transaction {
    fn from(record: TransactionRecord) -> Self {
        Transaction {
            tx_type: TxType::from(record.tx_type.as_str()),
            method: PaymentMethod::from(record.method.as_str()),
            id: record.id,
            user_id: record.user_id,
            amount: record.amount,
            account: record.account,
        }
    }
}
