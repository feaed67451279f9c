//! # Ledger Validator
//!
//! A deterministic, single-pass validator for batches of deposits and
//! withdrawals. Each transaction is checked against the owning user's policy
//! (frozen flag, deposit and withdrawal limits, balance) and the payment
//! network's routing data (IBAN checksum and country, card BIN category and
//! country). Approved transactions update the user's balance; every
//! transaction gets exactly one audit outcome.
//!
//! ## Design Principles
//!
//! - **Exact arithmetic**: amounts are `rust_decimal` values, rendered with
//!   two decimal places
//! - **Ordered evaluation**: duplicate-id detection, account ownership and
//!   balance checks depend on every earlier transaction, so the batch is a
//!   strict fold in input order
//! - **Declines are data, not errors**: only unresolvable reference data
//!   aborts the batch
//!
//! ## Example
//!
//! ```no_run
//! use ledger_validator::LedgerEngine;
//! use std::io::Cursor;
//!
//! let users = "id,name,balance,country,frozen,min_dep,max_dep,min_wd,max_wd\n\
//!              U1,Alice,100,GB,0,1,1000,1,1000\n";
//! let bins = "name,from,to,type,country\n";
//! let txs = "id,user,type,amount,method,account\n\
//!            T1,U1,DEPOSIT,50,TRANSFER,GB29NWBK60161331926819\n";
//!
//! let mut engine = LedgerEngine::from_csv(Cursor::new(users), Cursor::new(bins)).unwrap();
//! engine.process_csv(Cursor::new(txs)).unwrap();
//! engine.write_outcomes(std::io::stdout()).unwrap();
//! ```

pub mod country;
pub mod engine;
pub mod error;
pub mod iban;
pub mod ledger;
pub mod money;
pub mod outcome;
pub mod routing;
pub mod rules;
pub mod transaction;
pub mod user;

pub use engine::{read_bin_mappings, read_transactions, read_users, LedgerEngine};
pub use error::{EngineError, Result};
pub use iban::is_valid_iban;
pub use ledger::LedgerState;
pub use money::Money;
pub use outcome::{Outcome, Status};
pub use routing::{BinMapping, CardCategory, CardRoute, RoutingDirectory};
pub use rules::RuleEngine;
pub use transaction::{PaymentMethod, Transaction, TransactionRecord, TxType};
pub use user::{User, UserRecord};
