//! Batch driver.
//!
//! Loads the reference datasets, feeds transactions through the
//! [`RuleEngine`] strictly in input order and writes the two result
//! datasets. Later decisions depend on the effect of earlier ones, so the
//! batch is a sequential fold and is never reordered.

use crate::error::{EngineError, Result};
use crate::ledger::LedgerState;
use crate::outcome::{Outcome, Status};
use crate::routing::{BinMapping, BinMappingRecord, RoutingDirectory};
use crate::rules::RuleEngine;
use crate::transaction::{Transaction, TransactionRecord};
use crate::user::{User, UserRecord};
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, info};
use serde::de::DeserializeOwned;
use std::io::{Read, Write};

/// Validates one batch of transactions.
///
/// Outcomes are kept in input order. Balances are written for every user in
/// the order the users were loaded.
pub struct LedgerEngine {
    rules: RuleEngine,
    outcomes: Vec<Outcome>,
}

impl LedgerEngine {
    /// Creates an engine over already-loaded reference data.
    pub fn new(users: Vec<User>, mappings: Vec<BinMapping>) -> Self {
        LedgerEngine {
            rules: RuleEngine::new(RoutingDirectory::new(mappings), LedgerState::new(users)),
            outcomes: Vec::new(),
        }
    }

    /// Creates an engine from the users and BIN mapping CSV datasets.
    pub fn from_csv<U: Read, B: Read>(users: U, mappings: B) -> Result<Self> {
        let users = read_users(users)?;
        info!("Users file read: {} users", users.len());

        let mappings = read_bin_mappings(mappings)?;
        info!("Bins file read: {} mappings", mappings.len());

        Ok(LedgerEngine::new(users, mappings))
    }

    /// Evaluates a single transaction and appends its outcome.
    pub fn process_transaction(&mut self, tx: &Transaction) -> Result<&Outcome> {
        let outcome = self.rules.evaluate(tx)?;
        match outcome.status {
            Status::Approved => debug!("Transaction {} approved", tx.id),
            Status::Declined => debug!("Transaction {} declined: {}", tx.id, outcome.message),
        }

        self.outcomes.push(outcome);
        // Safety: the outcome was pushed above
        Ok(self.outcomes.last().expect("outcome exists"))
    }

    /// Evaluates transactions in iteration order, stopping at the first
    /// fatal error.
    pub fn process_all<I>(&mut self, transactions: I) -> Result<()>
    where
        I: IntoIterator<Item = Transaction>,
    {
        for tx in transactions {
            self.process_transaction(&tx)?;
        }
        self.log_summary();
        Ok(())
    }

    /// Streams transactions from a CSV reader.
    ///
    /// Rows are validated as they are read; a row that cannot be parsed
    /// aborts the batch like any other fatal error.
    pub fn process_csv<R: Read>(&mut self, reader: R) -> Result<()> {
        for_each_record(reader, "transactions", |record: TransactionRecord| {
            self.process_transaction(&Transaction::from(record))?;
            Ok(())
        })?;
        self.log_summary();
        Ok(())
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn users(&self) -> &[User] {
        self.rules.ledger().users()
    }

    /// Writes `USER_ID,BALANCE` rows, one per loaded user.
    pub fn write_balances<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["USER_ID", "BALANCE"])?;
        for user in self.users() {
            csv_writer.write_record([user.id.as_str(), user.balance.to_string().as_str()])?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Writes `transaction_id,status,message` rows in input order.
    pub fn write_outcomes<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["transaction_id", "status", "message"])?;
        for outcome in &self.outcomes {
            csv_writer.write_record([
                outcome.transaction_id.as_str(),
                outcome.status.to_string().as_str(),
                outcome.message.as_str(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    fn log_summary(&self) {
        let approved = self.outcomes.iter().filter(|o| o.is_approved()).count();
        info!(
            "Transactions processed: {} approved, {} declined",
            approved,
            self.outcomes.len() - approved
        );
    }
}

/// Reads the users dataset.
pub fn read_users<R: Read>(reader: R) -> Result<Vec<User>> {
    let mut users = Vec::new();
    for_each_record(reader, "users", |record: UserRecord| {
        users.push(User::from(record));
        Ok(())
    })?;
    Ok(users)
}

/// Reads the BIN mapping dataset, preserving row order.
pub fn read_bin_mappings<R: Read>(reader: R) -> Result<Vec<BinMapping>> {
    let mut mappings = Vec::new();
    for_each_record(reader, "bin mapping", |record: BinMappingRecord| {
        mappings.push(BinMapping::from(record));
        Ok(())
    })?;
    Ok(mappings)
}

/// Reads the transactions dataset in full.
pub fn read_transactions<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut transactions = Vec::new();
    for_each_record(reader, "transactions", |record: TransactionRecord| {
        transactions.push(Transaction::from(record));
        Ok(())
    })?;
    Ok(transactions)
}

/// Deserializes every data row positionally and hands it to `each`. The
/// header row is skipped without being interpreted.
fn for_each_record<R, T, F>(reader: R, dataset: &'static str, mut each: F) -> Result<()>
where
    R: Read,
    T: DeserializeOwned,
    F: FnMut(T) -> Result<()>,
{
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut record = StringRecord::new();
    while csv_reader.read_record(&mut record)? {
        let row = record.position().map(|p| p.line()).unwrap_or(0);
        let parsed = record
            .deserialize::<T>(None)
            .map_err(|e| EngineError::InvalidRecord {
                dataset,
                row,
                message: e.to_string(),
            })?;
        each(parsed)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const USERS: &str = "\
user_id,username,balance,country,frozen,min_deposit,max_deposit,min_withdraw,max_withdraw
U1,Alice,100.00,GB,0,5,1000,10,500
U2,Bob,20.00,EE,1,5,1000,10,500";

    const BINS: &str = "\
name,range_from,range_to,type,country
Test Bank,4000000000,4000000099,DC,EE";

    fn engine() -> LedgerEngine {
        LedgerEngine::from_csv(Cursor::new(USERS), Cursor::new(BINS)).unwrap()
    }

    #[test]
    fn test_load_datasets() {
        let engine = engine();
        assert_eq!(engine.users().len(), 2);
        assert_eq!(engine.users()[1].id, "U2");
        assert!(engine.users()[1].frozen);
    }

    #[test]
    fn test_columns_are_read_by_position() {
        let csv = "a,b,c,d,e,f,g,h,i\nU9, Zed ,5.5,lv,1,1,2,3,4";
        let users = read_users(Cursor::new(csv)).unwrap();
        assert_eq!(users[0].name, "Zed");
        assert_eq!(users[0].country, "LV");
        assert_eq!(users[0].max_withdraw.to_string(), "4.00");
    }

    #[test]
    fn test_process_csv_keeps_input_order() {
        let mut engine = engine();
        let txs = "\
id,user,type,amount,method,account
T2,U1,DEPOSIT,50,TRANSFER,GB29NWBK60161331926819
T1,U3,DEPOSIT,50,TRANSFER,GB29NWBK60161331926819
T3,U1,WITHDRAW,150,TRANSFER,GB29NWBK60161331926819";
        engine.process_csv(Cursor::new(txs)).unwrap();

        let ids: Vec<&str> = engine
            .outcomes()
            .iter()
            .map(|o| o.transaction_id.as_str())
            .collect();
        assert_eq!(ids, vec!["T2", "T1", "T3"]);
        assert!(engine.outcomes()[0].is_approved());
        assert_eq!(engine.outcomes()[1].message, "User U3 not found in Users");
        assert!(engine.outcomes()[2].is_approved());
        assert_eq!(engine.users()[0].balance.to_string(), "0.00");
    }

    #[test]
    fn test_process_transaction_returns_its_outcome() {
        let mut engine = engine();
        let record = |id: &str| TransactionRecord {
            id: id.to_string(),
            user_id: "U1".to_string(),
            tx_type: "DEPOSIT".to_string(),
            amount: "50".parse().unwrap(),
            method: "TRANSFER".to_string(),
            account: "GB29NWBK60161331926819".to_string(),
        };

        let first = engine.process_transaction(&Transaction::from(record("T1"))).unwrap();
        assert_eq!(first.transaction_id, "T1");
        assert!(first.is_approved());

        let second = engine.process_transaction(&Transaction::from(record("T1"))).unwrap();
        assert_eq!(second.transaction_id, "T1");
        assert!(!second.is_approved());
        assert_eq!(engine.outcomes().len(), 2);
    }

    #[test]
    fn test_unparsable_amount_is_fatal() {
        let mut engine = engine();
        let txs = "id,user,type,amount,method,account\nT1,U1,DEPOSIT,lots,TRANSFER,GB29";
        let err = engine.process_csv(Cursor::new(txs)).unwrap_err();
        match err {
            EngineError::InvalidRecord { dataset, row, .. } => {
                assert_eq!(dataset, "transactions");
                assert_eq!(row, 2);
            }
            other => panic!("Expected InvalidRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_bin_mapping_aborts_batch() {
        let mut engine = engine();
        let txs = "\
id,user,type,amount,method,account
T1,U1,DEPOSIT,50,TRANSFER,GB29NWBK60161331926819
T2,U1,DEPOSIT,50,CARD,5555555555554444
T3,U1,DEPOSIT,50,TRANSFER,GB29NWBK60161331926819";
        let err = engine.process_csv(Cursor::new(txs)).unwrap_err();
        assert!(matches!(err, EngineError::BinMappingNotFound { .. }));
        assert_eq!(engine.outcomes().len(), 1);
    }

    #[test]
    fn test_write_balances() {
        let mut engine = engine();
        let txs = "id,user,type,amount,method,account\nT1,U1,DEPOSIT,12.345,TRANSFER,GB29NWBK60161331926819";
        engine.process_csv(Cursor::new(txs)).unwrap();

        let mut output = Vec::new();
        engine.write_balances(&mut output).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "USER_ID,BALANCE\nU1,112.35\nU2,20.00\n"
        );
    }

    #[test]
    fn test_write_outcomes() {
        let mut engine = engine();
        let txs = "\
id,user,type,amount,method,account
T1,U1,DEPOSIT,50,TRANSFER,GB29NWBK60161331926819
T2,U2,DEPOSIT,50,CARD,4000000050123456";
        engine.process_csv(Cursor::new(txs)).unwrap();

        let mut output = Vec::new();
        engine.write_outcomes(&mut output).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "transaction_id,status,message\n\
             T1,APPROVED,OK\n\
             T2,DECLINED,User U2account is frozen\n"
        );
    }

    #[test]
    fn test_empty_batch_still_writes_headers() {
        let engine = engine();
        let mut output = Vec::new();
        engine.write_outcomes(&mut output).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "transaction_id,status,message\n");
    }
}
