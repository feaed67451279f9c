//! Per-transaction rule evaluation.
//!
//! Evaluation order for one transaction:
//!
//! - Pre-check: a repeated transaction id, then an unknown user. Either one
//!   decides the transaction on its own and skips both phases.
//! - Phase 1, identity and routing: frozen user, then the method-specific
//!   account checks (IBAN checksum and country for transfers, BIN category
//!   and country for cards), or an unknown method.
//! - Phase 2, amount and ownership: negative amount, account owned by
//!   someone else, then the withdrawal or deposit limits, or an unknown type.
//!
//! Within a phase the first failing rule wins, except where noted on the
//! individual checks. Phase 2 always runs after phase 1 and its failure
//! message replaces phase 1's. A transaction is approved only if neither
//! phase produced a message.

use crate::country;
use crate::error::{EngineError, Result};
use crate::iban::is_valid_iban;
use crate::ledger::LedgerState;
use crate::outcome::Outcome;
use crate::routing::{CardCategory, RoutingDirectory};
use crate::transaction::{PaymentMethod, Transaction, TxType};
use crate::user::User;

/// Result of evaluating the rules, before it is committed.
enum Verdict {
    /// Carries the position of the resolved user.
    Approve(usize),
    Decline(String),
}

/// Applies the validation rules to transactions and commits approved ones
/// to the ledger.
#[derive(Debug)]
pub struct RuleEngine {
    routing: RoutingDirectory,
    ledger: LedgerState,
}

impl RuleEngine {
    pub fn new(routing: RoutingDirectory, ledger: LedgerState) -> Self {
        RuleEngine { routing, ledger }
    }

    pub fn ledger(&self) -> &LedgerState {
        &self.ledger
    }

    /// Decides one transaction and, if approved, applies the balance change
    /// and records the account owner.
    ///
    /// The transaction id is marked as processed whatever the outcome. An
    /// error means the reference data could not answer a lookup, or the
    /// balance left the representable range, and the batch must stop.
    pub fn evaluate(&mut self, tx: &Transaction) -> Result<Outcome> {
        let verdict = self.decide(tx);
        self.ledger.mark_processed(&tx.id);

        match verdict? {
            Verdict::Approve(pos) => {
                self.ledger.apply_balance(pos, tx.signed_amount())?;
                self.ledger.record_owner_if_absent(&tx.account, &tx.user_id);
                Ok(Outcome::approved(tx.id.as_str()))
            }
            Verdict::Decline(message) => Ok(Outcome::declined(tx.id.as_str(), message)),
        }
    }

    fn decide(&self, tx: &Transaction) -> Result<Verdict> {
        if self.ledger.is_duplicate(&tx.id) {
            return Ok(Verdict::Decline(format!(
                "Transaction {} already processed (id non-unique)",
                tx.id
            )));
        }

        let pos = match self.ledger.position_of(&tx.user_id) {
            Some(pos) => pos,
            None => {
                return Ok(Verdict::Decline(format!(
                    "User {} not found in Users",
                    tx.user_id
                )))
            }
        };
        let user = self.ledger.user(pos);

        let mut failure = self.check_identity(user, tx)?;
        if let Some(message) = self.check_amount(user, tx) {
            failure = Some(message);
        }

        Ok(match failure {
            None => Verdict::Approve(pos),
            Some(message) => Verdict::Decline(message),
        })
    }

    fn check_identity(&self, user: &User, tx: &Transaction) -> Result<Option<String>> {
        if user.frozen {
            return Ok(Some(format!("User {}account is frozen", tx.user_id)));
        }

        match &tx.method {
            PaymentMethod::Transfer => self.check_transfer(user, tx),
            PaymentMethod::Card => self.check_card(user, tx),
            PaymentMethod::Other(_) => Ok(Some("Invalid payment method".to_string())),
        }
    }

    /// Both checks always run; a country mismatch replaces a checksum failure.
    fn check_transfer(&self, user: &User, tx: &Transaction) -> Result<Option<String>> {
        let mut failure = None;

        if !is_valid_iban(&tx.account) {
            failure = Some(format!("Invalid iban {}", tx.account));
        }

        let account_country = self.routing.bank_country(&tx.account)?;
        if account_country != user.country {
            failure = Some(format!(
                "Invalid account country {}; expected {}",
                account_country, user.country
            ));
        }

        Ok(failure)
    }

    /// Both checks always run; a country mismatch replaces a category failure.
    ///
    /// The country check compares the user's alpha-3 code against the
    /// mapping's country as stored, so a mapping that uses alpha-2 codes
    /// never matches.
    fn check_card(&self, user: &User, tx: &Transaction) -> Result<Option<String>> {
        let route = self.routing.card_lookup(&tx.account)?;
        let mut failure = None;

        if *route.category != CardCategory::Debit {
            failure = Some(format!("Only DC cards allowed; got {}", route.category));
        }

        let user_alpha3 = user_alpha3(user)?;
        if user_alpha3 != route.country {
            failure = Some(format!(
                "Invalid country {}; expected {} ({})",
                route.country, user.country, user_alpha3
            ));
        }

        Ok(failure)
    }

    fn check_amount(&self, user: &User, tx: &Transaction) -> Option<String> {
        let amount = tx.amount;
        let owner = self.ledger.owner_of(&tx.account);

        if amount.is_negative() {
            return Some(format!("Transaction amount negative: {}", amount));
        }

        if owner.is_some_and(|owner| owner != user.id) {
            return Some(format!("Account {} is in use by other user", tx.account));
        }

        match &tx.tx_type {
            TxType::Withdraw => {
                if amount < user.min_withdraw {
                    Some(format!(
                        "Amount {} is under the withdraw limit of {}",
                        amount, user.min_withdraw
                    ))
                } else if amount > user.max_withdraw {
                    Some(format!(
                        "Amount {} is over the withdraw limit of {}",
                        amount, user.max_withdraw
                    ))
                } else if amount > user.balance {
                    Some(format!(
                        "Not enough balance to withdraw {} - balance is too low at {}",
                        amount, user.balance
                    ))
                } else if owner.is_none() && tx.method == PaymentMethod::Transfer {
                    Some(format!("Cannot withdraw with a new account {}", tx.account))
                } else {
                    None
                }
            }
            TxType::Deposit => {
                if amount < user.min_deposit {
                    Some(format!(
                        "Amount {} is under the deposit limit of {}",
                        amount, user.min_deposit
                    ))
                } else if amount > user.max_deposit {
                    Some(format!(
                        "Amount {} is over the deposit limit of {}",
                        amount, user.max_deposit
                    ))
                } else {
                    None
                }
            }
            TxType::Other(kind) => Some(format!("Invalid transaction type {}", kind)),
        }
    }
}

fn user_alpha3(user: &User) -> Result<&'static str> {
    if user.country.is_empty() {
        return Ok("");
    }
    country::alpha3(&user.country).ok_or_else(|| EngineError::UnknownCountry {
        code: user.country.clone(),
    })
}
