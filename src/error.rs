//! Error types for the ledger validator.
//!
//! Only fatal conditions live here. A declined transaction is a normal
//! [`Outcome`](crate::outcome::Outcome), never an error.

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that abort the batch.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to open, read or write a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A row of an input dataset could not be parsed
    #[error("Invalid {dataset} record at row {row}: {message}")]
    InvalidRecord {
        dataset: &'static str,
        row: u64,
        message: String,
    },

    /// No BIN range covers the card
    #[error("No bin mapping found for card {card}")]
    BinMappingNotFound { card: String },

    /// Account string too short or malformed for a routing lookup
    #[error("Malformed account {account}: {reason}")]
    MalformedAccount { account: String, reason: &'static str },

    /// Applying an approved amount would overflow the balance
    #[error("Balance of user {user} overflowed")]
    BalanceOverflow { user: String },

    /// User country has no ISO 3166-1 alpha-3 equivalent
    #[error("Unknown country code {code}")]
    UnknownCountry { code: String },

    /// Missing positional arguments
    #[error(
        "Missing arguments. Usage: ledger-validator <users.csv> <transactions.csv> \
         <bins.csv> <balances.csv> <outcomes.csv>"
    )]
    MissingArgument,
}
