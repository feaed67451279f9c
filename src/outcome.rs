//! Per-transaction audit outcome.

use std::fmt;

/// Message carried by every approved outcome.
pub const OK: &str = "OK";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Approved,
    Declined,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Approved => f.write_str("APPROVED"),
            Status::Declined => f.write_str("DECLINED"),
        }
    }
}

/// One row of the outcomes log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub transaction_id: String,
    pub status: Status,
    pub message: String,
}

impl Outcome {
    pub fn approved(transaction_id: impl Into<String>) -> Self {
        Outcome {
            transaction_id: transaction_id.into(),
            status: Status::Approved,
            message: OK.to_string(),
        }
    }

    pub fn declined(transaction_id: impl Into<String>, message: impl Into<String>) -> Self {
        Outcome {
            transaction_id: transaction_id.into(),
            status: Status::Declined,
            message: message.into(),
        }
    }

    pub fn is_approved(&self) -> bool {
        self.status == Status::Approved
    }
}
