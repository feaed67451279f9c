//! Card and bank routing metadata.
//!
//! BIN ranges map the first ten digits of a card number to the issuing
//! network's card category and country. Bank accounts carry their country in
//! the IBAN prefix, so no table is needed for them.

use crate::error::{EngineError, Result};
use serde::Deserialize;
use std::fmt;

/// Number of leading card digits the BIN ranges are keyed on.
pub const BIN_PREFIX_LEN: usize = 10;

/// Raw BIN mapping row, read positionally: `name,range_from,range_to,type,country`.
#[derive(Debug, Deserialize)]
pub struct BinMappingRecord {
    pub name: String,
    pub range_from: u64,
    pub range_to: u64,
    pub category: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardCategory {
    /// `DC`
    Debit,
    /// `CC`
    Credit,
    Other(String),
}

impl From<&str> for CardCategory {
    fn from(s: &str) -> Self {
        match s {
            "DC" => CardCategory::Debit,
            "CC" => CardCategory::Credit,
            other => CardCategory::Other(other.to_string()),
        }
    }
}

impl fmt::Display for CardCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardCategory::Debit => f.write_str("DC"),
            CardCategory::Credit => f.write_str("CC"),
            CardCategory::Other(s) => f.write_str(s),
        }
    }
}

/// An inclusive BIN range and the metadata it resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinMapping {
    pub name: String,
    pub range_from: u64,
    pub range_to: u64,
    pub category: CardCategory,
    /// Upper case, as given in the dataset.
    pub country: String,
}

impl BinMapping {
    pub fn contains(&self, bin: u64) -> bool {
        self.range_from <= bin && bin <= self.range_to
    }
}

impl From<BinMappingRecord> for BinMapping {
    fn from(record: BinMappingRecord) -> Self {
        BinMapping {
            category: CardCategory::from(record.category.as_str()),
            country: record.country.to_uppercase(),
            name: record.name,
            range_from: record.range_from,
            range_to: record.range_to,
        }
    }
}

/// Result of a card lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardRoute<'a> {
    pub category: &'a CardCategory,
    pub country: &'a str,
}

/// Ordered BIN table. Ranges are not checked for overlap; the first match
/// in load order wins.
#[derive(Debug, Clone, Default)]
pub struct RoutingDirectory {
    mappings: Vec<BinMapping>,
}

impl RoutingDirectory {
    pub fn new(mappings: Vec<BinMapping>) -> Self {
        RoutingDirectory { mappings }
    }

    /// Resolves a card number to its category and issuing country.
    ///
    /// A card with no covering range, or whose first ten characters are not
    /// digits, is a data error and aborts the batch.
    pub fn card_lookup(&self, card: &str) -> Result<CardRoute<'_>> {
        let bin = bin_prefix(card)?;
        self.mappings
            .iter()
            .find(|m| m.contains(bin))
            .map(|m| CardRoute {
                category: &m.category,
                country: &m.country,
            })
            .ok_or_else(|| EngineError::BinMappingNotFound {
                card: card.to_string(),
            })
    }

    /// Country of a bank account: its first two characters, upper-cased.
    pub fn bank_country(&self, iban: &str) -> Result<String> {
        let prefix: String = iban.chars().take(2).collect();
        if prefix.chars().count() < 2 {
            return Err(EngineError::MalformedAccount {
                account: iban.to_string(),
                reason: "shorter than a country prefix",
            });
        }
        Ok(prefix.to_uppercase())
    }
}

fn bin_prefix(card: &str) -> Result<u64> {
    let malformed = || EngineError::MalformedAccount {
        account: card.to_string(),
        reason: "card number must start with ten digits",
    };

    let prefix = card.get(..BIN_PREFIX_LEN).ok_or_else(malformed)?;
    if !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    prefix.parse().map_err(|_| malformed())
}
