//! Identifiers for decks and cards
//!
//! ID Format:
//! - Deck IDs: `d-{7-char-hash}` (e.g., `d-7f2b4c1`)
//! - Card IDs: `c-{7-char-hash}` (e.g., `c-9d3e5f2`)
//!
//! Hash is derived from the deck name (or card question) + creation timestamp.
//! Parsing accepts any non-empty string so documents written by older tools
//! (which used millisecond timestamps as IDs) keep loading.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Invalid deck ID: expected a non-empty identifier, got '{0}'")]
    InvalidDeckId(String),

    #[error("Invalid card ID: expected a non-empty identifier, got '{0}'")]
    InvalidCardId(String),
}

/// Generates a 7-character hash from a seed string and timestamp
fn generate_hash(seed: &str, timestamp: DateTime<Utc>) -> String {
    let input = format!("{}{}", seed, timestamp.timestamp_nanos_opt().unwrap_or(0));
    let hash = blake3::hash(input.as_bytes());
    let hex = hash.to_hex();
    hex[..7].to_string()
}

/// Returns true if the raw string can be used as an identifier
fn is_valid_raw(s: &str) -> bool {
    !s.is_empty() && !s.chars().any(char::is_whitespace)
}

/// Deck ID, `d-{7-char-hash}` for decks created by this tool
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeckId(String);

impl DeckId {
    /// Creates a new deck ID from the deck name and creation time
    pub fn new(name: &str, timestamp: DateTime<Utc>) -> Self {
        Self(format!("d-{}", generate_hash(name, timestamp)))
    }

    /// Returns the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DeckId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if !is_valid_raw(s) {
            return Err(IdError::InvalidDeckId(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for DeckId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DeckId> for String {
    fn from(id: DeckId) -> Self {
        id.0
    }
}

/// Card ID, `c-{7-char-hash}` for cards created by this tool
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CardId(String);

impl CardId {
    /// Creates a new card ID from the question text and creation time
    pub fn new(question: &str, timestamp: DateTime<Utc>) -> Self {
        Self(format!("c-{}", generate_hash(question, timestamp)))
    }

    /// Returns the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CardId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if !is_valid_raw(s) {
            return Err(IdError::InvalidCardId(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for CardId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CardId> for String {
    fn from(id: CardId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn deck_id_format() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let id = DeckId::new("Spanish", ts);
        let s = id.to_string();

        assert!(s.starts_with("d-"));
        assert_eq!(s.len(), 9);
        assert!(s[2..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn card_id_format() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let id = CardId::new("What is 2 + 2?", ts);

        assert!(id.as_str().starts_with("c-"));
        assert_eq!(id.as_str().len(), 9);
    }

    #[test]
    fn same_seed_different_time_differs() {
        let t1 = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 1).unwrap();

        assert_ne!(DeckId::new("Spanish", t1), DeckId::new("Spanish", t2));
    }

    #[test]
    fn parses_legacy_timestamp_ids() {
        let id: DeckId = "1718031234567".parse().unwrap();
        assert_eq!(id.as_str(), "1718031234567");

        let card: CardId = " 1718031239999 ".parse().unwrap();
        assert_eq!(card.as_str(), "1718031239999");
    }

    #[test]
    fn rejects_empty_and_whitespace() {
        assert_eq!(
            "".parse::<DeckId>(),
            Err(IdError::InvalidDeckId(String::new()))
        );
        assert!("two words".parse::<CardId>().is_err());
    }

    #[test]
    fn serde_as_plain_string() {
        let id: CardId = "c-1234567".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"c-1234567\"");

        let back: CardId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<CardId>("\"\"").is_err());
    }
}
