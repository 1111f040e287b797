//! Card and deck domain model
//!
//! A deck owns an ordered list of cards. Each card carries a question, a
//! (possibly rich-markup) answer and the tags used to filter study sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::{CardId, DeckId};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CardError {
    #[error("Deck name required")]
    MissingDeckName,

    #[error("Question, answer, and at least 1 tag required")]
    Incomplete,
}

/// A question/answer flashcard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Card {
    /// Creates a card from validated input
    pub fn create(input: NewCard, now: DateTime<Utc>) -> Self {
        Self {
            id: CardId::new(&input.question, now),
            question: input.question,
            answer: input.answer,
            tags: input.tags,
            created_at: Some(now),
        }
    }

    /// Returns true if the card carries exactly this tag (case-sensitive)
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Validated input for a new card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCard {
    question: String,
    answer: String,
    tags: Vec<String>,
}

impl NewCard {
    /// Validates raw card input.
    ///
    /// Question and answer are trimmed and must be non-empty. Tags are
    /// trimmed, blank tags are dropped and duplicates are dropped keeping
    /// the first occurrence; at least one tag must remain.
    pub fn new(
        question: impl AsRef<str>,
        answer: impl AsRef<str>,
        tags: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Result<Self, CardError> {
        let question = question.as_ref().trim().to_string();
        let answer = answer.as_ref().trim().to_string();

        let mut clean: Vec<String> = Vec::new();
        for tag in tags {
            let tag = tag.as_ref().trim();
            if !tag.is_empty() && !clean.iter().any(|t| t == tag) {
                clean.push(tag.to_string());
            }
        }

        if question.is_empty() || answer.is_empty() || clean.is_empty() {
            return Err(CardError::Incomplete);
        }

        Ok(Self {
            question,
            answer,
            tags: clean,
        })
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

/// A named collection of cards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub id: DeckId,
    pub name: String,
    #[serde(default)]
    pub cards: Vec<Card>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Deck {
    /// Creates an empty deck. The name is trimmed and must be non-empty.
    pub fn create(name: &str, now: DateTime<Utc>) -> Result<Self, CardError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CardError::MissingDeckName);
        }

        Ok(Self {
            id: DeckId::new(name, now),
            name: name.to_string(),
            cards: Vec::new(),
            created_at: Some(now),
        })
    }

    /// Finds a card by ID
    pub fn card(&self, id: &CardId) -> Option<&Card> {
        self.cards.iter().find(|c| &c.id == id)
    }

    /// Unique tags across this deck's cards, in first-seen order
    pub fn tags(&self) -> Vec<String> {
        collect_tags(&self.cards)
    }
}

/// Collects the unique tags of `cards` in first-seen order
pub fn collect_tags(cards: &[Card]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in cards.iter().flat_map(|c| c.tags.iter()) {
        if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: &str, tags: &[&str]) -> Card {
        Card {
            id: id.parse().unwrap(),
            question: format!("Q {}", id),
            answer: format!("A {}", id),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            created_at: None,
        }
    }

    #[test]
    fn new_card_trims_and_dedups_tags() {
        let input = NewCard::new("  What? ", " This. ", [" verbs", "", "verbs", "nouns "]).unwrap();

        assert_eq!(input.question(), "What?");
        assert_eq!(input.answer(), "This.");
        assert_eq!(input.tags(), ["verbs", "nouns"]);
    }

    #[test]
    fn new_card_requires_all_fields() {
        assert_eq!(NewCard::new("", "a", ["t"]), Err(CardError::Incomplete));
        assert_eq!(NewCard::new("q", "   ", ["t"]), Err(CardError::Incomplete));
        assert_eq!(
            NewCard::new("q", "a", Vec::<String>::new()),
            Err(CardError::Incomplete)
        );
        assert_eq!(NewCard::new("q", "a", [" "]), Err(CardError::Incomplete));
    }

    #[test]
    fn deck_requires_name() {
        assert_eq!(
            Deck::create("   ", Utc::now()),
            Err(CardError::MissingDeckName)
        );

        let deck = Deck::create(" Spanish ", Utc::now()).unwrap();
        assert_eq!(deck.name, "Spanish");
        assert!(deck.cards.is_empty());
    }

    #[test]
    fn has_tag_is_case_sensitive() {
        let c = card("c-1", &["Verbs"]);
        assert!(c.has_tag("Verbs"));
        assert!(!c.has_tag("verbs"));
    }

    #[test]
    fn collect_tags_first_seen_order() {
        let cards = vec![
            card("c-1", &["b", "a"]),
            card("c-2", &["c", "a"]),
            card("c-3", &[]),
        ];
        assert_eq!(collect_tags(&cards), ["b", "a", "c"]);
    }

    #[test]
    fn parses_original_document_card() {
        let json = r#"{"id":"1718031239999","question":"Hola?","answer":"<p>Hello</p>","tags":["greetings"]}"#;
        let card: Card = serde_json::from_str(json).unwrap();

        assert_eq!(card.id.as_str(), "1718031239999");
        assert_eq!(card.tags, ["greetings"]);
        assert!(card.created_at.is_none());

        // Absent timestamps stay absent on write
        let back = serde_json::to_string(&card).unwrap();
        assert!(!back.contains("created_at"));
    }
}
