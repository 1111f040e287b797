//! Deck and card operations over the library document

use anyhow::Result;
use chrono::Utc;
use thiserror::Error;

use super::document::LibraryStore;
use crate::domain::{Card, CardId, Deck, DeckId, NewCard};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Deck not found: {0}")]
    DeckNotFound(String),

    #[error("Card not found: {card} (deck {deck})")]
    CardNotFound { deck: DeckId, card: CardId },
}

/// CRUD operations on decks, cards and tags
pub trait DeckService {
    /// All decks, in creation order
    fn list_decks(&self) -> Result<Vec<Deck>>;

    /// Creates an empty deck (name required)
    fn create_deck(&self, name: &str) -> Result<Deck>;

    /// Cards of a deck, in creation order
    fn list_cards(&self, deck_id: &DeckId) -> Result<Vec<Card>>;

    /// Adds a card to a deck and registers its tags
    fn create_card(&self, deck_id: &DeckId, card: NewCard) -> Result<Card>;

    /// Removes a card; returns false if the deck had no such card
    fn delete_card(&self, deck_id: &DeckId, card_id: &CardId) -> Result<bool>;

    /// Replaces a card with a newly created one (new ID, appended last)
    fn replace_card(&self, deck_id: &DeckId, card_id: &CardId, card: NewCard) -> Result<Card>;

    /// The global tag registry
    fn list_tags(&self) -> Result<Vec<String>>;

    /// Finds a deck by ID or exact name
    fn resolve_deck(&self, key: &str) -> Result<Deck> {
        let key = key.trim();
        let decks = self.list_decks()?;
        decks
            .iter()
            .position(|d| d.id.as_str() == key)
            .or_else(|| decks.iter().position(|d| d.name == key))
            .map(|i| decks[i].clone())
            .ok_or_else(|| StoreError::DeckNotFound(key.to_string()).into())
    }
}

fn deck_not_found(id: &DeckId) -> anyhow::Error {
    StoreError::DeckNotFound(id.to_string()).into()
}

impl DeckService for LibraryStore {
    fn list_decks(&self) -> Result<Vec<Deck>> {
        Ok(self.read()?.decks)
    }

    fn create_deck(&self, name: &str) -> Result<Deck> {
        let deck = Deck::create(name, Utc::now())?;
        self.update(|lib| {
            lib.decks.push(deck.clone());
            Ok(deck)
        })
    }

    fn list_cards(&self, deck_id: &DeckId) -> Result<Vec<Card>> {
        let library = self.read()?;
        library
            .deck(deck_id)
            .map(|d| d.cards.clone())
            .ok_or_else(|| deck_not_found(deck_id))
    }

    fn create_card(&self, deck_id: &DeckId, card: NewCard) -> Result<Card> {
        self.update(|lib| {
            let card = Card::create(card, Utc::now());
            let deck = lib.deck_mut(deck_id).ok_or_else(|| deck_not_found(deck_id))?;
            deck.cards.push(card.clone());
            lib.register_tags(&card.tags);
            Ok(card)
        })
    }

    fn delete_card(&self, deck_id: &DeckId, card_id: &CardId) -> Result<bool> {
        self.update(|lib| {
            let deck = lib.deck_mut(deck_id).ok_or_else(|| deck_not_found(deck_id))?;
            let before = deck.cards.len();
            deck.cards.retain(|c| &c.id != card_id);
            Ok(deck.cards.len() != before)
        })
    }

    fn replace_card(&self, deck_id: &DeckId, card_id: &CardId, card: NewCard) -> Result<Card> {
        self.update(|lib| {
            let deck = lib.deck_mut(deck_id).ok_or_else(|| deck_not_found(deck_id))?;
            let index = deck
                .cards
                .iter()
                .position(|c| &c.id == card_id)
                .ok_or_else(|| StoreError::CardNotFound {
                    deck: deck_id.clone(),
                    card: card_id.clone(),
                })?;

            deck.cards.remove(index);
            let replacement = Card::create(card, Utc::now());
            deck.cards.push(replacement.clone());
            lib.register_tags(&replacement.tags);
            Ok(replacement)
        })
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        Ok(self.read()?.tags)
    }
}
