//! flashdeck - A local-first flashcard tool
//!
//! Decks hold question/answer cards labelled with tags. Study sessions pick
//! cards through a tag filter expression (`verbs OR nouns AND past`, folded
//! left to right) and walk through them in shuffled order.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{
    Card, CardId, Connector, Deck, DeckId, FilterExpression, StudyEngine, StudySession,
};
