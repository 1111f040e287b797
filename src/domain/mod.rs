//! Domain models for flashdeck
//!
//! Contains the core study logic without any I/O concerns.

mod id;
mod card;
mod filter;
mod session;
pub mod markup;
pub mod query;

pub use id::{CardId, DeckId, IdError};
pub use card::{collect_tags, Card, CardError, Deck, NewCard};
pub use filter::{Connector, FilterError, FilterExpression};
pub use session::{shuffle, Progress, StudyEngine, StudySession};
