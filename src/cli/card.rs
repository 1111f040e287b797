//! Card CLI commands

use anyhow::{Context, Result};
use clap::Subcommand;

use super::output::{cell, Output};
use crate::domain::{markup, query, Card, CardId, Deck, NewCard};
use crate::storage::{DeckService, Project, StoreError};

#[derive(Subcommand)]
pub enum CardCommands {
    /// Add a card to a deck
    ///
    /// Examples:
    ///   flashdeck card add Spanish -q "ser?" -a "to be" -t verbs -t irregular
    Add {
        /// Deck ID or name
        deck: String,

        /// Question text
        #[arg(long, short)]
        question: String,

        /// Answer text (may contain HTML markup)
        #[arg(long, short)]
        answer: String,

        /// Tag (repeat for several, at least one)
        #[arg(long = "tag", short = 't')]
        tags: Vec<String>,
    },

    /// List cards in a deck
    List {
        /// Deck ID or name
        deck: String,

        /// Only cards whose question or tags contain this text
        #[arg(long, short)]
        search: Option<String>,
    },

    /// Show a card in full
    Show {
        /// Deck ID or name
        deck: String,

        /// Card ID
        card: String,
    },

    /// Edit a card (the edited card gets a new ID)
    Edit {
        /// Deck ID or name
        deck: String,

        /// Card ID
        card: String,

        /// New question text
        #[arg(long, short)]
        question: Option<String>,

        /// New answer text
        #[arg(long, short)]
        answer: Option<String>,

        /// Replacement tags (repeat for several)
        #[arg(long = "tag", short = 't')]
        tags: Vec<String>,
    },

    /// Delete a card
    Delete {
        /// Deck ID or name
        deck: String,

        /// Card ID
        card: String,
    },
}

pub fn run(cmd: CardCommands, output: &Output) -> Result<()> {
    match cmd {
        CardCommands::Add {
            deck,
            question,
            answer,
            tags,
        } => add_card(output, &deck, &question, &answer, &tags),
        CardCommands::List { deck, search } => list_cards(output, &deck, search.as_deref()),
        CardCommands::Show { deck, card } => show_card(output, &deck, &card),
        CardCommands::Edit {
            deck,
            card,
            question,
            answer,
            tags,
        } => edit_card(output, &deck, &card, question, answer, tags),
        CardCommands::Delete { deck, card } => delete_card(output, &deck, &card),
    }
}

fn card_json(card: &Card) -> serde_json::Value {
    serde_json::json!({
        "id": card.id.to_string(),
        "question": card.question,
        "answer": card.answer,
        "tags": card.tags,
        "created_at": card.created_at,
    })
}

fn add_card(
    output: &Output,
    deck_key: &str,
    question: &str,
    answer: &str,
    tags: &[String],
) -> Result<()> {
    let project = Project::open_current()?;
    let store = project.library_store();
    let deck = store.resolve_deck(deck_key)?;

    let input = NewCard::new(question, answer, tags)?;
    let card = store.create_card(&deck.id, input)?;
    output.verbose_ctx("card", &format!("Added to deck {} ({})", deck.id, deck.name));

    if output.is_json() {
        output.data(&card_json(&card));
    } else {
        output.success(&format!("Created card: {} - {}", card.id, card.question));
    }

    Ok(())
}

fn list_cards(output: &Output, deck_key: &str, search: Option<&str>) -> Result<()> {
    let project = Project::open_current()?;
    let store = project.library_store();
    let deck = store.resolve_deck(deck_key)?;

    let cards = store.list_cards(&deck.id)?;
    let matches = query::search(&cards, search.unwrap_or(""));
    output.verbose_ctx(
        "card",
        &format!("{} of {} cards match {:?}", matches.len(), cards.len(), search),
    );

    if output.is_json() {
        let items: Vec<_> = matches.iter().map(|c| card_json(c)).collect();
        output.data(&items);
    } else if matches.is_empty() {
        match search {
            Some(term) => println!("No cards in '{}' match '{}'", deck.name, term),
            None => println!("No cards in '{}' yet.", deck.name),
        }
    } else {
        println!("{:<16} {:<30} {:<30} TAGS", "ID", "QUESTION", "ANSWER");
        println!("{}", "-".repeat(96));
        for card in matches {
            let answer = if markup::has_table(&card.answer) {
                "[table]".to_string()
            } else {
                cell(&markup::to_plain(&card.answer), 30)
            };
            println!(
                "{:<16} {:<30} {:<30} {}",
                card.id,
                cell(&card.question, 30),
                answer,
                card.tags.join(", ")
            );
        }
    }

    Ok(())
}

fn find_card(deck: &Deck, card_key: &str) -> Result<Card> {
    let card_id: CardId = card_key.parse()?;
    match deck.card(&card_id) {
        Some(card) => Ok(card.clone()),
        None => Err(StoreError::CardNotFound {
            deck: deck.id.clone(),
            card: card_id,
        }
        .into()),
    }
}

fn show_card(output: &Output, deck_key: &str, card_key: &str) -> Result<()> {
    let project = Project::open_current()?;
    let store = project.library_store();
    let deck = store.resolve_deck(deck_key)?;
    let card = find_card(&deck, card_key)?;

    if output.is_json() {
        output.data(&card_json(&card));
    } else {
        println!("{}  [{}]", card.id, card.tags.join(", "));
        println!();
        println!("Q: {}", card.question);
        println!();
        println!("A:");
        println!("{}", markup::to_plain(&card.answer));
    }

    Ok(())
}

fn edit_card(
    output: &Output,
    deck_key: &str,
    card_key: &str,
    question: Option<String>,
    answer: Option<String>,
    tags: Vec<String>,
) -> Result<()> {
    let project = Project::open_current()?;
    let store = project.library_store();
    let deck = store.resolve_deck(deck_key)?;
    let existing = find_card(&deck, card_key)?;

    let tags = if tags.is_empty() { existing.tags.clone() } else { tags };
    let input = NewCard::new(
        question.as_deref().unwrap_or(&existing.question),
        answer.as_deref().unwrap_or(&existing.answer),
        &tags,
    )?;

    let card = store
        .replace_card(&deck.id, &existing.id, input)
        .with_context(|| format!("Failed to edit card {}", existing.id))?;
    output.verbose_ctx("card", &format!("Replaced {} with {}", existing.id, card.id));

    if output.is_json() {
        let mut value = card_json(&card);
        value["replaces"] = serde_json::json!(existing.id.to_string());
        output.data(&value);
    } else {
        output.success(&format!("Updated card: {} (was {})", card.id, existing.id));
    }

    Ok(())
}

fn delete_card(output: &Output, deck_key: &str, card_key: &str) -> Result<()> {
    let project = Project::open_current()?;
    let store = project.library_store();
    let deck = store.resolve_deck(deck_key)?;
    let card_id: CardId = card_key.parse()?;

    let removed = store.delete_card(&deck.id, &card_id)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "success": true,
            "deleted": removed,
            "id": card_id.to_string(),
        }));
    } else if removed {
        output.success(&format!("Deleted card: {}", card_id));
    } else {
        output.success(&format!("No card {} in '{}'; nothing deleted", card_id, deck.name));
    }

    Ok(())
}
