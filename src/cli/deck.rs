//! Deck CLI commands

use anyhow::Result;
use clap::Subcommand;

use super::output::Output;
use crate::domain::query;
use crate::storage::{DeckService, Project};

#[derive(Subcommand)]
pub enum DeckCommands {
    /// Create a new deck
    New {
        /// Deck name
        name: String,
    },

    /// List all decks
    List,

    /// Show deck details and its tags
    Show {
        /// Deck ID or name
        deck: String,
    },
}

pub fn run(cmd: DeckCommands, output: &Output) -> Result<()> {
    match cmd {
        DeckCommands::New { name } => new_deck(output, &name),
        DeckCommands::List => list_decks(output),
        DeckCommands::Show { deck } => show_deck(output, &deck),
    }
}

fn new_deck(output: &Output, name: &str) -> Result<()> {
    let project = Project::open_current()?;
    let store = project.library_store();

    let deck = store.create_deck(name)?;
    output.verbose_ctx("deck", &format!("Stored deck in {}", store.path().display()));

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": deck.id.to_string(),
            "name": deck.name,
            "cards": deck.cards.len(),
        }));
    } else {
        output.success(&format!("Created deck: {} - {}", deck.id, deck.name));
    }

    Ok(())
}

fn list_decks(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let decks = project.library_store().list_decks()?;
    output.verbose_ctx("deck", &format!("Found {} decks", decks.len()));

    if output.is_json() {
        let items: Vec<_> = decks
            .iter()
            .map(|d| {
                serde_json::json!({
                    "id": d.id.to_string(),
                    "name": d.name,
                    "cards": d.cards.len(),
                })
            })
            .collect();
        output.data(&items);
    } else if decks.is_empty() {
        println!("No decks yet. Create one with 'flashdeck deck new <name>'.");
    } else {
        println!("{:<16} {:>5}  NAME", "ID", "CARDS");
        println!("{}", "-".repeat(50));
        for deck in &decks {
            println!("{:<16} {:>5}  {}", deck.id, deck.cards.len(), deck.name);
        }
    }

    Ok(())
}

fn show_deck(output: &Output, key: &str) -> Result<()> {
    let project = Project::open_current()?;
    let deck = project.library_store().resolve_deck(key)?;
    let tags = query::available_tags(&deck.cards);

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": deck.id.to_string(),
            "name": deck.name,
            "cards": deck.cards.len(),
            "tags": tags,
            "created_at": deck.created_at,
        }));
    } else {
        println!("{} - {}", deck.id, deck.name);
        println!("Cards: {}", deck.cards.len());
        if tags.is_empty() {
            println!("Tags:  (none)");
        } else {
            println!("Tags:  {}", tags.join(", "));
        }
    }

    Ok(())
}
