//! Study command: builds a filtered, shuffled session for a deck

use anyhow::{Context, Result};

use super::output::Output;
use super::tui;
use crate::domain::{Connector, FilterExpression, StudyEngine};
use crate::storage::{DeckService, Project};

pub fn run(output: &Output, deck_key: &str, filter: Option<&str>, list: bool) -> Result<()> {
    let project = Project::open_current()?;
    let store = project.library_store();
    let deck = store.resolve_deck(deck_key)?;

    let expression = match filter {
        Some(input) => FilterExpression::parse(input)
            .with_context(|| format!("Invalid filter: {}", input))?,
        None => FilterExpression::new(),
    };

    let mut engine = StudyEngine::new(Vec::new());
    let loaded = store.list_cards(&deck.id);
    if let Err(e) = &loaded {
        output.verbose_ctx("study", &format!("Failed to load cards: {:#}", e));
    }
    engine.replace_cards(loaded);

    replay(&mut engine, &expression)?;
    engine.apply();
    output.verbose_ctx(
        "study",
        &format!(
            "{} of {} cards match '{}'",
            engine.session().len(),
            engine.cards().len(),
            engine.expression()
        ),
    );

    if list || output.is_json() {
        print_session(output, &deck.name, &engine);
        return Ok(());
    }

    let tick_rate = project.config().project.study.tick_rate_ms;
    tui::run(output, store, deck, engine, tick_rate)
}

/// Rebuilds `expression` inside the engine the way the study screen would:
/// tags toggled on in order, then connectors flipped to OR.
fn replay<R: rand::Rng>(engine: &mut StudyEngine<R>, expression: &FilterExpression) -> Result<()> {
    for tag in expression.tags() {
        engine.toggle_tag(tag.as_str());
    }
    for (index, connector) in expression.connectors().iter().enumerate() {
        if *connector == Connector::Or {
            engine.toggle_connector(index)?;
        }
    }
    Ok(())
}

fn print_session<R: rand::Rng>(output: &Output, deck_name: &str, engine: &StudyEngine<R>) {
    let session = engine.session();
    let expression = engine.expression();

    if output.is_json() {
        let cards: Vec<_> = session
            .candidates()
            .iter()
            .enumerate()
            .map(|(i, card)| {
                serde_json::json!({
                    "position": i + 1,
                    "id": card.id.to_string(),
                    "question": card.question,
                    "answer": card.answer,
                    "tags": card.tags,
                })
            })
            .collect();
        output.data(&serde_json::json!({
            "deck": deck_name,
            "filter": expression.to_string(),
            "expression": expression,
            "total": session.len(),
            "cards": cards,
        }));
        return;
    }

    let filter = if expression.is_empty() {
        "(all cards)".to_string()
    } else {
        expression.to_string()
    };
    println!("Studying '{}' - filter: {}", deck_name, filter);

    if session.is_empty() {
        println!("No cards for selected tags");
        return;
    }

    println!("{}", "-".repeat(60));
    let total = session.len();
    for (i, card) in session.candidates().iter().enumerate() {
        println!(
            "{:>3}/{:<3} {:<16} {}  [{}]",
            i + 1,
            total,
            card.id,
            card.question,
            card.tags.join(", ")
        );
    }
}
