//! Interactive study screen
//!
//! Lets the user build a tag filter from the deck's tags, flip connectors
//! between AND and OR, apply the filter and step through the shuffled
//! session, revealing answers one card at a time.

mod app;
mod event;
mod terminal;
mod view;

use std::panic::{self, AssertUnwindSafe};

use anyhow::{anyhow, Result};

use super::Output;
use crate::domain::{Deck, StudyEngine};
use crate::storage::DeckService;
use app::App;
use event::EventHandler;

/// Launch the study screen for `deck`
pub fn run<S: DeckService>(
    output: &Output,
    store: S,
    deck: Deck,
    engine: StudyEngine,
    tick_rate_ms: u64,
) -> Result<()> {
    output.verbose_ctx("tui", &format!("Opening study screen for {}", deck.id));

    let mut app = App::new(store, deck, engine);
    let mut terminal = terminal::init_terminal()?;
    let events = EventHandler::new(tick_rate_ms);

    // Restore the terminal even if drawing panics
    let result = panic::catch_unwind(AssertUnwindSafe(|| app.run(&mut terminal, events)));
    let restore_result = terminal::restore_terminal();

    match result {
        Ok(inner_result) => {
            restore_result?;
            inner_result
        }
        Err(panic_payload) => {
            if let Some(s) = panic_payload.downcast_ref::<&str>() {
                Err(anyhow!("Study screen panicked: {}", s))
            } else if let Some(s) = panic_payload.downcast_ref::<String>() {
                Err(anyhow!("Study screen panicked: {}", s))
            } else {
                Err(anyhow!("Study screen panicked with unknown error"))
            }
        }
    }
}
