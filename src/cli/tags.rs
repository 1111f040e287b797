//! Tag listing and suggestions

use anyhow::Result;

use super::output::Output;
use crate::domain::query;
use crate::storage::{DeckService, Project};

/// Lists the tag registry, or a deck's tags, optionally narrowed to suggestions
pub fn run(
    output: &Output,
    deck: Option<&str>,
    suggest: Option<&str>,
    exclude: &[String],
) -> Result<()> {
    let project = Project::open_current()?;
    let store = project.library_store();

    let available = match deck {
        Some(key) => query::available_tags(&store.resolve_deck(key)?.cards),
        None => store.list_tags()?,
    };

    let tags = match suggest {
        Some(input) => {
            let limit = project.config().project.study.suggestion_limit;
            output.verbose_ctx("tags", &format!("Suggesting up to {} for '{}'", limit, input));
            query::suggest_tags(&available, input, exclude, limit)
        }
        None => available,
    };

    if output.is_json() {
        output.data(&tags);
    } else if tags.is_empty() {
        match suggest {
            Some(input) => println!("No tags match '{}'", input),
            None => println!("No tags yet."),
        }
    } else {
        for tag in &tags {
            println!("{}", tag);
        }
    }

    Ok(())
}
