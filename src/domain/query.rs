//! Card search and tag suggestions

use super::card::{collect_tags, Card};

/// Default number of tag suggestions offered while typing
pub const DEFAULT_SUGGESTION_LIMIT: usize = 4;

/// Returns the cards whose question or any tag contains `term`
/// (case-insensitive). An empty term matches everything.
pub fn search<'a>(cards: &'a [Card], term: &str) -> Vec<&'a Card> {
    let term = term.to_lowercase();
    if term.is_empty() {
        return cards.iter().collect();
    }

    cards
        .iter()
        .filter(|card| {
            card.question.to_lowercase().contains(&term)
                || card.tags.iter().any(|t| t.to_lowercase().contains(&term))
        })
        .collect()
}

/// Unique tags of `cards`, sorted
pub fn available_tags(cards: &[Card]) -> Vec<String> {
    let mut tags = collect_tags(cards);
    tags.sort();
    tags
}

/// Suggests tags containing `input` (case-insensitive) that are not already
/// chosen, at most `limit` of them, in the order of `available`
pub fn suggest_tags(
    available: &[String],
    input: &str,
    chosen: &[String],
    limit: usize,
) -> Vec<String> {
    let needle = input.to_lowercase();
    available
        .iter()
        .filter(|t| t.to_lowercase().contains(&needle) && !chosen.contains(t))
        .take(limit)
        .cloned()
        .collect()
}
