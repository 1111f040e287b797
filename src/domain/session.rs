//! Study sessions
//!
//! A [`StudySession`] is the filtered, shuffled sequence of cards a user
//! steps through. It is rebuilt from scratch whenever the filter is
//! re-applied or the deck is reloaded; the cursor always restarts at the
//! first card.
//!
//! [`StudyEngine`] ties a session to the [`FilterExpression`] that produced
//! it and is the single state object handed to the study UI.

use rand::rngs::ThreadRng;
use rand::Rng;
use serde::Serialize;

use super::card::{collect_tags, Card};
use super::filter::{FilterError, FilterExpression};

/// Position within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// 1-based position of the current card, 0 when empty
    pub current: usize,
    pub total: usize,
}

impl Progress {
    /// Percentage of the session reached, 0 for an empty session
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            100.0 * self.current as f64 / self.total as f64
        }
    }
}

/// Shuffles in place with Fisher-Yates: walking down from the last index,
/// each slot is swapped with a uniformly chosen index in `[0, i]`.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Filtered, shuffled cards with a cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudySession {
    candidates: Vec<Card>,
    cursor: Option<usize>,
}

impl StudySession {
    /// Filters `cards` through `expression` and shuffles the result
    pub fn build<R: Rng + ?Sized>(
        cards: &[Card],
        expression: &FilterExpression,
        rng: &mut R,
    ) -> Self {
        let mut candidates = expression.evaluate(cards);
        shuffle(&mut candidates, rng);
        let cursor = if candidates.is_empty() { None } else { Some(0) };
        Self { candidates, cursor }
    }

    pub fn candidates(&self) -> &[Card] {
        &self.candidates
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Moves to the next card; no-op on the last card
    pub fn next(&mut self) {
        if let Some(cursor) = self.cursor {
            if cursor + 1 < self.candidates.len() {
                self.cursor = Some(cursor + 1);
            }
        }
    }

    /// Moves to the previous card; no-op on the first card
    pub fn previous(&mut self) {
        if let Some(cursor) = self.cursor {
            if cursor > 0 {
                self.cursor = Some(cursor - 1);
            }
        }
    }

    /// The card under the cursor, or `None` for an empty session
    pub fn current_card(&self) -> Option<&Card> {
        self.cursor.and_then(|i| self.candidates.get(i))
    }

    pub fn progress(&self) -> Progress {
        Progress {
            current: self.cursor.map(|i| i + 1).unwrap_or(0),
            total: self.candidates.len(),
        }
    }
}

/// Filter state plus the session derived from it
pub struct StudyEngine<R: Rng = ThreadRng> {
    expression: FilterExpression,
    cards: Vec<Card>,
    session: StudySession,
    generation: u64,
    rng: R,
}

impl StudyEngine<ThreadRng> {
    /// Creates an engine over `cards` with an empty filter
    pub fn new(cards: Vec<Card>) -> Self {
        Self::with_rng(cards, rand::thread_rng())
    }
}

impl<R: Rng> StudyEngine<R> {
    /// Creates an engine with an explicit random source
    pub fn with_rng(cards: Vec<Card>, rng: R) -> Self {
        let mut engine = Self {
            expression: FilterExpression::new(),
            cards,
            session: StudySession::default(),
            generation: 0,
            rng,
        };
        engine.apply();
        engine
    }

    /// The current filter, for rendering
    pub fn expression(&self) -> &FilterExpression {
        &self.expression
    }

    /// All cards the filter runs over
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn session(&self) -> &StudySession {
        &self.session
    }

    /// Incremented on every rebuild
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Unique tags of all cards, in first-seen order
    pub fn available_tags(&self) -> Vec<String> {
        collect_tags(&self.cards)
    }

    /// Adds or removes a tag; takes effect on the next [`apply`](Self::apply)
    pub fn toggle_tag(&mut self, tag: impl Into<String>) {
        self.expression.toggle_tag(tag);
    }

    /// Flips a connector; takes effect on the next [`apply`](Self::apply)
    pub fn toggle_connector(&mut self, index: usize) -> Result<(), FilterError> {
        self.expression.toggle_connector(index)
    }

    /// Rebuilds the session from the current cards and filter
    pub fn apply(&mut self) -> &StudySession {
        self.session = StudySession::build(&self.cards, &self.expression, &mut self.rng);
        self.generation += 1;
        &self.session
    }

    /// Swaps in a freshly loaded card set and rebuilds.
    ///
    /// A failed load leaves the engine with no cards.
    pub fn replace_cards<E>(&mut self, loaded: Result<Vec<Card>, E>) -> &StudySession {
        self.cards = loaded.unwrap_or_default();
        self.apply()
    }

    pub fn next(&mut self) {
        self.session.next();
    }

    pub fn previous(&mut self) {
        self.session.previous();
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.session.current_card()
    }

    pub fn progress(&self) -> Progress {
        self.session.progress()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

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

    fn deck() -> Vec<Card> {
        vec![
            card("c-1", &["verbs"]),
            card("c-2", &["nouns"]),
            card("c-3", &["verbs", "past"]),
            card("c-4", &["past"]),
        ]
    }

    fn ids(cards: &[Card]) -> Vec<String> {
        let mut ids: Vec<_> = cards.iter().map(|c| c.id.to_string()).collect();
        ids.sort();
        ids
    }

    #[test]
    fn build_keeps_only_matching_cards() {
        let mut expr = FilterExpression::new();
        expr.toggle_tag("verbs");

        let mut rng = StdRng::seed_from_u64(7);
        let session = StudySession::build(&deck(), &expr, &mut rng);

        assert_eq!(ids(session.candidates()), ["c-1", "c-3"]);
        assert_eq!(session.cursor(), Some(0));
    }

    #[test]
    fn build_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(42);
        let session = StudySession::build(&deck(), &FilterExpression::new(), &mut rng);

        assert_eq!(ids(session.candidates()), ["c-1", "c-2", "c-3", "c-4"]);
    }

    #[test]
    fn empty_session() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = StudySession::build(&[], &FilterExpression::new(), &mut rng);

        assert!(session.is_empty());
        assert_eq!(session.cursor(), None);
        assert!(session.current_card().is_none());
        assert_eq!(session.progress(), Progress { current: 0, total: 0 });
        assert_eq!(session.progress().percentage(), 0.0);

        session.next();
        session.previous();
        assert_eq!(session.cursor(), None);
    }

    #[test]
    fn navigation_is_clamped() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut session = StudySession::build(&deck()[..3], &FilterExpression::new(), &mut rng);

        session.previous();
        assert_eq!(session.cursor(), Some(0));

        session.next();
        session.next();
        assert_eq!(session.progress(), Progress { current: 3, total: 3 });

        session.next();
        assert_eq!(session.cursor(), Some(2));
        assert_eq!(session.progress().percentage(), 100.0);

        session.previous();
        assert_eq!(session.progress().current, 2);
        assert_eq!(
            session.current_card().map(|c| c.id.clone()),
            Some(session.candidates()[1].id.clone())
        );
    }

    #[test]
    fn shuffle_is_roughly_uniform() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut counts: HashMap<Vec<u8>, usize> = HashMap::new();
        let trials = 60_000;

        for _ in 0..trials {
            let mut items = vec![0u8, 1, 2];
            shuffle(&mut items, &mut rng);
            *counts.entry(items).or_default() += 1;
        }

        assert_eq!(counts.len(), 6);
        let expected = trials as f64 / 6.0;
        for (perm, count) in &counts {
            let deviation = (*count as f64 - expected).abs() / expected;
            assert!(
                deviation < 0.05,
                "permutation {:?} seen {} times, expected about {}",
                perm,
                count,
                expected
            );
        }
    }

    #[test]
    fn shuffle_handles_tiny_inputs() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut empty: Vec<u8> = vec![];
        shuffle(&mut empty, &mut rng);
        assert!(empty.is_empty());

        let mut one = vec![1];
        shuffle(&mut one, &mut rng);
        assert_eq!(one, [1]);
    }

    #[test]
    fn engine_starts_unfiltered() {
        let engine = StudyEngine::with_rng(deck(), StdRng::seed_from_u64(11));

        assert!(engine.expression().is_empty());
        assert_eq!(engine.progress(), Progress { current: 1, total: 4 });
        assert_eq!(engine.generation(), 1);
        assert_eq!(engine.available_tags(), ["verbs", "nouns", "past"]);
    }

    #[test]
    fn engine_edits_take_effect_on_apply() {
        let mut engine = StudyEngine::with_rng(deck(), StdRng::seed_from_u64(11));

        engine.toggle_tag("verbs");
        engine.toggle_tag("past");
        assert_eq!(engine.progress().total, 4);

        engine.apply();
        assert_eq!(ids(engine.session().candidates()), ["c-3"]);

        engine.toggle_connector(0).unwrap();
        engine.apply();
        assert_eq!(ids(engine.session().candidates()), ["c-1", "c-3", "c-4"]);
        assert_eq!(engine.progress().current, 1);

        assert_eq!(
            engine.toggle_connector(1),
            Err(FilterError::OutOfRange { index: 1, len: 1 })
        );
    }

    #[test]
    fn engine_navigation_resets_on_apply() {
        let mut engine = StudyEngine::with_rng(deck(), StdRng::seed_from_u64(5));
        engine.next();
        engine.next();
        assert_eq!(engine.progress().current, 3);

        engine.apply();
        assert_eq!(engine.progress().current, 1);
    }

    #[test]
    fn failed_load_means_no_cards() {
        let mut engine = StudyEngine::with_rng(deck(), StdRng::seed_from_u64(5));
        let before = engine.generation();

        engine.replace_cards(Err::<Vec<Card>, _>("deck not found"));

        assert!(engine.cards().is_empty());
        assert!(engine.current_card().is_none());
        assert_eq!(engine.progress(), Progress { current: 0, total: 0 });
        assert_eq!(engine.generation(), before + 1);
    }

    #[test]
    fn reload_keeps_filter() {
        let mut engine = StudyEngine::with_rng(deck(), StdRng::seed_from_u64(5));
        engine.toggle_tag("nouns");
        engine.apply();

        let mut more = deck();
        more.push(card("c-5", &["nouns"]));
        engine.replace_cards(Ok::<_, ()>(more));

        assert_eq!(engine.expression().tags(), ["nouns"]);
        assert_eq!(ids(engine.session().candidates()), ["c-2", "c-5"]);
    }
}
