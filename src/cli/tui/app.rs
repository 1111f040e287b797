//! Study screen state and key handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::rngs::ThreadRng;
use rand::Rng;

use super::event::{Event, EventHandler};
use super::terminal::Terminal;
use super::view;
use crate::domain::{Deck, FilterExpression, StudyEngine};
use crate::storage::DeckService;

/// Ticks a status message stays on screen
const STATUS_TICKS: u8 = 8;

/// Which part of the screen receives selection keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Tags,
    Connectors,
    Card,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Tags => Focus::Connectors,
            Focus::Connectors => Focus::Card,
            Focus::Card => Focus::Tags,
        }
    }

    fn prev(self) -> Self {
        match self {
            Focus::Tags => Focus::Card,
            Focus::Connectors => Focus::Tags,
            Focus::Card => Focus::Connectors,
        }
    }
}

pub struct App<S: DeckService, R: Rng = ThreadRng> {
    store: S,
    deck: Deck,
    engine: StudyEngine<R>,

    /// Filter the current session was built from
    applied: FilterExpression,

    focus: Focus,
    tag_index: usize,
    connector_index: usize,

    /// Whether the answer of the current card is shown
    flipped: bool,

    status_message: Option<String>,
    status_ticks: u8,

    should_quit: bool,
}

impl<S: DeckService, R: Rng> App<S, R> {
    pub fn new(store: S, deck: Deck, engine: StudyEngine<R>) -> Self {
        let applied = engine.expression().clone();
        Self {
            store,
            deck,
            engine,
            applied,
            focus: Focus::default(),
            tag_index: 0,
            connector_index: 0,
            flipped: false,
            status_message: None,
            status_ticks: 0,
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut Terminal, events: EventHandler) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| view::draw(frame, self))?;

            match events.next()? {
                Event::Key(key) => self.handle_key(key),
                Event::Tick => self.on_tick(),
                Event::Resize => {}
            }
        }
        Ok(())
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn engine(&self) -> &StudyEngine<R> {
        &self.engine
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn tag_index(&self) -> usize {
        self.tag_index
    }

    pub fn connector_index(&self) -> usize {
        self.connector_index
    }

    pub fn flipped(&self) -> bool {
        self.flipped
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Tags offered in the tag bar: the deck's tags in first-seen order,
    /// followed by filter tags that no loaded card carries any more
    pub fn tag_bar(&self) -> Vec<String> {
        let mut tags = self.engine.available_tags();
        for tag in self.engine.expression().tags() {
            if !tags.contains(tag) {
                tags.push(tag.clone());
            }
        }
        tags
    }

    /// True when the filter was edited since the session was last built
    pub fn filter_pending(&self) -> bool {
        *self.engine.expression() != self.applied
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_ticks = STATUS_TICKS;
    }

    fn on_tick(&mut self) {
        if self.status_ticks > 0 {
            self.status_ticks -= 1;
            if self.status_ticks == 0 {
                self.status_message = None;
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,

            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.prev(),

            KeyCode::Char('h') | KeyCode::Left => self.move_selection(-1),
            KeyCode::Char('l') | KeyCode::Right => self.move_selection(1),

            KeyCode::Char(' ') | KeyCode::Enter => self.activate(),

            KeyCode::Char('f') => self.apply_filter(),

            KeyCode::Char('n') | KeyCode::Char('j') | KeyCode::Down => {
                self.engine.next();
                self.flipped = false;
            }
            KeyCode::Char('p') | KeyCode::Char('k') | KeyCode::Up => {
                self.engine.previous();
                self.flipped = false;
            }

            KeyCode::Char('r') => self.reload(),

            KeyCode::Char('?') => self.set_status(concat!(
                "Tab: focus  ←/→: select  Space: toggle/flip  f: apply  ",
                "n/p: next/prev  r: reload  q: quit"
            )),

            _ => {}
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let len = match self.focus {
            Focus::Tags => self.tag_bar().len(),
            Focus::Connectors => self.engine.expression().connectors().len(),
            Focus::Card => return,
        };
        let index = match self.focus {
            Focus::Connectors => &mut self.connector_index,
            _ => &mut self.tag_index,
        };
        if len == 0 {
            *index = 0;
            return;
        }
        *index = index.saturating_add_signed(delta).min(len - 1);
    }

    fn activate(&mut self) {
        match self.focus {
            Focus::Tags => {
                let tags = self.tag_bar();
                if let Some(tag) = tags.get(self.tag_index) {
                    self.engine.toggle_tag(tag.as_str());
                    self.clamp_tag_index();
                    self.clamp_connector_index();
                }
            }
            Focus::Connectors => {
                if let Err(e) = self.engine.toggle_connector(self.connector_index) {
                    self.set_status(e.to_string());
                }
            }
            Focus::Card => {
                if self.engine.current_card().is_some() {
                    self.flipped = !self.flipped;
                }
            }
        }
    }

    fn apply_filter(&mut self) {
        let total = self.engine.apply().len();
        self.applied = self.engine.expression().clone();
        self.flipped = false;
        self.set_status(format!("Session {}: {} cards", self.engine.generation(), total));
    }

    fn reload(&mut self) {
        let loaded = self.store.list_cards(&self.deck.id);
        let failed = loaded.as_ref().err().map(|e| format!("Reload failed: {:#}", e));
        let total = self.engine.replace_cards(loaded).len();

        self.applied = self.engine.expression().clone();
        self.flipped = false;
        self.clamp_tag_index();

        match failed {
            Some(message) => self.set_status(message),
            None => self.set_status(format!("Reloaded: {} cards", total)),
        }
    }

    fn clamp_tag_index(&mut self) {
        let len = self.tag_bar().len();
        self.tag_index = self.tag_index.min(len.saturating_sub(1));
    }

    fn clamp_connector_index(&mut self) {
        let len = self.engine.expression().connectors().len();
        self.connector_index = self.connector_index.min(len.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    use super::*;
    use crate::domain::{Connector, NewCard};
    use crate::storage::LibraryStore;

    fn press(app: &mut App<LibraryStore, StdRng>, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn setup() -> (TempDir, App<LibraryStore, StdRng>) {
        let dir = TempDir::new().unwrap();
        let store = LibraryStore::new(dir.path().join("db.json"));
        let deck = store.create_deck("Spanish").unwrap();
        let cards = [
            ("ser", vec!["verbs"]),
            ("casa", vec!["nouns"]),
            ("ir", vec!["verbs", "irregular"]),
        ];
        for (q, tags) in cards {
            let tags: Vec<String> = tags.into_iter().map(String::from).collect();
            store
                .create_card(&deck.id, NewCard::new(q, "a", &tags).unwrap())
                .unwrap();
        }
        let cards = store.list_cards(&deck.id).unwrap();
        let engine = StudyEngine::with_rng(cards, StdRng::seed_from_u64(1));
        let app = App::new(store, deck, engine);
        (dir, app)
    }

    #[test]
    fn starts_with_all_cards() {
        let (_dir, app) = setup();
        assert_eq!(app.engine().session().len(), 3);
        assert_eq!(app.focus(), Focus::Tags);
        assert!(!app.filter_pending());
    }

    #[test]
    fn toggling_tags_waits_for_apply() {
        let (_dir, mut app) = setup();

        // Available tags in first-seen order: verbs, nouns, irregular
        press(&mut app, KeyCode::Char(' '));
        assert!(app.filter_pending());
        assert_eq!(app.engine().session().len(), 3);

        press(&mut app, KeyCode::Char('f'));
        assert!(!app.filter_pending());
        assert_eq!(app.engine().session().len(), 2);
        assert_eq!(app.status_message(), Some("Session 2: 2 cards"));
    }

    #[test]
    fn connector_flip_changes_session() {
        let (_dir, mut app) = setup();

        press(&mut app, KeyCode::Char(' ')); // verbs
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Char(' ')); // nouns
        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.engine().session().len(), 0);

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus(), Focus::Connectors);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.engine().expression().connectors(), [Connector::Or]);

        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.engine().session().len(), 3);
    }

    #[test]
    fn connector_toggle_on_empty_filter_reports_error() {
        let (_dir, mut app) = setup();

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);

        assert!(app.status_message().unwrap().contains("out of range"));
        assert!(app.engine().expression().is_empty());
    }

    #[test]
    fn removing_tag_clamps_connector_selection() {
        let (_dir, mut app) = setup();

        for _ in 0..3 {
            press(&mut app, KeyCode::Char(' '));
            press(&mut app, KeyCode::Right);
        }
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.connector_index(), 1);

        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::Char(' ')); // removes irregular
        assert_eq!(app.engine().expression().connectors().len(), 1);
        assert_eq!(app.connector_index(), 0);
    }

    #[test]
    fn selection_is_clamped() {
        let (_dir, mut app) = setup();

        press(&mut app, KeyCode::Left);
        assert_eq!(app.tag_index(), 0);
        for _ in 0..10 {
            press(&mut app, KeyCode::Right);
        }
        assert_eq!(app.tag_index(), 2);
    }

    #[test]
    fn card_flip_and_navigation() {
        let (_dir, mut app) = setup();

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus(), Focus::Card);

        press(&mut app, KeyCode::Char(' '));
        assert!(app.flipped());

        press(&mut app, KeyCode::Char('n'));
        assert!(!app.flipped());
        assert_eq!(app.engine().progress().current, 2);

        press(&mut app, KeyCode::Char('p'));
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.engine().progress().current, 1);
    }

    #[test]
    fn reload_picks_up_new_cards() {
        let (_dir, mut app) = setup();
        let deck_id = app.deck().id.clone();
        app.store
            .create_card(&deck_id, NewCard::new("perro", "dog", &["nouns".to_string()]).unwrap())
            .unwrap();

        press(&mut app, KeyCode::Char('r'));

        assert_eq!(app.engine().session().len(), 4);
        assert_eq!(app.status_message(), Some("Reloaded: 4 cards"));
    }

    #[test]
    fn tag_dropped_from_deck_can_still_be_removed() {
        let (_dir, mut app) = setup();

        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Char(' ')); // irregular
        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.engine().session().len(), 1);

        let deck_id = app.deck().id.clone();
        let ir = app
            .engine()
            .cards()
            .iter()
            .find(|c| c.question == "ir")
            .map(|c| c.id.clone())
            .unwrap();
        assert!(app.store.delete_card(&deck_id, &ir).unwrap());
        press(&mut app, KeyCode::Char('r'));

        assert_eq!(app.engine().available_tags(), ["verbs", "nouns"]);
        assert_eq!(app.tag_bar(), ["verbs", "nouns", "irregular"]);
        assert_eq!(app.engine().session().len(), 0);

        assert_eq!(app.tag_index(), 2);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.engine().expression().is_empty());
        assert_eq!(app.tag_bar(), ["verbs", "nouns"]);
        assert_eq!(app.tag_index(), 1);

        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.engine().session().len(), 2);
    }

    #[test]
    fn filter_tag_missing_from_deck_is_offered() {
        let dir = TempDir::new().unwrap();
        let store = LibraryStore::new(dir.path().join("db.json"));
        let deck = store.create_deck("Spanish").unwrap();
        store
            .create_card(&deck.id, NewCard::new("ser", "to be", ["verbs"]).unwrap())
            .unwrap();

        let cards = store.list_cards(&deck.id).unwrap();
        let mut engine = StudyEngine::with_rng(cards, StdRng::seed_from_u64(1));
        engine.toggle_tag("verbs");
        engine.toggle_tag("ghost");
        engine.apply();
        let mut app = App::new(store, deck, engine);
        assert_eq!(app.engine().session().len(), 0);
        assert_eq!(app.tag_bar(), ["verbs", "ghost"]);

        for _ in 0..5 {
            press(&mut app, KeyCode::Right);
        }
        assert_eq!(app.tag_index(), 1);
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char('f'));

        assert_eq!(app.engine().expression().tags(), ["verbs"]);
        assert_eq!(app.engine().session().len(), 1);
    }

    #[test]
    fn apply_reports_session_number() {
        let (_dir, mut app) = setup();
        let before = app.engine().generation();

        press(&mut app, KeyCode::Char('f'));
        press(&mut app, KeyCode::Char('f'));

        assert_eq!(app.engine().generation(), before + 2);
        assert_eq!(
            app.status_message(),
            Some(format!("Session {}: 3 cards", before + 2).as_str())
        );
    }

    #[test]
    fn status_message_expires() {
        let (_dir, mut app) = setup();
        press(&mut app, KeyCode::Char('f'));
        assert!(app.status_message().is_some());

        for _ in 0..STATUS_TICKS {
            app.on_tick();
        }
        assert!(app.status_message().is_none());
    }

    #[test]
    fn quit_keys() {
        let (_dir, mut app) = setup();
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit());

        let (_dir, mut app) = setup();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit());
    }
}
