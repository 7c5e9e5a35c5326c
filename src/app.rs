use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{info, warn};

use crate::config::Config;
use crate::engine::rack::InputValidation;
use crate::session::orchestrator::{SearchDispatcher, SearchOrchestrator, SearchQuery};
use crate::session::worker::SearchWorker;
use crate::store::json_store::JsonStore;
use crate::store::schema::LastQueryData;
use crate::ui::line_input::{InputResult, LineInput};
use crate::ui::theme::Theme;

const PAGE_ROWS: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Rack,
    StartsWith,
    EndsWith,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Rack, Field::StartsWith, Field::EndsWith];

    fn index(self) -> usize {
        match self {
            Field::Rack => 0,
            Field::StartsWith => 1,
            Field::EndsWith => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Rack => "Rack",
            Field::StartsWith => "Starts with",
            Field::EndsWith => "Ends with",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Field::Rack => "letters, ? or _ for blanks",
            Field::StartsWith => "optional prefix",
            Field::EndsWith => "optional suffix",
        }
    }
}

pub struct App<D: SearchDispatcher = SearchWorker> {
    inputs: [LineInput; 3],
    pub focus: Field,
    pub search: SearchOrchestrator<D>,
    pub scroll: usize,
    pub theme: Theme,
    pub config: Config,
    pub should_quit: bool,
    store: Option<JsonStore>,
}

impl<D: SearchDispatcher> App<D> {
    pub fn new(config: Config, theme: Theme, dispatcher: D, store: Option<JsonStore>) -> Self {
        let search = SearchOrchestrator::new(dispatcher, config.debounce());
        let mut app = Self {
            inputs: [LineInput::new(""), LineInput::new(""), LineInput::new("")],
            focus: Field::Rack,
            search,
            scroll: 0,
            theme,
            config,
            should_quit: false,
            store,
        };
        if app.config.remember_last_query {
            app.restore_last_query(Instant::now());
        }
        app
    }

    fn restore_last_query(&mut self, now: Instant) {
        let Some(store) = &self.store else {
            return;
        };
        let data = store.load_last_query();
        if data.pattern.is_empty() && data.starts_with.is_empty() && data.ends_with.is_empty() {
            return;
        }
        info!(pattern = %data.pattern, "restoring last query");
        let query = data.to_query();
        self.inputs = [
            LineInput::new(&query.pattern),
            LineInput::new(&query.starts_with),
            LineInput::new(&query.ends_with),
        ];
        self.on_edit(now);
    }

    /// Persist the current inputs. Failures are logged and otherwise ignored.
    pub fn save_last_query(&self) {
        if !self.config.remember_last_query {
            return;
        }
        let Some(store) = &self.store else {
            return;
        };
        if let Err(err) = store.save_last_query(&LastQueryData::from_query(&self.query())) {
            warn!(%err, "failed to save last query");
        }
    }

    pub fn input(&self, field: Field) -> &LineInput {
        &self.inputs[field.index()]
    }

    pub fn query(&self) -> SearchQuery {
        SearchQuery::new(self.input(Field::Rack).value()).with_filters(
            self.input(Field::StartsWith).value(),
            self.input(Field::EndsWith).value(),
        )
    }

    /// The rack field's validation failure, if the current input is invalid.
    pub fn validation_message(&self) -> Option<&str> {
        self.search.validation().and_then(InputValidation::reason)
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Up => return self.scroll_up(1),
            KeyCode::Down => return self.scroll_down(1),
            KeyCode::PageUp => return self.scroll_up(PAGE_ROWS),
            KeyCode::PageDown => return self.scroll_down(PAGE_ROWS),
            _ => {}
        }

        match self.inputs[self.focus.index()].handle(key) {
            InputResult::Edited => self.on_edit(now),
            InputResult::NextField => self.focus = self.focus.next(),
            InputResult::PrevField => self.focus = self.focus.prev(),
            InputResult::Cancel => self.should_quit = true,
            InputResult::Unchanged => {}
        }
    }

    /// Advance the search lifecycle. Returns true if a redraw is needed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let changed = self.search.poll(now);
        if changed && !self.search.is_searching() {
            self.scroll = 0;
        }
        changed
    }

    fn on_edit(&mut self, now: Instant) {
        self.scroll = 0;
        let query = self.query();
        self.search.input_changed(query, now);
    }

    fn result_count(&self) -> usize {
        self.search.response().map_or(0, |r| r.results.len())
    }

    fn scroll_up(&mut self, rows: usize) {
        self.scroll = self.scroll.saturating_sub(rows);
    }

    fn scroll_down(&mut self, rows: usize) {
        let max = self.result_count().saturating_sub(1);
        self.scroll = (self.scroll + rows).min(max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::engine::dictionary::Dictionary;
    use crate::engine::search::{SearchRequest, SearchResponse, run_search};
    use crate::error::SearchError;
    use crate::session::orchestrator::SearchState;

    /// Runs searches inline so tests don't depend on thread scheduling.
    struct InlineDispatcher {
        dictionary: Dictionary,
        done: Vec<SearchResponse>,
    }

    impl SearchDispatcher for InlineDispatcher {
        fn dispatch(&mut self, request: SearchRequest) -> Result<(), SearchError> {
            self.done.push(run_search(&self.dictionary, &request));
            Ok(())
        }

        fn try_recv(&mut self) -> Option<SearchResponse> {
            self.done.pop()
        }
    }

    fn test_app() -> App<InlineDispatcher> {
        let dispatcher = InlineDispatcher {
            dictionary: Dictionary::build(["CARES", "SCARE", "RACE", "CARE", "ACE", "QUO"]),
            done: Vec::new(),
        };
        let config = Config {
            remember_last_query: false,
            ..Config::default()
        };
        App::new(config, Theme::default(), dispatcher, None)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    fn type_str(app: &mut App<InlineDispatcher>, text: &str, now: Instant) {
        for ch in text.chars() {
            app.handle_key(key(KeyCode::Char(ch)), now);
        }
    }

    #[test]
    fn test_field_cycle() {
        assert_eq!(Field::Rack.next(), Field::StartsWith);
        assert_eq!(Field::EndsWith.next(), Field::Rack);
        assert_eq!(Field::Rack.prev(), Field::EndsWith);
    }

    #[test]
    fn test_typing_debounces_then_publishes() {
        let mut app = test_app();
        let t0 = Instant::now();
        type_str(&mut app, "care", t0);
        assert_eq!(app.input(Field::Rack).value(), "CARE");
        assert_eq!(app.search.state(), SearchState::Debouncing);

        assert!(!app.tick(t0 + Duration::from_millis(100)));
        assert!(app.tick(t0 + Duration::from_millis(150)));

        let response = app.search.response().unwrap();
        let words: Vec<&str> = response.results.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(words, ["RACE", "CARE", "ACE"]);
    }

    #[test]
    fn test_filter_edit_requeries_with_constraint() {
        let mut app = test_app();
        let t0 = Instant::now();
        type_str(&mut app, "care", t0);
        app.handle_key(key(KeyCode::Tab), t0);
        assert_eq!(app.focus, Field::StartsWith);
        type_str(&mut app, "s", t0);
        app.tick(t0 + Duration::from_secs(1));

        let words: Vec<&str> = app
            .search
            .response()
            .unwrap()
            .results
            .iter()
            .map(|w| w.word.as_str())
            .collect();
        assert_eq!(words, ["SCARE"]);
    }

    #[test]
    fn test_invalid_rack_shows_message() {
        let mut app = test_app();
        let t0 = Instant::now();
        type_str(&mut app, "a1", t0);
        assert_eq!(
            app.validation_message(),
            Some(crate::engine::rack::INVALID_CHARS_REASON)
        );
        app.handle_key(ctrl('u'), t0);
        assert_eq!(
            app.validation_message(),
            Some(crate::engine::rack::TOO_SHORT_REASON)
        );
        assert!(app.search.response().is_none());
    }

    #[test]
    fn test_scroll_is_clamped_to_results() {
        let mut app = test_app();
        let t0 = Instant::now();
        type_str(&mut app, "care", t0);
        app.tick(t0 + Duration::from_secs(1));

        app.handle_key(key(KeyCode::PageDown), t0);
        assert_eq!(app.scroll, 2);
        app.handle_key(key(KeyCode::Up), t0);
        assert_eq!(app.scroll, 1);
        app.handle_key(key(KeyCode::PageUp), t0);
        assert_eq!(app.scroll, 0);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = test_app();
        app.handle_key(ctrl('c'), Instant::now());
        assert!(app.should_quit);

        let mut app = test_app();
        app.handle_key(key(KeyCode::Esc), Instant::now());
        assert!(app.should_quit);
    }

    #[test]
    fn test_last_query_restored_from_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        store
            .save_last_query(&LastQueryData::from_query(
                &SearchQuery::new("CARE").with_filters("", "E"),
            ))
            .unwrap();

        let dispatcher = InlineDispatcher {
            dictionary: Dictionary::build(["CARE", "RACE", "ACRE"]),
            done: Vec::new(),
        };
        let mut app = App::new(Config::default(), Theme::default(), dispatcher, Some(store));
        assert_eq!(app.input(Field::Rack).value(), "CARE");
        assert_eq!(app.input(Field::EndsWith).value(), "E");
        assert_eq!(app.search.state(), SearchState::Debouncing);

        app.tick(Instant::now() + Duration::from_secs(1));
        let response = app.search.response().unwrap();
        assert_eq!(response.results.len(), 3);
    }
}
