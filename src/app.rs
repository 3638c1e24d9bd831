//! Application context
//!
//! [`AppContext`] owns every piece of browser state (tab session, settings,
//! bookmarks, history, downloads) together with its collaborators (answer
//! service, sound player, download simulator). Front ends hold one and pass
//! it around explicitly.

use std::sync::Arc;
use std::time::Instant;

use crate::answer::{Answer, AnswerService, GeminiAnswerService, UnavailableAnswerService};
use crate::config::AppConfig;
use crate::omnibox::{OmniboxAction, classify, normalize_url};
use crate::session::{ActiveView, SearchTicket, Session, TabDisplay, TabId, TabUpdate};
use crate::sound::{LogSoundPlayer, SoundCue, SoundPlayer};
use crate::storage::{Bookmarks, Downloads, FileStore, History, KeyValueStore, MemoryStore, Settings};
use crate::ticker::{DownloadTicker, TickReport};
use crate::utils::Result;

/// Outcome of submitting the omnibox
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// The active tab now shows the URL
    Navigated,
    /// The input looked like a URL but did not parse; nothing changed
    Dropped,
    /// A search started; resolve the ticket with [`AppContext::resolve`]
    Search(SearchTicket),
}

/// Browser state plus collaborators
pub struct AppContext {
    session: Session,
    settings: Settings,
    bookmarks: Bookmarks,
    history: History,
    downloads: Downloads,
    answers: Arc<dyn AnswerService>,
    sounds: Box<dyn SoundPlayer>,
    ticker: DownloadTicker,
}

impl AppContext {
    /// Hydrate persisted collections from `store`
    pub fn new(store: Arc<dyn KeyValueStore>, answers: Arc<dyn AnswerService>) -> Self {
        Self {
            session: Session::new(),
            settings: Settings::load(store.clone()),
            bookmarks: Bookmarks::load(store.clone()),
            history: History::load(store.clone()),
            downloads: Downloads::load(store),
            answers,
            sounds: Box::new(LogSoundPlayer),
            ticker: DownloadTicker::new(),
        }
    }

    /// Wire up storage and the answer service from configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let store: Arc<dyn KeyValueStore> = match &config.data_dir {
            Some(dir) => {
                log::info!("Persisting state under {}", dir.display());
                Arc::new(FileStore::open(dir)?)
            }
            None => {
                log::info!("Running with in-memory state");
                Arc::new(MemoryStore::new())
            }
        };

        let answers: Arc<dyn AnswerService> = match &config.api_key {
            Some(key) => Arc::new(
                GeminiAnswerService::new(key.clone())?
                    .with_model(config.model.clone())
                    .with_base_url(config.base_url.clone()),
            ),
            None => {
                log::warn!("No API key configured; searches will fail");
                Arc::new(UnavailableAnswerService::new(
                    "API_KEY environment variable is not set",
                ))
            }
        };

        Ok(Self::new(store, answers))
    }

    pub fn with_sound_player(mut self, sounds: Box<dyn SoundPlayer>) -> Self {
        self.sounds = sounds;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn bookmarks(&self) -> &Bookmarks {
        &self.bookmarks
    }

    pub fn bookmarks_mut(&mut self) -> &mut Bookmarks {
        &mut self.bookmarks
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    pub fn downloads(&self) -> &Downloads {
        &self.downloads
    }

    pub fn downloads_mut(&mut self) -> &mut Downloads {
        &mut self.downloads
    }

    /// Shared handle for issuing requests off the UI thread
    pub fn answer_service(&self) -> Arc<dyn AnswerService> {
        Arc::clone(&self.answers)
    }

    /// Handle a submitted omnibox value
    pub fn submit(&mut self, input: &str) -> Option<Submission> {
        match classify(input)? {
            OmniboxAction::Navigate(target) => Some(if self.navigate(&target) {
                Submission::Navigated
            } else {
                Submission::Dropped
            }),
            OmniboxAction::Search(query) => Some(Submission::Search(self.search(query))),
        }
    }

    /// Point the active tab at a URL and record the visit.
    ///
    /// Input that does not parse is logged and dropped without touching the
    /// tab. Returns whether the tab navigated.
    pub fn navigate(&mut self, input: &str) -> bool {
        let target = match normalize_url(input) {
            Ok(target) => target,
            Err(e) => {
                log::error!("Invalid URL provided for navigation: {}", e);
                return false;
            }
        };

        self.history.add(target.url.clone(), target.hostname.clone());
        self.session.update_active_tab_content(
            TabUpdate::new()
                .title(target.hostname)
                .input_value(input)
                .display(TabDisplay::Navigating { url: target.url }),
        );
        true
    }

    /// Start a search in the active tab
    pub fn search(&mut self, query: impl Into<String>) -> SearchTicket {
        let ticket = self.session.begin_search(query);
        log::info!("Searching {:?} in {}", ticket.query, ticket.tab_id);
        ticket
    }

    /// Deliver a search outcome; stale tickets are ignored
    pub fn resolve(&mut self, ticket: &SearchTicket, result: Result<Answer>) -> bool {
        let outcome = result.map_err(|e| e.to_string());
        self.session.complete_search(ticket, outcome)
    }

    /// Search and wait for the answer in place
    pub async fn run_search(&mut self, query: impl Into<String>) -> bool {
        let ticket = self.search(query);
        let service = self.answer_service();
        let result = service.answer(&ticket.query).await;
        self.resolve(&ticket, result)
    }

    /// Whether the active tab's URL is bookmarked
    pub fn is_current_page_bookmarked(&self) -> bool {
        self.active_navigation_url()
            .is_some_and(|url| self.bookmarks.is_bookmarked(&url))
    }

    /// Star or unstar the active tab's page. Only navigating tabs can be
    /// bookmarked; returns the new bookmarked state.
    pub fn toggle_bookmark(&mut self) -> Option<bool> {
        let url = self.active_navigation_url()?;
        let title = self
            .session
            .active_tab()
            .map(|tab| tab.title().to_string())
            .unwrap_or_default();
        Some(self.bookmarks.toggle(&url, &title))
    }

    fn active_navigation_url(&self) -> Option<String> {
        self.session
            .active_tab()
            .and_then(|tab| tab.navigation_url())
            .filter(|url| !url.trim().is_empty())
            .map(str::to_string)
    }

    pub fn add_tab(&mut self) -> TabId {
        let id = self.session.add_tab();
        self.play(SoundCue::TabOpen);
        id
    }

    pub fn remove_tab(&mut self, id: TabId) {
        if self.session.remove_tab(id) {
            self.play(SoundCue::TabClose);
        }
    }

    pub fn set_active_view(&mut self, view: ActiveView) {
        self.session.set_active_view(view);
        self.play(SoundCue::Click);
    }

    pub fn toggle_sidebar(&mut self) {
        self.session.toggle_sidebar();
        self.play(SoundCue::Click);
    }

    /// Advance the mock download simulation. It only runs while the
    /// downloads panel is shown; elsewhere the timers stay disarmed.
    pub fn tick_downloads(&mut self, now: Instant) -> TickReport {
        if self.session.active_view() != ActiveView::Downloads {
            self.ticker.reset();
            return TickReport::default();
        }
        let report = self.ticker.tick(&mut self.downloads, now);
        if report.completed > 0 {
            self.play(SoundCue::DownloadComplete);
        }
        report
    }

    /// Honour exit-time settings
    pub fn shutdown(&mut self) {
        if self.settings.get().clear_history_on_exit {
            log::info!("Clearing history on exit");
            self.history.clear();
        }
    }

    fn play(&self, cue: SoundCue) {
        if self.settings.get().enable_sound_cues {
            self.sounds.play(cue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::MockAnswerService;
    use crate::sound::MockSoundPlayer;
    use crate::ticker::SPAWN_INTERVAL;
    use crate::utils::{AnswerError, ServiceError};
    use mockall::predicate::eq;
    use std::time::Duration;

    fn context(answers: MockAnswerService) -> AppContext {
        AppContext::new(Arc::new(MemoryStore::new()), Arc::new(answers))
    }

    fn answer() -> Answer {
        Answer {
            text: "Ferris is the Rust mascot.".into(),
            sources: vec![],
            related_searches: vec![],
        }
    }

    #[tokio::test]
    async fn test_run_search_stores_answer() {
        let mut service = MockAnswerService::new();
        service
            .expect_answer()
            .withf(|q: &str| q == "who is ferris")
            .times(1)
            .returning(|_| Ok(answer()));
        let mut app = context(service);

        assert!(app.run_search("who is ferris").await);

        let tab = app.session().active_tab().unwrap();
        assert_eq!(tab.title(), "Answer: who is ferris");
        assert_eq!(tab.answer(), Some(&answer()));
    }

    #[tokio::test]
    async fn test_run_search_failure_is_captured_on_tab() {
        let mut service = MockAnswerService::new();
        service
            .expect_answer()
            .returning(|_| Err(AnswerError::Service(ServiceError::EmptyResponse)));
        let mut app = context(service);

        app.run_search("anything").await;

        let tab = app.session().active_tab().unwrap();
        assert_eq!(tab.title(), "Error: anything");
        assert_eq!(
            tab.search_error(),
            Some("Failed to get answer: Received an empty response from the AI.")
        );
    }

    #[test]
    fn test_submit_routes_urls_and_queries() {
        let mut app = context(MockAnswerService::new());

        assert_eq!(app.submit("   "), None);
        assert_eq!(app.submit("example.com"), Some(Submission::Navigated));

        let tab = app.session().active_tab().unwrap();
        assert_eq!(tab.navigation_url(), Some("https://example.com"));
        assert_eq!(tab.title(), "example.com");
        assert_eq!(tab.input_value(), "example.com");
        assert_eq!(app.history().len(), 1);
        assert_eq!(app.history().all()[0].title, "example.com");

        match app.submit("rust ownership") {
            Some(Submission::Search(ticket)) => assert_eq!(ticket.query, "rust ownership"),
            other => panic!("expected a search, got {other:?}"),
        }
        assert!(app.session().active_tab().unwrap().is_searching());
    }

    #[test]
    fn test_invalid_url_is_dropped() {
        let mut app = context(MockAnswerService::new());
        app.session_mut()
            .update_active_tab_content(TabUpdate::new().title("before"));

        assert_eq!(app.submit("exa[mple.com"), Some(Submission::Dropped));
        assert_eq!(app.session().active_tab().unwrap().title(), "before");
        assert!(app.history().is_empty());
    }

    #[test]
    fn test_toggle_bookmark_requires_navigation() {
        let mut app = context(MockAnswerService::new());
        assert_eq!(app.toggle_bookmark(), None);

        app.navigate("docs.rs");
        assert!(!app.is_current_page_bookmarked());
        assert_eq!(app.toggle_bookmark(), Some(true));
        assert!(app.is_current_page_bookmarked());
        assert_eq!(app.bookmarks().all()[0].title, "docs.rs");
        assert_eq!(app.toggle_bookmark(), Some(false));
        assert!(app.bookmarks().is_empty());
    }

    #[test]
    fn test_sound_cues_follow_setting() {
        let mut sounds = MockSoundPlayer::new();
        sounds
            .expect_play()
            .with(eq(SoundCue::TabOpen))
            .times(1)
            .return_const(());
        let mut app = context(MockAnswerService::new()).with_sound_player(Box::new(sounds));

        app.add_tab();
        app.settings_mut().set_enable_sound_cues(false);
        app.add_tab();
    }

    #[test]
    fn test_closing_unknown_tab_is_silent() {
        let mut sounds = MockSoundPlayer::new();
        sounds.expect_play().times(0);
        let mut app = context(MockAnswerService::new()).with_sound_player(Box::new(sounds));
        app.remove_tab(TabId::new(404));
    }

    #[test]
    fn test_downloads_only_simulated_while_panel_open() {
        let mut app = context(MockAnswerService::new());
        let t0 = Instant::now();
        let step = Duration::from_millis(100);

        // An hour with the tab view up leaves the list untouched.
        let mut now = t0;
        for _ in 0..36_000 {
            assert_eq!(app.tick_downloads(now), TickReport::default());
            now += step;
        }
        assert!(app.downloads().all().is_empty());

        app.set_active_view(ActiveView::Downloads);
        app.tick_downloads(now);
        assert!(app.tick_downloads(now + SPAWN_INTERVAL).spawned.is_some());
        assert_eq!(app.downloads().all().len(), 1);

        app.set_active_view(ActiveView::Downloads);
        assert_eq!(app.session().active_view(), ActiveView::Tabs);
        assert_eq!(
            app.tick_downloads(now + SPAWN_INTERVAL * 3),
            TickReport::default()
        );
        assert_eq!(app.downloads().all().len(), 1);
    }

    #[test]
    fn test_shutdown_clears_history_when_enabled() {
        let mut app = context(MockAnswerService::new());
        app.navigate("example.com");
        app.shutdown();
        assert_eq!(app.history().len(), 1);

        app.settings_mut().set_clear_history_on_exit(true);
        app.shutdown();
        assert!(app.history().is_empty());
    }

    #[test]
    fn test_unconfigured_service_reports_missing_key() {
        let config = AppConfig::default().ephemeral();
        let mut app = AppContext::from_config(&config).unwrap();
        tokio_test::block_on(app.run_search("hello"));
        let error = app
            .session()
            .active_tab()
            .and_then(|t| t.search_error())
            .unwrap()
            .to_string();
        assert!(error.contains("API_KEY"));
    }
}
