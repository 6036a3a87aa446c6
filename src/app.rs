use std::path::PathBuf;

use anyhow::Result;

use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::client::GeneratorClient;
use crate::config::Config;
use crate::content::{ContentView, FormInput, GeneratedContent};
use crate::state::{RequestStatus, SubmissionController, Ticket};
use crate::tui::{AppEvent, EventSender};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Which widget receives keys in normal mode, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusField {
    Prompt,
    Tone,
    Platform,
    Submit,
    Results,
    Sources,
}

pub struct App {
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub focus: FocusField,

    // Form
    pub form: FormInput,
    pub prompt_cursor: usize, // char index into form.prompt
    pub notice: Option<String>,

    // Results
    pub view: ContentView,
    pub result_scroll: u16,
    pub result_lines: u16,  // wrapped line count of the active tab, set during render
    pub result_height: u16, // inner height of the result pane
    pub sources_state: ListState,

    // Submission
    pub controller: SubmissionController,
    pub submit_task: Option<JoinHandle<()>>,
    pub client: GeneratorClient,

    pub config: Config,
    /// Where tone/platform preferences get saved; `None` disables saving.
    pub config_path: Option<PathBuf>,

    pub animation_frame: usize,

    // Areas for mouse hit-testing, set during render
    pub prompt_area: Option<Rect>,
    pub tabs_area: Option<Rect>,
    pub result_area: Option<Rect>,
    pub sources_area: Option<Rect>,
}

impl App {
    pub fn new(config: Config, endpoint: &str) -> Self {
        let form = FormInput::new(String::new(), config.tone(), config.platform());

        Self {
            should_quit: false,
            input_mode: InputMode::Editing,
            focus: FocusField::Prompt,

            form,
            prompt_cursor: 0,
            notice: None,

            view: ContentView::default(),
            result_scroll: 0,
            result_lines: 0,
            result_height: 0,
            sources_state: ListState::default(),

            controller: SubmissionController::new(),
            submit_task: None,
            client: GeneratorClient::new(endpoint),

            config,
            config_path: None,

            animation_frame: 0,

            prompt_area: None,
            tabs_area: None,
            result_area: None,
            sources_area: None,
        }
    }

    /// Build the app from the config file at `config_path`.
    ///
    /// A file that exists but can't be read or parsed is an error, so
    /// preferences are never saved over it.
    pub fn load(config_path: PathBuf, endpoint_flag: Option<&str>) -> Result<Self> {
        let config = Config::load_from(&config_path)?;
        let endpoint = config.resolve_endpoint(endpoint_flag);
        let mut app = Self::new(config, &endpoint);
        app.config_path = Some(config_path);
        Ok(app)
    }

    pub fn content(&self) -> Option<&GeneratedContent> {
        self.controller.content()
    }

    pub fn is_pending(&self) -> bool {
        self.controller.is_pending()
    }

    /// Start a generation request in the background.
    ///
    /// Does nothing when the prompt is blank or a request is already in
    /// flight. The result comes back through `events` as
    /// `AppEvent::Generated`.
    pub fn submit(&mut self, events: &EventSender) -> bool {
        if !self.form.is_submittable() {
            self.notice = Some("Please fill out the prompt.".to_string());
            self.focus = FocusField::Prompt;
            return false;
        }

        let Some(ticket) = self.controller.begin() else {
            return false;
        };

        self.notice = None;
        self.animation_frame = 0;
        info!(
            ticket = ticket.id(),
            tone = %self.form.tone,
            platform = %self.form.platform,
            "submitting generation request"
        );

        let client = self.client.clone();
        let input = self.form.clone();
        let events = events.clone();
        self.submit_task = Some(tokio::spawn(async move {
            let result = client.generate(&input).await;
            // Receiver is gone once the app has quit; nothing left to update
            let _ = events.send(AppEvent::Generated(ticket, result));
        }));
        true
    }

    pub fn finish_submission(&mut self, ticket: Ticket, result: anyhow::Result<GeneratedContent>) {
        if !self.controller.complete(ticket, result) {
            return;
        }
        self.submit_task = None;

        if let RequestStatus::Succeeded(content) = self.controller.status() {
            let has_sources = content.has_sources();
            self.result_scroll = 0;
            self.sources_state.select(if has_sources { Some(0) } else { None });
            if self.focus == FocusField::Sources && !has_sources {
                self.focus = FocusField::Results;
            }
            self.remember_preferences();
        }
    }

    /// Cancel any in-flight request before quitting.
    pub fn shutdown(&mut self) {
        self.controller.cancel();
        if let Some(task) = self.submit_task.take() {
            task.abort();
        }
    }

    fn remember_preferences(&mut self) {
        let Some(path) = self.config_path.as_ref() else {
            return;
        };
        if self.config.default_tone == Some(self.form.tone)
            && self.config.default_platform == Some(self.form.platform)
        {
            return;
        }

        self.config.default_tone = Some(self.form.tone);
        self.config.default_platform = Some(self.form.platform);
        if let Err(err) = self.config.save_to(path) {
            warn!("Failed to save preferences: {:#}", err);
        }
    }

    // Focus

    fn focus_order(&self) -> Vec<FocusField> {
        let mut order = vec![
            FocusField::Prompt,
            FocusField::Tone,
            FocusField::Platform,
            FocusField::Submit,
        ];
        if let Some(content) = self.content() {
            order.push(FocusField::Results);
            if content.has_sources() {
                order.push(FocusField::Sources);
            }
        }
        order
    }

    pub fn focus_next(&mut self) {
        let order = self.focus_order();
        let i = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = order[(i + 1) % order.len()];
    }

    pub fn focus_prev(&mut self) {
        let order = self.focus_order();
        let i = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = order[(i + order.len() - 1) % order.len()];
    }

    // Prompt editing

    pub fn insert_char(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.form.prompt, self.prompt_cursor);
        self.form.prompt.insert(byte_pos, c);
        self.prompt_cursor += 1;
        self.notice = None;
    }

    pub fn delete_char_before_cursor(&mut self) {
        if self.prompt_cursor > 0 {
            self.prompt_cursor -= 1;
            let byte_pos = char_to_byte_index(&self.form.prompt, self.prompt_cursor);
            self.form.prompt.remove(byte_pos);
        }
    }

    pub fn delete_char_at_cursor(&mut self) {
        if self.prompt_cursor < self.form.prompt.chars().count() {
            let byte_pos = char_to_byte_index(&self.form.prompt, self.prompt_cursor);
            self.form.prompt.remove(byte_pos);
        }
    }

    pub fn cursor_left(&mut self) {
        self.prompt_cursor = self.prompt_cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let char_count = self.form.prompt.chars().count();
        self.prompt_cursor = (self.prompt_cursor + 1).min(char_count);
    }

    pub fn cursor_home(&mut self) {
        self.prompt_cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.prompt_cursor = self.form.prompt.chars().count();
    }

    // Results

    /// Switch result tab. Never touches the network.
    pub fn select_view(&mut self, view: ContentView) {
        if self.view != view {
            self.view = view;
            self.result_scroll = 0;
        }
    }

    pub fn max_result_scroll(&self) -> u16 {
        self.result_lines.saturating_sub(self.result_height)
    }

    pub fn scroll_down(&mut self) {
        if self.result_scroll < self.max_result_scroll() {
            self.result_scroll += 1;
        }
    }

    pub fn scroll_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }

    pub fn sources_nav_down(&mut self) {
        let len = self.content().map(|c| c.sources.len()).unwrap_or(0);
        if len > 0 {
            let i = self.sources_state.selected().map_or(0, |i| (i + 1).min(len - 1));
            self.sources_state.select(Some(i));
        }
    }

    pub fn sources_nav_up(&mut self) {
        if let Some(i) = self.sources_state.selected() {
            self.sources_state.select(Some(i.saturating_sub(1)));
        }
    }

    pub fn selected_source(&self) -> Option<&str> {
        let content = self.content()?;
        let i = self.sources_state.selected()?;
        content.sources.get(i).map(String::as_str)
    }

    /// The non-empty field behind the active tab.
    pub fn current_field(&self) -> Option<&str> {
        self.content().and_then(|c| c.field(self.view))
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.is_pending() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use tokio::sync::mpsc;

    fn app() -> App {
        App::new(Config::new(), "http://127.0.0.1:9")
    }

    #[test]
    fn seeds_form_from_config() {
        let config = Config {
            default_tone: Some(crate::content::Tone::Casual),
            ..Config::new()
        };
        let app = App::new(config, "http://x");
        assert_eq!(app.form.tone, crate::content::Tone::Casual);
        assert_eq!(app.form.platform, crate::content::Platform::Twitter);
        assert_eq!(app.focus, FocusField::Prompt);
    }

    #[test]
    fn editing_is_utf8_safe() {
        let mut app = app();
        for c in "héllo".chars() {
            app.insert_char(c);
        }
        app.cursor_left();
        app.cursor_left();
        app.delete_char_before_cursor();
        assert_eq!(app.form.prompt, "héllo".replacen('l', "", 1));
        app.cursor_home();
        app.delete_char_at_cursor();
        assert_eq!(app.form.prompt, "élo");
        app.cursor_end();
        app.insert_char('!');
        assert_eq!(app.form.prompt, "élo!");
    }

    #[tokio::test]
    async fn blank_prompt_is_not_submitted() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app = app();
        app.form.prompt = "   ".to_string();

        assert!(!app.submit(&tx));
        assert!(!app.is_pending());
        assert!(app.submit_task.is_none());
        assert!(app.notice.is_some());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn second_submit_while_pending_is_refused() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = app();
        app.form.prompt = "AI trends".to_string();

        assert!(app.submit(&tx));
        assert!(app.is_pending());
        assert!(!app.submit(&tx));
        app.shutdown();
        assert!(!app.is_pending());
    }

    #[test]
    fn tab_switch_keeps_content() {
        let mut app = app();
        let ticket = app.controller.begin().unwrap();
        app.finish_submission(
            ticket,
            Ok(GeneratedContent {
                text: "hi".to_string(),
                sources: vec!["http://a".to_string()],
                ..Default::default()
            }),
        );

        app.select_view(ContentView::Image);
        assert_eq!(app.current_field(), None);
        app.select_view(ContentView::Text);
        assert_eq!(app.current_field(), Some("hi"));
        assert_eq!(app.selected_source(), Some("http://a"));
        assert!(!app.is_pending());
    }

    #[test]
    fn focus_order_includes_results_only_with_content() {
        let mut app = app();
        app.focus = FocusField::Submit;
        app.focus_next();
        assert_eq!(app.focus, FocusField::Prompt);

        let ticket = app.controller.begin().unwrap();
        app.finish_submission(
            ticket,
            Ok(GeneratedContent {
                text: "x".to_string(),
                ..Default::default()
            }),
        );
        app.focus = FocusField::Submit;
        app.focus_next();
        assert_eq!(app.focus, FocusField::Results);
        // No sources, so results wraps back to the prompt
        app.focus_next();
        assert_eq!(app.focus, FocusField::Prompt);
        app.focus_prev();
        assert_eq!(app.focus, FocusField::Results);
    }

    #[test]
    fn failure_keeps_previous_sources_selection() {
        let mut app = app();
        let first = app.controller.begin().unwrap();
        app.finish_submission(
            first,
            Ok(GeneratedContent {
                sources: vec!["http://a".to_string(), "http://b".to_string()],
                ..Default::default()
            }),
        );
        app.sources_nav_down();
        app.sources_nav_down();
        assert_eq!(app.selected_source(), Some("http://b"));

        let second = app.controller.begin().unwrap();
        app.finish_submission(second, Err(anyhow!("boom")));
        assert_eq!(app.selected_source(), Some("http://b"));
        assert!(app.controller.error().is_some());
    }

    #[test]
    fn scroll_stops_at_last_line() {
        let mut app = app();
        app.result_lines = 3;
        app.result_height = 10;
        app.scroll_down();
        assert_eq!(app.result_scroll, 0);

        app.result_lines = 12;
        for _ in 0..20 {
            app.scroll_down();
        }
        assert_eq!(app.result_scroll, 2);
        app.scroll_up();
        assert_eq!(app.result_scroll, 1);
    }

    #[test]
    fn unreadable_config_is_an_error_and_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let original = r#"{"endpoint": "http://custom:9000", "default_tone": "formal",}"#;
        std::fs::write(&path, original).unwrap();

        assert!(App::load(path.clone(), None).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn loaded_app_keeps_endpoint_when_saving_preferences() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"endpoint": "http://custom:9000", "default_tone": "formal"}"#)
            .unwrap();

        let mut app = App::load(path.clone(), None).unwrap();
        assert_eq!(app.client.base_url(), "http://custom:9000");
        assert_eq!(app.form.tone, crate::content::Tone::Formal);

        app.form.platform = crate::content::Platform::Instagram;
        let ticket = app.controller.begin().unwrap();
        app.finish_submission(ticket, Ok(GeneratedContent::default()));

        let saved = Config::load_from(&path).unwrap();
        assert_eq!(saved.endpoint.as_deref(), Some("http://custom:9000"));
        assert_eq!(saved.default_tone, Some(crate::content::Tone::Formal));
        assert_eq!(saved.default_platform, Some(crate::content::Platform::Instagram));
    }

    #[test]
    fn preferences_saved_after_success() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut app = app();
        app.config_path = Some(path.clone());
        app.form.tone = crate::content::Tone::Formal;

        let ticket = app.controller.begin().unwrap();
        app.finish_submission(ticket, Ok(GeneratedContent::default()));

        let saved = Config::load_from(&path).unwrap();
        assert_eq!(saved.default_tone, Some(crate::content::Tone::Formal));
        assert_eq!(saved.default_platform, Some(crate::content::Platform::Twitter));
    }
}
