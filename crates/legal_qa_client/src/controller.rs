//! UI controller: owns UI state and the view model, turns user actions into
//! API calls and API results into view updates.
//!
//! No operation returns an error. Every backend failure ends up as view state
//! (an error bubble, an inline modal error, a notification or the status
//! indicator) and the controller stays usable afterwards.

use std::time::{Duration, Instant};

use chrono::Local;

use crate::client::ApiClient;
use crate::config::Config;
use crate::messages::{AnalysisType, AnswerStyle, Role};
use crate::preferences::{PreferenceStore, Theme};
use crate::view::{
    ChatMessage, ChatScreen, ModalKind, NotificationKind, Panel, StatusState, View,
    EXAMPLE_QUESTIONS,
};

/// Terminal width (columns) at or below which the sidebar is collapsed.
pub const NARROW_WIDTH: u16 = 80;

pub const SEND_FAILED_REPLY: &str =
    "Sorry, something went wrong while handling your question. Please try again later.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    pub system_ready: bool,
    pub current_session_id: Option<String>,
    pub is_loading: bool,
    pub auto_scroll: bool,
    pub dark_mode: bool,
    pub answer_style: AnswerStyle,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            system_ready: false,
            current_session_id: None,
            is_loading: false,
            auto_scroll: true,
            dark_mode: false,
            answer_style: AnswerStyle::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub notification_duration: Duration,
    pub auto_scroll: bool,
    pub answer_style: AnswerStyle,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            notification_duration: Duration::from_millis(crate::config::DEFAULT_NOTIFICATION_MS),
            auto_scroll: true,
            answer_style: AnswerStyle::default(),
        }
    }
}

impl From<&Config> for ControllerOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            notification_duration: cfg.notification_duration(),
            auto_scroll: cfg.auto_scroll(),
            answer_style: cfg.answer_style(),
        }
    }
}

/// Keys the input box reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter { shift: bool },
}

/// What a send attempt did.
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// Guard rejected the input; no request was issued.
    Skipped,
    Answered { answer: String },
    Failed { error: String },
}

pub struct Controller {
    client: ApiClient,
    preferences: PreferenceStore,
    state: UiState,
    view: View,
}

impl Controller {
    pub fn new(client: ApiClient, preferences: PreferenceStore, options: ControllerOptions) -> Self {
        let state = UiState {
            auto_scroll: options.auto_scroll,
            answer_style: options.answer_style,
            ..UiState::default()
        };
        Self {
            client,
            preferences,
            state,
            view: View::new(options.notification_duration),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        let client = ApiClient::new(cfg.base_url()).with_timeout(cfg.timeout());
        let preferences = PreferenceStore::new(cfg.preferences_path());
        Self::new(client, preferences, ControllerOptions::from(cfg))
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    // ── Startup ─────────────────────────────────────────────────────────

    /// Probe the backend, load the session list, apply the saved theme.
    pub async fn initialize(&mut self) {
        log::info!("initializing client against {}", self.client.base_url());
        self.check_system_status().await;
        self.load_sessions().await;
        self.initialize_theme();
        log::info!("client initialized (ready: {})", self.state.system_ready);
    }

    pub async fn check_system_status(&mut self) {
        match self.client.system_status().await {
            Ok(status) if status.ready => {
                self.state.system_ready = true;
                self.update_system_status(StatusState::Connected, "System ready");
                log::info!("backend ready");
            }
            Ok(status) => {
                self.state.system_ready = false;
                let text = status
                    .message
                    .unwrap_or_else(|| "System not ready".to_string());
                log::warn!("backend not ready: {}", text);
                self.update_system_status(StatusState::Error, &text);
            }
            Err(e) => {
                log::error!("status check failed: {}", e);
                self.state.system_ready = false;
                self.update_system_status(StatusState::Error, "Connection failed");
            }
        }
        self.set_input_state(true);
    }

    fn update_system_status(&mut self, state: StatusState, text: &str) {
        self.view.status.state = state;
        self.view.status.text = text.to_string();
    }

    fn initialize_theme(&mut self) {
        match self.preferences.theme() {
            Ok(Some(Theme::Dark)) => self.state.dark_mode = true,
            Ok(_) => {}
            Err(e) => log::warn!("could not read theme preference: {}", e),
        }
    }

    // ── Input ───────────────────────────────────────────────────────────

    pub fn handle_input_change(&mut self, text: &str) {
        self.view.input.draft = text.to_string();
        self.view.input.char_count = text.chars().count();
        self.view.input.send_enabled =
            self.view.input.enabled && self.state.system_ready && !text.trim().is_empty();
    }

    /// Enter submits, Shift+Enter starts a new line in the draft.
    pub async fn handle_key(&mut self, key: Key) -> Option<SendOutcome> {
        match key {
            Key::Enter { shift: true } => {
                let draft = format!("{}\n", self.view.input.draft);
                self.handle_input_change(&draft);
                None
            }
            Key::Enter { shift: false } => {
                if !self.view.input.send_enabled {
                    return None;
                }
                Some(self.send_message().await)
            }
        }
    }

    fn set_input_state(&mut self, enabled: bool) {
        self.view.input.enabled = enabled;
        self.view.input.send_enabled = enabled
            && self.state.system_ready
            && !self.view.input.draft.trim().is_empty();
    }

    // ── Chat ────────────────────────────────────────────────────────────

    /// Submit the current draft.
    pub async fn send_message(&mut self) -> SendOutcome {
        let question = self.view.input.draft.trim().to_string();
        if question.is_empty() || !self.state.system_ready || !self.view.input.enabled {
            return SendOutcome::Skipped;
        }

        self.set_input_state(false);
        self.add_message(ChatMessage::new(Role::User, &question));
        self.handle_input_change("");
        self.show_chat_interface();
        self.show_loading("Thinking...");

        let result = self
            .client
            .ask_question(
                &question,
                self.state.answer_style,
                self.state.current_session_id.as_deref(),
            )
            .await;

        let outcome = match result {
            Ok(answer) => {
                self.state.current_session_id = Some(answer.session_id.clone());
                self.add_message(
                    ChatMessage::new(Role::Assistant, &answer.answer)
                        .with_execution_time(answer.execution_time),
                );
                self.load_sessions().await;
                SendOutcome::Answered {
                    answer: answer.answer,
                }
            }
            Err(e) => {
                log::error!("send failed: {}", e);
                self.add_message(ChatMessage::error(SEND_FAILED_REPLY));
                let error = format!("Failed to send message: {}", e);
                self.notify(NotificationKind::Error, error.clone());
                SendOutcome::Failed { error }
            }
        };

        self.set_input_state(true);
        self.hide_loading();
        outcome
    }

    /// Send one of the welcome screen's example questions.
    pub async fn ask_example(&mut self, index: usize) -> SendOutcome {
        let Some(question) = EXAMPLE_QUESTIONS.get(index) else {
            self.notify(
                NotificationKind::Warning,
                format!("There is no example question {}", index + 1),
            );
            return SendOutcome::Skipped;
        };
        self.handle_input_change(question);
        self.send_message().await
    }

    fn add_message(&mut self, message: ChatMessage) {
        self.view.transcript.push(message, self.state.auto_scroll);
    }

    pub fn scroll_to_latest(&mut self) {
        self.view.transcript.scroll_to_latest();
    }

    fn show_chat_interface(&mut self) {
        self.view.screen = ChatScreen::Chat;
    }

    fn show_welcome(&mut self) {
        self.view.screen = ChatScreen::Welcome;
    }

    fn show_loading(&mut self, text: &str) {
        self.state.is_loading = true;
        self.view.loading = Some(text.to_string());
    }

    fn hide_loading(&mut self) {
        self.state.is_loading = false;
        self.view.loading = None;
    }

    // ── Sessions ────────────────────────────────────────────────────────

    pub async fn create_new_session(&mut self) {
        let title = format!("New conversation {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
        match self.client.create_session(&title).await {
            Ok(created) => {
                log::info!("created session {}", created.session_id);
                self.state.current_session_id = Some(created.session_id);
                self.view.transcript.clear();
                self.show_welcome();
                self.load_sessions().await;
                self.notify(NotificationKind::Success, "New conversation created");
            }
            Err(e) => {
                log::error!("create session failed: {}", e);
                self.notify(NotificationKind::Error, "Failed to create a new conversation");
            }
        }
    }

    /// Refresh the sidebar. Failures keep the previous list and are only logged.
    pub async fn load_sessions(&mut self) {
        match self.client.list_sessions().await {
            Ok(sessions) => self.view.sidebar.sessions = sessions,
            Err(e) => log::error!("loading sessions failed: {}", e),
        }
    }

    pub async fn switch_session(&mut self, session_id: &str) {
        match self.client.switch_session(session_id).await {
            Ok(_) => {
                log::info!("switched to session {}", session_id);
                self.state.current_session_id = Some(session_id.to_string());
                self.view.transcript.clear();
                self.load_session_messages(session_id).await;
                self.load_sessions().await;
            }
            Err(e) => {
                log::error!("switching to {} failed: {}", session_id, e);
                self.notify(NotificationKind::Error, "Failed to switch conversation");
            }
        }
    }

    /// Replace the transcript with a session's history. No history, or no
    /// answer, leaves the welcome view up.
    pub async fn load_session_messages(&mut self, session_id: &str) {
        match self.client.session_messages(session_id).await {
            Ok(messages) if !messages.is_empty() => {
                self.show_chat_interface();
                self.view.transcript.clear();
                for message in &messages {
                    self.add_message(ChatMessage::historical(message));
                }
                self.scroll_to_latest();
            }
            Ok(_) => self.show_welcome(),
            Err(e) => {
                log::error!("loading history of {} failed: {}", session_id, e);
                self.show_welcome();
            }
        }
    }

    // ── Modals ──────────────────────────────────────────────────────────

    pub fn show_modal(&mut self, kind: ModalKind) {
        self.view.modals.open = Some(kind);
    }

    pub fn hide_modal(&mut self) {
        self.view.modals.open = None;
    }

    pub async fn show_conversation_summary(&mut self) {
        self.show_modal(ModalKind::Summary);
        self.view.modals.summary = Panel::Loading("Generating summary...");

        self.view.modals.summary = match self.client.conversation_summary().await {
            Ok(summary) => Panel::Ready(
                summary
                    .summary
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| "No conversation to summarize yet".to_string()),
            ),
            Err(e) => {
                log::error!("summary failed: {}", e);
                Panel::Failed(format!("Failed to get conversation summary: {}", e))
            }
        };
    }

    /// Open the analysis modal with any previous result cleared.
    pub fn show_content_analyzer(&mut self) {
        self.show_modal(ModalKind::Analysis);
        self.view.modals.analysis = Panel::Hidden;
    }

    pub async fn perform_content_analysis(&mut self, content: &str, analysis_type: AnalysisType) {
        let content = content.trim();
        if content.is_empty() {
            self.notify(NotificationKind::Warning, "Please enter content to analyze");
            return;
        }

        self.view.modals.analysis = Panel::Loading("Analyzing content...");
        self.view.modals.analysis = match self
            .client
            .analyze_content(content, analysis_type)
            .await
        {
            Ok(analysis) => Panel::Ready(
                analysis
                    .analysis
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| "Analysis complete".to_string()),
            ),
            Err(e) => {
                log::error!("analysis failed: {}", e);
                Panel::Failed(format!("Content analysis failed: {}", e))
            }
        };
    }

    pub async fn show_settings(&mut self) {
        self.show_modal(ModalKind::Settings);
        self.load_system_info().await;
    }

    async fn load_system_info(&mut self) {
        self.view.modals.system_info = Panel::Loading("Loading system information...");
        self.view.modals.system_info = match self.client.system_status().await {
            Ok(status) => match status.info {
                Some(info) => Panel::Ready(info),
                None => Panel::Failed(
                    status
                        .message
                        .unwrap_or_else(|| "System information unavailable".to_string()),
                ),
            },
            Err(e) => {
                log::error!("loading system info failed: {}", e);
                Panel::Failed("Failed to load system information".to_string())
            }
        };
    }

    // ── Preferences & layout ────────────────────────────────────────────

    pub fn toggle_dark_mode(&mut self, enabled: bool) {
        self.state.dark_mode = enabled;
        let theme = if enabled { Theme::Dark } else { Theme::Light };
        if let Err(e) = self.preferences.set_theme(theme) {
            log::warn!("could not persist theme preference: {}", e);
        }
    }

    pub fn set_auto_scroll(&mut self, enabled: bool) {
        self.state.auto_scroll = enabled;
    }

    pub fn set_answer_style(&mut self, style: AnswerStyle) {
        self.state.answer_style = style;
    }

    pub fn toggle_sidebar(&mut self) {
        self.view.sidebar.open = !self.view.sidebar.open;
    }

    pub fn handle_resize(&mut self, width: u16) {
        if width <= NARROW_WIDTH {
            self.view.sidebar.open = false;
        }
    }

    // ── Notifications ───────────────────────────────────────────────────

    pub fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) -> u64 {
        self.view.notifications.push(kind, message)
    }

    pub fn dismiss_notification(&mut self, id: u64) -> bool {
        self.view.notifications.dismiss(id)
    }

    /// Auto-dismiss: drop notifications older than their duration.
    pub fn prune_notifications(&mut self, now: Instant) {
        self.view.notifications.prune(now);
    }
}
