//! View model: everything the front end draws, with no knowledge of how.
//! The controller mutates it; the renderer reads it.

use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

use crate::format;
use crate::messages::{HistoryMessage, Role, SessionInfo, SystemInfo};

/// Starter questions offered on the welcome screen.
pub const EXAMPLE_QUESTIONS: [&str; 4] = [
    "What are the legal requirements for a valid contract?",
    "How is intentional injury defined under criminal law?",
    "What compensation is owed when an employer terminates a labor contract unlawfully?",
    "How is marital property divided in a divorce?",
];

pub const UNTITLED_SESSION: &str = "Untitled conversation";

/// Title shown for a session in the sidebar.
pub fn session_title(session: &SessionInfo) -> &str {
    if session.title.trim().is_empty() {
        UNTITLED_SESSION
    } else {
        &session.title
    }
}

// ── Transcript ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    /// Already sanitized for display.
    pub content: String,
    pub timestamp: DateTime<Local>,
    pub execution_time: Option<f64>,
    pub is_error: bool,
    pub is_historical: bool,
}

impl ChatMessage {
    pub fn new(role: Role, content: &str) -> Self {
        Self {
            role,
            content: format::sanitize_content(content),
            timestamp: Local::now(),
            execution_time: None,
            is_error: false,
            is_historical: false,
        }
    }

    pub fn with_execution_time(mut self, seconds: Option<f64>) -> Self {
        self.execution_time = seconds;
        self
    }

    pub fn error(content: &str) -> Self {
        Self {
            is_error: true,
            ..Self::new(Role::Assistant, content)
        }
    }

    /// A stored turn; falls back to "now" when the server sent no usable timestamp.
    pub fn historical(message: &HistoryMessage) -> Self {
        let timestamp = message
            .timestamp
            .as_deref()
            .and_then(format::parse_timestamp)
            .unwrap_or_else(Local::now);
        Self {
            timestamp,
            is_historical: true,
            ..Self::new(message.role, &message.content)
        }
    }

    /// `12:30 · took 1.25s · error · history`
    pub fn meta_line(&self) -> String {
        let mut parts = vec![format::clock_time(&self.timestamp)];
        if let Some(secs) = self.execution_time.filter(|s| *s > 0.0) {
            parts.push(format!("took {}", format::execution_time(secs)));
        }
        if self.is_error {
            parts.push("error".to_string());
        }
        if self.is_historical {
            parts.push("history".to_string());
        }
        parts.join(" · ")
    }
}

/// Rendered messages of the active session.
#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    generation: u64,
    at_latest: bool,
}

impl Default for Transcript {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            generation: 0,
            at_latest: true,
        }
    }
}

impl Transcript {
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Bumped on every clear so renderers know to start over.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the newest message is in view.
    pub fn at_latest(&self) -> bool {
        self.at_latest
    }

    /// Append; follows the new message only when `follow` is set.
    pub fn push(&mut self, message: ChatMessage, follow: bool) {
        self.messages.push(message);
        self.at_latest = follow;
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.generation += 1;
        self.at_latest = true;
    }

    pub fn scroll_to_latest(&mut self) {
        self.at_latest = true;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChatScreen {
    #[default]
    Welcome,
    Chat,
}

// ── Input ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBox {
    pub draft: String,
    pub enabled: bool,
    pub send_enabled: bool,
    pub char_count: usize,
}

// ── Status indicator ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusState {
    #[default]
    Connecting,
    Connected,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusIndicator {
    pub state: StatusState,
    pub text: String,
}

impl Default for StatusIndicator {
    fn default() -> Self {
        Self {
            state: StatusState::Connecting,
            text: "Connecting...".to_string(),
        }
    }
}

// ── Notifications ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

impl NotificationKind {
    pub fn title(self) -> &'static str {
        match self {
            NotificationKind::Success => "Success",
            NotificationKind::Error => "Error",
            NotificationKind::Warning => "Warning",
            NotificationKind::Info => "Info",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            NotificationKind::Success => "✔",
            NotificationKind::Error => "✖",
            NotificationKind::Warning => "⚠",
            NotificationKind::Info => "ℹ",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: Instant,
    pub duration: Duration,
}

impl Notification {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= self.duration
    }
}

/// Transient messages; each disappears after its duration or on dismiss.
#[derive(Debug, Clone)]
pub struct Notifications {
    items: Vec<Notification>,
    next_id: u64,
    duration: Duration,
}

impl Notifications {
    pub fn new(duration: Duration) -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
            duration,
        }
    }

    pub fn push(&mut self, kind: NotificationKind, message: impl Into<String>) -> u64 {
        self.push_at(kind, message, Instant::now())
    }

    pub fn push_at(
        &mut self,
        kind: NotificationKind,
        message: impl Into<String>,
        now: Instant,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(Notification {
            id,
            kind,
            message: message.into(),
            created_at: now,
            duration: self.duration,
        });
        id
    }

    /// Manual close. Returns false when the id is already gone.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }

    /// Drop everything whose duration has elapsed at `now`.
    pub fn prune(&mut self, now: Instant) {
        self.items.retain(|n| !n.is_expired(now));
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.items.last()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ── Modals ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    Summary,
    Analysis,
    Settings,
}

/// Content area of a modal.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Panel<T> {
    #[default]
    Hidden,
    Loading(&'static str),
    Ready(T),
    Failed(String),
}

#[derive(Debug, Clone, Default)]
pub struct Modals {
    pub open: Option<ModalKind>,
    pub summary: Panel<String>,
    pub analysis: Panel<String>,
    pub system_info: Panel<SystemInfo>,
}

// ── Whole screen ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct Sidebar {
    pub sessions: Vec<SessionInfo>,
    pub open: bool,
}

#[derive(Debug, Clone)]
pub struct View {
    pub screen: ChatScreen,
    pub transcript: Transcript,
    pub input: InputBox,
    pub status: StatusIndicator,
    /// Loading overlay text while a question is in flight.
    pub loading: Option<String>,
    pub notifications: Notifications,
    pub modals: Modals,
    pub sidebar: Sidebar,
}

impl View {
    pub fn new(notification_duration: Duration) -> Self {
        Self {
            screen: ChatScreen::Welcome,
            transcript: Transcript::default(),
            input: InputBox::default(),
            status: StatusIndicator::default(),
            loading: None,
            notifications: Notifications::new(notification_duration),
            modals: Modals::default(),
            sidebar: Sidebar::default(),
        }
    }
}
