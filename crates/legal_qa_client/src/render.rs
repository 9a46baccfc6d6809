//! Terminal rendering of the view model.
//!
//! The free functions render one piece of the view. `Renderer` remembers what
//! it already printed so an interactive session only emits what changed.

use chrono::{Local, NaiveDate};
use yansi::{Color, Paint};

use crate::controller::{Controller, UiState};
use crate::format;
use crate::messages::{Role, SessionInfo, SystemInfo};
use crate::view::{
    session_title, ChatMessage, ChatScreen, ModalKind, Modals, Notification, NotificationKind,
    Panel, StatusIndicator, StatusState, EXAMPLE_QUESTIONS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    User,
    Assistant,
    Error,
    Muted,
    Accent,
    Success,
    Warning,
}

/// Light or dark color set; plain text when color is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub colored: bool,
    pub dark: bool,
}

impl Palette {
    pub fn plain() -> Self {
        Self {
            colored: false,
            dark: false,
        }
    }

    fn color(&self, tone: Tone) -> Color {
        match (tone, self.dark) {
            (Tone::User, false) => Color::Blue,
            (Tone::User, true) => Color::Cyan,
            (Tone::Assistant, false) => Color::Black,
            (Tone::Assistant, true) => Color::White,
            (Tone::Error, _) => Color::Red,
            (Tone::Muted, false) => Color::Fixed(244),
            (Tone::Muted, true) => Color::Fixed(248),
            (Tone::Accent, false) => Color::Magenta,
            (Tone::Accent, true) => Color::Fixed(177),
            (Tone::Success, _) => Color::Green,
            (Tone::Warning, _) => Color::Yellow,
        }
    }

    fn paint(&self, tone: Tone, text: &str) -> String {
        if !self.colored {
            return text.to_string();
        }
        Paint::new(text).fg(self.color(tone)).to_string()
    }

    fn strong(&self, tone: Tone, text: &str) -> String {
        if !self.colored {
            return text.to_string();
        }
        Paint::new(text).fg(self.color(tone)).bold().to_string()
    }
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("  {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_welcome(palette: &Palette) -> String {
    let mut out = palette.strong(Tone::Accent, "Legal Q&A assistant");
    out.push_str("\nAsk a legal question, or try one of these (/example N):\n");
    for (i, question) in EXAMPLE_QUESTIONS.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, question));
    }
    out
}

pub fn render_message(message: &ChatMessage, palette: &Palette) -> String {
    let (label, tone) = match message.role {
        Role::User => ("You", Tone::User),
        Role::Assistant if message.is_error => ("Assistant", Tone::Error),
        Role::Assistant => ("Assistant", Tone::Assistant),
    };
    format!(
        "{} {}\n{}\n",
        palette.strong(tone, &format!("[{}]", label)),
        palette.paint(Tone::Muted, &message.meta_line()),
        palette.paint(tone, &indent(&message.content)),
    )
}

pub fn render_status(status: &StatusIndicator, palette: &Palette) -> String {
    let (dot, tone) = match status.state {
        StatusState::Connecting => ("○", Tone::Muted),
        StatusState::Connected => ("●", Tone::Success),
        StatusState::Error => ("●", Tone::Error),
    };
    format!("{} {}", palette.paint(tone, dot), status.text)
}

pub fn render_sessions(
    sessions: &[SessionInfo],
    current: Option<&str>,
    today: NaiveDate,
    palette: &Palette,
) -> String {
    if sessions.is_empty() {
        return "No conversations yet.\n".to_string();
    }
    let mut out = String::new();
    for (i, session) in sessions.iter().enumerate() {
        let active = current == Some(session.id.as_str());
        let marker = if active { "*" } else { " " };
        let title = format!("{} {}. {}", marker, i + 1, session_title(session));
        let title = if active {
            palette.strong(Tone::Accent, &title)
        } else {
            title
        };
        let date = format::relative_date(&session.created_at, today);
        let meta = if date.is_empty() {
            format!("{} messages", session.message_count)
        } else {
            format!("{} messages · {}", session.message_count, date)
        };
        out.push_str(&format!("{}  {}\n", title, palette.paint(Tone::Muted, &meta)));
    }
    out
}

pub fn render_notification(notification: &Notification, palette: &Palette) -> String {
    let tone = match notification.kind {
        NotificationKind::Success => Tone::Success,
        NotificationKind::Error => Tone::Error,
        NotificationKind::Warning => Tone::Warning,
        NotificationKind::Info => Tone::Accent,
    };
    format!(
        "{} {}: {} {}",
        palette.paint(tone, notification.kind.icon()),
        palette.strong(tone, notification.kind.title()),
        notification.message,
        palette.paint(Tone::Muted, &format!("(#{})", notification.id)),
    )
}

fn render_panel<T>(
    panel: &Panel<T>,
    palette: &Palette,
    ready: impl FnOnce(&T) -> String,
) -> Option<String> {
    match panel {
        Panel::Hidden => None,
        Panel::Loading(text) => Some(palette.paint(Tone::Muted, &format!("… {}", text))),
        Panel::Ready(value) => Some(ready(value)),
        Panel::Failed(message) => Some(palette.paint(Tone::Error, &format!("⚠ {}", message))),
    }
}

fn render_system_info(info: &SystemInfo, today: NaiveDate) -> String {
    let unknown = || "Unknown".to_string();
    let agents = match info.agents_status {
        Some(true) => "✔ healthy",
        _ => "✖ degraded",
    };
    let mut lines = vec![
        format!("LLM model:        {}", info.llm_model.clone().unwrap_or_else(unknown)),
        format!(
            "Embedding model:  {}",
            info.embedding_model.clone().unwrap_or_else(unknown)
        ),
        format!("Vector store:     {} vectors", info.vector_count.unwrap_or(0)),
        format!("Tools:            {} tools", info.tools_count.unwrap_or(0)),
        format!("Agents:           {}", agents),
        format!(
            "Started:          {}",
            format::relative_date(info.startup_time.as_deref().unwrap_or(""), today)
        ),
    ];
    if let Some(version) = &info.version {
        lines.push(format!("Version:          {}", version));
    }
    lines.join("\n")
}

/// The open modal, if any.
pub fn render_modal(
    modals: &Modals,
    state: &UiState,
    today: NaiveDate,
    palette: &Palette,
) -> Option<String> {
    let kind = modals.open?;
    let (title, body) = match kind {
        ModalKind::Summary => (
            "Conversation summary",
            render_panel(&modals.summary, palette, |s| indent(s)),
        ),
        ModalKind::Analysis => (
            "Content analysis",
            render_panel(&modals.analysis, palette, |s| {
                format!("Analysis result\n{}", indent(s))
            }),
        ),
        ModalKind::Settings => {
            let on_off = |b: bool| if b { "on" } else { "off" };
            let mut body = format!(
                "Dark mode:        {}\nAuto-scroll:      {}\nAnswer style:     {}",
                on_off(state.dark_mode),
                on_off(state.auto_scroll),
                state.answer_style.as_str(),
            );
            if let Some(info) = render_panel(&modals.system_info, palette, |info| {
                render_system_info(info, today)
            }) {
                body.push('\n');
                body.push_str(&info);
            }
            ("Settings", Some(body))
        }
    };
    let header = palette.strong(Tone::Accent, &format!("── {} ──", title));
    Some(match body {
        Some(body) => format!("{}\n{}\n", header, body),
        None => format!("{}\n", header),
    })
}

/// Incremental renderer for a line-oriented terminal session.
#[derive(Debug, Default)]
pub struct Renderer {
    colored: bool,
    generation: Option<u64>,
    screen: Option<ChatScreen>,
    printed: usize,
    /// Pending count last announced while scrolled up.
    announced: usize,
    last_status: Option<String>,
    last_modal: Option<String>,
    last_notification: u64,
}

impl Renderer {
    pub fn new(colored: bool) -> Self {
        Self {
            colored,
            ..Self::default()
        }
    }

    pub fn palette(&self, controller: &Controller) -> Palette {
        Palette {
            colored: self.colored,
            dark: controller.state().dark_mode,
        }
    }

    /// Everything that changed since the previous call.
    pub fn render(&mut self, controller: &Controller) -> String {
        let palette = self.palette(controller);
        let view = controller.view();
        let mut out = String::new();

        let status = render_status(&view.status, &palette);
        if self.last_status.as_deref() != Some(status.as_str()) {
            out.push_str(&status);
            out.push('\n');
            self.last_status = Some(status);
        }

        let generation = view.transcript.generation();
        if self.generation != Some(generation) || self.screen != Some(view.screen) {
            if self.generation != Some(generation) {
                self.printed = 0;
                self.announced = 0;
            }
            if view.screen == ChatScreen::Welcome {
                out.push_str(&render_welcome(&palette));
            }
            self.generation = Some(generation);
            self.screen = Some(view.screen);
        }

        let messages = view.transcript.messages();
        if messages.len() > self.printed {
            if view.transcript.at_latest() {
                for message in &messages[self.printed..] {
                    out.push_str(&render_message(message, &palette));
                }
                self.printed = messages.len();
                self.announced = 0;
            } else {
                let pending = messages.len() - self.printed;
                if pending != self.announced {
                    out.push_str(&palette.paint(
                        Tone::Muted,
                        &format!("({} new message(s) below; /bottom to show)\n", pending),
                    ));
                    self.announced = pending;
                }
            }
        }

        let today = Local::now().date_naive();
        let modal = render_modal(&view.modals, controller.state(), today, &palette);
        if modal != self.last_modal {
            if let Some(text) = &modal {
                out.push_str(text);
            }
            self.last_modal = modal;
        }

        for notification in view.notifications.items() {
            if notification.id > self.last_notification {
                out.push_str(&render_notification(notification, &palette));
                out.push('\n');
                self.last_notification = notification.id;
            }
        }

        out
    }

    pub fn render_sessions(&self, controller: &Controller) -> String {
        render_sessions(
            &controller.view().sidebar.sessions,
            controller.state().current_session_id.as_deref(),
            Local::now().date_naive(),
            &self.palette(controller),
        )
    }
}
