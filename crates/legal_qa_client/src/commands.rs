//! Terminal input: one line → one `Command` → one controller action.
//! Parsing and dispatch are plain functions so the binary stays thin.

use crate::controller::{Controller, Key};
use crate::messages::{AnalysisType, AnswerStyle};
use crate::view::NotificationKind;

pub const HELP: &str = "\
Type a question and press Enter to send it. End a line with \\ to continue on the next line.

  /new                     start a new conversation
  /sessions                show the conversation list
  /switch N|ID             open conversation N from the list (or by id)
  /summary                 summarize the current conversation
  /analyze [TYPE] TEXT     analyze TEXT (legal_content, conversation, session_insights, law_analysis)
  /settings                show settings and system information
  /theme dark|light        switch color theme
  /autoscroll on|off       follow new messages
  /style STYLE             answer style (professional, simple, detailed)
  /example N               ask example question N
  /close                   close the open panel
  /dismiss [ID]            dismiss a notification (latest by default)
  /sidebar                 toggle the conversation list
  /bottom                  jump to the latest message
  /help                    show this help
  /quit                    exit";

pub const NOT_SENT: &str = "System not ready; question not sent";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionRef {
    /// 1-based position in the displayed list.
    Index(usize),
    Id(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Final line of a question; submits the draft.
    Ask(String),
    /// A line ending in `\`: appended to the draft, followed by a newline.
    Continue(String),
    NewSession,
    Sessions,
    Switch(SessionRef),
    Summary,
    Analyze {
        analysis_type: AnalysisType,
        content: String,
    },
    Settings,
    Theme { dark: bool },
    AutoScroll(bool),
    Style(AnswerStyle),
    Example(usize),
    Close,
    Dismiss(Option<u64>),
    Sidebar,
    Bottom,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown command: /{0} (try /help)")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}

/// What the front end should do after a command ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    ShowSessions,
    ShowHelp,
    Quit,
}

pub fn parse_line(line: &str) -> Result<Command, ParseError> {
    let line = line.trim_end_matches(&['\r', '\n'][..]);
    let Some(rest) = line.trim_start().strip_prefix('/') else {
        return Ok(match line.strip_suffix('\\') {
            Some(text) => Command::Continue(text.to_string()),
            None => Command::Ask(line.to_string()),
        });
    };

    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest, ""),
    };

    match name {
        "new" => Ok(Command::NewSession),
        "sessions" => Ok(Command::Sessions),
        "switch" => parse_switch(args),
        "summary" => Ok(Command::Summary),
        "analyze" => Ok(parse_analyze(args)),
        "settings" => Ok(Command::Settings),
        "theme" => match args {
            "dark" => Ok(Command::Theme { dark: true }),
            "light" => Ok(Command::Theme { dark: false }),
            _ => Err(ParseError::Usage("/theme dark|light")),
        },
        "autoscroll" => match args {
            "on" => Ok(Command::AutoScroll(true)),
            "off" => Ok(Command::AutoScroll(false)),
            _ => Err(ParseError::Usage("/autoscroll on|off")),
        },
        "style" => AnswerStyle::parse(args)
            .map(Command::Style)
            .ok_or(ParseError::Usage("/style professional|simple|detailed")),
        "example" => args
            .parse::<usize>()
            .ok()
            .filter(|n| *n >= 1)
            .map(Command::Example)
            .ok_or(ParseError::Usage("/example N")),
        "close" => Ok(Command::Close),
        "dismiss" if args.is_empty() => Ok(Command::Dismiss(None)),
        "dismiss" => args
            .parse::<u64>()
            .map(|id| Command::Dismiss(Some(id)))
            .map_err(|_| ParseError::Usage("/dismiss [ID]")),
        "sidebar" => Ok(Command::Sidebar),
        "bottom" => Ok(Command::Bottom),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(ParseError::Unknown(other.to_string())),
    }
}

fn parse_switch(args: &str) -> Result<Command, ParseError> {
    if args.is_empty() {
        return Err(ParseError::Usage("/switch N|ID"));
    }
    Ok(match args.parse::<usize>() {
        Ok(n) if n >= 1 => Command::Switch(SessionRef::Index(n)),
        _ => Command::Switch(SessionRef::Id(args.to_string())),
    })
}

fn parse_analyze(args: &str) -> Command {
    let (first, rest) = args.split_once(char::is_whitespace).unwrap_or((args, ""));
    match AnalysisType::parse(first) {
        Some(analysis_type) => Command::Analyze {
            analysis_type,
            content: rest.trim().to_string(),
        },
        None => Command::Analyze {
            analysis_type: AnalysisType::default(),
            content: args.to_string(),
        },
    }
}

/// Run one command against the controller.
pub async fn dispatch(controller: &mut Controller, command: Command) -> Flow {
    match command {
        Command::Ask(text) => {
            let draft = format!("{}{}", controller.view().input.draft, text);
            controller.handle_input_change(&draft);
            if controller.handle_key(Key::Enter { shift: false }).await.is_none() {
                // The draft is invisible in a terminal; never carry a refused line over.
                controller.handle_input_change("");
                if !draft.trim().is_empty() {
                    controller.notify(NotificationKind::Warning, NOT_SENT);
                }
            }
        }
        Command::Continue(text) => {
            let draft = format!("{}{}", controller.view().input.draft, text);
            controller.handle_input_change(&draft);
            controller.handle_key(Key::Enter { shift: true }).await;
        }
        Command::NewSession => controller.create_new_session().await,
        Command::Sessions => {
            controller.load_sessions().await;
            return Flow::ShowSessions;
        }
        Command::Switch(target) => {
            let id = match target {
                SessionRef::Id(id) => Some(id),
                SessionRef::Index(n) => controller
                    .view()
                    .sidebar
                    .sessions
                    .get(n - 1)
                    .map(|s| s.id.clone()),
            };
            match id {
                Some(id) => controller.switch_session(&id).await,
                None => {
                    controller.notify(
                        NotificationKind::Warning,
                        "No such conversation; run /sessions to see the list",
                    );
                }
            }
        }
        Command::Summary => controller.show_conversation_summary().await,
        Command::Analyze {
            analysis_type,
            content,
        } => {
            controller.show_content_analyzer();
            controller
                .perform_content_analysis(&content, analysis_type)
                .await;
        }
        Command::Settings => controller.show_settings().await,
        Command::Theme { dark } => controller.toggle_dark_mode(dark),
        Command::AutoScroll(enabled) => controller.set_auto_scroll(enabled),
        Command::Style(style) => controller.set_answer_style(style),
        Command::Example(n) => {
            controller.ask_example(n - 1).await;
        }
        Command::Close => controller.hide_modal(),
        Command::Dismiss(id) => {
            let id = id.or_else(|| controller.view().notifications.latest().map(|n| n.id));
            if let Some(id) = id {
                controller.dismiss_notification(id);
            }
        }
        Command::Sidebar => {
            controller.toggle_sidebar();
            if controller.view().sidebar.open {
                return Flow::ShowSessions;
            }
        }
        Command::Bottom => controller.scroll_to_latest(),
        Command::Help => return Flow::ShowHelp,
        Command::Quit => return Flow::Quit,
    }
    Flow::Continue
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_question() {
        assert_eq!(
            parse_line("What is a tort?\n"),
            Ok(Command::Ask("What is a tort?".into()))
        );
        assert_eq!(parse_line("   "), Ok(Command::Ask("   ".into())));
    }

    #[test]
    fn trailing_backslash_continues_the_draft() {
        assert_eq!(
            parse_line("first line\\"),
            Ok(Command::Continue("first line".into()))
        );
    }

    #[test]
    fn switch_accepts_index_or_id() {
        assert_eq!(
            parse_line("/switch 2"),
            Ok(Command::Switch(SessionRef::Index(2)))
        );
        assert_eq!(
            parse_line("/switch 7f3a-uuid"),
            Ok(Command::Switch(SessionRef::Id("7f3a-uuid".into())))
        );
        assert_eq!(
            parse_line("/switch"),
            Err(ParseError::Usage("/switch N|ID"))
        );
    }

    #[test]
    fn analyze_type_is_optional() {
        assert_eq!(
            parse_line("/analyze law_analysis Article 5 says"),
            Ok(Command::Analyze {
                analysis_type: AnalysisType::LawAnalysis,
                content: "Article 5 says".into(),
            })
        );
        assert_eq!(
            parse_line("/analyze The lease ends in May"),
            Ok(Command::Analyze {
                analysis_type: AnalysisType::LegalContent,
                content: "The lease ends in May".into(),
            })
        );
        assert_eq!(
            parse_line("/analyze"),
            Ok(Command::Analyze {
                analysis_type: AnalysisType::LegalContent,
                content: String::new(),
            })
        );
    }

    #[test]
    fn toggles_and_styles() {
        assert_eq!(parse_line("/theme dark"), Ok(Command::Theme { dark: true }));
        assert_eq!(parse_line("/autoscroll off"), Ok(Command::AutoScroll(false)));
        assert_eq!(
            parse_line("/style simple"),
            Ok(Command::Style(AnswerStyle::Simple))
        );
        assert!(parse_line("/style shouty").is_err());
        assert_eq!(parse_line("/example 0"), Err(ParseError::Usage("/example N")));
    }

    #[test]
    fn dismiss_and_unknown() {
        assert_eq!(parse_line("/dismiss"), Ok(Command::Dismiss(None)));
        assert_eq!(parse_line("/dismiss 3"), Ok(Command::Dismiss(Some(3))));
        assert_eq!(
            parse_line("/frobnicate"),
            Err(ParseError::Unknown("frobnicate".into()))
        );
    }
}
