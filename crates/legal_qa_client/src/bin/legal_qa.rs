//! legal-qa: terminal client for the legal Q&A backend.
//! With a question argument it asks once and prints the answer; otherwise it
//! runs an interactive session over stdin.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use clap::Parser;
use legal_qa_client::commands::{self, Flow};
use legal_qa_client::render::Renderer;
use legal_qa_client::view::NotificationKind;
use legal_qa_client::{config, format, Config, Controller, SendOutcome};
use log::LevelFilter;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser, Debug)]
#[command(name = "legal-qa", version, about = "Legal Q&A chat client")]
struct Cli {
    /// Config file (default: ~/.legal-qa/config.yaml)
    #[arg(long, env = "LEGAL_QA_CONFIG")]
    config: Option<PathBuf>,

    /// Backend base URL, overriding the config file
    #[arg(long)]
    base_url: Option<String>,

    /// Log level written to stderr (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Ask this question once and exit
    #[arg(trailing_var_arg = true)]
    question: Vec<String>,
}

fn load_config(cli: &Cli) -> Config {
    // 1. --config <path> flag or LEGAL_QA_CONFIG: must load.
    if let Some(path) = &cli.config {
        return config::load(path).unwrap_or_else(|e| {
            eprintln!("Error: failed to load config from {}: {}", path.display(), e);
            process::exit(1);
        });
    }
    // 2. Default path (~/.legal-qa/config.yaml), if present.
    match config::default_config_path() {
        Some(path) if path.exists() => config::load(&path).unwrap_or_else(|e| {
            eprintln!("Error: failed to load config from {}: {}", path.display(), e);
            process::exit(1);
        }),
        _ => Config::default(),
    }
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(LevelFilter::Warn))
        .init();

    let mut cfg = load_config(&cli);
    if let Some(url) = &cli.base_url {
        cfg.server.base_url = Some(url.clone());
    }
    let colored = !cli.no_color && cfg.color();
    let question = cli.question.join(" ");

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| {
            eprintln!("Error: failed to create runtime: {}", e);
            process::exit(1);
        });

    rt.block_on(async {
        let mut controller = Controller::from_config(&cfg);
        controller.initialize().await;

        if question.trim().is_empty() {
            if let Err(e) = interactive(&mut controller, colored).await {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        } else {
            ask_once(&mut controller, &question).await;
        }
    });
}

async fn ask_once(controller: &mut Controller, question: &str) {
    if !controller.state().system_ready {
        eprintln!(
            "Error: backend not ready: {}",
            controller.view().status.text
        );
        process::exit(1);
    }

    controller.handle_input_change(question);
    match controller.send_message().await {
        SendOutcome::Answered { answer } => {
            println!("{}", format::sanitize_content(&answer));
        }
        SendOutcome::Failed { error } => {
            eprintln!("Error: {}", error);
            process::exit(1);
        }
        SendOutcome::Skipped => {
            eprintln!("Error: no question provided");
            process::exit(1);
        }
    }
}

async fn interactive(controller: &mut Controller, colored: bool) -> io::Result<()> {
    if let Some(width) = std::env::var("COLUMNS")
        .ok()
        .and_then(|c| c.trim().parse::<u16>().ok())
    {
        controller.handle_resize(width);
    }

    let mut renderer = Renderer::new(colored);
    let mut stdout = io::stdout();
    write!(stdout, "{}", renderer.render(controller))?;
    stdout.flush()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        controller.prune_notifications(Instant::now());

        let flow = match commands::parse_line(&line) {
            Ok(command) => commands::dispatch(controller, command).await,
            Err(e) => {
                controller.notify(NotificationKind::Warning, e.to_string());
                Flow::Continue
            }
        };

        match flow {
            Flow::Continue => {}
            Flow::ShowSessions => write!(stdout, "{}", renderer.render_sessions(controller))?,
            Flow::ShowHelp => writeln!(stdout, "{}", commands::HELP)?,
            Flow::Quit => break,
        }

        write!(stdout, "{}", renderer.render(controller))?;
        stdout.flush()?;
    }
    Ok(())
}
