use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tracing_subscriber::EnvFilter;

use solaris_application::{AppCoordinator, AppShell, Credentials, SubmitOutcome};
use solaris_core::seed::ASSISTANT_USERNAME;
use solaris_infrastructure::{ConfigService, SolarisPaths};

mod command;
mod render;

use command::{COMMANDS, Command};

const DEFAULT_LOG_FILTER: &str = "warn,solaris=info";

#[derive(Parser)]
#[command(name = "solaris")]
#[command(about = "Solaris - social client in your terminal", long_about = None)]
struct Cli {
    /// Path to config.toml (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "solaris_application=trace". Overrides RUST_LOG.
    #[arg(long)]
    log: Option<String>,
}

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

fn init_tracing(filter: Option<&str>) {
    let filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log.as_deref());

    // ===== Backend Initialization =====
    let config_service = match &cli.config {
        Some(path) => ConfigService::with_path(path.clone()),
        None => ConfigService::new().context("Failed to resolve config directory")?,
    };
    let config = config_service
        .load()
        .with_context(|| format!("Failed to load {}", config_service.path().display()))?;
    tracing::info!("[Main] Loaded config from {}", config_service.path().display());

    // The session is kept next to the config file in use.
    let session_file = SolarisPaths::new(config_service.path().parent())
        .session_file()
        .ok();
    let shell = AppShell::from_config(&config, session_file).await;
    let coordinator = Arc::clone(shell.coordinator());

    // ===== REPL Setup =====
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    render::banner();
    render::screen(&coordinator.snapshot().await);

    // ===== Main REPL Loop =====
    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if !trimmed.starts_with("/login") && !trimmed.starts_with("/register") {
                    let _ = rl.add_history_entry(trimmed);
                }

                match Command::parse(trimmed) {
                    Command::Quit => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    command => handle_command(&coordinator, command).await,
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    shell.shutdown().await;
    Ok(())
}

async fn handle_command(coordinator: &Arc<AppCoordinator>, command: Command) {
    let result = match command {
        Command::Login { email, password } => {
            submit(coordinator, Credentials::sign_in(email, password)).await;
            Ok(())
        }
        Command::Register {
            email,
            password,
            name,
        } => {
            submit(coordinator, Credentials::sign_up(email, password, name)).await;
            Ok(())
        }
        Command::Go(screen) => coordinator.navigate(screen).await,
        Command::Like(post_id) => coordinator.toggle_like(&post_id).await.map(|_| ()),
        Command::Open(session_id) => coordinator.open_session(&session_id).await,
        Command::Back => {
            coordinator.close_session().await;
            Ok(())
        }
        Command::Dismiss => {
            coordinator.dismiss_notice().await;
            Ok(())
        }
        Command::Help => {
            render::help();
            return;
        }
        Command::Say(text) => {
            send(coordinator, text).await;
            return;
        }
        Command::Invalid(hint) => {
            println!("{}", hint.bright_black());
            return;
        }
        Command::Quit => return,
    };

    if let Err(e) = result {
        println!("{}", e.to_string().red());
    }
    render::screen(&coordinator.snapshot().await);
}

async fn submit(coordinator: &AppCoordinator, credentials: Credentials) {
    match coordinator.submit_credentials(credentials).await {
        SubmitOutcome::SignedIn => println!("{}", "Signed in".bright_green()),
        SubmitOutcome::DemoMode(_) => {
            println!("{}", "Backend unavailable, continuing in demo mode".yellow())
        }
        SubmitOutcome::Busy => println!("{}", "Still signing in...".bright_black()),
        SubmitOutcome::Registered { .. } | SubmitOutcome::Failed(_) | SubmitOutcome::Invalid => {}
    }
}

/// Sends text to the open conversation. Assistant replies arrive in the background.
async fn send(coordinator: &Arc<AppCoordinator>, text: String) {
    let Some(session) = coordinator.read(|s| s.active_session().cloned()).await else {
        println!("{}", "Open a conversation first: /messages, then /open <session-id>".bright_black());
        return;
    };

    if !session.is_with(ASSISTANT_USERNAME) {
        match coordinator.send_message(&session.id, &text).await {
            Ok(_) => println!("{} {}", "you:".green(), text.green()),
            Err(e) => println!("{}", e.to_string().red()),
        }
        return;
    }

    if coordinator.read(|s| s.is_composing(&session.id)).await {
        println!(
            "{}",
            format!("{} is still typing, wait for the reply", session.user.name).bright_black()
        );
        return;
    }

    println!("{} {}", "you:".green(), text.green());
    render::composing_indicator(&session.user);

    // The session refuses new sends until this reply lands, so the newest
    // incoming message is the answer to `text`.
    let coordinator = Arc::clone(coordinator);
    tokio::spawn(async move {
        match coordinator.send_message(&session.id, &text).await {
            Ok(_) => {
                let reply = coordinator
                    .read(|s| {
                        s.session(&session.id).and_then(|updated| {
                            updated
                                .messages
                                .iter()
                                .rev()
                                .find(|m| !m.is_me)
                                .map(|m| (updated.clone(), m.text.clone()))
                        })
                    })
                    .await;
                if let Some((updated, text)) = reply {
                    render::incoming(&updated, &text);
                }
            }
            Err(e) => println!("{}", e.to_string().red()),
        }
    });
}
