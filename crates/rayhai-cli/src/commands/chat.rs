//! Interactive chat REPL.

use std::borrow::Cow::{self, Borrowed, Owned};

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use crate::GlobalOptions;
use crate::bootstrap::build_engine;
use rayhai_application::ResponseEngine;
use rayhai_core::intent::Intent;
use rayhai_core::response::WELCOME_MESSAGE;
use rayhai_core::session::{Exchange, ExchangeRole};
use rayhai_infrastructure::RayhaiPaths;
use rayhai_infrastructure::storage::{SecretStorage, TranscriptStorage};

const COMMANDS: &[&str] = &["/help", "/key", "/quit", "/reset", "/session"];

/// Slash commands understood by the REPL.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ReplCommand {
    Help,
    Quit,
    Reset,
    Session,
    /// `/key` alone disables the remote fallback.
    Key { key: Option<String>, save: bool },
    Unknown(String),
}

/// Parses a slash command; plain messages return `None`.
fn parse_command(line: &str) -> Option<ReplCommand> {
    let line = line.trim();
    if !line.starts_with('/') {
        return None;
    }

    let mut parts = line.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let command = match name {
        "/help" => ReplCommand::Help,
        "/quit" | "/exit" => ReplCommand::Quit,
        "/reset" => ReplCommand::Reset,
        "/session" => ReplCommand::Session,
        "/key" => {
            let mut key = None;
            let mut save = false;
            for part in parts {
                if part == "--save" {
                    save = true;
                } else {
                    key = Some(part.to_string());
                }
            }
            ReplCommand::Key { key, save }
        }
        other => ReplCommand::Unknown(other.to_string()),
    };
    Some(command)
}

/// rustyline helper: slash-command completion, hints and highlighting.
#[derive(Clone)]
struct ChatHelper;

impl Helper for ChatHelper {}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with('/') {
            return Ok((0, vec![]));
        }
        let candidates = COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for ChatHelper {
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

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if line.starts_with('/') && !line.contains(' ') {
            COMMANDS
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for ChatHelper {}

fn print_reply(text: &str) {
    println!("{}", "[RayhAI]".bright_magenta());
    for line in text.lines() {
        println!("{}", line.bright_blue());
    }
    println!();
}

fn print_help() {
    println!("{}", "Commands:".bright_yellow());
    println!("  /reset            start a new conversation");
    println!("  /session          show the current session as JSON");
    println!("  /key <key>        use an OpenAI key for unanswered questions");
    println!("  /key <key> --save same, and store the key in secret.json");
    println!("  /key              stop using the OpenAI fallback");
    println!("  /quit             leave");
    println!();
}

/// Prints the saved transcript, or the welcome message when it is empty.
fn replay_or_welcome(transcript: Option<&TranscriptStorage>) {
    let entries = match transcript.map(TranscriptStorage::load) {
        Some(Ok(entries)) => entries,
        Some(Err(e)) => {
            tracing::warn!("[Chat] Transcript unreadable, starting fresh: {}", e);
            Vec::new()
        }
        None => Vec::new(),
    };

    if entries.is_empty() {
        print_reply(WELCOME_MESSAGE);
        if let Some(storage) = transcript {
            let welcome = Exchange::assistant(WELCOME_MESSAGE, Intent::Greeting);
            if let Err(e) = storage.append(&[welcome]) {
                tracing::warn!("[Chat] Failed to save transcript: {}", e);
            }
        }
        return;
    }

    for entry in &entries {
        match entry.role {
            ExchangeRole::User => println!("{}", format!("> {}", entry.text).bright_black()),
            ExchangeRole::Assistant => println!("{}", entry.text.bright_black()),
        }
    }
    println!();
}

/// Saves the exchanges recorded by the last turn.
async fn save_turn(engine: &ResponseEngine, transcript: &TranscriptStorage, depth_before: u32) {
    let info = engine.session_info().await;
    if info.depth == depth_before {
        return;
    }
    let start = info.history.len().saturating_sub(2);
    if let Err(e) = transcript.append(&info.history[start..]) {
        tracing::warn!("[Chat] Failed to save transcript: {}", e);
    }
}

async fn handle_command(
    command: ReplCommand,
    engine: &ResponseEngine,
    transcript: Option<&TranscriptStorage>,
) -> Result<bool> {
    match command {
        ReplCommand::Quit => return Ok(false),
        ReplCommand::Help => print_help(),
        ReplCommand::Reset => {
            engine.reset_session().await;
            if let Some(storage) = transcript
                && let Err(e) = storage.clear()
            {
                eprintln!("{}", format!("Failed to clear transcript: {}", e).red());
            }
            println!("{}", "Conversation reset.".bright_green());
            print_reply(WELCOME_MESSAGE);
        }
        ReplCommand::Session => {
            let info = engine.session_info().await;
            println!("{}", serde_json::to_string_pretty(&info)?.bright_black());
        }
        ReplCommand::Key { key: None, .. } => {
            engine.configure("").await;
            println!("{}", "OpenAI fallback disabled.".bright_green());
        }
        ReplCommand::Key {
            key: Some(key),
            save,
        } => {
            engine.configure(&key).await;
            println!("{}", "OpenAI fallback enabled for this session.".bright_green());
            if save {
                match SecretStorage::new().and_then(|storage| {
                    storage.save_openai_key(&key)?;
                    Ok(storage)
                }) {
                    Ok(storage) => println!(
                        "{}",
                        format!("Key saved to {}", storage.path().display()).bright_green()
                    ),
                    Err(e) => eprintln!("{}", format!("Failed to save key: {}", e).red()),
                }
            }
        }
        ReplCommand::Unknown(name) => {
            println!("{}", format!("Unknown command {} (try /help)", name).yellow());
        }
    }
    Ok(true)
}

pub async fn run(options: &GlobalOptions, use_transcript: bool) -> Result<()> {
    let engine = build_engine(options).await?;
    let transcript = if use_transcript {
        Some(TranscriptStorage::new(RayhaiPaths::transcript_file()?))
    } else {
        None
    };

    let mut rl = Editor::new()?;
    rl.set_helper(Some(ChatHelper));

    println!("{}", "=== RayhAI ===".bright_magenta().bold());
    println!(
        "{}",
        "Ask about the persona, '/help' for commands, '/quit' to exit.".bright_black()
    );
    if engine.persona_is_fallback().await {
        println!(
            "{}",
            "Persona document unavailable, using the built-in profile.".yellow()
        );
    }
    println!();

    replay_or_welcome(transcript.as_ref());

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                if let Some(command) = parse_command(trimmed) {
                    if !handle_command(command, &engine, transcript.as_ref()).await? {
                        println!("{}", "À bientôt !".bright_green());
                        break;
                    }
                    continue;
                }

                let depth_before = engine.session_info().await.depth;
                let reply = engine.ask(trimmed).await;
                print_reply(&reply);

                if let Some(storage) = &transcript {
                    save_turn(&engine, storage, depth_before).await;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type '/quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "À bientôt !".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}
