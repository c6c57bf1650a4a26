//! CLI `chat` command — the interactive session REPL.

use std::sync::Arc;

use anyhow::{Context, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use memchat::completion::router::ProviderRouter;
use memchat::config::MemchatConfig;
use memchat::error::{ServiceError, TurnError};
use memchat::memory::client::HostedMemoryClient;
use memchat::models::ModelId;
use memchat::session::controller::{ControllerSettings, SessionController};
use memchat::session::{SessionState, TurnPath};

/// REPL meta-commands, entered with a leading `/`.
#[derive(Debug, PartialEq, Eq)]
enum ReplCommand {
    Model(String),
    User(String),
    Models,
    History,
    Help,
    Quit,
    Unknown(String),
}

impl ReplCommand {
    /// `None` when `line` is a chat message rather than a meta-command.
    fn parse(line: &str) -> Option<Self> {
        let rest = line.trim().strip_prefix('/')?;
        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };
        Some(match name {
            "model" if !arg.is_empty() => Self::Model(arg.to_string()),
            "user" if !arg.is_empty() => Self::User(arg.to_string()),
            "models" => Self::Models,
            "history" => Self::History,
            "help" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => Self::Unknown(rest.to_string()),
        })
    }
}

const HELP: &str = "\
Type a message to chat. Type UPDATE_MEM to check all memories for contradictions.
  /model <id>   switch model (see /models)
  /user <id>    switch user
  /models       list supported models
  /history      show this session's transcript
  /quit         leave";

/// Run the interactive chat loop until EOF, Ctrl-C or `/quit`.
pub async fn chat(
    config: &MemchatConfig,
    user: Option<String>,
    model: Option<ModelId>,
) -> Result<()> {
    let memory = HostedMemoryClient::new(&config.memory)?;
    let completion = ProviderRouter::new(&config.completion, &config.providers)?;
    let controller = SessionController::new(
        Arc::new(memory),
        Arc::new(completion),
        ControllerSettings::from(config),
    );

    let mut state = SessionState::new(
        user.unwrap_or_else(|| config.session.user_id.clone()),
        model.unwrap_or(config.session.model),
    );
    tracing::info!(session_id = %state.session_id, user_id = %state.user_id, "session started");

    println!("Your Long-Term Adaptive Assistant");
    println!("user: {}  model: {}  (/help for commands)", state.user_id, state.model);
    println!("Type UPDATE_MEM for a memory consistency check.\n");

    let mut editor = DefaultEditor::new().context("failed to initialize line editor")?;

    loop {
        let line = match editor.readline("you> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e).context("failed to read input"),
        };
        if line.trim().is_empty() && !state.awaiting_confirmation {
            continue;
        }
        let _ = editor.add_history_entry(line.as_str());

        if let Some(command) = ReplCommand::parse(&line) {
            if !run_command(command, &mut state) {
                break;
            }
            continue;
        }

        let path = TurnPath::classify(&state, &line);
        let pb = super::spinner(path.progress_message());
        let result = controller.handle_turn(&mut state, &line).await;
        pb.finish_and_clear();

        match result {
            Ok(outcome) => {
                println!("\nassistant> {}\n", outcome.reply);
                if let Some(notification) = outcome.notification {
                    eprintln!("{}", notification.text());
                }
            }
            Err(err) => report_turn_error(&err),
        }
    }

    tracing::info!(
        session_id = %state.session_id,
        messages = state.transcript.len(),
        elapsed_secs = (chrono::Utc::now() - state.started_at).num_seconds(),
        "session ended"
    );
    Ok(())
}

/// Apply a meta-command. Returns `false` when the REPL should exit.
fn run_command(command: ReplCommand, state: &mut SessionState) -> bool {
    match command {
        ReplCommand::Model(id) => match id.parse::<ModelId>() {
            Ok(model) => {
                state.model = model;
                println!("model: {model}");
            }
            Err(e) => println!("{e}"),
        },
        ReplCommand::User(id) => {
            // A pending update belongs to the previous user's conversation.
            if state.awaiting_confirmation {
                state.awaiting_confirmation = false;
                println!("pending memory update discarded");
            }
            state.user_id = id;
            println!("user: {}", state.user_id);
        }
        ReplCommand::Models => {
            for model in ModelId::ALL {
                let marker = if model == state.model { "*" } else { " " };
                println!("{marker} {model}");
            }
        }
        ReplCommand::History => {
            if state.transcript.is_empty() {
                println!("(empty)");
            }
            for message in &state.transcript {
                println!("{}: {}", message.role, message.content);
            }
        }
        ReplCommand::Help => println!("{HELP}"),
        ReplCommand::Quit => return false,
        ReplCommand::Unknown(name) => println!("unknown command: /{name} (try /help)"),
    }
    true
}

fn report_turn_error(err: &TurnError) {
    eprintln!("error: {err}: {}", err.source);
    let hint = match &err.source {
        ServiceError::Authentication { service, .. } => {
            Some(format!("check the API key for the {service}"))
        }
        ServiceError::MissingCredentials { provider } => {
            Some(format!("set an API key for {provider} or pick another model with /model"))
        }
        ServiceError::RateLimited { .. } => Some("wait a moment and send the message again".into()),
        _ => None,
    };
    if let Some(hint) = hint {
        eprintln!("hint: {hint}");
    }
}
