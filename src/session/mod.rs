//! Conversation session: state, dispatch, and the turn controller.
//!
//! A [`SessionState`] lives for one user session and is handed to
//! [`controller::SessionController::handle_turn`] by mutable reference on every turn. Each turn
//! takes exactly one of the paths in [`TurnPath`].

pub mod commands;
pub mod controller;
pub mod prompts;

use chrono::{DateTime, Utc};

use crate::message::{Message, Role};
use crate::models::ModelId;

/// Volatile per-session state. Never persisted.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    pub user_id: String,
    pub model: ModelId,
    pub transcript: Vec<Message>,
    /// Set only by an audit that found contradictions; the next message always clears it.
    pub awaiting_confirmation: bool,
}

impl SessionState {
    pub fn new(user_id: impl Into<String>, model: ModelId) -> Self {
        Self {
            session_id: uuid::Uuid::now_v7().to_string(),
            started_at: Utc::now(),
            user_id: user_id.into(),
            model,
            transcript: Vec::new(),
            awaiting_confirmation: false,
        }
    }

    /// The last `window` transcript messages, oldest first.
    pub fn recent(&self, window: usize) -> &[Message] {
        let start = self.transcript.len().saturating_sub(window);
        &self.transcript[start..]
    }

    /// The last `window` transcript messages with system messages dropped.
    pub fn recent_without_system(&self, window: usize) -> Vec<Message> {
        self.recent(window)
            .iter()
            .filter(|m| m.role != Role::System)
            .cloned()
            .collect()
    }
}

/// Which path a turn takes. Evaluated in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPath {
    Audit,
    Confirmation,
    Chat,
}

impl TurnPath {
    pub fn classify(state: &SessionState, input: &str) -> Self {
        if commands::is_audit_command(input) {
            Self::Audit
        } else if state.awaiting_confirmation {
            Self::Confirmation
        } else {
            Self::Chat
        }
    }

    /// Progress text shown while the turn runs.
    pub fn progress_message(&self) -> &'static str {
        match self {
            Self::Audit => "Scanning all memories for contradictions...",
            Self::Confirmation => "Updating memories...",
            Self::Chat => "Thinking...",
        }
    }
}

impl std::fmt::Display for TurnPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Audit => "audit",
            Self::Confirmation => "confirmation",
            Self::Chat => "chat",
        })
    }
}

/// What a completed turn did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnKind {
    Audit {
        contradictions_found: bool,
        memories_scanned: usize,
        truncated: bool,
    },
    UpdateApplied {
        messages_submitted: usize,
    },
    NothingToUpdate,
    UpdateCancelled,
    Chat {
        memories_used: usize,
    },
}

/// Non-blocking notice for the user interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    Taught,
}

impl Notification {
    pub fn text(&self) -> &'static str {
        match self {
            Self::Taught => prompts::TAUGHT_NOTICE,
        }
    }
}

/// Result of a successful turn. The reply has already been appended to the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    pub kind: TurnKind,
    pub reply: String,
    pub notification: Option<Notification>,
}
