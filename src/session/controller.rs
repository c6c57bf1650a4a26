//! The turn controller.
//!
//! [`SessionController::handle_turn`] appends the user message, dispatches on [`TurnPath`],
//! and runs the remote calls of that path strictly in sequence. A remote failure aborts the
//! turn with a [`TurnError`]; nothing is retried.

use std::sync::Arc;

use crate::completion::CompletionService;
use crate::config::MemchatConfig;
use crate::error::{TurnError, TurnStage};
use crate::memory::MemoryStore;
use crate::message::Message;

use super::commands;
use super::prompts;
use super::{Notification, SessionState, TurnKind, TurnOutcome, TurnPath};

/// Tunables for the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSettings {
    pub search_limit: usize,
    pub recent_window: usize,
    pub audit_max_memories: usize,
    pub chat_temperature: f32,
    pub audit_temperature: f32,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            search_limit: 8,
            recent_window: 40,
            audit_max_memories: 500,
            chat_temperature: 0.7,
            audit_temperature: 0.3,
        }
    }
}

impl From<&MemchatConfig> for ControllerSettings {
    fn from(config: &MemchatConfig) -> Self {
        Self {
            search_limit: config.memory.search_limit,
            recent_window: config.session.recent_window,
            audit_max_memories: config.memory.audit_max_memories,
            chat_temperature: config.completion.chat_temperature,
            audit_temperature: config.completion.audit_temperature,
        }
    }
}

/// Decides and runs each turn against the memory store and completion service.
#[derive(Clone)]
pub struct SessionController {
    memory: Arc<dyn MemoryStore>,
    completion: Arc<dyn CompletionService>,
    settings: ControllerSettings,
}

impl SessionController {
    pub fn new(
        memory: Arc<dyn MemoryStore>,
        completion: Arc<dyn CompletionService>,
        settings: ControllerSettings,
    ) -> Self {
        Self {
            memory,
            completion,
            settings,
        }
    }

    /// Process one user message.
    ///
    /// The message is appended to the transcript before dispatch. On success the reply is
    /// appended too; on failure the transcript ends with the unanswered user message.
    pub async fn handle_turn(
        &self,
        state: &mut SessionState,
        input: &str,
    ) -> Result<TurnOutcome, TurnError> {
        let path = TurnPath::classify(state, input);
        tracing::info!(
            session_id = %state.session_id,
            user_id = %state.user_id,
            model = %state.model,
            %path,
            "handling turn"
        );

        state.transcript.push(Message::user(input));

        let outcome = match path {
            TurnPath::Audit => self.audit(state).await?,
            TurnPath::Confirmation => self.confirm(state, input).await?,
            TurnPath::Chat => self.chat(state, input).await?,
        };

        Ok(outcome)
    }

    async fn audit(&self, state: &mut SessionState) -> Result<TurnOutcome, TurnError> {
        let listing = self
            .memory
            .list_all(&state.user_id, self.settings.audit_max_memories)
            .await
            .map_err(|e| TurnError::new(TurnStage::ReadingAllMemories, e))?;

        if listing.truncated {
            tracing::warn!(
                user_id = %state.user_id,
                cap = self.settings.audit_max_memories,
                "memory audit truncated at cap; raise memory.audit_max_memories to scan more"
            );
        }

        let prompt = prompts::audit_prompt(
            &listing.records,
            state.recent(self.settings.recent_window),
            listing.truncated,
        );

        let analysis = self
            .completion
            .complete(
                state.model,
                &[Message::user(prompt)],
                self.settings.audit_temperature,
            )
            .await
            .map_err(|e| TurnError::new(TurnStage::Auditing, e))?;

        let contradictions_found = !analysis.contains(prompts::NO_CONTRADICTIONS);
        state.awaiting_confirmation = contradictions_found;
        state.transcript.push(Message::assistant(analysis.clone()));

        tracing::info!(
            memories = listing.records.len(),
            contradictions_found,
            "memory audit complete"
        );

        Ok(TurnOutcome {
            kind: TurnKind::Audit {
                contradictions_found,
                memories_scanned: listing.records.len(),
                truncated: listing.truncated,
            },
            reply: analysis,
            notification: None,
        })
    }

    async fn confirm(
        &self,
        state: &mut SessionState,
        input: &str,
    ) -> Result<TurnOutcome, TurnError> {
        // Any message consumes the pending confirmation, whatever happens below.
        state.awaiting_confirmation = false;

        if !commands::is_affirmative(input) {
            tracing::info!(
                input_len = input.len(),
                "input outside the confirmation allow-list; memory update cancelled"
            );
            return Ok(fixed_reply(
                state,
                TurnKind::UpdateCancelled,
                prompts::UPDATE_CANCELLED_REPLY,
            ));
        }

        let recent = state.recent_without_system(self.settings.recent_window);
        if recent.is_empty() {
            return Ok(fixed_reply(
                state,
                TurnKind::NothingToUpdate,
                prompts::NOTHING_TO_UPDATE_REPLY,
            ));
        }

        self.memory
            .add(&recent, &state.user_id)
            .await
            .map_err(|e| TurnError::new(TurnStage::SavingMemories, e))?;

        tracing::info!(messages = recent.len(), "recent conversation resubmitted to memory");

        Ok(fixed_reply(
            state,
            TurnKind::UpdateApplied {
                messages_submitted: recent.len(),
            },
            prompts::UPDATE_APPLIED_REPLY,
        ))
    }

    async fn chat(&self, state: &mut SessionState, input: &str) -> Result<TurnOutcome, TurnError> {
        let memories = self
            .memory
            .search(input, &state.user_id, self.settings.search_limit)
            .await
            .map_err(|e| TurnError::new(TurnStage::SearchingMemories, e))?;

        let system_prompt = prompts::chat_system_prompt(&memories);
        let messages = [Message::system(system_prompt), Message::user(input)];

        let reply = self
            .completion
            .complete(state.model, &messages, self.settings.chat_temperature)
            .await
            .map_err(|e| TurnError::new(TurnStage::Generating, e))?;

        // The reply joins the transcript only once the exchange is stored.
        self.memory
            .add(
                &[Message::user(input), Message::assistant(reply.clone())],
                &state.user_id,
            )
            .await
            .map_err(|e| TurnError::new(TurnStage::SavingMemories, e))?;

        state.transcript.push(Message::assistant(reply.clone()));

        let notification = commands::mentions_teaching(input).then_some(Notification::Taught);

        tracing::debug!(
            memories_used = memories.len(),
            taught = notification.is_some(),
            "chat turn complete"
        );

        Ok(TurnOutcome {
            kind: TurnKind::Chat {
                memories_used: memories.len(),
            },
            reply,
            notification,
        })
    }
}

/// Append a fixed assistant reply and build the outcome for it.
fn fixed_reply(state: &mut SessionState, kind: TurnKind, text: &str) -> TurnOutcome {
    state.transcript.push(Message::assistant(text));
    TurnOutcome {
        kind,
        reply: text.to_string(),
        notification: None,
    }
}
