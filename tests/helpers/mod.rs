#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use memchat::completion::CompletionService;
use memchat::error::{Service, ServiceError};
use memchat::memory::types::{MemoryListing, MemoryRecord};
use memchat::memory::MemoryStore;
use memchat::message::Message;
use memchat::models::ModelId;
use memchat::session::controller::{ControllerSettings, SessionController};

/// One recorded memory-store call.
#[derive(Debug, Clone, PartialEq)]
pub enum MemoryCall {
    Search {
        query: String,
        user_id: String,
        limit: usize,
    },
    ListAll {
        user_id: String,
        cap: usize,
    },
    Add {
        messages: Vec<Message>,
        user_id: String,
    },
}

/// In-process memory store that records every call.
#[derive(Default)]
pub struct RecordingMemoryStore {
    pub search_results: Mutex<Vec<MemoryRecord>>,
    pub all_records: Mutex<Vec<MemoryRecord>>,
    pub calls: Mutex<Vec<MemoryCall>>,
    /// When set, every call fails with a connectivity error.
    pub fail: Mutex<bool>,
    /// When set, only `add` fails.
    pub fail_adds: Mutex<bool>,
}

impl RecordingMemoryStore {
    pub fn with_memories(memories: &[&str]) -> Self {
        let records: Vec<MemoryRecord> = memories.iter().map(|m| MemoryRecord::new(*m)).collect();
        let store = Self::default();
        *store.search_results.lock().unwrap() = records.clone();
        *store.all_records.lock().unwrap() = records;
        store
    }

    pub fn calls(&self) -> Vec<MemoryCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn adds(&self) -> Vec<Vec<Message>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                MemoryCall::Add { messages, .. } => Some(messages),
                _ => None,
            })
            .collect()
    }

    fn check_fail(&self) -> Result<(), ServiceError> {
        if *self.fail.lock().unwrap() {
            return Err(ServiceError::Connectivity {
                service: Service::Memory,
                message: "connection refused".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl MemoryStore for RecordingMemoryStore {
    async fn search(
        &self,
        query: &str,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<MemoryRecord>, ServiceError> {
        self.calls.lock().unwrap().push(MemoryCall::Search {
            query: query.into(),
            user_id: user_id.into(),
            limit,
        });
        self.check_fail()?;
        let mut results = self.search_results.lock().unwrap().clone();
        results.truncate(limit);
        Ok(results)
    }

    async fn list_all(&self, user_id: &str, cap: usize) -> Result<MemoryListing, ServiceError> {
        self.calls.lock().unwrap().push(MemoryCall::ListAll {
            user_id: user_id.into(),
            cap,
        });
        self.check_fail()?;
        let mut records = self.all_records.lock().unwrap().clone();
        let truncated = records.len() > cap;
        records.truncate(cap);
        Ok(MemoryListing { records, truncated })
    }

    async fn add(&self, messages: &[Message], user_id: &str) -> Result<(), ServiceError> {
        self.calls.lock().unwrap().push(MemoryCall::Add {
            messages: messages.to_vec(),
            user_id: user_id.into(),
        });
        self.check_fail()?;
        if *self.fail_adds.lock().unwrap() {
            return Err(ServiceError::Status {
                service: Service::Memory,
                status: 500,
                message: "internal error".into(),
            });
        }
        Ok(())
    }
}

/// One recorded completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionCall {
    pub model: ModelId,
    pub messages: Vec<Message>,
    pub temperature: f32,
}

/// Completion service that answers from a queue of scripted replies.
#[derive(Default)]
pub struct ScriptedCompletion {
    replies: Mutex<VecDeque<Result<String, ServiceError>>>,
    pub calls: Mutex<Vec<CompletionCall>>,
}

impl ScriptedCompletion {
    pub fn replying(replies: &[&str]) -> Self {
        let completion = Self::default();
        for r in replies {
            completion.push_reply(r);
        }
        completion
    }

    pub fn push_reply(&self, reply: &str) {
        self.replies.lock().unwrap().push_back(Ok(reply.to_string()));
    }

    pub fn push_error(&self, err: ServiceError) {
        self.replies.lock().unwrap().push_back(Err(err));
    }

    pub fn calls(&self) -> Vec<CompletionCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionService for ScriptedCompletion {
    async fn complete(
        &self,
        model: ModelId,
        messages: &[Message],
        temperature: f32,
    ) -> Result<String, ServiceError> {
        self.calls.lock().unwrap().push(CompletionCall {
            model,
            messages: messages.to_vec(),
            temperature,
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("Sure.".to_string()))
    }
}

/// Controller wired to the given fakes with default settings.
pub fn controller(
    memory: &Arc<RecordingMemoryStore>,
    completion: &Arc<ScriptedCompletion>,
) -> SessionController {
    SessionController::new(
        memory.clone(),
        completion.clone(),
        ControllerSettings::default(),
    )
}

pub const CONTRADICTION_REPORT: &str = "1. Old: \"Lives in Oslo\"\n   New: \"Moved to Lyon\"\n   Conflict: \"City of residence changed\"\n\nDo you want to proceed with updating the memories?";
