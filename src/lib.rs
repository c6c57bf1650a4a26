//! Terminal chat assistant with hosted long-term memory.
//!
//! Every turn retrieves up to eight memories relevant to the user's message, injects them into
//! the system prompt, asks the selected model for a reply, and stores the exchange back into
//! the memory service. Typing `UPDATE_MEM` audits all stored memories against the recent
//! conversation; after a yes/no confirmation the recent conversation is resubmitted so the
//! memory service can resolve the contradictions it reported.
//!
//! | Model | Provider |
//! |-------|----------|
//! | `gpt-4o-mini` | OpenAI |
//! | `grok-beta` | xAI |
//! | `claude-3-5-sonnet-20241022` | Anthropic |
//! | `gemini-1.5-flash`, `gemini-2.0-flash` | Google |
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`error`] — Typed remote-call failures and turn failures
//! - [`message`] — Role-tagged messages shared by every component
//! - [`models`] — The fixed model catalog and provider routing
//! - [`memory`] — Memory store trait and hosted REST client
//! - [`completion`] — Completion trait and multi-provider client
//! - [`session`] — Session state and the turn controller

pub mod completion;
pub mod config;
pub mod error;
pub mod memory;
pub mod message;
pub mod models;
pub mod session;
