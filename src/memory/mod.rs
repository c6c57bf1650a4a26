//! Long-term memory store.
//!
//! Provides the [`MemoryStore`] trait the session controller talks to, and
//! [`client::HostedMemoryClient`], which implements it against the hosted memory REST API.
//! Deduplication and contradiction resolution on `add` belong to the store, not to us.

pub mod client;
pub mod types;

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::message::Message;
use types::{MemoryListing, MemoryRecord};

/// Per-user semantic fact storage.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Nearest-neighbor search for memories relevant to `query`, at most `limit` results.
    async fn search(
        &self,
        query: &str,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<MemoryRecord>, ServiceError>;

    /// Read every memory of `user_id`, stopping once `cap` records have been collected.
    async fn list_all(&self, user_id: &str, cap: usize) -> Result<MemoryListing, ServiceError>;

    /// Append messages; the store extracts, merges and resolves facts itself.
    async fn add(&self, messages: &[Message], user_id: &str) -> Result<(), ServiceError>;
}
