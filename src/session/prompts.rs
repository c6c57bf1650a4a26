//! Prompt text and fixed replies.

use crate::memory::types::MemoryRecord;
use crate::message::Message;

/// Exact reply the auditor is told to give when memory is consistent.
pub const NO_CONTRADICTIONS: &str = "No contradictions found.";

pub const NO_PRIOR_MEMORIES: &str = "No prior memories yet.";

pub const UPDATE_APPLIED_REPLY: &str =
    "✅ Memories successfully updated!\nAll contradictions resolved using latest information.";
pub const NOTHING_TO_UPDATE_REPLY: &str = "No recent data to update.";
pub const UPDATE_CANCELLED_REPLY: &str = "Update cancelled. Continuing normal conversation.";

pub const TAUGHT_NOTICE: &str = "🧠 Taught and remembered forever!";

const PERSONA: &str = "You are a warm, intelligent, long-term adaptive AI assistant.\n\
You remember EVERYTHING important about the user.";

/// System prompt for a normal chat turn.
pub fn chat_system_prompt(memories: &[MemoryRecord]) -> String {
    let memories_str = if memories.is_empty() {
        NO_PRIOR_MEMORIES.to_string()
    } else {
        memories
            .iter()
            .map(|m| format!("• {}", m.memory))
            .collect::<Vec<_>>()
            .join("\n")
    };
    format!("{PERSONA}\nRelevant memories:\n{memories_str}")
}

/// Prompt asking the model to list contradictions between stored memories and `recent`.
///
/// `truncated` adds a note that only part of the store was read.
pub fn audit_prompt(memories: &[MemoryRecord], recent: &[Message], truncated: bool) -> String {
    let memories_str = if memories.is_empty() {
        "No memories yet.".to_string()
    } else {
        let mut lines: Vec<String> = memories.iter().map(|m| m.memory.clone()).collect();
        if truncated {
            lines.push(format!(
                "(Only the first {} stored memories are shown.)",
                memories.len()
            ));
        }
        lines.join("\n")
    };

    let recent_str = if recent.is_empty() {
        "No recent conversation.".to_string()
    } else {
        recent
            .iter()
            .map(|m| format!("{}: {}", m.role, m.content))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"You are an expert memory auditor.
Analyze these stored memories and the recent conversation for any contradictions, outdated facts, or conflicts.

Stored memories:
{memories_str}

Recent conversation:
{recent_str}

List every contradiction clearly like:
1. Old: "..."
   New: "..."
   Conflict: "..."

If no contradictions, reply exactly: "{NO_CONTRADICTIONS}"

End with: "Do you want to proceed with updating the memories?" "#
    )
}
