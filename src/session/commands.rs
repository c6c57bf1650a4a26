//! Exact-match command and keyword detection.
//!
//! Matching is deliberately literal: a sentinel command, a closed affirmative allow-list, and
//! substring keywords. There is no intent classification.

/// Input that triggers a memory audit, compared after trim + uppercase.
pub const AUDIT_COMMAND: &str = "UPDATE_MEM";

/// Inputs accepted as "yes" while a memory update awaits confirmation.
pub const AFFIRMATIVE_REPLIES: [&str; 4] = ["YES", "Y", "PROCEED", "OK"];

/// Lower-case substrings that mark a message as explicit teaching.
pub const TEACHING_KEYWORDS: [&str; 4] = ["remember", "correct:", "my preference", "teach"];

fn normalize(input: &str) -> String {
    input.trim().to_uppercase()
}

pub fn is_audit_command(input: &str) -> bool {
    normalize(input) == AUDIT_COMMAND
}

pub fn is_affirmative(input: &str) -> bool {
    let normalized = normalize(input);
    AFFIRMATIVE_REPLIES.contains(&normalized.as_str())
}

pub fn mentions_teaching(input: &str) -> bool {
    let lowered = input.to_lowercase();
    TEACHING_KEYWORDS.iter().any(|k| lowered.contains(k))
}
