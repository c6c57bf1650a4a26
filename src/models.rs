//! Fixed model catalog and provider routing.
//!
//! | Model ID | Provider |
//! |----------|----------|
//! | `gpt-4o-mini` | OpenAI (default) |
//! | `grok-beta` | xAI |
//! | `claude-3-5-sonnet-20241022` | Anthropic |
//! | `gemini-1.5-flash` | Google |
//! | `gemini-2.0-flash` | Google |
//!
//! Every provider is reached through its OpenAI-compatible chat completions endpoint, so the
//! provider only decides base URL and credentials.

use serde::{Deserialize, Serialize};

/// A model from the supported catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ModelId {
    #[default]
    #[serde(rename = "gpt-4o-mini")]
    Gpt4oMini,
    #[serde(rename = "grok-beta")]
    GrokBeta,
    #[serde(rename = "claude-3-5-sonnet-20241022")]
    Claude35Sonnet,
    #[serde(rename = "gemini-1.5-flash")]
    Gemini15Flash,
    #[serde(rename = "gemini-2.0-flash")]
    Gemini20Flash,
}

impl ModelId {
    /// Catalog order, as shown in model listings.
    pub const ALL: [ModelId; 5] = [
        Self::Gpt4oMini,
        Self::GrokBeta,
        Self::Claude35Sonnet,
        Self::Gemini15Flash,
        Self::Gemini20Flash,
    ];

    /// Wire identifier sent as `model` in completion requests.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gpt4oMini => "gpt-4o-mini",
            Self::GrokBeta => "grok-beta",
            Self::Claude35Sonnet => "claude-3-5-sonnet-20241022",
            Self::Gemini15Flash => "gemini-1.5-flash",
            Self::Gemini20Flash => "gemini-2.0-flash",
        }
    }

    pub fn provider(&self) -> Provider {
        match self {
            Self::Gpt4oMini => Provider::OpenAi,
            Self::GrokBeta => Provider::XAi,
            Self::Claude35Sonnet => Provider::Anthropic,
            Self::Gemini15Flash | Self::Gemini20Flash => Provider::Google,
        }
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ModelId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|m| m.as_str()).collect();
                format!("unknown model: {s}. Supported: {}", known.join(", "))
            })
    }
}

/// Hosted completion provider behind a [`ModelId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    OpenAi,
    XAi,
    Anthropic,
    Google,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::XAi => "xai",
            Self::Anthropic => "anthropic",
            Self::Google => "google",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
