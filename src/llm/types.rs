//! Common types for LLM interactions

use serde::{Deserialize, Serialize};

/// Completion request: one self-contained session
#[derive(Debug, Clone)]
pub struct LlmRequest {
    /// Prior turns supplied by the caller, oldest first
    pub history: Vec<ConversationTurn>,
    /// The assembled prompt sent as the new user turn
    pub prompt: String,
    pub options: GenerationOptions,
}

/// Generation options bag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    pub max_output_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_output_tokens: Some(500),
            temperature: Some(0.7),
        }
    }
}

/// A single turn of caller-supplied conversation history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub text: String,
}

impl ConversationTurn {
    #[allow(dead_code)] // Constructor for API completeness
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }
}

/// Speaker of a history turn.
///
/// Roles other than `user` and `assistant` are kept verbatim and forwarded
/// to the provider unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    User,
    Assistant,
    Other(String),
}

impl Role {
    /// Role name in Gemini's vocabulary
    pub fn provider_name(&self) -> &str {
        match self {
            Role::User => "user",
            Role::Assistant => "model",
            Role::Other(role) => role,
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "user" => Role::User,
            "assistant" => Role::Assistant,
            _ => Role::Other(value),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::User => "user".to_string(),
            Role::Assistant => "assistant".to_string(),
            Role::Other(role) => role,
        }
    }
}

/// LLM response
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub text: String,
    pub end_turn: bool,
    pub usage: Usage,
}

impl LlmResponse {
    #[cfg(test)]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            end_turn: true,
            usage: Usage::default(),
        }
    }
}

/// Usage statistics
#[derive(Debug, Clone, Copy, Default)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}
