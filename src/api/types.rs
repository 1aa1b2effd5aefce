//! API request and response types

use crate::llm::ConversationTurn;
use serde::{Deserialize, Serialize};

/// Body of `POST /chat`. `message` stays optional here so a missing field
/// is reported as a 400 with our own error body.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    #[serde(default)]
    pub history: Vec<ConversationTurn>,
}

/// Successful chat reply
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// Response for `GET /health`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub api_key: &'static str,
    pub knowledge_base: String,
    pub web_content: &'static str,
}

/// Response for `GET /faq`
#[derive(Debug, Serialize)]
pub struct FaqResponse {
    #[serde(rename = "availableFAQs")]
    pub available_faqs: Vec<String>,
    #[serde(rename = "totalFAQs")]
    pub total_faqs: usize,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}
