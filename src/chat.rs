//! Chat request pipeline
//!
//! Received -> FAQ lookup -> (hit) reply with canned text
//!                        -> (miss) extract page -> format context
//!                           -> assemble prompt -> one completion call
//!
//! No retries: an upstream failure is returned to the caller as is.

use crate::knowledge::{find_answer, KnowledgeBase};
use crate::llm::{ConversationTurn, GenerationOptions, LlmError, LlmRequest, LlmService};
use crate::prompt::build_prompt;
use crate::site::{extract, format_context};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{0}")]
    Validation(String),
    #[error("completion failed: {0}")]
    Upstream(#[from] LlmError),
}

/// A validated chat request
#[derive(Debug, Clone)]
pub struct ChatInput {
    pub message: String,
    pub history: Vec<ConversationTurn>,
}

impl ChatInput {
    /// Validate the boundary fields. The message must be present and contain
    /// something other than whitespace.
    pub fn new(message: Option<String>, history: Vec<ConversationTurn>) -> Result<Self, ChatError> {
        match message {
            Some(message) if !message.trim().is_empty() => Ok(Self { message, history }),
            _ => Err(ChatError::Validation(
                "Mensaje de usuario no proporcionado.".to_string(),
            )),
        }
    }
}

/// Where a reply came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    Faq,
    Completion,
}

#[derive(Debug, Clone)]
pub struct ChatReply {
    pub text: String,
    pub source: ReplySource,
}

/// Orchestrates FAQ lookup, context extraction and completion
pub struct ChatHandler {
    knowledge: Arc<KnowledgeBase>,
    site_path: PathBuf,
    llm: Arc<dyn LlmService>,
    options: GenerationOptions,
}

impl ChatHandler {
    pub fn new(
        knowledge: Arc<KnowledgeBase>,
        site_path: PathBuf,
        llm: Arc<dyn LlmService>,
        options: GenerationOptions,
    ) -> Self {
        Self {
            knowledge,
            site_path,
            llm,
            options,
        }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn site_path(&self) -> &std::path::Path {
        &self.site_path
    }

    pub async fn handle(&self, input: ChatInput) -> Result<ChatReply, ChatError> {
        if let Some(answer) = find_answer(&input.message, &self.knowledge) {
            tracing::info!("Answered from FAQ");
            return Ok(ChatReply {
                text: answer.to_string(),
                source: ReplySource::Faq,
            });
        }

        let snapshot = extract(&self.site_path).await;
        tracing::debug!(has_context = snapshot.is_some(), "Site context extracted");
        let context = format_context(snapshot.as_ref());

        let request = LlmRequest {
            history: input.history,
            prompt: build_prompt(&context, &input.message),
            options: self.options,
        };

        let response = self.llm.complete(&request).await?;
        Ok(ChatReply {
            text: response.text,
            source: ReplySource::Completion,
        })
    }
}
