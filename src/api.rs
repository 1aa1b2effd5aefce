//! HTTP API for the chat backend

mod handlers;
mod types;

pub use handlers::create_router;

use crate::chat::ChatHandler;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatHandler>,
    pub api_key_configured: bool,
}

impl AppState {
    pub fn new(chat: ChatHandler, api_key_configured: bool) -> Self {
        Self {
            chat: Arc::new(chat),
            api_key_configured,
        }
    }
}
