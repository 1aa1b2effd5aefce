//! Dynamic context from the marketing page
//!
//! The page is re-read and re-parsed on every call; nothing is cached.

mod extract;
mod format;

pub use extract::extract;
pub use format::format_context;

/// Fields projected out of the site's HTML
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebContentSnapshot {
    pub title: String,
    pub description: String,
    pub hero_text: String,
    pub services: Vec<Service>,
    /// Deduplicated, in first-seen order
    pub technologies: Vec<String>,
}

/// A service card
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Service {
    pub name: String,
    pub description: String,
    pub features: Vec<String>,
}
