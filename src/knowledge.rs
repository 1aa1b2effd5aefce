//! Static FAQ knowledge base
//!
//! Loaded once at startup from a JSON object of the form
//! `{"topic": {"keywords": [...], "response": "..."}}`. Topic order in the
//! file is kept and drives the matcher's first-match rule.

mod faq;

pub use faq::find_answer;

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Failure to load the knowledge base file
#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("cannot read knowledge base {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid knowledge base {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// One FAQ topic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeEntry {
    pub key: String,
    pub keywords: Vec<String>,
    pub response: String,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    keywords: Vec<String>,
    response: String,
}

/// Immutable, ordered set of FAQ entries
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
}

impl KnowledgeBase {
    pub fn new(entries: Vec<KnowledgeEntry>) -> Self {
        Self { entries }
    }

    /// Load and validate the knowledge base file.
    pub fn load(path: &Path) -> Result<Self, KnowledgeError> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| KnowledgeError::Read {
            path: display.clone(),
            source,
        })?;
        Self::from_json(&content).map_err(|source| KnowledgeError::Parse {
            path: display,
            source,
        })
    }

    /// Load, or fall back to an empty base with a warning.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(base) => {
                if base.is_empty() {
                    tracing::warn!(path = %path.display(), "Knowledge base has no entries");
                } else {
                    tracing::info!(path = %path.display(), entries = base.len(), "Knowledge base loaded");
                }
                base
            }
            Err(e) => {
                tracing::warn!(error = %e, "Knowledge base unavailable, continuing without FAQs");
                Self::default()
            }
        }
    }

    fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        // serde_json's preserve_order keeps topics in declared order
        let raw: serde_json::Map<String, serde_json::Value> = serde_json::from_str(content)?;
        let entries = raw
            .into_iter()
            .map(|(key, value)| {
                let RawEntry { keywords, response } = serde_json::from_value(value)?;
                Ok::<_, serde_json::Error>(KnowledgeEntry {
                    key,
                    keywords,
                    response,
                })
            })
            .collect::<Result<Vec<_>, serde_json::Error>>()?;
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.key.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"{
        "servicios": {
            "keywords": ["servicios", "qué hacéis"],
            "response": "Ofrecemos desarrollo web a medida."
        },
        "precios": {
            "keywords": ["precio", "cuesta"],
            "response": "Cada presupuesto es personalizado."
        },
        "contacto": {
            "keywords": ["contacto", "email"],
            "response": "Escríbenos desde el formulario."
        }
    }"#;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_keeps_declared_order() {
        let file = write_temp(SAMPLE);
        let base = KnowledgeBase::load(file.path()).unwrap();
        assert_eq!(base.len(), 3);
        assert_eq!(base.keys(), vec!["servicios", "precios", "contacto"]);
        assert_eq!(base.entries()[1].keywords, vec!["precio", "cuesta"]);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = KnowledgeBase::load(Path::new("/nonexistent/knowledge-base.json")).unwrap_err();
        assert!(matches!(err, KnowledgeError::Read { .. }));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let file = write_temp("{ not json");
        let err = KnowledgeBase::load(file.path()).unwrap_err();
        assert!(matches!(err, KnowledgeError::Parse { .. }));
    }

    #[test]
    fn test_entry_without_response_is_rejected() {
        let file = write_temp(r#"{"servicios": {"keywords": ["servicios"]}}"#);
        assert!(KnowledgeBase::load(file.path()).is_err());
    }

    #[test]
    fn test_load_or_empty_degrades() {
        let file = write_temp("[1, 2, 3]");
        let base = KnowledgeBase::load_or_empty(file.path());
        assert!(base.is_empty());
        assert!(base.keys().is_empty());
    }
}
