//! HTML projection into a [`WebContentSnapshot`]

use super::{Service, WebContentSnapshot};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("cannot read site document {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
}

struct Selectors {
    title: Selector,
    description: Selector,
    hero: Selector,
    service_card: Selector,
    service_name: Selector,
    service_description: Selector,
    service_feature: Selector,
    technology: Selector,
}

static SELECTORS: LazyLock<Selectors> = LazyLock::new(|| {
    let parse = |s: &str| Selector::parse(s).expect("static selector");
    Selectors {
        title: parse("title"),
        description: parse(r#"meta[name="description"]"#),
        hero: parse(".hero p"),
        service_card: parse(".service-card"),
        service_name: parse("h3"),
        service_description: parse("p"),
        service_feature: parse("li"),
        technology: parse(".tech-item span"),
    }
});

/// Read and parse the page. Failures are logged and yield `None`, which
/// callers treat as "no dynamic context".
pub async fn extract(path: &Path) -> Option<WebContentSnapshot> {
    match try_extract(path).await {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            tracing::warn!(error = %e, "Site content unavailable");
            None
        }
    }
}

async fn try_extract(path: &Path) -> Result<WebContentSnapshot, ExtractError> {
    let html = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ExtractError::Read {
            path: path.display().to_string(),
            source,
        })?;
    // The parsed document is not Send; keep it out of any await
    Ok(parse_document(&html))
}

/// Project the fields out of an HTML string. Missing elements yield empty
/// values.
pub(crate) fn parse_document(html: &str) -> WebContentSnapshot {
    let doc = Html::parse_document(html);
    let sel = &*SELECTORS;

    let title = doc
        .select(&sel.title)
        .next()
        .map(element_text)
        .unwrap_or_default();

    let description = doc
        .select(&sel.description)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(collapse_whitespace)
        .unwrap_or_default();

    let hero_text = doc
        .select(&sel.hero)
        .next()
        .map(element_text)
        .unwrap_or_default();

    let services = doc
        .select(&sel.service_card)
        .map(|card| Service {
            name: card
                .select(&sel.service_name)
                .next()
                .map(element_text)
                .unwrap_or_default(),
            description: card
                .select(&sel.service_description)
                .next()
                .map(element_text)
                .unwrap_or_default(),
            features: card
                .select(&sel.service_feature)
                .map(element_text)
                .filter(|f| !f.is_empty())
                .collect(),
        })
        .collect();

    let mut seen = HashSet::new();
    let technologies = doc
        .select(&sel.technology)
        .map(element_text)
        .filter(|t| !t.is_empty() && seen.insert(t.clone()))
        .collect();

    WebContentSnapshot {
        title,
        description,
        hero_text,
        services,
        technologies,
    }
}

fn element_text(el: ElementRef<'_>) -> String {
    collapse_whitespace(&el.text().collect::<String>())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
