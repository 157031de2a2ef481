//! Client-side search index (`search/search_index.json`).
//!
//! Locations are relative to the site root; the theme script prefixes them
//! with the base URL it was loaded from.

use serde::Serialize;

use crate::builder::page_location;

/// Search index document.
#[derive(Debug, Serialize)]
pub(crate) struct SearchIndex {
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Serialize)]
struct SearchDoc {
    location: String,
    title: String,
    text: String,
}

impl SearchIndex {
    pub(crate) fn new() -> Self {
        Self { docs: Vec::new() }
    }

    /// Add a rendered page.
    pub(crate) fn push(&mut self, path: &str, title: &str, text: &str) {
        self.docs.push(SearchDoc {
            location: page_location(path),
            title: title.to_owned(),
            text: text.to_owned(),
        });
    }

    /// Serialize to JSON.
    pub(crate) fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
