//! Heading state and HTML helpers.

use std::collections::HashMap;

/// Deepest heading level included in the table of contents.
const TOC_MAX_LEVEL: u8 = 3;

/// Table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TocEntry {
    /// Heading level (2-3).
    pub level: u8,
    /// Heading text.
    pub title: String,
    /// Anchor ID for linking.
    pub id: String,
}

/// Tracks the heading being rendered, title extraction and anchor ids.
pub(crate) struct HeadingState {
    /// Whether to extract title from first H1.
    extract_title: bool,
    /// Extracted title from first H1.
    title: Option<String>,
    /// Level of the heading currently open.
    current_level: Option<u8>,
    /// Plain text of the heading currently open.
    text: String,
    /// Table of contents entries.
    toc: Vec<TocEntry>,
    /// Counter for generating unique heading IDs.
    id_counts: HashMap<String, usize>,
}

impl HeadingState {
    pub(crate) fn new(extract_title: bool) -> Self {
        Self {
            extract_title,
            title: None,
            current_level: None,
            text: String::new(),
            toc: Vec::new(),
            id_counts: HashMap::new(),
        }
    }

    /// Check if we're currently inside a heading.
    pub(crate) fn is_active(&self) -> bool {
        self.current_level.is_some()
    }

    /// Start tracking a heading.
    pub(crate) fn start_heading(&mut self, level: u8) {
        self.current_level = Some(level);
        self.text.clear();
    }

    /// Append text to the open heading.
    pub(crate) fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Complete the open heading and return its anchor id.
    ///
    /// An explicit id (`{#custom}`) is honored but still reserved, so later
    /// generated ids never collide with it.
    pub(crate) fn complete_heading(&mut self, explicit_id: Option<&str>) -> Option<String> {
        let level = self.current_level.take()?;
        let text = std::mem::take(&mut self.text);
        let title = text.trim().to_owned();

        let id = match explicit_id {
            Some(id) => self.reserve_id(id),
            None => self.generate_id(&title),
        };

        let is_title = self.extract_title && level == 1 && self.title.is_none();
        if is_title {
            self.title = Some(title);
        } else if (2..=TOC_MAX_LEVEL).contains(&level) {
            self.toc.push(TocEntry {
                level,
                title,
                id: id.clone(),
            });
        }

        Some(id)
    }

    /// Generate a unique ID for a heading.
    fn generate_id(&mut self, text: &str) -> String {
        let slug = slugify(text);
        let base_id = if slug.is_empty() {
            "section".to_owned()
        } else {
            slug
        };
        self.reserve_id(&base_id)
    }

    fn reserve_id(&mut self, base_id: &str) -> String {
        let count = self.id_counts.entry(base_id.to_owned()).or_default();
        let id = match *count {
            0 => base_id.to_owned(),
            n => format!("{base_id}-{n}"),
        };
        *count += 1;
        id
    }

    /// Take the extracted title.
    pub(crate) fn take_title(&mut self) -> Option<String> {
        self.title.take()
    }

    /// Take the table of contents entries.
    pub(crate) fn take_toc(&mut self) -> Vec<TocEntry> {
        std::mem::take(&mut self.toc)
    }
}

/// Convert text to URL-safe slug.
///
/// Converts to lowercase, replaces whitespace/dashes/underscores with single dashes,
/// and removes other non-alphanumeric characters.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut result = String::new();
    let mut last_was_dash = true; // Prevents leading dash

    for c in text.trim().chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && (c.is_whitespace() || c == '-' || c == '_') {
            result.push('-');
            last_was_dash = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    result
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
