//! YAML front matter parsing.
//!
//! A document may start with a YAML block delimited by `---` lines:
//!
//! ```text
//! ---
//! title: Transactional outbox
//! description: Reliable event publishing
//! ---
//! # Outbox
//! ```

use serde::Deserialize;

/// Fields recognized in front matter. Unknown keys are ignored.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct FrontMatter {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Split a document into its front matter block (if any) and body.
pub(crate) fn split_front_matter(content: &str) -> (Option<&str>, &str) {
    let Some(rest) = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))
    else {
        return (None, content);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed == "---" || trimmed == "..." {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (Some(yaml), body);
        }
        offset += line.len();
    }

    // Unterminated block: treat the whole file as markdown
    (None, content)
}

/// Parse front matter YAML.
///
/// Empty blocks yield the default (all fields unset).
pub(crate) fn parse_front_matter(yaml: &str) -> Result<FrontMatter, serde_yaml::Error> {
    if yaml.trim().is_empty() {
        return Ok(FrontMatter::default());
    }
    serde_yaml::from_str(yaml)
}
