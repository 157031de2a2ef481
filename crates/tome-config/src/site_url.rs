//! Base URL handling.
//!
//! The site URL is injected per deployment target by rewriting the
//! `site_url = "..."` line of the raw configuration text before it is parsed.
//! Problems with the URL are reported as warnings only: a malformed base URL
//! yields an artifact with broken asset links, which is a deployment error
//! rather than a build failure.

use std::fmt;

/// Production URL used when neither the config file nor the build overrides it.
pub const DEFAULT_SITE_URL: &str = "https://docs.example.com/";

/// Configuration key rewritten by [`substitute_site_url`].
const SITE_URL_KEY: &str = "site_url";

/// Replace the top-level `site_url` assignment in raw TOML text.
///
/// Only assignments before the first `[table]` header are considered. When no
/// such assignment exists, one is prepended. All other lines are kept verbatim.
#[must_use]
pub fn substitute_site_url(raw: &str, site_url: &str) -> String {
    let replacement = format!("{SITE_URL_KEY} = \"{}\"", escape_toml_basic(site_url));
    let mut out = String::with_capacity(raw.len() + replacement.len() + 1);
    let mut replaced = false;
    let mut in_root_table = true;
    let mut nesting = ValueNesting::default();

    for line in raw.split_inclusive('\n') {
        let trimmed = line.trim_start();
        let at_key = nesting.at_top();
        if at_key && trimmed.starts_with('[') {
            in_root_table = false;
        }
        nesting.feed(line);
        if at_key && in_root_table && !replaced && is_site_url_assignment(trimmed) {
            out.push_str(&replacement);
            if line.ends_with('\n') {
                out.push('\n');
            }
            replaced = true;
        } else {
            out.push_str(line);
        }
    }

    if replaced {
        out
    } else {
        format!("{replacement}\n{out}")
    }
}

/// Open brackets and multi-line strings carried over from previous lines.
///
/// A line only starts a key or a table header when nothing is open, so rows
/// of a multi-line array are never mistaken for `[table]` headers.
#[derive(Debug, Default)]
struct ValueNesting {
    depth: usize,
    multiline: Option<&'static str>,
}

impl ValueNesting {
    fn at_top(&self) -> bool {
        self.depth == 0 && self.multiline.is_none()
    }

    fn feed(&mut self, line: &str) {
        let mut rest = line;
        loop {
            if let Some(delim) = self.multiline {
                let Some(end) = rest.find(delim) else {
                    return;
                };
                rest = &rest[end + delim.len()..];
                self.multiline = None;
            }
            let Some(pos) = rest.find(['[', ']', '{', '}', '"', '\'', '#']) else {
                return;
            };
            let c = rest.as_bytes()[pos];
            rest = &rest[pos + 1..];
            match c {
                b'[' | b'{' => self.depth += 1,
                b']' | b'}' => self.depth = self.depth.saturating_sub(1),
                b'#' => return,
                b'"' if rest.starts_with("\"\"") => {
                    self.multiline = Some("\"\"\"");
                    rest = &rest[2..];
                }
                b'\'' if rest.starts_with("''") => {
                    self.multiline = Some("'''");
                    rest = &rest[2..];
                }
                quote => rest = skip_string(rest, quote),
            }
        }
    }
}

/// Skip past the closing quote of a single-line string.
fn skip_string(rest: &str, quote: u8) -> &str {
    let bytes = rest.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if quote == b'"' => i += 2,
            b if b == quote => return &rest[i + 1..],
            _ => i += 1,
        }
    }
    ""
}

/// Check whether a (left-trimmed) line assigns the `site_url` key.
fn is_site_url_assignment(line: &str) -> bool {
    let quoted = format!("\"{SITE_URL_KEY}\"");
    let Some(rest) = line
        .strip_prefix(quoted.as_str())
        .or_else(|| line.strip_prefix(SITE_URL_KEY))
    else {
        return false;
    };
    rest.trim_start().starts_with('=')
}

/// Escape a string for a TOML basic (double-quoted) string.
fn escape_toml_basic(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// A problem detected in a site URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteUrlIssue {
    /// The URL is empty.
    Empty,
    /// The URL does not use `http://` or `https://`.
    UnsupportedScheme,
    /// The URL does not end with `/`.
    MissingTrailingSlash,
}

impl fmt::Display for SiteUrlIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::Empty => "site_url is empty",
            Self::UnsupportedScheme => "site_url must start with http:// or https://",
            Self::MissingTrailingSlash => "site_url must end with a trailing slash",
        };
        f.write_str(msg)
    }
}

/// Inspect a site URL for problems that break asset references.
#[must_use]
pub fn check_site_url(site_url: &str) -> Vec<SiteUrlIssue> {
    if site_url.is_empty() {
        return vec![SiteUrlIssue::Empty];
    }
    let mut issues = Vec::new();
    if !site_url.starts_with("http://") && !site_url.starts_with("https://") {
        issues.push(SiteUrlIssue::UnsupportedScheme);
    }
    if !site_url.ends_with('/') {
        issues.push(SiteUrlIssue::MissingTrailingSlash);
    }
    issues
}
