//! Link resolution against the content tree.

use percent_encoding::percent_decode_str;
use tome_renderer::{LinkResolver, Resolution};

use crate::site::{Page, Site, file_href, page_href};

/// Resolves relative links found in one page's markdown.
///
/// Destinations are interpreted relative to the page's source file. Links to
/// `*.md` sources become directory URLs of the target page; links to other
/// files are re-rooted at the page's output directory.
pub struct PageLinks<'a> {
    site: &'a Site,
    page: &'a Page,
}

impl<'a> PageLinks<'a> {
    /// Create a resolver for links on `page`.
    #[must_use]
    pub fn new(site: &'a Site, page: &'a Page) -> Self {
        Self { site, page }
    }

    /// Directory of the page's source file ("" at the root).
    fn source_dir(&self) -> &str {
        self.page
            .source
            .rsplit_once('/')
            .map_or("", |(dir, _)| dir)
    }
}

impl LinkResolver for PageLinks<'_> {
    fn resolve(&self, dest: &str) -> Resolution {
        let split = dest.find(['#', '?']).unwrap_or(dest.len());
        let (target, suffix) = dest.split_at(split);
        if target.is_empty() {
            return Resolution::Keep;
        }

        // Outside the source tree: nothing to map it to.
        let Some(normalized) = normalize(self.source_dir(), target) else {
            return Resolution::Keep;
        };

        if is_markdown_target(&normalized) {
            let Ok(decoded) = percent_decode_str(&normalized).decode_utf8() else {
                return Resolution::Broken;
            };
            return match self.site.page_by_source(&decoded) {
                Some(page) => Resolution::Rewrite(format!(
                    "{}{suffix}",
                    page_href(&self.page.path, &page.path)
                )),
                None => Resolution::Broken,
            };
        }

        let mut href = file_href(&self.page.path, &normalized);
        if target.ends_with('/') && !href.ends_with('/') {
            href.push('/');
        }
        Resolution::Rewrite(format!("{href}{suffix}"))
    }
}

fn is_markdown_target(path: &str) -> bool {
    path.rsplit('/')
        .next()
        .is_some_and(|name| name.len() > 3 && name.ends_with(".md"))
}

/// Join `target` onto `base` and collapse `.` and `..` segments.
///
/// Returns `None` when the result would leave the root.
fn normalize(base: &str, target: &str) -> Option<String> {
    let mut segments: Vec<&str> = base.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            s => segments.push(s),
        }
    }
    Some(segments.join("/"))
}
