//! Loaded content tree.
//!
//! Pages are stored in a flat `Vec<Page>` in reading order: pages reachable
//! from the navigation come first (in navigation order), followed by any
//! remaining pages in source order. Lookups by logical path and by source
//! path go through index maps.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tome_renderer::relative_path;

/// Document page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    /// Resolved title (nav entry, front matter, first H1 or file name).
    pub title: String,
    /// Logical path without leading slash ("" for the root page).
    pub path: String,
    /// Source path relative to the source directory (e.g. `patterns/outbox.md`).
    pub source: String,
    /// Description from front matter.
    pub description: Option<String>,
    /// Markdown body with front matter removed.
    pub markdown: String,
}

impl Page {
    /// Output file of this page relative to the artifact root.
    #[must_use]
    pub fn output_file(&self) -> String {
        output_file(&self.path)
    }
}

/// Navigation item with children for the sidebar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavItem {
    /// Display title.
    pub title: String,
    /// Logical path of the linked page, `None` for pure sections.
    pub path: Option<String>,
    /// Child navigation items.
    pub children: Vec<NavItem>,
}

/// Breadcrumb navigation item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BreadcrumbItem {
    /// Display title.
    pub title: String,
    /// Logical path.
    pub path: String,
}

/// Content tree with unique logical paths.
#[derive(Debug)]
pub struct Site {
    source_dir: PathBuf,
    pages: Vec<Page>,
    path_index: HashMap<String, usize>,
    source_index: HashMap<String, usize>,
    navigation: Vec<NavItem>,
    assets: Vec<String>,
}

impl Site {
    pub(crate) fn new(
        source_dir: PathBuf,
        pages: Vec<Page>,
        navigation: Vec<NavItem>,
        assets: Vec<String>,
    ) -> Self {
        let path_index = pages
            .iter()
            .enumerate()
            .map(|(i, p)| (p.path.clone(), i))
            .collect();
        let source_index = pages
            .iter()
            .enumerate()
            .map(|(i, p)| (p.source.clone(), i))
            .collect();
        Self {
            source_dir,
            pages,
            path_index,
            source_index,
            navigation,
            assets,
        }
    }

    /// Source directory the site was loaded from.
    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// All pages in reading order.
    #[must_use]
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Look up a page by logical path.
    #[must_use]
    pub fn get_page(&self, path: &str) -> Option<&Page> {
        self.path_index.get(path).map(|&i| &self.pages[i])
    }

    /// Look up a page by source path (e.g. `patterns/outbox.md`).
    #[must_use]
    pub fn page_by_source(&self, source: &str) -> Option<&Page> {
        self.source_index.get(source).map(|&i| &self.pages[i])
    }

    /// Navigation tree.
    #[must_use]
    pub fn navigation(&self) -> &[NavItem] {
        &self.navigation
    }

    /// Non-markdown files to copy, sorted.
    #[must_use]
    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    /// Build breadcrumbs for a page.
    ///
    /// Contains every ancestor path that exists as a page, from the root
    /// down. The page itself is not included.
    #[must_use]
    pub fn breadcrumbs(&self, path: &str) -> Vec<BreadcrumbItem> {
        if path.is_empty() {
            return Vec::new();
        }

        let mut ancestors = vec![String::new()];
        let segments: Vec<&str> = path.split('/').collect();
        for i in 1..segments.len() {
            ancestors.push(segments[..i].join("/"));
        }

        ancestors
            .into_iter()
            .filter_map(|p| self.get_page(&p))
            .map(|page| BreadcrumbItem {
                title: page.title.clone(),
                path: page.path.clone(),
            })
            .collect()
    }

    /// Previous and next page in reading order.
    #[must_use]
    pub fn neighbours(&self, path: &str) -> (Option<&Page>, Option<&Page>) {
        let Some(&i) = self.path_index.get(path) else {
            return (None, None);
        };
        let prev = i.checked_sub(1).map(|p| &self.pages[p]);
        (prev, self.pages.get(i + 1))
    }
}

/// Output file for a logical path: `index.html` or `<path>/index.html`.
#[must_use]
pub fn output_file(path: &str) -> String {
    if path.is_empty() {
        "index.html".to_owned()
    } else {
        format!("{path}/index.html")
    }
}

/// Directory of a page's output file, in the form [`relative_path`] expects.
pub(crate) fn page_dir(path: &str) -> String {
    format!("{path}/")
}

/// Relative URL from one page to another (directory URLs).
///
/// # Examples
///
/// ```
/// use tome_site::page_href;
///
/// assert_eq!(page_href("", "patterns/outbox"), "patterns/outbox/");
/// assert_eq!(page_href("patterns/outbox", "patterns/saga"), "../saga/");
/// assert_eq!(page_href("patterns/outbox", ""), "../../");
/// assert_eq!(page_href("guide", "guide"), "./");
/// ```
#[must_use]
pub fn page_href(from: &str, to: &str) -> String {
    let rel = relative_path(&page_dir(from), to);
    if rel.ends_with('/') {
        rel
    } else {
        format!("{rel}/")
    }
}

/// Relative URL from a page to a file in the artifact (e.g. an image).
#[must_use]
pub fn file_href(from: &str, to: &str) -> String {
    relative_path(&page_dir(from), to)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn page(path: &str, title: &str) -> Page {
        Page {
            title: title.to_owned(),
            path: path.to_owned(),
            source: if path.is_empty() {
                "index.md".to_owned()
            } else {
                format!("{path}.md")
            },
            description: None,
            markdown: String::new(),
        }
    }

    fn site() -> Site {
        Site::new(
            PathBuf::from("/docs"),
            vec![
                page("", "Home"),
                page("patterns", "Patterns"),
                page("patterns/outbox", "Outbox"),
                page("patterns/outbox/relay", "Relay"),
            ],
            Vec::new(),
            Vec::new(),
        )
    }

    #[test]
    fn test_output_file() {
        assert_eq!(output_file(""), "index.html");
        assert_eq!(output_file("guide"), "guide/index.html");
        assert_eq!(output_file("a/b"), "a/b/index.html");
    }

    #[test]
    fn test_page_href() {
        assert_eq!(page_href("", ""), "./");
        assert_eq!(page_href("", "guide"), "guide/");
        assert_eq!(page_href("guide", ""), "../");
        assert_eq!(page_href("a/b", "a/c"), "../c/");
        assert_eq!(page_href("a", "a/b"), "b/");
        assert_eq!(page_href("a/b", "x/y/z"), "../../x/y/z/");
    }

    #[test]
    fn test_file_href() {
        assert_eq!(file_href("", "img/flow.png"), "img/flow.png");
        assert_eq!(file_href("guide", "img/flow.png"), "../img/flow.png");
        assert_eq!(
            file_href("patterns/outbox", "patterns/outbox.svg"),
            "../outbox.svg"
        );
    }

    #[test]
    fn test_lookups() {
        let site = site();
        assert_eq!(site.get_page("patterns").unwrap().title, "Patterns");
        assert_eq!(
            site.page_by_source("patterns/outbox.md").unwrap().path,
            "patterns/outbox"
        );
        assert!(site.get_page("missing").is_none());
    }

    #[test]
    fn test_breadcrumbs() {
        let site = site();
        let crumbs = site.breadcrumbs("patterns/outbox/relay");
        let titles: Vec<&str> = crumbs.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Home", "Patterns", "Outbox"]);
        assert!(site.breadcrumbs("").is_empty());
    }

    #[test]
    fn test_breadcrumbs_skip_missing_ancestors() {
        let site = Site::new(
            PathBuf::from("/docs"),
            vec![page("", "Home"), page("a/b", "B")],
            Vec::new(),
            Vec::new(),
        );
        let crumbs = site.breadcrumbs("a/b");
        assert_eq!(
            crumbs,
            vec![BreadcrumbItem {
                title: "Home".to_owned(),
                path: String::new()
            }]
        );
    }

    #[test]
    fn test_neighbours() {
        let site = site();
        let (prev, next) = site.neighbours("");
        assert!(prev.is_none());
        assert_eq!(next.unwrap().path, "patterns");

        let (prev, next) = site.neighbours("patterns/outbox/relay");
        assert_eq!(prev.unwrap().path, "patterns/outbox");
        assert!(next.is_none());
    }
}
