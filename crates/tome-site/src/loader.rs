//! Site loading from the source directory.
//!
//! [`SiteLoader`] scans the source tree, reads every markdown file, resolves
//! titles and builds navigation:
//! - `index.md` files become section landing pages
//! - Other `.md` files become standalone pages
//! - Everything else is an asset copied verbatim by the build
//!
//! Title priority: navigation entry, front matter `title`, first H1, file name.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use tome_config::NavEntry;
use tome_renderer::extract_title;

use crate::error::SiteError;
use crate::front_matter::{FrontMatter, parse_front_matter, split_front_matter};
use crate::scanner::{DirNode, Scanner, source_to_logical};
use crate::site::{NavItem, Page, Site, output_file};

/// Title of the root page when nothing else names it.
const ROOT_TITLE: &str = "Home";

/// Loads a [`Site`] from a source directory.
pub struct SiteLoader {
    source_dir: PathBuf,
    nav: Option<Vec<NavEntry>>,
}

impl SiteLoader {
    /// Create a loader for `source_dir` with navigation derived from the layout.
    #[must_use]
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            nav: None,
        }
    }

    /// Use an explicit navigation tree instead of the directory layout.
    #[must_use]
    pub fn with_nav(mut self, nav: Option<Vec<NavEntry>>) -> Self {
        self.nav = nav;
        self
    }

    /// Load the content tree.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError`] if a file can't be read, front matter is
    /// malformed, two sources share a logical path, or a navigation entry
    /// names a missing file.
    pub fn load(&self) -> Result<Site, SiteError> {
        let start = Instant::now();
        let scan = Scanner::new(self.source_dir.clone()).scan()?;

        let mut sources = Vec::new();
        scan.root.markdown_sources(&mut sources);

        let mut pages = Vec::with_capacity(sources.len());
        let mut by_path: HashMap<String, String> = HashMap::new();
        for source in &sources {
            let page = self.read_page(source)?;
            if let Some(first) = by_path.insert(page.path.clone(), source.clone()) {
                return Err(SiteError::DuplicatePath {
                    path: page.path,
                    first,
                    second: source.clone(),
                });
            }
            pages.push(page);
        }

        check_asset_conflicts(&pages, &scan.assets)?;

        let (pages, navigation) = match &self.nav {
            Some(entries) => apply_configured_nav(pages, entries)?,
            None => {
                let navigation = auto_nav(&scan.root, &pages);
                (pages, navigation)
            }
        };

        tracing::debug!(
            pages = pages.len(),
            assets = scan.assets.len(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Loaded content tree"
        );

        Ok(Site::new(
            self.source_dir.clone(),
            pages,
            navigation,
            scan.assets,
        ))
    }

    fn read_page(&self, source: &str) -> Result<Page, SiteError> {
        let file_path = self.source_dir.join(source);
        let content = fs::read_to_string(&file_path).map_err(|e| SiteError::Io {
            path: file_path.clone(),
            source: e,
        })?;

        let (yaml, body) = split_front_matter(&content);
        let front_matter = match yaml {
            Some(yaml) => parse_front_matter(yaml).map_err(|e| SiteError::FrontMatter {
                source_path: source.to_owned(),
                message: e.to_string(),
            })?,
            None => FrontMatter::default(),
        };

        let path = source_to_logical(source);
        let title = front_matter
            .title
            .filter(|t| !t.trim().is_empty())
            .or_else(|| extract_title(body))
            .unwrap_or_else(|| fallback_title(&path));

        Ok(Page {
            title,
            path,
            source: source.to_owned(),
            description: front_matter.description,
            markdown: body.to_owned(),
        })
    }
}

/// Title derived from the logical path's last segment.
fn fallback_title(path: &str) -> String {
    match path.rsplit('/').next() {
        Some(name) if !name.is_empty() => titlecase_from_slug(name),
        _ => ROOT_TITLE.to_owned(),
    }
}

/// Convert a slug (kebab-case or `snake_case`) to title case.
///
/// Replaces `-` and `_` with spaces, then capitalizes the first letter of each word.
fn titlecase_from_slug(slug: &str) -> String {
    let mut result = String::with_capacity(slug.len());
    for word in slug.split(['-', '_', ' ']).filter(|w| !w.is_empty()) {
        if !result.is_empty() {
            result.push(' ');
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            result.extend(first.to_uppercase());
            result.push_str(chars.as_str());
        }
    }
    result
}

/// Reject assets that would overwrite a rendered page.
fn check_asset_conflicts(pages: &[Page], assets: &[String]) -> Result<(), SiteError> {
    let outputs: HashMap<String, &str> = pages
        .iter()
        .map(|p| (output_file(&p.path), p.source.as_str()))
        .collect();
    for asset in assets {
        if let Some(source) = outputs.get(asset) {
            return Err(SiteError::DuplicatePath {
                path: asset.clone(),
                first: (*source).to_owned(),
                second: asset.clone(),
            });
        }
    }
    Ok(())
}

/// Build navigation from the config and reorder pages to follow it.
///
/// Pages not mentioned in the navigation keep their source order after the
/// navigated ones.
fn apply_configured_nav(
    mut pages: Vec<Page>,
    entries: &[NavEntry],
) -> Result<(Vec<Page>, Vec<NavItem>), SiteError> {
    let index: HashMap<String, usize> = pages
        .iter()
        .enumerate()
        .map(|(i, p)| (p.source.clone(), i))
        .collect();

    let mut order = Vec::new();
    let mut seen = HashSet::new();
    let navigation = nav_items(entries, &mut pages, &index, &mut order, &mut seen)?;

    order.extend((0..pages.len()).filter(|i| !seen.contains(i)));

    let mut slots: Vec<Option<Page>> = pages.into_iter().map(Some).collect();
    let ordered = order.into_iter().filter_map(|i| slots[i].take()).collect();
    Ok((ordered, navigation))
}

fn nav_items(
    entries: &[NavEntry],
    pages: &mut [Page],
    index: &HashMap<String, usize>,
    order: &mut Vec<usize>,
    seen: &mut HashSet<usize>,
) -> Result<Vec<NavItem>, SiteError> {
    let mut items = Vec::with_capacity(entries.len());
    for entry in entries {
        let path = match &entry.path {
            Some(source) => {
                let source = source.trim_start_matches("./");
                let &i = index.get(source).ok_or_else(|| SiteError::MissingNavTarget {
                    title: entry.title.clone(),
                    path: source.to_owned(),
                })?;
                if seen.insert(i) {
                    entry.title.clone_into(&mut pages[i].title);
                    order.push(i);
                }
                Some(pages[i].path.clone())
            }
            None => None,
        };
        let children = nav_items(&entry.children, pages, index, order, seen)?;
        items.push(NavItem {
            title: entry.title.clone(),
            path,
            children,
        });
    }
    Ok(items)
}

/// Derive navigation from the directory layout.
///
/// The root `index.md` comes first. Each subdirectory becomes a section,
/// linked to its `index.md` when present.
fn auto_nav(root: &DirNode, pages: &[Page]) -> Vec<NavItem> {
    let by_source: HashMap<&str, &Page> = pages.iter().map(|p| (p.source.as_str(), p)).collect();
    dir_items(root, &by_source)
}

fn dir_items(dir: &DirNode, pages: &HashMap<&str, &Page>) -> Vec<NavItem> {
    let mut items = Vec::new();
    let is_root = dir.rel.is_empty();

    for name in &dir.markdown {
        // A subdirectory's index is the section link, not a child
        if name == "index.md" && !is_root {
            continue;
        }
        if let Some(page) = pages.get(dir.child_path(name).as_str()) {
            items.push(leaf(page));
        }
    }

    for sub in dir.dirs.iter().filter(|d| d.has_markdown()) {
        let index = pages.get(sub.child_path("index.md").as_str());
        items.push(NavItem {
            title: index.map_or_else(|| titlecase_from_slug(sub.name()), |p| p.title.clone()),
            path: index.map(|p| p.path.clone()),
            children: dir_items(sub, pages),
        });
    }

    items
}

fn leaf(page: &Page) -> NavItem {
    NavItem {
        title: page.title.clone(),
        path: Some(page.path.clone()),
        children: Vec::new(),
    }
}
