//! Static site builder.
//!
//! Renders every page of a [`Site`] into a directory tree served as-is by
//! any static file server. Pages are written as directory URLs
//! (`<path>/index.html`) and link to each other relatively, so the only
//! place `site_url` appears is in absolute references: theme assets,
//! canonical links, the sitemap and the 404 page.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tome_config::{Config, NavEntry, SiteUrlIssue, check_site_url};
use tome_renderer::{MarkdownRenderer, TocEntry};
use tome_site::{NavItem, Page, PageLinks, Site, SiteError, SiteLoader, page_href};

use crate::search::SearchIndex;
use crate::sitemap::render_sitemap;
use crate::template::{LinkData, NavItemData, PageData, render_page};

/// Directory holding theme assets in the output tree.
const ASSETS_DIR: &str = "assets";
const NOT_FOUND_FILE: &str = "404.html";
const SITEMAP_FILE: &str = "sitemap.xml";
const SEARCH_INDEX_FILE: &str = "search/search_index.json";

const NOT_FOUND_TITLE: &str = "Page not found";

/// Configuration for static site building.
#[derive(Clone, Debug)]
pub struct BuildConfig {
    /// Site name shown in the header and page titles.
    pub site_name: String,
    /// Absolute URL the artifact will be served under.
    pub site_url: String,
    /// Fallback `<meta name="description">` for pages without one.
    pub site_description: Option<String>,
    /// Footer line.
    pub copyright: Option<String>,
    /// Markdown source directory.
    pub source_dir: PathBuf,
    /// Output directory (cleared before writing).
    pub output_dir: PathBuf,
    /// Fail on broken internal links.
    pub strict: bool,
    /// Explicit navigation, derived from the directory layout when `None`.
    pub nav: Option<Vec<NavEntry>>,
}

impl BuildConfig {
    /// Take build settings from a loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            site_name: config.site_name.clone(),
            site_url: config.site_url.clone(),
            site_description: config.site_description.clone(),
            copyright: config.copyright.clone(),
            source_dir: config.docs_resolved.source_dir.clone(),
            output_dir: config.docs_resolved.output_dir.clone(),
            strict: config.docs_resolved.strict,
            nav: config.nav.clone(),
        }
    }
}

/// Error returned by the static site builder.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// I/O error writing the output tree.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// File or directory being written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Content tree could not be loaded.
    #[error(transparent)]
    Site(#[from] SiteError),

    /// Output directory overlaps the source directory.
    #[error(
        "Refusing to build into {}: it overlaps the source directory {}",
        output_dir.display(),
        source_dir.display()
    )]
    UnsafeOutputDir {
        /// Configured output directory.
        output_dir: PathBuf,
        /// Configured source directory.
        source_dir: PathBuf,
    },

    /// Broken internal links in strict mode.
    #[error("{count} broken link(s) found (strict mode)")]
    BrokenLinks {
        /// Number of broken links.
        count: usize,
    },

    /// Search index serialization failed.
    #[error("Failed to serialize search index: {0}")]
    SearchIndex(#[from] serde_json::Error),
}

/// A relative link to a markdown file that does not exist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BrokenLink {
    /// Source file containing the link.
    pub source: String,
    /// Link destination as written.
    pub target: String,
}

/// Summary of a completed build.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Number of pages rendered.
    pub pages: usize,
    /// Number of non-markdown files copied from the source tree.
    pub files: usize,
    /// Broken links (only non-empty outside strict mode).
    pub broken_links: Vec<BrokenLink>,
    /// Problems with `site_url`; the build proceeds regardless.
    pub site_url_issues: Vec<SiteUrlIssue>,
}

/// Builds a static documentation site from a source directory.
pub struct StaticSiteBuilder {
    config: BuildConfig,
}

impl StaticSiteBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// Build the site into the output directory.
    ///
    /// Everything is rendered before the output directory is touched, so a
    /// failing build leaves the previous artifact in place.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if the content tree can't be loaded, the output
    /// directory overlaps the source directory, writing fails, or broken
    /// links are found in strict mode.
    pub fn build(&self) -> Result<BuildReport, BuildError> {
        let start = Instant::now();
        let config = &self.config;

        let site_url_issues = check_site_url(&config.site_url);
        for issue in &site_url_issues {
            tracing::warn!(site_url = %config.site_url, %issue, "Asset references may not resolve");
        }

        self.check_output_dir()?;

        let site = SiteLoader::new(config.source_dir.clone())
            .with_nav(config.nav.clone())
            .load()?;

        let mut search = SearchIndex::new();
        let mut broken_links = Vec::new();
        let mut outputs = Vec::with_capacity(site.pages().len());
        for page in site.pages() {
            let links = PageLinks::new(&site, page);
            let result = MarkdownRenderer::new()
                .with_title_extraction()
                .with_link_resolver(&links)
                .render_markdown(&page.markdown);

            broken_links.extend(result.broken_links.into_iter().map(|target| BrokenLink {
                source: page.source.clone(),
                target,
            }));
            search.push(&page.path, &page.title, &result.text);

            let data = self.page_data(&site, page, &result.html, &result.toc);
            outputs.push((page.output_file(), render_page(&data)));
        }

        for link in &broken_links {
            tracing::warn!(page = %link.source, target = %link.target, "Broken link");
        }
        if config.strict && !broken_links.is_empty() {
            return Err(BuildError::BrokenLinks {
                count: broken_links.len(),
            });
        }

        let search_json = search.to_json()?;

        self.prepare_output_dir()?;
        self.write_theme_assets()?;
        for (file, html) in &outputs {
            self.write_output(file, html.as_bytes())?;
        }
        let files = self.copy_source_files(&site)?;
        self.write_output(NOT_FOUND_FILE, render_page(&self.not_found_data(&site)).as_bytes())?;
        self.write_output(
            SITEMAP_FILE,
            render_sitemap(&config.site_url, site.pages()).as_bytes(),
        )?;
        self.write_output(SEARCH_INDEX_FILE, search_json.as_bytes())?;

        tracing::info!(
            pages = outputs.len(),
            files,
            output = %config.output_dir.display(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Built site"
        );

        Ok(BuildReport {
            pages: outputs.len(),
            files,
            broken_links,
            site_url_issues,
        })
    }

    /// Template data for a regular page: every link is relative to it.
    fn page_data<'a>(
        &'a self,
        site: &Site,
        page: &'a Page,
        html_content: &'a str,
        toc: &'a [TocEntry],
    ) -> PageData<'a> {
        let config = &self.config;
        let href = |target: &str| page_href(&page.path, target);
        let link = |p: &Page| LinkData {
            title: p.title.clone(),
            href: href(&p.path),
        };

        let breadcrumbs = site
            .breadcrumbs(&page.path)
            .into_iter()
            .map(|crumb| LinkData {
                href: href(&crumb.path),
                title: crumb.title,
            })
            .collect();
        let (prev, next) = site.neighbours(&page.path);

        PageData {
            site_name: &config.site_name,
            site_url: &config.site_url,
            title: &page.title,
            description: page
                .description
                .as_deref()
                .or(config.site_description.as_deref()),
            canonical_url: Some(format!("{}{}", config.site_url, page_location(&page.path))),
            home_href: href(""),
            html_content,
            breadcrumbs,
            toc,
            navigation: nav_data(site.navigation(), &href, Some(page.path.as_str())),
            prev: prev.map(link),
            next: next.map(link),
            copyright: config.copyright.as_deref(),
        }
    }

    /// Template data for the 404 page.
    ///
    /// The page is served for arbitrary missing URLs, so all links are
    /// absolute.
    fn not_found_data(&self, site: &Site) -> PageData<'_> {
        let config = &self.config;
        let href = |target: &str| format!("{}{}", config.site_url, page_location(target));
        PageData {
            site_name: &config.site_name,
            site_url: &config.site_url,
            title: NOT_FOUND_TITLE,
            description: None,
            canonical_url: None,
            home_href: config.site_url.clone(),
            html_content: NOT_FOUND_BODY,
            breadcrumbs: Vec::new(),
            toc: &[],
            navigation: nav_data(site.navigation(), &href, None),
            prev: None,
            next: None,
            copyright: config.copyright.as_deref(),
        }
    }

    fn check_output_dir(&self) -> Result<(), BuildError> {
        let output = resolve_dir(&self.config.output_dir);
        let source = resolve_dir(&self.config.source_dir);
        if source.starts_with(&output) || output.starts_with(&source) {
            return Err(BuildError::UnsafeOutputDir {
                output_dir: self.config.output_dir.clone(),
                source_dir: self.config.source_dir.clone(),
            });
        }
        Ok(())
    }

    fn prepare_output_dir(&self) -> Result<(), BuildError> {
        let dir = &self.config.output_dir;
        if dir.exists() {
            fs::remove_dir_all(dir).map_err(|e| io_error(dir, e))?;
        }
        fs::create_dir_all(dir).map_err(|e| io_error(dir, e))
    }

    fn write_theme_assets(&self) -> Result<(), BuildError> {
        for name in tome_assets::iter() {
            if let Some(data) = tome_assets::get(&name) {
                self.write_output(&format!("{ASSETS_DIR}/{name}"), &data)?;
            }
        }
        Ok(())
    }

    /// Copy non-markdown source files, skipping paths the build generates.
    fn copy_source_files(&self, site: &Site) -> Result<usize, BuildError> {
        let mut copied = 0;
        for file in site.assets() {
            if is_generated(file) {
                tracing::warn!(file = %file, "Skipping source file that collides with a generated file");
                continue;
            }
            let from = site.source_dir().join(file);
            let to = self.config.output_dir.join(file);
            create_parent(&to)?;
            fs::copy(&from, &to).map_err(|e| io_error(&from, e))?;
            copied += 1;
        }
        Ok(copied)
    }

    /// Write a file relative to the output directory.
    fn write_output(&self, rel: &str, contents: &[u8]) -> Result<(), BuildError> {
        let path = self.config.output_dir.join(rel);
        create_parent(&path)?;
        fs::write(&path, contents).map_err(|e| io_error(&path, e))
    }
}

const NOT_FOUND_BODY: &str = "<h1>Page not found</h1>\n\
<p>The page you are looking for does not exist. Use the navigation or search to find it.</p>\n";

/// Site-relative location of a page: `""` for the root, `"<path>/"` otherwise.
pub(crate) fn page_location(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!("{path}/")
    }
}

/// Convert the navigation tree into template data with the given link style.
fn nav_data(
    items: &[NavItem],
    href: &dyn Fn(&str) -> String,
    current: Option<&str>,
) -> Vec<NavItemData> {
    items
        .iter()
        .map(|item| NavItemData {
            title: item.title.clone(),
            href: item.path.as_deref().map(href),
            children: nav_data(&item.children, href, current),
            is_active: item.path.is_some() && item.path.as_deref() == current,
        })
        .collect()
}

/// Whether a source file would overwrite something the build generates.
fn is_generated(file: &str) -> bool {
    if matches!(file, NOT_FOUND_FILE | SITEMAP_FILE | SEARCH_INDEX_FILE) {
        return true;
    }
    file.strip_prefix(ASSETS_DIR)
        .and_then(|rest| rest.strip_prefix('/'))
        .is_some_and(|name| tome_assets::get(name).is_some())
}

/// Resolve a directory for overlap checks.
///
/// The deepest existing ancestor is canonicalized and the missing remainder
/// appended, so directories that don't exist yet compare correctly.
fn resolve_dir(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    for ancestor in absolute.ancestors() {
        if let (Ok(canonical), Ok(rest)) = (fs::canonicalize(ancestor), absolute.strip_prefix(ancestor)) {
            if rest.as_os_str().is_empty() {
                return canonical;
            }
            return canonical.join(rest);
        }
    }
    absolute
}

fn create_parent(path: &Path) -> Result<(), BuildError> {
    match path.parent() {
        Some(parent) => fs::create_dir_all(parent).map_err(|e| io_error(parent, e)),
        None => Ok(()),
    }
}

fn io_error(path: &Path, source: std::io::Error) -> BuildError {
    BuildError::Io {
        path: path.to_path_buf(),
        source,
    }
}
