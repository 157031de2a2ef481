//! HTML page template for static site generation.
//!
//! Every href passed in is final: the builder decides whether links are
//! relative (regular pages) or absolute (the 404 page, which is served
//! from arbitrary URLs). Only theme asset references are built here, and
//! they are always rooted at `site_url`.

use std::fmt::Write;

use tome_renderer::{TocEntry, escape_html as escape};

/// Data for rendering a navigation item.
pub(crate) struct NavItemData {
    pub title: String,
    /// Link target, `None` for sections without a landing page.
    pub href: Option<String>,
    pub children: Vec<NavItemData>,
    pub is_active: bool,
}

/// A titled link (breadcrumbs, previous/next page).
pub(crate) struct LinkData {
    pub title: String,
    pub href: String,
}

/// All data needed to render a page.
pub(crate) struct PageData<'a> {
    pub site_name: &'a str,
    pub site_url: &'a str,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub canonical_url: Option<String>,
    pub home_href: String,
    pub html_content: &'a str,
    pub breadcrumbs: Vec<LinkData>,
    pub toc: &'a [TocEntry],
    pub navigation: Vec<NavItemData>,
    pub prev: Option<LinkData>,
    pub next: Option<LinkData>,
    pub copyright: Option<&'a str>,
}

/// Render a complete HTML page.
pub(crate) fn render_page(page: &PageData<'_>) -> String {
    let mut html = String::with_capacity(8192 + page.html_content.len());

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(html, "<title>{}</title>", escape(&document_title(page)));
    if let Some(description) = page.description {
        let _ = writeln!(
            html,
            "<meta name=\"description\" content=\"{}\">",
            escape(description)
        );
    }
    if let Some(canonical) = &page.canonical_url {
        let _ = writeln!(html, "<link rel=\"canonical\" href=\"{}\">", escape(canonical));
    }
    let _ = writeln!(
        html,
        "<link rel=\"stylesheet\" href=\"{}\">",
        escape(&theme_asset_url(page.site_url, tome_assets::STYLESHEET))
    );
    html.push_str("</head>\n<body>\n");

    render_header(&mut html, page);

    html.push_str("<div class=\"tome-layout\">\n");
    render_sidebar(&mut html, &page.navigation);

    html.push_str("<main class=\"tome-main\">\n");
    render_breadcrumbs(&mut html, &page.breadcrumbs);
    html.push_str("<article class=\"tome-content\">\n");
    html.push_str(page.html_content);
    html.push_str("</article>\n");
    render_pagination(&mut html, page.prev.as_ref(), page.next.as_ref());
    html.push_str("</main>\n");

    render_toc(&mut html, page.toc);
    html.push_str("</div>\n");

    if let Some(copyright) = page.copyright {
        let _ = writeln!(html, "<footer class=\"tome-footer\">{}</footer>", escape(copyright));
    }
    let _ = writeln!(
        html,
        "<script src=\"{}\"></script>",
        escape(&theme_asset_url(page.site_url, tome_assets::SCRIPT))
    );
    html.push_str("</body>\n</html>\n");
    html
}

/// Absolute URL of a theme asset.
pub(crate) fn theme_asset_url(site_url: &str, name: &str) -> String {
    format!("{site_url}assets/{name}")
}

/// `<title>` text: page title followed by the site name.
fn document_title(page: &PageData<'_>) -> String {
    if page.title == page.site_name {
        page.title.to_owned()
    } else {
        format!("{} - {}", page.title, page.site_name)
    }
}

fn render_header(html: &mut String, page: &PageData<'_>) {
    html.push_str("<header class=\"tome-header\">\n");
    let _ = writeln!(
        html,
        "<a class=\"tome-site-name\" href=\"{}\">{}</a>",
        escape(&page.home_href),
        escape(page.site_name)
    );
    html.push_str("<div class=\"tome-search\">\n");
    html.push_str(
        "<input id=\"tome-search-input\" type=\"search\" placeholder=\"Search\" \
         aria-label=\"Search\" autocomplete=\"off\">\n",
    );
    html.push_str("<ul id=\"tome-search-results\" class=\"tome-search-results\"></ul>\n");
    html.push_str("</div>\n</header>\n");
}

fn render_sidebar(html: &mut String, items: &[NavItemData]) {
    html.push_str("<aside class=\"tome-sidebar\">\n<nav>\n<ul>\n");
    render_nav_items(html, items);
    html.push_str("</ul>\n</nav>\n</aside>\n");
}

/// Render navigation items recursively.
fn render_nav_items(html: &mut String, items: &[NavItemData]) {
    for item in items {
        html.push_str("<li>");
        match &item.href {
            Some(href) => {
                let active = if item.is_active {
                    " class=\"active\" aria-current=\"page\""
                } else {
                    ""
                };
                let _ = write!(
                    html,
                    "<a href=\"{}\"{active}>{}</a>",
                    escape(href),
                    escape(&item.title)
                );
            }
            None => {
                let _ = write!(html, "<span>{}</span>", escape(&item.title));
            }
        }
        if !item.children.is_empty() {
            html.push_str("\n<ul>\n");
            render_nav_items(html, &item.children);
            html.push_str("</ul>\n");
        }
        html.push_str("</li>\n");
    }
}

fn render_breadcrumbs(html: &mut String, breadcrumbs: &[LinkData]) {
    if breadcrumbs.is_empty() {
        return;
    }
    html.push_str("<ol class=\"tome-breadcrumbs\">\n");
    for crumb in breadcrumbs {
        let _ = writeln!(
            html,
            "<li><a href=\"{}\">{}</a></li>",
            escape(&crumb.href),
            escape(&crumb.title)
        );
    }
    html.push_str("</ol>\n");
}

fn render_pagination(html: &mut String, prev: Option<&LinkData>, next: Option<&LinkData>) {
    if prev.is_none() && next.is_none() {
        return;
    }
    html.push_str("<nav class=\"tome-pagination\">\n");
    if let Some(prev) = prev {
        let _ = writeln!(
            html,
            "<a class=\"prev\" rel=\"prev\" href=\"{}\">&larr; {}</a>",
            escape(&prev.href),
            escape(&prev.title)
        );
    }
    if let Some(next) = next {
        let _ = writeln!(
            html,
            "<a class=\"next\" rel=\"next\" href=\"{}\">{} &rarr;</a>",
            escape(&next.href),
            escape(&next.title)
        );
    }
    html.push_str("</nav>\n");
}

fn render_toc(html: &mut String, toc: &[TocEntry]) {
    if toc.is_empty() {
        return;
    }
    html.push_str("<aside class=\"tome-toc\">\n<h2>On this page</h2>\n<ul>\n");
    for entry in toc {
        let class = if entry.level >= 3 {
            " class=\"level-3\""
        } else {
            ""
        };
        let _ = writeln!(
            html,
            "<li{class}><a href=\"#{}\">{}</a></li>",
            escape(&entry.id),
            escape(&entry.title)
        );
    }
    html.push_str("</ul>\n</aside>\n");
}
