//! Markdown renderer.

use pulldown_cmark::{CowStr, Event, HeadingLevel, LinkType, Options, Parser, Tag, TagEnd};

use crate::link::{LinkResolver, Resolution};
use crate::state::{HeadingState, TocEntry};
use crate::util::{heading_level_to_num, is_relative_link};

/// Result of rendering markdown.
#[derive(Clone, Debug)]
pub struct RenderResult {
    /// Rendered HTML content.
    pub html: String,
    /// Title extracted from first H1 heading (if title extraction was enabled).
    pub title: Option<String>,
    /// Table of contents entries.
    pub toc: Vec<TocEntry>,
    /// Plain text content, whitespace-collapsed (used for the search index).
    pub text: String,
    /// Relative link destinations that the resolver reported as broken.
    pub broken_links: Vec<String>,
}

/// Opening heading tag held back until the heading text (and thus its id) is known.
struct PendingHeading<'a> {
    level: HeadingLevel,
    id: Option<CowStr<'a>>,
    classes: Vec<CowStr<'a>>,
    attrs: Vec<(CowStr<'a>, Option<CowStr<'a>>)>,
    events: Vec<Event<'a>>,
}

/// Markdown renderer producing semantic HTML5.
///
/// Parsing and HTML serialization are done by `pulldown-cmark`; this type
/// rewrites the event stream in between: headings get unique anchor ids,
/// the first H1 becomes the page title, and relative links are passed
/// through a [`LinkResolver`].
pub struct MarkdownRenderer<'r> {
    extract_title: bool,
    gfm: bool,
    resolver: Option<&'r dyn LinkResolver>,
}

impl Default for MarkdownRenderer<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> MarkdownRenderer<'r> {
    /// Create a new renderer with GFM enabled by default.
    #[must_use]
    pub fn new() -> Self {
        Self {
            extract_title: false,
            gfm: true,
            resolver: None,
        }
    }

    /// Enable title extraction from first H1 heading.
    ///
    /// The H1 is still rendered; it is only left out of the table of contents.
    #[must_use]
    pub fn with_title_extraction(mut self) -> Self {
        self.extract_title = true;
        self
    }

    /// Enable or disable GitHub Flavored Markdown features.
    ///
    /// GFM is enabled by default. When enabled, the parser supports:
    /// - Tables
    /// - Strikethrough (`~~text~~`)
    /// - Task lists (`- [ ] item`)
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Resolve relative links with the given resolver.
    #[must_use]
    pub fn with_link_resolver(mut self, resolver: &'r dyn LinkResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Get parser options based on GFM configuration.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        let base = Options::ENABLE_HEADING_ATTRIBUTES;
        if self.gfm {
            base | Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
        } else {
            base
        }
    }

    /// Render markdown text to HTML.
    pub fn render_markdown(&self, markdown: &str) -> RenderResult {
        let mut heading = HeadingState::new(self.extract_title);
        let mut events: Vec<Event<'_>> = Vec::new();
        let mut pending: Option<PendingHeading<'_>> = None;
        let mut text = String::new();
        let mut broken_links = Vec::new();

        for event in Parser::new_ext(markdown, self.parser_options()) {
            let event = self.rewrite_links(event, &mut broken_links);
            collect_text(&event, &mut text);

            match event {
                Event::Start(Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                }) => {
                    heading.start_heading(heading_level_to_num(level));
                    pending = Some(PendingHeading {
                        level,
                        id,
                        classes,
                        attrs,
                        events: Vec::new(),
                    });
                }
                Event::End(TagEnd::Heading(level)) => {
                    let Some(open) = pending.take() else {
                        continue;
                    };
                    let id = heading
                        .complete_heading(open.id.as_deref())
                        .unwrap_or_default();
                    events.push(Event::Start(Tag::Heading {
                        level: open.level,
                        id: Some(CowStr::from(id)),
                        classes: open.classes,
                        attrs: open.attrs,
                    }));
                    events.extend(open.events);
                    events.push(Event::End(TagEnd::Heading(level)));
                }
                other => {
                    if let Some(open) = pending.as_mut() {
                        if let Event::Text(t) | Event::Code(t) = &other {
                            heading.push_text(t);
                        }
                        open.events.push(other);
                    } else {
                        events.push(other);
                    }
                }
            }
        }
        debug_assert!(!heading.is_active());

        let mut html = String::with_capacity(markdown.len() * 3 / 2);
        pulldown_cmark::html::push_html(&mut html, events.into_iter());

        RenderResult {
            html,
            title: heading.take_title(),
            toc: heading.take_toc(),
            text: collapse_whitespace(&text),
            broken_links,
        }
    }

    /// Pass link and image destinations through the resolver.
    fn rewrite_links<'a>(&self, event: Event<'a>, broken: &mut Vec<String>) -> Event<'a> {
        let Some(resolver) = self.resolver else {
            return event;
        };
        match event {
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                id,
            }) if resolvable(link_type, &dest_url) => Event::Start(Tag::Link {
                link_type,
                dest_url: apply(resolver, dest_url, broken),
                title,
                id,
            }),
            Event::Start(Tag::Image {
                link_type,
                dest_url,
                title,
                id,
            }) if resolvable(link_type, &dest_url) => Event::Start(Tag::Image {
                link_type,
                dest_url: apply(resolver, dest_url, broken),
                title,
                id,
            }),
            other => other,
        }
    }
}

/// Extract the text of the first H1 heading without rendering the document.
#[must_use]
pub fn extract_title(markdown: &str) -> Option<String> {
    let mut in_h1 = false;
    let mut title = String::new();
    for event in Parser::new_ext(markdown, Options::ENABLE_HEADING_ATTRIBUTES) {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) => in_h1 = true,
            Event::End(TagEnd::Heading(HeadingLevel::H1)) => {
                let title = title.trim();
                return (!title.is_empty()).then(|| title.to_owned());
            }
            Event::Text(t) | Event::Code(t) if in_h1 => title.push_str(&t),
            _ => {}
        }
    }
    None
}

/// Autolinks and email links are always absolute; skip them.
fn resolvable(link_type: LinkType, dest: &str) -> bool {
    !matches!(link_type, LinkType::Autolink | LinkType::Email) && is_relative_link(dest)
}

fn apply<'a>(
    resolver: &dyn LinkResolver,
    dest: CowStr<'a>,
    broken: &mut Vec<String>,
) -> CowStr<'a> {
    match resolver.resolve(&dest) {
        Resolution::Keep => dest,
        Resolution::Rewrite(url) => CowStr::from(url),
        Resolution::Broken => {
            broken.push(dest.to_string());
            dest
        }
    }
}

/// Append the textual content of an event to the search text buffer.
fn collect_text(event: &Event<'_>, text: &mut String) {
    match event {
        Event::Text(t) | Event::Code(t) => text.push_str(t),
        Event::SoftBreak
        | Event::HardBreak
        | Event::End(
            TagEnd::Paragraph
            | TagEnd::Heading(_)
            | TagEnd::Item
            | TagEnd::TableCell
            | TagEnd::CodeBlock,
        ) => text.push(' '),
        _ => {}
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    /// Resolver rewriting `*.md` to directory URLs and flagging `missing.md`.
    struct TestResolver;

    impl LinkResolver for TestResolver {
        fn resolve(&self, dest: &str) -> Resolution {
            if dest.starts_with("missing.md") {
                Resolution::Broken
            } else if let Some(stem) = dest.strip_suffix(".md") {
                Resolution::Rewrite(format!("../{stem}/"))
            } else {
                Resolution::Keep
            }
        }
    }

    #[test]
    fn test_render_basic_markdown() {
        let result = MarkdownRenderer::new().render_markdown("Hello **world**");
        assert_eq!(result.html, "<p>Hello <strong>world</strong></p>\n");
        assert!(result.title.is_none());
    }

    #[test]
    fn test_title_extraction_keeps_h1_in_output() {
        let result = MarkdownRenderer::new()
            .with_title_extraction()
            .render_markdown("# Transactional Outbox\n\nText");
        assert_eq!(result.title.as_deref(), Some("Transactional Outbox"));
        assert!(
            result
                .html
                .contains("<h1 id=\"transactional-outbox\">Transactional Outbox</h1>")
        );
        assert!(result.toc.is_empty());
    }

    #[test]
    fn test_headings_get_ids_and_toc() {
        let md = "# Title\n\n## Setup\n\n### Options\n\n## Setup\n";
        let result = MarkdownRenderer::new()
            .with_title_extraction()
            .render_markdown(md);

        assert!(result.html.contains("<h2 id=\"setup\">Setup</h2>"));
        assert!(result.html.contains("<h3 id=\"options\">Options</h3>"));
        assert!(result.html.contains("<h2 id=\"setup-1\">Setup</h2>"));
        let ids: Vec<_> = result.toc.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["setup", "options", "setup-1"]);
        assert_eq!(result.toc[1].level, 3);
    }

    #[test]
    fn test_heading_with_inline_code() {
        let result = MarkdownRenderer::new().render_markdown("## The `send` method");
        assert!(
            result
                .html
                .contains("<h2 id=\"the-send-method\">The <code>send</code> method</h2>")
        );
        assert_eq!(result.toc[0].title, "The send method");
    }

    #[test]
    fn test_explicit_heading_id() {
        let result = MarkdownRenderer::new().render_markdown("## Circuit breaker {#breaker}");
        assert!(
            result
                .html
                .contains("<h2 id=\"breaker\">Circuit breaker</h2>")
        );
        assert_eq!(result.toc[0].id, "breaker");
    }

    #[test]
    fn test_gfm_table() {
        let md = "| a | b |\n|---|---|\n| 1 | 2 |";
        let result = MarkdownRenderer::new().render_markdown(md);
        assert!(result.html.contains("<table>"));
        assert!(result.html.contains("<td>1</td>"));
    }

    #[test]
    fn test_gfm_disabled() {
        let md = "| a | b |\n|---|---|\n| 1 | 2 |";
        let result = MarkdownRenderer::new().with_gfm(false).render_markdown(md);
        assert!(!result.html.contains("<table>"));
    }

    #[test]
    fn test_links_rewritten_by_resolver() {
        let resolver = TestResolver;
        let result = MarkdownRenderer::new()
            .with_link_resolver(&resolver)
            .render_markdown("See [saga](saga.md) and [site](https://example.com/x.md).");
        assert!(result.html.contains("<a href=\"../saga/\">saga</a>"));
        assert!(result.html.contains("<a href=\"https://example.com/x.md\">site</a>"));
        assert!(result.broken_links.is_empty());
    }

    #[test]
    fn test_image_rewritten_by_resolver() {
        let resolver = TestResolver;
        let result = MarkdownRenderer::new()
            .with_link_resolver(&resolver)
            .render_markdown("![flow](img/flow.png)");
        assert!(result.html.contains("src=\"img/flow.png\""));
    }

    #[test]
    fn test_broken_links_reported() {
        let resolver = TestResolver;
        let result = MarkdownRenderer::new()
            .with_link_resolver(&resolver)
            .render_markdown("[gone](missing.md#x)");
        assert_eq!(result.broken_links, vec!["missing.md#x".to_owned()]);
        assert!(result.html.contains("href=\"missing.md#x\""));
    }

    #[test]
    fn test_plain_text_collected() {
        let md = "# Saga\n\nCompensate on\nfailure.\n\n- retry\n- `fallback`\n";
        let result = MarkdownRenderer::new().render_markdown(md);
        assert_eq!(result.text, "Saga Compensate on failure. retry fallback");
    }

    #[test]
    fn test_extract_title() {
        let md = "Intro\n\n```\n# not a heading\n```\n\n# Saga `fallback`\n\n# Second";
        assert_eq!(extract_title(md).as_deref(), Some("Saga fallback"));
        assert_eq!(extract_title("## Only h2"), None);
    }

    #[test]
    fn test_raw_html_passthrough() {
        let result = MarkdownRenderer::new().render_markdown("<div class=\"note\">x</div>\n");
        assert!(result.html.contains("<div class=\"note\">x</div>"));
    }
}
