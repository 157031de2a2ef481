//! Markdown to HTML rendering for tome.
//!
//! [`MarkdownRenderer`] parses markdown with `pulldown-cmark`, assigns unique
//! anchor ids to headings, extracts the page title and table of contents, and
//! hands relative links to a [`LinkResolver`] so the site layer can map
//! `*.md` sources onto generated URLs.
//!
//! # Example
//!
//! ```
//! use tome_renderer::MarkdownRenderer;
//!
//! let result = MarkdownRenderer::new()
//!     .with_title_extraction()
//!     .render_markdown("# Hello\n\n## Details\n\n**Bold** text");
//! assert_eq!(result.title.as_deref(), Some("Hello"));
//! assert_eq!(result.toc[0].id, "details");
//! ```

mod link;
mod renderer;
mod state;
mod util;

pub use link::{LinkResolver, Resolution};
pub use renderer::{MarkdownRenderer, RenderResult, extract_title};
pub use state::{TocEntry, escape_html, slugify};
pub use util::{is_relative_link, relative_path};
