//! Static site generation for tome.
//!
//! Turns a markdown source directory and a base URL into a self-contained
//! site tree: one `index.html` per page, theme assets under `assets/`,
//! copied source files, `404.html`, `sitemap.xml` and a search index.
//! Output is deterministic: identical inputs give byte-identical trees.

mod builder;
mod search;
mod sitemap;
mod template;

pub use builder::{BrokenLink, BuildConfig, BuildError, BuildReport, StaticSiteBuilder};
