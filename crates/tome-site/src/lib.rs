//! Content tree for tome.
//!
//! Loads markdown sources from a directory into a [`Site`]: pages with
//! unique logical paths, resolved titles, navigation and breadcrumbs.
//! [`PageLinks`] maps relative links in a page onto the generated layout,
//! where every page is written as a directory URL (`<path>/index.html`).
//!
//! # Example
//!
//! ```no_run
//! use tome_site::SiteLoader;
//!
//! let site = SiteLoader::new("docs").load()?;
//! for page in site.pages() {
//!     println!("{} -> {}", page.source, page.output_file());
//! }
//! # Ok::<(), tome_site::SiteError>(())
//! ```

mod error;
mod front_matter;
mod loader;
mod resolver;
mod scanner;
mod site;

pub use error::SiteError;
pub use loader::SiteLoader;
pub use resolver::PageLinks;
pub use site::{BreadcrumbItem, NavItem, Page, Site, file_href, output_file, page_href};
