//! `sitemap.xml` generation.
//!
//! Locations are absolute (`{site_url}{path}/`). No `<lastmod>` is emitted so
//! that identical inputs produce identical output.

use std::fmt::Write;

use quick_xml::escape::escape;

use tome_site::Page;

use crate::builder::page_location;

/// Render a sitemap for `pages` in the given order.
pub(crate) fn render_sitemap(site_url: &str, pages: &[Page]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for page in pages {
        let loc = format!("{site_url}{}", page_location(&page.path));
        let _ = writeln!(xml, "  <url><loc>{}</loc></url>", escape(loc.as_str()));
    }
    xml.push_str("</urlset>\n");
    xml
}
