//! Link resolution seam.
//!
//! The renderer knows nothing about the site layout. A [`LinkResolver`]
//! maps relative link destinations found in the markdown source to URLs in
//! the generated site.

/// Outcome of resolving a link destination.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Leave the destination untouched.
    Keep,
    /// Replace the destination.
    Rewrite(String),
    /// The destination points at a document that does not exist.
    Broken,
}

/// Resolves relative link and image destinations for one page.
pub trait LinkResolver {
    /// Resolve a destination that [`is_relative_link`](crate::is_relative_link) accepted.
    fn resolve(&self, dest: &str) -> Resolution;
}
