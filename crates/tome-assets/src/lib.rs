//! Theme assets for the tome documentation site.
//!
//! The theme (stylesheet and script) is compiled into the binary via
//! `rust-embed`, so a build never depends on files outside the docs tree.
//! The build stage writes these assets under `assets/` in the artifact.

use std::borrow::Cow;

/// Embedded theme assets.
#[derive(rust_embed::RustEmbed)]
#[folder = "theme/"]
struct Theme;

/// Stylesheet path relative to the artifact's `assets/` directory.
pub const STYLESHEET: &str = "tome.css";

/// Script path relative to the artifact's `assets/` directory.
pub const SCRIPT: &str = "tome.js";

/// Get a theme asset by path (relative to `theme/`).
///
/// Returns the file contents if the asset exists, `None` otherwise.
pub fn get(path: &str) -> Option<Cow<'static, [u8]>> {
    Theme::get(path).map(|f| f.data)
}

/// Iterate all theme asset paths in sorted order.
pub fn iter() -> impl Iterator<Item = Cow<'static, str>> {
    let mut paths: Vec<_> = Theme::iter().collect();
    paths.sort();
    paths.into_iter()
}

/// Return the MIME type string for the given file path.
pub fn mime_for(path: &str) -> String {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    let textual = mime.type_() == mime_guess::mime::TEXT
        || mime.subtype() == mime_guess::mime::JAVASCRIPT
        || mime.subtype() == mime_guess::mime::JSON;
    if textual {
        format!("{mime}; charset=utf-8")
    } else {
        mime.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_for_known_types() {
        assert_eq!(mime_for("style.css"), "text/css; charset=utf-8");
        assert_eq!(mime_for("index.html"), "text/html; charset=utf-8");
        assert_eq!(mime_for("image.png"), "image/png");
        assert_eq!(
            mime_for("search_index.json"),
            "application/json; charset=utf-8"
        );
    }

    #[test]
    fn test_mime_for_unknown_type() {
        assert_eq!(mime_for("file.unknown_ext_xyz"), "application/octet-stream");
    }

    #[test]
    fn test_theme_assets_present() {
        assert!(get(STYLESHEET).is_some());
        assert!(get(SCRIPT).is_some());
    }

    #[test]
    fn test_get_nonexistent_asset() {
        assert!(get("nonexistent_file_that_does_not_exist.txt").is_none());
    }

    #[test]
    fn test_iter_is_sorted() {
        let paths: Vec<_> = iter().collect();
        let mut sorted = paths.clone();
        sorted.sort();
        assert_eq!(paths, sorted);
        assert!(paths.iter().any(|p| p == STYLESHEET));
    }
}
