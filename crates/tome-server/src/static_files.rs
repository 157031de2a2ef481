//! Static file serving from the build artifact.
//!
//! Request resolution order:
//! 1. Exact file match → serve file
//! 2. Directory → redirect to the trailing-slash form, then serve its `index.html`
//! 3. Nothing found → 404 with the artifact's `404.html`

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use md5::{Digest, Md5};
use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

use crate::state::AppState;

const INDEX_FILE: &str = "index.html";
const NOT_FOUND_FILE: &str = "404.html";
const NOT_FOUND_TEXT: &str = "404 Not Found";

/// Characters escaped when a decoded path segment goes back into a URL.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Outcome of mapping a request path onto the artifact.
#[derive(Debug, PartialEq, Eq)]
enum Resolved {
    File(PathBuf),
    Redirect,
    NotFound,
}

/// Serve a file from the artifact directory.
pub(crate) async fn serve_file(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let Some(rel) = decode_path(uri.path()) else {
        tracing::debug!(path = %uri.path(), "Rejected request path");
        return not_found(&state.root_dir).await;
    };

    match resolve(&state.root_dir, &rel, uri.path().ends_with('/')).await {
        Resolved::File(path) => file_response(&path, &headers).await,
        Resolved::Redirect => {
            let location = redirect_location(&rel, uri.query());
            (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response()
        }
        Resolved::NotFound => not_found(&state.root_dir).await,
    }
}

/// Percent-decode a URL path into a relative filesystem path.
///
/// Returns `None` for paths that try to leave the root (`..`) or contain
/// characters that can't appear in artifact file names.
fn decode_path(raw: &str) -> Option<String> {
    let decoded = percent_decode_str(raw).decode_utf8().ok()?;
    let mut segments = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => return None,
            s if s.contains(['\\', '\0']) => return None,
            s => segments.push(s),
        }
    }
    Some(segments.join("/"))
}

/// Trailing-slash form of a directory path, rebuilt from the normalized
/// segments so the location is always same-origin.
fn redirect_location(rel: &str, query: Option<&str>) -> String {
    let mut location = String::from("/");
    for segment in rel.split('/') {
        location.extend(utf8_percent_encode(segment, SEGMENT));
        location.push('/');
    }
    if let Some(query) = query {
        location.push('?');
        location.push_str(query);
    }
    location
}

async fn resolve(root: &Path, rel: &str, trailing_slash: bool) -> Resolved {
    let path = root.join(rel);
    let Ok(meta) = tokio::fs::metadata(&path).await else {
        return Resolved::NotFound;
    };

    if meta.is_file() {
        return if trailing_slash {
            Resolved::NotFound
        } else {
            Resolved::File(path)
        };
    }

    if meta.is_dir() {
        if !trailing_slash {
            return Resolved::Redirect;
        }
        let index = path.join(INDEX_FILE);
        if tokio::fs::metadata(&index).await.is_ok_and(|m| m.is_file()) {
            return Resolved::File(index);
        }
    }

    Resolved::NotFound
}

async fn file_response(path: &Path, headers: &HeaderMap) -> Response {
    let content = match tokio::fs::read(path).await {
        Ok(content) => content,
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Failed to read file");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let etag = compute_etag(&content);
    if headers
        .get(header::IF_NONE_MATCH)
        .is_some_and(|value| etag_matches(value, &etag))
    {
        return (StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response();
    }

    let mime = tome_assets::mime_for(&path.to_string_lossy());
    (
        [
            (header::CONTENT_TYPE, mime),
            (header::ETAG, etag),
            (header::CACHE_CONTROL, "no-cache".to_owned()),
        ],
        content,
    )
        .into_response()
}

/// Not-found response, using the artifact's `404.html` when present.
async fn not_found(root: &Path) -> Response {
    match tokio::fs::read(root.join(NOT_FOUND_FILE)).await {
        Ok(page) => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            page,
        )
            .into_response(),
        Err(_) => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            NOT_FOUND_TEXT,
        )
            .into_response(),
    }
}

/// Compute `ETag` from file content.
///
/// Uses MD5 hash truncated to 64 bits (16 hex chars) - sufficient for
/// cache invalidation with negligible collision probability.
fn compute_etag(content: &[u8]) -> String {
    let hash = Md5::digest(content);
    format!("\"{}\"", &hex::encode(hash)[..16])
}

/// Check an `If-None-Match` header against an `ETag`.
fn etag_matches(value: &HeaderValue, etag: &str) -> bool {
    let Ok(value) = value.to_str() else {
        return false;
    };
    value.split(',').map(str::trim).any(|candidate| {
        candidate == "*" || candidate.strip_prefix("W/").unwrap_or(candidate) == etag
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_decode_path() {
        assert_eq!(decode_path("/").as_deref(), Some(""));
        assert_eq!(
            decode_path("/patterns/outbox/").as_deref(),
            Some("patterns/outbox")
        );
        assert_eq!(
            decode_path("/circuit%20breaker/").as_deref(),
            Some("circuit breaker")
        );
        assert_eq!(decode_path("/./a//b").as_deref(), Some("a/b"));
    }

    #[test]
    fn test_decode_path_rejects_traversal() {
        assert_eq!(decode_path("/../secret"), None);
        assert_eq!(decode_path("/a/%2e%2e/%2e%2e/secret"), None);
        assert_eq!(decode_path("/a/..%2f..%2fsecret"), None);
        assert_eq!(decode_path("/a%5c..%5csecret"), None);
    }

    #[test]
    fn test_redirect_location() {
        assert_eq!(redirect_location("patterns", None), "/patterns/");
        assert_eq!(
            redirect_location("circuit breaker", Some("q=1")),
            "/circuit%20breaker/?q=1"
        );
        assert_eq!(redirect_location("a/b%c", None), "/a/b%25c/");
    }

    #[test]
    fn test_compute_etag_format() {
        let etag = compute_etag(b"content");
        assert!(etag.starts_with('"'));
        assert!(etag.ends_with('"'));
        // 16 hex chars + 2 quotes
        assert_eq!(etag.len(), 18);
        assert_ne!(etag, compute_etag(b"other content"));
    }

    #[test]
    fn test_etag_matches() {
        let etag = compute_etag(b"content");
        assert!(etag_matches(&HeaderValue::from_str(&etag).unwrap(), &etag));
        assert!(etag_matches(
            &HeaderValue::from_str(&format!("\"abc\", W/{etag}")).unwrap(),
            &etag
        ));
        assert!(etag_matches(&HeaderValue::from_static("*"), &etag));
        assert!(!etag_matches(&HeaderValue::from_static("\"abc\""), &etag));
    }

    #[tokio::test]
    async fn test_resolve_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("guide")).unwrap();
        std::fs::write(dir.path().join("guide/index.html"), "guide").unwrap();
        std::fs::write(dir.path().join("robots.txt"), "").unwrap();
        std::fs::create_dir_all(dir.path().join("empty")).unwrap();

        let root = dir.path();
        assert_eq!(
            resolve(root, "robots.txt", false).await,
            Resolved::File(root.join("robots.txt"))
        );
        assert_eq!(resolve(root, "robots.txt", true).await, Resolved::NotFound);
        assert_eq!(resolve(root, "guide", false).await, Resolved::Redirect);
        assert_eq!(
            resolve(root, "guide", true).await,
            Resolved::File(root.join("guide/index.html"))
        );
        assert_eq!(resolve(root, "empty", true).await, Resolved::NotFound);
        assert_eq!(resolve(root, "missing", true).await, Resolved::NotFound);
    }
}
