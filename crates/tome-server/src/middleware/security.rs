//! Fixed response headers for artifact files.
//!
//! The artifact is plain documentation: it is never framed, never sniffed,
//! and only leaks the origin when following links off-site.

use axum::http::HeaderValue;
use axum::http::header::HeaderName;
use tower_http::set_header::SetResponseHeaderLayer;

fn overriding(name: &'static str, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        HeaderName::from_static(name),
        HeaderValue::from_static(value),
    )
}

/// `X-Content-Type-Options: nosniff`
pub(crate) fn content_type_options_layer() -> SetResponseHeaderLayer<HeaderValue> {
    overriding("x-content-type-options", "nosniff")
}

/// `X-Frame-Options: DENY`
pub(crate) fn frame_options_layer() -> SetResponseHeaderLayer<HeaderValue> {
    overriding("x-frame-options", "DENY")
}

/// `Referrer-Policy: strict-origin-when-cross-origin`
pub(crate) fn referrer_policy_layer() -> SetResponseHeaderLayer<HeaderValue> {
    overriding("referrer-policy", "strict-origin-when-cross-origin")
}
