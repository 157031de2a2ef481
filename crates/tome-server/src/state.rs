//! Application state.
//!
//! Shared, immutable state for all request handlers.

use std::path::PathBuf;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Root of the build artifact.
    pub(crate) root_dir: PathBuf,
}
