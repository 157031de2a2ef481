//! Content tree errors.

use std::path::PathBuf;

/// Error returned while loading the content tree.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// I/O error reading the source tree.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// File or directory being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Two sources map to the same logical path.
    #[error("Duplicate path '{path}': {first} and {second}")]
    DuplicatePath {
        /// Logical (or output) path in conflict.
        path: String,
        /// First source claiming the path.
        first: String,
        /// Second source claiming the path.
        second: String,
    },

    /// A navigation entry points at a file that is not in the source tree.
    #[error("Navigation entry '{title}' points to missing file: {path}")]
    MissingNavTarget {
        /// Entry title.
        title: String,
        /// Configured source path.
        path: String,
    },

    /// Malformed YAML front matter.
    #[error("Invalid front matter in {source_path}: {message}")]
    FrontMatter {
        /// Source file.
        source_path: String,
        /// Parser message.
        message: String,
    },
}
