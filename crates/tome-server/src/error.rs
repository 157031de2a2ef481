//! Error types for the HTTP server.

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// I/O error binding or serving.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configured host is not an IP address.
    #[error("Invalid listen address: {0}")]
    AddrParse(#[from] std::net::AddrParseError),
}
