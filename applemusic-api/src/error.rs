//! Error types for the Apple Music API client.

use thiserror::Error;

/// Boxed error reported by a [`TokenIssuer`](crate::auth::TokenIssuer).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur when interacting with the Apple Music API.
#[derive(Debug, Error)]
pub enum AppleMusicError {
    /// HTTP transport error (connection refused, timeout, TLS failure, etc.).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success HTTP status.
    ///
    /// Common statuses:
    /// - `401` — developer token rejected or expired
    /// - `404` — resource does not exist in this storefront
    /// - `429` — too many requests
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// First error title/detail from the response body.
        message: String,
    },

    /// The resource was requested by ID but the response contained no data.
    #[error("resource not found")]
    NotFound,

    /// A request argument was rejected before anything was sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The token issuer failed. The issuer's error is carried as the source,
    /// untouched.
    #[error("token issuance failed: {0}")]
    Issuance(#[source] BoxError),

    /// The issued token contains bytes that are not valid in an HTTP header.
    #[error("issued token is not a valid header value")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    /// File I/O error (credentials read/write, private key read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse a JSON document.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to sign a developer token.
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Catch-all for other errors (e.g. missing config directory).
    #[error("{0}")]
    Other(String),
}

/// Convenience alias for `Result<T, AppleMusicError>`.
pub type Result<T> = std::result::Result<T, AppleMusicError>;
