//! Error types for siftpage operations.
//!
//! This module defines the main error type [`SiftError`] along with the
//! closed set of fetch failure kinds ([`FetchErrorKind`]) that a
//! [`PageFetcher`](crate::fetch::PageFetcher) reports.
//!
//! None of these errors escape the [`Candidates`](crate::Candidates)
//! accessors: a failing candidate is logged and skipped. They surface only
//! when the collaborators are used directly.
//!
//! # Example
//!
//! ```rust
//! use siftpage_core::{FetchError, FetchErrorKind, SiftError};
//!
//! let err = SiftError::from(FetchError::new(FetchErrorKind::Timeout, "https://example.com", "timed out"));
//! assert!(err.to_string().contains("example.com"));
//! ```

use std::fmt;

use thiserror::Error;

/// Classification of a failed page fetch.
///
/// The orchestrator only uses the kind to pick the log level and message,
/// never to decide whether to continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    /// The request exceeded the configured timeout.
    Timeout,
    /// The peer reset the connection.
    ConnectionReset,
    /// The URL could not be parsed.
    InvalidUrl,
    /// The server answered with a non-success status code.
    ResponseStatus,
    /// The URL scheme is not something the fetcher can speak.
    UnsupportedScheme,
    /// The response was fetched but is not an HTML page.
    NotHtml,
    /// Any other transport level failure (DNS, TLS, refused connection...).
    Transport,
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Timeout => "timeout",
            Self::ConnectionReset => "connection reset by peer",
            Self::InvalidUrl => "invalid url",
            Self::ResponseStatus => "bad response status",
            Self::UnsupportedScheme => "unsupported scheme",
            Self::NotHtml => "not an html page",
            Self::Transport => "problem connecting",
        };
        f.write_str(label)
    }
}

/// A failed page fetch: what went wrong, for which URL, and the
/// underlying message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} - {url}: {message}")]
pub struct FetchError {
    pub kind: FetchErrorKind,
    pub url: String,
    pub message: String,
}

impl FetchError {
    /// Creates a fetch error for `url`.
    pub fn new(kind: FetchErrorKind, url: impl Into<String>, message: impl Into<String>) -> Self {
        Self { kind, url: url.into(), message: message.into() }
    }
}

/// Main error type for siftpage operations.
#[derive(Error, Debug)]
pub enum SiftError {
    /// A candidate page could not be fetched.
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// HTTP client errors from reqwest that are not tied to a single fetch,
    /// such as failing to build the client.
    #[cfg(feature = "fetch")]
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTML parsing errors, usually an invalid CSS selector.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// An image could not be downloaded or its dimensions could not be read.
    #[error("Image probe failed for {url}: {message}")]
    ImageProbe { url: String, message: String },

    /// Image bytes are not in a format whose header can be decoded.
    #[error("Unreadable image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// Results could not be serialized.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for SiftError.
pub type Result<T> = std::result::Result<T, SiftError>;
