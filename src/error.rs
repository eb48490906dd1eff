//! Error types for cms-feed
//!
//! This module provides the error handling for the library, including:
//! - Network errors produced by classifying HTTP responses
//! - Decode errors for malformed entries and page envelopes
//! - Configuration, credential and cache errors
//! - Machine-readable error codes for presentation layers

use thiserror::Error;

/// Result type alias for cms-feed operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for cms-feed
///
/// This is the primary error type used throughout the library. Each variant includes
/// contextual information to help diagnose issues.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "pagination.page_size")
        key: Option<String>,
    },

    /// Credentials could not be resolved
    #[error("credentials error: {0}")]
    Credentials(String),

    /// A classified network failure (status code or missing response)
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    /// A payload could not be decoded
    #[error("decoding error: {0}")]
    Decode(#[from] DecodeError),

    /// Response cache failure
    #[error("cache error: {0}")]
    Cache(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client construction or protocol error
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL could not be built
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Background task failed to complete
    #[error("task failed: {0}")]
    Task(String),
}

/// Errors produced while fetching a page from the content API
///
/// These mirror the outcome of classifying an HTTP status code. Only
/// [`NetworkError::TooManyRequests`] is transient.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// The server answered with a 3xx status
    #[error("redirection occurred with status code {status}")]
    Redirection {
        /// HTTP status code
        status: u16,
    },

    /// 401 or 403
    #[error("unauthorized ({status}): {message}")]
    Unauthorized {
        /// HTTP status code
        status: u16,
        /// Server-provided message, or a generic description
        message: String,
    },

    /// 429, the server is rate limiting this client
    #[error("too many requests")]
    TooManyRequests,

    /// Any other 4xx status
    #[error("client error ({status}): {message}")]
    Client {
        /// HTTP status code
        status: u16,
        /// Server-provided message, or a generic description
        message: String,
    },

    /// Any 5xx status
    #[error("server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Server-provided message, or a generic description
        message: String,
    },

    /// Missing, unreadable or unclassifiable response
    #[error("invalid response from server: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    /// HTTP status code carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            NetworkError::Redirection { status }
            | NetworkError::Unauthorized { status, .. }
            | NetworkError::Client { status, .. }
            | NetworkError::Server { status, .. } => Some(*status),
            NetworkError::TooManyRequests => Some(429),
            NetworkError::InvalidResponse(_) => None,
        }
    }
}

/// Errors produced while decoding entries or page envelopes
///
/// Entry-level variants are reportable: the page decoder records them and keeps
/// going. [`DecodeError::Envelope`] is fatal for the page it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The record has no `sys.contentType.sys.id`
    #[error("entry {id} has no content type: {reason}")]
    MissingDiscriminant {
        /// Entry id if one could be read, otherwise "?"
        id: String,
        /// What was wrong with the discriminant path
        reason: String,
    },

    /// A known content type whose fields do not match the schema
    #[error("malformed {content_type} entry {id}: {reason}")]
    Malformed {
        /// Content type id that was being decoded
        content_type: String,
        /// Entry id if one could be read, otherwise "?"
        id: String,
        /// Underlying decoder message
        reason: String,
    },

    /// A link stub whose `linkType`/`type` pair is wrong
    #[error("link type or type for asset {id} is wrong (linkType={link_type}, type={kind})")]
    InvalidLink {
        /// Id of the linked asset
        id: String,
        /// The `linkType` found
        link_type: String,
        /// The `type` found
        kind: String,
    },

    /// A date or timestamp field could not be parsed
    #[error("invalid date in field `{field}`: {value}")]
    InvalidDate {
        /// Field name
        field: String,
        /// Raw value found
        value: String,
    },

    /// A resolved entry with an empty id
    #[error("{content_type} entry has an empty id")]
    EmptyId {
        /// Content type id that was being decoded
        content_type: String,
    },

    /// The page envelope itself is unusable
    #[error("invalid page envelope: {0}")]
    Envelope(String),
}

impl Error {
    /// Machine-readable error code, suitable for presentation layers
    pub fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Credentials(_) => "credentials_error",
            Error::Network(e) => match e {
                NetworkError::Redirection { .. } => "redirection",
                NetworkError::Unauthorized { .. } => "unauthorized",
                NetworkError::TooManyRequests => "too_many_requests",
                NetworkError::Client { .. } => "client_error",
                NetworkError::Server { .. } => "server_error",
                NetworkError::InvalidResponse(_) => "invalid_response",
            },
            Error::Decode(_) => "decoding_error",
            Error::Cache(_) => "cache_error",
            Error::Io(_) => "io_error",
            Error::Http(_) => "http_error",
            Error::Url(_) => "invalid_url",
            Error::Serialization(_) => "serialization_error",
            Error::Task(_) => "task_error",
        }
    }
}
