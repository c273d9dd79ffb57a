//! Error types for quiver client operations

use serde_json::Value;
use thiserror::Error;

/// Network-level failure: the request never produced a usable GraphQL
/// response. Application-level errors live on [`crate::GraphQlResponse`]
/// instead; the two are independent axes and the error dispatcher checks
/// both.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("transport failure: {message}")]
pub struct TransportError {
    /// HTTP status when the server answered at all.
    pub status: Option<u16>,
    /// Parsed response body, when one existed and parsed as JSON.
    pub body: Option<Value>,
    pub message: String,
}

/// Message used for connect-class failures, mirroring what a browser fetch
/// reports. The dispatcher matches on it to substitute a user-facing
/// "Network Error".
pub const FAILED_TO_FETCH: &str = "Failed to fetch";

impl TransportError {
    /// Failure before any HTTP response arrived (DNS, refused connection,
    /// closed socket).
    pub fn connect(message: impl Into<String>) -> Self {
        Self {
            status: None,
            body: None,
            message: message.into(),
        }
    }

    /// Failure with an HTTP status and optional parsed body.
    pub fn status(status: u16, body: Option<Value>, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            body,
            message: message.into(),
        }
    }

    /// True for generic connectivity loss, where no more specific message
    /// is worth showing a user.
    pub fn is_connectivity_loss(&self) -> bool {
        self.message == FAILED_TO_FETCH
    }
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown environment: {name}")]
    UnknownEnvironment { name: String },

    #[error("No endpoint configured: set an environment name or QUIVER_BACKEND_URL")]
    MissingEndpoint,
}

/// Failure inside the timing/analytics instrumentation. Never enters
/// [`QuiverError`]: callers log it at `warn` and move on.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("instrumentation failure: {reason}")]
pub struct InstrumentationError {
    pub reason: String,
}

impl InstrumentationError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Master error type for quiver client operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum QuiverError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for quiver client operations.
pub type QuiverResult<T> = Result<T, QuiverError>;

// =============================================================================
// TESTS
// =============================================================================
